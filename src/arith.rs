//! 32-bit cumulative-frequency arithmetic coder with underflow counting.
//!
//! Like the Huffman code stream, the range-coder bits are packed MSB-first
//! ("big-endian") via `bit_vec`, while the frequency-table preamble
//! that precedes them is the LSB-first delta encoding from [`crate::delta`].

use bit_vec::BitVec;
use crate::bitio::BitWriter;
use crate::delta;
use crate::error::{Error,Result};
use std::io::{Read,Write};

const MAX_TOTAL: u64 = u32::MAX as u64;

struct CumFreq {
    cf: Vec<u32>, // cf[i] = sum of freqs[0..i], length alphabet_size + 1
}

impl CumFreq {
    fn from_freqs(freqs: &[u32]) -> Result<Self> {
        let mut cf = Vec::with_capacity(freqs.len() + 1);
        cf.push(0);
        let mut acc: u64 = 0;
        for &f in freqs {
            acc += f as u64;
            if acc > MAX_TOTAL {
                return Err(Error::OversizedTotal { total: acc });
            }
            cf.push(acc as u32);
        }
        Ok(Self { cf })
    }
    fn total(&self) -> u32 {
        *self.cf.last().unwrap()
    }
    fn range_of(&self, symbol: usize) -> (u32,u32) {
        (self.cf[symbol], self.cf[symbol + 1])
    }
    /// Find the symbol whose half-open cumulative interval `[cf[i], cf[i+1])`
    /// contains `target`. Zero-frequency symbols leave `cf` flat, so this is
    /// a partition point rather than a plain binary search for an exact hit.
    fn symbol_for(&self, target: u32) -> usize {
        self.cf.partition_point(|&x| x <= target) - 1
    }
}

struct Encoder {
    low: u32,
    high: u32,
    uf_count: u64,
    bits: BitVec,
}

impl Encoder {
    fn new() -> Self {
        Self { low: 0, high: u32::MAX, uf_count: 0, bits: BitVec::new() }
    }

    fn emit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    fn encode(&mut self, freqs: &CumFreq, symbol: usize) -> Result<()> {
        let (cf_lo, cf_hi) = freqs.range_of(symbol);
        let total = freqs.total() as u64;
        let w = self.high as u64 - self.low as u64 + 1;
        let new_high = self.low as u64 + (w * cf_hi as u64) / total - 1;
        let new_low = self.low as u64 + (w * cf_lo as u64) / total;
        self.high = new_high as u32;
        self.low = new_low as u32;
        loop {
            if (self.low ^ self.high) & 0x8000_0000 == 0 {
                let top = self.low & 0x8000_0000 != 0;
                self.emit(top);
                for _ in 0..self.uf_count {
                    self.emit(!top);
                }
                self.uf_count = 0;
                self.low <<= 1;
                self.high = (self.high << 1) | 1;
            } else if self.low & 0x4000_0000 != 0 && self.high & 0x4000_0000 == 0 {
                self.uf_count += 1;
                self.low = (self.low & 0x8000_0000) | ((self.low << 1) & 0x7fff_ffff);
                self.high = (self.high & 0x8000_0000) | ((self.high << 1) & 0x7fff_ffff) | 1;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> BitVec {
        let top = self.low & 0x8000_0000 != 0;
        self.emit(top);
        for _ in 0..self.uf_count {
            self.emit(!top);
        }
        self.emit(false);
        self.emit(true);
        self.bits
    }
}

struct Decoder<'a> {
    low: u32,
    high: u32,
    enc: u32,
    bits: &'a BitVec,
    ptr: usize,
}

impl<'a> Decoder<'a> {
    fn new(bits: &'a BitVec) -> Self {
        let mut enc: u32 = 0;
        let mut ptr = 0usize;
        for _ in 0..32 {
            enc = (enc << 1) | bits.get(ptr).unwrap_or(true) as u32;
            ptr += 1;
        }
        Self { low: 0, high: u32::MAX, enc, bits, ptr }
    }

    fn next_bit(&mut self) -> bool {
        let b = self.bits.get(self.ptr).unwrap_or(true);
        self.ptr += 1;
        b
    }

    fn decode(&mut self, freqs: &CumFreq) -> usize {
        let total = freqs.total() as u64;
        let w = self.high as u64 - self.low as u64 + 1;
        let ss = ((total * (self.enc as u64 - self.low as u64 + 1)) - 1) / w;
        let symbol = freqs.symbol_for(ss as u32);
        let (cf_lo, cf_hi) = freqs.range_of(symbol);
        let new_high = self.low as u64 + (w * cf_hi as u64) / total - 1;
        let new_low = self.low as u64 + (w * cf_lo as u64) / total;
        self.high = new_high as u32;
        self.low = new_low as u32;
        loop {
            if (self.low ^ self.high) & 0x8000_0000 == 0 {
                self.low <<= 1;
                self.high = (self.high << 1) | 1;
                self.enc = (self.enc << 1) | self.next_bit() as u32;
            } else if self.low & 0x4000_0000 != 0 && self.high & 0x4000_0000 == 0 {
                self.low = (self.low & 0x8000_0000) | ((self.low << 1) & 0x7fff_ffff);
                self.high = (self.high & 0x8000_0000) | ((self.high << 1) & 0x7fff_ffff) | 1;
                self.enc = (self.enc & 0x8000_0000) | ((self.enc << 1) & 0x7fff_ffff) | self.next_bit() as u32;
            } else {
                break;
            }
        }
        symbol
    }
}

/// Write an arithmetic-coder entry: a delta-coded (double form) frequency
/// vector (indices `0..=eof_symbol`) whose final slot is repurposed to carry
/// the encoded bit length, followed by the MSB-packed range-coder bits.
pub fn write_entry<W: Write>(out: &mut W, data: &[u32]) -> Result<()> {
    let max_symbol = data.iter().copied().max().unwrap_or(0);
    let eof_symbol = max_symbol as usize + 1;
    let alphabet_size = eof_symbol + 1;
    let mut freqs = vec![0u32; alphabet_size];
    for &s in data {
        freqs[s as usize] += 1;
    }
    freqs[eof_symbol] = 1;
    let cum = CumFreq::from_freqs(&freqs)?;

    let mut enc = Encoder::new();
    for &s in data {
        enc.encode(&cum, s as usize)?;
    }
    enc.encode(&cum, eof_symbol)?;
    let bits = enc.finish();
    let bit_len = bits.len() as i64;

    let mut seq: Vec<i64> = freqs.iter().map(|&f| f as i64).collect();
    seq.push(bit_len);
    let mut pre = BitWriter::new(Vec::new());
    delta::write_sequence(&mut pre, &seq, true)?;
    out.write_all(&pre.finish()?)?;
    out.write_all(&bits.to_bytes())?;
    Ok(())
}

/// Read an arithmetic-coder entry written by [`write_entry`].
pub fn read_entry<R: Read>(src: &mut R) -> Result<Vec<u32>> {
    let mut br = crate::bitio::BitReader::new(&mut *src);
    let seq = delta::read_sequence(&mut br, true).map_err(|_| Error::TruncatedStream { context: "arithmetic coder preamble" })?;
    br.align_to_byte();
    if seq.is_empty() {
        return Err(Error::InvalidFrequencyTable { reason: "empty arithmetic coder preamble" });
    }
    let (freq_values, bit_len) = seq.split_at(seq.len() - 1);
    let bit_len = bit_len[0];
    if bit_len < 0 {
        return Err(Error::InvalidFrequencyTable { reason: "negative bit length" });
    }
    let freqs: Vec<u32> = freq_values.iter().map(|&f| f.max(0) as u32).collect();
    let alphabet_size = freqs.len();
    if alphabet_size < 1 {
        return Err(Error::InvalidFrequencyTable { reason: "arithmetic coder alphabet too small" });
    }
    let eof_symbol = alphabet_size - 1;
    let cum = CumFreq::from_freqs(&freqs)?;

    let nbytes = (bit_len as usize).div_ceil(8);
    let mut payload = vec![0u8; nbytes];
    src.read_exact(&mut payload).map_err(|_| Error::TruncatedStream { context: "arithmetic coder bits" })?;
    let bits = BitVec::from_bytes(&payload);
    let mut dec = Decoder::new(&bits);

    let mut out = Vec::new();
    loop {
        let symbol = dec.decode(&cum);
        if symbol == eof_symbol {
            break;
        }
        out.push(symbol as u32);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_repeated_zero() {
        let data = vec![0u32; 1024];
        let mut buf = Vec::new();
        write_entry(&mut buf, &data).unwrap();
        let mut cur = std::io::Cursor::new(buf);
        let decoded = read_entry(&mut cur).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn roundtrip_mixed() {
        let data: Vec<u32> = (0..500).map(|i| (i * 37 % 13) as u32).collect();
        let mut buf = Vec::new();
        write_entry(&mut buf, &data).unwrap();
        let mut cur = std::io::Cursor::new(buf);
        let decoded = read_entry(&mut cur).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn roundtrip_empty() {
        let data: Vec<u32> = vec![];
        let mut buf = Vec::new();
        write_entry(&mut buf, &data).unwrap();
        let mut cur = std::io::Cursor::new(buf);
        let decoded = read_entry(&mut cur).unwrap();
        assert!(decoded.is_empty());
    }
}
