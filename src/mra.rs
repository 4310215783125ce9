//! MRA: per-chunk MTF alphabet followed by one arithmetic-coder entry over
//! `RLE1(RLE2(MTF(chunk, alphabet)))`.
//!
//! MRA uses the `0x03` version byte rather than `0x01` and bounds
//! RLE1's extra-repetition count to 254 rather than 255. MTF's output can
//! reach the chunk's full alphabet size, and RLE2 shifts non-zero symbols by
//! one more, so both the MTF and RLE1 stages run over `u32` symbols rather
//! than raw bytes.

use crate::alphabet;
use crate::arith;
use crate::constants::{MRA_CHUNK_SIZE,MRA_MAGIC,MRA_MAX_EXTRA};
use crate::error::{Error,Result};
use crate::{mtf,rle};
use std::io::Cursor;

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = MRA_MAGIC.to_vec();
    log::debug!("MRA: compressing {} bytes in chunks of {}", data.len(), MRA_CHUNK_SIZE);
    for chunk in data.chunks(MRA_CHUNK_SIZE) {
        let mut alphabet_bytes: Vec<u8> = chunk.to_vec();
        alphabet_bytes.sort_unstable();
        alphabet_bytes.dedup();
        alphabet::write_alphabet(&mut out, &alphabet_bytes)?;

        let alphabet_u32: Vec<u32> = alphabet_bytes.iter().map(|&b| b as u32).collect();
        let chunk_u32: Vec<u32> = chunk.iter().map(|&b| b as u32).collect();
        let mtf_out = mtf::encode_symbolic(&chunk_u32, &alphabet_u32);
        let zrle_out = rle::rle2_encode(&mtf_out);
        let rle1_out = rle::rle1_encode_u32(&zrle_out, MRA_MAX_EXTRA);
        arith::write_entry(&mut out, &rle1_out)?;
    }
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 4 || data[0..4] != MRA_MAGIC {
        return Err(Error::BadMagic { path: "<buffer>".into(), expected: MRA_MAGIC, found: data.get(0..4).map(|s| [s[0],s[1],s[2],s[3]]).unwrap_or([0;4]) });
    }
    let mut cur = Cursor::new(&data[4..]);
    let total = cur.get_ref().len() as u64;
    let mut out = Vec::new();
    while cur.position() < total {
        let alphabet_bytes = alphabet::read_alphabet(&mut cur)?;
        let alphabet_u32: Vec<u32> = alphabet_bytes.iter().map(|&b| b as u32).collect();
        let rle1_out = arith::read_entry(&mut cur)?;
        let zrle_out = rle::rle1_decode_u32(&rle1_out, MRA_MAX_EXTRA).map_err(|reason| Error::InvalidFrequencyTable { reason })?;
        let mtf_out = rle::rle2_decode(&zrle_out);
        for &idx in &mtf_out {
            if idx as usize >= alphabet_u32.len() {
                return Err(Error::InvalidFrequencyTable { reason: "MTF index outside chunk alphabet" });
            }
        }
        let chunk_u32 = mtf::decode_symbolic(&mtf_out, &alphabet_u32);
        out.extend(chunk_u32.iter().map(|&s| s as u8));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) {
        let compressed = compress(data).unwrap();
        assert_eq!(&compressed[0..4], &MRA_MAGIC);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn empty_input() {
        roundtrip(b"");
    }

    #[test]
    fn alternating_two_groups() {
        // alternating 00 FF ... of length 4096; alphabet spans groups 0 and 7.
        let data: Vec<u8> = (0..4096).map(|i| if i % 2 == 0 { 0x00 } else { 0xFF }).collect();
        roundtrip(&data);
    }

    #[test]
    fn single_repeated_byte() {
        roundtrip(&vec![7u8; 5000]);
    }

    #[test]
    fn full_byte_alphabet_chunk() {
        let mut data: Vec<u8> = (0..=255u8).collect();
        data.extend(0..=255u8);
        data.extend(0..=255u8);
        roundtrip(&data);
    }

    #[test]
    fn multi_chunk_boundary() {
        let mut data = vec![0u8; MRA_CHUNK_SIZE + 250];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 50) as u8;
        }
        roundtrip(&data);
    }
}
