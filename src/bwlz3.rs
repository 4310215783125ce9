//! BWLZ3: an LZB pre-pass (`LZ_MIN_LEN = 512`) over the raw chunk, then
//! RLE1 -> BWT -> MTF -> ZRLE over the pre-pass's output bytes, finished by a
//! second, symbolic LZ77 pass over the (small, post-transform) integer
//! alphabet.
//!
//! The final "symbolic LZ77 stream" names no entropy coder, unlike
//! BWLZHD's Huffman/OBH combination, so it is framed the same way
//! [`crate::delta`] frames any integer sequence: one delta-coded (double
//! form) array per field, linked positionally the way LZA/BWLZHD link their
//! literal/length/distance streams (length `0` marks a literal slot; match
//! lengths are always `>= BWLZ3_SYMBOLIC_PARAMS.min_len == 3`).

use crate::alphabet;
use crate::bitio::{BitReader,BitWriter};
use crate::bwt;
use crate::constants::{
    BWLZ3_CHUNK_SIZE,BWLZ3_MAGIC,BWLZ3_MAX_EXTRA,BWLZ3_PRE_PASS_MIN_LEN,BWLZ3_PRE_PASS_PARAMS,
    BWLZ3_SYMBOLIC_PARAMS,
};
use crate::delta;
use crate::error::{Error,Result};
use crate::lz77::{self,Token};
use crate::lzb;
use crate::mtf;
use crate::rle;
use std::io::{Cursor,Read,Write};

fn write_symbolic_stream(out: &mut Vec<u8>, tokens: &[Token<u32>]) -> Result<()> {
    let mut lengths: Vec<i64> = Vec::with_capacity(tokens.len());
    let mut literals: Vec<i64> = Vec::new();
    let mut distances: Vec<i64> = Vec::new();
    for tok in tokens {
        match *tok {
            Token::Literal(v) => { lengths.push(0); literals.push(v as i64); }
            Token::Match { distance, length } => { lengths.push(length as i64); distances.push(distance as i64); }
        }
    }
    let mut bw = BitWriter::new(Vec::new());
    delta::write_sequence(&mut bw, &lengths, true)?;
    delta::write_sequence(&mut bw, &literals, true)?;
    delta::write_sequence(&mut bw, &distances, true)?;
    out.write_all(&bw.finish()?)?;
    Ok(())
}

fn read_symbolic_stream<R: Read>(src: &mut R) -> Result<Vec<Token<u32>>> {
    let mut br = BitReader::new(src);
    let err = |_| Error::TruncatedStream { context: "bwlz3 symbolic stream" };
    let lengths = delta::read_sequence(&mut br, true).map_err(err)?;
    let literals = delta::read_sequence(&mut br, true).map_err(err)?;
    let distances = delta::read_sequence(&mut br, true).map_err(err)?;
    br.align_to_byte();

    let mut tokens = Vec::with_capacity(lengths.len());
    let mut lit_ptr = 0usize;
    let mut dist_ptr = 0usize;
    for &len in &lengths {
        if len == 0 {
            let v = *literals.get(lit_ptr).ok_or(Error::TruncatedStream { context: "bwlz3 literal stream" })?;
            lit_ptr += 1;
            tokens.push(Token::Literal(v as u32));
        } else {
            let d = *distances.get(dist_ptr).ok_or(Error::TruncatedStream { context: "bwlz3 distance stream" })?;
            dist_ptr += 1;
            tokens.push(Token::Match { distance: d as u32, length: len as u32 });
        }
    }
    Ok(tokens)
}

fn compress_chunk(chunk: &[u8]) -> Result<Vec<u8>> {
    let pre_pass_tokens = lz77::greedy_compress(chunk, BWLZ3_PRE_PASS_PARAMS);
    let mut pre_pass_bytes = Vec::new();
    lzb::encode_tokens(&mut pre_pass_bytes, &pre_pass_tokens, BWLZ3_PRE_PASS_MIN_LEN);

    let rle1_out = rle::rle1_encode(&pre_pass_bytes, BWLZ3_MAX_EXTRA);
    let rle1_u32: Vec<u32> = rle1_out.iter().map(|&b| b as u32).collect();
    let (bwt_l, idx) = bwt::forward_symbolic(&rle1_u32);

    let mut alphabet_u32: Vec<u32> = bwt_l.clone();
    alphabet_u32.sort_unstable();
    alphabet_u32.dedup();
    let mtf_out = mtf::encode_symbolic(&bwt_l, &alphabet_u32);
    let zrle_out = rle::rle2_encode(&mtf_out);

    let tokens2 = lz77::greedy_compress(&zrle_out, BWLZ3_SYMBOLIC_PARAMS);

    let mut out = idx.to_be_bytes().to_vec();
    let alphabet_bytes: Vec<u8> = alphabet_u32.iter().map(|&v| v as u8).collect();
    alphabet::write_alphabet(&mut out, &alphabet_bytes)?;
    write_symbolic_stream(&mut out, &tokens2)?;
    Ok(out)
}

fn decompress_chunk<R: Read>(src: &mut R) -> Result<Vec<u8>> {
    let mut idx_bytes = [0u8;4];
    src.read_exact(&mut idx_bytes).map_err(|_| Error::TruncatedStream { context: "bwlz3 BWT index" })?;
    let idx = u32::from_be_bytes(idx_bytes);

    let alphabet_bytes = alphabet::read_alphabet(src)?;
    let alphabet_u32: Vec<u32> = alphabet_bytes.iter().map(|&b| b as u32).collect();

    let tokens2 = read_symbolic_stream(src)?;
    let zrle_out = lz77::decompress(&tokens2).map_err(|(distance,length,offset)| Error::InvalidBackReference { distance, length, offset })?;
    let mtf_out = rle::rle2_decode(&zrle_out);
    for &idx_val in &mtf_out {
        if idx_val as usize >= alphabet_u32.len() {
            return Err(Error::InvalidFrequencyTable { reason: "MTF index outside BWLZ3 chunk alphabet" });
        }
    }
    let bwt_l = mtf::decode_symbolic(&mtf_out, &alphabet_u32);
    let rle1_u32 = bwt::inverse_symbolic(&bwt_l, idx);
    let rle1_out: Vec<u8> = rle1_u32.iter().map(|&v| v as u8).collect();
    let pre_pass_bytes = rle::rle1_decode(&rle1_out, BWLZ3_MAX_EXTRA).map_err(|reason| Error::InvalidFrequencyTable { reason })?;
    lzb::decode_tokens(&pre_pass_bytes, BWLZ3_PRE_PASS_MIN_LEN)
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = BWLZ3_MAGIC.to_vec();
    log::debug!("BWLZ3: compressing {} bytes in chunks of {}", data.len(), BWLZ3_CHUNK_SIZE);
    for chunk in data.chunks(BWLZ3_CHUNK_SIZE) {
        out.extend(compress_chunk(chunk)?);
    }
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 4 || data[0..4] != BWLZ3_MAGIC {
        return Err(Error::BadMagic { path: "<buffer>".into(), expected: BWLZ3_MAGIC, found: data.get(0..4).map(|s| [s[0],s[1],s[2],s[3]]).unwrap_or([0;4]) });
    }
    let mut cur = Cursor::new(&data[4..]);
    let total = cur.get_ref().len() as u64;
    let mut out = Vec::new();
    while cur.position() < total {
        out.extend(decompress_chunk(&mut cur)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) {
        let compressed = compress(data).unwrap();
        assert_eq!(&compressed[0..4], &BWLZ3_MAGIC);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn empty_input() {
        roundtrip(b"");
    }

    #[test]
    fn repeating_ramp_compresses_well() {
        // 131072 bytes of a repeating 256-byte ramp; highly compressible,
        // so the round trip should shrink the data.
        let data: Vec<u8> = (0..131_072u32).map(|i| (i % 256) as u8).collect();
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn single_repeated_byte() {
        roundtrip(&vec![b'm'; 4096]);
    }

    #[test]
    fn text_round_trips() {
        let data = "mississippi river banks and river boats and river songs".repeat(20);
        roundtrip(data.as_bytes());
    }

    #[test]
    fn multi_chunk_boundary() {
        let chunk = crate::constants::BWLZ3_CHUNK_SIZE;
        let mut data = vec![0u8; chunk + 111];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 37) as u8;
        }
        roundtrip(&data);
    }
}
