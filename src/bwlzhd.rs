//! BWLZHD: BWT + RLE1 + LZ77 with DEFLATE-like length/distance handling and
//! canonical Huffman literal/length tables, OBH-coded distances.
//!
//! Pipeline (compress order, decode reverses it):
//! RLE1 -> BWT forward -> RLE1 -> LZ77. The LZ77 stage picks literal vs match
//! by a bit-cost heuristic rather than always taking the longest match.
//! Per-chunk framing picks between a COMPRESSED and UNCOMPRESSED branch using
//! `RANDOM_DATA_THRESHOLD` against the already-fully-built compressed
//! payload's size, so the comparison is exact rather than itself an estimate.
//!
//! The match stream's literal/length/distance split mirrors LZA's "lengths
//! array doubles as the literal/match position map" design (`0` is never a
//! legal match length since `BWLZHD_PARAMS.min_len == 3`): one Huffman entry
//! for literal bytes, one for lengths (also the position map), and one
//! [`crate::obh`] entry for match distances.

use crate::bwt;
use crate::constants::{BWLZHD_CHUNK_SIZE,BWLZHD_MAGIC,BWLZHD_MAX_EXTRA,BWLZHD_PARAMS,RANDOM_DATA_THRESHOLD};
use crate::error::{Error,Result};
use crate::huffman;
use crate::lz77::{self,Matcher,Token};
use crate::obh;
use crate::rle;
use std::io::{Cursor,Read};

const COMPRESSED: u8 = 0x01;
const UNCOMPRESSED: u8 = 0x00;

fn bit_length(v: u32) -> u32 {
    if v == 0 { 0 } else { 32 - v.leading_zeros() }
}

/// Estimated bits to encode a `(distance, length)` match with a DEFLATE-like
/// symbol-plus-extra-bits scheme: roughly one symbol byte (8 bits) plus the
/// extra bits needed to select within that symbol's class, per length and
/// distance.
fn match_cost_bits(distance: usize, length: usize) -> f64 {
    let len_bits = 8.0 + bit_length(length as u32) as f64;
    let dist_bits = 5.0 + bit_length(distance as u32) as f64;
    len_bits + dist_bits
}

/// Greedy LZSS using a bit-cost heuristic: at each position, compare
/// the estimated cost of the longest available match against the cost of
/// emitting that many literal bytes (using running per-symbol literal
/// frequencies as the estimate), and take whichever is cheaper. Ties favor
/// the match.
fn bit_cost_compress(data: &[u8]) -> Vec<Token<u8>> {
    let mut matcher = Matcher::new(data, BWLZHD_PARAMS);
    let mut tokens = Vec::new();
    let mut lit_freq = [1u64;256];
    let mut lit_total: u64 = 256;
    let n = data.len();
    let mut i = 0;
    while i < n {
        let cand = matcher.best_match(i);
        let take_match = if let Some((dist,len)) = cand {
            let lit_bits: f64 = (0..len).map(|k| {
                let b = data[i + k] as usize;
                -((lit_freq[b] as f64) / (lit_total as f64)).log2()
            }).sum();
            match_cost_bits(dist, len) <= lit_bits
        } else {
            false
        };
        if take_match {
            let (dist,len) = cand.unwrap();
            tokens.push(Token::Match { distance: dist as u32, length: len as u32 });
            let end = i + len;
            while i < end {
                matcher.insert(i);
                i += 1;
            }
        } else {
            let b = data[i];
            lit_freq[b as usize] += 1;
            lit_total += 1;
            tokens.push(Token::Literal(b));
            matcher.insert(i);
            i += 1;
        }
    }
    tokens
}

fn build_compressed_payload(rle1_b: &[u8], idx: u32) -> Result<Vec<u8>> {
    let tokens = bit_cost_compress(rle1_b);
    let mut lengths = Vec::with_capacity(tokens.len());
    let mut literals = Vec::new();
    let mut distances = Vec::new();
    for tok in &tokens {
        match *tok {
            Token::Literal(b) => { lengths.push(0); literals.push(b as u32); }
            Token::Match { distance, length } => { lengths.push(length); distances.push(distance); }
        }
    }
    let mut out = idx.to_be_bytes().to_vec();
    huffman::write_entry(&mut out, &literals, 256)?;
    huffman::write_entry(&mut out, &lengths, BWLZHD_PARAMS.max_len + 1)?;
    obh::write_entry(&mut out, &distances)?;
    Ok(out)
}

fn compress_chunk(chunk: &[u8]) -> Result<Vec<u8>> {
    let rle1_a = rle::rle1_encode(chunk, BWLZHD_MAX_EXTRA);
    let (bwt_l, idx) = bwt::forward(&rle1_a);
    let rle1_b = rle::rle1_encode(&bwt_l, BWLZHD_MAX_EXTRA);
    let compressed_payload = build_compressed_payload(&rle1_b, idx)?;

    // Strict `>` selects the compressed branch; the inequality direction
    // is preserved for byte-compatibility with a reimplementation.
    if compressed_payload.len() as f64 > chunk.len() as f64 * RANDOM_DATA_THRESHOLD {
        let raw: Vec<u32> = chunk.iter().map(|&b| b as u32).collect();
        let mut out = vec![UNCOMPRESSED];
        huffman::write_entry(&mut out, &raw, 256)?;
        Ok(out)
    } else {
        let mut out = vec![COMPRESSED];
        out.extend(compressed_payload);
        Ok(out)
    }
}

fn decompress_chunk<R: Read>(src: &mut R) -> Result<Vec<u8>> {
    let mut flag = [0u8;1];
    src.read_exact(&mut flag).map_err(|_| Error::TruncatedStream { context: "bwlzhd chunk flag" })?;
    if flag[0] == UNCOMPRESSED {
        let raw = huffman::read_entry(src, 256)?;
        return Ok(raw.iter().map(|&s| s as u8).collect());
    }
    let mut idx_bytes = [0u8;4];
    src.read_exact(&mut idx_bytes).map_err(|_| Error::TruncatedStream { context: "bwlzhd BWT index" })?;
    let idx = u32::from_be_bytes(idx_bytes);
    let literals = huffman::read_entry(src, 256)?;
    let lengths = huffman::read_entry(src, BWLZHD_PARAMS.max_len + 1)?;
    let distances = obh::read_entry(src)?;

    let mut tokens = Vec::with_capacity(lengths.len());
    let mut lit_ptr = 0usize;
    let mut dist_ptr = 0usize;
    for &len in &lengths {
        if len == 0 {
            let b = *literals.get(lit_ptr).ok_or(Error::TruncatedStream { context: "bwlzhd literal stream" })?;
            lit_ptr += 1;
            tokens.push(Token::Literal(b as u8));
        } else {
            let d = *distances.get(dist_ptr).ok_or(Error::TruncatedStream { context: "bwlzhd distance stream" })?;
            dist_ptr += 1;
            tokens.push(Token::Match { distance: d, length: len });
        }
    }
    let rle1_b = lz77::decompress(&tokens).map_err(|(distance,length,offset)| Error::InvalidBackReference { distance, length, offset })?;
    let bwt_l = rle::rle1_decode(&rle1_b, BWLZHD_MAX_EXTRA).map_err(|reason| Error::InvalidFrequencyTable { reason })?;
    let rle1_a = bwt::inverse(&bwt_l, idx);
    rle::rle1_decode(&rle1_a, BWLZHD_MAX_EXTRA).map_err(|reason| Error::InvalidFrequencyTable { reason })
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = BWLZHD_MAGIC.to_vec();
    log::debug!("BWLZHD: compressing {} bytes in chunks of {}", data.len(), BWLZHD_CHUNK_SIZE);
    for chunk in data.chunks(BWLZHD_CHUNK_SIZE) {
        out.extend(compress_chunk(chunk)?);
    }
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 4 || data[0..4] != BWLZHD_MAGIC {
        return Err(Error::BadMagic { path: "<buffer>".into(), expected: BWLZHD_MAGIC, found: data.get(0..4).map(|s| [s[0],s[1],s[2],s[3]]).unwrap_or([0;4]) });
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
        assert_eq!(&compressed[0..4], &BWLZHD_MAGIC);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn empty_input() {
        roundtrip(b"");
    }

    #[test]
    fn random_bytes_round_trip() {
        // A pseudo-random byte sequence has little exploitable structure;
        // whichever branch `RANDOM_DATA_THRESHOLD` selects, the chunk must
        // still round-trip exactly.
        let mut x: u32 = 0x1234_5678;
        let data: Vec<u8> = (0..4096).map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x & 0xff) as u8
        }).collect();
        roundtrip(&data);
    }

    #[test]
    fn repetitive_text_round_trips() {
        let data = "the quick brown fox jumps over the lazy dog. the quick brown fox jumps again.".as_bytes();
        roundtrip(data);
    }

    #[test]
    fn single_repeated_byte() {
        roundtrip(&vec![b'q'; 8000]);
    }

    #[test]
    fn multi_chunk_boundary() {
        let mut data = vec![0u8; BWLZHD_CHUNK_SIZE + 333];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 23) as u8;
        }
        roundtrip(&data);
    }
}
