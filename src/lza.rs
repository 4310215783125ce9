//! LZA: LZ77 matching whose three token streams (literals, match distances,
//! match lengths) are each entropy-coded with the 32-bit arithmetic coder.
//!
//! The three arithmetic-coder entries per chunk are positionally linked by
//! the *lengths* stream: one entry per emitted token, `0` meaning "this slot
//! is a literal" (consume the next symbol from the literals entry) and
//! nonzero meaning "this slot is a match of this length" (consume the next
//! two symbols (low byte, then high byte) from the indices entry as its
//! distance). `0` is never a legal match length (`LZA_PARAMS.min_len` is 4),
//! so it is an unambiguous literal marker. Each arithmetic-coder entry is
//! already self-terminating (it carries its own EOF sentinel symbol), so no
//! separate token count needs to cross the wire.

use crate::arith;
use crate::constants::{LZA_CHUNK_SIZE,LZA_MAGIC,LZA_PARAMS};
use crate::error::{Error,Result};
use crate::lz77::{self,Token};
use std::io::Cursor;

fn chunk_to_streams(chunk: &[u8]) -> (Vec<u32>,Vec<u32>,Vec<u32>) {
    let tokens = lz77::greedy_compress(chunk, LZA_PARAMS);
    let mut lengths = Vec::with_capacity(tokens.len());
    let mut literals = Vec::new();
    let mut index_bytes = Vec::new();
    for tok in tokens {
        match tok {
            Token::Literal(b) => {
                lengths.push(0);
                literals.push(b as u32);
            }
            Token::Match { distance, length } => {
                lengths.push(length);
                let d = distance as u16;
                index_bytes.push((d & 0xff) as u32);
                index_bytes.push((d >> 8) as u32);
            }
        }
    }
    (literals, index_bytes, lengths)
}

fn streams_to_chunk(literals: &[u32], index_bytes: &[u32], lengths: &[u32]) -> Result<Vec<u8>> {
    let mut tokens = Vec::with_capacity(lengths.len());
    let mut lit_ptr = 0usize;
    let mut idx_ptr = 0usize;
    for &len in lengths {
        if len == 0 {
            let b = *literals.get(lit_ptr).ok_or(Error::TruncatedStream { context: "lza literal stream" })?;
            lit_ptr += 1;
            tokens.push(Token::Literal(b as u8));
        } else {
            let lo = *index_bytes.get(idx_ptr).ok_or(Error::TruncatedStream { context: "lza index stream" })?;
            let hi = *index_bytes.get(idx_ptr + 1).ok_or(Error::TruncatedStream { context: "lza index stream" })?;
            idx_ptr += 2;
            let distance = lo | (hi << 8);
            tokens.push(Token::Match { distance, length: len });
        }
    }
    lz77::decompress(&tokens).map_err(|(distance,length,offset)| Error::InvalidBackReference { distance, length, offset })
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = LZA_MAGIC.to_vec();
    log::debug!("LZA: compressing {} bytes in chunks of {}", data.len(), LZA_CHUNK_SIZE);
    for chunk in data.chunks(LZA_CHUNK_SIZE) {
        let (literals, index_bytes, lengths) = chunk_to_streams(chunk);
        arith::write_entry(&mut out, &literals)?;
        arith::write_entry(&mut out, &index_bytes)?;
        arith::write_entry(&mut out, &lengths)?;
    }
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 4 || data[0..4] != LZA_MAGIC {
        return Err(Error::BadMagic { path: "<buffer>".into(), expected: LZA_MAGIC, found: data.get(0..4).map(|s| [s[0],s[1],s[2],s[3]]).unwrap_or([0;4]) });
    }
    let mut cur = Cursor::new(&data[4..]);
    let total = cur.get_ref().len() as u64;
    let mut out = Vec::new();
    while cur.position() < total {
        let literals = arith::read_entry(&mut cur)?;
        let index_bytes = arith::read_entry(&mut cur)?;
        let lengths = arith::read_entry(&mut cur)?;
        out.extend(streams_to_chunk(&literals, &index_bytes, &lengths)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) {
        let compressed = compress(data).unwrap();
        assert_eq!(compressed[0..4], LZA_MAGIC);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn empty_input() {
        roundtrip(b"");
    }

    #[test]
    fn repeated_zero_single_symbol() {
        // 1024 zero bytes must round-trip and the literal stream should
        // carry very few distinct non-EOF symbols (one match dominates).
        let data = vec![0u8; 1024];
        let compressed = compress(&data).unwrap();
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn literal_only_random() {
        let data: Vec<u8> = (0..300u32).map(|i| ((i * 91) % 253) as u8).collect();
        roundtrip(&data);
    }

    #[test]
    fn mixed_literals_and_matches() {
        let data = b"the quick brown fox the quick brown fox jumps over the quick brown fox".to_vec();
        roundtrip(&data);
    }

    #[test]
    fn multi_chunk_boundary() {
        let mut data = vec![0u8; LZA_CHUNK_SIZE + 777];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 200) as u8;
        }
        roundtrip(&data);
    }
}
