//! LZB: byte-aligned LZSS block container inspired by LZ4.
//!
//! Unlike the other five formats, an LZB payload carries no per-entry bit
//! length to re-synchronize on, so there is nothing in the byte stream itself
//! that marks a chunk boundary. We honor a "read `CHUNK_SIZE` bytes,
//! repeat until EOF" convention by feeding the match finder one `LZB_CHUNK_SIZE` slice at
//! a time (bounding compression-time memory and match distance the way the
//! other containers bound their chunk-local state), but the emitted token
//! stream itself is one continuous sequence for the whole archive: only the
//! very last group (decided at the true end of the file) omits the trailing
//! distance field. This is the only reading under which the decoder, which
//! has no chunk-length field to consult, can tell a literal-only group apart
//! from one that merely ran out of match candidates mid-chunk.

use crate::constants::{LZB_CHUNK_SIZE,LZB_MAGIC,LZB_PARAMS};
use crate::error::{Error,Result};
use crate::lz77::{self,Token};

fn write_ext_count<W: std::io::Write>(out: &mut W, mut extra: usize) -> std::io::Result<()> {
    while extra >= 255 {
        out.write_all(&[255])?;
        extra -= 255;
    }
    out.write_all(&[extra as u8])
}

fn read_ext_count(data: &[u8], pos: &mut usize) -> Result<usize> {
    let mut total = 0usize;
    loop {
        let b = *data.get(*pos).ok_or(Error::TruncatedStream { context: "lzb extension byte" })?;
        *pos += 1;
        total += b as usize;
        if b < 255 {
            break;
        }
    }
    Ok(total)
}

/// Encode a token stream in LZB's byte-aligned token format, without a magic
/// header. Exposed so BWLZ3's pre-pass can reuse the exact same wire
/// format over its own `LZ_MIN_LEN = 512` tokens.
pub fn encode_tokens(out: &mut Vec<u8>, tokens: &[Token<u8>], min_len: usize) {
    let mut literal_run: Vec<u8> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            Token::Literal(b) => {
                literal_run.push(b);
                i += 1;
            }
            Token::Match { distance, length } => {
                write_group(out, &literal_run, Some((distance, length)), min_len);
                literal_run.clear();
                i += 1;
            }
        }
    }
    if !literal_run.is_empty() || tokens.is_empty() {
        write_group(out, &literal_run, None, min_len);
    }
}

fn write_group(out: &mut Vec<u8>, literals: &[u8], m: Option<(u32,u32)>, min_len: usize) {
    let lit_nibble = (literals.len().min(15)) as u8;
    let match_nibble = match m {
        Some((_,length)) => ((length as usize - min_len).min(15)) as u8,
        None => 0,
    };
    out.push((lit_nibble << 4) | match_nibble);
    if literals.len() >= 15 {
        write_ext_count(out, literals.len() - 15).expect("Vec write is infallible");
    }
    out.extend_from_slice(literals);
    if let Some((distance,length)) = m {
        out.extend_from_slice(&(distance as u16).to_le_bytes());
        let extra = length as usize - min_len;
        if extra >= 15 {
            write_ext_count(out, extra - 15).expect("Vec write is infallible");
        }
    }
}

/// Decode a continuous LZB token stream back into the original bytes.
pub fn decode_tokens(data: &[u8], min_len: usize) -> Result<Vec<u8>> {
    let mut tokens: Vec<Token<u8>> = Vec::new();
    let mut pos = 0usize;
    while pos < data.len() {
        let tok = data[pos];
        pos += 1;
        let mut lit_count = (tok >> 4) as usize;
        if lit_count == 15 {
            lit_count += read_ext_count(data, &mut pos)?;
        }
        let literals = data.get(pos..pos + lit_count).ok_or(Error::TruncatedStream { context: "lzb literal run" })?;
        pos += lit_count;
        for &b in literals {
            tokens.push(Token::Literal(b));
        }
        if pos >= data.len() {
            // No bytes left for a distance field: this was the terminal group.
            break;
        }
        let mut match_extra = (tok & 0x0f) as usize;
        let dist_bytes = data.get(pos..pos + 2).ok_or(Error::TruncatedStream { context: "lzb distance" })?;
        let distance = u16::from_le_bytes([dist_bytes[0],dist_bytes[1]]);
        pos += 2;
        if match_extra == 15 {
            match_extra += read_ext_count(data, &mut pos)?;
        }
        let length = (match_extra + min_len) as u32;
        tokens.push(Token::Match { distance: distance as u32, length });
    }
    lz77::decompress(&tokens).map_err(|(distance,length,offset)| Error::InvalidBackReference { distance, length, offset })
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = LZB_MAGIC.to_vec();
    log::debug!("LZB: compressing {} bytes in chunks of {}", data.len(), LZB_CHUNK_SIZE);
    let mut tokens: Vec<Token<u8>> = Vec::new();
    for chunk in data.chunks(LZB_CHUNK_SIZE) {
        tokens.extend(lz77::greedy_compress(chunk, LZB_PARAMS));
    }
    encode_tokens(&mut out, &tokens, LZB_PARAMS.min_len);
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 4 || data[0..4] != LZB_MAGIC {
        return Err(Error::BadMagic { path: "<buffer>".into(), expected: LZB_MAGIC, found: data.get(0..4).map(|s| [s[0],s[1],s[2],s[3]]).unwrap_or([0;4]) });
    }
    log::debug!("LZB: decompressing {} payload bytes", data.len() - 4);
    decode_tokens(&data[4..], LZB_PARAMS.min_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) {
        let compressed = compress(data).unwrap();
        assert_eq!(compressed[0..4], LZB_MAGIC);
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn empty_input() {
        roundtrip(b"");
    }

    #[test]
    fn single_byte() {
        roundtrip(b"x");
    }

    #[test]
    fn repeated_triple_finds_a_match() {
        // abcabcabc must compress with at least one match of distance 3.
        let data = b"abcabcabc";
        let compressed = compress(data).unwrap();
        let body = &compressed[4..];
        // first token's low nibble encodes a match length (minus LZB_MIN_LEN) once
        // a match covering the repeated "abc" is found.
        assert!(body.len() < data.len() + 4);
        roundtrip(data);
    }

    #[test]
    fn literal_only_random_bytes() {
        let data: Vec<u8> = (0..200u32).map(|i| ((i * 73) % 251) as u8).collect();
        roundtrip(&data);
    }

    #[test]
    fn multi_chunk_boundary() {
        let mut data = vec![0u8; LZB_CHUNK_SIZE + 1000];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 250) as u8;
        }
        roundtrip(&data);
    }

    #[test]
    fn extension_bytes_for_long_literal_run() {
        let data: Vec<u8> = (0..600u32).map(|i| (i % 256) as u8).collect();
        roundtrip(&data);
    }
}
