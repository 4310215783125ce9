//! RLH: RLE1 pre-pass feeding a single canonical Huffman entry per chunk.
//!
//! A Huffman entry is already self-terminating (its frequency table doubles
//! as the symbol count), so the chunk loop needs
//! no extra framing: keep reading entries until the buffer is exhausted.

use crate::constants::{RLH_CHUNK_SIZE,RLH_MAGIC,RLH_MAX_EXTRA};
use crate::error::{Error,Result};
use crate::{huffman,rle};
use std::io::Cursor;

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = RLH_MAGIC.to_vec();
    log::debug!("RLH: compressing {} bytes in chunks of {}", data.len(), RLH_CHUNK_SIZE);
    for chunk in data.chunks(RLH_CHUNK_SIZE) {
        let transformed = rle::rle1_encode(chunk, RLH_MAX_EXTRA);
        let symbols: Vec<u32> = transformed.iter().map(|&b| b as u32).collect();
        huffman::write_entry(&mut out, &symbols, 256)?;
    }
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 4 || data[0..4] != RLH_MAGIC {
        return Err(Error::BadMagic { path: "<buffer>".into(), expected: RLH_MAGIC, found: data.get(0..4).map(|s| [s[0],s[1],s[2],s[3]]).unwrap_or([0;4]) });
    }
    let mut cur = Cursor::new(&data[4..]);
    let total = cur.get_ref().len() as u64;
    let mut out = Vec::new();
    while cur.position() < total {
        let symbols = huffman::read_entry(&mut cur, 256)?;
        let transformed: Vec<u8> = symbols.iter().map(|&s| s as u8).collect();
        let chunk = rle::rle1_decode(&transformed, RLH_MAX_EXTRA).map_err(|reason| Error::InvalidFrequencyTable { reason })?;
        out.extend(chunk);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aaaab_vector() {
        // "AAAAB" -> RLH magic + RLE1([65,65,65,65,0,66]) Huffman entry.
        let data = b"AAAAB";
        let compressed = compress(data).unwrap();
        assert_eq!(&compressed[0..4], &RLH_MAGIC);
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn empty_input() {
        let compressed = compress(b"").unwrap();
        assert_eq!(decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn single_repeated_byte_stress() {
        let data = vec![b'z'; 10_000];
        let compressed = compress(&data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn random_bytes() {
        let data: Vec<u8> = (0..2000u32).map(|i| ((i * 197 + 13) % 256) as u8).collect();
        let compressed = compress(&data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn multi_chunk_boundary() {
        let mut data = vec![0u8; RLH_CHUNK_SIZE + 500];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 7) as u8;
        }
        let compressed = compress(&data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }
}
