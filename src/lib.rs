//! # chunkpress
//!
//! Byte-exact, lossless compression across six small archive formats built
//! from one shared transform algebra: bit I/O, delta integer coding,
//! canonical Huffman, a 32-bit arithmetic coder, BWT, MTF, RLE1/RLE2, and
//! LZ77/LZSS.
//!
//! * `lzb` - byte-aligned LZSS block container, LZ4-like.
//! * `lza` - LZSS with literal/index/length streams each arithmetic-coded.
//! * `rlh` - RLE1 feeding a single canonical Huffman entry.
//! * `bwlzhd` - BWT + RLE1 + LZ77 with Huffman/OBH-coded match streams.
//! * `bwlz3` - an LZB pre-pass, then BWT + MTF + ZRLE, then a second,
//!   symbolic LZ77 pass.
//! * `mra` - a per-chunk MTF alphabet feeding RLE2 + RLE1 + one arithmetic
//!   entry.
//!
//! Every container shares the transform modules (`bitio`, `delta`,
//! `huffman`, `arith`, `bwt`, `mtf`, `rle`, `lz77`, `alphabet`, `obh`) rather
//! than duplicating them.
//!
//! ## Buffer example
//!
//! ```rs
//! use chunkpress::{lzb};
//! let test_data = "This is the chaunt of the priests.".as_bytes();
//! let compressed = lzb::compress(test_data).expect("compression failed");
//! let restored = lzb::decompress(&compressed).expect("decompression failed");
//! assert_eq!(restored, test_data);
//! ```

pub mod alphabet;
pub mod arith;
pub mod bitio;
pub mod bwt;
pub mod constants;
pub mod delta;
pub mod error;
pub mod huffman;
pub mod lz77;
pub mod mtf;
pub mod obh;
pub mod rle;

pub mod bwlz3;
pub mod bwlzhd;
pub mod lza;
pub mod lzb;
pub mod mra;
pub mod rlh;

pub use error::{Error,Result};

/// One of the six archive formats this crate reads and writes, identified by
/// file extension.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Format {
    Lzb,
    Lza,
    Rlh,
    Bwlzhd,
    Bwlz3,
    Mra,
}

impl Format {
    /// The extension (without leading dot) this format is recognized by.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Lzb => "lzb",
            Format::Lza => "lza",
            Format::Rlh => "rlh",
            Format::Bwlzhd => "bwlzhd",
            Format::Bwlz3 => "bwlz3",
            Format::Mra => "mra",
        }
    }

    /// Match a file extension (case-insensitive, no leading dot) against one
    /// of the six known formats.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "lzb" => Some(Format::Lzb),
            "lza" => Some(Format::Lza),
            "rlh" => Some(Format::Rlh),
            "bwlzhd" => Some(Format::Bwlzhd),
            "bwlz3" => Some(Format::Bwlz3),
            "mra" => Some(Format::Mra),
            _ => None,
        }
    }
}

/// Compress `data` into the named format's archive representation.
pub fn compress(format: Format, data: &[u8]) -> Result<Vec<u8>> {
    match format {
        Format::Lzb => lzb::compress(data),
        Format::Lza => lza::compress(data),
        Format::Rlh => rlh::compress(data),
        Format::Bwlzhd => bwlzhd::compress(data),
        Format::Bwlz3 => bwlz3::compress(data),
        Format::Mra => mra::compress(data),
    }
}

/// Decompress an archive previously produced by [`compress`] for the same format.
pub fn decompress(format: Format, data: &[u8]) -> Result<Vec<u8>> {
    match format {
        Format::Lzb => lzb::decompress(data),
        Format::Lza => lza::decompress(data),
        Format::Rlh => rlh::decompress(data),
        Format::Bwlzhd => bwlzhd::decompress(data),
        Format::Bwlz3 => bwlz3::decompress(data),
        Format::Mra => mra::decompress(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_roundtrip() {
        for f in [Format::Lzb,Format::Lza,Format::Rlh,Format::Bwlzhd,Format::Bwlz3,Format::Mra] {
            assert_eq!(Format::from_extension(f.extension()), Some(f));
        }
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(Format::from_extension("zip"), None);
    }

    #[test]
    fn dispatch_matches_direct_call() {
        let data = b"the quick brown fox jumps over the lazy dog";
        for f in [Format::Lzb,Format::Lza,Format::Rlh,Format::Bwlzhd,Format::Bwlz3,Format::Mra] {
            let compressed = compress(f, data).unwrap();
            assert_eq!(decompress(f, &compressed).unwrap(), data);
        }
    }
}
