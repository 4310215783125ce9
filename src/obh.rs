//! OBH ("offset-bit-Huffman") distance coding, used only by BWLZHD's match
//! index stream. The source material invokes this through a library with no
//! documented wire format of its own, so this is an original, self-consistent
//! design rather than a recovered one: Huffman-code each distance's bit
//! length (its "class"), then pack the remaining low bits of the distance
//! (the leading `1` of its binary form is implied by the class) as a raw bit
//! stream immediately following, the same split [`crate::delta`] uses for a
//! single magnitude. Both halves are self-terminating: the Huffman class
//! entry carries its own symbol count, and that count tells the reader
//! exactly how many raw bit-groups to expect next, so no extra length
//! field crosses the wire.

use crate::bitio::{BitReader,BitWriter};
use crate::error::Result;
use crate::huffman;
use std::io::{Read,Write};

fn bit_length(v: u32) -> u32 {
    32 - v.leading_zeros()
}

/// Write a sequence of back-reference distances (each `>= 1`).
pub fn write_entry<W: Write>(out: &mut W, distances: &[u32]) -> Result<()> {
    let classes: Vec<u32> = distances.iter().map(|&d| bit_length(d)).collect();
    let max_class = classes.iter().copied().max().unwrap_or(0);
    huffman::write_entry(out, &classes, max_class as usize + 1)?;

    let mut bw = BitWriter::new(Vec::new());
    for (&d, &c) in distances.iter().zip(classes.iter()) {
        for i in (0..c - 1).rev() {
            bw.write_bit((d >> i) & 1 != 0)?;
        }
    }
    out.write_all(&bw.finish()?)?;
    Ok(())
}

/// Read a sequence of distances written by [`write_entry`].
pub fn read_entry<R: Read>(src: &mut R) -> Result<Vec<u32>> {
    let classes = huffman::read_entry(src, 33)?;
    let mut br = BitReader::new(src);
    let mut out = Vec::with_capacity(classes.len());
    for &c in &classes {
        let mut v: u32 = 1;
        for _ in 0..c - 1 {
            v = (v << 1) | br.read_bit()? as u32;
        }
        out.push(v);
    }
    br.align_to_byte();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip_distances() {
        let distances = vec![1u32, 2, 3, 255, 256, 65535, 1000, 1, 1, 1];
        let mut buf = Vec::new();
        write_entry(&mut buf, &distances).unwrap();
        let mut cur = Cursor::new(buf);
        assert_eq!(read_entry(&mut cur).unwrap(), distances);
    }

    #[test]
    fn empty_entry() {
        let mut buf = Vec::new();
        write_entry(&mut buf, &[]).unwrap();
        let mut cur = Cursor::new(buf);
        assert_eq!(read_entry(&mut cur).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn single_distance() {
        let mut buf = Vec::new();
        write_entry(&mut buf, &[42]).unwrap();
        let mut cur = Cursor::new(buf);
        assert_eq!(read_entry(&mut cur).unwrap(), vec![42]);
    }
}
