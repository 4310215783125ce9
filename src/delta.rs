//! Elias-gamma-like delta integer coding.
//!
//! A single signed integer is coded as:
//!  - `0` -> bit `0`.
//!  - nonzero `d` -> bit `1`, a sign bit, then the magnitude `m = |d|` coded by
//!    its bit-length `L` (a unary run of `L-1` ones terminated by a `0`) followed
//!    by the low `L-1` bits of `m` (its leading `1` is implied and dropped).
//!
//! The "double" form additionally Elias-codes `L` itself instead of writing it
//! in unary, which pays off once magnitudes get large (frequency counts, OBH
//! indices). A sequence of integers is written as a length prefix (coded with
//! the same scheme) followed by the consecutive differences between elements,
//! starting from an implicit previous value of `0`.

use crate::bitio::{BitReader,BitWriter};
use std::io::{Read,Write};

fn bit_length(m: u64) -> u32 {
    64 - m.leading_zeros()
}

/// Encode the bit-length `l` (`l >= 1`) of a magnitude using a unary prefix:
/// `l-1` one bits then a terminating zero bit.
fn write_unary_length<W: Write>(w: &mut BitWriter<W>, l: u32) -> std::io::Result<()> {
    for _ in 0..l - 1 {
        w.write_bit(true)?;
    }
    w.write_bit(false)
}

fn read_unary_length<R: Read>(r: &mut BitReader<R>) -> std::io::Result<u32> {
    let mut l = 1;
    while r.read_bit()? {
        l += 1;
    }
    Ok(l)
}

/// Encode the bit-length of `l`'s own bit-length, recursively, i.e. Elias-gamma
/// code `l` itself rather than writing it in unary. Used by the double form.
fn write_gamma_length<W: Write>(w: &mut BitWriter<W>, l: u32) -> std::io::Result<()> {
    let l2 = bit_length(l as u64);
    write_unary_length(w, l2)?;
    // low l2-1 bits of l, leading 1 implied
    for i in (0..l2 - 1).rev() {
        w.write_bit((l >> i) & 1 != 0)?;
    }
    Ok(())
}

fn read_gamma_length<R: Read>(r: &mut BitReader<R>) -> std::io::Result<u32> {
    let l2 = read_unary_length(r)?;
    let mut l: u32 = 1;
    for _ in 0..l2 - 1 {
        l = (l << 1) | r.read_bit()? as u32;
    }
    Ok(l)
}

/// Encode one (possibly negative) integer.
pub fn write_signed<W: Write>(w: &mut BitWriter<W>, d: i64, double: bool) -> std::io::Result<()> {
    if d == 0 {
        return w.write_bit(false);
    }
    w.write_bit(true)?;
    w.write_bit(d > 0)?;
    let m = d.unsigned_abs();
    let l = bit_length(m);
    if double {
        write_gamma_length(w, l)?;
    } else {
        write_unary_length(w, l)?;
    }
    for i in (0..l - 1).rev() {
        w.write_bit((m >> i) & 1 != 0)?;
    }
    Ok(())
}

/// Decode one (possibly negative) integer.
pub fn read_signed<R: Read>(r: &mut BitReader<R>, double: bool) -> std::io::Result<i64> {
    if !r.read_bit()? {
        return Ok(0);
    }
    let positive = r.read_bit()?;
    let l = if double { read_gamma_length(r)? } else { read_unary_length(r)? };
    let mut m: u64 = 1;
    for _ in 0..l - 1 {
        m = (m << 1) | r.read_bit()? as u64;
    }
    Ok(if positive { m as i64 } else { -(m as i64) })
}

/// Encode a sequence as a length prefix followed by consecutive differences
/// (the previous value starts at `0`).
pub fn write_sequence<W: Write>(w: &mut BitWriter<W>, values: &[i64], double: bool) -> std::io::Result<()> {
    write_signed(w, values.len() as i64, double)?;
    let mut prev = 0i64;
    for &v in values {
        write_signed(w, v - prev, double)?;
        prev = v;
    }
    Ok(())
}

/// Decode a sequence written by [`write_sequence`].
pub fn read_sequence<R: Read>(r: &mut BitReader<R>, double: bool) -> std::io::Result<Vec<i64>> {
    let n = read_signed(r, double)?;
    let mut out = Vec::with_capacity(n.max(0) as usize);
    let mut prev = 0i64;
    for _ in 0..n {
        let d = read_signed(r, double)?;
        prev += d;
        out.push(prev);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip_value(d: i64, double: bool) {
        let mut w = BitWriter::new(Vec::new());
        write_signed(&mut w, d, double).unwrap();
        let bytes = w.finish().unwrap();
        let mut r = BitReader::new(Cursor::new(bytes));
        assert_eq!(read_signed(&mut r, double).unwrap(), d);
    }

    #[test]
    fn single_form_values() {
        for d in [-1000i64, -255, -1, 0, 1, 2, 3, 4, 255, 1000, 65535, 1_000_000] {
            roundtrip_value(d, false);
        }
    }

    #[test]
    fn double_form_values() {
        for d in [-1000i64, -255, -1, 0, 1, 2, 3, 4, 255, 1000, 65535, 1_000_000, 1 << 30] {
            roundtrip_value(d, true);
        }
    }

    #[test]
    fn sequence_roundtrip() {
        for double in [false, true] {
            let values = vec![0i64, 3, 3, 10, 9, -5, 0];
            let mut w = BitWriter::new(Vec::new());
            write_sequence(&mut w, &values, double).unwrap();
            let bytes = w.finish().unwrap();
            let mut r = BitReader::new(Cursor::new(bytes));
            assert_eq!(read_sequence(&mut r, double).unwrap(), values);
        }
    }

    #[test]
    fn empty_sequence() {
        let mut w = BitWriter::new(Vec::new());
        write_sequence(&mut w, &[], false).unwrap();
        let bytes = w.finish().unwrap();
        let mut r = BitReader::new(Cursor::new(bytes));
        assert_eq!(read_sequence(&mut r, false).unwrap(), Vec::<i64>::new());
    }
}
