//! Canonical-by-construction Huffman coding.
//!
//! The tree is built once from a frequency table by repeatedly merging the two
//! lowest-weight roots (ties broken by the smallest symbol present in either
//! subtree). Because the merge order is fully determined by the frequency
//! table, the decoder needs nothing but that same table to rebuild an
//! identical tree and walk it bit by bit, so no code-length table has to cross
//! the wire separately from the frequencies.
//!
//! Code bits are packed MSB-first ("big-endian") using `bit_vec::BitVec`.
//! This is deliberately the opposite bit order from [`crate::bitio`], which
//! is LSB-first and used for the delta-coded frequency preamble that
//! precedes the code bits.

use bit_vec::BitVec;
use crate::bitio::{BitReader,BitWriter};
use crate::delta;
use crate::error::{Error,Result};
use std::io::{Read,Write};

#[derive(Clone,Copy)]
struct Node {
    weight: u64,
    min_symbol: u32,
    left: Option<usize>,
    right: Option<usize>,
    symbol: Option<u32>,
}

/// Build the merge tree for a dense frequency table (index = symbol).
/// Returns the arena and the index of the root. `None` if every frequency is zero.
fn build_tree(freqs: &[u32]) -> Option<(Vec<Node>,usize)> {
    let mut arena = Vec::new();
    let mut active: Vec<usize> = Vec::new();
    for (sym, &f) in freqs.iter().enumerate() {
        if f > 0 {
            arena.push(Node { weight: f as u64, min_symbol: sym as u32, left: None, right: None, symbol: Some(sym as u32) });
            active.push(arena.len() - 1);
        }
    }
    if active.is_empty() {
        return None;
    }
    if active.len() == 1 {
        return Some((arena, active[0]));
    }
    // Sort ascending by (weight, min_symbol); stable small-N selection sort per merge
    // step rather than a full heap, matching the "repeated two-smallest merge" wording.
    let key = |arena: &[Node], i: usize| (arena[i].weight, arena[i].min_symbol);
    while active.len() > 1 {
        active.sort_by_key(|&i| key(&arena, i));
        let a = active.remove(0);
        let b = active.remove(0);
        let node = Node {
            weight: arena[a].weight + arena[b].weight,
            min_symbol: arena[a].min_symbol.min(arena[b].min_symbol),
            left: Some(a),
            right: Some(b),
            symbol: None,
        };
        arena.push(node);
        active.push(arena.len() - 1);
    }
    Some((arena, active[0]))
}

/// Depth-first walk assigning `0` to left children and `1` to right, collecting
/// a code (bits in root-to-leaf order, first bit in position 0) per symbol.
fn code_table(arena: &[Node], root: usize) -> Vec<Option<(Vec<bool>,u32)>> {
    let max_symbol = arena.iter().filter_map(|n| n.symbol).max().unwrap_or(0);
    let mut table = vec![None; max_symbol as usize + 1];
    let mut stack = vec![(root, Vec::new())];
    while let Some((idx, path)) = stack.pop() {
        let node = &arena[idx];
        if let Some(sym) = node.symbol {
            let len = path.len() as u32;
            table[sym as usize] = Some((path, len.max(1)));
            continue;
        }
        if let Some(l) = node.left {
            let mut p = path.clone();
            p.push(false);
            stack.push((l, p));
        }
        if let Some(r) = node.right {
            let mut p = path.clone();
            p.push(true);
            stack.push((r, p));
        }
    }
    // Degenerate single-symbol alphabet: the tree has no internal node, so the
    // walk above never pushes a bit. Assign it a single zero bit by convention.
    if arena.len() == 1 {
        if let Some(sym) = arena[0].symbol {
            table[sym as usize] = Some((vec![false], 1));
        }
    }
    table
}

/// Write a Huffman "entry": a delta-coded sorted symbol
/// list, a delta-coded (double form) frequency list in the same order, a
/// 32-bit big-endian bit count, then the MSB-packed code stream.
pub fn write_entry<W: Write>(out: &mut W, data: &[u32], alphabet_size: usize) -> Result<()> {
    let mut freqs = vec![0u32; alphabet_size];
    for &s in data {
        freqs[s as usize] += 1;
    }
    let symbols: Vec<i64> = (0..alphabet_size).filter(|&i| freqs[i] > 0).map(|i| i as i64).collect();
    let freq_values: Vec<i64> = symbols.iter().map(|&s| freqs[s as usize] as i64).collect();

    let mut pre = BitWriter::new(Vec::new());
    delta::write_sequence(&mut pre, &symbols, false)?;
    delta::write_sequence(&mut pre, &freq_values, true)?;
    let preamble = pre.finish()?;
    out.write_all(&preamble)?;

    let mut bits = BitVec::new();
    if let Some((arena, root)) = build_tree(&freqs) {
        let table = code_table(&arena, root);
        for &s in data {
            let (path, _) = table[s as usize].as_ref().expect("symbol present in freq table");
            for &b in path {
                bits.push(b);
            }
        }
    }
    out.write_all(&(bits.len() as u32).to_be_bytes())?;
    out.write_all(&bits.to_bytes())?;
    Ok(())
}

/// Read a Huffman entry written by [`write_entry`]. The symbol count needs no
/// separate framing: it is the sum of the decoded frequency table, since
/// that table was built from exactly the symbols that were encoded.
pub fn read_entry<R: Read>(src: &mut R, alphabet_size: usize) -> Result<Vec<u32>> {
    // The preamble is its own LSB-first bit stream, but it is not
    // byte-length-prefixed; we read it directly off `src` via a BitReader
    // and rely on the delta decoder consuming exactly the bits it wrote
    // (callers must byte-align `src` afterwards, which the sequential
    // delta reads already guarantee since the writer pads to a byte).
    let mut br = BitReader::new(&mut *src);
    let symbols = delta::read_sequence(&mut br, false).map_err(|_| Error::TruncatedStream { context: "huffman symbol list" })?;
    let freq_values = delta::read_sequence(&mut br, true).map_err(|_| Error::TruncatedStream { context: "huffman frequency list" })?;
    br.align_to_byte();
    if symbols.len() != freq_values.len() {
        return Err(Error::InvalidFrequencyTable { reason: "symbol/frequency list length mismatch" });
    }
    let mut freqs = vec![0u32; alphabet_size];
    for (&s, &f) in symbols.iter().zip(freq_values.iter()) {
        if s < 0 || s as usize >= alphabet_size || f < 0 {
            return Err(Error::InvalidFrequencyTable { reason: "symbol or frequency out of range" });
        }
        freqs[s as usize] = f as u32;
    }

    let mut len_bytes = [0u8;4];
    src.read_exact(&mut len_bytes).map_err(|_| Error::TruncatedStream { context: "huffman bit length" })?;
    let nbits = u32::from_be_bytes(len_bytes) as usize;
    let nbytes = nbits.div_ceil(8);
    let mut payload = vec![0u8; nbytes];
    src.read_exact(&mut payload).map_err(|_| Error::TruncatedStream { context: "huffman code bits" })?;
    let bits = BitVec::from_bytes(&payload);

    let count: u64 = freqs.iter().map(|&f| f as u64).sum();
    let mut out = Vec::with_capacity(count as usize);
    if count == 0 {
        return Ok(out);
    }
    let (arena, root) = build_tree(&freqs).ok_or(Error::InvalidFrequencyTable { reason: "empty alphabet with nonzero symbol count" })?;
    let mut ptr = 0usize;
    for _ in 0..count {
        let mut idx = root;
        while arena[idx].symbol.is_none() {
            let bit = bits.get(ptr).ok_or(Error::TruncatedStream { context: "huffman code walk" })?;
            ptr += 1;
            idx = if bit { arena[idx].right.unwrap() } else { arena[idx].left.unwrap() };
        }
        out.push(arena[idx].symbol.unwrap());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_bytes() {
        let data: Vec<u32> = b"AAAAB".iter().map(|&b| b as u32).collect();
        let mut buf = Vec::new();
        write_entry(&mut buf, &data, 256).unwrap();
        let mut cur = std::io::Cursor::new(buf);
        let decoded = read_entry(&mut cur, 256).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn single_symbol_alphabet() {
        let data: Vec<u32> = vec![42, 42, 42, 42];
        let mut buf = Vec::new();
        write_entry(&mut buf, &data, 256).unwrap();
        let mut cur = std::io::Cursor::new(buf);
        let decoded = read_entry(&mut cur, 256).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn empty_entry() {
        let data: Vec<u32> = vec![];
        let mut buf = Vec::new();
        write_entry(&mut buf, &data, 256).unwrap();
        let mut cur = std::io::Cursor::new(buf);
        let decoded = read_entry(&mut cur, 256).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn kraft_inequality_holds() {
        let freqs: Vec<u32> = vec![5,1,1,2,3,0,0,7];
        let (arena, root) = build_tree(&freqs).unwrap();
        let table = code_table(&arena, root);
        let mut sum = 0.0f64;
        for entry in table.iter().flatten() {
            sum += 2f64.powi(-(entry.1 as i32));
        }
        assert!(sum <= 1.0 + 1e-9);
    }
}
