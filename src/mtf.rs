//! Move-to-Front transform.
//!
//! The alphabet is supplied explicitly (callers default to `0..=255` unless a
//! smaller alphabet was negotiated, e.g. BWLZ3's post-BWT alphabet).
//! Each symbol is replaced by its current position in the alphabet vector,
//! then promoted to the front.

/// Encode bytes against an explicit alphabet (which must contain every
/// distinct byte value appearing in `data`).
pub fn encode(data: &[u8], alphabet: &[u8]) -> Vec<u8> {
    let mut a = alphabet.to_vec();
    let mut out = Vec::with_capacity(data.len());
    for &s in data {
        let pos = a.iter().position(|&x| x == s).expect("symbol present in alphabet");
        out.push(pos as u8);
        a.remove(pos);
        a.insert(0, s);
    }
    out
}

/// Inverse of [`encode`] with the same initial alphabet.
pub fn decode(indices: &[u8], alphabet: &[u8]) -> Vec<u8> {
    let mut a = alphabet.to_vec();
    let mut out = Vec::with_capacity(indices.len());
    for &idx in indices {
        let s = a[idx as usize];
        out.push(s);
        a.remove(idx as usize);
        a.insert(0, s);
    }
    out
}

/// Symbolic variant over an arbitrary nonnegative-integer alphabet, used by
/// BWLZ3 once the working alphabet is the set of post-BWT symbol values
/// rather than plain bytes.
pub fn encode_symbolic(data: &[u32], alphabet: &[u32]) -> Vec<u32> {
    let mut a = alphabet.to_vec();
    let mut out = Vec::with_capacity(data.len());
    for &s in data {
        let pos = a.iter().position(|&x| x == s).expect("symbol present in alphabet");
        out.push(pos as u32);
        a.remove(pos);
        a.insert(0, s);
    }
    out
}

pub fn decode_symbolic(indices: &[u32], alphabet: &[u32]) -> Vec<u32> {
    let mut a = alphabet.to_vec();
    let mut out = Vec::with_capacity(indices.len());
    for &idx in indices {
        let s = a[idx as usize];
        out.push(s);
        a.remove(idx as usize);
        a.insert(0, s);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_alphabet() -> Vec<u8> {
        (0..=255u8).collect()
    }

    #[test]
    fn roundtrip_default_alphabet() {
        let data = b"banana bandana".to_vec();
        let alphabet = default_alphabet();
        let encoded = encode(&data, &alphabet);
        assert_eq!(decode(&encoded, &alphabet), data);
    }

    #[test]
    fn empty_input() {
        let alphabet = default_alphabet();
        assert_eq!(encode(&[], &alphabet), Vec::<u8>::new());
        assert_eq!(decode(&[], &alphabet), Vec::<u8>::new());
    }

    #[test]
    fn restricted_alphabet() {
        let alphabet = vec![b'a', b'b', b'c'];
        let data = b"abcabcaaa".to_vec();
        let encoded = encode(&data, &alphabet);
        assert_eq!(decode(&encoded, &alphabet), data);
    }

    #[test]
    fn symbolic_roundtrip() {
        let alphabet = vec![10u32, 20, 30];
        let data = vec![10u32, 30, 20, 10, 10];
        let encoded = encode_symbolic(&data, &alphabet);
        assert_eq!(decode_symbolic(&encoded, &alphabet), data);
    }
}
