//! Per-container tuning constants, collected in one place per format.

pub struct LzParams {
    pub min_len: usize,
    pub max_len: usize,
    pub max_dist: usize,
    pub max_chain_len: usize,
}

pub const LZB_CHUNK_SIZE: usize = 1 << 17;
pub const LZB_MAGIC: [u8;4] = *b"LZB\x01";
pub const LZB_MIN_LEN: usize = 4;
pub const LZB_PARAMS: LzParams = LzParams { min_len: LZB_MIN_LEN, max_len: 0xffff + LZB_MIN_LEN, max_dist: 0xffff, max_chain_len: 128 };

pub const LZA_CHUNK_SIZE: usize = 1 << 16;
pub const LZA_MAGIC: [u8;4] = *b"LZA\x01";
pub const LZA_PARAMS: LzParams = LzParams { min_len: 4, max_len: 0xffff, max_dist: 0xffff, max_chain_len: 128 };

pub const RLH_CHUNK_SIZE: usize = 1 << 16;
pub const RLH_MAGIC: [u8;4] = *b"RLH\x01";
pub const RLH_MAX_EXTRA: u8 = 255;

pub const BWLZHD_CHUNK_SIZE: usize = 1 << 17;
/// Magic is uppercase(format-name) + version byte; "BWLZHD" and "BWLZ3"
/// don't fit a 4-byte magic verbatim, so both are abbreviated to a unique
/// 3-letter tag (`BWH`, `BW3`) before the version byte, same spirit as the
/// other five formats' already-short names.
pub const BWLZHD_MAGIC: [u8;4] = *b"BWH\x01";
pub const BWLZHD_MAX_EXTRA: u8 = 255;
pub const BWLZHD_PARAMS: LzParams = LzParams { min_len: 3, max_len: 258, max_dist: 32768, max_chain_len: 64 };
/// Strict `>` against this threshold selects the compressed branch.
pub const RANDOM_DATA_THRESHOLD: f64 = 1.0;

pub const BWLZ3_CHUNK_SIZE: usize = 1 << 15;
pub const BWLZ3_MAGIC: [u8;4] = *b"BW3\x01";
pub const BWLZ3_MAX_EXTRA: u8 = 255;
pub const BWLZ3_PRE_PASS_MIN_LEN: usize = 512;
pub const BWLZ3_PRE_PASS_PARAMS: LzParams = LzParams { min_len: BWLZ3_PRE_PASS_MIN_LEN, max_len: 0xffff + BWLZ3_PRE_PASS_MIN_LEN, max_dist: 0xffff, max_chain_len: 32 };
pub const BWLZ3_SYMBOLIC_PARAMS: LzParams = LzParams { min_len: 3, max_len: 2048, max_dist: 1 << 20, max_chain_len: 64 };

pub const MRA_CHUNK_SIZE: usize = 1 << 16;
pub const MRA_MAGIC: [u8;4] = *b"MRA\x03";
pub const MRA_MAX_EXTRA: u8 = 254;
