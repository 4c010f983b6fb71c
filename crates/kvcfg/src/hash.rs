//! Identity hash for keys and values
//!
//! Entries are matched by this 32-bit value alone; two strings that share a
//! hash are the same key as far as every lookup is concerned.
//!
//! The seed is the FNV-1 offset basis but the mixing step is not FNV: the
//! accumulator is squared before each byte is folded in.

/// Starting accumulator, also the hash of an absent string
pub const HASH_SEED: u32 = 0x811c_9dc5;

/// Hash a raw byte string
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    bytes.iter().fold(HASH_SEED, |acc, &b| {
        acc.wrapping_mul(acc) ^ u32::from(b)
    })
}

/// Hash an optional string; `None` hashes to [`HASH_SEED`]
pub fn hash(input: Option<&str>) -> u32 {
    match input {
        Some(s) => hash_bytes(s.as_bytes()),
        None => HASH_SEED,
    }
}
