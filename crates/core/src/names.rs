//! Bounded-length names for objects derived from a managed resource.
//!
//! Identifiers that already fit are returned untouched. Longer ones are cut and suffixed
//! with a base-36 FNV-1 hash of the full input, so near-duplicate prefixes stay apart.

use std::borrow::Cow;

/// Smallest `max_len` a caller may pass to [`shorten_id`].
pub const MIN_MAX_LEN: usize = 16;

/// Prefix plus hash budget of a shortened name, independent of the caller's `max_len`.
pub const SHORTENED_PREFIX_BUDGET: usize = 62;

const FNV64_OFFSET: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x100000001b3;

/// 64-bit FNV-1 (multiply, then xor).
pub fn fnv1_64(bytes: &[u8]) -> u64 {
    let mut h = FNV64_OFFSET;
    for b in bytes {
        h = h.wrapping_mul(FNV64_PRIME);
        h ^= *b as u64;
    }
    h
}

/// Lowercase base-36 rendering without padding.
pub fn to_base36(mut v: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    // u64::MAX needs 13 digits
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = DIGITS[(v % 36) as usize];
        v /= 36;
        if v == 0 {
            break;
        }
    }
    buf[i..].iter().map(|&b| b as char).collect()
}

/// Shorten `id` if it is longer than `max_len` bytes.
///
/// The long branch always cuts at `62 - hash_len`, not at `max_len`, so every shortened
/// name is at most 76 bytes whatever bound the caller passed.
///
/// # Panics
/// If `max_len < 16`; that is a caller bug, not a runtime condition.
pub fn shorten_id(id: &str, max_len: usize) -> Cow<'_, str> {
    assert!(max_len >= MIN_MAX_LEN, "max_len < {} for shorten_id", MIN_MAX_LEN);
    if id.len() <= max_len {
        return Cow::Borrowed(id);
    }

    let hash = to_base36(fnv1_64(id.as_bytes()));
    let mut cut = SHORTENED_PREFIX_BUDGET.saturating_sub(hash.len()).min(id.len());
    while !id.is_char_boundary(cut) {
        cut -= 1;
    }
    Cow::Owned(format!("{}-{}", &id[..cut], hash))
}
