/// The smallest supported bucket power.
pub const MIN_BUCKET_POWER: u8 = 1;

/// The largest supported bucket power, so that `2^s` still fits in a `u64`.
pub const MAX_BUCKET_POWER: u8 = 63;

/// Returns the Mersenne modulus `2^s - 1` for the bucket power `s`.
///
/// This is also the number of buckets in a table created with bucket power `s`.
#[inline]
pub const fn modulus(s: u8) -> u64 {
    debug_assert!(s >= MIN_BUCKET_POWER && s <= MAX_BUCKET_POWER);
    (1u64 << s) - 1
}

/// Maps `x` to a bucket in `[0, 2^s - 1)`.
///
/// The result is exactly `x mod (2^s - 1)`, computed without a division.
/// Because `2^s ≡ 1 (mod 2^s - 1)`, the high bits `x >> s` can be folded onto
/// the low bits `x & M` without changing the residue. Each fold strictly shrinks
/// the value, so only a handful are needed even for small `s`, and a value equal
/// to `M` is itself congruent to zero.
///
/// The bucket power must satisfy `1 <= s <= 63`.
///
/// # Examples
///
/// ```
/// use mersenne_table::bucket_index;
///
/// assert_eq!(bucket_index(10, 3), 3);
/// assert_eq!(bucket_index(14, 3), 0);
/// assert_eq!(bucket_index(u64::MAX, 3), u64::MAX % 7);
/// ```
#[inline]
pub const fn bucket_index(x: u64, s: u8) -> u64 {
    let m = modulus(s);
    let mut y = x;

    while y > m {
        y = (y >> s) + (y & m);
    }

    if y == m {
        0
    } else {
        y
    }
}
