//! Stage seed editing

/// Seed after typing `digit`.
///
/// Below `threshold` the digit is appended (`10 * seed + digit`); at or above
/// it the digit starts a new seed, so a long number can be typed one key at a
/// time and then typed over.
pub fn next_seed_from_digit(seed: u64, digit: u8, threshold: u64) -> u64 {
    let digit = u64::from(digit.min(9));
    if seed < threshold {
        seed.saturating_mul(10).saturating_add(digit)
    } else {
        digit
    }
}
