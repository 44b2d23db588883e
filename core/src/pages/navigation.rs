//! Wraparound arithmetic for page indices.

/// Mathematical modulo: always in `[0, n)`, also for negative `a`.
///
/// `n` must be non-zero; callers check for an empty page list first.
pub fn true_mod(a: i64, n: usize) -> usize {
    a.rem_euclid(n as i64) as usize
}

/// Move `amount` pages from `current` (negative moves backwards), wrapping
/// around both ends.
pub fn step(current: usize, amount: i64, count: usize) -> usize {
    // Reduce first so `current + amount` cannot overflow for huge amounts.
    let offset = true_mod(amount, count);
    (current % count + offset) % count
}
