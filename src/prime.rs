//! Prime search used to pick slot counts

/// Returns true if `n` is prime
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    // Every prime above 3 has the form 6k ± 1
    let mut divisor: usize = 5;
    while divisor.checked_mul(divisor).is_some_and(|square| square <= n) {
        if n % divisor == 0 || n % divisor.saturating_add(2) == 0 {
            return false;
        }
        divisor = divisor.saturating_add(6);
    }
    true
}

/// Returns the smallest prime greater than or equal to `candidate`.
///
/// Inputs below 2 yield 2. The result is `None` only when no prime `>= candidate`
/// fits in a `usize`.
#[must_use]
pub fn next_prime(candidate: usize) -> Option<usize> {
    (candidate.max(2)..=usize::MAX).find(|&n| is_prime(n))
}
