//! Polynomial string hashing and the double hashing probe sequence

/// Multiplier of the primary hash
pub const PRIMARY_PRIME: u64 = 151;
/// Multiplier of the secondary hash; must differ from [`PRIMARY_PRIME`]
pub const SECONDARY_PRIME: u64 = 163;

/// Hashes `key` as a polynomial in `prime` evaluated modulo `modulus`.
///
/// Computes `sum(prime^(n - 1 - i) * key[i]) mod modulus` in Horner form, reducing at
/// every step so intermediates stay bounded. `prime` should exceed the alphabet size
/// (128 for ASCII). A zero `modulus` yields 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
pub fn polynomial_hash(key: &[u8], prime: u64, modulus: usize) -> usize {
    if modulus == 0 {
        return 0;
    }
    let modulus = modulus as u128;
    let prime = u128::from(prime);
    let hash = key
        .iter()
        .fold(0_u128, |hash, &byte| (hash * prime + u128::from(byte)) % modulus);
    // hash < modulus, which came from a usize
    hash as usize
}

/// The double hashing walk over a table of `capacity` slots for one key.
///
/// Attempt `i` lands on `(h1 + i * step) mod capacity` where `h1` is the primary hash and
/// `step` is one more than the secondary hash. The secondary hash is reduced modulo
/// `capacity - 1`, so `step` is in `1..capacity` and, with a prime capacity, the walk
/// visits every slot exactly once before it ends.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    /// Slot of attempt 0
    start: usize,
    /// Distance between consecutive attempts
    step: usize,
    /// Number of slots in the table
    capacity: usize,
    /// Next attempt number to yield
    attempt: usize,
}

impl ProbeSequence {
    /// Starts the walk for `key` in a table of `capacity` slots
    #[must_use]
    pub fn new(key: &[u8], capacity: usize) -> Self {
        let start = polynomial_hash(key, PRIMARY_PRIME, capacity);
        let secondary = polynomial_hash(key, SECONDARY_PRIME, capacity.saturating_sub(1).max(1));
        Self { start, step: secondary.saturating_add(1), capacity, attempt: 0 }
    }

    /// Slot visited on the given attempt
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    pub fn slot(&self, attempt: usize) -> usize {
        if self.capacity == 0 {
            return 0;
        }
        let capacity = self.capacity as u128;
        let offset = (attempt as u128 % capacity) * (self.step as u128 % capacity);
        ((self.start as u128 + offset) % capacity) as usize
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.attempt >= self.capacity {
            return None;
        }
        let slot = self.slot(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity.saturating_sub(self.attempt);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

/// Slot visited by `key` on `attempt` in a table of `capacity` slots
#[must_use]
pub fn probe(key: &[u8], capacity: usize, attempt: usize) -> usize {
    ProbeSequence::new(key, capacity).slot(attempt)
}
