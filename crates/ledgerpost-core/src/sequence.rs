//! Sequence number arithmetic.
//!
//! A multiplicative linear-congruential generator (Park-Miller "minstd"):
//! `next(x) = (multiplier * x) mod modulus`. With a prime modulus and a
//! primitive-root multiplier, every value in `[1, modulus - 1]` is visited
//! exactly once before the generator returns to its seed.
//!
//! Persistence of the last value lives in `ledgerpost-store`.

use crate::error::SequenceError;
use crate::types::SequenceNumber;

pub const MINSTD_MULTIPLIER: u64 = 48271;
pub const MINSTD_MODULUS: u64 = (1 << 31) - 1;
pub const MINSTD_SEED: u64 = 36226479;

/// Generator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minstd {
    multiplier: u64,
    modulus: u64,
    seed: u64,
}

impl Default for Minstd {
    fn default() -> Self {
        Self {
            multiplier: MINSTD_MULTIPLIER,
            modulus: MINSTD_MODULUS,
            seed: MINSTD_SEED,
        }
    }
}

impl Minstd {
    /// Generator with custom parameters.
    ///
    /// `modulus` should be prime and `multiplier` a primitive root of it,
    /// otherwise the period is shorter than `modulus - 1`. `seed` must lie in
    /// `[1, modulus - 1]`.
    pub fn with_params(multiplier: u64, modulus: u64, seed: u64) -> Result<Self, SequenceError> {
        let gen = Self {
            multiplier,
            modulus,
            seed,
        };
        gen.check_range(seed)?;
        Ok(gen)
    }

    pub fn seed(&self) -> SequenceNumber {
        SequenceNumber(self.seed)
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Advance from `state`.
    ///
    /// Fails with [`SequenceError::Exhausted`] when the result is the seed
    /// again, and with [`SequenceError::OutOfRange`] when `state` could not
    /// have come from this generator.
    pub fn next(&self, state: SequenceNumber) -> Result<SequenceNumber, SequenceError> {
        self.check_range(state.value())?;
        let product = (self.multiplier as u128) * (state.value() as u128);
        let value = (product % self.modulus as u128) as u64;
        if value == self.seed {
            return Err(SequenceError::Exhausted { seed: self.seed });
        }
        Ok(SequenceNumber(value))
    }

    fn check_range(&self, state: u64) -> Result<(), SequenceError> {
        let max = self.modulus.saturating_sub(1);
        if state == 0 || state > max {
            return Err(SequenceError::OutOfRange { state, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_values() {
        let gen = Minstd::default();
        let first = gen.next(gen.seed()).unwrap();
        assert_eq!(first, SequenceNumber(636679151));
        let second = gen.next(first).unwrap();
        assert_eq!(second, SequenceNumber(500825704));
    }

    #[test]
    fn test_zero_state_out_of_range() {
        let gen = Minstd::default();
        assert_eq!(
            gen.next(SequenceNumber(0)),
            Err(SequenceError::OutOfRange {
                state: 0,
                max: MINSTD_MODULUS - 1
            })
        );
        assert!(gen.next(SequenceNumber(MINSTD_MODULUS)).is_err());
    }

    #[test]
    fn test_bad_seed_rejected() {
        assert!(Minstd::with_params(3, 7, 0).is_err());
        assert!(Minstd::with_params(3, 7, 7).is_err());
        assert!(Minstd::with_params(3, 7, 6).is_ok());
    }

    fn full_period(gen: Minstd) -> Vec<SequenceNumber> {
        let mut values = vec![gen.seed()];
        let mut state = gen.seed();
        loop {
            match gen.next(state) {
                Ok(next) => {
                    values.push(next);
                    state = next;
                }
                Err(SequenceError::Exhausted { .. }) => break,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        values
    }

    #[test]
    fn test_reduced_modulus_full_period() {
        // 3 is a primitive root of 31.
        let gen = Minstd::with_params(3, 31, 17).unwrap();
        let values = full_period(gen);
        assert_eq!(values.len(), 30);
        let unique: HashSet<_> = values.iter().collect();
        assert_eq!(unique.len(), 30);
        for v in &values {
            assert!((1..31).contains(&v.value()));
        }
    }

    #[test]
    fn test_small_modulus_exhausts_at_seed() {
        // 3 is a primitive root of 7: 1, 3, 2, 6, 4, 5, then back to 1.
        let gen = Minstd::with_params(3, 7, 1).unwrap();
        assert_eq!(
            full_period(gen),
            [1, 3, 2, 6, 4, 5].map(SequenceNumber).to_vec()
        );
        assert_eq!(
            gen.next(SequenceNumber(5)),
            Err(SequenceError::Exhausted { seed: 1 })
        );
    }

    #[test]
    #[ignore = "walks all 2^31 - 2 values"]
    fn test_standard_full_period() {
        let gen = Minstd::default();
        let mut state = gen.seed();
        let mut count = 1u64;
        while let Ok(next) = gen.next(state) {
            state = next;
            count += 1;
        }
        assert_eq!(count, MINSTD_MODULUS - 1);
    }
}
