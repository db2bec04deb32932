//! Orientation augmentation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::codec::{reverse_complement_indices, reverse_complement_one_hot, EncodedSequence};

/// Randomization choices made while resolving one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Augmentation {
    /// Coordinate shift applied before padding; 0 without a shift policy
    pub shift: i64,
    pub reverse_complemented: bool,
}

/// Fair coin.
pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen::<f64>() > 0.5
}

/// Reverse complement in whichever encoding the sequence is in.
pub fn reverse_complement(sequence: &EncodedSequence) -> EncodedSequence {
    match sequence {
        EncodedSequence::Indices(v) => EncodedSequence::Indices(reverse_complement_indices(v)),
        EncodedSequence::OneHot(v) => EncodedSequence::OneHot(reverse_complement_one_hot(v)),
    }
}

/// Flip a coin when `enabled` and reverse complement on heads.
///
/// The coin is only drawn when enabled, so a disabled policy consumes no randomness.
pub fn maybe_reverse_complement<R: Rng + ?Sized>(
    rng: &mut R,
    enabled: bool,
    sequence: EncodedSequence,
) -> (EncodedSequence, bool) {
    if enabled && coin_flip(rng) {
        (reverse_complement(&sequence), true)
    } else {
        (sequence, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{EncodingMode, UNKNOWN_INDEX};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reverse_complement_dispatch() {
        let indices = EncodedSequence::encode(b"AAGN", EncodingMode::Index);
        assert_eq!(
            reverse_complement(&indices),
            EncodedSequence::Indices(vec![UNKNOWN_INDEX, 1, 3, 3])
        );

        let one_hot = EncodedSequence::encode(b"AC", EncodingMode::OneHot);
        assert_eq!(
            reverse_complement(&one_hot),
            EncodedSequence::encode(b"GT", EncodingMode::OneHot)
        );
    }

    #[test]
    fn test_coin_flip_is_roughly_fair() {
        let mut rng = StdRng::seed_from_u64(7);
        let heads = (0..10_000).filter(|_| coin_flip(&mut rng)).count();
        assert!(heads > 4_500 && heads < 5_500, "heads = {}", heads);
    }

    #[test]
    fn test_disabled_policy_never_flips() {
        let mut rng = StdRng::seed_from_u64(1);
        let sequence = EncodedSequence::encode(b"ACGT", EncodingMode::Index);
        for _ in 0..100 {
            let (out, flipped) = maybe_reverse_complement(&mut rng, false, sequence.clone());
            assert!(!flipped);
            assert_eq!(out, sequence);
        }
    }

    #[test]
    fn test_enabled_policy_reports_orientation() {
        let mut rng = StdRng::seed_from_u64(3);
        let sequence = EncodedSequence::encode(b"AACG", EncodingMode::Index);
        let mut seen = [false, false];
        for _ in 0..100 {
            let (out, flipped) = maybe_reverse_complement(&mut rng, true, sequence.clone());
            if flipped {
                assert_eq!(out, reverse_complement(&sequence));
            } else {
                assert_eq!(out, sequence);
            }
            seen[flipped as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }
}
