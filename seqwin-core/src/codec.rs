//! Symbol codec
//!
//! Byte-level lookup tables turning nucleotide text into either categorical
//! indices (`A=0 C=1 G=2 T=3`, unknown `=4`) or 4-channel probability vectors.
//! Every byte has an encoding, so masked or malformed reference characters
//! never fail; they become the unknown symbol.

use serde::{Deserialize, Serialize};

/// Categorical index of the unknown symbol (`N`, `.`, and any unrecognized byte).
pub const UNKNOWN_INDEX: u8 = 4;

/// Character written into padding positions before encoding.
pub const PADDING_SYMBOL: u8 = b'.';

/// Probability vector of the unknown symbol.
pub const UNKNOWN_ONE_HOT: [f32; 4] = [0.25, 0.25, 0.25, 0.25];

/// Probability vector of `N`. Kept distinct from [`UNKNOWN_ONE_HOT`].
pub const N_ONE_HOT: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Complement of each categorical index: A<->T, C<->G, unknown stays unknown.
const COMPLEMENT_INDEX: [u8; 5] = [3, 2, 1, 0, 4];

const DECODE: [u8; 5] = *b"ACGTN";

const fn build_index_table() -> [u8; 256] {
    let mut table = [UNKNOWN_INDEX; 256];
    table[b'a' as usize] = 0;
    table[b'c' as usize] = 1;
    table[b'g' as usize] = 2;
    table[b't' as usize] = 3;
    table[b'A' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'T' as usize] = 3;
    table
}

const fn build_one_hot_table() -> [[f32; 4]; 256] {
    let mut table = [UNKNOWN_ONE_HOT; 256];
    table[b'a' as usize] = [1.0, 0.0, 0.0, 0.0];
    table[b'c' as usize] = [0.0, 1.0, 0.0, 0.0];
    table[b'g' as usize] = [0.0, 0.0, 1.0, 0.0];
    table[b't' as usize] = [0.0, 0.0, 0.0, 1.0];
    table[b'n' as usize] = N_ONE_HOT;
    table[b'A' as usize] = [1.0, 0.0, 0.0, 0.0];
    table[b'C' as usize] = [0.0, 1.0, 0.0, 0.0];
    table[b'G' as usize] = [0.0, 0.0, 1.0, 0.0];
    table[b'T' as usize] = [0.0, 0.0, 0.0, 1.0];
    table[b'N' as usize] = N_ONE_HOT;
    table
}

static INDEX_TABLE: [u8; 256] = build_index_table();
static ONE_HOT_TABLE: [[f32; 4]; 256] = build_one_hot_table();

/// Output representation of an encoded window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// One categorical index per position (symbol dimension 1)
    Index,
    /// One 4-channel probability vector per position (symbol dimension 4)
    #[default]
    OneHot,
}

impl EncodingMode {
    pub fn symbol_dim(&self) -> usize {
        match self {
            EncodingMode::Index => 1,
            EncodingMode::OneHot => 4,
        }
    }
}

/// An encoded sequence window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodedSequence {
    Indices(Vec<u8>),
    OneHot(Vec<[f32; 4]>),
}

impl EncodedSequence {
    pub fn encode(sequence: &[u8], mode: EncodingMode) -> Self {
        match mode {
            EncodingMode::Index => EncodedSequence::Indices(encode_indices(sequence)),
            EncodingMode::OneHot => EncodedSequence::OneHot(encode_one_hot(sequence)),
        }
    }

    pub fn mode(&self) -> EncodingMode {
        match self {
            EncodedSequence::Indices(_) => EncodingMode::Index,
            EncodedSequence::OneHot(_) => EncodingMode::OneHot,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EncodedSequence::Indices(v) => v.len(),
            EncodedSequence::OneHot(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `[length, symbol_dim]`
    pub fn shape(&self) -> [usize; 2] {
        [self.len(), self.mode().symbol_dim()]
    }

    pub fn as_indices(&self) -> Option<&[u8]> {
        match self {
            EncodedSequence::Indices(v) => Some(v),
            EncodedSequence::OneHot(_) => None,
        }
    }

    pub fn as_one_hot(&self) -> Option<&[[f32; 4]]> {
        match self {
            EncodedSequence::OneHot(v) => Some(v),
            EncodedSequence::Indices(_) => None,
        }
    }
}

pub fn encode_indices(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().map(|&b| INDEX_TABLE[b as usize]).collect()
}

pub fn encode_one_hot(sequence: &[u8]) -> Vec<[f32; 4]> {
    sequence.iter().map(|&b| ONE_HOT_TABLE[b as usize]).collect()
}

/// Complement every index and reverse the order. Indices above 4 are treated as unknown.
pub fn reverse_complement_indices(indices: &[u8]) -> Vec<u8> {
    indices
        .iter()
        .rev()
        .map(|&i| {
            COMPLEMENT_INDEX
                .get(i as usize)
                .copied()
                .unwrap_or(UNKNOWN_INDEX)
        })
        .collect()
}

/// Reverse both the channel axis and the sequence axis.
///
/// Channels are ordered A, C, G, T, so reversing them is the same permutation
/// as [`reverse_complement_indices`] applies.
pub fn reverse_complement_one_hot(one_hot: &[[f32; 4]]) -> Vec<[f32; 4]> {
    one_hot
        .iter()
        .rev()
        .map(|&[a, c, g, t]| [t, g, c, a])
        .collect()
}

/// Expand signed indices into probability vectors.
///
/// Positions equal to `padding` become [`UNKNOWN_ONE_HOT`]; negative values clamp to 0;
/// index 4 and above have no channel and become all zeros.
pub fn indices_to_one_hot(indices: &[i64], padding: i64) -> Vec<[f32; 4]> {
    indices
        .iter()
        .map(|&i| {
            if i == padding {
                return UNKNOWN_ONE_HOT;
            }
            let mut vector = [0.0; 4];
            let i = i.max(0) as usize;
            if i < 4 {
                vector[i] = 1.0;
            }
            vector
        })
        .collect()
}

/// Render indices back to text (`ACGTN`), mainly for display.
pub fn decode_indices(indices: &[u8]) -> String {
    indices
        .iter()
        .map(|&i| DECODE.get(i as usize).copied().unwrap_or(b'N') as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_index_table() {
        assert_eq!(encode_indices(b"acgtn"), vec![0, 1, 2, 3, 4]);
        assert_eq!(encode_indices(b"ACGTN"), vec![0, 1, 2, 3, 4]);
        assert_eq!(encode_indices(b"."), vec![4]);
        assert_eq!(encode_indices(b"RYX-*\0\xff"), vec![4; 7]);
    }

    #[test]
    fn test_one_hot_table() {
        let encoded = encode_one_hot(b"AcGt");
        assert_eq!(encoded[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(encoded[1], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(encoded[2], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(encoded[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(encode_one_hot(b"R"), vec![UNKNOWN_ONE_HOT]);
    }

    #[test]
    fn test_n_and_dot_differ_in_one_hot() {
        // Same categorical index, different probability vectors
        assert_eq!(encode_indices(b"N"), encode_indices(b"."));
        assert_eq!(encode_one_hot(b"N"), vec![[0.0; 4]]);
        assert_eq!(encode_one_hot(b"n"), vec![[0.0; 4]]);
        assert_eq!(encode_one_hot(b"."), vec![[0.25; 4]]);
        assert_ne!(encode_one_hot(b"N"), encode_one_hot(b"."));
    }

    #[test]
    fn test_reverse_complement_indices() {
        // ACGTN -> NACGT
        let indices = encode_indices(b"ACGTN");
        assert_eq!(reverse_complement_indices(&indices), vec![4, 0, 1, 2, 3]);

        let indices = encode_indices(b"AAC");
        assert_eq!(decode_indices(&reverse_complement_indices(&indices)), "GTT");

        assert_eq!(reverse_complement_indices(&[9]), vec![UNKNOWN_INDEX]);
        assert!(reverse_complement_indices(&[]).is_empty());
    }

    #[test]
    fn test_reverse_complement_one_hot_matches_indices() {
        let sequence = b"ACCGTTA";
        let via_indices = encode_one_hot(
            decode_indices(&reverse_complement_indices(&encode_indices(sequence))).as_bytes(),
        );
        let via_one_hot = reverse_complement_one_hot(&encode_one_hot(sequence));
        assert_eq!(via_indices, via_one_hot);
    }

    #[test]
    fn test_indices_to_one_hot() {
        let one_hot = indices_to_one_hot(&[0, 3, -1, 4], -1);
        assert_eq!(one_hot[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(one_hot[1], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(one_hot[2], UNKNOWN_ONE_HOT);
        assert_eq!(one_hot[3], [0.0; 4]);
    }

    #[test]
    fn test_encoded_sequence_shape() {
        let indices = EncodedSequence::encode(b"ACGT", EncodingMode::Index);
        assert_eq!(indices.shape(), [4, 1]);
        assert!(indices.as_one_hot().is_none());

        let one_hot = EncodedSequence::encode(b"ACGT", EncodingMode::OneHot);
        assert_eq!(one_hot.shape(), [4, 4]);
        assert_eq!(one_hot.mode(), EncodingMode::OneHot);
        assert!(EncodedSequence::encode(b"", EncodingMode::Index).is_empty());
    }

    proptest! {
        #[test]
        fn prop_index_reverse_complement_is_involution(seq in proptest::collection::vec(any::<u8>(), 0..200)) {
            let indices = encode_indices(&seq);
            let twice = reverse_complement_indices(&reverse_complement_indices(&indices));
            prop_assert_eq!(twice, indices);
        }

        #[test]
        fn prop_one_hot_reverse_complement_is_involution(seq in proptest::collection::vec(any::<u8>(), 0..200)) {
            let one_hot = encode_one_hot(&seq);
            let twice = reverse_complement_one_hot(&reverse_complement_one_hot(&one_hot));
            prop_assert_eq!(twice, one_hot);
        }
    }
}
