//! Interval resolver
//!
//! [`FastaInterval`] turns a requested `(name, start, end)` into a fixed-size encoded
//! window. Resolution runs in a fixed order:
//!
//! 1. optional random coordinate shift, clamped so the shifted interval stays on the sequence
//! 2. symmetric growth (or shrink) to the configured context length, extra base on the right
//! 3. boundary clamp, recording how much padding each side needs
//! 4. fetch, pad with the unknown symbol, encode
//! 5. optional reverse complement on a fair coin
//!
//! Out-of-range coordinates never fail; they produce padded or degenerate windows.
//! Only store lookups (e.g. an unknown sequence name) and requests past
//! [`MAX_COORDINATE`] or [`MAX_PADDING`] return errors.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::iter;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::augment::{maybe_reverse_complement, Augmentation};
use crate::codec::{EncodedSequence, EncodingMode, PADDING_SYMBOL};
use crate::store::{IndexedFastaStore, SequenceStore, StoreError, StoreResult};
use crate::types::GenomicPos;

/// Largest coordinate, shift or context length accepted, well above any real sequence length.
pub const MAX_COORDINATE: i64 = 1 << 40;

/// Most padding symbols a single window may carry.
pub const MAX_PADDING: u64 = 1 << 30;

/// Contradictory construction parameters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid shift range: min shift {min} is greater than max shift {max}")]
    InvalidShiftRange { min: i64, max: i64 },

    #[error("Shift range ({min}, {max}) exceeds the limit of {limit} bases")]
    ShiftRangeTooLarge { min: i64, max: i64, limit: i64 },

    #[error("Context length must be greater than zero")]
    ZeroContextLength,

    #[error("Context length {context_length} exceeds the limit of {limit} bases")]
    ContextLengthTooLarge { context_length: u64, limit: i64 },

    #[error("In-frame sampling requires a context length")]
    SampleInFrameWithoutContext,

    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How windows are sized, augmented and encoded. Fixed for the lifetime of a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingPolicy {
    /// Output window length; `None` keeps each interval's own length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,

    /// Inclusive `(min_shift, max_shift)` for coordinate jitter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_range: Option<(i64, i64)>,

    /// Reverse complement half of the windows at random
    pub reverse_complement: bool,

    pub encoding: EncodingMode,
}

impl EncodingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context_length(mut self, context_length: u64) -> Self {
        self.context_length = Some(context_length);
        self
    }

    pub fn with_shift_range(mut self, min_shift: i64, max_shift: i64) -> Self {
        self.shift_range = Some((min_shift, max_shift));
        self
    }

    pub fn with_reverse_complement(mut self, enabled: bool) -> Self {
        self.reverse_complement = enabled;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingMode) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.context_length {
            Some(0) => return Err(ConfigError::ZeroContextLength),
            Some(context_length) if context_length > MAX_COORDINATE as u64 => {
                return Err(ConfigError::ContextLengthTooLarge {
                    context_length,
                    limit: MAX_COORDINATE,
                })
            }
            _ => {}
        }
        if let Some((min, max)) = self.shift_range {
            if min > max {
                return Err(ConfigError::InvalidShiftRange { min, max });
            }
            if min < -MAX_COORDINATE || max > MAX_COORDINATE {
                return Err(ConfigError::ShiftRangeTooLarge {
                    min,
                    max,
                    limit: MAX_COORDINATE,
                });
            }
        }
        Ok(())
    }
}

/// Fetch window and padding for one request, after context adjustment and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub left_padding: u64,
    pub right_padding: u64,
}

impl WindowPlan {
    /// `[start, end)` saturated into `[0, length]`.
    ///
    /// The reset branches of [`plan_window`] can leave `start` negative or `end` past the
    /// sequence when the sequence is shorter than the context; the store never sees that.
    pub fn fetch_bounds(&self, length: GenomicPos) -> (u64, u64) {
        let length = length.max(0);
        let start = self.start.clamp(0, length);
        let end = self.end.clamp(start, length);
        (start as u64, end as u64)
    }
}

/// Half-open range `[lo, hi)` of shifts allowed for `[start, end)` on a sequence of `length`.
///
/// `lo <= 0 < hi` always holds, so the range is never empty.
pub fn shift_bounds(
    start: GenomicPos,
    end: GenomicPos,
    length: GenomicPos,
    min_shift: i64,
    max_shift: i64,
) -> (i64, i64) {
    let lo = start.saturating_add(min_shift).max(0).saturating_sub(start).min(0);
    let hi = end
        .saturating_add(max_shift)
        .saturating_add(1)
        .min(length)
        .saturating_sub(end)
        .max(1);
    (lo, hi)
}

/// Grow or shrink `[start, end)` to `context_length`, then clamp to `[0, length]`.
///
/// Clamp rules apply in order and later rules override earlier ones:
/// negative start pads left, end past the sequence pads right, a start past the end of
/// the sequence resets to the last `context_length` bases, and a negative end resets to
/// the first `context_length` bases. Without a context length the reset window is the
/// requested interval length.
pub fn plan_window(
    start: GenomicPos,
    end: GenomicPos,
    length: GenomicPos,
    context_length: Option<GenomicPos>,
) -> WindowPlan {
    let interval_length = end - start;
    let mut start = start;
    let mut end = end;

    if let Some(context) = context_length {
        if context != interval_length {
            let extra = context - interval_length;
            let extra_left = extra.div_euclid(2);
            let extra_right = extra - extra_left;
            start -= extra_left;
            end += extra_right;
        }
    }

    let window = context_length.unwrap_or(interval_length);
    let mut left_padding = 0;
    let mut right_padding = 0;

    if start < 0 {
        left_padding = -start;
        start = 0;
    }
    if end > length {
        right_padding = end - length;
        end = length;
    }
    if start > length {
        start = length - window;
        end = length;
        left_padding = 0;
        right_padding = 0;
    }
    if end < 0 {
        start = 0;
        end = window;
        left_padding = 0;
        right_padding = 0;
    }

    WindowPlan {
        start,
        end,
        left_padding: left_padding as u64,
        right_padding: right_padding as u64,
    }
}

/// An encoded window and, when requested, the augmentation applied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSequence {
    pub encoded: EncodedSequence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub augmentation: Option<Augmentation>,
}

impl ResolvedSequence {
    pub fn into_parts(self) -> (EncodedSequence, Option<Augmentation>) {
        (self.encoded, self.augmentation)
    }
}

/// Resolves intervals against a sequence store under a fixed [`EncodingPolicy`].
pub struct FastaInterval<S> {
    store: S,
    policy: EncodingPolicy,
}

impl FastaInterval<IndexedFastaStore> {
    /// Open a FASTA file, reusing `<path>.fai` when present.
    pub fn open<P: AsRef<Path>>(path: P, policy: EncodingPolicy) -> Result<Self, ResolverError> {
        policy.validate()?;
        let store = IndexedFastaStore::open(path)?;
        Ok(Self { store, policy })
    }
}

impl<S: SequenceStore> FastaInterval<S> {
    pub fn new(store: S, policy: EncodingPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self { store, policy })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &EncodingPolicy {
        &self.policy
    }

    pub fn context_length(&self) -> Option<GenomicPos> {
        self.policy
            .context_length
            .and_then(|c| GenomicPos::try_from(c).ok())
    }

    /// Resolve `[start, end)` on `name` into an encoded window.
    ///
    /// With `return_augs` the result carries the realized shift (0 without a shift policy)
    /// and whether the window was reverse complemented. Coordinates beyond
    /// [`MAX_COORDINATE`] and windows needing more than [`MAX_PADDING`] padding symbols
    /// fail with [`StoreError::WindowTooLarge`].
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        name: &str,
        start: GenomicPos,
        end: GenomicPos,
        return_augs: bool,
    ) -> StoreResult<ResolvedSequence> {
        let too_large = || StoreError::WindowTooLarge {
            name: name.to_string(),
            start,
            end,
        };
        let limit = MAX_COORDINATE as u64;
        if start.unsigned_abs() > limit || end.unsigned_abs() > limit {
            return Err(too_large());
        }
        let length = self.store.length(name)? as GenomicPos;

        let shift = match self.policy.shift_range {
            Some((min_shift, max_shift)) => {
                let (lo, hi) = shift_bounds(start, end, length, min_shift, max_shift);
                rng.gen_range(lo..hi)
            }
            None => 0,
        };

        let plan = plan_window(start + shift, end + shift, length, self.context_length());
        let padding = plan.left_padding + plan.right_padding;
        if padding > MAX_PADDING {
            return Err(too_large());
        }
        let (fetch_start, fetch_end) = plan.fetch_bounds(length);
        let bases = self.store.fetch(name, fetch_start, fetch_end)?;

        let mut window = Vec::with_capacity(bases.len() + padding as usize);
        window.extend(iter::repeat(PADDING_SYMBOL).take(plan.left_padding as usize));
        window.extend_from_slice(&bases);
        window.extend(iter::repeat(PADDING_SYMBOL).take(plan.right_padding as usize));

        let encoded = EncodedSequence::encode(&window, self.policy.encoding);
        let (encoded, reverse_complemented) =
            maybe_reverse_complement(rng, self.policy.reverse_complement, encoded);

        log::trace!(
            "{}:{}-{} -> fetch {}-{} pad {}+{} shift {} rc {}",
            name,
            start,
            end,
            fetch_start,
            fetch_end,
            plan.left_padding,
            plan.right_padding,
            shift,
            reverse_complemented
        );

        Ok(ResolvedSequence {
            encoded,
            augmentation: return_augs.then_some(Augmentation {
                shift,
                reverse_complemented,
            }),
        })
    }
}
