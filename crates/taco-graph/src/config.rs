#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest gap size the classifier knows how to represent.
pub const MAX_GAP: u8 = 7;

/// Tuning knobs for [`crate::TacoGraph`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TacoConfig {
    /// Merge new edges into existing ones. When off every edge is stored as-is.
    pub compression: bool,

    /// Only compress along columns (vertical growth); disables gap patterns.
    pub in_row_only: bool,

    /// Try strided gap patterns when no plain merge applies.
    pub gap_compression: bool,

    /// Largest gap tried, clamped to [`MAX_GAP`].
    pub max_gap: u8,

    /// Batches above this size skip the partition search and fall back to
    /// one `add` per edge. The search is exponential in the batch size.
    pub max_batch_size: usize,
}

impl Default for TacoConfig {
    fn default() -> Self {
        Self {
            compression: true,
            in_row_only: false,
            gap_compression: true,
            max_gap: MAX_GAP,
            max_batch_size: 8,
        }
    }
}

impl TacoConfig {
    /// Store one edge per insertion; the reference behaviour for soundness checks.
    pub fn uncompressed() -> Self {
        Self {
            compression: false,
            ..Self::default()
        }
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    pub fn with_in_row_only(mut self, enabled: bool) -> Self {
        self.in_row_only = enabled;
        self
    }

    pub fn with_gap_compression(mut self, enabled: bool) -> Self {
        self.gap_compression = enabled;
        self
    }

    pub fn with_max_gap(mut self, max_gap: u8) -> Self {
        self.max_gap = max_gap.min(MAX_GAP);
        self
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Gap sizes the classifier should try, in order.
    pub(crate) fn gap_sizes(&self) -> std::ops::RangeInclusive<u8> {
        let hi = if self.gap_compression && !self.in_row_only {
            self.max_gap.min(MAX_GAP)
        } else {
            0
        };
        1..=hi
    }
}
