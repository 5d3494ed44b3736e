use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

// @module: Partitioning of timed words into display-sized groups

/// Bounds on how many words one subtitle cue shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Preferred minimum words per cue (not enforced for short segments)
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Maximum words per cue
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

fn default_min_words() -> usize {
    4
}

fn default_max_words() -> usize {
    6
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            max_words: default_max_words(),
        }
    }
}

impl GroupingConfig {
    /// Creates validated grouping bounds
    pub fn new(min_words: usize, max_words: usize) -> Result<Self> {
        let config = Self {
            min_words,
            max_words,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_words == 0 {
            return Err(anyhow!("min_words must be at least 1"));
        }
        if self.max_words < self.min_words {
            return Err(anyhow!(
                "max_words ({}) must not be smaller than min_words ({})",
                self.max_words,
                self.min_words
            ));
        }
        Ok(())
    }

    /// Partition `items` using these bounds
    pub fn partition<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        partition(items, self.min_words, self.max_words)
    }
}

/// Split an ordered sequence into contiguous groups of display size.
///
/// Walks forward from the start, looking at the `n` items still unassigned:
/// - `n <= max_size`: the rest becomes the last group.
/// - `n < min_size + max_size`: taking `max_size` would leave fewer than
///   `min_size`, so the rest is halved instead (`ceil(n / 2)` now, the
///   remainder next).
/// - otherwise: take exactly `max_size`.
///
/// Concatenating the returned slices yields `items` unchanged. Fewer than
/// `min_size` items come back as one undersized group, and an empty input
/// produces no groups at all. Bounds are clamped so that `1 <= min_size <=
/// max_size`.
pub fn partition<T>(items: &[T], min_size: usize, max_size: usize) -> Vec<&[T]> {
    let max_size = max_size.max(1);
    let min_size = min_size.clamp(1, max_size);

    let mut groups = Vec::with_capacity(items.len().div_ceil(max_size));
    let mut rest = items;

    while !rest.is_empty() {
        let n = rest.len();
        let take = if n <= max_size {
            n
        } else if n < min_size + max_size {
            n.div_ceil(2)
        } else {
            max_size
        };

        let (group, tail) = rest.split_at(take);
        groups.push(group);
        rest = tail;
    }

    groups
}
