//! Boundary times of the segments and the search that maps a time to a segment.

use crate::error::{DdeError, Result};

/// Accepts strictly increasing or strictly decreasing boundaries, or exactly two
/// equal boundaries (integration over a zero-length interval).
pub fn check_monotonic(ts: &[f64]) -> Result<()> {
    let zero_segment = ts.len() == 2 && ts[0] == ts[1];
    let increasing = ts.windows(2).all(|w| w[1] > w[0]);
    let decreasing = ts.windows(2).all(|w| w[1] < w[0]);
    if zero_segment || increasing || decreasing {
        Ok(())
    } else {
        Err(DdeError::NotMonotonic)
    }
}

#[derive(Debug, Clone)]
pub struct SegmentIndex {
    ts: Vec<f64>,
    /// `ts` in increasing order; reversed copy when descending.
    sorted: Vec<f64>,
    ascending: bool,
}

impl SegmentIndex {
    /// `ts` must have passed [`check_monotonic`] and hold at least two boundaries.
    pub fn new(ts: Vec<f64>) -> Self {
        let ascending = ts[ts.len() - 1] >= ts[0];
        let mut sorted = ts.clone();
        if !ascending {
            sorted.reverse();
        }
        Self {
            ts,
            sorted,
            ascending,
        }
    }

    pub fn ts(&self) -> &[f64] {
        &self.ts
    }

    pub fn n_segments(&self) -> usize {
        self.ts.len() - 1
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    pub fn t_min(&self) -> f64 {
        self.sorted[0]
    }

    pub fn t_max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    /// Segment serving time `t`, clamped to the valid range.
    ///
    /// At a boundary shared by two segments the one with the lower index wins,
    /// for both orientations.
    pub fn locate(&self, t: f64) -> usize {
        let ind = if self.ascending {
            self.sorted.partition_point(|&x| x < t)
        } else {
            self.sorted.partition_point(|&x| x <= t)
        };
        let last = self.n_segments() - 1;
        let segment = ind.saturating_sub(1).min(last);
        if self.ascending {
            segment
        } else {
            last - segment
        }
    }

    /// Number of boundaries lying strictly before `t` in traversal order.
    pub fn boundaries_before(&self, t: f64) -> usize {
        if self.ascending {
            self.ts.partition_point(|&x| x < t)
        } else {
            self.ts.partition_point(|&x| x > t)
        }
    }

    /// Keeps the first `len` boundaries (at least two).
    pub fn truncate(&mut self, len: usize) {
        self.ts.truncate(len.max(2));
        *self = Self::new(std::mem::take(&mut self.ts));
    }
}
