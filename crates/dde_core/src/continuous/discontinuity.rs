//! Jumps in the solution, encoded as repeated boundary times.
//!
//! When two adjacent boundaries are closer than the duplicate tolerance, the
//! second one marks a jump: its state value is the value right after the jump.
//! The repeated entry is removed from the boundaries used for segment search
//! and kept here instead.

use crate::error::{DdeError, Result};
use nalgebra::DVector;

#[derive(Debug, Clone, Default)]
pub struct DiscontinuityTable {
    times: Vec<f64>,
    values: Vec<DVector<f64>>,
    tolerance: f64,
}

impl DiscontinuityTable {
    /// Splits repeated boundaries out of `ts`/`ys`.
    ///
    /// Returns the table together with the filtered boundaries and states. A
    /// two-point sequence is left untouched since it describes a zero-length
    /// segment, not a jump.
    pub fn extract(
        ts: Vec<f64>,
        ys: Vec<DVector<f64>>,
        tolerance: f64,
    ) -> (Self, Vec<f64>, Vec<DVector<f64>>) {
        let mut table = Self {
            times: Vec::new(),
            values: Vec::new(),
            tolerance,
        };
        if ts.len() <= 2 {
            return (table, ts, ys);
        }

        let repeated: Vec<bool> = std::iter::once(false)
            .chain(ts.windows(2).map(|w| (w[1] - w[0]).abs() < tolerance))
            .collect();
        if !repeated.iter().any(|&r| r) {
            return (table, ts, ys);
        }

        let mut kept_ts = Vec::with_capacity(ts.len());
        let mut kept_ys = Vec::with_capacity(ys.len());
        for ((t, y), is_repeat) in ts.into_iter().zip(ys).zip(repeated) {
            if is_repeat {
                table.times.push(t);
                table.values.push(y);
            } else {
                kept_ts.push(t);
                kept_ys.push(y);
            }
        }
        (table, kept_ts, kept_ys)
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &DVector<f64>)> {
        self.times.iter().copied().zip(self.values.iter())
    }

    /// Post-jump value if `t` coincides with a recorded jump.
    ///
    /// Ascending solutions resolve to the first matching entry, descending ones to
    /// the last, the same lower-segment-first rule the segment search uses.
    pub fn lookup(&self, t: f64, ascending: bool) -> Option<&DVector<f64>> {
        let matches = |td: &f64| (td - t).abs() < self.tolerance;
        let position = if ascending {
            self.times.iter().position(matches)
        } else {
            self.times.iter().rposition(matches)
        };
        position.map(|i| &self.values[i])
    }

    /// Flags the entries of a batched query that repeat the previous time.
    ///
    /// A solution with jumps cannot guess where the caller wants the post-jump
    /// value, so the query has to spell it out: at least one repeated time must
    /// be present, and every repeated time must be one of the recorded jumps.
    pub fn query_markers(&self, query: &[f64]) -> Result<Vec<bool>> {
        let mut markers = vec![false; query.len()];
        let mut found = false;
        for i in 1..query.len() {
            if (query[i] - query[i - 1]).abs() < self.tolerance {
                if !self.times.iter().any(|td| (td - query[i]).abs() < self.tolerance) {
                    return Err(DdeError::UnmatchedDiscontinuityMarker { t: query[i] });
                }
                markers[i] = true;
                found = true;
            }
        }
        if !found {
            return Err(DdeError::MissingDiscontinuityMarkers);
        }
        Ok(markers)
    }

    /// Drops jumps outside `[lo, hi]` and any jump at the closing boundary `end`.
    pub fn retain_before_end(&mut self, lo: f64, hi: f64, end: f64) {
        let tolerance = self.tolerance;
        let mut kept_times = Vec::new();
        let mut kept_values = Vec::new();
        for (t, y) in self.times.drain(..).zip(self.values.drain(..)) {
            if t >= lo && t <= hi && (t - end).abs() >= tolerance {
                kept_times.push(t);
                kept_values.push(y);
            }
        }
        self.times = kept_times;
        self.values = kept_values;
    }
}
