//! Piecewise continuous extension of a DDE solution.
//!
//! The solution is a collection of local interpolants. Segment `i` is valid
//! between `ts[i]` and `ts[i + 1]`; the first segment usually holds the user's
//! [`History`]. Queries are routed to the right segment by binary search over
//! the boundaries. When a query lands exactly on a boundary the segment with
//! the lower index is used.

pub mod discontinuity;
pub mod index;

use crate::error::{DdeError, Result};
use crate::history::History;
use crate::traits::DenseOutput;
use discontinuity::DiscontinuityTable;
use index::{check_monotonic, SegmentIndex};
use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings controlling how a continuous extension is assembled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContinuousSettings {
    /// Adjacent times closer than this are treated as the same instant, i.e. a jump.
    pub duplicate_tolerance: f64,
}

impl Default for ContinuousSettings {
    fn default() -> Self {
        Self {
            duplicate_tolerance: f64::EPSILON,
        }
    }
}

/// Interpolant attached to one segment.
pub enum Interpolant {
    History(History),
    Dense(Box<dyn DenseOutput>),
}

impl Interpolant {
    pub fn dense(output: impl DenseOutput + 'static) -> Self {
        Interpolant::Dense(Box::new(output))
    }

    fn evaluate(&self, t: f64) -> DVector<f64> {
        match self {
            Interpolant::History(history) => history.evaluate(t),
            Interpolant::Dense(output) => output.evaluate(t),
        }
    }
}

impl From<History> for Interpolant {
    fn from(history: History) -> Self {
        Interpolant::History(history)
    }
}

impl fmt::Debug for Interpolant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolant::History(history) => fmt::Debug::fmt(history, f),
            Interpolant::Dense(_) => write!(f, "Interpolant::Dense"),
        }
    }
}

/// Continuous DDE solution stitched from local interpolants.
#[derive(Debug)]
pub struct ContinuousExt {
    index: SegmentIndex,
    interpolants: Vec<Interpolant>,
    ys: Vec<DVector<f64>>,
    discontinuities: DiscontinuityTable,
    dimension: usize,
}

impl ContinuousExt {
    pub fn new(ts: Vec<f64>, interpolants: Vec<Interpolant>, ys: Vec<DVector<f64>>) -> Result<Self> {
        Self::with_settings(ts, interpolants, ys, ContinuousSettings::default())
    }

    /// Builds the extension from the boundaries `ts`, one interpolant per
    /// segment and the state at every boundary.
    ///
    /// Repeated boundaries encode jumps: `ts` and `ys` then carry one extra entry
    /// per jump that has no interpolant of its own.
    pub fn with_settings(
        ts: Vec<f64>,
        interpolants: Vec<Interpolant>,
        ys: Vec<DVector<f64>>,
        settings: ContinuousSettings,
    ) -> Result<Self> {
        if interpolants.is_empty() {
            return Err(DdeError::NoSegments);
        }
        if ts.len() != ys.len() {
            return Err(DdeError::LengthMismatch {
                ts: ts.len(),
                ys: ys.len(),
            });
        }
        let dimension = ys.first().map_or(0, |y| y.len());
        if let Some(bad) = ys.iter().find(|y| y.len() != dimension) {
            return Err(DdeError::StateDimension {
                expected: dimension,
                got: bad.len(),
            });
        }

        for (segment, interpolant) in interpolants.iter().enumerate() {
            if let Interpolant::History(history) = interpolant {
                if let Some(got) = history.known_dimension().filter(|&n| n != dimension) {
                    debug!("history of segment {segment} has {got} components, expected {dimension}");
                    return Err(DdeError::StateDimension {
                        expected: dimension,
                        got,
                    });
                }
            }
        }

        let (discontinuities, ts, ys) =
            DiscontinuityTable::extract(ts, ys, settings.duplicate_tolerance);
        check_monotonic(&ts)?;
        if ts.len() != interpolants.len() + 1 {
            return Err(DdeError::SegmentCountMismatch {
                ts: ts.len(),
                interpolants: interpolants.len(),
            });
        }
        if !discontinuities.is_empty() {
            debug!(
                "continuous extension built with {} discontinuities",
                discontinuities.len()
            );
        }

        Ok(Self {
            index: SegmentIndex::new(ts),
            interpolants,
            ys,
            discontinuities,
            dimension,
        })
    }

    pub fn t_min(&self) -> f64 {
        self.index.t_min()
    }

    pub fn t_max(&self) -> f64 {
        self.index.t_max()
    }

    pub fn n_segments(&self) -> usize {
        self.interpolants.len()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_ascending(&self) -> bool {
        self.index.is_ascending()
    }

    /// Segment boundaries, jumps removed.
    pub fn ts(&self) -> &[f64] {
        self.index.ts()
    }

    /// States at the boundaries, jumps removed.
    pub fn ys(&self) -> &[DVector<f64>] {
        &self.ys
    }

    pub fn has_discontinuities(&self) -> bool {
        !self.discontinuities.is_empty()
    }

    /// Jump times with their post-jump values.
    pub fn discontinuities(&self) -> impl Iterator<Item = (f64, &DVector<f64>)> {
        self.discontinuities.iter()
    }

    /// Evaluates the solution at a single time.
    ///
    /// At a jump time the post-jump value is returned.
    pub fn eval(&self, t: f64) -> DVector<f64> {
        if let Some(value) = self.discontinuities.lookup(t, self.is_ascending()) {
            debug!("returning discontinuity value at t={t}");
            return value.clone();
        }
        let segment = self.index.locate(t);
        self.interpolants[segment].evaluate(t)
    }

    /// Evaluates the solution at several times.
    ///
    /// Returns a `dimension x t.len()` matrix whose columns follow the order of
    /// `t`. Times are sorted internally so that consecutive points served by the
    /// same segment are handed to its interpolant in one call.
    ///
    /// If the solution has jumps, `t` must repeat each jump time it crosses; the
    /// first occurrence gets the value before the jump, the repeated one the
    /// value after it.
    pub fn eval_many(&self, t: &[f64]) -> Result<DMatrix<f64>> {
        if t.is_empty() {
            return Ok(DMatrix::zeros(self.dimension, 0));
        }

        let markers = if self.has_discontinuities() {
            debug!("batched query on a solution with discontinuities");
            Some(self.discontinuities.query_markers(t)?)
        } else {
            None
        };
        let kept: Vec<f64> = match &markers {
            Some(markers) => t
                .iter()
                .zip(markers)
                .filter_map(|(&ti, &is_marker)| (!is_marker).then_some(ti))
                .collect(),
            None => t.to_vec(),
        };

        let mut order: Vec<usize> = (0..kept.len()).collect();
        order.sort_by(|&a, &b| kept[a].total_cmp(&kept[b]));
        let t_sorted: Vec<f64> = order.iter().map(|&i| kept[i]).collect();
        let segments: Vec<usize> = t_sorted.iter().map(|&ti| self.index.locate(ti)).collect();

        let mut values = DMatrix::zeros(self.dimension, kept.len());
        let mut group_start = 0;
        while group_start < t_sorted.len() {
            let segment = segments[group_start];
            let mut group_end = group_start + 1;
            while group_end < t_sorted.len() && segments[group_end] == segment {
                group_end += 1;
            }

            let block = self.evaluate_group(segment, &t_sorted[group_start..group_end])?;
            for (k, column) in block.column_iter().enumerate() {
                values.set_column(order[group_start + k], &column);
            }
            group_start = group_end;
        }

        let Some(markers) = markers else {
            return Ok(values);
        };

        let ascending = self.is_ascending();
        let mut out = DMatrix::zeros(self.dimension, t.len());
        let mut next = 0;
        for (i, (&ti, &is_marker)) in t.iter().zip(&markers).enumerate() {
            if is_marker {
                let jump = self
                    .discontinuities
                    .lookup(ti, ascending)
                    .ok_or(DdeError::UnmatchedDiscontinuityMarker { t: ti })?;
                out.set_column(i, jump);
            } else {
                out.set_column(i, &values.column(next));
                next += 1;
            }
        }
        Ok(out)
    }

    fn evaluate_group(&self, segment: usize, t: &[f64]) -> Result<DMatrix<f64>> {
        let shape_error = |got: usize| DdeError::InterpolantShape {
            segment,
            expected: self.dimension,
            got,
        };
        let block = match &self.interpolants[segment] {
            Interpolant::History(history) => history
                .evaluate_many(t, self.dimension)
                .map_err(shape_error)?,
            Interpolant::Dense(output) => output.evaluate_many(t).map_err(|err| match err {
                DdeError::StateDimension { got, .. } => shape_error(got),
                other => other,
            })?,
        };
        if block.nrows() != self.dimension || block.ncols() != t.len() {
            return Err(shape_error(block.nrows()));
        }
        Ok(block)
    }

    /// Truncates the solution so that it ends at the first boundary reached at
    /// or after `t0_new`.
    ///
    /// Used when the solution becomes the history of a new integration starting
    /// at `t0_new`. The argument is not checked against the current range; the
    /// solution always keeps at least one segment. A jump sitting on the new
    /// closing boundary belongs to a dropped segment and is removed as well.
    pub fn reorganize(&mut self, t0_new: f64) {
        let n_segments = self.n_segments();
        let pos = self.index.boundaries_before(t0_new).clamp(1, n_segments);

        self.index.truncate(pos + 1);
        self.ys.truncate(pos + 1);
        self.interpolants.truncate(pos);
        let end = self.index.ts()[self.index.ts().len() - 1];
        self.discontinuities
            .retain_before_end(self.index.t_min(), self.index.t_max(), end);

        debug!(
            "reorganized continuous extension at t0_new={t0_new}: {} -> {} segments",
            n_segments, pos
        );
    }
}
