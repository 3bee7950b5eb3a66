//! Concrete interpolants handed over by a stepping integrator, and the scalar
//! spline used to describe a history component by component.

use crate::error::{DdeError, Result};
use crate::traits::DenseOutput;
use nalgebra::{DMatrix, DVector};

fn check_dimension(expected: usize, other: &DVector<f64>) -> Result<()> {
    if other.len() != expected {
        return Err(DdeError::StateDimension {
            expected,
            got: other.len(),
        });
    }
    Ok(())
}

/// Straight line between two states.
#[derive(Debug, Clone)]
pub struct LinearSegment {
    t0: f64,
    t1: f64,
    y0: DVector<f64>,
    y1: DVector<f64>,
}

impl LinearSegment {
    pub fn new(t0: f64, t1: f64, y0: DVector<f64>, y1: DVector<f64>) -> Result<Self> {
        check_dimension(y0.len(), &y1)?;
        Ok(Self { t0, t1, y0, y1 })
    }
}

impl DenseOutput for LinearSegment {
    fn evaluate(&self, t: f64) -> DVector<f64> {
        let h = self.t1 - self.t0;
        if h == 0.0 {
            return self.y0.clone();
        }
        let theta = (t - self.t0) / h;
        &self.y0 * (1.0 - theta) + &self.y1 * theta
    }
}

/// Cubic Hermite interpolant over one step, built from the states and
/// derivatives at both ends.
#[derive(Debug, Clone)]
pub struct HermiteSegment {
    t0: f64,
    h: f64,
    y0: DVector<f64>,
    y1: DVector<f64>,
    dy0: DVector<f64>,
    dy1: DVector<f64>,
}

impl HermiteSegment {
    pub fn new(
        t0: f64,
        t1: f64,
        y0: DVector<f64>,
        y1: DVector<f64>,
        dy0: DVector<f64>,
        dy1: DVector<f64>,
    ) -> Result<Self> {
        let n = y0.len();
        for other in [&y1, &dy0, &dy1] {
            check_dimension(n, other)?;
        }
        Ok(Self {
            t0,
            h: t1 - t0,
            y0,
            y1,
            dy0,
            dy1,
        })
    }

    fn write_column(&self, t: f64, out: &mut [f64]) {
        if self.h == 0.0 {
            out.copy_from_slice(self.y0.as_slice());
            return;
        }
        let s = (t - self.t0) / self.h;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        for (i, value) in out.iter_mut().enumerate() {
            *value = h00 * self.y0[i]
                + h10 * self.h * self.dy0[i]
                + h01 * self.y1[i]
                + h11 * self.h * self.dy1[i];
        }
    }
}

impl DenseOutput for HermiteSegment {
    fn evaluate(&self, t: f64) -> DVector<f64> {
        let mut out = DVector::zeros(self.y0.len());
        self.write_column(t, out.as_mut_slice());
        out
    }

    fn evaluate_many(&self, ts: &[f64]) -> Result<DMatrix<f64>> {
        let n = self.y0.len();
        let mut out = DMatrix::zeros(n, ts.len());
        // Column-major storage: column j occupies [j * n, (j + 1) * n).
        for (column, &t) in out.as_mut_slice().chunks_mut(n.max(1)).zip(ts) {
            self.write_column(t, column);
        }
        Ok(out)
    }
}

/// Scalar piecewise cubic Hermite spline through `(x_i, y_i)` with slopes `dydx_i`.
///
/// Outside the knot range the end pieces are extrapolated.
#[derive(Debug, Clone)]
pub struct HermiteSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    dydx: Vec<f64>,
}

impl HermiteSpline {
    pub fn new(x: Vec<f64>, y: Vec<f64>, dydx: Vec<f64>) -> Result<Self> {
        if y.len() != x.len() || dydx.len() != x.len() {
            return Err(DdeError::LengthMismatch {
                ts: x.len(),
                ys: y.len().min(dydx.len()),
            });
        }
        if x.len() < 2 {
            return Err(DdeError::NoSegments);
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(DdeError::NotMonotonic);
        }
        Ok(Self { x, y, dydx })
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let last = self.x.len() - 2;
        let k = self.x.partition_point(|&xi| xi <= t).saturating_sub(1).min(last);

        let h = self.x[k + 1] - self.x[k];
        let s = (t - self.x[k]) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        (2.0 * s3 - 3.0 * s2 + 1.0) * self.y[k]
            + (s3 - 2.0 * s2 + s) * h * self.dydx[k]
            + (-2.0 * s3 + 3.0 * s2) * self.y[k + 1]
            + (s3 - s2) * h * self.dydx[k + 1]
    }
}
