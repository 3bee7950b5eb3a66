use crate::error::{DdeError, Result};
use nalgebra::{DMatrix, DVector};

/// A local interpolant produced by the stepping integrator for one accepted step.
///
/// Implementors are only required to be accurate on their own step; the
/// continuous extension decides which interpolant serves which time.
pub trait DenseOutput {
    /// Evaluates the interpolant at a single time.
    fn evaluate(&self, t: f64) -> DVector<f64>;

    /// Evaluates the interpolant at several times at once.
    /// Returns a matrix with one column per entry of `ts`.
    ///
    /// The default implementation evaluates column by column and fails with
    /// `StateDimension` if the columns do not all have the same length.
    /// Interpolants that can amortize work over a batch should override it.
    fn evaluate_many(&self, ts: &[f64]) -> Result<DMatrix<f64>> {
        let Some((&first_t, rest)) = ts.split_first() else {
            return Ok(DMatrix::zeros(0, 0));
        };
        let first = self.evaluate(first_t);
        let mut out = DMatrix::zeros(first.len(), ts.len());
        out.set_column(0, &first);
        for (j, &t) in rest.iter().enumerate() {
            let column = self.evaluate(t);
            if column.len() != first.len() {
                return Err(DdeError::StateDimension {
                    expected: first.len(),
                    got: column.len(),
                });
            }
            out.set_column(j + 1, &column);
        }
        Ok(out)
    }
}

/// Right-hand side of a delay differential equation, `y'(t) = f(t, y(t), Z)`.
pub trait DelaySystem {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// y: current state
    /// z: delayed states, one column per delay
    /// out: buffer to write dy/dt
    fn apply(&self, t: f64, y: &[f64], z: &DMatrix<f64>, out: &mut [f64]) -> anyhow::Result<()>;
}
