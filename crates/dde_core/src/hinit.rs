//! Starting step size for an adaptive integrator.
//!
//! The estimate follows E. Hairer, S. P. Nørsett, G. Wanner, "Solving Ordinary
//! Differential Equations I: Nonstiff Problems", Sec. II.4: compare the scaled
//! size of the state with that of its derivative, take one explicit Euler trial
//! step, and size the step so that the predicted local error matches the
//! tolerance for an estimator of the given order.

use crate::error::{DdeError, Result};
use crate::norm::{error_scale, scaled_rms_norm};
use crate::tolerance::Tolerance;
use crate::traits::DelaySystem;
use nalgebra::DMatrix;

/// Everything known about the problem at the initial time.
#[derive(Debug, Clone, Copy)]
pub struct InitialStep<'a> {
    pub t0: f64,
    pub y0: &'a [f64],
    /// Delayed states at `t0`, one column per delay.
    pub z0: &'a DMatrix<f64>,
    /// `f(t0, y0, z0)`.
    pub f0: &'a [f64],
    /// +1.0 forward, -1.0 backward.
    pub direction: f64,
    /// Error estimator order; the controlled error scales as `h^(order + 1)`.
    pub order: f64,
    pub rtol: f64,
    pub atol: &'a Tolerance,
}

/// Returns the absolute value of a suggested first step.
///
/// An empty state has no error to control and yields `f64::INFINITY`.
pub fn select_initial_step(system: &impl DelaySystem, init: &InitialStep) -> Result<f64> {
    let n = init.y0.len();
    if n == 0 {
        return Ok(f64::INFINITY);
    }
    if init.f0.len() != n {
        return Err(DdeError::StateDimension {
            expected: n,
            got: init.f0.len(),
        });
    }
    if system.dimension() != n {
        return Err(DdeError::StateDimension {
            expected: system.dimension(),
            got: n,
        });
    }
    if let Some(len) = init.atol.components() {
        if len != n {
            return Err(DdeError::ToleranceShape {
                expected: n,
                got: len,
            });
        }
    }

    let scale = error_scale(init.y0, init.rtol, init.atol);
    let d0 = scaled_rms_norm(init.y0, &scale);
    let d1 = scaled_rms_norm(init.f0, &scale);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    // Explicit Euler trial step
    let y1: Vec<f64> = init
        .y0
        .iter()
        .zip(init.f0)
        .map(|(y, f)| y + h0 * init.direction * f)
        .collect();
    let mut f1 = vec![0.0; n];
    system.apply(init.t0 + h0 * init.direction, &y1, init.z0, &mut f1)?;

    let df: Vec<f64> = f1.iter().zip(init.f0).map(|(a, b)| a - b).collect();
    let d2 = scaled_rms_norm(&df, &scale) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / (init.order + 1.0))
    };

    Ok((100.0 * h0).min(h1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use approx::assert_relative_eq;

    struct Growth {
        rate: f64,
    }

    impl DelaySystem for Growth {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: f64, y: &[f64], _z: &DMatrix<f64>, out: &mut [f64]) -> anyhow::Result<()> {
            out[0] = self.rate * y[0];
            Ok(())
        }
    }

    struct Still {
        dim: usize,
    }

    impl DelaySystem for Still {
        fn dimension(&self) -> usize {
            self.dim
        }

        fn apply(&self, _t: f64, _y: &[f64], _z: &DMatrix<f64>, out: &mut [f64]) -> anyhow::Result<()> {
            out.fill(0.0);
            Ok(())
        }
    }

    struct Failing;

    impl DelaySystem for Failing {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: f64, _y: &[f64], _z: &DMatrix<f64>, _out: &mut [f64]) -> anyhow::Result<()> {
            bail!("history lookup out of range")
        }
    }

    fn init<'a>(
        y0: &'a [f64],
        f0: &'a [f64],
        z0: &'a DMatrix<f64>,
        atol: &'a Tolerance,
    ) -> InitialStep<'a> {
        InitialStep {
            t0: 0.0,
            y0,
            z0,
            f0,
            direction: 1.0,
            order: 4.0,
            rtol: 1e-3,
            atol,
        }
    }

    #[test]
    fn empty_state_gives_unbounded_step() {
        let z0 = DMatrix::zeros(0, 0);
        let atol = Tolerance::from(1e-6);
        let h = select_initial_step(&Still { dim: 0 }, &init(&[], &[], &z0, &atol))
            .expect("empty state is valid");
        assert!(h.is_infinite() && h > 0.0);
    }

    #[test]
    fn exponential_growth_matches_hand_computation() {
        let z0 = DMatrix::zeros(1, 1);
        let atol = Tolerance::from(1e-6);
        let y0 = [1.0];
        let f0 = [1.0];
        let h = select_initial_step(&Growth { rate: 1.0 }, &init(&y0, &f0, &z0, &atol))
            .expect("step should compute");

        let scale: f64 = 1e-6 + 1e-3;
        let d0 = 1.0 / scale;
        let d1 = 1.0 / scale;
        let h0 = 0.01 * d0 / d1;
        let d2 = (h0 / scale) / h0;
        let h1 = (0.01 / d1.max(d2)).powf(1.0 / 5.0);

        assert!(h.is_finite() && h > 0.0);
        assert!(h <= 100.0 * h0);
        assert_relative_eq!(h, h1.min(100.0 * h0), max_relative = 1e-12);
    }

    #[test]
    fn tiny_state_and_derivative_use_minimal_trial_step() {
        let z0 = DMatrix::zeros(2, 1);
        let atol = Tolerance::from(1e-6);
        let y0 = [0.0, 0.0];
        let f0 = [0.0, 0.0];
        let h = select_initial_step(&Still { dim: 2 }, &init(&y0, &f0, &z0, &atol))
            .expect("step should compute");
        // h0 = 1e-6, both derivatives vanish: h1 = max(1e-6, 1e-9)
        assert_relative_eq!(h, 1e-6, max_relative = 1e-12);
    }

    #[test]
    fn backward_direction_is_accepted() {
        let z0 = DMatrix::zeros(1, 1);
        let atol = Tolerance::from(vec![1e-8]);
        let y0 = [2.0];
        let f0 = [-1.0];
        let mut problem = init(&y0, &f0, &z0, &atol);
        problem.direction = -1.0;
        let h = select_initial_step(&Growth { rate: -0.5 }, &problem).expect("step should compute");
        assert!(h.is_finite() && h > 0.0);
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let z0 = DMatrix::zeros(1, 1);
        let atol = Tolerance::from(vec![1e-6, 1e-6]);
        let err = select_initial_step(&Growth { rate: 1.0 }, &init(&[1.0], &[1.0], &z0, &atol))
            .expect_err("atol shape should be rejected");
        assert!(matches!(err, DdeError::ToleranceShape { expected: 1, got: 2 }));

        let atol = Tolerance::from(1e-6);
        let err = select_initial_step(&Growth { rate: 1.0 }, &init(&[1.0], &[1.0, 2.0], &z0, &atol))
            .expect_err("derivative shape should be rejected");
        assert!(matches!(err, DdeError::StateDimension { .. }));
    }

    #[test]
    fn right_hand_side_failure_propagates() {
        let z0 = DMatrix::zeros(1, 1);
        let atol = Tolerance::from(1e-6);
        let err = select_initial_step(&Failing, &init(&[1.0], &[1.0], &z0, &atol))
            .expect_err("failure should propagate");
        assert!(format!("{err}").contains("history lookup out of range"));
    }
}
