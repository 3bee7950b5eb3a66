//! Guard clauses run on user options before the solver is built.

use crate::error::{DdeError, Result};
use crate::tolerance::Tolerance;
use log::warn;

pub const EPS: f64 = f64::EPSILON;

pub fn validate_first_step(first_step: f64, t0: f64, t_bound: f64) -> Result<f64> {
    if first_step <= 0.0 {
        return Err(DdeError::NonPositiveFirstStep);
    }
    if first_step > (t_bound - t0).abs() {
        return Err(DdeError::FirstStepExceedsBounds);
    }
    Ok(first_step)
}

pub fn validate_max_step(max_step: f64) -> Result<f64> {
    if max_step <= 0.0 {
        return Err(DdeError::NonPositiveMaxStep);
    }
    Ok(max_step)
}

/// Checks tolerances for a system of dimension `n`.
///
/// A relative tolerance below `100 * EPS` is not an error: it is raised to that
/// floor and a warning is logged.
pub fn validate_tol(rtol: f64, atol: Tolerance, n: usize) -> Result<(f64, Tolerance)> {
    let mut rtol = rtol;
    if rtol < 100.0 * EPS {
        warn!("`rtol` is too low, setting to {}", 100.0 * EPS);
        rtol = 100.0 * EPS;
    }

    if let Some(len) = atol.components() {
        if len != n {
            return Err(DdeError::ToleranceShape {
                expected: n,
                got: len,
            });
        }
    }

    if atol.any_negative() {
        return Err(DdeError::NegativeTolerance);
    }

    Ok((rtol, atol))
}

/// Logs a single warning naming options the chosen solver ignores.
pub fn warn_extraneous(extraneous: &[&str]) {
    if extraneous.is_empty() {
        return;
    }
    let names: Vec<String> = extraneous.iter().map(|name| format!("`{name}`")).collect();
    warn!(
        "The following arguments have no effect for a chosen solver: {}.",
        names.join(", ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_err_contains<T: std::fmt::Debug>(result: Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn first_step_must_be_positive_and_in_bounds() {
        assert_err_contains(validate_first_step(0.0, 0.0, 1.0), "must be positive");
        assert_err_contains(validate_first_step(2.0, 0.0, 1.0), "exceeds bounds");
        assert_err_contains(validate_first_step(2.0, 1.0, 0.0), "exceeds bounds");
        assert_eq!(validate_first_step(0.5, 1.0, 0.0).expect("valid step"), 0.5);
    }

    #[test]
    fn max_step_must_be_positive() {
        assert_err_contains(validate_max_step(-1.0), "`max_step` must be positive");
        assert_eq!(validate_max_step(f64::INFINITY).expect("valid"), f64::INFINITY);
    }

    #[test]
    fn low_rtol_is_raised_to_floor() {
        let (rtol, atol) = validate_tol(1e-20, Tolerance::from(1e-9), 3).expect("valid tol");
        assert_eq!(rtol, 100.0 * EPS);
        assert_eq!(atol, Tolerance::Scalar(1e-9));
    }

    #[test]
    fn atol_shape_and_sign_are_checked() {
        assert_err_contains(
            validate_tol(1e-3, Tolerance::from(vec![1e-6, 1e-6]), 3),
            "wrong shape",
        );
        assert_err_contains(
            validate_tol(1e-3, Tolerance::from(vec![1e-6, -1e-6]), 2),
            "must be positive",
        );
        let (rtol, atol) =
            validate_tol(1e-3, Tolerance::from(vec![1e-6, 0.0]), 2).expect("valid tol");
        assert_eq!(rtol, 1e-3);
        assert_eq!(atol.components(), Some(2));
    }

    #[test]
    fn warn_extraneous_accepts_empty_and_named_options() {
        warn_extraneous(&[]);
        warn_extraneous(&["jac", "vectorized"]);
    }
}
