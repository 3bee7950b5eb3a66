//! The solution before the initial time.
//!
//! A delay equation needs `y(t)` for `t` in `[t0 - max_delay, t0]` before the
//! first step can be taken. That history is supplied by the user in one of
//! three shapes, and it becomes the first segment of the continuous extension.

use crate::interpolate::HermiteSpline;
use nalgebra::{DMatrix, DVector};
use std::fmt;

pub type ScalarFn = Box<dyn Fn(f64) -> f64>;
pub type VectorFn = Box<dyn Fn(f64) -> DVector<f64>>;

pub enum History {
    /// One scalar function per state component.
    Components(Vec<ScalarFn>),
    /// A single function returning the whole state.
    Function(VectorFn),
    /// A state that does not depend on time.
    Constant(DVector<f64>),
}

impl History {
    pub fn components(components: Vec<ScalarFn>) -> Self {
        History::Components(components)
    }

    pub fn function(f: impl Fn(f64) -> DVector<f64> + 'static) -> Self {
        History::Function(Box::new(f))
    }

    pub fn constant(value: DVector<f64>) -> Self {
        History::Constant(value)
    }

    /// Component-wise history from previously fitted splines.
    pub fn from_splines(splines: Vec<HermiteSpline>) -> Self {
        History::Components(
            splines
                .into_iter()
                .map(|spline| Box::new(move |t: f64| spline.evaluate(t)) as ScalarFn)
                .collect(),
        )
    }

    /// Number of components when it is known without evaluating, i.e. for
    /// component-wise and constant histories.
    pub fn known_dimension(&self) -> Option<usize> {
        match self {
            History::Components(components) => Some(components.len()),
            History::Function(_) => None,
            History::Constant(value) => Some(value.len()),
        }
    }

    pub fn evaluate(&self, t: f64) -> DVector<f64> {
        match self {
            History::Components(components) => {
                DVector::from_iterator(components.len(), components.iter().map(|f| f(t)))
            }
            History::Function(f) => f(t),
            History::Constant(value) => value.clone(),
        }
    }

    /// Evaluates point by point into a `dimension x ts.len()` matrix.
    /// Returns the offending length if a value does not have `dimension` components.
    pub fn evaluate_many(&self, ts: &[f64], dimension: usize) -> Result<DMatrix<f64>, usize> {
        let mut out = DMatrix::zeros(dimension, ts.len());
        for (j, &t) in ts.iter().enumerate() {
            let value = self.evaluate(t);
            if value.len() != dimension {
                return Err(value.len());
            }
            out.set_column(j, &value);
        }
        Ok(out)
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            History::Components(components) => {
                write!(f, "History::Components({} components)", components.len())
            }
            History::Function(_) => write!(f, "History::Function"),
            History::Constant(value) => write!(f, "History::Constant({:?})", value.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::HermiteSpline;

    #[test]
    fn components_are_assembled_in_order() {
        let history = History::components(vec![
            Box::new(|t: f64| t) as ScalarFn,
            Box::new(|t: f64| 2.0 * t),
            Box::new(|_t: f64| -1.0),
        ]);
        assert_eq!(history.evaluate(3.0).as_slice(), &[3.0, 6.0, -1.0]);
    }

    #[test]
    fn function_and_constant_histories_evaluate() {
        let history = History::function(|t| DVector::from_vec(vec![t.sin(), t.cos()]));
        let value = history.evaluate(0.0);
        assert!((value[0]).abs() < 1e-15);
        assert!((value[1] - 1.0).abs() < 1e-15);

        let history = History::constant(DVector::from_vec(vec![5.0]));
        assert_eq!(history.evaluate(-100.0).as_slice(), &[5.0]);
        assert_eq!(history.evaluate(7.0).as_slice(), &[5.0]);
    }

    #[test]
    fn spline_history_uses_each_spline() {
        let first = HermiteSpline::new(vec![-1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0])
            .expect("valid spline");
        let second = HermiteSpline::new(vec![-1.0, 0.0], vec![3.0, 3.0], vec![0.0, 0.0])
            .expect("valid spline");
        let history = History::from_splines(vec![first, second]);
        let value = history.evaluate(-0.5);
        assert!((value[0] - 0.5).abs() < 1e-12);
        assert!((value[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn known_dimension_skips_functions() {
        assert_eq!(History::constant(DVector::zeros(3)).known_dimension(), Some(3));
        assert_eq!(
            History::components(vec![Box::new(|t: f64| t) as ScalarFn]).known_dimension(),
            Some(1)
        );
        assert_eq!(History::function(|_| DVector::zeros(2)).known_dimension(), None);
    }

    #[test]
    fn evaluate_many_reports_wrong_dimension() {
        let history = History::constant(DVector::from_vec(vec![1.0, 2.0]));
        let matrix = history.evaluate_many(&[0.0, 1.0], 2).expect("matching dimension");
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix[(0, 1)], 1.0);
        assert_eq!(matrix[(1, 1)], 2.0);
        assert_eq!(history.evaluate_many(&[0.0], 3), Err(2));
    }
}
