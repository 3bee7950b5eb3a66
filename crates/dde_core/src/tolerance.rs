//! Absolute tolerance given either as one value for every component or per component.

use serde::{Deserialize, Serialize};
use std::ops::Index;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tolerance {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Tolerance {
    /// Number of explicit components, `None` for a scalar tolerance.
    pub fn components(&self) -> Option<usize> {
        match self {
            Tolerance::Scalar(_) => None,
            Tolerance::Vector(values) => Some(values.len()),
        }
    }

    pub fn any_negative(&self) -> bool {
        match self {
            Tolerance::Scalar(value) => *value < 0.0,
            Tolerance::Vector(values) => values.iter().any(|v| *v < 0.0),
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Scalar(1e-6)
    }
}

impl From<f64> for Tolerance {
    fn from(value: f64) -> Self {
        Tolerance::Scalar(value)
    }
}

impl From<Vec<f64>> for Tolerance {
    fn from(values: Vec<f64>) -> Self {
        Tolerance::Vector(values)
    }
}

impl From<&[f64]> for Tolerance {
    fn from(values: &[f64]) -> Self {
        Tolerance::Vector(values.to_vec())
    }
}

impl Index<usize> for Tolerance {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Tolerance::Scalar(value) => value,
            Tolerance::Vector(values) => &values[index],
        }
    }
}
