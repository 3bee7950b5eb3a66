pub mod continuous;
pub mod error;
pub mod hinit;
pub mod history;
pub mod interpolate;
pub mod norm;
pub mod tolerance;
/// The `dde_core` crate provides the continuous-output layer of a delay
/// differential equation integrator.
///
/// A stepping integrator produces one local interpolant per accepted step. This
/// crate stitches those interpolants, together with a "history" segment that
/// describes the solution before the initial time, into a single solution object
/// that can be queried anywhere in the integrated range.
///
/// Key components:
/// - **Traits**: `DenseOutput` (per-step interpolants), `DelaySystem` (right-hand side `f(t, y, Z)`).
/// - **Continuous extension**: `ContinuousExt`, segment search, discontinuity handling and truncation.
/// - **History**: the polymorphic first segment (component splines, a function or a constant).
/// - **Initial step**: `select_initial_step`, the Hairer–Nørsett–Wanner starting step heuristic.
/// - **Validation**: guard clauses for step sizes and tolerances.
pub mod traits;
pub mod validate;

pub use continuous::{ContinuousExt, ContinuousSettings, Interpolant};
pub use error::{DdeError, Result};
pub use history::History;
pub use tolerance::Tolerance;
