//! Bond-twist engine: the complex order parameter of a single bond.
//!
//! Algorithm (per bond a–b)
//! - Candidate atoms are `N(a) ∪ N(b)`; proximity policies first check that the
//!   bond is actually present in the neighbor sets.
//! - Minimum-image vectors from `a`, the unit axis `a → b`, and projections of
//!   every candidate onto the plane perpendicular to the axis.
//! - For each neighbor `i` of `a` and `j` of `b` (excluding `a`, `b` and shared
//!   neighbors), the signed angle θ from `i` to `j` about the axis; the result is
//!   the mean of `exp(3iθ)`.
//!
//! The third harmonic picks out the three-fold symmetry of tetrahedral bonds:
//! staggered neighbors (θ ≡ 60° mod 120°) give −1, eclipsed ones give +1.
//!
//! Split: `types.rs` (outcomes, errors, cfg), `observe.rs` (diagnostic events),
//! `engine.rs` (evaluation).

mod engine;
mod observe;
mod types;

pub use engine::BondTwistEngine;
pub use observe::{NoopObserver, TwistEvent, TwistObserver};
pub use types::{OrderParameter, SkipReason, TwistCfg, TwistError, TwistOutcome};
