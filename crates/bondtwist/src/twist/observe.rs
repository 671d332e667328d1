//! Diagnostic events emitted by the engine.
//!
//! The engine never logs on its own; callers pass an observer and decide what
//! to do with the events (log them, count them, ignore them). Observers are
//! shared across worker threads, hence `Sync`.

/// Something noteworthy seen while evaluating one bond `(a, b)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TwistEvent {
    /// A neighbor-pair angle fell inside the traced window (30° by default,
    /// where `exp(3iθ)` is purely imaginary).
    NearThirtyDegrees {
        a: usize,
        b: usize,
        i: usize,
        j: usize,
        degrees: f64,
        cosine: f64,
        /// `sqrt(sin² + cos²)` of the unnormalised pair; 1 for clean projections.
        chord: f64,
        /// Cartesian lengths of the bonds i–a, a–b and b–j.
        dist_ai: f64,
        dist_ab: f64,
        dist_bj: f64,
    },
    /// `vertex` lies on the bond axis; its projection was dropped.
    DegenerateProjection { a: usize, b: usize, vertex: usize },
}

/// Receives engine events.
pub trait TwistObserver: Sync {
    fn observe(&self, event: &TwistEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TwistObserver for NoopObserver {
    #[inline]
    fn observe(&self, _event: &TwistEvent) {}
}

impl<F> TwistObserver for F
where
    F: Fn(&TwistEvent) + Sync,
{
    #[inline]
    fn observe(&self, event: &TwistEvent) {
        self(event)
    }
}
