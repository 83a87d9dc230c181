//! Push/pull seam between audio producers and consumers.
//!
//! # Traits
//!
//! - [`Sink`] - Can receive pushed data
//! - [`Source`] - Can return data when pulled
//!
//! An ingest task pushes decoded chunks into a [`Sink`]; a render callback
//! pulls fixed-size blocks out of a [`Source`]. A buffer implements both and
//! absorbs the cadence mismatch between the two sides.

/// Passive receiver - can receive pushed data.
///
/// This is the input interface in a push-based data flow. When data is
/// pushed, the implementation decides what to do with it, typically storing
/// it for a later pull.
pub trait Sink: Send + Sync {
    type Input;

    fn push(&self, input: Self::Input);
}

/// Passive producer - can return data when pulled.
///
/// This is the output interface in a pull-based data flow. `len` is the
/// number of samples the caller wants; whether fewer (or none) may be
/// returned is up to the implementation's contract.
pub trait Source: Send + Sync {
    type Output;

    fn pull(&self, len: usize) -> Option<Self::Output>;
}
