//! Periodic confidence refresh.
//!
//! A [`ConfidenceRefresher`] fetches a fresh confidence score/band from a
//! [`ConfidenceSource`] and patches only those two fields of the payload held
//! in a [`PayloadHandle`]. At most one fetch is in flight; triggers that land
//! while one is running are ignored. [`RefreshTask`] drives the refresher on
//! a timer and on demand, and cancelling it discards late results.

pub mod payload;
pub mod refresher;
pub mod source;
pub mod task;

pub use payload::*;
pub use refresher::*;
pub use source::*;
pub use task::*;
