//! Operators
//!
//! Each operator is a pair: an observable struct holding the upstream and the
//! user function, and a private emitter that wraps the downstream emitter for
//! the duration of one subscription.

pub mod element_at;
pub mod filter;
pub mod map;
pub mod present;
