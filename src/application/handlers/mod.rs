//! Command and query handlers.
//!
//! Each handler authorizes through `TripGate`, applies domain rules, and
//! delegates persistence to the ports.

pub mod expense;
pub mod poll;
pub mod trip;

#[cfg(test)]
pub(crate) mod testing;

pub use expense::*;
pub use poll::*;
pub use trip::*;
