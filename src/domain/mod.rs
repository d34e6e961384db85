//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `trip` - Trip aggregate, lock lifecycle, invite codes, membership
//! - `expense` - Shared expense ledger and equal-split balances
//! - `poll` - Place suggestions and up/down voting

pub mod expense;
pub mod foundation;
pub mod poll;
pub mod trip;
