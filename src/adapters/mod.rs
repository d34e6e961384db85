//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed trip store
//! - `memory` - in-process trip store for tests and local development
//! - `auth` - session validators (JWT, mock)
//! - `codes` - invite code sources
//! - `http` - axum routes, DTOs and middleware

pub mod auth;
pub mod codes;
pub mod http;
pub mod memory;
pub mod postgres;
