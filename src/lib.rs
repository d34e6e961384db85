//! Group Trips - shared trip coordination service
//!
//! Friends join a trip with a six-character invite code, record shared
//! expenses split equally across members, and vote places up or down. The
//! trip leader can lock a trip to freeze membership, expenses and polls.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
