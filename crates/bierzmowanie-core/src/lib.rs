//! Core types and trait definitions for the parish confirmation registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the HTTP server both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod address;
pub mod candidate;
pub mod credential;
pub mod error;
pub mod input;
pub mod role;
pub mod store;
pub mod username;

pub use error::{Classify, Error, ErrorClass, Result};
pub use role::Role;
