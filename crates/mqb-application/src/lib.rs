//! Application Layer - mqb
//!
//! Typed publish/subscribe on top of the raw driver port.
//!
//! ## Architecture
//!
//! The application layer:
//! - Converts typed messages to payloads through a `MessageSerializer`
//! - Tracks which driver registration each subscription handle owns
//! - Has no dependencies on concrete transports
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `mqb-domain`: ports, value objects and errors
//! - Pure Rust libraries for serialization, logging and concurrency

pub mod use_cases;

pub use use_cases::*;
