//! Driver Factories
//!
//! **ARCHITECTURE**: This module contains ONLY wiring logic.
//! No concrete implementations - those are in mqb-providers.

pub mod drivers;

pub use drivers::MessageDriverFactory;
