//! config-stubs CLI library exports for integration testing.
//!
//! This module exposes command implementations for use in integration tests.

pub mod commands;
pub mod config;
pub mod errors;

#[cfg(test)]
pub(crate) mod test_support;
