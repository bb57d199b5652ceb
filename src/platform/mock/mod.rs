//! Mock platform implementation for testing
//!
//! Provides an in-memory flash device so the EEPROM emulation can be
//! exercised on the host.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

#![cfg(any(test, feature = "mock"))]

pub mod flash;

pub use flash::MockFlash;
