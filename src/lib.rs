#![cfg_attr(not(any(test, feature = "mock")), no_std)]

//! flash_eeprom - EEPROM emulation for erase-block flash
//!
//! Persists a small set of named 32-bit values (calibration setpoints,
//! hysteresis bands, counters) in raw flash by appending fixed-size records
//! to a log region and resolving each key to its newest record.
//!
//! # Modules
//!
//! - [`platform`]: Flash device trait and an in-memory mock (`mock` feature)
//! - [`core`]: EEPROM emulation engine and logging macros
//! - [`parameters`]: Application variables stored through the engine
//!
//! # Features
//!
//! - `mock` (default): in-memory flash device, requires `std`
//! - `defmt`: route log output to defmt
//!
//! Firmware builds use `default-features = false`.

// Platform abstraction layer
pub mod platform;

// Core systems
pub mod core;

// Persisted application values
pub mod parameters;
