//! Persisted application parameters
//!
//! This module maps the application's named values onto EEPROM keys.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │   Display / control loop                │
//! │  (reads calibration at startup)         │
//! └──────────────┬─────────────────────────┘
//!                │
//!                ▼
//! ┌────────────────────────────────────────┐
//! │        ThermostatParams                 │
//! │  - Typed values with defaults           │
//! └──────────────┬─────────────────────────┘
//!                │
//!                ▼
//! ┌────────────────────────────────────────┐
//! │         EepromStore                     │
//! │  (append-only record log)               │
//! └────────────────────────────────────────┘
//! ```

pub mod thermostat;

pub use thermostat::{
    last_temperature, record_boot, store_last_temperature, ThermostatParams, VarId,
    FIRST_USER_KEY,
};
