//! Core storage functionality
//!
//! This module contains the EEPROM emulation layer and the logging
//! infrastructure it reports through.

pub mod eeprom;
pub mod logging;
