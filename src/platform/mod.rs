//! Platform abstraction layer
//!
//! The EEPROM emulation never touches memory-mapped storage directly; it
//! consumes a [`FlashInterface`] supplied by the board support code.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{FlashError, PlatformError, Result};
pub use traits::FlashInterface;
