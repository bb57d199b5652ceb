//! EEPROM error types
//!
//! Provides error types for EEPROM emulation operations and the coarse
//! status taxonomy callers can map results onto.

use crate::platform::{FlashError, PlatformError};
use core::fmt;

/// Result type for EEPROM operations
pub type Result<T> = core::result::Result<T, EepromError>;

/// Errors from EEPROM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Operation attempted before `init` or `format`
    NotInitialized,
    /// Key has no current value
    NotFound,
    /// Region has no free slot and the overflow policy refused to make one
    Full,
    /// Key collides with the erased-word pattern
    ReservedKey,
    /// Region placement does not fit the device geometry
    InvalidConfig,
    /// Underlying device failure
    Device(PlatformError),
}

/// Coarse operation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok,
    Error,
    NotFound,
    Full,
}

impl Status {
    /// Collapse an operation result into a status code
    pub fn of<T>(result: &Result<T>) -> Status {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }
}

impl EepromError {
    pub fn status(&self) -> Status {
        match self {
            EepromError::NotFound => Status::NotFound,
            EepromError::Full => Status::Full,
            EepromError::NotInitialized
            | EepromError::ReservedKey
            | EepromError::InvalidConfig
            | EepromError::Device(_) => Status::Error,
        }
    }
}

impl fmt::Display for EepromError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EepromError::NotInitialized => write!(f, "EEPROM not initialized"),
            EepromError::NotFound => write!(f, "key not found"),
            EepromError::Full => write!(f, "EEPROM region full"),
            EepromError::ReservedKey => write!(f, "key is reserved"),
            EepromError::InvalidConfig => write!(f, "invalid EEPROM region configuration"),
            EepromError::Device(e) => write!(f, "device error: {}", e),
        }
    }
}

impl From<PlatformError> for EepromError {
    fn from(error: PlatformError) -> Self {
        EepromError::Device(error)
    }
}

impl From<FlashError> for EepromError {
    fn from(error: FlashError) -> Self {
        EepromError::Device(PlatformError::Flash(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Status::of::<u32>(&Ok(7)), Status::Ok);
        assert_eq!(Status::of::<u32>(&Err(EepromError::NotFound)), Status::NotFound);
        assert_eq!(Status::of::<()>(&Err(EepromError::Full)), Status::Full);
        assert_eq!(Status::of::<()>(&Err(EepromError::NotInitialized)), Status::Error);
        assert_eq!(
            Status::of::<()>(&Err(FlashError::WriteFailed.into())),
            Status::Error
        );
    }

    #[test]
    fn test_display() {
        let err = EepromError::from(FlashError::EraseFailed);
        assert_eq!(err.to_string(), "device error: Flash error: erase failed");
        assert_eq!(EepromError::Full.to_string(), "EEPROM region full");
    }
}
