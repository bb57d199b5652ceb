//! Region placement and overflow behavior
//!
//! The region is provisioned once: a fixed base address and size that
//! cover whole erase blocks of the device.

use super::error::{EepromError, Result};
use super::record::Record;

/// Default region base address (256 KB, just past the firmware image)
pub const DEFAULT_BASE_ADDRESS: u32 = 0x040000;

/// Default region size (one 4 KB block)
pub const DEFAULT_REGION_SIZE: u32 = 4096;

/// What a write does when every slot in the region is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverflowPolicy {
    /// Erase the region and discard every key, then write
    #[default]
    EraseAll,
    /// Keep the latest value of each key across the erase, then write
    Compact,
    /// Fail the write with [`EepromError::Full`]
    Reject,
}

/// EEPROM region configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EepromConfig {
    /// Device address of the first slot (block-aligned)
    pub base_address: u32,
    /// Region size in bytes (whole blocks)
    pub region_size: u32,
    pub overflow_policy: OverflowPolicy,
}

impl Default for EepromConfig {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDRESS,
            region_size: DEFAULT_REGION_SIZE,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl EepromConfig {
    pub fn new(base_address: u32, region_size: u32) -> Self {
        Self {
            base_address,
            region_size,
            overflow_policy: OverflowPolicy::default(),
        }
    }

    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Number of record slots in the region
    pub fn slot_count(&self) -> u32 {
        self.region_size / Record::SIZE as u32
    }

    /// Check the region against a device's block size and capacity
    ///
    /// # Errors
    ///
    /// Returns [`EepromError::InvalidConfig`] if the region is empty, not
    /// made of whole records and whole blocks, unaligned, or extends past
    /// the end of the device.
    pub fn validate(&self, block_size: u32, capacity: u32) -> Result<()> {
        if self.region_size == 0 || block_size == 0 {
            return Err(EepromError::InvalidConfig);
        }

        if self.region_size % Record::SIZE as u32 != 0
            || self.region_size % block_size != 0
            || self.base_address % block_size != 0
        {
            return Err(EepromError::InvalidConfig);
        }

        match self.base_address.checked_add(self.region_size) {
            Some(end) if end <= capacity => Ok(()),
            _ => Err(EepromError::InvalidConfig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EepromConfig::default();
        assert_eq!(config.base_address, 0x040000);
        assert_eq!(config.slot_count(), 512);
        assert_eq!(config.overflow_policy, OverflowPolicy::EraseAll);
        assert!(config.validate(4096, 4 * 1024 * 1024).is_ok());
    }

    #[test]
    fn test_overflow_policy_builder() {
        let config = EepromConfig::new(0x080000, 8192).with_overflow_policy(OverflowPolicy::Reject);
        assert_eq!(config.overflow_policy, OverflowPolicy::Reject);
        assert_eq!(config.slot_count(), 1024);
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let capacity = 1024 * 1024;

        // Empty region
        assert_eq!(
            EepromConfig::new(0x040000, 0).validate(4096, capacity),
            Err(EepromError::InvalidConfig)
        );
        // Partial block
        assert!(EepromConfig::new(0x040000, 2048).validate(4096, capacity).is_err());
        // Unaligned base
        assert!(EepromConfig::new(0x040800, 4096).validate(4096, capacity).is_err());
        // Past end of device
        assert!(EepromConfig::new(capacity, 4096).validate(4096, capacity).is_err());
        // Address overflow
        assert!(EepromConfig::new(0xFFFF_F000, 8192).validate(4096, u32::MAX).is_err());
        // Small blocks are fine as long as records fit
        assert!(EepromConfig::new(0x000400, 1024).validate(1024, capacity).is_ok());
    }
}
