//! Mock Flash implementation for testing
//!
//! Provides in-memory Flash simulation for unit and integration tests.

use crate::platform::{error::FlashError, traits::FlashInterface, PlatformError, Result};
use std::vec::Vec;

/// Flash block size (4 KB)
pub const BLOCK_SIZE: u32 = 4096;

/// Flash capacity (4 MB)
pub const FLASH_CAPACITY: u32 = 4 * 1024 * 1024;

/// Protected firmware area at the start of Flash (256 KB)
pub const FIRMWARE_SIZE: u32 = 0x40000;

/// Mock Flash implementation
///
/// Simulates NOR Flash in memory. Supports:
/// - Read/program/erase with 1→0 programming semantics
/// - Erase and program counters
/// - Fault injection: failed writes, failed erases, power loss, corruption
///
/// # Example
///
/// ```
/// use flash_eeprom::platform::mock::MockFlash;
/// use flash_eeprom::platform::traits::FlashInterface;
///
/// let mut flash = MockFlash::new();
///
/// flash.erase(0x040000, 4096).unwrap();
/// flash.write(0x040000, &[0x12, 0x34]).unwrap();
///
/// let mut buf = [0u8; 2];
/// flash.read(0x040000, &mut buf).unwrap();
/// assert_eq!(buf, [0x12, 0x34]);
/// assert_eq!(flash.get_erase_count(0x040000), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockFlash {
    /// Flash storage (initialized to 0xFF - erased state)
    storage: Vec<u8>,
    /// Erase count per block
    erase_counts: Vec<u32>,
    /// Number of successful write calls
    write_count: u32,
    block_size: u32,
    /// Bytes below this address refuse write/erase
    protected: u32,
    /// Next write only half-completes
    power_loss: bool,
    /// Remaining successful writes before an injected failure
    fail_write_after: Option<u32>,
    /// Next erase fails without touching memory
    fail_next_erase: bool,
}

impl MockFlash {
    /// Create a 4 MB device with 4 KB blocks and a protected firmware area
    pub fn new() -> Self {
        Self::build(FLASH_CAPACITY, BLOCK_SIZE, FIRMWARE_SIZE)
    }

    /// Create a device with a custom layout
    ///
    /// `capacity` must be a non-zero multiple of `block_size`, and
    /// `protected` must not exceed `capacity`.
    pub fn with_geometry(capacity: u32, block_size: u32, protected: u32) -> Result<Self> {
        if block_size == 0 || capacity == 0 || capacity % block_size != 0 || protected > capacity
        {
            return Err(PlatformError::InvalidConfig);
        }
        Ok(Self::build(capacity, block_size, protected))
    }

    fn build(capacity: u32, block_size: u32, protected: u32) -> Self {
        Self {
            storage: vec![0xFF; capacity as usize],
            erase_counts: vec![0; (capacity / block_size) as usize],
            write_count: 0,
            block_size,
            protected,
            power_loss: false,
            fail_write_after: None,
            fail_next_erase: false,
        }
    }

    /// Get Flash contents (for test verification)
    pub fn get_contents(&self, address: u32, len: usize) -> Vec<u8> {
        self.storage[address as usize..(address as usize + len)].to_vec()
    }

    /// Overwrite bytes with a fixed pattern, bypassing programming rules
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        for byte in &mut self.storage[address as usize..address as usize + len] {
            *byte = 0xAA;
        }
    }

    /// Number of times the block containing `address` has been erased
    pub fn get_erase_count(&self, address: u32) -> u32 {
        self.erase_counts[(address / self.block_size) as usize]
    }

    /// Total erase count across all blocks
    pub fn get_total_erase_count(&self) -> u32 {
        self.erase_counts.iter().sum()
    }

    /// Number of write calls that reached the storage
    pub fn get_write_count(&self) -> u32 {
        self.write_count
    }

    /// Simulate power loss during the next write
    ///
    /// Only the first half of the next write's bytes are programmed, and
    /// the call still reports success, as a reset would give the caller no
    /// chance to observe the failure.
    pub fn simulate_power_loss(&mut self) {
        self.power_loss = true;
    }

    /// Let `successes` writes through, then fail the following one
    ///
    /// The failing write leaves memory untouched. The injection is one-shot.
    pub fn fail_write_after(&mut self, successes: u32) {
        self.fail_write_after = Some(successes);
    }

    /// Fail the next erase without modifying memory
    pub fn fail_next_erase(&mut self) {
        self.fail_next_erase = true;
    }

    fn is_writable(&self, address: u32) -> bool {
        (self.protected..self.capacity()).contains(&address)
    }

    fn in_bounds(&self, address: u32, len: usize) -> bool {
        address as usize + len <= self.storage.len()
    }

    /// Consume the pending write fault, returning true if this write fails
    fn take_write_fault(&mut self) -> bool {
        match self.fail_write_after {
            Some(0) => {
                self.fail_write_after = None;
                true
            }
            Some(n) => {
                self.fail_write_after = Some(n - 1);
                false
            }
            None => false,
        }
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if !self.in_bounds(address, buf.len()) {
            return Err(FlashError::InvalidAddress.into());
        }

        let start = address as usize;
        buf.copy_from_slice(&self.storage[start..start + buf.len()]);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if !self.is_writable(address) || !self.in_bounds(address, data.len()) {
            return Err(FlashError::InvalidAddress.into());
        }

        if self.take_write_fault() {
            return Err(FlashError::WriteFailed.into());
        }

        let write_len = if self.power_loss {
            self.power_loss = false;
            data.len() / 2
        } else {
            data.len()
        };

        // Flash can only change bits from 1→0
        let start = address as usize;
        for (cell, byte) in self.storage[start..start + write_len].iter_mut().zip(data) {
            *cell &= *byte;
        }
        self.write_count += 1;

        Ok(())
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        if !self.is_writable(address)
            || address % self.block_size != 0
            || size % self.block_size != 0
            || !self.in_bounds(address, size as usize)
        {
            return Err(FlashError::InvalidAddress.into());
        }

        if self.fail_next_erase {
            self.fail_next_erase = false;
            return Err(FlashError::EraseFailed.into());
        }

        let start = address as usize;
        self.storage[start..start + size as usize].fill(0xFF);

        let first_block = (address / self.block_size) as usize;
        let block_count = (size / self.block_size) as usize;
        for count in &mut self.erase_counts[first_block..first_block + block_count] {
            *count += 1;
        }

        Ok(())
    }

    fn block_size(&self) -> u32 {
        self.block_size
    }

    fn capacity(&self) -> u32 {
        self.storage.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_flash_read_write() {
        let mut flash = MockFlash::new();
        flash.erase(0x040000, 4096).unwrap();

        let data = [0x50, 0x41, 0x52, 0x41];
        flash.write(0x040000, &data).unwrap();

        let mut buf = [0u8; 4];
        flash.read(0x040000, &mut buf).unwrap();
        assert_eq!(buf, data);
        assert_eq!(flash.get_write_count(), 1);
    }

    #[test]
    fn test_mock_flash_erase() {
        let mut flash = MockFlash::new();
        flash.write(0x040000, &[0x55; 256]).unwrap();

        flash.erase(0x040000, 4096).unwrap();

        let contents = flash.get_contents(0x040000, 256);
        assert!(contents.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_mock_flash_erase_count() {
        let mut flash = MockFlash::new();
        flash.erase(0x040000, 4096).unwrap();
        flash.erase(0x040000, 8192).unwrap();

        assert_eq!(flash.get_erase_count(0x040000), 2);
        assert_eq!(flash.get_erase_count(0x041000), 1);
        assert_eq!(flash.get_total_erase_count(), 3);
    }

    #[test]
    fn test_mock_flash_invalid_address() {
        let mut flash = MockFlash::new();

        // Firmware area is protected
        assert!(flash.write(0x000000, &[0x00; 4]).is_err());
        assert!(flash.erase(0x000000, 4096).is_err());

        let mut buf = [0u8; 4];
        assert!(flash.read(FLASH_CAPACITY, &mut buf).is_err());
        assert!(flash.read(FLASH_CAPACITY - 2, &mut buf).is_err());
    }

    #[test]
    fn test_mock_flash_unaligned_erase() {
        let mut flash = MockFlash::new();
        assert!(flash.erase(0x040100, 4096).is_err());
        assert!(flash.erase(0x040000, 1024).is_err());
    }

    #[test]
    fn test_mock_flash_power_loss() {
        let mut flash = MockFlash::new();
        flash.simulate_power_loss();
        flash.write(0x040000, &[0x55; 256]).unwrap();

        let contents = flash.get_contents(0x040000, 256);
        assert_eq!(&contents[..128], &[0x55; 128]);
        assert_eq!(&contents[128..], &[0xFF; 128]);

        // One-shot
        flash.write(0x040100, &[0x55; 4]).unwrap();
        assert_eq!(flash.get_contents(0x040100, 4), vec![0x55; 4]);
    }

    #[test]
    fn test_mock_flash_write_only_clears_bits() {
        let mut flash = MockFlash::new();

        flash.write(0x040000, &[0x0F]).unwrap();
        flash.write(0x040000, &[0xFF]).unwrap();
        assert_eq!(flash.get_contents(0x040000, 1), vec![0x0F]);

        flash.write(0x040000, &[0x3C]).unwrap();
        assert_eq!(flash.get_contents(0x040000, 1), vec![0x0C]);
    }

    #[test]
    fn test_mock_flash_injected_write_failure() {
        let mut flash = MockFlash::new();
        flash.fail_write_after(1);

        flash.write(0x040000, &[0x00; 4]).unwrap();
        let result = flash.write(0x040004, &[0x00; 4]);
        assert_eq!(result, Err(PlatformError::Flash(FlashError::WriteFailed)));
        assert_eq!(flash.get_contents(0x040004, 4), vec![0xFF; 4]);

        flash.write(0x040004, &[0x00; 4]).unwrap();
        assert_eq!(flash.get_write_count(), 2);
    }

    #[test]
    fn test_mock_flash_injected_erase_failure() {
        let mut flash = MockFlash::new();
        flash.write(0x040000, &[0x00; 4]).unwrap();
        flash.fail_next_erase();

        let result = flash.erase(0x040000, 4096);
        assert_eq!(result, Err(PlatformError::Flash(FlashError::EraseFailed)));
        assert_eq!(flash.get_contents(0x040000, 4), vec![0x00; 4]);
        assert_eq!(flash.get_erase_count(0x040000), 0);

        flash.erase(0x040000, 4096).unwrap();
        assert_eq!(flash.get_contents(0x040000, 4), vec![0xFF; 4]);
    }

    #[test]
    fn test_mock_flash_custom_geometry() {
        let mut flash = MockFlash::with_geometry(8192, 1024, 0).unwrap();
        assert_eq!(flash.block_size(), 1024);
        assert_eq!(flash.capacity(), 8192);
        flash.erase(1024, 1024).unwrap();

        assert!(MockFlash::with_geometry(1000, 1024, 0).is_err());
        assert!(MockFlash::with_geometry(4096, 1024, 8192).is_err());
    }

    #[test]
    fn test_mock_flash_corruption() {
        let mut flash = MockFlash::new();
        flash.inject_corruption(0x040000, 2);
        assert_eq!(flash.get_contents(0x040000, 3), vec![0xAA, 0xAA, 0xFF]);
    }
}
