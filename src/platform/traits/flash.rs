//! Flash interface trait
//!
//! This module defines the raw memory device the EEPROM emulation runs on.

use crate::platform::Result;

/// Flash interface trait
///
/// Platform implementations provide read/program/erase access to raw
/// non-volatile memory.
///
/// # Flash Characteristics
///
/// - Flash is organized in blocks (typically 4 KB)
/// - Erase operations set all bytes to 0xFF
/// - Write operations can only change bits from 1→0 (must erase first to reset to 1)
/// - Operations block until the hardware reports completion or its own timeout
///
/// # Safety Invariants
///
/// - Flash peripheral must be initialized before use
/// - Only one owner per Flash instance (no concurrent access)
/// - Implementations must refuse addresses outside the writable area
pub trait FlashInterface {
    /// Read data from Flash
    ///
    /// Reads `buf.len()` bytes from Flash starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if the range is out of bounds.
    /// Returns `PlatformError::Flash(FlashError::ReadFailed)` if the read operation fails.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Program data into Flash
    ///
    /// Writes `data` starting at `address`. Bits can only be cleared; the
    /// target must have been erased for the stored bytes to equal `data`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if the address is protected.
    /// Returns `PlatformError::Flash(FlashError::WriteFailed)` if programming fails.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase Flash region
    ///
    /// Sets every byte in `address..address + size` to 0xFF. Both `address`
    /// and `size` must be multiples of [`block_size`](Self::block_size).
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` for unaligned or protected ranges.
    /// Returns `PlatformError::Flash(FlashError::EraseFailed)` if the erase operation fails.
    fn erase(&mut self, address: u32, size: u32) -> Result<()>;

    /// Minimum erasable unit size in bytes
    fn block_size(&self) -> u32;

    /// Total Flash capacity in bytes
    fn capacity(&self) -> u32;
}
