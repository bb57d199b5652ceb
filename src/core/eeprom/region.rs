//! Slot-level access to the log region
//!
//! [`Region`] knows where slots live on the device and how to scan, read,
//! program and erase them. It holds no cursor; [`EepromStore`] owns that.
//!
//! [`EepromStore`]: super::store::EepromStore

use super::config::EepromConfig;
use super::error::{EepromError, Result};
use super::record::{Record, ERASED_WORD};
use crate::platform::FlashInterface;

/// Geometry of the log region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    base_address: u32,
    size: u32,
    capacity: u32,
}

impl Region {
    pub fn new(config: &EepromConfig) -> Self {
        Self {
            base_address: config.base_address,
            size: config.region_size,
            capacity: config.slot_count(),
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Device address of a slot
    pub fn slot_address(&self, slot: u32) -> u32 {
        self.base_address + slot * Record::SIZE as u32
    }

    pub fn read_slot<F: FlashInterface>(&self, flash: &mut F, slot: u32) -> Result<Record> {
        let mut buf = [0u8; Record::SIZE];
        flash.read(self.slot_address(slot), &mut buf)?;
        Ok(Record::from_bytes(&buf))
    }

    /// Index of the first erased slot, or `capacity` if every slot is used
    pub fn find_first_free<F: FlashInterface>(&self, flash: &mut F) -> Result<u32> {
        for slot in 0..self.capacity {
            if self.read_slot(flash, slot)?.is_erased() {
                return Ok(slot);
            }
        }
        Ok(self.capacity)
    }

    /// Payload of the newest record for `key` among slots `0..end`
    ///
    /// Slots are visited newest first, so the first match is the current
    /// value. The erased word is never a valid key.
    pub fn find_latest<F: FlashInterface>(
        &self,
        flash: &mut F,
        key: u32,
        end: u32,
    ) -> Result<Option<u32>> {
        if key == ERASED_WORD {
            return Ok(None);
        }

        for slot in (0..end.min(self.capacity)).rev() {
            let record = self.read_slot(flash, slot)?;
            if record.key == key {
                return Ok(Some(record.payload));
            }
        }
        Ok(None)
    }

    /// Latest record of every distinct key among slots `0..end`
    ///
    /// Records come back oldest first. Fails with [`EepromError::Full`] if
    /// more than `N` distinct keys are present.
    pub fn collect_latest<F: FlashInterface, const N: usize>(
        &self,
        flash: &mut F,
        end: u32,
    ) -> Result<heapless::Vec<Record, N>> {
        let mut live = heapless::Vec::<Record, N>::new();

        for slot in (0..end.min(self.capacity)).rev() {
            let record = self.read_slot(flash, slot)?;
            if record.key == ERASED_WORD || live.iter().any(|r| r.key == record.key) {
                continue;
            }
            live.push(record).map_err(|_| EepromError::Full)?;
        }

        live.reverse();
        Ok(live)
    }

    /// Program a record into an erased slot
    ///
    /// The key word is programmed first, then the payload word. If the key
    /// program fails the payload is not attempted.
    pub fn program_slot<F: FlashInterface>(
        &self,
        flash: &mut F,
        slot: u32,
        record: &Record,
    ) -> Result<()> {
        flash.write(self.slot_address(slot), &record.key_bytes())?;
        self.program_payload(flash, slot, record)
    }

    /// Program only the payload word of a slot
    pub fn program_payload<F: FlashInterface>(
        &self,
        flash: &mut F,
        slot: u32,
        record: &Record,
    ) -> Result<()> {
        let address = self.slot_address(slot) + Record::PAYLOAD_OFFSET;
        flash.write(address, &record.payload_bytes())?;
        Ok(())
    }

    /// Erase every block of the region
    pub fn erase<F: FlashInterface>(&self, flash: &mut F) -> Result<()> {
        flash.erase(self.base_address, self.size)?;
        Ok(())
    }
}
