//! EEPROM emulation store
//!
//! Turns one erase-block region of flash into key/value storage by
//! appending fixed-size records and resolving each key to its newest
//! record.

use super::config::{EepromConfig, OverflowPolicy};
use super::error::{EepromError, Result};
use super::record::{pack_f32, unpack_f32, Record, ERASED_WORD};
use super::region::Region;
use crate::platform::FlashInterface;

/// Maximum number of distinct keys carried across a compaction
pub const MAX_COMPACT_KEYS: usize = 64;

/// Counters for wear and failure monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EepromStats {
    /// Records committed since the store was created
    pub writes: u32,
    /// Region erases attempted (explicit and on overflow)
    pub erases: u32,
    /// Successful compactions
    pub compactions: u32,
    /// Partially programmed slots found by the writer or at init
    pub torn_slots: u32,
}

/// EEPROM emulation over a flash region
///
/// Owns the device and the write cursor. Every slot below the cursor holds
/// a committed record and every slot at or above it is erased.
///
/// Operations need `&mut self`; callers sharing a store between execution
/// contexts must provide their own mutual exclusion.
///
/// # Example
///
/// ```
/// use flash_eeprom::core::eeprom::{EepromConfig, EepromStore};
/// use flash_eeprom::platform::mock::MockFlash;
///
/// let mut store = EepromStore::new(MockFlash::new(), EepromConfig::default()).unwrap();
/// store.init().unwrap();
///
/// store.write_f32(0, 21.5).unwrap();
/// assert_eq!(store.read_f32(0).unwrap(), 21.5);
/// ```
pub struct EepromStore<F: FlashInterface> {
    flash: F,
    config: EepromConfig,
    region: Region,
    /// Next slot to program
    cursor: u32,
    initialized: bool,
    stats: EepromStats,
}

impl<F: FlashInterface> EepromStore<F> {
    /// Create a store over `flash`
    ///
    /// The store must be initialized with [`init`](Self::init) or
    /// [`format`](Self::format) before reads and writes succeed.
    ///
    /// # Errors
    ///
    /// Returns [`EepromError::InvalidConfig`] if the region does not fit the
    /// device geometry.
    pub fn new(flash: F, config: EepromConfig) -> Result<Self> {
        config.validate(flash.block_size(), flash.capacity())?;

        Ok(Self {
            flash,
            config,
            region: Region::new(&config),
            cursor: 0,
            initialized: false,
            stats: EepromStats::default(),
        })
    }

    /// Locate the write cursor
    ///
    /// Scans the region for the first erased slot and seals the slot below
    /// it if a reset interrupted its programming. Calling it again once
    /// initialized does nothing.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.cursor = self.region.find_first_free(&mut self.flash)?;

        // A reset between key and payload programming leaves the last used
        // slot with an erased payload
        if self.cursor > 0 {
            let last = self.cursor - 1;
            let record = self.region.read_slot(&mut self.flash, last)?;
            if record.key != ERASED_WORD && record.payload == ERASED_WORD {
                self.seal_torn_slot(last, record);
            }
        }
        self.initialized = true;

        crate::log_info!(
            "EEPROM ready: {} of {} slots used",
            self.cursor,
            self.region.capacity()
        );
        Ok(())
    }

    /// Append a record for `key`
    ///
    /// If the region is full, the configured [`OverflowPolicy`] runs first.
    /// On failure the cursor is not advanced, so the key keeps resolving to
    /// its previous value.
    ///
    /// # Errors
    ///
    /// - [`EepromError::NotInitialized`] before `init`
    /// - [`EepromError::ReservedKey`] for the erased-word key
    /// - [`EepromError::Full`] if the overflow policy could not free a slot
    /// - [`EepromError::Device`] if programming or erasing failed
    pub fn write_u32(&mut self, key: u32, value: u32) -> Result<()> {
        self.ensure_initialized()?;
        if key == ERASED_WORD {
            return Err(EepromError::ReservedKey);
        }

        let slot = self.reserve_slot()?;
        let record = Record::new(key, value);

        if let Err(e) = self.region.program_slot(&mut self.flash, slot, &record) {
            crate::log_error!("EEPROM write of key {} at slot {} failed: {}", key, slot, e);
            return Err(e);
        }

        self.cursor = slot + 1;
        self.stats.writes += 1;
        crate::log_trace!("EEPROM key {} -> {:#x} at slot {}", key, value, slot);
        Ok(())
    }

    /// Current value of `key`
    ///
    /// # Errors
    ///
    /// - [`EepromError::NotInitialized`] before `init`
    /// - [`EepromError::NotFound`] if no committed record carries `key`
    /// - [`EepromError::Device`] if reading failed
    pub fn read_u32(&mut self, key: u32) -> Result<u32> {
        self.ensure_initialized()?;

        self.region
            .find_latest(&mut self.flash, key, self.cursor)?
            .ok_or(EepromError::NotFound)
    }

    /// Store an `f32` by its exact bit pattern
    pub fn write_f32(&mut self, key: u32, value: f32) -> Result<()> {
        self.write_u32(key, pack_f32(value))
    }

    /// Read a value stored with [`write_f32`](Self::write_f32)
    pub fn read_f32(&mut self, key: u32) -> Result<f32> {
        self.read_u32(key).map(unpack_f32)
    }

    /// Erase the whole region
    ///
    /// Every key is lost. The store counts as initialized afterwards even
    /// if the device reported a failure; in that case the cursor is
    /// re-established from what is left on the device.
    pub fn format(&mut self) -> Result<()> {
        self.stats.erases += 1;
        self.initialized = true;

        match self.region.erase(&mut self.flash) {
            Ok(()) => {
                self.cursor = 0;
                crate::log_info!("EEPROM region erased");
                Ok(())
            }
            Err(e) => {
                crate::log_error!("EEPROM erase failed: {}", e);
                self.cursor = self
                    .region
                    .find_first_free(&mut self.flash)
                    .unwrap_or(self.region.capacity());
                Err(e)
            }
        }
    }

    /// Index of the next slot to be written
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Number of slots in the region
    pub fn capacity(&self) -> u32 {
        self.region.capacity()
    }

    /// Slots left before the overflow policy runs
    pub fn free_slots(&self) -> u32 {
        self.region.capacity() - self.cursor
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &EepromConfig {
        &self.config
    }

    pub fn stats(&self) -> EepromStats {
        self.stats
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    /// Release the device
    pub fn into_inner(self) -> F {
        self.flash
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(EepromError::NotInitialized)
        }
    }

    /// Find the erased slot the next record goes into
    ///
    /// Runs the overflow policy at most once. Slots left partially
    /// programmed by an earlier failed write are skipped, since programming
    /// over them would merge old and new bits.
    fn reserve_slot(&mut self) -> Result<u32> {
        let mut overflow_handled = false;

        loop {
            if self.cursor >= self.region.capacity() {
                if overflow_handled {
                    return Err(EepromError::Full);
                }
                self.handle_overflow()?;
                overflow_handled = true;
                continue;
            }

            let slot = self.cursor;
            let record = self.region.read_slot(&mut self.flash, slot)?;
            if record.is_erased() {
                return Ok(slot);
            }

            self.seal_torn_slot(slot, record);
            self.cursor += 1;
        }
    }

    fn handle_overflow(&mut self) -> Result<()> {
        match self.config.overflow_policy {
            OverflowPolicy::EraseAll => {
                crate::log_warn!(
                    "EEPROM region full ({} slots), erasing all keys",
                    self.region.capacity()
                );
                self.format()
            }
            OverflowPolicy::Compact => self.compact(),
            OverflowPolicy::Reject => {
                crate::log_warn!("EEPROM region full, write rejected");
                Err(EepromError::Full)
            }
        }
    }

    /// Erase the region and rewrite the latest value of every key
    ///
    /// Nothing is erased if the live set cannot be held in RAM or would
    /// leave no free slot. Live records are only held in RAM between the
    /// erase and the rewrite.
    fn compact(&mut self) -> Result<()> {
        let live: heapless::Vec<Record, MAX_COMPACT_KEYS> =
            match self.region.collect_latest(&mut self.flash, self.cursor) {
                Ok(live) => live,
                Err(EepromError::Full) => {
                    crate::log_warn!(
                        "EEPROM compaction skipped: more than {} keys",
                        MAX_COMPACT_KEYS
                    );
                    return Err(EepromError::Full);
                }
                Err(e) => return Err(e),
            };

        if live.len() as u32 >= self.region.capacity() {
            crate::log_warn!("EEPROM compaction would not free any slot");
            return Err(EepromError::Full);
        }

        self.format()?;

        for record in &live {
            let slot = self.cursor;
            if let Err(e) = self.region.program_slot(&mut self.flash, slot, record) {
                crate::log_error!(
                    "EEPROM compaction lost key {} at slot {}: {}",
                    record.key,
                    slot,
                    e
                );
                return Err(e);
            }
            self.cursor += 1;
        }

        self.stats.compactions += 1;
        crate::log_info!("EEPROM compacted to {} live keys", live.len());
        Ok(())
    }

    /// Make a partially programmed slot harmless
    ///
    /// If only the key word landed and that key has an older record, the
    /// older payload is programmed into the still-erased payload word so the
    /// slot repeats the key's current value. Otherwise the slot is left as is.
    fn seal_torn_slot(&mut self, slot: u32, torn: Record) {
        self.stats.torn_slots += 1;
        crate::log_warn!(
            "EEPROM slot {} holds a torn record (key {:#x})",
            slot,
            torn.key
        );

        if torn.payload != ERASED_WORD {
            return;
        }

        match self.region.find_latest(&mut self.flash, torn.key, slot) {
            Ok(Some(previous)) => {
                let sealed = Record::new(torn.key, previous);
                if let Err(e) = self.region.program_payload(&mut self.flash, slot, &sealed) {
                    crate::log_warn!("EEPROM could not seal slot {}: {}", slot, e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                crate::log_warn!("EEPROM could not seal slot {}: {}", slot, e);
            }
        }
    }
}
