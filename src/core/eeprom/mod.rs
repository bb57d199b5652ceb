//! EEPROM emulation on erase-block flash
//!
//! Flash can only clear bits when programming and only reset them by
//! erasing a whole block. This module stores named 32-bit values on such
//! memory by appending `(key, payload)` records to a log region:
//!
//! - **init** scans for the first erased slot to find the write cursor
//! - **write** programs a record at the cursor and advances it
//! - **read** scans backward from the cursor; the newest record wins
//! - **format** erases the region; a full region is handled according to
//!   the configured [`OverflowPolicy`]
//!
//! # Region Layout
//!
//! ```text
//! slot 0   [key u32 LE][payload u32 LE]   oldest
//! slot 1   [key u32 LE][payload u32 LE]
//! ...
//! cursor   [FFFFFFFF  ][FFFFFFFF      ]   first erased slot
//! ...
//! slot N-1 [FFFFFFFF  ][FFFFFFFF      ]
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod region;
pub mod store;

pub use config::{EepromConfig, OverflowPolicy, DEFAULT_BASE_ADDRESS, DEFAULT_REGION_SIZE};
pub use error::{EepromError, Result, Status};
pub use record::{pack_f32, unpack_f32, Record, ERASED_WORD};
pub use region::Region;
pub use store::{EepromStats, EepromStore, MAX_COMPACT_KEYS};
