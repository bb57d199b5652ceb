//! Thermostat Parameter Definitions
//!
//! Two independent setpoints with hysteresis bands, the last measured
//! temperature and a boot counter.
//!
//! # Keys
//!
//! | Id | Value | Type |
//! |----|-------|------|
//! | 0 | Setpoint 1 | f32 |
//! | 1 | Setpoint 2 | f32 |
//! | 2 | Hysteresis 1 | f32 |
//! | 3 | Hysteresis 2 | f32 |
//! | 4 | Last temperature | f32 |
//! | 5 | Boot count | u32 |

use crate::core::eeprom::{EepromError, EepromStore, Result};
use crate::platform::FlashInterface;

/// EEPROM key of each persisted variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VarId {
    Setpoint1 = 0,
    Setpoint2 = 1,
    Hysteresis1 = 2,
    Hysteresis2 = 3,
    LastTemp = 4,
    BootCount = 5,
}

/// First key free for application-specific values
pub const FIRST_USER_KEY: u32 = 6;

impl VarId {
    pub fn key(self) -> u32 {
        self as u32
    }
}

impl From<VarId> for u32 {
    fn from(id: VarId) -> Self {
        id.key()
    }
}

/// Thermostat calibration loaded from EEPROM
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermostatParams {
    /// Channel 1 setpoint (°C)
    pub setpoint1: f32,
    /// Channel 2 setpoint (°C)
    pub setpoint2: f32,
    /// Channel 1 hysteresis band (°C)
    pub hysteresis1: f32,
    /// Channel 2 hysteresis band (°C)
    pub hysteresis2: f32,
}

impl Default for ThermostatParams {
    fn default() -> Self {
        Self {
            setpoint1: 25.0,
            setpoint2: 30.0,
            hysteresis1: 0.5,
            hysteresis2: 0.5,
        }
    }
}

impl ThermostatParams {
    /// Load calibration from the store
    ///
    /// Only reads. Each value missing from the store, or unreadable, falls
    /// back to its built-in default.
    pub fn from_store<F: FlashInterface>(store: &mut EepromStore<F>) -> Self {
        let defaults = Self::default();

        Self {
            setpoint1: load_f32(store, VarId::Setpoint1, defaults.setpoint1),
            setpoint2: load_f32(store, VarId::Setpoint2, defaults.setpoint2),
            hysteresis1: load_f32(store, VarId::Hysteresis1, defaults.hysteresis1),
            hysteresis2: load_f32(store, VarId::Hysteresis2, defaults.hysteresis2),
        }
    }

    /// Persist all four values
    pub fn save<F: FlashInterface>(&self, store: &mut EepromStore<F>) -> Result<()> {
        store.write_f32(VarId::Setpoint1.key(), self.setpoint1)?;
        store.write_f32(VarId::Setpoint2.key(), self.setpoint2)?;
        store.write_f32(VarId::Hysteresis1.key(), self.hysteresis1)?;
        store.write_f32(VarId::Hysteresis2.key(), self.hysteresis2)?;
        Ok(())
    }

    /// Check that both hysteresis bands are usable
    pub fn is_valid(&self) -> bool {
        self.hysteresis1 >= 0.0 && self.hysteresis2 >= 0.0
    }
}

fn load_f32<F: FlashInterface>(store: &mut EepromStore<F>, id: VarId, default: f32) -> f32 {
    match store.read_f32(id.key()) {
        Ok(value) => value,
        Err(EepromError::NotFound) => default,
        Err(e) => {
            crate::log_warn!("Reading key {} failed ({}), using default", id.key(), e);
            default
        }
    }
}

/// Increment the persisted boot counter and return the new count
pub fn record_boot<F: FlashInterface>(store: &mut EepromStore<F>) -> Result<u32> {
    let count = match store.read_u32(VarId::BootCount.key()) {
        Ok(count) => count.wrapping_add(1),
        Err(EepromError::NotFound) => 1,
        Err(e) => return Err(e),
    };

    store.write_u32(VarId::BootCount.key(), count)?;
    crate::log_info!("Boot #{}", count);
    Ok(count)
}

pub fn store_last_temperature<F: FlashInterface>(
    store: &mut EepromStore<F>,
    celsius: f32,
) -> Result<()> {
    store.write_f32(VarId::LastTemp.key(), celsius)
}

/// Last persisted temperature, if any
pub fn last_temperature<F: FlashInterface>(store: &mut EepromStore<F>) -> Option<f32> {
    store.read_f32(VarId::LastTemp.key()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::eeprom::EepromConfig;
    use crate::platform::mock::MockFlash;

    fn ready_store() -> EepromStore<MockFlash> {
        let mut store = EepromStore::new(MockFlash::new(), EepromConfig::default()).unwrap();
        store.init().unwrap();
        store
    }

    #[test]
    fn test_var_id_keys() {
        assert_eq!(VarId::Setpoint1.key(), 0);
        assert_eq!(u32::from(VarId::BootCount), 5);
        assert!(FIRST_USER_KEY > VarId::BootCount.key());
    }

    #[test]
    fn test_params_default_on_empty_store() {
        let mut store = ready_store();
        let params = ThermostatParams::from_store(&mut store);
        assert_eq!(params, ThermostatParams::default());
        assert!(params.is_valid());
        // Loading never writes
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn test_params_partial_store() {
        let mut store = ready_store();
        store.write_f32(VarId::Setpoint2.key(), 42.5).unwrap();

        let params = ThermostatParams::from_store(&mut store);
        assert_eq!(params.setpoint1, 25.0);
        assert_eq!(params.setpoint2, 42.5);
    }

    #[test]
    fn test_params_save_and_load() {
        let mut store = ready_store();
        let params = ThermostatParams {
            setpoint1: 18.25,
            setpoint2: 22.75,
            hysteresis1: 1.5,
            hysteresis2: 0.25,
        };
        params.save(&mut store).unwrap();

        assert_eq!(ThermostatParams::from_store(&mut store), params);
    }

    #[test]
    fn test_params_default_when_uninitialized() {
        let mut store = EepromStore::new(MockFlash::new(), EepromConfig::default()).unwrap();
        assert_eq!(
            ThermostatParams::from_store(&mut store),
            ThermostatParams::default()
        );
    }

    #[test]
    fn test_invalid_hysteresis() {
        let params = ThermostatParams {
            hysteresis2: -1.0,
            ..ThermostatParams::default()
        };
        assert!(!params.is_valid());
    }

    #[test]
    fn test_record_boot_counts_up() {
        let mut store = ready_store();
        assert_eq!(record_boot(&mut store), Ok(1));
        assert_eq!(record_boot(&mut store), Ok(2));
        assert_eq!(record_boot(&mut store), Ok(3));
        assert_eq!(store.read_u32(VarId::BootCount.key()), Ok(3));
    }

    #[test]
    fn test_last_temperature() {
        let mut store = ready_store();
        assert_eq!(last_temperature(&mut store), None);
        store_last_temperature(&mut store, 23.5).unwrap();
        assert_eq!(last_temperature(&mut store), Some(23.5));
    }
}
