//! Log record layout
//!
//! A record is two little-endian 32-bit words:
//!
//! ```text
//! [0..4]  key
//! [4..8]  payload
//! ```
//!
//! A slot whose words are both [`ERASED_WORD`] has never been written since
//! the last erase.

/// Value of a 32-bit word in freshly erased flash
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// One (key, payload) entry in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Record {
    /// Variable identifier
    pub key: u32,
    /// Raw 32-bit value, interpreted by the caller
    pub payload: u32,
}

impl Record {
    /// Serialized size in bytes
    pub const SIZE: usize = 8;

    /// Byte offset of the payload word within a slot
    pub const PAYLOAD_OFFSET: u32 = 4;

    /// The all-ones record produced by erasing flash
    pub const ERASED: Record = Record {
        key: ERASED_WORD,
        payload: ERASED_WORD,
    };

    pub fn new(key: u32, payload: u32) -> Self {
        Self { key, payload }
    }

    /// True if the slot has never been programmed since the last erase
    pub fn is_erased(&self) -> bool {
        *self == Self::ERASED
    }

    /// Key word as programmed at the start of the slot
    pub fn key_bytes(&self) -> [u8; 4] {
        self.key.to_le_bytes()
    }

    /// Payload word as programmed at [`PAYLOAD_OFFSET`](Self::PAYLOAD_OFFSET)
    pub fn payload_bytes(&self) -> [u8; 4] {
        self.payload.to_le_bytes()
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[..4].copy_from_slice(&self.key_bytes());
        bytes[4..].copy_from_slice(&self.payload_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        Self {
            key: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            payload: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

/// Pack an `f32` into the payload bit pattern
pub fn pack_f32(value: f32) -> u32 {
    value.to_bits()
}

/// Unpack a payload bit pattern into an `f32`
pub fn unpack_f32(bits: u32) -> f32 {
    f32::from_bits(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_layout_is_little_endian() {
        let record = Record::new(0x0403_0201, 0x0807_0605);
        assert_eq!(record.to_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(Record::from_bytes(&record.to_bytes()), record);
    }

    #[test]
    fn test_erased_record() {
        assert!(Record::from_bytes(&[0xFF; Record::SIZE]).is_erased());
        assert!(!Record::new(ERASED_WORD, 0).is_erased());
        assert!(!Record::new(0, ERASED_WORD).is_erased());
    }

    #[test]
    fn test_float_bits_are_preserved() {
        assert_eq!(pack_f32(3.25), 0x4050_0000);
        assert_eq!(unpack_f32(0x4050_0000), 3.25);
        assert_eq!(pack_f32(-0.0), 0x8000_0000);
        assert_eq!(unpack_f32(pack_f32(f32::MIN_POSITIVE)), f32::MIN_POSITIVE);
        assert!(unpack_f32(pack_f32(f32::NAN)).is_nan());
    }
}
