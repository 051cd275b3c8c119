use std::fmt;
use std::str::FromStr;

/// Represents a 128-bit identifier as exchanged with the Bluetooth daemon.
///
/// Used both for peripheral identities and for the UUIDs of locally defined
/// GATT attributes. Bytes are stored in wire order (big-endian), which is also
/// the order of the daemon's string form.
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Uuid {
    bytes: [u8; 16],
}

/// The base UUID used for expanding 16-bit and 32-bit values.
/// Defined as "00000000-0000-1000-8000-00805F9B34FB".
const BASE_UUID_BYTES: [u8; 16] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0x80, 0x5F, 0x9B, 0x34, 0xFB,
];

impl Uuid {
    /// Creates a UUID directly from 16 bytes in wire order.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Uuid { bytes }
    }

    /// Creates a 128-bit UUID from a 16-bit SIG-assigned value.
    pub const fn from_u16(uuid16: u16) -> Self {
        Self::from_u32(uuid16 as u32)
    }

    /// Creates a 128-bit UUID from a 32-bit SIG-assigned value.
    pub const fn from_u32(uuid32: u32) -> Self {
        let mut bytes = BASE_UUID_BYTES;
        bytes[0] = (uuid32 >> 24) as u8;
        bytes[1] = (uuid32 >> 16) as u8;
        bytes[2] = (uuid32 >> 8) as u8;
        bytes[3] = uuid32 as u8;
        Uuid { bytes }
    }

    /// Builds a UUID from a byte slice of at most 16 bytes.
    ///
    /// The bytes fill the leading positions and the rest stays zero, matching
    /// how the daemon hands out identifiers as raw data. Returns `None` for
    /// slices longer than 16 bytes.
    pub fn from_prefix(slice: &[u8]) -> Option<Self> {
        if slice.len() > 16 {
            return None;
        }
        let mut bytes = [0u8; 16];
        bytes[..slice.len()].copy_from_slice(slice);
        Some(Uuid { bytes })
    }

    /// Returns the underlying 16 bytes in wire order.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    fn is_sig_assigned(&self) -> bool {
        self.bytes[4..] == BASE_UUID_BYTES[4..]
    }

    /// Returns the 16-bit value if this is a SIG-assigned 16-bit UUID.
    pub fn as_u16(&self) -> Option<u16> {
        if self.is_sig_assigned() && self.bytes[0] == 0 && self.bytes[1] == 0 {
            Some(u16::from_be_bytes([self.bytes[2], self.bytes[3]]))
        } else {
            None
        }
    }

    /// Standard hyphenated form, e.g. `1beac099-beac-beac-beac-beac09beac09`.
    pub fn hyphenated(&self) -> String {
        let s = hex::encode(self.bytes);
        format!("{}-{}-{}-{}-{}", &s[0..8], &s[8..12], &s[12..16], &s[16..20], &s[20..])
    }
}

impl From<u16> for Uuid {
    fn from(uuid16: u16) -> Self {
        Uuid::from_u16(uuid16)
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(bytes: [u8; 16]) -> Self {
        Uuid::from_bytes(bytes)
    }
}

impl PartialEq<u16> for Uuid {
    fn eq(&self, other: &u16) -> bool {
        self.as_u16() == Some(*other)
    }
}

/// Lowercase hex without separators, the form the daemon uses for strings.
impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.bytes))
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(u16_val) = self.as_u16() {
            write!(f, "Uuid(0x{:04X})", u16_val)
        } else {
            write!(f, "Uuid({})", self.hyphenated())
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UuidParseError {
    #[error("invalid UUID length {0}")]
    InvalidLength(usize),
    #[error("invalid UUID: {0}")]
    HexError(#[from] hex::FromHexError),
}

impl FromStr for Uuid {
    type Err = UuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|&c| c != '-').collect();

        match cleaned.len() {
            4 => {
                let mut short = [0u8; 2];
                hex::decode_to_slice(&cleaned, &mut short)?;
                Ok(Uuid::from_u16(u16::from_be_bytes(short)))
            }
            8 => {
                let mut short = [0u8; 4];
                hex::decode_to_slice(&cleaned, &mut short)?;
                Ok(Uuid::from_u32(u32::from_be_bytes(short)))
            }
            32 => {
                let mut bytes = [0u8; 16];
                hex::decode_to_slice(&cleaned, &mut bytes)?;
                Ok(Uuid::from_bytes(bytes))
            }
            n => Err(UuidParseError::InvalidLength(n)),
        }
    }
}
