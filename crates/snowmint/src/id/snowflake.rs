use core::{fmt, str::FromStr};

use crate::{Error, IdBits, IdParts, Result};

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved (always zero, so the value stays positive as an `i64`)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             17 16         12 11             0
///              +--------------+----------------+-----------------+-------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter (5)  | worker (5)  | sequence (12) |
///              +--------------+----------------+-----------------+-------------+---------------+
///              |<------------------ MSB ------------ 64 bits ------------- LSB --------------->|
/// ```
///
/// The textual form ([`fmt::Display`] / [`FromStr`]) is the exact decimal
/// value, which is what consumers limited to 2^53 integer precision should
/// exchange.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;

    /// Width of the datacenter field.
    pub const DATACENTER_BITS: u32 = 5;

    /// Width of the worker field.
    pub const WORKER_BITS: u32 = 5;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 5-bit datacenter field. Occupies bits 17
    /// through 21.
    pub const DATACENTER_MASK: u64 = (1 << Self::DATACENTER_BITS) - 1;

    /// Bitmask for extracting the 5-bit worker field. Occupies bits 12
    /// through 16.
    pub const WORKER_MASK: u64 = (1 << Self::WORKER_BITS) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = Self::DATACENTER_SHIFT + Self::DATACENTER_BITS;

    /// Number of bits to shift the datacenter to its correct position (bit 17).
    pub const DATACENTER_SHIFT: u32 = Self::WORKER_SHIFT + Self::WORKER_BITS;

    /// Number of bits to shift the worker to its correct position (bit 12).
    pub const WORKER_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Packs the four fields into an ID.
    ///
    /// Each component is masked to its field width, so an out-of-range value
    /// never bleeds into a neighbouring field.
    pub const fn from_components(
        timestamp: u64,
        datacenter: u64,
        worker: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter = (datacenter & Self::DATACENTER_MASK) << Self::DATACENTER_SHIFT;
        let worker = (worker & Self::WORKER_MASK) << Self::WORKER_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter | worker | sequence,
        }
    }

    /// Extracts the timestamp (ms since the minting generator's epoch).
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID.
    pub const fn datacenter(&self) -> u64 {
        (self.id >> Self::DATACENTER_SHIFT) & Self::DATACENTER_MASK
    }

    /// Extracts the worker ID.
    pub const fn worker(&self) -> u64 {
        (self.id >> Self::WORKER_SHIFT) & Self::WORKER_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the packed value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Wraps a raw value, rejecting it if the reserved bit is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseId`] when the most significant bit is set.
    pub fn try_from_raw(raw: u64) -> Result<Self> {
        let id = Self::from_raw(raw);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(Error::ParseId {
                input: raw.to_string(),
            })
        }
    }

    /// Returns `true` if the reserved sign bit is clear.
    pub const fn is_valid(&self) -> bool {
        self.id >> (u64::BITS - 1) == 0
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    /// Decodes every field to its decimal value.
    pub const fn parts(&self) -> IdParts {
        IdParts {
            timestamp: self.timestamp(),
            datacenter: self.datacenter(),
            worker: self.worker(),
            sequence: self.sequence(),
        }
    }

    /// Renders every field as a zero-padded binary string of the field's
    /// width.
    pub fn bits(&self) -> IdBits {
        IdBits {
            timestamp: format!("{:041b}", self.timestamp()),
            datacenter: format!("{:05b}", self.datacenter()),
            worker: format!("{:05b}", self.worker()),
            sequence: format!("{:012b}", self.sequence()),
        }
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl TryFrom<u64> for SnowflakeId {
    type Error = Error;

    fn try_from(raw: u64) -> Result<Self> {
        Self::try_from_raw(raw)
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    /// Parses the exact decimal form produced by [`fmt::Display`].
    ///
    /// Only ASCII digits are accepted: no sign, whitespace or separators.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::ParseId {
            input: s.to_owned(),
        };
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let raw = s.parse::<u64>().map_err(|_| invalid())?;
        let id = Self::from_raw(raw);
        if !id.is_valid() {
            return Err(invalid());
        }
        Ok(id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("raw", &format_args!("0x{:016x} ({})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("datacenter", &self.datacenter())
            .field("worker", &self.worker())
            .field("sequence", &self.sequence())
            .finish()
    }
}
