use crate::SnowflakeId;

/// The four fields of a [`SnowflakeId`], decoded to integers.
///
/// `timestamp` is relative to the epoch of the generator that minted the ID.
/// Use [`IdParts::timestamp_at`] to recover Unix milliseconds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IdParts {
    pub timestamp: u64,
    pub datacenter: u64,
    pub worker: u64,
    pub sequence: u64,
}

impl IdParts {
    /// Adds `epoch` (Unix milliseconds) back to the relative timestamp.
    pub const fn timestamp_at(&self, epoch: u64) -> u64 {
        epoch.saturating_add(self.timestamp)
    }
}

impl From<SnowflakeId> for IdParts {
    fn from(id: SnowflakeId) -> Self {
        id.parts()
    }
}

/// The four fields of a [`SnowflakeId`] as zero-padded binary strings, each
/// exactly as wide as its field (41, 5, 5 and 12 characters).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IdBits {
    pub timestamp: String,
    pub datacenter: String,
    pub worker: String,
    pub sequence: String,
}

impl IdBits {
    /// Decodes the binary strings back to integers.
    ///
    /// Returns `None` if any field is not a base-2 number.
    pub fn to_parts(&self) -> Option<IdParts> {
        let decode = |s: &str| u64::from_str_radix(s, 2).ok();
        Some(IdParts {
            timestamp: decode(&self.timestamp)?,
            datacenter: decode(&self.datacenter)?,
            worker: decode(&self.worker)?,
            sequence: decode(&self.sequence)?,
        })
    }
}

impl From<SnowflakeId> for IdBits {
    fn from(id: SnowflakeId) -> Self {
        id.bits()
    }
}

/// The result of [`SnowflakeGenerator::parse`]: either decimal fields or raw
/// bit-strings, depending on the caller's `transform` flag.
///
/// [`SnowflakeGenerator::parse`]: crate::SnowflakeGenerator::parse
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParsedId {
    /// Each field decoded to an integer (`transform == true`).
    Decimal(IdParts),
    /// Each field as a binary string (`transform == false`).
    Bits(IdBits),
}

impl ParsedId {
    /// Decomposes `id`, decoding to integers when `transform` is set.
    pub fn new(id: SnowflakeId, transform: bool) -> Self {
        if transform {
            Self::Decimal(id.parts())
        } else {
            Self::Bits(id.bits())
        }
    }

    /// Returns the decimal fields, decoding the bit-strings if needed.
    pub fn to_parts(&self) -> Option<IdParts> {
        match self {
            Self::Decimal(parts) => Some(*parts),
            Self::Bits(bits) => bits.to_parts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_flag_selects_representation() {
        let id = SnowflakeId::from_components(42, 1, 1, 999);
        match ParsedId::new(id, true) {
            ParsedId::Decimal(parts) => assert_eq!(parts.sequence, 999),
            ParsedId::Bits(_) => panic!("expected decimal fields"),
        }
        match ParsedId::new(id, false) {
            ParsedId::Bits(bits) => assert_eq!(bits.sequence, "001111100111"),
            ParsedId::Decimal(_) => panic!("expected bit-strings"),
        }
        assert_eq!(ParsedId::new(id, false).to_parts(), Some(id.parts()));
    }

    #[test]
    fn timestamp_at_adds_epoch() {
        let parts = SnowflakeId::from_components(1_500, 0, 0, 0).parts();
        assert_eq!(parts.timestamp_at(1_700_000_000_000), 1_700_000_001_500);
    }

    #[test]
    fn malformed_bits_do_not_decode() {
        let mut bits = SnowflakeId::from_raw(1).bits();
        bits.worker = "0x1".to_owned();
        assert_eq!(bits.to_parts(), None);
    }
}
