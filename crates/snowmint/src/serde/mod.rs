use serde::{Deserialize, Deserializer, Serializer, de};

use crate::SnowflakeId;

/// Serialize a snowflake ID as its exact decimal string.
///
/// JSON consumers that store numbers as `f64` (JavaScript, most browsers)
/// silently round integers above 2^53; a string keeps every digit. On input
/// both a decimal string and a plain integer are accepted.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use snowmint::SnowflakeId;
///
/// #[derive(Serialize, Deserialize)]
/// struct Event {
///     #[serde(with = "snowmint::as_decimal_str")]
///     id: SnowflakeId,
/// }
///
/// let event = Event { id: SnowflakeId::from_raw(9_007_199_254_740_993) };
/// let json = serde_json::to_string(&event).unwrap();
/// assert_eq!(json, r#"{"id":"9007199254740993"}"#);
/// ```
pub mod as_decimal_str {
    use super::{Deserializer, Serializer, SnowflakeId, de};

    /// Serialize a snowflake ID as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize a snowflake ID from a decimal string or an integer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a plain decimal number
    /// - The value sets the reserved high bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a snowflake id as a decimal string or integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                SnowflakeId::try_from_raw(v).map_err(E::custom)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let raw = u64::try_from(v)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))?;
                self.visit_u64(raw)
            }
        }

        d.deserialize_any(DecimalVisitor)
    }
}

/// Serialize a snowflake ID as its native integer.
///
/// Only use this when every consumer handles 64-bit integers losslessly.
pub mod as_native {
    use super::{Deserialize, Deserializer, Serializer, SnowflakeId, de};

    /// Serialize a snowflake ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u64(id.to_raw())
    }

    /// Deserialize a snowflake ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value sets the reserved high bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        SnowflakeId::try_from_raw(raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, IdParts, ParsedId};
    use serde::Serialize;
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct DecimalRow {
        #[serde(with = "as_decimal_str")]
        event_id: SnowflakeId,
    }

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct NativeRow {
        #[serde(with = "as_native")]
        event_id: SnowflakeId,
    }

    #[test]
    fn decimal_str_keeps_every_digit() {
        let row = DecimalRow {
            event_id: SnowflakeId::from_raw(i64::MAX as u64),
        };
        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":"9223372036854775807"}"#);
        let back: DecimalRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn decimal_str_accepts_integers() {
        let row: DecimalRow = serde_json::from_value(json!({"event_id": 42})).expect("deserialize");
        assert_eq!(row.event_id, SnowflakeId::from_raw(42));

        let err = serde_json::from_value::<DecimalRow>(json!({"event_id": -1})).expect_err("negative");
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn decimal_str_rejects_invalid_text() {
        let err = serde_json::from_value::<DecimalRow>(json!({"event_id": "12ab"}))
            .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            Error::ParseId {
                input: "12ab".to_owned()
            }
            .to_string()
        );
    }

    #[test]
    fn reserved_bit_is_rejected() {
        let err = serde_json::from_value::<NativeRow>(json!({"event_id": u64::MAX}))
            .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            Error::ParseId {
                input: u64::MAX.to_string()
            }
            .to_string()
        );

        let err = serde_json::from_value::<DecimalRow>(json!({"event_id": u64::MAX.to_string()}))
            .expect_err("should fail");
        assert!(err.to_string().contains("invalid snowflake id"));
    }

    #[test]
    fn native_round_trip() {
        let row = NativeRow {
            event_id: SnowflakeId::from_raw(42),
        };
        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":42}"#);
        let back: NativeRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn parsed_id_serializes_untagged() {
        let id = SnowflakeId::from_components(5, 1, 2, 3);
        let decimal = serde_json::to_value(ParsedId::new(id, true)).expect("serialize");
        assert_eq!(
            decimal,
            json!({"timestamp": 5, "datacenter": 1, "worker": 2, "sequence": 3})
        );

        let bits = serde_json::to_value(ParsedId::new(id, false)).expect("serialize");
        assert_eq!(bits["worker"], json!("00010"));

        let parts: IdParts = serde_json::from_value(decimal).expect("deserialize");
        assert_eq!(parts, id.parts());
    }
}
