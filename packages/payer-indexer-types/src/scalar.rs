pub use num_bigint::{BigInt, BigUint, Sign};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Error returned when a scalar cannot be parsed from its hex representation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseScalarError {
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Expected {expected} bytes, found {found}.")]
    InvalidLength { expected: usize, found: usize },
}

/// Scalar for block numbers.
pub type BlockHeight = u64;

/// Scalar for block timestamps, in seconds since the Unix epoch.
pub type Timestamp = u64;

/// Scalar for the position of a log within its transaction.
pub type LogIndex = u64;

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

macro_rules! fixed_bytes {
    ($(#[$attr:meta])* $name:ident, $len:expr) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Lower-case, `0x`-prefixed hex representation.
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = ParseScalarError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let inner: [u8; $len] =
                    bytes
                        .try_into()
                        .map_err(|_| ParseScalarError::InvalidLength {
                            expected: $len,
                            found: bytes.len(),
                        })?;
                Ok(Self(inner))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ParseScalarError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = hex::decode(strip_hex_prefix(s))?;
                Self::try_from(bytes.as_slice())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_str(&s).map_err(de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// 20-byte account or contract address.
    Address,
    20
);

fixed_bytes!(
    /// Scalar for 256-bit values such as transaction hashes and log topics.
    Bytes32,
    32
);

/// Arbitrarily-sized byte payload, serialized as `0x`-prefixed hex.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct HexBytes(Vec<u8>);

impl HexBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for HexBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for HexBytes {
    type Err = ParseScalarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(hex::decode(strip_hex_prefix(s))?))
    }
}

impl fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexBytes(0x{})", hex::encode(&self.0))
    }
}

impl Serialize for HexBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(&self.0)))
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

/// Serde helpers that represent big integers as decimal strings, so that
/// amounts read the same in JSON as they do on-chain.
pub mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::{fmt::Display, str::FromStr};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_is_lowercase_and_prefixed() {
        let addr =
            Address::from_str("0x00000000000000000000000000000000000000AB").unwrap();

        assert_eq!(addr.to_hex(), "0x00000000000000000000000000000000000000ab");
        assert_eq!(addr.to_string(), addr.to_hex());
    }

    #[test]
    fn test_address_parses_without_prefix() {
        let with = Address::from_str("0x0000000000000000000000000000000000000001");
        let without = Address::from_str("0000000000000000000000000000000000000001");

        assert_eq!(with, without);
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        let err = Address::from_str("0x0001").unwrap_err();

        assert_eq!(
            err,
            ParseScalarError::InvalidLength {
                expected: 20,
                found: 2
            }
        );
    }

    #[test]
    fn test_bytes32_rejects_bad_hex() {
        let err = Bytes32::from_str("0xzz").unwrap_err();

        assert!(matches!(err, ParseScalarError::InvalidHex(_)));
    }

    #[test]
    fn test_scalars_serialize_as_hex_strings() {
        let addr = Address::new([0xaa; 20]);
        let json = serde_json::to_string(&addr).unwrap();

        assert_eq!(json, format!("\"0x{}\"", "aa".repeat(20)));
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), addr);

        let data: HexBytes = serde_json::from_str("\"0x0102\"").unwrap();
        assert_eq!(data.as_ref(), &[1u8, 2]);
    }

    #[test]
    fn test_bytes32_survives_bincode() {
        let hash = Bytes32::new([7u8; 32]);
        let bytes = bincode::serialize(&hash).unwrap();

        assert_eq!(bincode::deserialize::<Bytes32>(&bytes).unwrap(), hash);
    }

    #[test]
    fn test_decimal_helpers_use_base10_strings() {
        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Amount(#[serde(with = "decimal")] BigInt);

        let amount = Amount(BigInt::from(-300_000_000_000i64));
        let json = serde_json::to_string(&amount).unwrap();

        assert_eq!(json, "\"-300000000000\"");
        assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), amount);
        assert!(serde_json::from_str::<Amount>("\"12ab\"").is_err());
    }
}
