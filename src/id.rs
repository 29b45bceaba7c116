use std::{fmt, str};

use fstr::FStr;

use crate::error::{Error, ParseError, Result};

/// Number of random prefix bytes at the head of an [`OrdinalId`].
pub const PREFIX_BYTES: usize = 10;

/// Number of big-endian sequence bytes at the tail of an [`OrdinalId`].
pub const SEQUENCE_BYTES: usize = 6;

/// Largest sequence the 6-byte suffix can hold.
pub const MAX_SEQUENCE: i64 = (1 << (8 * SEQUENCE_BYTES)) - 1;

/// Represents a 128-bit identifier made of a random prefix and a time-ordered sequence suffix.
///
/// The first [`PREFIX_BYTES`] bytes are entropy, the last [`SEQUENCE_BYTES`] bytes hold the
/// sequence in big-endian order. No version or variant bits are set, so the value is
/// UUID-sized without claiming to be any particular UUID version.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct OrdinalId([u8; 16]);

impl OrdinalId {
    /// Nil value (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max value (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Packs a random prefix and a sequence number into an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceOverflow`] if `sequence` is negative or does not fit in
    /// [`SEQUENCE_BYTES`] bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordinal_id::OrdinalId;
    ///
    /// let id = OrdinalId::from_parts([0; 10], 0x0123_4567_89ab)?;
    /// assert_eq!(id.to_string(), "00000000-0000-0000-0000-0123456789ab");
    /// assert_eq!(id.sequence(), 0x0123_4567_89ab);
    /// # Ok::<(), ordinal_id::Error>(())
    /// ```
    pub fn from_parts(prefix: [u8; PREFIX_BYTES], sequence: i64) -> Result<Self> {
        if !(0..=MAX_SEQUENCE).contains(&sequence) {
            return Err(Error::SequenceOverflow { sequence });
        }

        let mut bytes = [0u8; 16];
        bytes[..PREFIX_BYTES].copy_from_slice(&prefix);
        bytes[PREFIX_BYTES..].copy_from_slice(&sequence.to_be_bytes()[8 - SEQUENCE_BYTES..]);
        Ok(Self(bytes))
    }

    /// Returns the random prefix bytes.
    pub fn prefix(&self) -> [u8; PREFIX_BYTES] {
        let mut dst = [0u8; PREFIX_BYTES];
        dst.copy_from_slice(&self.0[..PREFIX_BYTES]);
        dst
    }

    /// Decodes the big-endian sequence suffix.
    ///
    /// Identifiers produced by the random fallback path decode to an arbitrary value here that
    /// bears no relation to time.
    pub fn sequence(&self) -> i64 {
        self.0[PREFIX_BYTES..]
            .iter()
            .fold(0i64, |acc, &e| (acc << 8) | e as i64)
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type.
    ///
    /// The trailing 12-digit group is exactly the sequence suffix.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordinal_id::OrdinalId;
    ///
    /// let x = "9f1c027a-3e55-800d-c461-017f22e279b0".parse::<OrdinalId>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "9f1c027a-3e55-800d-c461-017f22e279b0");
    /// assert_eq!(format!("{}", y), "9f1c027a-3e55-800d-c461-017f22e279b0");
    /// # Ok::<(), ordinal_id::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for (i, e) in self.0.iter().enumerate() {
            let e = *e as usize;
            *buf_iter.next().unwrap() = DIGITS[e >> 4];
            *buf_iter.next().unwrap() = DIGITS[e & 15];
            if i == 3 || i == 5 || i == 7 || i == 9 {
                *buf_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        unsafe { FStr::from_inner_unchecked(buffer) }
    }
}

impl fmt::Display for OrdinalId {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for OrdinalId {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: ParseError = ParseError {};
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
            if (i == 3 || i == 5 || i == 7 || i == 9) && iter.next().ok_or(ERR)? != '-' {
                return Err(ERR);
            }
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(ERR)
        }
    }
}

impl From<OrdinalId> for [u8; 16] {
    fn from(src: OrdinalId) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for OrdinalId {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for OrdinalId {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<OrdinalId> for u128 {
    fn from(src: OrdinalId) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for OrdinalId {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<OrdinalId> for String {
    fn from(src: OrdinalId) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for OrdinalId {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::OrdinalId;

    impl From<OrdinalId> for uuid::Uuid {
        fn from(src: OrdinalId) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for OrdinalId {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, OrdinalId};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for OrdinalId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for OrdinalId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = OrdinalId;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "an ordinal id representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::OrdinalId;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases = [
                ("00000000-0000-0000-0000-000000000000", &[0u8; 16]),
                (
                    "01234567-89ab-cdef-0123-000000000001",
                    &[
                        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23, 0, 0, 0, 0, 0,
                        1,
                    ],
                ),
                (
                    "9f1c027a-3e55-800d-c461-017f22e279b0",
                    &[
                        0x9f, 0x1c, 0x02, 0x7a, 0x3e, 0x55, 0x80, 0x0d, 0xc4, 0x61, 0x01, 0x7f,
                        0x22, 0xe2, 0x79, 0xb0,
                    ],
                ),
                ("ffffffff-ffff-ffff-ffff-ffffffffffff", &[0xffu8; 16]),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<OrdinalId>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }
    }
}
