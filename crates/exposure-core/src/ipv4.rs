//! Lax dotted-quad IPv4 syntax
//!
//! The acceptance rule is four dot-separated groups of 1-3 digits with no
//! range check, so `999.999.999.999` parses. This matches the documented
//! behavior of the check this audit replaces and is kept on purpose; do
//! not "fix" it to 0-255 without a product decision.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// IPv4 address in dotted-quad syntax, without range validation.
///
/// Groups are stored numerically, so equality and `Display` operate on the
/// canonical form (leading zeros stripped): `01.2.3.4` == `1.2.3.4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DottedQuad([u16; 4]);

impl DottedQuad {
    /// Parse a dotted quad from text, trimming surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let mut groups = [0u16; 4];
        let mut count = 0usize;

        for part in trimmed.split('.') {
            if count == 4 {
                return Err(Error::invalid_format(format!(
                    "not a dotted-quad IPv4 address: {trimmed:?}"
                )));
            }
            if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_format(format!(
                    "not a dotted-quad IPv4 address: {trimmed:?}"
                )));
            }
            groups[count] = part.parse::<u16>().map_err(|_| {
                Error::invalid_format(format!("not a dotted-quad IPv4 address: {trimmed:?}"))
            })?;
            count += 1;
        }

        if count != 4 {
            return Err(Error::invalid_format(format!(
                "not a dotted-quad IPv4 address: {trimmed:?}"
            )));
        }

        Ok(Self(groups))
    }

    /// The four numeric groups, in order.
    pub fn groups(&self) -> [u16; 4] {
        self.0
    }
}

impl fmt::Display for DottedQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl FromStr for DottedQuad {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DottedQuad {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DottedQuad {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(D::Error::custom)
    }
}
