//! Stable keys for roles, users and resource owners.

use std::fmt;

/// A stable, hashable key identifying a role, a user or a resource owner.
///
/// Strings holding a canonical decimal integer are folded into [`Identifier::Int`]
/// on construction, so `"1"` and `1` name the same role and the same owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize))]
#[cfg_attr(feature = "persistence", serde(untagged))]
pub enum Identifier {
    /// Numeric key, typically a database primary key.
    Int(i64),
    /// Textual key such as a slug or a UUID.
    Str(String),
}

impl Identifier {
    /// Returns the numeric value if this is an integer key.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Identifier::Int(value) => Some(*value),
            Identifier::Str(_) => None,
        }
    }

    /// Returns the text if this is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Identifier::Int(_) => None,
            Identifier::Str(value) => Some(value),
        }
    }

    fn from_text(text: String) -> Self {
        match text.parse::<i64>() {
            // Only canonical spellings fold: "042" or "+1" stay textual.
            Ok(value) if value.to_string() == text => Identifier::Int(value),
            _ => Identifier::Str(text),
        }
    }
}

// Stored strings go through the same folding as `From<&str>`, so a role
// saved as `"2"` loads as the key `2`.
#[cfg(feature = "persistence")]
impl<'de> serde::Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Stored {
            Int(i64),
            Str(String),
        }

        Ok(match Stored::deserialize(deserializer)? {
            Stored::Int(value) => Identifier::Int(value),
            Stored::Str(text) => Identifier::from_text(text),
        })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(value) => write!(f, "{value}"),
            Identifier::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Int(value)
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Identifier::Int(i64::from(value))
    }
}

impl From<u32> for Identifier {
    fn from(value: u32) -> Self {
        Identifier::Int(i64::from(value))
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::from_text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::from_text(value)
    }
}

impl From<&String> for Identifier {
    fn from(value: &String) -> Self {
        Self::from_text(value.clone())
    }
}

impl From<&Identifier> for Identifier {
    fn from(value: &Identifier) -> Self {
        value.clone()
    }
}
