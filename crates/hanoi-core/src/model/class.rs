use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Size of the label alphabet (`A`..=`Z`)
pub const ALPHABET_LEN: usize = 26;

/// Display label of a retention class, one of `A`..=`Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ClassLabel(char);

impl ClassLabel {
    /// Label for the given ordinal, `None` past the end of the alphabet
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal >= ALPHABET_LEN {
            return None;
        }
        // ordinal < 26 so the cast cannot truncate
        Some(Self((b'A' + ordinal as u8) as char))
    }

    /// Position of this label in the alphabet
    pub fn ordinal(self) -> usize {
        (self.0 as u8 - b'A') as usize
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl FromStr for ClassLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Ok(Self(c)),
            _ => Err(format!("not a class label: {:?}", s)),
        }
    }
}

impl TryFrom<String> for ClassLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClassLabel> for String {
    fn from(label: ClassLabel) -> Self {
        label.0.to_string()
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A retention slot: ordinal position paired with its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionClass {
    pub ordinal: usize,
    pub label: ClassLabel,
}

/// Diagnostic generation counter, cycling modulo `2^(classes-1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlNumber(u32);

impl ControlNumber {
    pub const ZERO: ControlNumber = ControlNumber(0);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// The number following this one, wrapping at `modulus`
    pub fn next(self, modulus: u32) -> Self {
        Self((self.0.wrapping_add(1)) % modulus.max(1))
    }
}

impl FromStr for ControlNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for ControlNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
