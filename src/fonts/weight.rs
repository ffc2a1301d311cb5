//! CSS-style numeric font weights.

use crate::error::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A numeric font weight: 100, 200, ... 900.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const THIN: Self = Self(100);
    pub const EXTRA_LIGHT: Self = Self(200);
    pub const LIGHT: Self = Self(300);
    pub const REGULAR: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const SEMI_BOLD: Self = Self(600);
    pub const BOLD: Self = Self(700);
    pub const EXTRA_BOLD: Self = Self(800);
    pub const BLACK: Self = Self(900);

    /// All nine weights, lightest first.
    pub const ALL: [Self; 9] = [
        Self::THIN,
        Self::EXTRA_LIGHT,
        Self::LIGHT,
        Self::REGULAR,
        Self::MEDIUM,
        Self::SEMI_BOLD,
        Self::BOLD,
        Self::EXTRA_BOLD,
        Self::BLACK,
    ];

    /// Create a weight from its numeric value.
    pub fn new(value: u16) -> Result<Self> {
        if (100..=900).contains(&value) && value % 100 == 0 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidTypography(format!(
                "font weight {} is not one of 100, 200, ... 900",
                value
            )))
        }
    }

    /// Numeric value.
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Human-readable name, e.g. "Semi Bold".
    pub fn label(&self) -> &'static str {
        match self.0 {
            100 => "Thin",
            200 => "Extra Light",
            300 => "Light",
            400 => "Regular",
            500 => "Medium",
            600 => "Semi Bold",
            700 => "Bold",
            800 => "Extra Bold",
            _ => "Black",
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FontWeight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u16>() {
            return Self::new(value);
        }
        let normalized = s.to_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "normal" => return Ok(Self::REGULAR),
            "bolder" => return Ok(Self::EXTRA_BOLD),
            "lighter" => return Ok(Self::LIGHT),
            _ => {}
        }
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.label().to_lowercase().replace(' ', "") == normalized)
            .ok_or_else(|| Error::InvalidTypography(format!("unknown font weight '{}'", s)))
    }
}

impl Serialize for FontWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct WeightVisitor;

        impl Visitor<'_> for WeightVisitor {
            type Value = FontWeight;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a font weight such as 400 or \"700\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<FontWeight, E> {
                let v = u16::try_from(v).map_err(E::custom)?;
                FontWeight::new(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<FontWeight, E> {
                let v = u16::try_from(v).map_err(E::custom)?;
                FontWeight::new(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<FontWeight, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(WeightVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_range() {
        assert!(FontWeight::new(400).is_ok());
        assert!(FontWeight::new(450).is_err());
        assert!(FontWeight::new(0).is_err());
        assert!(FontWeight::new(1000).is_err());
    }

    #[test]
    fn test_weight_parse() {
        assert_eq!("700".parse::<FontWeight>().unwrap(), FontWeight::BOLD);
        assert_eq!("Semi Bold".parse::<FontWeight>().unwrap(), FontWeight::SEMI_BOLD);
        assert_eq!("normal".parse::<FontWeight>().unwrap(), FontWeight::REGULAR);
        assert!("heavy-ish".parse::<FontWeight>().is_err());
    }

    #[test]
    fn test_weight_serde() {
        let json = serde_json::to_string(&FontWeight::BOLD).unwrap();
        assert_eq!(json, "\"700\"");
        let w: FontWeight = serde_json::from_str("300").unwrap();
        assert_eq!(w, FontWeight::LIGHT);
        let w: FontWeight = serde_json::from_str("\"900\"").unwrap();
        assert_eq!(w.label(), "Black");
        assert!(serde_json::from_str::<FontWeight>("\"950\"").is_err());
    }
}
