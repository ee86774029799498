use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::keys::KeyParseError;

/// A vertical shelf position within a column, stored in half-row steps.
///
/// Whole rows are structural shelf positions; the half step between two
/// whole rows is the "virtual" slot that can be promoted to a real shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Row(u32);

impl Row {
    /// The floor row of every column.
    pub const FLOOR: Row = Row(0);

    /// The highest representable row.
    pub const MAX: Row = Row(u32::MAX);

    /// A whole row. Saturates at [`Row::MAX`].
    pub const fn whole(row: u32) -> Self {
        Row(row.saturating_mul(2))
    }

    /// A whole row, or `None` past [`Row::MAX`].
    pub const fn checked_whole(row: u32) -> Option<Self> {
        match row.checked_mul(2) {
            Some(steps) => Some(Row(steps)),
            None => None,
        }
    }

    /// A row from a count of half steps (`5` is row 2.5).
    pub const fn from_half_steps(steps: u32) -> Self {
        Row(steps)
    }

    pub const fn half_steps(self) -> u32 {
        self.0
    }

    pub fn is_whole(self) -> bool {
        self.0 % 2 == 0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// The whole row at or below this one (`2.5` → `2`).
    pub fn floor(self) -> Row {
        Row(self.0 - self.0 % 2)
    }

    /// This row moved up by `steps` half steps, or `None` past [`Row::MAX`].
    pub fn checked_offset(self, steps: u32) -> Option<Row> {
        self.0.checked_add(steps).map(Row)
    }

    /// Iterate every half-step row strictly between `self` and `upper`.
    pub fn strictly_between(self, upper: Row) -> impl Iterator<Item = Row> {
        (self.0.saturating_add(1)..upper.0).map(Row)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

impl FromStr for Row {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || KeyParseError::InvalidRow {
            value: s.to_string(),
        };
        let (whole, half) = match s.split_once('.') {
            None => (s, 0),
            Some((whole, "5")) => (whole, 1),
            Some((whole, "0")) => (whole, 0),
            Some(_) => return Err(invalid()),
        };
        whole
            .parse::<u32>()
            .ok()
            .and_then(Row::checked_whole)
            .and_then(|row| row.checked_offset(half))
            .ok_or_else(invalid)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        let steps = value * 2.0;
        if !steps.is_finite() || value < 0.0 || steps.fract() != 0.0 {
            return Err(serde::de::Error::custom(format!(
                "row {} is not a non-negative multiple of 0.5",
                value
            )));
        }
        if steps > f64::from(u32::MAX) {
            return Err(serde::de::Error::custom(format!("row {} is out of range", value)));
        }
        Ok(Row(steps as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_whole_and_half_rows() {
        assert_eq!(Row::whole(3).to_string(), "3");
        assert_eq!(Row::from_half_steps(5).to_string(), "2.5");
    }

    #[test]
    fn parse_accepts_half_rows_only() {
        assert_eq!("2.5".parse::<Row>().unwrap(), Row::from_half_steps(5));
        assert_eq!("4".parse::<Row>().unwrap(), Row::whole(4));
        assert!("2.25".parse::<Row>().is_err());
        assert!("-1".parse::<Row>().is_err());
    }

    #[test]
    fn floor_drops_the_half_step() {
        assert_eq!(Row::from_half_steps(7).floor(), Row::whole(3));
        assert_eq!(Row::whole(3).floor(), Row::whole(3));
    }

    #[test]
    fn json_rows_are_numbers() {
        let json = serde_json::to_string(&Row::from_half_steps(3)).unwrap();
        assert_eq!(json, "1.5");
        let back: Row = serde_json::from_str("1.5").unwrap();
        assert_eq!(back, Row::from_half_steps(3));
        assert!(serde_json::from_str::<Row>("1.3").is_err());
    }

    #[test]
    fn rows_past_the_range_are_rejected() {
        assert!("3000000000".parse::<Row>().is_err());
        assert!("2147483647.5".parse::<Row>().is_ok());
        assert!(serde_json::from_str::<Row>("1e20").is_err());
        assert_eq!(Row::checked_whole(3_000_000_000), None);
        assert_eq!(Row::MAX.checked_offset(1), None);
        assert_eq!(Row::whole(u32::MAX), Row::MAX);
        assert_eq!(Row::MAX.strictly_between(Row::MAX).count(), 0);
    }
}
