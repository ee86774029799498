use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::catalog::FacadeType;
use crate::row::Row;

/// Errors from parsing the canonical string form of an entity key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("invalid row: {value}")]
    InvalidRow { value: String },

    #[error("invalid column in key {key}")]
    InvalidColumn { key: String },

    #[error("malformed key: {key}")]
    Malformed { key: String },

    #[error("unknown facade type: {name}")]
    UnknownFacadeType { name: String },
}

/// Which of the two slots at a shelf position a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Real,
    Virtual,
}

/// Key of a shelf entity: `"{row}-{column}"` or `"{row}-{column}-virtual"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShelfKey {
    pub column: usize,
    pub row: Row,
    pub slot: SlotKind,
}

impl ShelfKey {
    pub fn real(row: Row, column: usize) -> Self {
        Self {
            column,
            row,
            slot: SlotKind::Real,
        }
    }

    /// The virtual key of a half-row slot.
    pub fn virtual_slot(row: Row, column: usize) -> Self {
        Self {
            column,
            row,
            slot: SlotKind::Virtual,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.slot == SlotKind::Virtual
    }

    /// The canonical real key for the same position.
    pub fn to_real(self) -> Self {
        Self::real(self.row, self.column)
    }

    /// The virtual key for the same position.
    pub fn to_virtual(self) -> Self {
        Self::virtual_slot(self.row, self.column)
    }

    pub fn with_column(self, column: usize) -> Self {
        Self { column, ..self }
    }
}

impl fmt::Display for ShelfKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            SlotKind::Real => write!(f, "{}-{}", self.row, self.column),
            SlotKind::Virtual => write!(f, "{}-{}-virtual", self.row, self.column),
        }
    }
}

impl FromStr for ShelfKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, slot) = match s.strip_suffix("-virtual") {
            Some(body) => (body, SlotKind::Virtual),
            None => (s, SlotKind::Real),
        };
        let (row, column) = body.split_once('-').ok_or_else(|| KeyParseError::Malformed {
            key: s.to_string(),
        })?;
        Ok(Self {
            row: row.parse()?,
            column: parse_column(column, s)?,
            slot,
        })
    }
}

/// Key of a back panel.
///
/// Span panels are regenerated by synchronization and keyed by the lower
/// shelf row. Custom panels are user-authored and never dropped by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackPanelKey {
    Span { column: usize, row: Row },
    Custom { id: Uuid },
}

impl BackPanelKey {
    pub fn span(row: Row, column: usize) -> Self {
        BackPanelKey::Span { column, row }
    }

    pub fn new_custom() -> Self {
        BackPanelKey::Custom { id: Uuid::new_v4() }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, BackPanelKey::Custom { .. })
    }
}

impl fmt::Display for BackPanelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackPanelKey::Span { column, row } => write!(f, "back-panel-{}-{}", row, column),
            BackPanelKey::Custom { id } => write!(f, "custom-panel-{}", id),
        }
    }
}

impl FromStr for BackPanelKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(id) = s.strip_prefix("custom-panel-") {
            let id = Uuid::parse_str(id).map_err(|_| KeyParseError::Malformed {
                key: s.to_string(),
            })?;
            return Ok(BackPanelKey::Custom { id });
        }
        let body = s
            .strip_prefix("back-panel-")
            .ok_or_else(|| KeyParseError::Malformed { key: s.to_string() })?;
        let (row, column) = body
            .rsplit_once('-')
            .ok_or_else(|| KeyParseError::Malformed { key: s.to_string() })?;
        Ok(BackPanelKey::Span {
            row: row.parse()?,
            column: parse_column(column, s)?,
        })
    }
}

/// Key of one facade instance: `"{type}-{sequence}-{column}"`.
///
/// The sequence number makes several facades of the same type in the same
/// column distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FacadeKey {
    pub column: usize,
    pub sequence: u64,
    pub facade_type: FacadeType,
}

impl FacadeKey {
    pub fn new(facade_type: FacadeType, sequence: u64, column: usize) -> Self {
        Self {
            column,
            sequence,
            facade_type,
        }
    }

    pub fn with_column(self, column: usize) -> Self {
        Self { column, ..self }
    }
}

impl fmt::Display for FacadeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.facade_type, self.sequence, self.column)
    }
}

impl FromStr for FacadeKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || KeyParseError::Malformed { key: s.to_string() };
        let mut parts = s.rsplitn(3, '-');
        let column = parts.next().ok_or_else(malformed)?;
        let sequence = parts.next().ok_or_else(malformed)?;
        let facade_type = parts.next().ok_or_else(malformed)?;
        Ok(Self {
            facade_type: facade_type.parse()?,
            sequence: sequence.parse().map_err(|_| malformed())?,
            column: parse_column(column, s)?,
        })
    }
}

fn parse_column(value: &str, key: &str) -> Result<usize, KeyParseError> {
    value.parse().map_err(|_| KeyParseError::InvalidColumn {
        key: key.to_string(),
    })
}

/// Keys travel as their canonical strings so they can be used as JSON map keys.
macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(ShelfKey);
string_serde!(BackPanelKey);
string_serde!(FacadeKey);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shelf_keys_use_row_column_form() {
        let key = ShelfKey::virtual_slot(Row::from_half_steps(3), 2);
        assert_eq!(key.to_string(), "1.5-2-virtual");
        assert_eq!(key.to_real().to_string(), "1.5-2");
        assert_eq!("1.5-2-virtual".parse::<ShelfKey>().unwrap(), key);
        assert!("1.5".parse::<ShelfKey>().is_err());
    }

    #[test]
    fn back_panel_keys_distinguish_custom_namespace() {
        let span: BackPanelKey = "back-panel-2.5-1".parse().unwrap();
        assert_eq!(span, BackPanelKey::span(Row::from_half_steps(5), 1));
        let custom = BackPanelKey::new_custom();
        assert!(custom.to_string().starts_with("custom-panel-"));
        assert_eq!(custom.to_string().parse::<BackPanelKey>().unwrap(), custom);
        assert!("front-panel-1-1".parse::<BackPanelKey>().is_err());
    }

    #[test]
    fn facade_key_type_prefix_may_contain_underscores() {
        let key: FacadeKey = "porte_haut_112-7-3".parse().unwrap();
        assert_eq!(key.facade_type, FacadeType::PorteHaut112);
        assert_eq!(key.sequence, 7);
        assert_eq!(key.column, 3);
        assert_eq!(key.to_string(), "porte_haut_112-7-3");
    }

    #[test]
    fn keys_work_as_json_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(ShelfKey::real(Row::whole(1), 0), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"1-0":1}"#);
    }
}
