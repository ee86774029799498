use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::keys::KeyParseError;

/// Load class of a real shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfClass {
    Standard,
    Reinforced,
}

/// Facade catalogue. Drawers are `tiroir_*`, doors are `porte_*`; `retire`
/// is the pseudo-type that removes selected facades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FacadeType {
    #[serde(rename = "tiroir_17")]
    Tiroir17,
    #[serde(rename = "tiroir_36")]
    Tiroir36,
    #[serde(rename = "porte_36")]
    Porte36,
    #[serde(rename = "porte_bas_74")]
    PorteBas74,
    #[serde(rename = "porte_haut_112")]
    PorteHaut112,
    #[serde(rename = "retire")]
    Retire,
}

/// Height of one facade panel unit in cm, including the shelf it mounts to.
const PANEL_PITCH_CM: f64 = 19.0;

impl FacadeType {
    pub const ALL: [FacadeType; 6] = [
        FacadeType::Tiroir17,
        FacadeType::Tiroir36,
        FacadeType::Porte36,
        FacadeType::PorteBas74,
        FacadeType::PorteHaut112,
        FacadeType::Retire,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FacadeType::Tiroir17 => "tiroir_17",
            FacadeType::Tiroir36 => "tiroir_36",
            FacadeType::Porte36 => "porte_36",
            FacadeType::PorteBas74 => "porte_bas_74",
            FacadeType::PorteHaut112 => "porte_haut_112",
            FacadeType::Retire => "retire",
        }
    }

    /// Facade height in cm. `None` for the `retire` pseudo-type.
    pub fn height_cm(self) -> Option<f64> {
        match self {
            FacadeType::Tiroir17 => Some(17.0),
            FacadeType::Tiroir36 | FacadeType::Porte36 => Some(36.0),
            FacadeType::PorteBas74 => Some(74.0),
            FacadeType::PorteHaut112 => Some(112.0),
            FacadeType::Retire => None,
        }
    }

    /// Height in half-row panel units: `round((height_cm + 2) / 19)`.
    pub fn height_in_panels(self) -> u32 {
        self.height_cm()
            .map(|h| ((h + 2.0) / PANEL_PITCH_CM).round() as u32)
            .unwrap_or(0)
    }

    /// Number of half-row steps between a facade's bottom and top support rows.
    pub fn span_half_steps(self) -> u32 {
        match self {
            // Fixed one-row drawer.
            FacadeType::Tiroir36 => 2,
            other => other.height_in_panels(),
        }
    }

    pub fn is_drawer(self) -> bool {
        matches!(self, FacadeType::Tiroir17 | FacadeType::Tiroir36)
    }

    pub fn is_retire(self) -> bool {
        self == FacadeType::Retire
    }
}

impl fmt::Display for FacadeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacadeType {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacadeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| KeyParseError::UnknownFacadeType {
                name: s.to_string(),
            })
    }
}

/// Feet style under the carcass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeetType {
    #[default]
    None,
    Low,
    Legs,
    Wheels,
}

impl FeetType {
    /// Height the feet lift the carcass by, in cm.
    pub fn height_cm(self) -> f64 {
        match self {
            FeetType::None => 0.0,
            FeetType::Low => 2.0,
            FeetType::Legs => 10.0,
            FeetType::Wheels => 8.0,
        }
    }
}

/// Material identifier applied to an entity (e.g. `"oak"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Texture(pub String);

impl Texture {
    pub fn new(name: impl Into<String>) -> Self {
        Texture(name.into())
    }
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_heights_follow_the_nineteen_cm_pitch() {
        assert_eq!(FacadeType::Tiroir17.height_in_panels(), 1);
        assert_eq!(FacadeType::Porte36.height_in_panels(), 2);
        assert_eq!(FacadeType::PorteBas74.height_in_panels(), 4);
        assert_eq!(FacadeType::PorteHaut112.height_in_panels(), 6);
        assert_eq!(FacadeType::Retire.height_in_panels(), 0);
    }

    #[test]
    fn tiroir_36_spans_exactly_one_row() {
        assert_eq!(FacadeType::Tiroir36.span_half_steps(), 2);
        assert_eq!(FacadeType::PorteHaut112.span_half_steps(), 6);
    }

    #[test]
    fn facade_names_round_trip_through_strings() {
        for t in FacadeType::ALL {
            assert_eq!(t.as_str().parse::<FacadeType>().unwrap(), t);
        }
        assert!("porte_99".parse::<FacadeType>().is_err());
    }
}
