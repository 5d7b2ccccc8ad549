//! Physical units of element values

use serde::{Deserialize, Serialize};

use crate::types::{Language, Scale};

/// Unit of a scaled element value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Second,
    Meter,
    #[serde(rename = "Meter Per Second")]
    MeterPerSecond,
    Volt,
    Ampere,
    Percent,
    #[serde(rename = "Percent Per Second")]
    PercentPerSecond,
    #[serde(rename = "Degree Celsius")]
    DegreeCelsius,
    Hertz,
    Watt,
    Ohm,
    Lux,
    Pascal,
    Gram,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Meter => "m",
            Self::MeterPerSecond => "m/s",
            Self::Volt => "V",
            Self::Ampere => "A",
            Self::Percent => "%",
            Self::PercentPerSecond => "%/s",
            Self::DegreeCelsius => "°C",
            Self::Hertz => "Hz",
            Self::Watt => "W",
            Self::Ohm => "Ω",
            Self::Lux => "lx",
            Self::Pascal => "Pa",
            Self::Gram => "g",
        }
    }

    pub fn name(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Second, Language::En) => "Second",
            (Self::Second, Language::De) => "Sekunde",
            (Self::Meter, _) => "Meter",
            (Self::MeterPerSecond, Language::En) => "Meter per Second",
            (Self::MeterPerSecond, Language::De) => "Meter pro Sekunde",
            (Self::Volt, _) => "Volt",
            (Self::Ampere, _) => "Ampere",
            (Self::Percent, Language::En) => "Percent",
            (Self::Percent, Language::De) => "Prozent",
            (Self::PercentPerSecond, Language::En) => "Percent per Second",
            (Self::PercentPerSecond, Language::De) => "Prozent pro Sekunde",
            (Self::DegreeCelsius, Language::En) => "Degree Celsius",
            (Self::DegreeCelsius, Language::De) => "Grad Celsius",
            (Self::Hertz, _) => "Hertz",
            (Self::Watt, _) => "Watt",
            (Self::Ohm, _) => "Ohm",
            (Self::Lux, _) => "Lux",
            (Self::Pascal, _) => "Pascal",
            (Self::Gram, Language::En) => "Gram",
            (Self::Gram, Language::De) => "Gramm",
        }
    }

    /// Percentages and temperatures don't take SI prefixes
    fn takes_prefix(&self) -> bool {
        !matches!(
            self,
            Self::Percent | Self::PercentPerSecond | Self::DegreeCelsius
        )
    }
}

/// Render the unit of one raw step, e.g. `ms` for (1, 1000) seconds
pub fn format_scaled_unit(scale: Option<Scale>, unit: Option<Unit>) -> Option<String> {
    let fraction = |s: Scale| format!("{}/{}", s.numerator, s.denominator);

    match (scale, unit) {
        (None, None) => None,
        (Some(scale), None) if scale.is_identity() => None,
        (Some(scale), None) => Some(fraction(scale)),
        (None, Some(unit)) => Some(unit.symbol().to_string()),
        (Some(scale), Some(unit)) if scale.is_identity() => Some(unit.symbol().to_string()),
        (Some(scale), Some(unit)) => {
            let prefix = if unit.takes_prefix() {
                match (scale.numerator, scale.denominator) {
                    (1, 1_000) => Some("m"),
                    (1, 1_000_000) => Some("µ"),
                    (1, 1_000_000_000) => Some("n"),
                    (1_000, 1) => Some("k"),
                    _ => None,
                }
            } else {
                None
            };

            Some(match prefix {
                Some(prefix) => format!("{}{}", prefix, unit.symbol()),
                None => format!("{} {}", fraction(scale), unit.symbol()),
            })
        }
    }
}
