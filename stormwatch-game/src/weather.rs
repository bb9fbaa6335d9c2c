//! Weather types and the future-weather queue entries.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::Turn;

/// How hard it is coming down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Precipitation {
    #[default]
    None,
    Light,
    Heavy,
}

/// Per-tick routine a weather type runs while it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherEffect {
    #[default]
    None,
    Glare,
    Wet,
    VeryWet,
    Thunder,
    Lightning,
    LightAcid,
    Acid,
}

/// Weather conditions in declaration order.
///
/// The order matters: when two types tie for the longest stretch of a
/// forecast window, the earlier variant is reported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum WeatherType {
    #[default]
    Clear,
    Sunny,
    Cloudy,
    Drizzle,
    Rain,
    Thunder,
    Lightning,
    AcidDrizzle,
    AcidRain,
}

impl WeatherType {
    pub const ALL: [Self; 9] = [
        Self::Clear,
        Self::Sunny,
        Self::Cloudy,
        Self::Drizzle,
        Self::Rain,
        Self::Thunder,
        Self::Lightning,
        Self::AcidDrizzle,
        Self::AcidRain,
    ];

    /// Display name used in messages and forecasts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Thunder => "Thunder Storm",
            Self::Lightning => "Lightning Storm",
            Self::AcidDrizzle => "Acidic Drizzle",
            Self::AcidRain => "Acid Rain",
        }
    }

    #[must_use]
    pub const fn precipitation(self) -> Precipitation {
        match self {
            Self::Clear | Self::Sunny | Self::Cloudy => Precipitation::None,
            Self::Drizzle | Self::AcidDrizzle => Precipitation::Light,
            Self::Rain | Self::Thunder | Self::Lightning | Self::AcidRain => Precipitation::Heavy,
        }
    }

    #[must_use]
    pub const fn is_acidic(self) -> bool {
        matches!(self, Self::AcidDrizzle | Self::AcidRain)
    }

    #[must_use]
    pub const fn effect(self) -> WeatherEffect {
        match self {
            Self::Clear | Self::Cloudy => WeatherEffect::None,
            Self::Sunny => WeatherEffect::Glare,
            Self::Drizzle => WeatherEffect::Wet,
            Self::Rain => WeatherEffect::VeryWet,
            Self::Thunder => WeatherEffect::Thunder,
            Self::Lightning => WeatherEffect::Lightning,
            Self::AcidDrizzle => WeatherEffect::LightAcid,
            Self::AcidRain => WeatherEffect::Acid,
        }
    }

    /// Position in declaration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WeatherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One contiguous block of upcoming weather, ending at `deadline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSegment {
    pub deadline: Turn,
    pub weather: WeatherType,
    /// Fahrenheit.
    pub temperature: i32,
}

impl WeatherSegment {
    #[must_use]
    pub const fn new(deadline: Turn, weather: WeatherType, temperature: i32) -> Self {
        Self {
            deadline,
            weather,
            temperature,
        }
    }
}
