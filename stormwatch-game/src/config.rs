//! Weather tuning loaded from JSON.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{SEEX, SEEY};
use crate::sweep::SweepWindow;

const DEFAULT_WEATHER_DATA: &str = include_str!("../assets/weather.json");
const MAX_DECIMALS: usize = 6;

/// Errors raised when weather configuration invariants are violated.
#[derive(Debug, Error)]
pub enum WeatherConfigError {
    #[error("weather config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must have a non-zero denominator")]
    ZeroDenominator { field: &'static str },
    #[error("{field} chance {num}/{den} exceeds certainty")]
    ChanceAboveOne {
        field: &'static str,
        num: u32,
        den: u32,
    },
    #[error("{field} pain range invalid (min {min} > max {max})")]
    PainRange {
        field: &'static str,
        min: i32,
        max: i32,
    },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i32 },
    #[error("temperature decimals must be at most 6 (got {decimals})")]
    Decimals { decimals: usize },
}

/// A `num` in `den` probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chance {
    pub num: u32,
    pub den: u32,
}

impl Chance {
    #[must_use]
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    fn validate(self, field: &'static str) -> Result<(), WeatherConfigError> {
        if self.den == 0 {
            return Err(WeatherConfigError::ZeroDenominator { field });
        }
        if self.num > self.den {
            return Err(WeatherConfigError::ChanceAboveOne {
                field,
                num: self.num,
                den: self.den,
            });
        }
        Ok(())
    }
}

/// How rain soaks the player and feeds the map for one precipitation level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrenchProfile {
    /// One-in-N chance a raincoat still lets the rain through.
    pub raincoat_failure: u32,
    /// One-in-N chance a rain-protecting weapon still lets the rain through.
    pub umbrella_failure: u32,
    /// Effective warmth at or above which the player stays dry.
    pub warmth_ceiling: i32,
    /// Extra 1-in-2 gate before drenching.
    #[serde(default)]
    pub coin_flip: bool,
    pub rain_mm_per_hour: u32,
    /// Age added to outdoor fires each tick.
    pub fire_age: i32,
}

/// Acid protection odds and pain for one acid intensity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcidExposure {
    /// Exposure is rolled on turns divisible by this interval.
    pub interval: u64,
    pub weapon_block: Chance,
    pub raincoat_block: Chance,
    /// Block chance for power armor worn without a helmet.
    pub armor_block: Chance,
    /// One-in-N chance unprotected exposure hurts.
    pub pain_chance: u32,
    pub pain_min: i32,
    pub pain_max: i32,
    /// Pain is only added while the player is below this value.
    pub pain_cap: i32,
}

impl AcidExposure {
    fn validate(&self, field: &'static str) -> Result<(), WeatherConfigError> {
        if self.interval == 0 {
            return Err(WeatherConfigError::ZeroDenominator { field });
        }
        self.weapon_block.validate(field)?;
        self.raincoat_block.validate(field)?;
        self.armor_block.validate(field)?;
        if self.pain_min > self.pain_max {
            return Err(WeatherConfigError::PainRange {
                field,
                min: self.pain_min,
                max: self.pain_max,
            });
        }
        if self.pain_cap < 0 {
            return Err(WeatherConfigError::Negative {
                field,
                value: self.pain_cap,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        })
    }
}

/// Player-facing formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub unit: TemperatureUnit,
    #[serde(default = "DisplayOptions::default_decimals")]
    pub decimals: usize,
}

impl DisplayOptions {
    const fn default_decimals() -> usize {
        1
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::default(),
            decimals: Self::default_decimals(),
        }
    }
}

/// Complete weather tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub wet: DrenchProfile,
    pub very_wet: DrenchProfile,
    pub light_acid: AcidExposure,
    pub acid: AcidExposure,
    /// One-in-N chance of hearing thunder each stormy tick.
    pub thunder_chance: u32,
    /// One-in-N chance per exposed tile of acid pooling each acid rain tick.
    pub acid_field_chance: u32,
    /// Half-width of the swept window around the player, in tiles.
    #[serde(default = "WeatherConfig::default_sweep_x")]
    pub sweep_radius_x: i32,
    #[serde(default = "WeatherConfig::default_sweep_y")]
    pub sweep_radius_y: i32,
    #[serde(default)]
    pub display: DisplayOptions,
}

impl WeatherConfig {
    const fn default_sweep_x() -> i32 {
        SEEX * 2
    }

    const fn default_sweep_y() -> i32 {
        SEEY * 2
    }

    /// Load weather configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or if validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, WeatherConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every odds table and range is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invariant the configuration violates.
    pub fn validate(&self) -> Result<(), WeatherConfigError> {
        // One-in-N odds of zero would roll as a certainty.
        for (field, value) in [
            ("wet.raincoat_failure", self.wet.raincoat_failure),
            ("wet.umbrella_failure", self.wet.umbrella_failure),
            ("very_wet.raincoat_failure", self.very_wet.raincoat_failure),
            ("very_wet.umbrella_failure", self.very_wet.umbrella_failure),
            ("light_acid.pain_chance", self.light_acid.pain_chance),
            ("acid.pain_chance", self.acid.pain_chance),
            ("thunder_chance", self.thunder_chance),
            ("acid_field_chance", self.acid_field_chance),
        ] {
            if value == 0 {
                return Err(WeatherConfigError::ZeroDenominator { field });
            }
        }
        self.light_acid.validate("light_acid")?;
        self.acid.validate("acid")?;
        for (field, value) in [
            ("wet.warmth_ceiling", self.wet.warmth_ceiling),
            ("very_wet.warmth_ceiling", self.very_wet.warmth_ceiling),
            ("wet.fire_age", self.wet.fire_age),
            ("very_wet.fire_age", self.very_wet.fire_age),
            ("sweep_radius_x", self.sweep_radius_x),
            ("sweep_radius_y", self.sweep_radius_y),
        ] {
            if value < 0 {
                return Err(WeatherConfigError::Negative { field, value });
            }
        }
        if self.display.decimals > MAX_DECIMALS {
            return Err(WeatherConfigError::Decimals {
                decimals: self.display.decimals,
            });
        }
        Ok(())
    }

    /// Embedded default configuration, falling back to compiled-in values if
    /// the asset cannot be used.
    #[must_use]
    pub fn default_config() -> Self {
        Self::from_json(DEFAULT_WEATHER_DATA).unwrap_or_else(|err| {
            log::warn!("embedded weather config rejected ({err}); using built-in tuning");
            Self::default()
        })
    }

    /// Tiles around the player swept by map-wide effects.
    #[must_use]
    pub const fn sweep_window(&self) -> SweepWindow {
        SweepWindow {
            radius_x: self.sweep_radius_x,
            radius_y: self.sweep_radius_y,
        }
    }

    /// Copy of this configuration with a different temperature unit.
    #[must_use]
    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.display.unit = unit;
        self
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            wet: DrenchProfile {
                raincoat_failure: 50,
                umbrella_failure: 10,
                warmth_ceiling: 30,
                coin_flip: true,
                rain_mm_per_hour: 4,
                fire_age: 15,
            },
            very_wet: DrenchProfile {
                raincoat_failure: 25,
                umbrella_failure: 5,
                warmth_ceiling: 60,
                coin_flip: false,
                rain_mm_per_hour: 8,
                fire_age: 45,
            },
            light_acid: AcidExposure {
                interval: 10,
                weapon_block: Chance::new(1, 2),
                raincoat_block: Chance::new(2, 3),
                armor_block: Chance::new(3, 4),
                pain_chance: 10,
                pain_min: 1,
                pain_max: 1,
                pain_cap: 10,
            },
            acid: AcidExposure {
                interval: 2,
                weapon_block: Chance::new(1, 4),
                raincoat_block: Chance::new(1, 2),
                armor_block: Chance::new(1, 2),
                pain_chance: 2,
                pain_min: 1,
                pain_max: 5,
                pain_cap: 100,
            },
            thunder_chance: 50,
            acid_field_chance: 400,
            sweep_radius_x: Self::default_sweep_x(),
            sweep_radius_y: Self::default_sweep_y(),
            display: DisplayOptions::default(),
        }
    }
}
