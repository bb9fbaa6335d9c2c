use crate::config::WeatherConfig;
use crate::effects::TickOutcome;
use crate::forecast::{ForecastReport, forecast_report};
use crate::rng::RngBundle;
use crate::weather::WeatherType;
use crate::world::{Atlas, Point, TimeSource, WeatherWorld};

/// Drives weather effects and forecasts for one game.
///
/// Owns the tuning and the seeded random streams so every tick of a given
/// seed plays out the same way.
#[derive(Debug)]
pub struct WeatherController {
    config: WeatherConfig,
    rngs: RngBundle,
}

impl WeatherController {
    #[must_use]
    pub fn new(config: WeatherConfig, seed: u64) -> Self {
        Self {
            config,
            rngs: RngBundle::from_user_seed(seed),
        }
    }

    /// Controller using the embedded default tuning.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(WeatherConfig::default_config(), seed)
    }

    #[must_use]
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    #[must_use]
    pub const fn rngs(&self) -> &RngBundle {
        &self.rngs
    }

    /// Run one tick of `weather` against `world`.
    pub fn tick(&self, world: &mut WeatherWorld<'_>, weather: WeatherType) -> TickOutcome {
        let mut dice = self.rngs.weather();
        weather.effect().apply(world, &self.config, &mut *dice)
    }

    /// Structured radio forecast as heard from `tower`.
    #[must_use]
    pub fn forecast(
        &self,
        time: &dyn TimeSource,
        atlas: &dyn Atlas,
        tower: Point,
    ) -> ForecastReport {
        forecast_report(time, atlas, tower, self.config.display)
    }

    /// Random draws consumed by weather ticks so far.
    #[must_use]
    pub fn weather_draws(&self) -> u64 {
        self.rngs.weather().draws()
    }
}
