//! Stormwatch Weather Engine
//!
//! Platform-agnostic weather logic for a turn-based survival world: per-tick
//! rain, acid and glare effects, rain collection under funnels, and the
//! radio forecast. The surrounding game supplies its map, player and
//! creatures through the traits in [`world`].

pub mod calendar;
pub mod config;
pub mod constants;
pub mod controller;
pub mod effects;
pub mod forecast;
pub mod funnel;
pub mod items;
pub mod liquid;
pub mod numbers;
pub mod rng;
pub mod sandbox;
pub mod sweep;
pub mod weather;
pub mod world;

// Re-export commonly used types
pub use calendar::{Turn, Weekday};
pub use config::{
    AcidExposure, Chance, DisplayOptions, DrenchProfile, TemperatureUnit, WeatherConfig,
    WeatherConfigError,
};
pub use controller::WeatherController;
pub use effects::{
    TickOutcome, WeatherNotice, acid, effective_warmth, glare, light_acid, lightning, thunder,
    very_wet, wet,
};
pub use forecast::{
    ForecastAccumulator, ForecastPeriod, ForecastReport, ForecastWindow, forecast_periods,
    forecast_report, print_temperature, weather_forecast,
};
pub use funnel::{FunnelSpec, RainDeposit, fill_funnels, fill_water_collectors};
pub use items::{Contents, Item, ItemFlag, ItemKind, ItemRegistry, LiquidPrototype};
pub use liquid::{Liquid, LiquidKind, RainOutcome, collect_rain};
pub use rng::{CountingRng, Dice, DiceCall, RngBundle, ScriptedDice};
pub use sweep::{SweepWindow, burn_exposed_creatures, decay_fire_and_scent, seed_acid_fields};
pub use weather::{Precipitation, WeatherEffect, WeatherSegment, WeatherType};
pub use world::{
    Actor, Atlas, Bionic, BodyPart, Creature, CreatureRoster, FieldEntry, FieldKind, Garment,
    Map, Mutation, Point, PowerArmor, StatusEffect, TerrainFlag, TimeSource, TrapKind,
    WeatherWorld,
};
