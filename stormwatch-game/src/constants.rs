//! Centralized physical and tuning constants for Stormwatch weather logic.
//!
//! Values that describe how the world is measured (turn length, funnel
//! geometry, the sweep window) live here. Balance values that designers tweak
//! per weather profile live in [`crate::config::WeatherConfig`] instead.

// Calendar -----------------------------------------------------------------
pub const SECONDS_PER_TURN: u64 = 6;
pub const TURNS_PER_MINUTE: u64 = 60 / SECONDS_PER_TURN;
pub const TURNS_PER_HOUR: u64 = 600;
pub const HOURS_PER_DAY: u64 = 24;
pub const TURNS_PER_DAY: u64 = TURNS_PER_HOUR * HOURS_PER_DAY;

// Forecast windows ---------------------------------------------------------
pub(crate) const DAY_FIRST_HOUR: u64 = 6;
pub(crate) const DAY_LAST_HOUR: u64 = 18;
pub(crate) const NIGHT_FIRST_HOUR: u64 = 19;
pub(crate) const NIGHT_LAST_HOUR: u64 = 5;

// Rain collection ----------------------------------------------------------
pub(crate) const FUNNEL_RADIUS_MM: f64 = 380.0;
pub(crate) const MAKESHIFT_FUNNEL_RADIUS_MM: f64 = 85.0;
pub(crate) const ML_TO_MM3: f64 = 1000.0;
pub(crate) const FUNNEL_DIRTY_WATER_CHANCE: u32 = 10;
pub(crate) const ACID_CHARGE_POISON: u32 = 5;
pub(crate) const TRANSMUTE_NUMERATOR: f64 = 2.0;
pub const POISON_MAX: u8 = 100;

// Map window ---------------------------------------------------------------
/// Half the width of one map screen, in tiles.
pub const SEEX: i32 = 12;
/// Half the height of one map screen, in tiles.
pub const SEEY: i32 = 12;

// Player exposure ----------------------------------------------------------
pub(crate) const TORSO_WARMTH_NUMERATOR: i32 = 4;
pub(crate) const WARMTH_DIVISOR: i32 = 5;
pub(crate) const GLARE_INTENSITY: i32 = 1;
pub(crate) const GLARE_DURATION: i32 = 2;

// Message keys -------------------------------------------------------------
pub(crate) const LOG_THUNDER_DISTANT: &str = "log.weather.thunder.distant";
pub(crate) const LOG_THUNDER_ABOVE: &str = "log.weather.thunder.above";
pub(crate) const LOG_ACID_WEAPON_DRIZZLE: &str = "log.weather.acid.weapon-drizzle";
pub(crate) const LOG_ACID_RAINCOAT_DRIZZLE: &str = "log.weather.acid.raincoat-drizzle";
pub(crate) const LOG_ACID_ARMOR: &str = "log.weather.acid.power-armor";
pub(crate) const LOG_ACID_STING: &str = "log.weather.acid.sting";
pub(crate) const LOG_ACID_UMBRELLA: &str = "log.weather.acid.umbrella";
pub(crate) const LOG_ACID_RAINCOAT: &str = "log.weather.acid.raincoat";
pub(crate) const LOG_ACID_BURN: &str = "log.weather.acid.burn";
