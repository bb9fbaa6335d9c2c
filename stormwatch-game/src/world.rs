//! Collaborators the weather model reads and mutates.
//!
//! The weather core owns none of the world. The surrounding game implements
//! these traits over its own map, player and creature storage and lends them
//! to each weather call through a [`WeatherWorld`].
use serde::{Deserialize, Serialize};

use crate::calendar::Turn;
use crate::effects::WeatherNotice;
use crate::items::{Item, ItemRegistry};
use crate::weather::{WeatherSegment, WeatherType};

/// Map tile coordinate. Ordered by `x`, then `y`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrapKind {
    Funnel,
    MakeshiftFunnel,
    BearTrap,
    Tripwire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainFlag {
    Diggable,
    NoItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Fire,
    Acid,
}

/// A field effect sitting on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub kind: FieldKind,
    pub strength: i32,
    /// Older fields burn out or evaporate sooner.
    pub age: i32,
}

/// Tile storage and flags.
pub trait Map {
    fn is_outside(&self, p: Point) -> bool;
    fn is_in_sunlight(&self, p: Point) -> bool;
    /// Movement cost of the tile; zero or less is impassable.
    fn move_cost(&self, p: Point) -> i32;
    fn has_flag(&self, flag: TerrainFlag, p: Point) -> bool;
    fn field_mut(&mut self, p: Point, kind: FieldKind) -> Option<&mut FieldEntry>;
    fn add_field(&mut self, p: Point, kind: FieldKind, strength: i32);
    fn scent(&self, p: Point) -> i32;
    fn set_scent(&mut self, p: Point, value: i32);
    fn items_at_mut(&mut self, p: Point) -> &mut [Item];
    fn trap_locations(&self, kind: TrapKind) -> Vec<Point>;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Torso,
    Head,
    Eyes,
    Arms,
    Legs,
}

/// Worn items the weather cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Garment {
    Raincoat,
    Sunglasses,
}

impl Garment {
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Raincoat => "coat_rain",
            Self::Sunglasses => "sunglasses",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutation {
    Feathers,
    BadHearing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bionic {
    Sunglasses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    Glare,
}

/// Worn power armor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerArmor {
    pub helmet: bool,
}

/// The player character.
pub trait Actor {
    fn pos(&self) -> Point;
    fn is_wearing(&self, garment: Garment) -> bool;
    fn power_armor(&self) -> Option<PowerArmor>;
    fn weapon(&self) -> Option<&Item>;
    fn has_mutation(&self, mutation: Mutation) -> bool;
    fn has_bionic(&self, bionic: Bionic) -> bool;
    fn warmth(&self, part: BodyPart) -> i32;
    fn drench(&mut self, intensity: i32, parts: &[BodyPart]);
    fn infect(&mut self, effect: StatusEffect, part: BodyPart, intensity: i32, duration: i32);
    fn pain(&self) -> i32;
    fn add_pain(&mut self, amount: i32);
    fn notify(&mut self, notice: &WeatherNotice);
}

/// An active non-player creature.
pub trait Creature {
    fn pos(&self) -> Point;
    fn is_acid_proof(&self) -> bool;
    fn hurt(&mut self, damage: i32);
}

/// Indexed access to active creatures.
pub trait CreatureRoster {
    fn len(&self) -> usize;
    fn creature_mut(&mut self, index: usize) -> Option<&mut dyn Creature>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Clock plus the scheduler's queue of upcoming weather.
pub trait TimeSource {
    fn now(&self) -> Turn;
    fn current_weather(&self) -> WeatherType;
    /// Fahrenheit.
    fn temperature(&self) -> i32;
    /// Upcoming segments ordered by deadline.
    fn future_weather(&self) -> &[WeatherSegment];
}

/// Named settlements on the overmap.
pub trait Atlas {
    fn closest_city(&self, p: Point) -> Option<&str>;
}

/// Everything one weather tick may touch.
pub struct WeatherWorld<'a> {
    pub map: &'a mut dyn Map,
    pub player: &'a mut dyn Actor,
    pub creatures: &'a mut dyn CreatureRoster,
    pub items: &'a dyn ItemRegistry,
    pub turn: Turn,
    /// Vertical level; negative is underground.
    pub level: i32,
}

impl WeatherWorld<'_> {
    /// Player stands under open sky on or above ground.
    #[must_use]
    pub fn player_outside(&self) -> bool {
        self.level >= 0 && self.map.is_outside(self.player.pos())
    }
}
