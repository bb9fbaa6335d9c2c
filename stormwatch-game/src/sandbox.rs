//! In-memory world used by tests and the scenario tester.
//!
//! Each type here implements one of the [`crate::world`] traits over plain
//! vectors and maps, which is enough to exercise every weather routine
//! without a real game behind it.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};

use crate::calendar::Turn;
use crate::effects::WeatherNotice;
use crate::items::{Item, ItemRegistry, LiquidPrototype};
use crate::liquid::LiquidKind;
use crate::weather::{WeatherSegment, WeatherType};
use crate::world::{
    Actor, Atlas, Bionic, BodyPart, Creature, CreatureRoster, FieldEntry, FieldKind, Garment,
    Map, Mutation, Point, PowerArmor, StatusEffect, TerrainFlag, TimeSource, TrapKind,
    WeatherWorld,
};

const OPEN_GROUND_COST: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub outside: bool,
    pub sunlit: bool,
    pub move_cost: i32,
    pub flags: SmallVec<[TerrainFlag; 2]>,
    pub fields: SmallVec<[FieldEntry; 2]>,
    pub scent: i32,
    pub items: Vec<Item>,
    pub trap: Option<TrapKind>,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            outside: true,
            sunlit: true,
            move_cost: OPEN_GROUND_COST,
            flags: SmallVec::new(),
            fields: SmallVec::new(),
            scent: 0,
            items: Vec::new(),
            trap: None,
        }
    }
}

/// Rectangular map; everything outside the rectangle is solid rock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl GridMap {
    /// Open, sunlit ground in every tile.
    #[must_use]
    pub fn open_sky(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let count = usize::try_from(width * height).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![Tile::default(); count],
        }
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        usize::try_from(p.y * self.width + p.x).ok()
    }

    #[must_use]
    pub fn tile(&self, p: Point) -> Option<&Tile> {
        self.index(p).and_then(|idx| self.tiles.get(idx))
    }

    pub fn tile_mut(&mut self, p: Point) -> Option<&mut Tile> {
        self.index(p).and_then(|idx| self.tiles.get_mut(idx))
    }

    /// Put a roof over `p`.
    pub fn cover(&mut self, p: Point) {
        if let Some(tile) = self.tile_mut(p) {
            tile.outside = false;
            tile.sunlit = false;
        }
    }

    pub fn add_terrain_flag(&mut self, p: Point, flag: TerrainFlag) {
        if let Some(tile) = self.tile_mut(p)
            && !tile.flags.contains(&flag)
        {
            tile.flags.push(flag);
        }
    }

    pub fn place_trap(&mut self, p: Point, kind: TrapKind) {
        if let Some(tile) = self.tile_mut(p) {
            tile.trap = Some(kind);
        }
    }

    pub fn place_item(&mut self, p: Point, item: Item) {
        if let Some(tile) = self.tile_mut(p) {
            tile.items.push(item);
        }
    }

    #[must_use]
    pub fn items_at(&self, p: Point) -> &[Item] {
        match self.tile(p) {
            Some(tile) => &tile.items,
            None => &[],
        }
    }

    #[must_use]
    pub fn field(&self, p: Point, kind: FieldKind) -> Option<FieldEntry> {
        self.tile(p)?
            .fields
            .iter()
            .find(|field| field.kind == kind)
            .copied()
    }

    #[must_use]
    pub fn count_fields(&self, kind: FieldKind) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.fields.iter().any(|field| field.kind == kind))
            .count()
    }

    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
    }
}

impl Map for GridMap {
    fn is_outside(&self, p: Point) -> bool {
        self.tile(p).is_some_and(|tile| tile.outside)
    }

    fn is_in_sunlight(&self, p: Point) -> bool {
        self.tile(p).is_some_and(|tile| tile.sunlit)
    }

    fn move_cost(&self, p: Point) -> i32 {
        self.tile(p).map_or(0, |tile| tile.move_cost)
    }

    fn has_flag(&self, flag: TerrainFlag, p: Point) -> bool {
        self.tile(p).is_some_and(|tile| tile.flags.contains(&flag))
    }

    fn field_mut(&mut self, p: Point, kind: FieldKind) -> Option<&mut FieldEntry> {
        self.tile_mut(p)?
            .fields
            .iter_mut()
            .find(|field| field.kind == kind)
    }

    fn add_field(&mut self, p: Point, kind: FieldKind, strength: i32) {
        let Some(tile) = self.tile_mut(p) else {
            return;
        };
        if let Some(field) = tile.fields.iter_mut().find(|field| field.kind == kind) {
            field.strength = field.strength.max(strength);
        } else {
            tile.fields.push(FieldEntry {
                kind,
                strength,
                age: 0,
            });
        }
    }

    fn scent(&self, p: Point) -> i32 {
        self.tile(p).map_or(0, |tile| tile.scent)
    }

    fn set_scent(&mut self, p: Point, value: i32) {
        if let Some(tile) = self.tile_mut(p) {
            tile.scent = value;
        }
    }

    fn items_at_mut(&mut self, p: Point) -> &mut [Item] {
        match self.tile_mut(p) {
            Some(tile) => tile.items.as_mut_slice(),
            None => &mut [],
        }
    }

    fn trap_locations(&self, kind: TrapKind) -> Vec<Point> {
        self.points()
            .filter(|p| self.tile(*p).is_some_and(|tile| tile.trap == Some(kind)))
            .collect()
    }
}

/// A status effect the player picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub effect: StatusEffect,
    pub part: BodyPart,
    pub intensity: i32,
    pub duration: i32,
}

/// Player stand-in that remembers everything done to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survivor {
    pub pos: Point,
    pub worn: SmallVec<[Garment; 2]>,
    pub power_armor: Option<PowerArmor>,
    pub weapon: Option<Item>,
    pub mutations: SmallVec<[Mutation; 2]>,
    pub bionics: SmallVec<[Bionic; 1]>,
    pub warmth: BTreeMap<BodyPart, i32>,
    pub wetness: BTreeMap<BodyPart, i32>,
    pub pain: i32,
    pub statuses: Vec<StatusRecord>,
    pub notices: Vec<WeatherNotice>,
}

impl Survivor {
    #[must_use]
    pub fn at(pos: Point) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }

    pub fn set_warmth(&mut self, part: BodyPart, warmth: i32) {
        self.warmth.insert(part, warmth);
    }

    #[must_use]
    pub fn wetness(&self, part: BodyPart) -> i32 {
        self.wetness.get(&part).copied().unwrap_or(0)
    }
}

impl Actor for Survivor {
    fn pos(&self) -> Point {
        self.pos
    }

    fn is_wearing(&self, garment: Garment) -> bool {
        self.worn.contains(&garment)
    }

    fn power_armor(&self) -> Option<PowerArmor> {
        self.power_armor
    }

    fn weapon(&self) -> Option<&Item> {
        self.weapon.as_ref()
    }

    fn has_mutation(&self, mutation: Mutation) -> bool {
        self.mutations.contains(&mutation)
    }

    fn has_bionic(&self, bionic: Bionic) -> bool {
        self.bionics.contains(&bionic)
    }

    fn warmth(&self, part: BodyPart) -> i32 {
        self.warmth.get(&part).copied().unwrap_or(0)
    }

    fn drench(&mut self, intensity: i32, parts: &[BodyPart]) {
        for part in parts {
            *self.wetness.entry(*part).or_insert(0) += intensity;
        }
    }

    fn infect(&mut self, effect: StatusEffect, part: BodyPart, intensity: i32, duration: i32) {
        self.statuses.push(StatusRecord {
            effect,
            part,
            intensity,
            duration,
        });
    }

    fn pain(&self) -> i32 {
        self.pain
    }

    fn add_pain(&mut self, amount: i32) {
        self.pain += amount;
    }

    fn notify(&mut self, notice: &WeatherNotice) {
        self.notices.push(notice.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critter {
    pub pos: Point,
    pub hp: i32,
    pub acid_proof: bool,
}

impl Critter {
    #[must_use]
    pub const fn new(pos: Point, hp: i32) -> Self {
        Self {
            pos,
            hp,
            acid_proof: false,
        }
    }

    #[must_use]
    pub const fn acid_proof(mut self) -> Self {
        self.acid_proof = true;
        self
    }
}

impl Creature for Critter {
    fn pos(&self) -> Point {
        self.pos
    }

    fn is_acid_proof(&self) -> bool {
        self.acid_proof
    }

    fn hurt(&mut self, damage: i32) {
        self.hp -= damage;
    }
}

/// The active creatures, in spawn order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horde {
    critters: Vec<Critter>,
}

impl Horde {
    pub fn spawn(&mut self, critter: Critter) {
        self.critters.push(critter);
    }

    #[must_use]
    pub fn critters(&self) -> &[Critter] {
        &self.critters
    }
}

impl CreatureRoster for Horde {
    fn len(&self) -> usize {
        self.critters.len()
    }

    fn creature_mut(&mut self, index: usize) -> Option<&mut dyn Creature> {
        self.critters
            .get_mut(index)
            .map(|critter| critter as &mut dyn Creature)
    }
}

/// Item prototypes keyed by registry id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRegistry {
    liquids: HashMap<String, LiquidPrototype>,
}

impl StaticRegistry {
    /// Water and both acids at a quarter litre per charge.
    #[must_use]
    pub fn standard() -> Self {
        let quarter_litre = LiquidPrototype {
            weight: 250,
            charges: 1,
        };
        let mut registry = Self::default();
        for kind in [LiquidKind::Water, LiquidKind::Acid, LiquidKind::WeakAcid] {
            registry.insert(kind.id(), quarter_litre);
        }
        registry
    }

    pub fn insert(&mut self, id: &str, prototype: LiquidPrototype) {
        self.liquids.insert(id.to_string(), prototype);
    }
}

impl ItemRegistry for StaticRegistry {
    fn find_liquid(&self, id: &str) -> Option<LiquidPrototype> {
        self.liquids.get(id).copied()
    }
}

/// Clock plus current and upcoming weather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub now: Turn,
    pub weather: WeatherType,
    pub temperature: i32,
    pub queue: Vec<WeatherSegment>,
}

impl Ledger {
    #[must_use]
    pub const fn new(now: Turn, weather: WeatherType, temperature: i32) -> Self {
        Self {
            now,
            weather,
            temperature,
            queue: Vec::new(),
        }
    }

    /// Move the clock forward one turn and switch to the next queued
    /// segment once its deadline passes.
    pub fn advance(&mut self) {
        self.now = self.now.plus_turns(1);
        while let Some(next) = self.queue.first()
            && next.deadline <= self.now
        {
            self.weather = next.weather;
            self.temperature = next.temperature;
            self.queue.remove(0);
        }
    }
}

impl TimeSource for Ledger {
    fn now(&self) -> Turn {
        self.now
    }

    fn current_weather(&self) -> WeatherType {
        self.weather
    }

    fn temperature(&self) -> i32 {
        self.temperature
    }

    fn future_weather(&self) -> &[WeatherSegment] {
        &self.queue
    }
}

/// Named cities for forecast headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gazetteer {
    cities: Vec<(Point, String)>,
}

impl Gazetteer {
    #[must_use]
    pub fn with_city(mut self, at: Point, name: &str) -> Self {
        self.cities.push((at, name.to_string()));
        self
    }
}

impl Atlas for Gazetteer {
    fn closest_city(&self, p: Point) -> Option<&str> {
        self.cities
            .iter()
            .min_by_key(|(at, _)| {
                let dx = i64::from(at.x) - i64::from(p.x);
                let dy = i64::from(at.y) - i64::from(p.y);
                dx * dx + dy * dy
            })
            .map(|(_, name)| name.as_str())
    }
}

/// A complete small world: map, player, creatures, registry, clock and atlas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sandbox {
    pub map: GridMap,
    pub player: Survivor,
    pub horde: Horde,
    pub registry: StaticRegistry,
    pub ledger: Ledger,
    pub gazetteer: Gazetteer,
    pub level: i32,
}

impl Sandbox {
    /// Open ground with the player in the middle at noon on day zero.
    #[must_use]
    pub fn open_field(width: i32, height: i32) -> Self {
        let map = GridMap::open_sky(width, height);
        let player = Survivor::at(Point::new(map.width() / 2, map.height() / 2));
        Self {
            map,
            player,
            horde: Horde::default(),
            registry: StaticRegistry::standard(),
            ledger: Ledger::new(Turn::from_hours(12), WeatherType::Clear, 60),
            gazetteer: Gazetteer::default(),
            level: 0,
        }
    }

    /// Borrow the sandbox as a weather world at the ledger's current turn.
    pub fn world(&mut self) -> WeatherWorld<'_> {
        WeatherWorld {
            map: &mut self.map,
            player: &mut self.player,
            creatures: &mut self.horde,
            items: &self.registry,
            turn: self.ledger.now,
            level: self.level,
        }
    }

    /// Total charges of `kind` held in containers anywhere on the map.
    #[must_use]
    pub fn collected(&self, kind: LiquidKind) -> u32 {
        self.map
            .tiles
            .iter()
            .flat_map(|tile| tile.items.iter())
            .filter_map(Item::liquid)
            .filter(|liquid| liquid.kind == kind)
            .map(|liquid| liquid.charges)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::Contents;
    use crate::liquid::Liquid;

    #[test]
    fn off_map_tiles_are_inert() {
        let mut map = GridMap::open_sky(3, 3);
        let off = Point::new(-1, 5);
        assert!(!map.is_outside(off));
        assert_eq!(map.move_cost(off), 0);
        assert!(map.items_at_mut(off).is_empty());
        map.add_field(off, FieldKind::Acid, 1);
        assert_eq!(map.count_fields(FieldKind::Acid), 0);
    }

    #[test]
    fn traps_are_listed_row_by_row() {
        let mut map = GridMap::open_sky(4, 4);
        map.place_trap(Point::new(3, 0), TrapKind::Funnel);
        map.place_trap(Point::new(0, 2), TrapKind::Funnel);
        map.place_trap(Point::new(1, 1), TrapKind::MakeshiftFunnel);
        assert_eq!(
            map.trap_locations(TrapKind::Funnel),
            vec![Point::new(3, 0), Point::new(0, 2)]
        );
    }

    #[test]
    fn ledger_rolls_into_next_segment() {
        let mut ledger = Ledger::new(Turn(0), WeatherType::Clear, 50);
        ledger.queue = vec![
            WeatherSegment::new(Turn(2), WeatherType::Drizzle, 48),
            WeatherSegment::new(Turn(4), WeatherType::Rain, 45),
        ];
        ledger.advance();
        assert_eq!(ledger.current_weather(), WeatherType::Clear);
        ledger.advance();
        assert_eq!(ledger.current_weather(), WeatherType::Drizzle);
        assert_eq!(ledger.temperature(), 48);
        assert_eq!(ledger.future_weather().len(), 1);
    }

    #[test]
    fn closest_city_wins() {
        let atlas = Gazetteer::default()
            .with_city(Point::new(0, 0), "Falls City")
            .with_city(Point::new(40, 40), "Beatrice");
        assert_eq!(atlas.closest_city(Point::new(30, 35)), Some("Beatrice"));
        assert_eq!(Gazetteer::default().closest_city(Point::default()), None);
    }

    #[test]
    fn collected_sums_liquid_by_kind() {
        let mut sandbox = Sandbox::open_field(3, 3);
        let jug = Item::sealed_container("jug", "jug", 10);
        sandbox.map.place_item(
            Point::new(0, 0),
            jug.clone()
                .with_contents(Contents::Liquid(Liquid::new(LiquidKind::Water, 3))),
        );
        sandbox.map.place_item(
            Point::new(2, 2),
            jug.with_contents(Contents::Liquid(Liquid::new(LiquidKind::Water, 2))),
        );
        assert_eq!(sandbox.collected(LiquidKind::Water), 5);
        assert_eq!(sandbox.collected(LiquidKind::Acid), 0);
    }
}
