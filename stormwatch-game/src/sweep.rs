//! Map-wide weather passes over the tiles around the player.
use serde::{Deserialize, Serialize};

use crate::constants::{SEEX, SEEY};
use crate::rng::Dice;
use crate::world::{FieldKind, Point, TerrainFlag, WeatherWorld};

/// Rectangle of tiles centred on the player that weather sweeps each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepWindow {
    pub radius_x: i32,
    pub radius_y: i32,
}

impl Default for SweepWindow {
    fn default() -> Self {
        Self {
            radius_x: SEEX * 2,
            radius_y: SEEY * 2,
        }
    }
}

impl SweepWindow {
    /// Tiles of the window around `center`, x-major then y.
    pub fn around(self, center: Point) -> impl Iterator<Item = Point> {
        let (radius_x, radius_y) = (self.radius_x.max(0), self.radius_y.max(0));
        (center.x - radius_x..=center.x + radius_x).flat_map(move |x| {
            (center.y - radius_y..=center.y + radius_y).map(move |y| Point::new(x, y))
        })
    }
}

/// Rain ages outdoor fires by `fire_age` and washes one point of scent off
/// every outdoor tile.
pub fn decay_fire_and_scent(world: &mut WeatherWorld<'_>, window: SweepWindow, fire_age: i32) {
    for pos in window.around(world.player.pos()) {
        if !world.map.is_outside(pos) {
            continue;
        }
        if let Some(fire) = world.map.field_mut(pos, FieldKind::Fire) {
            fire.age += fire_age;
        }
        let scent = world.map.scent(pos);
        if scent > 0 {
            world.map.set_scent(pos, scent - 1);
        }
    }
}

/// Pool weak acid fields on exposed, paved, walkable tiles.
///
/// Returns the number of fields added. Nothing pools underground.
pub fn seed_acid_fields(
    world: &mut WeatherWorld<'_>,
    window: SweepWindow,
    dice: &mut dyn Dice,
    chance: u32,
) -> usize {
    if world.level < 0 {
        return 0;
    }
    let mut pooled = 0;
    for pos in window.around(world.player.pos()) {
        let exposed = !world.map.has_flag(TerrainFlag::Diggable, pos)
            && !world.map.has_flag(TerrainFlag::NoItem, pos)
            && world.map.move_cost(pos) > 0
            && world.map.is_outside(pos);
        if exposed && dice.one_in(chance) {
            world.map.add_field(pos, FieldKind::Acid, 1);
            pooled += 1;
        }
    }
    if pooled > 0 {
        log::debug!("acid rain pooled on {pooled} tiles");
    }
    pooled
}

/// Every creature standing in the open takes one point of acid damage unless
/// it is immune. Returns how many were burned.
pub fn burn_exposed_creatures(world: &mut WeatherWorld<'_>) -> usize {
    let mut burned = 0;
    for index in 0..world.creatures.len() {
        let Some(creature) = world.creatures.creature_mut(index) else {
            continue;
        };
        if world.map.is_outside(creature.pos()) && !creature.is_acid_proof() {
            creature.hurt(1);
            burned += 1;
        }
    }
    burned
}
