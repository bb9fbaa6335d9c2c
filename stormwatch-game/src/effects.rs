//! Per-tick weather effects on the player, the map and nearby creatures.
//!
//! Each routine mirrors one [`WeatherEffect`]. They never fail: missing
//! gear, funnels or prototypes simply mean nothing happens. What did happen
//! is returned as a [`TickOutcome`] so callers can report on it.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{AcidExposure, Chance, DrenchProfile, WeatherConfig};
use crate::constants::{
    GLARE_DURATION, GLARE_INTENSITY, LOG_ACID_ARMOR, LOG_ACID_BURN, LOG_ACID_RAINCOAT,
    LOG_ACID_RAINCOAT_DRIZZLE, LOG_ACID_STING, LOG_ACID_UMBRELLA, LOG_ACID_WEAPON_DRIZZLE,
    LOG_THUNDER_ABOVE, LOG_THUNDER_DISTANT, TORSO_WARMTH_NUMERATOR, WARMTH_DIVISOR,
};
use crate::funnel::{RainDeposit, fill_water_collectors};
use crate::items::ItemFlag;
use crate::rng::Dice;
use crate::sweep::{burn_exposed_creatures, decay_fire_and_scent, seed_acid_fields};
use crate::weather::WeatherEffect;
use crate::world::{Actor, Bionic, BodyPart, Garment, Mutation, StatusEffect, WeatherWorld};

const SOAKED_PARTS: [BodyPart; 3] = [BodyPart::Torso, BodyPart::Arms, BodyPart::Head];

/// Player-facing weather message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherNotice {
    DistantThunder,
    ThunderAbove,
    WeaponShieldsDrizzle { weapon: String },
    RaincoatShieldsDrizzle,
    PowerArmorShields,
    AcidStings,
    UmbrellaShieldsRain,
    RaincoatShieldsRain,
    AcidBurns,
}

impl WeatherNotice {
    /// Stable identifier for translation tables.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::DistantThunder => LOG_THUNDER_DISTANT,
            Self::ThunderAbove => LOG_THUNDER_ABOVE,
            Self::WeaponShieldsDrizzle { .. } => LOG_ACID_WEAPON_DRIZZLE,
            Self::RaincoatShieldsDrizzle => LOG_ACID_RAINCOAT_DRIZZLE,
            Self::PowerArmorShields => LOG_ACID_ARMOR,
            Self::AcidStings => LOG_ACID_STING,
            Self::UmbrellaShieldsRain => LOG_ACID_UMBRELLA,
            Self::RaincoatShieldsRain => LOG_ACID_RAINCOAT,
            Self::AcidBurns => LOG_ACID_BURN,
        }
    }

    /// English text of the message.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::DistantThunder => "You hear a distant rumble of thunder.".to_string(),
            Self::ThunderAbove => "You hear a rumble of thunder from above.".to_string(),
            Self::WeaponShieldsDrizzle { weapon } => {
                format!("Your {weapon} protects you from the acidic drizzle.")
            }
            Self::RaincoatShieldsDrizzle => {
                "Your raincoat protects you from the acidic drizzle.".to_string()
            }
            Self::PowerArmorShields => {
                "Your power armor protects you from the acidic drizzle.".to_string()
            }
            Self::AcidStings => {
                "The acid rain stings, but is mostly harmless for now...".to_string()
            }
            Self::UmbrellaShieldsRain => {
                "Your umbrella protects you from the acid rain.".to_string()
            }
            Self::RaincoatShieldsRain => {
                "Your raincoat protects you from the acid rain.".to_string()
            }
            Self::AcidBurns => "The acid rain burns!".to_string(),
        }
    }
}

impl fmt::Display for WeatherNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Everything one weather tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// Drench intensity applied to the player, if any.
    pub drench: Option<i32>,
    pub deposits: Vec<RainDeposit>,
    pub acid_fields: usize,
    pub creatures_burned: usize,
    pub pain: i32,
    pub glare: bool,
    pub notices: Vec<WeatherNotice>,
}

impl TickOutcome {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        *self == Self::default()
    }

    fn notify(&mut self, world: &mut WeatherWorld<'_>, notice: WeatherNotice) {
        world.player.notify(&notice);
        self.notices.push(notice);
    }
}

impl WeatherEffect {
    /// Run this effect for one tick.
    pub fn apply(
        self,
        world: &mut WeatherWorld<'_>,
        config: &WeatherConfig,
        dice: &mut dyn Dice,
    ) -> TickOutcome {
        log::trace!("weather tick {} runs {self:?}", world.turn.get());
        match self {
            Self::None => TickOutcome::default(),
            Self::Glare => glare(world),
            Self::Wet => wet(world, config, dice),
            Self::VeryWet => very_wet(world, config, dice),
            Self::Thunder => thunder(world, config, dice),
            Self::Lightning => lightning(world, config, dice),
            Self::LightAcid => light_acid(world, config, dice),
            Self::Acid => acid(world, config, dice),
        }
    }
}

/// Insulation that keeps rain from soaking through, from torso and head.
#[must_use]
pub fn effective_warmth(player: &dyn Actor) -> i32 {
    player.warmth(BodyPart::Torso) * TORSO_WARMTH_NUMERATOR / WARMTH_DIVISOR
        + player.warmth(BodyPart::Head) / WARMTH_DIVISOR
}

fn keeps_rain_off(player: &dyn Actor) -> bool {
    player
        .weapon()
        .is_some_and(|weapon| weapon.has_flag(ItemFlag::RainProtect))
}

fn roll(dice: &mut dyn Dice, chance: Chance) -> bool {
    dice.x_in_y(f64::from(chance.num), f64::from(chance.den))
}

fn soak_player(
    world: &mut WeatherWorld<'_>,
    profile: &DrenchProfile,
    dice: &mut dyn Dice,
    out: &mut TickOutcome,
) {
    let player = &*world.player;
    let warmth = effective_warmth(player);
    let soaked = (!player.is_wearing(Garment::Raincoat) || dice.one_in(profile.raincoat_failure))
        && (!keeps_rain_off(player) || dice.one_in(profile.umbrella_failure))
        && !player.has_mutation(Mutation::Feathers)
        && warmth < profile.warmth_ceiling
        && world.player_outside()
        && (!profile.coin_flip || dice.one_in(2));
    if soaked {
        let intensity = profile.warmth_ceiling - warmth;
        world.player.drench(intensity, &SOAKED_PARTS);
        out.drench = Some(intensity);
    }
}

fn rain(
    world: &mut WeatherWorld<'_>,
    config: &WeatherConfig,
    profile: &DrenchProfile,
    dice: &mut dyn Dice,
    acid: bool,
    out: &mut TickOutcome,
) {
    soak_player(world, profile, dice, out);
    out.deposits.extend(fill_water_collectors(world, dice, profile.rain_mm_per_hour, acid));
    decay_fire_and_scent(world, config.sweep_window(), profile.fire_age);
}

/// Light rain.
pub fn wet(
    world: &mut WeatherWorld<'_>,
    config: &WeatherConfig,
    dice: &mut dyn Dice,
) -> TickOutcome {
    let mut out = TickOutcome::default();
    rain(world, config, &config.wet, dice, false, &mut out);
    out
}

/// Heavy rain.
pub fn very_wet(
    world: &mut WeatherWorld<'_>,
    config: &WeatherConfig,
    dice: &mut dyn Dice,
) -> TickOutcome {
    let mut out = TickOutcome::default();
    rain(world, config, &config.very_wet, dice, false, &mut out);
    out
}

/// Heavy rain plus the occasional thunderclap. Deep underground only the
/// sharp-eared hear it, and the deeper the rarer.
pub fn thunder(
    world: &mut WeatherWorld<'_>,
    config: &WeatherConfig,
    dice: &mut dyn Dice,
) -> TickOutcome {
    let mut out = very_wet(world, config, dice);
    if !dice.one_in(config.thunder_chance) {
        return out;
    }
    if world.level >= 0 {
        out.notify(world, WeatherNotice::DistantThunder);
    } else if !world.player.has_mutation(Mutation::BadHearing) {
        let depth_chance = u32::try_from(1 - 3 * world.level).unwrap_or(u32::MAX);
        if dice.one_in(depth_chance) {
            out.notify(world, WeatherNotice::ThunderAbove);
        }
    }
    out
}

/// Lightning storms sound and soak exactly like thunderstorms.
pub fn lightning(
    world: &mut WeatherWorld<'_>,
    config: &WeatherConfig,
    dice: &mut dyn Dice,
) -> TickOutcome {
    thunder(world, config, dice)
}

/// Acidic drizzle: light rain that occasionally stings.
pub fn light_acid(
    world: &mut WeatherWorld<'_>,
    config: &WeatherConfig,
    dice: &mut dyn Dice,
) -> TickOutcome {
    let mut out = TickOutcome::default();
    rain(world, config, &config.wet, dice, true, &mut out);
    expose_to_acid(world, &config.light_acid, false, dice, &mut out);
    out
}

/// Acid rain: burns the player, pools on the ground, hurts creatures and
/// then soaks everything like heavy rain.
pub fn acid(
    world: &mut WeatherWorld<'_>,
    config: &WeatherConfig,
    dice: &mut dyn Dice,
) -> TickOutcome {
    let mut out = TickOutcome::default();
    expose_to_acid(world, &config.acid, true, dice, &mut out);
    out.acid_fields =
        seed_acid_fields(world, config.sweep_window(), dice, config.acid_field_chance);
    out.creatures_burned = burn_exposed_creatures(world);
    rain(world, config, &config.very_wet, dice, true, &mut out);
    out
}

fn expose_to_acid(
    world: &mut WeatherWorld<'_>,
    exposure: &AcidExposure,
    heavy: bool,
    dice: &mut dyn Dice,
    out: &mut TickOutcome,
) {
    if !world.turn.is_every(exposure.interval) || !world.player_outside() {
        return;
    }
    let umbrella = world
        .player
        .weapon()
        .filter(|weapon| weapon.has_flag(ItemFlag::RainProtect))
        .map(|weapon| weapon.name.clone());

    let notice = if let Some(weapon) = umbrella
        && roll(dice, exposure.weapon_block)
    {
        if heavy {
            WeatherNotice::UmbrellaShieldsRain
        } else {
            WeatherNotice::WeaponShieldsDrizzle { weapon }
        }
    } else if world.player.is_wearing(Garment::Raincoat) && roll(dice, exposure.raincoat_block) {
        if heavy {
            WeatherNotice::RaincoatShieldsRain
        } else {
            WeatherNotice::RaincoatShieldsDrizzle
        }
    } else if world
        .player
        .power_armor()
        .is_some_and(|armor| armor.helmet || roll(dice, exposure.armor_block))
    {
        WeatherNotice::PowerArmorShields
    } else {
        let notice = if heavy {
            WeatherNotice::AcidBurns
        } else {
            WeatherNotice::AcidStings
        };
        if dice.one_in(exposure.pain_chance) && world.player.pain() < exposure.pain_cap {
            let amount = dice.rng(exposure.pain_min, exposure.pain_max);
            world.player.add_pain(amount);
            out.pain += amount;
        }
        notice
    };
    out.notify(world, notice);
}

/// Bright sun dazzles unprotected eyes.
pub fn glare(world: &mut WeatherWorld<'_>) -> TickOutcome {
    let mut out = TickOutcome::default();
    let pos = world.player.pos();
    if world.player_outside()
        && world.map.is_in_sunlight(pos)
        && !world.player.is_wearing(Garment::Sunglasses)
        && !world.player.has_bionic(Bionic::Sunglasses)
    {
        world.player.infect(
            StatusEffect::Glare,
            BodyPart::Eyes,
            GLARE_INTENSITY,
            GLARE_DURATION,
        );
        out.glare = true;
    }
    out
}
