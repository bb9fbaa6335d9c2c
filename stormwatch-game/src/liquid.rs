//! Rain mixing inside collection containers.
//!
//! A container holds at most one liquid. Rain either tops it up, seeds it,
//! or, when acid meets water, slowly turns it into weak acid.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ACID_CHARGE_POISON, FUNNEL_DIRTY_WATER_CHANCE, POISON_MAX, TRANSMUTE_NUMERATOR,
};
use crate::items::{Contents, Item};
use crate::numbers::{clamp_u32_to_u8, u32_to_f64};
use crate::rng::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidKind {
    Water,
    Acid,
    WeakAcid,
}

impl LiquidKind {
    /// Registry identifier of the liquid prototype.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Acid => "water_acid",
            Self::WeakAcid => "water_acid_weak",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "water" => Some(Self::Water),
            "water_acid" => Some(Self::Acid),
            "water_acid_weak" => Some(Self::WeakAcid),
            _ => None,
        }
    }

    /// Liquid that falls from the sky in the given rain.
    #[must_use]
    pub const fn rain(acid: bool) -> Self {
        if acid { Self::Acid } else { Self::Water }
    }
}

impl fmt::Display for LiquidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liquid {
    pub kind: LiquidKind,
    pub charges: u32,
    /// Contamination, 0..=100.
    #[serde(default)]
    pub poison: u8,
}

impl Liquid {
    #[must_use]
    pub const fn new(kind: LiquidKind, charges: u32) -> Self {
        Self {
            kind,
            charges,
            poison: 0,
        }
    }

    #[must_use]
    pub const fn with_poison(mut self, poison: u8) -> Self {
        self.poison = if poison > POISON_MAX {
            POISON_MAX
        } else {
            poison
        };
        self
    }
}

/// What one charge of rain did to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RainOutcome {
    /// The container was empty and now holds one charge.
    Seeded { poisoned: bool },
    /// Same liquid (or weak acid) gained a charge.
    ToppedUp,
    /// Acid and water met and the whole container became weak acid.
    Transmuted,
    /// Acid fell into water without converting it; the water got dirtier.
    Tainted { poison: u8 },
    /// Acid and water met but nothing else changed (existing acid, new water).
    Diluted,
    /// The item cannot take rain.
    Rejected,
}

/// Add one charge of `incoming` rain to `container`.
pub fn collect_rain(
    container: &mut Item,
    incoming: LiquidKind,
    dice: &mut dyn Dice,
) -> RainOutcome {
    let Some(capacity) = container.rain_capacity() else {
        return RainOutcome::Rejected;
    };
    if capacity == 0 {
        return RainOutcome::Rejected;
    }

    let holds_liquid = container.liquid().is_some_and(|liquid| liquid.charges > 0);
    if !holds_liquid {
        let fresh = seed_liquid(incoming, dice);
        container.contents = Some(Contents::Liquid(fresh));
        return RainOutcome::Seeded {
            poisoned: fresh.poison > 0,
        };
    }
    let Some(Contents::Liquid(current)) = container.contents.as_mut() else {
        return RainOutcome::Rejected;
    };

    if current.charges < capacity {
        current.charges += 1;
    }

    if current.kind == incoming || current.kind == LiquidKind::WeakAcid {
        return RainOutcome::ToppedUp;
    }

    // One charge of acid per `charges` charges of water is like twice that
    // share of weak acid, so the blend converts with odds 2 in `charges`.
    if dice.x_in_y(TRANSMUTE_NUMERATOR, u32_to_f64(current.charges)) {
        *current = Liquid::new(LiquidKind::WeakAcid, current.charges);
        log::debug!(
            "rain turned {} charges into {}",
            current.charges,
            LiquidKind::WeakAcid
        );
        return RainOutcome::Transmuted;
    }

    if current.kind == LiquidKind::Water {
        current.poison = blend_poison(current.poison, current.charges, dice);
        return RainOutcome::Tainted {
            poison: current.poison,
        };
    }

    RainOutcome::Diluted
}

fn seed_liquid(incoming: LiquidKind, dice: &mut dyn Dice) -> Liquid {
    let fresh = Liquid::new(incoming, 1);
    if incoming == LiquidKind::Water && dice.one_in(FUNNEL_DIRTY_WATER_CHANCE) {
        // Funnels aren't always clean.
        return fresh.with_poison(1);
    }
    fresh
}

/// Average one charge of poison-5 water into `charges` charges (the new
/// charge already counted), carrying the integer remainder stochastically.
fn blend_poison(poison: u8, charges: u32, dice: &mut dyn Dice) -> u8 {
    if charges == 0 {
        return poison;
    }
    let total = u32::from(poison) * (charges - 1) + ACID_CHARGE_POISON;
    let mut blended = total / charges;
    let leftover = total - blended * charges;
    let draw = dice.rng(0, i32::try_from(charges - 1).unwrap_or(i32::MAX));
    if i64::from(leftover) > i64::from(draw) {
        blended += 1;
    }
    clamp_u32_to_u8(blended, POISON_MAX)
}
