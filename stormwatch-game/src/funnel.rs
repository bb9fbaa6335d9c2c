//! Rain collection under funnel traps.
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constants::{FUNNEL_RADIUS_MM, MAKESHIFT_FUNNEL_RADIUS_MM, ML_TO_MM3, TURNS_PER_HOUR};
use crate::liquid::{LiquidKind, RainOutcome, collect_rain};
use crate::numbers::{u32_to_f64, u64_to_f64};
use crate::rng::Dice;
use crate::world::{Point, TrapKind, WeatherWorld};

/// Catchment geometry of a funnel-type trap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FunnelSpec {
    pub catchment_radius_mm: f64,
}

impl FunnelSpec {
    /// Funnel geometry for `kind`, or `None` for traps that catch nothing.
    #[must_use]
    pub const fn for_trap(kind: TrapKind) -> Option<Self> {
        match kind {
            TrapKind::Funnel => Some(Self {
                catchment_radius_mm: FUNNEL_RADIUS_MM,
            }),
            TrapKind::MakeshiftFunnel => Some(Self {
                catchment_radius_mm: MAKESHIFT_FUNNEL_RADIUS_MM,
            }),
            TrapKind::BearTrap | TrapKind::Tripwire => None,
        }
    }

    /// Catchment area in square millimetres.
    #[must_use]
    pub fn area_mm2(self) -> f64 {
        PI * self.catchment_radius_mm * self.catchment_radius_mm
    }

    /// Expected turns for this funnel to gather one charge of `charge_ml`
    /// millilitres at `rate_mm_per_hour`.
    ///
    /// `None` when the rate or charge volume make collection impossible.
    #[must_use]
    pub fn turns_per_charge(self, charge_ml: f64, rate_mm_per_hour: u32) -> Option<f64> {
        let per_turn_mm3 =
            self.area_mm2() * u32_to_f64(rate_mm_per_hour) / u64_to_f64(TURNS_PER_HOUR);
        let turns = charge_ml * ML_TO_MM3 / per_turn_mm3;
        (turns.is_finite() && turns > 0.0).then_some(turns)
    }
}

/// One charge of rain that landed in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RainDeposit {
    pub at: Point,
    pub kind: LiquidKind,
    pub outcome: RainOutcome,
}

/// Roll every funnel of `kind` and drop at most one charge of rain into the
/// biggest container found under a funnel that caught something.
///
/// Funnels are visited in ascending `(x, y)` order. A container replaces the
/// current pick when its capacity is at least as large, so a later funnel
/// takes over an equal-capacity pick from an earlier one.
pub fn fill_funnels(
    world: &mut WeatherWorld<'_>,
    dice: &mut dyn Dice,
    rate_mm_per_hour: u32,
    acid: bool,
    kind: TrapKind,
) -> Option<RainDeposit> {
    let spec = FunnelSpec::for_trap(kind)?;
    let charge_ml = world.items.liquid(LiquidKind::Water)?.charge_ml()?;
    let turns_per_charge = spec.turns_per_charge(charge_ml, rate_mm_per_hour)?;

    let mut funnels = world.map.trap_locations(kind);
    funnels.sort_unstable();

    let mut best_capacity = 0;
    let mut picked: Option<(Point, usize)> = None;
    for pos in funnels {
        if !dice.x_in_y(1.0, turns_per_charge) {
            continue;
        }
        for (index, item) in world.map.items_at_mut(pos).iter().enumerate() {
            let Some(capacity) = item.rain_capacity() else {
                continue;
            };
            if capacity > 0 && capacity >= best_capacity {
                best_capacity = capacity;
                picked = Some((pos, index));
            }
        }
    }

    let (at, index) = picked?;
    let incoming = LiquidKind::rain(acid);
    let container = world.map.items_at_mut(at).get_mut(index)?;
    let outcome = collect_rain(container, incoming, dice);
    log::debug!(
        "{kind:?} at ({}, {}) caught {incoming} in {}: {outcome:?}",
        at.x,
        at.y,
        container.name
    );
    Some(RainDeposit {
        at,
        kind: incoming,
        outcome,
    })
}

/// Standard funnels first, then makeshift ones.
pub fn fill_water_collectors(
    world: &mut WeatherWorld<'_>,
    dice: &mut dyn Dice,
    rate_mm_per_hour: u32,
    acid: bool,
) -> Vec<RainDeposit> {
    [TrapKind::Funnel, TrapKind::MakeshiftFunnel]
        .into_iter()
        .filter_map(|kind| fill_funnels(world, dice, rate_mm_per_hour, acid, kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Contents, Item};
    use crate::liquid::Liquid;
    use crate::rng::{DiceCall, ScriptedDice};
    use crate::sandbox::{Sandbox, StaticRegistry};

    fn jug(capacity: u32) -> Item {
        Item::sealed_container("jug", "jug", capacity)
    }

    fn charges_at(sandbox: &Sandbox, at: Point, index: usize) -> u32 {
        sandbox.map.items_at(at)[index]
            .liquid()
            .map_or(0, |liquid| liquid.charges)
    }

    #[test]
    fn geometry_matches_catchment_radius() {
        assert!(FunnelSpec::for_trap(TrapKind::BearTrap).is_none());
        let funnel = FunnelSpec::for_trap(TrapKind::Funnel).unwrap();
        let makeshift = FunnelSpec::for_trap(TrapKind::MakeshiftFunnel).unwrap();
        assert!(funnel.area_mm2() > makeshift.area_mm2());

        // 250 ml at 4 mm/h under a 380 mm funnel.
        let expected = 250.0 * 1000.0 / (PI * 380.0 * 380.0 * 4.0 / 600.0);
        let turns = funnel.turns_per_charge(250.0, 4).unwrap();
        assert!((turns - expected).abs() < 1e-9);
        assert!(makeshift.turns_per_charge(250.0, 4).unwrap() > turns);
    }

    #[test]
    fn impossible_rates_yield_no_schedule() {
        let funnel = FunnelSpec::for_trap(TrapKind::Funnel).unwrap();
        assert_eq!(funnel.turns_per_charge(250.0, 0), None);
        assert_eq!(funnel.turns_per_charge(0.0, 4), None);
        assert_eq!(funnel.turns_per_charge(f64::NAN, 4), None);
    }

    #[test]
    fn unknown_trap_kinds_are_ignored() {
        let mut sandbox = Sandbox::open_field(9, 9);
        let at = Point::new(2, 2);
        sandbox.map.place_trap(at, TrapKind::BearTrap);
        sandbox.map.place_item(at, jug(10));
        let mut dice = ScriptedDice::always(true);
        let deposit = fill_funnels(
            &mut sandbox.world(),
            &mut dice,
            4,
            false,
            TrapKind::BearTrap,
        );
        assert_eq!(deposit, None);
        assert_eq!(charges_at(&sandbox, at, 0), 0);
    }

    #[test]
    fn missing_water_prototype_is_a_no_op() {
        let mut sandbox = Sandbox::open_field(9, 9);
        sandbox.registry = StaticRegistry::default();
        let at = Point::new(2, 2);
        sandbox.map.place_trap(at, TrapKind::Funnel);
        sandbox.map.place_item(at, jug(10));
        let mut dice = ScriptedDice::always(true);
        assert!(fill_water_collectors(&mut sandbox.world(), &mut dice, 4, false).is_empty());
        assert_eq!(charges_at(&sandbox, at, 0), 0);
    }

    #[test]
    fn largest_container_across_successful_funnels_wins() {
        let mut sandbox = Sandbox::open_field(9, 9);
        let first = Point::new(1, 1);
        let second = Point::new(3, 1);
        sandbox.map.place_trap(first, TrapKind::Funnel);
        sandbox.map.place_trap(second, TrapKind::Funnel);
        sandbox.map.place_item(first, jug(10));
        sandbox.map.place_item(first, jug(30));
        sandbox.map.place_item(second, jug(20));

        let mut dice = ScriptedDice::always(true);
        let deposit = fill_funnels(&mut sandbox.world(), &mut dice, 4, false, TrapKind::Funnel)
            .expect("both funnels caught rain");
        assert_eq!(deposit.at, first);
        assert_eq!(charges_at(&sandbox, first, 1), 1);
        assert_eq!(charges_at(&sandbox, first, 0), 0);
        assert_eq!(charges_at(&sandbox, second, 0), 0);
    }

    #[test]
    fn later_funnel_overwrites_equal_capacity_selection() {
        let mut sandbox = Sandbox::open_field(9, 9);
        let early = Point::new(1, 4);
        let late = Point::new(5, 0);
        // Registration order differs from scan order on purpose.
        sandbox.map.place_trap(late, TrapKind::Funnel);
        sandbox.map.place_trap(early, TrapKind::Funnel);
        sandbox.map.place_item(early, jug(20));
        sandbox.map.place_item(late, jug(20));

        let mut dice = ScriptedDice::always(true);
        let deposit = fill_funnels(&mut sandbox.world(), &mut dice, 4, false, TrapKind::Funnel)
            .expect("deposit");
        assert_eq!(deposit.at, late);
        assert_eq!(charges_at(&sandbox, late, 0), 1);
        assert_eq!(charges_at(&sandbox, early, 0), 0);
    }

    #[test]
    fn smaller_container_at_later_funnel_does_not_steal_selection() {
        let mut sandbox = Sandbox::open_field(9, 9);
        let early = Point::new(1, 1);
        let late = Point::new(6, 6);
        sandbox.map.place_trap(early, TrapKind::Funnel);
        sandbox.map.place_trap(late, TrapKind::Funnel);
        sandbox.map.place_item(early, jug(20));
        sandbox.map.place_item(late, jug(5));

        let mut dice = ScriptedDice::always(true);
        let deposit = fill_funnels(&mut sandbox.world(), &mut dice, 4, false, TrapKind::Funnel)
            .expect("deposit");
        assert_eq!(deposit.at, early);
        assert_eq!(charges_at(&sandbox, late, 0), 0);
    }

    #[test]
    fn funnels_that_miss_their_roll_are_skipped() {
        let mut sandbox = Sandbox::open_field(9, 9);
        let dry = Point::new(1, 1);
        let wet = Point::new(2, 2);
        sandbox.map.place_trap(dry, TrapKind::Funnel);
        sandbox.map.place_trap(wet, TrapKind::Funnel);
        sandbox.map.place_item(dry, jug(50));
        sandbox.map.place_item(wet, jug(5));

        // First funnel misses, second catches, seeding roll stays clean.
        let mut dice = ScriptedDice::with_hits([false, true, false]);
        let deposit = fill_funnels(&mut sandbox.world(), &mut dice, 4, false, TrapKind::Funnel)
            .expect("deposit");
        assert_eq!(deposit.at, wet);
        assert_eq!(deposit.outcome, RainOutcome::Seeded { poisoned: false });
        assert_eq!(charges_at(&sandbox, dry, 0), 0);

        // Each funnel catches with odds 1 in its turns per 250 ml charge,
        // then fresh water rolls 1 in 10 for dirt.
        let turns = 250.0 * 1000.0 / (PI * 380.0 * 380.0 * 4.0 / 600.0);
        let calls = dice.calls();
        assert_eq!(calls.len(), 3);
        for call in &calls[..2] {
            let DiceCall::XInY(x, y) = *call else {
                panic!("expected a catch roll, got {call:?}");
            };
            assert_eq!(x, 1.0);
            assert!((y - turns).abs() < 1e-9);
        }
        assert_eq!(calls[2], DiceCall::OneIn(10));
    }

    #[test]
    fn unusable_items_under_funnel_are_passed_over() {
        let mut sandbox = Sandbox::open_field(9, 9);
        let at = Point::new(4, 4);
        sandbox.map.place_trap(at, TrapKind::MakeshiftFunnel);
        sandbox.map.place_item(
            at,
            jug(60).with_contents(Contents::Other {
                id: "cola".to_string(),
                charges: 1,
            }),
        );
        sandbox.map.place_item(at, Item::new("rock", "rock"));
        sandbox.map.place_item(at, jug(0));

        let mut dice = ScriptedDice::always(true);
        let deposits = fill_water_collectors(&mut sandbox.world(), &mut dice, 8, true);
        assert!(deposits.is_empty());
    }

    #[test]
    fn acid_rain_lands_as_acid() {
        let mut sandbox = Sandbox::open_field(9, 9);
        let at = Point::new(4, 4);
        sandbox.map.place_trap(at, TrapKind::MakeshiftFunnel);
        sandbox.map.place_item(
            at,
            jug(10).with_contents(Contents::Liquid(Liquid::new(LiquidKind::Acid, 2))),
        );

        let mut dice = ScriptedDice::always(true);
        let deposits = fill_water_collectors(&mut sandbox.world(), &mut dice, 8, true);
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].kind, LiquidKind::Acid);
        assert_eq!(deposits[0].outcome, RainOutcome::ToppedUp);
        assert_eq!(charges_at(&sandbox, at, 0), 3);
    }

    #[test]
    fn each_funnel_kind_deposits_at_most_once() {
        let mut sandbox = Sandbox::open_field(9, 9);
        let standard = Point::new(1, 1);
        let makeshift = Point::new(7, 7);
        sandbox.map.place_trap(standard, TrapKind::Funnel);
        sandbox.map.place_trap(makeshift, TrapKind::MakeshiftFunnel);
        sandbox.map.place_item(standard, jug(10));
        sandbox.map.place_item(standard, jug(10));
        sandbox.map.place_item(makeshift, jug(10));

        let mut dice = ScriptedDice::always(true);
        let deposits = fill_water_collectors(&mut sandbox.world(), &mut dice, 4, false);
        let at: Vec<Point> = deposits.iter().map(|deposit| deposit.at).collect();
        assert_eq!(at, vec![standard, makeshift]);
        let total: u32 = (0..2).map(|index| charges_at(&sandbox, standard, index)).sum();
        assert_eq!(total, 1);
    }
}
