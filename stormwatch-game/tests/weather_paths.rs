use stormwatch_game::sandbox::{Critter, Sandbox};
use stormwatch_game::{
    Contents, FieldKind, Garment, Item, ItemFlag, Liquid, LiquidKind, Point, RainOutcome,
    ScriptedDice, TrapKind, Turn, WeatherConfig, WeatherController, WeatherEffect, WeatherNotice,
    WeatherType, collect_rain, fill_water_collectors,
};

fn jug(capacity: u32) -> Item {
    Item::sealed_container("jug_plastic", "plastic jug", capacity)
}

fn storm_yard() -> Sandbox {
    let mut sandbox = Sandbox::open_field(31, 31);
    sandbox.map.place_trap(Point::new(4, 4), TrapKind::Funnel);
    sandbox.map.place_item(Point::new(4, 4), jug(40));
    sandbox
        .map
        .place_trap(Point::new(20, 8), TrapKind::MakeshiftFunnel);
    sandbox.map.place_item(Point::new(20, 8), jug(10));
    sandbox.horde.spawn(Critter::new(Point::new(10, 10), 30));
    sandbox
        .horde
        .spawn(Critter::new(Point::new(11, 10), 30).acid_proof());
    sandbox
}

#[test]
fn every_weather_type_runs_without_panicking() {
    let controller = WeatherController::with_seed(0x5EED);
    for weather in WeatherType::ALL {
        let mut sandbox = storm_yard();
        for turn in 0..120 {
            sandbox.ledger.now = Turn(turn);
            let _ = controller.tick(&mut sandbox.world(), weather);
        }
        // Pain is only added below 100, at most 5 at a time.
        assert!(sandbox.player.pain < 105, "{weather} overshot pain");
        let kinds = [LiquidKind::Water, LiquidKind::Acid, LiquidKind::WeakAcid];
        let collected: u32 = kinds.iter().map(|kind| sandbox.collected(*kind)).sum();
        assert!(collected <= 50, "{weather} overfilled containers");
    }
}

#[test]
fn acid_rain_wears_down_exposed_creatures_only() {
    let controller = WeatherController::with_seed(11);
    let mut sandbox = storm_yard();
    for turn in 0..10 {
        sandbox.ledger.now = Turn(turn);
        let out = controller.tick(&mut sandbox.world(), WeatherType::AcidRain);
        assert_eq!(out.creatures_burned, 1);
    }
    let hp: Vec<i32> = sandbox.horde.critters().iter().map(|c| c.hp).collect();
    assert_eq!(hp, vec![20, 30]);
}

#[test]
fn drizzle_never_soaks_through_a_sealed_roof() {
    let controller = WeatherController::with_seed(3);
    let mut sandbox = storm_yard();
    let pos = sandbox.player.pos;
    sandbox.map.cover(pos);
    for turn in 0..200 {
        sandbox.ledger.now = Turn(turn);
        let out = controller.tick(&mut sandbox.world(), WeatherType::Drizzle);
        assert_eq!(out.drench, None);
    }
}

#[test]
fn heavy_rain_eventually_fills_the_big_funnel() {
    let controller = WeatherController::with_seed(42);
    let mut sandbox = storm_yard();
    let mut deposits = 0;
    for turn in 0..5_000 {
        sandbox.ledger.now = Turn(turn);
        deposits += controller
            .tick(&mut sandbox.world(), WeatherType::Rain)
            .deposits
            .len();
    }
    assert!(deposits > 0);
    assert_eq!(sandbox.collected(LiquidKind::Acid), 0);
    let water = sandbox.collected(LiquidKind::Water);
    assert!(water > 0 && water <= 50);
}

#[test]
fn acid_in_water_jug_either_transmutes_or_taints() {
    let mut sandbox = Sandbox::open_field(5, 5);
    let at = Point::new(1, 1);
    sandbox.map.place_trap(at, TrapKind::Funnel);
    sandbox.map.place_item(
        at,
        jug(10).with_contents(Contents::Liquid(Liquid::new(LiquidKind::Water, 7))),
    );

    // Funnel catches, transmutation misses, remainder roll of 0.
    let mut dice = ScriptedDice::with_hits([true, false]).then_rolls([0]);
    let deposits = fill_water_collectors(&mut sandbox.world(), &mut dice, 8, true);
    assert_eq!(deposits.len(), 1);
    // 8 charges: total 5, poison 0 with leftover 5 > 0.
    assert_eq!(deposits[0].outcome, RainOutcome::Tainted { poison: 1 });

    let mut dice = ScriptedDice::with_hits([true, true]);
    let deposits = fill_water_collectors(&mut sandbox.world(), &mut dice, 8, true);
    assert_eq!(deposits[0].outcome, RainOutcome::Transmuted);
    let liquid = sandbox.map.items_at(at)[0].liquid().copied().unwrap();
    assert_eq!(liquid.kind, LiquidKind::WeakAcid);
    assert_eq!(liquid.charges, 9);
    assert_eq!(liquid.poison, 0);
}

#[test]
fn full_container_stays_at_capacity() {
    let mut full = jug(3).with_contents(Contents::Liquid(Liquid::new(LiquidKind::Acid, 3)));
    let mut dice = ScriptedDice::always(true);
    assert_eq!(
        collect_rain(&mut full, LiquidKind::Acid, &mut dice),
        RainOutcome::ToppedUp
    );
    assert_eq!(full.liquid().unwrap().charges, 3);
}

#[test]
fn acid_pools_across_the_yard_over_time() {
    let controller = WeatherController::with_seed(8);
    let mut sandbox = storm_yard();
    for turn in 0..200 {
        sandbox.ledger.now = Turn(turn);
        let _ = controller.tick(&mut sandbox.world(), WeatherType::AcidRain);
    }
    assert!(sandbox.map.count_fields(FieldKind::Acid) > 0);

    let mut cellar = storm_yard();
    cellar.level = -1;
    for turn in 0..200 {
        cellar.ledger.now = Turn(turn);
        let _ = controller.tick(&mut cellar.world(), WeatherType::AcidRain);
    }
    assert_eq!(cellar.map.count_fields(FieldKind::Acid), 0);
    assert!(cellar.player.notices.is_empty());
}

#[test]
fn protected_player_hears_only_protection_messages() {
    let controller = WeatherController::with_seed(21);
    let mut sandbox = storm_yard();
    sandbox.player.worn.push(Garment::Raincoat);
    let umbrella = Item::new("umbrella", "umbrella");
    sandbox.player.weapon = Some(umbrella.with_flag(ItemFlag::RainProtect));
    for turn in 0..400 {
        sandbox.ledger.now = Turn(turn);
        let _ = controller.tick(&mut sandbox.world(), WeatherType::AcidDrizzle);
    }
    for notice in &sandbox.player.notices {
        assert!(matches!(
            notice,
            WeatherNotice::WeaponShieldsDrizzle { .. }
                | WeatherNotice::RaincoatShieldsDrizzle
                | WeatherNotice::AcidStings
        ));
    }
    // Every tenth turn rolls exposure.
    assert_eq!(sandbox.player.notices.len(), 40);
}

#[test]
fn sunny_days_dazzle_until_sunglasses_go_on() {
    let config = WeatherConfig::default();
    let mut sandbox = storm_yard();
    let mut dice = ScriptedDice::always(false);
    let out = WeatherEffect::Glare.apply(&mut sandbox.world(), &config, &mut dice);
    assert!(out.glare);
    sandbox.player.worn.push(Garment::Sunglasses);
    let out = WeatherEffect::Glare.apply(&mut sandbox.world(), &config, &mut dice);
    assert!(!out.glare);
    assert_eq!(sandbox.player.statuses.len(), 1);
}
