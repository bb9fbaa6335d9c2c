//! Scenario catalog: small seeded yards run through the weather controller.
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use stormwatch_game::sandbox::{Critter, Gazetteer, Horde, Sandbox};
use stormwatch_game::{
    FieldKind, Garment, Item, ItemFlag, LiquidKind, Point, TickOutcome, TrapKind, Turn,
    WeatherConfig, WeatherController, WeatherSegment, WeatherType,
};

use crate::reports::{RunMetrics, ScenarioResult};

const YARD_SIZE: i32 = 31;
const FUNNEL_JUG: u32 = 40;
const MAKESHIFT_JUG: u32 = 10;
const CRITTERS: usize = 4;
const FORECAST_SEGMENTS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setup {
    /// Open yard with two funnels and a few critters.
    Yard,
    /// Yard with the player in a raincoat holding an umbrella.
    Sheltered,
    /// Yard one level below ground.
    Cellar,
    /// Yard whose clock plays through a seeded three-day schedule.
    Schedule,
}

/// What one seeded run left behind.
#[derive(Debug)]
struct Playthrough {
    metrics: RunMetrics,
    forecast: Option<String>,
    horde_before: Horde,
    sandbox: Sandbox,
}

#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    weather: WeatherType,
    setup: Setup,
}

const CATALOG: &[Scenario] = &[
    Scenario {
        key: "drizzle",
        description: "Light rain over an open yard",
        weather: WeatherType::Drizzle,
        setup: Setup::Yard,
    },
    Scenario {
        key: "downpour",
        description: "Heavy rain filling both funnels",
        weather: WeatherType::Rain,
        setup: Setup::Yard,
    },
    Scenario {
        key: "thunderstorm",
        description: "Heavy rain with thunder overhead",
        weather: WeatherType::Thunder,
        setup: Setup::Yard,
    },
    Scenario {
        key: "lightning",
        description: "Lightning storm over an open yard",
        weather: WeatherType::Lightning,
        setup: Setup::Yard,
    },
    Scenario {
        key: "sunny-glare",
        description: "Clear sky glare on an unprotected survivor",
        weather: WeatherType::Sunny,
        setup: Setup::Yard,
    },
    Scenario {
        key: "acid-drizzle",
        description: "Acidic drizzle against a raincoat and umbrella",
        weather: WeatherType::AcidDrizzle,
        setup: Setup::Sheltered,
    },
    Scenario {
        key: "acid-storm",
        description: "Acid rain pooling across the yard and burning critters",
        weather: WeatherType::AcidRain,
        setup: Setup::Yard,
    },
    Scenario {
        key: "cellar-acid",
        description: "Acid rain heard from a cellar",
        weather: WeatherType::AcidRain,
        setup: Setup::Cellar,
    },
    Scenario {
        key: "forecast",
        description: "Radio forecast for a seeded schedule, then play it out",
        weather: WeatherType::Clear,
        setup: Setup::Schedule,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.description))
}

pub fn scenario_keys() -> Vec<String> {
    CATALOG.iter().map(|s| s.key.to_string()).collect()
}

pub fn get_scenario(key: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.key == key)
}

impl Scenario {
    /// Run `ticks` turns for `seed` and check the outcome twice for replay.
    #[must_use]
    pub fn run(&self, seed: u64, ticks: u64) -> ScenarioResult {
        let started = Instant::now();
        let run = self.play(seed, ticks);
        let mut failures = self.check(&run);

        let replay = self.play(seed, ticks);
        if replay.metrics != run.metrics || replay.forecast != run.forecast {
            failures.push(format!("seed {seed} did not replay identically"));
        }
        let Playthrough {
            metrics, forecast, ..
        } = run;

        ScenarioResult {
            scenario_name: self.key.to_string(),
            seed,
            ticks,
            passed: failures.is_empty(),
            failures,
            metrics,
            forecast,
            duration: started.elapsed(),
        }
    }

    fn play(&self, seed: u64, ticks: u64) -> Playthrough {
        let controller = WeatherController::with_seed(seed);
        let mut sandbox = self.build(&controller, seed);
        let forecast = (self.setup == Setup::Schedule).then(|| {
            controller
                .forecast(&sandbox.ledger, &sandbox.gazetteer, sandbox.player.pos)
                .to_string()
        });
        let horde_before = sandbox.horde.clone();

        let mut metrics = RunMetrics::default();
        for _ in 0..ticks {
            let weather = sandbox.ledger.weather;
            let outcome = controller.tick(&mut sandbox.world(), weather);
            metrics.record(&outcome);
            sandbox.ledger.advance();
        }
        metrics.water = sandbox.collected(LiquidKind::Water);
        metrics.acid = sandbox.collected(LiquidKind::Acid);
        metrics.weak_acid = sandbox.collected(LiquidKind::WeakAcid);
        metrics.pain = sandbox.player.pain;
        metrics.pooled_acid = sandbox.map.count_fields(FieldKind::Acid);
        metrics.weather_draws = controller.weather_draws();
        log::debug!(
            "{} seed {seed}: {} ticks, {} notices",
            self.key,
            ticks,
            metrics.notices
        );
        Playthrough {
            metrics,
            forecast,
            horde_before,
            sandbox,
        }
    }

    fn build(&self, controller: &WeatherController, seed: u64) -> Sandbox {
        let mut sandbox = Sandbox::open_field(YARD_SIZE, YARD_SIZE);
        sandbox.ledger.weather = self.weather;
        lay_out_yard(&mut sandbox, controller);
        match self.setup {
            Setup::Yard => {}
            Setup::Sheltered => {
                sandbox.player.worn.push(Garment::Raincoat);
                sandbox.player.weapon =
                    Some(Item::new("umbrella", "umbrella").with_flag(ItemFlag::RainProtect));
            }
            Setup::Cellar => sandbox.level = -1,
            Setup::Schedule => {
                sandbox.ledger.now = Turn::from_day_hour(0, 8);
                sandbox.ledger.queue = seeded_schedule(seed, sandbox.ledger.now);
                sandbox.gazetteer = Gazetteer::default()
                    .with_city(Point::new(0, 0), "Falls City")
                    .with_city(Point::new(300, 300), "Lincoln");
            }
        }
        sandbox
    }

    fn check(&self, run: &Playthrough) -> Vec<String> {
        let Playthrough {
            metrics,
            horde_before,
            sandbox,
            ..
        } = run;
        let mut failures = Vec::new();
        let capacity = FUNNEL_JUG + MAKESHIFT_JUG;
        let collected = metrics.water + metrics.acid + metrics.weak_acid;
        if collected > capacity {
            failures.push(format!("collected {collected} charges into {capacity} of jugs"));
        }

        let config = WeatherConfig::default_config();
        let pain_ceiling = [&config.acid, &config.light_acid]
            .iter()
            .map(|exposure| exposure.pain_cap + exposure.pain_max)
            .max()
            .unwrap_or_default();
        if metrics.pain >= pain_ceiling {
            failures.push(format!("pain {} reached {pain_ceiling}", metrics.pain));
        }

        if !self.weather.is_acidic() && self.setup != Setup::Schedule {
            if metrics.acid + metrics.weak_acid > 0 {
                failures.push("acid collected under plain rain".to_string());
            }
            if metrics.creatures_burned > 0 {
                failures.push("creatures burned without acid".to_string());
            }
        }

        match self.setup {
            Setup::Cellar => {
                if metrics.pooled_acid > 0 {
                    failures.push(format!("{} acid fields below ground", metrics.pooled_acid));
                }
                if !sandbox.player.notices.is_empty() {
                    failures.push("player noticed acid rain from the cellar".to_string());
                }
            }
            Setup::Sheltered => {
                if sandbox.player.pain > 0 && metrics.notices == 0 {
                    failures.push("pain without any acid notice".to_string());
                }
            }
            Setup::Yard if self.weather.is_acidic() => {
                let before = horde_before.critters().iter();
                let hurt_proof = before
                    .zip(sandbox.horde.critters())
                    .any(|(was, now)| now.acid_proof && now.hp < was.hp);
                if hurt_proof {
                    failures.push("acid-proof critter lost health".to_string());
                }
            }
            Setup::Yard | Setup::Schedule => {}
        }
        failures
    }
}

fn spot(rng: &mut dyn rand::RngCore) -> Point {
    Point::new(rng.gen_range(0..YARD_SIZE), rng.gen_range(0..YARD_SIZE))
}

fn lay_out_yard(sandbox: &mut Sandbox, controller: &WeatherController) {
    let mut rng = controller.rngs().layout();

    let funnel = spot(&mut *rng);
    sandbox.map.place_trap(funnel, TrapKind::Funnel);
    sandbox.map.place_item(funnel, jug(FUNNEL_JUG));

    let makeshift = spot(&mut *rng);
    if makeshift != funnel {
        sandbox.map.place_trap(makeshift, TrapKind::MakeshiftFunnel);
        sandbox.map.place_item(makeshift, jug(MAKESHIFT_JUG));
    }

    for index in 0..CRITTERS {
        let critter = Critter::new(spot(&mut *rng), rng.gen_range(20..=40));
        sandbox.horde.spawn(if index == 0 { critter.acid_proof() } else { critter });
    }

    // The shed stays west of the player so the middle of the yard is open sky.
    let shed = Point::new(
        rng.gen_range(0..YARD_SIZE / 2 - 3),
        rng.gen_range(0..YARD_SIZE - 3),
    );
    for dx in 0..3 {
        for dy in 0..3 {
            sandbox.map.cover(Point::new(shed.x + dx, shed.y + dy));
        }
    }
}

fn jug(capacity: u32) -> Item {
    Item::sealed_container("jug_plastic", "plastic jug", capacity)
}

/// Upcoming weather drawn from its own stream so the yard layout stays put.
fn seeded_schedule(seed: u64, start: Turn) -> Vec<WeatherSegment> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut deadline = start;
    (0..FORECAST_SEGMENTS)
        .map(|_| {
            deadline = Turn::from_hours(deadline.absolute_hours() + rng.gen_range(3..=8));
            let weather = WeatherType::ALL[rng.gen_range(0..WeatherType::ALL.len())];
            WeatherSegment::new(deadline, weather, rng.gen_range(30..=95))
        })
        .collect()
}

impl RunMetrics {
    fn record(&mut self, outcome: &TickOutcome) {
        if outcome.drench.is_some() {
            self.drenches += 1;
        }
        self.deposits += outcome.deposits.len();
        self.creatures_burned += outcome.creatures_burned;
        if outcome.glare {
            self.glare_turns += 1;
        }
        self.notices += outcome.notices.len();
    }
}
