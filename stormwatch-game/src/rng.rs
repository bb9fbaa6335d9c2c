//! Random sources for weather rolls.
//!
//! Every weather routine takes a `&mut dyn Dice` so callers decide where the
//! randomness comes from: a seeded [`RngBundle`] stream in the game loop, or a
//! [`ScriptedDice`] in tests that need to pin a branch.
use std::cell::{RefCell, RefMut};
use std::collections::VecDeque;

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::Sha256;

/// Dice rolls used by the weather model.
pub trait Dice {
    /// True with probability `1 / chance`. Chances of 0 or 1 always hit.
    fn one_in(&mut self, chance: u32) -> bool;

    /// True with probability `x / y`, saturating at certainty.
    fn x_in_y(&mut self, x: f64, y: f64) -> bool;

    /// Uniform integer in `lo..=hi`. Returns `lo` for an empty range.
    fn rng(&mut self, lo: i32, hi: i32) -> i32;
}

impl<R: Rng> Dice for R {
    fn one_in(&mut self, chance: u32) -> bool {
        chance <= 1 || self.gen_range(0..chance) == 0
    }

    fn x_in_y(&mut self, x: f64, y: f64) -> bool {
        if x.is_nan() || x <= 0.0 {
            return false;
        }
        if y.is_nan() || y <= x {
            return true;
        }
        self.r#gen::<f64>() < x / y
    }

    fn rng(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.gen_range(lo..=hi)
    }
}

/// One request made of a [`Dice`], with the odds or range it was asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiceCall {
    OneIn(u32),
    XInY(f64, f64),
    Range(i32, i32),
}

/// Dice that replay a prepared script of outcomes.
///
/// `one_in` and `x_in_y` pop from the hit queue, `rng` pops from the roll
/// queue (clamped into the requested range). Once a queue runs dry the dice
/// fall back to `fallback_hit` and the low end of the range. Every request is
/// recorded in [`ScriptedDice::calls`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    hits: VecDeque<bool>,
    rolls: VecDeque<i32>,
    fallback_hit: bool,
    calls: Vec<DiceCall>,
}

impl ScriptedDice {
    /// Dice where every chance roll lands the same way.
    #[must_use]
    pub fn always(hit: bool) -> Self {
        Self {
            fallback_hit: hit,
            ..Self::default()
        }
    }

    /// Dice that answer chance rolls from `hits` in order, then miss.
    #[must_use]
    pub fn with_hits<I: IntoIterator<Item = bool>>(hits: I) -> Self {
        Self {
            hits: hits.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queue integer rolls returned by [`Dice::rng`].
    #[must_use]
    pub fn then_rolls<I: IntoIterator<Item = i32>>(mut self, rolls: I) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Outcome used once the scripted hits run out.
    #[must_use]
    pub const fn or_else(mut self, hit: bool) -> Self {
        self.fallback_hit = hit;
        self
    }

    /// Chance rolls not yet consumed.
    #[must_use]
    pub fn remaining_hits(&self) -> usize {
        self.hits.len()
    }

    /// Every request made so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[DiceCall] {
        &self.calls
    }

    fn next_hit(&mut self) -> bool {
        self.hits.pop_front().unwrap_or(self.fallback_hit)
    }
}

impl Dice for ScriptedDice {
    fn one_in(&mut self, chance: u32) -> bool {
        self.calls.push(DiceCall::OneIn(chance));
        self.next_hit()
    }

    fn x_in_y(&mut self, x: f64, y: f64) -> bool {
        self.calls.push(DiceCall::XInY(x, y));
        self.next_hit()
    }

    fn rng(&mut self, lo: i32, hi: i32) -> i32 {
        self.calls.push(DiceCall::Range(lo, hi));
        let hi = hi.max(lo);
        self.rolls.pop_front().map_or(lo, |roll| roll.clamp(lo, hi))
    }
}

/// Independent deterministic RNG streams derived from one user seed.
#[derive(Debug)]
pub struct RngBundle {
    weather: RefCell<CountingRng<SmallRng>>,
    layout: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            weather: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"weather"))),
            layout: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"layout"))),
        }
    }

    /// Stream consumed by per-tick weather effects.
    #[must_use]
    pub fn weather(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.weather.borrow_mut()
    }

    /// Stream consumed when laying out scenario worlds.
    #[must_use]
    pub fn layout(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.layout.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    digest
        .get(..8)
        .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
        .map_or(user_seed, u64::from_le_bytes)
}
