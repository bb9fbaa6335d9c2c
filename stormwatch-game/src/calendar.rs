//! Turn-based calendar used to place weather on the clock.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    HOURS_PER_DAY, SECONDS_PER_TURN, TURNS_PER_DAY, TURNS_PER_HOUR, TURNS_PER_MINUTE,
};

/// A point in world time, counted in six-second turns since the cataclysm.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Turn(pub u64);

impl Turn {
    #[must_use]
    pub const fn from_hours(hours: u64) -> Self {
        Self(hours * TURNS_PER_HOUR)
    }

    #[must_use]
    pub const fn from_day_hour(day: u64, hour: u64) -> Self {
        Self(day * TURNS_PER_DAY + hour * TURNS_PER_HOUR)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whole hours elapsed since turn zero.
    #[must_use]
    pub const fn absolute_hours(self) -> u64 {
        self.0 / TURNS_PER_HOUR
    }

    /// Hour of the day, 0..24.
    #[must_use]
    pub const fn hours(self) -> u64 {
        self.absolute_hours() % HOURS_PER_DAY
    }

    #[must_use]
    pub const fn minutes(self) -> u64 {
        (self.0 % TURNS_PER_HOUR) / TURNS_PER_MINUTE
    }

    #[must_use]
    pub const fn seconds(self) -> u64 {
        (self.0 % TURNS_PER_MINUTE) * SECONDS_PER_TURN
    }

    /// Calendar days elapsed since turn zero.
    #[must_use]
    pub const fn days(self) -> u64 {
        self.0 / TURNS_PER_DAY
    }

    #[must_use]
    pub const fn day_of_week(self) -> Weekday {
        Weekday::from_day_index(self.days())
    }

    /// `true` when the turn is a multiple of `interval`.
    #[must_use]
    pub const fn is_every(self, interval: u64) -> bool {
        interval != 0 && self.0 % interval == 0
    }

    #[must_use]
    pub const fn plus_turns(self, turns: u64) -> Self {
        Self(self.0.saturating_add(turns))
    }

    /// Twelve-hour clock time, e.g. `8:05:30 AM`, or `8 AM` when `hour_only`.
    #[must_use]
    pub fn print_time(self, hour_only: bool) -> String {
        let hour = self.hours();
        let meridiem = if hour < 12 { "AM" } else { "PM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        if hour_only {
            format!("{display_hour} {meridiem}")
        } else {
            format!(
                "{display_hour}:{:02}:{:02} {meridiem}",
                self.minutes(),
                self.seconds()
            )
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print_time(false))
    }
}

/// Day of the week. Day zero of the calendar is a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[must_use]
    pub const fn from_day_index(day: u64) -> Self {
        Self::ALL[(day % 7) as usize]
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
