//! Radio forecast built from the queue of upcoming weather.
//!
//! The queue is cut into day (06:00 to 18:00) and night (19:00 to 05:00)
//! windows. Each window reports the weather that lasted longest in it plus
//! the warmest and coldest temperatures seen.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::{Turn, Weekday};
use crate::config::{DisplayOptions, TemperatureUnit};
use crate::constants::{
    DAY_FIRST_HOUR, DAY_LAST_HOUR, HOURS_PER_DAY, NIGHT_FIRST_HOUR, NIGHT_LAST_HOUR,
};
use crate::weather::{WeatherSegment, WeatherType};
use crate::world::{Atlas, Point, TimeSource};

const UNKNOWN_CITY: &str = "the area";

/// Render a Fahrenheit temperature in the requested unit.
///
/// ```
/// use stormwatch_game::{TemperatureUnit, print_temperature};
/// assert_eq!(print_temperature(32.0, 1, TemperatureUnit::Celsius), "0.0C");
/// assert_eq!(print_temperature(32.0, 1, TemperatureUnit::Fahrenheit), "32.0F");
/// ```
#[must_use]
pub fn print_temperature(fahrenheit: f64, decimals: usize, unit: TemperatureUnit) -> String {
    let value = match unit {
        TemperatureUnit::Celsius => (fahrenheit - 32.0) * 5.0 / 9.0,
        TemperatureUnit::Fahrenheit => fahrenheit,
    };
    format!("{value:.decimals$}{}", unit.suffix())
}

/// One day or night bucket, in absolute hours since turn zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastWindow {
    pub first_hour: u64,
    pub last_hour: u64,
    pub night: bool,
}

impl ForecastWindow {
    /// The window that contains absolute hour `hour`.
    #[must_use]
    pub const fn containing(hour: u64) -> Self {
        let day_start = hour - hour % HOURS_PER_DAY;
        let of_day = hour % HOURS_PER_DAY;
        if of_day >= DAY_FIRST_HOUR && of_day <= DAY_LAST_HOUR {
            Self {
                first_hour: day_start + DAY_FIRST_HOUR,
                last_hour: day_start + DAY_LAST_HOUR,
                night: false,
            }
        } else if of_day >= NIGHT_FIRST_HOUR {
            Self {
                first_hour: day_start + NIGHT_FIRST_HOUR,
                last_hour: day_start + HOURS_PER_DAY + NIGHT_LAST_HOUR,
                night: true,
            }
        } else {
            Self {
                first_hour: (day_start + NIGHT_FIRST_HOUR).saturating_sub(HOURS_PER_DAY),
                last_hour: day_start + NIGHT_LAST_HOUR,
                night: true,
            }
        }
    }

    /// First hour of the window that follows this one.
    #[must_use]
    pub const fn next_first_hour(self) -> u64 {
        if self.night {
            self.last_hour + (DAY_FIRST_HOUR - NIGHT_LAST_HOUR)
        } else {
            self.last_hour + (NIGHT_FIRST_HOUR - DAY_LAST_HOUR)
        }
    }

    /// "Today", "Tonight", a weekday, or "{weekday} Night".
    #[must_use]
    pub fn label(self, now: Turn) -> String {
        let starts = Turn::from_hours(self.first_hour.max(now.absolute_hours()));
        if starts.days() == now.days() {
            return if self.night { "Tonight" } else { "Today" }.to_string();
        }
        let weekday: Weekday = starts.day_of_week();
        if self.night {
            format!("{weekday} Night")
        } else {
            weekday.to_string()
        }
    }
}

/// Summary of one closed forecast window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub label: String,
    pub window: ForecastWindow,
    pub weather: WeatherType,
    /// Fahrenheit.
    pub high: i32,
    pub low: i32,
    /// Hours tallied per weather type, indexed by [`WeatherType::index`].
    pub hours: [u64; WeatherType::ALL.len()],
}

impl ForecastPeriod {
    #[must_use]
    pub const fn hours_of(&self, weather: WeatherType) -> u64 {
        self.hours[weather.index()]
    }

    /// One report line, e.g. `Today...Rain. Highs of 60.0F. Lows of 52.0F.`
    #[must_use]
    pub fn render(&self, display: DisplayOptions) -> String {
        format!(
            "{}...{}. Highs of {}. Lows of {}.",
            self.label,
            self.weather,
            print_temperature(f64::from(self.high), display.decimals, display.unit),
            print_temperature(f64::from(self.low), display.decimals, display.unit),
        )
    }
}

/// Walks segments in deadline order and closes windows as it crosses them.
#[derive(Debug, Clone)]
pub struct ForecastAccumulator {
    now: Turn,
    cursor: u64,
    window: ForecastWindow,
    hours: [u64; WeatherType::ALL.len()],
    high: Option<i32>,
    low: Option<i32>,
    periods: Vec<ForecastPeriod>,
}

impl ForecastAccumulator {
    #[must_use]
    pub const fn new(now: Turn) -> Self {
        let cursor = now.absolute_hours();
        Self {
            now,
            cursor,
            window: ForecastWindow::containing(cursor),
            hours: [0; WeatherType::ALL.len()],
            high: None,
            low: None,
            periods: Vec::new(),
        }
    }

    /// Attribute `segment`, from the end of the previous one to its deadline.
    pub fn push(&mut self, segment: &WeatherSegment) {
        let deadline = segment.deadline.absolute_hours();
        self.extend_range(segment.temperature);
        while deadline >= self.window.next_first_hour() {
            self.tally(segment.weather, self.window.last_hour);
            self.close_window();
            self.high = Some(segment.temperature);
            self.low = Some(segment.temperature);
            self.cursor = self.window.next_first_hour();
            self.window = ForecastWindow::containing(self.cursor);
        }
        self.tally(segment.weather, deadline);
    }

    /// Windows closed so far.
    #[must_use]
    pub fn periods(&self) -> &[ForecastPeriod] {
        &self.periods
    }

    /// Close the trailing window if anything was tallied in it.
    #[must_use]
    pub fn finish(mut self) -> Vec<ForecastPeriod> {
        self.close_window();
        self.periods
    }

    fn tally(&mut self, weather: WeatherType, until: u64) {
        let span = until.saturating_sub(self.cursor);
        self.hours[weather.index()] += span;
        self.cursor = self.cursor.max(until);
    }

    fn extend_range(&mut self, temperature: i32) {
        self.high = Some(self.high.map_or(temperature, |high| high.max(temperature)));
        self.low = Some(self.low.map_or(temperature, |low| low.min(temperature)));
    }

    fn close_window(&mut self) {
        let hours = std::mem::take(&mut self.hours);
        let (Some(high), Some(low)) = (self.high, self.low) else {
            return;
        };
        let mut weather = WeatherType::Clear;
        let mut longest = 0;
        for candidate in WeatherType::ALL {
            if hours[candidate.index()] > longest {
                longest = hours[candidate.index()];
                weather = candidate;
            }
        }
        if longest == 0 {
            return;
        }
        let period = ForecastPeriod {
            label: self.window.label(self.now),
            window: self.window,
            weather,
            high,
            low,
            hours,
        };
        log::debug!(
            "forecast window {}..={} closed: {} for {longest}h",
            period.window.first_hour,
            period.window.last_hour,
            period.weather
        );
        self.periods.push(period);
    }
}

/// Closed windows for `segments` as seen from `now`.
#[must_use]
pub fn forecast_periods(now: Turn, segments: &[WeatherSegment]) -> Vec<ForecastPeriod> {
    let mut accumulator = ForecastAccumulator::new(now);
    for segment in segments {
        accumulator.push(segment);
    }
    accumulator.finish()
}

/// The radio report: current conditions at the closest city to `tower`,
/// then one line per forecast window.
#[must_use]
pub fn weather_forecast(
    time: &dyn TimeSource,
    atlas: &dyn Atlas,
    tower: Point,
    display: DisplayOptions,
) -> String {
    forecast_report(time, atlas, tower, display).to_string()
}

/// Structured counterpart of [`weather_forecast`].
#[must_use]
pub fn forecast_report(
    time: &dyn TimeSource,
    atlas: &dyn Atlas,
    tower: Point,
    display: DisplayOptions,
) -> ForecastReport {
    let now = time.now();
    ForecastReport {
        now,
        city: atlas.closest_city(tower).unwrap_or(UNKNOWN_CITY).to_string(),
        weather: time.current_weather(),
        temperature: time.temperature(),
        periods: forecast_periods(now, time.future_weather()),
        display,
    }
}

/// Structured form of a radio report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub now: Turn,
    pub city: String,
    pub weather: WeatherType,
    pub temperature: i32,
    pub periods: Vec<ForecastPeriod>,
    pub display: DisplayOptions,
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The current time is {} Eastern Standard Time.  At {} in {}, it was {}. The temperature was {}",
            self.now.print_time(false),
            self.now.print_time(true),
            self.city,
            self.weather,
            print_temperature(
                f64::from(self.temperature),
                self.display.decimals,
                self.display.unit
            ),
        )?;
        for period in &self.periods {
            write!(f, "\n{}", period.render(self.display))?;
        }
        Ok(())
    }
}
