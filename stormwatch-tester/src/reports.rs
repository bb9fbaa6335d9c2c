use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Totals gathered over one scenario run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunMetrics {
    pub drenches: usize,
    pub deposits: usize,
    pub water: u32,
    pub acid: u32,
    pub weak_acid: u32,
    pub pooled_acid: usize,
    pub creatures_burned: usize,
    pub pain: i32,
    pub glare_turns: usize,
    pub notices: usize,
    pub weather_draws: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub ticks: u64,
    pub passed: bool,
    pub failures: Vec<String>,
    pub metrics: RunMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    pub duration: Duration,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: &'a str,
    results: &'a [ScenarioResult],
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Weather Scenario Results".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} (seed {}, {} ticks)",
            status,
            result.scenario_name.bold(),
            result.seed,
            result.ticks
        )?;
        let m = &result.metrics;
        writeln!(
            out,
            "   Drenched {} times, {} deposits: water {}, acid {}, weak acid {}",
            m.drenches, m.deposits, m.water, m.acid, m.weak_acid
        )?;
        writeln!(
            out,
            "   Acid pools {}, creatures burned {}, pain {}, glare turns {}, notices {}",
            m.pooled_acid, m.creatures_burned, m.pain, m.glare_turns, m.notices
        )?;
        if let Some(forecast) = &result.forecast {
            writeln!(out, "   📻 Forecast:")?;
            for line in forecast.lines() {
                writeln!(out, "     {line}")?;
            }
        }
        for failure in &result.failures {
            writeln!(out, "     • {}", failure.red())?;
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
    generated_at: &str,
) -> Result<()> {
    let report = JsonReport {
        generated_at,
        results,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
    generated_at: &str,
) -> Result<()> {
    writeln!(out, "# Stormwatch Scenario Results\n")?;
    writeln!(out, "_Generated {generated_at}_\n")?;
    writeln!(
        out,
        "| Scenario | Seed | Ticks | Result | Water | Acid | Pain | Notices |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|")?;
    for result in results {
        let m = &result.metrics;
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            result.scenario_name,
            result.seed,
            result.ticks,
            if result.passed { "pass" } else { "fail" },
            m.water,
            m.acid + m.weak_acid,
            m.pain,
            m.notices
        )?;
    }

    let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();
    if !failed.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failed {
            for failure in &result.failures {
                writeln!(
                    out,
                    "- **{}** (seed {}): {failure}",
                    result.scenario_name, result.seed
                )?;
            }
        }
    }
    Ok(())
}
