//! snackscan - food scan normalizer and Food Wrap CLI
//!
//! Turns raw vision-model replies into stored scan records and generates
//! Spotify Wrapped-style summaries of your scanning history.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, Subcommand};
use snackscan_core::analytics::{aggregate, WrapOutcome, WrapSummary, WrapWindow};
use snackscan_core::format::{format_time_ago, hour_display};
use snackscan_core::{Config, Database, FoodCategory, ResponseNormalizer};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "snackscan")]
#[command(about = "Food scan history and Food Wrap summaries")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a raw model reply and store it
    Ingest {
        /// File containing the reply (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// List the most recent scans
    Recent {
        /// Number of scans to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Generate a Food Wrap for the last N days
    Wrap {
        /// Days to cover (default: `wrap.default_days` from config)
        #[arg(long)]
        days: Option<u32>,

        /// Export format (md = markdown, json = JSON)
        #[arg(long)]
        export: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration and database
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = snackscan_core::logging::init(&config.logging).ok();

    let db_path = Config::database_path();
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let now = Local::now().fixed_offset();

    match args.command {
        Command::Ingest { file } => ingest(&db, &config, file)?,
        Command::Recent { limit } => recent(&db, limit, now)?,
        Command::Wrap { days, export } => {
            let days = days.unwrap_or(config.wrap.default_days);
            let window = WrapWindow::last_days(now, days).context("invalid wrap window")?;
            let entries = db
                .entries_between(&window)
                .context("failed to load scans")?;
            let outcome = aggregate(&entries, &window, &config.wrap);

            match export.as_deref() {
                Some("json") => print_json(&outcome)?,
                Some("md") => print_markdown(&outcome),
                Some(other) => {
                    anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other)
                }
                None => print_terminal(&outcome),
            }
        }
    }

    Ok(())
}

fn ingest(db: &Database, config: &Config, file: Option<PathBuf>) -> Result<()> {
    let raw_reply = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let normalizer = ResponseNormalizer::new(config.normalizer.clone());
    let (record, tier) = normalizer.normalize_with_tier(&raw_reply);
    let stored = db.insert_record(&record).context("failed to store record")?;
    tracing::info!(id = stored.id, tier = tier.as_str(), "Ingested scan");

    let json = serde_json::json!({
        "id": stored.id,
        "created_at": stored.created_at.to_rfc3339(),
        "tier": tier.as_str(),
        "record": stored.record,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn recent(db: &Database, limit: usize, now: DateTime<FixedOffset>) -> Result<()> {
    let records = db
        .recent_records(limit)
        .context("failed to list recent scans")?;

    if records.is_empty() {
        println!("No scans yet.");
        return Ok(());
    }

    for stored in &records {
        let record = &stored.record;
        let verdict = if record.recommend { "buy" } else { "skip" };
        println!(
            "{:>5}  {:<20} {:>2}/10  {:<10} {:<5} {}",
            stored.id,
            record.subject_name,
            record.quality_score,
            record.quality_state,
            verdict,
            format_time_ago(stored.created_at, now)
        );
    }
    Ok(())
}

fn print_terminal(outcome: &WrapOutcome) {
    let title = format!("YOUR {} FOOD WRAP", outcome.window().display_name());

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    let Some(stats) = outcome.summary() else {
        println!("  No scans found for this period.");
        println!();
        return;
    };

    // The Numbers
    println!("THE NUMBERS");
    println!(
        "   Scans:    {:<12} Unique foods: {}",
        stats.total_scans, stats.unique_subjects
    );
    println!(
        "   Calories: {:<12} Avg per scan: {}",
        stats.total_energy,
        format_mean(stats.avg_energy)
    );
    println!(
        "   Quality:  {:<12} Worth buying: {:.1}%",
        format_mean(stats.avg_quality),
        stats.recommend_ratio
    );
    println!("   Puns:     {}", stats.bonus_count);
    println!();

    // Top foods
    if !stats.top_n_frequency.is_empty() {
        println!("TOP FOODS");
        for (i, subject) in stats.top_n_frequency.iter().enumerate() {
            println!("   {:>2}. {:<20} {:>6}", i + 1, subject.name, subject.count);
        }
        println!();
    }

    // Categories
    println!("CATEGORIES");
    for category in [FoodCategory::Fruit, FoodCategory::Vegetable, FoodCategory::Other] {
        println!(
            "   {:<12} {}",
            category.display_name(),
            stats.category_counts.get(category)
        );
    }
    println!();

    // Time Patterns
    println!("TIME PATTERNS");
    println!("   Peak hour:    {}", hour_display(stats.peak_hour));
    println!();

    // Streaks
    println!("STREAKS");
    println!(
        "   Current:  {}",
        days_label(stats.streaks.current_streak_days)
    );
    if stats.longest_streak > 0 {
        let streak_dates = match (
            &stats.streaks.longest_streak_start,
            &stats.streaks.longest_streak_end,
        ) {
            (Some(start), Some(end)) => {
                format!(" ({} - {})", start.format("%b %d"), end.format("%b %d"))
            }
            _ => String::new(),
        };
        println!(
            "   Longest:  {}{}",
            days_label(stats.longest_streak),
            streak_dates
        );
    }
    println!(
        "   Active:   {} of {} days ({:.0}%)",
        stats.streaks.active_days,
        stats.streaks.total_days,
        stats.streaks.activity_percentage()
    );
    println!();
}

fn print_markdown(outcome: &WrapOutcome) {
    println!("# {} Food Wrap", outcome.window().display_name());
    println!();

    let Some(stats) = outcome.summary() else {
        println!("*No scans found for this period.*");
        return;
    };

    print_markdown_summary(stats);

    println!("---");
    println!("*Generated by snackscan*");
}

fn print_markdown_summary(stats: &WrapSummary) {
    // Summary table
    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Scans | {} |", stats.total_scans);
    println!("| Unique Foods | {} |", stats.unique_subjects);
    println!("| Top Food | {} ({}) |", stats.top_subject.name, stats.top_subject.count);
    println!("| Total Calories | {} |", stats.total_energy);
    println!("| Avg Calories | {} |", format_mean(stats.avg_energy));
    println!("| Avg Freshness | {} |", format_mean(stats.avg_quality));
    println!("| Worth Buying | {:.1}% |", stats.recommend_ratio);
    println!("| Puns Collected | {} |", stats.bonus_count);
    println!();

    // Top foods
    if !stats.top_n_frequency.is_empty() {
        println!("## Top Foods");
        println!();
        for (i, subject) in stats.top_n_frequency.iter().enumerate() {
            println!("{}. **{}** - {} scans", i + 1, subject.name, subject.count);
        }
        println!();
    }

    println!("## Categories");
    println!();
    for category in [FoodCategory::Fruit, FoodCategory::Vegetable, FoodCategory::Other] {
        println!(
            "- **{}:** {}",
            category.display_name(),
            stats.category_counts.get(category)
        );
    }
    println!();

    println!("## Habits");
    println!();
    println!("- **Peak hour:** {}", hour_display(stats.peak_hour));
    println!(
        "- **Current streak:** {}",
        days_label(stats.streaks.current_streak_days)
    );
    println!("- **Longest streak:** {}", days_label(stats.longest_streak));
    println!(
        "- **Active days:** {} of {} ({:.0}%)",
        stats.streaks.active_days,
        stats.streaks.total_days,
        stats.streaks.activity_percentage()
    );
    println!();
}

fn print_json(outcome: &WrapOutcome) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

fn format_mean(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn days_label(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}
