use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use octagon_elo::calculate::{
    bout_history, era_options, fighter_record, upcoming_bout, BoutHistoryRow,
};
use octagon_elo::config::AppConfig;
use octagon_elo::ingest::import_all;
use octagon_elo::format::{
    calculate_age, date_range_label, format_date, format_height, format_rating,
    format_rating_change, truncate_id,
};
use octagon_elo::models::{Bout, Fighter, FighterRef, MatchResult, MergedSeriesPoint};
use octagon_elo::pagination::Pagination;
use octagon_elo::reconcile::{
    chart_date_range, merge_for_charting, project_winner, rating_axis_bounds, select_era,
    single_fighter_series,
};
use octagon_elo::storage::{SnapshotStore, StorageConfig};

#[derive(Parser)]
#[command(name = "octagon-elo")]
#[command(about = "MMA fighter Elo history explorer and matchmaker")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two fighters' rating histories into one chart series
    Merge {
        #[arg(long)]
        fighter1: String,

        #[arg(long)]
        fighter2: String,

        /// Print the series as JSON
        #[arg(long)]
        json: bool,
    },

    /// Project the winner between two fighters at chosen eras
    Project {
        #[arg(long)]
        fighter1: String,

        /// Bout whose post-fight rating represents fighter 1
        #[arg(long)]
        bout1: String,

        #[arg(long)]
        fighter2: String,

        /// Bout whose post-fight rating represents fighter 2
        #[arg(long)]
        bout2: String,

        #[arg(long)]
        json: bool,
    },

    /// List the eras a fighter can be matched at
    Eras {
        #[arg(long)]
        fighter: String,

        #[arg(long)]
        json: bool,
    },

    /// Show a fighter's profile, rating chart summary and bout history
    Profile {
        #[arg(long)]
        fighter: String,

        #[arg(long)]
        json: bool,
    },

    /// Show a fight card in the order the bouts were fought
    Event {
        #[arg(long)]
        event: String,
    },

    /// List events, newest first
    Events {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Search fighters by name or nickname
    Search { query: String },

    /// Import saved API list pages (<source>/<collection>/page-<N>.json)
    Import {
        #[arg(long)]
        source: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    let level = cli.log_level.as_deref().unwrap_or(config.log_level.as_str());
    init_tracing(level, cli.json_logs);

    tracing::info!("Starting octagon-elo v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let store = SnapshotStore::new(StorageConfig::new(data_dir));
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Merge {
            fighter1,
            fighter2,
            json,
        } => cmd_merge(&store, &config, &fighter1, &fighter2, json),
        Commands::Project {
            fighter1,
            bout1,
            fighter2,
            bout2,
            json,
        } => cmd_project(&store, (&fighter1, &bout1), (&fighter2, &bout2), json),
        Commands::Eras { fighter, json } => cmd_eras(&store, &fighter, json),
        Commands::Profile { fighter, json } => cmd_profile(&store, &config, &fighter, today, json),
        Commands::Event { event } => cmd_event(&store, &event),
        Commands::Events { page, page_size } => cmd_events(&store, page, page_size),
        Commands::Search { query } => cmd_search(&store, &query),
        Commands::Import { source, json } => cmd_import(&store, &source, json),
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output on stdout stays machine-readable.
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_fighter(store: &SnapshotStore, id: &str) -> Result<Fighter> {
    store
        .fighter(&id.into())
        .with_context(|| format!("Failed to read fighter {}", id))?
        .ok_or_else(|| anyhow!("Fighter not found: {}", id))
}

fn rating_cell(rating: Option<f64>) -> String {
    rating.map(format_rating).unwrap_or_else(|| "-".to_string())
}

fn limit<T>(rows: &[T], max_rows: usize) -> &[T] {
    if max_rows == 0 || rows.len() <= max_rows {
        rows
    } else {
        &rows[..max_rows]
    }
}

#[derive(Serialize)]
struct MergeOutput {
    fighter1: FighterRef,
    fighter2: FighterRef,
    range: String,
    axis: Option<(f64, f64)>,
    points: Vec<MergedSeriesPoint>,
}

fn cmd_merge(
    store: &SnapshotStore,
    config: &AppConfig,
    fighter1: &str,
    fighter2: &str,
    json: bool,
) -> Result<()> {
    let a = load_fighter(store, fighter1)?;
    let b = load_fighter(store, fighter2)?;

    let series_a = a
        .rating_series()
        .with_context(|| format!("Rating history of {} is malformed", a.name))?;
    let series_b = b
        .rating_series()
        .with_context(|| format!("Rating history of {} is malformed", b.name))?;

    let points = merge_for_charting(&series_a, &series_b);
    tracing::debug!(
        "Merged {} + {} snapshots into {} rows",
        series_a.len(),
        series_b.len(),
        points.len()
    );

    let output = MergeOutput {
        fighter1: a.summary(),
        fighter2: b.summary(),
        range: date_range_label(chart_date_range(&points)),
        axis: rating_axis_bounds(&points, config.chart.axis_padding),
        points,
    };

    if json {
        return print_json(&output);
    }

    println!("{} vs {}", output.fighter1.name, output.fighter2.name);
    println!("{}", output.range);
    if let Some((low, high)) = output.axis {
        println!("Rating axis: {} to {}", format_rating(low), format_rating(high));
    }
    println!();
    println!(
        "{:<18} {:>10} {:>10}",
        "Date",
        truncate_id(a.fighter_id.as_str()),
        truncate_id(b.fighter_id.as_str())
    );
    for point in limit(&output.points, config.chart.max_rows) {
        println!(
            "{:<18} {:>10} {:>10}",
            format_date(point.date),
            rating_cell(point.fighter1_rating),
            rating_cell(point.fighter2_rating)
        );
    }

    Ok(())
}

fn cmd_project(
    store: &SnapshotStore,
    (fighter1, bout1): (&str, &str),
    (fighter2, bout2): (&str, &str),
    json: bool,
) -> Result<()> {
    let a = load_fighter(store, fighter1)?;
    let b = load_fighter(store, fighter2)?;

    let era_a = select_era(&a.fighter_id, &a.rating_series()?, &bout1.into())?.with_name(&a.name);
    let era_b = select_era(&b.fighter_id, &b.rating_series()?, &bout2.into())?.with_name(&b.name);

    let result = project_winner(era_a, era_b);
    tracing::info!("Projected matchup {} vs {}", fighter1, fighter2);

    if json {
        return print_json(&result);
    }

    match &result {
        MatchResult::Decided { winner, loser } => println!(
            "Projected winner: {} ({}, {}) over {} ({}, {}) by {}",
            winner.label(),
            format_rating(winner.rating()),
            format_date(winner.snapshot.date),
            loser.label(),
            format_rating(loser.rating()),
            format_date(loser.snapshot.date),
            format_rating(result.margin())
        ),
        MatchResult::Draw { fighters } => println!(
            "Projected draw: {} and {} are both rated {}",
            fighters[0].label(),
            fighters[1].label(),
            format_rating(fighters[0].rating())
        ),
    }

    Ok(())
}

fn cmd_eras(store: &SnapshotStore, fighter: &str, json: bool) -> Result<()> {
    let fighter = load_fighter(store, fighter)?;
    let eras = era_options(&fighter, &fighter.rating_series()?);

    if json {
        return print_json(&eras);
    }

    println!("{} - {} eras", fighter.name, eras.len());
    for era in &eras {
        println!("  {:<20} {:>6}  {}", era.bout_id, format_rating(era.rating), era.label);
    }
    Ok(())
}

#[derive(Serialize)]
struct ProfileOutput<'a> {
    fighter: FighterRef,
    record: String,
    age: Option<u32>,
    rating: f64,
    peak_rating: f64,
    chart_range: String,
    chart_axis: Option<(f64, f64)>,
    upcoming_bout: Option<&'a Bout>,
    history: Vec<BoutHistoryRow>,
}

fn cmd_profile(
    store: &SnapshotStore,
    config: &AppConfig,
    fighter: &str,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let fighter = load_fighter(store, fighter)?;
    let series = fighter.rating_series()?;
    let chart = single_fighter_series(&series);

    let output = ProfileOutput {
        fighter: fighter.summary(),
        record: fighter_record(&fighter),
        age: fighter.date_of_birth.and_then(|dob| calculate_age(dob, today)),
        rating: fighter.elo,
        peak_rating: fighter.peak_elo,
        chart_range: date_range_label(chart_date_range(&chart)),
        chart_axis: rating_axis_bounds(&chart, config.chart.axis_padding),
        upcoming_bout: upcoming_bout(&fighter, today),
        history: bout_history(&fighter, &series, today),
    };

    if json {
        return print_json(&output);
    }

    match &fighter.nickname {
        Some(nickname) => println!("{} \"{}\"", fighter.name, nickname),
        None => println!("{}", fighter.name),
    }
    println!("Record:  {}", output.record);
    println!(
        "Height:  {}",
        fighter.height_in.map(format_height).unwrap_or_else(|| "N/A".to_string())
    );
    if let Some(weight) = fighter.weight_lb {
        println!("Weight:  {} lbs", weight);
    }
    println!(
        "Reach:   {}",
        fighter
            .reach_in
            .map(|r| format!("{} inches", r))
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("Stance:  {}", fighter.stance.as_deref().unwrap_or("N/A"));
    match (output.age, fighter.date_of_birth) {
        (Some(age), Some(dob)) => println!("Age:     {} years old ({})", age, format_date(dob)),
        _ => println!("Age:     N/A"),
    }
    println!(
        "Rating:  {} (peak {})",
        format_rating(output.rating),
        format_rating(output.peak_rating)
    );
    println!("History: {}", output.chart_range);

    if let Some(bout) = output.upcoming_bout {
        let opponent = bout
            .opponent_of(&fighter.fighter_id)
            .map(|o| o.name.as_str())
            .unwrap_or("TBA");
        println!();
        println!(
            "Upcoming: vs {} at {} ({}, {})",
            opponent,
            bout.event.name,
            format_date(bout.event.date),
            bout.event.location
        );
    }

    println!();
    for row in limit(&output.history, config.chart.max_rows) {
        let rating = match (row.rating_after, row.rating_change) {
            (Some(after), Some(change)) => {
                format!("{} ({})", format_rating(after), format_rating_change(change))
            }
            (Some(after), None) => format_rating(after),
            _ => String::new(),
        };
        println!(
            "{:<10} {:<24} {:<14} {:<30} {:<22} R{} {}  {}",
            row.outcome.to_string(),
            row.opponent.name,
            rating,
            row.event_name,
            row.method.as_deref().unwrap_or(""),
            row.ending_round.as_deref().unwrap_or("-"),
            row.ending_time.as_deref().unwrap_or("-"),
            format_date(row.event_date)
        );
    }

    Ok(())
}

fn cmd_event(store: &SnapshotStore, event: &str) -> Result<()> {
    let event = store
        .event(&event.into())?
        .ok_or_else(|| anyhow!("Event not found: {}", event))?;
    let bouts = store.bouts_for_event(&event)?;

    println!("{}", event.name);
    println!("{} - {}", format_date(event.date), event.location);
    println!();
    for bout in &bouts {
        let result = match &bout.winning_fighter {
            Some(winner) => format!("{} wins", winner.name),
            None => "No winner".to_string(),
        };
        println!(
            "{} vs {}: {} ({})",
            bout.fighter_1.name,
            bout.fighter_2.name,
            result,
            bout.method.as_deref().unwrap_or("pending")
        );
    }
    Ok(())
}

fn cmd_events(store: &SnapshotStore, page: Option<u32>, page_size: Option<u32>) -> Result<()> {
    let events = store.events()?;
    let pagination = Pagination::new(page, page_size);

    for event in pagination.apply(&events) {
        println!(
            "{:<18} {:<40} {}",
            format_date(event.date),
            event.name,
            event.location
        );
    }
    println!(
        "Page {} ({} events total)",
        pagination.page,
        events.len()
    );
    Ok(())
}

fn cmd_search(store: &SnapshotStore, query: &str) -> Result<()> {
    let fighters = store.search_fighters(query)?;
    if fighters.is_empty() {
        println!("No fighters match {:?}", query);
        return Ok(());
    }

    for fighter in &fighters {
        println!(
            "{:<20} {:<30} {:>8}  {}",
            fighter.fighter_id,
            fighter.name,
            fighter_record(fighter),
            format_rating(fighter.elo)
        );
    }
    Ok(())
}

fn cmd_import(store: &SnapshotStore, source: &std::path::Path, json: bool) -> Result<()> {
    let summaries = import_all(source, store.config())
        .with_context(|| format!("Failed to import from {:?}", source))?;

    if json {
        return print_json(&summaries);
    }

    for summary in &summaries {
        println!(
            "{:<10} {:>3} pages {:>6} records {:>6} new {:>6} updated",
            summary.collection, summary.pages, summary.records, summary.added, summary.updated
        );
    }
    Ok(())
}
