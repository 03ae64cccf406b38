//! Pawdiary CLI
//!
//! Command-line interface over a JSON file of diary entries:
//! - List records, newest first
//! - Show the calendar month grid
//! - Show the weight series and walk history
//! - Compute walk distances
//! - Generate a default config file

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pawdiary::config::{generate_default_config, Config};
use pawdiary::index::CalendarCell;
use pawdiary::storage::load_drafts;
use pawdiary::walk::{distance_km, NoLocation};
use pawdiary::{Diary, Profile, Record, RecordType, YearMonth};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pawdiary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pet-care diary: records, calendar, weight and walks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON file with diary entries (array of record drafts)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records, newest first
    List {
        /// Only this record type (toilet, food, walk, weight, vaccination, trimming)
        #[arg(short = 't', long = "type")]
        record_type: Option<RecordType>,
        /// Only this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show the most recent records
    Recent {
        /// Number of records (default: from config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show a calendar month
    Calendar {
        /// Month (YYYY-MM, default: current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Record types to hide
        #[arg(long)]
        hide: Vec<RecordType>,
    },

    /// Show the weight series
    Weights,

    /// Show tracked walks with map links
    Walks,

    /// Distance in km between two coordinates
    Distance {
        lat1: f64,
        lng1: f64,
        lat2: f64,
        lng2: f64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    config.logging.init();

    match &cli.command {
        Commands::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
        } => {
            println!("{:.2} km", distance_km(*lat1, *lng1, *lat2, *lng2));
            return Ok(());
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
            return Ok(());
        }

        _ => {}
    }

    let diary = open_diary(&cli, config).await?;
    let json = cli.format == "json";

    match cli.command {
        Commands::List { record_type, date } => {
            let records: Vec<Record> = match date {
                Some(date) => diary.records_for_day(date).await,
                None => diary.records().await,
            };
            let records: Vec<Record> = records
                .into_iter()
                .filter(|r| record_type.map_or(true, |t| r.record_type() == t))
                .collect();
            print_records(&diary, &records, json)?;
        }

        Commands::Recent { count } => {
            let records = match count {
                Some(n) => diary.recent_n(n).await,
                None => diary.recent().await,
            };
            print_records(&diary, &records, json)?;
        }

        Commands::Calendar { month, hide } => {
            let month = match month {
                Some(m) => parse_month(&m)?,
                None => YearMonth::of(diary.today()),
            };
            for record_type in hide {
                if diary.enabled_types().await.contains(&record_type) {
                    diary.toggle_type(record_type).await;
                }
            }

            let grid = diary.calendar_month(month).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                print_calendar(&grid);
            }
        }

        Commands::Weights => {
            let series = diary.weight_series().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else if series.is_empty() {
                println!("No weight records");
            } else {
                println!("{:<12} {}", "Date", "Weight");
                println!("{}", "-".repeat(22));
                for point in series.points() {
                    let weight = point
                        .weight
                        .map(|w| format!("{:.1} kg", w))
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<12} {}", diary.format_date(point.date), weight);
                }
            }
        }

        Commands::Walks => {
            let walks = diary.walks().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&walks)?);
            } else if walks.is_empty() {
                println!("No tracked walks");
            } else {
                for walk in &walks {
                    println!(
                        "{}  {}",
                        diary.format_timestamp(walk.timestamp),
                        walk.sub_type()
                    );
                    if let Some(url) = diary.walk_map_url(walk) {
                        println!("  {}", url);
                    }
                }
            }
        }

        Commands::Distance { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

async fn open_diary(cli: &Cli, config: Config) -> Result<Diary> {
    let diary = Diary::new(config, Profile::default(), Arc::new(NoLocation));

    let Some(path) = &cli.input else {
        bail!("--input <FILE> is required for this command");
    };
    let drafts = load_drafts(path).with_context(|| format!("loading {:?}", path))?;
    let result = diary.import(drafts).await;

    if result.failed > 0 {
        eprintln!("Skipped {} entries:", result.failed);
        for error in result.errors.iter().take(10) {
            eprintln!("  {}", error);
        }
    }
    Ok(diary)
}

fn parse_month(s: &str) -> Result<YearMonth> {
    let (year, month) = s
        .split_once('-')
        .with_context(|| format!("Invalid month: {}. Use YYYY-MM", s))?;
    let year: i32 = year.parse().with_context(|| format!("Invalid year: {}", year))?;
    let month: u32 = month.parse().with_context(|| format!("Invalid month: {}", month))?;
    YearMonth::new(year, month).with_context(|| format!("Month out of range: {}", month))
}

fn print_records(diary: &Diary, records: &[Record], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No records");
        return Ok(());
    }

    println!("{:<20} {}", "Time", "Record");
    println!("{}", "-".repeat(50));
    for record in records {
        println!(
            "{:<20} {}",
            diary.format_timestamp(record.timestamp),
            record.summary()
        );
        if let Some(memo) = &record.memo {
            for line in memo.lines() {
                println!("{:<20} {}", "", line);
            }
        }
    }
    Ok(())
}

fn print_calendar(grid: &pawdiary::CalendarMonth) {
    println!("{}", grid.month);
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");

    for week in grid.cells.chunks(7) {
        let mut line = String::new();
        for cell in week {
            match cell {
                CalendarCell::Padding => line.push_str("    "),
                CalendarCell::Day(day) => {
                    let mark = if day.is_today {
                        '*'
                    } else if day.record_count > 0 {
                        '+'
                    } else {
                        ' '
                    };
                    line.push_str(&format!("{:>3}{}", day.day, mark));
                }
            }
        }
        println!("{}", line.trim_end());
    }

    println!();
    for day in grid.days().filter(|d| d.record_count > 0) {
        let markers: Vec<&str> = day
            .markers
            .iter()
            .map(|m| m.record_type.label())
            .collect();
        let more = day.record_count.saturating_sub(day.markers.len());
        if more > 0 {
            println!("{:>2}: {} (+{})", day.day, markers.join(", "), more);
        } else {
            println!("{:>2}: {}", day.day, markers.join(", "));
        }
    }
}
