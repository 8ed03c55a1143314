#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for district crime statistics.
//!
//! Runs every query against the local default file, or against a CSV passed
//! with `--file`, which goes through the same normalization as a chat
//! upload. Output is plain text, or JSON with `--json`.

mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crime_stats_analytics::AnalyticsError;
use crime_stats_analytics::summary::{available_years, summary_statistics};
use crime_stats_analytics::views::{district_rank_view, district_year_view, yearly_view};
use crime_stats_district::catalog::{extract_area_catalog, menu_areas};
use crime_stats_district::resolver::resolve_location;
use crime_stats_district::{ALL_AREAS, Scope};
use crime_stats_session::{DatasetSession, SessionConfig, SessionError};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "crime_stats", about = "Taiwanese district crime statistics")]
struct Cli {
    /// CSV file to analyze instead of the default data file
    #[arg(long, global = true)]
    file: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dataset overview: totals, years, case types, time slots
    Summary,
    /// List the areas offered in the selection menu
    Areas,
    /// Incidents per district for a single year
    Year {
        /// Area to analyze (e.g. "台北市", "新竹縣", "台北市中山區")
        #[arg(long, default_value = ALL_AREAS)]
        area: String,
        /// Year to show. Defaults to the latest year in the data.
        #[arg(long)]
        year: Option<i32>,
    },
    /// Districts with the most incidents
    Rank {
        /// Area to analyze
        #[arg(long, default_value = ALL_AREAS)]
        area: String,
        /// Number of districts to show. Defaults to the configured value.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Incidents per district for every year
    Yearly {
        /// Area to analyze
        #[arg(long, default_value = ALL_AREAS)]
        area: String,
    },
    /// Show the district a single address resolves to
    Resolve {
        /// Free-text address
        location: String,
        /// Area to resolve within
        #[arg(long, default_value = ALL_AREAS)]
        area: String,
    },
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

/// Prints the chat-facing message before handing the error back to `main`.
fn user_facing<T, E: Into<SessionError>>(result: Result<T, E>) -> Result<T, SessionError> {
    result.map_err(Into::into).inspect_err(|e| {
        log::error!("{e}");
        eprintln!("{}", e.user_message());
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut session = DatasetSession::new(user_facing(SessionConfig::load())?);

    if let Some(path) = &cli.file {
        let bytes = user_facing(std::fs::read(path))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        user_facing(session.upload(&file_name, &bytes))?;
    }

    let active = user_facing(session.active_or_default())?;
    let records = &active.dataset.records;
    log::info!("Using {} ({} records)", active.origin, records.len());

    match cli.command {
        Commands::Summary => {
            let stats = user_facing(summary_statistics(records))?;
            emit(cli.json, &stats, |s| render::summary(s, active.origin))?;
        }
        Commands::Areas => {
            let config = session.config();
            let catalog = extract_area_catalog(records);
            let menu = menu_areas(
                &catalog,
                config.menu_areas_per_kind,
                config.menu_max_options,
            );
            emit(cli.json, &menu, |m| render::areas(m))?;
        }
        Commands::Year { area, year } => {
            let year = user_facing(
                year.or_else(|| available_years(records).last().copied())
                    .ok_or_else(|| AnalyticsError::EmptyDataset {
                        selection: area.clone(),
                    }),
            )?;
            let view = user_facing(district_year_view(records, &Scope::parse(&area), year))?;
            emit(cli.json, &view, render::distribution)?;
        }
        Commands::Rank { area, top } => {
            let top = top.unwrap_or(session.config().default_top_n);
            let view = user_facing(district_rank_view(records, &Scope::parse(&area), top))?;
            emit(cli.json, &view, render::ranking)?;
        }
        Commands::Yearly { area } => {
            let view = user_facing(yearly_view(records, &Scope::parse(&area)))?;
            emit(cli.json, &view, render::yearly)?;
        }
        Commands::Resolve { location, area } => {
            let district = user_facing(resolve_location(&location, &Scope::parse(&area)))?;
            emit(cli.json, &district, |d| {
                d.as_deref().unwrap_or("無法辨識行政區").to_string()
            })?;
        }
    }

    Ok(())
}
