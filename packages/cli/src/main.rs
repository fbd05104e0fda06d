#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the age map dashboard.
//!
//! Starts the API server, or loads the datasets once and prints what the
//! dashboard would show for a given set of filters. Run without a
//! subcommand to pick one interactively.

mod report;

use std::sync::Arc;

use age_map_engine::dashboard::{DashboardConfig, DashboardState};
use age_map_server::{ServerSettings, query::build_dashboard};
use age_map_server_models::DashboardQueryParams;
use age_map_source::{DataSourceConfig, load_dashboard_data};
use clap::{Args, Parser, Subcommand};
use dialoguer::Select;

#[derive(Parser)]
#[command(name = "age_map_cli", about = "Bangkok age group hotspot dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Prompt for the bind address, port, and data source
        #[arg(long)]
        interactive: bool,
    },
    /// Print bucket counts and density range for the given filters
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the districts selectable under the given zone
    Districts {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Dashboard filters, mirroring the server's query parameters.
#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Display mode: significance (gi) or density (age)
    #[arg(long)]
    mode: Option<String>,
    /// Zone: inner, middle, outer, or all
    #[arg(long)]
    zone: Option<String>,
    /// Districts to exclude
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,
    /// Age groups to include, e.g. `age_0_14,age_60_up`. All when omitted
    #[arg(long)]
    ages: Option<String>,
    /// Upstream API base URL. Overrides the dataset environment variables
    #[arg(long)]
    upstream: Option<String>,
}

impl FilterArgs {
    fn query_params(&self) -> DashboardQueryParams {
        DashboardQueryParams {
            mode: self.mode.clone(),
            zone: self.zone.clone(),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.join(",")),
            ages: self.ages.clone(),
        }
    }

    fn sources(&self) -> DataSourceConfig {
        self.upstream
            .as_ref()
            .map_or_else(DataSourceConfig::from_env, DataSourceConfig::upstream)
    }
}

/// Top-level choices offered when no subcommand is given.
enum Tool {
    Server,
    Summary,
    Districts,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::Summary, Self::Districts];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::Summary => "Summarize the current datasets",
            Self::Districts => "List districts",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => pick_command()?,
    };

    match command {
        Commands::Serve { interactive } => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(async move {
                    if interactive {
                        age_map_server::interactive::run().await
                    } else {
                        age_map_server::run_server(ServerSettings::from_env()).await
                    }
                })
            })
            .await??;
        }
        Commands::Summary { filters, json } => {
            let (state, data) = load(&filters).await?;
            let summary = state.summary(data.hexes());
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for line in report::summary_lines(&summary) {
                    println!("{line}");
                }
            }
        }
        Commands::Districts { filters } => {
            let (state, data) = load(&filters).await?;
            let districts = state.selectable_districts(data.hexes());
            if districts.is_empty() {
                log::warn!("No districts found in the loaded hex cells");
            }
            for line in report::district_lines(&state, &districts) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn pick_command() -> Result<Commands, Box<dyn std::error::Error>> {
    println!("Age Map");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match Tool::ALL[idx] {
        Tool::Server => Commands::Serve { interactive: true },
        Tool::Summary => Commands::Summary {
            filters: FilterArgs::default(),
            json: false,
        },
        Tool::Districts => Commands::Districts {
            filters: FilterArgs::default(),
        },
    })
}

async fn load(
    filters: &FilterArgs,
) -> Result<(DashboardState, age_map_population_models::DashboardData), Box<dyn std::error::Error>>
{
    let state = build_dashboard(
        Arc::new(DashboardConfig::default()),
        &filters.query_params(),
    )?;
    let data = load_dashboard_data(&reqwest::Client::new(), &filters.sources()).await;
    Ok((state, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_become_query_params() {
        let cli = Cli::parse_from([
            "age_map_cli",
            "summary",
            "--mode",
            "density",
            "--exclude",
            "เขตบางรัก,เขตสาทร",
            "--ages",
            "age_60_up",
        ]);
        let Some(Commands::Summary { filters, json }) = cli.command else {
            panic!("expected summary");
        };
        assert!(!json);
        assert_eq!(
            filters.query_params(),
            DashboardQueryParams {
                mode: Some("density".to_string()),
                zone: None,
                exclude: Some("เขตบางรัก,เขตสาทร".to_string()),
                ages: Some("age_60_up".to_string()),
            }
        );
    }

    #[test]
    fn no_exclusions_means_no_exclude_param() {
        assert_eq!(FilterArgs::default().query_params(), DashboardQueryParams::default());
    }

    #[test]
    fn upstream_flag_overrides_sources() {
        let filters = FilterArgs {
            upstream: Some("http://localhost:8000".to_string()),
            ..FilterArgs::default()
        };
        assert_eq!(
            filters.sources(),
            DataSourceConfig::upstream("http://localhost:8000")
        );
    }
}
