use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crs_check::draws::{rank_streams, StreamResult};
use crs_check::output::{self, Report};
use crs_check::profile::{self, ApplicantProfile};
use crs_check::scoring::{self, PointsPolicy, ScoreBreakdown};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_PROFILE: i32 = 1;
const EXIT_CONFIG: i32 = 2;
const EXIT_IO: i32 = 3;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a profile file and print the itemized breakdown
    Score {
        /// Path to a YAML profile
        profile: PathBuf,
    },
    /// Score a profile file and compare it with past draw cutoffs
    Draws {
        /// Path to a YAML profile
        profile: PathBuf,
    },
    /// Answer the questionnaire interactively (default if no subcommand)
    Quiz {
        /// Print the collected answers as a YAML profile before the results
        #[arg(long)]
        emit_profile: bool,
    },
    /// Print the points policy in effect as YAML
    Policy,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "crs-check")]
#[command(about = "Comprehensive Ranking System score calculator and draw comparison", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/crs-check/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Which parts of a result a command prints.
#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    Breakdown,
    Streams,
    Full,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Quiz {
        emit_profile: false,
    });

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match crs_check::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(e) = crs_check::telemetry::init(cli.verbose, config.log_level.as_deref()) {
        eprintln!("Config error: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    // Validate the points policy at startup
    let policy = config.effective_policy();
    if let Err(errors) = scoring::validate_policy(&policy) {
        eprintln!("Points policy errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    if config.policy.is_some() {
        info!(epoch = %policy.epoch, "using points policy from config");
    } else {
        debug!(epoch = %policy.epoch, "using built-in points policy");
    }

    // Route based on subcommand
    match command {
        Commands::Score { profile } => {
            let applicant = load_applicant(&profile);
            report(&applicant, &policy, View::Breakdown, cli.format);
        }
        Commands::Draws { profile } => {
            let applicant = load_applicant(&profile);
            report(&applicant, &policy, View::Streams, cli.format);
        }
        Commands::Quiz { emit_profile } => {
            // Prompts move to stderr so TSV/JSON on stdout stay parseable
            let stdin = std::io::stdin();
            let answers = if cli.format == OutputFormat::Table {
                profile::run_questionnaire(stdin.lock(), std::io::stdout().lock())
            } else {
                profile::run_questionnaire(stdin.lock(), std::io::stderr().lock())
            };
            let applicant = match answers {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Questionnaire error: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };
            debug!(?applicant, "questionnaire complete");

            if emit_profile {
                match profile::to_yaml(&applicant) {
                    Ok(yaml) => println!("{}", yaml),
                    Err(e) => {
                        eprintln!("Failed to write profile: {:#}", e);
                        std::process::exit(EXIT_IO);
                    }
                }
            }
            report(&applicant, &policy, View::Full, cli.format);
        }
        Commands::Policy => match serde_saphyr::to_string(&policy) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("Failed to write policy: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Load and validate a profile document, exiting on any problem.
fn load_applicant(path: &Path) -> ApplicantProfile {
    let document = match profile::load_profile(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Profile error: {:#}", e);
            std::process::exit(EXIT_PROFILE);
        }
    };

    match profile::validate_profile(&document) {
        Ok(applicant) => {
            debug!(path = %path.display(), "profile loaded");
            applicant
        }
        Err(errors) => {
            eprintln!("Profile errors in {}:", path.display());
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_PROFILE);
        }
    }
}

/// Score the applicant and print the requested view.
fn report(applicant: &ApplicantProfile, policy: &PointsPolicy, view: View, format: OutputFormat) {
    let breakdown = scoring::compute_breakdown_with(applicant, policy);
    info!(total = breakdown.total, "score computed");

    let streams = match view {
        View::Breakdown => None,
        View::Streams | View::Full => {
            let ranked = rank_streams(applicant, breakdown.total);
            let qualified = ranked.iter().filter(|r| r.qualified).count();
            debug!(streams = ranked.len(), qualified, "draw comparison complete");
            if qualified == 0 {
                info!("score is below every latest cutoff");
            }
            Some(ranked)
        }
    };

    let use_colors = output::should_use_colors();
    let text = match format {
        OutputFormat::Table => render_table(
            &breakdown,
            &policy.epoch,
            streams.as_deref(),
            view,
            use_colors,
        ),
        OutputFormat::Tsv => render_tsv(&breakdown, streams.as_deref(), view),
        OutputFormat::Json => {
            match output::format_json(&Report {
                epoch: &policy.epoch,
                breakdown: &breakdown,
                streams: streams.as_deref(),
            }) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("Failed to write JSON: {}", e);
                    std::process::exit(EXIT_IO);
                }
            }
        }
    };

    println!("{}", text);
}

fn render_table(
    breakdown: &ScoreBreakdown,
    epoch: &str,
    streams: Option<&[StreamResult]>,
    view: View,
    use_colors: bool,
) -> String {
    let mut sections = Vec::new();

    if view == View::Streams {
        sections.push(format!("CRS score: {}", breakdown.total));
    } else {
        sections.push(output::format_breakdown(breakdown, epoch, use_colors));
    }

    if let Some(streams) = streams {
        sections.push(output::format_stream_table(streams, use_colors));
        sections.push(output::format_stream_summary(streams));
    }

    sections.join("\n\n")
}

fn render_tsv(breakdown: &ScoreBreakdown, streams: Option<&[StreamResult]>, view: View) -> String {
    match (view, streams) {
        (View::Breakdown, _) | (_, None) => output::format_breakdown_tsv(breakdown),
        (View::Streams, Some(streams)) => output::format_streams_tsv(streams),
        (View::Full, Some(streams)) => format!(
            "{}\n\n{}",
            output::format_breakdown_tsv(breakdown),
            output::format_streams_tsv(streams)
        ),
    }
}
