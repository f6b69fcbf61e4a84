use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use aps_check::config::{self, Config};
use aps_check::domain::{Degree, UserAcademicRecord};
use aps_check::eligibility;
use aps_check::scoring;
use aps_check::tracker::{self, MarksTracker};
use aps_check::{output, profile, telemetry};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the APS breakdown for a profile
    Score {
        /// Profile JSON (overrides `profile` in config)
        #[arg(short, long, conflicts_with = "from_marks")]
        profile: Option<PathBuf>,
        /// Score the latest term in the marks tracker instead of a profile
        #[arg(long)]
        from_marks: bool,
    },
    /// List degrees the candidate qualifies for
    Eligible {
        #[arg(short, long)]
        profile: Option<PathBuf>,
        /// Degree catalogue JSON (overrides `catalogue` in config)
        #[arg(short = 'C', long)]
        catalogue: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Explain eligibility for a single degree
    Check {
        /// Degree id as listed in the catalogue
        degree_id: i64,
        #[arg(short, long)]
        profile: Option<PathBuf>,
        #[arg(short = 'C', long)]
        catalogue: Option<PathBuf>,
    },
    /// Track marks across school terms
    Marks {
        #[command(subcommand)]
        action: MarksCommand,
    },
    /// Write a starter config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum MarksCommand {
    /// Print the marks grid
    Show,
    /// Add a term next to the existing ones
    AddTerm { grade: u8, term: u8 },
    /// Remove the first or last term
    RemoveTerm { id: u32 },
    /// Set a mark (omit MARK to clear it)
    Set {
        subject: String,
        term_id: u32,
        #[arg(allow_negative_numbers = true)]
        mark: Option<i32>,
    },
    /// Start the tracker from a profile's marks
    Seed {
        #[arg(short, long, default_value_t = tracker::DEFAULT_GRADE)]
        grade: u8,
        #[arg(short, long)]
        profile: Option<PathBuf>,
        /// Replace an existing tracker
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "aps-check")]
#[command(about = "APS calculator and degree eligibility checker", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/aps-check/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Print the error chain and exit with `code`
fn exit_with(code: i32, err: anyhow::Error) -> ! {
    eprintln!("Error: {:#}", err);
    std::process::exit(code);
}

fn or_exit<T>(result: anyhow::Result<T>, code: i32) -> T {
    result.unwrap_or_else(|e| exit_with(code, e))
}

/// Explicit --config must exist; the default path is optional.
fn resolve_config(explicit: Option<PathBuf>) -> anyhow::Result<Config> {
    if explicit.is_some() {
        return config::load_config(explicit);
    }
    let default_path = config::get_config_path()?;
    if default_path.exists() {
        config::load_config(Some(default_path))
    } else {
        debug!("No config at {}, using defaults", default_path.display());
        Ok(Config::default())
    }
}

fn resolve_path(
    flag: Option<PathBuf>,
    configured: Option<&String>,
    what: &str,
) -> anyhow::Result<PathBuf> {
    match (flag, configured) {
        (Some(path), _) => Ok(path),
        (None, Some(raw)) => Ok(config::expand_path(raw)),
        (None, None) => anyhow::bail!(
            "No {what} given. Pass --{what} or set `{what}` in the config file"
        ),
    }
}

fn load_record(flag: Option<PathBuf>, config: &Config) -> UserAcademicRecord {
    let path = or_exit(resolve_path(flag, config.profile.as_ref(), "profile"), EXIT_INPUT);
    or_exit(profile::load_profile(&path), EXIT_INPUT)
}

fn load_degrees(flag: Option<PathBuf>, config: &Config) -> Vec<Degree> {
    let path = or_exit(
        resolve_path(flag, config.catalogue.as_ref(), "catalogue"),
        EXIT_INPUT,
    );
    or_exit(profile::load_catalogue(&path), EXIT_INPUT)
}

fn tracker_path(config: &Config) -> PathBuf {
    match config.tracker.as_deref() {
        Some(raw) => config::expand_path(raw),
        None => or_exit(tracker::get_tracker_path(), EXIT_CONFIG),
    }
}

/// Config plus the validated scoring and eligibility settings
struct Settings {
    config: Config,
    scoring: scoring::ScoringConfig,
    eligibility: eligibility::EligibilityConfig,
    use_colors: bool,
}

impl Settings {
    fn load(config_path: Option<PathBuf>) -> Self {
        let config = or_exit(resolve_config(config_path), EXIT_CONFIG);

        // Validate scoring config at startup
        let scoring_config = config.scoring.clone().unwrap_or_default();
        if let Err(errors) = scoring::validate_scoring(&scoring_config) {
            eprintln!("Scoring config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
        let eligibility_config = config.eligibility.clone().unwrap_or_default();

        Self {
            config,
            scoring: scoring_config,
            eligibility: eligibility_config,
            use_colors: output::should_use_colors(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Err(e) = telemetry::init(cli.verbose) {
        eprintln!("Logging setup failed: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        // Init runs before any config is loaded
        Commands::Init { force } => {
            let path = match config_path {
                Some(p) => p,
                None => or_exit(config::get_config_path(), EXIT_CONFIG),
            };
            or_exit(config::write_default_config(&path, force), EXIT_CONFIG);
            println!("Wrote config to {}", path.display());
        }
        Commands::Score {
            profile,
            from_marks,
        } => {
            let settings = Settings::load(config_path);
            let record = if from_marks {
                let path = tracker_path(&settings.config);
                let tracker = or_exit(tracker::load_tracker(&path), EXIT_INPUT);
                match tracker.latest_record() {
                    Some(record) => record,
                    None => exit_with(
                        EXIT_INPUT,
                        anyhow::anyhow!("No marks recorded in {}", path.display()),
                    ),
                }
            } else {
                load_record(profile, &settings.config)
            };
            let result = scoring::aps_for_record(&record, &settings.scoring);
            println!("{}", output::format_aps(&result, settings.use_colors));
        }
        Commands::Eligible {
            profile,
            catalogue,
            format,
        } => {
            let settings = Settings::load(config_path);
            let record = load_record(profile, &settings.config);
            let degrees = load_degrees(catalogue, &settings.config);
            let eligible = eligibility::filter_with_config(
                &record,
                &degrees,
                &settings.eligibility,
                &settings.scoring,
            );

            info!(
                total = degrees.len(),
                eligible = eligible.len(),
                "Filtered catalogue"
            );

            match format {
                OutputFormat::Table => {
                    println!(
                        "{}",
                        output::format_degree_table(&eligible, settings.use_colors)
                    )
                }
                OutputFormat::Tsv => {
                    let tsv = output::format_tsv(&eligible);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                OutputFormat::Json => {
                    let json = or_exit(
                        serde_json::to_string_pretty(&eligible).map_err(anyhow::Error::from),
                        EXIT_INPUT,
                    );
                    println!("{}", json);
                }
            }
        }
        Commands::Check {
            degree_id,
            profile,
            catalogue,
        } => {
            let settings = Settings::load(config_path);
            let record = load_record(profile, &settings.config);
            let degrees = load_degrees(catalogue, &settings.config);
            let Some(degree) = degrees.iter().find(|d| d.id == degree_id) else {
                exit_with(
                    EXIT_INPUT,
                    anyhow::anyhow!("No degree with id {} in catalogue", degree_id),
                );
            };

            let assessment =
                eligibility::assess(&record, degree, &settings.eligibility, &settings.scoring);
            println!(
                "{}",
                output::format_assessment(degree, &assessment, settings.use_colors)
            );
        }
        Commands::Marks { action } => {
            let settings = Settings::load(config_path);
            run_marks(action, &settings.config, settings.use_colors);
        }
    }

    debug!("Done in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}

fn run_marks(action: MarksCommand, config: &Config, use_colors: bool) {
    let path = tracker_path(config);
    let mut tracker = or_exit(tracker::load_tracker(&path), EXIT_INPUT);

    match action {
        MarksCommand::Show => {
            println!("{}", output::format_tracker(&tracker, use_colors));
            return;
        }
        MarksCommand::AddTerm { grade, term } => {
            let id = or_exit(tracker.add_term(grade, term), EXIT_INPUT);
            println!("Added Grade {} term {} (id {})", grade, term, id);
        }
        MarksCommand::RemoveTerm { id } => {
            or_exit(tracker.remove_term(id), EXIT_INPUT);
            println!("Removed term {}", id);
        }
        MarksCommand::Set {
            subject,
            term_id,
            mark,
        } => {
            or_exit(tracker.set_mark(&subject, term_id, mark), EXIT_INPUT);
        }
        MarksCommand::Seed {
            grade,
            profile,
            force,
        } => {
            if !tracker.terms.is_empty() && !force {
                exit_with(
                    EXIT_INPUT,
                    anyhow::anyhow!(
                        "Marks already tracked in {}. Use --force to replace them",
                        path.display()
                    ),
                );
            }
            let record = load_record(profile, config);
            tracker = or_exit(MarksTracker::seed_from_record(&record, grade), EXIT_INPUT);
            println!(
                "Seeded Grade {} term 1 with {} subjects",
                grade,
                record.subject_marks.len()
            );
        }
    }

    or_exit(tracker::save_tracker(&path, &tracker), EXIT_INPUT);
    debug!(path = %path.display(), "Saved marks tracker");
}
