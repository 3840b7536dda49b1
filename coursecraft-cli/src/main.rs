//! # coursecraft CLI
//!
//! Recommends three courses per student from a CSV roster and a course list.
//!
//! Usage:
//!   coursecraft recommend --students <roster.csv> --courses <courses.txt> [-o out.csv]
//!   coursecraft sample [students|courses]
//!   coursecraft show <results.csv>
//!
//! Examples:
//!   OPENAI_API_KEY=sk-... coursecraft recommend -o campaign_recommendations.csv
//!   coursecraft recommend --dry-run --students roster.csv
//!   coursecraft sample students > roster.csv

use clap::{Args, Parser, Subcommand, ValueEnum};
use coursecraft_campaign::settings::{Overrides, API_KEY_ENV};
use coursecraft_campaign::{
    parse_roster, BatchOutcome, CourseCatalog, Recommender, ResultsTable, Settings,
    SAMPLE_COURSES, SAMPLE_STUDENTS,
};
use coursecraft_error::Result;
use coursecraft_llm::{LlmProvider, ScriptedProvider};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DRY_RUN_REPLY: &str = "(dry run: no model was called)";

#[derive(Parser)]
#[command(name = "coursecraft")]
#[command(author, version, about = "coursecraft - personalized course recommendation campaigns")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug logs and per-agent progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only print the results table
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate recommendations for every student in the roster
    Recommend(RecommendArgs),
    /// Print the built-in sample inputs
    Sample {
        #[arg(value_enum, default_value = "students")]
        which: SampleKind,
    },
    /// Render a previously exported results CSV
    Show {
        #[arg(required = true)]
        file: PathBuf,
    },
}

#[derive(Args, Default)]
struct RecommendArgs {
    /// Student roster CSV (default: built-in sample)
    #[arg(short, long)]
    students: Option<PathBuf>,

    /// Course list, free text (default: built-in sample)
    #[arg(short, long)]
    courses: Option<PathBuf>,

    /// Write the results as CSV to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// OpenAI API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum tokens per answer
    #[arg(long)]
    max_tokens: Option<usize>,

    /// OpenAI-compatible endpoint base URL
    #[arg(long)]
    base_url: Option<String>,

    /// TOML file with model settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build every prompt but answer offline instead of calling the model
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SampleKind {
    Students,
    Courses,
}

/// Initialize tracing on stderr; RUST_LOG wins over the flags
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if cli.quiet {
        "coursecraft=warn"
    } else if cli.verbose {
        "coursecraft=debug"
    } else {
        "coursecraft=info"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: Option<&Path>, sample: &str) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            coursecraft_error::Error::from(e)
                .with_operation("cli::read_input")
                .with_context("path", path.display().to_string())
        }),
        None => {
            debug!("no file given, using the sample input");
            Ok(sample.to_string())
        }
    }
}

fn load_settings(args: &RecommendArgs) -> Result<Settings> {
    let base = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    base.apply(Overrides {
        api_key: args.api_key.clone(),
        base_url: args.base_url.clone(),
        model: args.model.clone(),
        temperature: args.temperature,
        max_tokens: args.max_tokens,
    })
}

fn progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:30}] {pos}/{len} students {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar
}

async fn run_batch<P: LlmProvider>(
    recommender: &Recommender<P>,
    roster: &str,
    courses: &str,
    quiet: bool,
) -> Result<BatchOutcome> {
    let profiles = parse_roster(roster)?;
    let catalog = CourseCatalog::new(courses)?;

    let bar = progress_bar(profiles.len(), quiet);
    let outcome = recommender
        .run_with_progress(&profiles, &catalog, |done, _| bar.set_position(done as u64))
        .await;
    bar.finish_and_clear();
    outcome
}

async fn recommend(args: RecommendArgs, verbose: bool, quiet: bool) -> Result<ResultsTable> {
    let settings = load_settings(&args)?;
    if !args.dry_run {
        settings.require_api_key()?;
    }

    let roster = read_input(args.students.as_deref(), SAMPLE_STUDENTS)?;
    let courses = read_input(args.courses.as_deref(), SAMPLE_COURSES)?;

    let outcome = if args.dry_run {
        info!("dry run, prompts are built but no model is called");
        let recommender = Recommender::new(ScriptedProvider::always(DRY_RUN_REPLY), settings.llm_settings())
            .with_verbose(verbose);
        run_batch(&recommender, &roster, &courses, quiet).await?
    } else {
        let recommender = Recommender::openai(&settings)?.with_verbose(verbose);
        run_batch(&recommender, &roster, &courses, quiet).await?
    };

    if !quiet {
        eprintln!(
            "Generated {} recommendations ({} model calls, {} tokens)",
            outcome.table.len(),
            outcome.usage.total_calls,
            outcome.usage.total_tokens()
        );
    }

    match &args.output {
        Some(path) => {
            outcome.table.write_csv(path)?;
            info!(path = %path.display(), rows = outcome.table.len(), "results written");
        }
        None if outcome.table.is_empty() => {
            eprintln!("No data to download. Please generate recommendations first.");
        }
        None => {}
    }

    Ok(outcome.table)
}

/// Run a subcommand and return what goes to stdout
async fn run(cli: Cli) -> Result<String> {
    let output = match cli.command {
        Commands::Recommend(args) => recommend(args, cli.verbose, cli.quiet).await?.render(),
        Commands::Sample { which } => match which {
            SampleKind::Students => SAMPLE_STUDENTS.to_string(),
            SampleKind::Courses => SAMPLE_COURSES.to_string(),
        },
        Commands::Show { file } => {
            let table = ResultsTable::read_csv(&file)?;
            debug!(path = %file.display(), rows = table.len(), "showing results");
            table.render()
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            debug!("{:?}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecraft_campaign::Recommendation;
    use coursecraft_error::ErrorKind;

    fn offline_args(dir: &Path) -> RecommendArgs {
        RecommendArgs {
            output: Some(dir.join("out.csv")),
            dry_run: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_recommend_flags() {
        let cli = Cli::try_parse_from([
            "coursecraft",
            "recommend",
            "--students",
            "roster.csv",
            "--temperature",
            "0.3",
            "--dry-run",
            "-q",
        ])
        .unwrap();

        assert!(cli.quiet);
        match cli.command {
            Commands::Recommend(args) => {
                assert_eq!(args.students, Some(PathBuf::from("roster.csv")));
                assert_eq!(args.temperature, Some(0.3));
                assert!(args.dry_run);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["coursecraft", "show", "x.csv", "-q", "-v"]).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_stops_before_reading_inputs() {
        let args = RecommendArgs {
            students: Some(PathBuf::from("/nonexistent/roster.csv")),
            ..Default::default()
        };
        let err = recommend(args, false, true).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    }

    #[tokio::test]
    async fn test_dry_run_writes_sample_results() {
        let dir = tempfile::tempdir().unwrap();
        let table = recommend(offline_args(dir.path()), false, true).await.unwrap();
        assert_eq!(table.len(), 2);

        let exported = ResultsTable::read_csv(&dir.path().join("out.csv")).unwrap();
        assert_eq!(exported, table);
        assert_eq!(exported.rows()[0].courses, DRY_RUN_REPLY);
        assert!(exported.rows()[1].description.contains("GPA: 3.5"));
    }

    #[tokio::test]
    async fn test_show_renders_exported_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let table: ResultsTable = vec![Recommendation {
            description: "Major: History\nGPA: 3.2".into(),
            courses: "1. Introduction to Psychology\n2. Biology".into(),
        }]
        .into_iter()
        .collect();
        table.write_csv(&path).unwrap();

        let cli = Cli::try_parse_from(["coursecraft", "show", path.to_str().unwrap()]).unwrap();
        let output = run(cli).await.unwrap();

        assert_eq!(output, table.render());
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].ends_with("Targeted Courses"));
        assert!(lines[2].starts_with("1 | Major: History"));
        assert!(lines[3].ends_with("| 2. Biology"));
    }

    #[tokio::test]
    async fn test_show_missing_file() {
        let cli = Cli::try_parse_from(["coursecraft", "show", "/nonexistent/results.csv"]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }

    #[tokio::test]
    async fn test_bad_roster_aborts_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("roster.csv");
        std::fs::write(&roster, "Name, Major\nAnn, Art\n").unwrap();

        let args = RecommendArgs {
            students: Some(roster),
            ..offline_args(dir.path())
        };
        let err = recommend(args, false, true).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingColumn);
        assert!(!dir.path().join("out.csv").exists());
    }
}
