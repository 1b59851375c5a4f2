mod loader;
mod reports;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use forage_game::{ForageConfig, ForageEngine, SessionContext, parse_form_int};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use loader::FsCatalogSource;
use util::{entropy_seed, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored, human-readable summary
    Console,
    /// Machine-readable result with seed
    Json,
    /// Markdown suitable for session notes
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "forage-cli", version)]
#[command(about = "Generate foraging results for tabletop sessions from an ingredient catalog")]
struct Args {
    /// Ingredient catalog (JSON array)
    #[arg(long, default_value = "data/ingredients.json")]
    ingredients: PathBuf,

    /// Tag catalog (JSON array of tag_id/tag_name/tag_category)
    #[arg(long, default_value = "data/tags.json")]
    tags: PathBuf,

    /// Environment searched, e.g. forest
    #[arg(long)]
    environment: Option<String>,

    /// Season of the search, e.g. spring
    #[arg(long)]
    season: Option<String>,

    /// Skill check result (whole number, at least 1)
    #[arg(long)]
    score: Option<String>,

    /// Hours spent searching (whole number, at least 1)
    #[arg(long)]
    hours: Option<String>,

    /// The skill check was a critical success
    #[arg(long)]
    critical: bool,

    /// The skill check was a critical failure (overrides --critical)
    #[arg(long)]
    critical_fail: bool,

    /// Selected tag ids (comma-separated)
    #[arg(long, default_value = "")]
    select: String,

    /// Seed for a reproducible result
    #[arg(long)]
    seed: Option<u64>,

    /// Optional JSON tuning override
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// List all available tags and exit
    #[arg(long)]
    list_tags: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.output.is_some() {
        colored::control::set_override(false);
    }

    let source = FsCatalogSource::new(&args.ingredients, &args.tags);
    let mut engine = ForageEngine::load(&source).context("failed to load catalogs")?;

    if args.list_tags {
        let mut output_target = OutputTarget::new(args.output.clone())?;
        reports::generate_tag_listing(&mut output_target, engine.tags())?;
        output_target.flush_inner()?;
        return Ok(());
    }

    if let Some(path) = &args.config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg = ForageConfig::from_json(&json)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        engine = engine.with_config(cfg).context("invalid tuning config")?;
    }

    let ctx = build_session(&args)?;
    warn_unknown_tags(&engine, &ctx);

    let seed = args.seed.unwrap_or_else(entropy_seed);
    log::info!("Forage seed {seed}");
    let result = engine.generate(&ctx, seed)?;

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => {
            reports::generate_json_report(&mut output_target, &result, engine.tags(), seed)?;
        }
        ReportFormat::Markdown => {
            reports::generate_markdown_report(&mut output_target, &result, engine.tags())?;
        }
        ReportFormat::Console => {
            reports::generate_console_report(
                &mut output_target,
                &result,
                engine.tags(),
                args.verbose,
            )?;
            if args.verbose {
                writeln!(&mut output_target, "\nSeed: {seed}")?;
            }
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

/// Validate form inputs the way the session sheet does before generating.
fn build_session(args: &Args) -> Result<SessionContext> {
    let Some(environment) = args.environment.as_deref() else {
        bail!("--environment is required");
    };
    let Some(season) = args.season.as_deref() else {
        bail!("--season is required");
    };
    let score = parse_form_int("score", args.score.as_deref().unwrap_or_default())?;
    let hours = parse_form_int("hours", args.hours.as_deref().unwrap_or_default())?;

    Ok(SessionContext::new(environment, season, score, hours)
        .with_tags(split_csv(&args.select))
        .with_critical_success(args.critical && !args.critical_fail)
        .with_critical_failure(args.critical_fail))
}

fn warn_unknown_tags(engine: &ForageEngine, ctx: &SessionContext) {
    for tag in &ctx.selected_tags {
        if !engine.tags().contains(tag) {
            log::warn!("Selected tag {tag:?} is not in the tag catalog");
        }
    }
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            ingredients: PathBuf::from("data/ingredients.json"),
            tags: PathBuf::from("data/tags.json"),
            environment: Some("forest".to_string()),
            season: Some("spring".to_string()),
            score: Some("12".to_string()),
            hours: Some("2".to_string()),
            critical: false,
            critical_fail: false,
            select: String::new(),
            seed: Some(7),
            config: None,
            report: ReportFormat::Json,
            output: None,
            list_tags: false,
            verbose: false,
        }
    }

    #[test]
    fn session_applies_boundary_rules() {
        let mut args = base_args();
        args.critical = true;
        args.critical_fail = true;
        args.select = "1, night".to_string();
        let ctx = build_session(&args).unwrap();
        assert!(!ctx.critical_success);
        assert!(ctx.critical_failure);
        assert_eq!(ctx.selected_tags.len(), 2);
        assert_eq!(ctx.score, 12);
    }

    #[test]
    fn session_rejects_bad_numbers() {
        let mut args = base_args();
        args.hours = Some("0".to_string());
        assert!(build_session(&args).is_err());
        let mut args = base_args();
        args.score = None;
        assert!(build_session(&args).is_err());
    }

    #[test]
    fn session_requires_environment() {
        let mut args = base_args();
        args.environment = None;
        let err = build_session(&args).unwrap_err();
        assert!(err.to_string().contains("--environment"));
    }

    #[test]
    fn args_parse_from_command_line() {
        let args = Args::try_parse_from([
            "forage-cli",
            "--environment",
            "cave",
            "--season",
            "winter",
            "--score",
            "9",
            "--hours",
            "3",
            "--report",
            "markdown",
            "--critical",
        ])
        .unwrap();
        assert_eq!(args.report, ReportFormat::Markdown);
        assert!(args.critical);
        assert_eq!(args.environment.as_deref(), Some("cave"));
    }
}
