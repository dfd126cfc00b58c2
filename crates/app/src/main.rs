use std::fmt;
use std::path::PathBuf;

use scorm_core::model::{CourseDraft, LessonStatus, MessagePayload, SurveyDomain};
use services::{Clock, PackageService, PackagerConfig, TrackingSimulation};
use storage::Storage;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_DEPTH: usize = 2;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidDepth { raw: String },
    InvalidDomain { raw: String },
    InvalidStatus { raw: String },
    EmptyOutDir,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDepth { raw } => write!(f, "invalid --depth value: {raw}"),
            ArgsError::InvalidDomain { raw } => write!(f, "invalid --domain value: {raw}"),
            ArgsError::InvalidStatus { raw } => write!(f, "invalid --status value: {raw}"),
            ArgsError::EmptyOutDir => write!(f, "--out must not be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  scorm-wrapper build    --url <survey_url> --title <title> --description <text>");
    eprintln!("                         [--identifier <id>] [--out <dir>] [--domain <domain>]");
    eprintln!("  scorm-wrapper simulate [--status <initial>] [--payload <json>] [--origin <origin>]");
    eprintln!("                         [--depth <n>] [--domain <domain>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --out .");
    eprintln!("  --domain typeform.com");
    eprintln!("  --depth {DEFAULT_DEPTH}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SCORM_OUT_DIR, SCORM_SURVEY_DOMAIN, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Build,
    Simulate,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "build" => Some(Self::Build),
            "simulate" => Some(Self::Simulate),
            _ => None,
        }
    }
}

struct BuildArgs {
    config: PackagerConfig,
    draft: CourseDraft,
}

struct SimulateArgs {
    survey_domain: SurveyDomain,
    depth: usize,
    status: Option<LessonStatus>,
    origin: Option<String>,
    payload: Option<String>,
}

fn parse_domain(raw: String) -> Result<SurveyDomain, ArgsError> {
    SurveyDomain::new(raw.clone()).map_err(|_| ArgsError::InvalidDomain { raw })
}

impl BuildArgs {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        mut config: PackagerConfig,
    ) -> Result<Self, ArgsError> {
        let mut survey_url = None;
        let mut title = None;
        let mut description = None;
        let mut identifier = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--url" => survey_url = Some(require_value(args, "--url")?),
                "--title" => title = Some(require_value(args, "--title")?),
                "--description" => description = Some(require_value(args, "--description")?),
                "--identifier" => identifier = Some(require_value(args, "--identifier")?),
                "--out" => {
                    let value = require_value(args, "--out")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::EmptyOutDir);
                    }
                    config.out_dir = PathBuf::from(value.trim());
                }
                "--domain" => {
                    config.survey_domain = parse_domain(require_value(args, "--domain")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let draft = CourseDraft {
            survey_url: survey_url.ok_or(ArgsError::MissingFlag { flag: "--url" })?,
            title: title.ok_or(ArgsError::MissingFlag { flag: "--title" })?,
            description: description.ok_or(ArgsError::MissingFlag {
                flag: "--description",
            })?,
            identifier,
        };
        Ok(Self { config, draft })
    }
}

impl SimulateArgs {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        config: PackagerConfig,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            survey_domain: config.survey_domain,
            depth: DEFAULT_DEPTH,
            status: None,
            origin: None,
            payload: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--status" => {
                    let value = require_value(args, "--status")?;
                    let status = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidStatus { raw: value.clone() })?;
                    parsed.status = Some(status);
                }
                "--origin" => parsed.origin = Some(require_value(args, "--origin")?),
                "--payload" => parsed.payload = Some(require_value(args, "--payload")?),
                "--depth" => {
                    let value = require_value(args, "--depth")?;
                    parsed.depth = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDepth { raw: value.clone() })?;
                }
                "--domain" => {
                    parsed.survey_domain = parse_domain(require_value(args, "--domain")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn build(args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let clock = Clock::default_clock();
    let storage = Storage::filesystem(&args.config.out_dir, clock);
    let service = PackageService::new(clock, storage.packages, args.config.survey_domain);

    let stored = service.generate(args.draft).await?;
    println!("{}", stored.location);
    Ok(())
}

fn simulate(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let default_origin = format!("https://form.{}", args.survey_domain);
    let mut simulation = TrackingSimulation::new(args.survey_domain, args.depth)?;
    if let Some(status) = args.status {
        simulation = simulation.with_initial_status(status.as_str());
    }
    if let Some(payload) = args.payload {
        let origin = args.origin.unwrap_or(default_origin);
        simulation = simulation.with_message(origin, MessagePayload::text(payload));
    }

    let report = simulation.run();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Err(ArgsError::MissingFlag { flag: "<command>" }.into());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            ArgsError::UnknownArg(first.clone())
        })?,
    };

    init_tracing();
    let config = PackagerConfig::from_env()?;
    debug!(
        command = ?cmd,
        out_dir = %config.out_dir.display(),
        domain = %config.survey_domain,
        "configuration loaded"
    );

    match cmd {
        Command::Build => {
            let args = BuildArgs::parse(&mut argv, config).map_err(|e| {
                print_usage();
                e
            })?;
            build(args).await
        }
        Command::Simulate => {
            let args = SimulateArgs::parse(&mut argv, config).map_err(|e| {
                print_usage();
                e
            })?;
            simulate(args)
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
