//! `tcg` command-line interface

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tcg_core::{NormalizedRecord, PipelineConfig, PipelineError, RecordKind};
use tcg_dedup::analyze;
use tcg_invoker::GeminiClient;
use tcg_pipeline::{
    group_by_module, process_response, renumber, GenerationPipeline, GenerationRequest,
    PromptBuilder, DEFAULT_COUNT,
};
use tracing_subscriber::EnvFilter;

/// sysexits EX_TEMPFAIL
const EXIT_TEMPFAIL: u8 = 75;

fn kind_arg() -> Arg {
    Arg::new("kind")
        .long("kind")
        .default_value("test-case")
        .value_parser(RecordKind::from_str)
        .help("Record kind: test-case or scenario")
}

fn existing_arg() -> Arg {
    Arg::new("existing")
        .long("existing")
        .value_parser(value_parser!(PathBuf))
        .help("JSON array of records already stored")
}

fn cli() -> Command {
    Command::new("tcg")
        .version(tcg_pipeline::VERSION)
        .about("Generate, de-duplicate and analyze AI-written test cases")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("extract")
                .about("Extract, normalize and filter a saved model response (no network)")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .help("Model response file, or - for stdin"),
                )
                .arg(kind_arg())
                .arg(existing_arg()),
        )
        .subcommand(
            Command::new("generate")
                .about("Run the full pipeline against Gemini")
                .arg(
                    Arg::new("prompt")
                        .long("prompt")
                        .required(true)
                        .help("Prompt file, or - for stdin"),
                )
                .arg(kind_arg())
                .arg(existing_arg()),
        )
        .subcommand(
            Command::new("analyze")
                .about("Report coverage and near-duplicates in stored records")
                .arg(
                    Arg::new("records")
                        .long("records")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of records"),
                ),
        )
        .subcommand(
            Command::new("arrange")
                .about("Group records by module and submodule")
                .arg(
                    Arg::new("records")
                        .long("records")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of records"),
                )
                .arg(
                    Arg::new("renumber")
                        .long("renumber")
                        .value_name("PREFIX")
                        .help("Reassign ids PREFIX_1..n after grouping"),
                ),
        )
        .subcommand(
            Command::new("prompt")
                .about("Print a composed generation prompt")
                .arg(kind_arg())
                .arg(Arg::new("module").long("module").required(true))
                .arg(Arg::new("submodule").long("submodule"))
                .arg(Arg::new("summary").long("summary").required(true))
                .arg(Arg::new("criteria").long("criteria"))
                .arg(
                    Arg::new("count")
                        .long("count")
                        .default_value("5")
                        .value_parser(value_parser!(usize)),
                )
                .arg(existing_arg()),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<PipelineConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {source}"))
    }
}

fn load_records(path: &Path) -> Result<Vec<NormalizedRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading records {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing records {}", path.display()))
}

fn existing_records(args: &ArgMatches) -> Result<Vec<NormalizedRecord>> {
    args.get_one::<PathBuf>("existing")
        .map_or_else(|| Ok(Vec::new()), |path| load_records(path))
}

fn kind(args: &ArgMatches) -> RecordKind {
    args.get_one::<RecordKind>("kind")
        .copied()
        .unwrap_or(RecordKind::TestCase)
}

/// Global flags are propagated into the subcommand's matches
fn subcommand_args(matches: &ArgMatches) -> &ArgMatches {
    matches.subcommand().map_or(matches, |(_, args)| args)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(subcommand_args(matches))?;

    match matches.subcommand() {
        Some(("extract", args)) => {
            let raw = read_input(args.get_one::<String>("input").map_or("-", String::as_str))?;
            let existing = existing_records(args)?;
            let outcome = process_response(&raw, kind(args), &existing, &config);
            print_json(&outcome)
        }
        Some(("generate", args)) => {
            let prompt = read_input(args.get_one::<String>("prompt").map_or("-", String::as_str))?;
            let existing = existing_records(args)?;
            let client = GeminiClient::from_env(&config.gemini)?;
            let pipeline = GenerationPipeline::new(client, config)?;
            let outcome = pipeline
                .generate(&GenerationRequest::new(kind(args), prompt), &existing)
                .await?;
            print_json(&outcome)
        }
        Some(("analyze", args)) => {
            let path = args
                .get_one::<PathBuf>("records")
                .context("--records is required")?;
            print_json(&analyze(&load_records(path)?, &config))
        }
        Some(("arrange", args)) => {
            let path = args
                .get_one::<PathBuf>("records")
                .context("--records is required")?;
            let grouped = group_by_module(&load_records(path)?);
            match args.get_one::<String>("renumber") {
                Some(prefix) => print_json(&renumber(&grouped, prefix)),
                None => print_json(&grouped),
            }
        }
        Some(("prompt", args)) => {
            let mut builder = PromptBuilder::new(kind(args))
                .module(args.get_one::<String>("module").cloned().unwrap_or_default())
                .summary(args.get_one::<String>("summary").cloned().unwrap_or_default())
                .count(args.get_one::<usize>("count").copied().unwrap_or(DEFAULT_COUNT))
                .existing(&existing_records(args)?);
            if let Some(submodule) = args.get_one::<String>("submodule") {
                builder = builder.submodule(submodule);
            }
            if let Some(criteria) = args.get_one::<String>("criteria") {
                builder = builder.acceptance_criteria(criteria);
            }
            print!("{}", builder.build());
            Ok(())
        }
        _ => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(subcommand_args(&matches).get_flag("log-json"));

    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(retry_after) = err
                .downcast_ref::<PipelineError>()
                .filter(|e| e.is_retry_later())
                .and_then(|e| match e {
                    PipelineError::Invoke(invoke) => invoke.retry_after(),
                    PipelineError::Config(_) => None,
                })
            {
                eprintln!("error: {err}");
                eprintln!("retry after: {}s", retry_after.as_secs().max(1));
                return ExitCode::from(EXIT_TEMPFAIL);
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
