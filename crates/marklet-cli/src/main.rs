use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use marklet::assist::{GenerationRequest, ProviderKind};
use marklet::sandbox::{build_document, iframe_markup};
use marklet::{generate, validate, IssueLevel, MarkletConfig};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn source_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Bookmarklet source file, or - for stdin")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn max_chars_arg() -> Arg {
    Arg::new("max-chars")
        .long("max-chars")
        .value_parser(value_parser!(usize))
        .help("Override the configured guard limit")
}

fn cli() -> Command {
    Command::new("marklet")
        .version(marklet::VERSION)
        .about("Validate, build and preview bookmarklets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a marklet TOML config"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("check")
                .about("Report validation issues")
                .arg(source_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("build")
                .about("Build the javascript: link")
                .arg(source_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("preview")
                .about("Write the sandboxed preview document")
                .arg(source_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write to a file instead of stdout"),
                )
                .arg(
                    Arg::new("iframe")
                        .long("iframe")
                        .action(ArgAction::SetTrue)
                        .help("Wrap the document in a sandboxed iframe element"),
                ),
        )
        .subcommand(
            Command::new("guard")
                .about("Run generated code through the guardrail gate")
                .arg(source_arg())
                .arg(max_chars_arg()),
        )
        .subcommand(
            Command::new("assist")
                .about("Ask the configured provider for code or an explanation")
                .arg(
                    Arg::new("prompt")
                        .required_unless_present("explain")
                        .help("What the bookmarklet should do"),
                )
                .arg(
                    Arg::new("explain")
                        .long("explain")
                        .value_parser(value_parser!(PathBuf))
                        .conflicts_with("prompt")
                        .help("Explain this source file instead"),
                )
                .arg(
                    Arg::new("provider")
                        .long("provider")
                        .value_parser(["none", "mock"])
                        .help("Override the configured provider"),
                )
                .arg(max_chars_arg()),
        )
}

fn init_tracing(verbose: u8, json: bool) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("reading stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_config(matches: &ArgMatches) -> Result<MarkletConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => MarkletConfig::load(path).context("loading config"),
        None => Ok(MarkletConfig::default()),
    }
}

fn file_arg(args: &ArgMatches) -> Result<&PathBuf> {
    args.get_one::<PathBuf>("file")
        .context("missing source file argument")
}

fn check(args: &ArgMatches) -> Result<ExitCode> {
    let source = read_source(file_arg(args)?)?;
    let issues = validate(&source);
    let has_error = issues.iter().any(|issue| issue.level == IssueLevel::Error);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("No issues.");
    } else {
        for issue in &issues {
            println!(
                "{:>7} {}..{}  {}",
                issue.level.as_str(),
                issue.index,
                issue.index + issue.length,
                issue.message
            );
        }
    }
    Ok(if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn build(args: &ArgMatches) -> Result<ExitCode> {
    let source = read_source(file_arg(args)?)?;
    let errors: Vec<_> = validate(&source)
        .into_iter()
        .filter(|issue| issue.is_error())
        .collect();
    if let Some(first) = errors.first() {
        bail!("{} error(s); first: {}", errors.len(), first.message);
    }

    let result = generate(&source);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.bookmarklet);
        for warning in &result.warnings {
            eprintln!("warning: {warning}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn preview(args: &ArgMatches) -> Result<ExitCode> {
    let source = read_source(file_arg(args)?)?;
    let document = build_document(&source);
    let output = if args.get_flag("iframe") {
        iframe_markup(&document)
    } else {
        document
    };

    match args.get_one::<PathBuf>("out") {
        Some(path) => {
            std::fs::write(path, output).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "preview written");
        }
        None => println!("{output}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn guard(args: &ArgMatches, config: &MarkletConfig) -> Result<ExitCode> {
    let candidate = read_source(file_arg(args)?)?;
    let limit = args.get_one::<usize>("max-chars").copied();
    let response = config.gate().check_with_limit(&candidate, limit);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.is_blocked() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn assist(args: &ArgMatches, mut config: MarkletConfig) -> Result<ExitCode> {
    match args.get_one::<String>("provider").map(String::as_str) {
        Some("mock") => config.assist.provider = ProviderKind::Mock,
        Some("none") => config.assist.provider = ProviderKind::None,
        _ => {}
    }

    let mut request = match args.get_one::<PathBuf>("explain") {
        Some(path) => GenerationRequest::explain(read_source(path)?),
        None => GenerationRequest::generate(
            args.get_one::<String>("prompt")
                .cloned()
                .unwrap_or_default(),
        ),
    };
    if let Some(max_chars) = args.get_one::<usize>("max-chars") {
        request = request.with_max_chars(*max_chars);
    }

    let response = config.assistant().request(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.is_blocked() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"), matches.get_flag("log-json"));
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("check", args)) => check(args),
        Some(("build", args)) => build(args),
        Some(("preview", args)) => preview(args),
        Some(("guard", args)) => guard(args, &config),
        Some(("assist", args)) => assist(args, config).await,
        Some((other, _)) => bail!("unknown command: {other}"),
        None => Ok(ExitCode::SUCCESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_guard_limit() {
        let matches = cli()
            .try_get_matches_from(["marklet", "guard", "out.js", "--max-chars", "120"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<usize>("max-chars"), Some(&120));
    }

    #[test]
    fn assist_needs_prompt_or_source() {
        assert!(cli().try_get_matches_from(["marklet", "assist"]).is_err());
        assert!(cli()
            .try_get_matches_from(["marklet", "assist", "--explain", "a.js"])
            .is_ok());
    }
}
