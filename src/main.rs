use anyhow::{Context, Result};
use clap::{Args, Command, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Generator, Shell};
use clap_verbosity_flag::Verbosity;
use console::style;
use gitlab_logging::settings::Settings;
use gitlab_logging::{report, ErrorReport, ReportOptions, StructuredReport};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_log::AsTrace;

#[derive(Debug, Parser)]
#[command(name = "gitlab-logging", author, version, about, long_about = None)] // Read from `Cargo.toml`
struct Cli {
    // If provided, outputs the completion file for given shell
    #[arg(long = "generate", value_enum)]
    generator: Option<Shell>,
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: Overrides,
    #[command(flatten)]
    verbose: Verbosity,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args)]
struct Overrides {
    #[arg(long, global = true)]
    project_id: Option<String>,
    #[arg(long, global = true)]
    assignee_id: Option<u64>,
    #[arg(long, global = true)]
    environment: Option<String>,
}

impl Overrides {
    fn apply(self, options: &mut ReportOptions) {
        if let Some(project_id) = self.project_id {
            options.project_id = project_id;
        }
        if self.assignee_id.is_some() {
            options.assignee_id = self.assignee_id;
        }
        if let Some(environment) = self.environment {
            options.environment = environment;
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Report a raw stack trace read from a file or stdin.
    #[command()]
    Raw {
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// print the issue instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Report an error with its url, stack trace and variables.
    #[command()]
    Structured {
        #[arg(short, long)]
        message: String,
        #[arg(short, long)]
        url: String,
        /// stdin is used when omitted
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        stacktrace_file: Option<PathBuf>,
        /// JSON object, one issue section per key
        #[arg(long)]
        vars: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("Cannot read {}", p.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Cannot read stdin")?;
            Ok(buf)
        }
    }
}

fn print_preview(error_report: &ErrorReport, options: &ReportOptions) -> Result<()> {
    let checksum = error_report.checksum();
    let issue = error_report.to_issue_data(&checksum, options)?;

    println!("{} {}", style("checksum").dim(), checksum);
    println!("{}\n", style(&issue.title).bold().red());
    println!("{}", issue.description);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbose.log_level_filter().as_trace())
        .init();

    if let Some(generator) = cli.generator {
        let mut cmd = Cli::command();
        eprintln!("Generating completion file for {generator:?}...");
        print_completions(generator, &mut cmd);

        return Ok(());
    } else if let Some(command) = cli.command {
        let mut config = Settings::new(cli.config.as_deref())?;
        cli.overrides.apply(&mut config.report);

        let (error_report, dry_run) = match command {
            Commands::Raw { file, dry_run } => {
                let raw = read_input(file.as_deref())?;

                (ErrorReport::Raw(raw.trim_end().to_owned()), dry_run)
            }

            Commands::Structured {
                message,
                url,
                stacktrace_file,
                vars,
                dry_run,
            } => {
                let stacktrace = read_input(stacktrace_file.as_deref())?;
                let vars = vars
                    .map(|v| serde_json::from_str(&v).context("--vars must be a JSON object"))
                    .transpose()?;

                let params = StructuredReport {
                    message,
                    url,
                    stacktrace: stacktrace.trim_end().to_owned(),
                    vars,
                };

                (ErrorReport::Structured(params), dry_run)
            }
        };

        if dry_run {
            print_preview(&error_report, &config.report)?;
        } else {
            let gitlab = config
                .gitlab
                .as_ref()
                .context("No `gitlab.client` section in the configuration")?;
            let gitlab_client = gitlab_logging::gitlab::Client::new(gitlab)?;

            report(&gitlab_client, &error_report, &config.report).await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_replace_loaded_options() {
        let cli = Cli::parse_from([
            "gitlab-logging",
            "--environment",
            "staging",
            "--assignee-id",
            "3",
            "raw",
            "--dry-run",
        ]);
        let mut options = ReportOptions::new("42", "production");

        cli.overrides.apply(&mut options);

        assert_eq!(options.environment, "staging");
        assert_eq!(options.assignee_id, Some(3));
        assert_eq!(options.project_id, "42");
    }
}
