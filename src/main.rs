use clap::{Parser, Subcommand};
use splitdoc::config::{self, Profile};
use splitdoc::materialize::Mode;
use splitdoc::output;
use splitdoc::split::SplitJob;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Flags shared by both split profiles.
#[derive(clap::Args, Clone)]
struct SplitArgs {
    /// Consolidated document to split (default depends on the profile)
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Output directory for the extracted tree (default depends on the profile)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Show what would be created without creating files (default)
    #[arg(long)]
    dry_run: bool,

    /// Actually create the files (overrides --dry-run)
    #[arg(long)]
    create: bool,

    /// Also write the parsed sections as JSON to this file
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
}

impl SplitArgs {
    fn mode(&self) -> Mode {
        if self.create { Mode::Write } else { Mode::Preview }
    }
}

#[derive(Parser)]
#[command(name = "splitdoc")]
#[command(about = "Split a consolidated document into individual project files")]
#[command(long_about = "\
Split a consolidated document into individual project files

Each file in the document is a header line naming its path, followed by a
fenced code block with the file's content:

  ## study-buddy/src/app.ts
  ```ts
  export const app = 1;
  ```

Runs are previews unless --create is given. Both modes print the planned
directory tree and flag empty, duplicate, and oversized files.

Run 'splitdoc gen-config' to generate a documented splitdoc.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./splitdoc.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log parser and writer diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split application sources (legacy skip-list and import rewriting)
    App(SplitArgs),
    /// Split test sources
    Tests {
        #[command(flatten)]
        args: SplitArgs,

        /// Header prefix marking file sections
        #[arg(long)]
        header_prefix: Option<String>,
    },
    /// Print a stock splitdoc.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (profile, args, header_prefix) = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return ExitCode::SUCCESS;
        }
        Command::App(args) => (Profile::App, args, None),
        Command::Tests {
            args,
            header_prefix,
        } => (Profile::Tests, args, header_prefix),
    };

    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let site = match config::load_config(cli.config.as_deref(), &working_dir) {
        Ok(site) => site,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let profile_config = site.profile(profile);

    let mut job = match SplitJob::from_profile(profile_config) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(input) = args.input_file.clone() {
        job = job.with_input(input);
    }
    if let Some(output_dir) = args.output_dir.clone() {
        job = job.with_output_dir(output_dir);
    }
    if let Some(prefix) = header_prefix {
        job = job.with_header_prefix(prefix);
    }
    let job = job.with_mode(args.mode()).with_manifest(args.manifest.clone());
    if let Err(e) = job.validate() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    if !job.input.exists() {
        eprintln!("Error: Input file '{}' not found!", job.input.display());
        return ExitCode::FAILURE;
    }

    tracing::debug!(
        profile = profile.name(),
        dry_run = args.dry_run,
        create = args.create,
        mode = ?job.mode,
        "starting split"
    );
    match job.run(output::print_line) {
        Ok(_) => ExitCode::SUCCESS,
        Err(failure) => {
            for line in output::format_failure(&failure.to_string(), failure.last_line) {
                eprintln!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Route diagnostics to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "splitdoc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
