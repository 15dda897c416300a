use clap::{Parser, Subcommand};
use malt_site::site::Site;
use malt_site::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

fn version_string() -> &'static str {
    if env!("MALT_RELEASE_TAG") == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("MALT_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "malt-site")]
#[command(about = "Build the MALT. static website")]
#[command(long_about = "\
Build the MALT. static website

Injects the JSON content under _data/ into index.html and writes the result,
together with the static assets, to _site/. Run with no arguments from the
site directory.

Source layout:

  ./
  ├── site.toml          # Optional layout overrides (see gen-config)
  ├── index.html         # Page template
  ├── style.css          # Copied to the output root
  ├── script.js
  ├── images/            # Copied recursively
  ├── admin/
  └── _data/
      ├── hero.json
      ├── about.json
      ├── contact.json
      ├── gallery.json
      └── events/        # One JSON file per event, sorted by \"order\"")]
#[command(version = version_string())]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory (overrides site.toml)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Build the site (the default)
    Build,
    /// Load content and check it against the template without writing
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let site = Site::open(&cli.source, cli.output.as_deref())?;
            let report = site.build()?;
            output::print_build_output(&report);
        }
        Command::Check => {
            let site = Site::open(&cli.source, cli.output.as_deref())?;
            println!("==> Checking {}", site.root().display());
            let summary = site.check()?;
            output::print_check_output(&summary);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
