use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use intake::config::DEFAULT_CONFIG_FILE;
use intake::{Config, Cue, Intake, Silent};
use intake_partkeepr::{PartKeeprClient, Reconciler};
use intake_tme::TmeClient;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Load TME barcode scans into PartKeepr", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,

    /// Read scans from a file instead of stdin
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    input: Option<PathBuf>,

    /// Do not play the scan cue
    #[arg(long = "no-cue")]
    no_cue: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug, RUST_LOG overrides both
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let config = Config::load(&cli.config)?;
    let template = config.part_template()?;

    let catalog = TmeClient::new(config.tme.clone()).context("Failed to create TME client")?;
    let inventory = PartKeeprClient::new(config.partkeepr.clone())
        .context("Failed to create PartKeepr client")?;
    let cue: Box<dyn Cue> = if cli.no_cue {
        Box::new(Silent)
    } else {
        config.cue.build()
    };

    let intake = Intake::new(catalog, Reconciler::new(inventory, template), cue);
    let mut stdout = io::stdout().lock();

    let booked = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            intake.run(BufReader::new(file), &mut stdout)?
        }
        None => intake.run(io::stdin().lock(), &mut stdout)?,
    };
    log::info!("{booked} part(s) booked");

    Ok(())
}
