use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use testcase_gen_rs::{
    DEFAULT_SEED, GenerationOptions, Records, UniqueTokenGenerator, generate, generate_to_file,
    render, setup_logging,
};
use tracing::info;

/// Generates a test case document from candidate records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the test case, e.g. "SuspensePaymentMake"
    spec: String,

    /// Directory holding the candidate record files
    #[arg(long, env = "TESTCASE_DATA_DIR")]
    data_dir: PathBuf,

    /// Root of the suite directories the test case is written to
    #[arg(long, env = "TESTCASE_SUITES_DIR", required_unless_present = "stdout")]
    suites_dir: Option<PathBuf>,

    /// Print the document instead of writing it
    #[arg(long, default_value_t = false)]
    stdout: bool,

    /// Seed of the random selection
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Selection cutoff and reporting date (YYYY-MM-DDTHH:MM:SS), defaults to now
    #[arg(long, value_parser = parse_as_of)]
    as_of: Option<NaiveDateTime>,

    /// Number of the test case, used in its file name
    #[arg(long, default_value_t = 1)]
    number: u32,
}

impl Cli {
    fn options(&self) -> GenerationOptions {
        let options = match self.as_of {
            Some(as_of) => GenerationOptions::as_of(as_of),
            None => GenerationOptions::default(),
        };
        options.with_seed(self.seed).with_number(self.number)
    }
}

fn parse_as_of(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {e}"))
}

fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();

    let options = cli.options();
    let records = Records::from_dir(&cli.data_dir)
        .with_context(|| format!("loading records from {}", cli.data_dir.display()))?;
    let mut tokens = UniqueTokenGenerator::new();

    match &cli.suites_dir {
        Some(suites_dir) if !cli.stdout => {
            let path = generate_to_file(&cli.spec, &records, &mut tokens, &options, suites_dir)?;
            info!(spec = %cli.spec, path = %path.display(), "test case generated");
        }
        _ => {
            let document = generate(&cli.spec, &records, &mut tokens, &options)?;
            print!("{}", render(&document, options.generated_on));
        }
    }

    Ok(())
}
