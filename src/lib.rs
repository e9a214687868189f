mod config;
mod domain;
mod engine;
mod error;
mod input;
mod output;
mod random;
mod telemetry;
mod token;

use std::path::{Path, PathBuf};

pub use config::GenerationOptions;
pub use domain::{
    Account, DocumentSpec, Payment, PaymentHistory, PaymentPlan, PolicyPeriod, PolicyStatus,
    ProducerCode, TableSpec,
};
pub use engine::{Phase, SpecKind, TableKind, build_document};
pub use error::Error;
pub use input::{
    ACCOUNTS_FILE, DataSource, PAYMENT_PLANS_FILE, POLICY_PERIODS_FILE, PRODUCER_CODES_FILE,
    Records,
};
pub use output::{
    Element, FileBuilder, Node, build_document as build_tree, prepare_output_directory, render,
    serialize,
};
pub use random::{DEFAULT_SEED, RandomSelector};
pub use telemetry::setup_logging;
pub use token::{
    Clock, SystemClock, TOKEN_INTERVAL, TOKEN_WIDTH, TokenSource, UniqueTokenGenerator,
    decode_base32, int_to_str,
};

/// Generates the test case named `spec_name` from the candidate records of `source`.
///
/// This is the main entry point of the crate. The name selects the document kind and its ordered
/// pipeline of tables (see [`SpecKind`]). All tables share one selector seeded with
/// `options.seed` and one payment history, so the same seed, records and tokens always yield
/// the same document.
///
/// # Errors
///
/// Fails with [`Error::UnsupportedSpec`] for an unknown name. Any failure while generating a
/// table aborts the whole document.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use testcase_gen_rs::{GenerationOptions, Records, UniqueTokenGenerator, generate, render};
///
/// let records = Records::from_dir(Path::new("data")).unwrap();
/// let options = GenerationOptions::default();
/// let document = generate(
///     "SuspensePaymentMake",
///     &records,
///     &mut UniqueTokenGenerator::new(),
///     &options,
/// )
/// .unwrap();
/// println!("{}", render(&document, options.generated_on));
/// ```
pub fn generate(
    spec_name: &str,
    source: &dyn DataSource,
    tokens: &mut dyn TokenSource,
    options: &GenerationOptions,
) -> Result<DocumentSpec, Error> {
    let kind: SpecKind = spec_name.parse()?;
    build_document(kind, source, tokens, options)
}

/// Generates the test case named `spec_name` and writes it below `suites_root`.
///
/// The suite directory `<suites_root>/<application>/<project>/<suite>` must already exist.
/// Nothing is written when generation fails. Returns the path of the written file.
pub fn generate_to_file(
    spec_name: &str,
    source: &dyn DataSource,
    tokens: &mut dyn TokenSource,
    options: &GenerationOptions,
    suites_root: &Path,
) -> Result<PathBuf, Error> {
    let file_builder = FileBuilder::new(suites_root, options.number)?;
    let document = generate(spec_name, source, tokens, options)?;
    prepare_output_directory(suites_root, &document)?;
    file_builder.write(&document, options.generated_on)
}
