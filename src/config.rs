//! Module defining the options controlling one generation run

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::random::DEFAULT_SEED;

/// Parameters of one document generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Seed of the selector shared by all tables of the document
    pub seed: u64,
    /// Candidate records must have been created before this moment. It is also the reporting
    /// date against which policy periods are checked.
    pub selection_end: NaiveDateTime,
    /// Date printed in the document metadata
    pub generated_on: NaiveDate,
    /// Number of the test case, used in its file name
    pub number: u32,
}

impl GenerationOptions {
    /// Options for a run as of `selection_end`, with the default seed
    pub fn as_of(selection_end: NaiveDateTime) -> Self {
        Self {
            seed: DEFAULT_SEED,
            selection_end,
            generated_on: selection_end.date(),
            number: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::as_of(Local::now().naive_local())
    }
}
