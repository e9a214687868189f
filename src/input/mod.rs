//! Module defining the data source the tables draw their candidate records from, and the parsing
//! logic used to load those records from CSV files into validated domain types.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::domain::{Account, PaymentPlan, PolicyPeriod, ProducerCode};
use crate::error::{Error, data_source_error, precondition_error};


pub const POLICY_PERIODS_FILE: &str = "policy_periods.csv";
pub const ACCOUNTS_FILE: &str = "accounts.csv";
pub const PRODUCER_CODES_FILE: &str = "producer_codes.csv";
pub const PAYMENT_PLANS_FILE: &str = "payment_plans.csv";

/// Read-only, ordered source of candidate records
pub trait DataSource {
    /// At most `limit` policy periods created before `selection_end`, most recent first
    fn policy_periods(
        &self,
        selection_end: NaiveDateTime,
        limit: usize,
    ) -> Result<Vec<PolicyPeriod>, Error>;

    /// Accounts created in `[selection_start, selection_end)`, in creation order
    fn accounts(
        &self,
        selection_start: NaiveDateTime,
        selection_end: NaiveDateTime,
    ) -> Result<Vec<Account>, Error>;

    fn producer_codes(&self) -> Result<Vec<ProducerCode>, Error>;

    /// The payment plans other than the one identified by `billing_id`
    fn payment_plans_excluding(&self, billing_id: &str) -> Result<Vec<PaymentPlan>, Error>;
}

/// In-memory candidate records, answering the queries of [`DataSource`]
#[derive(Debug, Clone, Default)]
pub struct Records {
    pub policy_periods: Vec<PolicyPeriod>,
    pub accounts: Vec<Account>,
    pub producer_codes: Vec<ProducerCode>,
    pub payment_plans: Vec<PaymentPlan>,
}

impl Records {
    /// Loads the record files found in `dir`. A missing file yields no records of that kind.
    pub fn from_dir(dir: &Path) -> Result<Self, Error> {
        if !dir.is_dir() {
            return Err(data_source_error(
                dir.display().to_string(),
                "not a directory",
            ));
        }

        let records = Self {
            policy_periods: load_file(&dir.join(POLICY_PERIODS_FILE), parse_policy_periods)?,
            accounts: load_file(&dir.join(ACCOUNTS_FILE), parse_accounts)?,
            producer_codes: load_file(&dir.join(PRODUCER_CODES_FILE), parse_producer_codes)?,
            payment_plans: load_file(&dir.join(PAYMENT_PLANS_FILE), parse_payment_plans)?,
        };
        info!(
            dir = %dir.display(),
            policy_periods = records.policy_periods.len(),
            accounts = records.accounts.len(),
            producer_codes = records.producer_codes.len(),
            payment_plans = records.payment_plans.len(),
            "loaded candidate records"
        );
        Ok(records)
    }
}

impl DataSource for Records {
    fn policy_periods(
        &self,
        selection_end: NaiveDateTime,
        limit: usize,
    ) -> Result<Vec<PolicyPeriod>, Error> {
        let mut selected: Vec<&PolicyPeriod> = self
            .policy_periods
            .iter()
            .filter(|p| p.create_time < selection_end)
            .collect();
        selected.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        Ok(selected.into_iter().take(limit).cloned().collect())
    }

    fn accounts(
        &self,
        selection_start: NaiveDateTime,
        selection_end: NaiveDateTime,
    ) -> Result<Vec<Account>, Error> {
        if selection_start >= selection_end {
            return Err(precondition_error(format!(
                "selection start {selection_start} must be before selection end {selection_end}"
            )));
        }
        let mut selected: Vec<&Account> = self
            .accounts
            .iter()
            .filter(|a| selection_start <= a.create_time && a.create_time < selection_end)
            .collect();
        selected.sort_by_key(|a| a.create_time);
        Ok(selected.into_iter().cloned().collect())
    }

    fn producer_codes(&self) -> Result<Vec<ProducerCode>, Error> {
        Ok(self.producer_codes.clone())
    }

    fn payment_plans_excluding(&self, billing_id: &str) -> Result<Vec<PaymentPlan>, Error> {
        Ok(self
            .payment_plans
            .iter()
            .filter(|plan| plan.billing_id != billing_id)
            .cloned()
            .collect())
    }
}

fn load_file<T>(
    path: &Path,
    parse: impl FnOnce(std::fs::File) -> Result<Vec<T>, Error>,
) -> Result<Vec<T>, Error> {
    if !path.exists() {
        debug!(path = %path.display(), "record file absent");
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path)
        .map_err(|e| data_source_error(path.display().to_string(), e.to_string()))?;
    parse(file)
}

fn read_rows<R: DeserializeOwned>(reader: impl Read) -> impl Iterator<Item = Result<R, Error>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<R>()
        .map(|result| result.map_err(Error::from))
}

/// Parses policy periods, rejecting the whole input on the first malformed row
pub(crate) fn parse_policy_periods(reader: impl Read) -> Result<Vec<PolicyPeriod>, Error> {
    read_rows::<RawPolicyPeriod>(reader)
        .map(|result| PolicyPeriod::try_from(result?))
        .collect()
}

pub(crate) fn parse_accounts(reader: impl Read) -> Result<Vec<Account>, Error> {
    read_rows::<RawAccount>(reader)
        .map(|result| {
            let raw = result?;
            Ok(Account {
                account_number: required(ACCOUNTS_FILE, "account_number", raw.account_number)?,
                create_time: raw.create_time,
            })
        })
        .collect()
}

pub(crate) fn parse_producer_codes(reader: impl Read) -> Result<Vec<ProducerCode>, Error> {
    read_rows::<RawProducerCode>(reader)
        .map(|result| {
            let raw = result?;
            Ok(ProducerCode {
                code: required(PRODUCER_CODES_FILE, "producer_code", raw.producer_code)?,
            })
        })
        .collect()
}

pub(crate) fn parse_payment_plans(reader: impl Read) -> Result<Vec<PaymentPlan>, Error> {
    read_rows::<RawPaymentPlan>(reader)
        .map(|result| {
            let raw = result?;
            Ok(PaymentPlan {
                billing_id: required(PAYMENT_PLANS_FILE, "billing_id", raw.billing_id)?,
                name: raw.name,
            })
        })
        .collect()
}

fn required(file: &str, column: &str, value: String) -> Result<String, Error> {
    if value.is_empty() {
        Err(data_source_error(file, format!("empty {column}")))
    } else {
        Ok(value)
    }
}

// Intermediate types mirroring the CSV columns
#[derive(Deserialize)]
struct RawPolicyPeriod {
    account_number: String,
    policy_number: String,
    period_start: NaiveDateTime,
    period_end: NaiveDateTime,
    cancellation_date: Option<NaiveDateTime>,
    status: String,
    #[serde(with = "rust_decimal::serde::str")]
    premium: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    taxes: Decimal,
    billing_id: String,
    payment_plan: String,
    create_time: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawAccount {
    account_number: String,
    create_time: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawProducerCode {
    producer_code: String,
}

#[derive(Deserialize)]
struct RawPaymentPlan {
    billing_id: String,
    name: String,
}

impl TryFrom<RawPolicyPeriod> for PolicyPeriod {
    type Error = crate::error::Error;

    fn try_from(raw: RawPolicyPeriod) -> Result<Self, Self::Error> {
        let RawPolicyPeriod {
            account_number,
            policy_number,
            period_start,
            period_end,
            cancellation_date,
            status,
            premium,
            taxes,
            billing_id,
            payment_plan,
            create_time,
        } = raw;

        let account_number = required(POLICY_PERIODS_FILE, "account_number", account_number)?;
        let policy_number = required(POLICY_PERIODS_FILE, "policy_number", policy_number)?;
        if period_start >= period_end {
            return Err(data_source_error(
                POLICY_PERIODS_FILE,
                format!("policy {policy_number}: period start {period_start} is not before period end {period_end}"),
            ));
        }
        if premium < Decimal::ZERO || taxes < Decimal::ZERO {
            return Err(data_source_error(
                POLICY_PERIODS_FILE,
                format!("policy {policy_number}: premium and taxes must not be negative"),
            ));
        }

        Ok(PolicyPeriod {
            account_number,
            policy_number,
            period_start,
            period_end,
            cancellation_date,
            status,
            premium,
            taxes,
            billing_id,
            payment_plan,
            create_time,
        })
    }
}
