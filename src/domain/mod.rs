//! Module for the types defining the test-case domain: the candidate records read from the
//! data source, the payment history shared between tables, and the document specification.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

mod payment;
mod spec;

#[cfg(test)]
mod tests;

pub use payment::{Payment, PaymentHistory};
pub use spec::{DocumentSpec, TableSpec};

pub(crate) type Money = Decimal;

/// Status of a policy period as displayed on a given reporting date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus {
    Unbound,
    InForce,
    Cancelled,
    Expired,
    Scheduled,
}

/// A policy period candidate, together with the account and billing data joined to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyPeriod {
    pub account_number: String,
    pub policy_number: String,
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub cancellation_date: Option<NaiveDateTime>,
    pub status: String,
    pub premium: Money,
    pub taxes: Money,
    pub billing_id: String,
    pub payment_plan: String,
    pub create_time: NaiveDateTime,
}

impl PolicyPeriod {
    /// The total amount invoiced to the policy holder.
    pub fn total_invoiced_amount(&self) -> Money {
        self.premium + self.taxes
    }

    /// True if `date` falls inside `[period_start, period_end)`.
    pub fn is_in_effect(&self, date: NaiveDateTime) -> bool {
        self.period_start <= date && date < self.period_end
    }

    /// The status adjusted for the reporting date and the cancellation, effective and expiration dates.
    pub fn display_status(&self, reporting_date: NaiveDateTime) -> PolicyStatus {
        if self.status != "Bound" {
            PolicyStatus::Unbound
        } else if self.cancellation_date.is_some() {
            PolicyStatus::Cancelled
        } else if self.period_start > reporting_date {
            PolicyStatus::Scheduled
        } else if self.period_end <= reporting_date {
            PolicyStatus::Expired
        } else {
            PolicyStatus::InForce
        }
    }
}

/// An account candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_number: String,
    pub create_time: NaiveDateTime,
}

/// A producer code eligible for commission payments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerCode {
    pub code: String,
}

/// A payment plan a policy can be moved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPlan {
    pub billing_id: String,
    pub name: String,
}
