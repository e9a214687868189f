//! Module for the core logic of the engine: the table kinds, the generation of their rows,
//! and the ordered pipelines that assemble them into documents

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use crate::{
    Error,
    domain::{PaymentHistory, TableSpec},
    error::precondition_error,
    input::DataSource,
    random::RandomSelector,
    token::TokenSource,
};

mod catalog;
mod logic;


pub use catalog::{Phase, SpecKind, build_document};

const FIXTURE_PACKAGE: &str = "castlebay.gfit.billingcenter";

/// Counter value of the first row of every table
const TEST_ID_START: u32 = 10;

/// How far back the account check looks for newly created accounts
const ACCOUNT_CHECK_WINDOW_DAYS: i64 = 2;

/// The collaborators and state shared by every table of one document
pub(crate) struct GenerationContext<'a> {
    pub(crate) source: &'a dyn DataSource,
    pub(crate) tokens: &'a mut dyn TokenSource,
    pub(crate) random: RandomSelector,
    pub(crate) history: PaymentHistory,
    pub(crate) selection_end: NaiveDateTime,
}

/// One kind of fixture table. Each kind has a fixed schema and its own row-generation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    AccountCheck,
    InvoiceCheck,
    SuspensePaymentMake,
    SuspensePaymentApply,
    SuspensePaymentReverse,
    AccountPaymentMake,
    AccountPaymentReverse,
    AccountDisbursement,
    PolicyPaymentMake,
    PaymentWriteOff,
    WriteOffMake,
    AdvancedCommission,
    PaymentPlanChange,
    CollateralRequirement,
}

impl TableKind {
    /// The empty table with this kind's heading, fixture, columns and test-id prefix
    pub fn schema(self) -> Result<TableSpec, String> {
        let (heading, fixture, columns, prefix): (&str, &str, &[&str], &str) = match self {
            TableKind::AccountCheck => (
                "Check that accounts exist",
                "AccountCheckFixture",
                &["TestId", "Account Number", "Comment"],
                "ACCT-CHECK-",
            ),
            TableKind::InvoiceCheck => (
                "Check that invoices exist",
                "InvoiceCheckFixture",
                &["TestId", "Account Number", "Policy Number", "BillingID()", "Comment"],
                "INVOICE-CHECK-",
            ),
            TableKind::SuspensePaymentMake => (
                "Create suspense payments",
                "SuspensePaymentMakeFixture",
                &["TestId", "RefNumber", "Account Number", "Payment Amount", "Comment"],
                "SUSPENSE-PAYMENT-",
            ),
            TableKind::SuspensePaymentApply => (
                "Apply suspense payments",
                "SuspensePaymentModifyFixture",
                &["TestId", "RefNumber", "Account Number", "Apply()", "Comment"],
                "SUSPENSE-APPLY-",
            ),
            TableKind::SuspensePaymentReverse => (
                "Reverse suspense payments",
                "SuspensePaymentModifyFixture",
                &["TestId", "RefNumber", "Reverse()", "Comment"],
                "SUSPENSE-REVERSE-",
            ),
            TableKind::AccountPaymentMake => (
                "Create account direct payments",
                "AccountPaymentMakeFixture",
                &["TestId", "Account Number", "RefNumber", "Payment Amount", "Comment"],
                "ACCOUNT-PAYMENT-",
            ),
            TableKind::AccountPaymentReverse => (
                "Reverse account payments",
                "PaymentModifyFixture",
                &["TestId", "RefNumber", "Reverse()", "Comment"],
                "PAYMENT-REVERSE-",
            ),
            TableKind::AccountDisbursement => (
                "Create account disbursements",
                "DisbursementMakeFixture",
                &[
                    "TestId",
                    "RefNumber",
                    "Account Number",
                    "Payment Amount",
                    "Reason",
                    "Send",
                    "Valid()",
                    "Comment",
                ],
                "ACCOUNT-DISBURSEMENT-",
            ),
            TableKind::PolicyPaymentMake => (
                "Create direct policy payments",
                "PaymentMakeFixture",
                &[
                    "TestId",
                    "Account Number",
                    "Policy Number",
                    "RefNumber",
                    "Payment Amount",
                    "Comment",
                ],
                "POLICY-PAYMENT-",
            ),
            TableKind::PaymentWriteOff | TableKind::WriteOffMake => (
                "Create write-offs",
                "WriteOffMakeFixture",
                &[
                    "TestId",
                    "WriteoffType",
                    "Account Number",
                    "Policy Number",
                    "Amount",
                    "Reason",
                    "Valid()",
                    "Comment",
                ],
                "WRITE-OFF-",
            ),
            TableKind::AdvancedCommission => (
                "Create advanced commission payments",
                "AdvanceCommissionPaymentFixture",
                &[
                    "TestId",
                    "ProducerCode",
                    "PublicID",
                    "Payment Amount",
                    "Valid()",
                    "Comment",
                ],
                "ADVANCED-COMMISSION-",
            ),
            TableKind::PaymentPlanChange => (
                "Change payment plans",
                "PaymentPlanChangeFixture",
                &[
                    "TestId",
                    "Account Number",
                    "Policy Number",
                    "PaymentPlanID",
                    "Valid()",
                    "Comment",
                ],
                "PAYMENT-PLAN-CHANGE-",
            ),
            TableKind::CollateralRequirement => (
                "Create collateral requirement",
                "CollateralRequirementCreateFixture",
                &[
                    "TestId",
                    "Account Number",
                    "Requirement Name",
                    "Requirement Amount",
                    "Requirement Type",
                    "Effective Date",
                    "Expiration Date",
                    "Valid()",
                    "Comment",
                ],
                "COLL-REQ-",
            ),
        };

        // Requirement names must be unique in the target system. The runner appends a suffix
        // to highlighted cells.
        let highlight: Vec<bool> = match self {
            TableKind::CollateralRequirement => (0..columns.len()).map(|i| i == 2).collect(),
            _ => vec![false; columns.len()],
        };

        Ok(
            TableSpec::new(heading, format!("{FIXTURE_PACKAGE}.{fixture}"), columns, &highlight)?
                .with_test_ids(prefix, TEST_ID_START),
        )
    }

    /// Number of candidate policy periods requested from the data source
    fn candidate_limit(self) -> usize {
        match self {
            TableKind::InvoiceCheck => 10,
            TableKind::AccountPaymentMake => 30,
            TableKind::CollateralRequirement => 1,
            _ => 20,
        }
    }
}

/// Queries the candidates of `kind`, generates its rows and applies their effect on the payment
/// history
pub(crate) fn generate_table(
    kind: TableKind,
    ctx: &mut GenerationContext<'_>,
) -> Result<TableSpec, Error> {
    let mut table = kind.schema().map_err(precondition_error)?;
    let selection_end = ctx.selection_end;

    let outcome = match kind {
        TableKind::AccountCheck => {
            let start = selection_end - Duration::days(ACCOUNT_CHECK_WINDOW_DAYS);
            let accounts = ctx.source.accounts(start, selection_end)?;
            logic::account_check(&mut table, &accounts)
        }
        TableKind::InvoiceCheck => {
            let periods = ctx.source.policy_periods(selection_end, kind.candidate_limit())?;
            logic::invoice_check(&mut table, &periods, selection_end)
        }
        TableKind::SuspensePaymentMake => {
            let periods = ctx.source.policy_periods(selection_end, kind.candidate_limit())?;
            let token = ctx.tokens.next_token()?;
            logic::suspense_payment_make(
                &mut table,
                &periods,
                &token,
                &mut ctx.history,
                &mut ctx.random,
            )
        }
        TableKind::SuspensePaymentApply => {
            logic::suspense_payment_apply(&mut table, &mut ctx.history, &mut ctx.random)
        }
        TableKind::SuspensePaymentReverse => {
            logic::suspense_payment_reverse(&mut table, &mut ctx.history, &mut ctx.random)
        }
        TableKind::AccountPaymentMake => {
            let periods = ctx.source.policy_periods(selection_end, kind.candidate_limit())?;
            let token = ctx.tokens.next_token()?;
            logic::account_payment_make(&mut table, &periods, &token, &mut ctx.history)
        }
        TableKind::AccountPaymentReverse => {
            logic::account_payment_reverse(&mut table, &mut ctx.history, &mut ctx.random)
        }
        TableKind::AccountDisbursement => {
            if ctx.history.iter().any(|p| !p.is_reversed()) {
                let token = ctx.tokens.next_token()?;
                logic::account_disbursement(&mut table, &token, &mut ctx.history, &mut ctx.random)
            } else {
                Ok(())
            }
        }
        TableKind::PolicyPaymentMake => {
            let periods = ctx.source.policy_periods(selection_end, kind.candidate_limit())?;
            let token = ctx.tokens.next_token()?;
            logic::policy_payment_make(
                &mut table,
                &periods,
                selection_end,
                &token,
                &mut ctx.history,
            )
        }
        TableKind::PaymentWriteOff => {
            logic::payment_write_off(&mut table, &ctx.history, &mut ctx.random)
        }
        TableKind::WriteOffMake => {
            let periods = ctx.source.policy_periods(selection_end, kind.candidate_limit())?;
            logic::write_off_make(&mut table, &periods, selection_end, &mut ctx.random)
        }
        TableKind::AdvancedCommission => {
            let producer_codes = ctx.source.producer_codes()?;
            let token = ctx.tokens.next_token()?;
            logic::advanced_commission(&mut table, &producer_codes, &token, &mut ctx.random)
        }
        TableKind::PaymentPlanChange => {
            let periods = ctx.source.policy_periods(selection_end, kind.candidate_limit())?;
            let mut candidates = Vec::with_capacity(periods.len());
            for period in periods {
                let plans = ctx.source.payment_plans_excluding(&period.billing_id)?;
                candidates.push((period, plans));
            }
            logic::payment_plan_change(&mut table, &candidates, selection_end, &mut ctx.random)
        }
        TableKind::CollateralRequirement => {
            let periods = ctx.source.policy_periods(selection_end, kind.candidate_limit())?;
            logic::collateral_requirement(&mut table, &periods, selection_end, &mut ctx.random)
        }
    };
    outcome.map_err(precondition_error)?;

    info!(
        table = table.heading(),
        fixture = table.fixture(),
        rows = table.number_rows(),
        "generated table"
    );
    debug!(payments = ctx.history.len(), "payment history after table");
    Ok(table)
}
