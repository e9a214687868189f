//! Module mapping test-case names to their document metadata and ordered table pipelines

use std::{fmt, str::FromStr};

use tracing::{info, warn};

use crate::{
    Error,
    config::GenerationOptions,
    domain::{DocumentSpec, PaymentHistory},
    engine::{GenerationContext, TableKind, generate_table},
    error::precondition_error,
    input::DataSource,
    random::RandomSelector,
    token::TokenSource,
};

const PROJECT_NAME: &str = "BillingCenterProject";
const AUTHOR: &str = "W. Shaffer";

/// A test case the engine knows how to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    AccountCheck,
    InvoiceCheck,
    SuspensePaymentMake,
    AccountPaymentMake,
    PaymentMake,
    AdvancedCommissionPayment,
    WriteOffMake,
    PaymentPlanChange,
    CollateralRequirement,
}

/// One step of a document pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub kind: TableKind,
    /// A required table without rows aborts the document instead of being omitted
    pub required: bool,
}

const fn optional(kind: TableKind) -> Phase {
    Phase {
        kind,
        required: false,
    }
}

impl SpecKind {
    pub const ALL: [SpecKind; 9] = [
        SpecKind::AccountCheck,
        SpecKind::InvoiceCheck,
        SpecKind::SuspensePaymentMake,
        SpecKind::AccountPaymentMake,
        SpecKind::PaymentMake,
        SpecKind::AdvancedCommissionPayment,
        SpecKind::WriteOffMake,
        SpecKind::PaymentPlanChange,
        SpecKind::CollateralRequirement,
    ];

    /// The name used to request this test case
    pub fn name(self) -> &'static str {
        match self {
            SpecKind::AccountCheck => "AccountCheckTest",
            SpecKind::InvoiceCheck => "InvoiceCheckTest",
            SpecKind::SuspensePaymentMake => "SuspensePaymentMake",
            SpecKind::AccountPaymentMake => "AccountPaymentMake",
            SpecKind::PaymentMake => "PaymentMake",
            SpecKind::AdvancedCommissionPayment => "AdvancedCommissionPayment",
            SpecKind::WriteOffMake => "WriteOffMake",
            SpecKind::PaymentPlanChange => "PaymentPlanChange",
            SpecKind::CollateralRequirement => "CollateralRequirementTest",
        }
    }

    /// The tables of the document, in generation order
    pub fn phases(self) -> Vec<Phase> {
        match self {
            SpecKind::AccountCheck => vec![optional(TableKind::AccountCheck)],
            SpecKind::InvoiceCheck => vec![optional(TableKind::InvoiceCheck)],
            SpecKind::SuspensePaymentMake => vec![
                Phase {
                    kind: TableKind::SuspensePaymentMake,
                    required: true,
                },
                optional(TableKind::SuspensePaymentApply),
                optional(TableKind::SuspensePaymentReverse),
            ],
            SpecKind::AccountPaymentMake => vec![
                optional(TableKind::AccountPaymentMake),
                optional(TableKind::AccountPaymentReverse),
                optional(TableKind::AccountDisbursement),
            ],
            SpecKind::PaymentMake => vec![
                optional(TableKind::PolicyPaymentMake),
                optional(TableKind::PaymentWriteOff),
            ],
            SpecKind::AdvancedCommissionPayment => vec![optional(TableKind::AdvancedCommission)],
            SpecKind::WriteOffMake => vec![optional(TableKind::WriteOffMake)],
            SpecKind::PaymentPlanChange => vec![optional(TableKind::PaymentPlanChange)],
            SpecKind::CollateralRequirement => vec![optional(TableKind::CollateralRequirement)],
        }
    }

    /// The document metadata, without any table
    pub fn document(self) -> Result<DocumentSpec, String> {
        let (suite_name, suite_id, version, repeatable, description) = match self {
            SpecKind::AccountCheck => (
                "AccountCheck",
                "ACCOUNT_CHECK",
                "2021-09-03",
                true,
                "This test case checks that BillingCenter has the specified accounts from PolicyCenter.",
            ),
            SpecKind::InvoiceCheck => (
                "InvoiceCheck",
                "INVOICE_CHECK",
                "2021-09-14",
                true,
                "This test case checks that BillingCenter has the specified policy period and invoice.",
            ),
            SpecKind::SuspensePaymentMake => (
                "SuspensePaymentMake",
                "SUSPENSE_PAYMENT_MAKE",
                "2021-09-16",
                false,
                "This test case creates suspense payments of various amount. It then generates tests that \
                 apply some of the payments, and tests that reverse some of the payments that have not been \
                 applied. New suspense payments should be generated each time an execution of the test case is desired.",
            ),
            SpecKind::AccountPaymentMake => (
                "AccountPaymentMake",
                "ACCOUNT_PAYMENT_MAKE",
                "2021-09-20",
                false,
                "This test case creates direct account payments of various amount. It then reverses some of \
                 the payments and issues disbursements from accounts whose payments stand. New payments and \
                 disbursements should be generated each time an execution of the test case is desired.",
            ),
            SpecKind::PaymentMake => (
                "PaymentMake",
                "PAYMENT_MAKE",
                "2021-09-18",
                false,
                "This test case creates direct payments of various amount for policies, then writes off \
                 small amounts against some of them. New payments should be generated each time an execution \
                 of the test case is desired.",
            ),
            SpecKind::AdvancedCommissionPayment => (
                "AdvancedCommissionPayment",
                "ADVANCED_COMMISSION_PAYMENT",
                "2021-09-19",
                false,
                "This test case creates advanced commission payments to a randomly selected list of producers.",
            ),
            SpecKind::WriteOffMake => (
                "WriteOffMake",
                "WRITE-OFF",
                "2021-09-20",
                false,
                "This test case creates write-offs from policies. New write-offs should be generated each \
                 time an execution of the test case is desired.",
            ),
            SpecKind::PaymentPlanChange => (
                "PaymentPlanChange",
                "PAYMENT-PLAN_CHANGE",
                "2021-09-20",
                true,
                "This test case changes the payment plans on policies. Once the payment plan is changed, \
                 repeating the test results in a warning and no change.",
            ),
            SpecKind::CollateralRequirement => (
                "CollateralRequirementCreate",
                "COLL-REQ",
                "2021-10-10",
                true,
                "This test case creates new collateral requirements for accounts with new policies.",
            ),
        };

        Ok(DocumentSpec::new(PROJECT_NAME, suite_name, suite_id)?
            .with_description(description)
            .with_version(version)
            .with_author(AUTHOR)
            .with_repeatable(repeatable))
    }
}

impl FromStr for SpecKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        SpecKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| Error::UnsupportedSpec(name.to_string()))
    }
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs the pipeline of `kind` and assembles the resulting document.
///
/// One selector seeded with `options.seed` and one payment history serve all tables, in order.
/// Tables without rows are omitted, unless the phase is required.
pub fn build_document(
    kind: SpecKind,
    source: &dyn DataSource,
    tokens: &mut dyn TokenSource,
    options: &GenerationOptions,
) -> Result<DocumentSpec, Error> {
    let mut document = kind
        .document()
        .map_err(precondition_error)?
        .with_seed(options.seed);

    let mut ctx = GenerationContext {
        source,
        tokens,
        random: RandomSelector::new(options.seed),
        history: PaymentHistory::new(),
        selection_end: options.selection_end,
    };

    for phase in kind.phases() {
        let table = generate_table(phase.kind, &mut ctx)?;
        if table.has_rows() {
            document.add_table(table).map_err(precondition_error)?;
        } else if phase.required {
            return Err(precondition_error(format!(
                "{kind}: required table '{}' has no rows",
                table.heading()
            )));
        } else {
            warn!(spec = %kind, table = table.heading(), "table has no rows, omitted");
        }
    }

    info!(
        spec = %kind,
        suite = document.suite_name(),
        tables = document.table_count(),
        payments = ctx.history.len(),
        "built document"
    );
    Ok(document)
}
