//! Property-based integration tests.
//! Generates random candidate records and checks the invariants every generated document must hold.

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal::Decimal;
use testcase_gen_rs::{
    Account, DocumentSpec, PaymentPlan, PolicyPeriod, ProducerCode, Records, SpecKind, generate,
};

use crate::{as_of, options, tokens};

/// Offsets in days relative to the cutoff: creation, period start and period length
fn policy_period() -> impl Strategy<Value = (i64, i64, i64, u32, bool, bool)> {
    (
        1i64..200,
        -400i64..60,
        1i64..400,
        0u32..3,
        any::<bool>(),
        prop::bool::weighted(0.1),
    )
}

fn records(periods: Vec<(i64, i64, i64, u32, bool, bool)>, accounts: Vec<i64>) -> Records {
    let cutoff = as_of();
    Records {
        policy_periods: periods
            .into_iter()
            .enumerate()
            .map(|(i, (created, start, length, plan, bound, cancelled))| {
                let period_start = cutoff + Duration::days(start);
                PolicyPeriod {
                    account_number: format!("A-{i}"),
                    policy_number: format!("P-{i}"),
                    period_start,
                    period_end: period_start + Duration::days(length),
                    cancellation_date: cancelled.then_some(period_start),
                    status: if bound { "Bound" } else { "Draft" }.to_string(),
                    premium: Decimal::new(100_000 + i as i64, 2),
                    taxes: Decimal::new(1_250, 2),
                    billing_id: format!("bc:{plan}"),
                    payment_plan: format!("Plan {plan}"),
                    create_time: cutoff - Duration::hours(created),
                }
            })
            .collect(),
        accounts: accounts
            .into_iter()
            .enumerate()
            .map(|(i, hours)| Account {
                account_number: format!("N-{i}"),
                create_time: cutoff - Duration::hours(hours),
            })
            .collect(),
        producer_codes: (0..10)
            .map(|i| ProducerCode {
                code: format!("PC-{i}"),
            })
            .collect(),
        payment_plans: (0..3)
            .map(|i| PaymentPlan {
                billing_id: format!("bc:{i}"),
                name: format!("Plan {i}"),
            })
            .collect(),
    }
}

fn check_invariants(document: &DocumentSpec) -> Result<(), TestCaseError> {
    for table in document.tables() {
        prop_assert!(table.has_rows());
        prop_assert_eq!(table.number_rows(), table.rows().len());
        for (i, row) in table.rows().iter().enumerate() {
            prop_assert_eq!(row.len(), table.columns().len());
            prop_assert_eq!(&row[0], &format!("{}{}", table.test_id_prefix(), 10 + i));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_documents_hold_table_invariants(
        periods in prop::collection::vec(policy_period(), 1..40),
        accounts in prop::collection::vec(0i64..96, 0..10),
        seed in any::<u64>(),
    ) {
        let records = records(periods, accounts);
        for kind in SpecKind::ALL {
            let document = generate(kind.name(), &records, &mut tokens(), &options(seed))
                .map_err(|e| TestCaseError::fail(format!("{kind}: {e}")))?;
            check_invariants(&document)?;
        }
    }

    #[test]
    fn same_seed_same_document(
        periods in prop::collection::vec(policy_period(), 1..30),
        seed in any::<u64>(),
    ) {
        let records = records(periods, Vec::new());
        for name in ["SuspensePaymentMake", "AccountPaymentMake", "PaymentMake"] {
            let first = generate(name, &records, &mut tokens(), &options(seed)).unwrap();
            let second = generate(name, &records, &mut tokens(), &options(seed)).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn account_check_respects_the_window(
        accounts in prop::collection::vec(0i64..96, 0..20),
    ) {
        let expected = accounts.iter().filter(|h| (1..=48).contains(*h)).count();
        let records = records(Vec::new(), accounts);
        let document = generate("AccountCheckTest", &records, &mut tokens(), &options(1)).unwrap();
        let rows: usize = document.tables().iter().map(|t| t.number_rows()).sum();
        prop_assert_eq!(rows, expected);
    }
}
