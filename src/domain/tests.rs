use chrono::NaiveDate;
use claims::{assert_err, assert_ok};
use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn period(start: NaiveDateTime, end: NaiveDateTime) -> PolicyPeriod {
    PolicyPeriod {
        account_number: "A-1".to_string(),
        policy_number: "P-1".to_string(),
        period_start: start,
        period_end: end,
        cancellation_date: None,
        status: "Bound".to_string(),
        premium: dec!(1000.50),
        taxes: dec!(49.50),
        billing_id: "pc:1".to_string(),
        payment_plan: "Monthly".to_string(),
        create_time: start,
    }
}

// -- policy period --------------------------------------------------------

#[test]
fn total_invoiced_amount_is_premium_plus_taxes() {
    let p = period(at(2021, 1, 1), at(2022, 1, 1));
    assert_eq!(p.total_invoiced_amount(), dec!(1050.00));
    assert_eq!(p.total_invoiced_amount().to_string(), "1050.00");
}

#[rstest]
#[case(at(2020, 12, 31), false)]
#[case(at(2021, 1, 1), true)]
#[case(at(2021, 6, 1), true)]
#[case(at(2022, 1, 1), false)]
fn in_effect_window_is_half_open(#[case] date: NaiveDateTime, #[case] expected: bool) {
    let p = period(at(2021, 1, 1), at(2022, 1, 1));
    assert_eq!(p.is_in_effect(date), expected);
}

#[rstest]
#[case("Bound", None, at(2021, 6, 1), PolicyStatus::InForce)]
#[case("Bound", Some(at(2021, 3, 1)), at(2021, 6, 1), PolicyStatus::Cancelled)]
#[case("Bound", None, at(2020, 6, 1), PolicyStatus::Scheduled)]
#[case("Bound", None, at(2022, 1, 1), PolicyStatus::Expired)]
#[case("Draft", None, at(2021, 6, 1), PolicyStatus::Unbound)]
fn display_status(
    #[case] status: &str,
    #[case] cancellation: Option<NaiveDateTime>,
    #[case] reporting_date: NaiveDateTime,
    #[case] expected: PolicyStatus,
) {
    let mut p = period(at(2021, 1, 1), at(2022, 1, 1));
    p.status = status.to_string();
    p.cancellation_date = cancellation;
    assert_eq!(p.display_status(reporting_date), expected);
}

// -- payment history ------------------------------------------------------

#[test]
fn history_iterates_in_creation_order_after_flag_flips() {
    let mut history = PaymentHistory::new();
    for ref_number in ["z10", "a11", "m12", "b13"] {
        assert_ok!(history.create(ref_number, "A-1", false, false));
    }

    for payment in history.iter_mut() {
        if payment.ref_number().starts_with('a') || payment.ref_number().starts_with('b') {
            payment.mark_reversed();
        }
    }
    history.iter_mut().next().unwrap().mark_applied();

    let order: Vec<&str> = history.iter().map(Payment::ref_number).collect();
    assert_eq!(order, ["z10", "a11", "m12", "b13"]);
}

#[test]
fn history_rejects_duplicate_reference_numbers() {
    let mut history = PaymentHistory::new();
    assert_ok!(history.create("r10", "A-1", false, false));
    assert_err!(history.create("r10", "A-2", false, false));
    assert_eq!(history.len(), 1);
    assert_eq!(history.get("r10").unwrap().account_number(), "A-1");
}

#[test]
fn history_get_unknown_reference_fails() {
    let mut history = PaymentHistory::new();
    assert_err!(history.get("missing"));
    assert_err!(history.get_mut("missing"));
    assert!(history.is_empty());
}

#[test]
fn history_get_mut_flips_flags_in_place() {
    let mut history = PaymentHistory::new();
    history.create("r10", "A-1", false, false).unwrap();
    history.create("r11", "A-2", false, false).unwrap();

    history.get_mut("r11").unwrap().mark_disbursed();

    let disbursed: Vec<&str> = history
        .iter()
        .filter(|p| p.is_disbursed())
        .map(Payment::ref_number)
        .collect();
    assert_eq!(disbursed, ["r11"]);
}

#[test]
fn created_payment_starts_with_given_flags() {
    let mut history = PaymentHistory::new();
    let payment = history.create("r10", "A-1", true, false).unwrap();
    payment.set_policy_number("P-9");

    let payment = history.get("r10").unwrap();
    assert!(payment.is_applied());
    assert!(!payment.is_reversed());
    assert!(!payment.is_disbursed());
    assert_eq!(payment.policy_number(), Some("P-9"));
}

// -- table spec -----------------------------------------------------------

#[test]
fn table_rejects_rows_of_wrong_length() {
    let mut table = TableSpec::new("h", "F", &["A", "B"], &[false, false]).unwrap();
    assert_err!(table.add_row(vec!["1".to_string()]));
    assert_err!(table.add_row(vec!["1".into(), "2".into(), "3".into()]));
    assert_ok!(table.add_row(vec!["1".into(), "2".into()]));
    assert_eq!(table.number_rows(), 1);
}

#[test]
fn table_schema_is_validated() {
    assert_err!(TableSpec::new("h", "F", &[], &[]));
    assert_err!(TableSpec::new("h", "", &["A"], &[false]));
    assert_err!(TableSpec::new("h", "F", &["A", "B"], &[true]));
}

#[test]
fn table_counts_rows_literally() {
    let mut table = TableSpec::new("h", "F", &["A"], &[false]).unwrap();
    assert!(!table.has_rows());
    assert_eq!(table.number_rows(), 0);

    table.add_row(vec!["1".into()]).unwrap();
    assert!(table.has_rows());
    assert_eq!(table.number_rows(), 1);
}

#[test]
fn test_ids_concatenate_prefix_and_count() {
    let table = TableSpec::new("h", "F", &["A"], &[false])
        .unwrap()
        .with_test_ids("SUSPENSE-PAYMENT-", 10);
    assert_eq!(table.test_id(10), "SUSPENSE-PAYMENT-10");
    assert_eq!(table.test_id_start(), 10);
}

// -- document spec --------------------------------------------------------

#[test]
fn document_refuses_empty_tables() {
    let mut doc = DocumentSpec::new("Project", "Suite", "SUITE").unwrap();
    let table = TableSpec::new("h", "F", &["A"], &[false]).unwrap();
    assert_err!(doc.add_table(table));
    assert_eq!(doc.table_count(), 0);
}

#[test]
fn document_directories_follow_application_project_suite() {
    let doc = DocumentSpec::new("BillingCenterProject", "SuspensePaymentMake", "SUSPENSE")
        .unwrap()
        .with_repeatable(false);
    let root = std::path::Path::new("/suites");

    assert_eq!(
        doc.suite_directory(root),
        std::path::PathBuf::from("/suites/BC/BillingCenterProject/SuspensePaymentMake")
    );
    assert_eq!(doc.repeatable_label(), "No");
}

#[test]
fn document_requires_identifiers() {
    assert_err!(DocumentSpec::new("", "Suite", "SUITE"));
    assert_err!(DocumentSpec::new("Project", "Suite", ""));
}
