//! Integration tests for the multi-table payment documents, where later tables act on the
//! payments created by earlier ones.

use std::collections::HashSet;

use claims::assert_ok;
use testcase_gen_rs::{DocumentSpec, TableSpec, decode_base32, generate, render};

use crate::{fixture_records, options, tokens};

fn table<'a>(document: &'a DocumentSpec, heading: &str) -> Option<&'a TableSpec> {
    document.tables().iter().find(|t| t.heading() == heading)
}

fn column<'a>(table: &'a TableSpec, name: &str) -> Vec<&'a str> {
    let position = table
        .columns()
        .iter()
        .position(|c| c == name)
        .expect("unknown column");
    table.rows().iter().map(|row| row[position].as_str()).collect()
}

fn references(document: &DocumentSpec, heading: &str) -> HashSet<String> {
    table(document, heading)
        .map(|t| column(t, "RefNumber").into_iter().map(String::from).collect())
        .unwrap_or_default()
}

#[test]
fn suspense_document_is_reproducible() {
    let records = fixture_records();

    let first = generate("SuspensePaymentMake", &records, &mut tokens(), &options(67889)).unwrap();
    let second = generate("SuspensePaymentMake", &records, &mut tokens(), &options(67889)).unwrap();

    assert_eq!(
        references(&first, "Apply suspense payments"),
        references(&second, "Apply suspense payments")
    );
    assert_eq!(
        references(&first, "Reverse suspense payments"),
        references(&second, "Reverse suspense payments")
    );
    let date = options(67889).generated_on;
    assert_eq!(render(&first, date), render(&second, date));
}

#[test]
fn suspense_phases_act_on_created_payments() {
    let records = fixture_records();
    for seed in 0..20 {
        let document =
            generate("SuspensePaymentMake", &records, &mut tokens(), &options(seed)).unwrap();

        let made = references(&document, "Create suspense payments");
        let applied = references(&document, "Apply suspense payments");
        let reversed = references(&document, "Reverse suspense payments");

        assert_eq!(made.len(), 20);
        assert!(applied.is_subset(&made));
        assert!(reversed.is_subset(&made));
        assert!(applied.is_disjoint(&reversed), "seed {seed}");
    }
}

#[test]
fn reference_numbers_share_one_token_per_table() {
    let document =
        generate("SuspensePaymentMake", &fixture_records(), &mut tokens(), &options(5)).unwrap();
    let make = table(&document, "Create suspense payments").unwrap();

    let refs = column(make, "RefNumber");
    let token = &refs[0][..6];
    assert_ok!(decode_base32(token));
    for (i, reference) in refs.iter().enumerate() {
        assert_eq!(*reference, format!("{token}{}", 10 + i));
    }
}

#[test]
fn account_payments_disburse_only_standing_payments() {
    let records = fixture_records();
    for seed in 0..20 {
        let document =
            generate("AccountPaymentMake", &records, &mut tokens(), &options(seed)).unwrap();
        let make = table(&document, "Create account direct payments").unwrap();
        assert_eq!(make.number_rows(), 25);

        let reversed: HashSet<&str> = table(&document, "Reverse account payments")
            .map(|t| column(t, "RefNumber").into_iter().collect())
            .unwrap_or_default();
        let reversed_accounts: HashSet<&str> = make
            .rows()
            .iter()
            .filter(|row| reversed.contains(row[2].as_str()))
            .map(|row| row[1].as_str())
            .collect();

        if let Some(disbursements) = table(&document, "Create account disbursements") {
            for account in column(disbursements, "Account Number") {
                assert!(!reversed_accounts.contains(account), "seed {seed}: {account}");
            }
            assert!(column(disbursements, "Reason").iter().all(|r| *r == "Overpay"));
        }
    }
}

#[test]
fn policy_payments_cover_policies_in_effect() {
    let document = generate("PaymentMake", &fixture_records(), &mut tokens(), &options(9)).unwrap();
    let payments = table(&document, "Create direct policy payments").unwrap();

    // 20 most recent periods: 25 down to 6, without the expired 7, 14, 21 and the scheduled 9, 18
    assert_eq!(payments.number_rows(), 15);
    assert!(!column(payments, "Policy Number").contains(&"P-5021"));
    assert_eq!(column(payments, "Payment Amount")[0], "1263.50");
}
