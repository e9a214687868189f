//! Integration tests running every known test case against the fixture records

use rstest::rstest;
use testcase_gen_rs::{SpecKind, generate, render};

use crate::{fixture_records, options, tokens};

#[rstest]
#[case("AccountCheckTest", "ACCOUNT_CHECK", &[4])]
#[case("InvoiceCheckTest", "INVOICE_CHECK", &[7])]
#[case("WriteOffMake", "WRITE-OFF", &[15])]
#[case("PaymentPlanChange", "PAYMENT-PLAN_CHANGE", &[15])]
#[case("CollateralRequirementTest", "COLL-REQ", &[1])]
fn single_table_documents(
    #[case] name: &str,
    #[case] suite_id: &str,
    #[case] rows: &[usize],
) {
    let document = generate(name, &fixture_records(), &mut tokens(), &options(1)).unwrap();

    assert_eq!(document.suite_id(), suite_id);
    let counts: Vec<usize> = document.tables().iter().map(|t| t.number_rows()).collect();
    assert_eq!(counts, rows);
}

#[test]
fn every_test_case_renders() {
    let records = fixture_records();
    for kind in SpecKind::ALL {
        let document = generate(kind.name(), &records, &mut tokens(), &options(3))
            .unwrap_or_else(|e| panic!("{kind} failed: {e}"));

        assert_eq!(document.project_name(), "BillingCenterProject");
        assert_eq!(document.application_name(), "BC");
        for table in document.tables() {
            assert!(table.has_rows(), "{kind}: empty table {}", table.heading());
            for row in table.rows() {
                assert_eq!(row.len(), table.columns().len());
            }
        }

        let text = render(&document, options(3).generated_on);
        assert!(text.contains(&format!("<title>{}</title>", document.suite_name())));
        assert_eq!(text.matches("<table ").count(), document.table_count());
    }
}

#[rstest]
#[case("SuspensePaymentMake", "No")]
#[case("PaymentPlanChange", "Yes")]
#[case("CollateralRequirementTest", "Yes")]
#[case("AdvancedCommissionPayment", "No")]
fn repeatable_flag_is_rendered(#[case] name: &str, #[case] label: &str) {
    let document = generate(name, &fixture_records(), &mut tokens(), &options(1)).unwrap();
    let text = render(&document, options(1).generated_on);
    assert!(text.contains(&format!("<dd>{label}</dd>")));
}

#[test]
fn account_check_lists_recent_accounts_oldest_first() {
    let document =
        generate("AccountCheckTest", &fixture_records(), &mut tokens(), &options(1)).unwrap();
    let accounts: Vec<&str> = document.tables()[0]
        .rows()
        .iter()
        .map(|row| row[1].as_str())
        .collect();
    assert_eq!(accounts, ["A-2002", "A-2003", "A-2004", "A-2005"]);
}
