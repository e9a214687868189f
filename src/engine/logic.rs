//! Module focused on the row-generation policy of each individual table kind.
//!
//! Every function appends the rows of one table and applies that table's effect on the payment
//! history. Draws from the selector only happen for candidates passing the kind's exclusion
//! predicate, so the draw sequence is part of each function's contract.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::{
    domain::{
        Account, PaymentHistory, PaymentPlan, PolicyPeriod, PolicyStatus, ProducerCode, TableSpec,
    },
    random::RandomSelector,
};

const SUSPENSE_PAYMENT_RANGE: (i64, i64) = (100, 1000);
const DISBURSEMENT_RANGE: (i64, i64) = (10, 100);
const WRITE_OFF_RANGE: (i64, i64) = (1, 5);
const COMMISSION_RANGE: (i64, i64) = (10, 1000);
const COLLATERAL_RANGE: (i64, i64) = (1000, 5000);

const SUSPENSE_APPLY_WEIGHT: u8 = 20;
const SUSPENSE_REVERSE_WEIGHT: u8 = 50;
const PAYMENT_REVERSE_WEIGHT: u8 = 20;
const DISBURSEMENT_WEIGHT: u8 = 50;
const WRITE_OFF_WEIGHT: u8 = 90;
const COMMISSION_WEIGHT: u8 = 50;

const TRUE: &str = "true";

/// Counter value of the next row: the start value plus the rows emitted so far
fn next_count(table: &TableSpec) -> u32 {
    table.test_id_start() + table.number_rows() as u32
}

fn draw(random: &mut RandomSelector, (low, high): (i64, i64)) -> Result<String, String> {
    random.uniform_int(low, high)
}

pub(super) fn account_check(table: &mut TableSpec, accounts: &[Account]) -> Result<(), String> {
    for account in accounts {
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            account.account_number.clone(),
            format!("Check account {}", account.account_number),
        ])?;
    }
    Ok(())
}

pub(super) fn invoice_check(
    table: &mut TableSpec,
    periods: &[PolicyPeriod],
    reporting_date: NaiveDateTime,
) -> Result<(), String> {
    for period in periods
        .iter()
        .filter(|p| p.display_status(reporting_date) == PolicyStatus::InForce)
    {
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            period.account_number.clone(),
            period.policy_number.clone(),
            period.billing_id.clone(),
            format!("Check policy {}", period.policy_number),
        ])?;
    }
    Ok(())
}

pub(super) fn suspense_payment_make(
    table: &mut TableSpec,
    periods: &[PolicyPeriod],
    token: &str,
    history: &mut PaymentHistory,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for period in periods {
        let count = next_count(table);
        let ref_number = format!("{token}{count}");
        table.add_row(vec![
            table.test_id(count),
            ref_number.clone(),
            period.account_number.clone(),
            draw(random, SUSPENSE_PAYMENT_RANGE)?,
            "Create suspense payment".to_string(),
        ])?;
        debug!(
            ref_number = ref_number.as_str(),
            account = period.account_number.as_str(),
            "suspense payment created"
        );
        history.create(ref_number, period.account_number.clone(), false, false)?;
    }
    Ok(())
}

pub(super) fn suspense_payment_apply(
    table: &mut TableSpec,
    history: &mut PaymentHistory,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for payment in history.iter_mut() {
        if !random.select(SUSPENSE_APPLY_WEIGHT)? {
            continue;
        }
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            payment.ref_number().to_string(),
            payment.account_number().to_string(),
            TRUE.to_string(),
            "Apply suspense payment".to_string(),
        ])?;
        payment.mark_applied();
        debug!(
            ref_number = payment.ref_number(),
            account = payment.account_number(),
            "suspense payment applied"
        );
    }
    Ok(())
}

/// Only payments that were not applied are eligible for reversal
pub(super) fn suspense_payment_reverse(
    table: &mut TableSpec,
    history: &mut PaymentHistory,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for payment in history.iter_mut().filter(|p| !p.is_applied()) {
        if !random.select(SUSPENSE_REVERSE_WEIGHT)? {
            continue;
        }
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            payment.ref_number().to_string(),
            TRUE.to_string(),
            "Reverse suspense payment".to_string(),
        ])?;
        payment.mark_reversed();
        debug!(
            ref_number = payment.ref_number(),
            account = payment.account_number(),
            "suspense payment reversed"
        );
    }
    Ok(())
}

pub(super) fn account_payment_make(
    table: &mut TableSpec,
    periods: &[PolicyPeriod],
    token: &str,
    history: &mut PaymentHistory,
) -> Result<(), String> {
    for period in periods {
        let count = next_count(table);
        let ref_number = format!("{token}{count}");
        table.add_row(vec![
            table.test_id(count),
            period.account_number.clone(),
            ref_number.clone(),
            period.total_invoiced_amount().to_string(),
            "Create account payment".to_string(),
        ])?;
        debug!(
            ref_number = ref_number.as_str(),
            account = period.account_number.as_str(),
            "account payment created"
        );
        history.create(ref_number, period.account_number.clone(), false, false)?;
    }
    Ok(())
}

pub(super) fn account_payment_reverse(
    table: &mut TableSpec,
    history: &mut PaymentHistory,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for payment in history.iter_mut().filter(|p| !p.is_reversed()) {
        if !random.select(PAYMENT_REVERSE_WEIGHT)? {
            continue;
        }
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            payment.ref_number().to_string(),
            TRUE.to_string(),
            "Reverse account payment".to_string(),
        ])?;
        payment.mark_reversed();
        debug!(
            ref_number = payment.ref_number(),
            account = payment.account_number(),
            "account payment reversed"
        );
    }
    Ok(())
}

/// Disburses from accounts whose payment still stands. The disbursement gets its own
/// reference number built from `token`.
pub(super) fn account_disbursement(
    table: &mut TableSpec,
    token: &str,
    history: &mut PaymentHistory,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for payment in history.iter_mut().filter(|p| !p.is_reversed()) {
        if !random.select(DISBURSEMENT_WEIGHT)? {
            continue;
        }
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            format!("{token}{count}"),
            payment.account_number().to_string(),
            draw(random, DISBURSEMENT_RANGE)?,
            "Overpay".to_string(),
            TRUE.to_string(),
            TRUE.to_string(),
            "Create account disbursement".to_string(),
        ])?;
        payment.mark_disbursed();
        debug!(
            ref_number = payment.ref_number(),
            account = payment.account_number(),
            "payment disbursed"
        );
    }
    Ok(())
}

pub(super) fn policy_payment_make(
    table: &mut TableSpec,
    periods: &[PolicyPeriod],
    reporting_date: NaiveDateTime,
    token: &str,
    history: &mut PaymentHistory,
) -> Result<(), String> {
    for period in periods.iter().filter(|p| p.is_in_effect(reporting_date)) {
        let count = next_count(table);
        let ref_number = format!("{token}{count}");
        table.add_row(vec![
            table.test_id(count),
            period.account_number.clone(),
            period.policy_number.clone(),
            ref_number.clone(),
            period.total_invoiced_amount().to_string(),
            "Create policy payment".to_string(),
        ])?;
        debug!(
            ref_number = ref_number.as_str(),
            account = period.account_number.as_str(),
            policy = period.policy_number.as_str(),
            "policy payment created"
        );
        history
            .create(ref_number, period.account_number.clone(), false, false)?
            .set_policy_number(period.policy_number.clone());
    }
    Ok(())
}

/// Negative write-offs against the payments made earlier in the document
pub(super) fn payment_write_off(
    table: &mut TableSpec,
    history: &PaymentHistory,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for payment in history {
        if !random.select(WRITE_OFF_WEIGHT)? {
            continue;
        }
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            "negative write-off".to_string(),
            payment.account_number().to_string(),
            payment.policy_number().unwrap_or_default().to_string(),
            draw(random, WRITE_OFF_RANGE)?,
            "miscellaneous".to_string(),
            TRUE.to_string(),
            "Create negative write-off".to_string(),
        ])?;
    }
    Ok(())
}

pub(super) fn write_off_make(
    table: &mut TableSpec,
    periods: &[PolicyPeriod],
    reporting_date: NaiveDateTime,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for period in periods.iter().filter(|p| p.is_in_effect(reporting_date)) {
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            "write-off".to_string(),
            period.account_number.clone(),
            period.policy_number.clone(),
            draw(random, WRITE_OFF_RANGE)?,
            "miscellaneous".to_string(),
            TRUE.to_string(),
            "Create write-off".to_string(),
        ])?;
    }
    Ok(())
}

pub(super) fn advanced_commission(
    table: &mut TableSpec,
    producer_codes: &[ProducerCode],
    token: &str,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for producer_code in producer_codes {
        if !random.select(COMMISSION_WEIGHT)? {
            continue;
        }
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            producer_code.code.clone(),
            format!("{token}{count}"),
            draw(random, COMMISSION_RANGE)?,
            TRUE.to_string(),
            "Create advanced commission payment".to_string(),
        ])?;
    }
    Ok(())
}

/// Moves each in-effect policy to one of the plans it is not currently billed under.
/// A policy without an alternative plan is a precondition violation.
pub(super) fn payment_plan_change(
    table: &mut TableSpec,
    candidates: &[(PolicyPeriod, Vec<PaymentPlan>)],
    reporting_date: NaiveDateTime,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for (period, plans) in candidates
        .iter()
        .filter(|(p, _)| p.is_in_effect(reporting_date))
    {
        let plan = random
            .choose_one(plans)
            .map_err(|msg| format!("policy {}: {msg}", period.policy_number))?;
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            period.account_number.clone(),
            period.policy_number.clone(),
            plan.billing_id.clone(),
            TRUE.to_string(),
            format!("Change payment plan from {}", period.payment_plan),
        ])?;
    }
    Ok(())
}

/// Cash requirements, effective from the later of the reporting date and the period start,
/// expiring at the later of the reporting date and the period end
pub(super) fn collateral_requirement(
    table: &mut TableSpec,
    periods: &[PolicyPeriod],
    reporting_date: NaiveDateTime,
    random: &mut RandomSelector,
) -> Result<(), String> {
    for period in periods.iter().filter(|p| p.is_in_effect(reporting_date)) {
        let effective = reporting_date.max(period.period_start).date();
        let expiration = reporting_date.max(period.period_end).date();
        let count = next_count(table);
        table.add_row(vec![
            table.test_id(count),
            period.account_number.clone(),
            "Cash Requirement - ".to_string(),
            draw(random, COLLATERAL_RANGE)?,
            "cash".to_string(),
            effective.format("%Y-%m-%d").to_string(),
            expiration.format("%Y-%m-%d").to_string(),
            TRUE.to_string(),
            "Create collateral requirement".to_string(),
        ])?;
    }
    Ok(())
}
