//! Module defining the payment history threaded through the tables of one document

use std::collections::HashMap;

/// The lifecycle state of one payment created by an originating table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    ref_number: String,
    account_number: String,
    policy_number: Option<String>,
    applied: bool,
    reversed: bool,
    disbursed: bool,
}

impl Payment {
    pub fn ref_number(&self) -> &str {
        &self.ref_number
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn policy_number(&self) -> Option<&str> {
        self.policy_number.as_deref()
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn is_disbursed(&self) -> bool {
        self.disbursed
    }

    pub(crate) fn set_policy_number(&mut self, policy_number: impl Into<String>) {
        self.policy_number = Some(policy_number.into());
    }

    pub(crate) fn mark_applied(&mut self) {
        self.applied = true;
    }

    pub(crate) fn mark_reversed(&mut self) {
        self.reversed = true;
    }

    pub(crate) fn mark_disbursed(&mut self) {
        self.disbursed = true;
    }
}

/// Insertion-ordered registry of the payments created while generating one document.
///
/// Entries are never removed; later tables only flip the lifecycle flags of existing entries.
#[derive(Debug, Default)]
pub struct PaymentHistory {
    payments: Vec<Payment>,
    index: HashMap<String, usize>,
}

impl PaymentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        ref_number: impl Into<String>,
        account_number: impl Into<String>,
        applied: bool,
        reversed: bool,
    ) -> Result<&mut Payment, String> {
        let ref_number = ref_number.into();
        if self.index.contains_key(&ref_number) {
            return Err(format!("payment {ref_number} already exists"));
        }

        let position = self.payments.len();
        self.index.insert(ref_number.clone(), position);
        self.payments.push(Payment {
            ref_number,
            account_number: account_number.into(),
            policy_number: None,
            applied,
            reversed,
            disbursed: false,
        });
        Ok(&mut self.payments[position])
    }

    pub fn get(&self, ref_number: &str) -> Result<&Payment, String> {
        self.index
            .get(ref_number)
            .map(|&position| &self.payments[position])
            .ok_or_else(|| format!("unknown payment {ref_number}"))
    }

    pub fn get_mut(&mut self, ref_number: &str) -> Result<&mut Payment, String> {
        match self.index.get(ref_number) {
            Some(&position) => Ok(&mut self.payments[position]),
            None => Err(format!("unknown payment {ref_number}")),
        }
    }

    /// Payments in the order they were created
    pub fn iter(&self) -> impl Iterator<Item = &Payment> {
        self.payments.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Payment> {
        self.payments.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

impl<'a> IntoIterator for &'a PaymentHistory {
    type Item = &'a Payment;
    type IntoIter = std::slice::Iter<'a, Payment>;

    fn into_iter(self) -> Self::IntoIter {
        self.payments.iter()
    }
}
