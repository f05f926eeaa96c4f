use super::entity::EntityInfo;

/// A bank customer.
///
/// Owned accounts and loans are referenced by identifier into the registry's
/// mappings, never held directly, so no ownership cycle exists between a
/// customer and its entities.
#[derive(Debug, Clone)]
pub struct Customer {
    info: EntityInfo,
    email: String,
    phone: String,
    accounts: Vec<String>,
    loans: Vec<String>,
}

impl Customer {
    pub(crate) fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            info: EntityInfo::new(id, name),
            email: email.into(),
            phone: phone.into(),
            accounts: Vec::new(),
            loans: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.info.id()
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn info(&self) -> &EntityInfo {
        &self.info
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Identifiers of the customer's accounts, in opening order.
    pub fn account_ids(&self) -> &[String] {
        &self.accounts
    }

    /// Identifiers of the customer's loans, in origination order.
    pub fn loan_ids(&self) -> &[String] {
        &self.loans
    }

    pub(crate) fn add_account(&mut self, account_id: String) {
        self.accounts.push(account_id);
    }

    pub(crate) fn add_loan(&mut self, loan_id: String) {
        self.loans.push(loan_id);
    }
}
