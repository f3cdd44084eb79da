use serde::{Deserialize, Serialize};

use crate::domain::{Bill, Cents, Ledger, LedgerIssue, ServiceAccount};

/// What the dashboard shows for one account: the active year, that year's
/// bills and the debt owed within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account: ServiceAccount,
    pub active_year: i32,
    pub period_bills: Vec<Bill>,
    pub total_debt: Cents,
}

impl AccountSummary {
    pub fn is_settled(&self) -> bool {
        self.total_debt == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySummary {
    pub accounts: Vec<AccountSummary>,
    /// Sum of each account's active-period debt. Periods may differ per account.
    pub total_debt: Cents,
}

/// Issues found in one account's bills.
#[derive(Debug, Clone)]
pub struct AccountIssues {
    pub account: ServiceAccount,
    pub issues: Vec<LedgerIssue>,
}

pub fn summarize_account(account: &ServiceAccount, current_year: i32) -> AccountSummary {
    let ledger = Ledger::new(&account.bills);
    let active_year = ledger.active_year(current_year);
    let period_bills: Vec<Bill> = ledger
        .bills_for_year(active_year)
        .into_iter()
        .cloned()
        .collect();
    let total_debt = crate::domain::total_debt(&period_bills);

    AccountSummary {
        account: account.clone(),
        active_year,
        period_bills,
        total_debt,
    }
}

pub fn summarize_directory(accounts: &[ServiceAccount], current_year: i32) -> DirectorySummary {
    let accounts: Vec<AccountSummary> = accounts
        .iter()
        .map(|account| summarize_account(account, current_year))
        .collect();
    let total_debt = accounts
        .iter()
        .map(|s| s.total_debt)
        .fold(0, Cents::saturating_add);

    DirectorySummary {
        accounts,
        total_debt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountNumber, Bill, Provider};

    fn account_with(bills: Vec<Bill>) -> ServiceAccount {
        ServiceAccount::new(Provider::Edemsa, AccountNumber::parse("5555555").unwrap())
            .with_bills(bills)
    }

    #[test]
    fn test_summary_uses_active_period_only() {
        let account = account_with(vec![
            Bill::pending(11, 2025, 5000).unwrap(),
            Bill::pending(1, 2026, 30000).unwrap(),
            Bill::future(2, 2026).unwrap(),
        ]);

        let summary = summarize_account(&account, 2026);
        assert_eq!(summary.active_year, 2025);
        assert_eq!(summary.period_bills.len(), 1);
        assert_eq!(summary.total_debt, 5000);
        assert!(!summary.is_settled());
    }

    #[test]
    fn test_empty_account_summary() {
        let summary = summarize_account(&account_with(Vec::new()), 2026);
        assert_eq!(summary.active_year, 2026);
        assert!(summary.period_bills.is_empty());
        assert_eq!(summary.total_debt, 0);
        assert!(summary.is_settled());
    }

    #[test]
    fn test_directory_total() {
        let accounts = vec![
            account_with(vec![Bill::pending(1, 2026, 100).unwrap()]),
            account_with(vec![Bill::pending(1, 2026, 250).unwrap()]),
            account_with(vec![Bill::paid(1, 2026, 999).unwrap()]),
        ];
        let summary = summarize_directory(&accounts, 2026);
        assert_eq!(summary.accounts.len(), 3);
        assert_eq!(summary.total_debt, 350);
    }

    #[test]
    fn test_directory_total_saturates() {
        let accounts = vec![
            account_with(vec![Bill::pending(1, 2026, Cents::MAX).unwrap()]),
            account_with(vec![Bill::pending(1, 2026, Cents::MAX).unwrap()]),
        ];
        let summary = summarize_directory(&accounts, 2026);
        assert_eq!(summary.accounts[0].total_debt, Cents::MAX);
        assert_eq!(summary.total_debt, Cents::MAX);
    }
}
