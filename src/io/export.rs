use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{AccountSummary, BillingService, Session};
use crate::domain::ServiceAccount;

/// Full export of one user's accounts plus their resolved summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub owner: String,
    pub accounts: Vec<ServiceAccount>,
    pub summaries: Vec<AccountSummary>,
}

/// Writes a session's accounts out as CSV or JSON.
pub struct Exporter<'a> {
    service: &'a BillingService,
    session: &'a Session,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BillingService, session: &'a Session) -> Self {
        Self { service, session }
    }

    /// One row per account.
    pub fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts(self.session)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "provider",
            "category",
            "account_number",
            "alias",
            "bills",
        ])?;

        for account in accounts {
            csv_writer.write_record([
                account.id.to_string(),
                account.provider.as_str().to_string(),
                account.provider.category().to_string(),
                account.account_number.to_string(),
                account.alias.clone().unwrap_or_default(),
                account.bills.len().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(accounts.len())
    }

    /// One row per bill across every account, in stored order.
    pub fn export_bills_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts(self.session)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["account_number", "month", "year", "status", "amount_cents"])?;

        let mut count = 0;
        for account in accounts {
            for bill in &account.bills {
                csv_writer.write_record([
                    account.account_number.to_string(),
                    bill.month.to_string(),
                    bill.year.to_string(),
                    bill.status.as_str().to_string(),
                    bill.amount.map(|a| a.to_string()).unwrap_or_default(),
                ])?;
                count += 1;
            }
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Active year and debt per account.
    pub fn export_summary_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let summary = self.service.summarize(self.session)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "account_number",
            "provider",
            "alias",
            "active_year",
            "pending_bills",
            "total_debt_cents",
        ])?;

        for entry in &summary.accounts {
            let pending = entry.period_bills.iter().filter(|b| b.is_pending()).count();
            csv_writer.write_record([
                entry.account.account_number.to_string(),
                entry.account.provider.as_str().to_string(),
                entry.account.alias.clone().unwrap_or_default(),
                entry.active_year.to_string(),
                pending.to_string(),
                entry.total_debt.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(summary.accounts.len())
    }

    pub fn snapshot(&self) -> Result<DirectorySnapshot> {
        let accounts = self.service.list_accounts(self.session)?.to_vec();
        let summaries = self.service.summarize(self.session)?.accounts;

        Ok(DirectorySnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            owner: self.session.owner.clone(),
            accounts,
            summaries,
        })
    }

    pub fn export_full_json<W: Write>(&self, writer: W) -> Result<DirectorySnapshot> {
        let snapshot = self.snapshot()?;
        serde_json::to_writer_pretty(writer, &snapshot)?;
        Ok(snapshot)
    }
}
