use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{AccountId, AccountNumber, Bill, BillStatus, Provider, ServiceAccount};

use super::MIGRATION_001_INITIAL;

/// Row counts used by the storage health check.
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub account_count: i64,
    pub bill_count: i64,
    pub orphan_bills: i64,
}

/// Persistent store for service accounts and their bills, partitioned by owner.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account operations
    // ========================

    /// Append an account, with its bills, to the end of the owner's list.
    pub async fn save_account(&self, owner: &str, account: &ServiceAccount) -> Result<()> {
        self.save_accounts(owner, std::slice::from_ref(account)).await
    }

    /// Append several accounts in one transaction. Either all of them are
    /// stored or none is.
    pub async fn save_accounts(&self, owner: &str, accounts: &[ServiceAccount]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        for account in accounts {
            Self::insert_account(&mut *tx, owner, account).await?;
        }

        tx.commit().await.context("Failed to commit accounts")?;
        Ok(())
    }

    async fn insert_account(
        conn: &mut SqliteConnection,
        owner: &str,
        account: &ServiceAccount,
    ) -> Result<()> {
        let position: i64 = sqlx::query(
            "SELECT COALESCE(MAX(position) + 1, 0) AS next FROM service_accounts WHERE owner = ?",
        )
        .bind(owner)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to compute account position")?
        .get("next");

        sqlx::query(
            r#"
            INSERT INTO service_accounts (id, owner, position, provider, account_number, alias, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.to_string())
        .bind(owner)
        .bind(position)
        .bind(account.provider.as_str())
        .bind(account.account_number.as_str())
        .bind(&account.alias)
        .bind(account.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .context("Failed to save service account")?;

        for bill in &account.bills {
            sqlx::query(
                r#"
                INSERT INTO bills (account_id, month, year, status, amount_cents)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(account.id.to_string())
            .bind(i64::from(bill.month))
            .bind(i64::from(bill.year))
            .bind(bill.status.as_str())
            .bind(bill.amount)
            .execute(&mut *conn)
            .await
            .with_context(|| {
                format!(
                    "Failed to save bill {}/{} for account {}",
                    bill.month, bill.year, account.account_number
                )
            })?;
        }

        debug!(account = %account.id, position, bills = account.bills.len(), "account stored");
        Ok(())
    }

    /// All accounts for an owner, in the order they were added.
    pub async fn list_accounts(&self, owner: &str) -> Result<Vec<ServiceAccount>> {
        let rows = sqlx::query(
            r#"
            SELECT id, provider, account_number, alias, created_at
            FROM service_accounts
            WHERE owner = ?
            ORDER BY position
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list service accounts")?;

        let mut accounts = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut account = Self::row_to_account(row)?;
            account.bills = self.list_bills(account.id).await?;
            accounts.push(account);
        }
        debug!(owner, count = accounts.len(), "accounts loaded");
        Ok(accounts)
    }

    pub async fn list_bills(&self, account_id: AccountId) -> Result<Vec<Bill>> {
        let rows = sqlx::query(
            r#"
            SELECT month, year, status, amount_cents
            FROM bills
            WHERE account_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(account_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list bills")?;

        rows.iter().map(Self::row_to_bill).collect()
    }

    pub async fn get_stats(&self) -> Result<StorageStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM service_accounts) AS account_count,
                (SELECT COUNT(*) FROM bills) AS bill_count,
                (SELECT COUNT(*) FROM bills
                    WHERE account_id NOT IN (SELECT id FROM service_accounts)) AS orphan_bills
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute storage stats")?;

        Ok(StorageStats {
            account_count: row.get("account_count"),
            bill_count: row.get("bill_count"),
            orphan_bills: row.get("orphan_bills"),
        })
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<ServiceAccount> {
        let id_str: String = row.get("id");
        let provider_str: String = row.get("provider");
        let number_str: String = row.get("account_number");
        let created_at_str: String = row.get("created_at");

        Ok(ServiceAccount {
            id: Uuid::parse_str(&id_str).context("Invalid account ID")?,
            provider: Provider::parse(&provider_str)
                .with_context(|| format!("Invalid provider: {}", provider_str))?,
            account_number: AccountNumber::parse(number_str.as_str())
                .with_context(|| format!("Invalid account number: {}", number_str))?,
            alias: row.get("alias"),
            bills: Vec::new(),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    fn row_to_bill(row: &sqlx::sqlite::SqliteRow) -> Result<Bill> {
        let month: i64 = row.get("month");
        let year: i64 = row.get("year");
        let status_str: String = row.get("status");

        Ok(Bill {
            month: u32::try_from(month).with_context(|| format!("Invalid month: {}", month))?,
            year: i32::try_from(year).with_context(|| format!("Invalid year: {}", year))?,
            status: BillStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid bill status: {}", status_str))?,
            amount: row.get("amount_cents"),
        })
    }
}
