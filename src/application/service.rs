use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{AccountNumber, Provider, ServiceAccount, check_ledger};
use crate::storage::{Repository, StorageStats};

use super::{
    AccountIssues, AccountProvisioner, AccountSummary, AppError, Clock, DirectorySummary,
    LedgerDirectory, SessionId, demo_accounts, summarize_account, summarize_directory,
};

/// A signed-in user's handle on the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub owner: String,
}

/// Application service: the entry point for any client (CLI, API, UI).
///
/// Holds the per-session directory in memory and writes new accounts through
/// to the repository.
pub struct BillingService {
    repo: Repository,
    directory: LedgerDirectory,
    provisioner: AccountProvisioner,
}

impl BillingService {
    pub fn new(repo: Repository, provisioner: AccountProvisioner) -> Self {
        Self {
            repo,
            directory: LedgerDirectory::new(),
            provisioner,
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo, AccountProvisioner::default()))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo, AccountProvisioner::default()))
    }

    pub fn with_provisioner(mut self, provisioner: AccountProvisioner) -> Self {
        self.provisioner = provisioner;
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        self.provisioner.clock()
    }

    pub fn current_year(&self) -> i32 {
        self.clock().current_year()
    }

    // ========================
    // Session operations
    // ========================

    /// Open a session for an authenticated user, loading their accounts.
    ///
    /// `user` is the identity signal from the caller; `None` or a blank value
    /// means nobody is signed in.
    pub async fn sign_in(&mut self, user: Option<&str>) -> Result<Session, AppError> {
        let owner = user
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(AppError::NotAuthenticated)?
            .to_string();

        let accounts = self.repo.list_accounts(&owner).await?;
        let count = accounts.len();
        let id = self.directory.open_with(accounts);
        info!(session = %id, owner = %owner, accounts = count, "session opened");

        Ok(Session { id, owner })
    }

    /// Discard the session's in-memory accounts. Stored data is untouched.
    pub fn sign_out(&mut self, session: &Session) -> bool {
        let closed = self.directory.close(session.id);
        if closed {
            info!(session = %session.id, owner = %session.owner, "session closed");
        }
        closed
    }

    // ========================
    // Account operations
    // ========================

    /// Validate raw input, provision the account, persist it and append it to
    /// the session's directory.
    pub async fn add_account(
        &mut self,
        session: &Session,
        provider: &str,
        account_number: &str,
        alias: Option<String>,
        year: Option<i32>,
    ) -> Result<ServiceAccount, AppError> {
        let provider = Provider::parse(provider)?;
        let account_number = AccountNumber::parse(account_number)?;
        self.provision(session, provider, account_number, alias, year)
            .await
    }

    /// Provision from already validated input.
    pub async fn provision(
        &mut self,
        session: &Session,
        provider: Provider,
        account_number: AccountNumber,
        alias: Option<String>,
        year: Option<i32>,
    ) -> Result<ServiceAccount, AppError> {
        self.ensure_open(session)?;

        let account = match year {
            Some(year) => {
                self.provisioner
                    .provision_for_year(provider, account_number, alias, year)
            }
            None => self.provisioner.provision(provider, account_number, alias),
        };

        self.store(session, account.clone()).await?;
        info!(
            account = %account.account_number,
            provider = %account.provider,
            "service account provisioned"
        );
        Ok(account)
    }

    /// Load the sample accounts into the session. They are stored together, so
    /// a failed seed leaves neither the database nor the session changed.
    pub async fn seed_demo(
        &mut self,
        session: &Session,
        year: Option<i32>,
    ) -> Result<Vec<ServiceAccount>, AppError> {
        self.ensure_open(session)?;
        let year = year.unwrap_or_else(|| self.current_year());

        let accounts = demo_accounts(year)?;
        self.repo.save_accounts(&session.owner, &accounts).await?;
        for account in &accounts {
            self.directory.add(session.id, account.clone())?;
        }
        info!(count = accounts.len(), year, "demo accounts seeded");
        Ok(accounts)
    }

    pub fn list_accounts(&self, session: &Session) -> Result<&[ServiceAccount], AppError> {
        self.directory.list(session.id)
    }

    /// First account in the session with the given number.
    pub fn find_account(
        &self,
        session: &Session,
        account_number: &str,
    ) -> Result<&ServiceAccount, AppError> {
        self.list_accounts(session)?
            .iter()
            .find(|a| a.account_number.as_str() == account_number)
            .ok_or_else(|| AppError::AccountNotFound(account_number.to_string()))
    }

    // ========================
    // Presentation
    // ========================

    pub fn summarize_account(
        &self,
        session: &Session,
        account_number: &str,
    ) -> Result<AccountSummary, AppError> {
        let account = self.find_account(session, account_number)?;
        let summary = summarize_account(account, self.current_year());
        debug!(
            account = %account.account_number,
            active_year = summary.active_year,
            debt = summary.total_debt,
            "active period resolved"
        );
        Ok(summary)
    }

    pub fn summarize(&self, session: &Session) -> Result<DirectorySummary, AppError> {
        let accounts = self.list_accounts(session)?;
        let summary = summarize_directory(accounts, self.current_year());
        debug!(
            accounts = summary.accounts.len(),
            debt = summary.total_debt,
            "directory summarized"
        );
        Ok(summary)
    }

    // ========================
    // Integrity
    // ========================

    /// Accounts whose bills break a convention. Clean accounts are omitted.
    pub fn check(&self, session: &Session) -> Result<Vec<AccountIssues>, AppError> {
        let report: Vec<AccountIssues> = self
            .list_accounts(session)?
            .iter()
            .filter_map(|account| {
                let issues = check_ledger(&account.bills);
                (!issues.is_empty()).then(|| AccountIssues {
                    account: account.clone(),
                    issues,
                })
            })
            .collect();

        for entry in &report {
            warn!(
                account = %entry.account.account_number,
                issues = entry.issues.len(),
                "inconsistent bill data"
            );
        }
        Ok(report)
    }

    pub async fn storage_stats(&self) -> Result<StorageStats, AppError> {
        Ok(self.repo.get_stats().await?)
    }

    fn ensure_open(&self, session: &Session) -> Result<(), AppError> {
        if self.directory.is_open(session.id) {
            Ok(())
        } else {
            Err(AppError::SessionNotOpen(session.id))
        }
    }

    async fn store(&mut self, session: &Session, account: ServiceAccount) -> Result<(), AppError> {
        self.repo.save_account(&session.owner, &account).await?;
        self.directory.add(session.id, account)
    }
}
