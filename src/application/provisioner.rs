use std::sync::Arc;

use crate::domain::{AccountNumber, BillSchedule, DefaultSchedule, Provider, ServiceAccount};

use super::{Clock, SystemClock};

/// Builds new service accounts with their initial bill schedule.
///
/// Inputs arrive already validated: `AccountNumber` can only be built through
/// its parser and `Provider` is a closed enum.
pub struct AccountProvisioner {
    schedule: Box<dyn BillSchedule>,
    clock: Arc<dyn Clock>,
}

impl AccountProvisioner {
    pub fn new(schedule: Box<dyn BillSchedule>, clock: Arc<dyn Clock>) -> Self {
        Self { schedule, clock }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Provision for the clock's current year.
    pub fn provision(
        &self,
        provider: Provider,
        account_number: AccountNumber,
        alias: Option<String>,
    ) -> ServiceAccount {
        self.provision_for_year(provider, account_number, alias, self.clock.current_year())
    }

    pub fn provision_for_year(
        &self,
        provider: Provider,
        account_number: AccountNumber,
        alias: Option<String>,
        year: i32,
    ) -> ServiceAccount {
        let mut account =
            ServiceAccount::new(provider, account_number).with_bills(self.schedule.build(year));
        account.created_at = self.clock.now();

        // A blank alias from a form field means no alias
        if let Some(alias) = alias.filter(|a| !a.trim().is_empty()) {
            account = account.with_alias(alias);
        }
        account
    }
}

impl Default for AccountProvisioner {
    fn default() -> Self {
        Self::new(Box::new(DefaultSchedule::new()), Arc::new(SystemClock))
    }
}
