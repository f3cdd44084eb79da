// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use billtrack::application::{AccountProvisioner, BillingService, FixedClock, Session};
use billtrack::domain::{DefaultSchedule, FlatSchedule};
use tempfile::TempDir;

pub const TEST_USER: &str = "ana@example.com";

/// Service over a temporary database with a clock pinned to `year` and
/// reproducible starter amounts.
pub async fn test_service(year: i32) -> Result<(BillingService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let provisioner = AccountProvisioner::new(
        Box::new(DefaultSchedule::seeded(2026)),
        Arc::new(FixedClock::at_year(year)),
    );
    let service = BillingService::init(db_path.to_str().unwrap())
        .await?
        .with_provisioner(provisioner);
    Ok((service, temp_dir))
}

/// Same as `test_service`, but every paid and pending starter bill is `amount`.
pub async fn flat_service(year: i32, amount: i64) -> Result<(BillingService, TempDir)> {
    let (service, temp_dir) = test_service(year).await?;
    let provisioner = AccountProvisioner::new(
        Box::new(FlatSchedule::new(amount)),
        Arc::new(FixedClock::at_year(year)),
    );
    Ok((service.with_provisioner(provisioner), temp_dir))
}

/// Reconnect to the same database file, as a later CLI invocation would.
pub async fn reopen(temp_dir: &TempDir, year: i32) -> Result<BillingService> {
    let db_path = temp_dir.path().join("test.db");
    let provisioner = AccountProvisioner::new(
        Box::new(DefaultSchedule::seeded(1)),
        Arc::new(FixedClock::at_year(year)),
    );
    Ok(BillingService::connect(db_path.to_str().unwrap())
        .await?
        .with_provisioner(provisioner))
}

pub async fn sign_in(service: &mut BillingService) -> Result<Session> {
    Ok(service.sign_in(Some(TEST_USER)).await?)
}
