mod common;

use anyhow::Result;
use billtrack::io::{DirectorySnapshot, Exporter};
use common::{TEST_USER, sign_in, test_service};

#[tokio::test]
async fn test_export_bills_csv() -> Result<()> {
    let (mut service, _temp) = test_service(2026).await?;
    let session = sign_in(&mut service).await?;
    service.seed_demo(&session, Some(2026)).await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service, &session).export_bills_csv(&mut buffer)?;
    assert_eq!(count, 36);

    let text = String::from_utf8(buffer)?;
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("account_number,month,year,status,amount_cents")
    );
    assert_eq!(lines.next(), Some("1234567,1,2026,paid,15000"));
    assert!(text.contains("1234567,5,2026,future,\n"));

    Ok(())
}

#[tokio::test]
async fn test_export_summary_csv() -> Result<()> {
    let (mut service, _temp) = test_service(2026).await?;
    let session = sign_in(&mut service).await?;
    service.seed_demo(&session, Some(2026)).await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service, &session).export_summary_csv(&mut buffer)?;
    assert_eq!(count, 3);

    let text = String::from_utf8(buffer)?;
    assert!(text.contains("1234567,AYSAM,Home Water,2026,2,32000"));
    assert!(text.contains("9876543,ECOGAS_CUYANA,Home Gas,2026,2,44500"));
    assert!(text.contains("5555555,EDEMSA,Home Electricity,2026,1,34000"));

    Ok(())
}

#[tokio::test]
async fn test_export_accounts_csv() -> Result<()> {
    let (mut service, _temp) = test_service(2026).await?;
    let session = sign_in(&mut service).await?;
    service
        .add_account(&session, "gas", "AB-77", None, None)
        .await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service, &session).export_accounts_csv(&mut buffer)?;
    assert_eq!(count, 1);

    let text = String::from_utf8(buffer)?;
    assert!(text.contains(",ECOGAS_CUYANA,gas,AB-77,,12"));

    Ok(())
}

#[tokio::test]
async fn test_full_json_snapshot() -> Result<()> {
    let (mut service, _temp) = test_service(2026).await?;
    let session = sign_in(&mut service).await?;
    service.seed_demo(&session, Some(2026)).await?;

    let mut buffer = Vec::new();
    Exporter::new(&service, &session).export_full_json(&mut buffer)?;

    let snapshot: DirectorySnapshot = serde_json::from_slice(&buffer)?;
    assert_eq!(snapshot.owner, TEST_USER);
    assert_eq!(snapshot.accounts.len(), 3);
    assert_eq!(snapshot.summaries.len(), 3);
    assert_eq!(snapshot.summaries[1].total_debt, 44500);
    assert_eq!(snapshot.accounts[0].bills[2].amount, Some(15500));

    Ok(())
}
