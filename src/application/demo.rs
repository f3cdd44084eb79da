use crate::domain::{
    AccountNumber, AccountNumberError, Bill, BillStatus, Cents, Provider, ServiceAccount,
};

/// Sample accounts for a fresh install, one per provider.
///
/// Paid and pending amounts per month; the rest of the year is future.
const DEMO_ACCOUNTS: [(Provider, &str, &str, &[Cents], &[Cents]); 3] = [
    (
        Provider::Aysam,
        "1234567",
        "Home Water",
        &[15000, 16000],
        &[15500, 16500],
    ),
    (
        Provider::EcogasCuyana,
        "9876543",
        "Home Gas",
        &[20000, 21500, 21000],
        &[22000, 22500],
    ),
    (
        Provider::Edemsa,
        "5555555",
        "Home Electricity",
        &[30000, 32000, 31000, 33000],
        &[34000],
    ),
];

fn demo_bills(year: i32, paid: &[Cents], pending: &[Cents]) -> Vec<Bill> {
    let amounts = paid
        .iter()
        .map(|a| (BillStatus::Paid, Some(*a)))
        .chain(pending.iter().map(|a| (BillStatus::Pending, Some(*a))))
        .chain(std::iter::repeat((BillStatus::Future, None)));

    (1..=12)
        .zip(amounts)
        .map(|(month, (status, amount))| Bill {
            month,
            year,
            status,
            amount,
        })
        .collect()
}

pub fn demo_accounts(year: i32) -> Result<Vec<ServiceAccount>, AccountNumberError> {
    DEMO_ACCOUNTS
        .iter()
        .map(
            |(provider, number, alias, paid, pending)| -> Result<_, AccountNumberError> {
                Ok(ServiceAccount::new(*provider, AccountNumber::parse(*number)?)
                    .with_alias(*alias)
                    .with_bills(demo_bills(year, paid, pending)))
            },
        )
        .collect()
}
