use std::collections::BTreeSet;

use super::{Bill, Cents};

/// Read-only projections over the bills of one service account.
#[derive(Debug, Clone, Copy)]
pub struct Ledger<'a> {
    bills: &'a [Bill],
}

impl<'a> Ledger<'a> {
    pub fn new(bills: &'a [Bill]) -> Self {
        Self { bills }
    }

    /// Distinct years across all bills, ascending.
    pub fn years_present(&self) -> Vec<i32> {
        self.bills
            .iter()
            .map(|bill| bill.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Bills issued in `year`, ordered by month.
    pub fn bills_for_year(&self, year: i32) -> Vec<&'a Bill> {
        let mut bills: Vec<&Bill> = self.bills.iter().filter(|b| b.year == year).collect();
        bills.sort_by_key(|b| b.month);
        bills
    }

    /// Pick the year to present for this ledger.
    ///
    /// The earliest year that still has a pending bill wins. When nothing is
    /// pending the latest year is shown, and an empty ledger falls back to
    /// `current_year`.
    pub fn active_year(&self, current_year: i32) -> i32 {
        let years = self.years_present();
        let Some(&latest) = years.last() else {
            return current_year;
        };

        years
            .into_iter()
            .find(|&year| self.bills_for_year(year).iter().any(|b| b.is_pending()))
            .unwrap_or(latest)
    }

    /// Outstanding debt for the active year only.
    pub fn active_period_debt(&self, current_year: i32) -> (i32, Cents) {
        let year = self.active_year(current_year);
        (year, total_debt(self.bills_for_year(year)))
    }
}

/// Select the active year for a bill sequence. See [`Ledger::active_year`].
pub fn resolve_active_year(bills: &[Bill], current_year: i32) -> i32 {
    Ledger::new(bills).active_year(current_year)
}

/// Sum of amounts over pending bills. Bills without an amount count as zero
/// and every other status is ignored, whatever amount it carries. Saturates at
/// `Cents::MAX` instead of overflowing.
pub fn total_debt<'a, I>(bills: I) -> Cents
where
    I: IntoIterator<Item = &'a Bill>,
{
    bills
        .into_iter()
        .filter(|bill| bill.is_pending())
        .filter_map(|bill| bill.amount)
        .fold(0, Cents::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BillStatus;

    fn year_of(year: i32, statuses: &[BillStatus]) -> Vec<Bill> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let amount = status.expects_amount().then_some(10000 + i as Cents * 100);
                Bill::new(i as u32 + 1, year, *status, amount).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_years_present_sorted_and_deduplicated() {
        let mut bills = year_of(2027, &[BillStatus::Future; 3]);
        bills.extend(year_of(2025, &[BillStatus::Paid; 2]));
        bills.extend(year_of(2026, &[BillStatus::Paid; 2]));

        assert_eq!(Ledger::new(&bills).years_present(), vec![2025, 2026, 2027]);
        assert!(Ledger::new(&[]).years_present().is_empty());
    }

    #[test]
    fn test_bills_for_year_orders_by_month() {
        let bills = vec![
            Bill::future(5, 2026).unwrap(),
            Bill::paid(1, 2026, 100).unwrap(),
            Bill::future(1, 2027).unwrap(),
            Bill::pending(3, 2026, 200).unwrap(),
        ];

        let months: Vec<u32> = Ledger::new(&bills)
            .bills_for_year(2026)
            .iter()
            .map(|b| b.month)
            .collect();
        assert_eq!(months, vec![1, 3, 5]);
        assert!(Ledger::new(&bills).bills_for_year(2030).is_empty());
    }

    #[test]
    fn test_active_year_prefers_earliest_pending() {
        let mut bills = year_of(2027, &[BillStatus::Pending, BillStatus::Future]);
        bills.extend(year_of(2026, &[BillStatus::Paid, BillStatus::Pending]));
        bills.extend(year_of(2028, &[BillStatus::Pending]));

        assert_eq!(resolve_active_year(&bills, 2030), 2026);
    }

    #[test]
    fn test_active_year_without_pending_is_latest() {
        let mut bills = year_of(2026, &[BillStatus::Paid; 12]);
        bills.extend(year_of(2027, &[BillStatus::Paid, BillStatus::Future]));

        assert_eq!(resolve_active_year(&bills, 2020), 2027);
    }

    #[test]
    fn test_active_year_all_future_is_latest() {
        let mut bills = year_of(2026, &[BillStatus::Future; 12]);
        bills.extend(year_of(2025, &[BillStatus::Future; 12]));

        assert_eq!(resolve_active_year(&bills, 2024), 2026);
    }

    #[test]
    fn test_active_year_empty_falls_back_to_current() {
        assert_eq!(resolve_active_year(&[], 2026), 2026);
    }

    #[test]
    fn test_rollover_into_next_year() {
        let mut bills = year_of(2026, &[BillStatus::Paid; 12]);
        bills.push(Bill::pending(1, 2027, 15000).unwrap());
        bills.push(Bill::pending(2, 2027, 16500).unwrap());
        for month in 3..=12 {
            bills.push(Bill::future(month, 2027).unwrap());
        }

        let ledger = Ledger::new(&bills);
        assert_eq!(ledger.active_year(2026), 2027);
        assert_eq!(total_debt(ledger.bills_for_year(2027)), 31500);
        assert_eq!(ledger.active_period_debt(2026), (2027, 31500));
    }

    #[test]
    fn test_total_debt_counts_only_pending_amounts() {
        let bills = vec![
            Bill::paid(1, 2026, 15000).unwrap(),
            Bill::pending(2, 2026, 15500).unwrap(),
            Bill::pending(3, 2026, 16500).unwrap(),
            Bill::new(4, 2026, BillStatus::Pending, None).unwrap(),
            Bill::new(5, 2026, BillStatus::Future, Some(99999)).unwrap(),
        ];

        assert_eq!(total_debt(&bills), 32000);
    }

    #[test]
    fn test_total_debt_empty_is_zero() {
        let none: Vec<Bill> = Vec::new();
        assert_eq!(total_debt(&none), 0);
    }

    #[test]
    fn test_total_debt_saturates_on_huge_amounts() {
        let huge = Cents::MAX / 2 + 1;
        let bills = vec![
            Bill::pending(1, 2026, huge).unwrap(),
            Bill::pending(2, 2026, huge).unwrap(),
        ];

        assert_eq!(total_debt(&bills), Cents::MAX);
        assert_eq!(Ledger::new(&bills).active_period_debt(2026), (2026, Cents::MAX));
    }
}
