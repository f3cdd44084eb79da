use std::collections::HashSet;

use super::{Bill, BillStatus, month_name};

/// A record that breaks one of the conventions bills are expected to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerIssue {
    DuplicatePeriod { month: u32, year: i32 },
    MonthOutOfRange { month: u32, year: i32 },
    MissingAmount { month: u32, year: i32, status: BillStatus },
    UnexpectedAmount { month: u32, year: i32 },
}

impl std::fmt::Display for LedgerIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let period = |month: u32, year: i32| match month_name(month) {
            Some(name) => format!("{} {}", name, year),
            None => format!("month {} of {}", month, year),
        };
        match self {
            LedgerIssue::DuplicatePeriod { month, year } => {
                write!(f, "{} appears more than once", period(*month, *year))
            }
            LedgerIssue::MonthOutOfRange { month, year } => {
                write!(f, "{} is not a valid month", period(*month, *year))
            }
            LedgerIssue::MissingAmount {
                month,
                year,
                status,
            } => write!(f, "{} is {} but has no amount", period(*month, *year), status),
            LedgerIssue::UnexpectedAmount { month, year } => {
                write!(f, "{} is future but carries an amount", period(*month, *year))
            }
        }
    }
}

/// Inspect a bill sequence without rejecting anything.
pub fn check_ledger(bills: &[Bill]) -> Vec<LedgerIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for bill in bills {
        let (month, year) = (bill.month, bill.year);

        if !(1..=12).contains(&month) {
            issues.push(LedgerIssue::MonthOutOfRange { month, year });
        }
        if !seen.insert((month, year)) {
            issues.push(LedgerIssue::DuplicatePeriod { month, year });
        }
        match (bill.status.expects_amount(), bill.amount) {
            (true, None) => issues.push(LedgerIssue::MissingAmount {
                month,
                year,
                status: bill.status,
            }),
            (false, Some(_)) => issues.push(LedgerIssue::UnexpectedAmount { month, year }),
            _ => {}
        }
    }

    issues
}
