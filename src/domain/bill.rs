use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cents, format_amount};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short English name for a 1-based month, or `None` outside 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Settled
    Paid,
    /// Issued and owed now
    Pending,
    /// Not yet issued, carries no amount by convention
    Future,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Paid => "paid",
            BillStatus::Pending => "pending",
            BillStatus::Future => "future",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "paid" => Some(BillStatus::Paid),
            "pending" => Some(BillStatus::Pending),
            "future" => Some(BillStatus::Future),
            _ => None,
        }
    }

    /// Whether a bill in this status is expected to carry an amount.
    pub fn expects_amount(&self) -> bool {
        !matches!(self, BillStatus::Future)
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillError {
    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Bill amount cannot be negative: {0}")]
    NegativeAmount(Cents),
}

/// One month's billing record for a single service account.
///
/// Status and amount are deliberately not coupled by the type: a pending bill
/// may lack an amount and a future bill may carry one. `check_ledger` reports
/// such records instead of rejecting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// 1-12
    pub month: u32,
    pub year: i32,
    pub status: BillStatus,
    pub amount: Option<Cents>,
}

impl Bill {
    pub fn new(
        month: u32,
        year: i32,
        status: BillStatus,
        amount: Option<Cents>,
    ) -> Result<Self, BillError> {
        if !(1..=12).contains(&month) {
            return Err(BillError::InvalidMonth(month));
        }
        if let Some(cents) = amount.filter(|cents| *cents < 0) {
            return Err(BillError::NegativeAmount(cents));
        }
        Ok(Self {
            month,
            year,
            status,
            amount,
        })
    }

    pub fn paid(month: u32, year: i32, amount: Cents) -> Result<Self, BillError> {
        Self::new(month, year, BillStatus::Paid, Some(amount))
    }

    pub fn pending(month: u32, year: i32, amount: Cents) -> Result<Self, BillError> {
        Self::new(month, year, BillStatus::Pending, Some(amount))
    }

    pub fn future(month: u32, year: i32) -> Result<Self, BillError> {
        Self::new(month, year, BillStatus::Future, None)
    }

    pub fn is_pending(&self) -> bool {
        self.status == BillStatus::Pending
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month).unwrap_or("???")
    }

    /// Hover text for a bill cell, e.g. `Mar 2026: PENDING - $155.00`.
    pub fn label(&self) -> String {
        let mut label = format!(
            "{} {}: {}",
            self.month_name(),
            self.year,
            self.status.as_str().to_uppercase()
        );
        if let Some(amount) = self.amount {
            label.push_str(" - ");
            label.push_str(&format_amount(amount));
        }
        label
    }
}
