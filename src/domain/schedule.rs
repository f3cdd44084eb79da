use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Bill, BillStatus, Cents};

/// Months in a default schedule that start out settled.
pub const PAID_MONTHS: u32 = 2;
/// Months after the settled ones that start out owed.
pub const PENDING_MONTHS: u32 = 2;

/// Produces the initial bills for a newly provisioned account.
///
/// Stands in for a real billing-sync integration; implementations only
/// decide what a fresh account shows before real data arrives.
pub trait BillSchedule: Send + Sync {
    fn build(&self, year: i32) -> Vec<Bill>;
}

fn status_for_month(month: u32) -> BillStatus {
    if month <= PAID_MONTHS {
        BillStatus::Paid
    } else if month <= PAID_MONTHS + PENDING_MONTHS {
        BillStatus::Pending
    } else {
        BillStatus::Future
    }
}

fn layout(year: i32, mut amount_for: impl FnMut() -> Cents) -> Vec<Bill> {
    (1..=12)
        .map(|month| {
            let status = status_for_month(month);
            let amount = status.expects_amount().then(&mut amount_for);
            Bill {
                month,
                year,
                status,
                amount,
            }
        })
        .collect()
}

/// Two paid months, two pending, eight future. Paid and pending amounts are
/// random whole values between 100 and 399.
pub struct DefaultSchedule {
    rng: Mutex<StdRng>,
}

impl DefaultSchedule {
    pub const MIN_UNITS: i64 = 100;
    pub const MAX_UNITS: i64 = 399;

    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic amounts, for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for DefaultSchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl BillSchedule for DefaultSchedule {
    fn build(&self, year: i32) -> Vec<Bill> {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        layout(year, || {
            rng.gen_range(Self::MIN_UNITS..=Self::MAX_UNITS) * 100
        })
    }
}

/// Same layout as [`DefaultSchedule`] with one fixed amount for every billed month.
#[derive(Debug, Clone, Copy)]
pub struct FlatSchedule {
    pub amount: Cents,
}

impl FlatSchedule {
    pub fn new(amount: Cents) -> Self {
        Self { amount }
    }
}

impl BillSchedule for FlatSchedule {
    fn build(&self, year: i32) -> Vec<Bill> {
        layout(year, || self.amount)
    }
}
