mod repository;

pub use repository::*;

/// SQL migration for service accounts and their bills
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
