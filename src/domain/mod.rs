mod account;
mod bill;
mod integrity;
mod ledger;
mod money;
mod schedule;

pub use account::*;
pub use bill::*;
pub use integrity::*;
pub use ledger::*;
pub use money::*;
pub use schedule::*;
