// Application layer - use cases and orchestration over the pure domain.

mod clock;
mod demo;
mod directory;
pub mod error;
mod provisioner;
mod service;
mod summary;

pub use clock::*;
pub use demo::*;
pub use directory::*;
pub use error::*;
pub use provisioner::*;
pub use service::*;
pub use summary::*;
