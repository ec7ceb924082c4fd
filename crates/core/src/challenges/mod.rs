//! Challenge domain model, repository contracts, and the sync service.

mod model;
mod service;
mod traits;

pub use model::*;
pub use service::*;
pub use traits::*;
