pub mod catalog;
pub mod config;
pub mod error;
pub mod profile;
pub mod types;

pub use catalog::{DeliveryMethod, CATALOG};
pub use config::AdvisorConfig;
pub use error::{CoreError, Result};
pub use profile::BusinessProfile;
pub use types::{Metadata, Record};
