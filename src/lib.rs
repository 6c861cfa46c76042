pub mod config;
pub mod dnssec;
pub mod error;
pub mod monitor;
pub mod resolver_config;
pub mod zone;

pub use error::{Error, Result};
pub use zone::{ResourceRecord, ZoneReader};
