pub mod config;
pub mod crm;
pub mod error;

pub use config::AppConfig;
pub use error::{PulseError, PulseResult};
