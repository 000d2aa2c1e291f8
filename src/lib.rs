pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod types;
pub mod views;

pub use api::BankClient;
pub use config::Config;
pub use db::{Bank, BankStorage, ConnectionManager};
pub use error::RegistryError;
pub use router::{RegistryState, registry_router};
