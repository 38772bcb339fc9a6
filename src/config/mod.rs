//! Configuration module for linkpulse
//!
//! Configuration comes from environment variables (with `.env` support at the
//! binary edge), not from a config file: the checker is designed to run inside
//! CI schedulers where secrets and endpoints arrive through the environment.
//!
//! # Example
//!
//! ```no_run
//! use linkpulse::config::from_env;
//!
//! let config = from_env().unwrap();
//! println!("Checking links from: {}", config.source);
//! ```

mod env;
mod types;
mod validation;

// Re-export types
pub use types::{CheckerConfig, Config, OutputConfig, StatusApiConfig};

// Re-export loader functions
pub use env::{from_env, from_lookup};
pub use validation::validate;
