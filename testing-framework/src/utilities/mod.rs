// File: testing-framework/src/utilities/mod.rs
//
// Testing Utilities
//
// Helpers shared by nodes and chains: fixed-interval retries, log setup for
// test binaries and the opt-in genesis export used to debug chain startup.

/// Fixed-interval retry of fallible async operations
pub mod retry;

/// env_logger setup for test binaries
pub mod logging;

/// Writes a chain's final genesis to a host path when asked to via env vars
pub mod genesis_export;

/// Random identifiers for job containers and rollapp aliases
pub mod random;

pub use genesis_export::{export_genesis, export_genesis_from_env};
pub use logging::init_test_logging;
pub use random::random_lowercase;
pub use retry::retry_fixed;
