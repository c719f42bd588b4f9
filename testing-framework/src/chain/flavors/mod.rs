// File: testing-framework/src/chain/flavors/mod.rs
//
// Concrete chain flavors. Each one is a small hook object; the shared
// pipeline lives in `Chain`.

mod celes_hub;
mod dym_hub;
mod dym_rollapp;
mod gm_rollapp;

pub use celes_hub::CelesHub;
pub use dym_hub::{genesis_accounts_file, DymHub, DENOM_METADATA_FILE, SEQUENCER_BOND_AMOUNT};
pub use dym_rollapp::{DymRollApp, NATIVE_DENOM_FILE, SEQUENCER_METADATA_FILE};
pub use gm_rollapp::{GmRollApp, DEFAULT_DA_NAMESPACE};
