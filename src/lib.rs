//! Cauldron borrow tooling.
//!
//! Reads a Cauldron/BentoBox market, turns the raw fixed-point values into readable
//! borrow figures, and builds the `cook` batch (approve, deposit, add collateral,
//! borrow, withdraw) that opens a position in one transaction.
//!
//! The pure layers (`math`, `cook`, `approval`) never touch the network. `contracts`
//! and `harness` wrap the remote reads and writes.

pub mod approval;
pub mod contracts;
pub mod cook;
pub mod error;
pub mod harness;
pub mod math;
pub mod utils;

pub mod config {
    pub mod deployment;
}
