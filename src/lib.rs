//! Per-network config validation and supply refresh tooling
//!
//! Checks the hand-maintained config documents against live chain state
//! before they ship, and refreshes the derived IBC supply figures from
//! CoinGecko market data.

pub mod chain;
pub mod config;
pub mod outcome;
pub mod supply;
pub mod types;
pub mod validation;
