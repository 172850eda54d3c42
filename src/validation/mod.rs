//! Validation engine
//!
//! Composes the pure check primitives against a network's config document and
//! the reference data queried from the chain. Every set-based check runs
//! regardless of prior failures, so one pass surfaces the complete list of
//! violations for a network. The engine returns violations as values; logging
//! and outcome bookkeeping belong to the caller.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

pub mod checks;

use crate::chain::Network;
use crate::config::NetworkConfig;
use checks::{duplicate_entries, invalid_entries, overlapping_entries};

/// Chain name accepted under transfer_options in addition to bridged chains
pub const NATIVE_CHAIN: &str = "Carbon";

/// Identifier universes the config fields are checked against. Immutable for
/// the duration of one network's validation pass.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub markets: Vec<String>,
    pub pools: Vec<String>,
    pub tokens: Vec<String>,
    pub bridge_chains: Vec<String>,
    pub fee_denoms: Vec<String>,
    pub perp_pool_ids: Vec<String>,
}

/// How to scan promo records for time-order violations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoScan {
    /// Stop at the first bad promo record
    FailFast,
    /// Report every bad promo record
    Exhaustive,
}

/// A single validation failure, naming the network, the offending config
/// field, and the exact offending values
#[derive(Debug, Clone)]
pub struct Violation {
    pub network: Network,
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(network: Network, field: &'static str, message: String) -> Self {
        Self {
            network,
            field,
            message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Run every check for one network. Checks are independent: a failing check
/// never prevents the remaining checks from running. The one exception is the
/// promo time-order scan, whose short-circuit behavior is selected explicitly
/// via `promo_scan`.
pub fn validate_config(
    network: Network,
    config: &NetworkConfig,
    refs: &ReferenceData,
    promo_scan: PromoScan,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Pre-launch markets: must exist, no repeats, never blacklisted
    let invalid = invalid_entries(&config.prelaunch_markets, &refs.markets);
    if invalid.failed() {
        violations.push(Violation::new(
            network,
            "prelaunch_markets",
            format!(
                "{}.json has the following invalid pre-launch market entries: {}. Please make sure to only input valid markets in {}",
                network,
                invalid.entries_list(),
                network
            ),
        ));
    }

    let duplicates = duplicate_entries(&config.prelaunch_markets);
    if duplicates.failed() {
        violations.push(Violation::new(
            network,
            "prelaunch_markets",
            format!(
                "{}.json has the following duplicated pre-launch market entries: {}. Please make sure to only input each market once in {}",
                network,
                duplicates.entries_list(),
                network
            ),
        ));
    }

    let overlapping = overlapping_entries(&config.prelaunch_markets, &config.blacklisted_markets);
    if overlapping.failed() {
        violations.push(Violation::new(
            network,
            "prelaunch_markets",
            format!(
                "{}.json has the following blacklisted market entries in pre-launch markets entries: {}. Please make sure that blacklisted markets are not found in pre-launch markets in {}",
                network,
                overlapping.entries_list(),
                network
            ),
        ));
    }

    // Blacklisted markets: must exist, no repeats
    let invalid = invalid_entries(&config.blacklisted_markets, &refs.markets);
    if invalid.failed() {
        violations.push(Violation::new(
            network,
            "blacklisted_markets",
            format!(
                "{}.json has the following invalid blacklisted market entries: {}. Please make sure to only input valid markets in {}",
                network,
                invalid.entries_list(),
                network
            ),
        ));
    }

    let duplicates = duplicate_entries(&config.blacklisted_markets);
    if duplicates.failed() {
        violations.push(Violation::new(
            network,
            "blacklisted_markets",
            format!(
                "{}.json has the following duplicated blacklisted market entries: {}. Please make sure to only input each market once in {}",
                network,
                duplicates.entries_list(),
                network
            ),
        ));
    }

    // Blacklisted pools: must exist, no repeats
    let invalid = invalid_entries(&config.blacklisted_pools, &refs.pools);
    if invalid.failed() {
        violations.push(Violation::new(
            network,
            "blacklisted_pools",
            format!(
                "{}.json has the following invalid pool id entries: {}. Please make sure to only input valid pool id in {}",
                network,
                invalid.entries_list(),
                network
            ),
        ));
    }

    let duplicates = duplicate_entries(&config.blacklisted_pools);
    if duplicates.failed() {
        violations.push(Violation::new(
            network,
            "blacklisted_pools",
            format!(
                "{}.json has the following duplicated pool id entries: {}. Please make sure to input each pool id only once in {}",
                network,
                duplicates.entries_list(),
                network
            ),
        ));
    }

    // Blacklisted tokens: must exist, no repeats
    let invalid = invalid_entries(&config.blacklisted_tokens, &refs.tokens);
    if invalid.failed() {
        violations.push(Violation::new(
            network,
            "blacklisted_tokens",
            format!(
                "{}.json has the following invalid token denom entries: {}. Please make sure to only input valid token denom in {}",
                network,
                invalid.entries_list(),
                network
            ),
        ));
    }

    let duplicates = duplicate_entries(&config.blacklisted_tokens);
    if duplicates.failed() {
        violations.push(Violation::new(
            network,
            "blacklisted_tokens",
            format!(
                "{}.json has the following duplicated token denom entries: {}. Please make sure to input each token denom only once in {}",
                network,
                duplicates.entries_list(),
                network
            ),
        ));
    }

    // Transfer options: keys must be bridged chains or the native chain
    let transfer_chains: Vec<String> = config.transfer_options.keys().cloned().collect();
    let mut valid_chains = refs.bridge_chains.clone();
    valid_chains.push(NATIVE_CHAIN.to_string());

    let invalid = invalid_entries(&transfer_chains, &valid_chains);
    if invalid.failed() {
        violations.push(Violation::new(
            network,
            "transfer_options",
            format!(
                "{}.json has the following chain name entries under transfer_options field: {}. Please make sure to only input valid chain names in {}",
                network,
                invalid.entries_list(),
                network
            ),
        ));
    }

    // Network fees: keys must have a configured minimum gas price
    let fee_denoms: Vec<String> = config.network_fees.keys().cloned().collect();
    let invalid = invalid_entries(&fee_denoms, &refs.fee_denoms);
    if invalid.failed() {
        violations.push(Violation::new(
            network,
            "network_fees",
            format!(
                "{}.json has the following network fee token denoms under network_fees field: {}. Please make sure to only input valid network fee token denoms in {}",
                network,
                invalid.entries_list(),
                network
            ),
        ));
    }

    // Perp pool banners: one banner per existing pool
    let banner_ids: Vec<String> = config
        .perp_pool_banners
        .iter()
        .map(|banner| banner.perp_pool_id.clone())
        .collect();

    let invalid = invalid_entries(&banner_ids, &refs.perp_pool_ids);
    if invalid.failed() {
        violations.push(Violation::new(
            network,
            "perp_pool_banners",
            format!(
                "{}.json has the following invalid perp pool ids under the perp_pool_banners field: {}",
                network,
                invalid.entries_list()
            ),
        ));
    }

    let duplicates = duplicate_entries(&banner_ids);
    if duplicates.failed() {
        violations.push(Violation::new(
            network,
            "perp_pool_banners",
            format!(
                "{}.json has duplicated perp pool banners for the following perp pool ids: {}. Please make sure to input each perp pool banner only once in {}",
                network,
                duplicates.entries_list(),
                network
            ),
        ));
    }

    // Perp pool promos: one promo per existing pool
    let promo_ids: Vec<String> = config.perp_pool_promo.keys().cloned().collect();

    let invalid = invalid_entries(&promo_ids, &refs.perp_pool_ids);
    if invalid.failed() {
        violations.push(Violation::new(
            network,
            "perp_pool_promo",
            format!(
                "{}.json has the following invalid perp pool ids under the perp_pool_promo field: {}",
                network,
                invalid.entries_list()
            ),
        ));
    }

    let duplicates = duplicate_entries(&promo_ids);
    if duplicates.failed() {
        violations.push(Violation::new(
            network,
            "perp_pool_promo",
            format!(
                "{}.json has duplicated perp pool promos for the following perp pool ids: {}. Please make sure to input each perp pool promo only once in {}",
                network,
                duplicates.entries_list(),
                network
            ),
        ));
    }

    // Points config is mandatory on mainnet
    if network == Network::Mainnet && config.demex_points_config.is_none() {
        violations.push(Violation::new(
            network,
            "demex_points_config",
            format!("{}.json is missing demex_points_config", network),
        ));
    }

    // Promo windows must not end before they start
    for (promo_id, promo) in &config.perp_pool_promo {
        let start = parse_promo_timestamp(&promo.start);
        let end = parse_promo_timestamp(&promo.end);

        let violation = match (start, end) {
            (Some(start), Some(end)) if end < start => Some(Violation::new(
                network,
                "perp_pool_promo",
                format!(
                    "{}.json has invalid end time ({}) is before start time ({}) for perp_pool_promo id {}",
                    network, promo.end, promo.start, promo_id
                ),
            )),
            (None, _) | (_, None) => Some(Violation::new(
                network,
                "perp_pool_promo",
                format!(
                    "{}.json has an unparseable start ({}) or end ({}) time for perp_pool_promo id {}",
                    network, promo.start, promo.end, promo_id
                ),
            )),
            _ => None,
        };

        if let Some(violation) = violation {
            violations.push(violation);
            if promo_scan == PromoScan::FailFast {
                break;
            }
        }
    }

    violations
}

/// Parse a promo timestamp: RFC 3339, or a bare date taken as midnight UTC
fn parse_promo_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = s.parse::<NaiveDate>().ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DemexPointsConfig, PerpPoolBanner, PerpPoolPromo};

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn reference_data() -> ReferenceData {
        ReferenceData {
            markets: list(&["BTC_USDT", "ETH_USDT"]),
            pools: list(&["1", "2"]),
            tokens: list(&["swth", "usc"]),
            bridge_chains: list(&["Ethereum", "Osmosis"]),
            fee_denoms: list(&["swth", "usc"]),
            perp_pool_ids: list(&["1", "2"]),
        }
    }

    fn promo(start: &str, end: &str) -> PerpPoolPromo {
        PerpPoolPromo {
            start: start.to_string(),
            end: end.to_string(),
            perp_pool_deposit_boost: "2".to_string(),
            perp_trading_boost: "1.5".to_string(),
        }
    }

    fn points_config() -> DemexPointsConfig {
        DemexPointsConfig {
            deposits_per_spin: 1000,
            trading_volume_per_spin: 5000,
        }
    }

    fn banner(pool_id: &str) -> PerpPoolBanner {
        PerpPoolBanner {
            perp_pool_id: pool_id.to_string(),
            title: "banner".to_string(),
            show_from: None,
            show_until: None,
            removed_markets: None,
            added_markets: None,
            subtext: None,
        }
    }

    #[test]
    fn test_valid_config_produces_no_violations() {
        let config = NetworkConfig {
            network: "devnet".to_string(),
            prelaunch_markets: list(&["BTC_USDT"]),
            blacklisted_markets: list(&["ETH_USDT"]),
            blacklisted_pools: list(&["1"]),
            blacklisted_tokens: list(&["swth"]),
            transfer_options: [("Ethereum".to_string(), 0), ("Carbon".to_string(), 1)]
                .into_iter()
                .collect(),
            network_fees: [("swth".to_string(), 1.0)].into_iter().collect(),
            perp_pool_banners: vec![banner("1")],
            perp_pool_promo: [(
                "1".to_string(),
                promo("2024-01-01T00:00:00Z", "2024-02-01T00:00:00Z"),
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_prelaunch_duplicates_and_unknown_market_both_reported() {
        let config = NetworkConfig {
            prelaunch_markets: list(&["BTC_USDT", "BTC_USDT", "SOL_USDT"]),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .any(|v| v.field == "prelaunch_markets" && v.message.contains("invalid pre-launch market entries: SOL_USDT")));
        assert!(violations
            .iter()
            .any(|v| v.field == "prelaunch_markets" && v.message.contains("duplicated pre-launch market entries: BTC_USDT")));
    }

    #[test]
    fn test_blacklisted_market_in_prelaunch_is_reported() {
        let config = NetworkConfig {
            prelaunch_markets: list(&["ETH_USDT"]),
            blacklisted_markets: list(&["ETH_USDT"]),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert!(violations
            .iter()
            .any(|v| v.message.contains("blacklisted market entries in pre-launch markets entries: ETH_USDT")));
    }

    #[test]
    fn test_transfer_options_accept_native_chain_reject_unknown() {
        let config = NetworkConfig {
            transfer_options: [
                ("Carbon".to_string(), 0),
                ("Ethereum".to_string(), 0),
                ("Atlantis".to_string(), 0),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "transfer_options");
        assert!(violations[0].message.contains("Atlantis"));
        assert!(!violations[0].message.contains("Carbon"));
    }

    #[test]
    fn test_network_fees_require_configured_gas_price() {
        let config = NetworkConfig {
            network_fees: [("swth".to_string(), 1.0), ("shib".to_string(), 2.0)]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "network_fees");
        assert!(violations[0].message.contains("shib"));
    }

    #[test]
    fn test_banner_pool_ids_checked_for_membership_and_repeats() {
        let config = NetworkConfig {
            perp_pool_banners: vec![banner("1"), banner("1"), banner("7")],
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .any(|v| v.field == "perp_pool_banners" && v.message.contains("invalid perp pool ids") && v.message.contains("7")));
        assert!(violations
            .iter()
            .any(|v| v.field == "perp_pool_banners" && v.message.contains("duplicated perp pool banners")));
    }

    #[test]
    fn test_missing_points_config_fails_mainnet_only() {
        let config = NetworkConfig::default();

        let violations = validate_config(
            Network::Mainnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert!(violations
            .iter()
            .any(|v| v.field == "demex_points_config" && v.message.contains("missing demex_points_config")));

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_points_config_present_passes_mainnet() {
        let config = NetworkConfig {
            demex_points_config: Some(points_config()),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Mainnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_promo_end_before_start_fails_fast() {
        let config = NetworkConfig {
            perp_pool_promo: [
                ("1".to_string(), promo("2024-01-10", "2024-01-01")),
                ("2".to_string(), promo("2024-03-10", "2024-03-01")),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        // Fail-fast: the second bad promo is not evaluated
        let time_violations: Vec<&Violation> = violations
            .iter()
            .filter(|v| v.message.contains("is before start time"))
            .collect();
        assert_eq!(time_violations.len(), 1);
        assert!(time_violations[0].message.contains("perp_pool_promo id 1"));
    }

    #[test]
    fn test_promo_exhaustive_scan_reports_every_bad_record() {
        let config = NetworkConfig {
            perp_pool_promo: [
                ("1".to_string(), promo("2024-01-10", "2024-01-01")),
                ("2".to_string(), promo("2024-03-10", "2024-03-01")),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::Exhaustive,
        );
        let time_violations = violations
            .iter()
            .filter(|v| v.message.contains("is before start time"))
            .count();
        assert_eq!(time_violations, 2);
    }

    #[test]
    fn test_promo_unparseable_timestamp_is_a_violation() {
        let config = NetworkConfig {
            perp_pool_promo: [("1".to_string(), promo("soon", "2024-01-01"))]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert!(violations.iter().any(|v| v.message.contains("unparseable")));
    }

    #[test]
    fn test_promo_ordering_violation_does_not_mask_set_checks() {
        // The fail-fast scan only short-circuits the promo loop, never the
        // set-based checks that ran before it.
        let config = NetworkConfig {
            prelaunch_markets: list(&["SOL_USDT"]),
            perp_pool_promo: [("1".to_string(), promo("2024-01-10", "2024-01-01"))]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert!(violations.iter().any(|v| v.field == "prelaunch_markets"));
        assert!(violations
            .iter()
            .any(|v| v.message.contains("is before start time")));
    }

    #[test]
    fn test_parse_promo_timestamp_formats() {
        assert!(parse_promo_timestamp("2024-01-10").is_some());
        assert!(parse_promo_timestamp("2024-01-10T12:30:00Z").is_some());
        assert!(parse_promo_timestamp("2024-01-10T12:30:00+08:00").is_some());
        assert!(parse_promo_timestamp("soon").is_none());
        assert!(parse_promo_timestamp("").is_none());
    }

    #[test]
    fn test_promo_dates_compare_as_timestamps() {
        let config = NetworkConfig {
            perp_pool_promo: [(
                "1".to_string(),
                promo("2024-01-01T00:00:00Z", "2024-01-01T00:00:01Z"),
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let violations = validate_config(
            Network::Devnet,
            &config,
            &reference_data(),
            PromoScan::FailFast,
        );
        assert!(violations.is_empty());
    }
}
