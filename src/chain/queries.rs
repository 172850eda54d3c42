//! Reference data queries
//!
//! One query per identifier category the configs are checked against. Each
//! route returns records wrapped in a page envelope; the helpers below drain
//! all pages and extract the identifying field per record.

use anyhow::Result;
use serde::Deserialize;

use super::{ChainClient, Page};

#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolEntry {
    #[serde(default)]
    pub pool: Option<PoolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolInfo {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub denom: String,
    #[serde(default)]
    pub decimals: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bridge {
    pub chain_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinGasPrice {
    pub denom: String,
    #[serde(default)]
    pub gas_price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerpPool {
    pub pool_id: String,
}

#[derive(Debug, Deserialize)]
struct MarketsPage {
    markets: Vec<Market>,
}

#[derive(Debug, Deserialize)]
struct PoolsPage {
    pools: Vec<PoolEntry>,
}

#[derive(Debug, Deserialize)]
struct TokensPage {
    tokens: Vec<Token>,
}

#[derive(Debug, Deserialize)]
struct BridgesPage {
    bridges: Vec<Bridge>,
}

#[derive(Debug, Deserialize)]
struct MinGasPricesPage {
    min_gas_prices: Vec<MinGasPrice>,
}

#[derive(Debug, Deserialize)]
struct PerpPoolsPage {
    pools: Vec<PerpPool>,
}

impl Page for MarketsPage {
    type Item = Market;

    fn items(self) -> Vec<Market> {
        self.markets
    }
}

impl Page for PoolsPage {
    type Item = PoolEntry;

    fn items(self) -> Vec<PoolEntry> {
        self.pools
    }
}

impl Page for TokensPage {
    type Item = Token;

    fn items(self) -> Vec<Token> {
        self.tokens
    }
}

impl Page for BridgesPage {
    type Item = Bridge;

    fn items(self) -> Vec<Bridge> {
        self.bridges
    }
}

impl Page for MinGasPricesPage {
    type Item = MinGasPrice;

    fn items(self) -> Vec<MinGasPrice> {
        self.min_gas_prices
    }
}

impl Page for PerpPoolsPage {
    type Item = PerpPool;

    fn items(self) -> Vec<PerpPool> {
        self.pools
    }
}

impl ChainClient {
    /// Names of every listed market
    pub async fn market_names(&self) -> Result<Vec<String>> {
        let markets = self.drain::<MarketsPage>("/carbon/market/v1/markets").await?;
        Ok(markets.into_iter().map(|m| m.name).collect())
    }

    /// Ids of every liquidity pool
    pub async fn pool_ids(&self) -> Result<Vec<String>> {
        let pools = self
            .drain::<PoolsPage>("/carbon/liquiditypool/v1/pools")
            .await?;
        Ok(pools
            .into_iter()
            .map(|entry| entry.pool.map(|p| p.id).unwrap_or_default())
            .collect())
    }

    /// Every registered token, with denom and decimals
    pub async fn tokens(&self) -> Result<Vec<Token>> {
        self.drain::<TokensPage>("/carbon/coin/v1/tokens").await
    }

    /// Denoms of every registered token
    pub async fn token_denoms(&self) -> Result<Vec<String>> {
        let tokens = self.tokens().await?;
        Ok(tokens.into_iter().map(|t| t.denom).collect())
    }

    /// Chain names of every connected bridge
    pub async fn bridge_chain_names(&self) -> Result<Vec<String>> {
        let bridges = self.drain::<BridgesPage>("/carbon/coin/v1/bridges").await?;
        Ok(bridges.into_iter().map(|b| b.chain_name).collect())
    }

    /// Every denom with a configured minimum gas price
    pub async fn min_gas_prices(&self) -> Result<Vec<MinGasPrice>> {
        self.drain::<MinGasPricesPage>("/carbon/fee/v1/min_gas_prices")
            .await
    }

    /// Denoms accepted for network fee payment
    pub async fn fee_denoms(&self) -> Result<Vec<String>> {
        let prices = self.min_gas_prices().await?;
        Ok(prices.into_iter().map(|p| p.denom).collect())
    }

    /// Ids of every perp pool
    pub async fn perp_pool_ids(&self) -> Result<Vec<String>> {
        let pools = self
            .drain::<PerpPoolsPage>("/carbon/perpspool/v1/pools")
            .await?;
        Ok(pools.into_iter().map(|p| p.pool_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pools_page_tolerates_missing_inner_pool() {
        let json = r#"{"pools": [{"pool": {"id": "1"}}, {}]}"#;
        let page: PoolsPage = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = page
            .items()
            .into_iter()
            .map(|entry| entry.pool.map(|p| p.id).unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["1".to_string(), String::new()]);
    }

    #[test]
    fn test_token_decimals_default_to_zero() {
        let json = r#"{"tokens": [{"denom": "swth"}]}"#;
        let page: TokensPage = serde_json::from_str(json).unwrap();
        let tokens = page.items();
        assert_eq!(tokens[0].denom, "swth");
        assert_eq!(tokens[0].decimals, 0);
    }

    #[test]
    fn test_min_gas_prices_page_parses() {
        let json = r#"{"min_gas_prices": [
            {"denom": "swth", "gas_price": "100.0"},
            {"denom": "usc", "gas_price": "0.0001"}
        ]}"#;
        let page: MinGasPricesPage = serde_json::from_str(json).unwrap();
        let denoms: Vec<String> = page.items().into_iter().map(|p| p.denom).collect();
        assert_eq!(denoms, vec!["swth", "usc"]);
    }
}
