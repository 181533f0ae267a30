//! Thin Binance REST client with the endpoints the dashboard needs
//!
//! Signed endpoints append a millisecond timestamp and an HMAC-SHA256 hex
//! signature computed over the full query string, per the Binance SAPI
//! authentication scheme.

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::binance::types::{
    AccountTrade, AutoInvestPositions, CapitalBalance, DualInvestPosition, StakingPosition,
    TickerPrice,
};
use crate::config::AppConfig;
use crate::portfolio::RawHolding;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Earn product types queried for staked positions.
const STAKING_PRODUCTS: [&str; 4] = ["STAKING", "LENDING", "LENDING_DAILY", "LENDING_FIXED"];

const TRADES_LIMIT: u32 = 1000;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Binance rejected the API credentials; verify the key, secret, and IP whitelist")]
    Unauthorized,

    #[error("Binance API error {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to sign request: {0}")]
    Signature(String),
}

/// Binance REST client
#[derive(Clone)]
pub struct BinanceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: Vec<u8>,
}

impl BinanceClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Client against a non-default endpoint (tests point this at a mock
    /// server).
    pub fn with_base_url(config: &AppConfig, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.as_bytes().to_vec(),
        }
    }

    fn sign(&self, query: &str) -> Result<String, ClientError> {
        let mut mac = HmacSha256::new_from_slice(&self.api_secret)
            .map_err(|e| ClientError::Signature(e.to_string()))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn encode_query(params: &[(&str, String)]) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }

    async fn get_public<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn get_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        self.request_signed(reqwest::Method::GET, path, params).await
    }

    async fn post_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        self.request_signed(reqwest::Method::POST, path, params).await
    }

    async fn request_signed<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let mut params = params.to_vec();
        let timestamp = Utc::now().timestamp_millis().to_string();
        params.push(("timestamp", timestamp));

        let query = Self::encode_query(&params);
        let signature = self.sign(&query)?;
        let url = format!(
            "{}{}?{}&signature={}",
            self.base_url, path, query, signature
        );
        debug!(path, "signed {}", method);

        let response = self
            .http
            .request(method, &url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no error details".to_string());
            return Err(ClientError::Api { status, body });
        }
        Ok(response.json().await?)
    }

    /// All current ticker prices, keyed by symbol.
    pub async fn symbol_prices(&self) -> Result<HashMap<String, Decimal>, ClientError> {
        let tickers: Vec<TickerPrice> = self.get_public("/api/v3/ticker/price").await?;
        Ok(tickers
            .into_iter()
            .map(|ticker| (ticker.symbol, ticker.price))
            .collect())
    }

    /// Spot wallet balances, free and locked portions.
    pub async fn spot_balances(&self) -> Result<Vec<RawHolding>, ClientError> {
        let balances: Vec<CapitalBalance> = self
            .get_signed("/sapi/v1/capital/config/getall", &[])
            .await?;
        Ok(balances
            .into_iter()
            .map(CapitalBalance::into_raw_holding)
            .collect())
    }

    /// Locked staking and lending positions across all Earn product types.
    ///
    /// Individual product queries degrade gracefully; accounts without an
    /// Earn subscription simply contribute nothing.
    pub async fn staking_positions(&self) -> Vec<RawHolding> {
        let mut holdings = Vec::new();
        for product in STAKING_PRODUCTS {
            let positions: Result<Vec<StakingPosition>, ClientError> = self
                .post_signed(
                    "/sapi/v1/staking/productPosition",
                    &[("product", product.to_string())],
                )
                .await;
            match positions {
                Ok(positions) => holdings.extend(
                    positions
                        .into_iter()
                        .map(StakingPosition::into_raw_holding),
                ),
                Err(error) => {
                    debug!(product, %error, "unable to fetch staking positions");
                }
            }
        }
        holdings
    }

    /// Auto-Invest plan positions. Unavailable plans yield an empty set.
    pub async fn auto_invest_positions(&self) -> Vec<RawHolding> {
        let response: Result<AutoInvestPositions, ClientError> = self
            .get_signed("/sapi/v1/lending/auto-invest/positions", &[])
            .await;
        match response {
            Ok(response) => response
                .positions
                .into_iter()
                .map(|position| position.into_raw_holding())
                .collect(),
            Err(error) => {
                debug!(%error, "auto-invest positions unavailable");
                Vec::new()
            }
        }
    }

    /// Dual Investment subscriptions. Unavailable products yield an empty set.
    pub async fn dual_invest_positions(&self) -> Vec<RawHolding> {
        let response: Result<Vec<DualInvestPosition>, ClientError> = self
            .get_signed("/sapi/v1/lending/dual/daily/product/list", &[])
            .await;
        match response {
            Ok(positions) => positions
                .into_iter()
                .map(|position| position.into_raw_holding())
                .collect(),
            Err(error) => {
                debug!(%error, "dual investment positions unavailable");
                Vec::new()
            }
        }
    }

    /// Full trade history for one symbol.
    pub async fn my_trades(&self, symbol: &str) -> Result<Vec<AccountTrade>, ClientError> {
        self.get_signed(
            "/api/v3/myTrades",
            &[
                ("symbol", symbol.to_string()),
                ("limit", TRADES_LIMIT.to_string()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> AppConfig {
        AppConfig {
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
        }
    }

    #[tokio::test]
    async fn fetches_and_maps_symbol_prices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"symbol": "BTCUSDT", "price": "25000.50"},
                {"symbol": "ETHUSDT", "price": "1800.00"}
            ])))
            .mount(&server)
            .await;

        let client = BinanceClient::with_base_url(&test_config(), server.uri());
        let prices = client.symbol_prices().await.unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices["BTCUSDT"], dec!(25000.50));
    }

    #[tokio::test]
    async fn signed_requests_carry_key_timestamp_and_signature() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/myTrades"))
            .and(header("X-MBX-APIKEY", "test-key"))
            .and(query_param("symbol", "BTCUSDT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = BinanceClient::with_base_url(&test_config(), server.uri());
        let trades = client.my_trades("BTCUSDT").await.unwrap();

        assert!(trades.is_empty());
        let requests = server.received_requests().await.unwrap();
        let query = requests[0].url.query().unwrap();
        assert!(query.contains("timestamp="));
        assert!(query.contains("&signature="));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_a_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sapi/v1/capital/config/getall"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = BinanceClient::with_base_url(&test_config(), server.uri());
        let error = client.spot_balances().await.unwrap_err();

        assert!(matches!(error, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn failed_staking_products_degrade_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sapi/v1/staking/productPosition"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = BinanceClient::with_base_url(&test_config(), server.uri());
        let holdings = client.staking_positions().await;

        assert!(holdings.is_empty());
    }
}
