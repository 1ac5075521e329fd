use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ExchangeError;
use crate::signing::{get_timestamp, sign_query};
use crate::types::{Credentials, Network};

/// Authenticated HTTP client for one futures endpoint (testnet or mainnet).
#[derive(Clone)]
pub struct BinanceClient {
    pub(crate) http: reqwest::Client,
    pub(crate) credentials: Credentials,
    base_url: String,
}

impl BinanceClient {
    pub fn new(credentials: Credentials, network: Network) -> Self {
        Self::with_base_url(credentials, network.base_url())
    }

    /// Targets an arbitrary base URL, e.g. a local mock of the exchange.
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one signed request and decodes the JSON body. `query` holds the
    /// endpoint parameters without `timestamp`/`signature`.
    pub(crate) async fn signed_request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &str,
    ) -> Result<T, ExchangeError> {
        let signed = sign_query(query, &self.credentials.api_secret, get_timestamp());
        let url = format!("{}{}?{}", self.base_url, endpoint, signed);

        debug!("{} {}{}", method, self.base_url, endpoint);

        let response = self
            .http
            .request(method, &url)
            .header("X-MBX-APIKEY", self.credentials.api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(ExchangeError::from_response(
                status.as_u16(),
                &response_text,
            ));
        }

        Ok(serde_json::from_str(&response_text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_binds_network_base_url() {
        let creds = Credentials::new("key", "secret");

        let testnet = BinanceClient::new(creds.clone(), Network::Testnet);
        assert_eq!(testnet.base_url(), "https://testnet.binancefuture.com");

        let mainnet = BinanceClient::new(creds, Network::Mainnet);
        assert_eq!(mainnet.base_url(), "https://fapi.binance.com");
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let client =
            BinanceClient::with_base_url(Credentials::new("k", "s"), "http://127.0.0.1:9000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
    }
}
