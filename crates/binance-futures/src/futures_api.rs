use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use crate::client::BinanceClient;
use crate::error::ExchangeError;
use crate::types::{AccountInfo, FuturesBalance, OrderRequest, OrderResponse};

const ACCOUNT_ENDPOINT: &str = "/fapi/v2/account";
const BALANCE_ENDPOINT: &str = "/fapi/v2/balance";
const ORDER_ENDPOINT: &str = "/fapi/v1/order";

/// The futures calls the bot depends on. Implemented over HTTP by
/// `BinanceClient`; tests substitute a scripted implementation.
#[async_trait]
pub trait FuturesExchange: Send + Sync {
    /// Account snapshot. Doubles as the connectivity/credential probe.
    async fn account(&self) -> Result<AccountInfo, ExchangeError>;

    /// Every asset balance of the futures wallet.
    async fn balances(&self) -> Result<Vec<FuturesBalance>, ExchangeError>;

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResponse, ExchangeError>;
}

#[async_trait]
impl FuturesExchange for BinanceClient {
    async fn account(&self) -> Result<AccountInfo, ExchangeError> {
        self.signed_request(Method::GET, ACCOUNT_ENDPOINT, "").await
    }

    async fn balances(&self) -> Result<Vec<FuturesBalance>, ExchangeError> {
        self.signed_request(Method::GET, BALANCE_ENDPOINT, "").await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResponse, ExchangeError> {
        let query_string = serde_urlencoded::to_string(order.params())
            .map_err(|e| ExchangeError::Other(format!("Failed to encode order: {}", e)))?;

        info!("place_futures_order query_string: {}", query_string);

        self.signed_request(Method::POST, ORDER_ENDPOINT, &query_string)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Credentials, OrderSide};
    use rust_decimal::Decimal;

    // Nothing listens on port 1, so every call fails at the transport layer.
    fn unreachable_client() -> BinanceClient {
        BinanceClient::with_base_url(Credentials::new("key", "secret"), "http://127.0.0.1:1")
    }

    #[tokio::test]
    async fn test_place_order_transport_failure_is_http_error() {
        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, Decimal::new(1, 2));
        let err = unreachable_client().place_order(&order).await.unwrap_err();

        assert!(matches!(err, ExchangeError::Http(_)), "got {err:?}");
        assert_eq!(err.status_code(), None);
        assert!(!err.message().is_empty());
    }

    #[tokio::test]
    async fn test_account_probe_transport_failure() {
        let err = unreachable_client().account().await.unwrap_err();
        assert!(matches!(err, ExchangeError::Http(_)), "got {err:?}");
    }

    #[test]
    fn test_order_query_is_url_encoded_in_param_order() {
        let order = OrderRequest::limit(
            "BTCUSDT",
            OrderSide::Sell,
            Decimal::new(5, 3),
            Decimal::new(6500010, 2),
        );
        let query = serde_urlencoded::to_string(order.params()).unwrap();

        assert_eq!(
            query,
            "symbol=BTCUSDT&side=SELL&type=LIMIT&quantity=0.005&price=65000.10&timeInForce=GTC"
        );
    }
}
