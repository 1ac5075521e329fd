use binance_futures::{
    ExchangeError, FuturesBalance, FuturesExchange, OrderRequest, OrderResponse, OrderSide,
};
use rust_decimal::Decimal;
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info, warn};

use crate::error::BotError;
use crate::logger::Logger;

/// Thin facade over a futures exchange: one probed connection, balance lookup
/// and order placement with failures logged and collapsed to `None`.
pub struct FuturesBot<E> {
    exchange: E,
    logger: Logger,
}

impl<E: FuturesExchange> FuturesBot<E> {
    /// Wraps `exchange` and checks the credentials with one account call.
    pub async fn connect(exchange: E, logger: Logger) -> Result<Self, BotError> {
        let dispatch = logger.dispatch().clone();
        let bot = Self { exchange, logger };

        async {
            info!("Bot initialized.");
            bot.check_connection().await
        }
        .with_subscriber(dispatch)
        .await?;

        Ok(bot)
    }

    async fn check_connection(&self) -> Result<(), BotError> {
        match self.exchange.account().await {
            Ok(account) => {
                info!("Successfully connected to Binance Futures API.");
                if let Some(wallet) = account.total_wallet_balance {
                    debug!(
                        "Account: can_trade={:?}, wallet={}, available={:?}",
                        account.can_trade, wallet, account.available_balance
                    );
                }
                Ok(())
            }
            Err(e) => {
                error!(
                    "API Connection Error: {} - {}",
                    status_label(&e),
                    e.message()
                );
                Err(BotError::Connection(e))
            }
        }
    }

    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    /// Balance record for `asset`, or `None` when the asset is absent or the
    /// request fails.
    pub async fn get_account_balance(&self, asset: &str) -> Option<FuturesBalance> {
        async {
            let balances = match self.exchange.balances().await {
                Ok(balances) => balances,
                Err(e) => {
                    error!(
                        "Error fetching account balance: {} - {}",
                        status_label(&e),
                        e.message()
                    );
                    return None;
                }
            };

            match balances.into_iter().find(|b| b.asset == asset) {
                Some(balance) => {
                    info!("Account balance for {}: {}", asset, balance.balance);
                    Some(balance)
                }
                None => {
                    warn!("Asset {} not found in account balance.", asset);
                    None
                }
            }
        }
        .with_subscriber(self.logger.dispatch().clone())
        .await
    }

    pub async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Option<OrderResponse> {
        self.place_order(&OrderRequest::market(symbol, side, quantity))
            .await
    }

    pub async fn place_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Option<OrderResponse> {
        self.place_order(&OrderRequest::limit(symbol, side, quantity, price))
            .await
    }

    pub async fn place_stop_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
    ) -> Option<OrderResponse> {
        self.place_order(&OrderRequest::stop_limit(
            symbol, side, quantity, price, stop_price,
        ))
        .await
    }

    /// Submits `order` once. Failures are logged with status and message and
    /// returned as `None`.
    pub async fn place_order(&self, order: &OrderRequest) -> Option<OrderResponse> {
        async {
            match self.submit(order).await {
                Ok(response) => Some(response),
                Err(e) => {
                    log_order_failure(&e);
                    None
                }
            }
        }
        .with_subscriber(self.logger.dispatch().clone())
        .await
    }

    async fn submit(&self, order: &OrderRequest) -> Result<OrderResponse, ExchangeError> {
        info!("Placing order with details: {}", order);
        let response = self.exchange.place_order(order).await?;
        info!("Order placed successfully.");
        debug!("API Response: {:?}", response);
        Ok(response)
    }
}

fn log_order_failure(e: &ExchangeError) {
    let kind = match e {
        ExchangeError::Api { .. } => "API Error placing order",
        ExchangeError::Http(_) => "Request Error placing order",
        ExchangeError::Decode(_) | ExchangeError::Other(_) => "An unexpected error occurred",
    };
    error!(
        code = ?e.code(),
        "{}: {} - {}",
        kind,
        status_label(e),
        e.message()
    );
}

fn status_label(e: &ExchangeError) -> String {
    e.status_code()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}
