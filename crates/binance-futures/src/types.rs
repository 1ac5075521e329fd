use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAINNET_FUTURES_URL: &str = "https://fapi.binance.com";
pub const TESTNET_FUTURES_URL: &str = "https://testnet.binancefuture.com";

/// API key pair. The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    pub fn base_url(self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_FUTURES_URL,
            Network::Mainnet => MAINNET_FUTURES_URL,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            other => Err(format!("unknown order side: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    StopLimit,
}

impl OrderType {
    /// Name used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLimit => "STOP_LIMIT",
        }
    }

    /// Value of the `type` request field. USDⓈ-M futures call a stop-limit
    /// order `STOP`.
    pub fn wire_name(self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLimit => "STOP",
        }
    }

    pub fn requires_price(self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLimit)
    }

    pub fn requires_stop_price(self) -> bool {
        matches!(self, OrderType::StopLimit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            "STOP_LIMIT" => Ok(OrderType::StopLimit),
            other => Err(format!("unknown order type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    Gtc,
}

impl TimeInForce {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
        }
    }
}

/// Rejected locally, before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidOrder {
    #[error("--price is required for LIMIT and STOP_LIMIT orders.")]
    MissingPrice,
    #[error("--stop-price is required for STOP_LIMIT orders.")]
    MissingStopPrice,
    #[error("--quantity must be greater than zero.")]
    NonPositiveQuantity,
    #[error("--{0} must be greater than zero.")]
    NonPositivePrice(&'static str),
}

/// One order to submit. Constructed through `new` (validating) or the
/// per-type builders, so the price fields always match the order type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    symbol: String,
    side: OrderSide,
    order_type: OrderType,
    quantity: Decimal,
    price: Option<Decimal>,
    stop_price: Option<Decimal>,
}

impl OrderRequest {
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: Decimal,
        price: Option<Decimal>,
        stop_price: Option<Decimal>,
    ) -> Result<Self, InvalidOrder> {
        if order_type.requires_price() && price.is_none() {
            return Err(InvalidOrder::MissingPrice);
        }
        if order_type.requires_stop_price() && stop_price.is_none() {
            return Err(InvalidOrder::MissingStopPrice);
        }
        if quantity <= Decimal::ZERO {
            return Err(InvalidOrder::NonPositiveQuantity);
        }
        if price.is_some_and(|p| p <= Decimal::ZERO) {
            return Err(InvalidOrder::NonPositivePrice("price"));
        }
        if stop_price.is_some_and(|p| p <= Decimal::ZERO) {
            return Err(InvalidOrder::NonPositivePrice("stop-price"));
        }

        // Prices irrelevant to the order type are dropped, never sent.
        Ok(Self {
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            price: price.filter(|_| order_type.requires_price()),
            stop_price: stop_price.filter(|_| order_type.requires_stop_price()),
        })
    }

    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
            stop_price: None,
        }
    }

    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
            stop_price: None,
        }
    }

    pub fn stop_limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::StopLimit,
            quantity,
            price: Some(price),
            stop_price: Some(stop_price),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn stop_price(&self) -> Option<Decimal> {
        self.stop_price
    }

    pub fn time_in_force(&self) -> Option<TimeInForce> {
        match self.order_type {
            OrderType::Market => None,
            OrderType::Limit | OrderType::StopLimit => Some(TimeInForce::Gtc),
        }
    }

    /// Request fields in the order they are sent to `POST /fapi/v1/order`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_str().to_string()),
            ("type", self.order_type.wire_name().to_string()),
            ("quantity", self.quantity.to_string()),
        ];
        if let Some(price) = self.price {
            params.push(("price", price.to_string()));
        }
        if let Some(stop_price) = self.stop_price {
            params.push(("stopPrice", stop_price.to_string()));
        }
        if let Some(tif) = self.time_in_force() {
            params.push(("timeInForce", tif.as_str().to_string()));
        }
        params
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} qty={}",
            self.order_type, self.side, self.symbol, self.quantity
        )?;
        if let Some(price) = self.price {
            write!(f, " price={price}")?;
        }
        if let Some(stop_price) = self.stop_price {
            write!(f, " stopPrice={stop_price}")?;
        }
        Ok(())
    }
}

/// One entry of `GET /fapi/v2/balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesBalance {
    pub asset: String,
    pub balance: Decimal,
    #[serde(default)]
    pub available_balance: Option<Decimal>,
    #[serde(default)]
    pub cross_wallet_balance: Option<Decimal>,
    #[serde(default)]
    pub update_time: Option<i64>,
}

/// The fields of `GET /fapi/v2/account` this client reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default)]
    pub can_trade: Option<bool>,
    #[serde(default)]
    pub total_wallet_balance: Option<Decimal>,
    #[serde(default)]
    pub available_balance: Option<Decimal>,
}

/// Order acknowledgement, kept as the exchange sent it.
pub type OrderResponse = serde_json::Map<String, serde_json::Value>;
