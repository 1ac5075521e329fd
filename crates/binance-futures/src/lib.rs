//! Binance USDⓈ-M futures REST client.
//!
//! - `types`: request/response shapes and credentials
//! - `signing`: HMAC-SHA256 request signing
//! - `client`: `BinanceClient`, bound to a base URL and credentials
//! - `futures_api`: the `FuturesExchange` trait and its HTTP implementation

pub mod client;
pub mod error;
pub mod futures_api;
pub mod signing;
pub mod types;

pub use client::BinanceClient;
pub use error::ExchangeError;
pub use futures_api::FuturesExchange;
pub use types::{
    AccountInfo, Credentials, FuturesBalance, InvalidOrder, Network, OrderRequest, OrderResponse,
    OrderSide, OrderType, TimeInForce, MAINNET_FUTURES_URL, TESTNET_FUTURES_URL,
};
