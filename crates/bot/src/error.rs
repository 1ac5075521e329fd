use binance_futures::ExchangeError;
use thiserror::Error;

/// Fatal errors: each one ends the process before or instead of the command.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("connection error: {}", .0.message())]
    Connection(#[source] ExchangeError),
}
