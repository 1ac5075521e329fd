pub mod bot;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;

#[cfg(test)]
mod testing;

pub use bot::FuturesBot;
pub use error::BotError;
pub use logger::{init_logger, LogConfig, LogGuards, Logger};
