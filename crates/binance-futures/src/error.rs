use serde::Deserialize;
use thiserror::Error;

/// A single failed exchange call. Nothing is retried; callers decide whether
/// the failure is fatal.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// The exchange answered with a non-2xx status.
    #[error("api error: {status} - {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },
    /// Transport failure: connection refused, timeout, TLS, ...
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// 2xx response whose body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("other error: {0}")]
    Other(String),
}

#[derive(Debug, Deserialize)]
struct BinanceErrorBody {
    code: i64,
    msg: String,
}

impl ExchangeError {
    /// Builds an `Api` error from a failed response body. Binance reports
    /// `{"code": -2019, "msg": "..."}`; anything else is kept verbatim,
    /// truncated to 200 characters.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<BinanceErrorBody>(body) {
            Ok(err) => ExchangeError::Api {
                status,
                code: Some(err.code),
                message: err.msg,
            },
            Err(_) => ExchangeError::Api {
                status,
                code: None,
                message: body.chars().take(200).collect(),
            },
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ExchangeError::Api { status, .. } => Some(*status),
            ExchangeError::Http(e) => e.status().map(|s| s.as_u16()),
            ExchangeError::Decode(_) | ExchangeError::Other(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ExchangeError::Api { message, .. } => message.clone(),
            ExchangeError::Http(e) => e.to_string(),
            ExchangeError::Decode(e) => e.to_string(),
            ExchangeError::Other(msg) => msg.clone(),
        }
    }

    /// Exchange-specific error code (e.g. `-2019` for insufficient margin).
    pub fn code(&self) -> Option<i64> {
        match self {
            ExchangeError::Api { code, .. } => *code,
            _ => None,
        }
    }
}
