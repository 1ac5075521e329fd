use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Receive window sent with every signed request, in milliseconds.
pub const RECV_WINDOW: u64 = 5000;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `query_string` keyed by `api_secret`.
/// query_string: e.g. "symbol=BTCUSDT&timestamp=1234567890"
pub fn generate_signature(query_string: &str, api_secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(api_secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(query_string.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Current Unix time in milliseconds.
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Appends `timestamp` and `recvWindow` to `query` and signs the result.
/// Returns the full query string including `signature`.
pub fn sign_query(query: &str, api_secret: &str, timestamp: u64) -> String {
    let mut signed = String::with_capacity(query.len() + 96);
    if !query.is_empty() {
        signed.push_str(query);
        signed.push('&');
    }
    signed.push_str(&format!("timestamp={timestamp}&recvWindow={RECV_WINDOW}"));

    let signature = generate_signature(&signed, api_secret);
    signed.push_str("&signature=");
    signed.push_str(&signature);
    signed
}
