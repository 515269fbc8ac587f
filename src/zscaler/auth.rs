//! ZCON session login payload.
//!
//! The API key is never sent as is: it is scrambled with the last digits of
//! the request timestamp.

use crate::error::{Error, Result};
use serde::Serialize;

/// Body of `POST /auth`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest<'a> {
    pub api_key: String,
    pub username: &'a str,
    pub password: &'a str,
    pub timestamp: String,
}

impl<'a> AuthRequest<'a> {
    pub fn new(
        username: &'a str,
        password: &'a str,
        api_key: &str,
        timestamp_ms: i64,
    ) -> Result<Self> {
        Ok(AuthRequest {
            api_key: obfuscate_api_key(api_key, timestamp_ms)?,
            username,
            password,
            timestamp: timestamp_ms.to_string(),
        })
    }
}

/// Scramble the API key with a millisecond timestamp.
///
/// Six characters are picked by the last six timestamp digits, six more by the
/// digits of that number shifted right by one (offset by two).
pub fn obfuscate_api_key(api_key: &str, timestamp_ms: i64) -> Result<String> {
    let key: Vec<char> = api_key.chars().collect();
    if key.len() < 12 {
        return Err(Error::Config(format!(
            "ZCON_API_KEY too short: expected at least 12 characters, got {}",
            key.len()
        )));
    }

    let ts = timestamp_ms.to_string();
    if ts.len() < 6 {
        return Err(Error::Config(format!("timestamp too short: {ts}")));
    }
    let n = &ts[ts.len() - 6..];
    let value: u32 = n
        .parse()
        .map_err(|e: std::num::ParseIntError| Error::Config(e.to_string()))?;
    let shifted = format!("{:06}", value >> 1);

    let mut out = String::with_capacity(12);
    for d in n.chars().filter_map(|c| c.to_digit(10)) {
        out.push(key[d as usize]);
    }
    for d in shifted.chars().filter_map(|c| c.to_digit(10)) {
        out.push(key[d as usize + 2]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscate_api_key() {
        // n = 123456, n >> 1 = 061728
        let key = obfuscate_api_key("abcdefghijklmnopqrstuvwxyz", 1_700_000_123_456).unwrap();
        assert_eq!(key, "bcdefgcidjek");
    }

    #[test]
    fn test_obfuscate_zero_digits() {
        let key = obfuscate_api_key("0123456789AB", 1_700_000_000_000).unwrap();
        assert_eq!(key, "000000222222");
    }

    #[test]
    fn test_obfuscate_short_key() {
        assert!(obfuscate_api_key("short", 1_700_000_123_456).is_err());
    }

    #[test]
    fn test_auth_request_json() {
        let req =
            AuthRequest::new("admin@example.com", "pw", "abcdefghijklmnop", 1_700_000_123_456)
                .unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["apiKey"], "bcdefgcidjek");
        assert_eq!(json["timestamp"], "1700000123456");
        assert_eq!(json["username"], "admin@example.com");
    }
}
