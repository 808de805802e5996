use base64::{Engine, prelude::BASE64_STANDARD};

/// `Authorization` value for the token endpoint: `Basic base64(key:secret)`.
pub fn basic_auth_header(consumer_key: &str, consumer_secret: &str) -> String {
    let auth = BASE64_STANDARD.encode(format!("{consumer_key}:{consumer_secret}"));
    format!("Basic {auth}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(basic_auth_header("key", "secret"), "Basic a2V5OnNlY3JldA==");
    }
}
