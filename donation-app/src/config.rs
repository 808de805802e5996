//! Configuration loading from environment.

use std::{collections::HashMap, env, str::FromStr, time::Duration};

use chrono::FixedOffset;

use donation_gateway::{DEFAULT_BASE_URL, GatewaySettings};
use donation_hex::inbound::{RouteVariant, ServerOptions};
use donation_types::BusinessSettings;

/// The gateway's local time (UTC+03:00). Kenya observes no daylight saving.
const EAST_AFRICA_TIME_SECS: i32 = 3 * 3600;

/// Application configuration, validated once at startup.
pub struct Config {
    pub port: u16,
    pub gateway: GatewaySettings,
    pub business: BusinessSettings,
    pub server: ServerOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = parsed(get("PORT"), "PORT", 3000u16)?;

        let timeout_secs = parsed(get("GATEWAY_TIMEOUT_SECS"), "GATEWAY_TIMEOUT_SECS", 30u64)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "GATEWAY_TIMEOUT_SECS",
                reason: "must be greater than zero".into(),
            });
        }

        let gateway = GatewaySettings::new(
            get("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            required("CONSUMER_KEY")?,
            required("CONSUMER_SECRET")?,
        )
        .with_timeout(Duration::from_secs(timeout_secs));

        let utc_offset = match get("GATEWAY_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "GATEWAY_UTC_OFFSET",
                reason: format!("`{}` is not an offset like +03:00", raw),
            })?,
            None => FixedOffset::east_opt(EAST_AFRICA_TIME_SECS).ok_or(ConfigError::Invalid {
                key: "GATEWAY_UTC_OFFSET",
                reason: "default offset out of range".into(),
            })?,
        };

        let business = BusinessSettings {
            short_code: required("SHORT_CODE")?,
            pass_key: required("PASS_KEY")?,
            callback_url: required("CALLBACK_URL")?,
            account_reference: get("ACCOUNT_REFERENCE").unwrap_or_else(|| "Donation".into()),
            transaction_desc: get("TRANSACTION_DESC")
                .unwrap_or_else(|| "Charity Donation".into()),
            utc_offset,
        };

        let routes = match get("RELAY_ROUTES") {
            Some(raw) => parse_routes(&raw)?,
            None => RouteVariant::ALL.to_vec(),
        };

        let callback_path = get("CALLBACK_PATH").unwrap_or_else(|| "/callback".into());
        let mut reserved = ["/", "/health"]
            .into_iter()
            .chain(routes.iter().map(|v| v.path()));
        if !callback_path.starts_with('/') || reserved.any(|p| p == callback_path) {
            return Err(ConfigError::Invalid {
                key: "CALLBACK_PATH",
                reason: format!("`{}` must be an unused absolute path", callback_path),
            });
        }

        let transaction_descs = HashMap::from([(
            RouteVariant::Donate,
            get("DONATE_TRANSACTION_DESC")
                .unwrap_or_else(|| "Donation to Mani Group Foundation".into()),
        )]);

        let server = ServerOptions {
            routes,
            requests_per_minute: parsed(get("RATE_LIMIT_PER_MINUTE"), "RATE_LIMIT_PER_MINUTE", 60)?,
            trust_forwarded_for: parsed(get("TRUST_FORWARDED_FOR"), "TRUST_FORWARDED_FOR", false)?,
            transaction_descs,
            callback_path,
        };

        Ok(Self {
            port,
            gateway,
            business,
            server,
        })
    }
}

fn parsed<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_routes(raw: &str) -> Result<Vec<RouteVariant>, ConfigError> {
    let mut routes = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let variant = part.parse::<RouteVariant>().map_err(|e| ConfigError::Invalid {
            key: "RELAY_ROUTES",
            reason: e.to_string(),
        })?;
        if !routes.contains(&variant) {
            routes.push(variant);
        }
    }

    if routes.is_empty() {
        return Err(ConfigError::Invalid {
            key: "RELAY_ROUTES",
            reason: "at least one route is required".into(),
        });
    }
    Ok(routes)
}

/// Accepts `Z`, `UTC`, `+03:00`, `+0300` and `+3`.
fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first().copied()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 => (rest.get(..2)?, rest.get(2..)?),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("CONSUMER_KEY", "key"),
            ("CONSUMER_SECRET", "secret"),
            ("SHORT_CODE", "174379"),
            ("PASS_KEY", "passkey"),
            ("CALLBACK_URL", "https://example.com/callback"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_env()).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.gateway.timeout, Duration::from_secs(30));
        assert_eq!(config.business.utc_offset.local_minus_utc(), 3 * 3600);
        assert_eq!(config.business.account_reference, "Donation");
        assert_eq!(config.server.routes, RouteVariant::ALL.to_vec());
        assert_eq!(config.server.callback_path, "/callback");
        assert!(!config.server.trust_forwarded_for);
        assert_eq!(config.business.transaction_desc, "Charity Donation");
        assert_eq!(
            config.server.transaction_descs[&RouteVariant::Donate],
            "Donation to Mani Group Foundation"
        );
        assert!(
            !config
                .server
                .transaction_descs
                .contains_key(&RouteVariant::StkPush)
        );
    }

    #[test]
    fn test_missing_required_key() {
        let mut env = base_env();
        env.remove("PASS_KEY");

        assert!(matches!(load(&env), Err(ConfigError::Missing("PASS_KEY"))));
    }

    #[test]
    fn test_blank_required_key_counts_as_missing() {
        let mut env = base_env();
        env.insert("CONSUMER_SECRET", "   ");

        assert!(matches!(
            load(&env),
            Err(ConfigError::Missing("CONSUMER_SECRET"))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut env = base_env();
        env.insert("PORT", "8080");
        env.insert("BASE_URL", "https://api.safaricom.co.ke/");
        env.insert("GATEWAY_UTC_OFFSET", "+00:00");
        env.insert("RELAY_ROUTES", "donate, donate");
        env.insert("TRANSACTION_DESC", "Harambee");
        env.insert("DONATE_TRANSACTION_DESC", "School fees drive");
        env.insert("TRUST_FORWARDED_FOR", "true");

        let config = load(&env).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.gateway.base_url, "https://api.safaricom.co.ke");
        assert_eq!(config.business.utc_offset.local_minus_utc(), 0);
        assert_eq!(config.server.routes, vec![RouteVariant::Donate]);
        assert_eq!(config.business.transaction_desc, "Harambee");
        assert_eq!(
            config.server.transaction_descs[&RouteVariant::Donate],
            "School fees drive"
        );
        assert!(config.server.trust_forwarded_for);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("PORT", "eighty"),
            ("GATEWAY_UTC_OFFSET", "EAT"),
            ("GATEWAY_TIMEOUT_SECS", "0"),
            ("RELAY_ROUTES", "refund"),
            ("CALLBACK_PATH", "/health"),
            ("TRUST_FORWARDED_FOR", "yes"),
        ] {
            let mut env = base_env();
            env.insert(key, value);
            assert!(
                matches!(load(&env), Err(ConfigError::Invalid { .. })),
                "{} = {} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn test_parse_utc_offset_forms() {
        assert_eq!(parse_utc_offset("+03:00").unwrap().local_minus_utc(), 10800);
        assert_eq!(parse_utc_offset("+0300").unwrap().local_minus_utc(), 10800);
        assert_eq!(parse_utc_offset("+3").unwrap().local_minus_utc(), 10800);
        assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("+25:00").is_none());
        assert!(parse_utc_offset("03:00").is_none());
        assert!(parse_utc_offset("+1é1").is_none());
        assert!(parse_utc_offset("+é").is_none());
    }
}
