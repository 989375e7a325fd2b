use crate::locale::AppLocale;
use crate::query::DEFAULT_STALE_TIME;
use crate::summary::DayOrder;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:3333";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub stale_time: Duration,
    pub api_timeout: Duration,
    pub render_timeout: Duration,
    pub locale: AppLocale,
    pub day_order: DayOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            api_base_url: DEFAULT_API_URL.to_string(),
            stale_time: DEFAULT_STALE_TIME,
            api_timeout: Duration::from_secs(10),
            render_timeout: Duration::from_secs(5),
            locale: AppLocale::default(),
            day_order: DayOrder::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            port: parse_or(value("PORT"), "PORT", defaults.port),
            api_base_url: value("GOALS_API_URL").unwrap_or(defaults.api_base_url),
            stale_time: Duration::from_secs(parse_or(
                value("SUMMARY_STALE_SECS"),
                "SUMMARY_STALE_SECS",
                defaults.stale_time.as_secs(),
            )),
            api_timeout: Duration::from_millis(parse_or(
                value("API_TIMEOUT_MS"),
                "API_TIMEOUT_MS",
                millis(defaults.api_timeout),
            )),
            render_timeout: Duration::from_millis(parse_or(
                value("RENDER_TIMEOUT_MS"),
                "RENDER_TIMEOUT_MS",
                millis(defaults.render_timeout),
            )),
            locale: value("APP_LOCALE")
                .map(|tag| {
                    AppLocale::parse(&tag).unwrap_or_else(|| {
                        warn!(tag = %tag, "unsupported APP_LOCALE, using default");
                        defaults.locale
                    })
                })
                .unwrap_or(defaults.locale),
            day_order: value("DAY_ORDER")
                .map(|order| {
                    DayOrder::parse(&order).unwrap_or_else(|| {
                        warn!(order = %order, "unsupported DAY_ORDER, using default");
                        defaults.day_order
                    })
                })
                .unwrap_or(defaults.day_order),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, raw = %raw, "invalid value, using default");
            default
        }),
        None => default,
    }
}
