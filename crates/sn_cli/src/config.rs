use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::Args;
use rand::{distributions::Alphanumeric, Rng};
use sn_core::Destination;
use sn_enrich::TranslatorConfig;
use sn_pipeline::{DeliveryGate, DestinationMap, PipelineConfig, QuietWindow, SchedulerConfig};
use sn_scrapers::{FetchConfig, RetryPolicy};
use tracing::warn;

use crate::logging::LogFormat;

/// Durations such as `90s`, `2h` or `1h30m`. A bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

const DURATION_UNITS: &[(char, u64)] = &[('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)];

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err("Duration must include a number".to_string());
        }
        if compact.bytes().all(|b| b.is_ascii_digit()) {
            let seconds = compact
                .parse::<u64>()
                .map_err(|_| format!("Duration out of range: {}", s))?;
            return Ok(HumanDuration(Duration::from_secs(seconds)));
        }

        let mut rest = compact.as_str();
        let mut seconds = 0u64;
        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits == 0 {
                return Err(format!("Expected a number before '{}'", rest));
            }
            let (number, tail) = rest.split_at(digits);
            let mut chars = tail.chars();
            let unit = chars
                .next()
                .ok_or_else(|| format!("Missing unit after {}", number))?;
            let scale = DURATION_UNITS
                .iter()
                .find(|(symbol, _)| *symbol == unit)
                .map(|(_, scale)| *scale)
                .ok_or_else(|| format!("Invalid duration unit: {}", unit))?;

            seconds = number
                .parse::<u64>()
                .ok()
                .and_then(|value| value.checked_mul(scale))
                .and_then(|part| seconds.checked_add(part))
                .ok_or_else(|| format!("Duration out of range: {}", s))?;
            rest = chars.as_str();
        }
        Ok(HumanDuration(Duration::from_secs(seconds)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    #[arg(long, env = "TELEGRAM_GROUP_ID", allow_hyphen_values = true)]
    pub telegram_group_id: Option<i64>,

    #[arg(long, env = "TELEGRAM_TOPIC_ID")]
    pub telegram_topic_id: Option<i64>,

    #[arg(long, env = "TELEGRAM_VULNERABILITIES_GROUP_ID", allow_hyphen_values = true)]
    pub telegram_vulnerabilities_group_id: Option<i64>,

    #[arg(long, env = "TELEGRAM_VULNERABILITIES_TOPIC_ID")]
    pub telegram_vulnerabilities_topic_id: Option<i64>,

    #[arg(long, env = "TELEGRAM_ADMIN_CHAT_ID", allow_hyphen_values = true)]
    pub telegram_admin_chat_id: Option<i64>,

    /// `sqlite:<path>` or `memory://`
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:secnews.db")]
    pub database_url: String,

    #[arg(long, env = "PARSE_INTERVAL_MINUTES", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(5..=1440))]
    pub parse_interval_minutes: u64,

    /// Overrides `--parse-interval-minutes`, e.g. `90m` or `1h30m`
    #[arg(long, env = "PARSE_INTERVAL")]
    pub interval: Option<HumanDuration>,

    #[arg(long, env = "MAX_ARTICLES_PER_FETCH", default_value_t = 10,
          value_parser = clap::value_parser!(u64).range(1..=50))]
    pub max_articles_per_fetch: u64,

    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(5..=120))]
    pub request_timeout_seconds: u64,

    #[arg(long, env = "MIN_ARTICLE_DATE", default_value = "2025-08-01")]
    pub min_article_date: NaiveDate,

    #[arg(long, env = "TRANSLATION_TARGET_LANGUAGE", default_value = "ru")]
    pub translation_target_language: String,

    #[arg(long, env = "TRANSLATION_SOURCE_LANGUAGE", default_value = "auto")]
    pub translation_source_language: String,

    #[arg(long, env = "MICROSOFT_TRANSLATOR_KEY", hide_env_values = true)]
    pub microsoft_translator_key: Option<String>,

    #[arg(long, env = "MICROSOFT_TRANSLATOR_REGION")]
    pub microsoft_translator_region: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "PROXY_URL")]
    pub proxy_url: Option<String>,

    #[arg(long, env = "QUIET_START_HOUR", default_value_t = 22,
          value_parser = clap::value_parser!(u32).range(0..=23))]
    pub quiet_start_hour: u32,

    #[arg(long, env = "QUIET_END_HOUR", default_value_t = 10,
          value_parser = clap::value_parser!(u32).range(0..=23))]
    pub quiet_end_hour: u32,

    /// IANA zone the quiet hours are read in, daylight saving included
    #[arg(long, env = "QUIET_TIMEZONE", default_value = "Europe/Moscow")]
    pub quiet_timezone: String,

    #[arg(long, env = "PARSE_API_KEY", hide_env_values = true)]
    pub parse_api_key: Option<String>,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long, env = "KEEP_ALIVE_URL")]
    pub keep_alive_url: Option<String>,

    #[arg(long, env = "ENVIRONMENT", default_value = "production")]
    pub environment: String,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Console)]
    pub log_format: LogFormat,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn interval(&self) -> Result<Duration> {
        let interval = match self.interval {
            Some(HumanDuration(d)) => d,
            None => Duration::from_secs(self.parse_interval_minutes * 60),
        };
        if interval < Duration::from_secs(60) {
            bail!("Parse interval must be at least one minute, got {:?}", interval);
        }
        Ok(interval)
    }

    pub fn bot_token(&self) -> Result<&str> {
        self.telegram_bot_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN is required"))
    }

    pub fn destinations(&self) -> Result<DestinationMap> {
        let group = self
            .telegram_group_id
            .ok_or_else(|| anyhow!("TELEGRAM_GROUP_ID is required"))?;
        let general = Destination::new(group).with_thread(self.telegram_topic_id);
        let vulnerability = self
            .telegram_vulnerabilities_group_id
            .map(|chat_id| Destination::new(chat_id).with_thread(self.telegram_vulnerabilities_topic_id));
        Ok(DestinationMap::new(general).with_vulnerability(vulnerability))
    }

    pub fn admin(&self) -> Option<Destination> {
        self.telegram_admin_chat_id.map(Destination::new)
    }

    pub fn quiet_window(&self) -> Result<QuietWindow> {
        QuietWindow::in_zone(self.quiet_start_hour, self.quiet_end_hour, &self.quiet_timezone)
            .map_err(|e| anyhow!(e))
    }

    pub fn delivery_gate(&self) -> Result<DeliveryGate> {
        Ok(DeliveryGate::new(self.quiet_window()?, self.destinations()?))
    }

    /// `MAX_ARTICLES_PER_FETCH` caps the cycle, not each endpoint.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default().with_min_date(self.min_article_date)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    pub fn translator_config(&self) -> TranslatorConfig {
        TranslatorConfig {
            source_language: self.translation_source_language.clone(),
            target_language: self.translation_target_language.clone(),
            ..TranslatorConfig::default()
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_per_fetch: self.max_articles_per_fetch as usize,
            ..PipelineConfig::default()
        }
    }

    pub fn scheduler_config(&self) -> Result<SchedulerConfig> {
        Ok(SchedulerConfig {
            interval: self.interval()?,
            keep_alive_url: self.keep_alive_url.clone(),
            ..SchedulerConfig::default()
        })
    }

    /// The configured key, or a random one that is logged once so the operator can use it.
    pub fn resolve_parse_api_key(&self) -> String {
        if let Some(key) = self.parse_api_key.as_deref().filter(|k| !k.is_empty()) {
            return key.to_string();
        }
        let generated: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        warn!(api_key = %generated, "No PARSE_API_KEY set, using a generated key");
        generated
    }
}
