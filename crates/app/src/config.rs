//! Application configuration
//!
//! Every setting can come from the command line or the environment; a `.env`
//! file is loaded first when present.

use clap::{Args, ValueEnum};
use rebate::usage::UsagePolicy;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::domain::usage::data::UsageSettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown currency code {0}")]
    UnknownCurrency(String),

    #[error("usage max attempts must be at least 1")]
    ZeroAttempts,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Database settings.
#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,
}

/// Which promotions a completed order is charged for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum UsagePolicyArg {
    /// Every promotion a purchased product falls under.
    #[default]
    AllMatching,

    /// Only the promotion giving each line its lowest price.
    WinningOnly,
}

impl From<UsagePolicyArg> for UsagePolicy {
    fn from(value: UsagePolicyArg) -> Self {
        match value {
            UsagePolicyArg::AllMatching => Self::AllMatching,
            UsagePolicyArg::WinningOnly => Self::WinningOnly,
        }
    }
}

/// Pricing and usage accounting settings.
#[derive(Debug, Clone, Args)]
pub struct EngineConfig {
    /// ISO 4217 code of catalog prices
    #[arg(long, env = "CURRENCY", default_value = "VND", global = true)]
    pub currency: String,

    /// Promotions charged per completed order (all-matching, winning-only)
    #[arg(long, env = "USAGE_POLICY", value_enum, default_value_t = UsagePolicyArg::AllMatching, global = true)]
    pub usage_policy: UsagePolicyArg,

    /// Attempts per promotion when a usage update conflicts
    #[arg(long, env = "USAGE_MAX_ATTEMPTS", default_value_t = 3, global = true)]
    pub usage_max_attempts: u32,
}

impl EngineConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes outside ISO 4217.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.to_ascii_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Usage accountant settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown currency or zero attempts.
    pub fn usage_settings(&self) -> Result<UsageSettings, ConfigError> {
        if self.usage_max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }

        Ok(UsageSettings {
            policy: self.usage_policy.into(),
            max_attempts: self.usage_max_attempts,
            currency: self.currency()?,
        })
    }
}
