// crates/load-gate-config/src/config.rs
// ============================================================================
// Module: Load Gate Configuration
// Description: Configuration model, loading, and fail-closed validation.
// Purpose: Turn strict TOML documents into validated engine settings.
// Dependencies: load-gate-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a hard size limit. Unknown
//! keys are rejected at every table, and invalid values fail startup before
//! any record is processed. Validation is exposed separately from loading so
//! tools and tests can validate in-memory documents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use load_gate_core::CalendarMultiplier;
use load_gate_core::EngineSettings;
use load_gate_core::Money;
use load_gate_core::PrimeGateSettings;
use load_gate_core::VelocityLimits;
use load_gate_core::weekday_from_name;
use serde::Deserialize;
use thiserror::Error;
use time::Weekday;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Weekday name accepted without the custom week-start opt-in.
const DEFAULT_WEEK_START: &str = "monday";

/// The only supported currency.
const SUPPORTED_CURRENCY: &str = "USD";

/// The only supported idempotency mode.
const SUPPORTED_IDEMPOTENCY_MODE: &str = "canonical_first";

/// Rule names accepted in `policies.evaluation_order`.
const KNOWN_RULES: [&str; 5] = [
    "idempotency_precedence",
    "daily_attempt_limit",
    "prime_gate",
    "daily_amount_limit",
    "weekly_amount_limit",
];

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {message}")]
    Io {
        /// Configuration file path.
        path: String,
        /// Underlying IO error description.
        message: String,
    },
    /// The configuration file exceeded the size limit.
    #[error("config {path} is {actual} bytes, limit is {limit}")]
    TooLarge {
        /// Configuration file path.
        path: String,
        /// Maximum allowed size in bytes.
        limit: u64,
        /// Actual size in bytes.
        actual: u64,
    },
    /// The document was not valid TOML for the schema (unknown keys
    /// included).
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// `domain.time.week_start` named an unknown weekday.
    #[error("unknown week start weekday {name:?}")]
    UnknownWeekStart {
        /// Rejected weekday name.
        name: String,
    },
    /// A non-Monday week start was used without the explicit opt-in.
    #[error("week start {name:?} requires domain.time.allow_custom_week_start = true")]
    WeekStartNotEnabled {
        /// Rejected weekday name.
        name: String,
    },
    /// `domain.money.currency` named an unsupported currency.
    #[error("unsupported currency {currency:?}; only USD is supported")]
    UnsupportedCurrency {
        /// Rejected currency code.
        currency: String,
    },
    /// `features.monday_multiplier.multiplier` was below one.
    #[error("monday multiplier must be >= 1, got {multiplier}")]
    MultiplierTooSmall {
        /// Rejected multiplier.
        multiplier: u64,
    },
    /// `idempotency.mode` named an unsupported mode.
    #[error("unsupported idempotency mode {mode:?}; only canonical_first is supported")]
    UnsupportedIdempotencyMode {
        /// Rejected mode name.
        mode: String,
    },
    /// `policies.evaluation_order` named an unknown rule.
    #[error("unknown rule {name:?} in policies.evaluation_order")]
    UnknownRule {
        /// Rejected rule name.
        name: String,
    },
    /// `output.file_path` was empty.
    #[error("output.file_path must not be empty")]
    EmptyOutputPath,
}

// ============================================================================
// SECTION: Domain Configuration
// ============================================================================

/// Time-domain configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeConfig {
    /// Weekday on which weekly windows begin.
    #[serde(default = "default_week_start")]
    pub week_start: String,
    /// Opt-in for week starts other than Monday.
    #[serde(default)]
    pub allow_custom_week_start: bool,
}

/// Default week-start weekday name.
fn default_week_start() -> String {
    DEFAULT_WEEK_START.to_string()
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            allow_custom_week_start: false,
        }
    }
}

/// Money-domain configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoneyConfig {
    /// Currency code; only USD is supported.
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Default currency code.
fn default_currency() -> String {
    SUPPORTED_CURRENCY.to_string()
}

impl Default for MoneyConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

/// Domain configuration table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    /// Time-domain configuration.
    #[serde(default)]
    pub time: TimeConfig,
    /// Money-domain configuration.
    #[serde(default)]
    pub money: MoneyConfig,
}

// ============================================================================
// SECTION: Feature Configuration
// ============================================================================

/// Monday multiplier feature configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiplierConfig {
    /// Whether Monday amounts are amplified.
    #[serde(default)]
    pub enabled: bool,
    /// Integer amplification factor.
    #[serde(default = "default_multiplier")]
    pub multiplier: u64,
}

/// Default amplification factor.
const fn default_multiplier() -> u64 {
    2
}

impl Default for MultiplierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            multiplier: default_multiplier(),
        }
    }
}

/// Prime gate feature configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimeGateFeatureConfig {
    /// Whether prime-identifier gating participates in evaluation.
    #[serde(default)]
    pub enabled: bool,
}

/// Feature configuration table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeaturesConfig {
    /// Monday multiplier feature.
    #[serde(default)]
    pub monday_multiplier: MultiplierConfig,
    /// Prime gate feature.
    #[serde(default)]
    pub prime_gate: PrimeGateFeatureConfig,
}

// ============================================================================
// SECTION: Policy Configuration
// ============================================================================

/// Velocity limit configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum accepted amount per (customer, day).
    #[serde(default = "default_daily_amount")]
    pub daily_amount: Money,
    /// Maximum accepted amount per (customer, week).
    #[serde(default = "default_weekly_amount")]
    pub weekly_amount: Money,
    /// Maximum canonical attempts per (customer, day).
    #[serde(default = "default_daily_attempts")]
    pub daily_attempts: u32,
}

/// Default daily amount limit.
const fn default_daily_amount() -> Money {
    Money::from_minor_units(500_000)
}

/// Default weekly amount limit.
const fn default_weekly_amount() -> Money {
    Money::from_minor_units(2_000_000)
}

/// Default daily attempt limit.
const fn default_daily_attempts() -> u32 {
    3
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            daily_amount: default_daily_amount(),
            weekly_amount: default_weekly_amount(),
            daily_attempts: default_daily_attempts(),
        }
    }
}

/// Prime gate policy configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimeGatePolicyConfig {
    /// Maximum prime-id approvals per UTC day, globally.
    #[serde(default = "default_prime_global_per_day")]
    pub global_per_day: u32,
    /// Maximum effective amount for a prime-id record.
    #[serde(default = "default_prime_amount_cap")]
    pub amount_cap: Money,
}

/// Default global prime approval budget.
const fn default_prime_global_per_day() -> u32 {
    1
}

/// Default prime amount cap.
const fn default_prime_amount_cap() -> Money {
    Money::from_minor_units(999_900)
}

impl Default for PrimeGatePolicyConfig {
    fn default() -> Self {
        Self {
            global_per_day: default_prime_global_per_day(),
            amount_cap: default_prime_amount_cap(),
        }
    }
}

/// Policy configuration table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoliciesConfig {
    /// Velocity limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Prime gate policy parameters.
    #[serde(default)]
    pub prime_gate: PrimeGatePolicyConfig,
    /// Documentation of rule order; names are validated, order is
    /// informational because the engine enforces the canonical sequence.
    #[serde(default)]
    pub evaluation_order: Option<Vec<String>>,
}

// ============================================================================
// SECTION: Idempotency and Output Configuration
// ============================================================================

/// Idempotency configuration table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdempotencyConfig {
    /// Duplicate handling mode; only `canonical_first` is supported.
    #[serde(default = "default_idempotency_mode")]
    pub mode: String,
}

/// Default idempotency mode.
fn default_idempotency_mode() -> String {
    SUPPORTED_IDEMPOTENCY_MODE.to_string()
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            mode: default_idempotency_mode(),
        }
    }
}

/// Output configuration table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output file path; the CLI `--output` flag overrides it.
    #[serde(default = "default_output_path")]
    pub file_path: String,
    /// Whether the sink writes to a temp path and renames on success.
    #[serde(default = "default_atomic_replace")]
    pub atomic_replace: bool,
}

/// Default output file path.
fn default_output_path() -> String {
    "output.ndjson".to_string()
}

/// Default atomic replace toggle.
const fn default_atomic_replace() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_path: default_output_path(),
            atomic_replace: default_atomic_replace(),
        }
    }
}

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Root configuration document.
///
/// # Invariants
/// - Unknown keys are rejected at every table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Domain configuration.
    #[serde(default)]
    pub domain: DomainConfig,
    /// Feature configuration.
    #[serde(default)]
    pub features: FeaturesConfig,
    /// Policy configuration.
    #[serde(default)]
    pub policies: PoliciesConfig,
    /// Idempotency configuration.
    #[serde(default)]
    pub idempotency: IdempotencyConfig,
    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

impl EngineConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on IO failures, oversized files, parse
    /// failures, unknown keys, or invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io {
            path: display.clone(),
            message: err.to_string(),
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path: display,
                limit: MAX_CONFIG_FILE_SIZE,
                actual: metadata.len(),
            });
        }
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: display,
            message: err.to_string(),
        })?;
        let config = Self::from_toml(&text)?;
        Ok(config)
    }

    /// Parses and validates an in-memory TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on parse failures, unknown keys, or invalid
    /// values.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every recognized option.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered in document order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let week_start_name = &self.domain.time.week_start;
        let week_start = self.week_start()?;
        if week_start != Weekday::Monday && !self.domain.time.allow_custom_week_start {
            return Err(ConfigError::WeekStartNotEnabled {
                name: week_start_name.clone(),
            });
        }
        if self.domain.money.currency != SUPPORTED_CURRENCY {
            return Err(ConfigError::UnsupportedCurrency {
                currency: self.domain.money.currency.clone(),
            });
        }
        if self.features.monday_multiplier.multiplier < 1 {
            return Err(ConfigError::MultiplierTooSmall {
                multiplier: self.features.monday_multiplier.multiplier,
            });
        }
        if self.idempotency.mode != SUPPORTED_IDEMPOTENCY_MODE {
            return Err(ConfigError::UnsupportedIdempotencyMode {
                mode: self.idempotency.mode.clone(),
            });
        }
        if let Some(order) = &self.policies.evaluation_order {
            for name in order {
                if !KNOWN_RULES.contains(&name.as_str()) {
                    return Err(ConfigError::UnknownRule {
                        name: name.clone(),
                    });
                }
            }
        }
        if self.output.file_path.is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }
        Ok(())
    }

    /// Resolves the configured week-start weekday.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownWeekStart`] for unrecognized names.
    pub fn week_start(&self) -> Result<Weekday, ConfigError> {
        weekday_from_name(&self.domain.time.week_start).ok_or_else(|| {
            ConfigError::UnknownWeekStart {
                name: self.domain.time.week_start.clone(),
            }
        })
    }

    /// Maps the validated document onto engine settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        self.validate()?;
        Ok(EngineSettings {
            week_start: self.week_start()?,
            multiplier: CalendarMultiplier {
                enabled: self.features.monday_multiplier.enabled,
                weekday: Weekday::Monday,
                factor: self.features.monday_multiplier.multiplier,
            },
            prime_gate: PrimeGateSettings {
                enabled: self.features.prime_gate.enabled,
                global_per_day: self.policies.prime_gate.global_per_day,
                amount_cap: self.policies.prime_gate.amount_cap,
            },
            limits: VelocityLimits {
                daily_amount: self.policies.limits.daily_amount,
                weekly_amount: self.policies.limits.weekly_amount,
                daily_attempts: self.policies.limits.daily_attempts,
            },
        })
    }
}
