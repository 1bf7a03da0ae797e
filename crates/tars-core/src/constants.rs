//! Default tunables, sanity ceilings, and wire constants.

// --- Distance factor ---

/// Range at or inside which the distance factor is 1.0 (meters).
pub const DISTANCE_NEAR: f64 = 250.0;

/// Range at or beyond which the distance factor is 0.0 (meters).
pub const DISTANCE_FAR: f64 = 7500.0;

/// Upper ceiling for any configured range bound (meters).
pub const DISTANCE_CEILING: f64 = 25_000.0;

// --- Speed factor ---

/// Speed at or below which the speed factor is 0.0 (m/s).
pub const SPEED_SLOW: f64 = 10.0;

/// Speed at or above which the speed factor is 1.0 (m/s).
pub const SPEED_FAST: f64 = 250.0;

/// Upper ceiling for configured speed bounds (m/s).
pub const SPEED_CEILING: f64 = 2500.0;

// --- Approach factor ---

/// Predicted closest approach at or inside which the approach factor is 1.0 (meters).
pub const APPROACH_NEAR: f64 = 1000.0;

/// Predicted closest approach at or beyond which the approach factor is 0.0 (meters).
pub const APPROACH_FAR: f64 = 4500.0;

// --- Offense rating factor ---

/// Offense rating that maps to a full-threat factor.
pub const OFFENSE_RATING_MAX: f64 = 75.0;

/// Upper ceiling for the configured offense rating cap.
pub const OFFENSE_RATING_CEILING: f64 = 1000.0;

// --- Curve sanity ---

/// Minimum span enforced between a curve's lower and upper bound.
pub const CURVE_MIN_SPAN: f64 = 1.0;

/// Smallest accepted curve exponent.
pub const CURVE_EXPONENT_MIN: f64 = 0.1;

/// Largest accepted curve exponent.
pub const CURVE_EXPONENT_MAX: f64 = 10.0;

/// Largest accepted per-term weight.
pub const WEIGHT_MAX: f64 = 10.0;

// --- Scan ---

/// Hard outer sensing radius; contacts beyond it never enter scoring (meters).
pub const MAX_DETECTION_DISTANCE: f64 = 25_000.0;

// --- Defense condition thresholds (exclusive lower bounds) ---

pub const THRESHOLD_CRITICAL: f64 = 5.0;
pub const THRESHOLD_HIGH: f64 = 3.0;
pub const THRESHOLD_ELEVATED: f64 = 1.0;
pub const THRESHOLD_MILD: f64 = 0.05;

/// Minimum gap kept between adjacent thresholds after sanitizing.
pub const THRESHOLD_MIN_GAP: f64 = 0.01;

/// Largest accepted hysteresis margin.
pub const HYSTERESIS_MAX: f64 = 1.0;

// --- Overrides ---

/// Minimum increase in cumulative hull damage that counts as new damage.
pub const DAMAGE_EPSILON: f64 = 0.1;

// --- Event log ---

/// Maximum retained event records and rendered log lines.
pub const EVENT_LOG_CAPACITY: usize = 100;

/// Separator line written above each event header in the rolling text.
pub const EVENT_LOG_SEPARATOR: &str = "======================";

/// Fingerprint score quantization (scores are rounded to 1/1000).
pub const FINGERPRINT_SCORE_SCALE: f64 = 1000.0;

// --- IFF broadcast ---

/// Channel tag for IFF broadcasts.
pub const IFF_CHANNEL: &str = "IGC_IFF_MSG";

pub const IFF_FLAGS_NEUTRAL: u8 = 0;
pub const IFF_FLAG_ENEMY: u8 = 1;
pub const IFF_FLAG_FRIENDLY: u8 = 2;
pub const IFF_FLAG_LOCKED: u8 = 4;
pub const IFF_FLAG_LARGE_PLATFORM: u8 = 8;
pub const IFF_FLAG_SMALL_PLATFORM: u8 = 16;
pub const IFF_FLAG_GUIDED_MUNITION: u8 = 32;
pub const IFF_FLAG_NATURAL_OBJECT: u8 = 64;

// --- Cadence ---

/// Nominal host cadence between assessment ticks (milliseconds).
pub const TICK_INTERVAL_MS: i64 = 167;
