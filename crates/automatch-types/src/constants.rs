//! System-wide constants for the AutoMatch engine.

/// Minimum score for an "excellent" match.
pub const DEFAULT_EXCELLENT_THRESHOLD: u8 = 80;

/// Minimum score for a "good" match.
pub const DEFAULT_GOOD_THRESHOLD: u8 = 60;

/// Minimum score for a "fair" match. Anything below is "weak".
pub const DEFAULT_FAIR_THRESHOLD: u8 = 40;

/// Results scoring below this are dropped from a ranked run.
pub const DEFAULT_MIN_SCORE: u8 = 40;

/// Maximum results returned from a single ranked run.
pub const DEFAULT_MAX_RESULTS: usize = 25;

/// Weight of every criterion unless overridden in config.
pub const DEFAULT_CRITERION_WEIGHT: u32 = 1;

/// Total project cost at or below which a deal counts as a "small deal"
/// (whole dollars).
pub const DEFAULT_SMALL_DEAL_THRESHOLD: i64 = 5_000_000;

/// Maximum candidates accepted into one run's candidate pool.
pub const MAX_CANDIDATES_PER_RUN: usize = 5_000;

/// Number of (deal, source) notification keys the ledger remembers.
pub const DEFAULT_LEDGER_CAPACITY: usize = 100_000;

/// Maximum pending match requests a sponsor may hold open per deal.
pub const DEFAULT_MAX_OPEN_REQUESTS_PER_DEAL: usize = 5;

/// Maximum AutoMatch runs per sponsor within one run window.
pub const DEFAULT_MAX_RUNS_PER_SPONSOR: usize = 100;

/// Upper bound for percentage fields other than MFI (poverty, unemployment).
pub const MAX_PERCENTAGE: i64 = 100;

/// Upper bound for the tract median-family-income percentage.
pub const MAX_MFI_PERCENTAGE: i64 = 1_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "AutoMatch";
