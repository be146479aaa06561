//! # automatch-intake
//!
//! **Intake**: everything that happens to a deal and its candidate sources
//! before the engine scores them.
//!
//! ## Architecture
//!
//! Intake sits between the API layer and the engine:
//! 1. **RequestValidator**: hard gate — rejects malformed deals and criteria,
//!    rate-limits AutoMatch runs per sponsor
//! 2. **CandidatePool** / **DealPool**: collect validated sources (or, for a
//!    pipeline run, validated deals) for one run
//! 3. **RequestSealer**: freezes deal + candidates into a `SealedRequest`
//!
//! ## Request Flow
//!
//! ```text
//! API → RequestValidator.validate_deal() → RequestValidator.validate_source()
//!     → CandidatePool.push() → CandidatePool.seal() → RequestSealer.seal()
//!     → SealedRequest → engine
//! ```
//!
//! Every source and deal entering the engine has passed validation.

pub mod candidate_pool;
pub mod request_sealer;
pub mod validator;

pub use candidate_pool::{CandidatePool, DealPool, Pool, Pooled};
pub use request_sealer::RequestSealer;
pub use validator::RequestValidator;
