//! # automatch-engine
//!
//! **Pure deterministic scoring engine for AutoMatch.**
//!
//! The engine evaluates a sponsor's deal against a capital source's stated
//! criteria and ranks candidates. It has:
//!
//! - **Zero side effects**: no DB reads, no notifications, no validation state
//! - **Deterministic output**: same inputs -> same scores, same ranking, same run root
//! - **Hard eligibility gates**: program, intake status, and allocation
//! - **Explainable scores**: every criterion yields a human-readable sentence

pub mod determinism;
pub mod format;
pub mod ranking;
pub mod rules;
pub mod scorer;

pub use determinism::{check_run, compute_run_root, verify_run_root};
pub use ranking::{rank_deals, rank_sources, score_sealed_request};
pub use rules::{evaluate, evaluate_cde, evaluate_investor};
pub use scorer::score_match;
