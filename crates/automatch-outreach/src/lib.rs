//! # automatch-outreach
//!
//! **Outreach**: what happens after a ranked run.
//!
//! ## Architecture
//!
//! Outreach receives a [`MatchRun`](automatch_types::MatchRun) from the
//! engine and:
//! 1. Filters out (deal, source) pairs already notified — a re-run of
//!    AutoMatch never notifies the same CDE about the same deal twice
//! 2. Tracks sponsor match requests opened from results, capping the
//!    number a deal can hold pending at once
//!
//! Both components are in-memory. The ledger is bounded by its capacity;
//! the request book keeps every request and bounds only the pending ones
//! per deal. Persistence belongs to the surrounding application.

pub mod match_ledger;
pub mod request_book;

pub use match_ledger::{MatchKey, MatchLedger};
pub use request_book::RequestBook;
