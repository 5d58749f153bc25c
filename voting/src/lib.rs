//! Voting engine — executes vote and unvote requests against the campaign
//! ledger, enforcing the whitelist gate and multi-choice rules.

pub mod engine;

pub use engine::VotingEngine;
