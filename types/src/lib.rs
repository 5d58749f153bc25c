//! Fundamental types for the tally ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: campaign and option identifiers, the packed composite key,
//! voter identities, chunked byte-string labels, timestamps, and the shared
//! error taxonomy.

pub mod error;
pub mod id;
pub mod identity;
pub mod key;
pub mod text;
pub mod time;

pub use error::TallyError;
pub use id::{CampaignId, OptionId};
pub use identity::VoterId;
pub use key::OptionKey;
pub use text::Label;
pub use time::Timestamp;
