//! Top-level error type shared across crates.
//!
//! Every variant falls into one of five categories: not-found (unknown
//! campaign or option), unauthorized (non-admin or non-whitelisted caller),
//! invalid argument (malformed inputs, limit violations), range (composite
//! key width), and campaign-ended. Mutations that fail leave the ledger
//! unchanged.

use crate::id::{CampaignId, OptionId};
use crate::identity::VoterId;
use crate::time::Timestamp;
use thiserror::Error;

/// Common error type for the tally ledger.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error("campaign {0} does not exist")]
    CampaignNotFound(CampaignId),

    #[error("option {option} does not exist in campaign {campaign}")]
    OptionNotFound {
        campaign: CampaignId,
        option: OptionId,
    },

    #[error("caller {caller} is not the admin of campaign {campaign}")]
    NotAdmin {
        campaign: CampaignId,
        caller: VoterId,
    },

    #[error("caller {caller} is not whitelisted for campaign {campaign}")]
    NotWhitelisted {
        campaign: CampaignId,
        caller: VoterId,
    },

    #[error("option name and URL counts differ: {names} names, {urls} urls")]
    OptionListMismatch { names: usize, urls: usize },

    #[error("a campaign must have at least one option")]
    EmptyOptionList,

    #[error("end time {end_time} is not in the future (now {now})")]
    EndTimeNotFuture { end_time: Timestamp, now: Timestamp },

    #[error("campaign does not allow multiple choices: {requested} options requested")]
    MultipleChoicesNotAllowed { requested: usize },

    #[error("{what} limit exceeded: limit {limit}, requested {requested}")]
    LimitExceeded {
        what: &'static str,
        limit: u64,
        requested: u64,
    },

    #[error("identifier {value} does not fit in {bits} bits")]
    KeyWidthExceeded { value: u64, bits: u32 },

    #[error("campaign {0} has ended")]
    CampaignEnded(CampaignId),
}
