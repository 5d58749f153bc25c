//! Events emitted by the ledger for the host to process.
//!
//! Mutations push events into a pending buffer on the ledger; the service
//! layer drains them after each operation. A mutation that fails emits
//! nothing.

use serde::{Deserialize, Serialize};
use tally_types::{CampaignId, OptionId, Timestamp, VoterId};

/// A state change recorded by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A new campaign was created with its initial options and whitelist.
    CampaignCreated {
        campaign: CampaignId,
        admin: VoterId,
        end_time: Timestamp,
    },
    /// A campaign was explicitly stopped by its admin. Fires only on the
    /// false→true transition, never on repeat stops.
    CampaignStopped { campaign: CampaignId },
    /// Options were appended to an existing campaign.
    OptionsAdded {
        campaign: CampaignId,
        options: Vec<OptionId>,
    },
    /// The whitelist changed (add, remove, or wholesale replace).
    WhitelistUpdated {
        campaign: CampaignId,
        added: u64,
        removed: u64,
    },
    /// A voter cast or replaced a selection.
    VoteCast {
        campaign: CampaignId,
        voter: VoterId,
        options: Vec<OptionId>,
    },
    /// A voter's selections were retracted — by an explicit unvote or by the
    /// whitelist-removal cascade.
    VotesRetracted {
        campaign: CampaignId,
        voter: VoterId,
        retracted: u64,
    },
}
