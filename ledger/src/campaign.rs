//! Campaign records and query views.

use serde::{Deserialize, Serialize};
use tally_types::{CampaignId, Label, Timestamp, VoterId};

/// Per-campaign metadata stored in the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: CampaignId,
    /// Immutable campaign title.
    pub title: Label,
    /// The campaign is ended once the current time reaches this point.
    pub end_time: Timestamp,
    /// Identity of the creator; the only caller allowed admin operations.
    pub admin: VoterId,
    /// Whether a voter may select more than one option at a time.
    pub allow_multiple_choices: bool,
    /// Set once, by the admin, via an explicit stop. Never reverts.
    pub stopped: bool,
    /// Number of options created for this campaign. Options are append-only,
    /// so option IDs are exactly `[0, option_count)`.
    pub option_count: u64,
}

impl CampaignRecord {
    /// Whether the campaign is ended: explicitly stopped, or past its end time.
    pub fn is_ended(&self, now: Timestamp) -> bool {
        self.stopped || self.end_time.has_passed(now)
    }

    pub fn details(&self) -> CampaignDetails {
        CampaignDetails {
            id: self.id,
            title: self.title.clone(),
            end_time: self.end_time,
            admin: self.admin,
            allow_multiple_choices: self.allow_multiple_choices,
        }
    }
}

/// Read-only campaign metadata returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDetails {
    pub id: CampaignId,
    pub title: Label,
    pub end_time: Timestamp,
    pub admin: VoterId,
    pub allow_multiple_choices: bool,
}
