//! The vote/unvote state machine.
//!
//! Per (campaign, identity) the state is either not-voted or voted-for some
//! option set. A vote request always replaces the prior selection in full:
//! the voter is retracted from every option of the campaign, then added to
//! each requested option. An empty request is an unvote, which succeeds even
//! when there is nothing to retract.
//!
//! Checks run in a fixed order before anything is applied:
//! ended state, whitelist membership, multi-choice rule, option bounds.

use std::collections::BTreeSet;

use tally_ledger::CampaignLedger;
use tally_types::{CampaignId, OptionId, TallyError, Timestamp, VoterId};

/// Engine for casting and retracting votes.
pub struct VotingEngine;

impl VotingEngine {
    /// Cast, replace, or retract a voter's selection. Returns the number of
    /// voter-set entries retracted by the full reset.
    ///
    /// Duplicate IDs in the request collapse to set semantics: requesting
    /// `[0, 0]` selects one option and passes the single-choice rule.
    pub fn vote(
        &self,
        ledger: &mut CampaignLedger,
        campaign: CampaignId,
        option_ids: &[OptionId],
        caller: VoterId,
        now: Timestamp,
    ) -> Result<u64, TallyError> {
        if ledger.is_ended(campaign, now)? {
            return Err(TallyError::CampaignEnded(campaign));
        }
        if !ledger.is_whitelisted(campaign, caller)? {
            return Err(TallyError::NotWhitelisted { campaign, caller });
        }
        let selection: BTreeSet<OptionId> = option_ids.iter().copied().collect();
        let details = ledger.details(campaign)?;
        if !details.allow_multiple_choices && selection.len() > 1 {
            return Err(TallyError::MultipleChoicesNotAllowed {
                requested: selection.len(),
            });
        }
        let option_count = ledger.option_count(campaign)?;
        for &option in &selection {
            if option.as_u64() >= option_count {
                return Err(TallyError::OptionNotFound { campaign, option });
            }
        }
        ledger.apply_vote(campaign, caller, &selection)
    }

    /// The options an identity currently selects in a campaign, in option
    /// order. Empty means not voted.
    pub fn selection(
        &self,
        ledger: &CampaignLedger,
        campaign: CampaignId,
        identity: VoterId,
    ) -> Result<Vec<OptionId>, TallyError> {
        ledger.selection(campaign, identity)
    }
}
