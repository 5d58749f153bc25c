//! Whitelist registry operations.
//!
//! Whitelists gate voting: an identity absent from a campaign's whitelist
//! cannot vote there. Removing an identity triggers the retraction cascade —
//! the identity's votes in that campaign are retracted immediately, keeping
//! the voter sets consistent with the whitelist at every observable point.
//!
//! Whitelist mutations are admin-only but are permitted after campaign end:
//! they are roster maintenance, not vote actions.

use tally_types::{CampaignId, TallyError, VoterId};

use crate::event::LedgerEvent;
use crate::ledger::CampaignLedger;
use crate::roster::Roster;

/// Summary of a whitelist mutation, returned to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WhitelistChange {
    /// Identities newly added to the whitelist.
    pub added: u64,
    /// Identities removed from the whitelist.
    pub removed: u64,
    /// Voter-set entries retracted by the removal cascade.
    pub retracted: u64,
}

impl CampaignLedger {
    /// Replace a campaign's whitelist wholesale.
    ///
    /// The new roster takes the provided sequence's order (first occurrence
    /// wins on duplicates). Every current member absent from the new set is
    /// removed and its votes are cascade-retracted.
    pub fn set_whitelist(
        &mut self,
        campaign: CampaignId,
        identities: &[VoterId],
        caller: VoterId,
    ) -> Result<WhitelistChange, TallyError> {
        self.require_admin(campaign, caller)?;

        let mut replacement = Roster::new();
        for &identity in identities {
            replacement.insert(identity);
        }

        let current = self.whitelist(campaign)?;
        let dropped: Vec<VoterId> = current
            .iter()
            .copied()
            .filter(|member| !replacement.contains(member))
            .collect();
        let added = replacement
            .iter()
            .copied()
            .filter(|member| !current.contains(member))
            .count() as u64;

        self.whitelists.insert(campaign, replacement);
        let retracted = self.cascade_retraction(campaign, &dropped)?;

        let change = WhitelistChange {
            added,
            removed: dropped.len() as u64,
            retracted,
        };
        if change.added > 0 || change.removed > 0 {
            self.pending_events.push(LedgerEvent::WhitelistUpdated {
                campaign,
                added: change.added,
                removed: change.removed,
            });
        }
        Ok(change)
    }

    /// Add identities to a campaign's whitelist (set union).
    ///
    /// New members append in the given order; adding never invalidates an
    /// existing vote, so no cascade runs.
    pub fn add_whitelist(
        &mut self,
        campaign: CampaignId,
        identities: &[VoterId],
        caller: VoterId,
    ) -> Result<WhitelistChange, TallyError> {
        self.require_admin(campaign, caller)?;
        let roster = self.whitelist_mut(campaign)?;
        let mut added = 0u64;
        for &identity in identities {
            if roster.insert(identity) {
                added += 1;
            }
        }
        let change = WhitelistChange {
            added,
            ..WhitelistChange::default()
        };
        if added > 0 {
            self.pending_events.push(LedgerEvent::WhitelistUpdated {
                campaign,
                added,
                removed: 0,
            });
        }
        Ok(change)
    }

    /// Remove identities from a campaign's whitelist (set difference).
    ///
    /// Absent identities are ignored. Each actually-removed identity has its
    /// votes in the campaign cascade-retracted.
    pub fn remove_whitelist(
        &mut self,
        campaign: CampaignId,
        identities: &[VoterId],
        caller: VoterId,
    ) -> Result<WhitelistChange, TallyError> {
        self.require_admin(campaign, caller)?;
        let roster = self.whitelist_mut(campaign)?;
        let mut dropped = Vec::new();
        for identity in identities {
            if roster.remove(identity) {
                dropped.push(*identity);
            }
        }
        let retracted = self.cascade_retraction(campaign, &dropped)?;
        let change = WhitelistChange {
            added: 0,
            removed: dropped.len() as u64,
            retracted,
        };
        if change.removed > 0 {
            self.pending_events.push(LedgerEvent::WhitelistUpdated {
                campaign,
                added: 0,
                removed: change.removed,
            });
        }
        Ok(change)
    }

    /// Whether an identity is currently whitelisted for a campaign.
    pub fn is_whitelisted(
        &self,
        campaign: CampaignId,
        identity: VoterId,
    ) -> Result<bool, TallyError> {
        Ok(self.whitelist(campaign)?.contains(&identity))
    }

    /// Current whitelist members in insertion order. A removed-then-readded
    /// member appears at the end.
    pub fn whitelisted(&self, campaign: CampaignId) -> Result<Vec<VoterId>, TallyError> {
        Ok(self.whitelist(campaign)?.members())
    }

    // ── Internal ───────────────────────────────────────────────────────

    /// Retract every removed identity's votes in the campaign. Runs
    /// regardless of ended state: this is cleanup, not a vote.
    fn cascade_retraction(
        &mut self,
        campaign: CampaignId,
        removed: &[VoterId],
    ) -> Result<u64, TallyError> {
        let mut total = 0u64;
        for &identity in removed {
            let retracted = self.retract_votes(campaign, identity)?;
            if retracted > 0 {
                self.pending_events.push(LedgerEvent::VotesRetracted {
                    campaign,
                    voter: identity,
                    retracted,
                });
                total += retracted;
            }
        }
        Ok(total)
    }

    fn require_admin(&self, campaign: CampaignId, caller: VoterId) -> Result<(), TallyError> {
        let record = self.campaign(campaign)?;
        if record.admin != caller {
            return Err(TallyError::NotAdmin { campaign, caller });
        }
        Ok(())
    }

    fn whitelist(&self, campaign: CampaignId) -> Result<&Roster, TallyError> {
        self.campaign(campaign)?;
        self.whitelists
            .get(&campaign)
            .ok_or(TallyError::CampaignNotFound(campaign))
    }

    fn whitelist_mut(&mut self, campaign: CampaignId) -> Result<&mut Roster, TallyError> {
        self.campaign(campaign)?;
        self.whitelists
            .get_mut(&campaign)
            .ok_or(TallyError::CampaignNotFound(campaign))
    }
}
