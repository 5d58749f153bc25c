//! The campaign ledger arena — owns all campaign, option, and whitelist state.
//!
//! Every mutation is validate-then-apply: all preconditions are checked
//! before the first write, so a failed operation leaves the ledger exactly
//! as it was. In particular a failed campaign creation allocates no ID.
//!
//! Options are stored in one `BTreeMap` keyed by the packed composite key,
//! so a campaign's options are enumerated with a single ordered range scan.

use std::collections::{BTreeMap, BTreeSet};

use tally_types::{CampaignId, Label, OptionId, OptionKey, TallyError, Timestamp, VoterId};

use crate::active::ActiveIndex;
use crate::campaign::{CampaignDetails, CampaignRecord};
use crate::event::LedgerEvent;
use crate::option::{OptionLists, OptionRecord, OptionView};
use crate::roster::Roster;

/// The owned store of all campaign state.
pub struct CampaignLedger {
    pub(crate) campaigns: BTreeMap<CampaignId, CampaignRecord>,
    /// All options of all campaigns, keyed by the packed (campaign, option)
    /// composite key. Key uniqueness here is ledger-wide option uniqueness.
    pub(crate) options: BTreeMap<OptionKey, OptionRecord>,
    pub(crate) whitelists: BTreeMap<CampaignId, Roster>,
    pub(crate) active: ActiveIndex,
    pub(crate) next_campaign_id: u64,
    pub(crate) pending_events: Vec<LedgerEvent>,
}

impl CampaignLedger {
    pub fn new() -> Self {
        Self {
            campaigns: BTreeMap::new(),
            options: BTreeMap::new(),
            whitelists: BTreeMap::new(),
            active: ActiveIndex::new(),
            next_campaign_id: 0,
            pending_events: Vec::new(),
        }
    }

    // ── Campaign registry ──────────────────────────────────────────────

    /// Create a new campaign with its initial options and whitelist.
    ///
    /// The caller becomes the campaign admin. Validation happens before the
    /// ID is allocated; a rejected creation does not consume an ID.
    #[allow(clippy::too_many_arguments)]
    pub fn create_campaign(
        &mut self,
        title: Label,
        option_names: Vec<Label>,
        option_urls: Vec<Label>,
        end_time: Timestamp,
        allow_multiple_choices: bool,
        whitelist: &[VoterId],
        caller: VoterId,
        now: Timestamp,
    ) -> Result<CampaignId, TallyError> {
        validate_option_lists(&option_names, &option_urls)?;
        if end_time.has_passed(now) {
            return Err(TallyError::EndTimeNotFuture { end_time, now });
        }
        let id = CampaignId::new(self.next_campaign_id);
        // Width check up front: if the last option of this campaign cannot be
        // packed, nothing is allocated.
        OptionKey::pack(id, OptionId::new(option_names.len() as u64 - 1))?;

        self.next_campaign_id += 1;
        self.campaigns.insert(
            id,
            CampaignRecord {
                id,
                title,
                end_time,
                admin: caller,
                allow_multiple_choices,
                stopped: false,
                option_count: 0,
            },
        );
        self.insert_options(id, option_names, option_urls)
            .expect("options validated before campaign insertion");

        let mut roster = Roster::new();
        for &identity in whitelist {
            roster.insert(identity);
        }
        self.whitelists.insert(id, roster);

        self.active.insert(id);
        self.sweep_active(now);
        self.pending_events.push(LedgerEvent::CampaignCreated {
            campaign: id,
            admin: caller,
            end_time,
        });
        Ok(id)
    }

    /// Stop a campaign. Admin-only; idempotent — stopping an already-stopped
    /// or time-ended campaign succeeds without effect.
    pub fn stop_campaign(
        &mut self,
        campaign: CampaignId,
        caller: VoterId,
        now: Timestamp,
    ) -> Result<(), TallyError> {
        let record = self.campaign_mut(campaign)?;
        if record.admin != caller {
            return Err(TallyError::NotAdmin { campaign, caller });
        }
        if !record.stopped {
            record.stopped = true;
            self.pending_events
                .push(LedgerEvent::CampaignStopped { campaign });
        }
        self.active.remove(campaign);
        self.sweep_active(now);
        Ok(())
    }

    /// Whether the campaign is ended: stopped, or past its end time.
    pub fn is_ended(&self, campaign: CampaignId, now: Timestamp) -> Result<bool, TallyError> {
        Ok(self.campaign(campaign)?.is_ended(now))
    }

    pub fn details(&self, campaign: CampaignId) -> Result<CampaignDetails, TallyError> {
        Ok(self.campaign(campaign)?.details())
    }

    pub fn option_count(&self, campaign: CampaignId) -> Result<u64, TallyError> {
        Ok(self.campaign(campaign)?.option_count)
    }

    /// Total number of campaigns ever created.
    pub fn campaign_count(&self) -> u64 {
        self.campaigns.len() as u64
    }

    /// IDs of campaigns that are neither stopped nor past their end time,
    /// in creation order.
    ///
    /// Filters the stored index live: a campaign whose end time elapsed
    /// passively is excluded even before a mutation sweeps it out.
    pub fn active_campaigns(&self, now: Timestamp) -> Vec<CampaignId> {
        self.active
            .iter()
            .filter(|id| {
                self.campaigns
                    .get(id)
                    .is_some_and(|record| !record.is_ended(now))
            })
            .collect()
    }

    // ── Option ledger ──────────────────────────────────────────────────

    /// Append options to an existing campaign. Admin-only, and only while
    /// the campaign has not ended. IDs continue the contiguous range.
    pub fn add_options(
        &mut self,
        campaign: CampaignId,
        names: Vec<Label>,
        urls: Vec<Label>,
        caller: VoterId,
        now: Timestamp,
    ) -> Result<Vec<OptionId>, TallyError> {
        validate_option_lists(&names, &urls)?;
        let record = self.campaign(campaign)?;
        if record.admin != caller {
            return Err(TallyError::NotAdmin { campaign, caller });
        }
        if record.is_ended(now) {
            return Err(TallyError::CampaignEnded(campaign));
        }
        // Width check before any write.
        OptionKey::pack(
            campaign,
            OptionId::new(record.option_count + names.len() as u64 - 1),
        )?;

        let ids = self
            .insert_options(campaign, names, urls)
            .expect("options validated before insertion");
        self.pending_events.push(LedgerEvent::OptionsAdded {
            campaign,
            options: ids.clone(),
        });
        Ok(ids)
    }

    pub fn option(
        &self,
        campaign: CampaignId,
        option: OptionId,
    ) -> Result<OptionView, TallyError> {
        Ok(self.option_record(campaign, option)?.view())
    }

    /// All options of a campaign as parallel id/name/url sequences.
    pub fn list_options(&self, campaign: CampaignId) -> Result<OptionLists, TallyError> {
        self.campaign(campaign)?;
        let mut lists = OptionLists::default();
        for record in self.campaign_options(campaign)? {
            lists.ids.push(record.id);
            lists.names.push(record.name.clone());
            lists.urls.push(record.url.clone());
        }
        Ok(lists)
    }

    /// Current voters for an option, in insertion order.
    pub fn voters(
        &self,
        campaign: CampaignId,
        option: OptionId,
    ) -> Result<Vec<VoterId>, TallyError> {
        Ok(self.option_record(campaign, option)?.voters.members())
    }

    /// Number of voters currently selecting an option.
    pub fn vote_count(&self, campaign: CampaignId, option: OptionId) -> Result<u64, TallyError> {
        Ok(self.option_record(campaign, option)?.voters.len() as u64)
    }

    /// Add an identity to an option's voter set. Idempotent; returns whether
    /// the set changed.
    pub fn add_voter(
        &mut self,
        campaign: CampaignId,
        option: OptionId,
        identity: VoterId,
    ) -> Result<bool, TallyError> {
        Ok(self.option_record_mut(campaign, option)?.voters.insert(identity))
    }

    /// Remove an identity from an option's voter set. Idempotent; returns
    /// whether the set changed.
    pub fn remove_voter(
        &mut self,
        campaign: CampaignId,
        option: OptionId,
        identity: VoterId,
    ) -> Result<bool, TallyError> {
        Ok(self
            .option_record_mut(campaign, option)?
            .voters
            .remove(&identity))
    }

    // ── Vote application ───────────────────────────────────────────────

    /// Replace a voter's selection atomically: retract the voter from every
    /// option of the campaign, then add it to each option in `selection`.
    /// Returns the number of voter-set entries the reset retracted.
    ///
    /// An empty selection is an unvote. Precondition checks (ended state,
    /// whitelist, multi-choice, option bounds) belong to the voting engine;
    /// this method only requires that the campaign and options exist.
    pub fn apply_vote(
        &mut self,
        campaign: CampaignId,
        voter: VoterId,
        selection: &BTreeSet<OptionId>,
    ) -> Result<u64, TallyError> {
        let option_count = self.campaign(campaign)?.option_count;
        for &option in selection {
            if option.as_u64() >= option_count {
                return Err(TallyError::OptionNotFound { campaign, option });
            }
        }
        let retracted = self.retract_votes(campaign, voter)?;
        for &option in selection {
            let key = OptionKey::pack(campaign, option)?;
            self.options
                .get_mut(&key)
                .ok_or(TallyError::OptionNotFound { campaign, option })?
                .voters
                .insert(voter);
        }
        if selection.is_empty() {
            if retracted > 0 {
                self.pending_events.push(LedgerEvent::VotesRetracted {
                    campaign,
                    voter,
                    retracted,
                });
            }
        } else {
            self.pending_events.push(LedgerEvent::VoteCast {
                campaign,
                voter,
                options: selection.iter().copied().collect(),
            });
        }
        Ok(retracted)
    }

    /// Remove a voter from every option of a campaign. Returns the number of
    /// voter sets the identity was removed from.
    ///
    /// Does not check ended state: retraction is cleanup, not a vote action.
    /// Emits no event of its own; callers report the retraction in their own
    /// terms.
    pub fn retract_votes(
        &mut self,
        campaign: CampaignId,
        voter: VoterId,
    ) -> Result<u64, TallyError> {
        self.campaign(campaign)?;
        let bounds = OptionKey::campaign_bounds(campaign)?;
        let mut retracted = 0u64;
        for (_, record) in self.options.range_mut(bounds) {
            if record.voters.remove(&voter) {
                retracted += 1;
            }
        }
        Ok(retracted)
    }

    /// The options a voter currently selects in a campaign, in option order.
    pub fn selection(
        &self,
        campaign: CampaignId,
        voter: VoterId,
    ) -> Result<Vec<OptionId>, TallyError> {
        Ok(self
            .campaign_options(campaign)?
            .filter(|record| record.voters.contains(&voter))
            .map(|record| record.id)
            .collect())
    }

    // ── Events ─────────────────────────────────────────────────────────

    /// Take all pending events, leaving the buffer empty.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Internal ───────────────────────────────────────────────────────

    pub(crate) fn campaign(&self, id: CampaignId) -> Result<&CampaignRecord, TallyError> {
        self.campaigns
            .get(&id)
            .ok_or(TallyError::CampaignNotFound(id))
    }

    pub(crate) fn campaign_mut(
        &mut self,
        id: CampaignId,
    ) -> Result<&mut CampaignRecord, TallyError> {
        self.campaigns
            .get_mut(&id)
            .ok_or(TallyError::CampaignNotFound(id))
    }

    /// Ordered iterator over one campaign's option records.
    pub(crate) fn campaign_options(
        &self,
        campaign: CampaignId,
    ) -> Result<impl Iterator<Item = &OptionRecord>, TallyError> {
        self.campaign(campaign)?;
        let bounds = OptionKey::campaign_bounds(campaign)?;
        Ok(self.options.range(bounds).map(|(_, record)| record))
    }

    fn option_record(
        &self,
        campaign: CampaignId,
        option: OptionId,
    ) -> Result<&OptionRecord, TallyError> {
        let record = self.campaign(campaign)?;
        if option.as_u64() >= record.option_count {
            return Err(TallyError::OptionNotFound { campaign, option });
        }
        let key = OptionKey::pack(campaign, option)?;
        self.options
            .get(&key)
            .ok_or(TallyError::OptionNotFound { campaign, option })
    }

    fn option_record_mut(
        &mut self,
        campaign: CampaignId,
        option: OptionId,
    ) -> Result<&mut OptionRecord, TallyError> {
        let record = self.campaign(campaign)?;
        if option.as_u64() >= record.option_count {
            return Err(TallyError::OptionNotFound { campaign, option });
        }
        let key = OptionKey::pack(campaign, option)?;
        self.options
            .get_mut(&key)
            .ok_or(TallyError::OptionNotFound { campaign, option })
    }

    /// Insert options with sequential IDs continuing from `option_count`.
    /// Callers validate lists and key width beforehand.
    fn insert_options(
        &mut self,
        campaign: CampaignId,
        names: Vec<Label>,
        urls: Vec<Label>,
    ) -> Result<Vec<OptionId>, TallyError> {
        let record = self.campaign_mut(campaign)?;
        let start = record.option_count;
        record.option_count += names.len() as u64;
        let mut ids = Vec::with_capacity(names.len());
        for (offset, (name, url)) in names.into_iter().zip(urls).enumerate() {
            let id = OptionId::new(start + offset as u64);
            let key = OptionKey::pack(campaign, id)?;
            self.options.insert(key, OptionRecord::new(id, name, url));
            ids.push(id);
        }
        Ok(ids)
    }

    /// Drop passively expired campaigns from the stored active index.
    fn sweep_active(&mut self, now: Timestamp) {
        let campaigns = &self.campaigns;
        self.active.sweep(|id| {
            campaigns
                .get(&id)
                .map_or(true, |record| record.is_ended(now))
        });
    }
}

impl Default for CampaignLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_option_lists(names: &[Label], urls: &[Label]) -> Result<(), TallyError> {
    if names.is_empty() || urls.is_empty() {
        return Err(TallyError::EmptyOptionList);
    }
    if names.len() != urls.len() {
        return Err(TallyError::OptionListMismatch {
            names: names.len(),
            urls: urls.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter(byte: u8) -> VoterId {
        VoterId::new([byte; 20])
    }

    fn labels(parts: &[&str]) -> Vec<Label> {
        parts.iter().map(|s| Label::from(*s)).collect()
    }

    fn create_basic(ledger: &mut CampaignLedger, admin: VoterId) -> CampaignId {
        ledger
            .create_campaign(
                Label::from("campaign"),
                labels(&["option 1", "option 2"]),
                labels(&["url 1", "url 2"]),
                Timestamp::new(10_000),
                false,
                &[admin],
                admin,
                Timestamp::new(1_000),
            )
            .unwrap()
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let first = create_basic(&mut ledger, admin);
        let second = create_basic(&mut ledger, admin);
        assert_eq!(first, CampaignId::new(0));
        assert_eq!(second, CampaignId::new(1));
        assert_eq!(ledger.campaign_count(), 2);
    }

    #[test]
    fn failed_create_allocates_no_id() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let err = ledger
            .create_campaign(
                Label::from("bad"),
                labels(&["a", "b"]),
                labels(&["u"]),
                Timestamp::new(10_000),
                false,
                &[],
                admin,
                Timestamp::new(1_000),
            )
            .unwrap_err();
        assert!(matches!(err, TallyError::OptionListMismatch { .. }));

        // The next successful creation still gets ID 0.
        let id = create_basic(&mut ledger, admin);
        assert_eq!(id, CampaignId::new(0));
    }

    #[test]
    fn create_rejects_past_end_time() {
        let mut ledger = CampaignLedger::new();
        let err = ledger
            .create_campaign(
                Label::from("late"),
                labels(&["a"]),
                labels(&["u"]),
                Timestamp::new(500),
                false,
                &[],
                voter(1),
                Timestamp::new(500),
            )
            .unwrap_err();
        assert!(matches!(err, TallyError::EndTimeNotFuture { .. }));
    }

    #[test]
    fn create_rejects_empty_option_list() {
        let mut ledger = CampaignLedger::new();
        let err = ledger
            .create_campaign(
                Label::from("empty"),
                vec![],
                vec![],
                Timestamp::new(10_000),
                false,
                &[],
                voter(1),
                Timestamp::new(1_000),
            )
            .unwrap_err();
        assert!(matches!(err, TallyError::EmptyOptionList));
    }

    #[test]
    fn option_ids_are_contiguous_from_zero() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let id = create_basic(&mut ledger, admin);
        let lists = ledger.list_options(id).unwrap();
        assert_eq!(lists.ids, vec![OptionId::new(0), OptionId::new(1)]);
        assert_eq!(lists.names[0], Label::from("option 1"));
        assert_eq!(lists.urls[1], Label::from("url 2"));
        assert_eq!(ledger.option_count(id).unwrap(), 2);
    }

    #[test]
    fn add_options_continues_the_range() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let id = create_basic(&mut ledger, admin);
        let new_ids = ledger
            .add_options(
                id,
                labels(&["option 3"]),
                labels(&["url 3"]),
                admin,
                Timestamp::new(2_000),
            )
            .unwrap();
        assert_eq!(new_ids, vec![OptionId::new(2)]);
        assert_eq!(ledger.option_count(id).unwrap(), 3);
    }

    #[test]
    fn add_options_requires_admin() {
        let mut ledger = CampaignLedger::new();
        let id = create_basic(&mut ledger, voter(1));
        let err = ledger
            .add_options(
                id,
                labels(&["x"]),
                labels(&["u"]),
                voter(2),
                Timestamp::new(2_000),
            )
            .unwrap_err();
        assert!(matches!(err, TallyError::NotAdmin { .. }));
    }

    #[test]
    fn add_options_rejected_after_end() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let id = create_basic(&mut ledger, admin);
        let err = ledger
            .add_options(
                id,
                labels(&["x"]),
                labels(&["u"]),
                admin,
                Timestamp::new(10_000),
            )
            .unwrap_err();
        assert!(matches!(err, TallyError::CampaignEnded(_)));
    }

    #[test]
    fn unknown_campaign_queries_fail() {
        let ledger = CampaignLedger::new();
        let missing = CampaignId::new(99);
        assert!(matches!(
            ledger.details(missing),
            Err(TallyError::CampaignNotFound(_))
        ));
        assert!(matches!(
            ledger.option_count(missing),
            Err(TallyError::CampaignNotFound(_))
        ));
        assert!(matches!(
            ledger.list_options(missing),
            Err(TallyError::CampaignNotFound(_))
        ));
    }

    #[test]
    fn out_of_range_option_fails() {
        let mut ledger = CampaignLedger::new();
        let id = create_basic(&mut ledger, voter(1));
        let err = ledger.option(id, OptionId::new(2)).unwrap_err();
        assert!(matches!(err, TallyError::OptionNotFound { .. }));
    }

    #[test]
    fn stop_is_admin_only_and_idempotent() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let id = create_basic(&mut ledger, admin);
        let now = Timestamp::new(2_000);

        let err = ledger.stop_campaign(id, voter(2), now).unwrap_err();
        assert!(matches!(err, TallyError::NotAdmin { .. }));
        assert!(!ledger.is_ended(id, now).unwrap());

        ledger.stop_campaign(id, admin, now).unwrap();
        assert!(ledger.is_ended(id, now).unwrap());

        // Second stop succeeds without emitting another event.
        ledger.drain_events();
        ledger.stop_campaign(id, admin, now).unwrap();
        assert!(ledger.drain_events().is_empty());
    }

    #[test]
    fn active_index_filters_stopped_and_expired() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let keep = create_basic(&mut ledger, admin);
        let stop = create_basic(&mut ledger, admin);
        let expire = ledger
            .create_campaign(
                Label::from("short"),
                labels(&["a"]),
                labels(&["u"]),
                Timestamp::new(1_500),
                false,
                &[],
                admin,
                Timestamp::new(1_000),
            )
            .unwrap();

        ledger.stop_campaign(stop, admin, Timestamp::new(1_100)).unwrap();

        // Not yet expired.
        let active = ledger.active_campaigns(Timestamp::new(1_200));
        assert_eq!(active, vec![keep, expire]);

        // Expired passively; no mutation happened, the live filter excludes it.
        let active = ledger.active_campaigns(Timestamp::new(1_500));
        assert_eq!(active, vec![keep]);
    }

    #[test]
    fn voter_set_edits_are_idempotent() {
        let mut ledger = CampaignLedger::new();
        let id = create_basic(&mut ledger, voter(1));
        let a = voter(10);
        assert!(ledger.add_voter(id, OptionId::new(0), a).unwrap());
        assert!(!ledger.add_voter(id, OptionId::new(0), a).unwrap());
        assert_eq!(ledger.vote_count(id, OptionId::new(0)).unwrap(), 1);
        assert!(ledger.remove_voter(id, OptionId::new(0), a).unwrap());
        assert!(!ledger.remove_voter(id, OptionId::new(0), a).unwrap());
    }

    #[test]
    fn apply_vote_replaces_selection() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let id = create_basic(&mut ledger, admin);
        let a = voter(10);

        let first: BTreeSet<OptionId> = [OptionId::new(0)].into();
        ledger.apply_vote(id, a, &first).unwrap();
        assert_eq!(ledger.voters(id, OptionId::new(0)).unwrap(), vec![a]);

        let second: BTreeSet<OptionId> = [OptionId::new(1)].into();
        ledger.apply_vote(id, a, &second).unwrap();
        assert!(ledger.voters(id, OptionId::new(0)).unwrap().is_empty());
        assert_eq!(ledger.voters(id, OptionId::new(1)).unwrap(), vec![a]);
        assert_eq!(ledger.selection(id, a).unwrap(), vec![OptionId::new(1)]);
    }

    #[test]
    fn apply_vote_rejects_out_of_range_option_without_side_effects() {
        let mut ledger = CampaignLedger::new();
        let id = create_basic(&mut ledger, voter(1));
        let a = voter(10);
        ledger
            .apply_vote(id, a, &[OptionId::new(0)].into())
            .unwrap();

        let bad: BTreeSet<OptionId> = [OptionId::new(0), OptionId::new(9)].into();
        let err = ledger.apply_vote(id, a, &bad).unwrap_err();
        assert!(matches!(err, TallyError::OptionNotFound { .. }));
        // Prior vote untouched.
        assert_eq!(ledger.voters(id, OptionId::new(0)).unwrap(), vec![a]);
    }

    #[test]
    fn events_are_emitted_and_drained() {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let id = create_basic(&mut ledger, admin);
        let events = ledger.drain_events();
        assert_eq!(
            events,
            vec![LedgerEvent::CampaignCreated {
                campaign: id,
                admin,
                end_time: Timestamp::new(10_000),
            }]
        );
        assert!(ledger.drain_events().is_empty());
    }
}
