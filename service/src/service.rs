//! The serialized call surface over the campaign ledger.
//!
//! One [`CampaignService`] owns the ledger behind a `std::sync::RwLock`.
//! Mutations hold the write lock for their full validate-then-apply span, so
//! they execute as atomic, serially-ordered units; queries take the read
//! lock and observe a consistent snapshot. Operations are non-suspending and
//! bounded — no I/O happens inside the lock.
//!
//! A poisoned lock is recovered with `PoisonError::into_inner`: every
//! mutation validates before it writes, so recovered state is consistent.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use tally_ledger::{
    CampaignDetails, CampaignLedger, LedgerEvent, LedgerSnapshot, OptionLists, OptionView,
    WhitelistChange,
};
use tally_types::{CampaignId, Label, OptionId, TallyError, Timestamp, VoterId};
use tally_voting::VotingEngine;

use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::limits;
use crate::metrics::ServiceMetrics;

/// The call interface to the campaign ledger.
pub struct CampaignService {
    ledger: RwLock<CampaignLedger>,
    engine: VotingEngine,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
    metrics: ServiceMetrics,
}

impl CampaignService {
    /// Create a service over an empty ledger, using the system clock.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a service with an explicit clock (deterministic tests).
    pub fn with_clock(config: ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: RwLock::new(CampaignLedger::new()),
            engine: VotingEngine,
            clock,
            config,
            metrics: ServiceMetrics::new(),
        }
    }

    /// Create a service from a previously captured snapshot.
    pub fn from_snapshot(
        config: ServiceConfig,
        clock: Arc<dyn Clock>,
        snapshot: &LedgerSnapshot,
    ) -> Result<Self, tally_ledger::SnapshotError> {
        let ledger = snapshot.restore()?;
        let service = Self {
            ledger: RwLock::new(ledger),
            engine: VotingEngine,
            clock,
            config,
            metrics: ServiceMetrics::new(),
        };
        service.refresh_active_gauge(&service.read());
        Ok(service)
    }

    // ── Campaign registry ──────────────────────────────────────────────

    /// Create a campaign; the caller becomes its admin.
    #[allow(clippy::too_many_arguments)]
    pub fn create_campaign(
        &self,
        title: Label,
        option_names: Vec<Label>,
        option_urls: Vec<Label>,
        end_time: Timestamp,
        allow_multiple_choices: bool,
        whitelist: &[VoterId],
        caller: VoterId,
    ) -> Result<CampaignId, TallyError> {
        limits::check_label(&self.config, &title)?;
        limits::check_labels(&self.config, option_names.iter().chain(option_urls.iter()))?;
        limits::check_option_limit(&self.config, 0, option_names.len() as u64)?;
        limits::check_whitelist_limit(&self.config, 0, whitelist.len() as u64)?;

        let now = self.clock.now();
        let mut ledger = self.write();
        let id = ledger.create_campaign(
            title,
            option_names,
            option_urls,
            end_time,
            allow_multiple_choices,
            whitelist,
            caller,
            now,
        )?;
        self.metrics.campaigns_created.inc();
        self.refresh_active_gauge(&ledger);
        info!(campaign = %id, admin = %caller, end_time = %end_time, "campaign created");
        Ok(id)
    }

    /// Stop a campaign (admin-only, idempotent).
    pub fn stop_campaign(&self, id: CampaignId, caller: VoterId) -> Result<(), TallyError> {
        let now = self.clock.now();
        let mut ledger = self.write();
        let was_ended = ledger.is_ended(id, now)?;
        ledger.stop_campaign(id, caller, now)?;
        if !was_ended {
            self.metrics.campaigns_stopped.inc();
        }
        self.refresh_active_gauge(&ledger);
        info!(campaign = %id, "campaign stopped");
        Ok(())
    }

    pub fn campaign_details(&self, id: CampaignId) -> Result<CampaignDetails, TallyError> {
        self.read().details(id)
    }

    pub fn option_count(&self, id: CampaignId) -> Result<u64, TallyError> {
        self.read().option_count(id)
    }

    pub fn is_ended(&self, id: CampaignId) -> Result<bool, TallyError> {
        self.read().is_ended(id, self.clock.now())
    }

    /// Total number of campaigns ever created.
    pub fn campaign_count(&self) -> u64 {
        self.read().campaign_count()
    }

    /// Active campaign IDs in creation order, filtered live against the
    /// current time.
    pub fn active_campaigns(&self) -> Vec<CampaignId> {
        self.read().active_campaigns(self.clock.now())
    }

    // ── Option ledger ──────────────────────────────────────────────────

    /// Append options to an existing campaign (admin-only, before end).
    pub fn add_options(
        &self,
        id: CampaignId,
        names: Vec<Label>,
        urls: Vec<Label>,
        caller: VoterId,
    ) -> Result<Vec<OptionId>, TallyError> {
        limits::check_labels(&self.config, names.iter().chain(urls.iter()))?;
        let now = self.clock.now();
        let mut ledger = self.write();
        let existing = ledger.option_count(id)?;
        limits::check_option_limit(&self.config, existing, names.len() as u64)?;
        let ids = ledger.add_options(id, names, urls, caller, now)?;
        debug!(campaign = %id, added = ids.len(), "options added");
        Ok(ids)
    }

    pub fn list_options(&self, id: CampaignId) -> Result<OptionLists, TallyError> {
        self.read().list_options(id)
    }

    pub fn option(&self, id: CampaignId, option_id: OptionId) -> Result<OptionView, TallyError> {
        self.read().option(id, option_id)
    }

    pub fn voters(&self, id: CampaignId, option_id: OptionId) -> Result<Vec<VoterId>, TallyError> {
        self.read().voters(id, option_id)
    }

    pub fn vote_count(&self, id: CampaignId, option_id: OptionId) -> Result<u64, TallyError> {
        self.read().vote_count(id, option_id)
    }

    // ── Whitelist registry ─────────────────────────────────────────────

    pub fn is_whitelisted(&self, id: CampaignId, identity: VoterId) -> Result<bool, TallyError> {
        self.read().is_whitelisted(id, identity)
    }

    pub fn whitelisted(&self, id: CampaignId) -> Result<Vec<VoterId>, TallyError> {
        self.read().whitelisted(id)
    }

    /// Add identities to the whitelist (admin-only).
    pub fn add_whitelist(
        &self,
        id: CampaignId,
        identities: &[VoterId],
        caller: VoterId,
    ) -> Result<(), TallyError> {
        let mut ledger = self.write();
        let existing = ledger.whitelisted(id)?.len() as u64;
        limits::check_whitelist_limit(&self.config, existing, identities.len() as u64)?;
        let change = ledger.add_whitelist(id, identities, caller)?;
        self.record_whitelist_change(id, change);
        Ok(())
    }

    /// Remove identities from the whitelist (admin-only); removed members'
    /// votes are cascade-retracted.
    pub fn remove_whitelist(
        &self,
        id: CampaignId,
        identities: &[VoterId],
        caller: VoterId,
    ) -> Result<(), TallyError> {
        let mut ledger = self.write();
        let change = ledger.remove_whitelist(id, identities, caller)?;
        self.record_whitelist_change(id, change);
        Ok(())
    }

    /// Replace the whitelist wholesale (admin-only); dropped members' votes
    /// are cascade-retracted.
    pub fn set_whitelist(
        &self,
        id: CampaignId,
        identities: &[VoterId],
        caller: VoterId,
    ) -> Result<(), TallyError> {
        limits::check_whitelist_limit(&self.config, 0, identities.len() as u64)?;
        let mut ledger = self.write();
        let change = ledger.set_whitelist(id, identities, caller)?;
        self.record_whitelist_change(id, change);
        Ok(())
    }

    // ── Voting ─────────────────────────────────────────────────────────

    /// Cast, replace, or retract a selection. An empty `option_ids` is an
    /// unvote.
    pub fn vote(
        &self,
        id: CampaignId,
        option_ids: &[OptionId],
        caller: VoterId,
    ) -> Result<(), TallyError> {
        let now = self.clock.now();
        let mut ledger = self.write();
        let retracted = self.engine.vote(&mut ledger, id, option_ids, caller, now)?;
        if retracted > 0 {
            self.metrics.votes_retracted.inc_by(retracted);
        }
        if option_ids.is_empty() {
            debug!(campaign = %id, voter = %caller, retracted, "votes retracted");
        } else {
            self.metrics.votes_cast.inc();
            debug!(campaign = %id, voter = %caller, options = option_ids.len(), "vote cast");
        }
        Ok(())
    }

    /// The caller's current selection in a campaign (empty = not voted).
    pub fn selection(&self, id: CampaignId, identity: VoterId) -> Result<Vec<OptionId>, TallyError> {
        let ledger = self.read();
        self.engine.selection(&ledger, id, identity)
    }

    // ── Events, snapshots, metrics ─────────────────────────────────────

    /// Take all events emitted since the last drain.
    pub fn drain_events(&self) -> Vec<LedgerEvent> {
        self.write().drain_events()
    }

    /// Capture the current ledger state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::create(&self.read(), self.clock.now())
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    // ── Internal ───────────────────────────────────────────────────────

    fn read(&self) -> RwLockReadGuard<'_, CampaignLedger> {
        self.ledger.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CampaignLedger> {
        self.ledger.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh_active_gauge(&self, ledger: &CampaignLedger) {
        let active = ledger.active_campaigns(self.clock.now()).len() as i64;
        self.metrics.active_campaigns.set(active);
    }

    fn record_whitelist_change(&self, id: CampaignId, change: WhitelistChange) {
        if change.removed > 0 {
            self.metrics.whitelist_removals.inc_by(change.removed);
        }
        if change.retracted > 0 {
            self.metrics.votes_retracted.inc_by(change.retracted);
        }
        debug!(
            campaign = %id,
            added = change.added,
            removed = change.removed,
            retracted = change.retracted,
            "whitelist updated"
        );
    }
}
