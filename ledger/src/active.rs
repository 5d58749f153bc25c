//! Active-campaign index — creation-ordered IDs of campaigns still open.
//!
//! The index is maintained eagerly on create/stop mutations. Time-based
//! expiry is passive, so queries must additionally filter expired campaigns
//! against the current time; [`CampaignLedger::active_campaigns`] does that
//! live filtering on top of this index.
//!
//! [`CampaignLedger::active_campaigns`]: crate::CampaignLedger::active_campaigns

use serde::{Deserialize, Serialize};
use tally_types::CampaignId;

/// Creation-ordered index of campaigns not yet stopped or expired.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActiveIndex {
    order: Vec<CampaignId>,
}

impl ActiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly created campaign to the index.
    pub fn insert(&mut self, id: CampaignId) {
        if !self.order.contains(&id) {
            self.order.push(id);
        }
    }

    /// Remove a stopped campaign from the index.
    pub fn remove(&mut self, id: CampaignId) {
        self.order.retain(|entry| *entry != id);
    }

    /// Drop every campaign for which `ended` returns true. Called from
    /// mutation paths to keep the stored index from accumulating campaigns
    /// that expired passively.
    pub fn sweep<F: Fn(CampaignId) -> bool>(&mut self, ended: F) {
        self.order.retain(|entry| !ended(*entry));
    }

    pub fn contains(&self, id: CampaignId) -> bool {
        self.order.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = CampaignId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_creation_order() {
        let mut index = ActiveIndex::new();
        index.insert(CampaignId::new(0));
        index.insert(CampaignId::new(1));
        index.insert(CampaignId::new(2));
        let ids: Vec<_> = index.iter().collect();
        assert_eq!(
            ids,
            vec![CampaignId::new(0), CampaignId::new(1), CampaignId::new(2)]
        );
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut index = ActiveIndex::new();
        index.insert(CampaignId::new(0));
        index.insert(CampaignId::new(0));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_and_sweep() {
        let mut index = ActiveIndex::new();
        index.insert(CampaignId::new(0));
        index.insert(CampaignId::new(1));
        index.insert(CampaignId::new(2));
        index.remove(CampaignId::new(1));
        assert!(!index.contains(CampaignId::new(1)));

        index.sweep(|id| id == CampaignId::new(0));
        let ids: Vec<_> = index.iter().collect();
        assert_eq!(ids, vec![CampaignId::new(2)]);
    }
}
