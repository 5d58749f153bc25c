//! Ledger snapshots — capture all campaign state at a point in time.
//!
//! A host can persist a snapshot and reload the ledger across restarts
//! without replaying history. The snapshot hash is computed deterministically
//! from the campaign state, so a stored snapshot can be verified before it is
//! restored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tally_types::{CampaignId, Label, OptionId, OptionKey, Timestamp, VoterId};

use crate::campaign::CampaignRecord;
use crate::ledger::CampaignLedger;
use crate::option::OptionRecord;
use crate::roster::Roster;

/// Errors from snapshot decoding.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot decode failed: {0}")]
    Decode(String),

    #[error("snapshot hash does not match its contents")]
    HashMismatch,
}

/// A ledger snapshot — every campaign with its options, voter sets, and
/// whitelist, plus the ID counter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the campaign state.
    pub hash: [u8; 32],
    /// Timestamp when the snapshot was created.
    pub created_at: Timestamp,
    /// The next campaign ID to be allocated.
    pub next_campaign_id: u64,
    /// Campaign state entries, in campaign-ID order.
    pub campaigns: Vec<CampaignSnapshot>,
    /// Snapshot version for compatibility.
    pub version: u32,
}

/// The state of a single campaign captured in a snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub id: CampaignId,
    pub title: Label,
    pub end_time: Timestamp,
    pub admin: VoterId,
    pub allow_multiple_choices: bool,
    pub stopped: bool,
    /// Whitelist members in insertion order.
    pub whitelist: Vec<VoterId>,
    /// Options in option-ID order.
    pub options: Vec<OptionSnapshot>,
}

/// One option's state captured in a snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptionSnapshot {
    pub id: OptionId,
    pub name: Label,
    pub url: Label,
    /// Voters in insertion order.
    pub voters: Vec<VoterId>,
}

impl LedgerSnapshot {
    /// Capture the current ledger state.
    pub fn create(ledger: &CampaignLedger, now: Timestamp) -> Self {
        let campaigns = ledger
            .campaigns
            .values()
            .map(|record| CampaignSnapshot {
                id: record.id,
                title: record.title.clone(),
                end_time: record.end_time,
                admin: record.admin,
                allow_multiple_choices: record.allow_multiple_choices,
                stopped: record.stopped,
                whitelist: ledger
                    .whitelists
                    .get(&record.id)
                    .map(Roster::members)
                    .unwrap_or_default(),
                options: ledger
                    .campaign_options(record.id)
                    .map(|iter| {
                        iter.map(|option| OptionSnapshot {
                            id: option.id,
                            name: option.name.clone(),
                            url: option.url.clone(),
                            voters: option.voters.members(),
                        })
                        .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        let mut snap = Self {
            hash: [0u8; 32],
            created_at: now,
            next_campaign_id: ledger.next_campaign_id,
            campaigns,
            version: 1,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    /// Compute the Blake2b-256 hash of this snapshot deterministically.
    ///
    /// The hash covers campaign state and the ID counter, not `created_at`:
    /// two snapshots of identical state taken at different times hash the
    /// same.
    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        for campaign in &self.campaigns {
            hasher.update(campaign.id.as_u64().to_le_bytes());
            hasher.update((campaign.title.len() as u64).to_le_bytes());
            hasher.update(campaign.title.as_bytes());
            hasher.update(campaign.end_time.as_secs().to_le_bytes());
            hasher.update(campaign.admin.as_bytes());
            hasher.update([campaign.allow_multiple_choices as u8, campaign.stopped as u8]);
            hasher.update((campaign.whitelist.len() as u64).to_le_bytes());
            for member in &campaign.whitelist {
                hasher.update(member.as_bytes());
            }
            hasher.update((campaign.options.len() as u64).to_le_bytes());
            for option in &campaign.options {
                hasher.update(option.id.as_u64().to_le_bytes());
                hasher.update((option.name.len() as u64).to_le_bytes());
                hasher.update(option.name.as_bytes());
                hasher.update((option.url.len() as u64).to_le_bytes());
                hasher.update(option.url.as_bytes());
                hasher.update((option.voters.len() as u64).to_le_bytes());
                for voter in &option.voters {
                    hasher.update(voter.as_bytes());
                }
            }
        }
        hasher.update(self.next_campaign_id.to_le_bytes());

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the campaign data.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("snapshot serialization should not fail")
    }

    /// Deserialize a snapshot from bytes and verify its hash.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snap: Self =
            bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        if !snap.verify() {
            return Err(SnapshotError::HashMismatch);
        }
        Ok(snap)
    }

    /// Rebuild a working ledger from this snapshot.
    ///
    /// The active index is rebuilt from the stopped flags; time-expired
    /// campaigns are filtered at query time as usual. The pending event
    /// buffer starts empty — events are not part of ledger state.
    pub fn restore(&self) -> Result<CampaignLedger, SnapshotError> {
        let mut ledger = CampaignLedger::new();
        for campaign in &self.campaigns {
            ledger.campaigns.insert(
                campaign.id,
                CampaignRecord {
                    id: campaign.id,
                    title: campaign.title.clone(),
                    end_time: campaign.end_time,
                    admin: campaign.admin,
                    allow_multiple_choices: campaign.allow_multiple_choices,
                    stopped: campaign.stopped,
                    option_count: campaign.options.len() as u64,
                },
            );
            let mut whitelist = Roster::new();
            for &member in &campaign.whitelist {
                whitelist.insert(member);
            }
            ledger.whitelists.insert(campaign.id, whitelist);

            for option in &campaign.options {
                let key = OptionKey::pack(campaign.id, option.id)
                    .map_err(|e| SnapshotError::Decode(e.to_string()))?;
                let mut record =
                    OptionRecord::new(option.id, option.name.clone(), option.url.clone());
                for &voter in &option.voters {
                    record.voters.insert(voter);
                }
                ledger.options.insert(key, record);
            }
            if !campaign.stopped {
                ledger.active.insert(campaign.id);
            }
        }
        ledger.next_campaign_id = self.next_campaign_id;
        Ok(ledger)
    }

    /// Number of campaigns in this snapshot.
    pub fn campaign_count(&self) -> usize {
        self.campaigns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn voter(byte: u8) -> VoterId {
        VoterId::new([byte; 20])
    }

    fn populated_ledger() -> CampaignLedger {
        let mut ledger = CampaignLedger::new();
        let admin = voter(1);
        let first = ledger
            .create_campaign(
                Label::from("first"),
                vec![Label::from("a"), Label::from("b")],
                vec![Label::from("ua"), Label::from("ub")],
                Timestamp::new(10_000),
                true,
                &[voter(10), voter(11)],
                admin,
                Timestamp::new(1_000),
            )
            .unwrap();
        let second = ledger
            .create_campaign(
                Label::from("second"),
                vec![Label::from("c")],
                vec![Label::from("uc")],
                Timestamp::new(20_000),
                false,
                &[voter(10)],
                admin,
                Timestamp::new(1_000),
            )
            .unwrap();
        let selection: BTreeSet<OptionId> = [OptionId::new(0), OptionId::new(1)].into();
        ledger.apply_vote(first, voter(10), &selection).unwrap();
        ledger.apply_vote(second, voter(10), &[OptionId::new(0)].into()).unwrap();
        ledger.stop_campaign(second, admin, Timestamp::new(2_000)).unwrap();
        ledger
    }

    #[test]
    fn create_and_verify() {
        let ledger = populated_ledger();
        let snap = LedgerSnapshot::create(&ledger, Timestamp::new(3_000));
        assert!(snap.verify());
        assert_eq!(snap.campaign_count(), 2);
        assert_eq!(snap.next_campaign_id, 2);
        assert_eq!(snap.version, 1);
    }

    #[test]
    fn tampered_snapshot_fails_verify() {
        let ledger = populated_ledger();
        let mut snap = LedgerSnapshot::create(&ledger, Timestamp::new(3_000));
        assert!(snap.verify());

        snap.next_campaign_id = 99;
        assert!(!snap.verify());
    }

    #[test]
    fn serialize_roundtrip() {
        let ledger = populated_ledger();
        let snap = LedgerSnapshot::create(&ledger, Timestamp::new(3_000));
        let bytes = snap.to_bytes();
        let restored = LedgerSnapshot::from_bytes(&bytes).expect("deserialization failed");
        assert_eq!(restored.hash, snap.hash);
        assert_eq!(restored.campaign_count(), snap.campaign_count());
    }

    #[test]
    fn corrupted_bytes_are_rejected() {
        let ledger = populated_ledger();
        let mut bytes = LedgerSnapshot::create(&ledger, Timestamp::new(3_000)).to_bytes();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(LedgerSnapshot::from_bytes(&bytes).is_err());
    }

    #[test]
    fn restore_rebuilds_working_ledger() {
        let ledger = populated_ledger();
        let snap = LedgerSnapshot::create(&ledger, Timestamp::new(3_000));
        let restored = snap.restore().unwrap();

        let first = CampaignId::new(0);
        let second = CampaignId::new(1);
        assert_eq!(restored.campaign_count(), 2);
        assert_eq!(
            restored.voters(first, OptionId::new(0)).unwrap(),
            vec![voter(10)]
        );
        assert_eq!(
            restored.whitelisted(first).unwrap(),
            vec![voter(10), voter(11)]
        );
        assert!(restored.is_ended(second, Timestamp::new(3_000)).unwrap());
        // Only the unstopped campaign is active.
        assert_eq!(
            restored.active_campaigns(Timestamp::new(3_000)),
            vec![first]
        );
        assert_eq!(restored.next_campaign_id, 2);
    }

    #[test]
    fn hash_ignores_created_at() {
        let ledger = populated_ledger();
        let a = LedgerSnapshot::create(&ledger, Timestamp::new(3_000));
        let b = LedgerSnapshot::create(&ledger, Timestamp::new(9_000));
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn empty_snapshot() {
        let ledger = CampaignLedger::new();
        let snap = LedgerSnapshot::create(&ledger, Timestamp::new(0));
        assert!(snap.verify());
        assert_eq!(snap.campaign_count(), 0);
        let restored = snap.restore().unwrap();
        assert_eq!(restored.campaign_count(), 0);
    }
}
