//! Insertion-ordered membership set.
//!
//! Used for both whitelists and per-option voter sets. Membership checks are
//! O(1) via a `HashSet`; queries return members in insertion order, so
//! read-back is deterministic. A member that is removed and later re-added
//! moves to the end of the order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tally_types::VoterId;

/// An insertion-ordered set of voter identities.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<VoterId>", into = "Vec<VoterId>")]
pub struct Roster {
    set: HashSet<VoterId>,
    order: Vec<VoterId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an identity. Returns `true` if it was newly added.
    pub fn insert(&mut self, id: VoterId) -> bool {
        if !self.set.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Remove an identity. Returns `true` if it was present.
    pub fn remove(&mut self, id: &VoterId) -> bool {
        if !self.set.remove(id) {
            return false;
        }
        self.order.retain(|member| member != id);
        true
    }

    pub fn contains(&self, id: &VoterId) -> bool {
        self.set.contains(id)
    }

    /// Members in insertion order.
    pub fn members(&self) -> Vec<VoterId> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VoterId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl From<Vec<VoterId>> for Roster {
    fn from(members: Vec<VoterId>) -> Self {
        let mut roster = Self::new();
        for id in members {
            roster.insert(id);
        }
        roster
    }
}

impl From<Roster> for Vec<VoterId> {
    fn from(roster: Roster) -> Self {
        roster.order
    }
}

impl PartialEq for Roster {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for Roster {}
