//! Option records and query views.

use crate::roster::Roster;
use serde::{Deserialize, Serialize};
use tally_types::{Label, OptionId, VoterId};

/// One selectable choice within a campaign, with its own voter set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptionRecord {
    pub id: OptionId,
    pub name: Label,
    pub url: Label,
    /// Identities currently voting for this option, in insertion order.
    pub voters: Roster,
}

impl OptionRecord {
    pub fn new(id: OptionId, name: Label, url: Label) -> Self {
        Self {
            id,
            name,
            url,
            voters: Roster::new(),
        }
    }

    pub fn view(&self) -> OptionView {
        OptionView {
            id: self.id,
            name: self.name.clone(),
            url: self.url.clone(),
            voters: self.voters.members(),
        }
    }
}

/// Read-only view of a single option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub id: OptionId,
    pub name: Label,
    pub url: Label,
    pub voters: Vec<VoterId>,
}

/// All options of a campaign as three parallel, index-aligned sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLists {
    pub ids: Vec<OptionId>,
    pub names: Vec<Label>,
    pub urls: Vec<Label>,
}
