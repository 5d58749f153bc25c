//! Campaign ledger — the owned store of all campaign state.
//!
//! The [`CampaignLedger`] arena implements the campaign registry, the option
//! ledger, and the whitelist registry over a single validated state: every
//! mutation checks its preconditions first and applies atomically, so a
//! failed operation never leaves partial state behind.

pub mod active;
pub mod campaign;
pub mod event;
pub mod ledger;
pub mod option;
pub mod roster;
pub mod snapshot;
pub mod whitelist;

pub use active::ActiveIndex;
pub use campaign::{CampaignDetails, CampaignRecord};
pub use event::LedgerEvent;
pub use ledger::CampaignLedger;
pub use option::{OptionLists, OptionRecord, OptionView};
pub use roster::Roster;
pub use snapshot::{LedgerSnapshot, SnapshotError};
pub use whitelist::WhitelistChange;
