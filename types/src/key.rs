//! Packed composite key for (campaign, option) pairs.
//!
//! The key is a single `u64` with the campaign ID in the high 32 bits and the
//! option ID in the low 32 bits. Keys therefore sort first by campaign, then
//! by option, so an ordered map can enumerate one campaign's options with a
//! single range scan over [`OptionKey::campaign_bounds`].

use crate::error::TallyError;
use crate::id::{CampaignId, OptionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Number of low bits reserved for the option ID.
pub const OPTION_BITS: u32 = 32;

/// A packed (campaign, option) composite key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OptionKey(u64);

impl OptionKey {
    /// Pack a (campaign, option) pair into a single key.
    ///
    /// Fails with [`TallyError::KeyWidthExceeded`] when either ID needs more
    /// than its allotted 32 bits.
    pub fn pack(campaign: CampaignId, option: OptionId) -> Result<Self, TallyError> {
        let c = campaign.as_u64();
        let o = option.as_u64();
        if c > u32::MAX as u64 {
            return Err(TallyError::KeyWidthExceeded {
                value: c,
                bits: OPTION_BITS,
            });
        }
        if o > u32::MAX as u64 {
            return Err(TallyError::KeyWidthExceeded {
                value: o,
                bits: OPTION_BITS,
            });
        }
        Ok(Self((c << OPTION_BITS) | o))
    }

    /// Unpack the key back into its (campaign, option) pair.
    ///
    /// Exact inverse of [`OptionKey::pack`] for every in-width pair.
    pub fn unpack(&self) -> (CampaignId, OptionId) {
        (
            CampaignId::new(self.0 >> OPTION_BITS),
            OptionId::new(self.0 & u32::MAX as u64),
        )
    }

    /// Inclusive key bounds covering every possible option of a campaign.
    ///
    /// Suitable for `BTreeMap::range`: the scan yields exactly the campaign's
    /// options, in option-ID order.
    pub fn campaign_bounds(campaign: CampaignId) -> Result<RangeInclusive<Self>, TallyError> {
        let first = Self::pack(campaign, OptionId::new(0))?;
        let last = Self::pack(campaign, OptionId::new(u32::MAX as u64))?;
        Ok(first..=last)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (campaign, option) = self.unpack();
        write!(f, "{campaign}/{option}")
    }
}
