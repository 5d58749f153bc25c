//! Configured resource limits.
//!
//! Enforces `max_options_per_campaign`, `max_whitelist_size`, and
//! `max_label_bytes` from [`ServiceConfig`]. A limit of 0 means unlimited.
//! Violations surface as [`TallyError::LimitExceeded`] before the ledger is
//! touched.

use tally_types::{Label, TallyError};

use crate::config::ServiceConfig;

/// Check that a campaign stays within the configured option limit after adding
/// `adding` options to the `existing` ones.
pub fn check_option_limit(
    config: &ServiceConfig,
    existing: u64,
    adding: u64,
) -> Result<(), TallyError> {
    let limit = config.max_options_per_campaign;
    if limit > 0 && existing + adding > limit {
        return Err(TallyError::LimitExceeded {
            what: "options per campaign",
            limit,
            requested: existing + adding,
        });
    }
    Ok(())
}

/// Check that a whitelist stays within the configured size.
pub fn check_whitelist_limit(
    config: &ServiceConfig,
    existing: u64,
    adding: u64,
) -> Result<(), TallyError> {
    let limit = config.max_whitelist_size;
    if limit > 0 && existing + adding > limit {
        return Err(TallyError::LimitExceeded {
            what: "whitelist size",
            limit,
            requested: existing + adding,
        });
    }
    Ok(())
}

/// Check a single label against the configured byte limit.
pub fn check_label(config: &ServiceConfig, label: &Label) -> Result<(), TallyError> {
    let limit = config.max_label_bytes;
    if limit > 0 && label.len() as u64 > limit {
        return Err(TallyError::LimitExceeded {
            what: "label bytes",
            limit,
            requested: label.len() as u64,
        });
    }
    Ok(())
}

/// Check every label in a batch.
pub fn check_labels<'a>(
    config: &ServiceConfig,
    labels: impl IntoIterator<Item = &'a Label>,
) -> Result<(), TallyError> {
    for label in labels {
        check_label(config, label)?;
    }
    Ok(())
}
