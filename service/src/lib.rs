//! Serialized call surface for the tally ledger.
//!
//! [`CampaignService`] wraps the ledger arena in a reader-writer lock: every
//! mutation runs as one atomic, serially-ordered unit, and queries observe a
//! consistent snapshot. The crate also owns the ambient concerns around the
//! core: the clock abstraction, TOML configuration, resource limits, logging
//! initialisation, and Prometheus metrics.

pub mod clock;
pub mod config;
pub mod limits;
pub mod logging;
pub mod metrics;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ServiceConfig};
pub use logging::{init_logging, LogFormat};
pub use metrics::ServiceMetrics;
pub use service::CampaignService;
