//! Investment configuration: thresholds, their packed wire form, and storage.
//!
//! This module contains [`InvestmentConfig`], the validated
//! `{target, upper_critical, lower_critical}` triple, the [`ConfigBlob`]
//! packing exchanged between ledger and asset manager, and the
//! [`ConfigStore`] that keeps one config per pool.

mod blob;
mod investment_config;
mod store;

pub use blob::ConfigBlob;
pub use investment_config::{ConfigBound, InvestmentConfig};
pub use store::ConfigStore;
