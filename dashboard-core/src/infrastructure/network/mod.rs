//! Network helpers

pub mod ip_allowlist;

pub use ip_allowlist::{IpAllowList, IpRule, IpRuleError, local_address, normalize};
