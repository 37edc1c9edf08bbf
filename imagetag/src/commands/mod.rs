/// Registry authentication probe
pub mod challenge;

/// Tag listing
pub mod tags;

/// Version command handlers
pub mod version;
