// Asset snapshot records
pub mod asset;

// Events published to presentation listeners
pub mod events;

// Port interfaces
pub mod ports;

// Ranked top/bottom views
pub mod ranking;

// Refresh interval and countdown arithmetic
pub mod refresh;

// Domain-specific error types
pub mod errors;
