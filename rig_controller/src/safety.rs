//! Safety module root.
//!
//! Per-axis alarm detection and recovery.

pub mod recovery;

pub use recovery::AlarmRecoveryMonitor;
