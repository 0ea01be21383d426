//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use super::permissions::{SENDPING, TOGGLEPINGS};

// =============================================================================
// Ping Defaults
// =============================================================================

pub fn default_sound_name() -> String {
    "block.note_block.pling".to_string()
}

/// Cooldown length in ticks (5 seconds at 20 ticks/s).
pub fn default_ping_delay() -> u64 {
    100
}

pub fn default_enable_name_pings() -> bool {
    true
}

/// One game tick.
pub fn default_tick_millis() -> u64 {
    50
}

/// One minute at 20 ticks/s.
pub fn default_maintenance_interval() -> u64 {
    1200
}

// =============================================================================
// Storage Defaults
// =============================================================================

pub fn default_data_dir() -> String {
    "data".to_string()
}

pub fn default_blocked_pings_file() -> String {
    "blocked_pings.lst".to_string()
}

// =============================================================================
// Permission Defaults
// =============================================================================

pub fn default_permissions() -> Vec<String> {
    vec![SENDPING.to_string(), TOGGLEPINGS.to_string()]
}
