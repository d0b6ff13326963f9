//! Arena configuration parameters.

use glint_core::ConfigError;

/// Configuration for a slot arena.
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Maximum number of slots (live plus recycled) the arena may hold.
    ///
    /// Default: 100_000. Allocation beyond this fails with
    /// `ArenaError::CapacityExceeded`.
    pub max_items: u32,
}

impl ArenaConfig {
    /// Default maximum item count.
    pub const DEFAULT_MAX_ITEMS: u32 = 100_000;

    /// Create a config with the given item limit.
    pub fn new(max_items: u32) -> Self {
        Self { max_items }
    }

    /// Check the limits for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_items == 0 {
            return Err(ConfigError::ZeroLimit { name: "max_items" });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ITEMS)
    }
}
