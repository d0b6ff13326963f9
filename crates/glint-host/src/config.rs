//! Construction parameters for [`TextCache`](crate::TextCache).

use glint_arena::ArenaConfig;
use glint_core::ConfigError;
use glint_text::TextLimits;

/// Capacity limits for both stores of a text cache.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Slot limit of the interned-text store. Default: 100_000.
    pub interned: ArenaConfig,
    /// Slot limit of the shaped-text store. Default: 100_000.
    pub shaped: ArenaConfig,
    /// Byte caps of the interned-text buffer.
    pub text: TextLimits,
}

impl CacheConfig {
    /// Check every nested limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.interned.validate()?;
        self.shaped.validate()?;
        self.text.validate()
    }

    /// Same slot limit for both stores, default byte caps.
    pub fn with_max_items(max_items: u32) -> Self {
        Self {
            interned: ArenaConfig::new(max_items),
            shaped: ArenaConfig::new(max_items),
            text: TextLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let c = CacheConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.interned.max_items, 100_000);
        assert_eq!(c.text.max_total_bytes, 10_000_000);
    }

    #[test]
    fn nested_errors_surface() {
        let mut c = CacheConfig::with_max_items(0);
        assert_eq!(
            c.validate(),
            Err(ConfigError::ZeroLimit { name: "max_items" })
        );
        c = CacheConfig::default();
        c.text.max_item_bytes = c.text.max_total_bytes + 1;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ItemLargerThanTotal { .. })
        ));
    }
}
