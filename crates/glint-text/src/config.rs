//! Byte limits for the interned-text buffer.

use glint_core::ConfigError;

/// Caps applied when copying text into the shared buffer.
///
/// Text beyond either cap is silently truncated: interning never fails
/// because a string is too long, it just stores a prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLimits {
    /// Maximum bytes stored for a single interned string.
    ///
    /// Default: 100_000.
    pub max_item_bytes: u32,

    /// Maximum bytes held by the shared buffer across all live entries.
    ///
    /// Default: 10_000_000. Compaction after evictions frees room again.
    pub max_total_bytes: u32,
}

impl TextLimits {
    /// Default per-item byte cap.
    pub const DEFAULT_MAX_ITEM_BYTES: u32 = 100_000;

    /// Default whole-buffer byte cap.
    pub const DEFAULT_MAX_TOTAL_BYTES: u32 = 10_000_000;

    /// Check the limits for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_item_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "max_item_bytes",
            });
        }
        if self.max_total_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "max_total_bytes",
            });
        }
        if self.max_item_bytes > self.max_total_bytes {
            return Err(ConfigError::ItemLargerThanTotal {
                max_item_bytes: self.max_item_bytes,
                max_total_bytes: self.max_total_bytes,
            });
        }
        Ok(())
    }
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            max_item_bytes: Self::DEFAULT_MAX_ITEM_BYTES,
            max_total_bytes: Self::DEFAULT_MAX_TOTAL_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let limits = TextLimits::default();
        assert_eq!(limits.max_item_bytes, 100_000);
        assert_eq!(limits.max_total_bytes, 10_000_000);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn item_larger_than_total_rejected() {
        let limits = TextLimits {
            max_item_bytes: 10,
            max_total_bytes: 5,
        };
        assert!(matches!(
            limits.validate(),
            Err(ConfigError::ItemLargerThanTotal { .. })
        ));
    }

    #[test]
    fn zero_limits_rejected() {
        let limits = TextLimits {
            max_item_bytes: 0,
            max_total_bytes: 5,
        };
        assert_eq!(
            limits.validate(),
            Err(ConfigError::ZeroLimit {
                name: "max_item_bytes"
            })
        );
    }
}
