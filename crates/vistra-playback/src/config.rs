//! Playback configuration and validation.

use std::error::Error;
use std::fmt;

use vistra_cache::DEFAULT_CACHE_LIMIT_BYTES;

/// Errors detected during [`PlaybackConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A zero byte budget cannot hold even one frame.
    ZeroCacheLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCacheLimit => write!(f, "cache_limit_bytes must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Configuration for a [`Playback`](crate::Playback) controller.
#[derive(Clone, Debug)]
pub struct PlaybackConfig {
    /// Byte budget for the frame cache.
    pub cache_limit_bytes: usize,
    /// When `false`, only the most recent frame is retained — live
    /// viewing without scrubbing.
    pub cache_enabled: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cache_limit_bytes: DEFAULT_CACHE_LIMIT_BYTES,
            cache_enabled: true,
        }
    }
}

impl PlaybackConfig {
    /// Validate structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_limit_bytes == 0 {
            return Err(ConfigError::ZeroCacheLimit);
        }
        Ok(())
    }
}
