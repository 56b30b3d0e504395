//! Tracing setup and rebuild logging.

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

/// Installs a global `fmt` subscriber filtered by `config.log_filter`.
///
/// Returns `true` only when this call installed the subscriber. Without a filter, or
/// when the host already installed one, this is a no-op.
pub fn init(config: &EnvConfig) -> bool {
    let Some(filter) = config.log_filter.as_deref() else {
        return false;
    };
    let filter = match EnvFilter::try_new(filter) {
        Ok(filter) => filter,
        Err(err) => {
            tracing::warn!(%err, filter, "ignoring malformed LIST_LAYOUT_LOG filter");
            return false;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Per-layout rebuild tracer. Silent unless enabled through `LIST_LAYOUT_DEBUG`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RebuildLogger {
    enabled: bool,
}

impl RebuildLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.debug_rebuild)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn rebuild_started(&self, pass: u64, discarded: usize, item_count: usize) {
        if self.enabled {
            tracing::debug!(pass, discarded, item_count, "list layout rebuild started");
        }
    }

    pub fn item_built(&self, position: usize, item_view_type: usize, item_id: Option<u64>) {
        if self.enabled {
            tracing::trace!(position, item_view_type, ?item_id, "list item built");
        }
    }

    pub fn rebuild_finished(&self, pass: u64, children: usize) {
        if self.enabled {
            tracing::debug!(pass, children, "list layout rebuild finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{init, RebuildLogger};
    use crate::config::EnvConfig;

    #[test]
    fn init_without_filter_is_noop() {
        assert!(!init(&EnvConfig::default()));
    }

    #[test]
    fn init_with_malformed_filter_is_rejected() {
        let config = EnvConfig {
            log_filter: Some("list_layout=notalevel".to_string()),
            ..EnvConfig::default()
        };
        assert!(!init(&config));
    }

    #[test]
    fn rebuild_logger_follows_config() {
        let config = EnvConfig {
            debug_rebuild: true,
            ..EnvConfig::default()
        };
        assert!(RebuildLogger::from_config(&config).is_enabled());
        assert!(!RebuildLogger::default().is_enabled());
    }
}
