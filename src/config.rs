//! Environment configuration.

use std::env;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Emit per-rebuild tracing from every `ListLayout`.
    pub debug_rebuild: bool,
    /// `tracing-subscriber` filter directive installed by `logging::init`.
    pub log_filter: Option<String>,
    /// Initial capacity of type pools created by `MultiTypeAdapter`.
    pub pool_capacity: Option<usize>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug_rebuild: env_flag("LIST_LAYOUT_DEBUG"),
            log_filter: env_string_opt("LIST_LAYOUT_LOG"),
            pool_capacity: env_string_opt("LIST_LAYOUT_POOL_CAPACITY")
                .and_then(|value| value.trim().parse().ok()),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::EnvConfig;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    pub(crate) struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_are_empty() {
        let _lock = env_lock();
        let _g1 = set_env_guard("LIST_LAYOUT_DEBUG", None);
        let _g2 = set_env_guard("LIST_LAYOUT_LOG", None);
        let _g3 = set_env_guard("LIST_LAYOUT_POOL_CAPACITY", None);

        let config = EnvConfig::from_env();
        assert_eq!(config, EnvConfig::default());
    }

    #[test]
    fn env_values_are_read() {
        let _lock = env_lock();
        let _g1 = set_env_guard("LIST_LAYOUT_DEBUG", Some("1"));
        let _g2 = set_env_guard("LIST_LAYOUT_LOG", Some("list_layout=trace"));
        let _g3 = set_env_guard("LIST_LAYOUT_POOL_CAPACITY", Some(" 16 "));

        let config = EnvConfig::from_env();
        assert!(config.debug_rebuild);
        assert_eq!(config.log_filter.as_deref(), Some("list_layout=trace"));
        assert_eq!(config.pool_capacity, Some(16));
    }

    #[test]
    fn blank_and_malformed_values_are_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard("LIST_LAYOUT_DEBUG", Some("yes"));
        let _g2 = set_env_guard("LIST_LAYOUT_LOG", Some("  "));
        let _g3 = set_env_guard("LIST_LAYOUT_POOL_CAPACITY", Some("many"));

        let config = EnvConfig::from_env();
        assert!(!config.debug_rebuild);
        assert!(config.log_filter.is_none());
        assert!(config.pool_capacity.is_none());
    }
}
