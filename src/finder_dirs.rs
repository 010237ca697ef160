//! Centralized directory paths for the catalog finder.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | App data | `~/Library/Application Support/catalog-finder/` | `~/.local/share/catalog-finder/` |
//! | Config | `~/Library/Application Support/catalog-finder/` | `~/.config/catalog-finder/` |
//!
//! # Environment Overrides
//!
//! - `CATALOG_FINDER_DATA_DIR` overrides [`data_dir`]
//! - `CATALOG_FINDER_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Resolves to `dirs::data_dir()/catalog-finder/` by default. Override with
/// the `CATALOG_FINDER_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("CATALOG_FINDER_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("catalog-finder"))
        .unwrap_or_else(|| PathBuf::from("/tmp/catalog-finder-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/catalog-finder/` by default. Override
/// with the `CATALOG_FINDER_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("CATALOG_FINDER_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("catalog-finder"))
        .unwrap_or_else(|| PathBuf::from("/tmp/catalog-finder-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default snapshot directory (`data_dir()/snapshot/`).
#[must_use]
pub fn snapshot_dir() -> PathBuf {
    data_dir().join("snapshot")
}

/// Serializes tests that read or write the directory override variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_KEY: &str = "CATALOG_FINDER_DATA_DIR";
    const CONFIG_KEY: &str = "CATALOG_FINDER_CONFIG_DIR";

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn restore_env(key: &str, value: Option<std::ffi::OsString>) {
        match value {
            // SAFETY: test-only env mutation guarded by ENV_LOCK.
            Some(v) => unsafe { std::env::set_var(key, v) },
            // SAFETY: test-only env mutation guarded by ENV_LOCK.
            None => unsafe { std::env::remove_var(key) },
        }
    }

    #[test]
    fn data_dir_is_nonempty() {
        let _guard = env_guard();
        assert!(!data_dir().as_os_str().is_empty());
    }

    #[test]
    fn config_file_ends_with_config_toml() {
        let _guard = env_guard();
        let path = config_file();
        let s = path.to_string_lossy();
        assert!(s.ends_with("config.toml"), "config_file: {s}");
    }

    #[test]
    fn snapshot_dir_is_subpath_of_data_dir() {
        let _guard = env_guard();
        let snapshot = snapshot_dir();
        let data = data_dir();
        assert!(
            snapshot.starts_with(&data),
            "snapshot_dir ({}) should start with data_dir ({})",
            snapshot.display(),
            data.display()
        );
    }

    #[test]
    fn dir_overrides_via_env() {
        let _guard = env_guard();
        let previous_data = std::env::var_os(DATA_KEY);
        let previous_config = std::env::var_os(CONFIG_KEY);

        // SAFETY: test-only env mutation guarded by ENV_LOCK.
        unsafe {
            std::env::set_var(DATA_KEY, "/custom/data");
            std::env::set_var(CONFIG_KEY, "/custom/config");
        }
        let data = data_dir();
        let snapshot = snapshot_dir();
        let config = config_dir();
        restore_env(DATA_KEY, previous_data);
        restore_env(CONFIG_KEY, previous_config);

        assert_eq!(data, PathBuf::from("/custom/data"));
        assert_eq!(snapshot, PathBuf::from("/custom/data/snapshot"));
        assert_eq!(config, PathBuf::from("/custom/config"));
    }
}
