//! Per-run configuration snapshot
//!
//! A `RunConfiguration` is read once from a [`ConfigSource`] when a run
//! starts and is never mutated afterwards.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::settings::Settings;

/// Typed key-value access to the host configuration store
pub trait ConfigSource {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_int(&self, key: &str) -> Option<i64>;
}

/// Immutable settings for one backup run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    pub output_root: PathBuf,
    pub compress: bool,
    pub backup_worlds: bool,
    pub backup_extensions: bool,
    pub full_backup: bool,
    /// Ordered as written in `skipplugins`; may contain empty names
    pub extension_skip_list: Vec<String>,
    pub date_format: String,
    /// `None` disables retention pruning
    pub max_backups: Option<usize>,
    pub enable_autosave: bool,
}

impl RunConfiguration {
    /// Take a snapshot of every key the run needs
    ///
    /// Missing keys fall back to the defaults of [`Settings`].
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let defaults = Settings::default();

        let string = |key: &str, default: &str| {
            source
                .get_string(key)
                .unwrap_or_else(|| default.to_string())
        };
        let flag = |key: &str, default: bool| source.get_bool(key).unwrap_or(default);

        let max_backups = source.get_int("maxbackups").unwrap_or(defaults.max_backups);

        Self {
            output_root: PathBuf::from(string("backuppath", &defaults.backup_path)),
            compress: flag("zipbackup", defaults.zip_backup),
            backup_worlds: flag("backupworlds", defaults.backup_worlds),
            backup_extensions: flag("backupplugins", defaults.backup_plugins),
            full_backup: flag("backupeverything", defaults.backup_everything),
            extension_skip_list: split_skip_list(&string("skipplugins", &defaults.skip_plugins)),
            date_format: string("dateformat", &defaults.date_format),
            max_backups: usize::try_from(max_backups).ok(),
            enable_autosave: flag("enableautosave", defaults.enable_autosave),
        }
    }
}

/// Split a semicolon-delimited skip list, keeping empty segments
///
/// `"a;"` yields `["a", ""]`; interpretation of empty names belongs to the
/// extension filter. Segments are trimmed, so `"a; b"` skips `b` rather than
/// an entry literally named ` b`.
pub fn split_skip_list(raw: &str) -> Vec<String> {
    raw.split(';').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapSource {
        strings: HashMap<&'static str, String>,
        bools: HashMap<&'static str, bool>,
        ints: HashMap<&'static str, i64>,
    }

    impl ConfigSource for MapSource {
        fn get_string(&self, key: &str) -> Option<String> {
            self.strings.get(key).cloned()
        }
        fn get_bool(&self, key: &str) -> Option<bool> {
            self.bools.get(key).copied()
        }
        fn get_int(&self, key: &str) -> Option<i64> {
            self.ints.get(key).copied()
        }
    }

    #[test]
    fn test_snapshot_from_settings() {
        let settings = Settings {
            backup_path: "out".to_string(),
            skip_plugins: "secretPlugin;".to_string(),
            max_backups: 2,
            ..Settings::default()
        };

        let config = RunConfiguration::from_source(&settings);
        assert_eq!(config.output_root, PathBuf::from("out"));
        assert_eq!(config.extension_skip_list, vec!["secretPlugin", ""]);
        assert_eq!(config.max_backups, Some(2));
        assert!(config.compress);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = RunConfiguration::from_source(&MapSource::default());
        assert_eq!(config, RunConfiguration::from_source(&Settings::default()));
    }

    #[test]
    fn test_negative_max_backups_disables_pruning() {
        let mut source = MapSource::default();
        source.ints.insert("maxbackups", -1);
        source.bools.insert("backupeverything", true);

        let config = RunConfiguration::from_source(&source);
        assert_eq!(config.max_backups, None);
        assert!(config.full_backup);
    }

    #[test]
    fn test_split_skip_list() {
        assert_eq!(split_skip_list(""), vec![""]);
        assert_eq!(split_skip_list("a; b"), vec!["a", "b"]);
    }
}
