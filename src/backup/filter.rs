//! Entry filters applied by the tree copier

use std::ffi::OsStr;
use std::path::Path;

/// Predicate deciding which top-level entries of a copy are taken
///
/// Filters look only at the entry's file name and never touch the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFilter {
    /// Take everything
    AcceptAll,
    /// Reject the single entry with this exact name
    ExcludeName(String),
    /// Reject every entry whose name is in the set
    ExcludeSet(Vec<String>),
}

impl PathFilter {
    pub fn exclude_name(name: impl Into<String>) -> Self {
        Self::ExcludeName(name.into())
    }

    /// Build a filter from an extension skip list
    ///
    /// A list whose first entry is empty counts as empty, and empty names
    /// elsewhere in the list never match anything.
    pub fn exclude_set(skip_list: &[String]) -> Self {
        match skip_list.first() {
            None => Self::AcceptAll,
            Some(first) if first.is_empty() => Self::AcceptAll,
            Some(_) => {
                let names: Vec<String> = skip_list
                    .iter()
                    .filter(|name| !name.is_empty())
                    .cloned()
                    .collect();
                Self::ExcludeSet(names)
            }
        }
    }

    /// Whether the entry at `path` should be copied
    pub fn accept(&self, path: &Path) -> bool {
        self.accept_name(path.file_name().unwrap_or_else(|| path.as_os_str()))
    }

    pub fn accept_name(&self, name: &OsStr) -> bool {
        match self {
            Self::AcceptAll => true,
            Self::ExcludeName(excluded) => name != OsStr::new(excluded),
            Self::ExcludeSet(excluded) => !excluded.iter().any(|e| name == OsStr::new(e)),
        }
    }

    /// Names this filter rejects, for logging
    pub fn excluded_names(&self) -> Vec<&str> {
        match self {
            Self::AcceptAll => Vec::new(),
            Self::ExcludeName(name) => vec![name.as_str()],
            Self::ExcludeSet(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exclude_name() {
        let filter = PathFilter::exclude_name("backups");
        assert!(!filter.accept(Path::new("./backups")));
        assert!(filter.accept(Path::new("./world")));
        assert!(filter.accept(Path::new("./backups-old")));
    }

    #[test]
    fn test_trailing_empty_entry_is_ignored() {
        let with_empty = PathFilter::exclude_set(&names(&["pluginA", ""]));
        let without = PathFilter::exclude_set(&names(&["pluginA"]));
        assert_eq!(with_empty, without);

        for candidate in ["pluginA", "pluginB", ""] {
            let path = Path::new("plugins").join(candidate);
            assert_eq!(with_empty.accept(&path), without.accept(&path));
        }
        assert!(!with_empty.accept(Path::new("plugins/pluginA")));
    }

    #[test]
    fn test_single_empty_entry_excludes_nothing() {
        let filter = PathFilter::exclude_set(&names(&[""]));
        assert_eq!(filter, PathFilter::AcceptAll);
        assert!(filter.accept(Path::new("plugins/anything")));
    }

    #[test]
    fn test_leading_empty_entry_disables_list() {
        let filter = PathFilter::exclude_set(&names(&["", "pluginA"]));
        assert!(filter.accept(Path::new("plugins/pluginA")));
    }

    #[test]
    fn test_empty_list_excludes_nothing() {
        assert_eq!(PathFilter::exclude_set(&[]), PathFilter::AcceptAll);
        assert!(PathFilter::AcceptAll.excluded_names().is_empty());
    }
}
