//! Unit-file discovery for the browse view.
//!
//! Scans the system unit directory and the invoking user's unit directory
//! for `.service` files. The result set is rebuilt in full on every call;
//! callers decide when to rescan.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Default ceiling on enumerated units; see [`UnitDirs::with_limit`].
pub const DEFAULT_UNIT_LIMIT: usize = 1000;

/// The two directories a scan covers, plus the result-set ceiling.
#[derive(Clone, Debug)]
pub struct UnitDirs {
    system: PathBuf,
    user: PathBuf,
    limit: usize,
}

impl UnitDirs {
    /// Standard locations: `/etc/systemd/system` and the invoking user's
    /// `~/.config/systemd/user`.
    pub fn standard(home: &Path) -> Self {
        Self::at(
            PathBuf::from("/etc/systemd/system"),
            home.join(".config/systemd/user"),
        )
    }

    pub fn at(system: PathBuf, user: PathBuf) -> Self {
        Self {
            system,
            user,
            limit: DEFAULT_UNIT_LIMIT,
        }
    }

    /// Cap on the combined result set. Entries past the cap are dropped,
    /// so a pathological unit directory cannot grow the browse list
    /// without bound.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Deduplicated names of regular files containing `.service` across
    /// both directories, system directory first. A missing or unreadable
    /// directory contributes zero entries.
    pub fn enumerate_all(&self) -> BTreeSet<String> {
        let mut units = BTreeSet::new();
        collect_service_files(&self.system, self.limit, &mut units);
        collect_service_files(&self.user, self.limit, &mut units);
        units
    }
}

fn collect_service_files(dir: &Path, limit: usize, units: &mut BTreeSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        if units.len() >= limit {
            return;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.contains(".service") {
            continue;
        }
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file {
            units.insert(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn merges_both_directories_and_deduplicates() {
        let system = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        touch(system.path(), "a.service");
        touch(system.path(), "b.service");
        touch(system.path(), "c.txt");
        touch(user.path(), "b.service");
        touch(user.path(), "d.service");

        let units = UnitDirs::at(system.path().into(), user.path().into()).enumerate_all();
        let expected: BTreeSet<String> = ["a.service", "b.service", "d.service"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(units, expected);
    }

    #[test]
    fn directories_are_not_units() {
        let system = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        fs::create_dir(system.path().join("tricky.service")).unwrap();
        touch(system.path(), "real.service");

        let units = UnitDirs::at(system.path().into(), user.path().into()).enumerate_all();
        assert_eq!(units.len(), 1);
        assert!(units.contains("real.service"));
    }

    #[test]
    fn missing_directory_contributes_nothing() {
        let system = tempfile::tempdir().unwrap();
        touch(system.path(), "only.service");

        let units = UnitDirs::at(
            system.path().into(),
            system.path().join("does-not-exist"),
        )
        .enumerate_all();
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn limit_drops_the_tail() {
        let system = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        for i in 0..5 {
            touch(system.path(), &format!("unit-{i}.service"));
        }

        let units = UnitDirs::at(system.path().into(), user.path().into())
            .with_limit(3)
            .enumerate_all();
        assert_eq!(units.len(), 3);
    }
}
