//! Directory listing and markdown discovery.
//!
//! Discovery walks the questions tree top-down: the files of a directory come
//! before its subdirectories, and entries are visited in name order.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path of the entry
    pub path: PathBuf,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

/// Read access to a directory tree.
pub trait DirectoryListing {
    /// Direct children of `dir`, sorted by name.
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            entries.push(Entry {
                path: entry.path(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// First file under `dir` accepted by `accept`. Unreadable directories are
/// skipped.
fn find_first<L>(listing: &L, dir: &Path, accept: &mut dyn FnMut(&Path) -> bool) -> Option<PathBuf>
where
    L: DirectoryListing + ?Sized,
{
    let entries = match listing.list(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return None;
        }
    };

    let (dirs, files): (Vec<Entry>, Vec<Entry>) = entries.into_iter().partition(|e| e.is_dir);

    if let Some(file) = files.into_iter().find(|f| accept(&f.path)) {
        return Some(file.path);
    }
    for sub in &dirs {
        if let Some(found) = find_first(listing, &sub.path, &mut *accept) {
            return Some(found);
        }
    }
    None
}

/// Find a file named `name` (case-insensitive) under `root`.
pub fn find_markdown<L>(listing: &L, root: &Path, name: &str) -> Option<PathBuf>
where
    L: DirectoryListing + ?Sized,
{
    let wanted = name.to_lowercase();
    find_first(listing, root, &mut |path: &Path| {
        path.file_name()
            .map(|f| f.to_string_lossy().to_lowercase() == wanted)
            .unwrap_or(false)
    })
}

/// Find the first `.md` file under `root` without a sibling folder of the
/// same base name.
pub fn find_unprocessed<L>(listing: &L, root: &Path) -> Option<PathBuf>
where
    L: DirectoryListing + ?Sized,
{
    find_first(listing, root, &mut |path: &Path| {
        let is_markdown = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("md"))
            .unwrap_or(false);
        if !is_markdown {
            return false;
        }
        match (path.parent(), path.file_stem()) {
            (Some(parent), Some(stem)) => !listing.exists(&parent.join(stem)),
            _ => false,
        }
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// In-memory tree for discovery tests.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryListing {
        files: BTreeSet<PathBuf>,
        dirs: BTreeSet<PathBuf>,
    }

    impl MemoryListing {
        pub(crate) fn with_files(paths: &[&str]) -> Self {
            let mut listing = Self::default();
            for path in paths {
                listing.add_file(path);
            }
            listing
        }

        pub(crate) fn add_file(&mut self, path: &str) {
            let path = PathBuf::from(path);
            self.add_parents(&path);
            self.files.insert(path);
        }

        pub(crate) fn add_dir(&mut self, path: &str) {
            let path = PathBuf::from(path);
            self.add_parents(&path);
            self.dirs.insert(path);
        }

        fn add_parents(&mut self, path: &Path) {
            let mut parent = path.parent();
            while let Some(dir) = parent {
                if dir.as_os_str().is_empty() {
                    break;
                }
                self.dirs.insert(dir.to_path_buf());
                parent = dir.parent();
            }
        }
    }

    impl DirectoryListing for MemoryListing {
        fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
            if !self.dirs.contains(dir) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
            }
            let mut entries: Vec<Entry> = self
                .dirs
                .iter()
                .filter(|d| d.parent() == Some(dir))
                .map(|d| Entry {
                    path: d.clone(),
                    is_dir: true,
                })
                .chain(self.files.iter().filter(|f| f.parent() == Some(dir)).map(|f| Entry {
                    path: f.clone(),
                    is_dir: false,
                }))
                .collect();
            entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
            Ok(entries)
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.contains(path) || self.dirs.contains(path)
        }
    }

    #[test]
    fn test_find_markdown_case_insensitive() {
        let listing = MemoryListing::with_files(&[
            "Questions/Arrays/TwoSum.md",
            "Questions/Trees/BranchSums.md",
        ]);
        assert_eq!(
            find_markdown(&listing, Path::new("Questions"), "branchsums.MD"),
            Some(PathBuf::from("Questions/Trees/BranchSums.md"))
        );
        assert_eq!(find_markdown(&listing, Path::new("Questions"), "missing.md"), None);
    }

    #[test]
    fn test_find_unprocessed_skips_generated() {
        let mut listing = MemoryListing::with_files(&[
            "Questions/Arrays/TwoSum.md",
            "Questions/Arrays/ThreeSum.md",
            "Questions/Arrays/notes.txt",
        ]);
        listing.add_dir("Questions/Arrays/ThreeSum/Python");

        assert_eq!(
            find_unprocessed(&listing, Path::new("Questions")),
            Some(PathBuf::from("Questions/Arrays/TwoSum.md"))
        );

        listing.add_dir("Questions/Arrays/TwoSum");
        assert_eq!(find_unprocessed(&listing, Path::new("Questions")), None);
    }

    #[test]
    fn test_files_before_subdirectories() {
        let listing = MemoryListing::with_files(&[
            "Questions/A/Deep.md",
            "Questions/Top.md",
        ]);
        assert_eq!(
            find_unprocessed(&listing, Path::new("Questions")),
            Some(PathBuf::from("Questions/Top.md"))
        );
    }

    #[test]
    fn test_missing_root() {
        let listing = MemoryListing::default();
        assert_eq!(find_unprocessed(&listing, Path::new("Questions")), None);
    }

    #[test]
    fn test_fs_listing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Questions");
        std::fs::create_dir_all(root.join("Graphs")).unwrap();
        std::fs::write(root.join("Graphs").join("Bfs.md"), "x").unwrap();
        std::fs::write(root.join("Readme.md"), "x").unwrap();
        std::fs::create_dir(root.join("Readme")).unwrap();

        assert_eq!(
            find_unprocessed(&FsListing, &root),
            Some(root.join("Graphs").join("Bfs.md"))
        );
    }
}
