//! Directory used as a queue of images waiting to be printed.
//!
//! Any process can drop a `.png` file into the queue directory. Every
//! drain prints whatever is there, in the order the directory lists it,
//! and removes what got printed. The listing order is up to the
//! filesystem and must not be relied on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::system::printer::Printer;

/// Lines fed after every spooled image.
const FEED_AFTER_IMAGE: u8 = 10;

pub trait Spool {
    /// List entries waiting to be printed.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Filesystem` when the queue cannot be listed.
    fn pending(&mut self) -> Result<Vec<PathBuf>>;

    /// # Errors
    ///
    /// Fails with `Error::Filesystem` when the entry cannot be removed.
    fn remove(&mut self, entry: &Path) -> Result<()>;
}

#[derive(Debug)]
pub struct DirectorySpool {
    directory: PathBuf,
}

impl DirectorySpool {
    /// Open the queue, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Filesystem` when the directory cannot be created.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            log::info!("Creating queue directory '{}'", directory.display());
            fs::create_dir_all(&directory).map_err(|err| Error::filesystem(&directory, err))?;
        }
        Ok(Self { directory })
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Spool for DirectorySpool {
    fn pending(&mut self) -> Result<Vec<PathBuf>> {
        let listing =
            fs::read_dir(&self.directory).map_err(|err| Error::filesystem(&self.directory, err))?;

        Ok(collect_images(
            &self.directory,
            listing.map(|entry| entry.map(|entry| entry.path())),
        ))
    }

    fn remove(&mut self, entry: &Path) -> Result<()> {
        fs::remove_file(entry).map_err(|err| Error::filesystem(entry, err))
    }
}

// An unreadable entry is skipped so it cannot hide the rest of the queue.
fn collect_images(
    directory: &Path,
    listing: impl Iterator<Item = io::Result<PathBuf>>,
) -> Vec<PathBuf> {
    listing
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                log::warn!("{}", Error::filesystem(directory, err));
                None
            }
        })
        .filter(|path| path.is_file() && is_png(path))
        .collect()
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("png"))
}

/// Outcome of a single drain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub printed: usize,
    pub failed: usize,
}

/// Print and remove every pending entry.
///
/// A failing entry never stops the rest. Entries that failed on the
/// printer link stay queued for the next drain. Entries that cannot be
/// decoded are removed, they would fail forever. Once the image went
/// through, a failed paper feed no longer keeps the entry.
///
/// The link cannot tell how much of an image reached the printer. A
/// link failure in the middle of an image prints its upper part now and
/// the whole image again on the retry.
pub fn drain(spool: &mut dyn Spool, printer: &mut dyn Printer) -> DrainReport {
    log::info!("Checking spool...");

    let mut report = DrainReport::default();
    let entries = match spool.pending() {
        Ok(entries) => entries,
        Err(err) => {
            log::error!("Failed to list spool: {}", err);
            return report;
        }
    };

    for entry in entries {
        log::info!("Printing '{}'...", entry.display());
        match printer.print_image(&entry, false) {
            Ok(()) => {
                if let Err(err) = printer.feed(FEED_AFTER_IMAGE) {
                    log::warn!("Failed to feed after '{}': {}", entry.display(), err);
                }
                report.printed += 1;
            }
            Err(err @ Error::Image(_)) => {
                log::error!("Dropping '{}': {}", entry.display(), err);
                report.failed += 1;
            }
            Err(err) => {
                log::error!(
                    "Failed to print '{}', keeping it queued: {}",
                    entry.display(),
                    err
                );
                report.failed += 1;
                continue;
            }
        }

        if let Err(err) = spool.remove(&entry) {
            log::error!("{}", err);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_opened_on_missing_directory_it_creates_it() {
        let root = tempfile::tempdir().unwrap();
        let directory = root.path().join("queue");
        let spool = DirectorySpool::open(&directory).unwrap();
        assert!(directory.is_dir());
        assert_eq!(spool.directory(), directory);
    }

    #[test]
    fn when_listing_it_returns_only_png_files() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("a.png"), b"").unwrap();
        fs::write(root.path().join("B.PNG"), b"").unwrap();
        fs::write(root.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(root.path().join("dir.png")).unwrap();

        let mut spool = DirectorySpool::open(root.path()).unwrap();
        let mut pending = spool.pending().unwrap();
        pending.sort();
        assert_eq!(
            pending,
            vec![root.path().join("B.PNG"), root.path().join("a.png")]
        );
    }

    #[test]
    fn when_entry_is_removed_it_is_gone_from_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let entry = root.path().join("a.png");
        fs::write(&entry, b"").unwrap();

        let mut spool = DirectorySpool::open(root.path()).unwrap();
        spool.remove(&entry).unwrap();
        assert!(spool.pending().unwrap().is_empty());
        assert!(matches!(
            spool.remove(&entry),
            Err(Error::Filesystem { .. })
        ));
    }

    #[test]
    fn when_listing_has_unreadable_entry_it_keeps_the_rest() {
        let root = tempfile::tempdir().unwrap();
        let good = root.path().join("a.png");
        fs::write(&good, b"").unwrap();

        let listing = vec![
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            Ok(good.clone()),
            Ok(root.path().join("missing.png")),
        ];
        assert_eq!(collect_images(root.path(), listing.into_iter()), vec![good]);
    }

    #[test]
    fn when_directory_disappears_listing_fails() {
        let root = tempfile::tempdir().unwrap();
        let directory = root.path().join("queue");
        let mut spool = DirectorySpool::open(&directory).unwrap();
        fs::remove_dir(&directory).unwrap();
        assert!(matches!(spool.pending(), Err(Error::Filesystem { .. })));
    }
}
