//! File-based sink for persistent logs.

use crate::error::{SinkError, SinkResult};
use crate::sink::LogSink;
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A file-based sink.
///
/// This sink provides persistent log storage using OS file APIs.
/// Data survives process restarts.
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to force data and metadata to disk
/// - Creating a new log file fsyncs the parent directory, so the file
///   itself survives a crash right after creation
///
/// # Thread Safety
///
/// This sink is thread-safe and can be shared across threads.
/// Internal locking keeps the file position and tracked size consistent.
///
/// # Example
///
/// ```no_run
/// use framelog_storage::{LogSink, FileSink};
/// use std::path::Path;
///
/// let mut sink = FileSink::open(Path::new("journal.log")).unwrap();
/// let offset = sink.append(b"persistent record").unwrap();
/// sink.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: RwLock<File>,
    size: RwLock<u64>,
}

impl FileSink {
    /// Opens or creates a file sink at the given path.
    ///
    /// If the file exists it is opened for reading and appending, and the
    /// sink size starts at the existing file length. If it does not exist
    /// a new empty file is created and the parent directory is fsynced, so
    /// the new directory entry survives a crash.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created.
    pub fn open(path: &Path) -> SinkResult<Self> {
        let created = !path.exists();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let size = file.metadata()?.len();

        if created {
            sync_parent_dir(path)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            size: RwLock::new(size),
        })
    }

    /// Opens or creates a file sink, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be opened.
    pub fn open_with_create_dirs(path: &Path) -> SinkResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Fsyncs the directory holding `path`.
///
/// On Unix a newly created file's directory entry is only durable once the
/// directory itself has been synced.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> SinkResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = File::open(parent)?;
    dir.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> SinkResult<()> {
    // Directory fsync is not supported on Windows; NTFS journals metadata.
    Ok(())
}

impl LogSink for FileSink {
    fn append(&mut self, data: &[u8]) -> SinkResult<u64> {
        if data.is_empty() {
            return Ok(*self.size.read());
        }

        let mut file = self.file.write();
        let mut size = self.size.write();

        let offset = *size;
        file.seek(SeekFrom::End(0))?;
        file.write_all(data)?;
        *size += data.len() as u64;

        Ok(offset)
    }

    fn flush(&mut self) -> SinkResult<()> {
        let mut file = self.file.write();
        file.flush()?;
        Ok(())
    }

    fn sync(&mut self) -> SinkResult<()> {
        let file = self.file.write();
        file.sync_all()?;
        Ok(())
    }

    fn size(&self) -> SinkResult<u64> {
        Ok(*self.size.read())
    }

    fn read_at(&self, offset: u64, len: usize) -> SinkResult<Vec<u8>> {
        let size = *self.size.read();
        let end = offset.saturating_add(len as u64);

        if offset > size || end > size {
            return Err(SinkError::ReadPastEnd { offset, len, size });
        }

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    fn truncate(&mut self, new_size: u64) -> SinkResult<()> {
        let mut file = self.file.write();
        let mut size = self.size.write();

        if new_size > *size {
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "cannot truncate to size {} which is greater than current size {}",
                    new_size, *size
                ),
            )));
        }

        file.set_len(new_size)?;
        file.sync_all()?;
        *size = new_size;

        Ok(())
    }
}
