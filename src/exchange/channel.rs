//! Transports for exchange text.
//!
//! A channel holds at most one message, and every write replaces it. `read`
//! returns `Ok(None)` while nothing has been written yet.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::trace;

/// A single-slot text channel shared with an agent.
pub trait ExchangeChannel {
    /// Current contents, or `None` if there are none yet.
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the contents.
    fn write(&self, text: &str) -> io::Result<()>;
}

impl<C: ExchangeChannel + ?Sized> ExchangeChannel for &C {
    fn read(&self) -> io::Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }
}

/// A channel backed by a file.
///
/// Writes go to a hidden temp file next to the target and are renamed into
/// place, so a reader never sees a half-written board.
#[derive(Clone, Debug)]
pub struct FileChannel {
    path: PathBuf,
}

impl FileChannel {
    /// Use the file at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The shared file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "exchange".into(), |name| name.to_string_lossy());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl ExchangeChannel for FileChannel {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, text: &str) -> io::Result<()> {
        let temp = self.temp_path();
        fs::write(&temp, text)?;
        fs::rename(&temp, &self.path)?;
        trace!(path = %self.path.display(), bytes = text.len(), "exchange written");
        Ok(())
    }
}

/// An in-process channel. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryChannel {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryChannel {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| io::Error::other("memory channel poisoned"))
    }
}

impl ExchangeChannel for MemoryChannel {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn write(&self, text: &str) -> io::Result<()> {
        *self.lock()? = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_channel_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let channel = FileChannel::new(dir.path().join("gamestate.txt"));
        assert_eq!(channel.read().unwrap(), None);

        channel.write("Human Move:\n0 0\n0 0\n").unwrap();
        assert_eq!(channel.read().unwrap().as_deref(), Some("Human Move:\n0 0\n0 0\n"));

        channel.write("AI Move:\n1B 0\n0 0\n").unwrap();
        assert_eq!(channel.read().unwrap().as_deref(), Some("AI Move:\n1B 0\n0 0\n"));
        assert!(!channel.temp_path().exists());
    }

    #[test]
    fn test_memory_channel_is_shared() {
        let host = MemoryChannel::new();
        let agent = host.clone();
        assert_eq!(agent.read().unwrap(), None);
        host.write("x").unwrap();
        assert_eq!(agent.read().unwrap().as_deref(), Some("x"));
    }
}
