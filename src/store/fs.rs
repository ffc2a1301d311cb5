//! Directory-backed asset store.

use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{AssetKind, AssetRef, AssetStore};
use crate::error::{Error, Result};
use crate::naming::is_plain_file_name;

/// Stores assets under `<root>/csv/` and `<root>/certificate/`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open a store rooted at `root`, creating its directories.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let store = Self {
            root: root.as_ref().to_path_buf(),
        };
        for kind in [AssetKind::Roster, AssetKind::Template] {
            fs::create_dir_all(store.dir(kind))?;
        }
        Ok(store)
    }

    /// The store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding assets of `kind`.
    pub fn dir(&self, kind: AssetKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    fn path_of(&self, kind: AssetKind, name: &str) -> Result<PathBuf> {
        if !is_plain_file_name(name) {
            return Err(Error::NotFound(format!("{} '{}'", kind, name)));
        }
        Ok(self.dir(kind).join(name))
    }

    fn clear(&self, kind: AssetKind) -> Result<()> {
        let dir = self.dir(kind);
        let mut removed = 0;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        if removed > 0 {
            log::debug!("Cleared {} file(s) from {}", removed, dir.display());
        }
        Ok(())
    }
}

impl AssetStore for DirectoryStore {
    fn put(&self, kind: AssetKind, name: &str, bytes: &[u8]) -> Result<AssetRef> {
        fs::create_dir_all(self.dir(kind))?;
        self.clear(kind)?;
        let asset = AssetRef::new(kind, name, bytes.len() as u64, Utc::now());
        fs::write(self.path_of(kind, &asset.name)?, bytes)?;
        Ok(asset)
    }

    fn get(&self, asset: &AssetRef) -> Result<Vec<u8>> {
        let path = self.path_of(asset.kind, &asset.name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(format!("{} '{}'", asset.kind, asset.name)),
            _ => Error::Io(e),
        })
    }

    fn list(&self, kind: AssetKind) -> Result<Vec<AssetRef>> {
        let dir = self.dir(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut assets = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match AssetRef::from_stored_name(kind, &name, meta.len()) {
                Some(asset) => assets.push(asset),
                None => log::debug!("Ignoring foreign file {}", name),
            }
        }
        assets.sort_by(|a, b| a.stored_at.cmp(&b.stored_at).then_with(|| a.name.cmp(&b.name)));
        Ok(assets)
    }
}
