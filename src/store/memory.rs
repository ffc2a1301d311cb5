//! In-memory asset store.

use chrono::Utc;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{AssetKind, AssetRef, AssetStore};
use crate::error::{Error, Result};

type Slots = HashMap<AssetKind, Vec<(AssetRef, Arc<Vec<u8>>)>>;

/// Keeps assets in memory; useful for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    assets: Arc<Mutex<Slots>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slots>> {
        self.assets
            .lock()
            .map_err(|_| Error::Io(io::Error::other("asset store lock poisoned")))
    }
}

impl AssetStore for MemoryStore {
    fn put(&self, kind: AssetKind, name: &str, bytes: &[u8]) -> Result<AssetRef> {
        let asset = AssetRef::new(kind, name, bytes.len() as u64, Utc::now());
        let mut assets = self.lock()?;
        let slot = assets.entry(kind).or_default();
        slot.clear();
        slot.push((asset.clone(), Arc::new(bytes.to_vec())));
        Ok(asset)
    }

    fn get(&self, asset: &AssetRef) -> Result<Vec<u8>> {
        self.lock()?
            .get(&asset.kind)
            .and_then(|slot| slot.iter().find(|(a, _)| a.name == asset.name))
            .map(|(_, bytes)| bytes.to_vec())
            .ok_or_else(|| Error::NotFound(format!("{} '{}'", asset.kind, asset.name)))
    }

    fn list(&self, kind: AssetKind) -> Result<Vec<AssetRef>> {
        Ok(self
            .lock()?
            .get(&kind)
            .map(|slot| slot.iter().map(|(a, _)| a.clone()).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reupload_replaces() {
        let store = MemoryStore::new();
        let first = store.put(AssetKind::Roster, "a.csv", b"A\n1").unwrap();
        let second = store.put(AssetKind::Roster, "b.csv", b"B\n2").unwrap();

        assert_eq!(store.list(AssetKind::Roster).unwrap(), vec![second.clone()]);
        assert!(matches!(store.get(&first), Err(Error::NotFound(_))));
        assert_eq!(store.get(&second).unwrap(), b"B\n2");
    }

    #[test]
    fn test_kinds_are_independent() {
        let store = MemoryStore::new();
        store.put(AssetKind::Roster, "a.csv", b"A\n1").unwrap();
        assert!(store.latest(AssetKind::Template).unwrap().is_none());
        assert!(store.latest(AssetKind::Roster).unwrap().is_some());
    }
}
