use crate::error::MapError;
use simd_json::prelude::*;
use std::sync::{Arc, RwLock};

/// Bundle shipped with the binary, used when no bundle path is given
pub const DEFAULT_BUNDLE: &[u8] = include_bytes!("../../data/countries.json");

/// One country's raw outline as authored in the bundle
#[derive(Clone, Debug, PartialEq)]
pub struct RawGeometryRecord {
    /// Uppercase ISO alpha country code
    pub code: String,
    /// Path-language outline in the 1008x651 logical space
    pub path_data: String,
}

/// Owner of the code -> path-data mapping, loaded once from a JSON bundle
/// of the shape `{ "CODE": "<path string>", ... }`.
///
/// The load is idempotent and single-flight: concurrent first callers
/// collapse into one bundle read and decode, and every caller observes the
/// same entry count. Entries are sorted by code so iteration order is
/// stable regardless of JSON object order.
pub struct GeometryRepository {
    entries: RwLock<Option<Arc<Vec<RawGeometryRecord>>>>,
}

impl GeometryRepository {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(None),
        }
    }

    /// Load from raw bundle bytes. Returns the entry count.
    pub fn load_bundle(&self, bytes: Vec<u8>) -> Result<usize, MapError> {
        self.load_with(move || bytes)
    }

    /// Load the embedded bundle
    pub fn load_default(&self) -> Result<usize, MapError> {
        self.load_with(|| DEFAULT_BUNDLE.to_vec())
    }

    /// Load with a caller-supplied bundle reader. The reader runs only if
    /// this repository has not been populated yet; a failed decode leaves
    /// the repository unloaded (all-or-nothing).
    pub fn load_with<F>(&self, read: F) -> Result<usize, MapError>
    where
        F: FnOnce() -> Vec<u8>,
    {
        let mut slot = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = slot.as_ref() {
            return Ok(existing.len());
        }

        let records = decode_bundle(read())?;
        let count = records.len();
        log::info!("loaded {count} country outlines");
        *slot = Some(Arc::new(records));
        Ok(count)
    }

    /// All records, sorted by country code.
    /// Fails with `NotLoaded` before the first successful load.
    pub fn entries(&self) -> Result<Arc<Vec<RawGeometryRecord>>, MapError> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .cloned()
            .ok_or(MapError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Test hook: restore the pre-load state
    pub fn reset(&self) {
        *self.entries.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl Default for GeometryRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode and validate a bundle. Rejects the whole bundle on the first bad
/// entry so a partially populated mapping can never be observed.
fn decode_bundle(mut bytes: Vec<u8>) -> Result<Vec<RawGeometryRecord>, MapError> {
    let value = simd_json::to_owned_value(&mut bytes)
        .map_err(|e| MapError::BadBundle(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| MapError::BadBundle("top level is not an object".into()))?;

    let mut records = Vec::with_capacity(object.len());
    for (code, path) in object.iter() {
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(MapError::BadBundle(format!(
                "country code {code:?} is not uppercase ISO alpha"
            )));
        }
        let path_data = path
            .as_str()
            .ok_or_else(|| MapError::BadBundle(format!("entry {code:?} is not a string")))?;
        if path_data.trim().is_empty() {
            return Err(MapError::BadBundle(format!(
                "entry {code:?} has blank path data"
            )));
        }
        records.push(RawGeometryRecord {
            code: code.to_string(),
            path_data: path_data.to_string(),
        });
    }

    records.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BUNDLE: &[u8] = br#"{"FR": "M 0 0 L 1 0 Z", "DE": "M 2 0 L 3 0 Z"}"#;

    #[test]
    fn test_load_sorts_entries_by_code() {
        let repo = GeometryRepository::new();
        assert_eq!(repo.load_bundle(BUNDLE.to_vec()).unwrap(), 2);
        let entries = repo.entries().unwrap();
        assert_eq!(entries[0].code, "DE");
        assert_eq!(entries[1].code, "FR");
    }

    #[test]
    fn test_entries_before_load_fails() {
        let repo = GeometryRepository::new();
        assert!(matches!(repo.entries(), Err(MapError::NotLoaded)));
    }

    #[test]
    fn test_load_is_idempotent() {
        let repo = GeometryRepository::new();
        assert_eq!(repo.load_bundle(BUNDLE.to_vec()).unwrap(), 2);
        // A second load with different content is ignored
        assert_eq!(
            repo.load_bundle(br#"{"US": "M 0 0 L 1 1"}"#.to_vec()).unwrap(),
            2
        );
        assert_eq!(repo.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_load_reads_bundle_once() {
        let repo = Arc::new(GeometryRepository::new());
        let reads = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                let reads = reads.clone();
                std::thread::spawn(move || {
                    repo.load_with(|| {
                        reads.fetch_add(1, Ordering::SeqCst);
                        BUNDLE.to_vec()
                    })
                    .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bad_bundle_leaves_repository_unloaded() {
        let repo = GeometryRepository::new();
        assert!(repo.load_bundle(b"not json".to_vec()).is_err());
        assert!(!repo.is_loaded());
        // A later good load still works
        assert_eq!(repo.load_bundle(BUNDLE.to_vec()).unwrap(), 2);
    }

    #[test]
    fn test_rejects_lowercase_code() {
        let repo = GeometryRepository::new();
        let err = repo.load_bundle(br#"{"fr": "M 0 0 L 1 1"}"#.to_vec());
        assert!(matches!(err, Err(MapError::BadBundle(_))));
    }

    #[test]
    fn test_rejects_blank_path_data() {
        let repo = GeometryRepository::new();
        let err = repo.load_bundle(br#"{"FR": "  "}"#.to_vec());
        assert!(matches!(err, Err(MapError::BadBundle(_))));
    }

    #[test]
    fn test_reset_restores_pre_load_state() {
        let repo = GeometryRepository::new();
        repo.load_bundle(BUNDLE.to_vec()).unwrap();
        repo.reset();
        assert!(matches!(repo.entries(), Err(MapError::NotLoaded)));
    }

    #[test]
    fn test_default_bundle_decodes() {
        let repo = GeometryRepository::new();
        assert!(repo.load_default().unwrap() > 0);
    }
}
