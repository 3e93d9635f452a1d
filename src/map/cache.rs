use crate::data::GeometryRepository;
use crate::error::MapError;
use crate::path::{self, BoundingBox, ParsedPath};
use rayon::prelude::*;
use std::sync::{Arc, RwLock};

/// The parse-once unit: one country's outline plus its logical-space bounds
#[derive(Clone, Debug)]
pub struct CountryGeometry {
    pub code: String,
    pub path: ParsedPath,
    pub bounds: BoundingBox,
}

/// What happened during the one-time batch parse
#[derive(Clone, Debug, Default)]
pub struct ParseReport {
    /// Outlines that parsed cleanly
    pub parsed: usize,
    /// Skipped countries with the error that excluded them
    pub skipped: Vec<(String, String)>,
}

/// Process-lifetime cache of parsed country geometry.
///
/// Parsing a couple of hundred multi-segment outlines is expensive enough
/// that it must happen once, not once per screen. The first `ensure` call
/// parses the whole repository (in parallel) and stores the list; every
/// later call returns the same `Arc`. Population is single-flight: a
/// concurrent first access blocks until the list is complete, so no caller
/// ever observes a partial cache.
///
/// A country whose path fails to parse is logged and skipped rather than
/// failing the batch; the skip list stays available via `report`.
pub struct GeometryCache {
    slot: RwLock<Option<Populated>>,
}

#[derive(Clone)]
struct Populated {
    geometries: Arc<Vec<CountryGeometry>>,
    report: Arc<ParseReport>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Populate from the repository on first call, then return the shared
    /// list. Fails with `NotLoaded` if the repository has no bundle yet.
    pub fn ensure(
        &self,
        repository: &GeometryRepository,
    ) -> Result<Arc<Vec<CountryGeometry>>, MapError> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        if let Some(populated) = slot.as_ref() {
            return Ok(populated.geometries.clone());
        }

        let entries = repository.entries()?;
        let results: Vec<_> = entries
            .par_iter()
            .map(|rec| (rec, path::parse(&rec.path_data)))
            .collect();

        let mut geometries = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (rec, parsed) in results {
            match parsed {
                Ok(parsed_path) => match parsed_path.bounds() {
                    Some(bounds) => geometries.push(CountryGeometry {
                        code: rec.code.clone(),
                        path: parsed_path,
                        bounds,
                    }),
                    None => skipped.push((rec.code.clone(), "empty outline".to_string())),
                },
                Err(e) => skipped.push((rec.code.clone(), e.to_string())),
            }
        }

        for (code, reason) in &skipped {
            log::warn!("skipping outline for {code}: {reason}");
        }

        let populated = Populated {
            report: Arc::new(ParseReport {
                parsed: geometries.len(),
                skipped,
            }),
            geometries: Arc::new(geometries),
        };
        let out = populated.geometries.clone();
        *slot = Some(populated);
        Ok(out)
    }

    /// The cached list if populated, without triggering a populate
    pub fn get(&self) -> Option<Arc<Vec<CountryGeometry>>> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|p| p.geometries.clone())
    }

    /// Parse outcome of the one-time populate, if it has run
    pub fn report(&self) -> Option<Arc<ParseReport>> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|p| p.report.clone())
    }

    /// Test hook: drop the populated state
    pub fn reset(&self) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_repo(bundle: &[u8]) -> GeometryRepository {
        let repo = GeometryRepository::new();
        repo.load_bundle(bundle.to_vec()).unwrap();
        repo
    }

    #[test]
    fn test_ensure_parses_all_entries() {
        let repo = loaded_repo(br#"{"FR": "M 0 0 L 1 0 L 1 1 Z", "DE": "M 2 2 L 3 2 Z"}"#);
        let cache = GeometryCache::new();
        let geoms = cache.ensure(&repo).unwrap();
        assert_eq!(geoms.len(), 2);
        assert_eq!(geoms[0].code, "DE");
        assert_eq!(geoms[1].code, "FR");
    }

    #[test]
    fn test_ensure_before_repository_load_fails() {
        let cache = GeometryCache::new();
        assert!(matches!(
            cache.ensure(&GeometryRepository::new()),
            Err(MapError::NotLoaded)
        ));
    }

    #[test]
    fn test_second_ensure_returns_same_list() {
        let repo = loaded_repo(br#"{"FR": "M 0 0 L 1 0 Z"}"#);
        let cache = GeometryCache::new();
        let first = cache.ensure(&repo).unwrap();
        let second = cache.ensure(&repo).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_malformed_entry_is_skipped_not_fatal() {
        let repo = loaded_repo(
            br#"{"AA": "M 0 0 L 1 0 Z", "BB": "this is not a path", "CC": "M 5 5 L 6 5 Z"}"#,
        );
        let cache = GeometryCache::new();
        let geoms = cache.ensure(&repo).unwrap();

        let codes: Vec<_> = geoms.iter().map(|g| g.code.as_str()).collect();
        assert_eq!(codes, vec!["AA", "CC"]);

        let report = cache.report().unwrap();
        assert_eq!(report.parsed, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "BB");
    }

    #[test]
    fn test_bounds_cover_outline() {
        let repo = loaded_repo(br#"{"AA": "M 10 20 L 30 20 L 30 40 Z"}"#);
        let cache = GeometryCache::new();
        let geoms = cache.ensure(&repo).unwrap();
        let b = geoms[0].bounds;
        assert_eq!((b.min.x, b.min.y, b.max.x, b.max.y), (10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_get_before_ensure_is_none() {
        let cache = GeometryCache::new();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_reset_clears_population() {
        let repo = loaded_repo(br#"{"FR": "M 0 0 L 1 0 Z"}"#);
        let cache = GeometryCache::new();
        cache.ensure(&repo).unwrap();
        cache.reset();
        assert!(cache.get().is_none());
        assert!(cache.report().is_none());
    }

    #[test]
    fn test_concurrent_ensure_returns_one_list() {
        let repo = Arc::new(loaded_repo(br#"{"FR": "M 0 0 L 1 0 Z", "US": "M 9 9 L 8 8 Z"}"#));
        let cache = Arc::new(GeometryCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                let cache = cache.clone();
                std::thread::spawn(move || cache.ensure(&repo).unwrap())
            })
            .collect();

        let lists: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for list in &lists[1..] {
            assert!(Arc::ptr_eq(&lists[0], list));
        }
    }
}
