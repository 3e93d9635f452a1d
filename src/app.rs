use crate::accessibility;
use crate::data::GeometryRepository;
use crate::error::MapError;
use crate::map::{CountryGeometry, DrawInstruction, GeometryCache, MapCompositor};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Application state: the shared geometry pipeline plus the in-memory
/// visited checklist driven by the keyboard
pub struct App {
    repository: Arc<GeometryRepository>,
    cache: Arc<GeometryCache>,
    compositor: MapCompositor,
    /// Country codes currently checked off
    pub visited: HashSet<String>,
    /// Index of the highlighted country in cache order
    pub cursor: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(repository: Arc<GeometryRepository>, cache: Arc<GeometryCache>) -> Self {
        Self {
            repository,
            cache,
            compositor: MapCompositor::new(),
            visited: HashSet::new(),
            cursor: 0,
            should_quit: false,
        }
    }

    /// Kick off the one-time bundle load and parse on a background thread.
    ///
    /// Single-shot handoff: the loader populates the shared repository and
    /// cache and exits; the render loop polls [`App::geometries`] until the
    /// result lands. No cancellation is needed because the work is
    /// idempotent and a late result simply populates the cache for the
    /// next asker.
    pub fn spawn_load(&self, bundle_path: Option<PathBuf>) {
        let repository = self.repository.clone();
        let cache = self.cache.clone();
        std::thread::spawn(move || {
            let loaded = match bundle_path {
                Some(path) => match std::fs::read(&path) {
                    Ok(bytes) => repository.load_bundle(bytes),
                    Err(e) => {
                        log::warn!("cannot read {}: {e}; using embedded bundle", path.display());
                        repository.load_default()
                    }
                },
                None => repository.load_default(),
            };
            match loaded.and_then(|_| cache.ensure(&repository)) {
                Ok(geoms) => log::info!("geometry ready: {} countries", geoms.len()),
                Err(e) => log::error!("geometry load failed: {e}"),
            }
        });
    }

    /// The parsed geometry, once the background load has finished
    pub fn geometries(&self) -> Option<Arc<Vec<CountryGeometry>>> {
        self.cache.get()
    }

    /// Build the draw list for the current surface size and visited set.
    /// Before the load completes this renders the empty (background-only)
    /// map rather than failing.
    pub fn compose(
        &mut self,
        surface_width: f64,
        surface_height: f64,
    ) -> Result<Vec<DrawInstruction>, MapError> {
        match self.cache.get() {
            Some(geoms) => {
                self.compositor
                    .compose(&geoms, surface_width, surface_height, &self.visited)
            }
            None => self
                .compositor
                .compose(&[], surface_width, surface_height, &self.visited),
        }
    }

    /// Country code under the cursor
    pub fn selected_code(&self) -> Option<String> {
        let geoms = self.cache.get()?;
        geoms.get(self.cursor).map(|g| g.code.clone())
    }

    pub fn cursor_next(&mut self) {
        if let Some(geoms) = self.cache.get() {
            if !geoms.is_empty() {
                self.cursor = (self.cursor + 1) % geoms.len();
            }
        }
    }

    pub fn cursor_prev(&mut self) {
        if let Some(geoms) = self.cache.get() {
            if !geoms.is_empty() {
                self.cursor = (self.cursor + geoms.len() - 1) % geoms.len();
            }
        }
    }

    /// Check or uncheck the country under the cursor
    pub fn toggle_selected(&mut self) {
        if let Some(code) = self.selected_code() {
            if !self.visited.remove(&code) {
                self.visited.insert(code);
            }
        }
    }

    /// Countries whose outlines failed to parse during the one-time load
    pub fn skipped_count(&self) -> usize {
        self.cache.report().map(|r| r.skipped.len()).unwrap_or(0)
    }

    /// Accessibility summary of the current visited set
    pub fn description(&self) -> String {
        accessibility::describe(&self.visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_app() -> App {
        let repository = Arc::new(GeometryRepository::new());
        repository
            .load_bundle(br#"{"DE": "M 0 0 L 1 0 Z", "FR": "M 2 2 L 3 2 Z"}"#.to_vec())
            .unwrap();
        let cache = Arc::new(GeometryCache::new());
        cache.ensure(&repository).unwrap();
        App::new(repository, cache)
    }

    #[test]
    fn test_toggle_selected_flips_membership() {
        let mut app = ready_app();
        app.toggle_selected();
        assert!(app.visited.contains("DE"));
        app.toggle_selected();
        assert!(app.visited.is_empty());
    }

    #[test]
    fn test_cursor_wraps() {
        let mut app = ready_app();
        app.cursor_next();
        assert_eq!(app.selected_code().as_deref(), Some("FR"));
        app.cursor_next();
        assert_eq!(app.selected_code().as_deref(), Some("DE"));
        app.cursor_prev();
        assert_eq!(app.selected_code().as_deref(), Some("FR"));
    }

    #[test]
    fn test_compose_before_load_is_background_only() {
        let mut app = App::new(
            Arc::new(GeometryRepository::new()),
            Arc::new(GeometryCache::new()),
        );
        let out = app.compose(800.0, 600.0).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_compose_after_load_covers_all_countries() {
        let mut app = ready_app();
        let out = app.compose(800.0, 600.0).unwrap();
        assert_eq!(out.len(), 1 + 2 * 3);
    }
}
