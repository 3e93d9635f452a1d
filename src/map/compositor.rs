use crate::error::MapError;
use crate::map::cache::CountryGeometry;
use crate::map::transform::{shift_path, ViewportTransform};
use crate::path::ParsedPath;
use glam::DVec2;
use std::collections::HashSet;
use std::sync::Arc;

/// Drop-shadow displacement in surface pixels, applied after the viewport
/// transform so it is the same at every surface size
pub const SHADOW_OFFSET: DVec2 = DVec2::new(2.0, 2.0);

pub type Rgb = (u8, u8, u8);

/// Fixed vertical ocean gradient behind the land masses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundGradient {
    pub top: Rgb,
    pub bottom: Rgb,
}

pub const BACKGROUND: BackgroundGradient = BackgroundGradient {
    top: (16, 42, 67),
    bottom: (8, 20, 33),
};

/// Styling bucket for a country's fill and border
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountryStyle {
    Visited,
    Unvisited,
}

/// One ordered step of a map frame. Paths are already in surface
/// coordinates; instructions are ephemeral and rebuilt as needed.
#[derive(Clone, Debug)]
pub enum DrawInstruction {
    FillBackground(BackgroundGradient),
    Shadow(Arc<ParsedPath>),
    Fill(Arc<ParsedPath>, CountryStyle),
    Border(Arc<ParsedPath>, CountryStyle),
}

/// One country with its surface-space fill and shadow paths
struct TransformedCountry {
    code: String,
    fill: Arc<ParsedPath>,
    shadow: Arc<ParsedPath>,
}

struct SizeCache {
    key: (u64, u64),
    countries: Vec<TransformedCountry>,
}

/// Per-frame draw-list builder.
///
/// Transforming a couple of hundred multi-segment paths is the expensive
/// part of a frame, so the transformed paths are memoized keyed on the
/// surface size (and geometry count). A visited-set change only re-tags
/// styles on the cheap `Arc` handles; the transform cost is paid once per
/// distinct surface size.
pub struct MapCompositor {
    cached: Option<SizeCache>,
}

impl MapCompositor {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Build the ordered draw list for one frame: background, then per
    /// country (in slice order) shadow, fill, border. An empty geometry
    /// slice yields just the background.
    pub fn compose(
        &mut self,
        geometries: &[CountryGeometry],
        surface_width: f64,
        surface_height: f64,
        visited: &HashSet<String>,
    ) -> Result<Vec<DrawInstruction>, MapError> {
        let key = (surface_width.to_bits(), surface_height.to_bits());
        let cache = match self.cached.take() {
            Some(c) if c.key == key && c.countries.len() == geometries.len() => c,
            _ => {
                let transform = ViewportTransform::fit(surface_width, surface_height)?;
                SizeCache {
                    key,
                    countries: transform_countries(&transform, geometries),
                }
            }
        };

        let mut instructions = Vec::with_capacity(1 + cache.countries.len() * 3);
        instructions.push(DrawInstruction::FillBackground(BACKGROUND));
        for country in &cache.countries {
            let style = if visited.contains(&country.code) {
                CountryStyle::Visited
            } else {
                CountryStyle::Unvisited
            };
            instructions.push(DrawInstruction::Shadow(country.shadow.clone()));
            instructions.push(DrawInstruction::Fill(country.fill.clone(), style));
            instructions.push(DrawInstruction::Border(country.fill.clone(), style));
        }
        self.cached = Some(cache);
        Ok(instructions)
    }
}

impl Default for MapCompositor {
    fn default() -> Self {
        Self::new()
    }
}

fn transform_countries(
    transform: &ViewportTransform,
    geometries: &[CountryGeometry],
) -> Vec<TransformedCountry> {
    geometries
        .iter()
        .map(|geom| {
            let fill = transform.apply_path(&geom.path);
            let shadow = shift_path(&fill, SHADOW_OFFSET);
            TransformedCountry {
                code: geom.code.clone(),
                fill: Arc::new(fill),
                shadow: Arc::new(shadow),
            }
        })
        .collect()
}

/// Single-shot composition against an explicit transform, with no memo.
/// The memoizing [`MapCompositor`] is the production entry point; this one
/// backs benches and tests that want a pure pass.
pub fn compose_with(
    transform: &ViewportTransform,
    geometries: &[CountryGeometry],
    visited: &HashSet<String>,
) -> Vec<DrawInstruction> {
    let mut instructions = Vec::with_capacity(1 + geometries.len() * 3);
    instructions.push(DrawInstruction::FillBackground(BACKGROUND));
    for country in transform_countries(transform, geometries) {
        let style = if visited.contains(&country.code) {
            CountryStyle::Visited
        } else {
            CountryStyle::Unvisited
        };
        instructions.push(DrawInstruction::Shadow(country.shadow));
        instructions.push(DrawInstruction::Fill(country.fill.clone(), style));
        instructions.push(DrawInstruction::Border(country.fill, style));
    }
    instructions
}
