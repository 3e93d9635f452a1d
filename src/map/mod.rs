mod cache;
mod compositor;
pub mod raster;
mod transform;

pub use cache::{CountryGeometry, GeometryCache, ParseReport};
pub use compositor::{
    compose_with, BackgroundGradient, CountryStyle, DrawInstruction, MapCompositor, Rgb,
    BACKGROUND, SHADOW_OFFSET,
};
pub use transform::{shift_path, ViewportTransform, MAP_HEIGHT, MAP_WIDTH};
