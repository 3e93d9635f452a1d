//! Vector world-map rendering for a visited-countries checklist.
//!
//! The pipeline: a JSON bundle of per-country path-language outlines is
//! loaded once into a [`data::GeometryRepository`], parsed once into a
//! shared [`map::GeometryCache`], fitted to the drawing surface by a
//! [`map::ViewportTransform`], and composed by the [`map::MapCompositor`]
//! into an ordered draw list distinguishing visited from unvisited
//! countries. [`accessibility::describe`] summarizes the same visited set
//! for non-visual consumers.

pub mod accessibility;
pub mod app;
pub mod braille;
pub mod data;
pub mod error;
pub mod map;
pub mod path;
pub mod ui;

pub use error::MapError;
