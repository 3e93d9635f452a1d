mod parser;
mod segment;

pub use parser::parse;
pub use segment::{BoundingBox, ParsedPath, Segment};
