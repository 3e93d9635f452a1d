mod canvas;

pub use canvas::{BrailleCanvas, Paint};
