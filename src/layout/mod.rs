mod text;

pub use text::{GlyphPlacement, LayoutError, TextOnPathOptions, layout_along_path, layout_evenly};
