pub mod color_models;
pub mod palettes;

pub use palettes::{escape_color, BLACK, LINE_WHITE, PLOT_GREEN};
