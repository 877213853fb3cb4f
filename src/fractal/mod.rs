pub mod types;
pub mod plane;
pub mod definitions;
pub mod escape_time;
pub mod vectorial;
pub mod chaos_game;
pub mod ifs;

pub use types::{EscapeResult, FractalKind, FractalParams};
pub use plane::Viewport;
pub use definitions::default_params_for_kind;
pub use escape_time::{evaluate, EscapeRule};
