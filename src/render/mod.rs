pub mod generators;
pub mod progressive;

pub use generators::{blank_canvas, generator_for, render_onto, render_still, Generator, Step};
pub use progressive::{CancelToken, Display, ProgressiveRenderer, RenderOutcome, RenderState};
