pub mod png;
pub mod frames;
pub mod video;

pub use png::{ImageCodec, PngCodec};
pub use frames::{frame_file_name, FrameStore, PersistedFrames};
pub use video::{assemble_video, VideoFormat};
