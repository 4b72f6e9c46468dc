pub mod error;
pub mod extractor;
pub mod frame;
pub mod probe;
pub mod sampler;
pub mod source;

pub use error::VideoError;
pub use extractor::{open_video, ExtractionConfig, ExtractionStats, FrameExtractor};
pub use frame::{frame_file_name, RgbFrame};
pub use probe::{probe_video, VideoInfo};
pub use sampler::FrameSampler;
pub use source::{FfmpegFrameSource, FrameSource};
