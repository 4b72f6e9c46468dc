pub mod stages;

pub use stages::{
    analyze_frames, extract_frames, extract_frames_with, generate_summary, init_journey,
    run_pipeline, synthesize_journey, AnalyzeMode, StageError,
};
