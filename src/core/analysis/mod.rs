pub mod analyzer;
pub mod chunk;
pub mod error;

pub use analyzer::{
    init_journey_document, journey_title, AnalysisReport, AnalysisSink, AnalyzerConfig,
    FrameAnalyzer,
};
pub use chunk::{plan_units, AnalysisUnit, Grouping};
pub use error::AnalysisError;
