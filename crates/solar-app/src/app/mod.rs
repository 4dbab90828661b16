//! Application use cases

pub mod analysis_service;

pub use analysis_service::{
    analyze_rooftops, plan_jobs, process_rooftop, AnalysisContext, AnalysisOptions,
    AnalysisServiceError, ProgressCallback, RooftopJob,
};
