//! newsalign runner — configuration, data sources, pipeline orchestration, export.
//!
//! Wires the pure stages of `newsalign-core` to real inputs:
//! - TOML configuration with content-addressed run IDs
//! - Article sources (CSV, saved NewsAPI responses)
//! - Market data sources (CSV, Yahoo chart API, synthetic)
//! - Single-ticker runs and parallel batches
//! - JSON / CSV / Markdown artifacts

pub mod config;
pub mod export;
pub mod pipeline;
pub mod sources;

pub use config::{
    ArticleSourceConfig, ConfigError, EvaluationConfig, MarketSourceConfig, PipelineConfig,
    RunId,
};
pub use export::{
    export_aligned_csv, export_daily_csv, export_json, import_json, load_artifacts,
    render_markdown, save_artifacts,
};
pub use pipeline::{
    build_sources, dataset_hash, run_batch, run_config, run_pipeline, BatchOutcome,
    Collaborators, PipelineError, PipelineReport, PipelineRequest, SourceSet, StageCounts,
    SCHEMA_VERSION,
};
