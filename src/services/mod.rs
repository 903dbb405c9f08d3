// サービス層 - 機能別の具象実装
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod config;
pub mod monitoring;
pub mod processing;
pub mod reporting;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::DefaultPipelineConfig;
pub use monitoring::{ConsolePipelineReporter, NoOpPipelineReporter};
pub use processing::SimulatedWorkProcessor;
pub use reporting::{render_text_report, FileReportSink, JsonReportSink, MemoryReportSink};
