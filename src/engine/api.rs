// 高レベル公開API
// PipelineEngineを簡単に構築するための便利な関数

use super::PipelineEngine;
use crate::services::{
    ConsolePipelineReporter, DefaultPipelineConfig, FileReportSink, MemoryReportSink,
    NoOpPipelineReporter, SimulatedWorkProcessor,
};
use std::path::Path;

/// デフォルト構成のエンジンを作成
///
/// 模擬遅延付きプロセッサー、コンソール報告、テキストファイル出力
pub fn create_default_engine<P: AsRef<Path>>(
    config: DefaultPipelineConfig,
    output_path: P,
) -> PipelineEngine<
    SimulatedWorkProcessor,
    DefaultPipelineConfig,
    ConsolePipelineReporter,
    FileReportSink,
> {
    PipelineEngine::new(
        SimulatedWorkProcessor::default(),
        config,
        ConsolePipelineReporter::new(),
        FileReportSink::new(output_path),
    )
}

/// 静音構成のエンジンを作成（テスト・バックグラウンド処理用）
///
/// 遅延なしプロセッサー、無出力報告、メモリ内出力
pub fn create_quiet_engine(
    config: DefaultPipelineConfig,
) -> PipelineEngine<
    SimulatedWorkProcessor,
    DefaultPipelineConfig,
    NoOpPipelineReporter,
    MemoryReportSink,
> {
    PipelineEngine::new(
        SimulatedWorkProcessor::instant(),
        config,
        NoOpPipelineReporter::new(),
        MemoryReportSink::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PipelineConfig, Task};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_default_engine() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("results.txt");

        let engine = create_default_engine(DefaultPipelineConfig::default(), &output_path);

        assert!(engine.config().worker_count() > 0);
        assert_eq!(engine.config().queue_capacity(), 20);
        assert_eq!(
            engine.aggregator().destination(),
            output_path.to_string_lossy()
        );
    }

    #[tokio::test]
    async fn test_create_quiet_engine_runs_pipeline() {
        let mut engine = create_quiet_engine(
            DefaultPipelineConfig::for_testing()
                .with_worker_count(2)
                .with_queue_capacity(10),
        );

        engine.start().await.unwrap();
        let tasks: Vec<Task> = (1..=4).map(|id| Task::new(id, format!("data_{id}"))).collect();
        engine.add_tasks(tasks).await;
        engine.wait_for_completion().await;

        let summary = engine.shutdown().await.unwrap().unwrap();
        assert_eq!(summary.processed_count, 4);
        assert_eq!(engine.sink().last_snapshot().unwrap().total_results, 4);
    }
}
