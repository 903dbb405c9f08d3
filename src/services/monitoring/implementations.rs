// 進捗監視の具象実装

use crate::core::{PipelineReporter, PipelineSummary, ProcessedResult};
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsolePipelineReporter {
    quiet: bool,
}

impl ConsolePipelineReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl PipelineReporter for ConsolePipelineReporter {
    async fn report_started(&self, worker_count: usize, queue_capacity: usize) {
        if !self.quiet {
            println!("🚀 Starting task pipeline...");
            println!("   Worker threads: {worker_count}");
            println!("   Queue capacity: {queue_capacity}");
        }
    }

    async fn report_task_enqueued(&self, task_id: u64, accepted: bool) {
        if !self.quiet {
            if accepted {
                println!("📥 Task {task_id} added to queue");
            } else {
                eprintln!("⚠️  Failed to add task {task_id} to queue");
            }
        }
    }

    async fn report_result_stored(&self, result: &ProcessedResult) {
        if !self.quiet {
            println!("✅ Result added: {result}");
        }
    }

    async fn report_worker_stopped(&self, worker_name: &str) {
        if !self.quiet {
            println!("🛑 Worker '{worker_name}' completed");
        }
    }

    async fn report_error(&self, context: &str, error: &str) {
        if !self.quiet {
            eprintln!("❌ [{context}] {error}");
        }
    }

    async fn report_summary(&self, summary: &PipelineSummary) {
        if !self.quiet {
            println!("{summary}");
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpPipelineReporter;

impl NoOpPipelineReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineReporter for NoOpPipelineReporter {
    async fn report_started(&self, _worker_count: usize, _queue_capacity: usize) {
        // 何もしない
    }

    async fn report_task_enqueued(&self, _task_id: u64, _accepted: bool) {
        // 何もしない
    }

    async fn report_result_stored(&self, _result: &ProcessedResult) {
        // 何もしない
    }

    async fn report_worker_stopped(&self, _worker_name: &str) {
        // 何もしない
    }

    async fn report_error(&self, _context: &str, _error: &str) {
        // 何もしない
    }

    async fn report_summary(&self, _summary: &PipelineSummary) {
        // 何もしない
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_summary() -> PipelineSummary {
        PipelineSummary {
            processed_count: 10,
            total_processing_time: Duration::from_millis(1000),
            average_processing_time: Duration::from_millis(100),
            destination: "results.txt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_console_reporter_quiet_mode() {
        // 出力キャプチャは複雑なため、基本的な呼び出しテストのみ
        let reporter = ConsolePipelineReporter::quiet();

        reporter.report_started(4, 20).await;
        reporter.report_task_enqueued(1, true).await;
        reporter.report_task_enqueued(2, false).await;
        reporter.report_worker_stopped("Worker-1").await;
        reporter.report_error("Worker-1", "test error").await;
        reporter.report_summary(&sample_summary()).await;

        // 基本的な呼び出しが成功することを確認
    }

    #[tokio::test]
    async fn test_console_reporter_creation() {
        let reporter1 = ConsolePipelineReporter::new();
        let reporter2 = ConsolePipelineReporter::quiet();

        assert!(!reporter1.quiet);
        assert!(reporter2.quiet);
    }

    #[tokio::test]
    async fn test_noop_reporter() {
        let reporter = NoOpPipelineReporter::new();

        // 全てのメソッドを呼び出してもパニックしない
        reporter.report_started(4, 20).await;
        reporter.report_task_enqueued(1, true).await;
        reporter.report_worker_stopped("Worker-1").await;
        reporter.report_error("Worker-1", "test error").await;
        reporter.report_summary(&sample_summary()).await;
    }
}
