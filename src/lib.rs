// 容量制限付きタスク処理パイプライン
//
// プロデューサーがタスクを投入し、固定サイズのワーカープールが
// 並行に処理し、スレッドセーフな集計器が結果を蓄積する。
// 構成要素はトレイトで抽象化され、コンストラクタ注入で差し替え可能。

pub mod aggregator;
pub mod cli;
pub mod core;
pub mod engine;
pub mod queue;
pub mod services;
pub mod worker;

// 公開API - 主要な型を再エクスポート
pub use aggregator::ResultAggregator;
pub use core::{
    PayloadProcessor, PipelineConfig, PipelineError, PipelineReporter, PipelineResult,
    PipelineStatus, PipelineSummary, ProcessedResult, ReportSink, ReportSnapshot, Task,
    TaskSubmission, EMPTY_PAYLOAD_MARKER,
};
pub use engine::{create_default_engine, create_quiet_engine, PipelineEngine};
pub use queue::{BoundedTaskQueue, QueueStatus, DEFAULT_ENQUEUE_TIMEOUT};
pub use services::{
    ConsolePipelineReporter, DefaultPipelineConfig, FileReportSink, JsonReportSink,
    MemoryReportSink, NoOpPipelineReporter, SimulatedWorkProcessor,
};
pub use worker::Worker;

/// デモ用サンプルタスクを作成
///
/// countが定義済みサンプルデータ数を超える場合は切り詰められる
pub fn create_sample_tasks(count: usize) -> Vec<Task> {
    const SAMPLE_DATA: [&str; 15] = [
        "user_login_data",
        "payment_transaction",
        "inventory_update",
        "customer_feedback",
        "order_processing",
        "analytics_report",
        "system_backup",
        "email_notification",
        "database_cleanup",
        "performance_metrics",
        "security_audit",
        "backup_verification",
        "cache_refresh",
        "log_rotation",
        "health_check",
    ];

    SAMPLE_DATA
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, data)| Task::new(i as u64 + 1, *data))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sample_tasks() {
        let tasks = create_sample_tasks(15);

        assert_eq!(tasks.len(), 15);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].payload, "user_login_data");
        assert_eq!(tasks[14].id, 15);
        assert_eq!(tasks[14].payload, "health_check");
    }

    #[test]
    fn test_create_sample_tasks_truncates_at_available_data() {
        assert_eq!(create_sample_tasks(100).len(), 15);
        assert_eq!(create_sample_tasks(3).len(), 3);
        assert!(create_sample_tasks(0).is_empty());
    }
}
