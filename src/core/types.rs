// パイプラインに関連するデータ型定義

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// 空ペイロード処理時の識別マーカー
pub const EMPTY_PAYLOAD_MARKER: &str = "EMPTY_DATA";

/// 処理対象のタスク
///
/// 生成後は不変。キュー→ワーカーと所有権が移動し、
/// 結果生成後にドロップされる。
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Task {
    pub id: u64,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// 新しいタスクを作成（作成時刻は現在時刻）
    pub fn new(id: u64, payload: impl Into<String>) -> Self {
        Self {
            id,
            payload: payload.into(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task{{id={}, payload='{}', created_at={}}}",
            self.id,
            self.payload,
            self.created_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// 処理済みタスクの結果
///
/// 成功したタスクごとに一度だけ生成される不変値。
/// 投入後はResultAggregatorが所有する。
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessedResult {
    pub task_id: u64,
    pub original_payload: String,
    pub transformed_payload: String,
    pub processing_time: Duration,
    pub worker_name: String,
    pub completed_at: DateTime<Utc>,
}

impl ProcessedResult {
    /// 新しい処理結果を作成（完了時刻は現在時刻）
    pub fn new(
        task_id: u64,
        original_payload: impl Into<String>,
        transformed_payload: impl Into<String>,
        worker_name: impl Into<String>,
        processing_time: Duration,
    ) -> Self {
        Self {
            task_id,
            original_payload: original_payload.into(),
            transformed_payload: transformed_payload.into(),
            processing_time,
            worker_name: worker_name.into(),
            completed_at: Utc::now(),
        }
    }
}

impl fmt::Display for ProcessedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessedResult{{task_id={}, original='{}', transformed='{}', processing_time={:?}, worker='{}', completed_at={}}}",
            self.task_id,
            self.original_payload,
            self.transformed_payload,
            self.processing_time,
            self.worker_name,
            self.completed_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// タスク投入の個別結果
///
/// プロデューサーへ成否を返すための値（例外ではなく戻り値で報告）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSubmission {
    pub task_id: u64,
    pub accepted: bool,
}

/// 処理全体のサマリー
///
/// 結果が1件以上ある場合のみ構築される（0件はOption::Noneで表現）
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub processed_count: usize,
    pub total_processing_time: Duration,
    pub average_processing_time: Duration,
    pub destination: String,
}

impl fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Processing Summary ===")?;
        writeln!(f, "Total Tasks Processed: {}", self.processed_count)?;
        writeln!(f, "Total Processing Time: {:?}", self.total_processing_time)?;
        writeln!(
            f,
            "Average Processing Time: {:?}",
            self.average_processing_time
        )?;
        writeln!(f, "Results saved to: {}", self.destination)?;
        write!(f, "==========================")
    }
}

/// システム状態のスナップショット
///
/// 各フィールドはロック粒度でのみ整合する（全体のアトミック性は保証しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStatus {
    pub queue_size: usize,
    pub queue_empty: bool,
    pub queue_shutdown: bool,
    pub result_count: usize,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== System Status ===")?;
        writeln!(f, "Queue size: {}", self.queue_size)?;
        writeln!(f, "Queue empty: {}", self.queue_empty)?;
        writeln!(f, "Queue shutdown: {}", self.queue_shutdown)?;
        writeln!(f, "Results count: {}", self.result_count)?;
        write!(f, "=====================")
    }
}

/// レポート出力用の一貫したスナップショット
///
/// エクスポート時点の読み取りロック下で構築される独立コピー
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReportSnapshot {
    pub generated_at: DateTime<Utc>,
    pub total_results: usize,
    pub results: Vec<ProcessedResult>,
}
