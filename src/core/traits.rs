// パイプラインの抽象化インターフェース定義
// 全てのトレイトはコンストラクタ注入で差し替え可能

use super::types::{PipelineSummary, ProcessedResult, ReportSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// パイプライン設定を抽象化するトレイト
#[automock]
pub trait PipelineConfig: Send + Sync {
    /// ワーカープールのサイズを取得
    fn worker_count(&self) -> usize;

    /// キューの最大容量を取得
    fn queue_capacity(&self) -> usize;

    /// 満杯キューへの投入待ちタイムアウトを取得
    fn enqueue_timeout(&self) -> Duration;

    /// タスク投入間の遅延を取得（到着の模擬）
    fn submit_interval(&self) -> Duration;

    /// 完了待ちポーリングの間隔を取得
    fn poll_interval(&self) -> Duration;

    /// 全ワーカー完了待ちの上限時間を取得
    fn shutdown_timeout(&self) -> Duration;
}

impl PipelineConfig for Box<dyn PipelineConfig> {
    fn worker_count(&self) -> usize {
        self.as_ref().worker_count()
    }

    fn queue_capacity(&self) -> usize {
        self.as_ref().queue_capacity()
    }

    fn enqueue_timeout(&self) -> Duration {
        self.as_ref().enqueue_timeout()
    }

    fn submit_interval(&self) -> Duration {
        self.as_ref().submit_interval()
    }

    fn poll_interval(&self) -> Duration {
        self.as_ref().poll_interval()
    }

    fn shutdown_timeout(&self) -> Duration {
        self.as_ref().shutdown_timeout()
    }
}

/// ペイロード変換の抽象化トレイト
///
/// ワーカーのタイミング・集計ロジックを特定の変換から独立させるための
/// 差し替え可能な処理関数。契約：空入力は識別マーカーを返し、
/// 非空入力は非空の変換結果を返す。
#[automock]
#[async_trait]
pub trait PayloadProcessor: Send + Sync {
    /// ペイロードを変換
    async fn process(&self, payload: &str) -> Result<String>;
}

#[async_trait]
impl PayloadProcessor for Box<dyn PayloadProcessor> {
    async fn process(&self, payload: &str) -> Result<String> {
        self.as_ref().process(payload).await
    }
}

/// 進捗報告の抽象化トレイト
///
/// 報告は正確性に必須ではない観測イベント。実装はコンソール出力や
/// 無出力（テスト用）を自由に選択できる。
#[automock]
#[async_trait]
pub trait PipelineReporter: Send + Sync {
    /// システム起動時の報告
    async fn report_started(&self, worker_count: usize, queue_capacity: usize);

    /// タスク投入結果の報告
    async fn report_task_enqueued(&self, task_id: u64, accepted: bool);

    /// 結果保存時の報告
    async fn report_result_stored(&self, result: &ProcessedResult);

    /// ワーカー停止時の報告
    async fn report_worker_stopped(&self, worker_name: &str);

    /// エラー発生時の報告
    async fn report_error(&self, context: &str, error: &str);

    /// 処理サマリーの報告
    async fn report_summary(&self, summary: &PipelineSummary);
}

#[async_trait]
impl PipelineReporter for Box<dyn PipelineReporter> {
    async fn report_started(&self, worker_count: usize, queue_capacity: usize) {
        self.as_ref()
            .report_started(worker_count, queue_capacity)
            .await
    }

    async fn report_task_enqueued(&self, task_id: u64, accepted: bool) {
        self.as_ref().report_task_enqueued(task_id, accepted).await
    }

    async fn report_result_stored(&self, result: &ProcessedResult) {
        self.as_ref().report_result_stored(result).await
    }

    async fn report_worker_stopped(&self, worker_name: &str) {
        self.as_ref().report_worker_stopped(worker_name).await
    }

    async fn report_error(&self, context: &str, error: &str) {
        self.as_ref().report_error(context, error).await
    }

    async fn report_summary(&self, summary: &PipelineSummary) {
        self.as_ref().report_summary(summary).await
    }
}

/// レポート出力先の抽象化トレイト
///
/// エクスポートはスナップショット全体を一度に受け取る。
/// 出力エラーは呼び出し元に返され、シャットダウン継続を妨げない。
#[automock]
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// スナップショットを出力先へ書き込み
    async fn write_snapshot(&self, snapshot: &ReportSnapshot) -> Result<()>;

    /// 出力先の表示名を取得
    fn destination(&self) -> String;
}

#[async_trait]
impl ReportSink for Box<dyn ReportSink> {
    async fn write_snapshot(&self, snapshot: &ReportSnapshot) -> Result<()> {
        self.as_ref().write_snapshot(snapshot).await
    }

    fn destination(&self) -> String {
        self.as_ref().destination()
    }
}
