// PipelineEngine - キュー・ワーカープール・集計器を合成するオーケストレーター
// 起動、タスク投入、完了待ち、段階的シャットダウンを駆動する
// 全ての依存関係はコンストラクタで注入される

use crate::aggregator::ResultAggregator;
use crate::core::{
    PayloadProcessor, PipelineConfig, PipelineError, PipelineReporter, PipelineResult,
    PipelineStatus, PipelineSummary, ReportSink, Task, TaskSubmission,
};
use crate::queue::BoundedTaskQueue;
use crate::worker::Worker;
use std::sync::Arc;

/// タスク処理パイプラインのオーケストレーター
///
/// ワーカープールとキューを排他的に所有し、ワーカーは共有構造への
/// 非所有参照のみを持つ。シャットダウンは上限時間付きの
/// 完了バリアで行い、無期限ブロックを避ける。
pub struct PipelineEngine<P, C, R, S> {
    queue: Arc<BoundedTaskQueue>,
    aggregator: Arc<ResultAggregator>,
    workers: Vec<Worker<P, R>>,
    processor: Arc<P>,
    config: Arc<C>,
    reporter: Arc<R>,
    sink: Arc<S>,
    started: bool,
    shut_down: bool,
}

impl<P, C, R, S> PipelineEngine<P, C, R, S>
where
    P: PayloadProcessor + 'static,
    C: PipelineConfig,
    R: PipelineReporter + 'static,
    S: ReportSink,
{
    /// 新しいエンジンを作成（Constructor Injection）
    ///
    /// キューは設定の容量・タイムアウトで、集計器は出力先の表示名で構築される
    pub fn new(processor: P, config: C, reporter: R, sink: S) -> Self {
        let queue = Arc::new(BoundedTaskQueue::with_enqueue_timeout(
            config.queue_capacity(),
            config.enqueue_timeout(),
        ));
        let aggregator = Arc::new(ResultAggregator::new(sink.destination()));

        Self {
            queue,
            aggregator,
            workers: Vec::new(),
            processor: Arc::new(processor),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            sink: Arc::new(sink),
            started: false,
            shut_down: false,
        }
    }

    /// ワーカープールを起動
    ///
    /// 設定された数のワーカーを生成し、共有キュー・集計器へ接続する。
    /// 二重起動は無視される。
    pub async fn start(&mut self) -> PipelineResult<()> {
        if self.started {
            return Ok(());
        }

        if self.config.worker_count() == 0 {
            return Err(PipelineError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }
        if self.config.queue_capacity() == 0 {
            return Err(PipelineError::configuration(
                "キュー容量は1以上である必要があります",
            ));
        }

        self.reporter
            .report_started(self.config.worker_count(), self.config.queue_capacity())
            .await;

        for i in 1..=self.config.worker_count() {
            let mut worker = Worker::new(
                format!("Worker-{i}"),
                Arc::clone(&self.queue),
                Arc::clone(&self.aggregator),
                Arc::clone(&self.processor),
                Arc::clone(&self.reporter),
            );
            worker.start();
            self.workers.push(worker);
        }

        self.started = true;
        Ok(())
    }

    /// タスクのバッチを順次投入
    ///
    /// タスクごとの成否を戻り値で報告する（投入失敗は非致命的で、
    /// 再投入は呼び出し元の責任）。投入間には設定された遅延を挟み、
    /// 現実的な到着を模擬する。
    pub async fn add_tasks(&self, tasks: Vec<Task>) -> Vec<TaskSubmission> {
        let mut submissions = Vec::with_capacity(tasks.len());
        let pacing = self.config.submit_interval();

        for task in tasks {
            let task_id = task.id;
            let accepted = self.queue.enqueue(task).await;
            self.reporter.report_task_enqueued(task_id, accepted).await;
            submissions.push(TaskSubmission { task_id, accepted });

            if !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
        }

        submissions
    }

    /// 全タスクの処理完了を待機（ベストエフォート）
    ///
    /// キューが空になるまでのチェック＆スリープのポーリングループ。
    /// 確認とスリープの間に新規タスクが到着し得るため厳密なバリアではない
    /// （契約として文書化された本来の制約であり、意図的に温存している）。
    pub async fn wait_for_completion(&self) {
        while !self.queue.is_empty().await {
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    /// システム状態のスナップショットを取得
    pub async fn status(&self) -> PipelineStatus {
        let queue_status = self.queue.status().await;
        PipelineStatus {
            queue_size: queue_status.size,
            queue_empty: queue_status.is_empty,
            queue_shutdown: queue_status.is_shutdown,
            result_count: self.aggregator.count().await,
        }
    }

    /// 段階的シャットダウン（冪等）
    ///
    /// 手順：キューを先に閉鎖（ワーカーは排出後に停止を観測）→
    /// 全ワーカーへ停止指示 → 上限時間付きの完了待ち（超過時は報告して
    /// 続行し、残ワーカーは強制終了せず放置）→ スナップショットの
    /// エクスポートとサマリー報告。エクスポート失敗はシャットダウンを
    /// 中断せずに呼び出し元へ返される。
    /// 二度目以降の呼び出しは何もせずNoneを返す（重複エクスポートなし）。
    pub async fn shutdown(&mut self) -> PipelineResult<Option<PipelineSummary>> {
        if self.shut_down {
            return Ok(None);
        }
        self.shut_down = true;

        self.queue.shutdown().await;
        for worker in &self.workers {
            worker.stop();
        }

        let reporter = Arc::clone(&self.reporter);
        let timeout_limit = self.config.shutdown_timeout();

        let workers = &mut self.workers;
        let join_all = async move {
            for worker in workers.iter_mut() {
                worker.wait().await?;
            }
            Ok::<(), PipelineError>(())
        };

        let join_result = tokio::time::timeout(timeout_limit, join_all).await;
        match join_result {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                reporter.report_error("shutdown", &error.to_string()).await;
            }
            Err(_) => {
                let error = PipelineError::shutdown_timeout(timeout_limit.as_millis() as u64);
                reporter.report_error("shutdown", &error.to_string()).await;
            }
        }

        let export_result = self.aggregator.export_snapshot(self.sink.as_ref()).await;
        if let Err(error) = &export_result {
            reporter.report_error("export", &error.to_string()).await;
        }

        let summary = self.aggregator.summary().await;
        if let Some(summary) = &summary {
            reporter.report_summary(summary).await;
        }

        export_result.map(|()| summary)
    }

    /// 設定への参照を取得（読み取り専用アクセス）
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 出力先への参照を取得
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// キューへの参照を取得
    pub fn queue(&self) -> &BoundedTaskQueue {
        &self.queue
    }

    /// 集計器への参照を取得
    pub fn aggregator(&self) -> &ResultAggregator {
        &self.aggregator
    }
}
