// ワーカー - タスク取得・処理・結果投入を繰り返す実行単位
// 自身のライフサイクル（Idle -> Running -> Stopping -> Completed）を所有する

use crate::aggregator::ResultAggregator;
use crate::core::{
    PayloadProcessor, PipelineError, PipelineReporter, PipelineResult, ProcessedResult, Task,
};
use crate::queue::BoundedTaskQueue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// プールの一員として動作するワーカー
///
/// キューと集計器への非所有参照（Arc）のみを保持し、
/// ライフタイムはオーケストレーターが管理する。
pub struct Worker<P, R> {
    name: String,
    queue: Arc<BoundedTaskQueue>,
    aggregator: Arc<ResultAggregator>,
    processor: Arc<P>,
    reporter: Arc<R>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<P, R> Worker<P, R>
where
    P: PayloadProcessor + 'static,
    R: PipelineReporter + 'static,
{
    /// アイドル状態のワーカーを作成
    pub fn new(
        name: impl Into<String>,
        queue: Arc<BoundedTaskQueue>,
        aggregator: Arc<ResultAggregator>,
        processor: Arc<P>,
        reporter: Arc<R>,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            aggregator,
            processor,
            reporter,
            running: Arc::new(AtomicBool::new(true)),
            handle: None,
        }
    }

    /// 処理ループを起動
    ///
    /// 二重起動は無視される（最初のループのみ有効）
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let name = self.name.clone();
        let queue = Arc::clone(&self.queue);
        let aggregator = Arc::clone(&self.aggregator);
        let processor = Arc::clone(&self.processor);
        let reporter = Arc::clone(&self.reporter);
        let running = Arc::clone(&self.running);

        self.handle = Some(tokio::spawn(async move {
            run_worker_loop(name, queue, aggregator, processor, reporter, running).await;
        }));
    }

    /// 停止を指示（協調的 - ループ反復の合間にのみ確認される）
    ///
    /// 取得待ちでブロック中のワーカーはこのフラグだけでは解除されない。
    /// キューのシャットダウンによってのみ解除される。
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// ワーカーが稼働中かどうか
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// ワーカー名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// ループ完了まで待機
    ///
    /// 完了シグナル（JoinHandle）は一度だけ発火する。
    /// 未起動または既に待機済みの場合は即座に成功を返す。
    pub async fn wait(&mut self) -> PipelineResult<()> {
        if let Some(handle) = self.handle.take() {
            handle.await.map_err(PipelineError::from)?;
        }
        Ok(())
    }
}

/// ワーカーのメインループ
///
/// 取得（ブロック）→ 番兵値なら終了 → 処理 → 結果投入 → 繰り返し。
/// 処理エラーは報告してスキップし、プール全体には波及させない。
/// 取得済みタスクは必ず完了（成功または報告済み失敗）まで実行される。
async fn run_worker_loop<P, R>(
    name: String,
    queue: Arc<BoundedTaskQueue>,
    aggregator: Arc<ResultAggregator>,
    processor: Arc<P>,
    reporter: Arc<R>,
    running: Arc<AtomicBool>,
) where
    P: PayloadProcessor,
    R: PipelineReporter,
{
    while running.load(Ordering::SeqCst) {
        let task = match queue.dequeue().await {
            Some(task) => task,
            None => break, // シャットダウン済みかつ空
        };

        let result = match process_task(&name, processor.as_ref(), &task).await {
            Ok(result) => result,
            Err(error) => {
                reporter.report_error(&name, &error.to_string()).await;
                continue;
            }
        };

        match aggregator.add_result(result.clone()).await {
            Ok(()) => reporter.report_result_stored(&result).await,
            Err(error) => reporter.report_error(&name, &error.to_string()).await,
        }
    }

    reporter.report_worker_stopped(&name).await;
    running.store(false, Ordering::SeqCst);
}

/// 単一タスクの処理
///
/// 変換ステップの実測壁時計時間をProcessedResultに記録する
async fn process_task<P>(
    worker_name: &str,
    processor: &P,
    task: &Task,
) -> PipelineResult<ProcessedResult>
where
    P: PayloadProcessor,
{
    let started = Instant::now();

    let transformed = processor
        .process(&task.payload)
        .await
        .map_err(|e| PipelineError::task_processing(task.id, e))?;

    let processing_time = started.elapsed();

    Ok(ProcessedResult::new(
        task.id,
        task.payload.clone(),
        transformed,
        worker_name,
        processing_time,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockPayloadProcessor;
    use crate::core::EMPTY_PAYLOAD_MARKER;
    use crate::services::monitoring::NoOpPipelineReporter;
    use crate::services::processing::SimulatedWorkProcessor;
    use tokio::time::{timeout, Duration};

    fn test_setup() -> (Arc<BoundedTaskQueue>, Arc<ResultAggregator>) {
        (
            Arc::new(BoundedTaskQueue::new(20)),
            Arc::new(ResultAggregator::new("test_results.txt")),
        )
    }

    #[tokio::test]
    async fn test_worker_processes_tasks_until_queue_drained() {
        let (queue, aggregator) = test_setup();

        for id in 1..=5 {
            assert!(queue.enqueue(Task::new(id, format!("data_{id}"))).await);
        }
        queue.shutdown().await;

        let mut worker = Worker::new(
            "Worker-1",
            Arc::clone(&queue),
            Arc::clone(&aggregator),
            Arc::new(SimulatedWorkProcessor::instant()),
            Arc::new(NoOpPipelineReporter::new()),
        );
        worker.start();

        timeout(Duration::from_secs(5), worker.wait())
            .await
            .expect("ワーカーは排出後に完了するはず")
            .unwrap();

        assert_eq!(aggregator.count().await, 5);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_worker_records_processing_metadata() {
        let (queue, aggregator) = test_setup();

        assert!(queue.enqueue(Task::new(1, "user_login_data")).await);
        queue.shutdown().await;

        let mut worker = Worker::new(
            "Worker-7",
            Arc::clone(&queue),
            Arc::clone(&aggregator),
            Arc::new(SimulatedWorkProcessor::instant()),
            Arc::new(NoOpPipelineReporter::new()),
        );
        worker.start();
        worker.wait().await.unwrap();

        let results = aggregator.all_results().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].task_id, 1);
        assert_eq!(results[0].original_payload, "user_login_data");
        assert!(results[0].transformed_payload.starts_with("USER_LOGIN_DATA"));
        assert_eq!(results[0].worker_name, "Worker-7");
    }

    #[tokio::test]
    async fn test_worker_empty_payload_yields_marker() {
        let (queue, aggregator) = test_setup();

        assert!(queue.enqueue(Task::new(1, "")).await);
        queue.shutdown().await;

        let mut worker = Worker::new(
            "Worker-1",
            Arc::clone(&queue),
            Arc::clone(&aggregator),
            Arc::new(SimulatedWorkProcessor::instant()),
            Arc::new(NoOpPipelineReporter::new()),
        );
        worker.start();
        worker.wait().await.unwrap();

        let results = aggregator.all_results().await;
        assert_eq!(results.len(), 1);
        // 空文字列でもエラーでもなく、識別マーカーになる
        assert_eq!(results[0].transformed_payload, EMPTY_PAYLOAD_MARKER);
    }

    #[tokio::test]
    async fn test_worker_skips_failed_task_and_continues() {
        let (queue, aggregator) = test_setup();

        assert!(queue.enqueue(Task::new(1, "poison")).await);
        assert!(queue.enqueue(Task::new(2, "healthy")).await);
        queue.shutdown().await;

        let mut processor = MockPayloadProcessor::new();
        processor.expect_process().returning(|payload| {
            if payload == "poison" {
                Err(anyhow::anyhow!("変換に失敗しました"))
            } else {
                Ok(payload.to_uppercase())
            }
        });

        let mut worker = Worker::new(
            "Worker-1",
            Arc::clone(&queue),
            Arc::clone(&aggregator),
            Arc::new(processor),
            Arc::new(NoOpPipelineReporter::new()),
        );
        worker.start();
        worker.wait().await.unwrap();

        // 失敗タスクはスキップされ、後続タスクは処理される
        let results = aggregator.all_results().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].task_id, 2);
        assert_eq!(results[0].transformed_payload, "HEALTHY");
    }

    #[tokio::test]
    async fn test_worker_stop_flag_checked_between_iterations() {
        let (queue, aggregator) = test_setup();

        let mut worker = Worker::new(
            "Worker-1",
            Arc::clone(&queue),
            Arc::clone(&aggregator),
            Arc::new(SimulatedWorkProcessor::instant()),
            Arc::new(NoOpPipelineReporter::new()),
        );
        worker.start();
        assert!(worker.is_running());

        // 停止フラグ単独では取得待ちは解除されない。キューのシャットダウンが必要。
        worker.stop();
        queue.shutdown().await;

        timeout(Duration::from_secs(1), worker.wait())
            .await
            .expect("シャットダウン後にワーカーは完了するはず")
            .unwrap();
        assert!(!worker.is_running());
    }

    #[tokio::test]
    async fn test_worker_wait_is_single_shot() {
        let (queue, aggregator) = test_setup();
        queue.shutdown().await;

        let mut worker = Worker::new(
            "Worker-1",
            queue,
            aggregator,
            Arc::new(SimulatedWorkProcessor::instant()),
            Arc::new(NoOpPipelineReporter::new()),
        );
        worker.start();

        worker.wait().await.unwrap();
        // 二度目の待機は即座に成功する
        worker.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_multiple_workers_share_queue_and_aggregator() {
        let (queue, aggregator) = test_setup();

        for id in 1..=12 {
            assert!(queue.enqueue(Task::new(id, format!("data_{id}"))).await);
        }
        queue.shutdown().await;

        let mut workers = Vec::new();
        for i in 1..=4 {
            let mut worker = Worker::new(
                format!("Worker-{i}"),
                Arc::clone(&queue),
                Arc::clone(&aggregator),
                Arc::new(SimulatedWorkProcessor::instant()),
                Arc::new(NoOpPipelineReporter::new()),
            );
            worker.start();
            workers.push(worker);
        }

        for worker in &mut workers {
            timeout(Duration::from_secs(5), worker.wait())
                .await
                .expect("全ワーカーが完了するはず")
                .unwrap();
        }

        // 全タスクが正確に一度ずつ処理されている
        assert_eq!(aggregator.count().await, 12);
        let mut task_ids: Vec<u64> = aggregator
            .all_results()
            .await
            .iter()
            .map(|r| r.task_id)
            .collect();
        task_ids.sort_unstable();
        assert_eq!(task_ids, (1..=12).collect::<Vec<u64>>());
    }
}
