// 共有タスクキュー - 容量制限付きの並行FIFOバッファ
// プロデューサーとワーカープールの間を仲介し、シャットダウン状態を所有する

use crate::core::Task;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};

/// 満杯キューへの投入待ちのデフォルト上限
pub const DEFAULT_ENQUEUE_TIMEOUT: Duration = Duration::from_millis(100);

/// キュー状態のスナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStatus {
    pub size: usize,
    pub is_empty: bool,
    pub is_shutdown: bool,
}

struct QueueState {
    buffer: VecDeque<Task>,
    shutdown: bool,
}

/// 投入試行の拒否理由（内部用）
enum EnqueueRejection {
    /// シャットダウン済み（タスクは破棄される）
    Shutdown,
    /// 満杯（タスクを呼び出し元へ返す）
    Full(Task),
}

/// 容量制限付きの並行タスクキュー
///
/// 不変条件：シャットダウン前はバッファ長が容量を超えない。
/// シャットダウン後は新規投入を拒否するが、バッファ済みタスクは
/// 排出し尽くすまで取得可能。
///
/// 内部バッファとシャットダウンフラグは単一のRwLockで保護され、
/// 参照が外部へ漏れることはない。
pub struct BoundedTaskQueue {
    state: RwLock<QueueState>,
    task_available: Notify,
    space_available: Notify,
    capacity: usize,
    enqueue_timeout: Duration,
}

impl BoundedTaskQueue {
    /// 指定容量のキューを作成
    pub fn new(capacity: usize) -> Self {
        Self::with_enqueue_timeout(capacity, DEFAULT_ENQUEUE_TIMEOUT)
    }

    /// 投入タイムアウトを指定してキューを作成
    pub fn with_enqueue_timeout(capacity: usize, enqueue_timeout: Duration) -> Self {
        Self {
            state: RwLock::new(QueueState {
                buffer: VecDeque::with_capacity(capacity),
                shutdown: false,
            }),
            task_available: Notify::new(),
            space_available: Notify::new(),
            capacity,
            enqueue_timeout,
        }
    }

    /// タスクをキューへ投入
    ///
    /// シャットダウン済みならfalse。空きがあれば即座に追加してtrue。
    /// 満杯の場合は設定されたタイムアウトまで空きを待ち、
    /// 間に合わなければfalse（タスクは破棄 - 再投入は呼び出し元の責任）。
    /// 無期限にブロックすることはない。
    pub async fn enqueue(&self, task: Task) -> bool {
        let deadline = tokio::time::Instant::now() + self.enqueue_timeout;
        let mut task = task;

        loop {
            let notified = self.space_available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match self.try_enqueue(task).await {
                Ok(()) => return true,
                Err(EnqueueRejection::Shutdown) => return false,
                Err(EnqueueRejection::Full(rejected)) => task = rejected,
            }

            // 空き待ち（タイムアウト・シャットダウン通知で解除される）
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return false;
            }
        }
    }

    /// タスクをキューから取得
    ///
    /// タスクが到着するか、シャットダウン済みかつ空になるまでブロックする。
    /// シャットダウン済みかつ空の場合はNone（番兵値）を返す。
    /// 取得順序は投入順序に対してFIFO。
    pub async fn dequeue(&self) -> Option<Task> {
        loop {
            let notified = self.task_available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.write().await;
                if let Some(task) = state.buffer.pop_front() {
                    self.space_available.notify_one();
                    return Some(task);
                }
                if state.shutdown {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// キューをシャットダウン（冪等）
    ///
    /// 新規投入を禁止し、待機中の全タスク（投入待ち・取得待ち）を起床させる。
    /// バッファ済みタスクは排出完了まで取得可能なまま残る。
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        if !state.shutdown {
            state.shutdown = true;
            self.task_available.notify_waiters();
            self.space_available.notify_waiters();
        }
    }

    /// 現在のキューサイズ
    pub async fn size(&self) -> usize {
        self.state.read().await.buffer.len()
    }

    /// キューが空かどうか
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.buffer.is_empty()
    }

    /// シャットダウン済みかどうか
    pub async fn is_shutdown(&self) -> bool {
        self.state.read().await.shutdown
    }

    /// 最大容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 状態スナップショットを取得（単一ロック取得で一貫）
    pub async fn status(&self) -> QueueStatus {
        let state = self.state.read().await;
        QueueStatus {
            size: state.buffer.len(),
            is_empty: state.buffer.is_empty(),
            is_shutdown: state.shutdown,
        }
    }

    /// 投入を1回だけ試行（待機なし）
    async fn try_enqueue(&self, task: Task) -> Result<(), EnqueueRejection> {
        let mut state = self.state.write().await;
        if state.shutdown {
            return Err(EnqueueRejection::Shutdown);
        }
        if state.buffer.len() >= self.capacity {
            return Err(EnqueueRejection::Full(task));
        }
        state.buffer.push_back(task);
        self.task_available.notify_one();
        Ok(())
    }
}
