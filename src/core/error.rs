// Custom error types for the task pipeline
// パイプライン専用のカスタムエラー型定義

use thiserror::Error;

/// パイプライン固有のエラー型
///
/// どのエラーもプロセス致命的ではない。局所的に回復（スキップ継続）するか、
/// オーケストレーターへ戻り値として報告される。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("処理エラー: タスク{task_id} - {source}")]
    TaskProcessing {
        task_id: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("集計エラー: {message}")]
    Aggregation { message: String },

    #[error("レポート出力エラー: {source}")]
    Export {
        #[source]
        source: anyhow::Error,
    },

    #[error("シャットダウンタイムアウト: {timeout_ms}ms以内にワーカーが完了しませんでした")]
    ShutdownTimeout { timeout_ms: u64 },

    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("タスク結合エラー: {source}")]
    Join {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl PipelineError {
    /// 処理エラーの作成
    pub fn task_processing(task_id: u64, source: anyhow::Error) -> Self {
        Self::TaskProcessing { task_id, source }
    }

    /// 集計エラーの作成
    pub fn aggregation(message: impl Into<String>) -> Self {
        Self::Aggregation {
            message: message.into(),
        }
    }

    /// レポート出力エラーの作成
    pub fn export(source: anyhow::Error) -> Self {
        Self::Export { source }
    }

    /// シャットダウンタイムアウトエラーの作成
    pub fn shutdown_timeout(timeout_ms: u64) -> Self {
        Self::ShutdownTimeout { timeout_ms }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// エラーが回復可能かどうかを判定
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::TaskProcessing { .. } => true,
            Self::Aggregation { .. } => true,
            Self::Export { .. } => true,
            Self::ShutdownTimeout { .. } => true,
            Self::Configuration { .. } => false,
            Self::Join { .. } => true,
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(error: tokio::task::JoinError) -> Self {
        PipelineError::Join { source: error }
    }
}

/// パイプラインの結果型
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
