// 結果集計器 - 処理済み結果の並行安全な蓄積とサマリー計算
// 追記専用のコレクションを単一のRwLockで保護する

use crate::core::{
    PipelineError, PipelineResult, PipelineSummary, ProcessedResult, ReportSink, ReportSnapshot,
};
use chrono::Utc;
use tokio::sync::RwLock;

struct AggregatorState {
    results: Vec<ProcessedResult>,
    count: usize,
}

/// 処理済み結果の集計器
///
/// 不変条件：countは常に保存済み結果数と一致する。
/// 追記は相互に全順序（ロスト更新なし）だが、ワーカー間の
/// 到着順序は完了順であり投入順とは一致しない。
pub struct ResultAggregator {
    state: RwLock<AggregatorState>,
    destination: String,
}

impl ResultAggregator {
    /// エクスポート先の表示名を指定して集計器を作成
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(AggregatorState {
                results: Vec::new(),
                count: 0,
            }),
            destination: destination.into(),
        }
    }

    /// 結果を追加
    ///
    /// 不正な結果（空の変換ペイロード）は既存状態を壊さずに拒否する。
    /// 空入力の正常処理はEMPTY_PAYLOAD_MARKERになるため、
    /// 空の変換ペイロードはワーカー経由では発生しない。
    pub async fn add_result(&self, result: ProcessedResult) -> PipelineResult<()> {
        if result.transformed_payload.is_empty() {
            return Err(PipelineError::aggregation(format!(
                "タスク{}の変換ペイロードが空です",
                result.task_id
            )));
        }

        let mut state = self.state.write().await;
        state.results.push(result);
        state.count += 1;
        Ok(())
    }

    /// 全結果の独立コピーを取得
    ///
    /// 返却値を変更しても内部状態には影響しない
    pub async fn all_results(&self) -> Vec<ProcessedResult> {
        self.state.read().await.results.clone()
    }

    /// 現在の結果数を取得
    pub async fn count(&self) -> usize {
        self.state.read().await.count
    }

    /// エクスポート先の表示名を取得
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// スナップショットを出力先へエクスポート
    ///
    /// 読み取りロックを保持したままスナップショットを構築することで
    /// 一貫したビューを保証する。書き込み自体はロック外で行う。
    pub async fn export_snapshot<S>(&self, sink: &S) -> PipelineResult<()>
    where
        S: ReportSink,
    {
        let snapshot = {
            let state = self.state.read().await;
            ReportSnapshot {
                generated_at: Utc::now(),
                total_results: state.count,
                results: state.results.clone(),
            }
        };

        sink.write_snapshot(&snapshot)
            .await
            .map_err(PipelineError::export)
    }

    /// サマリー統計を計算
    ///
    /// 結果が0件の場合はNone（ゼロ除算は定義済みの「結果なし」ケース）
    pub async fn summary(&self) -> Option<PipelineSummary> {
        let state = self.state.read().await;
        if state.count == 0 {
            return None;
        }

        let total_processing_time = state
            .results
            .iter()
            .map(|r| r.processing_time)
            .sum::<std::time::Duration>();
        let average_processing_time = total_processing_time / state.count as u32;

        Some(PipelineSummary {
            processed_count: state.count,
            total_processing_time,
            average_processing_time,
            destination: self.destination.clone(),
        })
    }
}
