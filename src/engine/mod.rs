// エンジン層 - パイプライン全体のオーケストレーション
// キュー・ワーカープール・集計器を組み合わせて高レベルな処理を提供

pub mod api;
pub mod orchestrator;

// 公開API - 主要エンジンクラス
pub use api::{create_default_engine, create_quiet_engine};
pub use orchestrator::PipelineEngine;
