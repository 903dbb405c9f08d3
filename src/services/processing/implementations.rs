// ペイロード変換の具象実装

use crate::core::{PayloadProcessor, EMPTY_PAYLOAD_MARKER};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// 模擬的な計算遅延付きのペイロード変換実装
///
/// 変換規則：空入力は識別マーカー、非空入力は大文字化 + 処理済み
/// サフィックス + ナノ秒タイムスタンプ。遅延は実際の計算の代役であり、
/// 基本遅延 + 時刻由来のジッターで構成される。
/// テストではinstant()でゼロ遅延にして決定的に実行できる。
#[derive(Debug, Clone)]
pub struct SimulatedWorkProcessor {
    base_delay: Duration,
    jitter: Duration,
}

impl SimulatedWorkProcessor {
    /// 基本遅延とジッター上限を指定して作成
    pub fn new(base_delay: Duration, jitter: Duration) -> Self {
        Self { base_delay, jitter }
    }

    /// 遅延なしの変換実装（テスト用）
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// 今回の処理に適用する遅延を計算
    fn work_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base_delay;
        }
        // 時刻のサブ秒ナノ値からジッターを導出（乱数生成器は不要）
        let entropy = u64::from(Utc::now().timestamp_subsec_nanos());
        self.base_delay + Duration::from_millis(entropy % jitter_ms)
    }
}

impl Default for SimulatedWorkProcessor {
    fn default() -> Self {
        // 元の処理時間帯（100〜300ms相当）に合わせたデフォルト
        Self::new(Duration::from_millis(100), Duration::from_millis(200))
    }
}

#[async_trait]
impl PayloadProcessor for SimulatedWorkProcessor {
    async fn process(&self, payload: &str) -> Result<String> {
        let delay = self.work_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if payload.is_empty() {
            return Ok(EMPTY_PAYLOAD_MARKER.to_string());
        }

        Ok(format!(
            "{}_PROCESSED_{}",
            payload.to_uppercase(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transform_uppercases_and_suffixes() {
        let processor = SimulatedWorkProcessor::instant();

        let transformed = processor.process("user_login_data").await.unwrap();

        assert!(transformed.starts_with("USER_LOGIN_DATA_PROCESSED_"));
        // サフィックス部分は数値タイムスタンプ
        let suffix = transformed
            .strip_prefix("USER_LOGIN_DATA_PROCESSED_")
            .unwrap();
        assert!(suffix.parse::<i64>().is_ok());
    }

    #[tokio::test]
    async fn test_empty_payload_yields_marker() {
        let processor = SimulatedWorkProcessor::instant();

        let transformed = processor.process("").await.unwrap();

        // 空文字列でもエラーでもなく識別マーカー
        assert_eq!(transformed, EMPTY_PAYLOAD_MARKER);
    }

    #[tokio::test]
    async fn test_non_empty_input_yields_non_empty_output() {
        let processor = SimulatedWorkProcessor::instant();

        for payload in ["a", "payment_transaction", "日本語データ"] {
            let transformed = processor.process(payload).await.unwrap();
            assert!(!transformed.is_empty());
        }
    }

    #[tokio::test]
    async fn test_simulated_delay_is_applied() {
        let processor =
            SimulatedWorkProcessor::new(Duration::from_millis(50), Duration::ZERO);

        let started = std::time::Instant::now();
        processor.process("inventory_update").await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_work_delay_respects_jitter_bound() {
        let processor =
            SimulatedWorkProcessor::new(Duration::from_millis(10), Duration::from_millis(20));

        for _ in 0..100 {
            let delay = processor.work_delay();
            assert!(delay >= Duration::from_millis(10));
            assert!(delay < Duration::from_millis(30));
        }
    }
}
