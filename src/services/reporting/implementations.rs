// レポート出力先の具象実装

use crate::core::{ReportSink, ReportSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// スナップショットを固定フォーマットのテキストに整形
///
/// ヘッダー（タイトル、生成時刻、総件数、区切り線）の後に
/// 結果ごとのブロックが続く
pub fn render_text_report(snapshot: &ReportSnapshot) -> String {
    let mut report = String::new();

    let _ = writeln!(report, "Task Processing Results");
    let _ = writeln!(
        report,
        "Generated at: {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(report, "Total Results: {}", snapshot.total_results);
    let _ = writeln!(report, "{}", "=".repeat(80));
    let _ = writeln!(report);

    for result in &snapshot.results {
        let _ = writeln!(report, "{result}");
        let _ = writeln!(report, "{}", "-".repeat(40));
    }

    report
}

/// テキストファイルへの出力実装
pub struct FileReportSink {
    path: PathBuf,
}

impl FileReportSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ReportSink for FileReportSink {
    async fn write_snapshot(&self, snapshot: &ReportSnapshot) -> Result<()> {
        // 親ディレクトリが存在しない場合は作成
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| anyhow::anyhow!("ディレクトリ作成エラー: {e}"))?;
            }
        }

        let file = File::create(&self.path)
            .await
            .map_err(|e| anyhow::anyhow!("ファイル作成エラー: {e}"))?;
        let mut writer = BufWriter::new(file);

        writer
            .write_all(render_text_report(snapshot).as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("書き込みエラー: {e}"))?;
        writer
            .flush()
            .await
            .map_err(|e| anyhow::anyhow!("フラッシュエラー: {e}"))?;

        Ok(())
    }

    fn destination(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// JSON形式での出力実装
pub struct JsonReportSink {
    path: PathBuf,
}

impl JsonReportSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ReportSink for JsonReportSink {
    async fn write_snapshot(&self, snapshot: &ReportSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| anyhow::anyhow!("ディレクトリ作成エラー: {e}"))?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| anyhow::anyhow!("JSON変換エラー: {e}"))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| anyhow::anyhow!("書き込みエラー: {e}"))?;

        Ok(())
    }

    fn destination(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// メモリ内保存の出力実装（テスト用）
#[derive(Debug, Default, Clone)]
pub struct MemoryReportSink {
    snapshot: Arc<Mutex<Option<ReportSnapshot>>>,
    write_count: Arc<Mutex<usize>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用：最後に書き込まれたスナップショットを取得
    pub fn last_snapshot(&self) -> Option<ReportSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    /// テスト用：書き込み回数を取得
    pub fn write_count(&self) -> usize {
        *self.write_count.lock().unwrap()
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn write_snapshot(&self, snapshot: &ReportSnapshot) -> Result<()> {
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        *self.write_count.lock().unwrap() += 1;
        Ok(())
    }

    fn destination(&self) -> String {
        "memory".to_string()
    }
}
