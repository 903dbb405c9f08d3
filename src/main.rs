use anyhow::Result;
use clap::Parser;

// パイプラインAPIをインポート
use task_pipeline::{
    cli::Cli, create_sample_tasks, ConsolePipelineReporter, DefaultPipelineConfig, FileReportSink,
    JsonReportSink, PipelineEngine, ReportSink, SimulatedWorkProcessor,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        println!("🚀 タスク処理パイプライン - 並行処理版");
        println!("📄 出力ファイル: {}", cli.output.display());
    }

    // 1. 設定構築
    let config = DefaultPipelineConfig::default()
        .with_worker_count(cli.workers)
        .with_queue_capacity(cli.queue_capacity);

    // 2. 出力形式の選択（テキスト or JSON）
    let sink: Box<dyn ReportSink> = if cli.json {
        Box::new(JsonReportSink::new(&cli.output))
    } else {
        Box::new(FileReportSink::new(&cli.output))
    };

    let reporter = if cli.quiet {
        ConsolePipelineReporter::quiet()
    } else {
        ConsolePipelineReporter::new()
    };

    // 3. エンジン構築と起動
    let mut engine = PipelineEngine::new(
        SimulatedWorkProcessor::default(),
        config,
        reporter,
        sink,
    );
    engine.start().await?;

    // 4. サンプルタスクを投入
    let tasks = create_sample_tasks(cli.tasks);
    let submissions = engine.add_tasks(tasks).await;
    let rejected = submissions.iter().filter(|s| !s.accepted).count();
    if rejected > 0 && !cli.quiet {
        println!("⚠️  {rejected}個のタスクが投入できませんでした");
    }

    if !cli.quiet {
        println!("{}", engine.status().await);
    }

    // 5. 全タスクの処理完了を待機
    engine.wait_for_completion().await;

    if !cli.quiet {
        println!("{}", engine.status().await);
    }

    // 6. 段階的シャットダウンとレポート出力
    match engine.shutdown().await {
        Ok(Some(_summary)) => {
            if !cli.quiet {
                println!("✅ 処理完了! 結果は {} に保存されました", cli.output.display());
            }
        }
        Ok(None) => {
            if !cli.quiet {
                println!("処理された結果はありません");
            }
        }
        Err(error) => {
            // エクスポート失敗はシャットダウン完了後に呼び出し元へ伝播し、終了コードに反映される
            eprintln!("❌ レポート出力に失敗しました: {error}");
            return Err(error.into());
        }
    }

    Ok(())
}
