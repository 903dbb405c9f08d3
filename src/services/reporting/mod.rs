// レポート出力サービス

pub mod implementations;

pub use implementations::{render_text_report, FileReportSink, JsonReportSink, MemoryReportSink};
