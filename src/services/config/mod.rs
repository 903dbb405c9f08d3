// 設定サービス

pub mod implementations;

pub use implementations::DefaultPipelineConfig;
