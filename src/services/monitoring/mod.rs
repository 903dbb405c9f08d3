// 監視サービス

pub mod implementations;

pub use implementations::{ConsolePipelineReporter, NoOpPipelineReporter};
