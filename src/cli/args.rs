use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "task_pipeline")]
#[command(about = "A bounded-capacity concurrent task-processing pipeline")]
#[command(version)]
pub struct Cli {
    /// Number of worker threads in the pool
    #[arg(short, long, default_value = "4")]
    pub workers: usize,

    /// Maximum queue capacity (backpressure bound)
    #[arg(short = 'c', long, default_value = "20")]
    pub queue_capacity: usize,

    /// Number of sample tasks to submit
    #[arg(short, long, default_value = "15")]
    pub tasks: usize,

    /// Output file path for the results report
    #[arg(short, long, default_value = "processing_results.txt")]
    pub output: PathBuf,

    /// Write the report as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}
