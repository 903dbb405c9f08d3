// 設定管理の具象実装

use crate::core::PipelineConfig;
use std::time::Duration;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultPipelineConfig {
    worker_count: usize,
    queue_capacity: usize,
    enqueue_timeout: Duration,
    submit_interval: Duration,
    poll_interval: Duration,
    shutdown_timeout: Duration,
}

impl DefaultPipelineConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            worker_count: cpu_count.max(1),
            queue_capacity: 20,
            enqueue_timeout: Duration::from_millis(100),
            submit_interval: Duration::from_millis(50),
            poll_interval: Duration::from_millis(100),
            shutdown_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_enqueue_timeout(mut self, enqueue_timeout: Duration) -> Self {
        self.enqueue_timeout = enqueue_timeout;
        self
    }

    pub fn with_submit_interval(mut self, submit_interval: Duration) -> Self {
        self.submit_interval = submit_interval;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// テスト用：待ち時間を全て最小化した設定
    pub fn for_testing() -> Self {
        Self::new(2)
            .with_submit_interval(Duration::ZERO)
            .with_poll_interval(Duration::from_millis(10))
            .with_shutdown_timeout(Duration::from_secs(5))
    }
}

impl Default for DefaultPipelineConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl PipelineConfig for DefaultPipelineConfig {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    fn enqueue_timeout(&self) -> Duration {
        self.enqueue_timeout
    }

    fn submit_interval(&self) -> Duration {
        self.submit_interval
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }
}
