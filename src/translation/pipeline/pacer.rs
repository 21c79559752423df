//! 重命名节流器
//!
//! 平台对写操作有全局速率上限。每次远程重命名调用（无论成功与否）之后
//! 调用一次 [`Pacer::wait`]，被跳过的实体不消耗等待。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::sleep;

/// 在两次写操作之间强制最小间隔
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    waits: AtomicU64,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            waits: AtomicU64::new(0),
        }
    }

    /// 挂起调用方一个固定间隔
    pub async fn wait(&self) {
        self.waits.fetch_add(1, Ordering::Relaxed);
        if self.interval.is_zero() {
            return;
        }
        tracing::debug!("节流等待 {:?}", self.interval);
        sleep(self.interval).await;
    }

    /// 进程启动以来的等待次数
    pub fn wait_count(&self) -> u64 {
        self.waits.load(Ordering::Relaxed)
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(crate::translation::config::constants::DEFAULT_RENAME_INTERVAL)
    }
}
