//! 服务器级别的批次互斥
//!
//! 同一服务器同一时刻最多只有一个批次在运行。

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 正在运行批次的服务器集合
#[derive(Debug, Default)]
pub struct InFlightGuilds {
    guilds: Mutex<HashSet<u64>>,
}

impl InFlightGuilds {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 尝试占用服务器，已被占用时返回 `None`
    pub fn try_acquire(self: &Arc<Self>, guild_id: u64) -> Option<InFlightGuard> {
        if !self.lock().insert(guild_id) {
            return None;
        }
        Some(InFlightGuard {
            owner: Arc::clone(self),
            guild_id,
        })
    }

    pub fn is_running(&self, guild_id: u64) -> bool {
        self.lock().contains(&guild_id)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<u64>> {
        self.guilds.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 释放时解除占用
#[derive(Debug)]
pub struct InFlightGuard {
    owner: Arc<InFlightGuilds>,
    guild_id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.owner.lock().remove(&self.guild_id);
    }
}
