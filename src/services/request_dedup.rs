//! 请求去重 - 业务能力层
//!
//! 同一个 key 同时只允许一个在途请求，其余调用者等待同一个共享 future。
//! 由调用方创建并注入编排器，测试之间互不影响。

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use crate::error::ExamError;

type SharedLoad<T> = Shared<BoxFuture<'static, Result<T, ExamError>>>;

struct InFlight<T: Clone> {
    id: u64,
    future: SharedLoad<T>,
}

/// 按 key 合并并发请求的注册表
///
/// 检查、插入、删除都在同一次加锁内完成，锁不会跨 `.await` 持有
pub struct RequestDeduplicator<T: Clone> {
    inflight: Arc<Mutex<HashMap<String, InFlight<T>>>>,
    next_id: Arc<AtomicU64>,
}

impl<T: Clone> Clone for RequestDeduplicator<T> {
    fn clone(&self) -> Self {
        Self {
            inflight: Arc::clone(&self.inflight),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T: Clone> Default for RequestDeduplicator<T> {
    fn default() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 对同一个 key 最多发起一次请求
    ///
    /// - 已有在途请求：等待它的结果，不调用 `producer`
    /// - 完成后（无论成败）移除登记，下一次调用重新发起
    /// - 等到的是别人发起且已失败的请求：丢弃旧登记，用自己的 `producer` 重新发起；
    ///   考试不存在（NotFound）除外，直接返回
    pub async fn load_once<F, Fut>(&self, key: &str, producer: F) -> Result<T, ExamError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ExamError>> + Send + 'static,
    {
        let mut producer = Some(producer);
        let mut retried_stale = false;

        loop {
            let (id, future, joined) = {
                let mut inflight = self.lock();
                match inflight.get(key) {
                    Some(entry) => (entry.id, entry.future.clone(), true),
                    None => {
                        let Some(produce) = producer.take() else {
                            // producer 只会在插入新登记时被取走，这里不可达
                            return Err(ExamError::invalid_state("load_once", key));
                        };
                        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                        let future = produce().boxed().shared();
                        inflight.insert(
                            key.to_string(),
                            InFlight {
                                id,
                                future: future.clone(),
                            },
                        );
                        debug!("发起新请求: {} (#{})", key, id);
                        (id, future, false)
                    }
                }
            };

            if joined {
                debug!("复用在途请求: {} (#{})", key, id);
            }

            let result = future.await;
            self.remove_if_current(key, id);

            match result {
                Err(e) if joined && !retried_stale && producer.is_some() && !e.is_not_found() => {
                    warn!("在途请求 {} (#{}) 已失败: {}，重新发起", key, id, e);
                    retried_stale = true;
                }
                other => return other,
            }
        }
    }

    /// 当前在途请求数量
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// 清空所有登记（测试收尾用）
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn remove_if_current(&self, key: &str, id: u64) {
        let mut inflight = self.lock();
        if inflight.get(key).is_some_and(|entry| entry.id == id) {
            inflight.remove(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, InFlight<T>>> {
        self.inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
