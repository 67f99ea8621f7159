//! 倒计时器 - 基础设施层
//!
//! 每个阶段一个独立的计时任务，每秒发送一次剩余秒数，到 0 时发送一次到期事件后结束。
//! 使用单调时钟，不受系统时间调整和网络活动影响。

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::models::InternalPhase;

/// 计时用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// START 界面的自动前进等待
    StartGrace,
    /// 题目阶段或休息阶段
    Phase(InternalPhase),
}

/// 计时事件
///
/// `generation` 标识发出事件的计时器，旧计时器的事件由接收方丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub generation: u64,
    pub kind: TimerKind,
    pub remaining: u64,
}

impl TimerEvent {
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

/// 倒计时器
///
/// 丢弃即停止，停止后不会再发送任何事件
pub struct CountdownTimer {
    generation: u64,
    kind: TimerKind,
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    /// 启动倒计时
    ///
    /// # 参数
    /// - `generation`: 计时器编号，随事件一起发送
    /// - `kind`: 计时用途
    /// - `total_secs`: 总秒数，为 0 时立即发送到期事件
    /// - `events`: 事件发送端
    pub fn start(
        generation: u64,
        kind: TimerKind,
        total_secs: u64,
        events: UnboundedSender<TimerEvent>,
    ) -> Self {
        debug!("启动计时器 #{} {:?}: {} 秒", generation, kind, total_secs);

        let handle = tokio::spawn(async move {
            if total_secs == 0 {
                let _ = events.send(TimerEvent {
                    generation,
                    kind,
                    remaining: 0,
                });
                return;
            }

            let period = Duration::from_secs(1);
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut remaining = total_secs;
            while remaining > 0 {
                ticker.tick().await;
                remaining -= 1;
                let event = TimerEvent {
                    generation,
                    kind,
                    remaining,
                };
                if events.send(event).is_err() {
                    // 接收方已销毁
                    break;
                }
            }
        });

        Self {
            generation,
            kind,
            handle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 停止计时
    pub fn stop(self) {
        debug!("停止计时器 #{} {:?}", self.generation, self.kind);
        // Drop 负责 abort
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_down_and_expires_once() {
        let (tx, mut rx) = unbounded_channel();
        let _timer = CountdownTimer::start(1, TimerKind::Phase(InternalPhase::Phase1), 3, tx);

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event.remaining);
        }

        assert_eq!(seen, vec![2, 1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_spacing_is_one_second() {
        let (tx, mut rx) = unbounded_channel();
        let start = Instant::now();
        let _timer = CountdownTimer::start(1, TimerKind::StartGrace, 2, tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.remaining, 1);
        assert_eq!(start.elapsed(), Duration::from_secs(1));

        let second = rx.recv().await.unwrap();
        assert!(second.is_expired());
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_length_expires_immediately() {
        let (tx, mut rx) = unbounded_channel();
        let _timer = CountdownTimer::start(9, TimerKind::Phase(InternalPhase::Break), 0, tx);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.generation, 9);
        assert!(event.is_expired());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_timer_sends_nothing_more() {
        let (tx, mut rx) = unbounded_channel();
        let timer = CountdownTimer::start(1, TimerKind::Phase(InternalPhase::Phase2), 10, tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.remaining, 9);

        timer.stop();
        // 任务被中止后发送端随之释放
        assert!(rx.recv().await.is_none());
    }
}
