//! 编排器的状态类型

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local};

use crate::models::ExamSession;

/// 生命周期状态，同一时刻只有一个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// 正在加载会话，或提交在途
    Loading,
    /// 说明页，等待开始
    Start,
    /// 等待考生点击"继续"
    Pending,
    /// 休息
    Break,
    /// 答题中
    InProgress,
    /// 已完成
    Completed,
    /// 加载失败，需要界面整体重载
    Error,
}

impl LifecycleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Completed | LifecycleState::Error)
    }
}

impl Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::Loading => "LOADING",
            LifecycleState::Start => "START",
            LifecycleState::Pending => "PENDING",
            LifecycleState::Break => "BREAK",
            LifecycleState::InProgress => "IN_PROGRESS",
            LifecycleState::Completed => "COMPLETED",
            LifecycleState::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// 会话来源（两种初始化入口）
#[derive(Debug, Clone)]
pub enum SessionSource {
    /// 外部已取得完整会话，从 START 开始
    Provided(ExamSession),
    /// 外部已取得完整会话，直接进入服务端报告的阶段
    Resumed(ExamSession),
    /// 按 ID 加载已有考试
    Existing(String),
    /// 向服务申请一场新考试
    New,
}

/// 需要界面外壳执行的跳转
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// 考试不存在
    NotFound { exam_id: String },
    /// 考试完成，进入成绩页
    Results { exam_id: String },
}

/// 非阻塞提示
#[derive(Debug, Clone)]
pub struct Notice {
    pub at: DateTime<Local>,
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 服务端接受，阶段以服务端为准
    Accepted,
    /// 提交失败，已在本地推进到后继阶段
    LocalFallback,
}

/// 一次性闩锁
#[derive(Debug, Default)]
pub struct OneShotLatch {
    fired: AtomicBool,
}

impl OneShotLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第一次调用返回 true，之后都返回 false
    pub fn try_acquire(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }
}
