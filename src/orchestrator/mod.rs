//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是整个客户端的"指挥中心"，决定当前处于哪个阶段、何时加载、何时提交、
//! 失败后如何恢复。
//!
//! ## 模块划分
//!
//! ### `session` - 考试会话编排器
//! - 生命周期状态机（LOADING / START / PENDING / BREAK / IN_PROGRESS / COMPLETED / ERROR）
//! - 初始化闩锁，防止重复初始化
//! - 阶段提交与休息结束提交
//! - 提交失败时的本地推进
//! - 管理每个阶段的倒计时
//!
//! ### `state` - 状态类型
//! - 生命周期状态、会话来源、跳转信号、提示、提交结果
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::session (整场考试)
//!     ↓
//! workflow (阶段描述 / 日志上下文)
//!     ↓
//! services (能力层：阶段映射 / 答案编码 / 请求去重)
//!     ↓
//! clients + infrastructure (考试服务 / 倒计时)
//! ```

pub mod session;
pub mod state;

// 重新导出主要类型
pub use session::{SessionOrchestrator, NEW_SESSION_KEY};
pub use state::{
    LifecycleState, Navigation, Notice, OneShotLatch, SessionSource, SubmissionOutcome,
};
