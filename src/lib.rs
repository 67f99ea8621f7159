//! # Exam Session
//!
//! 限时多阶段考试客户端的会话核心
//!
//! ## 架构设计
//!
//! 本库采用分层架构：
//!
//! ### ① 数据与基础设施层
//! - `models/` - 服务端会话、题目、作答、内部阶段
//! - `clients/` - `ExamApi` 接口与基于 reqwest 的 `ExamClient`
//! - `infrastructure/` - `CountdownTimer`，每个阶段一个独立计时任务
//!
//! ### ② 业务能力层（Services）
//! - `PhaseMapper` - 服务端阶段标记 → 内部阶段
//! - `encode_submission` - 内部作答 → 提交格式
//! - `RequestDeduplicator` - 同一考试只允许一个在途加载请求
//!
//! ### ③ 流程层（Workflow）
//! - `PhaseDescriptor` - 由会话和当前阶段即时推导的阶段描述
//! - `SessionCtx` - 日志上下文
//!
//! ### ④ 编排层（Orchestration）
//! - `SessionOrchestrator` - 生命周期状态机，负责加载、提交、休息、完成与失败恢复
//!
//! 界面层（题目渲染、计时显示、成绩页、登录）不在本库范围内：
//! 本库向界面提供阶段描述、题目列表和倒计时，接收作答和"完成阶段"动作。

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ExamApi, ExamClient};
pub use config::Config;
pub use error::{ErrorKind, ExamError, Result};
pub use models::{Answer, AnswerMap, ExamSession, InternalPhase, Module, Question, SubmittedAnswer};
pub use orchestrator::{LifecycleState, Navigation, SessionOrchestrator, SessionSource, SubmissionOutcome};
pub use services::{PhaseMapper, PhaseVocabulary, RequestDeduplicator};
pub use workflow::PhaseDescriptor;
