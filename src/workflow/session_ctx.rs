//! 会话日志上下文
//!
//! 封装"我正在处理哪场考试的哪个阶段"这一信息

use std::fmt::Display;

use crate::models::InternalPhase;

/// 会话上下文，仅用于日志
#[derive(Debug, Clone)]
pub struct SessionCtx {
    pub exam_id: String,
    pub phase: Option<InternalPhase>,
}

impl SessionCtx {
    pub fn new(exam_id: impl Into<String>, phase: Option<InternalPhase>) -> Self {
        Self {
            exam_id: exam_id.into(),
            phase,
        }
    }
}

impl Display for SessionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "[考试 {} | {}]", self.exam_id, phase),
            None => write!(f, "[考试 {}]", self.exam_id),
        }
    }
}
