//! 阶段描述 - 流程层
//!
//! 由当前会话和当前内部阶段即时推导，不缓存

use std::fmt::Display;

use tracing::debug;

use crate::config::Config;
use crate::models::{ExamSession, InternalPhase, Module, Question};

/// 当前阶段的显示信息
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDescriptor {
    pub phase: InternalPhase,
    pub module: Module,
    /// 模块内序号（1 或 2）
    pub part: u8,
    pub questions: Vec<Question>,
    pub time_allowance_minutes: u32,
}

impl PhaseDescriptor {
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.time_allowance_minutes) * 60
    }
}

impl Display for PhaseDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} 第{}部分 | {} 道题 | {} 分钟]",
            self.module,
            self.part,
            self.questions.len(),
            self.time_allowance_minutes
        )
    }
}

/// 推导当前阶段描述
///
/// `reported` 是会话 `progress` 映射后的阶段，由调用方在替换会话时映射一次。
///
/// 以下情况返回 `None`，不猜测内容：
/// - 没有阶段（已完成）或处于休息
/// - 服务端最近报告的阶段与 `phase` 不一致
/// - 会话中没有该模块的题目
pub fn resolve_descriptor(
    session: &ExamSession,
    phase: Option<InternalPhase>,
    reported: Option<InternalPhase>,
    config: &Config,
) -> Option<PhaseDescriptor> {
    let phase = phase?;
    let (module, part) = (phase.module()?, phase.part()?);

    if reported != Some(phase) {
        debug!(
            "阶段不一致: 本地 {:?}, 服务端 '{}' ({:?})",
            phase, session.progress, reported
        );
        return None;
    }

    let questions = session.questions_for(module);
    if questions.is_empty() {
        debug!("会话 {} 中没有 {} 的题目", session.exam_id, module);
        return None;
    }

    Some(PhaseDescriptor {
        phase,
        module,
        part,
        questions,
        time_allowance_minutes: phase.time_allowance(config),
    })
}
