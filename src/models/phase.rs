use serde::{Deserialize, Serialize};

use super::module::Module;
use crate::config::Config;

/// 客户端内部阶段
///
/// 顺序：Phase1 → Phase2 → Break → Phase3 → Phase4 → 完成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalPhase {
    Phase1,
    Phase2,
    Break,
    Phase3,
    Phase4,
}

impl InternalPhase {
    /// 按答题顺序排列的全部题目阶段（不含休息）
    pub const SECTIONS: [InternalPhase; 4] = [
        InternalPhase::Phase1,
        InternalPhase::Phase2,
        InternalPhase::Phase3,
        InternalPhase::Phase4,
    ];

    /// 阶段所属科目模块，休息阶段没有模块
    pub fn module(self) -> Option<Module> {
        match self {
            InternalPhase::Phase1 | InternalPhase::Phase2 => Some(Module::ReadingWriting),
            InternalPhase::Phase3 | InternalPhase::Phase4 => Some(Module::Math),
            InternalPhase::Break => None,
        }
    }

    /// 阶段在模块内的序号（1 或 2）
    pub fn part(self) -> Option<u8> {
        match self {
            InternalPhase::Phase1 | InternalPhase::Phase3 => Some(1),
            InternalPhase::Phase2 | InternalPhase::Phase4 => Some(2),
            InternalPhase::Break => None,
        }
    }

    /// 0 起始的题目阶段序号，休息阶段返回 None
    pub fn section_index(self) -> Option<usize> {
        InternalPhase::SECTIONS.iter().position(|p| *p == self)
    }

    /// 阶段时长（分钟），由配置决定
    pub fn time_allowance(self, config: &Config) -> u32 {
        config.minutes_for(self)
    }

    /// 确定性的后继阶段，None 表示考试结束
    pub fn successor(self) -> Option<InternalPhase> {
        match self {
            InternalPhase::Phase1 => Some(InternalPhase::Phase2),
            InternalPhase::Phase2 => Some(InternalPhase::Break),
            InternalPhase::Break => Some(InternalPhase::Phase3),
            InternalPhase::Phase3 => Some(InternalPhase::Phase4),
            InternalPhase::Phase4 => None,
        }
    }
}

impl std::fmt::Display for InternalPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.module(), self.part()) {
            (Some(module), Some(part)) => write!(f, "{} 第{}部分", module, part),
            _ => f.write_str("休息"),
        }
    }
}
