//! 阶段映射 - 业务能力层
//!
//! 把服务端的阶段标记翻译成客户端内部阶段，其余模块只认 `InternalPhase`

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::models::InternalPhase;

/// 连续的空白、下划线、连字符
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_\-]+").expect("separator pattern is valid"));

/// 标准化阶段标记：去首尾空白、转小写、分隔符统一为 "-"
pub fn normalize_marker(raw: &str) -> String {
    SEPARATORS
        .replace_all(raw.trim(), "-")
        .trim_matches('-')
        .to_lowercase()
}

/// 服务端阶段词表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseVocabulary {
    /// 四个题目阶段的标记，依次对应 Phase1..Phase4
    pub sections: [String; 4],
    pub break_marker: String,
    pub end_marker: String,
}

impl PhaseVocabulary {
    /// section-1 .. section-4 / break / end
    pub fn standard() -> Self {
        Self {
            sections: [
                "section-1".to_string(),
                "section-2".to_string(),
                "section-3".to_string(),
                "section-4".to_string(),
            ],
            break_marker: "break".to_string(),
            end_marker: "end".to_string(),
        }
    }

    /// MODULE_1 .. MODULE_4 / BREAK / COMPLETED
    pub fn modular() -> Self {
        Self {
            sections: [
                "MODULE_1".to_string(),
                "MODULE_2".to_string(),
                "MODULE_3".to_string(),
                "MODULE_4".to_string(),
            ],
            break_marker: "BREAK".to_string(),
            end_marker: "COMPLETED".to_string(),
        }
    }

    /// 按名称选择预设词表
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match normalize_marker(name).as_str() {
            "standard" => Ok(Self::standard()),
            "modular" => Ok(Self::modular()),
            _ => Err(ConfigError::UnknownVocabulary {
                name: name.to_string(),
            }),
        }
    }
}

impl Default for PhaseVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

/// 阶段映射器
///
/// 纯函数式：对任意输入都返回结果，不抛错；未知标记回退到 Phase1 并记录日志
#[derive(Debug, Clone)]
pub struct PhaseMapper {
    sections: [String; 4],
    break_marker: String,
    end_marker: String,
}

impl PhaseMapper {
    pub fn new(vocabulary: &PhaseVocabulary) -> Self {
        Self {
            sections: vocabulary.sections.clone().map(|s| normalize_marker(&s)),
            break_marker: normalize_marker(&vocabulary.break_marker),
            end_marker: normalize_marker(&vocabulary.end_marker),
        }
    }

    /// 服务端阶段 → 内部阶段
    ///
    /// 终止标记返回 `None`，表示没有更多题目需要显示
    pub fn map(&self, server_phase: &str) -> Option<InternalPhase> {
        let marker = normalize_marker(server_phase);

        if marker == self.end_marker {
            return None;
        }
        if marker == self.break_marker {
            return Some(InternalPhase::Break);
        }
        if let Some(index) = self.sections.iter().position(|s| *s == marker) {
            return Some(InternalPhase::SECTIONS[index]);
        }

        warn!(
            "⚠️ 未识别的服务端阶段标记 '{}'，按第一阶段处理",
            server_phase
        );
        Some(InternalPhase::Phase1)
    }

    pub fn is_terminal(&self, server_phase: &str) -> bool {
        normalize_marker(server_phase) == self.end_marker
    }
}

impl Default for PhaseMapper {
    fn default() -> Self {
        Self::new(&PhaseVocabulary::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_markers() {
        let mapper = PhaseMapper::default();
        assert_eq!(mapper.map("section-1"), Some(InternalPhase::Phase1));
        assert_eq!(mapper.map("section-2"), Some(InternalPhase::Phase2));
        assert_eq!(mapper.map("section-3"), Some(InternalPhase::Phase3));
        assert_eq!(mapper.map("section-4"), Some(InternalPhase::Phase4));
        assert_eq!(mapper.map("break"), Some(InternalPhase::Break));
        assert_eq!(mapper.map("end"), None);
        assert!(mapper.is_terminal("END"));
    }

    #[test]
    fn test_marker_normalization() {
        let mapper = PhaseMapper::default();
        assert_eq!(mapper.map("SECTION_2"), Some(InternalPhase::Phase2));
        assert_eq!(mapper.map("  Section 3 "), Some(InternalPhase::Phase3));
        assert_eq!(mapper.map("section--4"), Some(InternalPhase::Phase4));
        assert_eq!(normalize_marker(" MODULE_1 "), "module-1");
    }

    #[test]
    fn test_unknown_marker_falls_back_to_phase1() {
        let mapper = PhaseMapper::default();
        assert_eq!(mapper.map("warmup"), Some(InternalPhase::Phase1));
        assert_eq!(mapper.map(""), Some(InternalPhase::Phase1));
    }

    #[test]
    fn test_modular_vocabulary() {
        let mapper = PhaseMapper::new(&PhaseVocabulary::modular());
        assert_eq!(mapper.map("MODULE_3"), Some(InternalPhase::Phase3));
        assert_eq!(mapper.map("BREAK"), Some(InternalPhase::Break));
        assert_eq!(mapper.map("COMPLETED"), None);
        // 标准词表的终止标记在这里只是未知标记
        assert_eq!(mapper.map("end"), Some(InternalPhase::Phase1));
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(PhaseVocabulary::preset("Modular").unwrap(), PhaseVocabulary::modular());
        assert!(PhaseVocabulary::preset("v3").is_err());
    }
}
