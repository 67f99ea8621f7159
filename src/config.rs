use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::models::InternalPhase;
use crate::services::phase_mapper::PhaseVocabulary;

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 考试服务地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// START 界面自动进入下一步前的等待时间（秒）
    pub start_grace_secs: u64,
    /// START 之后是否先停在 PENDING 等待"继续"
    pub require_continue: bool,
    /// 四个题目阶段各自的时长（分钟）
    pub phase_minutes: [u32; 4],
    /// 休息时长（分钟）
    pub break_minutes: u32,
    /// 服务端阶段词表
    pub vocabulary: PhaseVocabulary,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            start_grace_secs: 10,
            require_continue: true,
            phase_minutes: [32, 32, 35, 35],
            break_minutes: 10,
            vocabulary: PhaseVocabulary::standard(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置或无法解析的值使用默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("EXAM_API_BASE_URL").unwrap_or(default.api_base_url),
            request_timeout_secs: std::env::var("EXAM_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            start_grace_secs: std::env::var("EXAM_START_GRACE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.start_grace_secs),
            require_continue: std::env::var("EXAM_REQUIRE_CONTINUE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.require_continue),
            phase_minutes: std::env::var("EXAM_PHASE_MINUTES")
                .ok()
                .and_then(|v| match parse_phase_minutes(&v) {
                    Ok(minutes) => Some(minutes),
                    Err(e) => {
                        warn!("{}，使用默认阶段时长", e);
                        None
                    }
                })
                .unwrap_or(default.phase_minutes),
            break_minutes: std::env::var("EXAM_BREAK_MINUTES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.break_minutes),
            vocabulary: std::env::var("EXAM_PHASE_VOCABULARY")
                .ok()
                .and_then(|v| match PhaseVocabulary::preset(&v) {
                    Ok(vocabulary) => Some(vocabulary),
                    Err(e) => {
                        warn!("{}，使用默认词表", e);
                        None
                    }
                })
                .unwrap_or(default.vocabulary),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))?;
        Ok(config)
    }

    /// 阶段时长（分钟）
    pub fn minutes_for(&self, phase: InternalPhase) -> u32 {
        match phase.section_index() {
            Some(index) => self.phase_minutes[index],
            None => self.break_minutes,
        }
    }

    /// 阶段时长（秒）
    pub fn seconds_for(&self, phase: InternalPhase) -> u64 {
        u64::from(self.minutes_for(phase)) * 60
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 检查创建客户端前必须有效的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url".to_string(),
                reason: format!("'{}' 不是 http(s) 地址", self.api_base_url),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                reason: "超时必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}

/// 解析 "32,32,35,35" 形式的阶段时长
fn parse_phase_minutes(raw: &str) -> Result<[u32; 4], ConfigError> {
    let parse_failed = || ConfigError::EnvVarParseFailed {
        var_name: "EXAM_PHASE_MINUTES".to_string(),
        value: raw.to_string(),
        expected_type: "四个以逗号分隔的分钟数".to_string(),
    };

    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| parse_failed())?;

    values.try_into().map_err(|_| parse_failed())
}
