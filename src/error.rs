use std::sync::Arc;

use thiserror::Error;

/// 错误分类
///
/// - `NotFound`：考试不存在，直接跳转，不重试
/// - `Transient`：网络或服务异常，进入 ERROR 状态，由界面决定是否重载
/// - `Submission`：提交失败，提示后本地推进阶段
/// - `Malformed`：响应缺字段，按 `Transient` 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Transient,
    Submission,
    Malformed,
}

/// 库错误类型
///
/// 底层错误用 `Arc` 持有，同一个在途请求的失败可以分发给多个等待者
#[derive(Debug, Clone, Error)]
pub enum ExamError {
    /// 考试 ID 不存在
    #[error("考试不存在: {exam_id}")]
    NotFound { exam_id: String },

    /// 网络请求失败
    #[error("请求失败 ({operation}): {source}")]
    Network {
        operation: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    /// 服务返回非成功状态码
    #[error("服务返回错误状态 ({operation}): status={status}, body={body}")]
    BadStatus {
        operation: String,
        status: u16,
        body: String,
    },

    /// 状态码成功但响应缺少字段或无法解析
    #[error("响应格式错误 ({operation}): {source}")]
    MalformedResponse {
        operation: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// 阶段答案提交失败（网络或服务异常），编排器据此本地推进
    #[error("答案提交失败 ({operation}): {source}")]
    Submission {
        operation: String,
        #[source]
        source: Arc<ExamError>,
    },

    /// 作答无效（题目不存在、题型不符、选项不存在）
    #[error("作答无效 (题目: {question_id}): {reason}")]
    InvalidAnswer { question_id: String, reason: String },

    /// 当前状态不允许该操作
    #[error("当前状态 {state} 不允许操作: {action}")]
    InvalidState { action: String, state: String },

    /// 答案编码失败
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ExamError {
    /// 按错误分类归类，用于决定恢复策略
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExamError::NotFound { .. } => ErrorKind::NotFound,
            ExamError::MalformedResponse { .. } => ErrorKind::Malformed,
            ExamError::Submission { .. }
            | ExamError::Encode(_)
            | ExamError::InvalidAnswer { .. } => ErrorKind::Submission,
            ExamError::Network { .. }
            | ExamError::BadStatus { .. }
            | ExamError::InvalidState { .. }
            | ExamError::Config(_) => ErrorKind::Transient,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// 创建网络请求失败错误
    pub fn network(operation: impl Into<String>, source: reqwest::Error) -> Self {
        ExamError::Network {
            operation: operation.into(),
            source: Arc::new(source),
        }
    }

    /// 创建响应格式错误
    pub fn malformed(operation: impl Into<String>, source: serde_json::Error) -> Self {
        ExamError::MalformedResponse {
            operation: operation.into(),
            source: Arc::new(source),
        }
    }

    /// 包装提交失败，NotFound 保持原样
    pub fn submission(operation: impl Into<String>, source: ExamError) -> Self {
        match source {
            ExamError::NotFound { .. } | ExamError::Submission { .. } => source,
            other => ExamError::Submission {
                operation: operation.into(),
                source: Arc::new(other),
            },
        }
    }

    /// 创建作答无效错误
    pub fn invalid_answer(question_id: impl Into<String>, reason: impl Into<String>) -> Self {
        ExamError::InvalidAnswer {
            question_id: question_id.into(),
            reason: reason.into(),
        }
    }

    /// 创建状态错误
    pub fn invalid_state(action: impl Into<String>, state: impl std::fmt::Display) -> Self {
        ExamError::InvalidState {
            action: action.into(),
            state: state.to_string(),
        }
    }
}

/// 答案编码错误
///
/// 单选题的作答必须能解析成选项字面值，否则是程序缺陷
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("题目 {question_id} 没有选项 {option_id}")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },
    #[error("题目 {question_id} 是单选题，但作答是文本")]
    TextForChoice { question_id: String },
    #[error("题目 {question_id} 是填空题，但作答是选项")]
    ChoiceForText { question_id: String },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未知的阶段词表
    #[error("未知的阶段词表: {name}")]
    UnknownVocabulary { name: String },
    /// 配置项取值无效
    #[error("配置项 {field} 无效: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 库结果类型
pub type Result<T> = std::result::Result<T, ExamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let not_found = ExamError::NotFound {
            exam_id: "e1".to_string(),
        };
        assert!(not_found.is_not_found());

        let bad = ExamError::BadStatus {
            operation: "GET /exam/e1".to_string(),
            status: 502,
            body: String::new(),
        };
        assert_eq!(bad.kind(), ErrorKind::Transient);

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ExamError::malformed("GET /exam", parse_err).kind(), ErrorKind::Malformed);

        let encode = ExamError::from(EncodeError::TextForChoice {
            question_id: "q1".to_string(),
        });
        assert_eq!(encode.kind(), ErrorKind::Submission);
    }

    #[test]
    fn test_submit_failure_is_classified_as_submission() {
        let bad = ExamError::BadStatus {
            operation: "POST /exam/e1/submit".to_string(),
            status: 503,
            body: String::new(),
        };
        let wrapped = ExamError::submission("POST /exam/e1/submit", bad);
        assert_eq!(wrapped.kind(), ErrorKind::Submission);
        assert!(std::error::Error::source(&wrapped).is_some());

        // NotFound 不被包装，仍走跳转流程
        let missing = ExamError::submission(
            "POST /exam/e1/submit",
            ExamError::NotFound {
                exam_id: "e1".to_string(),
            },
        );
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExamError::invalid_state("finish_break", "IN_PROGRESS");
        let msg = err.to_string();
        assert!(msg.contains("finish_break"));
        assert!(msg.contains("IN_PROGRESS"));
    }
}
