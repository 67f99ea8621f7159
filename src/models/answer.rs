use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 考生对单道题的作答
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// 单选题：所选选项的 ID（提交前需解析为字面值）
    Choice(String),
    /// 填空题：原样提交的文本
    Text(String),
}

/// 题目 ID → 作答
///
/// 整场考试累积，换阶段时不清空
pub type AnswerMap = HashMap<String, Answer>;

/// 提交给服务端的单题答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub answer_values: Vec<String>,
}

impl SubmittedAnswer {
    pub fn new(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            answer_values: vec![value.into()],
        }
    }

    /// 是否为未作答占位（空字符串）
    pub fn is_blank(&self) -> bool {
        self.answer_values.iter().all(|v| v.is_empty())
    }
}
