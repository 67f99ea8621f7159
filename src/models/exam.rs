use serde::{Deserialize, Serialize};

use super::module::Module;

/// 服务端返回的考试会话
///
/// 服务端是阶段与题目内容的唯一来源，客户端收到后只读不改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSession {
    pub exam_id: String,
    /// 服务端阶段标记（section / break / end）
    pub progress: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl ExamSession {
    /// 属于某个科目模块的题目（保持服务端顺序）
    pub fn questions_for(&self, module: Module) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.module == module)
            .cloned()
            .collect()
    }
}

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// 单选题
    #[serde(rename = "CHOICE")]
    Choice,
    /// 填空题（自由文本）
    #[serde(rename = "TEXT")]
    Text,
}

/// 题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub module: Module,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// 按选项 ID 查找选项
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.option_id == option_id)
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let content_preview = if self.content.chars().count() > 60 {
            self.content.chars().take(60).collect::<String>() + "..."
        } else {
            self.content.clone()
        };
        write!(f, "[{} {}] {}", self.module, self.question_id, content_preview)
    }
}

/// 单选题选项：ID 用于界面选择，value 是提交给服务端的字面值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub option_id: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_session_payload() {
        let payload = r#"{
            "examId": "exam-42",
            "progress": "section-1",
            "questions": [
                {
                    "questionId": "q1",
                    "type": "CHOICE",
                    "content": "Which choice completes the text?",
                    "module": "READING_WRITING",
                    "options": [
                        { "optionId": "o1", "value": "A" },
                        { "optionId": "o2", "value": "B" }
                    ]
                },
                {
                    "questionId": "q2",
                    "type": "TEXT",
                    "content": "Solve for x",
                    "imageUrl": "https://cdn.example.com/q2.png",
                    "module": "math"
                }
            ]
        }"#;

        let session: ExamSession = serde_json::from_str(payload).unwrap();
        assert_eq!(session.exam_id, "exam-42");
        assert_eq!(session.questions.len(), 2);
        assert_eq!(session.questions[0].question_type, QuestionType::Choice);
        assert_eq!(session.questions[0].option("o2").unwrap().value, "B");
        assert_eq!(session.questions[1].module, Module::Math);
        assert!(session.questions[1].options.is_empty());
        assert_eq!(session.questions_for(Module::Math).len(), 1);
    }

    #[test]
    fn test_missing_progress_is_rejected() {
        let payload = r#"{ "examId": "exam-42", "questions": [] }"#;
        assert!(serde_json::from_str::<ExamSession>(payload).is_err());
    }

    #[test]
    fn test_unknown_question_type_is_rejected() {
        let payload = r#"{
            "questionId": "q1", "type": "ESSAY", "content": "x", "module": "MATH"
        }"#;
        assert!(serde_json::from_str::<Question>(payload).is_err());
    }
}
