//! 答案编码 - 业务能力层
//!
//! 把内部作答（题目 ID → 选项 ID / 文本）转换成服务端提交格式
//! （题目 ID → 字面值列表）

use tracing::debug;

use crate::error::EncodeError;
use crate::models::{Answer, AnswerMap, Question, QuestionType, SubmittedAnswer};

/// 编码当前阶段的答案
///
/// - 每道题恰好一条记录，未作答的题目提交空字符串
/// - 单选题的选项 ID 解析成选项字面值
/// - 不属于 `questions` 的作答不会出现在结果中
pub fn encode_submission(
    questions: &[Question],
    answers: &AnswerMap,
) -> Result<Vec<SubmittedAnswer>, EncodeError> {
    let batch = questions
        .iter()
        .map(|question| encode_one(question, answers.get(&question.question_id)))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "编码答案: {} 道题, {} 道未作答",
        batch.len(),
        batch.iter().filter(|a| a.is_blank()).count()
    );

    Ok(batch)
}

/// 解析单道题的提交值
pub fn resolve_value(question: &Question, answer: &Answer) -> Result<String, EncodeError> {
    match (question.question_type, answer) {
        (QuestionType::Text, Answer::Text(text)) => Ok(text.clone()),
        (QuestionType::Choice, Answer::Choice(option_id)) => question
            .option(option_id)
            .map(|option| option.value.clone())
            .ok_or_else(|| EncodeError::UnknownOption {
                question_id: question.question_id.clone(),
                option_id: option_id.clone(),
            }),
        (QuestionType::Choice, Answer::Text(_)) => Err(EncodeError::TextForChoice {
            question_id: question.question_id.clone(),
        }),
        (QuestionType::Text, Answer::Choice(_)) => Err(EncodeError::ChoiceForText {
            question_id: question.question_id.clone(),
        }),
    }
}

fn encode_one(question: &Question, answer: Option<&Answer>) -> Result<SubmittedAnswer, EncodeError> {
    let value = match answer {
        Some(answer) => resolve_value(question, answer)?,
        None => String::new(),
    };
    Ok(SubmittedAnswer::new(question.question_id.clone(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerOption, Module};

    fn choice(id: &str) -> Question {
        Question {
            question_id: id.to_string(),
            question_type: QuestionType::Choice,
            content: format!("choice {}", id),
            image_url: None,
            module: Module::ReadingWriting,
            options: vec![
                AnswerOption {
                    option_id: format!("{}-a", id),
                    value: "alpha".to_string(),
                },
                AnswerOption {
                    option_id: format!("{}-b", id),
                    value: "beta".to_string(),
                },
            ],
        }
    }

    fn text(id: &str) -> Question {
        Question {
            question_id: id.to_string(),
            question_type: QuestionType::Text,
            content: format!("text {}", id),
            image_url: None,
            module: Module::Math,
            options: Vec::new(),
        }
    }

    #[test]
    fn test_choice_resolves_to_literal_value() {
        let questions = vec![choice("q1")];
        let mut answers = AnswerMap::new();
        answers.insert("q1".to_string(), Answer::Choice("q1-b".to_string()));

        let batch = encode_submission(&questions, &answers).unwrap();
        assert_eq!(batch, vec![SubmittedAnswer::new("q1", "beta")]);
        assert_ne!(batch[0].answer_values[0], "q1-b");
    }

    #[test]
    fn test_one_entry_per_question_with_blanks() {
        let questions = vec![choice("q1"), text("q2"), choice("q3"), text("q4"), text("q5")];
        let mut answers = AnswerMap::new();
        answers.insert("q1".to_string(), Answer::Choice("q1-a".to_string()));
        answers.insert("q2".to_string(), Answer::Text("42".to_string()));
        answers.insert("q4".to_string(), Answer::Text("x = 3".to_string()));

        let batch = encode_submission(&questions, &answers).unwrap();
        assert_eq!(batch.len(), questions.len());
        assert_eq!(batch.iter().filter(|a| a.is_blank()).count(), 2);
        assert_eq!(batch[1].answer_values, vec!["42".to_string()]);
        assert_eq!(batch[2].answer_values, vec![String::new()]);
        // 顺序与题目顺序一致
        let ids: Vec<&str> = batch.iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3", "q4", "q5"]);
    }

    #[test]
    fn test_answers_outside_phase_are_excluded() {
        let questions = vec![text("q2")];
        let mut answers = AnswerMap::new();
        answers.insert("q2".to_string(), Answer::Text("7".to_string()));
        answers.insert("other".to_string(), Answer::Text("ignored".to_string()));

        let batch = encode_submission(&questions, &answers).unwrap();
        assert_eq!(batch, vec![SubmittedAnswer::new("q2", "7")]);
    }

    #[test]
    fn test_unknown_option_is_a_defect() {
        let questions = vec![choice("q1")];
        let mut answers = AnswerMap::new();
        answers.insert("q1".to_string(), Answer::Choice("q9-z".to_string()));

        let err = encode_submission(&questions, &answers).unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnknownOption {
                question_id: "q1".to_string(),
                option_id: "q9-z".to_string(),
            }
        );
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        assert!(resolve_value(&choice("q1"), &Answer::Text("alpha".to_string())).is_err());
        assert!(resolve_value(&text("q2"), &Answer::Choice("q2-a".to_string())).is_err());
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(SubmittedAnswer::new("q1", "")).unwrap();
        assert_eq!(json, serde_json::json!({ "questionId": "q1", "answerValues": [""] }));
    }
}
