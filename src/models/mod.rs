pub mod answer;
pub mod exam;
pub mod module;
pub mod phase;

pub use answer::{Answer, AnswerMap, SubmittedAnswer};
pub use exam::{AnswerOption, ExamSession, Question, QuestionType};
pub use module::Module;
pub use phase::InternalPhase;
