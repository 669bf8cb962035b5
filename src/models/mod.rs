pub mod answer;
pub mod loaders;
pub mod question;
pub mod question_type;
pub mod score;
pub mod summary;

pub use answer::{AnswerSheet, CandidateAnswer, SheetDocument};
pub use loaders::{
    load_all_sheet_files, load_answer_key, load_sheet_document, save_answer_key, SheetBatch,
    UnreadableSheet,
};
pub use question::{AnswerKey, AnswerKeyEntry, ExtractedQuestion, Question};
pub use question_type::QuestionType;
pub use score::{clamp_marks, round1, Diagnosis, GradedAnswer, ScoreResult, ScoreSource};
pub use summary::{ClassSummary, StudentSummary};
