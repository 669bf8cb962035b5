//! 业务能力层
//!
//! 每个服务只处理单个对象（一道题、一份答题卡、一条记录），不关心流程顺序

pub mod answer_extractor;
pub mod answer_generator;
pub mod failure_writer;
pub mod question_classifier;
pub mod question_extractor;
pub mod report_writer;
pub mod student_store;

pub use answer_extractor::{AnsPrefixExtractor, AnswerExtractor, UNKNOWN_ROLL_NUMBER};
pub use answer_generator::{AnswerGenerator, NO_ANSWER};
pub use failure_writer::FailureWriter;
pub use question_classifier::{classify_locally, QuestionClassifier};
pub use question_extractor::QuestionExtractor;
pub use report_writer::ReportWriter;
pub use student_store::StudentStore;
