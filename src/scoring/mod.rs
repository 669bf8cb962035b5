//! 评分核心
//!
//! ```text
//! QuestionDispatcher
//!     ├─ Objective            → ExactAnswer
//!     └─ Descriptive/Opinion  → Fallback(RemoteJudge, LocalEnsemble)
//!                                              └─ CompositeScorer(WeightTables)
//! WeakTopicDiagnoser  得分低于阈值时调用
//! ```

pub mod composite;
pub mod diagnoser;
pub mod dispatcher;
pub mod strategy;
pub mod weights;

pub use composite::{CompositeOutcome, CompositeScorer};
pub use diagnoser::{parse_diagnosis, WeakTopicDiagnoser};
pub use dispatcher::QuestionDispatcher;
pub use strategy::{ExactAnswer, Fallback, LocalEnsemble, MarkScorer, RemoteJudge, ScoringRequest};
pub use weights::{WeightTable, WeightTables};
