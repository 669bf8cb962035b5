pub mod grade_ctx;
pub mod grading_flow;

pub use grade_ctx::GradeCtx;
pub use grading_flow::GradingFlow;
