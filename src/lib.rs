//! # Score Matrix
//!
//! 试卷批改与评分引擎：抽题、生成参考答案、切分学生作答、按题型评分、诊断薄弱知识点、汇总全班成绩
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（外部评判连接、并发上限、超时），只暴露能力
//! - `LlmGateway` - 唯一的 API 客户端 owner，提供 `CompletionService::complete()` 能力
//!
//! ### ② 评分核心（Scoring Core）
//! - `text/` - 分词、停用词、词形还原、分句
//! - `metrics/` - 各项 [0, 1] 指标
//! - `scoring/` - 加权合成、评分策略（RemoteJudge / LocalEnsemble / Fallback）、题型分发、薄弱知识点诊断
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个对象
//! - `QuestionExtractor` / `QuestionClassifier` / `AnswerGenerator` - 生成答案库
//! - `AnswerExtractor` - 切分答题卡
//! - `ReportWriter` / `StudentStore` / `FailureWriter` - 落盘
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一道题 × 一个学生"的完整批改流程
//! - `GradeCtx` - 上下文封装（答题卡 + 学号 + 题号）
//! - `GradingFlow` - 流程编排（评分 → 诊断 → 组装记录）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量批改，管理资源、并发和中断
//! - `orchestrator/sheet_processor` - 单份答题卡处理器，遍历题目
//! - `orchestrator/summary_builder` - 全班汇总
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod scoring;
pub mod services;
pub mod text;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{CompletionService, LlmGateway};
pub use models::{
    AnswerKey, AnswerKeyEntry, ClassSummary, GradedAnswer, Question, QuestionType, ScoreResult,
    ScoreSource,
};
pub use orchestrator::{App, RunReport};
pub use scoring::{QuestionDispatcher, ScoringRequest, WeakTopicDiagnoser, WeightTables};
pub use workflow::{GradeCtx, GradingFlow};
