//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量批改处理器
//! - 管理应用生命周期（初始化、运行、收尾）
//! - 准备答案库（加载或生成）
//! - 控制并发数量（Semaphore），响应 Ctrl-C
//! - 持有 LLM 网关
//! - 输出全局统计信息
//!
//! ### `sheet_processor` - 单份答题卡处理器
//! - 切分作答，逐题交给 GradingFlow
//! - 写入该学生的结果文件
//!
//! ### `summary_builder` - 全班汇总
//! - 从结果文件汇总每个学生和全班的成绩
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<SheetDocument>)
//!     ↓
//! sheet_processor (处理一份答题卡的所有题目)
//!     ↓
//! workflow::GradingFlow (处理一道题 × 一个学生)
//!     ↓
//! scoring / services (能力层：评分 / 诊断 / 抽取 / 写入)
//!     ↓
//! infrastructure (基础设施：LlmGateway)
//! ```

pub mod batch_processor;
pub mod sheet_processor;
pub mod summary_builder;

// 重新导出主要类型
pub use batch_processor::{App, RunReport};
pub use sheet_processor::{SheetOutcome, SheetProcessor};
pub use summary_builder::build_class_summary;
