//! 单份答题卡处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责批改一份答题卡的所有题目，是答题卡级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **切分作答**：通过 `AnswerExtractor` 得到学号和有序作答
//! 2. **并发批改**：每道题交给 `GradingFlow`，题目之间并发执行
//! 3. **结果落盘**：写入 `<stem>_results.json`
//! 4. **统计输出**：记录本份答题卡的得分

use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use crate::error::AppResult;
use crate::models::{AnswerKey, GradedAnswer, SheetDocument};
use crate::services::{AnswerExtractor, ReportWriter};
use crate::workflow::{GradeCtx, GradingFlow};

/// 一份答题卡的批改结果
#[derive(Debug, Clone)]
pub struct SheetOutcome {
    pub file_name: String,
    pub stem: String,
    pub roll_number: String,
    pub graded: Vec<GradedAnswer>,
}

impl SheetOutcome {
    pub fn marks_awarded(&self) -> f64 {
        self.graded.iter().map(|g| g.marks_awarded).sum()
    }

    pub fn total_marks(&self) -> f64 {
        self.graded.iter().map(|g| g.total_marks).sum()
    }

    /// 本份答题卡诊断出的 (学号, 薄弱知识点)
    pub fn weak_topics(&self) -> Vec<(String, String)> {
        self.graded
            .iter()
            .filter_map(|g| {
                g.weak_topics
                    .as_ref()
                    .map(|topic| (self.roll_number.clone(), topic.clone()))
            })
            .collect()
    }
}

/// 单份答题卡处理器
///
/// 在批量处理的所有任务之间共享（`Arc`），自身不可变
pub struct SheetProcessor {
    flow: GradingFlow,
    extractor: Arc<dyn AnswerExtractor>,
    writer: ReportWriter,
}

impl SheetProcessor {
    pub fn new(flow: GradingFlow, extractor: Arc<dyn AnswerExtractor>, writer: ReportWriter) -> Self {
        Self {
            flow,
            extractor,
            writer,
        }
    }

    pub fn writer(&self) -> &ReportWriter {
        &self.writer
    }

    /// 批改一份答题卡
    ///
    /// # 参数
    /// - `document`: 答题卡文本
    /// - `key`: 答案库
    /// - `sheet_index`: 答题卡序号（用于日志）
    pub async fn process(
        &self,
        document: SheetDocument,
        key: &AnswerKey,
        sheet_index: usize,
    ) -> AppResult<SheetOutcome> {
        let sheet = self.extractor.extract(&document)?;

        info!(
            "[答题卡 {}] 📝 {} (学号 {}): {} 条作答 / {} 道题",
            sheet_index,
            document.file_name,
            sheet.roll_number,
            sheet.answers.len(),
            key.len()
        );

        let contexts: Vec<GradeCtx> = key
            .questions
            .iter()
            .map(|entry| {
                GradeCtx::new(
                    &document.file_name,
                    &sheet.roll_number,
                    sheet_index,
                    entry.number,
                )
            })
            .collect();

        let graded = join_all(
            key.questions
                .iter()
                .zip(&contexts)
                .enumerate()
                .map(|(i, (entry, ctx))| self.flow.run(entry, sheet.answer_for(i), ctx)),
        )
        .await;

        let outcome = SheetOutcome {
            file_name: document.file_name.clone(),
            stem: document.stem().to_string(),
            roll_number: sheet.roll_number,
            graded,
        };

        self.writer
            .write_student_results(&outcome.stem, &outcome.graded)
            .await?;

        info!(
            "[答题卡 {}] ✓ 批改完成: {}/{}",
            sheet_index,
            outcome.marks_awarded(),
            outcome.total_marks()
        );

        Ok(outcome)
    }
}
