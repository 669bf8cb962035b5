//! 批量批改处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量答题卡的批改和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建 LLM 网关、加载权重表、组装评分流程
//! 2. **答案库准备**：已有答案库直接加载，否则抽题 → 分类 → 生成参考答案 → 保存
//! 3. **并发控制**：使用 Semaphore 限制同时批改的答题卡数量
//! 4. **中断处理**：Ctrl-C 后不再提交新的答题卡，已开始的答题卡正常完成
//! 5. **收尾**：更新学生档案、写全班汇总、输出统计
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单道题的细节
//! - **资源所有者**：唯一持有 LLM 网关的模块
//! - **失败隔离**：单份答题卡失败只记录到失败日志，不中断整批

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{CompletionService, LlmGateway};
use crate::metrics::MetricLibrary;
use crate::models::{
    load_all_sheet_files, load_answer_key, save_answer_key, AnswerKey, AnswerKeyEntry,
    ClassSummary, Question, SheetBatch,
};
use crate::orchestrator::sheet_processor::{SheetOutcome, SheetProcessor};
use crate::orchestrator::summary_builder::build_class_summary;
use crate::scoring::{CompositeScorer, QuestionDispatcher, WeakTopicDiagnoser, WeightTables};
use crate::services::{
    AnsPrefixExtractor, AnswerGenerator, FailureWriter, QuestionClassifier, QuestionExtractor,
    ReportWriter, StudentStore,
};
use crate::utils::logging::{log_batch_complete, log_batch_start, log_startup, print_final_stats};
use crate::workflow::GradingFlow;

/// 一次批量运行的结果
#[derive(Debug, Default)]
pub struct RunReport {
    pub graded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub weak_topics_recorded: usize,
    pub summary: ClassSummary,
}

/// 应用主结构
pub struct App {
    config: Config,
    service: Option<Arc<dyn CompletionService>>,
    processor: Arc<SheetProcessor>,
    failures: FailureWriter,
    cancelled: Arc<AtomicBool>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let gateway = LlmGateway::new(&config);
        let service: Option<Arc<dyn CompletionService>> = if gateway.is_enabled() {
            Some(Arc::new(gateway))
        } else {
            None
        };

        Self::with_service(config, service)
    }

    /// 使用指定的补全服务初始化（`None` 表示只用本地评分）
    pub fn with_service(config: Config, service: Option<Arc<dyn CompletionService>>) -> Result<Self> {
        let tables = WeightTables::load_or_default(config.weights_file.as_deref())
            .context("无法加载权重表")?;
        if let Some(path) = &config.weights_file {
            info!("✓ 已加载自定义权重表: {}", path);
        }

        let composite = CompositeScorer::new(MetricLibrary::shared(), Arc::new(tables));
        let dispatcher = Arc::new(QuestionDispatcher::new(composite, service.clone()));
        let diagnoser = Arc::new(WeakTopicDiagnoser::new(
            service.clone(),
            config.diagnosis_threshold,
        ));
        let flow = GradingFlow::new(dispatcher, diagnoser, config.verbose_logging);

        let processor = SheetProcessor::new(
            flow,
            Arc::new(AnsPrefixExtractor::new()),
            ReportWriter::new(&config.results_folder),
        );

        Ok(Self {
            failures: FailureWriter::with_path(&config.failure_log_file),
            config,
            service,
            processor: Arc::new(processor),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// 中断标志：置位后不再提交新的答题卡
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunReport> {
        let key = Arc::new(self.prepare_answer_key().await?);

        info!("\n📁 正在扫描待批改的答题卡...");
        let batch = load_all_sheet_files(&self.config.sheets_folder).await?;
        if batch.is_empty() {
            warn!("⚠️ 没有找到待批改的答题卡，程序结束");
            return Ok(RunReport::default());
        }

        log_batch_start(batch.documents.len() + batch.unreadable.len(), key.len());

        let ctrl_c = self.listen_for_ctrl_c();
        let report = self.grade_all(batch, key).await?;
        ctrl_c.abort();

        log_batch_complete(report.graded, report.graded + report.failed);

        self.finish(&report).await;

        print_final_stats(
            report.graded,
            report.failed,
            report.cancelled,
            report.summary.class_average,
            &self.config.output_log_file,
        );

        Ok(report)
    }

    fn listen_for_ctrl_c(&self) -> tokio::task::JoinHandle<()> {
        let cancelled = self.cancelled.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("⏹ 收到中断信号，不再提交新的答题卡，等待进行中的批改完成...");
                cancelled.store(true, Ordering::SeqCst);
            }
        })
    }

    /// 加载答案库，不存在时从试卷生成并保存
    async fn prepare_answer_key(&self) -> Result<AnswerKey> {
        let key_path = Path::new(&self.config.answer_key_path);
        if key_path.exists() {
            let key = load_answer_key(key_path).await?;
            info!("✓ 已加载答案库: {} ({} 道题)", key_path.display(), key.len());
            if key.is_empty() {
                anyhow::bail!("答案库中没有题目: {}", key_path.display());
            }
            return Ok(key);
        }

        info!("答案库不存在，正在从试卷生成: {}", self.config.question_paper_path);
        let key = self.build_answer_key().await?;
        save_answer_key(key_path, &key).await?;
        Ok(key)
    }

    async fn build_answer_key(&self) -> Result<AnswerKey> {
        let paper_path = &self.config.question_paper_path;
        let text = tokio::fs::read_to_string(paper_path)
            .await
            .with_context(|| format!("无法读取试卷: {}", paper_path))?;

        let extracted = QuestionExtractor::new().extract(paper_path, &text)?;

        let classifier = QuestionClassifier::new(self.service.clone());
        let generator = AnswerGenerator::new(self.service.clone());

        let entries = join_all(extracted.into_iter().map(|q| {
            let classifier = &classifier;
            let generator = &generator;
            async move {
                let question_type = classifier.classify(&q.text).await;
                let reference = generator.generate(&q.text, q.marks).await;
                info!("第 {} 题: {} ({} 分)", q.number, question_type, q.marks);
                AnswerKeyEntry::new(Question::new(q.number, q.text, question_type, q.marks), reference)
            }
        }))
        .await;

        Ok(AnswerKey::new(entries))
    }

    /// 并发批改所有答题卡
    async fn grade_all(&self, batch: SheetBatch, key: Arc<AnswerKey>) -> Result<RunReport> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_sheets.max(1)));
        let mut report = RunReport::default();
        let mut handles = Vec::new();

        for unreadable in &batch.unreadable {
            error!("❌ 无法读取答题卡 {}: {}", unreadable.file_name, unreadable.reason);
            self.record_failure(&mut report, &unreadable.file_name, &unreadable.reason)
                .await;
        }

        for (idx, document) in batch.documents.into_iter().enumerate() {
            let sheet_index = idx + 1;
            if self.cancelled.load(Ordering::SeqCst) {
                report.cancelled += 1;
                continue;
            }

            let permit = semaphore.clone().acquire_owned().await?;
            // 等待期间可能收到中断
            if self.cancelled.load(Ordering::SeqCst) {
                report.cancelled += 1;
                continue;
            }

            let processor = self.processor.clone();
            let key = key.clone();
            let file_name = document.file_name.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                processor.process(document, &key, sheet_index).await
            });
            handles.push((sheet_index, file_name, handle));
        }

        let mut outcomes: Vec<SheetOutcome> = Vec::new();
        for (sheet_index, file_name, handle) in handles {
            let reason = match handle.await {
                Ok(Ok(outcome)) => {
                    outcomes.push(outcome);
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(e) => format!("任务执行失败: {}", e),
            };

            error!("[答题卡 {}] ❌ {}: {}", sheet_index, file_name, reason);
            self.record_failure(&mut report, &file_name, &reason).await;
        }

        report.graded = outcomes.len();
        report.weak_topics_recorded = self.record_weak_topics(&outcomes).await;
        report.summary = self.summarize(&outcomes).await;

        Ok(report)
    }

    async fn record_failure(&self, report: &mut RunReport, file_name: &str, reason: &str) {
        report.failed += 1;
        if let Err(e) = self.failures.write(file_name, None, reason).await {
            error!("无法写入失败日志: {}", e);
        }
    }

    async fn record_weak_topics(&self, outcomes: &[SheetOutcome]) -> usize {
        let updates: Vec<(String, String)> =
            outcomes.iter().flat_map(SheetOutcome::weak_topics).collect();
        if updates.is_empty() {
            return 0;
        }

        let store = StudentStore::new(&self.config.students_store_path);
        match store.record_weak_topics(&updates).await {
            Ok(updated) => updated,
            Err(e) => {
                error!("⚠️ 学生档案更新失败: {}", e);
                0
            }
        }
    }

    async fn summarize(&self, outcomes: &[SheetOutcome]) -> ClassSummary {
        let stems: Vec<String> = outcomes.iter().map(|o| o.stem.clone()).collect();
        build_class_summary(self.processor.writer(), &stems).await
    }

    async fn finish(&self, report: &RunReport) {
        if let Err(e) = self.processor.writer().write_class_summary(&report.summary).await {
            error!("⚠️ 全班汇总写入失败: {}", e);
        }
    }
}
