//! 结果写入服务 - 业务能力层
//!
//! 只负责「把评分结果落盘 / 读回」能力，不关心汇总逻辑

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::{AggregationError, AppError, AppResult};
use crate::models::{ClassSummary, GradedAnswer};

pub const RESULTS_SUFFIX: &str = "_results.json";
pub const CLASS_SUMMARY_FILE: &str = "class_summary.json";

/// 结果写入服务
///
/// 职责：
/// - 每份答题卡写一个 `<stem>_results.json`
/// - 读回单份结果文件供汇总使用
/// - 写全班汇总 `class_summary.json`
#[derive(Debug, Clone)]
pub struct ReportWriter {
    results_folder: PathBuf,
}

impl ReportWriter {
    pub fn new(results_folder: impl Into<PathBuf>) -> Self {
        Self {
            results_folder: results_folder.into(),
        }
    }

    pub fn results_folder(&self) -> &Path {
        &self.results_folder
    }

    pub fn results_path(&self, stem: &str) -> PathBuf {
        self.results_folder.join(format!("{stem}{RESULTS_SUFFIX}"))
    }

    pub fn class_summary_path(&self) -> PathBuf {
        self.results_folder.join(CLASS_SUMMARY_FILE)
    }

    async fn write_json<T: serde::Serialize + ?Sized>(&self, path: &Path, value: &T) -> AppResult<()> {
        fs::create_dir_all(&self.results_folder).await.map_err(|e| {
            AppError::file_write_failed(self.results_folder.display().to_string(), e)
        })?;
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
    }

    /// 写入单个学生的结果，返回文件路径
    pub async fn write_student_results(&self, stem: &str, results: &[GradedAnswer]) -> AppResult<PathBuf> {
        let path = self.results_path(stem);
        self.write_json(&path, results).await?;
        debug!("已写入 {} 条评分结果: {}", results.len(), path.display());
        Ok(path)
    }

    /// 读回单个学生的结果
    ///
    /// 文件缺失时返回 [`AggregationError::MissingResultFile`]，内容为空数组时返回
    /// [`AggregationError::EmptyResults`]
    pub async fn read_student_results(&self, stem: &str) -> AppResult<Vec<GradedAnswer>> {
        let path = self.results_path(stem);
        let path_display = path.display().to_string();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AggregationError::MissingResultFile { path: path_display }.into());
            }
            Err(e) => return Err(AppError::file_read_failed(&path_display, e)),
        };
        let results: Vec<GradedAnswer> = serde_json::from_str(&content)
            .map_err(|e| AppError::json_parse_failed(&path_display, e))?;

        if results.is_empty() {
            return Err(AggregationError::EmptyResults { path: path_display }.into());
        }
        Ok(results)
    }

    pub async fn write_class_summary(&self, summary: &ClassSummary) -> AppResult<PathBuf> {
        let path = self.class_summary_path();
        self.write_json(&path, summary).await?;
        info!(
            "全班汇总已写入 {} ({} 名学生，平均 {:.2}%)",
            path.display(),
            summary.student_summaries.len(),
            summary.class_average
        );
        Ok(path)
    }
}
