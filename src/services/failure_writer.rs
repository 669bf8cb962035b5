//! 失败记录服务 - 业务能力层
//!
//! 只负责"写失败日志"能力，不关心流程

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 失败记录服务
///
/// 职责：
/// - 把无法处理的答题卡或题目追加写入失败日志
/// - 每次只记录一条，格式 `答题卡 | 题目 | 原因`
/// - 多个任务并发写入时串行化
pub struct FailureWriter {
    path: String,
    lock: Mutex<()>,
}

impl FailureWriter {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 记录一条失败
    ///
    /// # 参数
    /// - `sheet`: 答题卡文件名
    /// - `question`: 题号，整份答题卡失败时为 `None`
    /// - `reason`: 失败原因
    pub async fn write(&self, sheet: &str, question: Option<u32>, reason: &str) -> AppResult<()> {
        let question = question.map_or_else(|| "-".to_string(), |n| n.to_string());
        debug!("记录失败: {} | 题目 {} | {}", sheet, question, reason);

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;

        let line = format!("{} | {} | {}\n", sheet, question, reason.replace('\n', " "));
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;

        Ok(())
    }
}
