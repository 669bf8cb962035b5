//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;

/// 初始化日志：同时输出到终端和日志文件
///
/// 未设置 `RUST_LOG` 时默认 `info`，`verbose` 为真时为 `debug`。
/// 日志文件会被重写，并以带时间戳的标题开头。
pub fn init(config: &Config) -> Result<()> {
    init_log_file(&config.output_log_file)?;

    let log_file = OpenOptions::new()
        .append(true)
        .open(&config.output_log_file)
        .with_context(|| format!("无法打开日志文件: {}", config.output_log_file))?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init()
        .context("日志系统已经初始化")?;

    Ok(())
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n批改日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量批改模式");
    info!("📊 答题卡并发数: {}", config.max_concurrent_sheets);
    info!("🌐 外部评判并发数: {}", config.max_concurrent_judge_calls);
    info!(
        "🤖 外部评判: {}",
        if config.use_remote_judge { config.llm_model_name.as_str() } else { "关闭" }
    );
    info!("{}", "=".repeat(60));
}

/// 记录答题卡加载信息
///
/// # 参数
/// - `total`: 答题卡总数
/// - `questions`: 每份答题卡的题目数
pub fn log_batch_start(total: usize, questions: usize) {
    info!("\n{}", "=".repeat(60));
    info!("✓ 找到 {} 份待批改的答题卡", total);
    info!("📄 每份 {} 道题", questions);
    info!("{}", "=".repeat(60));
}

/// 记录批改完成信息
pub fn log_batch_complete(success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 批改完成: 成功 {}/{}", success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `cancelled`: 因中断未提交的数量
/// - `class_average`: 全班平均百分比
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(
    success: usize,
    failed: usize,
    cancelled: usize,
    class_average: f64,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部批改完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, success + failed + cancelled);
    info!("❌ 失败: {}", failed);
    if cancelled > 0 {
        info!("⏹ 中断未批改: {}", cancelled);
    }
    info!("📈 全班平均: {:.2}%", class_average);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("光合作用的过程", 4), "光合作用...");
    }

    #[test]
    fn test_log_file_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        init_log_file(path.to_str().unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("批改日志 - "));
    }
}
