use crate::models::question::AnswerKey;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载答案库
pub async fn load_answer_key(toml_file_path: &Path) -> Result<AnswerKey> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取答案库文件: {}", toml_file_path.display()))?;

    let mut key: AnswerKey = toml::from_str(&content)
        .with_context(|| format!("无法解析答案库文件: {}", toml_file_path.display()))?;

    // 设置文件路径
    key.file_path = Some(toml_file_path.to_string_lossy().to_string());

    // 题号顺序即作答顺序
    key.questions.sort_by_key(|q| q.number);

    Ok(key)
}

/// 把答案库保存为 TOML 文件（目录不存在时自动创建）
pub async fn save_answer_key(toml_file_path: &Path, key: &AnswerKey) -> Result<()> {
    if let Some(parent) = toml_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("无法创建目录: {}", parent.display()))?;
        }
    }

    let content = toml::to_string_pretty(key).context("无法序列化答案库")?;
    fs::write(toml_file_path, content)
        .await
        .with_context(|| format!("无法写入答案库文件: {}", toml_file_path.display()))?;

    tracing::info!(
        "答案库已保存: {} ({} 道题)",
        toml_file_path.display(),
        key.len()
    );
    Ok(())
}
