use crate::error::{AppError, FileError};
use crate::models::answer::SheetDocument;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// OCR 文本中的分页符
pub const PAGE_BREAK: char = '\u{c}';

/// 从文本文件加载一份答题卡（页面以换页符分隔）
pub async fn load_sheet_document(path: &Path) -> Result<SheetDocument> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取答题卡: {}", path.display()))?;

    let pages = content.split(PAGE_BREAK).map(str::to_string).collect();
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mut document = SheetDocument::new(file_name, pages);
    document.file_path = Some(path.to_string_lossy().to_string());
    Ok(document)
}

/// 无法读取的答题卡
#[derive(Debug, Clone, PartialEq)]
pub struct UnreadableSheet {
    pub file_name: String,
    pub reason: String,
}

/// 一次扫描的结果：读取成功的答题卡 + 读取失败的文件
#[derive(Debug, Default)]
pub struct SheetBatch {
    pub documents: Vec<SheetDocument>,
    pub unreadable: Vec<UnreadableSheet>,
}

impl SheetBatch {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.unreadable.is_empty()
    }
}

/// 从文件夹中加载所有答题卡（跳过试卷本身）
///
/// 单个文件读取失败不会中断扫描，记入 `unreadable`
pub async fn load_all_sheet_files(folder_path: &str) -> Result<SheetBatch> {
    let folder = PathBuf::from(folder_path);

    if !folder.is_dir() {
        return Err(AppError::from(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        })
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_answer_sheet(&path) {
            paths.push(path);
        }
    }

    // 目录遍历顺序不稳定，按文件名排序
    paths.sort();

    let mut batch = SheetBatch::default();
    for path in paths {
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        tracing::info!("正在加载: {}", file_name);

        match load_sheet_document(&path).await {
            Ok(document) => {
                tracing::info!("成功加载 {} 页", document.pages.len());
                batch.documents.push(document);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
                batch.unreadable.push(UnreadableSheet {
                    file_name,
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    Ok(batch)
}

fn is_answer_sheet(path: &Path) -> bool {
    let is_text = path.extension().and_then(|s| s.to_str()) == Some("txt");
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase();
    is_text && !name.contains("question-paper")
}
