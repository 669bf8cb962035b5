//! 学生档案服务 - 业务能力层
//!
//! `students.json` 的结构不归本系统所有：只改 `weakTopics` 一个字段，其余字段原样写回。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::Diagnosis;

const ROLL_NUMBER_FIELD: &str = "rollNumber";
const WEAK_TOPICS_FIELD: &str = "weakTopics";
const EMPTY_MARKER: &str = "-";

/// 学生档案服务
///
/// 职责：
/// - 把诊断出的薄弱知识点追加到对应学生的 `weakTopics` 字段
/// - 字段为空或为 "-" 时直接覆盖，否则以 ", " 追加
/// - 不认识的学号不做任何修改
pub struct StudentStore {
    path: PathBuf,
}

impl StudentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 批量写入 (学号, 薄弱知识点)，只读写一次文件
    ///
    /// 返回实际更新的条数。档案文件不存在时不做任何事。
    /// `Unknown` 诊断不会写入档案。
    pub async fn record_weak_topics(&self, updates: &[(String, String)]) -> AppResult<usize> {
        let path_display = self.path.display().to_string();
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("学生档案不存在，跳过薄弱知识点写入: {}", path_display);
                return Ok(0);
            }
            Err(e) => return Err(AppError::file_read_failed(&path_display, e)),
        };
        let mut students: JsonValue = serde_json::from_str(&content)
            .map_err(|e| AppError::json_parse_failed(&path_display, e))?;

        let Some(records) = students.as_array_mut() else {
            return Err(AppError::Other(format!(
                "学生档案格式错误（顶层应为数组）: {}",
                path_display
            )));
        };

        let mut updated = 0;
        for (roll_number, topic) in updates {
            if topic.trim().is_empty() || topic == Diagnosis::UNKNOWN_TOPIC {
                continue;
            }
            if append_topic(records, roll_number, topic) {
                updated += 1;
            } else {
                debug!("学生档案中没有学号 {}", roll_number);
            }
        }

        if updated > 0 {
            let serialized = serde_json::to_string_pretty(&students)?;
            fs::write(&self.path, serialized)
                .await
                .map_err(|e| AppError::file_write_failed(&path_display, e))?;
            info!("已更新 {} 条学生薄弱知识点记录", updated);
        }

        Ok(updated)
    }
}

fn append_topic(records: &mut [JsonValue], roll_number: &str, topic: &str) -> bool {
    let Some(student) = records.iter_mut().find(|s| {
        s.get(ROLL_NUMBER_FIELD).is_some_and(|v| match v {
            JsonValue::String(s) => s == roll_number,
            JsonValue::Number(n) => n.to_string() == roll_number,
            _ => false,
        })
    }) else {
        return false;
    };
    let Some(fields) = student.as_object_mut() else {
        return false;
    };

    let current = fields
        .get(WEAK_TOPICS_FIELD)
        .and_then(JsonValue::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    let next = if current.is_empty() || current == EMPTY_MARKER {
        topic.to_string()
    } else {
        format!("{}, {}", current, topic)
    };
    fields.insert(WEAK_TOPICS_FIELD.to_string(), JsonValue::String(next));
    true
}
