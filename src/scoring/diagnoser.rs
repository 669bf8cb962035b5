//! 薄弱知识点诊断
//!
//! 只在 `得分 < 阈值 × 满分` 时触发。解析顺序：JSON → 正则 → 默认诊断，
//! 任何情况下都返回结构完整的诊断结果。

use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::infrastructure::CompletionService;
use crate::models::{Diagnosis, Question};

const DIAGNOSIS_SYSTEM_PROMPT: &str =
    "You are a helpful tutor. You reply with a single JSON object and nothing else.";

#[derive(Debug, Deserialize)]
struct RawDiagnosis {
    weak_topic: Option<String>,
    #[serde(default)]
    tips: Vec<String>,
}

/// 薄弱知识点诊断器
pub struct WeakTopicDiagnoser {
    service: Option<Arc<dyn CompletionService>>,
    threshold: f64,
}

impl WeakTopicDiagnoser {
    pub fn new(service: Option<Arc<dyn CompletionService>>, threshold: f64) -> Self {
        Self { service, threshold }
    }

    /// 是否需要诊断：`awarded < threshold × max_marks`
    pub fn should_diagnose(&self, awarded: f64, max_marks: f64) -> bool {
        awarded < self.threshold * max_marks
    }

    pub fn build_prompt(question: &Question, reference: &str, candidate: &str) -> String {
        format!(
            "Analyze the student's mistakes in answering the following question. \
             Identify the weak topic and suggest improvements.\n\n\
             Question: {}\n\
             Reference Answer: {}\n\
             Student Answer: {}\n\n\
             Provide the weak topic and tips in JSON format with keys 'weak_topic' and 'tips'. \
             The 'tips' should be a list of strings.",
            question.text, reference, candidate
        )
    }

    /// 诊断，永不失败
    pub async fn diagnose(&self, question: &Question, reference: &str, candidate: &str) -> Diagnosis {
        let Some(service) = &self.service else {
            return Diagnosis::unknown();
        };

        let prompt = Self::build_prompt(question, reference, candidate);
        match service.complete(&prompt, Some(DIAGNOSIS_SYSTEM_PROMPT)).await {
            Ok(response) => {
                let diagnosis = parse_diagnosis(&response);
                debug!("第 {} 题薄弱知识点: {}", question.number, diagnosis.weak_topic);
                diagnosis
            }
            Err(e) => {
                warn!("第 {} 题诊断调用失败: {}", question.number, e);
                Diagnosis::unknown()
            }
        }
    }
}

/// 解析诊断响应：先按 JSON，再按正则，最后返回默认诊断
pub fn parse_diagnosis(response: &str) -> Diagnosis {
    match serde_json::from_str::<RawDiagnosis>(strip_code_fence(response)) {
        Ok(raw) => finalize(raw.weak_topic, raw.tips),
        Err(e) => {
            debug!("诊断响应不是合法 JSON，尝试正则提取: {}", e);
            extract_with_regex(response)
        }
    }
}

fn extract_with_regex(response: &str) -> Diagnosis {
    let mut weak_topic = None;
    if let Ok(re) = Regex::new(r#""weak_topic"\s*:\s*"([^"]+)""#) {
        weak_topic = re
            .captures(response)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
    }

    let mut tips = Vec::new();
    if let Ok(re) = Regex::new(r#""tips"\s*:\s*\[([^\]]+)\]"#) {
        if let Some(m) = re.captures(response).and_then(|c| c.get(1)) {
            tips = m
                .as_str()
                .split(',')
                .map(|tip| tip.trim().trim_matches('"').trim().to_string())
                .collect();
        }
    }

    finalize(weak_topic, tips)
}

fn finalize(weak_topic: Option<String>, tips: Vec<String>) -> Diagnosis {
    let weak_topic = weak_topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| Diagnosis::UNKNOWN_TOPIC.to_string());

    let mut tips: Vec<String> = tips
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tips.is_empty() {
        tips.push(Diagnosis::DEFAULT_TIP.to_string());
    }

    Diagnosis { weak_topic, tips }
}

// 模型常把 JSON 包在 ```json ... ``` 里
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
