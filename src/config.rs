use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时批改的答题卡数量
    pub max_concurrent_sheets: usize,
    /// 同时进行的外部评判调用数量
    pub max_concurrent_judge_calls: usize,
    /// 单次外部评判调用的超时时间（秒）
    pub judge_timeout_secs: u64,
    /// 是否先调用外部评判服务
    pub use_remote_judge: bool,
    /// 触发薄弱知识点诊断的得分比例阈值
    pub diagnosis_threshold: f64,
    /// 试卷文本文件（题目抽取的来源）
    pub question_paper_path: String,
    /// 答案库 TOML 文件（存在时跳过题目抽取和答案生成）
    pub answer_key_path: String,
    /// 答题卡文本存放目录
    pub sheets_folder: String,
    /// 批改结果输出目录
    pub results_folder: String,
    /// 学生档案 JSON 文件
    pub students_store_path: String,
    /// 失败记录文件
    pub failure_log_file: String,
    /// 自定义权重表 TOML 文件（可选）
    pub weights_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_sheets: 8,
            max_concurrent_judge_calls: 4,
            judge_timeout_secs: 30,
            use_remote_judge: true,
            diagnosis_threshold: 0.8,
            question_paper_path: "uploads/question-paper.txt".to_string(),
            answer_key_path: "outputs/answer_key.toml".to_string(),
            sheets_folder: "uploads".to_string(),
            results_folder: "data".to_string(),
            students_store_path: "data/students.json".to_string(),
            failure_log_file: "failures.txt".to_string(),
            weights_file: None,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-flash-latest".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // .env 文件是可选的
        let _ = dotenvy::dotenv();

        let default = Self::default();
        Self {
            max_concurrent_sheets: parse_env("MAX_CONCURRENT_SHEETS").unwrap_or(default.max_concurrent_sheets).max(1),
            max_concurrent_judge_calls: parse_env("MAX_CONCURRENT_JUDGE_CALLS").unwrap_or(default.max_concurrent_judge_calls).max(1),
            judge_timeout_secs: parse_env("JUDGE_TIMEOUT_SECS").unwrap_or(default.judge_timeout_secs),
            use_remote_judge: parse_env("USE_REMOTE_JUDGE").unwrap_or(default.use_remote_judge),
            diagnosis_threshold: parse_env("DIAGNOSIS_THRESHOLD").unwrap_or(default.diagnosis_threshold),
            question_paper_path: std::env::var("QUESTION_PAPER_PATH").unwrap_or(default.question_paper_path),
            answer_key_path: std::env::var("ANSWER_KEY_PATH").unwrap_or(default.answer_key_path),
            sheets_folder: std::env::var("SHEETS_FOLDER").unwrap_or(default.sheets_folder),
            results_folder: std::env::var("RESULTS_FOLDER").unwrap_or(default.results_folder),
            students_store_path: std::env::var("STUDENTS_STORE_PATH").unwrap_or(default.students_store_path),
            failure_log_file: std::env::var("FAILURE_LOG_FILE").unwrap_or(default.failure_log_file),
            weights_file: std::env::var("WEIGHTS_FILE").ok().filter(|v| !v.trim().is_empty()),
            verbose_logging: parse_env("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }

    /// 外部评判调用超时
    pub fn judge_timeout(&self) -> Duration {
        Duration::from_secs(self.judge_timeout_secs.max(1))
    }
}

/// 读取并解析环境变量，不存在或无法解析时返回 None
fn parse_env<T: std::str::FromStr>(var_name: &str) -> Option<T> {
    let raw = std::env::var(var_name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("环境变量 {} 的值 '{}' 无法解析，使用默认值", var_name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_and_timeout() {
        let config = Config::default();
        assert_eq!(config.diagnosis_threshold, 0.8);
        assert_eq!(config.judge_timeout(), Duration::from_secs(30));
        assert!(config.max_concurrent_sheets >= 1);
    }

    #[test]
    fn test_zero_timeout_is_raised_to_one_second() {
        let config = Config {
            judge_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.judge_timeout(), Duration::from_secs(1));
    }
}
