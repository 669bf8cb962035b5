use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 题目/答案抽取错误（对单份文档是终止性的）
    #[error("抽取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 外部评判服务错误（始终在本地兜底，不会变成评分失败）
    #[error("评判服务错误: {0}")]
    Judge(#[from] JudgeError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 汇总错误
    #[error("汇总错误: {0}")]
    Aggregation(#[from] AggregationError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 题目/答案抽取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 文档中没有匹配到任何题目
    #[error("文档中未找到任何题目: {document}")]
    NoQuestionsFound { document: String },
    /// 题目分值无法解析
    #[error("第 {number} 题分值无法解析: '{raw}'")]
    InvalidMarks { number: u32, raw: String },
    /// 答题卡没有任何页面
    #[error("答题卡为空: {document}")]
    EmptySheet { document: String },
}

/// 外部评判服务错误
#[derive(Debug, Error)]
pub enum JudgeError {
    /// API 调用失败
    #[error("评判 API 调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: BoxedSource,
    },
    /// 调用超时
    #[error("评判 API 调用超时 (模型: {model}, {timeout_secs} 秒)")]
    Timeout { model: String, timeout_secs: u64 },
    /// 返回内容为空
    #[error("评判服务返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回内容无法解析为分数
    #[error("无法解析评判返回的分数: '{response}'")]
    UnparsableScore { response: String },
    /// 远程评判被禁用
    #[error("远程评判已禁用")]
    Disabled,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 权重为负数
    #[error("权重表 {table} 中 {metric} 的权重为负数: {weight}")]
    NegativeWeight {
        table: String,
        metric: String,
        weight: f64,
    },
    /// 权重总和为零
    #[error("权重表 {table} 的权重总和为零")]
    ZeroWeightSum { table: String },
    /// 未知的指标名称
    #[error("权重表 {table} 引用了未知指标: {metric}")]
    UnknownMetric { table: String, metric: String },
}

/// 汇总错误
#[derive(Debug, Error)]
pub enum AggregationError {
    /// 学生结果文件缺失
    #[error("学生结果文件缺失: {path}")]
    MissingResultFile { path: String },
    /// 结果文件为空
    #[error("结果文件不包含任何题目: {path}")]
    EmptyResults { path: String },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::Judge(JudgeError::ApiCallFailed {
            model: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 JSON 解析错误
    pub fn json_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建评判 API 调用错误
    pub fn judge_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Judge(JudgeError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_display() {
        let err: AppError = JudgeError::UnparsableScore {
            response: "four".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Judge(JudgeError::UnparsableScore { .. })));
        assert!(err.to_string().contains("four"));
    }

    #[test]
    fn test_io_error_maps_to_file_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }
}
