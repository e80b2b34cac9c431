//! 核心入口：错误类型与解析/序列化门面函数

use thiserror::Error;

use crate::codec::{parser, serializer};
use crate::model::config::JsonConfig;
use crate::model::value::{Value, ValueKind};

/// 解析错误：携带消息、期望/实际记号以及光标位置
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} ({position})")]
pub struct ParseError {
    pub message: String,
    pub expected: Option<String>,
    pub found: Option<String>,
    /// 字符偏移（从 0 开始）
    pub position: usize,
    /// 行号（从 1 开始）
    pub line: usize,
    /// 列号（从 1 开始）
    pub column: usize,
}

impl ParseError {
    pub fn expected_found(expected: impl Into<String>, found: impl Into<String>) -> Self {
        let expected = expected.into();
        let found = found.into();
        Self {
            message: format!("Expected '{expected}', found '{found}'"),
            expected: Some(expected),
            found: Some(found),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            found: None,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn at(mut self, position: usize, line: usize, column: usize) -> Self {
        self.position = position;
        self.line = line;
        self.column = column;
        self
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Json structure contains itself")]
    Cycle,
    #[error("Maximum nesting depth of {limit} exceeded")]
    NestingTooDeep { limit: usize },
    #[error("Expected '{expected}', found '{found}'")]
    TypeMismatch { expected: ValueKind, found: ValueKind },
    #[error("Json objects don't permit 'null' as key")]
    NullKey,
    #[error("Invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },
    #[error("Number {value} does not fit into {target}")]
    NumberOutOfRange { value: String, target: &'static str },
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置解析失败: {0}")]
    Config(#[from] serde_json::Error),
}

/// 使用默认配置解析 JSON 文本
pub fn parse(text: &str) -> Result<Value, JsonError> {
    parse_with(text, &JsonConfig::default())
}

pub fn parse_with(text: &str, config: &JsonConfig) -> Result<Value, JsonError> {
    Ok(parser::parse(text, config)?)
}

/// 序列化为文本；`formatted` 为 true 时按 4 空格缩进逐行输出
pub fn serialize(value: &Value, formatted: bool) -> Result<String, JsonError> {
    serializer::serialize(value, formatted)
}

pub fn serialize_with(value: &Value, formatted: bool, config: &JsonConfig) -> Result<String, JsonError> {
    serializer::serialize_with(value, formatted, config)
}
