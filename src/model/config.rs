//! 解析与序列化的限制配置

use serde::{Deserialize, Serialize};

use crate::model::data_core::JsonError;

pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// 最大嵌套深度（解析与序列化共用）
    pub max_depth: usize,
    /// 输入最大字符数，`None` 表示不限制
    pub max_input_len: Option<usize>,
    /// 是否容忍顶层值之后的非空白内容
    pub allow_trailing_data: bool,
    /// 空白输入是否视为 `null`
    pub blank_as_null: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
            allow_trailing_data: false,
            blank_as_null: true,
        }
    }
}

impl JsonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文本读取配置，缺省字段取默认值
    pub fn from_json_str(text: &str) -> Result<Self, JsonError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = Some(max_input_len);
        self
    }

    pub fn with_trailing_data(mut self, allow: bool) -> Self {
        self.allow_trailing_data = allow;
        self
    }

    pub fn with_blank_as_null(mut self, blank_as_null: bool) -> Self {
        self.blank_as_null = blank_as_null;
        self
    }
}
