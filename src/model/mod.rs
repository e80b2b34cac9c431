//! 数据模型：值、容器、访问器与路径

use std::path::Path;

pub mod array;
pub mod config;
pub mod data_core;
pub mod element;
pub mod object;
pub mod path;
#[cfg(test)]
mod performance;
pub mod shadow_tree;
pub mod value;

use data_core::JsonError;
use element::JsonElement;
use path::PathSegment;
use value::Value;

/// 容器共享的能力：序列化、路径查询、文件读写
pub trait JsonStructure {
    fn to_value(&self) -> Value;

    /// 从文件加载：IO 失败返回 `Ok(false)` 并保持为空，解析错误照常返回
    fn load(&self, path: &Path) -> Result<bool, JsonError>;

    /// 保存到文件：只有 IO 失败返回 `Ok(false)`
    fn store(&self, path: &Path) -> Result<bool, JsonError>;

    fn as_element(&self) -> JsonElement {
        JsonElement::Present(self.to_value())
    }

    fn serialize(&self, formatted: bool) -> Result<String, JsonError> {
        crate::codec::serializer::serialize(&self.to_value(), formatted)
    }

    fn to_json_string(&self) -> Result<String, JsonError> {
        self.serialize(false)
    }

    fn get_path(&self, path: &str) -> Result<JsonElement, JsonError> {
        self.as_element().get_path(path)
    }

    fn get_path_segments(&self, segments: &[PathSegment]) -> JsonElement {
        self.as_element().get_path_segments(segments)
    }
}
