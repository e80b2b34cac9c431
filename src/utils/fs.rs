//! IO helper: safe file read/write for JSON

use std::io::ErrorKind;
use std::path::Path;

use crate::codec::{parser, serializer};
use crate::model::config::JsonConfig;
use crate::model::data_core::JsonError;
use crate::model::value::Value;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path, config: &JsonConfig) -> Result<Value, JsonError> {
    let text = std::fs::read_to_string(p)?;
    Ok(parser::parse(&text, config)?)
}

/// 将JSON数据保存到文件（格式化输出）
pub fn write_json_file(p: &Path, value: &Value, formatted: bool) -> Result<(), JsonError> {
    let text = serializer::serialize(value, formatted)?;
    std::fs::write(p, text)?;
    Ok(())
}

/// 容器加载入口：IO 失败降级为 `None`，其他错误照常返回
pub(crate) fn load_structure(p: &Path) -> Result<Option<Value>, JsonError> {
    match read_json_file(p, &JsonConfig::default()) {
        Ok(value) => {
            tracing::info!("JSON文件加载成功: {}，顶层类型: {}", p.display(), value.kind());
            Ok(Some(value))
        }
        Err(JsonError::Io(e)) => {
            if e.kind() == ErrorKind::NotFound {
                tracing::warn!("JSON文件不存在: {}", p.display());
            } else {
                tracing::warn!("JSON文件读取失败: {}，原因: {}", p.display(), e);
            }
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// 容器保存入口：只有 IO 失败返回 `Ok(false)`
pub(crate) fn store_structure(p: &Path, value: &Value) -> Result<bool, JsonError> {
    match write_json_file(p, value, true) {
        Ok(()) => {
            tracing::info!("JSON文件已保存到: {}", p.display());
            Ok(true)
        }
        Err(JsonError::Io(e)) => {
            tracing::warn!("JSON文件保存失败: {}，原因: {}", p.display(), e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
