//! 影子树（Shadow Tree）：仅存结构与路径，不复制大值，助于大文件导航

use std::collections::HashSet;

use crate::model::config::JsonConfig;
use crate::model::data_core::JsonError;
use crate::model::path::{format_path, PathSegment};
use crate::model::value::{Value, ValueKind};

#[derive(Debug, Clone)]
pub struct JsonTreeNode {
    /// 节点在父级中的键名或索引的字符串形式
    pub name: String,
    /// 可直接传给 `get_path` 的路径；键含 `.`/`[` 或为空时无法表达
    pub path: Option<String>,
    /// 节点类型
    pub kind: ValueKind,
    /// 子元素数量（对象字段数 / 数组长度）
    pub children: usize,
    /// 轻量预览（字符串截断、数字/布尔/空的简短描述）
    pub preview: String,
    /// 节点深度
    pub depth: usize,
}

fn preview_of(v: &Value) -> Result<String, JsonError> {
    Ok(match v {
        Value::String(s) => {
            let s = s.trim();
            if s.chars().count() > 32 {
                let truncated: String = s.chars().take(32).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => v.to_json_string()?,
        Value::Object(m) => format!("{{..}} ({} keys)", m.len()),
        Value::Array(a) => format!("[..] ({} items)", a.len()),
    })
}

struct Walker {
    out: Vec<JsonTreeNode>,
    trail: Vec<PathSegment>,
    in_progress: HashSet<usize>,
    max_depth: usize,
}

impl Walker {
    fn push_node(&mut self, name: String, v: &Value) -> Result<(), JsonError> {
        let children = match v {
            Value::Object(m) => m.len(),
            Value::Array(a) => a.len(),
            _ => 0,
        };
        self.out.push(JsonTreeNode {
            name,
            path: format_path(&self.trail),
            kind: v.kind(),
            children,
            preview: preview_of(v)?,
            depth: self.trail.len(),
        });
        Ok(())
    }

    fn enter(&mut self, id: usize) -> Result<(), JsonError> {
        if self.trail.len() >= self.max_depth {
            return Err(JsonError::NestingTooDeep { limit: self.max_depth });
        }
        if !self.in_progress.insert(id) {
            return Err(JsonError::Cycle);
        }
        Ok(())
    }

    fn walk(&mut self, v: &Value, name: String) -> Result<(), JsonError> {
        self.push_node(name, v)?;
        match v {
            Value::Object(map) => {
                self.enter(map.identity())?;
                for (k, child) in map.entries() {
                    self.trail.push(PathSegment::Key(k.clone()));
                    self.walk(&child, k)?;
                    self.trail.pop();
                }
                self.in_progress.remove(&map.identity());
            }
            Value::Array(arr) => {
                self.enter(arr.identity())?;
                for (idx, child) in arr.to_vec().iter().enumerate() {
                    self.trail.push(PathSegment::Index(idx));
                    self.walk(child, format!("[{}]", idx))?;
                    self.trail.pop();
                }
                self.in_progress.remove(&arr.identity());
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
        Ok(())
    }
}

/// 从根 Value 构建全树影子索引（先序），遇到自包含结构时返回 `JsonError::Cycle`
pub fn build_shadow_tree(root: &Value) -> Result<Vec<JsonTreeNode>, JsonError> {
    let mut walker = Walker {
        out: Vec::with_capacity(1024),
        trail: Vec::new(),
        in_progress: HashSet::new(),
        max_depth: JsonConfig::default().max_depth,
    };
    walker.walk(root, "$".to_string())?;
    tracing::debug!("影子树构建完成: {} 个节点", walker.out.len());
    Ok(walker.out)
}
