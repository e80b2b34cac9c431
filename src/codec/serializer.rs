//! 序列化器：紧凑/缩进两种输出，按引用身份检测自包含结构

use std::collections::HashSet;
use std::fmt::Write;

use crate::model::config::JsonConfig;
use crate::model::data_core::JsonError;
use crate::model::value::{Number, Value};

const INDENT: &str = "    ";

pub fn serialize(value: &Value, formatted: bool) -> Result<String, JsonError> {
    serialize_with(value, formatted, &JsonConfig::default())
}

pub fn serialize_with(value: &Value, formatted: bool, config: &JsonConfig) -> Result<String, JsonError> {
    let mut writer = Writer {
        out: String::new(),
        formatted,
        max_depth: config.max_depth,
        in_progress: HashSet::new(),
    };
    writer.write_value(value, 0)?;
    tracing::debug!("序列化完成，输出长度: {} 字节", writer.out.len());
    Ok(writer.out)
}

struct Writer {
    out: String,
    formatted: bool,
    max_depth: usize,
    /// 正在序列化的容器（按指针身份）
    in_progress: HashSet<usize>,
}

impl Writer {
    fn write_value(&mut self, value: &Value, level: usize) -> Result<(), JsonError> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write_number(&mut self.out, *n),
            Value::String(s) => write_string(&mut self.out, s),
            Value::Array(arr) => {
                self.enter(arr.identity(), level)?;
                let items = arr.borrow();
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    self.separate(i, level + 1);
                    self.write_value(item, level + 1)?;
                }
                self.close(']', items.len(), level);
                self.in_progress.remove(&arr.identity());
            }
            Value::Object(obj) => {
                self.enter(obj.identity(), level)?;
                let members = obj.borrow();
                self.out.push('{');
                for (i, (key, child)) in members.iter().enumerate() {
                    self.separate(i, level + 1);
                    write_string(&mut self.out, key);
                    self.out.push_str(if self.formatted { ": " } else { ":" });
                    self.write_value(child, level + 1)?;
                }
                self.close('}', members.len(), level);
                self.in_progress.remove(&obj.identity());
            }
        }
        Ok(())
    }

    fn enter(&mut self, id: usize, level: usize) -> Result<(), JsonError> {
        if level >= self.max_depth {
            return Err(JsonError::NestingTooDeep { limit: self.max_depth });
        }
        if !self.in_progress.insert(id) {
            return Err(JsonError::Cycle);
        }
        Ok(())
    }

    fn separate(&mut self, index: usize, level: usize) {
        if index > 0 {
            self.out.push(',');
        }
        self.newline(level);
    }

    fn close(&mut self, bracket: char, len: usize, level: usize) {
        if len > 0 {
            self.newline(level);
        }
        self.out.push(bracket);
    }

    fn newline(&mut self, level: usize) {
        if self.formatted {
            self.out.push('\n');
            for _ in 0..level {
                self.out.push_str(INDENT);
            }
        }
    }
}

fn write_number(out: &mut String, n: Number) {
    match n {
        Number::Int(i) => {
            let _ = write!(out, "{i}");
        }
        // 非有限浮点数在 JSON 中无法表示
        Number::Float(f) if !f.is_finite() => out.push_str("null"),
        // Debug 输出最短往返形式，且总带有 '.' 或指数
        Number::Float(f) => {
            let _ = write!(out, "{f:?}");
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
