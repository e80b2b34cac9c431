//! 路径表达式：`a.b[2].c`、`a[0][1]`、`[3].name`
//!
//! 标识符一直读到 `.` 或 `[` 为止，方括号内只允许非负整数。
//! `[` 前的 `.` 可省略（`a.[0]` 与 `a[0]` 等价），`]` 之后只能跟 `.`、`[` 或结束。

use std::fmt;

use crate::model::data_core::JsonError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// 键能否直接写进路径表达式
pub fn is_addressable_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '['])
}

/// 把段序列还原为路径表达式；含有无法表达的键时返回 `None`
pub fn format_path(segments: &[PathSegment]) -> Option<String> {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !is_addressable_key(key) {
                    return None;
                }
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(_) => out.push_str(&segment.to_string()),
        }
    }
    Some(out)
}

pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, JsonError> {
    let invalid = |message: String| JsonError::InvalidPath {
        path: path.to_string(),
        message,
    };

    let mut segments = Vec::new();
    let mut chars = path.char_indices().peekable();
    // 刚读过 '.'，下一段必须是标识符或下标
    let mut after_dot = false;
    // 刚读过 ']'，标识符前必须有 '.'
    let mut after_index = false;

    while let Some(&(start, c)) = chars.peek() {
        match c {
            '.' => {
                if segments.is_empty() || after_dot {
                    return Err(invalid(format!("Expected 'identifier', found '.' ({start})")));
                }
                chars.next();
                after_dot = true;
                continue;
            }
            '[' => {
                chars.next();
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some((_, ']')) => break,
                        Some((_, d)) if d.is_ascii_digit() => digits.push(d),
                        Some((i, other)) => {
                            return Err(invalid(format!("Expected ']', found '{other}' ({i})")));
                        }
                        None => return Err(invalid(format!("Expected ']', found 'end of input' ({})", path.len()))),
                    }
                }
                if digits.is_empty() {
                    return Err(invalid(format!("Expected 'index', found ']' ({start})")));
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|e| invalid(format!("Invalid index '{digits}': {e}")))?;
                segments.push(PathSegment::Index(index));
                after_dot = false;
                after_index = true;
                continue;
            }
            _ => {
                if after_index && !after_dot {
                    return Err(invalid(format!("Expected '.', found '{c}' ({start})")));
                }
                let mut end = path.len();
                while let Some(&(i, c)) = chars.peek() {
                    if c == '.' || c == '[' {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                segments.push(PathSegment::Key(path[start..end].to_string()));
            }
        }
        after_dot = false;
        after_index = false;
    }

    if after_dot {
        return Err(invalid(format!("Expected 'identifier', found 'end of input' ({})", path.len())));
    }
    Ok(segments)
}
