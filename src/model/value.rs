//! Value：JSON 值模型（六种类型的封闭枚举）

use std::collections::HashSet;
use std::fmt;

use crate::model::array::JsonArray;
use crate::model::data_core::JsonError;
use crate::model::object::JsonObject;

/// JSON 值的类型标签，用于错误信息与影子树展示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// 数字：区分整数与浮点数，保证往返时类型不变
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn is_integral(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

/// JSON 值
///
/// `Array` 与 `Object` 是共享句柄：克隆只复制引用，两个克隆指向同一节点。
/// 因此值图可以通过修改形成环，只有序列化时才会检测并拒绝。
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(JsonArray),
    Object(JsonObject),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// 紧凑序列化，遇到自包含结构时返回 `JsonError::Cycle`
    pub fn to_json_string(&self) -> Result<String, JsonError> {
        crate::codec::serializer::serialize(self, false)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, JsonError> {
        crate::codec::serializer::serialize(self, true)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        StructuralEq::default().values(self, other)
    }
}

/// 结构相等的比较器
///
/// 已比较过的 (左, 右) 容器对再次出现时视为相等，自包含的图因此也能终止。
/// 所有分支都是合取，任何一处不等都会让整体结果为 false。
#[derive(Default)]
pub(crate) struct StructuralEq {
    visited: HashSet<(usize, usize)>,
}

impl StructuralEq {
    pub(crate) fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => self.arrays(a, b),
            (Value::Object(a), Value::Object(b)) => self.objects(a, b),
            _ => false,
        }
    }

    pub(crate) fn arrays(&mut self, a: &JsonArray, b: &JsonArray) -> bool {
        if a.ptr_eq(b) || !self.visited.insert((a.identity(), b.identity())) {
            return true;
        }
        let (left, right) = (a.borrow(), b.borrow());
        left.len() == right.len() && left.iter().zip(right.iter()).all(|(l, r)| self.values(l, r))
    }

    pub(crate) fn objects(&mut self, a: &JsonObject, b: &JsonObject) -> bool {
        if a.ptr_eq(b) || !self.visited.insert((a.identity(), b.identity())) {
            return true;
        }
        let (left, right) = (a.borrow(), b.borrow());
        left.len() == right.len()
            && left
                .iter()
                .zip(right.iter())
                .all(|((lk, lv), (rk, rv))| lk == rk && self.values(lv, rv))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(Number::Int(i64::from(i)))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<JsonArray> for Value {
    fn from(a: JsonArray) -> Self {
        Value::Array(a)
    }
}

impl From<JsonObject> for Value {
    fn from(o: JsonObject) -> Self {
        Value::Object(o)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(JsonArray::from(items))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// === serde_json 互操作 ===

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(Number::Int(i)),
                // u64 超出 i64 范围或本身是浮点
                None => Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// 经由紧凑序列化转换，因此自包含结构同样返回 `JsonError::Cycle`
impl TryFrom<&Value> for serde_json::Value {
    type Error = JsonError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        let text = v.to_json_string()?;
        Ok(serde_json::from_str(&text)?)
    }
}
