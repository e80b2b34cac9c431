//! JsonElement：对“可能不存在、可能为 null”的槽位的动态访问器
//!
//! 槽位有三种状态：不存在（唯一的 [`JsonElement::EMPTY`]）、存在但为 null、存在且有值。
//! 所有 `as_*` 转换对前两种状态都返回 `Ok(None)`，只有类型不符时才返回错误。

use crate::model::array::JsonArray;
use crate::model::data_core::JsonError;
use crate::model::object::JsonObject;
use crate::model::path::{parse_path, PathSegment};
use crate::model::value::{Number, Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonElement {
    #[default]
    Empty,
    Present(Value),
}

impl JsonElement {
    pub const EMPTY: JsonElement = JsonElement::Empty;

    /// `None` 映射为不存在，`Some(Value::Null)` 映射为存在的 null
    pub fn wrap(value: Option<Value>) -> Self {
        value.map_or(Self::EMPTY, JsonElement::Present)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, JsonElement::Present(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, JsonElement::Empty)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonElement::Present(Value::Null))
    }

    /// 槽位中存放的值（包括 null）
    pub fn value(&self) -> Option<&Value> {
        match self {
            JsonElement::Present(v) => Some(v),
            JsonElement::Empty => None,
        }
    }

    pub fn kind(&self) -> Option<ValueKind> {
        self.value().map(Value::kind)
    }

    /// 存在且非 null 时取值，否则返回 `default`
    pub fn or_else(self, default: impl Into<Value>) -> Value {
        match self {
            JsonElement::Present(v) if !v.is_null() => v,
            _ => default.into(),
        }
    }

    fn non_null(&self) -> Option<&Value> {
        self.value().filter(|v| !v.is_null())
    }

    // === 导航 ===

    /// 对象键步进；当前不是对象时得到 `EMPTY`
    pub fn get(&self, key: &str) -> JsonElement {
        match self.non_null() {
            Some(Value::Object(obj)) => obj.get_element(key),
            _ => Self::EMPTY,
        }
    }

    /// 数组下标步进；当前不是数组或越界时得到 `EMPTY`
    pub fn index(&self, index: usize) -> JsonElement {
        match self.non_null() {
            Some(Value::Array(arr)) => arr.get_element(index),
            _ => Self::EMPTY,
        }
    }

    /// 按路径表达式导航，缺失或不兼容的步骤不会报错，只会得到 `EMPTY`
    ///
    /// 只有路径本身语法错误时返回 `JsonError::InvalidPath`。
    pub fn get_path(&self, path: &str) -> Result<JsonElement, JsonError> {
        let segments = parse_path(path)?;
        Ok(self.get_path_segments(&segments))
    }

    pub fn get_path_segments(&self, segments: &[PathSegment]) -> JsonElement {
        let mut current = self.clone();
        for segment in segments {
            current = match segment {
                PathSegment::Key(key) => current.get(key),
                PathSegment::Index(index) => current.index(*index),
            };
            if current.is_empty() {
                break;
            }
        }
        current
    }

    // === 类型转换 ===

    fn mismatch(expected: ValueKind, found: &Value) -> JsonError {
        JsonError::TypeMismatch {
            expected,
            found: found.kind(),
        }
    }

    pub fn as_object(&self) -> Result<Option<JsonObject>, JsonError> {
        match self.non_null() {
            None => Ok(None),
            Some(Value::Object(obj)) => Ok(Some(obj.clone())),
            Some(other) => Err(Self::mismatch(ValueKind::Object, other)),
        }
    }

    pub fn as_array(&self) -> Result<Option<JsonArray>, JsonError> {
        match self.non_null() {
            None => Ok(None),
            Some(Value::Array(arr)) => Ok(Some(arr.clone())),
            Some(other) => Err(Self::mismatch(ValueKind::Array, other)),
        }
    }

    pub fn as_string(&self) -> Result<Option<String>, JsonError> {
        match self.non_null() {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Self::mismatch(ValueKind::String, other)),
        }
    }

    pub fn as_bool(&self) -> Result<Option<bool>, JsonError> {
        match self.non_null() {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(Self::mismatch(ValueKind::Bool, other)),
        }
    }

    fn as_number(&self) -> Result<Option<Number>, JsonError> {
        match self.non_null() {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(Self::mismatch(ValueKind::Number, other)),
        }
    }

    /// 浮点数向零截断；超出 i64 范围时返回 `NumberOutOfRange`
    pub fn as_long(&self) -> Result<Option<i64>, JsonError> {
        self.as_number()?.map(|n| integral(n, "i64")).transpose()
    }

    pub fn as_int(&self) -> Result<Option<i32>, JsonError> {
        self.as_number()?
            .map(|n| {
                let wide = integral(n, "i32")?;
                i32::try_from(wide).map_err(|_| out_of_range(n, "i32"))
            })
            .transpose()
    }

    pub fn as_double(&self) -> Result<Option<f64>, JsonError> {
        Ok(self.as_number()?.map(|n| n.as_f64()))
    }

    pub fn as_float(&self) -> Result<Option<f32>, JsonError> {
        self.as_number()?
            .map(|n| {
                let wide = n.as_f64();
                if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
                    return Err(out_of_range(n, "f32"));
                }
                Ok(wide as f32)
            })
            .transpose()
    }
}

fn out_of_range(n: Number, target: &'static str) -> JsonError {
    let value = match n {
        Number::Int(i) => i.to_string(),
        Number::Float(f) => f.to_string(),
    };
    JsonError::NumberOutOfRange { value, target }
}

fn integral(n: Number, target: &'static str) -> Result<i64, JsonError> {
    match n {
        Number::Int(i) => Ok(i),
        // 2^63 本身不可表示，因此上界取开区间
        Number::Float(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f.trunc() as i64),
        Number::Float(_) => Err(out_of_range(n, target)),
    }
}

impl From<Value> for JsonElement {
    fn from(value: Value) -> Self {
        JsonElement::Present(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::data_core::parse;
    use jsonpath_rust::JsonPath;
    use serde_json::json;

    fn sample() -> JsonElement {
        JsonElement::from(parse(r#"{"a":1,"b":[true,null,"x"],"c":{"d":[{"e":2.5},{"e":"深"}]},"n":null}"#).unwrap())
    }

    #[test]
    fn test_three_slot_states() {
        let root = sample();
        let absent = root.get("missing");
        let null = root.get("n");
        let present = root.get("a");

        assert!(absent.is_empty() && !absent.is_present());
        assert_eq!(absent, JsonElement::EMPTY);
        assert!(null.is_present() && null.is_null());
        assert_ne!(null, JsonElement::EMPTY, "显式null与不存在应区分");
        assert!(present.is_present() && !present.is_null());
        assert_eq!(present.kind(), Some(ValueKind::Number));
    }

    #[test]
    fn test_absent_and_null_coerce_to_none() {
        let root = sample();
        for element in [root.get("missing"), root.get("n")] {
            assert_eq!(element.as_object().unwrap(), None);
            assert_eq!(element.as_array().unwrap(), None);
            assert_eq!(element.as_string().unwrap(), None);
            assert_eq!(element.as_bool().unwrap(), None);
            assert_eq!(element.as_int().unwrap(), None);
            assert_eq!(element.as_long().unwrap(), None);
            assert_eq!(element.as_float().unwrap(), None);
            assert_eq!(element.as_double().unwrap(), None);
        }
    }

    #[test]
    fn test_mismatch_names_both_kinds() {
        let root = sample();
        let err = root.get("b").as_object().unwrap_err();
        assert!(matches!(err, JsonError::TypeMismatch { expected: ValueKind::Object, found: ValueKind::Array }));
        let err = root.get("a").as_string().unwrap_err();
        assert_eq!(err.to_string(), "Expected 'string', found 'number'");
        assert!(root.get("c").as_double().is_err());
    }

    #[test]
    fn test_numeric_coercions() {
        let e = JsonElement::from(Value::from(-2.9));
        assert_eq!(e.as_long().unwrap(), Some(-2));
        assert_eq!(e.as_int().unwrap(), Some(-2));
        assert_eq!(e.as_double().unwrap(), Some(-2.9));

        let big = JsonElement::from(Value::from(i64::MAX));
        assert_eq!(big.as_long().unwrap(), Some(i64::MAX));
        assert!(matches!(big.as_int(), Err(JsonError::NumberOutOfRange { target: "i32", .. })));

        let huge = JsonElement::from(Value::from(1e300));
        assert!(matches!(huge.as_long(), Err(JsonError::NumberOutOfRange { target: "i64", .. })));
        assert!(matches!(huge.as_float(), Err(JsonError::NumberOutOfRange { target: "f32", .. })));

        let nan = JsonElement::from(Value::from(f64::NAN));
        assert!(nan.as_long().is_err());
    }

    #[test]
    fn test_get_path_examples() {
        let root = sample();
        assert_eq!(root.get_path("b[2]").unwrap().as_string().unwrap(), Some("x".to_string()));
        let missing = root.get_path("b[5]").unwrap();
        assert_eq!(missing, JsonElement::EMPTY);
        assert_eq!(missing.as_string().unwrap(), None);
        assert_eq!(root.get_path("c.d[1].e").unwrap().as_string().unwrap(), Some("深".to_string()));
        assert_eq!(root.get_path("c.d[0].e").unwrap().as_double().unwrap(), Some(2.5));
    }

    #[test]
    fn test_get_path_never_raises_for_missing() {
        let root = sample();
        for path in ["missing.x.y", "a.b", "a[0]", "b.key", "n.x", "n[0]", "b[1].x", "c.d[9].e"] {
            let element = root.get_path(path).unwrap();
            assert!(element.is_empty(), "路径 {path} 应得到EMPTY");
            assert_eq!(element.as_object().unwrap(), None);
        }
        assert!(JsonElement::EMPTY.get_path("a.b[0]").unwrap().is_empty());
    }

    #[test]
    fn test_empty_path_returns_current() {
        let root = sample();
        assert_eq!(root.get_path("").unwrap(), root);
        assert_eq!(JsonElement::EMPTY.get_path("").unwrap(), JsonElement::EMPTY);
    }

    #[test]
    fn test_invalid_path_syntax() {
        assert!(matches!(sample().get_path("b[x]"), Err(JsonError::InvalidPath { .. })));
    }

    #[test]
    fn test_path_segments() {
        let root = sample();
        let segments = [PathSegment::from("b"), PathSegment::from(2usize)];
        assert_eq!(root.get_path_segments(&segments).as_string().unwrap(), Some("x".to_string()));
    }

    #[test]
    fn test_or_else() {
        let root = sample();
        assert_eq!(root.get("missing").or_else(7), Value::from(7));
        assert_eq!(root.get("n").or_else("d"), Value::from("d"));
        assert_eq!(root.get("a").or_else(7), Value::from(1));
    }

    #[test]
    fn test_matches_jsonpath_queries() {
        let source = json!({
            "a": 1,
            "b": [true, null, "x"],
            "c": {"d": [{"e": 2.5}, {"e": "深"}]}
        });
        let root = JsonElement::from(Value::from(source.clone()));

        for path in ["a", "b", "b[0]", "b[1]", "b[2]", "b[5]", "c.d", "c.d[1].e", "missing.x", "a.b", "c.d[0]"] {
            let json_path = format!("$.{path}");
            let hits: Vec<&serde_json::Value> = source.query(&json_path).expect("JSONPath应该有效");
            let ours = root.get_path(path).unwrap();
            let converted = ours.value().map(|v| serde_json::Value::try_from(v).unwrap());
            assert_eq!(converted.as_ref(), hits.first().copied(), "路径 {path} 的结果应与JSONPath一致");
        }
    }
}
