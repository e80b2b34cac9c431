//! JsonArray：有序值序列（共享句柄）

use std::cell::{Ref, RefCell};
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::model::data_core::JsonError;
use crate::model::element::JsonElement;
use crate::model::object::JsonObject;
use crate::model::value::{StructuralEq, Value, ValueKind};
use crate::model::JsonStructure;
use crate::utils::fs::{load_structure, store_structure};

/// JSON 数组；克隆得到同一数组的另一个句柄
#[derive(Clone, Default)]
pub struct JsonArray(Rc<RefCell<Vec<Value>>>);

impl JsonArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析 JSON 文本为数组；`null` 或空白文本得到空数组
    pub fn parse(text: &str) -> Result<Self, JsonError> {
        Self::from_value(crate::model::data_core::parse(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, JsonError> {
        let arr = Self::new();
        arr.load(path)?;
        Ok(arr)
    }

    pub(crate) fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Array(arr) => Ok(arr),
            other => Err(JsonError::TypeMismatch {
                expected: ValueKind::Array,
                found: other.kind(),
            }),
        }
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &JsonArray) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// 新建一个独立的数组，元素与当前相同；子容器仍与原数组共享
    pub fn shallow_copy(&self) -> JsonArray {
        JsonArray::from(self.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// 元素快照（浅拷贝）
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// 在 `index` 处插入；越界时返回 false 且不修改
    pub fn insert(&self, index: usize, value: impl Into<Value>) -> bool {
        let mut items = self.0.borrow_mut();
        if index > items.len() {
            return false;
        }
        items.insert(index, value.into());
        true
    }

    /// 替换 `index` 处的元素并返回旧值；越界时返回 `None`
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let mut items = self.0.borrow_mut();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value.into()))
    }

    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut items = self.0.borrow_mut();
        (index < items.len()).then(|| items.remove(index))
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// 返回下标对应槽位的访问器；越界时为 `JsonElement::EMPTY`
    pub fn get_element(&self, index: usize) -> JsonElement {
        self.get(index).map_or(JsonElement::EMPTY, JsonElement::Present)
    }

    pub fn get_object(&self, index: usize) -> Result<Option<JsonObject>, JsonError> {
        self.get_element(index).as_object()
    }

    pub fn get_array(&self, index: usize) -> Result<Option<JsonArray>, JsonError> {
        self.get_element(index).as_array()
    }

    pub fn get_string(&self, index: usize) -> Result<Option<String>, JsonError> {
        self.get_element(index).as_string()
    }

    pub fn get_bool(&self, index: usize) -> Result<Option<bool>, JsonError> {
        self.get_element(index).as_bool()
    }

    pub fn get_int(&self, index: usize) -> Result<Option<i32>, JsonError> {
        self.get_element(index).as_int()
    }

    pub fn get_long(&self, index: usize) -> Result<Option<i64>, JsonError> {
        self.get_element(index).as_long()
    }

    pub fn get_float(&self, index: usize) -> Result<Option<f32>, JsonError> {
        self.get_element(index).as_float()
    }

    pub fn get_double(&self, index: usize) -> Result<Option<f64>, JsonError> {
        self.get_element(index).as_double()
    }
}

impl JsonStructure for JsonArray {
    fn to_value(&self) -> Value {
        Value::Array(self.clone())
    }

    fn load(&self, path: &Path) -> Result<bool, JsonError> {
        self.clear();
        let Some(value) = load_structure(path)? else {
            return Ok(false);
        };
        let loaded = Self::from_value(value)?;
        let items = std::mem::take(&mut *loaded.0.borrow_mut());
        self.0.borrow_mut().extend(items);
        Ok(true)
    }

    fn store(&self, path: &Path) -> Result<bool, JsonError> {
        store_structure(path, &self.to_value())
    }
}

impl PartialEq for JsonArray {
    fn eq(&self, other: &Self) -> bool {
        StructuralEq::default().arrays(self, other)
    }
}

impl fmt::Debug for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json_string() {
            Ok(text) => write!(f, "JsonArray({text})"),
            Err(_) => write!(f, "JsonArray(<{} items, contains itself>)", self.len()),
        }
    }
}

impl From<Vec<Value>> for JsonArray {
    fn from(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }
}

impl FromIterator<Value> for JsonArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
