//! JsonObject：字符串键到值的映射（共享句柄，不允许空键）

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::model::array::JsonArray;
use crate::model::data_core::JsonError;
use crate::model::element::JsonElement;
use crate::model::value::{StructuralEq, Value, ValueKind};
use crate::model::JsonStructure;
use crate::utils::fs::{load_structure, store_structure};

/// 可转换为对象键的类型；`None` 表示空键，会被拒绝
pub trait IntoKey {
    fn into_key(self) -> Option<String>;
}

impl IntoKey for &str {
    fn into_key(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoKey for String {
    fn into_key(self) -> Option<String> {
        Some(self)
    }
}

impl IntoKey for &String {
    fn into_key(self) -> Option<String> {
        Some(self.clone())
    }
}

impl<K: IntoKey> IntoKey for Option<K> {
    fn into_key(self) -> Option<String> {
        self.and_then(IntoKey::into_key)
    }
}

fn require_key(key: impl IntoKey) -> Result<String, JsonError> {
    key.into_key().ok_or(JsonError::NullKey)
}

/// JSON 对象
///
/// 遍历按键的字典序进行，不保留插入顺序。克隆得到的是同一对象的另一个句柄；
/// 内部无锁，也不能跨线程共享。
#[derive(Clone, Default)]
pub struct JsonObject(Rc<RefCell<BTreeMap<String, Value>>>);

impl JsonObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析 JSON 文本为对象；`null` 或空白文本得到空对象
    pub fn parse(text: &str) -> Result<Self, JsonError> {
        Self::from_value(crate::model::data_core::parse(text)?)
    }

    /// 从文件读取对象，IO 失败时得到空对象
    pub fn from_file(path: &Path) -> Result<Self, JsonError> {
        let obj = Self::new();
        obj.load(path)?;
        Ok(obj)
    }

    pub(crate) fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(obj) => Ok(obj),
            other => Err(JsonError::TypeMismatch {
                expected: ValueKind::Object,
                found: other.kind(),
            }),
        }
    }

    /// 引用身份，用于序列化时的环检测
    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn borrow(&self) -> Ref<'_, BTreeMap<String, Value>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &JsonObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// 新建一个独立的对象，键值与当前相同；子容器仍与原对象共享
    pub fn shallow_copy(&self) -> JsonObject {
        JsonObject::from(self.0.borrow().clone())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// 键值对快照（值为浅拷贝）
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn insert(&self, key: impl IntoKey, value: impl Into<Value>) -> Result<Option<Value>, JsonError> {
        let key = require_key(key)?;
        Ok(self.0.borrow_mut().insert(key, value.into()))
    }

    /// 批量插入：先校验全部键，任一为空则不做任何修改
    pub fn put_all<K, V, I>(&self, entries: I) -> Result<(), JsonError>
    where
        K: IntoKey,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let checked = entries
            .into_iter()
            .map(|(k, v)| require_key(k).map(|k| (k, v.into())))
            .collect::<Result<Vec<_>, _>>()?;
        self.0.borrow_mut().extend(checked);
        Ok(())
    }

    /// 仅当键不存在时插入，返回已存在的值
    pub fn insert_if_absent(&self, key: impl IntoKey, value: impl Into<Value>) -> Result<Option<Value>, JsonError> {
        let key = require_key(key)?;
        let mut map = self.0.borrow_mut();
        if let Some(existing) = map.get(&key) {
            return Ok(Some(existing.clone()));
        }
        map.insert(key, value.into());
        Ok(None)
    }

    /// 按旧值计算新值；返回 `None` 时删除该键
    ///
    /// 回调执行期间不持有内部借用，可以安全地读取本对象。
    pub fn compute<F>(&self, key: impl IntoKey, remap: F) -> Result<Option<Value>, JsonError>
    where
        F: FnOnce(&str, Option<Value>) -> Option<Value>,
    {
        let key = require_key(key)?;
        let old = self.get(&key);
        let new = remap(&key, old);
        self.store_computed(key, new.clone());
        Ok(new)
    }

    pub fn compute_if_absent<F>(&self, key: impl IntoKey, mapping: F) -> Result<Option<Value>, JsonError>
    where
        F: FnOnce(&str) -> Option<Value>,
    {
        let key = require_key(key)?;
        if let Some(existing) = self.get(&key) {
            return Ok(Some(existing));
        }
        let new = mapping(&key);
        if let Some(value) = &new {
            self.0.borrow_mut().insert(key, value.clone());
        }
        Ok(new)
    }

    pub fn compute_if_present<F>(&self, key: impl IntoKey, remap: F) -> Result<Option<Value>, JsonError>
    where
        F: FnOnce(&str, Value) -> Option<Value>,
    {
        let key = require_key(key)?;
        let Some(old) = self.get(&key) else {
            return Ok(None);
        };
        let new = remap(&key, old);
        self.store_computed(key, new.clone());
        Ok(new)
    }

    fn store_computed(&self, key: String, value: Option<Value>) {
        let mut map = self.0.borrow_mut();
        match value {
            Some(value) => {
                map.insert(key, value);
            }
            None => {
                map.remove(&key);
            }
        }
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().remove(key)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// 返回键对应槽位的访问器；键不存在时为 `JsonElement::EMPTY`
    pub fn get_element(&self, key: &str) -> JsonElement {
        self.get(key).map_or(JsonElement::EMPTY, JsonElement::Present)
    }

    pub fn get_object(&self, key: &str) -> Result<Option<JsonObject>, JsonError> {
        self.get_element(key).as_object()
    }

    pub fn get_array(&self, key: &str) -> Result<Option<JsonArray>, JsonError> {
        self.get_element(key).as_array()
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>, JsonError> {
        self.get_element(key).as_string()
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, JsonError> {
        self.get_element(key).as_bool()
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i32>, JsonError> {
        self.get_element(key).as_int()
    }

    pub fn get_long(&self, key: &str) -> Result<Option<i64>, JsonError> {
        self.get_element(key).as_long()
    }

    pub fn get_float(&self, key: &str) -> Result<Option<f32>, JsonError> {
        self.get_element(key).as_float()
    }

    pub fn get_double(&self, key: &str) -> Result<Option<f64>, JsonError> {
        self.get_element(key).as_double()
    }
}

impl JsonStructure for JsonObject {
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    fn load(&self, path: &Path) -> Result<bool, JsonError> {
        self.clear();
        let Some(value) = load_structure(path)? else {
            return Ok(false);
        };
        let loaded = Self::from_value(value)?;
        let entries = std::mem::take(&mut *loaded.0.borrow_mut());
        self.0.borrow_mut().extend(entries);
        Ok(true)
    }

    fn store(&self, path: &Path) -> Result<bool, JsonError> {
        store_structure(path, &self.to_value())
    }
}

/// 结构相等；同一句柄直接判等
impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        StructuralEq::default().objects(self, other)
    }
}

// 借助序列化输出，自包含结构不会无限递归
impl fmt::Debug for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json_string() {
            Ok(text) => write!(f, "JsonObject({text})"),
            Err(_) => write!(f, "JsonObject(<{} entries, contains itself>)", self.len()),
        }
    }
}

impl From<BTreeMap<String, Value>> for JsonObject {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(Rc::new(RefCell::new(map)))
    }
}

impl FromIterator<(String, Value)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}
