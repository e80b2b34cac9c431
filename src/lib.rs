//! JSON值模型库
//!
//! 提供JSON文本解析、紧凑/缩进序列化（带环检测）以及支持路径查询的动态访问器。
//! 容器是单线程共享句柄，内部不加锁；跨线程使用需要调用方自行串行化。

pub mod codec;
pub mod model;
pub mod utils;

// 重新导出主要类型
pub use model::array::JsonArray;
pub use model::config::JsonConfig;
pub use model::data_core::{parse, parse_with, serialize, serialize_with, JsonError, ParseError};
pub use model::element::JsonElement;
pub use model::object::{IntoKey, JsonObject};
pub use model::path::PathSegment;
pub use model::shadow_tree::{build_shadow_tree, JsonTreeNode};
pub use model::value::{Number, Value, ValueKind};
pub use model::JsonStructure;
