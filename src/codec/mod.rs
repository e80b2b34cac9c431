//! 文本编解码：解析器与序列化器

pub mod parser;
pub mod serializer;
