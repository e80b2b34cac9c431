//! 性能基准测试模块
//!
//! 用于测试大文档解析、序列化、影子树构建和路径提取的性能

use std::time::Instant;

use anyhow::Context;

use crate::codec::{parser, serializer};
use crate::model::config::JsonConfig;
use crate::model::element::JsonElement;
use crate::model::object::JsonObject;
use crate::model::shadow_tree::build_shadow_tree;
use crate::model::value::Value;

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 生成大型测试JSON数据
pub fn generate_large_json(depth: usize, width: usize) -> Value {
    fn create_nested_object(current_depth: usize, max_depth: usize, width: usize) -> Value {
        if current_depth >= max_depth {
            return Value::from("叶子节点值");
        }

        let obj: JsonObject = (0..width)
            .map(|i| {
                let value = match i % 5 {
                    0 => Value::from(format!("字符串值_{}", i)),
                    1 => Value::from(i as i64),
                    2 => Value::from(i % 2 == 0),
                    3 => Value::from(vec![Value::from(1), Value::from(2.5), Value::from(i as i64)]),
                    _ => create_nested_object(current_depth + 1, max_depth, width / 2),
                };
                (format!("field_{}", i), value)
            })
            .collect();
        Value::from(obj)
    }

    let metadata: JsonObject = [
        ("generated_at", Value::from("2025-01-09T10:00:00Z")),
        ("depth", Value::from(depth as i64)),
        ("width", Value::from(width as i64)),
        ("description", Value::from("性能测试用大型JSON文档")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let items: Vec<Value> = (0..width * 10)
        .map(|i| {
            let item: JsonObject = [
                ("id", Value::from(i as i64)),
                ("name", Value::from(format!("项目_{}", i))),
                ("value", Value::from((i * 2) as f64 / 3.0)),
                ("active", Value::from(i % 3 == 0)),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
            Value::from(item)
        })
        .collect();

    let root: JsonObject = [
        ("metadata", Value::from(metadata)),
        ("data", create_nested_object(0, depth, width)),
        ("items", Value::from(items)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    Value::from(root)
}

/// 测试JSON解析性能
pub fn benchmark_json_parsing(json_str: &str) -> PerformanceResult {
    let start = Instant::now();
    let parse_result = parser::parse(json_str, &JsonConfig::default());
    let duration = start.elapsed();

    match parse_result {
        Ok(_) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            true,
            &format!("解析了 {} 字节的JSON", json_str.len()),
        ),
        Err(e) => PerformanceResult::new("JSON解析", duration.as_millis(), false, &format!("解析失败: {}", e)),
    }
}

/// 测试影子树构建性能
pub fn benchmark_shadow_tree_build(json_data: &Value) -> PerformanceResult {
    let start = Instant::now();
    let tree = build_shadow_tree(json_data);
    let duration = start.elapsed();

    match tree {
        Ok(tree) => PerformanceResult::new(
            "影子树构建",
            duration.as_millis(),
            !tree.is_empty(),
            &format!("构建了 {} 个节点", tree.len()),
        ),
        Err(e) => PerformanceResult::new("影子树构建", duration.as_millis(), false, &format!("构建失败: {}", e)),
    }
}

/// 测试路径提取性能
pub fn benchmark_path_extraction(root: &Value, paths: &[&str]) -> Vec<PerformanceResult> {
    let root = JsonElement::from(root.clone());
    let mut results = Vec::new();

    for path in paths {
        let start = Instant::now();
        let extract_result = root
            .get_path(path)
            .and_then(|element| element.value().map(|v| v.to_json_string_pretty()).transpose());
        let duration = start.elapsed();

        let result = match extract_result {
            Ok(Some(json_str)) => PerformanceResult::new(
                &format!("路径提取: {}", path),
                duration.as_millis(),
                true,
                &format!("提取了 {} 字符", json_str.len()),
            ),
            Ok(None) => PerformanceResult::new(
                &format!("路径提取: {}", path),
                duration.as_millis(),
                false,
                "路径不存在",
            ),
            Err(e) => PerformanceResult::new(
                &format!("路径提取: {}", path),
                duration.as_millis(),
                false,
                &format!("提取失败: {}", e),
            ),
        };
        results.push(result);
    }

    results
}

/// 运行综合性能测试
pub fn run_performance_suite() -> anyhow::Result<Vec<PerformanceResult>> {
    let mut results = Vec::new();

    // 测试不同规模的数据
    let test_cases = [
        (3, 10), // 小型：深度3，宽度10
        (4, 20), // 中型：深度4，宽度20
        (5, 30), // 大型：深度5，宽度30
    ];

    for (depth, width) in test_cases {
        tracing::info!("测试规模：深度{}，宽度{}", depth, width);

        let start = Instant::now();
        let json_data = generate_large_json(depth, width);
        results.push(PerformanceResult::new(
            &format!("数据生成({}x{})", depth, width),
            start.elapsed().as_millis(),
            true,
            &format!("生成了深度{}宽度{}的JSON", depth, width),
        ));

        let start = Instant::now();
        let json_str = serializer::serialize(&json_data, false)
            .with_context(|| format!("序列化测试数据失败({}x{})", depth, width))?;
        results.push(PerformanceResult::new(
            &format!("JSON序列化({}x{})", depth, width),
            start.elapsed().as_millis(),
            true,
            &format!("序列化了 {} 字节", json_str.len()),
        ));

        let start = Instant::now();
        let pretty = serializer::serialize(&json_data, true)
            .with_context(|| format!("格式化序列化失败({}x{})", depth, width))?;
        results.push(PerformanceResult::new(
            &format!("JSON格式化序列化({}x{})", depth, width),
            start.elapsed().as_millis(),
            true,
            &format!("序列化了 {} 字节", pretty.len()),
        ));

        results.push(benchmark_json_parsing(&json_str));
        results.push(benchmark_shadow_tree_build(&json_data));

        let test_paths = ["", "metadata", "data", "items[0]", "items[0].name", "data.field_4.field_0"];
        results.extend(benchmark_path_extraction(&json_data, &test_paths));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test_logging() {
        let _ = tracing_subscriber::fmt::SubscriberBuilder::default()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_generate_large_json() {
        let json = generate_large_json(2, 3);
        let obj = json.as_object().expect("应该是对象");
        assert!(obj.contains_key("metadata"));
        assert!(obj.contains_key("data"));
        assert!(obj.contains_key("items"));
        assert_eq!(obj.get_array("items").unwrap().unwrap().len(), 30);
    }

    #[test]
    fn test_generated_json_round_trips() {
        let json = generate_large_json(3, 10);
        let text = serializer::serialize(&json, false).unwrap();
        assert_eq!(parser::parse(&text, &JsonConfig::default()).unwrap(), json);
    }

    #[test]
    fn test_performance_benchmarks() {
        init_test_logging();
        let json = generate_large_json(2, 5);

        let tree_result = benchmark_shadow_tree_build(&json);
        assert!(tree_result.success);
        assert!(tree_result.duration_ms < 1000); // 应该在1秒内完成

        let json_str = serializer::serialize(&json, false).unwrap();
        let parse_result = benchmark_json_parsing(&json_str);
        assert!(parse_result.success);
        assert!(parse_result.duration_ms < 1000); // 应该在1秒内完成

        let extraction = benchmark_path_extraction(&json, &["metadata.depth", "nope"]);
        assert!(extraction[0].success);
        assert!(!extraction[1].success, "不存在的路径应标记为失败");
    }

    #[test]
    fn test_performance_suite_runs() {
        init_test_logging();
        let results = run_performance_suite().expect("性能测试套件应该成功");
        assert!(results.iter().all(|r| r.success), "所有基准项都应成功: {:?}", results);
    }
}
