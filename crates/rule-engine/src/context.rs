//! 评估上下文 - 变量名到字符串值的映射

use crate::error::{Result, RuleError};
use serde_json::Value;
use std::collections::HashMap;

/// 评估上下文
///
/// 变量名不带 `#{}` 标记。引擎在求值期间只读访问上下文。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    vars: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从扁平 JSON 对象创建
    ///
    /// 字符串原样保存，数值与布尔值转为文本，`null` 视为空字符串；
    /// 嵌套的数组或对象不受支持。
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Value =
            serde_json::from_str(json).map_err(|e| RuleError::InvalidContext(e.to_string()))?;
        Self::from_value(data)
    }

    pub fn from_value(data: Value) -> Result<Self> {
        let Value::Object(map) = data else {
            return Err(RuleError::InvalidContext(
                "上下文必须是 JSON 对象".to_string(),
            ));
        };

        let mut vars = HashMap::with_capacity(map.len());
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(RuleError::InvalidContext(format!(
                        "变量 '{}' 的值必须是标量",
                        key
                    )));
                }
            };
            vars.insert(key, text);
        }

        Ok(Self { vars })
    }

    /// 设置变量，返回旧值
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(name.into(), value.into())
    }

    /// 链式设置变量
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl From<HashMap<String, String>> for Context {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
