//! 函数注册表
//!
//! 使用 DashMap 保存谓词函数，注册与查找可以并发进行。函数名统一转为小写保存。

use crate::error::{Result, RuleError};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 谓词函数：接收已求值的字符串参数，返回布尔结果
pub type PredicateFn = Arc<dyn Fn(&[String]) -> Result<bool> + Send + Sync>;

/// 函数注册表
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: Arc<DashMap<String, PredicateFn>>,
}

impl FunctionRegistry {
    /// 创建空注册表（不含内置函数）
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册函数，同名函数会被覆盖
    pub fn register<F>(&self, name: &str, predicate: F)
    where
        F: Fn(&[String]) -> Result<bool> + Send + Sync + 'static,
    {
        let key = name.to_lowercase();
        let replaced = self.functions.insert(key, Arc::new(predicate)).is_some();
        debug!(function = %name, replaced, "函数已注册");
    }

    /// 按名称查找函数，大小写不敏感
    ///
    /// 返回的是 `Arc` 副本，调用谓词期间不持有注册表的锁。
    pub fn lookup(&self, name: &str) -> Option<PredicateFn> {
        self.functions
            .get(&name.to_lowercase())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// 查找并调用函数
    pub fn call(&self, name: &str, args: &[String]) -> Result<bool> {
        let predicate = self
            .lookup(name)
            .ok_or_else(|| RuleError::FunctionNotFound(name.to_string()))?;
        predicate(args)
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.functions.remove(&name.to_lowercase()).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// 已注册的函数名（小写，已排序）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
