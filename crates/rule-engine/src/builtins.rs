//! 内置谓词函数
//!
//! `contains` 与 `containsAny` 在引擎创建时总是注册；其余字符串函数为可选扩展，
//! 通过 `extended_functions` 配置启用。所有比较均区分大小写，不做区域化处理。

use crate::error::{Result, RuleError};
use crate::registry::FunctionRegistry;
use regex::Regex;

/// 注册基础内置函数
pub fn register_builtins(registry: &FunctionRegistry) {
    registry.register("contains", contains);
    registry.register("containsAny", contains_any);
}

/// 注册扩展函数
pub fn register_extended(registry: &FunctionRegistry) {
    registry.register("containsAll", contains_all);
    registry.register("startsWith", starts_with);
    registry.register("endsWith", ends_with);
    registry.register("equals", equals);
    registry.register("isEmpty", is_empty);
    registry.register("matches", regex_match);
}

/// 参数个数必须恰好为 `expected`
fn exact_arity(function: &str, args: &[String], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(RuleError::arity(function, expected.to_string(), args.len()));
    }
    Ok(())
}

/// 参数个数至少为 `min`
fn min_arity(function: &str, args: &[String], min: usize) -> Result<()> {
    if args.len() < min {
        return Err(RuleError::arity(function, format!("至少 {}", min), args.len()));
    }
    Ok(())
}

/// contains(haystack, needle)
fn contains(args: &[String]) -> Result<bool> {
    exact_arity("contains", args, 2)?;
    Ok(args[0].contains(args[1].as_str()))
}

/// containsAny(haystack, needle1, needle2, ...)，命中第一个即返回
fn contains_any(args: &[String]) -> Result<bool> {
    min_arity("containsAny", args, 2)?;
    let haystack = &args[0];
    Ok(args[1..].iter().any(|needle| haystack.contains(needle.as_str())))
}

/// containsAll(haystack, needle1, needle2, ...)
fn contains_all(args: &[String]) -> Result<bool> {
    min_arity("containsAll", args, 2)?;
    let haystack = &args[0];
    Ok(args[1..].iter().all(|needle| haystack.contains(needle.as_str())))
}

fn starts_with(args: &[String]) -> Result<bool> {
    exact_arity("startsWith", args, 2)?;
    Ok(args[0].starts_with(args[1].as_str()))
}

fn ends_with(args: &[String]) -> Result<bool> {
    exact_arity("endsWith", args, 2)?;
    Ok(args[0].ends_with(args[1].as_str()))
}

fn equals(args: &[String]) -> Result<bool> {
    exact_arity("equals", args, 2)?;
    Ok(args[0] == args[1])
}

fn is_empty(args: &[String]) -> Result<bool> {
    exact_arity("isEmpty", args, 1)?;
    Ok(args[0].is_empty())
}

/// matches(text, pattern)，pattern 为正则表达式，未锚定时匹配任意位置
fn regex_match(args: &[String]) -> Result<bool> {
    exact_arity("matches", args, 2)?;
    let re = Regex::new(&args[1]).map_err(|e| {
        RuleError::function_failed("matches", format!("正则表达式无效: {}", e))
    })?;
    Ok(re.is_match(&args[0]))
}
