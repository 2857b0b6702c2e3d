//! 规则引擎命令行工具
//!
//! 针对命令行给出的变量上下文评估表达式并输出 `true` / `false`。
//! 不带表达式运行时执行内置示例。
//!
//! ```bash
//! rule-engine --var a=你好 --var "b=hello, world" "contains(#{a}, '好') and containsAny(#{b}, 'xxx', 'world')"
//! rule-engine --context ctx.json --ast "not contains(#{user}, 'bot')"
//! ```

use anyhow::{Context as _, Result};
use clap::Parser;
use rule_engine::{Context, RuleEngine};
use rule_shared::config::AppConfig;
use rule_shared::observability;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 表达式规则引擎命令行工具
#[derive(Parser, Debug)]
#[command(name = "rule-engine")]
#[command(version, about = "表达式规则引擎")]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，默认取配置文件
    #[arg(short, long)]
    log_level: Option<String>,

    /// 上下文变量，格式 name=value，可重复
    #[arg(short, long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// 从 JSON 文件加载上下文（扁平对象），--var 会覆盖同名变量
    #[arg(short, long, value_name = "FILE")]
    context: Option<PathBuf>,

    /// 输出语法树（JSON）
    #[arg(long)]
    ast: bool,

    /// 输出记号序列
    #[arg(long)]
    tokens: bool,

    /// 严格模式：要求表达式完整读到末尾，字符串常量必须闭合
    #[arg(long)]
    strict: bool,

    /// 启用扩展函数
    #[arg(long)]
    extended: bool,

    /// 待评估的表达式，省略时运行内置示例
    expression: Option<String>,
}

fn parse_var(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("变量格式应为 name=value: '{}'", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load("rule-engine").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig {
            service_name: "rule-engine".to_string(),
            ..AppConfig::default()
        }
    });

    let mut obs_config = config.observability.clone();
    if let Some(level) = &cli.log_level {
        obs_config = obs_config.with_log_level(level.clone());
    }
    observability::init(&obs_config)?;

    let mut engine_config = config.engine.clone();
    if cli.strict {
        engine_config.strict_end = true;
        engine_config.strict_strings = true;
    }
    if cli.extended {
        engine_config.extended_functions = true;
    }
    let engine = RuleEngine::with_config(engine_config);

    match &cli.expression {
        Some(expression) => {
            let context = build_context(&cli)?;
            run_expression(&engine, &cli, expression, &context)
        }
        None => run_sample(&engine),
    }
}

fn build_context(cli: &Cli) -> Result<Context> {
    let mut context = match &cli.context {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("读取上下文文件失败: {}", path.display()))?;
            Context::from_json(&json)
                .with_context(|| format!("解析上下文文件失败: {}", path.display()))?
        }
        None => Context::new(),
    };

    for (name, value) in &cli.vars {
        if context.insert(name.clone(), value.clone()).is_some() {
            warn!(variable = %name, "命令行变量覆盖了上下文文件中的值");
        }
    }

    debug!(vars = context.len(), "上下文已构建");
    Ok(context)
}

fn run_expression(engine: &RuleEngine, cli: &Cli, expression: &str, context: &Context) -> Result<()> {
    if cli.tokens {
        for token in engine.tokenize(expression)? {
            println!("{:>4}  {}", token.position, token);
        }
    }

    if cli.ast {
        let root = engine.parse(expression)?;
        println!("{}", serde_json::to_string_pretty(&root)?);
    }

    let matched = engine
        .evaluate(expression, context)
        .with_context(|| format!("表达式求值失败: {}", expression))?;
    println!("{}", matched);
    Ok(())
}

/// 内置示例
fn run_sample(engine: &RuleEngine) -> Result<()> {
    let context = Context::new()
        .with("a", "你好")
        .with("b", "hello, world, xxxx");

    let expressions = [
        "(contains(#{a}, '好') or contains(#{a}, 'yyy') ) and containsAny(#{b}, 'xxx', '22')",
        "(contains(#{a}, 'xxx')) and containsAny(#{b}, 'xxx', '22')",
        "(not contains(#{a}, 'xxx')) and containsAny(#{b}, 'xxxx', '22')",
        "(contains(#{a}, 'contains')) and containsAny(#{b}, 'xxxx', '22')",
    ];

    for expression in expressions {
        let matched = engine.evaluate(expression, &context)?;
        println!("{} => {}", expression, matched);
    }

    Ok(())
}
