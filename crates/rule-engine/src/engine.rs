//! 规则引擎门面
//!
//! 持有函数注册表，负责一次求值中的 词法分析 → 解析 → 求值 流程。
//! 每次调用都会重新解析表达式，语法树不会被缓存。

use crate::ast::Node;
use crate::builtins::{register_builtins, register_extended};
use crate::context::Context;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::registry::FunctionRegistry;
use crate::token::Token;
use rule_shared::config::EngineConfig;
use tracing::{debug, instrument, trace};

/// 规则引擎
///
/// 注册表内部是并发安全的，`RuleEngine` 可以放进 `Arc` 在多个线程间共享。
/// 推荐先完成全部函数注册，再开始并发求值。
#[derive(Debug)]
pub struct RuleEngine {
    registry: FunctionRegistry,
    config: EngineConfig,
}

impl RuleEngine {
    /// 使用默认配置创建引擎，并注册内置函数
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let registry = FunctionRegistry::new();
        register_builtins(&registry);
        if config.extended_functions {
            register_extended(&registry);
        }

        debug!(
            functions = registry.len(),
            strict_end = config.strict_end,
            strict_strings = config.strict_strings,
            short_circuit = config.short_circuit,
            "规则引擎已创建"
        );

        Self { registry, config }
    }

    /// 注册函数，函数名大小写不敏感，同名函数会被覆盖
    pub fn register_function<F>(&self, name: &str, predicate: F)
    where
        F: Fn(&[String]) -> Result<bool> + Send + Sync + 'static,
    {
        self.registry.register(name, predicate);
    }

    /// 评估表达式
    ///
    /// 任何词法、语法或求值错误都会原样返回给调用方。
    #[instrument(level = "trace", skip(self, context), fields(vars = context.len()))]
    pub fn evaluate(&self, expression: &str, context: &Context) -> Result<bool> {
        let root = self.parse(expression)?;

        let matched = Evaluator::new(context, &self.registry)
            .with_short_circuit(self.config.short_circuit)
            .eval_bool(&root)?;

        trace!(matched, "表达式求值完成");
        Ok(matched)
    }

    /// 解析表达式为语法树
    ///
    /// 默认忽略完整表达式之后的剩余记号；开启 `strict_end` 时要求读到输入末尾。
    pub fn parse(&self, expression: &str) -> Result<Node> {
        let mut parser = Parser::new(self.lexer(expression))?;
        let root = parser.parse_expression()?;

        if self.config.strict_end {
            parser.expect_end()?;
        }

        Ok(root)
    }

    /// 扫描表达式的全部记号
    pub fn tokenize(&self, expression: &str) -> Result<Vec<Token>> {
        self.lexer(expression).tokenize()
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn lexer<'a>(&self, expression: &'a str) -> Lexer<'a> {
        Lexer::new(expression).with_strict_strings(self.config.strict_strings)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::token::TokenKind;

    fn sample_context() -> Context {
        Context::new()
            .with("a", "你好")
            .with("b", "hello, world, xxxx")
    }

    #[test]
    fn test_sample_expressions() {
        let engine = RuleEngine::new();
        let ctx = sample_context();

        let cases = [
            (
                "(contains(#{a}, '好') or contains(#{a}, 'yyy') ) and containsAny(#{b}, 'xxx', '22')",
                true,
            ),
            ("(contains(#{a}, 'xxx')) and containsAny(#{b}, 'xxx', '22')", false),
            ("(not contains(#{a}, 'xxx')) and containsAny(#{b}, 'xxxx', '22')", true),
            ("(contains(#{a}, 'contains')) and containsAny(#{b}, 'xxxx', '22')", false),
        ];

        for (expr, expected) in cases {
            assert_eq!(engine.evaluate(expr, &ctx).unwrap(), expected, "{}", expr);
        }
    }

    #[test]
    fn test_builtins_installed() {
        let engine = RuleEngine::new();
        assert_eq!(
            engine.registry().names(),
            vec!["contains".to_string(), "containsany".to_string()]
        );
    }

    #[test]
    fn test_extended_functions_opt_in() {
        let ctx = Context::new().with("url", "https://example.com");

        let engine = RuleEngine::new();
        let result = engine.evaluate("startsWith(#{url}, 'https')", &ctx);
        assert!(matches!(result, Err(RuleError::FunctionNotFound(_))));

        let engine = RuleEngine::with_config(EngineConfig {
            extended_functions: true,
            ..EngineConfig::default()
        });
        assert!(engine.evaluate("startsWith(#{url}, 'https')", &ctx).unwrap());
    }

    #[test]
    fn test_register_custom_function() {
        let engine = RuleEngine::new();
        engine.register_function("IsVip", |args| match args {
            [level] => Ok(level == "gold" || level == "platinum"),
            _ => Err(RuleError::arity("isVip", "1", args.len())),
        });

        let ctx = Context::new().with("level", "gold");
        assert!(engine.evaluate("isvip(#{level})", &ctx).unwrap());
        assert!(engine.evaluate("ISVIP(#{level}) and not isVip('silver')", &ctx).unwrap());

        let result = engine.evaluate("isVip()", &ctx);
        assert!(matches!(result, Err(RuleError::Arity { actual: 0, .. })));
    }

    #[test]
    fn test_register_overrides_builtin() {
        let engine = RuleEngine::new();
        engine.register_function("CONTAINS", |args| {
            Ok(args[0].to_lowercase().contains(&args[1].to_lowercase()))
        });

        let ctx = Context::new().with("s", "Hello");
        assert!(engine.evaluate("contains(#{s}, 'hello')", &ctx).unwrap());
    }

    #[test]
    fn test_trailing_tokens_lenient_and_strict() {
        let ctx = sample_context();
        let expr = "contains(#{a}, '好') contains(#{a}, 'x')";

        assert!(RuleEngine::new().evaluate(expr, &ctx).unwrap());

        let strict = RuleEngine::with_config(EngineConfig {
            strict_end: true,
            ..EngineConfig::default()
        });
        let result = strict.evaluate(expr, &ctx);
        assert!(matches!(
            result,
            Err(RuleError::TokenMismatch {
                expected: TokenKind::End,
                found: TokenKind::Identifier,
                ..
            })
        ));
    }

    #[test]
    fn test_unterminated_string_lenient_and_strict() {
        let ctx = sample_context();
        let expr = "contains(#{b}, 'world";

        // 宽松模式下字符串读到末尾，随后缺少 ')'
        let result = RuleEngine::new().evaluate(expr, &ctx);
        assert!(matches!(
            result,
            Err(RuleError::TokenMismatch {
                expected: TokenKind::RParen,
                ..
            })
        ));

        let strict = RuleEngine::with_config(EngineConfig {
            strict_strings: true,
            ..EngineConfig::default()
        });
        let result = strict.evaluate(expr, &ctx);
        assert!(matches!(
            result,
            Err(RuleError::UnterminatedString { position: 15 })
        ));
    }

    #[test]
    fn test_parse_does_not_evaluate() {
        let engine = RuleEngine::new();
        let node = engine.parse("fooBar(#{missing})").unwrap();
        assert_eq!(node.variables().len(), 1);
    }

    #[test]
    fn test_tokenize() {
        let engine = RuleEngine::new();
        let tokens = engine.tokenize("not #{a}").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Not, TokenKind::Identifier, TokenKind::End]
        );
    }
}
