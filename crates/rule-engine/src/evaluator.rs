//! 语法树求值
//!
//! 每个节点支持两种求值方式：
//! - 布尔求值：逻辑节点与函数节点直接得到布尔值；值节点先求字符串，非空即为 true
//! - 字符串求值：只有值节点支持，其余节点返回 [`RuleError::NotString`]
//!
//! 函数参数总是按字符串求值后再交给注册表中的谓词。

use crate::ast::{FunctionNode, LogicalNode, Node, ValueNode};
use crate::context::Context;
use crate::error::{Result, RuleError};
use crate::registry::FunctionRegistry;

/// 语法树求值器
pub struct Evaluator<'a> {
    context: &'a Context,
    registry: &'a FunctionRegistry,
    /// and / or 是否在左操作数可以决定结果时跳过右操作数，默认两侧都求值
    short_circuit: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a Context, registry: &'a FunctionRegistry) -> Self {
        Self {
            context,
            registry,
            short_circuit: false,
        }
    }

    pub fn with_short_circuit(mut self, enabled: bool) -> Self {
        self.short_circuit = enabled;
        self
    }

    /// 布尔求值
    pub fn eval_bool(&self, node: &Node) -> Result<bool> {
        match node {
            Node::Logical(logical) => self.eval_logical(logical),
            Node::Value(value) => Ok(!self.eval_value(value)?.is_empty()),
            Node::Function(func) => self.eval_function(func),
        }
    }

    /// 字符串求值
    pub fn eval_string(&self, node: &Node) -> Result<String> {
        match node {
            Node::Value(value) => self.eval_value(value).map(str::to_string),
            Node::Logical(_) | Node::Function(_) => {
                Err(RuleError::NotString(format!("{} {}", node.kind(), node)))
            }
        }
    }

    fn eval_logical(&self, logical: &LogicalNode) -> Result<bool> {
        match logical {
            LogicalNode::And { left, right } => {
                let left = self.eval_bool(left)?;
                if !left && self.short_circuit {
                    return Ok(false);
                }
                let right = self.eval_bool(right)?;
                Ok(left && right)
            }
            LogicalNode::Or { left, right } => {
                let left = self.eval_bool(left)?;
                if left && self.short_circuit {
                    return Ok(true);
                }
                let right = self.eval_bool(right)?;
                Ok(left || right)
            }
            LogicalNode::Not { operand } => Ok(!self.eval_bool(operand)?),
        }
    }

    fn eval_value<'n>(&self, value: &'n ValueNode) -> Result<&'n str>
    where
        'a: 'n,
    {
        if !value.is_variable {
            return Ok(&value.value);
        }
        self.context
            .get(&value.value)
            .ok_or_else(|| RuleError::VariableNotFound(value.value.clone()))
    }

    fn eval_function(&self, func: &FunctionNode) -> Result<bool> {
        let args = func
            .args
            .iter()
            .map(|arg| self.eval_string(arg))
            .collect::<Result<Vec<_>>>()?;

        self.registry.call(&func.name, &args)
    }
}

impl Node {
    /// 布尔求值，and / or 两侧都会求值
    pub fn eval_bool(&self, context: &Context, registry: &FunctionRegistry) -> Result<bool> {
        Evaluator::new(context, registry).eval_bool(self)
    }

    /// 字符串求值
    pub fn eval_string(&self, context: &Context, registry: &FunctionRegistry) -> Result<String> {
        Evaluator::new(context, registry).eval_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::register_builtins;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> FunctionRegistry {
        let registry = FunctionRegistry::new();
        register_builtins(&registry);
        registry
    }

    fn contains(var: &str, needle: &str) -> Node {
        Node::function("contains", vec![Node::variable(var), Node::literal(needle)])
    }

    #[test]
    fn test_value_string_and_bool() {
        let ctx = Context::new().with("a", "x").with("empty", "");
        let registry = registry();

        assert_eq!(Node::literal("lit").eval_string(&ctx, &registry).unwrap(), "lit");
        assert_eq!(Node::variable("a").eval_string(&ctx, &registry).unwrap(), "x");

        assert!(Node::variable("a").eval_bool(&ctx, &registry).unwrap());
        assert!(!Node::variable("empty").eval_bool(&ctx, &registry).unwrap());
        assert!(!Node::literal("").eval_bool(&ctx, &registry).unwrap());
    }

    #[test]
    fn test_variable_not_found() {
        let ctx = Context::new();
        let result = Node::variable("missing").eval_bool(&ctx, &registry());
        match result {
            Err(RuleError::VariableNotFound(name)) => assert_eq!(name, "missing"),
            other => panic!("expected VariableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_and_function_are_not_strings() {
        let ctx = Context::new().with("a", "z");
        let registry = registry();

        let result = contains("a", "z").eval_string(&ctx, &registry);
        match result {
            Err(RuleError::NotString(detail)) => {
                assert_eq!(detail, "function contains(#{a}, 'z')");
            }
            other => panic!("expected NotString, got {:?}", other),
        }

        let result = Node::not(Node::literal("x")).eval_string(&ctx, &registry);
        assert!(matches!(result, Err(RuleError::NotString(detail)) if detail.starts_with("logical ")));
    }

    #[test]
    fn test_logical_argument_fails_with_not_string() {
        let ctx = Context::new().with("a", "z");
        let node = Node::function(
            "contains",
            vec![Node::variable("a"), Node::not(Node::literal("z"))],
        );

        let result = node.eval_bool(&ctx, &registry());
        assert!(matches!(result, Err(RuleError::NotString(_))));
    }

    #[test]
    fn test_function_not_found() {
        let ctx = Context::new().with("a", "x");
        let node = Node::function("fooBar", vec![Node::variable("a"), Node::literal("x")]);

        let result = node.eval_bool(&ctx, &registry());
        match result {
            Err(RuleError::FunctionNotFound(name)) => assert_eq!(name, "fooBar"),
            other => panic!("expected FunctionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_not_not_is_identity() {
        let ctx = Context::new().with("a", "z");
        let registry = registry();

        for node in [contains("a", "z"), contains("a", "y")] {
            let direct = node.eval_bool(&ctx, &registry).unwrap();
            let double = Node::not(Node::not(node)).eval_bool(&ctx, &registry).unwrap();
            assert_eq!(direct, double);
        }
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        let ctx = Context::new().with("a", "z");
        let registry = registry();

        let lazy = Evaluator::new(&ctx, &registry).with_short_circuit(true);

        // 右侧引用了不存在的变量
        let or = Node::or(contains("a", "z"), contains("missing", "z"));
        assert!(lazy.eval_bool(&or).unwrap());

        let and = Node::and(contains("a", "y"), contains("missing", "z"));
        assert!(!lazy.eval_bool(&and).unwrap());

        // 默认不短路，右侧的错误会返回给调用方
        let result = or.eval_bool(&ctx, &registry);
        assert!(matches!(result, Err(RuleError::VariableNotFound(_))));
        let result = and.eval_bool(&ctx, &registry);
        assert!(matches!(result, Err(RuleError::VariableNotFound(_))));
    }

    #[test]
    fn test_eager_evaluation_visits_both_operands() {
        let ctx = Context::new().with("a", "z");
        let registry = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.register("count", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        });

        let node = Node::or(
            Node::function("count", vec![]),
            Node::function("count", vec![]),
        );
        let eager = Evaluator::new(&ctx, &registry);
        assert!(eager.eval_bool(&node).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let lazy = Evaluator::new(&ctx, &registry).with_short_circuit(true);
        assert!(lazy.eval_bool(&node).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let missing = Node::or(contains("a", "z"), contains("missing", "z"));
        let result = eager.eval_bool(&missing);
        assert!(matches!(result, Err(RuleError::VariableNotFound(_))));
    }
}
