//! 表达式规则引擎
//!
//! 将文本布尔表达式编译为语法树，并针对变量上下文求值，支持：
//! - `and` / `or` / `not` 逻辑运算与括号分组
//! - 单引号字符串常量与 `#{name}` 变量引用
//! - 通过函数注册表扩展的谓词函数，如 `contains`、`containsAny`
//!
//! ```
//! use rule_engine::{Context, RuleEngine};
//!
//! let engine = RuleEngine::new();
//! let ctx = Context::new().with("b", "hello, world");
//! assert!(engine.evaluate("containsAny(#{b}, 'xxx', 'world')", &ctx).unwrap());
//! ```

pub mod ast;
pub mod builtins;
pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod registry;
pub mod token;

pub use ast::{FunctionNode, LogicalNode, Node, ValueNode};
pub use context::Context;
pub use engine::RuleEngine;
pub use error::{ErrorStage, Result, RuleError};
pub use evaluator::Evaluator;
pub use lexer::Lexer;
pub use operators::LogicalOperator;
pub use parser::Parser;
pub use registry::{FunctionRegistry, PredicateFn};
pub use rule_shared::config::EngineConfig;
pub use token::{Token, TokenKind};
