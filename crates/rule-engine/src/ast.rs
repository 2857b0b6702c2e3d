//! 抽象语法树
//!
//! 节点集合是封闭的：逻辑节点、值节点、函数调用节点。每个节点独占其子节点，
//! 整棵树只在一次求值调用内存活。

use crate::operators::LogicalOperator;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// 语法树节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Logical(LogicalNode),
    Value(ValueNode),
    Function(FunctionNode),
}

/// 逻辑节点：and / or 有两个操作数，not 只有一个
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operator", rename_all = "UPPERCASE")]
pub enum LogicalNode {
    And { left: Box<Node>, right: Box<Node> },
    Or { left: Box<Node>, right: Box<Node> },
    Not { operand: Box<Node> },
}

/// 值节点：字符串常量或变量引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueNode {
    /// 为 true 时 `value` 是变量名，否则是字面值
    pub is_variable: bool,
    pub value: String,
}

/// 函数调用节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionNode {
    pub name: String,
    pub args: Vec<Node>,
}

impl Node {
    pub fn and(left: Node, right: Node) -> Self {
        Self::Logical(LogicalNode::And {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn or(left: Node, right: Node) -> Self {
        Self::Logical(LogicalNode::Or {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn not(operand: Node) -> Self {
        Self::Logical(LogicalNode::Not {
            operand: Box::new(operand),
        })
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Value(ValueNode {
            is_variable: false,
            value: value.into(),
        })
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Value(ValueNode {
            is_variable: true,
            value: name.into(),
        })
    }

    pub fn function(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self::Function(FunctionNode {
            name: name.into(),
            args,
        })
    }

    /// 节点种类名称，用于错误信息
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logical(_) => "logical",
            Self::Value(v) if v.is_variable => "variable",
            Self::Value(_) => "literal",
            Self::Function(_) => "function",
        }
    }

    /// 表达式引用的全部变量名
    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match self {
            Self::Logical(logical) => {
                for child in logical.operands() {
                    child.collect_variables(vars);
                }
            }
            Self::Value(v) => {
                if v.is_variable {
                    vars.insert(v.value.clone());
                }
            }
            Self::Function(func) => {
                for arg in &func.args {
                    arg.collect_variables(vars);
                }
            }
        }
    }
}

impl LogicalNode {
    pub fn operator(&self) -> LogicalOperator {
        match self {
            Self::And { .. } => LogicalOperator::And,
            Self::Or { .. } => LogicalOperator::Or,
            Self::Not { .. } => LogicalOperator::Not,
        }
    }

    pub fn operands(&self) -> Vec<&Node> {
        match self {
            Self::And { left, right } | Self::Or { left, right } => vec![&**left, &**right],
            Self::Not { operand } => vec![&**operand],
        }
    }
}

/// 输出完全加括号的规范形式，可被解析器重新读入
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logical(LogicalNode::And { left, right }) => write!(f, "({} and {})", left, right),
            Self::Logical(LogicalNode::Or { left, right }) => write!(f, "({} or {})", left, right),
            Self::Logical(LogicalNode::Not { operand }) => write!(f, "(not {})", operand),
            Self::Value(v) if v.is_variable => write!(f, "#{{{}}}", v.value),
            Self::Value(v) => write!(f, "'{}'", v.value),
            Self::Function(func) => {
                write!(f, "{}(", func.name)?;
                for (i, arg) in func.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
