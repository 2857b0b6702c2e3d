//! 词法记号

use crate::operators::LogicalOperator;
use std::fmt;

/// 记号类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// 标识符（函数名、变量引用或裸字）
    Identifier,
    /// 单引号字符串常量
    StringLiteral,
    Comma,
    LParen,
    RParen,
    And,
    Or,
    Not,
    End,
}

impl From<LogicalOperator> for TokenKind {
    fn from(op: LogicalOperator) -> Self {
        match op {
            LogicalOperator::And => Self::And,
            LogicalOperator::Or => Self::Or,
            LogicalOperator::Not => Self::Not,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Identifier => "identifier",
            Self::StringLiteral => "string",
            Self::Comma => "','",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::And => "'and'",
            Self::Or => "'or'",
            Self::Not => "'not'",
            Self::End => "end of input",
        };
        write!(f, "{}", s)
    }
}

/// 记号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 原始文本；标识符与字符串常量之外的记号保存其字面符号
    pub text: String,
    /// 记号起始的字节偏移
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn end(position: usize) -> Self {
        Self::new(TokenKind::End, "", position)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier `{}`", self.text),
            TokenKind::StringLiteral => write!(f, "string '{}'", self.text),
            kind => write!(f, "{}", kind),
        }
    }
}
