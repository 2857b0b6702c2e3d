//! 规则引擎错误类型

use crate::token::TokenKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    // ==================== 词法错误 ====================
    #[error("非法字符 '{ch}' (位置 {position})")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("字符串常量未闭合 (起始位置 {position})")]
    UnterminatedString { position: usize },

    // ==================== 语法错误 ====================
    #[error("意外的记号 {found} (位置 {position})")]
    UnexpectedToken { found: String, position: usize },

    #[error("记号不匹配: 期望 {expected}, 实际 {found} (位置 {position})")]
    TokenMismatch {
        expected: TokenKind,
        found: TokenKind,
        position: usize,
    },

    // ==================== 求值错误 ====================
    #[error("节点不能求值为布尔值: {0}")]
    NotBoolean(String),

    #[error("节点不能求值为字符串: {0}")]
    NotString(String),

    #[error("变量不存在: {0}")]
    VariableNotFound(String),

    #[error("函数未注册: {0}")]
    FunctionNotFound(String),

    #[error("函数 {function} 参数个数错误: 期望 {expected}, 实际 {actual}")]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("函数 {function} 执行失败: {message}")]
    FunctionFailed { function: String, message: String },

    #[error("无效的上下文: {0}")]
    InvalidContext(String),
}

/// 错误所属的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    /// 构建上下文时的输入错误，发生在求值之前
    Context,
    Lex,
    Parse,
    Eval,
}

impl RuleError {
    /// 参数个数错误的便捷构造
    pub fn arity(function: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        Self::Arity {
            function: function.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// 自定义函数失败的便捷构造，供调用方注册的谓词使用
    pub fn function_failed(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FunctionFailed {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn stage(&self) -> ErrorStage {
        match self {
            Self::UnexpectedCharacter { .. } | Self::UnterminatedString { .. } => ErrorStage::Lex,
            Self::UnexpectedToken { .. } | Self::TokenMismatch { .. } => ErrorStage::Parse,
            Self::NotBoolean(_)
            | Self::NotString(_)
            | Self::VariableNotFound(_)
            | Self::FunctionNotFound(_)
            | Self::Arity { .. }
            | Self::FunctionFailed { .. } => ErrorStage::Eval,
            Self::InvalidContext(_) => ErrorStage::Context,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_stage() {
        let lex = RuleError::UnexpectedCharacter { ch: '$', position: 3 };
        assert_eq!(lex.stage(), ErrorStage::Lex);

        let parse = RuleError::TokenMismatch {
            expected: TokenKind::RParen,
            found: TokenKind::End,
            position: 10,
        };
        assert_eq!(parse.stage(), ErrorStage::Parse);

        assert_eq!(RuleError::arity("contains", "2", 3).stage(), ErrorStage::Eval);

        let context = RuleError::InvalidContext("上下文必须是 JSON 对象".to_string());
        assert_eq!(context.stage(), ErrorStage::Context);
    }

    #[test]
    fn test_error_display() {
        let err = RuleError::arity("contains", "2", 1);
        assert_eq!(err.to_string(), "函数 contains 参数个数错误: 期望 2, 实际 1");

        let err = RuleError::TokenMismatch {
            expected: TokenKind::RParen,
            found: TokenKind::End,
            position: 7,
        };
        assert!(err.to_string().contains("')'"));
    }
}
