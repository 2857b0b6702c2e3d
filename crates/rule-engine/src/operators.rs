//! 逻辑操作符定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 逻辑操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

/// 保留字表（小写形式 -> 操作符）
const KEYWORDS: [(&str, LogicalOperator); 3] = [
    ("and", LogicalOperator::And),
    ("or", LogicalOperator::Or),
    ("not", LogicalOperator::Not),
];

impl LogicalOperator {
    /// 按保留字查找操作符，大小写不敏感
    pub fn from_keyword(word: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(keyword, _)| word.eq_ignore_ascii_case(keyword))
            .map(|(_, op)| *op)
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Not => write!(f, "NOT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keyword_case_insensitive() {
        assert_eq!(LogicalOperator::from_keyword("and"), Some(LogicalOperator::And));
        assert_eq!(LogicalOperator::from_keyword("OR"), Some(LogicalOperator::Or));
        assert_eq!(LogicalOperator::from_keyword("nOt"), Some(LogicalOperator::Not));
        assert_eq!(LogicalOperator::from_keyword("nand"), None);
        assert_eq!(LogicalOperator::from_keyword("contains"), None);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&LogicalOperator::And).unwrap();
        assert_eq!(json, "\"AND\"");
    }
}
