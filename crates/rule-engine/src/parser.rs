//! 递归下降解析器
//!
//! 优先级从低到高：`or` → `and` → `not` → primary。
//!
//! ```text
//! expression := or_expr
//! or_expr    := and_expr ( 'or' and_expr )*
//! and_expr   := not_expr ( 'and' not_expr )*
//! not_expr   := 'not' primary | primary
//! primary    := '(' expression ')'
//!             | identifier ( '(' arglist? ')' )?
//!             | string_literal
//! arglist    := expression ( ',' expression )*
//! ```
//!
//! `not` 只作用于紧随其后的一个 primary：`not a and b` 解析为 `(not a) and b`。
//! 解析阶段不做语义检查，函数参数个数等问题留到求值时处理。
//! 括号与函数调用的嵌套深度不超过 [`MAX_DEPTH`]，超出时返回 [`RuleError::UnexpectedToken`]。

use crate::ast::Node;
use crate::error::{Result, RuleError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// 变量引用标记字符，解析变量名时全部剔除
const VARIABLE_MARKERS: [char; 3] = ['#', '{', '}'];

/// 表达式最大嵌套深度（顶层表达式计为 1 层）
pub const MAX_DEPTH: usize = 128;

/// 递归下降解析器，持有一个记号的预读
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// 创建解析器并读取第一个记号
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            depth: 0,
        })
    }

    /// 解析一个完整的布尔表达式，之后的剩余记号不做检查
    pub fn parse_expression(&mut self) -> Result<Node> {
        if self.depth >= MAX_DEPTH {
            return Err(RuleError::UnexpectedToken {
                found: format!("{} (嵌套超过 {} 层)", self.current, MAX_DEPTH),
                position: self.current.position,
            });
        }

        self.depth += 1;
        let node = self.parse_or();
        self.depth -= 1;
        node
    }

    /// 要求当前记号为输入结束
    pub fn expect_end(&mut self) -> Result<()> {
        self.consume(TokenKind::End)
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    fn parse_or(&mut self) -> Result<Node> {
        let mut node = self.parse_and()?;
        while self.current.is(TokenKind::Or) {
            self.consume(TokenKind::Or)?;
            let right = self.parse_and()?;
            node = Node::or(node, right);
        }
        Ok(node)
    }

    fn parse_and(&mut self) -> Result<Node> {
        let mut node = self.parse_not()?;
        while self.current.is(TokenKind::And) {
            self.consume(TokenKind::And)?;
            let right = self.parse_not()?;
            node = Node::and(node, right);
        }
        Ok(node)
    }

    fn parse_not(&mut self) -> Result<Node> {
        if self.current.is(TokenKind::Not) {
            self.consume(TokenKind::Not)?;
            let operand = self.parse_primary()?;
            return Ok(Node::not(operand));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Node> {
        match self.current.kind {
            TokenKind::LParen => {
                self.consume(TokenKind::LParen)?;
                let node = self.parse_expression()?;
                self.consume(TokenKind::RParen)?;
                Ok(node)
            }
            TokenKind::Identifier => {
                let name = self.advance()?.text;
                if self.current.is(TokenKind::LParen) {
                    self.parse_call(name)
                } else {
                    Ok(identifier_value(name))
                }
            }
            TokenKind::StringLiteral => {
                let text = self.advance()?.text;
                Ok(Node::literal(text))
            }
            _ => Err(RuleError::UnexpectedToken {
                found: self.current.to_string(),
                position: self.current.position,
            }),
        }
    }

    /// 函数调用，当前记号为 '('
    fn parse_call(&mut self, name: String) -> Result<Node> {
        self.consume(TokenKind::LParen)?;

        let mut args = Vec::new();
        if !self.current.is(TokenKind::RParen) {
            args.push(self.parse_expression()?);
            while self.current.is(TokenKind::Comma) {
                self.consume(TokenKind::Comma)?;
                args.push(self.parse_expression()?);
            }
        }

        self.consume(TokenKind::RParen)?;
        Ok(Node::function(name, args))
    }

    /// 取走当前记号并读入下一个
    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn consume(&mut self, expected: TokenKind) -> Result<()> {
        if !self.current.is(expected) {
            return Err(RuleError::TokenMismatch {
                expected,
                found: self.current.kind,
                position: self.current.position,
            });
        }
        self.advance()?;
        Ok(())
    }
}

/// 裸标识符：含 `#` 视为变量引用，否则按原文作为字面值
fn identifier_value(text: String) -> Node {
    if text.contains('#') {
        let name: String = text.chars().filter(|c| !VARIABLE_MARKERS.contains(c)).collect();
        Node::variable(name)
    } else {
        Node::literal(text)
    }
}
