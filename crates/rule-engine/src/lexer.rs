//! 词法分析器
//!
//! 按需产出记号：每次调用 [`Lexer::next_token`] 先跳过空白，再扫描一个记号并推进游标。
//! 除游标外不保存任何状态，也不做预读。

use crate::error::{Result, RuleError};
use crate::operators::LogicalOperator;
use crate::token::{Token, TokenKind};

/// 词法分析器
pub struct Lexer<'a> {
    input: &'a str,
    /// 当前字节偏移
    pos: usize,
    /// 未闭合的字符串常量是否报错
    strict_strings: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            strict_strings: false,
        }
    }

    /// 启用严格字符串模式：未闭合的字符串常量返回 [`RuleError::UnterminatedString`]
    pub fn with_strict_strings(mut self, strict: bool) -> Self {
        self.strict_strings = strict;
        self
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// 产出下一个记号
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(Token::end(start));
        };

        if is_word_start(c) {
            return Ok(self.scan_word(start));
        }

        match c {
            '\'' => self.scan_string(start),
            ',' => Ok(self.single(TokenKind::Comma, c, start)),
            '(' => Ok(self.single(TokenKind::LParen, c, start)),
            ')' => Ok(self.single(TokenKind::RParen, c, start)),
            _ => Err(RuleError::UnexpectedCharacter {
                ch: c,
                position: start,
            }),
        }
    }

    /// 扫描全部记号（包含末尾的 End 记号）
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::End);
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn single(&mut self, kind: TokenKind, c: char, start: usize) -> Token {
        self.pos += c.len_utf8();
        Token::new(kind, c, start)
    }

    /// 标识符或保留字
    fn scan_word(&mut self, start: usize) -> Token {
        let rest = &self.input[start..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_word_char(*c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos = start + len;

        let text = &rest[..len];
        match LogicalOperator::from_keyword(text) {
            Some(op) => Token::new(op.into(), text, start),
            None => Token::new(TokenKind::Identifier, text, start),
        }
    }

    /// 单引号字符串常量，不处理转义
    fn scan_string(&mut self, start: usize) -> Result<Token> {
        let body_start = start + 1;
        let rest = &self.input[body_start..];

        match rest.find('\'') {
            Some(end) => {
                self.pos = body_start + end + 1;
                Ok(Token::new(TokenKind::StringLiteral, &rest[..end], start))
            }
            None if self.strict_strings => Err(RuleError::UnterminatedString { position: start }),
            None => {
                // 未闭合时读到输入末尾
                self.pos = self.input.len();
                Ok(Token::new(TokenKind::StringLiteral, rest, start))
            }
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '#' | '{' | '}')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '#' | '{' | '}')
}
