//! 递归下降解析器：单一前向光标，记录字符偏移与行列号用于报错

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

use crate::model::config::JsonConfig;
use crate::model::data_core::ParseError;
use crate::model::object::JsonObject;
use crate::model::value::{Number, Value};

const END_OF_INPUT: &str = "end of input";

/// 解析一段完整的 JSON 文本
pub fn parse(text: &str, config: &JsonConfig) -> Result<Value, ParseError> {
    if let Some(limit) = config.max_input_len {
        let len = text.chars().count();
        if len > limit {
            return Err(ParseError::message(format!(
                "Input of {len} characters exceeds the limit of {limit}"
            )));
        }
    }

    tracing::debug!("开始解析JSON，长度: {} 字节", text.len());
    let mut parser = Parser::new(text, config.max_depth);
    parser.skip_whitespace();

    if parser.peek().is_none() {
        return if config.blank_as_null {
            Ok(Value::Null)
        } else {
            Err(parser.unexpected("value"))
        };
    }

    let value = parser.parse_value()?;

    if !config.allow_trailing_data {
        parser.skip_whitespace();
        if parser.peek().is_some() {
            return Err(parser.unexpected(END_OF_INPUT));
        }
    }

    tracing::debug!("JSON解析完成，顶层类型: {}", value.kind());
    Ok(value)
}

fn describe(c: Option<char>) -> String {
    match c {
        Some(c) => c.escape_debug().to_string(),
        None => END_OF_INPUT.to_string(),
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, max_depth: usize) -> Self {
        Self {
            chars: text.chars().peekable(),
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn locate(&self, err: ParseError) -> ParseError {
        err.at(self.position, self.line, self.column)
    }

    /// 以当前光标下的字符作为 found 生成错误
    fn unexpected(&mut self, expected: &str) -> ParseError {
        let found = describe(self.peek());
        self.locate(ParseError::expected_found(expected, found))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.locate(ParseError::message(format!(
                "Maximum nesting depth of {} exceeded",
                self.max_depth
            ))));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => Ok(Value::String(self.parse_string()?)),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if c.is_alphabetic() => self.parse_literal(),
            _ => Err(self.unexpected("value")),
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.bump();
        self.enter()?;
        let mut members = BTreeMap::new();

        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump();
            self.leave();
            return Ok(Value::Object(JsonObject::from(members)));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some('"') {
                return Err(self.unexpected("\""));
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            // 重复键：后者覆盖前者
            members.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.unexpected("}")),
            }
        }

        self.leave();
        Ok(Value::Object(JsonObject::from(members)))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.bump();
        self.enter()?;
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump();
            self.leave();
            return Ok(Value::from(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.unexpected("]")),
            }
        }

        self.leave();
        Ok(Value::from(items))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.unexpected("\"")),
                Some('"') => {
                    self.bump();
                    return Ok(out);
                }
                Some('\\') => {
                    self.bump();
                    out.push(self.parse_escape()?);
                }
                Some(c) if (c as u32) < 0x20 => return Err(self.unexpected("string character")),
                Some(c) => {
                    self.bump();
                    out.push(c);
                }
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, ParseError> {
        let c = match self.peek() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => {
                self.bump();
                return self.parse_unicode_escape();
            }
            _ => return Err(self.unexpected("escape character")),
        };
        self.bump();
        Ok(c)
    }

    fn parse_hex4(&mut self) -> Result<u32, ParseError> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self.peek().and_then(|c| c.to_digit(16));
            match digit {
                Some(d) => {
                    self.bump();
                    code = code * 16 + d;
                }
                None => return Err(self.unexpected("hex digit")),
            }
        }
        Ok(code)
    }

    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        let high = self.parse_hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                // 代理对：必须紧跟低位代理
                self.expect('\\')?;
                self.expect('u')?;
                let low = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.locate(ParseError::message(format!(
                        "Invalid low surrogate \\u{low:04X}"
                    ))));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(self.locate(ParseError::message(format!(
                    "Unpaired surrogate \\u{high:04X}"
                ))));
            }
            _ => high,
        };
        char::from_u32(code).ok_or_else(|| {
            self.locate(ParseError::message(format!("Invalid unicode escape \\u{code:04X}")))
        })
    }

    fn consume_digits(&mut self, buf: &mut String) -> Result<(), ParseError> {
        let start = buf.len();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            self.bump();
            buf.push(c);
        }
        if buf.len() == start {
            return Err(self.unexpected("digit"));
        }
        Ok(())
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let (position, line, column) = (self.position, self.line, self.column);
        let mut buf = String::new();
        let mut floating = false;

        if self.peek() == Some('-') {
            self.bump();
            buf.push('-');
        }
        self.consume_digits(&mut buf)?;

        if self.peek() == Some('.') {
            self.bump();
            buf.push('.');
            floating = true;
            self.consume_digits(&mut buf)?;
        }

        if let Some(e @ ('e' | 'E')) = self.peek() {
            self.bump();
            buf.push(e);
            floating = true;
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.bump();
                buf.push(sign);
            }
            self.consume_digits(&mut buf)?;
        }

        if !floating {
            if let Ok(i) = buf.parse::<i64>() {
                return Ok(Value::Number(Number::Int(i)));
            }
            tracing::trace!("整数超出i64范围，按浮点数处理: {}", buf);
        }

        let f = buf
            .parse::<f64>()
            .map_err(|e| self.locate(ParseError::message(format!("Invalid number '{buf}': {e}"))))?;
        // 超出 f64 范围的数无法往返
        if !f.is_finite() {
            return Err(ParseError::message(format!("Number '{buf}' out of range")).at(position, line, column));
        }
        Ok(Value::Number(Number::Float(f)))
    }

    /// 裸单词：只接受 true/false/null，否则在单词起点报错
    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        let (position, line, column) = (self.position, self.line, self.column);
        let mut word = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            self.bump();
            word.push(c);
        }
        match word.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            _ => Err(ParseError::expected_found("value", word).at(position, line, column)),
        }
    }
}
