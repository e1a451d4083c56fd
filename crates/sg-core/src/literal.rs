//! Recursive-descent parser for Python literal expressions.
//!
//! Accepts the same restricted grammar Python's `ast.literal_eval` does for
//! sample data: `None`, booleans, integers of any size, floats, strings,
//! lists, tuples, dicts, sets and `set()`. Anything else is a
//! [`LiteralError`]; no expression is ever evaluated.

use std::num::IntErrorKind;

use crate::value::Value;

/// Deepest bracket nesting accepted, matching Python's parser limit.
pub const MAX_DEPTH: usize = 200;

/// Literal parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("invalid number {text:?} at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("unknown name {name:?} at offset {offset}")]
    UnknownName { name: String, offset: usize },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unsupported {what} at offset {offset}")]
    Unsupported { what: &'static str, offset: usize },

    #[error("unhashable {kind} at offset {offset}")]
    Unhashable { kind: &'static str, offset: usize },

    #[error("too many nested brackets at offset {offset}")]
    TooDeep { offset: usize },
}

/// Parse a complete literal expression.
///
/// A bare comma-separated sequence at the top level is a tuple, as in
/// `1, 2`.
pub fn parse_literal(src: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        src,
        pos: 0,
        depth: 0,
    };

    parser.skip_ws();
    let first = parser.value()?;
    parser.skip_ws();

    let value = if parser.eat(',') {
        let mut items = vec![first];
        loop {
            parser.skip_ws();
            if parser.peek().is_none() {
                break;
            }
            items.push(parser.value()?);
            parser.skip_ws();
            if !parser.eat(',') {
                break;
            }
        }
        Value::Tuple(items)
    } else {
        first
    };

    parser.skip_ws();
    match parser.peek() {
        None => Ok(value),
        Some(found) => Err(LiteralError::Unexpected {
            found,
            offset: parser.pos,
        }),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open brackets around the current position
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        if self.eat(expected) {
            return Ok(());
        }
        match self.peek() {
            Some(found) => Err(LiteralError::Unexpected {
                found,
                offset: self.pos,
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    /// Skip whitespace and `#` comments.
    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some(open @ ('[' | '(' | '{')) => {
                if self.depth >= MAX_DEPTH {
                    return Err(LiteralError::TooDeep { offset: self.pos });
                }
                self.depth += 1;
                self.bump();
                let value = self.bracketed(open)?;
                self.depth -= 1;
                Ok(value)
            }
            Some('\'') | Some('"') => self.strings(false),
            Some('+') | Some('-') => self.signed_number(),
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(None),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(found) => Err(LiteralError::Unexpected {
                found,
                offset: self.pos,
            }),
        }
    }

    /// Body of a list, tuple, dict or set after its opening bracket.
    fn bracketed(&mut self, open: char) -> Result<Value, LiteralError> {
        match open {
            '[' => {
                let (items, _) = self.sequence(']')?;
                Ok(Value::List(items))
            }
            '(' => {
                let (mut items, trailing_comma) = self.sequence(')')?;
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Value::Tuple(items))
                }
            }
            _ => self.brace(),
        }
    }

    /// Comma-separated values up to `close`. Reports whether any comma was
    /// seen, which separates `(1)` from `(1,)`.
    fn sequence(&mut self, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Ok((items, saw_comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            if self.eat(',') {
                saw_comma = true;
                continue;
            }
            self.expect(close)?;
            return Ok((items, saw_comma));
        }
    }

    /// Dict or set body after `{`.
    fn brace(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        if self.eat('}') {
            return Ok(Value::Dict(Vec::new()));
        }

        let offset = self.pos;
        let first = self.value()?;
        self.skip_ws();

        if self.eat(':') {
            let mut entries: Vec<(Value, Value)> = Vec::new();
            let mut key = first;
            let mut key_offset = offset;
            loop {
                check_hashable(&key, key_offset)?;
                let value = self.value()?;
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }

                self.skip_ws();
                if !self.eat(',') {
                    self.expect('}')?;
                    return Ok(Value::Dict(entries));
                }
                self.skip_ws();
                if self.eat('}') {
                    return Ok(Value::Dict(entries));
                }
                key_offset = self.pos;
                key = self.value()?;
                self.skip_ws();
                self.expect(':')?;
            }
        }

        let mut members: Vec<Value> = Vec::new();
        let mut member = first;
        let mut member_offset = offset;
        loop {
            check_hashable(&member, member_offset)?;
            if !members.contains(&member) {
                members.push(member);
            }

            self.skip_ws();
            if !self.eat(',') {
                self.expect('}')?;
                return Ok(Value::Set(members));
            }
            self.skip_ws();
            if self.eat('}') {
                return Ok(Value::Set(members));
            }
            member_offset = self.pos;
            member = self.value()?;
        }
    }

    fn signed_number(&mut self) -> Result<Value, LiteralError> {
        let sign = self.bump();
        self.skip_ws();
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(sign),
            Some(found) => Err(LiteralError::Unexpected {
                found,
                offset: self.pos,
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn number(&mut self, sign: Option<char>) -> Result<Value, LiteralError> {
        let start = self.pos;
        let negative = sign == Some('-');

        let radix = match (self.peek(), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.pos += 2;
            let digits_start = self.pos;
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                self.bump();
            }
            let digits = &self.src[digits_start..self.pos];
            let invalid = || LiteralError::InvalidNumber {
                text: self.src[start..self.pos].to_string(),
                offset: start,
            };
            if !valid_underscores(digits) {
                return Err(invalid());
            }
            let digits = digits.replace('_', "");
            let cleaned = format!("{}{}", if negative { "-" } else { "" }, digits);
            return match i64::from_str_radix(&cleaned, radix) {
                Ok(n) => Ok(Value::Int(n)),
                Err(e) if overflowed(&e) => to_decimal(&digits, radix)
                    .map(|decimal| big_int(negative, &decimal))
                    .ok_or_else(invalid),
                Err(_) => Err(invalid()),
            };
        }

        let mut is_float = false;
        self.digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.digits();
        }

        let text = &self.src[start..self.pos];
        let invalid = || LiteralError::InvalidNumber {
            text: text.to_string(),
            offset: start,
        };

        if matches!(self.peek(), Some('j' | 'J')) {
            return Err(LiteralError::Unsupported {
                what: "complex number",
                offset: start,
            });
        }
        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            return Err(invalid());
        }
        if text == "." || !valid_underscores(text) {
            return Err(invalid());
        }

        let cleaned = format!("{}{}", if negative { "-" } else { "" }, text.replace('_', ""));
        if is_float {
            return cleaned.parse::<f64>().map(Value::Float).map_err(|_| invalid());
        }

        let unsigned = text.replace('_', "");
        if unsigned.len() > 1 && unsigned.starts_with('0') && unsigned.bytes().any(|b| b != b'0') {
            return Err(invalid());
        }
        match cleaned.parse::<i64>() {
            Ok(n) => Ok(Value::Int(n)),
            Err(e) if overflowed(&e) => Ok(big_int(negative, &unsigned)),
            Err(_) => Err(invalid()),
        }
    }

    fn digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }

    /// Keyword or string prefix.
    fn name(&mut self) -> Result<Value, LiteralError> {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let name = &src[start..self.pos];

        if matches!(self.peek(), Some('\'' | '"')) {
            return match name.to_ascii_lowercase().as_str() {
                "r" => self.strings(true),
                "u" => self.strings(false),
                "b" | "br" | "rb" => Err(LiteralError::Unsupported {
                    what: "bytes literal",
                    offset: start,
                }),
                "f" | "fr" | "rf" => Err(LiteralError::Unsupported {
                    what: "f-string",
                    offset: start,
                }),
                _ => Err(LiteralError::UnknownName {
                    name: name.to_string(),
                    offset: start,
                }),
            };
        }

        match name {
            "None" => Ok(Value::None),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "set" if self.empty_call() => Ok(Value::Set(Vec::new())),
            _ => Err(LiteralError::UnknownName {
                name: name.to_string(),
                offset: start,
            }),
        }
    }

    /// Consume `()` if it comes next, allowing whitespace inside.
    fn empty_call(&mut self) -> bool {
        let checkpoint = self.pos;
        self.skip_ws();
        if self.eat('(') {
            self.skip_ws();
            if self.eat(')') {
                return true;
            }
        }
        self.pos = checkpoint;
        false
    }

    /// One string literal plus any adjacent literals it concatenates with.
    fn strings(&mut self, raw: bool) -> Result<Value, LiteralError> {
        let mut text = self.string(raw)?;
        loop {
            let checkpoint = self.pos;
            self.skip_ws();
            let next_raw = match (self.peek(), self.peek_nth(1)) {
                (Some('\'' | '"'), _) => false,
                (Some('r' | 'R'), Some('\'' | '"')) => {
                    self.bump();
                    true
                }
                (Some('u' | 'U'), Some('\'' | '"')) => {
                    self.bump();
                    false
                }
                _ => {
                    self.pos = checkpoint;
                    return Ok(Value::Str(text));
                }
            };
            text.push_str(&self.string(next_raw)?);
        }
    }

    fn string(&mut self, raw: bool) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.pos += 2 * quote.len_utf8();
        }

        let unterminated = LiteralError::UnterminatedString { offset: start };
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or_else(|| unterminated.clone())?;
            if c == quote {
                if !triple {
                    return Ok(out);
                }
                if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                    self.pos += 2 * quote.len_utf8();
                    return Ok(out);
                }
                out.push(c);
                continue;
            }
            match c {
                '\n' if !triple => return Err(unterminated),
                '\\' if raw => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let offset = self.pos - 1;
        let c = self.bump().ok_or(LiteralError::UnterminatedString { offset })?;
        match c {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).ok_or(LiteralError::Unsupported {
                    what: "escape",
                    offset,
                })?);
            }
            'x' => out.push(self.hex_escape(2, offset)?),
            'u' => out.push(self.hex_escape(4, offset)?),
            'U' => out.push(self.hex_escape(8, offset)?),
            'N' => {
                return Err(LiteralError::Unsupported {
                    what: "named unicode escape",
                    offset,
                })
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, width: usize, offset: usize) -> Result<char, LiteralError> {
        let end = self.pos + width;
        let digits = self.src.get(self.pos..end).ok_or(LiteralError::UnterminatedString { offset })?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| LiteralError::Unsupported {
            what: "escape",
            offset,
        })?;
        self.pos = end;
        char::from_u32(code).ok_or(LiteralError::Unsupported {
            what: "escape",
            offset,
        })
    }
}

fn check_hashable(value: &Value, offset: usize) -> Result<(), LiteralError> {
    if value.is_hashable() {
        Ok(())
    } else {
        Err(LiteralError::Unhashable {
            kind: value.type_name(),
            offset,
        })
    }
}

fn overflowed(e: &std::num::ParseIntError) -> bool {
    matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow)
}

fn big_int(negative: bool, decimal: &str) -> Value {
    let sign = if negative { "-" } else { "" };
    Value::BigInt(format!("{}{}", sign, decimal))
}

/// Decimal digits of the unsigned integer `digits` written in `radix`.
fn to_decimal(digits: &str, radix: u32) -> Option<String> {
    const LIMB: u64 = 1_000_000_000;

    // Little-endian base 10^9 limbs.
    let mut limbs: Vec<u64> = vec![0];
    for c in digits.chars() {
        let mut carry = u64::from(c.to_digit(radix)?);
        for limb in limbs.iter_mut() {
            let next = *limb * u64::from(radix) + carry;
            *limb = next % LIMB;
            carry = next / LIMB;
        }
        while carry > 0 {
            limbs.push(carry % LIMB);
            carry /= LIMB;
        }
    }

    let mut from_top = limbs.iter().rev();
    let mut out = from_top.next().map(|top| top.to_string()).unwrap_or_default();
    for limb in from_top {
        out.push_str(&format!("{:09}", limb));
    }
    Some(out)
}

/// Underscores may only sit between two digits.
fn valid_underscores(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && i + 1 < bytes.len()
                && bytes[i - 1].is_ascii_alphanumeric()
                && bytes[i + 1].is_ascii_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_literal("42"), Ok(Value::Int(42)));
        assert_eq!(parse_literal("-7"), Ok(Value::Int(-7)));
        assert_eq!(parse_literal("1_000"), Ok(Value::Int(1000)));
        assert_eq!(parse_literal("0x1F"), Ok(Value::Int(31)));
        assert_eq!(parse_literal("0b101"), Ok(Value::Int(5)));
        assert_eq!(parse_literal("3.5"), Ok(Value::Float(3.5)));
        assert_eq!(parse_literal(".5"), Ok(Value::Float(0.5)));
        assert_eq!(parse_literal("1e3"), Ok(Value::Float(1000.0)));
        assert_eq!(parse_literal("True"), Ok(Value::Bool(true)));
        assert_eq!(parse_literal("None"), Ok(Value::None));
        assert_eq!(parse_literal("1e999"), Ok(Value::Float(f64::INFINITY)));
    }

    #[test]
    fn test_integers_beyond_i64() {
        assert_eq!(parse_literal("9223372036854775807"), Ok(Value::Int(i64::MAX)));
        assert_eq!(parse_literal("-9223372036854775808"), Ok(Value::Int(i64::MIN)));
        assert_eq!(
            parse_literal("100000000000000000000"),
            Ok(Value::BigInt("100000000000000000000".into()))
        );
        assert_eq!(
            parse_literal("-9_223_372_036_854_775_809"),
            Ok(Value::BigInt("-9223372036854775809".into()))
        );
        assert_eq!(
            parse_literal("0x1_0000_0000_0000_0000"),
            Ok(Value::BigInt("18446744073709551616".into()))
        );
        assert_eq!(
            parse_literal("-0o2000000000000000000000"),
            Ok(Value::BigInt("-18446744073709551616".into()))
        );
        assert!(parse_literal("0xFFFFFFFFFFFFFFFFFFZ").is_err());
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse_literal("'abc'"), Ok(s("abc")));
        assert_eq!(parse_literal("\"a'b\""), Ok(s("a'b")));
        assert_eq!(parse_literal(r"'a\nb'"), Ok(s("a\nb")));
        assert_eq!(parse_literal(r"r'a\nb'"), Ok(s(r"a\nb")));
        assert_eq!(parse_literal("'ab' 'cd'"), Ok(s("abcd")));
        assert_eq!(parse_literal("'''x\ny'''"), Ok(s("x\ny")));
        assert_eq!(parse_literal(r"'\x41é'"), Ok(s("Aé")));
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            parse_literal("[1, 2, 3]"),
            Ok(list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        );
        assert_eq!(parse_literal("[]"), Ok(list(vec![])));
        assert_eq!(parse_literal("(1)"), Ok(Value::Int(1)));
        assert_eq!(parse_literal("(1,)"), Ok(Value::Tuple(vec![Value::Int(1)])));
        assert_eq!(parse_literal("()"), Ok(Value::Tuple(vec![])));
        assert_eq!(
            parse_literal("1, 2"),
            Ok(Value::Tuple(vec![Value::Int(1), Value::Int(2)]))
        );
        assert_eq!(
            parse_literal("{'a': 1}"),
            Ok(Value::Dict(vec![(s("a"), Value::Int(1))]))
        );
        assert_eq!(parse_literal("{}"), Ok(Value::Dict(vec![])));
        assert_eq!(
            parse_literal("{1, 2, 1,}"),
            Ok(Value::Set(vec![Value::Int(1), Value::Int(2)]))
        );
        assert_eq!(parse_literal("set()"), Ok(Value::Set(vec![])));
        assert_eq!(parse_literal("set( )"), Ok(Value::Set(vec![])));
        assert_eq!(
            parse_literal("[set(), {1}]"),
            Ok(list(vec![Value::Set(vec![]), Value::Set(vec![Value::Int(1)])]))
        );
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
        assert!(parse_literal(&at_limit).is_ok());

        let over = "(".repeat(MAX_DEPTH + 1) + &")".repeat(MAX_DEPTH + 1);
        assert_eq!(
            parse_literal(&over),
            Err(LiteralError::TooDeep { offset: MAX_DEPTH })
        );

        let runaway = "[".repeat(50_000) + &"]".repeat(50_000);
        assert!(matches!(
            parse_literal(&runaway),
            Err(LiteralError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_nested_multiline() {
        let src = "[\n  [1, 2],\n  [3, 4],  # second row\n]";
        assert_eq!(
            parse_literal(src),
            Ok(list(vec![
                list(vec![Value::Int(1), Value::Int(2)]),
                list(vec![Value::Int(3), Value::Int(4)]),
            ]))
        );
    }

    #[test]
    fn test_duplicate_dict_keys_overwrite() {
        assert_eq!(
            parse_literal("{'a': 1, 'b': 2, 'a': 3}"),
            Ok(Value::Dict(vec![(s("a"), Value::Int(3)), (s("b"), Value::Int(2))]))
        );
    }

    #[test]
    fn test_rejections() {
        assert!(parse_literal("").is_err());
        assert!(parse_literal("hello").is_err());
        assert!(parse_literal("1 + 2").is_err());
        assert!(parse_literal("--5").is_err());
        assert!(parse_literal("012").is_err());
        assert!(parse_literal("1j").is_err());
        assert!(parse_literal("b'x'").is_err());
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("'open").is_err());
        assert!(parse_literal("0x").is_err());
        assert!(parse_literal("set(1)").is_err());
        assert!(parse_literal("set").is_err());
        assert!(matches!(
            parse_literal("{[1]}"),
            Err(LiteralError::Unhashable { kind: "list", .. })
        ));
    }
}
