//! Recursive-descent record parser.
//!
//! The parser works on *normalized* text (see [`normalize`](crate::normalize)),
//! so it never meets whitespace or comments. Parsing is two steps at every
//! position:
//!
//! 1. [`Parser::classify_at`] looks at the leading byte(s) and decides which
//!    variant starts there, or rejects the position.
//! 2. [`Parser::parse_value_at`] runs the routine for that variant, which
//!    returns the value and how many bytes it consumed so containers can step
//!    past nested values.
//!
//! All structural characters are ASCII, so positions are byte offsets and every
//! offset the parser produces lies on a `char` boundary.
//!
//! ## Empty slots
//!
//! A `,` or `]` where an array element is expected classifies as `Undefined`
//! and consumes nothing, which is how `[1,,2]` and `[,"me",]` get their
//! elided elements. Objects do not accept empty slots: `{n:}` is an error.
//!
//! ## Usage
//!
//! Most callers want [`parse`](crate::parse). The parser is public for callers
//! that need classification on its own:
//!
//! ```rust
//! use jsrs::{normalize, ParseOptions, Parser, ValueType};
//!
//! let text = normalize("[ 1, null, nul ]");
//! let parser = Parser::new(&text, &ParseOptions::default());
//! assert_eq!(parser.classify_at(0), Some(ValueType::Array));
//! assert_eq!(parser.classify_at(3), Some(ValueType::Null));
//! assert_eq!(parser.classify_at(8), None);
//! ```

use crate::{Error, ParseOptions, RecordMap, Result, Value, ValueType};
use crate::normalize::is_escaped;

/// Object keys are unquoted runs of ASCII alphanumerics and `_`.
#[inline]
fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Whether `key` can be written unquoted and read back unchanged.
pub(crate) fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(is_key_byte)
}

/// Parser over one normalized input.
pub struct Parser<'a> {
    input: &'a str,
    max_depth: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser for `normalized` text.
    pub fn new(normalized: &'a str, options: &ParseOptions) -> Self {
        Parser {
            input: normalized,
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    /// Parses the whole input as one value.
    ///
    /// # Errors
    ///
    /// Returns the first error any routine detects, `TrailingData` if the value
    /// ends before the input does, and `UnexpectedEnd` for empty input.
    pub fn parse_document(&mut self) -> Result<Value> {
        if self.input.is_empty() {
            return Err(Error::UnexpectedEnd);
        }

        let value_type = self.classify_at(0).ok_or_else(|| {
            Error::invalid_value(0, &format!("{} does not start a value", self.describe(0)))
        })?;
        let (value, consumed) = self.parse_value_at(0, value_type)?;

        if consumed < self.input.len() {
            return Err(Error::TrailingData { position: consumed });
        }
        Ok(value)
    }

    /// Determines which variant begins at `pos`, or `None` if nothing does.
    ///
    /// `null`, `undefined`, `Infinity` and `NaN` must be spelled out in full;
    /// `,` and `]` denote an empty slot and classify as `Undefined`.
    #[must_use]
    pub fn classify_at(&self, pos: usize) -> Option<ValueType> {
        match self.peek(pos)? {
            b'{' => Some(ValueType::Object),
            b'[' => Some(ValueType::Array),
            b'"' | b'\'' => Some(ValueType::String),
            b't' | b'f' => Some(ValueType::Boolean),
            b'0'..=b'9' | b'.' | b'+' | b'-' => Some(ValueType::Number),
            b'n' if self.starts_with_at(pos, "null") => Some(ValueType::Null),
            b'u' if self.starts_with_at(pos, "undefined") => Some(ValueType::Undefined),
            b'I' if self.starts_with_at(pos, "Infinity") => Some(ValueType::Number),
            b'N' if self.starts_with_at(pos, "NaN") => Some(ValueType::Number),
            b',' | b']' => Some(ValueType::Undefined),
            _ => None,
        }
    }

    /// Parses a value of `value_type` starting at `pos`.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn parse_value_at(&mut self, pos: usize, value_type: ValueType) -> Result<(Value, usize)> {
        match value_type {
            ValueType::Undefined => self.parse_undefined(pos),
            ValueType::Null => self.parse_null(pos),
            ValueType::Boolean => self.parse_boolean(pos),
            ValueType::Number => self.parse_number(pos),
            ValueType::String => self.parse_string(pos),
            ValueType::Array => self.parse_array(pos),
            ValueType::Object => self.parse_object(pos),
        }
    }

    fn peek(&self, pos: usize) -> Option<u8> {
        self.input.as_bytes().get(pos).copied()
    }

    fn starts_with_at(&self, pos: usize, literal: &str) -> bool {
        self.input
            .as_bytes()
            .get(pos..)
            .map_or(false, |rest| rest.starts_with(literal.as_bytes()))
    }

    /// Human-readable description of what sits at `pos`, for error messages.
    fn describe(&self, pos: usize) -> String {
        match self.input.get(pos..).and_then(|rest| rest.chars().next()) {
            Some(ch) => format!("{:?}", ch),
            None => "end of input".to_string(),
        }
    }

    fn parse_undefined(&self, pos: usize) -> Result<(Value, usize)> {
        if self.starts_with_at(pos, "undefined") {
            return Ok((Value::Undefined, "undefined".len()));
        }
        match self.peek(pos) {
            Some(b',') | Some(b']') => Ok((Value::Undefined, 0)),
            _ => Err(Error::invalid_value(pos, "expected undefined")),
        }
    }

    fn parse_null(&self, pos: usize) -> Result<(Value, usize)> {
        if self.starts_with_at(pos, "null") {
            Ok((Value::Null, "null".len()))
        } else {
            Err(Error::invalid_value(pos, "expected null"))
        }
    }

    fn parse_boolean(&self, pos: usize) -> Result<(Value, usize)> {
        if self.starts_with_at(pos, "true") {
            Ok((Value::Bool(true), "true".len()))
        } else if self.starts_with_at(pos, "false") {
            Ok((Value::Bool(false), "false".len()))
        } else {
            Err(Error::boolean_format(pos, "expected true or false"))
        }
    }

    fn parse_number(&self, pos: usize) -> Result<(Value, usize)> {
        let rest = self.input.as_bytes().get(pos..).unwrap_or_default();
        let len = rest
            .iter()
            .position(|&b| matches!(b, b',' | b'}' | b']'))
            .unwrap_or(rest.len());
        let text = self.input.get(pos..pos + len).unwrap_or_default();

        // `f64::from_str` also takes `inf`, `infinity` and `nan` in any case
        let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
        let spelled_out = unsigned == "Infinity" || text == "NaN";
        let stray_letter = unsigned
            .bytes()
            .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'));
        if !spelled_out && stray_letter {
            return Err(Error::number_format(pos, &format!("invalid number {:?}", text)));
        }

        text.parse::<f64>()
            .map(|n| (Value::Number(n), len))
            .map_err(|_| Error::number_format(pos, &format!("invalid number {:?}", text)))
    }

    fn parse_string(&self, pos: usize) -> Result<(Value, usize)> {
        let bytes = self.input.as_bytes();
        let quote = match self.peek(pos) {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(Error::string_format(pos, "expected opening quote")),
        };

        let mut i = pos + 1;
        while i < bytes.len() {
            if bytes[i] == quote && !is_escaped(self.input, i) {
                let content = self.input[pos + 1..i].to_string();
                return Ok((Value::String(content), i + 1 - pos));
            }
            i += 1;
        }
        Err(Error::string_format(pos, "unterminated string"))
    }

    fn enter(&mut self, pos: usize) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded {
                position: pos,
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_array(&mut self, pos: usize) -> Result<(Value, usize)> {
        self.enter(pos)?;
        let result = self.parse_array_items(pos);
        self.depth -= 1;
        result
    }

    fn parse_array_items(&mut self, pos: usize) -> Result<(Value, usize)> {
        let mut cursor = pos + 1;
        if self.peek(cursor) == Some(b']') {
            return Ok((Value::Array(Vec::new()), 2));
        }

        let mut elements = Vec::new();
        loop {
            let value_type = match self.classify_at(cursor) {
                Some(value_type) => value_type,
                None if self.peek(cursor).is_none() => {
                    return Err(Error::array_format(cursor, "unterminated array"))
                }
                None => {
                    return Err(Error::array_format(
                        cursor,
                        &format!("{} does not start an element", self.describe(cursor)),
                    ))
                }
            };
            let (element, width) = self.parse_value_at(cursor, value_type)?;
            elements.push(element);
            cursor += width;

            match self.peek(cursor) {
                Some(b',') => cursor += 1,
                Some(b']') => return Ok((Value::Array(elements), cursor + 1 - pos)),
                Some(_) => {
                    return Err(Error::array_format(
                        cursor,
                        &format!("missing separator before {}", self.describe(cursor)),
                    ))
                }
                None => return Err(Error::array_format(cursor, "unterminated array")),
            }
        }
    }

    fn parse_object(&mut self, pos: usize) -> Result<(Value, usize)> {
        self.enter(pos)?;
        let result = self.parse_object_members(pos);
        self.depth -= 1;
        result
    }

    fn parse_object_members(&mut self, pos: usize) -> Result<(Value, usize)> {
        let mut map = RecordMap::new();
        let mut cursor = pos + 1;

        loop {
            // key mode
            let key_start = cursor;
            loop {
                match self.peek(cursor) {
                    Some(b':') => break,
                    Some(b'}') if cursor == key_start => {
                        return Ok((Value::Object(map), cursor + 1 - pos));
                    }
                    Some(b) if is_key_byte(b) => cursor += 1,
                    Some(b'}') => return Err(Error::object_key(cursor, "missing ':' after key")),
                    Some(_) => {
                        return Err(Error::object_key(
                            cursor,
                            &format!("invalid character {} in key", self.describe(cursor)),
                        ))
                    }
                    None => return Err(Error::object_key(cursor, "unterminated object")),
                }
            }
            if cursor == key_start {
                return Err(Error::object_key(cursor, "empty key"));
            }
            let key = self.input[key_start..cursor].to_string();
            cursor += 1;

            // value mode
            let value_type = match self.peek(cursor) {
                None => return Err(Error::object_value(cursor, "unterminated object")),
                Some(b',' | b']' | b'}') => {
                    return Err(Error::object_value(
                        cursor,
                        &format!("missing value for key '{}'", key),
                    ))
                }
                Some(_) => self.classify_at(cursor).ok_or_else(|| {
                    Error::object_value(
                        cursor,
                        &format!(
                            "{} does not start a value for key '{}'",
                            self.describe(cursor),
                            key
                        ),
                    )
                })?,
            };
            let (value, width) = self.parse_value_at(cursor, value_type)?;
            map.insert(key, value);
            cursor += width;

            match self.peek(cursor) {
                Some(b',') => cursor += 1,
                Some(b'}') => return Ok((Value::Object(map), cursor + 1 - pos)),
                Some(_) => {
                    return Err(Error::object_value(
                        cursor,
                        &format!("missing separator before {}", self.describe(cursor)),
                    ))
                }
                None => return Err(Error::object_value(cursor, "unterminated object")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn parser(text: &str) -> Parser<'_> {
        Parser::new(text, &ParseOptions::default())
    }

    fn parse_at(text: &str, pos: usize) -> Result<(Value, usize)> {
        let mut parser = parser(text);
        let value_type = parser.classify_at(pos).expect("classifiable");
        parser.parse_value_at(pos, value_type)
    }

    #[test]
    fn test_classify() {
        let cases = [
            ("{}", Some(ValueType::Object)),
            ("[]", Some(ValueType::Array)),
            ("\"s\"", Some(ValueType::String)),
            ("'s'", Some(ValueType::String)),
            ("true", Some(ValueType::Boolean)),
            ("fals", Some(ValueType::Boolean)),
            ("-1", Some(ValueType::Number)),
            ("+1", Some(ValueType::Number)),
            (".5", Some(ValueType::Number)),
            ("Infinity", Some(ValueType::Number)),
            ("NaN", Some(ValueType::Number)),
            ("null", Some(ValueType::Null)),
            ("undefined", Some(ValueType::Undefined)),
            (",", Some(ValueType::Undefined)),
            ("]", Some(ValueType::Undefined)),
            ("nul", None),
            ("nult", None),
            ("undefine", None),
            ("Inf", None),
            ("}", None),
            (":", None),
            ("x", None),
            ("", None),
        ];
        for (text, expected) in cases {
            assert_eq!(parser(text).classify_at(0), expected, "classifying {:?}", text);
        }
        assert_eq!(parser("[1]").classify_at(3), None);
    }

    #[test]
    fn test_consumed_widths() {
        assert_eq!(parse_at("25.5,", 0).unwrap(), (Value::Number(25.5), 4));
        assert_eq!(parse_at("true]", 0).unwrap(), (Value::Bool(true), 4));
        assert_eq!(parse_at("false}", 0).unwrap(), (Value::Bool(false), 5));
        assert_eq!(parse_at("null", 0).unwrap(), (Value::Null, 4));
        assert_eq!(parse_at("undefined", 0).unwrap(), (Value::Undefined, 9));
        assert_eq!(parse_at(",", 0).unwrap(), (Value::Undefined, 0));
        assert_eq!(
            parse_at("'ab'", 0).unwrap(),
            (Value::String("ab".to_string()), 4)
        );
        assert_eq!(parse_at("[1,[2]],", 0).unwrap().1, 7);
        assert_eq!(parse_at("{a:{b:1}}]", 0).unwrap().1, 9);
    }

    #[test]
    fn test_nested_position() {
        let (value, width) = parse_at("[0,[1,2],3]", 3).unwrap();
        assert_eq!(width, 5);
        assert_eq!(value.stringify(), "[1,2]");
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(parse_at("1e3", 0).unwrap().0, Value::Number(1000.0));
        assert_eq!(parse_at("+7", 0).unwrap().0, Value::Number(7.0));
        assert_eq!(parse_at(".5", 0).unwrap().0, Value::Number(0.5));
        assert_eq!(parse_at("-Infinity", 0).unwrap().0, Value::Number(f64::NEG_INFINITY));
        assert!(parse_at("NaN", 0).unwrap().0.as_number().is_nan());

        let err = parse_at("1.2.3", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumberFormat);
        assert_eq!(parse_at("-", 0).unwrap_err().kind(), ErrorKind::NumberFormat);
        assert_eq!(parse_at("Infinityx", 0).unwrap_err().kind(), ErrorKind::NumberFormat);

        for text in ["-inf", "+nan", "-infinity", "+INF", "-NaN", "1.5f"] {
            assert_eq!(
                parse_at(text, 0).unwrap_err().kind(),
                ErrorKind::NumberFormat,
                "accepted {}",
                text
            );
        }
        assert_eq!(parse_at("+Infinity", 0).unwrap().0, Value::Number(f64::INFINITY));
        assert_eq!(parse_at("1E-2", 0).unwrap().0, Value::Number(0.01));
    }

    #[test]
    fn test_string_delimiters() {
        let (value, _) = parse_at("\"it's\"", 0).unwrap();
        assert_eq!(value.as_str(), "it's");
        let (value, _) = parse_at("'say \"hi\"'", 0).unwrap();
        assert_eq!(value.as_str(), "say \"hi\"");
        let (value, width) = parse_at("'a\\'b'", 0).unwrap();
        assert_eq!(value.as_str(), "a\\'b");
        assert_eq!(width, 6);

        let err = parse_at("'abc\"", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StringFormat);
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn test_boolean_errors() {
        assert_eq!(parse_at("tru", 0).unwrap_err().kind(), ErrorKind::BooleanFormat);
        assert_eq!(parse_at("fa", 0).unwrap_err().kind(), ErrorKind::BooleanFormat);
    }

    #[test]
    fn test_array_errors() {
        let err = parse_at("[\"a\"1]", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArrayFormat);
        assert_eq!(err.position(), Some(4));

        assert_eq!(parse_at("[", 0).unwrap_err().kind(), ErrorKind::ArrayFormat);
        assert_eq!(parse_at("[1,", 0).unwrap_err().kind(), ErrorKind::ArrayFormat);
        assert_eq!(parse_at("[1,x]", 0).unwrap_err().kind(), ErrorKind::ArrayFormat);
        assert_eq!(parse_at("[}]", 0).unwrap_err().kind(), ErrorKind::ArrayFormat);
    }

    #[test]
    fn test_object_errors() {
        let key_error = |text: &str| parse_at(text, 0).unwrap_err().kind();
        assert_eq!(key_error("{a-b:1}"), ErrorKind::ObjectKey);
        assert_eq!(key_error("{:1}"), ErrorKind::ObjectKey);
        assert_eq!(key_error("{a}"), ErrorKind::ObjectKey);
        assert_eq!(key_error("{a"), ErrorKind::ObjectKey);
        assert_eq!(key_error("{'a':1}"), ErrorKind::ObjectKey);
        assert_eq!(key_error("{a:"), ErrorKind::ObjectValue);
        assert_eq!(key_error("{a:}"), ErrorKind::ObjectValue);
        assert_eq!(key_error("{a:,b:1}"), ErrorKind::ObjectValue);
        assert_eq!(key_error("{a:1"), ErrorKind::ObjectValue);
        assert_eq!(key_error("{a:1]"), ErrorKind::ObjectValue);
        assert_eq!(key_error("{a:\"x\"b:1}"), ErrorKind::ObjectValue);
    }

    #[test]
    fn test_nested_error_is_reported_unchanged() {
        let err = parse_at("{a:[1,{b:tru}]}", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BooleanFormat);
        assert_eq!(err.position(), Some(9));
    }

    #[test]
    fn test_trailing_comma_in_object() {
        let (value, width) = parse_at("{a:1,}", 0).unwrap();
        assert_eq!(value.stringify(), "{a:1}");
        assert_eq!(width, 6);
    }

    #[test]
    fn test_depth_limit() {
        let options = ParseOptions::new().with_max_depth(3);
        let mut ok = Parser::new("[[[1]]]", &options);
        assert!(ok.parse_document().is_ok());

        let mut too_deep = Parser::new("[[{a:[1]}]]", &options);
        let err = too_deep.parse_document().unwrap_err();
        assert_eq!(
            err,
            Error::DepthLimitExceeded {
                position: 5,
                limit: 3
            }
        );
    }

    #[test]
    fn test_document_errors() {
        assert_eq!(parser("").parse_document().unwrap_err(), Error::UnexpectedEnd);
        assert_eq!(
            parser("1,2").parse_document().unwrap_err(),
            Error::TrailingData { position: 1 }
        );
        assert_eq!(
            parser("]").parse_document().unwrap_err(),
            Error::TrailingData { position: 0 }
        );
        assert_eq!(parser("}").parse_document().unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(parser("nul").parse_document().unwrap_err().kind(), ErrorKind::InvalidValue);
    }
}
