//! Whitespace and comment stripping.
//!
//! [`normalize`] is the pre-pass every parse starts with. It removes everything
//! insignificant outside quoted strings so the parser never has to skip
//! whitespace:
//!
//! - whitespace (`char::is_whitespace`)
//! - `// line comments` up to the end of the line
//! - `/* block comments */` (an unterminated one runs to the end of input)
//!
//! Inside a string every character is copied verbatim. A string opens on `"`
//! or `'` and closes on the next unescaped quote of the same kind; a quote
//! preceded by an odd number of backslashes is escaped.
//!
//! ```rust
//! use jsrs::normalize;
//!
//! let text = "{\n  // who\n  name: 'Marcus Aurelius', /* born */ year: 121\n}";
//! assert_eq!(normalize(text), "{name:'Marcus Aurelius',year:121}");
//! ```

/// Returns `input` without insignificant whitespace and comments.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();
    let mut quote: Option<char> = None;

    while let Some((i, ch)) = chars.next() {
        if let Some(open) = quote {
            out.push(ch);
            if ch == open && !is_escaped(input, i) {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                if !is_escaped(input, i) {
                    quote = Some(ch);
                }
                out.push(ch);
            }
            '/' => match chars.peek() {
                Some(&(_, '/')) => {
                    // the newline itself is whitespace, drop it too
                    for (_, c) in chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some(&(_, '*')) => {
                    chars.next();
                    let mut prev = '\0';
                    for (_, c) in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            break;
                        }
                        prev = c;
                    }
                }
                _ => out.push(ch),
            },
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }

    out
}

/// Whether the byte at `index` is preceded by an odd run of backslashes.
pub(crate) fn is_escaped(text: &str, index: usize) -> bool {
    text.as_bytes()[..index]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
        % 2
        == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_whitespace() {
        assert_eq!(normalize("{ a : 1 ,\n\tb : [ 1 , 2 ] }"), "{a:1,b:[1,2]}");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_keeps_quoted_content() {
        assert_eq!(
            normalize("{ s : \" a // not a comment /* nor this */ \" }"),
            "{s:\" a // not a comment /* nor this */ \"}"
        );
        assert_eq!(normalize("[ 'a b' , \"c d\" ]"), "['a b',\"c d\"]");
    }

    #[test]
    fn test_other_quote_kind_does_not_close() {
        assert_eq!(normalize("\"it's  here\" , 'say \"hi  there\"'"), "\"it's  here\",'say \"hi  there\"'");
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(normalize("\"a\\\" b\" c"), "\"a\\\" b\"c");
        // an escaped backslash does not escape the quote after it
        assert_eq!(normalize("\"a\\\\\" b"), "\"a\\\\\"b");
        // escaped quote outside a string does not open one
        assert_eq!(normalize("\\\" a"), "\\\"a");
    }

    #[test]
    fn test_line_comments() {
        assert_eq!(normalize("{a:1, // first\n b:2}// end"), "{a:1,b:2}");
        assert_eq!(normalize("// only a comment"), "");
    }

    #[test]
    fn test_block_comments() {
        assert_eq!(normalize("[1, /* two\n lines */ 2]"), "[1,2]");
        assert_eq!(normalize("[1/**/,2]"), "[1,2]");
        assert_eq!(normalize("[1, /* ** */ 2]"), "[1,2]");
        assert_eq!(normalize("[1, /* unterminated"), "[1,");
    }

    #[test]
    fn test_lone_slash_is_kept() {
        assert_eq!(normalize("1/"), "1/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("a / b"), "a/b");
    }

    #[test]
    fn test_unterminated_string_copies_rest() {
        assert_eq!(normalize("['abc  , 1]"), "['abc  , 1]");
    }

    #[test]
    fn test_unicode_whitespace_and_text() {
        assert_eq!(normalize("{\u{00a0}k:\u{2003}'ü  ß'}"), "{k:'ü  ß'}");
    }
}
