//! RDATA tokenizer.
//!
//! Works on one physical line at a time through a byte cursor. State that
//! outlives a line (an open parenthesis group or an open quoted string) lives
//! in [`Continuation`], owned by the entry parser.

use super::{Result, ZoneError};
use std::borrow::Cow;
use tracing::trace;

/// Multi-line constructs still open after the current line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Continuation {
    /// Line the open parenthesis was found on
    pub paren_line: Option<usize>,
    /// Line the open quote was found on
    pub quote_line: Option<usize>,
}

impl Continuation {
    /// True while the logical entry continues onto the next line
    pub fn is_active(&self) -> bool {
        self.paren_line.is_some() || self.quote_line.is_some()
    }
}

/// One lexical item of RDATA
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text, joined onto any text directly before it
    Text(Cow<'a, str>),
    /// Whitespace or a parenthesis: ends the current RDATA part
    Separator,
}

/// Cursor over a single line
#[derive(Debug)]
pub struct Tokenizer<'a> {
    line: &'a str,
    pos: usize,
    line_no: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(line: &'a str, line_no: usize) -> Self {
        Self {
            line,
            pos: 0,
            line_no,
        }
    }

    /// Unconsumed remainder of the line
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Next whitespace-delimited header field (owner, TTL, class, type).
    ///
    /// Stops at a comment or a parenthesis, leaving those for
    /// [`Tokenizer::next_token`].
    pub fn next_word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        let end = self.line[start..]
            .find(|c: char| c.is_ascii_whitespace() || ";()".contains(c))
            .map_or(self.line.len(), |i| start + i);
        if end == start {
            return None;
        }
        self.pos = end;
        Some(&self.line[start..end])
    }

    /// Next TTL, class or type field, stepping over parentheses.
    ///
    /// A group may open before the record type, so the header can span
    /// lines as well.
    pub fn next_header_word(&mut self, cont: &mut Continuation) -> Result<Option<&'a str>> {
        loop {
            self.skip_whitespace();
            match self.line.as_bytes().get(self.pos) {
                Some(b'(') => {
                    if cont.paren_line.is_some() {
                        return Err(ZoneError::NestedParenthesis { line: self.line_no });
                    }
                    cont.paren_line = Some(self.line_no);
                    self.pos += 1;
                }
                Some(b')') => {
                    if cont.paren_line.take().is_none() {
                        return Err(ZoneError::UnmatchedCloseParenthesis { line: self.line_no });
                    }
                    self.pos += 1;
                }
                _ => return Ok(self.next_word()),
            }
        }
    }

    /// Fail unless only whitespace or a comment remains
    pub fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() || rest.starts_with(';') {
            self.pos = self.line.len();
            Ok(())
        } else {
            Err(ZoneError::syntax(
                self.line_no,
                format!("unexpected trailing content '{}'", rest.trim_end()),
            ))
        }
    }

    /// Next RDATA token, or `None` at end of line or at a comment
    pub fn next_token(&mut self, cont: &mut Continuation) -> Result<Option<Token<'a>>> {
        if cont.quote_line.is_some() {
            if self.pos >= self.line.len() {
                return Ok(None);
            }
            return self.quoted(cont).map(Some);
        }
        if self.skip_whitespace() {
            return Ok(Some(Token::Separator));
        }
        let bytes = self.line.as_bytes();
        let Some(&b) = bytes.get(self.pos) else {
            return Ok(None);
        };
        match b {
            b';' => {
                self.pos = self.line.len();
                Ok(None)
            }
            b'(' => {
                if cont.paren_line.is_some() {
                    return Err(ZoneError::NestedParenthesis { line: self.line_no });
                }
                trace!("line {}: parenthesis opened", self.line_no);
                cont.paren_line = Some(self.line_no);
                self.pos += 1;
                Ok(Some(Token::Separator))
            }
            b')' => {
                if cont.paren_line.take().is_none() {
                    return Err(ZoneError::UnmatchedCloseParenthesis { line: self.line_no });
                }
                self.pos += 1;
                Ok(Some(Token::Separator))
            }
            b'"' => {
                cont.quote_line = Some(self.line_no);
                self.pos += 1;
                self.quoted(cont).map(Some)
            }
            b'\\' => self.escape().map(|c| Some(Token::Text(Cow::Owned(c.to_string())))),
            _ => {
                let start = self.pos;
                let end = self.line[start..]
                    .find(|c: char| c.is_ascii_whitespace() || "\";()\\".contains(c))
                    .map_or(self.line.len(), |i| start + i);
                self.pos = end;
                Ok(Some(Token::Text(Cow::Borrowed(&self.line[start..end]))))
            }
        }
    }

    /// Consume whitespace, reporting whether any was found
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        let rest = &self.line[start..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        self.pos = start + (rest.len() - trimmed.len());
        self.pos > start
    }

    /// Body of a quoted string up to the closing quote or end of line
    fn quoted(&mut self, cont: &mut Continuation) -> Result<Token<'a>> {
        let start = self.pos;
        let mut owned: Option<String> = None;
        let mut seg_start = start;

        while let Some(offset) = self.line[self.pos..].find(['"', '\\']) {
            let at = self.pos + offset;
            if self.line.as_bytes()[at] == b'"' {
                self.pos = at + 1;
                cont.quote_line = None;
                let text = match owned {
                    Some(mut s) => {
                        s.push_str(&self.line[seg_start..at]);
                        Cow::Owned(s)
                    }
                    None => Cow::Borrowed(&self.line[start..at]),
                };
                return Ok(Token::Text(text));
            }
            let buf = owned.get_or_insert_with(String::new);
            buf.push_str(&self.line[seg_start..at]);
            self.pos = at;
            let c = self.escape()?;
            owned.get_or_insert_with(String::new).push(c);
            seg_start = self.pos;
        }

        // No closing quote on this line: the string continues on the next one.
        self.pos = self.line.len();
        let text = match owned {
            Some(mut s) => {
                s.push_str(&self.line[seg_start..]);
                Cow::Owned(s)
            }
            None => Cow::Borrowed(&self.line[start..]),
        };
        Ok(Token::Text(text))
    }

    /// Decode an escape sequence starting at the backslash under the cursor
    fn escape(&mut self) -> Result<char> {
        let body = &self.line[self.pos + 1..];
        let digits = body.as_bytes().get(..3);
        if let Some(d) = digits.filter(|d| d.iter().all(|b| (b'0'..=b'7').contains(b))) {
            let value = d
                .iter()
                .fold(0u32, |acc, b| (acc << 3) | u32::from(b - b'0'));
            let byte = u8::try_from(value).map_err(|_| {
                ZoneError::syntax(self.line_no, format!("escape \\{} out of range", &body[..3]))
            })?;
            self.pos += 4;
            return Ok(char::from(byte));
        }
        match body.chars().next() {
            Some(c) => {
                self.pos += 1 + c.len_utf8();
                Ok(c)
            }
            None => Err(ZoneError::syntax(self.line_no, "dangling escape at end of line")),
        }
    }
}

/// Accumulates tokens into RDATA parts
///
/// Text tokens with nothing between them form one part; separators and line
/// ends start a new one.
#[derive(Debug, Default, Clone)]
pub struct RdataBuilder {
    parts: Vec<String>,
    joining: bool,
}

impl RdataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token<'_>) {
        match token {
            Token::Text(text) => self.push_text(&text),
            Token::Separator => self.joining = false,
        }
    }

    pub fn push_text(&mut self, text: &str) {
        match self.parts.last_mut() {
            Some(last) if self.joining => last.push_str(text),
            _ => self.parts.push(text.to_owned()),
        }
        self.joining = true;
    }

    /// End the current part
    pub fn separate(&mut self) {
        self.joining = false;
    }

    /// Drain every token left on the line
    pub fn fill(&mut self, tokenizer: &mut Tokenizer<'_>, cont: &mut Continuation) -> Result<()> {
        while let Some(token) = tokenizer.next_token(cont)? {
            trace!("line {}: token {:?}", tokenizer.line_no(), token);
            self.push(token);
        }
        if cont.quote_line.is_none() {
            self.separate();
        }
        Ok(())
    }

    pub fn into_parts(self) -> Vec<String> {
        self.parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(line: &str) -> Result<(Vec<String>, Continuation)> {
        let mut cont = Continuation::default();
        let mut builder = RdataBuilder::new();
        builder.fill(&mut Tokenizer::new(line, 1), &mut cont)?;
        Ok((builder.into_parts(), cont))
    }

    #[test]
    fn test_whitespace_separates_parts() {
        let (p, cont) = parts("257 3  8\tAwEAAQ==").unwrap();
        assert_eq!(p, vec!["257", "3", "8", "AwEAAQ=="]);
        assert!(!cont.is_active());
    }

    #[test]
    fn test_comment_ends_line() {
        let (p, _) = parts("1 2 ; three four").unwrap();
        assert_eq!(p, vec!["1", "2"]);
    }

    #[test]
    fn test_quoted_string_is_one_part() {
        let (p, _) = parts(r#""hello world" "say \"hi\"" """#).unwrap();
        assert_eq!(p, vec!["hello world", "say \"hi\"", ""]);
    }

    #[test]
    fn test_adjacent_segments_join() {
        let (p, _) = parts(r#"abc"def"\;x next"#).unwrap();
        assert_eq!(p, vec!["abcdef;x", "next"]);
    }

    #[test]
    fn test_octal_escape() {
        let (p, _) = parts(r"a\101b \040").unwrap();
        assert_eq!(p, vec!["aAb", " "]);
    }

    #[test]
    fn test_octal_escape_out_of_range() {
        assert!(matches!(
            parts(r"\777"),
            Err(ZoneError::SyntaxError { line: 1, .. })
        ));
    }

    #[test]
    fn test_non_octal_digits_escape_single_char() {
        let (p, _) = parts(r"\890").unwrap();
        assert_eq!(p, vec!["890"]);
    }

    #[test]
    fn test_parentheses_open_continuation() {
        let (p, cont) = parts("257 3 8 ( AwEA").unwrap();
        assert_eq!(p, vec!["257", "3", "8", "AwEA"]);
        assert_eq!(cont.paren_line, Some(1));
    }

    #[test]
    fn test_parenthesis_splits_adjacent_text() {
        let (p, cont) = parts("a(b)c").unwrap();
        assert_eq!(p, vec!["a", "b", "c"]);
        assert!(!cont.is_active());
    }

    #[test]
    fn test_nested_parentheses_rejected() {
        assert_eq!(
            parts("( ( x ) )").unwrap_err(),
            ZoneError::NestedParenthesis { line: 1 }
        );
    }

    #[test]
    fn test_unmatched_close_rejected() {
        assert_eq!(
            parts("x )").unwrap_err(),
            ZoneError::UnmatchedCloseParenthesis { line: 1 }
        );
    }

    #[test]
    fn test_unterminated_quote_continues() {
        let mut cont = Continuation::default();
        let mut builder = RdataBuilder::new();
        builder
            .fill(&mut Tokenizer::new(r#"x "first half"#, 3), &mut cont)
            .unwrap();
        assert_eq!(cont.quote_line, Some(3));

        builder.push_text("\n");
        builder
            .fill(&mut Tokenizer::new(r#"second" y"#, 4), &mut cont)
            .unwrap();
        assert!(!cont.is_active());
        assert_eq!(builder.into_parts(), vec!["x", "first half\nsecond", "y"]);
    }

    #[test]
    fn test_next_word_stops_at_paren_and_comment() {
        let mut tok = Tokenizer::new("  www 3600 IN SOA( a ;c", 1);
        assert_eq!(tok.next_word(), Some("www"));
        assert_eq!(tok.next_word(), Some("3600"));
        assert_eq!(tok.next_word(), Some("IN"));
        assert_eq!(tok.next_word(), Some("SOA"));
        assert_eq!(tok.rest(), "( a ;c");
    }

    #[test]
    fn test_header_words_step_over_parentheses() {
        let mut cont = Continuation::default();
        let mut t = Tokenizer::new("(300 IN) DS ; c", 4);
        assert_eq!(t.next_header_word(&mut cont).unwrap(), Some("300"));
        assert_eq!(cont.paren_line, Some(4));
        assert_eq!(t.next_header_word(&mut cont).unwrap(), Some("IN"));
        assert_eq!(t.next_header_word(&mut cont).unwrap(), Some("DS"));
        assert_eq!(cont.paren_line, None);
        assert_eq!(t.next_header_word(&mut cont).unwrap(), None);

        let mut t = Tokenizer::new(") IN", 2);
        assert_eq!(
            t.next_header_word(&mut cont).unwrap_err(),
            ZoneError::UnmatchedCloseParenthesis { line: 2 }
        );
    }

    #[test]
    fn test_expect_end() {
        let mut tok = Tokenizer::new("   ; trailing comment", 9);
        assert!(tok.expect_end().is_ok());

        let mut tok = Tokenizer::new(" junk", 9);
        assert!(matches!(
            tok.expect_end(),
            Err(ZoneError::SyntaxError { line: 9, .. })
        ));
    }
}
