use crate::error::ParseError;

const QUOTE: char = '"';
const BACKSLASH: char = '\\';
const LINE_FEED: char = '\n';
const CARRIAGE_RETURN: char = '\r';
const SPACE: char = ' ';
const EQUALS: char = '=';

/// Skip characters common to all modes except line mode.
const SKIP_DEFAULT: &[char] = &[CARRIAGE_RETURN, SPACE];

/// Multi-mode cursor over wordfile source text.
///
/// Every scan skips a set of separator characters, then either returns a
/// single hard-delimiter character as its own token or accumulates characters
/// until the next separator or hard delimiter. The caller picks the sets per
/// call, which is what distinguishes token, word, command and line mode.
pub(crate) struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Current character offset, as reported in parse errors.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.chars.len());
    }

    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    fn scan(&mut self, skip: &[char], hard: &[char]) -> Option<String> {
        while self.pos < self.chars.len() && skip.contains(&self.chars[self.pos]) {
            self.pos += 1;
        }
        if self.pos >= self.chars.len() {
            return None;
        }
        let c = self.chars[self.pos];
        if hard.contains(&c) {
            self.pos += 1;
            return Some(c.to_string());
        }
        let start = self.pos;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            if skip.contains(&c) || hard.contains(&c) {
                break;
            }
            self.pos += 1;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn peek_scan(&mut self, skip: &[char], hard: &[char]) -> Option<String> {
        let saved = self.pos;
        let token = self.scan(skip, hard);
        self.pos = saved;
        token
    }

    /// Token mode: quote, backslash and line feed are hard delimiters.
    pub(crate) fn next_token(&mut self) -> Option<String> {
        self.scan(SKIP_DEFAULT, &[QUOTE, BACKSLASH, LINE_FEED])
    }

    pub(crate) fn peek_token(&mut self) -> Option<String> {
        self.peek_scan(SKIP_DEFAULT, &[QUOTE, BACKSLASH, LINE_FEED])
    }

    /// Word mode: only the line feed is hard, so quotes stick to the word.
    pub(crate) fn next_word(&mut self) -> Option<String> {
        self.scan(SKIP_DEFAULT, &[LINE_FEED])
    }

    pub(crate) fn peek_word(&mut self) -> Option<String> {
        self.peek_scan(SKIP_DEFAULT, &[LINE_FEED])
    }

    /// Command mode: like token mode but `=` is hard too, so directive
    /// phrases like `Colors=` split before the equals sign.
    pub(crate) fn next_command_raw(&mut self) -> Option<String> {
        self.scan(SKIP_DEFAULT, &[QUOTE, BACKSLASH, LINE_FEED, EQUALS])
    }

    pub(crate) fn peek_command_raw(&mut self) -> Option<String> {
        self.peek_scan(SKIP_DEFAULT, &[QUOTE, BACKSLASH, LINE_FEED, EQUALS])
    }

    /// Line mode: everything up to (and consuming) the next line feed.
    /// Carriage returns are dropped.
    pub(crate) fn next_line(&mut self) -> Option<String> {
        let line = self.scan(&[CARRIAGE_RETURN], &[LINE_FEED]);
        match line {
            Some(ref s) if s == "\n" => Some(String::new()),
            Some(s) => {
                // Consume the line terminator, if any.
                while self.chars.get(self.pos) == Some(&CARRIAGE_RETURN) {
                    self.pos += 1;
                }
                if self.chars.get(self.pos) == Some(&LINE_FEED) {
                    self.pos += 1;
                }
                Some(s)
            }
            None => None,
        }
    }

    /// Read a token that may be a quoted string.
    ///
    /// If the next token is not an opening quote it is returned as-is (it may
    /// be a bare line feed). Inside a quoted string, a backslash escapes only
    /// a following quote; any other backslash is literal. A line feed or end
    /// of input before the closing quote is an error in strict mode and
    /// returns the partial content otherwise.
    pub(crate) fn next_string(&mut self, strict: bool) -> Result<Option<String>, ParseError> {
        let first = match self.scan(SKIP_DEFAULT, &[QUOTE, LINE_FEED]) {
            Some(t) => t,
            None => return Ok(None),
        };
        if first != "\"" {
            return Ok(Some(first));
        }
        let mut value = String::new();
        loop {
            match self.scan(&[CARRIAGE_RETURN], &[BACKSLASH, QUOTE, LINE_FEED]) {
                Some(part) if part == "\"" => return Ok(Some(value)),
                Some(part) if part == "\\" => {
                    if self.chars.get(self.pos) == Some(&QUOTE) {
                        self.pos += 1;
                        value.push(QUOTE);
                    } else {
                        value.push(BACKSLASH);
                    }
                }
                Some(part) if part == "\n" => {
                    if strict {
                        return Err(ParseError::new(
                            "string literal is not properly closed by a double-quote",
                            self.pos,
                        ));
                    }
                    // Unconsume the line feed so callers still see the line end.
                    self.pos -= 1;
                    return Ok(Some(value));
                }
                Some(part) => value.push_str(&part),
                None => {
                    if strict {
                        return Err(ParseError::new(
                            "string literal is not properly closed by a double-quote",
                            self.pos,
                        ));
                    }
                    return Ok(Some(value));
                }
            }
        }
    }

    pub(crate) fn has_more(&self) -> bool {
        self.pos < self.chars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_mode_hard_delimiters() {
        let mut t = Tokenizer::new("/L1\"Name\"\nNext");
        assert_eq!(t.next_token().as_deref(), Some("/L1"));
        assert_eq!(t.next_token().as_deref(), Some("\""));
        assert_eq!(t.next_token().as_deref(), Some("Name"));
        assert_eq!(t.next_token().as_deref(), Some("\""));
        assert_eq!(t.next_token().as_deref(), Some("\n"));
        assert_eq!(t.next_token().as_deref(), Some("Next"));
        assert_eq!(t.next_token(), None);
    }

    #[test]
    fn test_word_mode_keeps_quotes() {
        let mut t = Tokenizer::new("a\"b \r\nc");
        assert_eq!(t.next_word().as_deref(), Some("a\"b"));
        assert_eq!(t.next_word().as_deref(), Some("\n"));
        assert_eq!(t.next_word().as_deref(), Some("c"));
    }

    #[test]
    fn test_command_mode_splits_on_equals() {
        let mut t = Tokenizer::new("Colors = 255");
        assert_eq!(t.next_command_raw().as_deref(), Some("Colors"));
        assert_eq!(t.next_command_raw().as_deref(), Some("="));
        assert_eq!(t.next_command_raw().as_deref(), Some("255"));
    }

    #[test]
    fn test_line_mode() {
        let mut t = Tokenizer::new("one two\r\nthree");
        assert_eq!(t.next_line().as_deref(), Some("one two"));
        assert_eq!(t.next_line().as_deref(), Some("three"));
        assert_eq!(t.next_line(), None);
    }

    #[test]
    fn test_quoted_string_with_escape() {
        let mut t = Tokenizer::new("\"say \\\"hi\\\"\" rest");
        assert_eq!(t.next_string(true).unwrap().as_deref(), Some("say \"hi\""));
        assert_eq!(t.next_token().as_deref(), Some("rest"));
    }

    #[test]
    fn test_unterminated_string_strict_and_lenient() {
        let mut t = Tokenizer::new("\"open\n");
        let err = t.next_string(true).unwrap_err();
        assert!(err.message.contains("double-quote"));

        let mut t = Tokenizer::new("\"open\nnext");
        assert_eq!(t.next_string(false).unwrap().as_deref(), Some("open"));
        // The line feed is still there for the caller.
        assert_eq!(t.next_token().as_deref(), Some("\n"));
    }

    #[test]
    fn test_unquoted_string_token() {
        let mut t = Tokenizer::new("bare");
        assert_eq!(t.next_string(true).unwrap().as_deref(), Some("bare"));
        assert_eq!(t.next_string(true).unwrap(), None);
    }
}
