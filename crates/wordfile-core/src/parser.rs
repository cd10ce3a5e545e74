use tracing::warn;

use crate::descriptor::{
    CodeFormat, FontStyle, LanguageKind, Rgb, Wordfile, STYLE_SLOT_COUNT,
};
use crate::error::ParseError;
use crate::tokenizer::Tokenizer;

impl Wordfile {
    /// Parse wordfile source leniently, discarding recovered errors.
    ///
    /// Recoverable directive errors are logged and parsing resumes at the
    /// next line; the result still fails when no recovery is possible.
    pub fn parse(source: &str) -> Result<Wordfile, ParseError> {
        Self::parse_lenient(source).map(|(wordfile, _)| wordfile)
    }

    /// Parse wordfile source strictly; the first grammar violation is fatal.
    pub fn parse_strict(source: &str) -> Result<Wordfile, ParseError> {
        parse_source(source, true).map(|(wordfile, _)| wordfile)
    }

    /// Parse wordfile source leniently, returning the recovered errors
    /// alongside the descriptor so callers can surface them.
    pub fn parse_lenient(source: &str) -> Result<(Wordfile, Vec<ParseError>), ParseError> {
        parse_source(source, false)
    }
}

fn parse_source(source: &str, strict: bool) -> Result<(Wordfile, Vec<ParseError>), ParseError> {
    let mut parser = Parser::new(source);
    let mut recovered = Vec::new();
    let mut position = 0usize;
    loop {
        match parser.parse_from(position) {
            Ok(()) => break,
            Err(err) => {
                if strict {
                    return Err(err);
                }
                let restart = parser.line_start_after(err.offset);
                match restart {
                    Some(next) if next > position => {
                        warn!(
                            offset = err.offset,
                            message = %err.message,
                            "recovered from wordfile parse error"
                        );
                        recovered.push(err);
                        position = next;
                    }
                    _ => return Err(err),
                }
            }
        }
    }
    let mut wordfile = parser.wordfile;
    wordfile.finish();
    Ok((wordfile, recovered))
}

/// Recursive-descent parser over the directive grammar.
///
/// Directive phrases are read in command mode (`=` splits), marker values in
/// word mode, names and quoted values through the string reader.
struct Parser {
    tokens: Tokenizer,
    wordfile: Wordfile,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            tokens: Tokenizer::new(source),
            wordfile: Wordfile::default(),
        }
    }

    /// Offset of a token the tokenizer just returned.
    fn token_start(&self, token: &str) -> usize {
        self.tokens.position().saturating_sub(token.chars().count())
    }

    fn unexpected(&self, token: &str) -> ParseError {
        ParseError::new(
            format!("unexpected token '{token}'"),
            self.token_start(token),
        )
    }

    fn end_of_file(&self) -> ParseError {
        ParseError::new("unexpected end of file", self.tokens.position())
    }

    fn require_command(&mut self) -> Result<String, ParseError> {
        self.tokens.next_command_raw().ok_or_else(|| self.end_of_file())
    }

    fn require_word(&mut self) -> Result<String, ParseError> {
        match self.tokens.next_word() {
            None => Err(self.end_of_file()),
            Some(word) if word == "\n" => Err(self.unexpected(&word)),
            Some(word) => Ok(word),
        }
    }

    fn expect_equals(&mut self, after: &str) -> Result<(), ParseError> {
        let token = self.require_command()?;
        if token == "=" {
            Ok(())
        } else {
            Err(ParseError::new(
                format!("literal '=' expected after '{after}'"),
                self.token_start(&token),
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        let token = self.require_command()?;
        if token.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&token))
        }
    }

    fn require_number(&mut self) -> Result<i64, ParseError> {
        let token = self.require_command()?;
        token
            .trim()
            .parse::<i64>()
            .map_err(|_| self.unexpected(&token))
    }

    fn require_boolean(&mut self) -> Result<bool, ParseError> {
        let token = self.require_command()?;
        if token == "\n" {
            return Err(self.unexpected(&token));
        }
        Ok(token == "1")
    }

    /// Top-level loop: every line starts a directive or a comment.
    fn parse_from(&mut self, position: usize) -> Result<(), ParseError> {
        self.tokens.set_position(position);
        while let Some(token) = self.tokens.next_command_raw() {
            if token == "\n" {
                continue;
            }
            if token.starts_with(';') || token.starts_with("--") {
                self.tokens.next_line();
                continue;
            }
            if token.starts_with('/') {
                self.parse_directive(&token)?;
                continue;
            }
            return Err(ParseError::new(
                "literal '/' or ';' or '--' expected at begin of line",
                self.token_start(&token),
            ));
        }
        Ok(())
    }

    fn parse_directive(&mut self, token: &str) -> Result<(), ParseError> {
        if let Some(number) = directive_number(token, "/L") {
            return self.parse_language(number);
        }
        if let Some(number) = directive_number(token, "/C") {
            return self.parse_code_format(number);
        }
        match token {
            "/Colors" => self.parse_colors(),
            "/Font" => {
                self.expect_keyword("Style")?;
                self.expect_equals("Font Style")?;
                let styles = self.parse_five(
                    |piece| piece.parse::<i64>().map(FontStyle::from_number).map_err(|_| ()),
                    FontStyle::Plain,
                )?;
                self.wordfile.font_styles = Some(styles);
                Ok(())
            }
            "/Delimiters" => {
                self.expect_equals("Delimiters")?;
                let line = self.tokens.next_line().unwrap_or_default();
                let value = line.strip_prefix(' ').unwrap_or(&line);
                self.wordfile.delimiters = Some(value.to_string());
                Ok(())
            }
            "/Indent" => {
                self.expect_keyword("Strings")?;
                if self
                    .tokens
                    .peek_command_raw()
                    .is_some_and(|t| t.eq_ignore_ascii_case("SOL"))
                {
                    self.tokens.next_command_raw();
                    self.expect_equals("Indent Strings SOL")?;
                    let values = self.collect_strings(true)?;
                    extend_unique(&mut self.wordfile.indent_strings_sol, values);
                } else {
                    self.expect_equals("Indent Strings")?;
                    let values = self.collect_strings(false)?;
                    extend_unique(&mut self.wordfile.indent_strings, values);
                }
                Ok(())
            }
            "/Unindent" => {
                self.expect_keyword("Strings")?;
                self.expect_equals("Unindent Strings")?;
                let values = self.collect_strings(true)?;
                extend_unique(&mut self.wordfile.unindent_strings, values);
                Ok(())
            }
            "/Open" => self.parse_region_markers(true),
            "/Close" => self.parse_region_markers(false),
            "/Ignore" => {
                let token = self.require_command()?;
                if token.eq_ignore_ascii_case("Fold") {
                    self.expect_keyword("Strings")?;
                    self.expect_equals("Ignore Fold Strings")?;
                    let values = self.collect_strings(true)?;
                    extend_unique(&mut self.wordfile.ignore_fold_strings, values);
                } else if token.eq_ignore_ascii_case("Strings") {
                    self.expect_keyword("SOL")?;
                    self.expect_equals("Ignore Strings SOL")?;
                    let values = self.collect_strings(true)?;
                    extend_unique(&mut self.wordfile.ignore_strings_sol, values);
                } else {
                    return Err(self.unexpected(&token));
                }
                Ok(())
            }
            "/Function" => {
                self.parse_marker_string("Function String", false, |w| &mut w.function_strings)
            }
            "/Member" => {
                self.parse_marker_string("Member String", true, |w| &mut w.member_strings)
            }
            "/Variable" => {
                self.parse_marker_string("Variable String", true, |w| &mut w.variable_strings)
            }
            "/Marker" => {
                self.expect_keyword("Characters")?;
                if self.tokens.peek_command_raw().as_deref() == Some("=") {
                    self.tokens.next_command_raw();
                }
                let values = self.collect_strings(false)?;
                extend_unique(&mut self.wordfile.marker_characters, values);
                Ok(())
            }
            "/Regexp" => {
                self.expect_keyword("Type")?;
                self.expect_equals("Regexp Type")?;
                self.wordfile.regex_type = Some(self.require_word()?);
                Ok(())
            }
            "//" => {
                self.tokens.next_line();
                Ok(())
            }
            _ if token.starts_with("/TG") => {
                self.tokens.next_line();
                Ok(())
            }
            // Header keywords may appear directive-style on their own line.
            _ => self.parse_header_keywords(Some(token[1..].to_string())),
        }
    }

    /// `/Open`/`/Close` `Brace|Fold|Comment Fold` `Strings = ...`
    fn parse_region_markers(&mut self, open: bool) -> Result<(), ParseError> {
        let side = if open { "Open" } else { "Close" };
        let token = self.require_command()?;
        let list = if token.eq_ignore_ascii_case("Brace") {
            self.expect_keyword("Strings")?;
            self.expect_equals(&format!("{side} Brace Strings"))?;
            if open {
                &mut self.wordfile.open_brace_strings
            } else {
                &mut self.wordfile.close_brace_strings
            }
        } else if token.eq_ignore_ascii_case("Fold") {
            self.expect_keyword("Strings")?;
            self.expect_equals(&format!("{side} Fold Strings"))?;
            if open {
                &mut self.wordfile.open_fold_strings
            } else {
                &mut self.wordfile.close_fold_strings
            }
        } else if token.eq_ignore_ascii_case("Comment") {
            self.expect_keyword("Fold")?;
            self.expect_keyword("Strings")?;
            self.expect_equals(&format!("{side} Comment Fold Strings"))?;
            if open {
                &mut self.wordfile.open_comment_fold_strings
            } else {
                &mut self.wordfile.close_comment_fold_strings
            }
        } else {
            return Err(self.unexpected(&token));
        };
        let values = collect_strings_from(&mut self.tokens, true)?;
        extend_unique(list, values);
        Ok(())
    }

    /// `/Function String [<n>] = "..."` and the member/variable variants.
    ///
    /// Function strings take one value per directive; member and variable
    /// strings collect values up to the end of the line.
    fn parse_marker_string(
        &mut self,
        context: &str,
        multi: bool,
        list: impl FnOnce(&mut Wordfile) -> &mut Vec<String>,
    ) -> Result<(), ParseError> {
        self.expect_keyword("String")?;
        let token = self.require_command()?;
        if token != "=" {
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                return Err(self.unexpected(&token));
            }
            self.expect_equals(context)?;
        }
        if multi {
            let values = self.collect_strings(false)?;
            extend_unique(list(&mut self.wordfile), values);
            return Ok(());
        }
        if let Some(value) = self.tokens.next_string(false)? {
            if value != "\n" {
                let list = list(&mut self.wordfile);
                if !list.contains(&value) {
                    list.push(value);
                }
            }
        }
        Ok(())
    }

    fn parse_colors(&mut self) -> Result<(), ParseError> {
        let token = self.require_command()?;
        if token == "=" {
            self.wordfile.colors = Some(self.parse_color_row()?);
        } else if token.eq_ignore_ascii_case("Back") {
            self.expect_equals("Colors Back")?;
            self.wordfile.colors_back = Some(self.parse_color_row()?);
        } else if token.eq_ignore_ascii_case("Auto") {
            self.expect_keyword("Back")?;
            self.expect_equals("Colors Auto Back")?;
            let flags = self.parse_five(|piece| Ok(piece == "1"), true)?;
            self.wordfile.colors_auto_back = Some(flags);
        } else {
            return Err(self.unexpected(&token));
        }
        Ok(())
    }

    fn parse_color_row(&mut self) -> Result<[Rgb; STYLE_SLOT_COUNT], ParseError> {
        self.parse_five(
            |piece| piece.parse::<i64>().map(convert_color).map_err(|_| ()),
            Rgb::new(0, 0, 0),
        )
    }

    /// A five-slot row: the rest of the line, comma-separated, each piece
    /// trimmed and converted.
    fn parse_five<T: Copy>(
        &mut self,
        mut convert: impl FnMut(&str) -> Result<T, ()>,
        init: T,
    ) -> Result<[T; STYLE_SLOT_COUNT], ParseError> {
        let start = self.tokens.position();
        let line = self.tokens.next_line().unwrap_or_default();
        let mut pieces = line.split(',');
        let mut values = [init; STYLE_SLOT_COUNT];
        for value in &mut values {
            let piece = pieces
                .next()
                .ok_or_else(|| ParseError::new("unexpected end of file", self.tokens.position()))?
                .trim();
            *value = convert(piece)
                .map_err(|_| ParseError::new(format!("unexpected token '{piece}'"), start))?;
        }
        Ok(values)
    }

    /// `/L<n>"Name" <keywords...>` up to the end of the line.
    fn parse_language(&mut self, number: i32) -> Result<(), ParseError> {
        self.wordfile.number = number;
        if self.tokens.peek_token().as_deref() == Some("\"") {
            if let Some(name) = self.tokens.next_string(false)? {
                self.wordfile.name = name;
            }
        }
        self.parse_header_keywords(None)
    }

    fn parse_header_keywords(&mut self, first: Option<String>) -> Result<(), ParseError> {
        let mut pending = first;
        loop {
            let token = match pending.take().or_else(|| self.tokens.next_command_raw()) {
                None => return Ok(()),
                Some(token) => token,
            };
            if token == "\n" {
                return Ok(());
            }
            if self.parse_header_keyword(&token)? {
                // File name/extension lists run to the end of the header.
                return Ok(());
            }
        }
    }

    /// Handle one header keyword; returns true when the header is finished.
    fn parse_header_keyword(&mut self, token: &str) -> Result<bool, ParseError> {
        if let Some(kind) = LanguageKind::from_keyword(token) {
            self.wordfile.kind = kind;
            return Ok(false);
        }
        let upper = token.to_ascii_uppercase();
        if upper.ends_with("_LANG") || upper.ends_with("_DEB") {
            // Unknown language or debugger tags carry no information here.
            return Ok(false);
        }
        match upper.as_str() {
            "CASE" => self.wordfile.nocase = false,
            "NOCASE" => self.wordfile.nocase = true,
            "QUOTE" => self.wordfile.noquote = false,
            "NOQUOTE" => self.wordfile.noquote = true,
            "ENABLEMLS" => self.wordfile.enable_mls = true,
            "DISABLEMLS" => self.wordfile.disable_mls = true,
            "ENABLESPELLASYOUTYPE" => self.wordfile.enable_spell_check = true,
            "BLOCK" => self.parse_block_comment()?,
            "LINE" | "1LINE" => self.parse_line_comment()?,
            "ESCAPE" => {
                self.expect_keyword("Char")?;
                self.expect_equals("Escape Char")?;
                self.wordfile.escape_char = self.require_word()?.chars().next();
            }
            "VALID" => {
                self.expect_keyword("Columns")?;
                self.expect_equals("Valid Columns")?;
                self.wordfile.valid_columns = Some(self.require_word()?);
            }
            "STRING" => {
                let next = self.require_command()?;
                if next.eq_ignore_ascii_case("Chars") {
                    self.expect_equals("String Chars")?;
                    self.wordfile.string_chars = Some(self.require_word()?);
                } else if next.eq_ignore_ascii_case("Literal") {
                    self.expect_keyword("Prefix")?;
                    self.expect_equals("String Literal Prefix")?;
                    self.wordfile.string_literal_prefix = Some(self.require_word()?);
                } else {
                    return Err(self.unexpected(&next));
                }
            }
            "FILE" => {
                let next = self.require_command()?;
                if next.eq_ignore_ascii_case("Names") {
                    self.expect_equals("File Names")?;
                    let values = self.collect_upper_words();
                    extend_unique(&mut self.wordfile.file_names, values);
                } else if next.eq_ignore_ascii_case("Extensions") {
                    self.expect_equals("File Extensions")?;
                    let values = self.collect_upper_words();
                    extend_unique(&mut self.wordfile.file_extensions, values);
                } else {
                    return Err(self.unexpected(&next));
                }
                return Ok(true);
            }
            _ => return Err(self.unexpected(token)),
        }
        Ok(false)
    }

    /// `Block Comment On|Off [Alt] = <marker>`
    fn parse_block_comment(&mut self) -> Result<(), ParseError> {
        self.expect_keyword("Comment")?;
        let which = self.require_command()?;
        let on = if which.eq_ignore_ascii_case("On") {
            true
        } else if which.eq_ignore_ascii_case("Off") {
            false
        } else {
            return Err(self.unexpected(&which));
        };
        let alt = if self
            .tokens
            .peek_command_raw()
            .is_some_and(|t| t.eq_ignore_ascii_case("Alt"))
        {
            self.tokens.next_command_raw();
            true
        } else {
            false
        };
        let context = match (on, alt) {
            (true, false) => "Block Comment On",
            (false, false) => "Block Comment Off",
            (true, true) => "Block Comment On Alt",
            (false, true) => "Block Comment Off Alt",
        };
        self.expect_equals(context)?;
        let marker = self.require_word()?;
        let slot = match (on, alt) {
            (true, false) => &mut self.wordfile.comments.block_on,
            (false, false) => &mut self.wordfile.comments.block_off,
            (true, true) => &mut self.wordfile.comments.block_on_alt,
            (false, true) => &mut self.wordfile.comments.block_off_alt,
        };
        *slot = Some(marker);
        Ok(())
    }

    /// `Line Comment [Alt|Num|Valid Columns|Preceding Chars] = <value>`
    fn parse_line_comment(&mut self) -> Result<(), ParseError> {
        self.expect_keyword("Comment")?;
        let peeked = self.tokens.peek_command_raw();
        match peeked.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("Alt") => {
                self.tokens.next_command_raw();
                self.expect_equals("Line Comment Alt")?;
                self.wordfile.comments.line_alt = Some(self.require_word()?);
            }
            Some(t) if t.eq_ignore_ascii_case("Num") => {
                self.tokens.next_command_raw();
                self.expect_equals("Line Comment Num")?;
                let value = self.require_word()?;
                self.wordfile.comments.line = Some(pad_numbered_marker(&value));
            }
            Some(t) if t.eq_ignore_ascii_case("Valid") => {
                self.tokens.next_command_raw();
                self.expect_keyword("Columns")?;
                self.expect_equals("Line Comment Valid Columns")?;
                self.wordfile.comments.line_valid_columns = Some(self.require_word()?);
            }
            Some(t) if t.eq_ignore_ascii_case("Preceding") => {
                self.tokens.next_command_raw();
                self.expect_keyword("Chars")?;
                self.expect_equals("Line Comment Preceding Chars")?;
                self.wordfile.comments.line_preceding_chars = Some(self.require_word()?);
            }
            _ => {
                self.expect_equals("Line Comment")?;
                self.wordfile.comments.line = Some(self.require_word()?);
            }
        }
        Ok(())
    }

    /// `/C<n>["Name"][TAG] [keys...]` then the keyword body.
    fn parse_code_format(&mut self, number: i32) -> Result<(), ParseError> {
        let mut format = CodeFormat::new(number);
        if self.tokens.peek_token().as_deref() == Some("\"") {
            if let Some(name) = self.tokens.next_string(false)? {
                format.name = name;
            }
        }
        if let Some(word) = self.tokens.peek_word() {
            if word != "\n" && is_type_tag(&word) {
                self.tokens.next_word();
                format.type_tag = word;
            }
        }
        if format.type_tag.is_empty() {
            format.type_tag = random_type_tag();
        }
        // Remaining header keys up to the end of the line.
        loop {
            let token = match self.tokens.next_command_raw() {
                None => {
                    self.wordfile.code_formats.push(format);
                    return Ok(());
                }
                Some(token) => token,
            };
            if token == "\n" {
                break;
            }
            if token.eq_ignore_ascii_case("Colors") {
                let peeked = self.tokens.peek_command_raw();
                if peeked.as_deref().is_some_and(|t| t.eq_ignore_ascii_case("Back")) {
                    self.tokens.next_command_raw();
                    self.expect_equals("Colors Back")?;
                    format.back_color = Some(convert_color(self.require_number()?));
                } else if peeked.as_deref().is_some_and(|t| t.eq_ignore_ascii_case("Auto")) {
                    self.tokens.next_command_raw();
                    self.expect_keyword("Back")?;
                    self.expect_equals("Colors Auto Back")?;
                    format.auto_back = self.require_boolean()?;
                } else {
                    self.expect_equals("Colors")?;
                    format.color = Some(convert_color(self.require_number()?));
                }
            } else if token.eq_ignore_ascii_case("Font") {
                self.expect_keyword("Style")?;
                self.expect_equals("Font Style")?;
                format.font_style = FontStyle::from_number(self.require_number()?);
            } else {
                // Unquoted name words accumulate.
                if !format.name.is_empty() {
                    format.name.push(' ');
                }
                format.name.push_str(&token);
            }
        }
        self.parse_code_format_body(&mut format);
        self.wordfile.code_formats.push(format);
        Ok(())
    }

    /// Keyword body: one word per entry, `**` on its own line switches to
    /// prefixes, the next blank line switches back. Ends at the next `/C`
    /// directive or end of input.
    fn parse_code_format_body(&mut self, format: &mut CodeFormat) {
        let mut into_prefixes = false;
        let mut at_line_start = true;
        loop {
            // Peek in token mode so a quoted name on the next `/C` line does
            // not glue onto the directive token.
            match self.tokens.peek_token() {
                None => return,
                Some(token) if is_code_format_start(&token) => return,
                _ => {}
            }
            let word = match self.tokens.next_word() {
                None => return,
                Some(word) => word,
            };
            if word == "\n" {
                if at_line_start {
                    // Blank line.
                    into_prefixes = false;
                }
                at_line_start = true;
                continue;
            }
            if at_line_start && word == "**" {
                into_prefixes = true;
            } else {
                let set = if into_prefixes {
                    &mut format.prefixes
                } else {
                    &mut format.keywords
                };
                if !set.contains(&word) {
                    set.push(word);
                }
            }
            at_line_start = false;
        }
    }

    /// Read marker strings up to the end of the line.
    fn collect_strings(&mut self, strict: bool) -> Result<Vec<String>, ParseError> {
        collect_strings_from(&mut self.tokens, strict)
    }

    /// Read upper-cased bare words up to the end of the line.
    fn collect_upper_words(&mut self) -> Vec<String> {
        let mut values = Vec::new();
        loop {
            match self.tokens.next_word() {
                None => break,
                Some(word) if word == "\n" => break,
                Some(word) => values.push(word.to_uppercase()),
            }
        }
        values
    }

    /// First character offset at or after `offset` that begins a new line.
    fn line_start_after(&self, offset: usize) -> Option<usize> {
        let mut pos = offset;
        while pos < self.tokens.len() {
            if self.tokens.char_at(pos) == Some('\n') {
                return Some(pos + 1);
            }
            pos += 1;
        }
        None
    }
}

fn collect_strings_from(
    tokens: &mut Tokenizer,
    strict: bool,
) -> Result<Vec<String>, ParseError> {
    let mut values = Vec::new();
    loop {
        match tokens.next_string(strict)? {
            None => break,
            Some(value) if value == "\n" => break,
            Some(value) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
    }
    Ok(values)
}

fn extend_unique(list: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !list.contains(&value) {
            list.push(value);
        }
    }
}

/// `/C` followed by at least one digit starts the next code-format block.
fn is_code_format_start(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('/')
        && chars.next() == Some('C')
        && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// `/L3` -> 3 when `prefix` is `/L`; None for anything else.
fn directive_number(token: &str, prefix: &str) -> Option<i32> {
    let rest = token.strip_prefix(prefix)?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Packed wordfile colors occupy the low 24 bits.
fn convert_color(value: i64) -> Rgb {
    Rgb::from_packed((value & 0xFF_FFFF) as u32)
}

fn is_type_tag(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

/// Base-36 upper-case tag for code formats that declare none.
fn random_type_tag() -> String {
    let mut value: u64 = rand::random();
    let mut tag = String::new();
    loop {
        let digit = (value % 36) as u32;
        tag.push(
            char::from_digit(digit, 36)
                .unwrap_or('0')
                .to_ascii_uppercase(),
        );
        value /= 36;
        if value == 0 {
            break;
        }
    }
    tag
}

/// `Line Comment Num` values carry a leading width; the marker text is
/// left-padded with spaces to that width so it sits at its declared column.
fn pad_numbered_marker(value: &str) -> String {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    let text = &value[digits.len()..];
    let width: usize = digits.parse().unwrap_or(0);
    if text.chars().count() >= width {
        return text.to_string();
    }
    let pad = width - text.chars().count();
    let mut marker = " ".repeat(pad);
    marker.push_str(text);
    marker
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::StyleSlot;

    #[test]
    fn test_minimal_language_header() {
        let wordfile = Wordfile::parse_strict("/L7\"Tiny\" C_LANG Nocase Noquote\n").unwrap();
        assert_eq!(wordfile.number(), 7);
        assert_eq!(wordfile.name(), "Tiny");
        assert_eq!(wordfile.kind(), LanguageKind::C);
        assert!(wordfile.case_insensitive());
        assert!(wordfile.no_quote());
        assert!(!wordfile.is_tag_based());
    }

    #[test]
    fn test_header_markers_and_file_extensions() {
        let source = "/L1\"Demo\" JAVA_LANG Block Comment On = /* Block Comment Off = */ \
                      Line Comment = // Escape Char = \\ String Chars = \"' File Extensions = java jav\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.comments().block_on.as_deref(), Some("/*"));
        assert_eq!(wordfile.comments().block_off.as_deref(), Some("*/"));
        assert_eq!(wordfile.comments().line.as_deref(), Some("//"));
        assert_eq!(wordfile.escape_char(), Some('\\'));
        assert_eq!(wordfile.string_chars(), "\"'");
        assert_eq!(wordfile.file_extensions(), ["JAVA", "JAV"]);
        assert!(wordfile.matches_extension("Java"));
    }

    #[test]
    fn test_colors_and_font_style_directives() {
        let source = "/L1\"Demo\" C_LANG\n\
                      /Colors = 255,65280,16711680,0,8421504\n\
                      /Colors Back = 16777215,16777215,16777215,16777215,16777215\n\
                      /Colors Auto Back = 1,0,1,0,1\n\
                      /Font Style = 0,1,2,3,9\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        let colors = wordfile.colors();
        assert_eq!(colors[0], Rgb::new(255, 0, 0));
        assert_eq!(colors[1], Rgb::new(0, 255, 0));
        assert_eq!(colors[2], Rgb::new(0, 0, 255));
        assert_eq!(wordfile.colors_auto_back(), [true, false, true, false, true]);
        assert_eq!(
            wordfile.font_styles(),
            [
                FontStyle::Plain,
                FontStyle::Bold,
                FontStyle::Italic,
                FontStyle::Underline,
                FontStyle::Plain
            ]
        );
        assert_eq!(
            wordfile.colors_back()[StyleSlot::Number.index()],
            Rgb::new(255, 255, 255)
        );
    }

    #[test]
    fn test_code_format_keywords_and_prefixes() {
        let source = "/L1\"Demo\" C_LANG\n\
                      /C1\"Keywords\" Colors = 255 Font Style = 1\n\
                      if else\n\
                      while\n\
                      **\n\
                      __\n\
                      \n\
                      return\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        let format = &wordfile.code_formats()[0];
        assert_eq!(format.number(), 1);
        assert_eq!(format.name(), "Keywords");
        assert_eq!(format.color(), Rgb::new(255, 0, 0));
        assert_eq!(format.font_style(), FontStyle::Bold);
        assert_eq!(format.keywords(), ["if", "else", "while", "return"]);
        assert_eq!(format.prefixes(), ["__"]);
    }

    #[test]
    fn test_code_format_type_tag() {
        let source = "/L1\"Demo\" C_LANG\n/C1\"Ops\" OPERATORS_TAG\n+ -\n/C2\"Other\"\nfoo\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        // The quoted name on the next /C line must not stop it from
        // terminating the previous keyword body.
        assert_eq!(wordfile.code_formats()[0].keywords(), ["+", "-"]);
        assert_eq!(wordfile.code_formats()[1].keywords(), ["foo"]);
        assert_eq!(wordfile.code_formats()[0].type_tag(), "OPERATORS_TAG");
        let synthesized = wordfile.code_formats()[1].type_tag();
        assert!(!synthesized.is_empty());
        assert!(synthesized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_nocase_folds_keywords() {
        let source = "/L1\"Demo\" C_LANG Nocase\n/C1\nIF Else\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.code_formats()[0].keywords(), ["if", "else"]);
    }

    #[test]
    fn test_fold_and_brace_marker_lists() {
        let source = "/L1\"Demo\" C_LANG\n\
                      /Open Fold Strings = \"{\" \"begin\"\n\
                      /Close Fold Strings = \"}\" \"end\"\n\
                      /Open Brace Strings = \"{\" \"(\"\n\
                      /Close Brace Strings = \"}\" \")\"\n\
                      /Ignore Fold Strings = \"${\"\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.open_fold_strings(), ["{", "begin"]);
        assert_eq!(wordfile.close_fold_strings(), ["}", "end"]);
        assert_eq!(wordfile.open_brace_strings(), ["{", "("]);
        assert_eq!(wordfile.ignore_fold_strings(), ["${"]);
    }

    #[test]
    fn test_delimiters_directive_keeps_specials() {
        let source = "/L1\"Demo\" C_LANG\n/Delimiters = ~!@%^&*()+=|\\/{}[]:;\"'<> ,.?\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.delimiters(), "~!@%^&*()+=|\\/{}[]:;\"'<> ,.?");
    }

    #[test]
    fn test_line_comment_num_left_pads() {
        let source = "/L1\"Demo\" COBOL_LANG Line Comment Num = 6*\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.comments().line.as_deref(), Some("     *"));
    }

    #[test]
    fn test_semicolon_and_dash_comments() {
        let source = "; a remark\n-- another remark\n/L1\"Demo\" C_LANG\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.name(), "Demo");
    }

    #[test]
    fn test_strict_rejects_garbage_line() {
        let err = Wordfile::parse_strict("garbage\n").unwrap_err();
        assert!(err.message.contains("literal '/' or ';' or '--'"));
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_lenient_recovers_at_next_line() {
        let source = "/L1\"Demo\" C_LANG\ngarbage here\n/Colors = 255,0,0,0,0\n";
        let (wordfile, errors) = Wordfile::parse_lenient(source).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(wordfile.colors()[0], Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_lenient_fails_without_forward_progress() {
        // No line feed after the failure point, so recovery cannot restart.
        assert!(Wordfile::parse_lenient("garbage").is_err());
    }

    #[test]
    fn test_color_row_trims_spaces_around_commas() {
        let source = "/L1\"Demo\" C_LANG\n/Colors = 255, 65280 ,16711680, 0, 8421504\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.colors()[0], Rgb::new(255, 0, 0));
        assert_eq!(wordfile.colors()[1], Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_malformed_color_row_is_parse_error() {
        let err = Wordfile::parse_strict("/L1\"Demo\" C_LANG\n/Colors = 255,x,0,0,0\n").unwrap_err();
        assert!(err.message.contains("unexpected token 'x'"));
        // A short row ends the directive phrase early.
        assert!(Wordfile::parse_strict("/L1\"Demo\" C_LANG\n/Colors = 255,0\n").is_err());
    }

    #[test]
    fn test_member_and_variable_strings_collect_to_line_end() {
        let source = "/L1\"Demo\" C_LANG\n\
                      /Member String = \"->\" \".\"\n\
                      /Variable String = \"$\" \"@\"\n\
                      /Colors = 1,2,3,4,5\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.member_strings(), ["->", "."]);
        assert_eq!(wordfile.variable_strings(), ["$", "@"]);
        assert!(wordfile.colors.is_some());
    }

    #[test]
    fn test_function_and_marker_strings() {
        let source = "/L1\"Demo\" C_LANG\n\
                      /Function String = \"^[a-z]+(\"\n\
                      /Function String 2 = \"^def \"\n\
                      /Variable String = \"\\$[a-z]+\"\n\
                      /Marker Characters = \"<>\"\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert_eq!(wordfile.function_strings(), ["^[a-z]+(", "^def "]);
        assert_eq!(wordfile.variable_strings(), ["\\$[a-z]+"]);
        assert_eq!(wordfile.marker_characters(), ["<>"]);
    }

    #[test]
    fn test_clean_end_of_input_mid_list() {
        // The source ends inside a marker list without a trailing line feed.
        let wordfile = Wordfile::parse_strict("/L1\"Demo\" C_LANG\n/Open Fold Strings = \"{\"").unwrap();
        assert_eq!(wordfile.open_fold_strings(), ["{"]);
    }

    #[test]
    fn test_end_of_file_mid_phrase() {
        let err = Wordfile::parse_strict("/L1\"Demo\" C_LANG\n/Open Fold").unwrap_err();
        assert_eq!(err.message, "unexpected end of file");
    }

    #[test]
    fn test_unterminated_name_reads_to_line_end() {
        // Language names are read leniently even in strict parsing.
        let wordfile = Wordfile::parse_strict("/L1\"Demo\n/Colors = 1,2,3,4,5\n").unwrap();
        assert_eq!(wordfile.name(), "Demo");
        assert!(wordfile.colors.is_some());
    }

    #[test]
    fn test_tag_based_derived_from_kind() {
        let wordfile = Wordfile::parse_strict("/L2\"Web\" HTML_LANG Nocase\n").unwrap();
        assert!(wordfile.is_tag_based());
    }

    #[test]
    fn test_padded_marker_helper() {
        assert_eq!(pad_numbered_marker("6*"), "     *");
        assert_eq!(pad_numbered_marker("2//"), "//");
        assert_eq!(pad_numbered_marker("*"), "*");
    }
}
