//! wordfile-highlight - keyword and prefix highlight rules for wordfiles.
//!
//! [`HighlightEngine`] compiles a parsed [`Wordfile`] into immutable lookup
//! tables: an exact keyword map, a longest-first prefix list, a table of
//! delimiter characters declared as one-character keywords, and the resolved
//! styles per code format and style slot. Per-scan state lives in a separate
//! [`ScanSession`], whose counters yield a recognition confidence for
//! language auto-detection.

#![warn(missing_docs)]

use std::collections::HashMap;

use wordfile_core::{
    CommentMarkers, FontStyle, Rgb, StyleSlot, Wordfile,
};

/// Resolved display attributes for one span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Foreground color.
    pub color: Rgb,
    /// Background color.
    pub back_color: Rgb,
    /// Whether the background is chosen automatically.
    pub auto_back: bool,
    /// Font style.
    pub font_style: FontStyle,
}

/// What a classified span of text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    /// Plain text.
    Normal,
    /// Block or line comment.
    Comment,
    /// Alternate block comment.
    AlternateBlockComment,
    /// String literal.
    StringLiteral,
    /// Numeric literal.
    Number,
    /// A keyword, prefix or declared delimiter character.
    Keyword,
}

/// A contiguous classified region of the scanned text, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    /// Byte offset of the span start.
    pub start: usize,
    /// Byte length of the span.
    pub len: usize,
    /// Classification of the span.
    pub category: TokenCategory,
    /// Resolved display style.
    pub style: TextStyle,
}

/// Result of evaluating one word candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMatch {
    /// Byte length of the matched candidate.
    pub len: usize,
    /// Keyword when a table matched, Normal for the fallback.
    pub category: TokenCategory,
    /// Style of the matching code format, or the normal-text style.
    pub style: TextStyle,
}

/// Mutable per-scan state: the recognition counters and the certainty flag.
///
/// The tables in [`HighlightEngine`] are immutable and shareable; one session
/// is created per scanned document.
#[derive(Debug, Default, Clone)]
pub struct ScanSession {
    evaluated: u64,
    unmatched: u64,
    certain: bool,
}

impl ScanSession {
    /// A fresh session with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of word candidates evaluated so far.
    pub fn evaluated(&self) -> u64 {
        self.evaluated
    }

    /// Number of candidates no table matched.
    pub fn unmatched(&self) -> u64 {
        self.unmatched
    }

    /// Mark the language as externally confirmed (file extension match or a
    /// user override). Confidence becomes infinite.
    pub fn mark_certain(&mut self) {
        self.certain = true;
    }

    /// Whether the language was externally confirmed.
    pub fn is_certain(&self) -> bool {
        self.certain
    }

    /// Recognition confidence in `[0, 1]`.
    ///
    /// Zero when nothing was evaluated, `f64::INFINITY` when certain. A word
    /// evaluation increments `evaluated` exactly once and `unmatched` at most
    /// once, so the ratio cannot leave the unit interval.
    pub fn confidence(&self) -> f64 {
        if self.certain {
            return f64::INFINITY;
        }
        if self.evaluated == 0 {
            return 0.0;
        }
        (self.evaluated - self.unmatched) as f64 / self.evaluated as f64
    }
}

/// Immutable highlight tables compiled from one wordfile.
#[derive(Debug, Clone)]
pub struct HighlightEngine {
    words: HashMap<String, TextStyle>,
    prefixes: Vec<(String, TextStyle)>,
    chars: HashMap<char, TextStyle>,
    delimiters: String,
    string_chars: String,
    nocase: bool,
    noquote: bool,
    tag_based: bool,
    escape_char: Option<char>,
    comments: CommentMarkers,
    slot_styles: [TextStyle; wordfile_core::STYLE_SLOT_COUNT],
}

impl HighlightEngine {
    /// Compile the lookup tables from a parsed descriptor.
    pub fn new(wordfile: &Wordfile) -> Self {
        let colors = wordfile.colors();
        let backs = wordfile.colors_back();
        let autos = wordfile.colors_auto_back();
        let fonts = wordfile.font_styles();
        let mut slot_styles = [TextStyle {
            color: Rgb::new(0, 0, 0),
            back_color: Rgb::new(255, 255, 255),
            auto_back: true,
            font_style: FontStyle::Plain,
        }; wordfile_core::STYLE_SLOT_COUNT];
        for slot in StyleSlot::ALL {
            let i = slot.index();
            slot_styles[i] = TextStyle {
                color: colors[i],
                back_color: backs[i],
                auto_back: autos[i],
                font_style: fonts[i],
            };
        }

        let delimiters = wordfile.delimiters().to_string();
        let mut words = HashMap::new();
        let mut prefixes = Vec::new();
        let mut chars = HashMap::new();
        for format in wordfile.code_formats() {
            let style = TextStyle {
                color: format.color(),
                back_color: format.back_color(),
                auto_back: format.auto_back(),
                font_style: format.font_style(),
            };
            for keyword in format.keywords() {
                let mut keyword_chars = keyword.chars();
                if let (Some(c), None) = (keyword_chars.next(), keyword_chars.next()) {
                    if delimiters.contains(c) {
                        chars.entry(c).or_insert(style);
                        continue;
                    }
                }
                if !words.contains_key(keyword) {
                    words.insert(keyword.clone(), style);
                }
            }
            for prefix in format.prefixes() {
                if !prefixes.iter().any(|(p, _)| p == prefix) {
                    prefixes.push((prefix.clone(), style));
                }
            }
        }
        // Longest first so the most specific prefix wins; length ties break
        // lexicographically to keep matching deterministic.
        prefixes.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            words,
            prefixes,
            chars,
            delimiters,
            string_chars: wordfile.string_chars().to_string(),
            nocase: wordfile.case_insensitive(),
            noquote: wordfile.no_quote(),
            tag_based: wordfile.is_tag_based(),
            escape_char: wordfile.escape_char(),
            comments: wordfile.comments().clone(),
            slot_styles,
        }
    }

    /// Resolved style of a descriptor style slot.
    pub fn slot_style(&self, slot: StyleSlot) -> TextStyle {
        self.slot_styles[slot.index()]
    }

    /// Whether a character separates words: a declared delimiter, a string
    /// delimiter, or whitespace.
    pub fn is_word_boundary(&self, c: char) -> bool {
        self.delimiters.contains(c)
            || self.string_chars.contains(c)
            || matches!(c, ' ' | '\t' | '\r' | '\n')
    }

    fn fold(&self, candidate: &str) -> String {
        if self.nocase {
            candidate.to_lowercase()
        } else {
            candidate.to_string()
        }
    }

    fn lookup_exact(&self, candidate: &str) -> Option<TextStyle> {
        self.words.get(candidate).copied()
    }

    fn lookup_prefix(&self, candidate: &str) -> Option<TextStyle> {
        self.prefixes
            .iter()
            .find(|(prefix, _)| candidate.starts_with(prefix.as_str()))
            .map(|(_, style)| *style)
    }

    fn resolve_plain(&self, candidate: &str) -> Option<TextStyle> {
        self.lookup_exact(candidate)
            .or_else(|| self.lookup_prefix(candidate))
    }

    /// Tag normalization: a candidate scanned mid-tag may be missing its
    /// angle brackets, so `b` also tries `/b`, `</b` and the `>`-terminated
    /// forms of each.
    fn resolve_tag(&self, candidate: &str) -> Option<TextStyle> {
        if let Some(style) = self.resolve_plain(candidate) {
            return Some(style);
        }
        if !candidate.starts_with('<') {
            let retried = if candidate.starts_with('/') {
                format!("<{candidate}")
            } else {
                format!("/{candidate}")
            };
            if let Some(style) = self.resolve_tag(&retried) {
                return Some(style);
            }
        }
        if !candidate.ends_with('>') {
            if let Some(style) = self.resolve_tag(&format!("{candidate}>")) {
                return Some(style);
            }
        }
        None
    }

    fn resolve(&self, candidate: &str) -> Option<TextStyle> {
        if let Some(style) = self.resolve_plain(candidate) {
            return Some(style);
        }
        if self.tag_based {
            return self.resolve_tag(candidate);
        }
        None
    }

    fn normal_match(&self, len: usize) -> WordMatch {
        WordMatch {
            len,
            category: TokenCategory::Normal,
            style: self.slot_style(StyleSlot::NormalText),
        }
    }

    /// Evaluate the word candidate starting at byte offset `pos`.
    ///
    /// At a word boundary the only possible match is a delimiter character
    /// declared as a one-character keyword; otherwise the candidate runs to
    /// the next boundary (stopping right after a `>` for tag-based
    /// languages), is
    /// looked up exactly, by prefix, through the tag retries, and finally
    /// with one extra character appended. A failed word lookup returns a
    /// normal-text match covering the candidate and counts as unmatched.
    /// Returns `None` only at boundary characters that match nothing.
    pub fn evaluate_word(
        &self,
        text: &str,
        pos: usize,
        session: &mut ScanSession,
    ) -> Option<WordMatch> {
        let rest = &text[pos..];
        let first = rest.chars().next()?;
        if self.is_word_boundary(first) {
            if self.delimiters.contains(first) {
                session.evaluated += 1;
                let folded = self.fold(&first.to_string());
                let style = self
                    .chars
                    .get(&first)
                    .copied()
                    .or_else(|| self.lookup_exact(&folded));
                if let Some(style) = style {
                    return Some(WordMatch {
                        len: first.len_utf8(),
                        category: TokenCategory::Keyword,
                        style,
                    });
                }
                session.unmatched += 1;
            }
            return None;
        }

        let mut end = pos;
        for c in rest.chars() {
            if self.is_word_boundary(c) {
                break;
            }
            end += c.len_utf8();
            // Tag candidates end with their consumed '>'.
            if self.tag_based && c == '>' {
                break;
            }
        }
        session.evaluated += 1;
        let folded = self.fold(&text[pos..end]);
        if let Some(style) = self.resolve(&folded) {
            return Some(WordMatch {
                len: end - pos,
                category: TokenCategory::Keyword,
                style,
            });
        }
        // A keyword may end in a boundary character; retry with the next
        // character appended before giving up on the candidate.
        if let Some(next) = text[end..].chars().next() {
            let mut extended = folded;
            if self.nocase {
                extended.extend(next.to_lowercase());
            } else {
                extended.push(next);
            }
            if let Some(style) = self.resolve(&extended) {
                return Some(WordMatch {
                    len: end - pos + next.len_utf8(),
                    category: TokenCategory::Keyword,
                    style,
                });
            }
        }
        session.unmatched += 1;
        Some(self.normal_match(end - pos))
    }

    fn find_line_end(text: &str, from: usize) -> usize {
        text[from..]
            .find(['\n', '\r'])
            .map(|i| from + i)
            .unwrap_or(text.len())
    }

    fn match_block(
        &self,
        text: &str,
        pos: usize,
        on: Option<&str>,
        off: Option<&str>,
    ) -> Option<usize> {
        let on = on?;
        let off = off?;
        if on.is_empty() || !text[pos..].starts_with(on) {
            return None;
        }
        let body = pos + on.len();
        let end = text[body..]
            .find(off)
            .map(|i| body + i + off.len())
            .unwrap_or(text.len());
        Some(end)
    }

    fn match_string(&self, text: &str, pos: usize) -> Option<usize> {
        if self.noquote {
            return None;
        }
        let quote = text[pos..].chars().next()?;
        if !self.string_chars.contains(quote) {
            return None;
        }
        let mut chars = text[pos + quote.len_utf8()..].char_indices();
        while let Some((i, c)) = chars.next() {
            if c == '\n' || c == '\r' {
                return None;
            }
            if Some(c) == self.escape_char {
                chars.next();
                continue;
            }
            if c == quote {
                return Some(pos + quote.len_utf8() + i + c.len_utf8());
            }
        }
        None
    }

    /// Classify a whole text into contiguous styled spans.
    ///
    /// Layering order at each position: block comment, alternate block
    /// comment, line comment (primary then alternate), string literal,
    /// number run, whitespace run, then the word rule. Only candidates
    /// reaching the word rule feed the session counters.
    pub fn classify(&self, text: &str, session: &mut ScanSession) -> Vec<StyledSpan> {
        let mut spans = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            if let Some(end) = self.match_block(
                text,
                pos,
                self.comments.block_on.as_deref(),
                self.comments.block_off.as_deref(),
            ) {
                spans.push(self.span(pos, end, TokenCategory::Comment, StyleSlot::Comment));
                pos = end;
                continue;
            }
            if let Some(end) = self.match_block(
                text,
                pos,
                self.comments.block_on_alt.as_deref(),
                self.comments.block_off_alt.as_deref(),
            ) {
                spans.push(self.span(
                    pos,
                    end,
                    TokenCategory::AlternateBlockComment,
                    StyleSlot::AlternateBlockComment,
                ));
                pos = end;
                continue;
            }
            let line_marker = [&self.comments.line, &self.comments.line_alt]
                .into_iter()
                .flatten()
                .find(|m| !m.is_empty() && text[pos..].starts_with(m.as_str()));
            if line_marker.is_some() {
                let end = Self::find_line_end(text, pos);
                spans.push(self.span(pos, end, TokenCategory::Comment, StyleSlot::Comment));
                pos = end;
                continue;
            }
            if let Some(end) = self.match_string(text, pos) {
                spans.push(self.span(
                    pos,
                    end,
                    TokenCategory::StringLiteral,
                    StyleSlot::StringLiteral,
                ));
                pos = end;
                continue;
            }
            let c = match text[pos..].chars().next() {
                Some(c) => c,
                None => break,
            };
            if c.is_ascii_digit() {
                let end = pos
                    + text[pos..]
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(text.len() - pos);
                spans.push(self.span(pos, end, TokenCategory::Number, StyleSlot::Number));
                pos = end;
                continue;
            }
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                let end = pos
                    + text[pos..]
                        .find(|c: char| !matches!(c, ' ' | '\t' | '\r' | '\n'))
                        .unwrap_or(text.len() - pos);
                spans.push(self.span(pos, end, TokenCategory::Normal, StyleSlot::NormalText));
                pos = end;
                continue;
            }
            match self.evaluate_word(text, pos, session) {
                Some(word) => {
                    spans.push(StyledSpan {
                        start: pos,
                        len: word.len,
                        category: word.category,
                        style: word.style,
                    });
                    pos += word.len;
                }
                None => {
                    spans.push(self.span(
                        pos,
                        pos + c.len_utf8(),
                        TokenCategory::Normal,
                        StyleSlot::NormalText,
                    ));
                    pos += c.len_utf8();
                }
            }
        }
        spans
    }

    fn span(&self, start: usize, end: usize, category: TokenCategory, slot: StyleSlot) -> StyledSpan {
        StyledSpan {
            start,
            len: end - start,
            category,
            style: self.slot_style(slot),
        }
    }
}
