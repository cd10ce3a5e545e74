//! wordfile-fold - nested fold region detection from wordfile marker lists.
//!
//! A [`FoldScanner`] carries index-paired open/close marker lists (the
//! descriptor's fold, comment-fold or brace strings) and produces nested
//! [`FoldSpan`]s over a text. [`FoldScanner::scan`] reports the first
//! unmatched open marker as an error; [`FoldScanner::scan_risky`] treats the
//! remaining text as the missing closer and returns a best-effort result.
//! Regions that fit on a single line are discarded either way.

#![warn(missing_docs)]

use thiserror::Error;
use wordfile_core::Wordfile;

/// One foldable region, in byte offsets over the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldSpan {
    /// Byte offset of the open marker.
    pub offset: usize,
    /// Byte length from the open marker through the close marker.
    pub length: usize,
}

/// An open marker whose required close marker never appears.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing close marker '{close_marker}' for open marker '{open_marker}' at offset {offset}")]
pub struct UnmatchedOpenMarker {
    /// The open marker text.
    pub open_marker: String,
    /// The close marker that was required but not found.
    pub close_marker: String,
    /// Byte offset of the unmatched open marker.
    pub offset: usize,
}

/// Nested fold region detector over index-paired marker lists.
///
/// The open marker found earliest always starts the next region; its
/// same-index close marker ends it. A close marker at the same offset as an
/// open marker wins, so overlapping marker texts cannot reopen a region on
/// its own terminator.
#[derive(Debug, Clone)]
pub struct FoldScanner {
    open_markers: Vec<String>,
    close_markers: Vec<String>,
}

impl FoldScanner {
    /// Build a scanner from paired marker lists.
    ///
    /// Returns `None` when folding is not applicable: empty lists, lists of
    /// different lengths, or an empty marker string.
    pub fn new(open_markers: Vec<String>, close_markers: Vec<String>) -> Option<Self> {
        if open_markers.is_empty()
            || open_markers.len() != close_markers.len()
            || open_markers.iter().any(String::is_empty)
            || close_markers.iter().any(String::is_empty)
        {
            return None;
        }
        Some(Self {
            open_markers,
            close_markers,
        })
    }

    /// Scanner over a descriptor's fold strings.
    pub fn fold_markers(wordfile: &Wordfile) -> Option<Self> {
        Self::new(
            wordfile.open_fold_strings().to_vec(),
            wordfile.close_fold_strings().to_vec(),
        )
    }

    /// Scanner over a descriptor's comment fold strings.
    pub fn comment_fold_markers(wordfile: &Wordfile) -> Option<Self> {
        Self::new(
            wordfile.open_comment_fold_strings().to_vec(),
            wordfile.close_comment_fold_strings().to_vec(),
        )
    }

    /// Scanner over a descriptor's brace strings.
    pub fn brace_markers(wordfile: &Wordfile) -> Option<Self> {
        Self::new(
            wordfile.open_brace_strings().to_vec(),
            wordfile.close_brace_strings().to_vec(),
        )
    }

    /// Detect fold regions, failing on the first unmatched open marker.
    pub fn scan(&self, text: &str) -> Result<Vec<FoldSpan>, UnmatchedOpenMarker> {
        let mut spans = Vec::new();
        self.scan_level(text, 0, None, false, &mut spans)?;
        Self::finish(text, &mut spans);
        Ok(spans)
    }

    /// Detect fold regions, treating the remaining text as the close marker
    /// of any region left open.
    pub fn scan_risky(&self, text: &str) -> Vec<FoldSpan> {
        let mut spans = Vec::new();
        // Risky scanning never reports a missing closer.
        let _ = self.scan_level(text, 0, None, true, &mut spans);
        Self::finish(text, &mut spans);
        spans
    }

    /// Scan one nesting level starting at `pos`.
    ///
    /// `level` carries the marker index and offset of the open marker that
    /// started this level, or `None` at the top. Returns the offset just past
    /// this level's close marker (or the text length).
    fn scan_level(
        &self,
        text: &str,
        mut pos: usize,
        level: Option<(usize, usize)>,
        risky: bool,
        spans: &mut Vec<FoldSpan>,
    ) -> Result<usize, UnmatchedOpenMarker> {
        loop {
            let (close_pos, close_len) = match level {
                Some((index, opened_at)) => {
                    let close_marker = &self.close_markers[index];
                    match text[pos..].find(close_marker.as_str()) {
                        Some(i) => (pos + i, close_marker.len()),
                        None if risky => (text.len(), 0),
                        None => {
                            return Err(UnmatchedOpenMarker {
                                open_marker: self.open_markers[index].clone(),
                                close_marker: close_marker.clone(),
                                offset: opened_at,
                            });
                        }
                    }
                }
                None => (usize::MAX, 0),
            };

            let mut earliest: Option<(usize, usize)> = None;
            for (index, marker) in self.open_markers.iter().enumerate() {
                if let Some(i) = text[pos..].find(marker.as_str()) {
                    let found = pos + i;
                    if earliest.is_none_or(|(at, _)| found < at) {
                        earliest = Some((found, index));
                    }
                }
            }

            match earliest {
                Some((opened_at, index)) if opened_at < close_pos => {
                    let inner_end = self.scan_level(
                        text,
                        opened_at + self.open_markers[index].len(),
                        Some((index, opened_at)),
                        risky,
                        spans,
                    )?;
                    spans.push(FoldSpan {
                        offset: opened_at,
                        length: inner_end - opened_at,
                    });
                    pos = inner_end;
                }
                _ => {
                    return Ok(if level.is_some() {
                        close_pos + close_len
                    } else {
                        text.len()
                    });
                }
            }
        }
    }

    /// Order spans by offset and drop the ones that fit on a single line.
    fn finish(text: &str, spans: &mut Vec<FoldSpan>) {
        spans.retain(|span| text[span.offset..span.offset + span.length].contains(['\n', '\r']));
        spans.sort_by_key(|span| (span.offset, span.length));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn braces() -> FoldScanner {
        FoldScanner::new(vec!["{".into()], vec!["}".into()]).unwrap()
    }

    #[test]
    fn test_nested_regions() {
        let text = "{\n{\n}\n}\n";
        let spans = braces().scan(text).unwrap();
        assert_eq!(
            spans,
            [
                FoldSpan { offset: 0, length: 7 },
                FoldSpan { offset: 2, length: 3 },
            ]
        );
    }

    #[test]
    fn test_single_line_region_discarded() {
        assert!(braces().scan("{a}").unwrap().is_empty());
        let spans = braces().scan("{a}\n{\nb\n}").unwrap();
        assert_eq!(spans, [FoldSpan { offset: 4, length: 5 }]);
    }

    #[test]
    fn test_sibling_regions() {
        let text = "{\na\n}\n{\nb\n}\n";
        let spans = braces().scan(text).unwrap();
        assert_eq!(
            spans,
            [
                FoldSpan { offset: 0, length: 5 },
                FoldSpan { offset: 6, length: 5 },
            ]
        );
    }

    #[test]
    fn test_unmatched_open_marker_is_an_error() {
        let err = braces().scan("x {\ny").unwrap_err();
        assert_eq!(err.open_marker, "{");
        assert_eq!(err.close_marker, "}");
        assert_eq!(err.offset, 2);
        assert!(err.to_string().contains("missing close marker '}'"));
    }

    #[test]
    fn test_risky_scan_closes_at_end_of_text() {
        let spans = braces().scan_risky("{\na {\nb\n}");
        assert_eq!(
            spans,
            [
                FoldSpan { offset: 0, length: 9 },
                FoldSpan { offset: 4, length: 5 },
            ]
        );
    }

    #[test]
    fn test_index_paired_marker_kinds() {
        let scanner = FoldScanner::new(
            vec!["begin".into(), "{".into()],
            vec!["end".into(), "}".into()],
        )
        .unwrap();
        let text = "begin\n{\nx\n}\nend";
        let spans = scanner.scan(text).unwrap();
        assert_eq!(
            spans,
            [
                FoldSpan { offset: 0, length: 15 },
                FoldSpan { offset: 6, length: 5 },
            ]
        );
    }

    #[test]
    fn test_not_applicable_marker_lists() {
        assert!(FoldScanner::new(vec![], vec![]).is_none());
        assert!(FoldScanner::new(vec!["{".into()], vec![]).is_none());
        assert!(FoldScanner::new(vec!["".into()], vec!["}".into()]).is_none());
    }

    #[test]
    fn test_scanners_from_descriptor() {
        let source = "/L1\"Demo\" C_LANG\n\
                      /Open Fold Strings = \"{\"\n\
                      /Close Fold Strings = \"}\"\n\
                      /Open Brace Strings = \"(\" \"[\"\n\
                      /Close Brace Strings = \")\" \"]\"\n";
        let wordfile = Wordfile::parse_strict(source).unwrap();
        assert!(FoldScanner::fold_markers(&wordfile).is_some());
        assert!(FoldScanner::brace_markers(&wordfile).is_some());
        // No comment fold markers are declared.
        assert!(FoldScanner::comment_fold_markers(&wordfile).is_none());

        let spans = FoldScanner::fold_markers(&wordfile)
            .unwrap()
            .scan("{\nbody\n}")
            .unwrap();
        assert_eq!(spans, [FoldSpan { offset: 0, length: 8 }]);
    }
}
