use std::hash::{Hash, Hasher};

/// Number of descriptor-level style slots.
pub const STYLE_SLOT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The five fixed style slots of a wordfile.
pub enum StyleSlot {
    /// Unstyled text.
    NormalText,
    /// Block and line comments.
    Comment,
    /// Alternate block comments.
    AlternateBlockComment,
    /// String literals.
    StringLiteral,
    /// Numeric literals.
    Number,
}

impl StyleSlot {
    /// All slots in array order.
    pub const ALL: [StyleSlot; STYLE_SLOT_COUNT] = [
        StyleSlot::NormalText,
        StyleSlot::Comment,
        StyleSlot::AlternateBlockComment,
        StyleSlot::StringLiteral,
        StyleSlot::Number,
    ];

    /// Index of this slot into the five-slot arrays.
    pub fn index(self) -> usize {
        match self {
            StyleSlot::NormalText => 0,
            StyleSlot::Comment => 1,
            StyleSlot::AlternateBlockComment => 2,
            StyleSlot::StringLiteral => 3,
            StyleSlot::Number => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// An RGB color.
pub struct Rgb {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Decode a packed wordfile color integer (`0x00BBGGRR`, red in the low byte).
    pub fn from_packed(value: u32) -> Self {
        Self {
            red: (value & 0xFF) as u8,
            green: ((value >> 8) & 0xFF) as u8,
            blue: ((value >> 16) & 0xFF) as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Font style of a style slot or code format.
pub enum FontStyle {
    /// No styling (the default, and the decoding of any unknown numeric token).
    #[default]
    Plain,
    /// Bold (`1`).
    Bold,
    /// Italic (`2`).
    Italic,
    /// Underline (`3`).
    Underline,
}

impl FontStyle {
    /// Decode a wordfile font-style number.
    pub fn from_number(value: i64) -> Self {
        match value {
            1 => FontStyle::Bold,
            2 => FontStyle::Italic,
            3 => FontStyle::Underline,
            _ => FontStyle::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// The closed set of language kinds a wordfile can declare.
pub enum LanguageKind {
    /// No language kind declared.
    #[default]
    Unspecified,
    /// `CARAMASK_LANG`
    Caramask,
    /// `C_LANG`
    C,
    /// `COBOL_LANG`
    Cobol,
    /// `FORTRAN_LANG`
    Fortran,
    /// `PASCAL_LANG`
    Pascal,
    /// `PERL_LANG`
    Perl,
    /// `PLB_LANG`
    Plb,
    /// `VB_LANG`
    VisualBasic,
    /// `VBSCRIPT_LANG`
    VbScript,
    /// `ASP_LANG`
    Asp,
    /// `CSHARP_LANG`
    CSharp,
    /// `CSS_LANG`
    Css,
    /// `LATEX_LANG`
    Latex,
    /// `HTML_LANG`
    Html,
    /// `JAVA_LANG`
    Java,
    /// `JSCRIPT_LANG`
    JScript,
    /// `ECMA_LANG`
    Ecma,
    /// `PHP_LANG`
    Php,
    /// `PYTHON_LANG`
    Python,
    /// `XML_LANG`
    Xml,
    /// `MASM_LANG`
    Masm,
    /// `AASM_LANG`
    Aasm,
    /// `NASM_LANG`
    Nasm,
    /// `SQL_LANG`
    Sql,
}

impl LanguageKind {
    /// Every declarable kind with its header keyword.
    const KEYWORDS: [(LanguageKind, &'static str); 24] = [
        (LanguageKind::Caramask, "CARAMASK_LANG"),
        (LanguageKind::C, "C_LANG"),
        (LanguageKind::Cobol, "COBOL_LANG"),
        (LanguageKind::Fortran, "FORTRAN_LANG"),
        (LanguageKind::Pascal, "PASCAL_LANG"),
        (LanguageKind::Perl, "PERL_LANG"),
        (LanguageKind::Plb, "PLB_LANG"),
        (LanguageKind::VisualBasic, "VB_LANG"),
        (LanguageKind::VbScript, "VBSCRIPT_LANG"),
        (LanguageKind::Asp, "ASP_LANG"),
        (LanguageKind::CSharp, "CSHARP_LANG"),
        (LanguageKind::Css, "CSS_LANG"),
        (LanguageKind::Latex, "LATEX_LANG"),
        (LanguageKind::Html, "HTML_LANG"),
        (LanguageKind::Java, "JAVA_LANG"),
        (LanguageKind::JScript, "JSCRIPT_LANG"),
        (LanguageKind::Ecma, "ECMA_LANG"),
        (LanguageKind::Php, "PHP_LANG"),
        (LanguageKind::Python, "PYTHON_LANG"),
        (LanguageKind::Xml, "XML_LANG"),
        (LanguageKind::Masm, "MASM_LANG"),
        (LanguageKind::Aasm, "AASM_LANG"),
        (LanguageKind::Nasm, "NASM_LANG"),
        (LanguageKind::Sql, "SQL_LANG"),
    ];

    /// Look up a kind by its header keyword (case-insensitive).
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(_, keyword)| word.eq_ignore_ascii_case(keyword))
            .map(|(kind, _)| *kind)
    }

    /// The header keyword for this kind (`"UNSPECIFIED"` for the default).
    pub fn keyword(self) -> &'static str {
        Self::KEYWORDS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, keyword)| *keyword)
            .unwrap_or("UNSPECIFIED")
    }

    /// Whether tokens of this kind are `<`/`>` delimited markup tags.
    pub fn is_tag_based(self) -> bool {
        matches!(self, LanguageKind::Html | LanguageKind::Xml)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Comment markers declared in a wordfile's language header.
pub struct CommentMarkers {
    /// Block comment open marker.
    pub block_on: Option<String>,
    /// Block comment close marker.
    pub block_off: Option<String>,
    /// Alternate block comment open marker.
    pub block_on_alt: Option<String>,
    /// Alternate block comment close marker.
    pub block_off_alt: Option<String>,
    /// Line comment marker.
    pub line: Option<String>,
    /// Alternate line comment marker.
    pub line_alt: Option<String>,
    /// Columns in which the line comment marker is valid.
    pub line_valid_columns: Option<String>,
    /// Characters that may precede the line comment marker.
    pub line_preceding_chars: Option<String>,
}

impl CommentMarkers {
    /// Whether both block comment markers are declared.
    pub fn has_block(&self) -> bool {
        self.block_on.is_some() && self.block_off.is_some()
    }

    /// Whether both alternate block comment markers are declared.
    pub fn has_block_alt(&self) -> bool {
        self.block_on_alt.is_some() && self.block_off_alt.is_some()
    }
}

#[derive(Debug, Clone)]
/// One named keyword/prefix group with its own style inside a wordfile.
pub struct CodeFormat {
    pub(crate) number: i32,
    pub(crate) name: String,
    pub(crate) type_tag: String,
    pub(crate) color: Option<Rgb>,
    pub(crate) back_color: Option<Rgb>,
    pub(crate) auto_back: bool,
    pub(crate) font_style: FontStyle,
    pub(crate) keywords: Vec<String>,
    pub(crate) prefixes: Vec<String>,
}

/// Fallback code-format palette, indexed by `(number - 1).rem_euclid(5)`.
const CODE_FORMAT_PALETTE: [Rgb; 5] = [
    Rgb::new(0, 0, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(255, 128, 0),
    Rgb::new(0, 128, 0),
    Rgb::new(128, 64, 64),
];

const WHITE: Rgb = Rgb::new(255, 255, 255);

impl CodeFormat {
    pub(crate) fn new(number: i32) -> Self {
        Self {
            number,
            name: String::new(),
            type_tag: String::new(),
            color: None,
            back_color: None,
            auto_back: true,
            font_style: FontStyle::Plain,
            keywords: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    /// The code-format number.
    pub fn number(&self) -> i32 {
        self.number
    }

    /// The display name (empty when not declared).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type tag: an explicit `[A-Z_]+` word or a synthesized base-36 tag.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// The foreground color, falling back to the fixed palette by number.
    pub fn color(&self) -> Rgb {
        self.color.unwrap_or_else(|| {
            let index = (self.number as i64 - 1).rem_euclid(CODE_FORMAT_PALETTE.len() as i64);
            CODE_FORMAT_PALETTE[index as usize]
        })
    }

    /// The background color, falling back to white.
    pub fn back_color(&self) -> Rgb {
        self.back_color.unwrap_or(WHITE)
    }

    /// Whether the background color is chosen automatically.
    pub fn auto_back(&self) -> bool {
        self.auto_back
    }

    /// The font style, defaulting to plain.
    pub fn font_style(&self) -> FontStyle {
        self.font_style
    }

    /// The keyword strings of this group.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// The prefix strings of this group.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl PartialEq for CodeFormat {
    fn eq(&self, other: &Self) -> bool {
        self.type_tag == other.type_tag && self.number == other.number
    }
}

impl Eq for CodeFormat {}

impl Hash for CodeFormat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_tag.hash(state);
        self.number.hash(state);
    }
}

/// Default descriptor-level foreground colors per style slot.
const COLORS_DEFAULT: [Rgb; STYLE_SLOT_COUNT] = [
    Rgb::new(0, 0, 0),
    Rgb::new(0, 128, 128),
    Rgb::new(0, 128, 128),
    Rgb::new(128, 128, 128),
    Rgb::new(255, 0, 0),
];

const COLORS_BACK_DEFAULT: [Rgb; STYLE_SLOT_COUNT] = [WHITE; STYLE_SLOT_COUNT];
const COLORS_AUTO_BACK_DEFAULT: [bool; STYLE_SLOT_COUNT] = [true; STYLE_SLOT_COUNT];
const FONT_STYLE_DEFAULT: [FontStyle; STYLE_SLOT_COUNT] = [FontStyle::Plain; STYLE_SLOT_COUNT];

#[derive(Debug, Clone, Default)]
/// A parsed wordfile: one language's lexical and display rules.
///
/// Instances are produced by [`Wordfile::parse`] (and friends) and are
/// immutable afterwards. Identity is the (kind, number) pair.
pub struct Wordfile {
    pub(crate) number: i32,
    pub(crate) name: String,
    pub(crate) kind: LanguageKind,
    pub(crate) tag_based: bool,

    pub(crate) nocase: bool,
    pub(crate) noquote: bool,
    pub(crate) enable_mls: bool,
    pub(crate) disable_mls: bool,
    pub(crate) enable_spell_check: bool,

    pub(crate) comments: CommentMarkers,
    pub(crate) escape_char: Option<char>,
    pub(crate) valid_columns: Option<String>,
    pub(crate) string_chars: Option<String>,
    pub(crate) string_literal_prefix: Option<String>,
    pub(crate) delimiters: Option<String>,
    pub(crate) regex_type: Option<String>,

    pub(crate) file_names: Vec<String>,
    pub(crate) file_extensions: Vec<String>,

    pub(crate) indent_strings: Vec<String>,
    pub(crate) indent_strings_sol: Vec<String>,
    pub(crate) unindent_strings: Vec<String>,
    pub(crate) open_brace_strings: Vec<String>,
    pub(crate) close_brace_strings: Vec<String>,
    pub(crate) open_fold_strings: Vec<String>,
    pub(crate) close_fold_strings: Vec<String>,
    pub(crate) open_comment_fold_strings: Vec<String>,
    pub(crate) close_comment_fold_strings: Vec<String>,
    pub(crate) ignore_fold_strings: Vec<String>,
    pub(crate) ignore_strings_sol: Vec<String>,
    pub(crate) marker_characters: Vec<String>,

    pub(crate) function_strings: Vec<String>,
    pub(crate) member_strings: Vec<String>,
    pub(crate) variable_strings: Vec<String>,

    pub(crate) colors: Option<[Rgb; STYLE_SLOT_COUNT]>,
    pub(crate) colors_back: Option<[Rgb; STYLE_SLOT_COUNT]>,
    pub(crate) colors_auto_back: Option<[bool; STYLE_SLOT_COUNT]>,
    pub(crate) font_styles: Option<[FontStyle; STYLE_SLOT_COUNT]>,

    pub(crate) code_formats: Vec<CodeFormat>,
}

impl Wordfile {
    /// The wordfile number.
    pub fn number(&self) -> i32 {
        self.number
    }

    /// The display name (empty when not declared).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared language kind.
    pub fn kind(&self) -> LanguageKind {
        self.kind
    }

    /// Whether tokens of this language are `<`/`>` delimited markup tags.
    ///
    /// Derived from the kind when parsing finishes.
    pub fn is_tag_based(&self) -> bool {
        self.tag_based
    }

    /// Whether keyword matching is case-insensitive (`Nocase`).
    pub fn case_insensitive(&self) -> bool {
        self.nocase
    }

    /// Whether string highlighting is disabled (`Noquote`).
    pub fn no_quote(&self) -> bool {
        self.noquote
    }

    /// Whether multi-line strings are enabled (`EnableMLS`).
    pub fn multi_line_strings_enabled(&self) -> bool {
        self.enable_mls
    }

    /// Whether multi-line strings are disabled (`DisableMLS`).
    pub fn multi_line_strings_disabled(&self) -> bool {
        self.disable_mls
    }

    /// Whether spell-check-as-you-type is enabled.
    pub fn spell_check_enabled(&self) -> bool {
        self.enable_spell_check
    }

    /// The declared comment markers.
    pub fn comments(&self) -> &CommentMarkers {
        &self.comments
    }

    /// The declared escape character.
    pub fn escape_char(&self) -> Option<char> {
        self.escape_char
    }

    /// The `Valid Columns` restriction.
    pub fn valid_columns(&self) -> Option<&str> {
        self.valid_columns.as_deref()
    }

    /// The string delimiter characters, defaulting to `"`.
    pub fn string_chars(&self) -> &str {
        self.string_chars.as_deref().unwrap_or("\"")
    }

    /// The string literal prefix, if declared.
    pub fn string_literal_prefix(&self) -> Option<&str> {
        self.string_literal_prefix.as_deref()
    }

    /// The word delimiter characters, defaulting to a single space.
    pub fn delimiters(&self) -> &str {
        self.delimiters.as_deref().unwrap_or(" ")
    }

    /// The declared regular-expression flavor tag (data only; no engine).
    pub fn regex_type(&self) -> Option<&str> {
        self.regex_type.as_deref()
    }

    /// Declared file names, upper-cased, in declaration order.
    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    /// Declared file extensions, upper-cased, in declaration order.
    pub fn file_extensions(&self) -> &[String] {
        &self.file_extensions
    }

    /// Whether a file extension matches this wordfile (case-insensitive).
    pub fn matches_extension(&self, extension: &str) -> bool {
        let extension = extension.to_uppercase();
        self.file_extensions.iter().any(|e| *e == extension)
    }

    /// Strings that increase the indent level.
    pub fn indent_strings(&self) -> &[String] {
        &self.indent_strings
    }

    /// Start-of-line strings that increase the indent level.
    pub fn indent_strings_sol(&self) -> &[String] {
        &self.indent_strings_sol
    }

    /// Strings that decrease the indent level.
    pub fn unindent_strings(&self) -> &[String] {
        &self.unindent_strings
    }

    /// Open-brace marker strings.
    pub fn open_brace_strings(&self) -> &[String] {
        &self.open_brace_strings
    }

    /// Close-brace marker strings.
    pub fn close_brace_strings(&self) -> &[String] {
        &self.close_brace_strings
    }

    /// Fold-region open marker strings.
    pub fn open_fold_strings(&self) -> &[String] {
        &self.open_fold_strings
    }

    /// Fold-region close marker strings.
    pub fn close_fold_strings(&self) -> &[String] {
        &self.close_fold_strings
    }

    /// Comment-fold open marker strings.
    pub fn open_comment_fold_strings(&self) -> &[String] {
        &self.open_comment_fold_strings
    }

    /// Comment-fold close marker strings.
    pub fn close_comment_fold_strings(&self) -> &[String] {
        &self.close_comment_fold_strings
    }

    /// Strings ignored by fold detection.
    pub fn ignore_fold_strings(&self) -> &[String] {
        &self.ignore_fold_strings
    }

    /// Start-of-line strings ignored by string detection.
    pub fn ignore_strings_sol(&self) -> &[String] {
        &self.ignore_strings_sol
    }

    /// Declared marker characters.
    pub fn marker_characters(&self) -> &[String] {
        &self.marker_characters
    }

    /// Function identifier marker strings.
    pub fn function_strings(&self) -> &[String] {
        &self.function_strings
    }

    /// Member identifier marker strings.
    pub fn member_strings(&self) -> &[String] {
        &self.member_strings
    }

    /// Variable identifier marker strings.
    pub fn variable_strings(&self) -> &[String] {
        &self.variable_strings
    }

    /// Foreground colors per style slot, with defaults substituted.
    pub fn colors(&self) -> [Rgb; STYLE_SLOT_COUNT] {
        self.colors.unwrap_or(COLORS_DEFAULT)
    }

    /// Background colors per style slot, with defaults substituted.
    pub fn colors_back(&self) -> [Rgb; STYLE_SLOT_COUNT] {
        self.colors_back.unwrap_or(COLORS_BACK_DEFAULT)
    }

    /// Auto-background flags per style slot, with defaults substituted.
    pub fn colors_auto_back(&self) -> [bool; STYLE_SLOT_COUNT] {
        self.colors_auto_back.unwrap_or(COLORS_AUTO_BACK_DEFAULT)
    }

    /// Font styles per style slot, with defaults substituted.
    pub fn font_styles(&self) -> [FontStyle; STYLE_SLOT_COUNT] {
        self.font_styles.unwrap_or(FONT_STYLE_DEFAULT)
    }

    /// The code formats (keyword groups) of this wordfile.
    pub fn code_formats(&self) -> &[CodeFormat] {
        &self.code_formats
    }

    /// Fold lower-cases keyword/prefix sets and derives capabilities.
    ///
    /// Called once when parsing completes; the descriptor is immutable
    /// afterwards.
    pub(crate) fn finish(&mut self) {
        self.tag_based = self.kind.is_tag_based();
        if self.nocase {
            for format in &mut self.code_formats {
                for keyword in &mut format.keywords {
                    *keyword = keyword.to_lowercase();
                }
                for prefix in &mut format.prefixes {
                    *prefix = prefix.to_lowercase();
                }
            }
        }
    }
}

impl PartialEq for Wordfile {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.number == other.number
    }
}

impl Eq for Wordfile {}

impl Hash for Wordfile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.number.hash(state);
    }
}
