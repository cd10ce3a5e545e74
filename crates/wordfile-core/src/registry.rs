use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::descriptor::{LanguageKind, Wordfile};
use crate::error::WordfileError;

/// Where a registered wordfile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordfileOrigin {
    /// Shipped with the application.
    Bundled,
    /// Added by the user.
    Custom,
}

/// A registry entry: the shared descriptor plus its provenance.
#[derive(Debug, Clone)]
pub struct RegisteredWordfile {
    wordfile: Arc<Wordfile>,
    origin: WordfileOrigin,
    path: Option<PathBuf>,
}

impl RegisteredWordfile {
    /// The shared descriptor.
    pub fn wordfile(&self) -> &Arc<Wordfile> {
        &self.wordfile
    }

    /// Bundled or custom.
    pub fn origin(&self) -> WordfileOrigin {
        self.origin
    }

    /// Source file path, when the entry was loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// File extension registered wordfile sources carry on disk.
pub const WORDFILE_EXTENSION: &str = "wordfile";

/// An explicit, append-only collection of parsed wordfiles.
///
/// Entries are shared as `Arc<Wordfile>`. A descriptor whose (kind, number)
/// identity is already registered is skipped, so bundled definitions cannot
/// be shadowed by later loads.
#[derive(Debug, Default)]
pub struct WordfileRegistry {
    entries: Vec<RegisteredWordfile>,
}

impl WordfileRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already parsed descriptor. Returns the shared handle, or
    /// `None` when its identity is already present.
    pub fn register(
        &mut self,
        wordfile: Wordfile,
        origin: WordfileOrigin,
    ) -> Option<Arc<Wordfile>> {
        self.insert(wordfile, origin, None)
    }

    /// Parse and register wordfile source text.
    pub fn register_source(
        &mut self,
        source: &str,
        origin: WordfileOrigin,
    ) -> Result<Option<Arc<Wordfile>>, WordfileError> {
        let wordfile = Wordfile::parse(source)?;
        Ok(self.insert(wordfile, origin, None))
    }

    /// Load and register one wordfile from disk.
    pub fn load_path(
        &mut self,
        path: impl AsRef<Path>,
        origin: WordfileOrigin,
    ) -> Result<Option<Arc<Wordfile>>, WordfileError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let wordfile = Wordfile::parse(&source)?;
        debug!(path = %path.display(), name = wordfile.name(), "loaded wordfile");
        Ok(self.insert(wordfile, origin, Some(path.to_path_buf())))
    }

    /// Load every `*.wordfile` file in a directory.
    ///
    /// One source failing to read or parse does not stop the batch; failures
    /// are logged and returned per path.
    pub fn load_directory(
        &mut self,
        dir: impl AsRef<Path>,
        origin: WordfileOrigin,
    ) -> Result<Vec<(PathBuf, WordfileError)>, WordfileError> {
        let mut failures = Vec::new();
        let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(WORDFILE_EXTENSION))
            })
            .collect();
        paths.sort();
        for path in paths {
            if let Err(err) = self.load_path(&path, origin) {
                warn!(path = %path.display(), error = %err, "skipping unreadable wordfile");
                failures.push((path, err));
            }
        }
        Ok(failures)
    }

    fn insert(
        &mut self,
        wordfile: Wordfile,
        origin: WordfileOrigin,
        path: Option<PathBuf>,
    ) -> Option<Arc<Wordfile>> {
        if self.entries.iter().any(|e| *e.wordfile == wordfile) {
            return None;
        }
        let shared = Arc::new(wordfile);
        self.entries.push(RegisteredWordfile {
            wordfile: Arc::clone(&shared),
            origin,
            path,
        });
        Some(shared)
    }

    /// First wordfile with the given number.
    pub fn by_number(&self, number: i32) -> Option<&Arc<Wordfile>> {
        self.entries
            .iter()
            .map(RegisteredWordfile::wordfile)
            .find(|w| w.number() == number)
    }

    /// First wordfile of the given kind.
    pub fn by_kind(&self, kind: LanguageKind) -> Option<&Arc<Wordfile>> {
        self.all_by_kind(kind).next()
    }

    /// All wordfiles of the given kind, in registration order.
    pub fn all_by_kind(&self, kind: LanguageKind) -> impl Iterator<Item = &Arc<Wordfile>> {
        self.entries
            .iter()
            .map(RegisteredWordfile::wordfile)
            .filter(move |w| w.kind() == kind)
    }

    /// First wordfile claiming the given file extension (case-insensitive).
    pub fn by_extension(&self, extension: &str) -> Option<&Arc<Wordfile>> {
        self.all_by_extension(extension).next()
    }

    /// All wordfiles claiming the given file extension.
    pub fn all_by_extension<'a>(
        &'a self,
        extension: &str,
    ) -> impl Iterator<Item = &'a Arc<Wordfile>> {
        let extension = extension.to_uppercase();
        self.entries
            .iter()
            .map(RegisteredWordfile::wordfile)
            .filter(move |w| w.file_extensions().contains(&extension))
    }

    /// All entries, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredWordfile> {
        self.entries.iter()
    }

    /// Bundled entries only.
    pub fn bundled(&self) -> impl Iterator<Item = &RegisteredWordfile> {
        self.entries
            .iter()
            .filter(|e| e.origin == WordfileOrigin::Bundled)
    }

    /// Number of registered wordfiles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(number: i32, kind: &str, extension: &str) -> String {
        format!("/L{number}\"Demo {number}\" {kind} File Extensions = {extension}\n")
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = WordfileRegistry::new();
        registry
            .register_source(&demo(1, "C_LANG", "c"), WordfileOrigin::Bundled)
            .unwrap();
        registry
            .register_source(&demo(2, "JAVA_LANG", "java"), WordfileOrigin::Custom)
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.by_number(2).unwrap().name(), "Demo 2");
        assert_eq!(
            registry.by_kind(LanguageKind::C).unwrap().name(),
            "Demo 1"
        );
        assert_eq!(registry.by_extension("JAVA").unwrap().number(), 2);
        assert_eq!(registry.by_extension("java").unwrap().number(), 2);
        assert!(registry.by_extension("py").is_none());
        assert_eq!(registry.bundled().count(), 1);
    }

    #[test]
    fn test_duplicate_identity_is_skipped() {
        let mut registry = WordfileRegistry::new();
        let first = registry
            .register_source(&demo(1, "C_LANG", "c"), WordfileOrigin::Bundled)
            .unwrap();
        assert!(first.is_some());
        // Same (kind, number) identity, different name.
        let second = registry
            .register_source("/L1\"Other\" C_LANG\n", WordfileOrigin::Custom)
            .unwrap();
        assert!(second.is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.by_number(1).unwrap().name(), "Demo 1");
    }

    #[test]
    fn test_load_directory_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.wordfile"), demo(1, "C_LANG", "c")).unwrap();
        std::fs::write(dir.path().join("b.wordfile"), "garbage").unwrap();
        std::fs::write(dir.path().join("ignored.txt"), "not a wordfile").unwrap();

        let mut registry = WordfileRegistry::new();
        let failures = registry
            .load_directory(dir.path(), WordfileOrigin::Custom)
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].0.ends_with("b.wordfile"));
    }
}
