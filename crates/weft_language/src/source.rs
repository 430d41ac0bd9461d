//! Loaded sources and the source map that owns them.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use weft_foundation::{Error, Result, SourceId};

use crate::span::{Cursor, Span};

/// Default tab width used for column computation.
pub const DEFAULT_TAB_WIDTH: u32 = 4;

/// A named piece of source text.
#[derive(Clone)]
pub struct Source {
    id: SourceId,
    name: String,
    text: Arc<str>,
    tab_width: u32,
}

impl Source {
    /// Returns the id of this source.
    #[must_use]
    pub const fn id(&self) -> SourceId {
        self.id
    }

    /// Returns the display name of this source.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full text of this source.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the length of the text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the source has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the tab width used for columns.
    #[must_use]
    pub const fn tab_width(&self) -> u32 {
        self.tab_width
    }

    /// Returns the span covering the whole text.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.id, 0, self.text.len(), 1, 1)
    }

    /// Returns a cursor positioned at the start of the text.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source(`{}` with {} bytes)", self.name, self.text.len())
    }
}

#[derive(Clone, Debug)]
enum FileEntry {
    Loaded(SourceId),
    Failed(String),
}

/// Owns every loaded source.
///
/// Sources are numbered in load order. File loads are cached per absolute
/// path, failures included.
#[derive(Clone, Debug)]
pub struct SourceMap {
    sources: Vec<Source>,
    files: HashMap<PathBuf, FileEntry>,
    base_path: PathBuf,
    tab_width: u32,
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceMap {
    /// Creates an empty source map resolving files against `.`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            files: HashMap::new(),
            base_path: PathBuf::from("."),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    /// Sets the directory relative file loads resolve against.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Sets the tab width of sources loaded afterwards.
    #[must_use]
    pub fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Adds an in-memory source.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` sources are loaded.
    pub fn load_string(&mut self, name: impl Into<String>, text: impl Into<Arc<str>>) -> SourceId {
        let id = SourceId(u32::try_from(self.sources.len()).expect("too many sources"));
        self.sources.push(Source {
            id,
            name: name.into(),
            text: text.into(),
            tab_width: self.tab_width,
        });
        id
    }

    /// Loads a file relative to the base path.
    ///
    /// Loading the same file twice returns the same source; a failed load is
    /// reported again on every call without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns a `SourceLoad` error if the file cannot be read as UTF-8 text.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<SourceId> {
        let requested = path.as_ref();
        let base = std::path::absolute(&self.base_path)
            .map_err(|e| Error::source_load(self.base_path.display().to_string(), e.to_string()))?;
        let file = base.join(requested);

        if let Some(entry) = self.files.get(&file) {
            return match entry {
                FileEntry::Loaded(id) => Ok(*id),
                FileEntry::Failed(message) => {
                    Err(Error::source_load(requested.display().to_string(), message.clone()))
                }
            };
        }

        let name = file
            .strip_prefix(&base)
            .unwrap_or(&file)
            .to_string_lossy()
            .replace('\\', "/");

        match std::fs::read_to_string(&file) {
            Ok(text) => {
                let id = self.load_string(name, text);
                self.files.insert(file, FileEntry::Loaded(id));
                Ok(id)
            }
            Err(e) => {
                let message = e.to_string();
                self.files.insert(file, FileEntry::Failed(message.clone()));
                Err(Error::source_load(requested.display().to_string(), message))
            }
        }
    }

    /// Returns the source with the given id.
    #[must_use]
    pub fn get(&self, id: SourceId) -> Option<&Source> {
        self.sources.get(id.index())
    }

    /// Returns the source with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not produced by this map.
    #[must_use]
    pub fn source(&self, id: SourceId) -> &Source {
        self.get(id)
            .unwrap_or_else(|| panic!("{id:?} does not belong to this source map"))
    }

    /// Returns the number of loaded sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Iterates over sources in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }
}
