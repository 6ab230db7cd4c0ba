//! Font resolution cache.
//!
//! Fonts are looked up by name and pixel size. A lookup first tries the fonts
//! installed on the system and then a `.ttf` file of the same name in the
//! configured font directory. Names are compared after Unicode lowercasing,
//! for family names, file names and cache keys alike. Results, including
//! substitutions, are cached so repeated lookups hand out the same [`FontHandle`].

use std::path::{Path, PathBuf};

use glint_core::alloc::HashMap;

use crate::error::{TextError, TextResult};
use crate::font::{FontCollection, FontHandle, FontSource, fold_name};

/// Font cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FontCacheConfig {
    /// Directory searched for `<name>.ttf` files, matched case-insensitively.
    pub font_dir: PathBuf,
    /// Pixel size used when a lookup passes a size `<= 0`.
    pub default_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Scan installed system fonts on creation.
    pub load_system_fonts: bool,
}

impl Default for FontCacheConfig {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from("Fonts"),
            default_size: 12.0,
            line_height: 1.2,
            load_system_fonts: true,
        }
    }
}

impl FontCacheConfig {
    pub fn font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dir = dir.into();
        self
    }

    pub fn default_size(mut self, size: f32) -> Self {
        self.default_size = size;
        self
    }

    pub fn line_height(mut self, multiplier: f32) -> Self {
        self.line_height = multiplier;
        self
    }

    pub fn load_system_fonts(mut self, load: bool) -> Self {
        self.load_system_fonts = load;
        self
    }
}

/// One step of the resolution chain, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Installed system fonts, substituting sans-serif when the family is missing.
    SystemFont,
    /// `<font_dir>/<name>.ttf` loaded into the cache's private collection.
    FontFile,
}

impl ResolveStrategy {
    pub const CHAIN: [ResolveStrategy; 2] =
        [ResolveStrategy::SystemFont, ResolveStrategy::FontFile];
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    name: String,
    size_bits: u32,
}

impl CacheKey {
    fn new(name: &str, size: f32) -> Self {
        Self {
            name: fold_name(name),
            size_bits: size.to_bits(),
        }
    }
}

/// Caches resolved font handles by `(name, size)`.
pub struct FontCache {
    config: FontCacheConfig,
    system: FontCollection,
    private: Option<FontCollection>,
    /// Font files already loaded into `private` by folded file name, with
    /// their path and declared family.
    loaded_files: HashMap<String, (PathBuf, String)>,
    handles: HashMap<CacheKey, FontHandle>,
}

impl FontCache {
    pub fn new(config: FontCacheConfig) -> Self {
        let system = if config.load_system_fonts {
            FontCollection::system()
        } else {
            FontCollection::empty()
        };
        tracing::debug!(
            "Font cache created with {} system faces, font dir {}",
            system.len(),
            config.font_dir.display()
        );

        Self {
            config,
            system,
            private: None,
            loaded_files: HashMap::default(),
            handles: HashMap::default(),
        }
    }

    /// Cache with default configuration and system fonts loaded.
    pub fn with_system_fonts() -> Self {
        Self::new(FontCacheConfig::default())
    }

    pub fn config(&self) -> &FontCacheConfig {
        &self.config
    }

    pub fn font_dir(&self) -> &Path {
        &self.config.font_dir
    }

    /// Sorted family names of the installed system fonts.
    pub fn system_families(&self) -> Vec<String> {
        self.system.families()
    }

    fn effective_size(&self, size: f32) -> f32 {
        if size > 0.0 { size } else { self.config.default_size }
    }

    /// Whether a lookup for `(name, size)` would be a cache hit.
    pub fn contains(&self, name: &str, size: f32) -> bool {
        let size = self.effective_size(size);
        self.handles.contains_key(&CacheKey::new(name, size))
    }

    /// Number of cached handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drop every cached handle. Fonts already loaded from files stay loaded.
    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// Resolve `name` at `size` pixels, `size <= 0` meaning the configured default.
    ///
    /// A missing family is not an error: the best available substitute is
    /// returned and cached. Fails only when no font at all is available.
    pub fn resolve(&mut self, name: &str, size: f32) -> TextResult<FontHandle> {
        let size = self.effective_size(size);
        let key = CacheKey::new(name, size);
        if let Some(handle) = self.handles.get(&key) {
            tracing::trace!("Font cache hit for '{}' at {}px", name, size);
            return Ok(handle.clone());
        }

        let mut substitute = None;
        let mut resolved = None;
        for strategy in ResolveStrategy::CHAIN {
            match strategy {
                ResolveStrategy::SystemFont => match self.resolve_system(name, size) {
                    Some(handle) if !handle.is_substitute() => {
                        resolved = Some(handle);
                        break;
                    }
                    other => substitute = other,
                },
                ResolveStrategy::FontFile => match self.resolve_file(name, size) {
                    Ok(handle) => {
                        resolved = Some(handle);
                        break;
                    }
                    Err(TextError::FontLoadFailure { path, reason }) => {
                        if substitute.is_some() {
                            tracing::debug!(
                                "No font file for '{}' ({}: {}), using substitute",
                                name,
                                path.display(),
                                reason
                            );
                        } else {
                            tracing::warn!(
                                "Failed to load font file {} for '{}': {}",
                                path.display(),
                                name,
                                reason
                            );
                        }
                    }
                    Err(e) => return Err(e),
                },
            }
        }

        let handle = resolved
            .or(substitute)
            .ok_or_else(|| TextError::FontNotFound(name.to_string()))?;
        tracing::debug!(
            "Resolved font '{}' at {}px to family '{}' ({:?})",
            name,
            size,
            handle.family(),
            handle.source()
        );

        self.handles.insert(key, handle.clone());
        Ok(handle)
    }

    fn resolve_system(&self, name: &str, size: f32) -> Option<FontHandle> {
        let (family, substitute) = match self.system.find_family(name) {
            Some(family) => (family, false),
            None => (self.system.fallback_family()?, true),
        };
        Some(FontHandle::new(
            name,
            family,
            size,
            self.config.line_height,
            FontSource::System,
            substitute,
            self.system.clone(),
        ))
    }

    /// `file_name` in the font directory, trying the exact name before a
    /// case-insensitive scan of the directory.
    fn find_font_file(&self, file_name: &str) -> Option<PathBuf> {
        let exact = self.config.font_dir.join(file_name);
        if exact.is_file() {
            return Some(exact);
        }

        let folded = fold_name(file_name);
        std::fs::read_dir(&self.config.font_dir)
            .ok()?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| fold_name(n) == folded)
            })
    }

    fn resolve_file(&mut self, name: &str, size: f32) -> TextResult<FontHandle> {
        let file_name = format!("{}.ttf", name);
        let key = fold_name(&file_name);

        let (path, family) = match self.loaded_files.get(&key) {
            Some(loaded) => loaded.clone(),
            None => {
                let Some(path) = self.find_font_file(&file_name) else {
                    return Err(TextError::FontLoadFailure {
                        path: self.config.font_dir.join(file_name),
                        reason: "file not found".into(),
                    });
                };
                let collection = self.private.get_or_insert_with(FontCollection::empty);
                let families = collection.load_file(&path)?;
                let family = families
                    .into_iter()
                    .next()
                    .ok_or_else(|| TextError::FontLoadFailure {
                        path: path.clone(),
                        reason: "font declares no family".into(),
                    })?;
                tracing::debug!("Loaded font file {} as '{}'", path.display(), family);
                self.loaded_files.insert(key, (path.clone(), family.clone()));
                (path, family)
            }
        };

        let collection = self
            .private
            .clone()
            .ok_or_else(|| TextError::FontLoadFailure {
                path: path.clone(),
                reason: "private collection missing".into(),
            })?;

        Ok(FontHandle::new(
            name,
            family,
            size,
            self.config.line_height,
            FontSource::File(path),
            false,
            collection,
        ))
    }
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("config", &self.config)
            .field("handles", &self.handles.len())
            .field("loaded_files", &self.loaded_files.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cache(dir: &Path) -> FontCache {
        FontCache::new(
            FontCacheConfig::default()
                .font_dir(dir)
                .load_system_fonts(false),
        )
    }

    #[test]
    fn test_config_defaults() {
        let config = FontCacheConfig::default();
        assert_eq!(config.font_dir, PathBuf::from("Fonts"));
        assert_eq!(config.default_size, 12.0);
        assert!(config.load_system_fonts);
    }

    #[test]
    fn test_chain_order() {
        assert_eq!(
            ResolveStrategy::CHAIN,
            [ResolveStrategy::SystemFont, ResolveStrategy::FontFile]
        );
    }

    #[test]
    fn test_key_is_case_insensitive() {
        assert_eq!(CacheKey::new("Arial", 12.0), CacheKey::new("ARIAL", 12.0));
        assert_ne!(CacheKey::new("Arial", 12.0), CacheKey::new("Arial", 13.0));
    }

    #[test]
    fn test_no_fonts_at_all_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = empty_cache(dir.path());

        let err = cache.resolve("Anything", 12.0).unwrap_err();
        assert!(matches!(err, TextError::FontNotFound(name) if name == "Anything"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unparsable_file_without_system_fonts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.ttf"), b"nope").unwrap();
        let mut cache = empty_cache(dir.path());

        assert!(matches!(
            cache.resolve("Broken", 10.0),
            Err(TextError::FontNotFound(_))
        ));
        assert!(cache.private.as_ref().is_some_and(|c| c.is_empty()));
    }

    #[test]
    fn test_non_positive_size_uses_default() {
        let cache = empty_cache(Path::new("Fonts"));
        assert_eq!(cache.effective_size(0.0), 12.0);
        assert_eq!(cache.effective_size(-3.0), 12.0);
        assert_eq!(cache.effective_size(9.0), 9.0);
    }

    #[test]
    fn test_font_file_loaded_once_across_sizes_and_casing() {
        let dir = tempfile::tempdir().unwrap();
        let fixture =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Inter-Regular.ttf");
        std::fs::copy(&fixture, dir.path().join("BodyText.ttf")).unwrap();
        let mut cache = empty_cache(dir.path());

        let small = cache.resolve("BodyText", 10.0).unwrap();
        let large = cache.resolve("bodytext", 24.0).unwrap();

        assert_eq!(cache.loaded_files.len(), 1);
        assert_eq!(cache.private.as_ref().map(FontCollection::len), Some(1));
        assert_eq!(small.source(), large.source());
        assert_eq!(large.family(), "Inter");
        assert!(!large.is_substitute());
        assert_eq!(cache.len(), 2);
    }
}
