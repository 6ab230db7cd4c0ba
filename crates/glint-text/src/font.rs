use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use cosmic_text::fontdb::{self, Family, Query};
use cosmic_text::{Attrs, Buffer, Metrics, Shaping, SwashCache};
use glint_core::geometry::{Rect, Size};
use glint_core::math::Vec2;
use glint_core::profiling::profile_function;
use glint_render::Rgba8;

use crate::error::{TextError, TextResult};
use crate::surface::Surface;

/// A shared set of fonts that can shape and rasterize text.
///
/// Wraps a cosmic-text `FontSystem`. Clones share the same fonts.
#[derive(Clone)]
pub struct FontCollection {
    inner: Arc<RwLock<cosmic_text::FontSystem>>,
}

impl FontCollection {
    fn from_db(db: fontdb::Database) -> Self {
        let font_system = cosmic_text::FontSystem::new_with_locale_and_db(
            sys_locale::get_locale().unwrap_or_else(|| String::from("en-US")),
            db,
        );
        Self {
            inner: Arc::new(RwLock::new(font_system)),
        }
    }

    /// A collection holding every font installed on the system.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self::from_db(db)
    }

    /// A collection with no fonts. Fonts are added with [`FontCollection::load_file`].
    pub fn empty() -> Self {
        Self::from_db(fontdb::Database::new())
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, cosmic_text::FontSystem> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of font faces.
    pub fn len(&self) -> usize {
        self.write().db().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted, de-duplicated family names.
    pub fn families(&self) -> Vec<String> {
        let font_system = self.write();
        let mut families: Vec<String> = font_system
            .db()
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Declared family name matching `name` under [`fold_name`].
    ///
    /// The generic names `sans-serif`, `serif`, `monospace`, `cursive` and
    /// `fantasy` resolve to an installed face of that kind when no family is
    /// literally called that.
    pub fn find_family(&self, name: &str) -> Option<String> {
        let font_system = self.write();
        let db = font_system.db();

        let folded = fold_name(name);
        let declared = db
            .faces()
            .flat_map(|face| face.families.iter())
            .find(|(family, _)| fold_name(family) == folded)
            .map(|(family, _)| family.clone());

        declared.or_else(|| generic_family(name).and_then(|generic| generic_face(db, generic)))
    }

    /// Family to use when nothing else matches: the best sans-serif face,
    /// else whatever face comes first.
    pub fn fallback_family(&self) -> Option<String> {
        let font_system = self.write();
        let db = font_system.db();

        generic_face(db, Family::SansSerif).or_else(|| {
            db.faces()
                .next()
                .and_then(|face| face.families.first())
                .map(|(name, _)| name.clone())
        })
    }

    /// Add the faces of a font file and return the family names they declare.
    ///
    /// A file that exists but contains no parsable face is an error, even
    /// though the underlying database accepts it silently.
    pub fn load_file(&self, path: &Path) -> TextResult<Vec<String>> {
        let mut font_system = self.write();
        font_system
            .db_mut()
            .load_font_file(path)
            .map_err(|e| TextError::FontLoadFailure {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut families: Vec<String> = font_system
            .db()
            .faces()
            .filter(|face| matches!(&face.source, fontdb::Source::File(p) if p == path))
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        families.dedup();

        if families.is_empty() {
            return Err(TextError::FontLoadFailure {
                path: path.to_path_buf(),
                reason: "no usable font face in file".into(),
            });
        }
        Ok(families)
    }
}

impl fmt::Debug for FontCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCollection")
            .field("faces", &self.len())
            .finish()
    }
}

/// Case folding applied to family names and font file names before comparing them.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

const SANS_SERIF_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
    "Fira Sans",
    "Roboto",
];

const SERIF_FAMILIES: &[&str] = &[
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "Times New Roman",
];

const MONOSPACE_FAMILIES: &[&str] = &[
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Fira Mono",
    "Courier New",
];

/// Families that are installed as regular text faces but only cover symbols.
const SYMBOL_MARKERS: &[&str] = &["math", "symbol", "emoji", "dingbat"];

fn generic_family(name: &str) -> Option<Family<'static>> {
    match fold_name(name).as_str() {
        "sans-serif" => Some(Family::SansSerif),
        "serif" => Some(Family::Serif),
        "monospace" => Some(Family::Monospace),
        "cursive" => Some(Family::Cursive),
        "fantasy" => Some(Family::Fantasy),
        _ => None,
    }
}

fn is_regular_text_face(face: &fontdb::FaceInfo) -> bool {
    face.weight == fontdb::Weight::NORMAL
        && face.style == fontdb::Style::Normal
        && face.families.first().is_some_and(|(name, _)| {
            let name = fold_name(name);
            !SYMBOL_MARKERS.iter().any(|marker| name.contains(marker))
        })
}

/// Installed family standing in for `generic`: the database's own generic
/// mapping, then a list of common families, then for sans-serif and
/// monospace the first regular face of the right pitch.
fn generic_face(db: &fontdb::Database, generic: Family<'_>) -> Option<String> {
    let query = Query {
        families: &[generic],
        ..Default::default()
    };
    if let Some(face) = db.query(&query).and_then(|id| db.face(id)) {
        return face.families.first().map(|(name, _)| name.clone());
    }

    let (preferred, monospaced): (&[&str], Option<bool>) = match generic {
        Family::SansSerif => (SANS_SERIF_FAMILIES, Some(false)),
        Family::Serif => (SERIF_FAMILIES, None),
        Family::Monospace => (MONOSPACE_FAMILIES, Some(true)),
        _ => (&[], None),
    };

    for wanted in preferred {
        let wanted = fold_name(wanted);
        let found = db
            .faces()
            .flat_map(|face| face.families.iter())
            .find(|(family, _)| fold_name(family) == wanted);
        if let Some((family, _)) = found {
            return Some(family.clone());
        }
    }

    let monospaced = monospaced?;
    db.faces()
        .find(|face| face.monospaced == monospaced && is_regular_text_face(face))
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone())
}

/// Where a resolved font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Installed on the system.
    System,
    /// Loaded from a file in the font directory.
    File(PathBuf),
}

struct FontHandleInner {
    requested: String,
    family: String,
    size: f32,
    line_height: f32,
    source: FontSource,
    substitute: bool,
    collection: FontCollection,
}

/// A resolved font at a fixed pixel size.
///
/// Handles are cheap to clone and are owned by the cache that produced them;
/// two handles for the same resolved entry compare equal with [`FontHandle::ptr_eq`].
#[derive(Clone)]
pub struct FontHandle {
    inner: Arc<FontHandleInner>,
}

impl FontHandle {
    pub(crate) fn new(
        requested: &str,
        family: String,
        size: f32,
        line_height: f32,
        source: FontSource,
        substitute: bool,
        collection: FontCollection,
    ) -> Self {
        Self {
            inner: Arc::new(FontHandleInner {
                requested: requested.to_string(),
                family,
                size,
                line_height,
                source,
                substitute,
                collection,
            }),
        }
    }

    /// Name passed to resolve.
    pub fn requested_name(&self) -> &str {
        &self.inner.requested
    }

    /// Family actually used for shaping.
    pub fn family(&self) -> &str {
        &self.inner.family
    }

    /// Pixel size.
    pub fn size(&self) -> f32 {
        self.inner.size
    }

    /// Line height in pixels.
    pub fn line_height(&self) -> f32 {
        self.inner.size * self.inner.line_height
    }

    pub fn source(&self) -> &FontSource {
        &self.inner.source
    }

    /// True when the requested family was not found and the fallback face stands in.
    pub fn is_substitute(&self) -> bool {
        self.inner.substitute
    }

    pub fn ptr_eq(&self, other: &FontHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn shape(&self, font_system: &mut cosmic_text::FontSystem, text: &str) -> Buffer {
        let metrics = Metrics::new(self.inner.size, self.line_height());
        let mut buffer = Buffer::new(font_system, metrics);
        buffer.set_size(font_system, None, None);
        buffer.set_text(
            font_system,
            text,
            Attrs::new().family(Family::Name(&self.inner.family)),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(font_system, false);
        buffer
    }

    /// Extent of `text` laid out on unbounded lines: widest line by total line height.
    pub fn measure(&self, text: &str) -> Size<f32> {
        profile_function!();
        let mut font_system = self.inner.collection.write();
        let buffer = self.shape(&mut font_system, text);

        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
        }
        Size::new(width, height)
    }

    /// Blend the glyph coverage of `text` onto `surface` with `origin` as the
    /// top-left of the first line.
    ///
    /// Returns the bounds of pixels actually written, `None` when nothing landed
    /// on the surface.
    pub(crate) fn rasterize(
        &self,
        text: &str,
        color: Rgba8,
        origin: Vec2,
        swash_cache: &mut SwashCache,
        surface: &mut Surface,
    ) -> Option<Rect<u32>> {
        profile_function!();
        let mut font_system = self.inner.collection.write();
        let buffer = self.shape(&mut font_system, text);
        let base = cosmic_text::Color::rgba(color.r, color.g, color.b, color.a);

        let mut touched = Rect::EMPTY;
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((origin.x, origin.y + run.line_y), 1.0);
                let glyph_color = glyph.color_opt.unwrap_or(base);

                swash_cache.with_pixels(
                    &mut font_system,
                    physical.cache_key,
                    glyph_color,
                    |x, y, c| {
                        let px = physical.x + x;
                        let py = physical.y + y;
                        let written = surface.blend_pixel(
                            px,
                            py,
                            Rgba8::new(c.r(), c.g(), c.b(), c.a()),
                        );
                        if written {
                            touched = touched.union(Rect::new(px as u32, py as u32, 1, 1));
                        }
                    },
                );
            }
        }

        (!touched.is_empty()).then_some(touched)
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("requested", &self.inner.requested)
            .field("family", &self.inner.family)
            .field("size", &self.inner.size)
            .field("source", &self.inner.source)
            .field("substitute", &self.inner.substitute)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() {
        let collection = FontCollection::empty();
        assert!(collection.is_empty());
        assert!(collection.families().is_empty());
        assert_eq!(collection.find_family("Arial"), None);
        assert_eq!(collection.fallback_family(), None);
    }

    #[test]
    fn test_load_missing_file() {
        let collection = FontCollection::empty();
        let err = collection
            .load_file(Path::new("definitely/not/here.ttf"))
            .unwrap_err();
        assert!(matches!(err, TextError::FontLoadFailure { .. }));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_load_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Garbage.ttf");
        std::fs::write(&path, b"this is not a font").unwrap();

        let collection = FontCollection::empty();
        let err = collection.load_file(&path).unwrap_err();
        assert!(matches!(err, TextError::FontLoadFailure { path: p, .. } if p == path));
    }

    fn fixture_collection() -> FontCollection {
        let collection = FontCollection::empty();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Inter-Regular.ttf");
        assert_eq!(collection.load_file(&path).unwrap(), vec!["Inter".to_string()]);
        collection
    }

    #[test]
    fn test_fold_name_is_unicode_aware() {
        assert_eq!(fold_name("DejaVu Sans"), fold_name("DEJAVU SANS"));
        assert_eq!(fold_name("ÉCOLE"), "école");
    }

    #[test]
    fn test_generic_names() {
        assert_eq!(generic_family("Sans-Serif"), Some(Family::SansSerif));
        assert_eq!(generic_family("monospace"), Some(Family::Monospace));
        assert_eq!(generic_family("serif"), Some(Family::Serif));
        assert_eq!(generic_family("Inter"), None);
    }

    #[test]
    fn test_find_family_in_loaded_file() {
        let collection = fixture_collection();
        assert_eq!(collection.find_family("inter"), Some("Inter".into()));
        assert_eq!(collection.find_family("INTER"), Some("Inter".into()));
        assert_eq!(collection.find_family("Arial"), None);
    }

    #[test]
    fn test_sans_serif_generic_finds_regular_proportional_face() {
        let collection = fixture_collection();
        assert_eq!(collection.find_family("sans-serif"), Some("Inter".into()));
        assert_eq!(collection.fallback_family(), Some("Inter".into()));
        assert_eq!(collection.find_family("monospace"), None);
    }

    #[test]
    fn test_handle_identity_and_substitution() {
        let collection = FontCollection::empty();
        let a = FontHandle::new(
            "Fancy",
            "Fallback Sans".into(),
            16.0,
            1.25,
            FontSource::System,
            true,
            collection.clone(),
        );
        let b = a.clone();
        let c = FontHandle::new(
            "fallback sans",
            "Fallback Sans".into(),
            16.0,
            1.25,
            FontSource::System,
            false,
            collection,
        );

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert!(a.is_substitute());
        assert!(!c.is_substitute());
        assert_eq!(a.line_height(), 20.0);
    }
}
