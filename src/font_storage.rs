use std::{collections::HashMap, path::PathBuf, sync::Arc};

use crate::face::FontdueFace;

/// Font database used to resolve the face a theme renders with.
///
/// Combines a database of available fonts (`fontdb`) with a cache of parsed
/// `fontdue` fonts. Fonts are parsed the first time a face is requested.
pub struct FontStorage {
    font_db: fontdb::Database,
    /// Not every face in `font_db` is necessarily parsed here.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading fonts into fontdb.
impl FontStorage {
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Resolving faces.
impl FontStorage {
    /// Parsed font for `id`, loading it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            ..Default::default()
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let r: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }

    /// Best match for `query`, sized to `size` pixels.
    pub fn query_face(&mut self, query: &fontdb::Query, size: f32) -> Option<FontdueFace> {
        let id = self.font_db.query(query)?;
        self.font(id).map(|font| FontdueFace::new(font, size))
    }

    /// A regular sans-serif face, falling back to the first loaded face.
    pub fn default_face(&mut self, size: f32) -> Option<FontdueFace> {
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        if let Some(face) = self.query_face(&query, size) {
            return Some(face);
        }
        let id = self.font_db.faces().next().map(|face| face.id)?;
        self.font(id).map(|font| FontdueFace::new(font, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_storage_resolves_nothing() {
        let mut storage = FontStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.len(), 0);
        assert!(storage.default_face(16.0).is_none());
    }

    #[test]
    fn garbage_binary_is_ignored() {
        let mut storage = FontStorage::new();
        storage.load_font_binary(b"definitely not a font".to_vec());
        assert!(storage.default_face(16.0).is_none());
    }
}
