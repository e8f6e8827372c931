//! Textures and the store that owns them.

use std::collections::HashMap;
use std::path::Path;

use crate::math::color::{Color4, Color4f};
use crate::math::vec::Vec2;
use crate::util::buf::Buf2;

/// Identifies a texture within a [`TextureStore`].
pub type TextureId = u32;

/// An immutable RGBA8 image with a store-assigned id and a name.
pub struct Texture {
    pub id: TextureId,
    pub name: String,
    pixels: Buf2<Color4>,
}

impl Texture {
    /// Returns the width of `self` in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }
    /// Returns the height of `self` in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
    /// Returns the texel at (x, y).
    ///
    /// Out-of-bounds coordinates read as transparent black.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color4 {
        self.pixels.get(x, y).copied().unwrap_or_default()
    }
}

/// Owns every loaded texture, addressable by id or by name.
///
/// Ids are assigned monotonically at load time and never reused; names are
/// unique within a store. Textures are immutable once loaded and shared by
/// reference, so no synchronization is ever needed to sample them.
#[derive(Default)]
pub struct TextureStore {
    next_id: TextureId,
    textures: HashMap<TextureId, Texture>,
    names: HashMap<String, TextureId>,
}

impl TextureStore {
    /// Returns an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the image file at `path` (PNG or JPEG) and registers it
    /// under `name`, returning the assigned id.
    ///
    /// Returns `None`, with the cause logged, if the file cannot be read
    /// or decoded.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        name: impl Into<String>,
    ) -> Option<TextureId> {
        let path = path.as_ref();
        let img = match image::open(path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                log::error!("failed to load texture {}: {e}", path.display());
                return None;
            }
        };
        let (w, h) = img.dimensions();
        let raw = img.into_raw();
        let pixels = Buf2::new_with(w, h, |x, y| {
            let i = ((y * w + x) * 4) as usize;
            Color4([raw[i], raw[i + 1], raw[i + 2], raw[i + 3]])
        });
        Some(self.insert(name.into(), pixels))
    }

    /// Registers an already-decoded image under `name`, returning the
    /// assigned id.
    pub fn load_from_pixels(
        &mut self,
        pixels: Buf2<Color4>,
        name: impl Into<String>,
    ) -> TextureId {
        self.insert(name.into(), pixels)
    }

    fn insert(&mut self, name: String, pixels: Buf2<Color4>) -> TextureId {
        let id = self.next_id;
        self.next_id += 1;
        self.names.insert(name.clone(), id);
        self.textures.insert(id, Texture { id, name, pixels });
        id
    }

    /// Returns the texture with the given id, if any.
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(&id)
    }

    /// Returns the texture with the given name, if any.
    pub fn get_by_name(&self, name: &str) -> Option<&Texture> {
        self.names.get(name).and_then(|id| self.textures.get(id))
    }

    /// Returns the id registered for `name`, if any.
    pub fn id_of(&self, name: &str) -> Option<TextureId> {
        self.names.get(name).copied()
    }
}

/// Samples `tex` at the texture coordinate `uv`, nearest-neighbor.
///
/// `uv` is clamped to [0, 1]²; the texel read is
/// (⌊u·(w−1)⌋, ⌊v·(h−1)⌋). No filtering of any kind.
pub fn sample(tex: &Texture, uv: Vec2) -> Color4f {
    let u = uv.x().clamp(0.0, 1.0);
    let v = uv.y().clamp(0.0, 1.0);
    let x = (u * (tex.width() - 1) as f32) as u32;
    let y = (v * (tex.height() - 1) as f32) as u32;
    tex.pixel(x, y).to_color4f()
}

#[cfg(test)]
mod tests {
    use crate::math::{rgba, vec2};

    use super::*;

    fn checker(store: &mut TextureStore, name: &str) -> TextureId {
        let px = Buf2::new_with(2, 2, |x, y| {
            if (x ^ y) & 1 == 0 {
                rgba(255, 0, 0, 255)
            } else {
                rgba(0, 0, 255, 255)
            }
        });
        store.load_from_pixels(px, name)
    }

    #[test]
    fn ids_are_monotonic_and_names_resolve() {
        let mut store = TextureStore::new();
        let a = checker(&mut store, "a");
        let b = checker(&mut store, "b");
        assert_eq!((a, b), (0, 1));
        assert_eq!(store.id_of("b"), Some(b));
        assert_eq!(store.get_by_name("a").map(|t| t.id), Some(a));
        assert!(store.get(99).is_none());
        assert!(store.id_of("missing").is_none());
    }

    #[test]
    fn sample_is_nearest_with_clamp() {
        let mut store = TextureStore::new();
        let id = checker(&mut store, "t");
        let tex = store.get(id).unwrap();

        let red = rgba(255, 0, 0, 255).to_color4f();
        let blue = rgba(0, 0, 255, 255).to_color4f();

        assert_eq!(sample(tex, vec2(0.0, 0.0)), red);
        assert_eq!(sample(tex, vec2(1.0, 0.0)), blue);
        assert_eq!(sample(tex, vec2(1.0, 1.0)), red);
        // Out-of-range coordinates clamp to the edge
        assert_eq!(sample(tex, vec2(-3.0, 0.0)), red);
        assert_eq!(sample(tex, vec2(2.0, 2.0)), red);
    }
}
