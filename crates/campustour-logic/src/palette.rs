//! Material palette: a small arena of material descriptions addressed by
//! [`MaterialHandle`].
//!
//! Each visual class (wall, corridor floor, ceiling, wood, glass, metal,
//! whiteboard) is created once when the palette is built and shared by
//! handle across every mesh of that class. Per-instance tints (book spines,
//! food props, people) and textured room floors get a fresh entry per call.

use serde::Serialize;
use std::collections::HashMap;

use crate::assets::{LoadedTextures, TextureKey};
use crate::constants::colors;
use crate::math::Color;

/// Index of a material inside a [`MaterialPalette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MaterialHandle(usize);

impl MaterialHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Texture binding of a material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureBinding {
    pub key: TextureKey,
    pub path: String,
    /// UV repeat factor (1,1 = stretch once).
    pub repeat: (f32, f32),
}

/// Engine-agnostic PBR material description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialSpec {
    pub label: String,
    pub color: Color,
    pub texture: Option<TextureBinding>,
    /// Only meaningful when `transparent` is set.
    pub opacity: f32,
    pub transparent: bool,
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
}

impl MaterialSpec {
    /// Opaque, fully rough, single-sided.
    pub fn flat(label: &str, color: Color) -> Self {
        Self {
            label: label.to_string(),
            color,
            texture: None,
            opacity: 1.0,
            transparent: false,
            metalness: 0.0,
            roughness: 1.0,
            double_sided: false,
        }
    }

    fn textured(label: &str, binding: TextureBinding) -> Self {
        Self {
            texture: Some(binding),
            ..Self::flat(label, Color::WHITE)
        }
    }

    fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

/// Visual classes that share one material for the whole building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MaterialClass {
    Wall,
    CorridorFloor,
    Ceiling,
    Wood,
    Glass,
    Metal,
    Whiteboard,
}

impl MaterialClass {
    pub const ALL: [MaterialClass; 7] = [
        MaterialClass::Wall,
        MaterialClass::CorridorFloor,
        MaterialClass::Ceiling,
        MaterialClass::Wood,
        MaterialClass::Glass,
        MaterialClass::Metal,
        MaterialClass::Whiteboard,
    ];
}

#[derive(Debug, Clone)]
pub struct MaterialPalette {
    materials: Vec<MaterialSpec>,
    shared: HashMap<MaterialClass, MaterialHandle>,
    textures: LoadedTextures,
}

impl MaterialPalette {
    /// Build the shared materials, using a texture where it loaded and a
    /// flat fallback color where it did not.
    pub fn new(textures: &LoadedTextures) -> Self {
        let mut palette = Self {
            materials: Vec::new(),
            shared: HashMap::new(),
            textures: textures.clone(),
        };
        for class in MaterialClass::ALL {
            let spec = palette.class_spec(class);
            let handle = palette.push(spec);
            palette.shared.insert(class, handle);
        }
        palette
    }

    fn class_spec(&self, class: MaterialClass) -> MaterialSpec {
        match class {
            MaterialClass::Wall => match self.binding(TextureKey::Wall, None) {
                Some(b) => MaterialSpec::textured("wall", b),
                None => MaterialSpec::flat("wall", colors::WALL_FALLBACK).double_sided(),
            },
            MaterialClass::CorridorFloor => match self.binding(TextureKey::CorridorFloor, None) {
                Some(b) => MaterialSpec::textured("corridor_floor", b),
                None => MaterialSpec::flat("corridor_floor", colors::CORRIDOR_FLOOR_FALLBACK),
            }
            .double_sided(),
            MaterialClass::Ceiling => MaterialSpec::flat("ceiling", Color::WHITE).double_sided(),
            MaterialClass::Wood => match self.binding(TextureKey::Wood, None) {
                Some(b) => MaterialSpec::textured("wood", b),
                None => MaterialSpec::flat("wood", colors::WOOD_FALLBACK),
            },
            MaterialClass::Glass => MaterialSpec {
                opacity: 0.2,
                transparent: true,
                metalness: 0.1,
                roughness: 0.1,
                ..MaterialSpec::flat("glass", Color::WHITE)
            },
            MaterialClass::Metal => MaterialSpec {
                metalness: 0.8,
                roughness: 0.4,
                ..MaterialSpec::flat("metal", colors::METAL)
            },
            MaterialClass::Whiteboard => MaterialSpec::flat("whiteboard", Color::WHITE),
        }
    }

    fn binding(&self, key: TextureKey, repeat: Option<(f32, f32)>) -> Option<TextureBinding> {
        self.textures.get(key).map(|info| TextureBinding {
            key,
            path: info.path.clone(),
            repeat: repeat.unwrap_or(info.repeat),
        })
    }

    fn push(&mut self, spec: MaterialSpec) -> MaterialHandle {
        self.materials.push(spec);
        MaterialHandle(self.materials.len() - 1)
    }

    /// Shared material for a visual class.
    pub fn shared(&self, class: MaterialClass) -> MaterialHandle {
        // Every class is inserted in `new`, so the fallback never triggers.
        self.shared
            .get(&class)
            .copied()
            .unwrap_or(MaterialHandle(0))
    }

    /// Fresh single-use material for a per-instance tint.
    pub fn tinted(&mut self, label: &str, color: Color) -> MaterialHandle {
        self.push(MaterialSpec::flat(label, color))
    }

    /// Floor material for a room. With a loaded floor texture the room
    /// gets its own material tiled `(width/2, depth/2)` times, otherwise it
    /// shares the corridor floor material.
    pub fn room_floor(
        &mut self,
        texture: Option<TextureKey>,
        width: f32,
        depth: f32,
    ) -> MaterialHandle {
        let repeat = Some((width / 2.0, depth / 2.0));
        let binding = texture.and_then(|key| self.binding(key, repeat));
        match binding {
            Some(b) => self.push(MaterialSpec::textured(b.key.name(), b).double_sided()),
            None => self.shared(MaterialClass::CorridorFloor),
        }
    }

    pub fn get(&self, handle: MaterialHandle) -> Option<&MaterialSpec> {
        self.materials.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialHandle, &MaterialSpec)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialHandle(i), m))
    }
}
