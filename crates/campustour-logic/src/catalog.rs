//! Room type registry.
//!
//! Maps a room name to the things that vary by room type: its floor
//! texture, its furniture arrangement and its light rig. Adding a room
//! type is one [`RoomCatalog::register`] call.

use std::collections::BTreeMap;

use crate::assets::TextureKey;
use crate::constants::room_names;
use crate::furnishing;
use crate::furniture::BuildContext;
use crate::lighting::{self, LightSpec};
use crate::rooms::RoomDefinition;
use crate::scene::SceneNode;

/// Builds a room's furniture in room-local coordinates.
pub type FurnishFn = fn(&RoomDefinition, &mut BuildContext) -> Vec<SceneNode>;
/// Builds a room's lights in world coordinates.
pub type LightRigFn = fn(&RoomDefinition) -> Vec<LightSpec>;

#[derive(Debug, Clone, Copy)]
pub struct RoomType {
    /// `None` keeps the corridor floor material.
    pub floor_texture: Option<TextureKey>,
    pub furnish: FurnishFn,
    pub lights: LightRigFn,
}

#[derive(Debug, Clone)]
pub struct RoomCatalog {
    types: BTreeMap<String, RoomType>,
}

impl RoomCatalog {
    /// A catalog with no room types; every room gets the default rig and
    /// no furniture.
    pub fn empty() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Register (or replace) the type for a room name.
    pub fn register(&mut self, name: impl Into<String>, kind: RoomType) -> &mut Self {
        let name = name.into();
        if self.types.insert(name.clone(), kind).is_some() {
            log::debug!("Replaced room type '{}'", name);
        }
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&RoomType> {
        self.types.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for RoomCatalog {
    /// The four reference room types.
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog
            .register(
                room_names::RECEPTION,
                RoomType {
                    floor_texture: Some(TextureKey::ReceptionFloor),
                    furnish: furnishing::reception,
                    lights: lighting::reception_lights,
                },
            )
            .register(
                room_names::CLASSROOM,
                RoomType {
                    floor_texture: Some(TextureKey::ClassroomFloor),
                    furnish: furnishing::classroom,
                    lights: lighting::classroom_lights,
                },
            )
            .register(
                room_names::LIBRARY,
                RoomType {
                    floor_texture: Some(TextureKey::LibraryFloor),
                    furnish: furnishing::library,
                    lights: lighting::library_lights,
                },
            )
            .register(
                room_names::CAFETERIA,
                RoomType {
                    floor_texture: Some(TextureKey::CafeteriaFloor),
                    furnish: furnishing::cafeteria,
                    lights: lighting::cafeteria_lights,
                },
            );
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LoadedTextures;
    use crate::palette::MaterialPalette;
    use crate::rooms::{build_room, reference_rooms};
    use crate::scene::NodeRole;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn no_furniture(_: &RoomDefinition, _: &mut BuildContext) -> Vec<SceneNode> {
        Vec::new()
    }

    #[test]
    fn default_registers_reference_rooms() {
        let catalog = RoomCatalog::default();
        assert_eq!(catalog.len(), 4);
        for room in reference_rooms() {
            assert!(catalog.lookup(&room.name).is_some(), "{}", room.name);
        }
        assert!(catalog.lookup("Gym").is_none());
    }

    #[test]
    fn registering_a_new_type_extends_dispatch() {
        let mut catalog = RoomCatalog::default();
        catalog.register(
            "Gym",
            RoomType {
                floor_texture: None,
                furnish: furnishing::library,
                lights: lighting::default_lights,
            },
        );
        let mut def = reference_rooms().remove(2);
        def.name = "Gym".into();

        let mut palette = MaterialPalette::new(&LoadedTextures::none());
        let mut rng = StdRng::seed_from_u64(3);
        let mut ctx = BuildContext::new(&mut palette, &mut rng);
        let room = build_room(&def, &mut ctx, &catalog);
        // Library furniture: 3 shelves + 1 table set
        assert_eq!(room.children_with_role(NodeRole::Furniture).count(), 4);
    }

    #[test]
    fn register_replaces_existing() {
        let mut catalog = RoomCatalog::default();
        catalog.register(
            room_names::LIBRARY,
            RoomType {
                floor_texture: None,
                furnish: no_furniture,
                lights: lighting::default_lights,
            },
        );
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.lookup(room_names::LIBRARY).map(|k| k.floor_texture),
            Some(None)
        );
    }
}
