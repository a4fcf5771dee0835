//! Room definitions, the reference building, and the room builder.
//!
//! A room is a group translated to `(x, 0, z)` holding its floor, four
//! walls, a corridor label and whatever furniture its type registers.
//! Rooms left of the corridor (`x < 0`) face it with their `+z` wall,
//! rooms on the right with their `-z` wall.

use serde::{Deserialize, Serialize};

use crate::catalog::RoomCatalog;
use crate::constants::camera::EYE_HEIGHT;
use crate::constants::layout::{
    BUILDING_HEIGHT, CORRIDOR_WIDTH, LABEL_DROP, LABEL_OUTSET, ROOM_FLOOR_LIFT, WALL_THICKNESS,
};
use crate::constants::room_names;
use crate::furniture::BuildContext;
use crate::math::Vec3;
use crate::scene::{NodeRole, SceneNode, Shape};
use crate::walls::create_wall;

/// A camera pose used as a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Viewpoint {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDefinition {
    /// Unique key, shown on the room label and the info overlay.
    pub name: String,
    pub description: String,
    /// Center offset from the corridor origin.
    pub x: f32,
    pub z: f32,
    /// Must exceed the door width.
    pub width: f32,
    pub depth: f32,
    pub viewpoint: Viewpoint,
}

impl RoomDefinition {
    /// Left of the corridor centerline. A room at `x == 0` counts as right.
    pub fn is_left_side(&self) -> bool {
        self.x < 0.0
    }
}

/// Looking down the corridor from the front entrance.
pub fn corridor_viewpoint() -> Viewpoint {
    Viewpoint::new(
        Vec3::new(0.0, EYE_HEIGHT, 10.0),
        Vec3::new(0.0, EYE_HEIGHT, -10.0),
    )
}

fn reference_room(
    name: &str,
    description: &str,
    (x, z): (f32, f32),
    (width, depth): (f32, f32),
    (eye_x, eye_z, look_z): (f32, f32, f32),
) -> RoomDefinition {
    RoomDefinition {
        name: name.to_string(),
        description: description.to_string(),
        x,
        z,
        width,
        depth,
        viewpoint: Viewpoint::new(
            Vec3::new(eye_x, EYE_HEIGHT, eye_z),
            Vec3::new(eye_x, EYE_HEIGHT, look_z),
        ),
    }
}

/// The four rooms of the reference building.
pub fn reference_rooms() -> Vec<RoomDefinition> {
    vec![
        reference_room(
            room_names::RECEPTION,
            "Main reception area.",
            (-5.0, 9.5),
            (6.0, 5.0),
            (-4.0, 10.0, 6.0),
        ),
        reference_room(
            room_names::CLASSROOM,
            "Lecture Hall 101.",
            (-5.0, -6.0),
            (6.0, 6.0),
            (-4.0, -5.0, -10.0),
        ),
        reference_room(
            room_names::LIBRARY,
            "Quiet study area.",
            (5.0, 9.5),
            (6.0, 5.0),
            (4.0, 10.0, 6.0),
        ),
        reference_room(
            room_names::CAFETERIA,
            "Grab a coffee or snack.",
            (5.0, -6.0),
            (6.0, 6.0),
            (4.0, -5.0, -10.0),
        ),
    ]
}

/// Build one room group: floor, four walls (the corridor-facing one with
/// a doorway), the corridor label and the registered furniture.
///
/// An unregistered room name gets the corridor floor material and no
/// furniture.
pub fn build_room(
    def: &RoomDefinition,
    ctx: &mut BuildContext,
    catalog: &RoomCatalog,
) -> SceneNode {
    let kind = catalog.lookup(&def.name);
    let (w, d) = (def.width, def.depth);
    let mut room = SceneNode::group(def.name.as_str(), NodeRole::Room).at(def.x, 0.0, def.z);

    let floor_material = ctx
        .palette
        .room_floor(kind.and_then(|k| k.floor_texture), w, d);
    room.add(
        SceneNode::mesh(
            "room_floor",
            NodeRole::Floor,
            Shape::Plane {
                width: w,
                height: d,
            },
            floor_material,
        )
        .at(0.0, ROOM_FLOOR_LIFT, 0.0)
        .rotated(-std::f32::consts::FRAC_PI_2, 0.0, 0.0)
        .with_shadows(false, true),
    );

    let corridor_z = if def.is_left_side() { d / 2.0 } else { -d / 2.0 };
    let palette = &*ctx.palette;
    let h = BUILDING_HEIGHT;
    let wt = WALL_THICKNESS;
    room.add(create_wall(palette, w, h, wt, 0.0, 0.0, corridor_z, true));
    room.add(create_wall(palette, w, h, wt, 0.0, 0.0, -corridor_z, false));
    room.add(create_wall(palette, wt, h, d, -w / 2.0, 0.0, 0.0, false));
    room.add(create_wall(palette, wt, h, d, w / 2.0, 0.0, 0.0, false));

    let label_x = CORRIDOR_WIDTH / 2.0 + LABEL_OUTSET;
    let label_x = if def.is_left_side() { -label_x } else { label_x };
    room.add(SceneNode::label(def.name.as_str()).at(label_x - def.x, h - LABEL_DROP, 0.0));

    match kind {
        Some(kind) => room.extend((kind.furnish)(def, ctx)),
        None => log::debug!("No furniture registered for room '{}'", def.name),
    }
    room
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LoadedTextures, TextureManifest};
    use crate::math::approx_eq_vec;
    use crate::palette::{MaterialClass, MaterialPalette};
    use crate::scene::{Scene, WorldPose};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build(def: &RoomDefinition, textures: &LoadedTextures) -> (SceneNode, MaterialPalette) {
        let mut palette = MaterialPalette::new(textures);
        let mut rng = StdRng::seed_from_u64(11);
        let room = {
            let mut ctx = BuildContext::new(&mut palette, &mut rng);
            build_room(def, &mut ctx, &RoomCatalog::default())
        };
        (room, palette)
    }

    #[test]
    fn reference_rooms_have_unique_names() {
        let rooms = reference_rooms();
        assert_eq!(rooms.len(), 4);
        let mut names: Vec<_> = rooms.iter().map(|r| r.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn every_room_has_shell_and_label() {
        for def in reference_rooms() {
            let (room, _) = build(&def, &LoadedTextures::none());
            assert_eq!(room.children_with_role(NodeRole::Wall).count(), 4);
            assert_eq!(room.count_role(NodeRole::Door), 1);
            assert_eq!(room.count_role(NodeRole::Floor), 1);
            assert_eq!(room.count_role(NodeRole::Label), 1);
            assert!(room.count_role(NodeRole::Furniture) > 0, "{}", def.name);
        }
    }

    #[test]
    fn doorway_faces_the_corridor() {
        for def in reference_rooms() {
            let (room, _) = build(&def, &LoadedTextures::none());
            let door_wall = room
                .children_with_role(NodeRole::Wall)
                .find(|w| w.count_role(NodeRole::Door) == 1)
                .unwrap();
            let door_z = door_wall.find("door").unwrap().position().z;
            let expected = if def.x < 0.0 {
                def.depth / 2.0
            } else {
                -def.depth / 2.0
            };
            assert_eq!(door_z, expected, "{}", def.name);
        }
    }

    #[test]
    fn label_floats_beside_the_doorway() {
        let rooms = reference_rooms();
        let (room, palette) = build(&rooms[0], &LoadedTextures::none());
        let scene = Scene {
            root: room,
            materials: palette,
            lights: Vec::new(),
            background: crate::constants::colors::BACKGROUND,
        };
        let anchors = scene.label_anchors();
        assert_eq!(anchors[0].text, "Reception");
        assert!(approx_eq_vec(
            anchors[0].position,
            Vec3::new(-2.5, 3.5, 9.5),
            1e-6
        ));
    }

    #[test]
    fn unknown_room_is_bare() {
        let mut def = reference_rooms().remove(0);
        def.name = "Storage".into();
        let textures = LoadedTextures::all_from(&TextureManifest::default());
        let (room, palette) = build(&def, &textures);
        assert_eq!(room.count_role(NodeRole::Furniture), 0);
        assert_eq!(room.count_role(NodeRole::Wall), 4);
        assert_eq!(room.count_role(NodeRole::Door), 1);
        let floor = room.find("room_floor").unwrap();
        assert_eq!(
            floor.material(),
            Some(palette.shared(MaterialClass::CorridorFloor))
        );
    }

    #[test]
    fn textured_floor_tiles_per_room() {
        let def = reference_rooms().remove(2);
        let textures = LoadedTextures::all_from(&TextureManifest::default());
        let (room, palette) = build(&def, &textures);
        let floor = room.find("room_floor").unwrap();
        let spec = palette.get(floor.material().unwrap()).unwrap();
        assert_eq!(spec.texture.as_ref().unwrap().repeat, (3.0, 2.5));
        assert_eq!(floor.position().y, ROOM_FLOOR_LIFT);
    }

    #[test]
    fn room_geometry_is_translation_only() {
        let def = reference_rooms().remove(3);
        let (room, _) = build(&def, &LoadedTextures::none());
        assert_eq!(room.transform.rotation, Vec3::ZERO);
        let mut floor_world = None;
        room.walk_world(WorldPose::ORIGIN, &mut |n, pose| {
            if n.name == "room_floor" {
                floor_world = Some(pose.position);
            }
        });
        assert!(approx_eq_vec(
            floor_world.unwrap(),
            Vec3::new(5.0, 0.01, -6.0),
            1e-6
        ));
    }
}
