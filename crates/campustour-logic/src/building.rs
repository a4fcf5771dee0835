//! Building layout: the corridor shell plus every room.
//!
//! ```
//! use campustour_logic::assets::LoadedTextures;
//! use campustour_logic::building::build_scene;
//! use campustour_logic::config::TourConfig;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let config = TourConfig::default();
//! let mut rng = StdRng::seed_from_u64(42);
//! let scene = build_scene(&config, &LoadedTextures::none(), &mut rng);
//! assert_eq!(scene.summary().rooms, 4);
//! ```

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rustc_hash::FxHasher;
use std::f32::consts::FRAC_PI_2;
use std::hash::{Hash, Hasher};

use crate::assets::LoadedTextures;
use crate::catalog::RoomCatalog;
use crate::config::TourConfig;
use crate::constants::layout::{BUILDING_HEIGHT, CORRIDOR_LENGTH, CORRIDOR_WIDTH, WALL_THICKNESS};
use crate::furniture::BuildContext;
use crate::lighting::install_lighting;
use crate::palette::{MaterialClass, MaterialPalette};
use crate::rooms::{build_room, RoomDefinition};
use crate::scene::{NodeRole, Scene, SceneNode, Shape};
use crate::walls::create_wall;

/// Width of the floor and ceiling slabs: the corridor plus the widest
/// room on each side plus a wall on each side.
pub fn total_width(rooms: &[RoomDefinition]) -> f32 {
    let widest = rooms.iter().map(|r| r.width).fold(0.0_f32, f32::max);
    CORRIDOR_WIDTH + 2.0 * widest + 2.0 * WALL_THICKNESS
}

/// Seed for one room's random stream: the building seed mixed with the
/// room name, so a room's furniture does not depend on its position in
/// the room list.
pub fn room_seed(base: u64, name: &str) -> u64 {
    let mut hasher = FxHasher::default();
    base.hash(&mut hasher);
    name.hash(&mut hasher);
    hasher.finish()
}

/// Corridor shell and every room under one building group.
///
/// Room order only changes child order, never geometry. One value is
/// drawn from `ctx.rng` as the building seed; each room then builds
/// from its own stream (see [`room_seed`]).
pub fn build_building(
    rooms: &[RoomDefinition],
    ctx: &mut BuildContext,
    catalog: &RoomCatalog,
) -> SceneNode {
    let width = total_width(rooms);
    let mut building = SceneNode::group("building", NodeRole::Building);

    building.add(
        SceneNode::mesh(
            "floor",
            NodeRole::Floor,
            Shape::Plane {
                width,
                height: CORRIDOR_LENGTH,
            },
            ctx.palette.shared(MaterialClass::CorridorFloor),
        )
        .rotated(-FRAC_PI_2, 0.0, 0.0)
        .with_shadows(false, true),
    );
    building.add(
        SceneNode::mesh(
            "ceiling",
            NodeRole::Ceiling,
            Shape::Plane {
                width,
                height: CORRIDOR_LENGTH,
            },
            ctx.palette.shared(MaterialClass::Ceiling),
        )
        .at(0.0, BUILDING_HEIGHT, 0.0)
        .rotated(FRAC_PI_2, 0.0, 0.0),
    );

    let palette = &*ctx.palette;
    let (h, wt) = (BUILDING_HEIGHT, WALL_THICKNESS);
    let half_w = CORRIDOR_WIDTH / 2.0;
    let half_l = CORRIDOR_LENGTH / 2.0;
    for x in [-half_w, half_w] {
        building.add(create_wall(palette, wt, h, CORRIDOR_LENGTH, x, 0.0, 0.0, false));
    }
    for z in [-half_l, half_l] {
        building.add(create_wall(palette, CORRIDOR_WIDTH, h, wt, 0.0, 0.0, z, false));
    }

    let base = ctx.rng.next_u64();
    for def in rooms {
        let mut rng = StdRng::seed_from_u64(room_seed(base, &def.name));
        let mut room_ctx = BuildContext::new(&mut *ctx.palette, &mut rng);
        building.add(build_room(def, &mut room_ctx, catalog));
    }
    building
}

/// Build the full static scene: geometry, materials and lights.
pub fn build_scene(
    config: &TourConfig,
    textures: &LoadedTextures,
    rng: &mut dyn RngCore,
) -> Scene {
    let catalog = RoomCatalog::default();
    let mut palette = MaterialPalette::new(textures);
    let root = {
        let mut ctx = BuildContext::new(&mut palette, rng);
        build_building(&config.rooms, &mut ctx, &catalog)
    };
    let scene = Scene {
        root,
        materials: palette,
        lights: install_lighting(&config.rooms, &catalog),
        background: config.background,
    };
    let summary = scene.summary();
    log::info!(
        "Built scene: {} rooms, {} nodes, {} meshes, {} materials, {} lights",
        summary.rooms,
        summary.nodes,
        summary.meshes,
        summary.materials,
        summary.lights
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::reference_rooms;
    use crate::scene::{NodeKind, NodeTransform};

    fn building(rooms: &[RoomDefinition]) -> SceneNode {
        let mut palette = MaterialPalette::new(&LoadedTextures::none());
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = BuildContext::new(&mut palette, &mut rng);
        build_building(rooms, &mut ctx, &RoomCatalog::default())
    }

    #[test]
    fn shell_width_fits_widest_room() {
        assert!((total_width(&reference_rooms()) - 16.4).abs() < 1e-5);
        assert!((total_width(&[]) - 4.4).abs() < 1e-6);
    }

    #[test]
    fn corridor_shell_without_rooms() {
        let b = building(&[]);
        assert_eq!(b.count_role(NodeRole::Wall), 4);
        assert_eq!(b.count_role(NodeRole::Door), 0);
        assert_eq!(b.count_role(NodeRole::Floor), 1);
        assert_eq!(b.count_role(NodeRole::Ceiling), 1);
        let ceiling = b.find("ceiling").unwrap();
        assert_eq!(ceiling.position().y, BUILDING_HEIGHT);
    }

    #[test]
    fn reference_building_counts() {
        let b = building(&reference_rooms());
        assert_eq!(b.count_role(NodeRole::Room), 4);
        assert_eq!(b.count_role(NodeRole::Wall), 4 + 4 * 4);
        assert_eq!(b.count_role(NodeRole::Door), 4);
        assert_eq!(b.count_role(NodeRole::Label), 4);
        assert_eq!(b.count_role(NodeRole::Floor), 5);
    }

    /// Shape and transform of every mesh under `node`, depth first.
    fn mesh_layout(node: &SceneNode, out: &mut Vec<(Shape, NodeTransform)>) {
        if let NodeKind::Mesh { shape, .. } = &node.kind {
            out.push((*shape, node.transform));
        }
        for child in &node.children {
            mesh_layout(child, out);
        }
    }

    #[test]
    fn room_order_does_not_change_geometry() {
        let rooms = reference_rooms();
        let mut reversed = rooms.clone();
        reversed.reverse();
        let a = building(&rooms);
        let b = building(&reversed);
        for def in &rooms {
            let ra = a.find(&def.name).unwrap();
            let rb = b.find(&def.name).unwrap();
            assert_eq!(ra.transform, rb.transform);
            assert_eq!(ra.children.len(), rb.children.len());
            let (mut la, mut lb) = (Vec::new(), Vec::new());
            mesh_layout(ra, &mut la);
            mesh_layout(rb, &mut lb);
            // Includes every book's jittered size and tilt
            assert_eq!(la, lb, "{} changed with room order", def.name);
        }
        assert_eq!(a.mesh_count(), b.mesh_count());
    }

    #[test]
    fn dropping_a_room_keeps_the_others() {
        let rooms = reference_rooms();
        let a = building(&rooms);
        let b = building(&rooms[2..]);
        let library = &rooms[2].name;
        let (mut la, mut lb) = (Vec::new(), Vec::new());
        mesh_layout(a.find(library).unwrap(), &mut la);
        mesh_layout(b.find(library).unwrap(), &mut lb);
        assert_eq!(la, lb);
    }

    #[test]
    fn room_seed_depends_on_name_and_base() {
        assert_eq!(room_seed(5, "Library"), room_seed(5, "Library"));
        assert_ne!(room_seed(5, "Library"), room_seed(5, "Cafeteria"));
        assert_ne!(room_seed(5, "Library"), room_seed(6, "Library"));
    }

    #[test]
    fn build_scene_installs_lights_and_background() {
        let config = TourConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let scene = build_scene(&config, &LoadedTextures::none(), &mut rng);
        let summary = scene.summary();
        assert_eq!(summary.rooms, 4);
        assert_eq!(summary.lights, 10);
        assert_eq!(summary.doors, 4);
        assert_eq!(scene.background, config.background);
    }
}
