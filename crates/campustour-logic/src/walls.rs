//! Wall construction with optional doorway cut-out.
//!
//! A doorway wall is split into two side fillers and a lintel above the
//! opening, each built as a plain wall segment, plus one glass panel that
//! fills the opening. Door size is global ([`DOOR_WIDTH`] x [`DOOR_HEIGHT`]).
//!
//! Callers must keep `width > DOOR_WIDTH` for doorway walls; narrower
//! spans produce negative filler widths. [`crate::config::validate_config`]
//! checks this for configured rooms.

use crate::constants::layout::{DOOR_HEIGHT, DOOR_WIDTH};
use crate::palette::{MaterialClass, MaterialPalette};
use crate::scene::{NodeRole, SceneNode, Shape};

/// A solid wall box resting on `y`, centered on `x`/`z`.
fn solid_segment(
    palette: &MaterialPalette,
    width: f32,
    height: f32,
    depth: f32,
    x: f32,
    y: f32,
    z: f32,
) -> SceneNode {
    SceneNode::mesh(
        "wall_segment",
        NodeRole::WallSegment,
        Shape::Box {
            width,
            height,
            depth,
        },
        palette.shared(MaterialClass::Wall),
    )
    .at(x, y + height / 2.0, z)
    .with_shadows(true, true)
}

/// Segments and door panel for one wall span, in the parent's frame.
#[allow(clippy::too_many_arguments)]
pub fn wall_segments(
    palette: &MaterialPalette,
    width: f32,
    height: f32,
    depth: f32,
    x: f32,
    y: f32,
    z: f32,
    has_doorway: bool,
) -> Vec<SceneNode> {
    if !has_doorway {
        return vec![solid_segment(palette, width, height, depth, x, y, z)];
    }

    let filler = (width - DOOR_WIDTH) / 2.0;
    let offset = DOOR_WIDTH / 2.0 + filler / 2.0;
    let mut parts = Vec::with_capacity(4);
    parts.extend(wall_segments(
        palette,
        filler,
        height,
        depth,
        x - offset,
        y,
        z,
        false,
    ));
    parts.extend(wall_segments(
        palette,
        filler,
        height,
        depth,
        x + offset,
        y,
        z,
        false,
    ));
    parts.extend(wall_segments(
        palette,
        DOOR_WIDTH,
        height - DOOR_HEIGHT,
        depth,
        x,
        y + DOOR_HEIGHT,
        z,
        false,
    ));
    parts.push(
        SceneNode::mesh(
            "door",
            NodeRole::Door,
            Shape::Plane {
                width: DOOR_WIDTH,
                height: DOOR_HEIGHT,
            },
            palette.shared(MaterialClass::Glass),
        )
        .at(x, y + DOOR_HEIGHT / 2.0, z),
    );
    parts
}

/// One logical wall as a group of its segments.
#[allow(clippy::too_many_arguments)]
pub fn create_wall(
    palette: &MaterialPalette,
    width: f32,
    height: f32,
    depth: f32,
    x: f32,
    y: f32,
    z: f32,
    has_doorway: bool,
) -> SceneNode {
    let mut wall = SceneNode::group("wall", NodeRole::Wall);
    wall.extend(wall_segments(
        palette,
        width,
        height,
        depth,
        x,
        y,
        z,
        has_doorway,
    ));
    wall
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LoadedTextures;

    fn front_area(node: &SceneNode) -> f32 {
        match node.shape() {
            Some(Shape::Box { width, height, .. }) | Some(Shape::Plane { width, height }) => {
                width * height
            }
            _ => 0.0,
        }
    }

    #[test]
    fn solid_wall_is_one_box() {
        let palette = MaterialPalette::new(&LoadedTextures::none());
        let wall = create_wall(&palette, 6.0, 4.0, 0.2, 1.0, 0.0, -3.0, false);
        assert_eq!(wall.children.len(), 1);
        let seg = &wall.children[0];
        assert_eq!(seg.role, NodeRole::WallSegment);
        assert_eq!(seg.position().y, 2.0);
        assert!(seg.cast_shadow && seg.receive_shadow);
        assert_eq!(seg.material(), Some(palette.shared(MaterialClass::Wall)));
    }

    #[test]
    fn doorway_wall_has_four_parts() {
        let palette = MaterialPalette::new(&LoadedTextures::none());
        let wall = create_wall(&palette, 6.0, 4.0, 0.2, 0.0, 0.0, 2.5, true);
        assert_eq!(wall.children.len(), 4);
        assert_eq!(wall.count_role(NodeRole::WallSegment), 3);
        assert_eq!(wall.count_role(NodeRole::Door), 1);

        let solid: f32 = wall
            .children_with_role(NodeRole::WallSegment)
            .map(front_area)
            .sum();
        let opening = DOOR_WIDTH * DOOR_HEIGHT;
        assert!((solid - (6.0 * 4.0 - opening)).abs() < 1e-4);

        let door = wall.find("door").unwrap();
        assert!((front_area(door) - opening).abs() < 1e-6);
        assert_eq!(door.position().y, 1.25);
        assert_eq!(door.material(), Some(palette.shared(MaterialClass::Glass)));
    }

    #[test]
    fn fillers_flank_the_opening() {
        let palette = MaterialPalette::new(&LoadedTextures::none());
        let parts = wall_segments(&palette, 6.0, 4.0, 0.2, 10.0, 0.0, 0.0, true);
        // Fillers are 2.25 wide, centered 1.875 either side
        assert!((parts[0].position().x - 8.125).abs() < 1e-5);
        assert!((parts[1].position().x - 11.875).abs() < 1e-5);
        let lintel = &parts[2];
        assert_eq!(
            lintel.shape(),
            Some(Shape::Box {
                width: 1.5,
                height: 1.5,
                depth: 0.2
            })
        );
        assert_eq!(lintel.position().y, 3.25);
    }
}
