//! Parametric furniture factories.
//!
//! Each factory returns a self-contained group whose local origin is the
//! requested `(x, y, z)`. The caller moves the group into its parent.
//! Solid wood parts share the palette's wood material; tinted parts
//! (people, book spines) get a fresh material each.

use rand::{Rng, RngCore};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::constants::colors;
use crate::math::Color;
use crate::palette::{MaterialClass, MaterialPalette};
use crate::scene::{NodeRole, SceneNode, Shape};

/// Shared inputs for every scene-building function: the material palette
/// and an injected random source.
pub struct BuildContext<'a> {
    pub palette: &'a mut MaterialPalette,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> BuildContext<'a> {
    pub fn new(palette: &'a mut MaterialPalette, rng: &'a mut dyn RngCore) -> Self {
        Self { palette, rng }
    }
}

// ── Person ──────────────────────────────────────────────────────────────

pub const TORSO_RADIUS: f32 = 0.3;
pub const TORSO_HEIGHT: f32 = 1.2;
pub const HEAD_RADIUS: f32 = 0.25;
/// Head center sits this far above the torso center.
pub const HEAD_OFFSET: f32 = 0.8;

/// Cylinder torso plus sphere head.
pub fn person(ctx: &mut BuildContext, x: f32, y: f32, z: f32, color: Color) -> SceneNode {
    let skin = ctx.palette.tinted("person", color);
    let torso_y = TORSO_HEIGHT / 2.0;
    SceneNode::group("person", NodeRole::Furniture)
        .at(x, y, z)
        .with_shadows(true, false)
        .with_child(
            SceneNode::mesh(
                "torso",
                NodeRole::Part,
                Shape::Cylinder {
                    radius: TORSO_RADIUS,
                    height: TORSO_HEIGHT,
                    segments: 16,
                },
                skin,
            )
            .at(0.0, torso_y, 0.0),
        )
        .with_child(
            SceneNode::mesh(
                "head",
                NodeRole::Part,
                Shape::Sphere {
                    radius: HEAD_RADIUS,
                    segments: 16,
                },
                skin,
            )
            .at(0.0, torso_y + HEAD_OFFSET, 0.0),
        )
}

// ── Desk with chair ─────────────────────────────────────────────────────

pub const CHAIR_SEAT: (f32, f32, f32) = (0.5, 0.1, 0.5);
pub const CHAIR_BACK: (f32, f32, f32) = (0.5, 0.4, 0.1);
pub const CHAIR_SEAT_HEIGHT: f32 = 0.45;
pub const CHAIR_BACK_HEIGHT: f32 = 0.7;
/// Gap between the desk's front edge and the seat center.
pub const CHAIR_GAP: f32 = 0.3;
pub const CHAIR_BACK_TILT: f32 = -0.1;

/// Box desk plus a chair in front of it (+Z side).
///
/// The chair offset depends only on `depth`; `width` never moves it.
pub fn desk_with_chair(
    ctx: &mut BuildContext,
    x: f32,
    y: f32,
    z: f32,
    width: f32,
    depth: f32,
    height: f32,
) -> SceneNode {
    let wood = ctx.palette.shared(MaterialClass::Wood);
    let seat_z = depth / 2.0 + CHAIR_GAP;
    SceneNode::group("desk", NodeRole::Furniture)
        .at(x, y, z)
        .with_shadows(true, false)
        .with_child(
            SceneNode::mesh(
                "desk_top",
                NodeRole::Part,
                Shape::Box {
                    width,
                    height,
                    depth,
                },
                wood,
            )
            .at(0.0, height / 2.0, 0.0),
        )
        .with_child(
            SceneNode::mesh(
                "chair_seat",
                NodeRole::Part,
                Shape::Box {
                    width: CHAIR_SEAT.0,
                    height: CHAIR_SEAT.1,
                    depth: CHAIR_SEAT.2,
                },
                wood,
            )
            .at(0.0, CHAIR_SEAT_HEIGHT, seat_z),
        )
        .with_child(
            SceneNode::mesh(
                "chair_back",
                NodeRole::Part,
                Shape::Box {
                    width: CHAIR_BACK.0,
                    height: CHAIR_BACK.1,
                    depth: CHAIR_BACK.2,
                },
                wood,
            )
            .at(0.0, CHAIR_BACK_HEIGHT, seat_z + 0.05)
            .rotated(CHAIR_BACK_TILT, 0.0, 0.0),
        )
}

// ── Bookshelf ───────────────────────────────────────────────────────────

pub const SHELF_ROWS: usize = 4;
pub const BOOK_WIDTH: f32 = 0.15;
pub const BOOK_HEIGHT: f32 = 0.2;
/// Books fill this fraction of the shelf width.
pub const SHELF_FILL: f32 = 0.9;
/// Largest absolute yaw jitter of a shelved book.
pub const BOOK_MAX_TILT: f32 = 0.05;

/// Books that fit on one row of a shelf `width` wide.
pub fn books_per_row(width: f32) -> usize {
    // The epsilon absorbs f32 rounding so a 1m shelf holds 6 books.
    ((width * SHELF_FILL) / BOOK_WIDTH + 1e-4).floor().max(0.0) as usize
}

/// Frame box plus four rows of randomly sized, colored and tilted books.
pub fn bookshelf(
    ctx: &mut BuildContext,
    x: f32,
    y: f32,
    z: f32,
    width: f32,
    height: f32,
    depth: f32,
) -> SceneNode {
    let wood = ctx.palette.shared(MaterialClass::Wood);
    let mut shelf = SceneNode::group("bookshelf", NodeRole::Furniture)
        .at(x, y, z)
        .with_shadows(true, false)
        .with_child(
            SceneNode::mesh(
                "frame",
                NodeRole::Part,
                Shape::Box {
                    width,
                    height,
                    depth,
                },
                wood,
            )
            .at(0.0, height / 2.0, 0.0),
        );

    let book_depth = depth * 0.8;
    let per_row = books_per_row(width);
    for row in 0..SHELF_ROWS {
        let row_y = -height / 2.0 + (height / SHELF_ROWS as f32) * (row as f32 + 0.5);
        for i in 0..per_row {
            let size = Shape::Box {
                width: BOOK_WIDTH * (0.8 + ctx.rng.gen::<f32>() * 0.2),
                height: BOOK_HEIGHT * (0.9 + ctx.rng.gen::<f32>() * 0.1),
                depth: book_depth * (0.8 + ctx.rng.gen::<f32>() * 0.2),
            };
            let color = colors::BOOKS[ctx.rng.gen_range(0..colors::BOOKS.len())];
            let spine = ctx.palette.tinted("book", color);
            let book_x = -width / 2.0 + width * 0.05 + BOOK_WIDTH / 2.0 + i as f32 * BOOK_WIDTH;
            let tilt = (ctx.rng.gen::<f32>() - 0.5) * 2.0 * BOOK_MAX_TILT;
            shelf.add(
                SceneNode::mesh("book", NodeRole::Part, size, spine)
                    .at(book_x, row_y, 0.0)
                    .rotated(0.0, tilt, 0.0),
            );
        }
    }
    shelf
}

// ── Round table with chairs ─────────────────────────────────────────────

pub const TABLE_TOP_HEIGHT: f32 = 0.7;
pub const DEFAULT_TABLE_RADIUS: f32 = 0.8;

/// Disc table on a single leg, with four chairs at `radius + 0.3` on each
/// axis turned to face the center.
pub fn table_with_chairs(
    ctx: &mut BuildContext,
    x: f32,
    y: f32,
    z: f32,
    radius: f32,
) -> SceneNode {
    let wood = ctx.palette.shared(MaterialClass::Wood);
    let mut table = SceneNode::group("table", NodeRole::Furniture)
        .at(x, y, z)
        .with_shadows(true, false)
        .with_child(
            SceneNode::mesh(
                "table_top",
                NodeRole::Part,
                Shape::Cylinder {
                    radius,
                    height: 0.05,
                    segments: 32,
                },
                wood,
            )
            .at(0.0, TABLE_TOP_HEIGHT, 0.0),
        )
        .with_child(
            SceneNode::mesh(
                "table_leg",
                NodeRole::Part,
                Shape::Cylinder {
                    radius: 0.05,
                    height: TABLE_TOP_HEIGHT,
                    segments: 16,
                },
                wood,
            )
            .at(0.0, TABLE_TOP_HEIGHT / 2.0, 0.0),
        );

    let reach = radius + CHAIR_GAP;
    for (cx, cz) in [(reach, 0.0), (-reach, 0.0), (0.0, reach), (0.0, -reach)] {
        let yaw = chair_yaw(cx, cz);
        let chair = desk_with_chair(ctx, cx, 0.0, cz, 0.5, 0.5, 0.8).rotated(0.0, yaw, 0.0);
        table.add(chair);
    }
    table
}

/// Yaw that turns a chair placed at `(x, z)` around the table toward it.
fn chair_yaw(x: f32, z: f32) -> f32 {
    if x != 0.0 {
        -x.signum() * FRAC_PI_2
    } else if z < 0.0 {
        PI
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LoadedTextures;
    use crate::scene::NodeKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn with_ctx<T>(f: impl FnOnce(&mut BuildContext) -> T) -> (T, MaterialPalette) {
        let mut palette = MaterialPalette::new(&LoadedTextures::none());
        let mut rng = StdRng::seed_from_u64(7);
        let out = {
            let mut ctx = BuildContext::new(&mut palette, &mut rng);
            f(&mut ctx)
        };
        (out, palette)
    }

    #[test]
    fn person_proportions() {
        let (p, palette) = with_ctx(|ctx| person(ctx, 1.0, 0.0, -2.0, colors::PERSON));
        assert_eq!(p.position().x, 1.0);
        let torso = p.find("torso").unwrap();
        let head = p.find("head").unwrap();
        assert_eq!(
            torso.shape(),
            Some(Shape::Cylinder {
                radius: 0.3,
                height: 1.2,
                segments: 16
            })
        );
        assert_eq!(torso.position().y, 0.6);
        assert!((head.position().y - 1.4).abs() < 1e-6);
        let skin = palette.get(head.material().unwrap()).unwrap();
        assert_eq!(skin.color, colors::PERSON);
        assert_eq!(torso.material(), head.material());
    }

    #[test]
    fn chair_offset_ignores_desk_width() {
        let (narrow, _) = with_ctx(|ctx| desk_with_chair(ctx, 0.0, 0.0, 0.0, 0.5, 0.6, 0.8));
        let (wide, _) = with_ctx(|ctx| desk_with_chair(ctx, 0.0, 0.0, 0.0, 3.0, 0.6, 0.8));
        for desk in [&narrow, &wide] {
            let seat = desk.find("chair_seat").unwrap();
            let back = desk.find("chair_back").unwrap();
            assert!((seat.position().z - 0.6).abs() < 1e-6);
            assert_eq!(seat.position().y, 0.45);
            assert!((back.position().z - 0.65).abs() < 1e-6);
            assert_eq!(back.transform.rotation.x, -0.1);
        }
        assert_eq!(
            narrow.find("chair_seat").unwrap().position(),
            wide.find("chair_seat").unwrap().position()
        );
    }

    #[test]
    fn desk_parts_share_wood() {
        let (desk, palette) = with_ctx(|ctx| desk_with_chair(ctx, 0.0, 0.0, 0.0, 2.0, 1.0, 0.8));
        let wood = palette.shared(MaterialClass::Wood);
        assert_eq!(desk.count(|n| n.material() == Some(wood)), 3);
        assert_eq!(palette.len(), MaterialClass::ALL.len());
    }

    #[test]
    fn books_per_row_matches_width() {
        assert_eq!(books_per_row(1.0), 6);
        assert_eq!(books_per_row(2.0), 12);
        assert_eq!(books_per_row(0.1), 0);
    }

    #[test]
    fn bookshelf_distribution() {
        let (shelf, palette) = with_ctx(|ctx| bookshelf(ctx, 0.0, 1.0, 0.0, 1.0, 2.0, 0.3));
        let books: Vec<_> = shelf.children.iter().filter(|n| n.name == "book").collect();
        assert_eq!(books.len(), SHELF_ROWS * 6);
        for book in &books {
            let tilt = book.transform.rotation.y;
            assert!(tilt.abs() <= BOOK_MAX_TILT + 1e-6);
            let color = palette.get(book.material().unwrap()).unwrap().color;
            assert!(colors::BOOKS.contains(&color));
            match book.kind {
                NodeKind::Mesh {
                    shape:
                        Shape::Box {
                            width,
                            height,
                            depth,
                        },
                    ..
                } => {
                    assert!((0.12 - 1e-6..=0.15 + 1e-6).contains(&width));
                    assert!((0.18 - 1e-6..=0.2 + 1e-6).contains(&height));
                    assert!((0.192 - 1e-6..=0.24 + 1e-6).contains(&depth));
                }
                _ => panic!("book should be a box"),
            }
        }
        // One fresh material per book
        assert_eq!(palette.len(), MaterialClass::ALL.len() + books.len());
    }

    #[test]
    fn bookshelf_rows_are_evenly_spaced() {
        let (shelf, _) = with_ctx(|ctx| bookshelf(ctx, 0.0, 0.0, 0.0, 1.0, 2.0, 0.3));
        let mut rows: Vec<f32> = shelf
            .children
            .iter()
            .filter(|n| n.name == "book")
            .map(|n| n.position().y)
            .collect();
        rows.dedup();
        assert_eq!(rows, vec![-0.75, -0.25, 0.25, 0.75]);
    }

    #[test]
    fn table_chairs_face_center() {
        let (table, _) =
            with_ctx(|ctx| table_with_chairs(ctx, 2.0, 0.0, -2.0, DEFAULT_TABLE_RADIUS));
        let chairs: Vec<_> = table.children.iter().filter(|n| n.name == "desk").collect();
        assert_eq!(chairs.len(), 4);
        let expected = [
            (1.1, 0.0, -FRAC_PI_2),
            (-1.1, 0.0, FRAC_PI_2),
            (0.0, 1.1, 0.0),
            (0.0, -1.1, PI),
        ];
        for (chair, (x, z, yaw)) in chairs.iter().zip(expected) {
            assert!((chair.position().x - x).abs() < 1e-6);
            assert!((chair.position().z - z).abs() < 1e-6);
            assert!((chair.transform.rotation.y - yaw).abs() < 1e-6);
        }
        let top = table.find("table_top").unwrap();
        assert_eq!(top.position().y, 0.7);
    }
}
