//! Furniture arrangements for the reference room types.
//!
//! Coordinates are room-local: the room center is the origin, `-z` is
//! the back of the room (away from a right-side corridor).

use rand::Rng;
use std::f32::consts::PI;

use crate::constants::colors;
use crate::furniture::{
    bookshelf, desk_with_chair, person, table_with_chairs, BuildContext, DEFAULT_TABLE_RADIUS,
    TABLE_TOP_HEIGHT,
};
use crate::math::Color;
use crate::palette::MaterialClass;
use crate::rooms::RoomDefinition;
use crate::scene::{NodeRole, SceneNode, Shape};

fn prop(
    ctx: &mut BuildContext,
    name: &str,
    shape: Shape,
    color: Color,
    (x, y, z): (f32, f32, f32),
) -> SceneNode {
    let material = ctx.palette.tinted(name, color);
    SceneNode::mesh(name, NodeRole::Part, shape, material).at(x, y, z)
}

/// Front desk with a receptionist and a monitor.
pub fn reception(def: &RoomDefinition, ctx: &mut BuildContext) -> Vec<SceneNode> {
    let desk_z = -def.depth / 2.0 + 1.0;
    let desk_height = 0.8;
    vec![
        desk_with_chair(ctx, 0.0, 0.0, desk_z, 2.0, 1.0, desk_height),
        person(ctx, 0.0, 0.0, desk_z, colors::PERSON),
        prop(
            ctx,
            "computer",
            Shape::Box {
                width: 0.3,
                height: 0.2,
                depth: 0.02,
            },
            colors::COMPUTER,
            (0.0, desk_height / 2.0 + 0.1, desk_z + 0.1),
        ),
    ]
}

pub const CLASSROOM_ROWS: usize = 3;
pub const CLASSROOM_COLS: usize = 3;
pub const DESK_SPACING: f32 = 1.5;

/// Lecturer's desk and whiteboard at the back, a grid of student desks.
pub fn classroom(def: &RoomDefinition, ctx: &mut BuildContext) -> Vec<SceneNode> {
    let back = -def.depth / 2.0;
    let mut items = vec![
        desk_with_chair(ctx, 0.0, 0.0, back + 1.0, 1.5, 0.8, 0.8),
        person(ctx, 0.0, 0.0, back + 1.0, colors::PERSON),
        SceneNode::mesh(
            "whiteboard",
            NodeRole::Part,
            Shape::Plane {
                width: def.width * 0.7,
                height: 1.5,
            },
            ctx.palette.shared(MaterialClass::Whiteboard),
        )
        .at(0.0, 1.8, back + 0.1),
    ];
    let center_col = (CLASSROOM_COLS - 1) as f32 / 2.0;
    for row in 0..CLASSROOM_ROWS {
        for col in 0..CLASSROOM_COLS {
            items.push(desk_with_chair(
                ctx,
                (col as f32 - center_col) * DESK_SPACING,
                0.0,
                back + 3.0 + row as f32 * DESK_SPACING,
                1.0,
                0.6,
                0.8,
            ));
        }
    }
    items
}

pub const LIBRARY_SHELVES: usize = 3;
pub const TABLE_BOOKS: usize = 5;

/// Shelves along the back wall, a reading table, books scattered on it.
pub fn library(def: &RoomDefinition, ctx: &mut BuildContext) -> Vec<SceneNode> {
    let mut items = Vec::new();
    for i in 0..LIBRARY_SHELVES {
        items.push(bookshelf(
            ctx,
            -def.width / 2.0 + 1.0 + i as f32 * 2.0,
            1.0,
            -def.depth / 2.0 + 1.0,
            1.0,
            2.0,
            0.3,
        ));
    }
    items.push(table_with_chairs(ctx, 0.0, 0.0, 0.0, DEFAULT_TABLE_RADIUS));

    let book_height = 0.05;
    for color in colors::BOOKS.iter().take(TABLE_BOOKS) {
        let x = (ctx.rng.gen::<f32>() - 0.5) * 1.5;
        let z = (ctx.rng.gen::<f32>() - 0.5) * 0.8;
        let yaw = ctx.rng.gen::<f32>() * PI;
        let book = prop(
            ctx,
            "table_book",
            Shape::Box {
                width: 0.2,
                height: book_height,
                depth: 0.15,
            },
            *color,
            (x, TABLE_TOP_HEIGHT + book_height / 2.0, z),
        );
        items.push(book.rotated(0.0, yaw, 0.0));
    }
    items
}

/// Serving counter with food props, four tables with chairs.
pub fn cafeteria(def: &RoomDefinition, ctx: &mut BuildContext) -> Vec<SceneNode> {
    let counter_z = -def.depth / 2.0 + 1.0;
    let counter_height = 1.0;
    let counter_top = counter_height / 2.0 + counter_height / 2.0;
    let mut items = vec![SceneNode::mesh(
        "counter",
        NodeRole::Furniture,
        Shape::Box {
            width: 3.0,
            height: counter_height,
            depth: 0.8,
        },
        ctx.palette.shared(MaterialClass::Wood),
    )
    .at(0.0, counter_height / 2.0, counter_z)
    .with_shadows(true, false)];

    let food_z = counter_z + 0.1;
    let cup = Shape::Cylinder {
        radius: 0.1,
        height: 0.2,
        segments: 16,
    };
    items.push(prop(
        ctx,
        "coffee",
        cup,
        Color(0x8b4513),
        (-1.0, counter_top + 0.1, food_z),
    ));
    items.push(prop(
        ctx,
        "sandwich",
        Shape::Box {
            width: 0.2,
            height: 0.1,
            depth: 0.2,
        },
        Color::GOLD,
        (0.0, counter_top + 0.05, food_z),
    ));
    items.push(prop(
        ctx,
        "cup",
        cup,
        Color::WHITE,
        (1.0, counter_top + 0.1, food_z),
    ));

    for (x, z) in [(-2.0, 2.0), (2.0, 2.0), (-2.0, -2.0), (2.0, -2.0)] {
        items.push(table_with_chairs(ctx, x, 0.0, z, DEFAULT_TABLE_RADIUS));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LoadedTextures;
    use crate::palette::MaterialPalette;
    use crate::rooms::reference_rooms;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn furnish(
        index: usize,
        f: fn(&RoomDefinition, &mut BuildContext) -> Vec<SceneNode>,
        seed: u64,
    ) -> (Vec<SceneNode>, MaterialPalette) {
        let def = reference_rooms().remove(index);
        let mut palette = MaterialPalette::new(&LoadedTextures::none());
        let mut rng = StdRng::seed_from_u64(seed);
        let items = {
            let mut ctx = BuildContext::new(&mut palette, &mut rng);
            f(&def, &mut ctx)
        };
        (items, palette)
    }

    #[test]
    fn reception_has_desk_person_computer() {
        let (items, palette) = furnish(0, reception, 1);
        let names: Vec<_> = items.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["desk", "person", "computer"]);
        let computer = &items[2];
        assert!((computer.position().y - 0.5).abs() < 1e-6);
        assert!((computer.position().z - (-1.4)).abs() < 1e-6);
        let spec = palette.get(computer.material().unwrap()).unwrap();
        assert_eq!(spec.color, colors::COMPUTER);
    }

    #[test]
    fn classroom_grid_is_three_by_three() {
        let (items, _) = furnish(1, classroom, 1);
        let desks: Vec<_> = items.iter().filter(|n| n.name == "desk").collect();
        // Lecturer's desk + 9 student desks
        assert_eq!(desks.len(), 10);
        let mut xs: Vec<f32> = desks[1..].iter().map(|d| d.position().x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup();
        assert_eq!(xs, vec![-1.5, 0.0, 1.5]);
        let mut zs: Vec<f32> = desks[1..].iter().map(|d| d.position().z).collect();
        zs.sort_by(|a, b| a.total_cmp(b));
        zs.dedup();
        assert_eq!(zs, vec![0.0, 1.5, 3.0]);

        let board = items.iter().find(|n| n.name == "whiteboard").unwrap();
        assert!(matches!(
            board.shape(),
            Some(Shape::Plane { width, height }) if (width - 4.2).abs() < 1e-5 && height == 1.5
        ));
    }

    #[test]
    fn library_table_books_use_palette_in_order() {
        for seed in 0..8 {
            let (items, palette) = furnish(2, library, seed);
            let books: Vec<_> = items.iter().filter(|n| n.name == "table_book").collect();
            assert_eq!(books.len(), TABLE_BOOKS);
            for (book, color) in books.iter().zip(colors::BOOKS) {
                assert_eq!(palette.get(book.material().unwrap()).unwrap().color, color);
                let p = book.position();
                assert!(p.x.abs() <= 0.75 && p.z.abs() <= 0.4);
                assert!((p.y - 0.725).abs() < 1e-6);
                let yaw = book.transform.rotation.y;
                assert!((0.0..=PI).contains(&yaw));
            }
            let shelves = items.iter().filter(|n| n.name == "bookshelf").count();
            assert_eq!(shelves, LIBRARY_SHELVES);
        }
    }

    #[test]
    fn cafeteria_layout() {
        let (items, palette) = furnish(3, cafeteria, 1);
        let tables: Vec<_> = items.iter().filter(|n| n.name == "table").collect();
        assert_eq!(tables.len(), 4);
        for t in &tables {
            assert_eq!(t.position().x.abs(), 2.0);
            assert_eq!(t.position().z.abs(), 2.0);
        }
        let counter = items.iter().find(|n| n.name == "counter").unwrap();
        assert_eq!(counter.position().y, 0.5);
        assert_eq!(counter.position().z, -2.0);
        assert_eq!(
            counter.material(),
            Some(palette.shared(MaterialClass::Wood))
        );
        let coffee = items.iter().find(|n| n.name == "coffee").unwrap();
        assert!((coffee.position().y - 1.1).abs() < 1e-6);
        let sandwich = items.iter().find(|n| n.name == "sandwich").unwrap();
        assert!((sandwich.position().y - 1.05).abs() < 1e-6);
    }
}
