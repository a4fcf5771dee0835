//! UI for the CampusTour viewer.
//!
//! Navigation buttons (bottom), the room info panel (top-left), projected
//! room labels and a loading line shown until textures settle.

use bevy::prelude::*;

use crate::state::{
    InfoDescription, InfoOverlayPanel, InfoRoomName, LoadingText, NavButton, NavTarget,
    RoomLabelText, TourViewer,
};

const BUTTON_IDLE: Color = Color::srgba(0.1, 0.1, 0.1, 0.8);
const BUTTON_HOVER: Color = Color::srgba(0.25, 0.25, 0.25, 0.9);
const BUTTON_PRESSED: Color = Color::srgba(0.1, 0.3, 0.6, 0.9);
const LABEL_FONT_SIZE: f32 = 16.0;

pub fn setup_ui(mut commands: Commands, viewer: Res<TourViewer>) {
    // Loading line (top-center)
    commands.spawn((
        Text::new("Loading textures..."),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.2, 0.2, 0.2)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(40.0),
            top: Val::Px(20.0),
            ..default()
        },
        LoadingText,
    ));

    // Room info panel (top-left), hidden until a room is reached
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(20.0),
                top: Val::Px(20.0),
                max_width: Val::Px(320.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            Visibility::Hidden,
            InfoOverlayPanel,
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(""),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                InfoRoomName,
            ));
            panel.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.85)),
                InfoDescription,
            ));
        });

    // Navigation bar (bottom-center)
    let mut targets = vec![("Corridor".to_string(), NavTarget::Corridor)];
    targets.extend(
        viewer
            .0
            .config()
            .rooms
            .iter()
            .map(|r| (r.name.clone(), NavTarget::Room(r.name.clone()))),
    );
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(20.0),
            left: Val::Px(0.0),
            right: Val::Px(0.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|bar| {
            for (text, target) in targets {
                bar.spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(BUTTON_IDLE),
                    NavButton(target),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(text),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
            }
        });
}

pub fn nav_buttons(
    mut buttons: Query<(&Interaction, &NavButton, &mut BackgroundColor), Changed<Interaction>>,
    mut viewer: ResMut<TourViewer>,
) {
    for (interaction, button, mut bg) in &mut buttons {
        match interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(BUTTON_PRESSED);
                match &button.0 {
                    NavTarget::Corridor => viewer.0.go_to_corridor(),
                    NavTarget::Room(name) => {
                        viewer.0.go_to_room(name);
                    }
                }
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER),
            Interaction::None => *bg = BackgroundColor(BUTTON_IDLE),
        }
    }
}

pub fn update_loading_text(
    viewer: Res<TourViewer>,
    mut loading_q: Query<(&mut Text, &mut Visibility), With<LoadingText>>,
) {
    let Ok((mut text, mut visibility)) = loading_q.get_single_mut() else {
        return;
    };
    if viewer.0.is_initialized() {
        *visibility = Visibility::Hidden;
        return;
    }
    let barrier = viewer.0.barrier();
    **text = format!(
        "Loading textures... {}/{}",
        barrier.settled(),
        barrier.expected()
    );
}

pub fn update_info_overlay(
    viewer: Res<TourViewer>,
    mut panel_q: Query<&mut Visibility, With<InfoOverlayPanel>>,
    mut name_q: Query<&mut Text, (With<InfoRoomName>, Without<InfoDescription>)>,
    mut desc_q: Query<&mut Text, (With<InfoDescription>, Without<InfoRoomName>)>,
) {
    let Some(ctx) = viewer.0.context() else {
        return;
    };
    let overlay = &ctx.overlay;
    if let Ok(mut visibility) = panel_q.get_single_mut() {
        *visibility = if overlay.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    if !overlay.visible {
        return;
    }
    if let Ok(mut text) = name_q.get_single_mut() {
        if **text != overlay.room_name {
            **text = overlay.room_name.clone();
        }
    }
    if let Ok(mut text) = desc_q.get_single_mut() {
        if **text != overlay.description {
            **text = overlay.description.clone();
        }
    }
}

/// Spawn one text node per scene label once the scene exists, after
/// syncing the viewer to the real window size.
pub fn spawn_room_labels(
    mut commands: Commands,
    mut viewer: ResMut<TourViewer>,
    windows: Query<&Window>,
    mut spawned: Local<bool>,
) {
    if *spawned {
        return;
    }
    if let Ok(window) = windows.get_single() {
        viewer.0.resize(window.width() as u32, window.height() as u32);
    }
    let Some(scene) = viewer.0.scene() else {
        return;
    };
    for (i, anchor) in scene.label_anchors().into_iter().enumerate() {
        commands.spawn((
            Text::new(anchor.text),
            TextFont {
                font_size: LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Visibility::Hidden,
            RoomLabelText(i),
        ));
    }
    *spawned = true;
}

pub fn update_room_labels(
    viewer: Res<TourViewer>,
    mut label_q: Query<(&RoomLabelText, &mut Node, &mut Visibility)>,
) {
    let Some(ctx) = viewer.0.context() else {
        return;
    };
    let labels = ctx.labels.labels();
    for (index, mut node, mut visibility) in &mut label_q {
        let Some(label) = labels.get(index.0) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        if !label.visible {
            *visibility = Visibility::Hidden;
            continue;
        }
        // Roughly center the text on its anchor
        let half_width = label.text.chars().count() as f32 * LABEL_FONT_SIZE * 0.3;
        node.left = Val::Px(label.x - half_width);
        node.top = Val::Px(label.y - LABEL_FONT_SIZE * 0.5);
        *visibility = Visibility::Inherited;
    }
}
