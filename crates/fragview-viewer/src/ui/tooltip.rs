//! Hover tooltip - a small floating label following the cursor

use super::styles::{UiColors, UiSizes};
use crate::hover::TooltipState;
use bevy::prelude::*;
use bevy::ui::{Node, PositionType, UiRect, Val};

pub struct TooltipPlugin;

impl Plugin for TooltipPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_tooltip)
            .add_systems(Update, update_tooltip);
    }
}

/// Marker for the tooltip node
#[derive(Component)]
pub struct TooltipNode;

/// Offset from the cursor so the tooltip doesn't sit under it
const TOOLTIP_OFFSET: Vec2 = Vec2::new(14.0, 18.0);

fn setup_tooltip(mut commands: Commands) {
    commands
        .spawn((
            TooltipNode,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                padding: UiRect::axes(Val::Px(UiSizes::PADDING), Val::Px(UiSizes::PADDING_SM)),
                ..default()
            },
            BackgroundColor(UiColors::TOOLTIP_BG),
            Visibility::Hidden,
        ))
        .with_children(|tooltip| {
            tooltip.spawn((
                Text::new(""),
                TextFont {
                    font_size: UiSizes::FONT_SIZE_SM,
                    ..default()
                },
                TextColor(UiColors::TEXT_PRIMARY),
            ));
        });
}

fn update_tooltip(
    state: Res<TooltipState>,
    mut tooltip: Query<(&mut Node, &mut Visibility, &Children), With<TooltipNode>>,
    mut texts: Query<&mut Text>,
) {
    if !state.is_changed() {
        return;
    }

    let Ok((mut node, mut visibility, children)) = tooltip.single_mut() else {
        return;
    };

    match state.text {
        Some(ref text) => {
            node.left = Val::Px(state.position.x + TOOLTIP_OFFSET.x);
            node.top = Val::Px(state.position.y + TOOLTIP_OFFSET.y);
            *visibility = Visibility::Inherited;

            if let Some(&child) = children.first() {
                if let Ok(mut label) = texts.get_mut(child) {
                    label.0 = text.clone();
                }
            }
        }
        None => {
            *visibility = Visibility::Hidden;
        }
    }
}
