//! Summary panel - model name, object count, and category list

use super::layout::SummaryPanel;
use super::styles::{UiColors, UiSizes};
use crate::ModelScene;
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;
use bevy::ui::{FlexDirection, Node, UiRect, Val};
use fragview_model::LoadedModel;

pub struct SummaryPlugin;

impl Plugin for SummaryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_summary.after(super::layout::setup_layout))
            .add_systems(Update, update_summary);
    }
}

/// Marker for summary content
#[derive(Component)]
pub struct SummaryContent;

/// Marker for summary rows
#[derive(Component)]
pub struct SummaryRow;

fn setup_summary(mut commands: Commands, panel_query: Query<Entity, With<SummaryPanel>>) {
    let Ok(panel_entity) = panel_query.single() else {
        return;
    };

    commands.entity(panel_entity).with_children(|panel| {
        // Panel title
        panel.spawn((
            Text::new("Model"),
            TextFont {
                font_size: UiSizes::FONT_SIZE_LG,
                ..default()
            },
            TextColor(UiColors::TEXT_PRIMARY),
            Node {
                margin: UiRect::bottom(Val::Px(UiSizes::PADDING)),
                ..default()
            },
        ));

        // Summary content
        panel.spawn((
            SummaryContent,
            Node {
                width: Val::Percent(100.0),
                flex_grow: 1.0,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::NONE),
        ));
    });
}

fn update_summary(
    mut commands: Commands,
    scene: Res<ModelScene>,
    content_query: Query<Entity, With<SummaryContent>>,
    existing_rows: Query<Entity, With<SummaryRow>>,
) {
    if !scene.is_changed() {
        return;
    }

    let Ok(content_entity) = content_query.single() else {
        return;
    };

    // Clear existing rows - despawn() is recursive in Bevy 0.18
    for entity in existing_rows.iter() {
        commands.entity(entity).despawn();
    }

    commands.entity(content_entity).with_children(|content| {
        match scene.model {
            Some(ref model) => {
                for line in summary_lines(model) {
                    spawn_row(content, &line);
                }
            }
            None => {
                spawn_row(content, "No model loaded");
            }
        }
    });
}

/// Build the summary text lines for a loaded model.
///
/// Categories get one line each; a model with none shows a placeholder.
pub fn summary_lines(model: &LoadedModel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(model.name.clone());
    lines.push(format!("Objects: {}", model.object_count()));
    lines.push("Categories:".to_string());

    let categories = model.categories();
    if categories.is_empty() {
        lines.push("- No categories found".to_string());
    } else {
        for category in categories {
            lines.push(format!("- {}", category));
        }
    }

    lines
}

fn spawn_row(parent: &mut ChildSpawnerCommands, text: &str) {
    parent.spawn((
        SummaryRow,
        Text::new(text),
        TextFont {
            font_size: UiSizes::FONT_SIZE_SM,
            ..default()
        },
        TextColor(UiColors::TEXT_SECONDARY),
        Node {
            margin: UiRect::bottom(Val::Px(UiSizes::PADDING_SM)),
            ..default()
        },
    ));
}
