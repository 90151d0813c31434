//! Hover highlight system
//!
//! Casts a ray from the cursor each frame, takes the nearest object, and
//! swaps its material handle for a shared highlight material. The
//! previous object's handle is restored first, so at most one object is
//! highlighted at a time. A miss restores and clears the tooltip.

use crate::camera::MainCamera;
use crate::scene::{ObjectBounds, SceneObject};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

type ObjectQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static SceneObject,
        &'static ObjectBounds,
        &'static mut MeshMaterial3d<StandardMaterial>,
    ),
>;

/// Hover plugin
pub struct HoverPlugin;

impl Plugin for HoverPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoverState>()
            .init_resource::<TooltipState>()
            .add_systems(Startup, setup_highlight_material)
            .add_systems(Update, hover_system);
    }
}

/// The currently highlighted object, with its original material handle
#[derive(Resource, Default)]
pub struct HoverState {
    pub hovered: Option<HoveredObject>,
}

pub struct HoveredObject {
    pub entity: Entity,
    pub original: Handle<StandardMaterial>,
}

/// Tooltip content for the UI layer
#[derive(Resource, Default)]
pub struct TooltipState {
    /// Text to show, or `None` to hide the tooltip
    pub text: Option<String>,
    /// Cursor position in window coordinates
    pub position: Vec2,
}

/// Shared highlight material
#[derive(Resource)]
pub struct HighlightMaterial(pub Handle<StandardMaterial>);

fn setup_highlight_material(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let handle = materials.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.75, 0.2),
        emissive: LinearRgba::rgb(0.4, 0.3, 0.05),
        metallic: 0.0,
        perceptual_roughness: 0.5,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    commands.insert_resource(HighlightMaterial(handle));
}

/// Hover system - raycast, swap, restore
fn hover_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut objects: ObjectQuery,
    highlight: Res<HighlightMaterial>,
    mut state: ResMut<HoverState>,
    mut tooltip: ResMut<TooltipState>,
) {
    let Ok(window) = windows.single() else { return };

    let Some(cursor_pos) = window.cursor_position() else {
        restore_hovered(&mut state, &mut objects);
        tooltip.text = None;
        return;
    };

    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };

    // Nearest AABB hit wins
    let mut closest: Option<(Entity, f32)> = None;
    for (entity, _, bounds, _) in objects.iter() {
        if let Some(distance) = ray_aabb_intersection(&ray, bounds.min, bounds.max) {
            if closest.map(|(_, d)| distance < d).unwrap_or(true) {
                closest = Some((entity, distance));
            }
        }
    }

    let new_target = closest.map(|(entity, _)| entity);
    apply_hover(new_target, &highlight.0, &mut state, &mut objects);

    // Tooltip follows the cursor while something is hovered
    match new_target {
        Some(entity) => {
            if let Ok((_, object, _, _)) = objects.get(entity) {
                tooltip.text = Some(format!("#{} {}", object.id, object.category));
                tooltip.position = cursor_pos;
            }
        }
        None => {
            tooltip.text = None;
        }
    }
}

/// Move the highlight to `new_target`.
///
/// The previous object's handle is always restored before the new
/// swap, so at most one object carries the highlight material.
fn apply_hover(
    new_target: Option<Entity>,
    highlight: &Handle<StandardMaterial>,
    state: &mut HoverState,
    objects: &mut ObjectQuery,
) {
    let current = state.hovered.as_ref().map(|h| h.entity);
    if new_target == current {
        return;
    }

    restore_hovered(state, objects);

    if let Some(entity) = new_target {
        if let Ok((_, _, _, mut material)) = objects.get_mut(entity) {
            let original = material.0.clone();
            material.0 = highlight.clone();
            state.hovered = Some(HoveredObject { entity, original });
        }
    }
}

/// Put the original material back on the previously hovered object.
///
/// The object may have been despawned by a model swap, in which case
/// there is nothing to restore.
fn restore_hovered(state: &mut HoverState, objects: &mut ObjectQuery) {
    if let Some(hovered) = state.hovered.take() {
        if let Ok((_, _, _, mut material)) = objects.get_mut(hovered.entity) {
            material.0 = hovered.original;
        }
    }
}

/// Ray-AABB intersection (slab method), returning the entry distance
pub fn ray_aabb_intersection(ray: &Ray3d, min: Vec3, max: Vec3) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1: Vec3 = (min - ray.origin) * inv_dir;
    let t2: Vec3 = (max - ray.origin) * inv_dir;

    let tmin = t1.min(t2);
    let tmax = t1.max(t2);

    let t_enter = tmin.x.max(tmin.y).max(tmin.z);
    let t_exit = tmax.x.min(tmax.y).min(tmax.z);

    if t_enter <= t_exit && t_exit >= 0.0 {
        Some(t_enter.max(0.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    fn scene_object(id: u32) -> (SceneObject, ObjectBounds) {
        (
            SceneObject {
                id,
                category: "IFCWALL".to_string(),
                name: None,
            },
            ObjectBounds {
                min: Vec3::splat(-1.0),
                max: Vec3::splat(1.0),
            },
        )
    }

    fn material_of(world: &World, entity: Entity) -> Handle<StandardMaterial> {
        world
            .get::<MeshMaterial3d<StandardMaterial>>(entity)
            .unwrap()
            .0
            .clone()
    }

    #[test]
    fn highlight_moves_between_objects_restoring_the_original() {
        let mut materials = Assets::<StandardMaterial>::default();
        let highlight = materials.add(StandardMaterial::default());
        let mat_a = materials.add(StandardMaterial::default());
        let mat_b = materials.add(StandardMaterial::default());

        let mut world = World::new();
        let a = world
            .spawn((scene_object(1), MeshMaterial3d(mat_a.clone())))
            .id();
        let b = world
            .spawn((scene_object(2), MeshMaterial3d(mat_b.clone())))
            .id();

        let mut state = HoverState::default();
        let mut query_state: SystemState<ObjectQuery> = SystemState::new(&mut world);

        {
            let mut objects = query_state.get_mut(&mut world);
            apply_hover(Some(a), &highlight, &mut state, &mut objects);
        }
        assert_eq!(material_of(&world, a), highlight);
        assert_eq!(material_of(&world, b), mat_b);

        // moving to b puts a's original back first
        {
            let mut objects = query_state.get_mut(&mut world);
            apply_hover(Some(b), &highlight, &mut state, &mut objects);
        }
        assert_eq!(material_of(&world, a), mat_a);
        assert_eq!(material_of(&world, b), highlight);

        // a miss restores b and clears the state
        {
            let mut objects = query_state.get_mut(&mut world);
            apply_hover(None, &highlight, &mut state, &mut objects);
        }
        assert_eq!(material_of(&world, b), mat_b);
        assert!(state.hovered.is_none());
    }

    #[test]
    fn rehovering_the_same_object_keeps_its_original_handle() {
        let mut materials = Assets::<StandardMaterial>::default();
        let highlight = materials.add(StandardMaterial::default());
        let mat_a = materials.add(StandardMaterial::default());

        let mut world = World::new();
        let a = world
            .spawn((scene_object(1), MeshMaterial3d(mat_a.clone())))
            .id();

        let mut state = HoverState::default();
        let mut query_state: SystemState<ObjectQuery> = SystemState::new(&mut world);

        for _ in 0..2 {
            let mut objects = query_state.get_mut(&mut world);
            apply_hover(Some(a), &highlight, &mut state, &mut objects);
        }

        // the saved original must not be overwritten by the highlight
        assert_eq!(material_of(&world, a), highlight);
        let saved = state.hovered.as_ref().unwrap().original.clone();
        assert_eq!(saved, mat_a);
    }

    #[test]
    fn restore_tolerates_a_despawned_object() {
        let mut materials = Assets::<StandardMaterial>::default();
        let mat_a = materials.add(StandardMaterial::default());

        let mut world = World::new();
        let a = world
            .spawn((scene_object(1), MeshMaterial3d(mat_a.clone())))
            .id();

        let mut state = HoverState {
            hovered: Some(HoveredObject {
                entity: a,
                original: mat_a,
            }),
        };
        world.despawn(a);

        let mut query_state: SystemState<ObjectQuery> = SystemState::new(&mut world);
        let mut objects = query_state.get_mut(&mut world);
        restore_hovered(&mut state, &mut objects);
        assert!(state.hovered.is_none());
    }

    fn ray(origin: Vec3, direction: Vec3) -> Ray3d {
        Ray3d {
            origin,
            direction: Dir3::new(direction).unwrap(),
        }
    }

    #[test]
    fn ray_hits_box_in_front() {
        let r = ray(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let hit = ray_aabb_intersection(&r, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!((hit.unwrap() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn ray_misses_box_to_the_side() {
        let r = ray(Vec3::new(5.0, 0.0, -10.0), Vec3::Z);
        assert!(ray_aabb_intersection(&r, Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());
    }

    #[test]
    fn box_behind_origin_is_not_hit() {
        let r = ray(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray_aabb_intersection(&r, Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());
    }

    #[test]
    fn origin_inside_box_reports_zero_distance() {
        let r = ray(Vec3::ZERO, Vec3::Z);
        let hit = ray_aabb_intersection(&r, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(hit, Some(0.0));
    }
}
