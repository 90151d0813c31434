//! Scene system for loaded models
//!
//! Spawns one Bevy entity per model object with its own material handle,
//! so the hover system can swap a single object's material in and out.
//! Fragment coordinates are IFC Z-up and get converted to Bevy Y-up here.

use crate::{log, ModelScene, SceneBounds};
use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use fragview_model::FragmentMesh;

/// Scene plugin
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutoFitState>()
            .add_systems(Update, (spawn_scene_system, auto_fit_camera_system).chain());
    }
}

/// State for auto-fit camera on first load
#[derive(Resource, Default)]
pub struct AutoFitState {
    /// Whether we've already auto-fit for this scene
    pub has_fit: bool,
}

/// Marker component for spawned model objects
#[derive(Component)]
pub struct SceneObject {
    pub id: u32,
    pub category: String,
    pub name: Option<String>,
}

/// World-space bounds of a spawned object (for hover raycasting)
#[derive(Component, Clone, Debug)]
pub struct ObjectBounds {
    pub min: Vec3,
    pub max: Vec3,
}

/// System to respawn scene entities when the loaded model changes.
///
/// Despawns every object of the previous model before spawning the new
/// one, so the scene never holds more than one model.
fn spawn_scene_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut scene: ResMut<ModelScene>,
    mut auto_fit: ResMut<AutoFitState>,
    existing_objects: Query<Entity, With<SceneObject>>,
) {
    if !scene.dirty {
        return;
    }

    for entity in existing_objects.iter() {
        commands.entity(entity).despawn();
    }

    let Some(ref model) = scene.model else {
        scene.bounds = None;
        scene.dirty = false;
        return;
    };

    log(&format!(
        "[Scene] Spawning {} objects for '{}'",
        model.object_count(),
        model.name
    ));

    let mut scene_min = Vec3::splat(f32::INFINITY);
    let mut scene_max = Vec3::splat(f32::NEG_INFINITY);
    let mut spawned = 0usize;

    for object in &model.objects {
        // Metadata-only objects have nothing to render
        if !object.is_renderable() {
            continue;
        }

        let (positions, normals) = convert_fragment(&object.fragment);
        let (min, max) = bounds_of(&positions);
        scene_min = scene_min.min(min);
        scene_max = scene_max.max(max);

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_indices(Indices::U32(object.fragment.indices.clone()));

        let color = get_default_color(&object.category);
        let material = StandardMaterial {
            base_color: Color::srgba(color[0], color[1], color[2], color[3]),
            metallic: 0.0,
            perceptual_roughness: 0.6,
            reflectance: 0.3,
            double_sided: true,
            cull_mode: None,
            ..default()
        };

        commands.spawn((
            SceneObject {
                id: object.id.0,
                category: object.category.clone(),
                name: object.name.clone(),
            },
            ObjectBounds { min, max },
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(materials.add(material)),
            Transform::default(),
        ));
        spawned += 1;
    }

    if scene_min.x.is_finite() && scene_max.x.is_finite() {
        scene.bounds = Some(SceneBounds {
            min: scene_min,
            max: scene_max,
        });
        auto_fit.has_fit = false;
    } else {
        scene.bounds = None;
    }

    log(&format!("[Scene] Spawned {} renderable objects", spawned));

    scene.dirty = false;
}

/// System to auto-fit camera to scene bounds when first loaded
fn auto_fit_camera_system(
    scene: Res<ModelScene>,
    mut auto_fit: ResMut<AutoFitState>,
    mut camera_controller: ResMut<crate::camera::CameraController>,
) {
    if auto_fit.has_fit {
        return;
    }

    if let Some(ref bounds) = scene.bounds {
        log(&format!(
            "[Scene] Auto-fitting camera to bounds: {:?} to {:?}",
            bounds.min, bounds.max
        ));

        let center = bounds.center();
        let diagonal = bounds.diagonal();

        let fov_rad = camera_controller.fov.to_radians();
        let distance = diagonal / (2.0 * (fov_rad / 2.0).tan());

        camera_controller.target = center;
        camera_controller.distance = distance.max(100.0);
        camera_controller.azimuth = 0.785;
        camera_controller.elevation = 0.615;

        auto_fit.has_fit = true;
    }
}

/// Convert fragment positions and normals from IFC Z-up to Bevy Y-up
pub fn convert_fragment(fragment: &FragmentMesh) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    let vertex_count = fragment.vertex_count();

    let positions: Vec<[f32; 3]> = (0..vertex_count)
        .map(|i| {
            let idx = i * 3;
            [
                fragment.positions[idx] as f32,
                fragment.positions[idx + 2] as f32,  // Z -> Y
                -(fragment.positions[idx + 1] as f32), // -Y -> Z
            ]
        })
        .collect();

    let normals: Vec<[f32; 3]> = (0..vertex_count)
        .map(|i| {
            let idx = i * 3;
            [
                fragment.normals[idx] as f32,
                fragment.normals[idx + 2] as f32,
                -(fragment.normals[idx + 1] as f32),
            ]
        })
        .collect();

    (positions, normals)
}

/// AABB of converted positions
fn bounds_of(positions: &[[f32; 3]]) -> (Vec3, Vec3) {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for p in positions {
        let v = Vec3::from_array(*p);
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

/// Get default color for IFC entity type
pub fn get_default_color(entity_type: &str) -> [f32; 4] {
    let upper = entity_type.to_uppercase();

    if upper.contains("WALL") {
        // Walls - warm beige
        [0.92, 0.85, 0.75, 1.0]
    } else if upper.contains("SLAB") {
        // Slabs/floors - concrete gray
        [0.75, 0.73, 0.70, 1.0]
    } else if upper.contains("ROOF") {
        // Roofs - terracotta
        [0.72, 0.55, 0.45, 1.0]
    } else if upper.contains("BEAM") || upper.contains("COLUMN") || upper.contains("MEMBER") {
        // Structural elements - steel blue-gray
        [0.60, 0.65, 0.72, 1.0]
    } else if upper.contains("DOOR") {
        // Doors - wood brown
        [0.55, 0.35, 0.20, 1.0]
    } else if upper.contains("WINDOW") || upper.contains("CURTAINWALL") {
        // Windows - blue glass
        [0.5, 0.7, 0.85, 1.0]
    } else if upper.contains("STAIR") || upper.contains("RAMP") {
        // Stairs/ramps - warm gray
        [0.65, 0.62, 0.58, 1.0]
    } else if upper.contains("RAILING") {
        // Railings - dark metallic
        [0.35, 0.35, 0.38, 1.0]
    } else if upper.contains("FURNITURE") || upper.contains("FURNISHING") {
        // Furniture - warm wood
        [0.65, 0.45, 0.28, 1.0]
    } else if upper.contains("PLATE") {
        // Plates - steel
        [0.68, 0.70, 0.75, 1.0]
    } else if upper.contains("COVERING") {
        // Coverings - light warm gray
        [0.82, 0.80, 0.76, 1.0]
    } else if upper.contains("FOOTING") || upper.contains("PILE") {
        // Foundations - dark concrete
        [0.55, 0.53, 0.50, 1.0]
    } else if upper.contains("PROXY") {
        // Building element proxies - purple tint
        [0.70, 0.65, 0.75, 1.0]
    } else {
        // Default - neutral warm gray
        [0.75, 0.72, 0.70, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use fragview_model::{Aabb, EntityId, LoadedModel, ModelHeader, ModelObject};

    fn boxed_object(id: u32, category: &str) -> ModelObject {
        let mut aabb = Aabb::empty();
        aabb.grow([0.0, 0.0, 0.0]);
        aabb.grow([1000.0, 1000.0, 1000.0]);
        ModelObject {
            id: EntityId(id),
            category: category.to_string(),
            name: None,
            fragment: FragmentMesh::from_aabb(&aabb),
        }
    }

    fn model(name: &str, objects: Vec<ModelObject>) -> LoadedModel {
        LoadedModel {
            name: name.to_string(),
            header: ModelHeader::default(),
            objects,
        }
    }

    fn scene_world(model: LoadedModel) -> World {
        let mut world = World::new();
        world.insert_resource(Assets::<Mesh>::default());
        world.insert_resource(Assets::<StandardMaterial>::default());
        world.init_resource::<AutoFitState>();
        world.insert_resource(ModelScene {
            model: Some(model),
            bounds: None,
            dirty: true,
        });
        world
    }

    fn spawned_categories(world: &mut World) -> Vec<String> {
        let mut query = world.query::<&SceneObject>();
        let mut categories: Vec<String> =
            query.iter(world).map(|o| o.category.clone()).collect();
        categories.sort();
        categories
    }

    #[test]
    fn loading_a_new_model_replaces_the_previous_objects() {
        let first = model(
            "first.ifc",
            vec![boxed_object(1, "IFCWALL"), boxed_object(2, "IFCDOOR")],
        );
        let mut world = scene_world(first);

        world.run_system_once(spawn_scene_system).unwrap();
        assert_eq!(
            spawned_categories(&mut world),
            vec!["IFCDOOR".to_string(), "IFCWALL".to_string()]
        );

        {
            let mut scene = world.resource_mut::<ModelScene>();
            scene.model = Some(model("second.ifc", vec![boxed_object(7, "IFCSLAB")]));
            scene.dirty = true;
        }
        world.run_system_once(spawn_scene_system).unwrap();

        // exactly the previous model's objects are gone
        assert_eq!(spawned_categories(&mut world), vec!["IFCSLAB".to_string()]);
        assert!(world.resource::<ModelScene>().bounds.is_some());
        assert!(!world.resource::<ModelScene>().dirty);
    }

    #[test]
    fn clearing_the_model_empties_the_scene() {
        let mut world = scene_world(model("only.ifc", vec![boxed_object(1, "IFCWALL")]));
        world.run_system_once(spawn_scene_system).unwrap();
        assert_eq!(spawned_categories(&mut world).len(), 1);

        {
            let mut scene = world.resource_mut::<ModelScene>();
            scene.model = None;
            scene.dirty = true;
        }
        world.run_system_once(spawn_scene_system).unwrap();

        assert!(spawned_categories(&mut world).is_empty());
        assert!(world.resource::<ModelScene>().bounds.is_none());
    }

    #[test]
    fn metadata_only_objects_are_not_spawned() {
        let objects = vec![
            boxed_object(1, "IFCWALL"),
            ModelObject {
                id: EntityId(2),
                category: "IFCPROJECT".to_string(),
                name: None,
                fragment: FragmentMesh::default(),
            },
        ];
        let mut world = scene_world(model("mixed.ifc", objects));
        world.run_system_once(spawn_scene_system).unwrap();
        assert_eq!(spawned_categories(&mut world), vec!["IFCWALL".to_string()]);
    }

    #[test]
    fn fragment_conversion_swaps_axes() {
        let mut aabb = Aabb::empty();
        aabb.grow([0.0, 0.0, 0.0]);
        aabb.grow([1.0, 2.0, 3.0]);
        let fragment = FragmentMesh::from_aabb(&aabb);

        let (positions, normals) = convert_fragment(&fragment);
        assert_eq!(positions.len(), fragment.vertex_count());
        assert_eq!(normals.len(), positions.len());

        // IFC (1, 2, 3) becomes Bevy (1, 3, -2)
        let (min, max) = bounds_of(&positions);
        assert_eq!(min, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(max, Vec3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn category_colors_are_distinct_for_common_types() {
        let wall = get_default_color("IFCWALL");
        let door = get_default_color("IFCDOOR");
        let other = get_default_color("IFCWHATEVER");
        assert_ne!(wall, door);
        assert_eq!(other, [0.75, 0.72, 0.70, 1.0]);
    }

    #[test]
    fn color_lookup_is_case_insensitive() {
        assert_eq!(get_default_color("IfcWallStandardCase"), get_default_color("IFCWALL"));
    }
}
