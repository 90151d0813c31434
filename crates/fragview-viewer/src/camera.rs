//! Camera system with orbit and zoom controls
//!
//! Keyboard shortcuts reposition the camera onto a world axis:
//! `X`/`Y`/`Z` snap to the positive axis, Shift+key to the negative one,
//! `H` returns to the isometric home view.

use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

/// Camera controller plugin
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraController>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (
                    camera_input_system,
                    camera_keyboard_system,
                    camera_update_system,
                )
                    .chain(),
            );
    }
}

/// Camera controller resource
#[derive(Resource)]
pub struct CameraController {
    /// Target point to orbit around
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Azimuth angle (horizontal rotation)
    pub azimuth: f32,
    /// Elevation angle (vertical rotation)
    pub elevation: f32,
    /// Damping factor for smooth movement (0.0 = instant, 1.0 = never moves)
    pub damping: f32,
    /// Whether camera is currently animating
    pub is_animating: bool,
    /// Animation target (for preset views)
    pub animation_target: Option<CameraAnimationTarget>,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Orbit sensitivity
    pub orbit_sensitivity: f32,
    /// Zoom sensitivity
    pub zoom_sensitivity: f32,
    /// Is dragging (mouse down)
    pub is_dragging: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 100.0,  // Start further back for IFC models (in mm)
            azimuth: 0.785,   // 45 degrees
            elevation: 0.615, // ~35 degrees (isometric)
            damping: 0.92,
            is_animating: false,
            animation_target: None,
            fov: 45.0,
            near: 1.0,      // 1mm near plane for IFC-scale models
            far: 1000000.0, // 1km far plane for large IFC models
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.02,
            is_dragging: false,
        }
    }
}

impl CameraController {
    /// Get camera position from spherical coordinates
    pub fn get_position(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Animate to a preset view
    pub fn set_preset_view(&mut self, azimuth: f32, elevation: f32) {
        self.animation_target = Some(CameraAnimationTarget {
            azimuth,
            elevation,
            distance: self.distance,
            target: self.target,
            duration: 0.5,
            elapsed: 0.0,
        });
        self.is_animating = true;
    }

    /// Snap onto a world axis at the current distance
    pub fn set_axis_view(&mut self, axis: Axis, negative: bool) {
        let (azimuth, elevation) = axis_view(axis, negative);
        self.set_preset_view(azimuth, elevation);
    }

    /// Set home/isometric view
    pub fn home(&mut self) {
        self.set_preset_view(0.785, 0.615); // 45°, 35.264°
    }

    /// Fit all - zoom to show entire scene
    pub fn fit_bounds(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let size = max - min;
        let diagonal = size.length();

        let fov_rad = self.fov.to_radians();
        let distance = diagonal / (2.0 * (fov_rad / 2.0).tan());

        self.animation_target = Some(CameraAnimationTarget {
            azimuth: self.azimuth,
            elevation: self.elevation,
            distance: distance.max(1.0),
            target: center,
            duration: 0.5,
            elapsed: 0.0,
        });
        self.is_animating = true;
    }
}

/// A world axis for camera snapping
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Spherical angles placing the camera on the given axis, looking at the
/// target. Elevation stops just short of the pole to avoid gimbal lock.
pub fn axis_view(axis: Axis, negative: bool) -> (f32, f32) {
    use std::f32::consts::{FRAC_PI_2, PI};
    match (axis, negative) {
        (Axis::X, false) => (FRAC_PI_2, 0.0),
        (Axis::X, true) => (-FRAC_PI_2, 0.0),
        (Axis::Y, false) => (0.0, FRAC_PI_2 - 0.001),
        (Axis::Y, true) => (0.0, -FRAC_PI_2 + 0.001),
        (Axis::Z, false) => (0.0, 0.0),
        (Axis::Z, true) => (PI, 0.0),
    }
}

/// Animation target for smooth camera transitions
#[derive(Clone, Debug)]
pub struct CameraAnimationTarget {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    pub target: Vec3,
    pub duration: f32,
    pub elapsed: f32,
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Setup the 3D camera and lights
fn setup_camera(mut commands: Commands, controller: Res<CameraController>) {
    use bevy::render::view::Msaa;

    let position = controller.get_position();

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(position).looking_at(controller.target, Vec3::Y),
        Projection::Perspective(PerspectiveProjection {
            fov: controller.fov.to_radians(),
            near: controller.near,
            far: controller.far,
            ..default()
        }),
        MainCamera,
        Msaa::Sample4,
    ));

    // Low ambient for contrast
    commands.spawn(AmbientLight {
        color: Color::WHITE,
        brightness: 80.0,
        affects_lightmapped_meshes: true,
    });

    // Key directional light from top-right-front
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 0.99, 0.97),
            illuminance: 25000.0,
            shadows_enabled: false,
            affects_lightmapped_mesh_diffuse: true,
            ..default()
        },
        Transform::from_xyz(0.5, 1.0, 0.3).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Fill light from opposite side
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.85, 0.9, 1.0),
            illuminance: 8000.0,
            shadows_enabled: false,
            affects_lightmapped_mesh_diffuse: true,
            ..default()
        },
        Transform::from_xyz(-0.5, 0.3, -0.5).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Rim light for edge definition
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.9, 0.95, 1.0),
            illuminance: 5000.0,
            shadows_enabled: false,
            affects_lightmapped_mesh_diffuse: true,
            ..default()
        },
        Transform::from_xyz(-0.3, 0.8, -0.8).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Handle mouse input for orbit and zoom
fn camera_input_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut controller: ResMut<CameraController>,
    ui_interactions: Query<&Interaction, With<Node>>,
) {
    // Ignore drags and wheel events that start over UI elements
    let mouse_over_ui = ui_interactions
        .iter()
        .any(|interaction| matches!(interaction, Interaction::Hovered | Interaction::Pressed));

    if mouse_button.just_pressed(MouseButton::Left) && !mouse_over_ui {
        controller.is_dragging = true;
    }
    if mouse_button.just_released(MouseButton::Left) {
        controller.is_dragging = false;
    }

    if controller.is_dragging {
        for ev in mouse_motion.read() {
            controller.azimuth -= ev.delta.x * controller.orbit_sensitivity;
            controller.elevation -= ev.delta.y * controller.orbit_sensitivity;
            // Clamp elevation to avoid gimbal lock
            controller.elevation = controller.elevation.clamp(-1.5, 1.5);
        }
    }

    if !mouse_over_ui {
        for ev in mouse_wheel.read() {
            let zoom_delta = ev.y * controller.zoom_sensitivity;
            controller.distance = (controller.distance * (1.0 - zoom_delta)).clamp(1.0, 500000.0);
        }
    }
}

/// Handle keyboard input for axis snapping and home view
fn camera_keyboard_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut controller: ResMut<CameraController>,
) {
    let negative = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if keyboard.just_pressed(KeyCode::KeyX) {
        controller.set_axis_view(Axis::X, negative);
    }
    if keyboard.just_pressed(KeyCode::KeyY) {
        controller.set_axis_view(Axis::Y, negative);
    }
    if keyboard.just_pressed(KeyCode::KeyZ) {
        controller.set_axis_view(Axis::Z, negative);
    }
    if keyboard.just_pressed(KeyCode::KeyH) {
        controller.home();
    }
}

/// Update camera transform
fn camera_update_system(
    mut controller: ResMut<CameraController>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    // Advance any preset-view animation
    if controller.animation_target.is_some() {
        let animation_data = {
            let target = match controller.animation_target.as_mut() {
                Some(t) => t,
                None => return,
            };
            target.elapsed += dt;
            let t = (target.elapsed / target.duration).min(1.0);
            // Ease out cubic
            let t = 1.0 - (1.0 - t).powi(3);
            let completed = target.elapsed >= target.duration;
            (
                target.azimuth,
                target.elevation,
                target.distance,
                target.target,
                t,
                completed,
            )
        };

        let (target_azimuth, target_elevation, target_distance, target_pos, t, completed) =
            animation_data;

        controller.azimuth = lerp(controller.azimuth, target_azimuth, t);
        controller.elevation = lerp(controller.elevation, target_elevation, t);
        controller.distance = lerp(controller.distance, target_distance, t);
        controller.target = controller.target.lerp(target_pos, t);

        if completed {
            controller.animation_target = None;
            controller.is_animating = false;
        }
    }

    if let Ok(mut transform) = camera.single_mut() {
        let position = controller.get_position();

        transform.translation = transform
            .translation
            .lerp(position, 1.0 - controller.damping.powi(2));
        transform.look_at(controller.target, Vec3::Y);
    }
}

/// Linear interpolation
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn axis_views_place_camera_on_each_axis() {
        let mut controller = CameraController {
            distance: 10.0,
            target: Vec3::ZERO,
            ..default()
        };

        let (az, el) = axis_view(Axis::X, false);
        controller.azimuth = az;
        controller.elevation = el;
        let pos = controller.get_position();
        assert!((pos - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);

        let (az, el) = axis_view(Axis::Z, true);
        controller.azimuth = az;
        controller.elevation = el;
        let pos = controller.get_position();
        assert!((pos - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-3);
    }

    #[test]
    fn shift_flips_the_axis() {
        assert_eq!(axis_view(Axis::X, false).0, FRAC_PI_2);
        assert_eq!(axis_view(Axis::X, true).0, -FRAC_PI_2);
        assert_eq!(axis_view(Axis::Z, true).0, PI);
        assert!(axis_view(Axis::Y, true).1 < 0.0);
    }

    #[test]
    fn top_view_stays_short_of_the_pole() {
        let (_, el) = axis_view(Axis::Y, false);
        assert!(el < FRAC_PI_2);
        let mut controller = CameraController {
            distance: 5.0,
            azimuth: 0.0,
            elevation: el,
            ..default()
        };
        controller.target = Vec3::ZERO;
        let pos = controller.get_position();
        assert!(pos.y > 4.99);
    }
}
