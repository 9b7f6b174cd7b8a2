use crate::config::SceneConfig;
use crate::Palette;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

pub fn setup_lighting(mut commands: Commands, config: Res<SceneConfig>) {
	let lighting = &config.lighting;

	commands.insert_resource(AmbientLight {
		color: Color::WHITE,
		brightness: lighting.ambient_brightness,
		affects_lightmapped_meshes: true,
	});

	commands.spawn((
		DirectionalLight { illuminance: lighting.directional_illuminance, ..default() },
		Transform::from_translation(Vec3::from_array(lighting.directional_position))
			.looking_at(Vec3::ZERO, Vec3::Y),
	));
}

/// Ground grid on the XZ plane, centered on the origin.
pub fn draw_grid(mut gizmos: Gizmos, config: Res<SceneConfig>, palette: Res<Palette>) {
	let grid = &config.grid;
	if grid.divisions == 0 {
		return;
	}

	let spacing = grid.size / grid.divisions as f32;
	gizmos.grid(
		Isometry3d::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
		UVec2::splat(grid.divisions),
		Vec2::splat(spacing),
		palette.grid,
	);
}
