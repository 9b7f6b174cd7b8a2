use crate::config::SceneConfig;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use std::f32::consts::PI;

const PITCH_LIMIT: f32 = PI / 2.0 - 0.05;
const MIN_DISTANCE: f32 = 0.5;

/// Orbits the camera around a target. Input moves the goal angles; the camera eases toward them.
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
	pub target: Vec3,
	pub yaw: f32,
	pub pitch: f32,
	pub distance: f32,
	pub goal_yaw: f32,
	pub goal_pitch: f32,
	pub goal_distance: f32,
	pub max_distance: f32,
	pub sensitivity: f32,
	pub zoom_speed: f32,
	pub damping: f32,
}

impl OrbitCamera {
	/// Orbit state that places the eye at `position` while looking at `target`.
	pub fn looking_from(position: Vec3, target: Vec3) -> Self {
		let offset = position - target;
		let distance = offset.length().max(MIN_DISTANCE);
		let yaw = offset.x.atan2(offset.z);
		let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);

		Self {
			target,
			yaw,
			pitch,
			distance,
			goal_yaw: yaw,
			goal_pitch: pitch,
			goal_distance: distance,
			max_distance: f32::MAX,
			sensitivity: 0.005,
			zoom_speed: 0.1,
			damping: 0.05,
		}
	}

	pub fn eye(&self) -> Vec3 {
		let horizontal = self.distance * self.pitch.cos();
		let offset = Vec3::new(
			horizontal * self.yaw.sin(),
			self.distance * self.pitch.sin(),
			horizontal * self.yaw.cos(),
		);
		self.target + offset
	}

	pub fn transform(&self) -> Transform {
		Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
	}

	pub fn rotate(&mut self, delta: Vec2) {
		self.goal_yaw -= delta.x * self.sensitivity;
		self.goal_pitch =
			(self.goal_pitch + delta.y * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
	}

	pub fn zoom(&mut self, lines: f32) {
		let factor = (1.0 - lines * self.zoom_speed).max(0.1);
		self.goal_distance = (self.goal_distance * factor).clamp(MIN_DISTANCE, self.max_distance);
	}

	/// Eases toward the goal. `frames` is elapsed time in 60 Hz frames.
	pub fn settle(&mut self, frames: f32) {
		let blend = 1.0 - (1.0 - self.damping.clamp(0.0, 1.0)).powf(frames);
		self.yaw += (self.goal_yaw - self.yaw) * blend;
		self.pitch += (self.goal_pitch - self.pitch) * blend;
		self.distance += (self.goal_distance - self.distance) * blend;
	}
}

pub fn setup_camera(mut commands: Commands, config: Res<SceneConfig>) {
	let camera = &config.camera;
	let position = Vec3::from_array(camera.position);
	let target = Vec3::from_array(camera.target);

	log::info!("Setting up camera at position: {:?}, looking at: {:?}", position, target);

	let orbit = OrbitCamera {
		max_distance: camera.far * 0.9,
		sensitivity: camera.sensitivity,
		zoom_speed: camera.zoom_speed,
		damping: camera.damping,
		..OrbitCamera::looking_from(position, target)
	};

	commands.spawn((
		Camera3d::default(),
		orbit.transform(),
		Projection::Perspective(PerspectiveProjection {
			fov: camera.fov_degrees.to_radians(),
			near: camera.near,
			far: camera.far,
			..default()
		}),
		orbit,
	));
}

pub fn orbit_camera(
	mouse_buttons: Res<ButtonInput<MouseButton>>,
	mut mouse_motion: MessageReader<MouseMotion>,
	mut mouse_wheel: MessageReader<MouseWheel>,
	time: Res<Time>,
	mut query: Query<(&mut Transform, &mut OrbitCamera)>,
) {
	let Ok((mut transform, mut orbit)) = query.single_mut() else {
		return;
	};

	let mut drag = Vec2::ZERO;
	for event in mouse_motion.read() {
		drag += event.delta;
	}
	if mouse_buttons.pressed(MouseButton::Left) && drag != Vec2::ZERO {
		orbit.rotate(drag);
	}

	for event in mouse_wheel.read() {
		let lines = match event.unit {
			MouseScrollUnit::Line => event.y,
			MouseScrollUnit::Pixel => event.y / 40.0,
		};
		orbit.zoom(lines);
	}

	orbit.settle(time.delta_secs() * 60.0);
	*transform = orbit.transform();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_looking_from_round_trips_the_eye() {
		let orbit = OrbitCamera::looking_from(Vec3::new(0.0, 5.0, 15.0), Vec3::ZERO);
		assert!(orbit.eye().abs_diff_eq(Vec3::new(0.0, 5.0, 15.0), 1e-4));

		let offset = OrbitCamera::looking_from(Vec3::new(3.0, 1.0, -4.0), Vec3::new(1.0, 1.0, 1.0));
		assert!(offset.eye().abs_diff_eq(Vec3::new(3.0, 1.0, -4.0), 1e-4));
	}

	#[test]
	fn test_settle_eases_toward_goal() {
		let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
		orbit.rotate(Vec2::new(-100.0, 0.0));
		let goal = orbit.goal_yaw;

		orbit.settle(1.0);
		assert!(orbit.yaw > 0.0 && orbit.yaw < goal);

		orbit.settle(600.0);
		assert!((orbit.yaw - goal).abs() < 1e-3);
	}

	#[test]
	fn test_zoom_is_clamped() {
		let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
		orbit.max_distance = 20.0;
		for _ in 0..100 {
			orbit.zoom(-5.0);
		}
		assert_eq!(orbit.goal_distance, 20.0);
		for _ in 0..100 {
			orbit.zoom(5.0);
		}
		assert_eq!(orbit.goal_distance, MIN_DISTANCE);
	}
}
