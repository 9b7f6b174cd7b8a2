use crate::config::SceneConfig;
use crate::Palette;
use bevy::prelude::*;
use segment::{sanitize_radius, RawRadius, SegmentId, SegmentRegistry};

/// Registry of every segment in the scene, backed by Bevy mesh handles.
pub type Segments = SegmentRegistry<Handle<Mesh>>;

/// How much one arrow-key press changes a radius.
const RADIUS_STEP: f32 = 0.1;

/// Marks the render entity of a segment.
#[derive(Component, Debug, Clone, Copy)]
pub struct SegmentMesh(pub SegmentId);

/// Request to create a segment from user input.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct CreateSegment {
	pub start: Vec3,
	pub end: Vec3,
	pub base_radius: RawRadius,
	pub top_radius: RawRadius,
}

/// Request to change the radii of the most recently created segment.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct EditRadii {
	pub base_radius: RawRadius,
	pub top_radius: RawRadius,
}

/// The radius fields as the user last left them. Shared by creation and live edits.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct RadiusInput {
	pub base_radius: RawRadius,
	pub top_radius: RawRadius,
}

impl RadiusInput {
	pub fn edit(&self) -> EditRadii {
		EditRadii { base_radius: self.base_radius.clone(), top_radius: self.top_radius.clone() }
	}

	/// Moves both fields by a step, starting from their sanitized values.
	pub fn nudge(&mut self, base_steps: f32, top_steps: f32) {
		self.base_radius = nudged(&self.base_radius, base_steps);
		self.top_radius = nudged(&self.top_radius, top_steps);
	}
}

fn nudged(raw: &RawRadius, steps: f32) -> RawRadius {
	if steps == 0.0 {
		return raw.clone();
	}
	RawRadius::from(sanitize_radius(raw.clone()) + steps * RADIUS_STEP)
}

pub fn queue_configured_segments(config: Res<SceneConfig>, mut requests: MessageWriter<CreateSegment>) {
	for segment in &config.segments {
		requests.write(CreateSegment {
			start: segment.start(),
			end: segment.end(),
			base_radius: segment.base_radius.clone(),
			top_radius: segment.top_radius.clone(),
		});
	}
}

pub fn create_segments(
	mut commands: Commands,
	mut requests: MessageReader<CreateSegment>,
	mut registry: ResMut<Segments>,
	mut meshes: ResMut<Assets<Mesh>>,
	mut materials: ResMut<Assets<StandardMaterial>>,
	palette: Res<Palette>,
) {
	for request in requests.read() {
		let id = registry.add(
			request.start,
			request.end,
			request.base_radius.clone(),
			request.top_radius.clone(),
			&mut *meshes,
		);
		let Some(segment) = registry.get(id) else {
			continue;
		};

		commands.spawn((
			Mesh3d(segment.geometry().clone()),
			MeshMaterial3d(materials.add(StandardMaterial { base_color: palette.segment, ..default() })),
			segment.transform().to_transform(),
			SegmentMesh(id),
		));
	}
}

pub fn edit_radii(
	mut requests: MessageReader<EditRadii>,
	mut registry: ResMut<Segments>,
	mut meshes: ResMut<Assets<Mesh>>,
	mut segment_meshes: Query<(&SegmentMesh, &mut Mesh3d)>,
) {
	for request in requests.read() {
		let Some(id) = registry.update_active_radii(
			request.base_radius.clone(),
			request.top_radius.clone(),
			&mut *meshes,
		) else {
			log::debug!("Ignoring radius edit, no segment has been created yet");
			continue;
		};
		let Some(segment) = registry.active() else {
			continue;
		};

		for (segment_mesh, mut mesh) in &mut segment_meshes {
			if segment_mesh.0 == id {
				mesh.0 = segment.geometry().clone();
			}
		}
	}
}

/// Arrow keys nudge the radius fields and apply them to the active segment right away.
pub fn nudge_radii(
	keyboard_input: Res<ButtonInput<KeyCode>>,
	mut input: ResMut<RadiusInput>,
	mut edits: MessageWriter<EditRadii>,
) {
	let mut base_steps = 0.0;
	let mut top_steps = 0.0;

	if keyboard_input.just_pressed(KeyCode::ArrowUp) {
		base_steps += 1.0;
	}
	if keyboard_input.just_pressed(KeyCode::ArrowDown) {
		base_steps -= 1.0;
	}
	if keyboard_input.just_pressed(KeyCode::ArrowRight) {
		top_steps += 1.0;
	}
	if keyboard_input.just_pressed(KeyCode::ArrowLeft) {
		top_steps -= 1.0;
	}

	if base_steps == 0.0 && top_steps == 0.0 {
		return;
	}

	input.nudge(base_steps, top_steps);
	edits.write(input.edit());
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_nudge_starts_from_sanitized_value() {
		let mut input = RadiusInput { base_radius: "abc".into(), top_radius: "-2".into() };
		input.nudge(1.0, -1.0);

		assert!((input.base_radius.sanitize() - 0.3).abs() < 1e-6);
		assert!((input.top_radius.sanitize() - 1.9).abs() < 1e-6);
	}

	#[test]
	fn test_nudge_leaves_untouched_field_as_typed() {
		let mut input = RadiusInput { base_radius: "1".into(), top_radius: " 4 ".into() };
		input.nudge(1.0, 0.0);
		assert_eq!(input.top_radius, RawRadius::from(" 4 "));
	}
}
