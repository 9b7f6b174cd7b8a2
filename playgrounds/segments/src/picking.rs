use crate::segments::{SegmentMesh, Segments};
use crate::Palette;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use segment::{tick, CameraState, FrameOutput, Picker, ScreenProjector, SegmentId, Viewport};

/// Last known pointer position in NDC. Starts at the center, and a pointer that leaves the
/// window keeps its last value.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PointerState {
	pub ndc: Vec2,
	/// Last position in window pixels.
	pub pixel: Option<Vec2>,
}

/// The result of the latest picking pass.
#[derive(Resource, Debug, Clone, Default)]
pub struct FrameState(pub FrameOutput);

fn camera_viewport(camera: &Camera, window: &Window) -> Viewport {
	match camera.logical_viewport_rect() {
		Some(rect) => Viewport::from_rect(rect),
		None => Viewport::new(0.0, 0.0, window.width(), window.height()),
	}
}

pub fn track_pointer(
	windows: Query<&Window, With<PrimaryWindow>>,
	cameras: Query<&Camera, With<Camera3d>>,
	mut pointer: ResMut<PointerState>,
) {
	let (Ok(window), Ok(camera)) = (windows.single(), cameras.single()) else {
		return;
	};
	let Some(cursor) = window.cursor_position() else {
		return;
	};

	pointer.pixel = Some(cursor);
	pointer.ndc = camera_viewport(camera, window).pointer_to_ndc(cursor);
}

/// Casts the pointer ray every frame and recolors whatever the highlight moved off or onto.
pub fn pick_segments(
	windows: Query<&Window, With<PrimaryWindow>>,
	cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
	registry: Res<Segments>,
	pointer: Res<PointerState>,
	palette: Res<Palette>,
	mut picker: ResMut<Picker>,
	mut frame: ResMut<FrameState>,
	mut materials: ResMut<Assets<StandardMaterial>>,
	segment_materials: Query<(&SegmentMesh, &MeshMaterial3d<StandardMaterial>)>,
) {
	let (Ok(window), Ok((camera, camera_transform))) = (windows.single(), cameras.single()) else {
		return;
	};

	let camera_state = CameraState::new(Mat4::from(camera_transform.affine()), camera.clip_from_view());
	let projector = ScreenProjector::new(camera_state, camera_viewport(camera, window));
	let output = tick(&mut picker, &*registry, pointer.ndc, &projector);

	if !output.change.is_noop() {
		let mut recolor = |id: SegmentId, color: Color| {
			for (segment_mesh, material) in &segment_materials {
				if segment_mesh.0 != id {
					continue;
				}
				if let Some(material) = materials.get_mut(&material.0) {
					material.base_color = color;
				}
			}
		};

		if let Some(id) = output.change.restore {
			recolor(id, palette.segment);
		}
		if let Some(id) = output.change.highlight {
			recolor(id, palette.highlight);
		}
	}

	frame.0 = output;
}
