use crate::picker::{HighlightChange, Picker};
use crate::projector::ScreenProjector;
use crate::registry::{format_point, Segment, SegmentId, SegmentRegistry};
use bevy::prelude::*;

/// Which end of a segment a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
	Start,
	End,
}

impl Endpoint {
	pub fn caption(self) -> &'static str {
		match self {
			Endpoint::Start => "Start",
			Endpoint::End => "End",
		}
	}
}

/// A floating label pinned to one endpoint of the intersected segment.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointLabel {
	pub endpoint: Endpoint,
	/// Position in viewport pixels.
	pub pixel: Vec2,
	/// The endpoint as the user entered it.
	pub coordinates: Vec3,
}

impl EndpointLabel {
	fn for_point<G>(endpoint: Endpoint, segment: &Segment<G>, projector: &ScreenProjector) -> Self {
		let coordinates = match endpoint {
			Endpoint::Start => segment.start(),
			Endpoint::End => segment.end(),
		};
		Self { endpoint, pixel: projector.project(coordinates), coordinates }
	}

	/// `Start (x, y, z)` or `End (x, y, z)`.
	pub fn text(&self) -> String {
		format!("{} {}", self.endpoint.caption(), format_point(self.coordinates))
	}
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LabelUpdate {
	#[default]
	Hide,
	Show {
		start: EndpointLabel,
		end: EndpointLabel,
	},
}

/// Everything one frame hands back to the render and overlay layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameOutput {
	pub change: HighlightChange,
	pub highlighted: Option<SegmentId>,
	pub labels: LabelUpdate,
}

/// Runs one frame of picking and label placement.
///
/// The pointer is the last known position in NDC. It is re-evaluated every frame, so a moving
/// camera alone can change the highlighted segment.
pub fn tick<G>(
	picker: &mut Picker,
	registry: &SegmentRegistry<G>,
	pointer_ndc: Vec2,
	projector: &ScreenProjector,
) -> FrameOutput {
	let change = match projector.ray_from_pointer(pointer_ndc) {
		Some(ray) => picker.pick(ray, registry),
		None => picker.clear(),
	};

	let highlighted = picker.current();
	let labels = highlighted
		.and_then(|id| registry.get(id))
		.map(|segment| LabelUpdate::Show {
			start: EndpointLabel::for_point(Endpoint::Start, segment, projector),
			end: EndpointLabel::for_point(Endpoint::End, segment, projector),
		})
		.unwrap_or_default();

	FrameOutput { change, highlighted, labels }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::projector::{CameraState, Viewport};
	use crate::registry::tests::CountingAssets;

	fn projector() -> ScreenProjector {
		let viewport = Viewport::new(0.0, 0.0, 1000.0, 800.0);
		let transform =
			Transform::from_xyz(0.0, 5.0, 15.0).looking_at(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
		let fov = 75f32.to_radians();
		let camera = CameraState::perspective(transform, fov, viewport.aspect_ratio(), 0.1, 100.0);
		ScreenProjector::new(camera, viewport)
	}

	#[test]
	fn test_hit_shows_labels_at_endpoints() {
		let mut assets = CountingAssets::default();
		let mut registry = SegmentRegistry::new();
		let post = registry.add(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), "5", "-3", &mut assets);
		let mut picker = Picker::new();
		let projector = projector();

		let output = tick(&mut picker, &registry, Vec2::ZERO, &projector);

		assert_eq!(output.highlighted, Some(post));
		assert_eq!(output.change.highlight, Some(post));
		let LabelUpdate::Show { start, end } = output.labels else {
			panic!("labels should be visible while a segment is hit");
		};
		assert_eq!(start.text(), "Start (0, 0, 0)");
		assert_eq!(end.text(), "End (0, 10, 0)");
		// the camera looks at the middle of the post, so the ends sit above and below center
		let center = projector.viewport.center();
		assert!((start.pixel.x - center.x).abs() < 1e-2);
		assert!(start.pixel.y > center.y);
		assert!(end.pixel.y < center.y);
	}

	#[test]
	fn test_miss_hides_labels_and_restores() {
		let mut assets = CountingAssets::default();
		let mut registry = SegmentRegistry::new();
		let post = registry.add(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), 1.0_f32, 1.0_f32, &mut assets);
		let mut picker = Picker::new();
		let projector = projector();

		tick(&mut picker, &registry, Vec2::ZERO, &projector);
		let output = tick(&mut picker, &registry, Vec2::new(0.9, 0.9), &projector);

		assert_eq!(output.highlighted, None);
		assert_eq!(output.change.restore, Some(post));
		assert_eq!(output.labels, LabelUpdate::Hide);
	}

	#[test]
	fn test_empty_scene_stays_hidden() {
		let registry = SegmentRegistry::<u32>::new();
		let mut picker = Picker::new();

		let output = tick(&mut picker, &registry, Vec2::ZERO, &projector());
		assert_eq!(output, FrameOutput::default());
	}
}
