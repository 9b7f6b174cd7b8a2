use crate::registry::{Segment, SegmentId, SegmentRegistry};
use bevy::prelude::*;

/// The closest segment under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
	pub id: SegmentId,
	pub distance: f32,
}

/// Finds the segment whose surface is closest along `ray`. Ties keep the earlier segment.
pub fn nearest_hit<'a, G: 'a>(
	ray: Ray3d,
	segments: impl IntoIterator<Item = &'a Segment<G>>,
) -> Option<SegmentHit> {
	segments
		.into_iter()
		.filter_map(|segment| {
			segment.ray_distance(ray).map(|distance| SegmentHit { id: segment.id(), distance })
		})
		.fold(None, |nearest: Option<SegmentHit>, hit| match nearest {
			Some(current) if current.distance <= hit.distance => Some(current),
			_ => Some(hit),
		})
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightState {
	#[default]
	Idle,
	Highlighted(SegmentId),
}

/// Color changes a frame asks the render layer to make, applied in field order:
/// first restore the old segment, then highlight the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightChange {
	pub restore: Option<SegmentId>,
	pub highlight: Option<SegmentId>,
}

impl HighlightChange {
	pub fn is_noop(&self) -> bool {
		self.restore.is_none() && self.highlight.is_none()
	}
}

/// Tracks which single segment is highlighted and turns per-frame hits into color changes.
#[derive(Resource, Debug, Default)]
pub struct Picker {
	state: HighlightState,
	last_hit: Option<SegmentHit>,
}

impl Picker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> HighlightState {
		self.state
	}

	/// The segment currently highlighted, if any.
	pub fn current(&self) -> Option<SegmentId> {
		match self.state {
			HighlightState::Idle => None,
			HighlightState::Highlighted(id) => Some(id),
		}
	}

	/// The hit found by the most recent [`Picker::pick`].
	pub fn last_hit(&self) -> Option<SegmentHit> {
		self.last_hit
	}

	/// Casts `ray` against every segment and advances the highlight state.
	pub fn pick<G>(&mut self, ray: Ray3d, registry: &SegmentRegistry<G>) -> HighlightChange {
		self.last_hit = nearest_hit(ray, registry);
		self.update(self.last_hit.map(|hit| hit.id))
	}

	/// Advances the highlight state given this frame's nearest segment.
	pub fn update(&mut self, nearest: Option<SegmentId>) -> HighlightChange {
		let change = match (self.state, nearest) {
			(HighlightState::Idle, None) => HighlightChange::default(),
			(HighlightState::Idle, Some(next)) => {
				HighlightChange { restore: None, highlight: Some(next) }
			}
			(HighlightState::Highlighted(current), Some(next)) if current == next => {
				HighlightChange::default()
			}
			(HighlightState::Highlighted(current), Some(next)) => {
				HighlightChange { restore: Some(current), highlight: Some(next) }
			}
			(HighlightState::Highlighted(current), None) => {
				HighlightChange { restore: Some(current), highlight: None }
			}
		};

		self.state = match nearest {
			Some(id) => HighlightState::Highlighted(id),
			None => HighlightState::Idle,
		};

		if !change.is_noop() {
			log::debug!("Highlight {:?} -> {:?}", change.restore, change.highlight);
		}
		change
	}

	/// Drops the highlight and the last hit, for frames where no ray could be cast.
	pub fn clear(&mut self) -> HighlightChange {
		self.last_hit = None;
		self.update(None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::tests::CountingAssets;

	fn id(index: usize) -> SegmentId {
		SegmentId::new(index)
	}

	#[test]
	fn test_frame_sequence_emits_each_change_once() {
		let mut picker = Picker::new();
		let frames = [Some(id(1)), Some(id(1)), None, Some(id(2)), Some(id(2))];
		let changes: Vec<_> = frames.into_iter().map(|hit| picker.update(hit)).collect();

		assert_eq!(
			changes,
			vec![
				HighlightChange { restore: None, highlight: Some(id(1)) },
				HighlightChange::default(),
				HighlightChange { restore: Some(id(1)), highlight: None },
				HighlightChange { restore: None, highlight: Some(id(2)) },
				HighlightChange::default(),
			]
		);
		assert_eq!(picker.current(), Some(id(2)));
	}

	#[test]
	fn test_switching_segments_restores_before_highlighting() {
		let mut picker = Picker::new();
		picker.update(Some(id(0)));

		let change = picker.update(Some(id(3)));
		assert_eq!(change, HighlightChange { restore: Some(id(0)), highlight: Some(id(3)) });
		assert_eq!(picker.state(), HighlightState::Highlighted(id(3)));
	}

	#[test]
	fn test_idle_stays_idle() {
		let mut picker = Picker::new();
		assert!(picker.update(None).is_noop());
		assert!(picker.update(None).is_noop());
		assert_eq!(picker.state(), HighlightState::Idle);
	}

	#[test]
	fn test_nearest_segment_wins() {
		let mut assets = CountingAssets::default();
		let mut registry = SegmentRegistry::new();
		// two vertical posts on the z axis, the second one closer to the viewer at +z
		let far =
			registry.add(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 4.0, -5.0), 1.0_f32, 1.0_f32, &mut assets);
		let near =
			registry.add(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 4.0, 5.0), 1.0_f32, 1.0_f32, &mut assets);

		let ray = Ray3d::new(Vec3::new(0.0, 2.0, 20.0), Dir3::NEG_Z);
		let hit = nearest_hit(ray, &registry).unwrap();
		assert_eq!(hit.id, near);
		assert!((hit.distance - 14.0).abs() < 1e-4);

		let reversed = Ray3d::new(Vec3::new(0.0, 2.0, -20.0), Dir3::Z);
		assert_eq!(nearest_hit(reversed, &registry).unwrap().id, far);
	}

	#[test]
	fn test_pick_follows_the_ray() {
		let mut assets = CountingAssets::default();
		let mut registry = SegmentRegistry::new();
		let post = registry.add(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), "5", "-3", &mut assets);
		let mut picker = Picker::new();

		let toward = Ray3d::new(Vec3::new(0.0, 5.0, 15.0), Dir3::NEG_Z);
		let away = Ray3d::new(Vec3::new(0.0, 5.0, 15.0), Dir3::Z);

		assert_eq!(picker.pick(toward, &registry).highlight, Some(post));
		assert!((picker.last_hit().unwrap().distance - 11.0).abs() < 1e-4);
		assert!(picker.pick(toward, &registry).is_noop());
		assert_eq!(picker.pick(away, &registry).restore, Some(post));
		assert_eq!(picker.current(), None);
	}

	#[test]
	fn test_clear_drops_highlight_and_last_hit() {
		let mut assets = CountingAssets::default();
		let mut registry = SegmentRegistry::new();
		let post = registry.add(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), "5", "-3", &mut assets);
		let mut picker = Picker::new();

		picker.pick(Ray3d::new(Vec3::new(0.0, 5.0, 15.0), Dir3::NEG_Z), &registry);
		assert!(picker.last_hit().is_some());

		let change = picker.clear();
		assert_eq!(change, HighlightChange { restore: Some(post), highlight: None });
		assert_eq!(picker.current(), None);
		assert_eq!(picker.last_hit(), None);
		assert!(picker.clear().is_noop());
	}

	#[test]
	fn test_empty_registry_never_hits() {
		let registry = SegmentRegistry::<u32>::new();
		let ray = Ray3d::new(Vec3::ZERO, Dir3::X);
		assert_eq!(nearest_hit(ray, &registry), None);
	}
}
