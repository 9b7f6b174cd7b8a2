use bevy::prelude::*;
use std::f32::consts::PI;

/// Tolerance used to detect directions that are (anti-)parallel to the up axis.
const PARALLEL_TOLERANCE: f32 = 1e-6;

/// Placement of a frustum that connects two points.
///
/// The frustum itself is modelled along local +Y and centered on the origin, so placing it
/// means translating to the midpoint and rotating +Y onto the segment direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTransform {
	pub position: Vec3,
	pub orientation: Quat,
	pub height: f32,
}

impl SegmentTransform {
	/// Computes the placement for the segment running from `start` to `end`.
	pub fn build(start: Vec3, end: Vec3) -> Self {
		let ray = end - start;
		let height = ray.length();
		let position = (start + end) * 0.5;

		Self { position, orientation: orientation_for(ray), height }
	}

	/// Bevy transform with unit scale; the height lives in the mesh, not in the scale.
	pub fn to_transform(&self) -> Transform {
		Transform { translation: self.position, rotation: self.orientation, scale: Vec3::ONE }
	}

	/// The local up axis carried into world space.
	pub fn axis(&self) -> Vec3 {
		self.orientation * Vec3::Y
	}
}

/// Rotation that maps +Y onto the direction of `ray`.
///
/// Zero-length rays and rays along +Y get the identity, rays along -Y a half turn around X.
/// The angle is `acos(up . direction)`, taken through `atan2` so that nearly vertical
/// segments keep their tilt.
fn orientation_for(ray: Vec3) -> Quat {
	let Some(direction) = ray.try_normalize() else {
		return Quat::IDENTITY;
	};

	let cos_angle = Vec3::Y.dot(direction);
	let cross = Vec3::Y.cross(direction);
	let sin_angle = cross.length();

	if sin_angle < PARALLEL_TOLERANCE {
		return if cos_angle > 0.0 { Quat::IDENTITY } else { Quat::from_rotation_x(PI) };
	}

	Quat::from_axis_angle(cross / sin_angle, sin_angle.atan2(cos_angle))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_maps_up_onto(start: Vec3, end: Vec3) {
		let transform = SegmentTransform::build(start, end);
		let expected = (end - start).normalize();
		assert!(
			transform.axis().abs_diff_eq(expected, 1e-5),
			"{:?} -> {:?}: got axis {:?}",
			start,
			end,
			transform.axis()
		);
	}

	#[test]
	fn test_vertical_segment_keeps_identity() {
		let transform = SegmentTransform::build(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0));
		assert_eq!(transform.height, 10.0);
		assert_eq!(transform.position, Vec3::new(0.0, 5.0, 0.0));
		assert_eq!(transform.orientation, Quat::IDENTITY);
	}

	#[test]
	fn test_degenerate_segment_has_defined_orientation() {
		let transform = SegmentTransform::build(Vec3::ZERO, Vec3::ZERO);
		assert_eq!(transform.height, 0.0);
		assert_eq!(transform.orientation, Quat::IDENTITY);
		assert!(transform.position.is_finite());

		let matrix = Mat4::from_rotation_translation(transform.orientation, transform.position);
		assert!(matrix.is_finite());
	}

	#[test]
	fn test_downward_segment_is_flipped() {
		let start = Vec3::new(1.0, 4.0, -2.0);
		let end = Vec3::new(1.0, -6.0, -2.0);
		let transform = SegmentTransform::build(start, end);
		assert!(transform.orientation.is_finite());
		assert_maps_up_onto(start, end);
	}

	#[test]
	fn test_orientation_maps_up_onto_direction() {
		let cases = [
			(Vec3::ZERO, Vec3::X),
			(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0)),
			(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 9.0)),
			(Vec3::new(-2.0, -2.0, -2.0), Vec3::new(3.0, 7.0, 1.0)),
			(Vec3::ZERO, Vec3::new(1e-3, 5.0, 0.0)),
		];
		for (start, end) in cases {
			assert_maps_up_onto(start, end);
		}
	}

	#[test]
	fn test_height_is_endpoint_distance() {
		let start = Vec3::new(1.0, 2.0, 3.0);
		let end = Vec3::new(4.0, 6.0, 3.0);
		let transform = SegmentTransform::build(start, end);
		assert_eq!(transform.height, (end - start).length());
		assert_eq!(transform.height, 5.0);
		assert_eq!(transform.position, Vec3::new(2.5, 4.0, 3.0));
	}

	#[test]
	fn test_placed_frustum_ends_touch_endpoints() {
		let start = Vec3::new(-1.0, 0.5, 2.0);
		let end = Vec3::new(3.0, -2.0, 0.0);
		let transform = SegmentTransform::build(start, end).to_transform();
		let half = (end - start).length() * 0.5;

		let bottom = transform.transform_point(Vec3::new(0.0, -half, 0.0));
		let top = transform.transform_point(Vec3::new(0.0, half, 0.0));
		assert!(bottom.abs_diff_eq(start, 1e-5));
		assert!(top.abs_diff_eq(end, 1e-5));
	}
}
