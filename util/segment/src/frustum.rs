use bevy::prelude::*;

/// Radial subdivisions of a frustum mesh.
pub const DEFAULT_RESOLUTION: u32 = 32;

/// Hits closer than this along the ray are ignored.
const HIT_EPSILON: f32 = 1e-5;

/// A conical frustum in its local frame: axis along +Y, centered on the origin,
/// `base_radius` at `y = -height / 2` and `top_radius` at `y = height / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumGeometry {
	pub base_radius: f32,
	pub top_radius: f32,
	pub height: f32,
	pub resolution: u32,
}

impl FrustumGeometry {
	pub fn new(base_radius: f32, top_radius: f32, height: f32) -> Self {
		Self { base_radius, top_radius, height, resolution: DEFAULT_RESOLUTION }
	}

	pub fn with_resolution(mut self, resolution: u32) -> Self {
		self.resolution = resolution;
		self
	}

	pub fn half_height(&self) -> f32 {
		self.height * 0.5
	}

	/// Radius of the cross-section at local `y`, clamped to the frustum's extent.
	pub fn radius_at(&self, y: f32) -> f32 {
		if self.height <= f32::EPSILON {
			return self.base_radius.max(self.top_radius);
		}
		let s = ((y + self.half_height()) / self.height).clamp(0.0, 1.0);
		self.base_radius * (1.0 - s) + self.top_radius * s
	}

	/// Radius of a sphere around the local origin that encloses the whole frustum.
	pub fn bounding_radius(&self) -> f32 {
		let widest = self.base_radius.max(self.top_radius);
		(self.half_height() * self.half_height() + widest * widest).sqrt()
	}

	/// Distance along a local-space ray to the first point of the closed frustum surface.
	///
	/// The direction of `ray` is unit length, so the returned value is a true distance.
	pub fn ray_distance(&self, ray: Ray3d) -> Option<f32> {
		let origin = ray.origin;
		let direction = *ray.direction;

		if !self.bounding_sphere_hit(origin, direction) {
			return None;
		}

		let half = self.half_height();
		let [near, far] = self.lateral_hits(origin, direction);
		let base = cap_hit(origin, direction, -half, self.base_radius);
		let top = cap_hit(origin, direction, half, self.top_radius);

		[near, far, base, top]
			.into_iter()
			.flatten()
			.filter(|t| *t > HIT_EPSILON)
			.min_by(f32::total_cmp)
	}

	fn bounding_sphere_hit(&self, origin: Vec3, direction: Vec3) -> bool {
		let radius = self.bounding_radius();
		let along = -origin.dot(direction);
		let closest = origin + direction * along;
		if closest.length_squared() > radius * radius {
			return false;
		}
		// the sphere may still be entirely behind the ray origin
		along >= 0.0 || origin.length_squared() <= radius * radius
	}

	/// Intersections with the slanted side, `x² + z² = r(y)²` for `|y| <= h / 2`.
	fn lateral_hits(&self, origin: Vec3, direction: Vec3) -> [Option<f32>; 2] {
		if self.height <= f32::EPSILON {
			return [None, None];
		}

		let half = self.half_height();
		let slope = (self.top_radius - self.base_radius) / self.height;
		let mid_radius = (self.base_radius + self.top_radius) * 0.5;
		let radius_at_origin = mid_radius + slope * origin.y;

		let a = direction.x * direction.x + direction.z * direction.z
			- slope * slope * direction.y * direction.y;
		let b = 2.0
			* (origin.x * direction.x + origin.z * direction.z
				- slope * direction.y * radius_at_origin);
		let c = origin.x * origin.x + origin.z * origin.z - radius_at_origin * radius_at_origin;

		let within = |t: f32| {
			let y = origin.y + t * direction.y;
			(y.abs() <= half).then_some(t)
		};

		if a.abs() < 1e-9 {
			if b.abs() < 1e-9 {
				return [None, None];
			}
			return [within(-c / b), None];
		}

		let discriminant = b * b - 4.0 * a * c;
		if discriminant < 0.0 {
			return [None, None];
		}
		let root = discriminant.sqrt();
		[within((-b - root) / (2.0 * a)), within((-b + root) / (2.0 * a))]
	}
}

/// Intersection with the flat disc of `radius` at local height `y`.
fn cap_hit(origin: Vec3, direction: Vec3, y: f32, radius: f32) -> Option<f32> {
	if direction.y.abs() < f32::EPSILON {
		return None;
	}
	let t = (y - origin.y) / direction.y;
	let point = origin + direction * t;
	(point.x * point.x + point.z * point.z <= radius * radius).then_some(t)
}
