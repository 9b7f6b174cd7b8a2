use crate::frustum::FrustumGeometry;
use crate::mesh::GeometryAssets;
use crate::radius::RawRadius;
use crate::transform::SegmentTransform;
use bevy::prelude::*;
use std::fmt;

/// Position of a segment in its registry. Segments are never removed, so ids stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(usize);

impl SegmentId {
	pub fn new(index: usize) -> Self {
		Self(index)
	}

	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for SegmentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "segment#{}", self.0)
	}
}

/// A placed segment and the mesh resource it owns.
#[derive(Debug, Clone)]
pub struct Segment<G> {
	id: SegmentId,
	start: Vec3,
	end: Vec3,
	base_radius: f32,
	top_radius: f32,
	transform: SegmentTransform,
	geometry: G,
}

impl<G> Segment<G> {
	pub fn id(&self) -> SegmentId {
		self.id
	}

	pub fn start(&self) -> Vec3 {
		self.start
	}

	pub fn end(&self) -> Vec3 {
		self.end
	}

	pub fn base_radius(&self) -> f32 {
		self.base_radius
	}

	pub fn top_radius(&self) -> f32 {
		self.top_radius
	}

	pub fn height(&self) -> f32 {
		self.transform.height
	}

	pub fn transform(&self) -> &SegmentTransform {
		&self.transform
	}

	/// Handle to the mesh resource currently backing this segment.
	pub fn geometry(&self) -> &G {
		&self.geometry
	}

	pub fn frustum(&self) -> FrustumGeometry {
		FrustumGeometry::new(self.base_radius, self.top_radius, self.transform.height)
	}

	/// Distance along a world-space ray to this segment's surface.
	pub fn ray_distance(&self, ray: Ray3d) -> Option<f32> {
		let inverse = self.transform.orientation.inverse();
		let local =
			Ray3d::new(inverse * (ray.origin - self.transform.position), inverse * ray.direction);
		self.frustum().ray_distance(local)
	}

	pub fn details(&self) -> SegmentDetails {
		SegmentDetails {
			start: self.start,
			end: self.end,
			base_radius: self.base_radius,
			top_radius: self.top_radius,
			height: self.transform.height,
		}
	}
}

/// Everything a details view shows about one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDetails {
	pub start: Vec3,
	pub end: Vec3,
	pub base_radius: f32,
	pub top_radius: f32,
	pub height: f32,
}

impl SegmentDetails {
	pub fn lines(&self) -> [String; 5] {
		[
			format!("Starting coordinate {}", format_point(self.start)),
			format!("Ending coordinate {}", format_point(self.end)),
			format!("Base radius {}", self.base_radius),
			format!("Top radius {}", self.top_radius),
			format!("Height {}", self.height),
		]
	}
}

impl fmt::Display for SegmentDetails {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.lines().join("\n"))
	}
}

/// `(x, y, z)` with the shortest float formatting, so `1.0` prints as `1`.
pub fn format_point(point: Vec3) -> String {
	format!("({}, {}, {})", point.x, point.y, point.z)
}

/// Append-only collection of segments plus the one that radius edits apply to.
#[derive(Resource, Debug)]
pub struct SegmentRegistry<G> {
	segments: Vec<Segment<G>>,
	active: Option<SegmentId>,
}

impl<G> Default for SegmentRegistry<G> {
	fn default() -> Self {
		Self { segments: Vec::new(), active: None }
	}
}

impl<G> SegmentRegistry<G> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a segment from raw inputs and makes it the active one.
	pub fn add<A>(
		&mut self,
		start: Vec3,
		end: Vec3,
		base_radius: impl Into<RawRadius>,
		top_radius: impl Into<RawRadius>,
		assets: &mut A,
	) -> SegmentId
	where
		A: GeometryAssets<Handle = G>,
	{
		let base_radius = base_radius.into().sanitize();
		let top_radius = top_radius.into().sanitize();
		let transform = SegmentTransform::build(start, end);
		let geometry = assets.create(&FrustumGeometry::new(base_radius, top_radius, transform.height));

		let id = SegmentId(self.segments.len());
		self.segments.push(Segment { id, start, end, base_radius, top_radius, transform, geometry });
		self.active = Some(id);

		log::info!(
			"Created {} from {:?} to {:?} (base {}, top {}, height {})",
			id,
			start,
			end,
			base_radius,
			top_radius,
			transform.height
		);
		id
	}

	/// Replaces the radii of the active segment and regenerates its mesh.
	///
	/// Endpoints and height are left alone. Returns `None` when nothing has been created yet.
	pub fn update_active_radii<A>(
		&mut self,
		base_radius: impl Into<RawRadius>,
		top_radius: impl Into<RawRadius>,
		assets: &mut A,
	) -> Option<SegmentId>
	where
		A: GeometryAssets<Handle = G>,
	{
		let id = self.active?;
		let segment = self.segments.get_mut(id.0)?;

		segment.base_radius = base_radius.into().sanitize();
		segment.top_radius = top_radius.into().sanitize();

		let geometry = assets.create(&segment.frustum());
		let previous = std::mem::replace(&mut segment.geometry, geometry);
		assets.release(&previous);

		log::debug!("Updated {} radii to base {}, top {}", id, segment.base_radius, segment.top_radius);
		Some(id)
	}

	/// All segments in insertion order. The iterator can be cloned to walk them again.
	pub fn iter(&self) -> std::slice::Iter<'_, Segment<G>> {
		self.segments.iter()
	}

	pub fn get(&self, id: SegmentId) -> Option<&Segment<G>> {
		self.segments.get(id.0)
	}

	pub fn active_id(&self) -> Option<SegmentId> {
		self.active
	}

	pub fn active(&self) -> Option<&Segment<G>> {
		self.active.and_then(|id| self.get(id))
	}

	pub fn details(&self, id: SegmentId) -> Option<SegmentDetails> {
		self.get(id).map(Segment::details)
	}

	pub fn len(&self) -> usize {
		self.segments.len()
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}
}

impl<'a, G> IntoIterator for &'a SegmentRegistry<G> {
	type Item = &'a Segment<G>;
	type IntoIter = std::slice::Iter<'a, Segment<G>>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
