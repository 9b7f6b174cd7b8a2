use crate::frustum::FrustumGeometry;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// Owner of the mesh resources backing segments.
///
/// The registry never touches meshes directly; it asks the owner to create one for a given
/// frustum and to release one it no longer needs.
pub trait GeometryAssets {
	type Handle: Clone;

	/// Builds a mesh resource for the frustum and returns a handle to it.
	fn create(&mut self, geometry: &FrustumGeometry) -> Self::Handle;

	/// Frees the resource behind `handle`. The handle must not be used afterwards.
	fn release(&mut self, handle: &Self::Handle);
}

/// Builds the render mesh for a frustum: axis along +Y, centered on the origin.
///
/// A frustum without height becomes a flat disc of the wider radius facing +Y.
pub fn frustum_mesh(geometry: &FrustumGeometry) -> Mesh {
	if geometry.height <= f32::EPSILON {
		return Circle::new(geometry.base_radius.max(geometry.top_radius))
			.mesh()
			.resolution(geometry.resolution)
			.build()
			.rotated_by(Quat::from_rotation_x(-FRAC_PI_2));
	}

	ConicalFrustum {
		radius_top: geometry.top_radius,
		radius_bottom: geometry.base_radius,
		height: geometry.height,
	}
	.mesh()
	.resolution(geometry.resolution)
	.build()
}

impl GeometryAssets for Assets<Mesh> {
	type Handle = Handle<Mesh>;

	fn create(&mut self, geometry: &FrustumGeometry) -> Handle<Mesh> {
		log::debug!("Adding frustum mesh to assets: {:?}", geometry);
		self.add(frustum_mesh(geometry))
	}

	fn release(&mut self, handle: &Handle<Mesh>) {
		if self.remove(handle.id()).is_none() {
			log::warn!("Released mesh {:?} was already gone", handle.id());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bevy::camera::primitives::MeshAabb;

	fn normals(mesh: &Mesh) -> Vec<[f32; 3]> {
		mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
			.and_then(|values| values.as_float3())
			.map(<[[f32; 3]]>::to_vec)
			.unwrap_or_default()
	}

	#[test]
	fn test_assets_release_removes_the_mesh() {
		let mut meshes = Assets::<Mesh>::default();
		let geometry = FrustumGeometry::new(1.0, 0.5, 4.0);

		let handle = meshes.create(&geometry);
		assert!(meshes.get(&handle).is_some());

		meshes.release(&handle);
		assert!(meshes.get(&handle).is_none());
	}

	#[test]
	fn test_frustum_mesh_spans_the_height() {
		let geometry = FrustumGeometry::new(2.0, 1.0, 6.0).with_resolution(8);
		let mesh = frustum_mesh(&geometry);
		let aabb = mesh.compute_aabb().unwrap();
		assert!((aabb.min().y + 3.0).abs() < 1e-5);
		assert!((aabb.max().y - 3.0).abs() < 1e-5);
	}

	#[test]
	fn test_zero_height_builds_a_flat_disc() {
		for (base, top) in [(1.0, 1.0), (1.0, 2.0)] {
			let geometry = FrustumGeometry::new(base, top, 0.0).with_resolution(8);
			let mesh = frustum_mesh(&geometry);

			let normals = normals(&mesh);
			assert!(!normals.is_empty());
			for normal in normals {
				assert!(Vec3::from_array(normal).is_finite(), "non-finite normal {normal:?}");
				assert!(Vec3::from_array(normal).abs_diff_eq(Vec3::Y, 1e-5));
			}

			let positions = mesh
				.attribute(Mesh::ATTRIBUTE_POSITION)
				.and_then(|values| values.as_float3())
				.unwrap();
			let widest = positions.iter().map(|p| Vec3::from_array(*p).length()).fold(0.0, f32::max);
			assert!((widest - top.max(base)).abs() < 1e-5);
			assert!(positions.iter().all(|p| p[1].abs() < 1e-5));
		}
	}

	#[test]
	fn test_frustum_mesh_normals_are_finite() {
		let mesh = frustum_mesh(&FrustumGeometry::new(2.0, 0.5, 3.0).with_resolution(8));
		assert!(normals(&mesh).iter().all(|normal| Vec3::from_array(*normal).is_finite()));
	}
}
