use bevy::prelude::*;

/// View-space distance under which a point counts as the eye position.
const EYE_EPSILON: f32 = 1e-4;

/// The screen rectangle a camera renders into, in logical pixels with Y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
	pub left: f32,
	pub top: f32,
	pub width: f32,
	pub height: f32,
}

impl Viewport {
	pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
		Self { left, top, width, height }
	}

	pub fn from_rect(rect: Rect) -> Self {
		Self::new(rect.min.x, rect.min.y, rect.width(), rect.height())
	}

	pub fn center(&self) -> Vec2 {
		Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
	}

	pub fn aspect_ratio(&self) -> f32 {
		if self.height > 0.0 {
			self.width / self.height
		} else {
			1.0
		}
	}

	/// Maps normalized device coordinates (Y up) to pixels (Y down).
	pub fn ndc_to_pixel(&self, ndc: Vec2) -> Vec2 {
		Vec2::new(
			(ndc.x * 0.5 + 0.5) * self.width + self.left,
			(-ndc.y * 0.5 + 0.5) * self.height + self.top,
		)
	}

	/// Maps a pixel position (e.g. the cursor) to normalized device coordinates.
	pub fn pointer_to_ndc(&self, pixel: Vec2) -> Vec2 {
		if self.width <= 0.0 || self.height <= 0.0 {
			return Vec2::ZERO;
		}
		Vec2::new(
			(pixel.x - self.left) / self.width * 2.0 - 1.0,
			-((pixel.y - self.top) / self.height) * 2.0 + 1.0,
		)
	}
}

/// The two matrices that describe a camera: its placement and its projection.
///
/// Any perspective projection works as long as NDC depth 0.5 maps to a finite point, which holds
/// for both reverse-Z infinite projections and `Mat4::perspective_rh`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
	pub world_from_view: Mat4,
	pub clip_from_view: Mat4,
}

impl CameraState {
	pub fn new(world_from_view: Mat4, clip_from_view: Mat4) -> Self {
		Self { world_from_view, clip_from_view }
	}

	/// A right-handed perspective camera placed by `transform`.
	pub fn perspective(
		transform: Transform,
		fov_y: f32,
		aspect_ratio: f32,
		near: f32,
		far: f32,
	) -> Self {
		Self::new(
			Mat4::from_rotation_translation(transform.rotation, transform.translation),
			Mat4::perspective_rh(fov_y, aspect_ratio, near, far),
		)
	}

	pub fn position(&self) -> Vec3 {
		self.world_from_view.w_axis.truncate()
	}

	/// Projects a world point to normalized device coordinates.
	///
	/// The eye itself has no projection (its clip `w` is zero); it is placed at the center of
	/// the screen instead of producing NaN.
	pub fn world_to_ndc(&self, point: Vec3) -> Vec3 {
		let view = self.world_from_view.inverse().transform_point3(point);
		if view.length_squared() < EYE_EPSILON * EYE_EPSILON {
			return Vec3::ZERO;
		}

		let clip = self.clip_from_view * view.extend(1.0);
		if clip.w.abs() < f32::EPSILON {
			return clip.truncate();
		}
		clip.truncate() / clip.w
	}

	/// The pick ray from the eye through the given NDC position.
	pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray3d> {
		let world_from_clip = self.world_from_view * self.clip_from_view.inverse();
		let through = world_from_clip.project_point3(ndc.extend(0.5));
		let origin = self.position();
		let direction = Dir3::new(through - origin).ok()?;
		Some(Ray3d::new(origin, direction))
	}
}

/// Maps a world point onto the viewport, in pixels.
pub fn project(point: Vec3, camera: &CameraState, viewport: &Viewport) -> Vec2 {
	viewport.ndc_to_pixel(camera.world_to_ndc(point).truncate())
}

/// A camera paired with the viewport it renders to, for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjector {
	pub camera: CameraState,
	pub viewport: Viewport,
}

impl ScreenProjector {
	pub fn new(camera: CameraState, viewport: Viewport) -> Self {
		Self { camera, viewport }
	}

	pub fn project(&self, point: Vec3) -> Vec2 {
		project(point, &self.camera, &self.viewport)
	}

	/// Pick ray for a pointer given in NDC.
	pub fn ray_from_pointer(&self, pointer_ndc: Vec2) -> Option<Ray3d> {
		self.camera.ray_from_ndc(pointer_ndc)
	}
}
