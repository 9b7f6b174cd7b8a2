pub mod frame;
pub mod frustum;
pub mod mesh;
pub mod picker;
pub mod projector;
pub mod radius;
pub mod registry;
pub mod transform;

pub use frame::{tick, Endpoint, EndpointLabel, FrameOutput, LabelUpdate};
pub use frustum::FrustumGeometry;
pub use mesh::{frustum_mesh, GeometryAssets};
pub use picker::{nearest_hit, HighlightChange, HighlightState, Picker, SegmentHit};
pub use projector::{project, CameraState, ScreenProjector, Viewport};
pub use radius::{sanitize_radius, RawRadius, DEFAULT_RADIUS, MAX_RADIUS, MIN_RADIUS};
pub use registry::{Segment, SegmentDetails, SegmentId, SegmentRegistry};
pub use transform::SegmentTransform;

// Typical use from a render loop:
// - keep a SegmentRegistry<G> and a Picker somewhere long-lived
// - add segments / edit radii through the registry with your GeometryAssets
// - once per frame call tick with the last pointer position and a ScreenProjector,
//   then apply FrameOutput::change to materials and FrameOutput::labels to the overlay
