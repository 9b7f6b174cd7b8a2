use bevy::prelude::*;

mod camera;
pub mod command;
pub mod config;
mod picking;
mod scene;
pub mod segments;
mod ui;

pub use camera::OrbitCamera;
pub use config::{ConfigError, SceneConfig};

use picking::{FrameState, PointerState};
use segment::Picker;
use segments::{CreateSegment, EditRadii, RadiusInput, Segments};
use ui::{ClickTracker, CommandBuffer};

/// Colors resolved once from the scene config.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Palette {
	pub segment: Color,
	pub highlight: Color,
	pub grid: Color,
	pub label: Color,
}

impl From<&config::PaletteConfig> for Palette {
	fn from(palette: &config::PaletteConfig) -> Self {
		Self {
			segment: palette.segment.0,
			highlight: palette.highlight.0,
			grid: palette.grid.0,
			label: palette.label.0,
		}
	}
}

pub struct SegmentsPlugin {
	pub config: SceneConfig,
}

impl Plugin for SegmentsPlugin {
	fn build(&self, app: &mut App) {
		app.insert_resource(ClearColor(self.config.palette.background.0))
			.insert_resource(Palette::from(&self.config.palette))
			.insert_resource(self.config.clone())
			.insert_resource(Segments::default())
			.init_resource::<Picker>()
			.init_resource::<PointerState>()
			.init_resource::<FrameState>()
			.init_resource::<RadiusInput>()
			.init_resource::<CommandBuffer>()
			.init_resource::<ClickTracker>()
			.add_message::<CreateSegment>()
			.add_message::<EditRadii>()
			.add_systems(
				Startup,
				(
					camera::setup_camera,
					scene::setup_lighting,
					ui::setup_labels,
					ui::setup_command_bar,
					segments::queue_configured_segments,
				),
			)
			.add_systems(
				Update,
				(
					camera::orbit_camera,
					picking::track_pointer,
					ui::read_command_input,
					segments::nudge_radii,
					segments::create_segments,
					segments::edit_radii,
					picking::pick_segments,
					ui::update_labels,
					ui::update_command_bar,
					ui::open_details_on_click,
					ui::close_details,
					scene::draw_grid,
				)
					.chain(),
			);
	}
}
