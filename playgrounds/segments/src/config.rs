use bevy::prelude::*;
use segment::RawRadius;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read scene config {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse scene config {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// Everything the playground reads from its scene file. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Resource)]
#[serde(default)]
pub struct SceneConfig {
	pub window: WindowConfig,
	pub camera: CameraConfig,
	pub palette: PaletteConfig,
	pub lighting: LightingConfig,
	pub grid: GridConfig,
	pub segments: Vec<SegmentConfig>,
}

impl SceneConfig {
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
		let config = Self::parse(&text, path)?;
		log::info!("Loaded scene config {} with {} segments", path.display(), config.segments.len());
		Ok(config)
	}

	pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
		toml::from_str(text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
	pub title: String,
	pub width: u32,
	pub height: u32,
}

impl Default for WindowConfig {
	fn default() -> Self {
		Self { title: "Segments Playground".to_string(), width: 1280, height: 720 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	pub position: [f32; 3],
	pub target: [f32; 3],
	pub fov_degrees: f32,
	pub near: f32,
	pub far: f32,
	/// Radians of orbit per pixel of mouse drag.
	pub sensitivity: f32,
	/// Fraction of the distance covered per scroll line.
	pub zoom_speed: f32,
	/// Share of the remaining motion applied per 60 Hz frame.
	pub damping: f32,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			position: [0.0, 5.0, 15.0],
			target: [0.0, 0.0, 0.0],
			fov_degrees: 75.0,
			near: 0.1,
			far: 100.0,
			sensitivity: 0.005,
			zoom_speed: 0.1,
			damping: 0.05,
		}
	}
}

/// A color written as a hex string (`"#00ffff"`, `"0ff"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(pub Color);

impl TryFrom<String> for HexColor {
	type Error = String;

	fn try_from(text: String) -> Result<Self, Self::Error> {
		Srgba::hex(&text)
			.map(|color| HexColor(color.into()))
			.map_err(|err| format!("invalid color `{text}`: {err}"))
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
	pub background: HexColor,
	pub segment: HexColor,
	pub highlight: HexColor,
	pub grid: HexColor,
	pub label: HexColor,
}

impl Default for PaletteConfig {
	fn default() -> Self {
		Self {
			background: HexColor(Color::BLACK),
			segment: HexColor(Color::srgb_u8(0x00, 0xff, 0xff)),
			highlight: HexColor(Color::srgb_u8(0xff, 0x00, 0x00)),
			grid: HexColor(Color::srgb_u8(0x88, 0x88, 0x88)),
			label: HexColor(Color::WHITE),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
	pub ambient_brightness: f32,
	pub directional_illuminance: f32,
	pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
	fn default() -> Self {
		Self {
			ambient_brightness: 400.0,
			directional_illuminance: 4000.0,
			directional_position: [5.0, 5.0, 5.0],
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
	/// Side length of the square grid.
	pub size: f32,
	/// Cells per side.
	pub divisions: u32,
}

impl Default for GridConfig {
	fn default() -> Self {
		Self { size: 20.0, divisions: 20 }
	}
}

/// A segment created as soon as the scene starts.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentConfig {
	pub start: [f32; 3],
	pub end: [f32; 3],
	#[serde(default)]
	pub base_radius: RawRadius,
	#[serde(default)]
	pub top_radius: RawRadius,
}

impl SegmentConfig {
	pub fn start(&self) -> Vec3 {
		Vec3::from_array(self.start)
	}

	pub fn end(&self) -> Vec3 {
		Vec3::from_array(self.end)
	}
}
