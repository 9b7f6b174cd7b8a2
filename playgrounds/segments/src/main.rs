use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;
use segments_playground::{SceneConfig, SegmentsPlugin};
use std::path::PathBuf;

/// Draw segments as tapered cylinders and inspect them with the mouse.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
	/// Scene file (TOML) with camera, palette and initial segments.
	#[arg(long)]
	config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => SceneConfig::load(path)
			.with_context(|| format!("could not load scene from {}", path.display()))?,
		None => SceneConfig::default(),
	};

	println!("Starting segments playground with {} initial segments", config.segments.len());

	let window = &config.window;
	let primary_window = Window {
		title: window.title.clone(),
		resolution: (window.width, window.height).into(),
		..default()
	};

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(primary_window),
			..default()
		}))
		.add_plugins(SegmentsPlugin { config })
		.run();

	Ok(())
}
