//! The command bar stands in for an input form: a line of text typed into the HUD.
//!
//! - `x1 y1 z1 x2 y2 z2 [base [top]]` (optionally prefixed with `add`) creates a segment
//! - `r <base> <top>` (or `radius`) changes the radii of the latest segment
//!
//! Values may be separated by spaces or commas.

use crate::segments::{CreateSegment, EditRadii, RadiusInput};
use bevy::prelude::*;
use segment::RawRadius;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
	#[error("nothing to do")]
	Empty,
	#[error("unknown command `{0}`")]
	UnknownCommand(String),
	#[error("`{command}` expects {expected} values, got {got}")]
	Arity { command: &'static str, expected: &'static str, got: usize },
	#[error("`{0}` is not a coordinate")]
	Coordinate(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	Create { start: Vec3, end: Vec3, base_radius: Option<RawRadius>, top_radius: Option<RawRadius> },
	Radii { base_radius: RawRadius, top_radius: RawRadius },
}

/// What a command turns into once the radius fields have been consulted.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
	Create(CreateSegment),
	Edit(EditRadii),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
	let tokens: Vec<&str> =
		line.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()).collect();

	let Some((first, rest)) = tokens.split_first() else {
		return Err(CommandError::Empty);
	};

	match first.to_ascii_lowercase().as_str() {
		"r" | "radius" => parse_radii(rest),
		"add" => parse_create(rest),
		_ if parse_coordinate(first).is_ok() => parse_create(&tokens),
		_ => Err(CommandError::UnknownCommand(String::from(*first))),
	}
}

fn parse_radii(tokens: &[&str]) -> Result<Command, CommandError> {
	match tokens {
		[base, top] => Ok(Command::Radii { base_radius: (*base).into(), top_radius: (*top).into() }),
		_ => Err(CommandError::Arity { command: "radius", expected: "2", got: tokens.len() }),
	}
}

fn parse_create(tokens: &[&str]) -> Result<Command, CommandError> {
	if !(6..=8).contains(&tokens.len()) {
		return Err(CommandError::Arity { command: "add", expected: "6 to 8", got: tokens.len() });
	}

	let mut coordinates = [0.0_f32; 6];
	for (slot, token) in coordinates.iter_mut().zip(tokens) {
		*slot = parse_coordinate(token)?;
	}

	Ok(Command::Create {
		start: Vec3::new(coordinates[0], coordinates[1], coordinates[2]),
		end: Vec3::new(coordinates[3], coordinates[4], coordinates[5]),
		base_radius: tokens.get(6).map(|t| (*t).into()),
		top_radius: tokens.get(7).map(|t| (*t).into()),
	})
}

fn parse_coordinate(token: &str) -> Result<f32, CommandError> {
	token
		.parse::<f32>()
		.ok()
		.filter(|value| value.is_finite())
		.ok_or_else(|| CommandError::Coordinate(token.to_string()))
}

impl Command {
	/// Resolves the command against the radius fields, updating them with anything it sets.
	pub fn into_request(self, input: &mut RadiusInput) -> Request {
		match self {
			Command::Create { start, end, base_radius, top_radius } => {
				if let Some(base_radius) = base_radius {
					input.base_radius = base_radius;
				}
				if let Some(top_radius) = top_radius {
					input.top_radius = top_radius;
				}
				Request::Create(CreateSegment {
					start,
					end,
					base_radius: input.base_radius.clone(),
					top_radius: input.top_radius.clone(),
				})
			}
			Command::Radii { base_radius, top_radius } => {
				input.base_radius = base_radius;
				input.top_radius = top_radius;
				Request::Edit(input.edit())
			}
		}
	}
}
