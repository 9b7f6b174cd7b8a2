use crate::command::{parse_command, Request};
use crate::picking::{FrameState, PointerState};
use crate::segments::{CreateSegment, EditRadii, RadiusInput, Segments};
use crate::Palette;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use segment::{Endpoint, LabelUpdate, SegmentDetails};

/// Labels sit this far right of and above the point they describe.
const LABEL_OFFSET: Vec2 = Vec2::new(8.0, -24.0);

/// A press and release closer than this many pixels count as a click rather than an orbit drag.
const CLICK_SLOP: f32 = 4.0;

const HELP: &str = "x1 y1 z1 x2 y2 z2 [base [top]] to add, r <base> <top> to resize, arrows to nudge";

#[derive(Component, Debug, Clone, Copy)]
pub struct EndpointLabelNode(pub Endpoint);

#[derive(Component)]
pub struct CommandBarText;

#[derive(Component)]
pub struct DetailsPopup;

#[derive(Component)]
pub struct CloseButton;

pub fn setup_labels(mut commands: Commands, palette: Res<Palette>) {
	for endpoint in [Endpoint::Start, Endpoint::End] {
		commands.spawn((
			Node { position_type: PositionType::Absolute, ..default() },
			Text::new(endpoint.caption()),
			TextFont { font_size: 16.0, ..default() },
			TextColor(palette.label),
			Visibility::Hidden,
			EndpointLabelNode(endpoint),
		));
	}
}

pub fn update_labels(
	frame: Res<FrameState>,
	mut labels: Query<(&EndpointLabelNode, &mut Node, &mut Text, &mut Visibility)>,
) {
	for (label_node, mut node, mut text, mut visibility) in &mut labels {
		let LabelUpdate::Show { start, end } = &frame.0.labels else {
			*visibility = Visibility::Hidden;
			continue;
		};

		let label = match label_node.0 {
			Endpoint::Start => start,
			Endpoint::End => end,
		};
		let position = label.pixel + LABEL_OFFSET;
		node.left = Val::Px(position.x);
		node.top = Val::Px(position.y);
		text.0 = label.text();
		*visibility = Visibility::Visible;
	}
}

/// The line being typed into the command bar and the outcome of the last one.
#[derive(Resource, Debug, Clone, Default)]
pub struct CommandBuffer {
	pub text: String,
	pub status: String,
}

impl CommandBuffer {
	/// Parses and clears the current line. Errors end up in the status line.
	pub fn submit(&mut self, input: &mut RadiusInput) -> Option<Request> {
		let line = std::mem::take(&mut self.text);
		match parse_command(&line) {
			Ok(command) => {
				let request = command.into_request(input);
				self.status = match &request {
					Request::Create(create) => {
						format!("added segment {} -> {}", create.start, create.end)
					}
					Request::Edit(_) => "resized the latest segment".to_string(),
				};
				Some(request)
			}
			Err(err) => {
				log::warn!("Rejected command `{}`: {}", line.trim(), err);
				self.status = err.to_string();
				None
			}
		}
	}
}

pub fn setup_command_bar(mut commands: Commands, palette: Res<Palette>) {
	log::info!("Setting up command bar");

	commands
		.spawn((
			Node {
				position_type: PositionType::Absolute,
				bottom: Val::Px(10.0),
				left: Val::Px(10.0),
				padding: UiRect::all(Val::Px(10.0)),
				..default()
			},
			BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
		))
		.with_children(|parent| {
			parent.spawn((
				Text::new(format!("> \n{HELP}")),
				TextFont { font_size: 18.0, ..default() },
				TextColor(palette.label),
				CommandBarText,
			));
		});
}

pub fn read_command_input(
	mut keyboard: MessageReader<KeyboardInput>,
	mut buffer: ResMut<CommandBuffer>,
	mut radius_input: ResMut<RadiusInput>,
	mut creates: MessageWriter<CreateSegment>,
	mut edits: MessageWriter<EditRadii>,
) {
	for event in keyboard.read() {
		if event.state != ButtonState::Pressed {
			continue;
		}

		match &event.logical_key {
			Key::Enter => match buffer.submit(&mut radius_input) {
				Some(Request::Create(create)) => {
					creates.write(create);
				}
				Some(Request::Edit(edit)) => {
					edits.write(edit);
				}
				None => {}
			},
			Key::Backspace => {
				buffer.text.pop();
			}
			Key::Space => buffer.text.push(' '),
			Key::Character(characters) => {
				buffer.text.extend(characters.chars().filter(|c| !c.is_control()));
			}
			_ => {}
		}
	}
}

pub fn update_command_bar(
	buffer: Res<CommandBuffer>,
	mut texts: Query<&mut Text, With<CommandBarText>>,
) {
	if !buffer.is_changed() {
		return;
	}
	let Ok(mut text) = texts.single_mut() else {
		return;
	};

	let status = if buffer.status.is_empty() { HELP } else { buffer.status.as_str() };
	text.0 = format!("> {}\n{}", buffer.text, status);
}

/// Where the left button went down, if that press may still become a click.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ClickTracker {
	pressed_at: Option<Vec2>,
}

impl ClickTracker {
	pub fn press(&mut self, pixel: Option<Vec2>) {
		self.pressed_at = pixel;
	}

	/// Ends the press and reports whether it was a click.
	pub fn release(&mut self, pixel: Option<Vec2>) -> bool {
		match (self.pressed_at.take(), pixel) {
			(Some(pressed), Some(released)) => pressed.distance(released) <= CLICK_SLOP,
			_ => false,
		}
	}
}

pub fn open_details_on_click(
	mut commands: Commands,
	mouse_buttons: Res<ButtonInput<MouseButton>>,
	pointer: Res<PointerState>,
	frame: Res<FrameState>,
	registry: Res<Segments>,
	palette: Res<Palette>,
	mut clicks: ResMut<ClickTracker>,
	popups: Query<(), With<DetailsPopup>>,
) {
	// presses that land while a popup is open belong to the popup
	if mouse_buttons.just_pressed(MouseButton::Left) {
		clicks.press(if popups.is_empty() { pointer.pixel } else { None });
	}
	if !mouse_buttons.just_released(MouseButton::Left) || !clicks.release(pointer.pixel) {
		return;
	}

	let Some(details) = frame.0.highlighted.and_then(|id| registry.details(id)) else {
		return;
	};
	log::debug!("Opening details popup:\n{}", details);
	spawn_details_popup(&mut commands, &details, &palette);
}

fn spawn_details_popup(commands: &mut Commands, details: &SegmentDetails, palette: &Palette) {
	commands
		.spawn((
			Node {
				position_type: PositionType::Absolute,
				width: Val::Percent(100.0),
				height: Val::Percent(100.0),
				justify_content: JustifyContent::Center,
				align_items: AlignItems::Center,
				..default()
			},
			DetailsPopup,
		))
		.with_children(|parent| {
			parent
				.spawn((
					Node {
						flex_direction: FlexDirection::Column,
						row_gap: Val::Px(6.0),
						padding: UiRect::all(Val::Px(16.0)),
						..default()
					},
					BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.9)),
				))
				.with_children(|panel| {
					panel.spawn((
						Text::new("Cylinder details"),
						TextFont { font_size: 22.0, ..default() },
						TextColor(palette.label),
					));
					for line in details.lines() {
						panel.spawn((
							Text::new(line),
							TextFont { font_size: 16.0, ..default() },
							TextColor(palette.label),
						));
					}
					panel
						.spawn((
							Button,
							Node { padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)), ..default() },
							BackgroundColor(Color::srgb(0.3, 0.3, 0.3)),
							CloseButton,
						))
						.with_children(|button| {
							button.spawn((
								Text::new("Close"),
								TextFont { font_size: 16.0, ..default() },
							));
						});
				});
		});
}

pub fn close_details(
	mut commands: Commands,
	keyboard_input: Res<ButtonInput<KeyCode>>,
	close_buttons: Query<&Interaction, (Changed<Interaction>, With<CloseButton>)>,
	popups: Query<Entity, With<DetailsPopup>>,
) {
	let pressed = close_buttons.iter().any(|interaction| *interaction == Interaction::Pressed);
	if !pressed && !keyboard_input.just_pressed(KeyCode::Escape) {
		return;
	}

	for popup in &popups {
		commands.entity(popup).despawn();
	}
}
