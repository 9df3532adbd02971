//! Palette fades.

use gob_types::graphics::Palette;

use crate::display::Display;
use crate::draw::Draw;
use crate::input::InputPoll;

/// Steps the display palette toward a target palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PalAnim {
	fade_step: u8,
}

impl Default for PalAnim {
	fn default() -> Self {
		Self::new(2)
	}
}

impl PalAnim {
	/// Creates a fader moving `fade_step` per component and step by default.
	pub fn new(fade_step: u8) -> Self {
		Self {
			fade_step: fade_step.max(1),
		}
	}

	/// Color step applied per fade iteration.
	pub fn fade_step(&self) -> u8 {
		self.fade_step
	}

	/// Fades from the palette on screen to `target`, or to black without one.
	///
	/// A negative `fade` overrides the step size. A positive one is the delay
	/// in milliseconds between steps. Returns `false` if the user quit
	/// before the fade completed.
	pub fn fade<D: Display>(
		&self,
		draw: &mut Draw<D>,
		input: &mut dyn InputPoll,
		target: Option<&Palette>,
		fade: i16,
	) -> bool {
		let step = if fade < 0 { fade.unsigned_abs().min(63) as u8 } else { self.fade_step };
		let black = Palette::default();
		let target = target.unwrap_or(&black);

		let mut current = draw.video().palette().clone();
		let mut steps = 0usize;

		while current != *target {
			if input.process_input().quit {
				log::debug!("Palette fade interrupted after {steps} steps");
				return false;
			}

			for (from, to) in current.colors_mut().iter_mut().zip(target.colors()) {
				for (component, &goal) in from.iter_mut().zip(to) {
					*component = fade_component(*component, goal, step);
				}
			}

			draw.video_mut().set_full_palette(&current);
			steps += 1;
			if fade > 0 {
				input.delay(fade as u32);
			}
		}

		log::trace!("Palette fade done in {steps} steps");
		true
	}
}

fn fade_component(from: u8, to: u8, step: u8) -> u8 {
	let (from, to, step) = (i16::from(from), i16::from(to), i16::from(step));
	if from - step > to {
		(from - step) as u8
	} else if from + step < to {
		(from + step) as u8
	} else {
		to as u8
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::display::MemoryDisplay;
	use crate::input::SimulatedInput;
	use crate::video::Video;

	fn draw() -> Draw<MemoryDisplay> {
		Draw::new(Video::new(MemoryDisplay::new(8, 8), 8, 8))
	}

	#[test]
	fn test_fade_component() {
		assert_eq!(fade_component(0, 63, 2), 2);
		assert_eq!(fade_component(62, 63, 2), 63);
		assert_eq!(fade_component(10, 0, 4), 6);
		assert_eq!(fade_component(3, 0, 4), 0);
		assert_eq!(fade_component(7, 7, 2), 7);
	}

	#[test]
	fn test_fade_in() {
		let mut draw = draw();
		let mut input = SimulatedInput::new();
		let mut target = Palette::new();
		target.set(1, [6, 3, 0]);

		assert!(PalAnim::new(2).fade(&mut draw, &mut input, Some(&target), 0));
		assert_eq!(draw.video().display().palette(), &target);
		// 0 -> 2 -> 4 -> 6
		assert_eq!(draw.video().display().palette_updates(), 3);
		assert_eq!(input.delayed(), 0);
	}

	#[test]
	fn test_fade_out_with_delay() {
		let mut draw = draw();
		let mut palette = Palette::new();
		palette.set(9, [63, 63, 63]);
		draw.video_mut().set_full_palette(&palette);

		let mut input = SimulatedInput::new();
		assert!(PalAnim::default().fade(&mut draw, &mut input, None, 5));
		assert!(draw.video().display().palette().is_black());
		assert_eq!(input.delayed(), 32 * 5);
	}

	#[test]
	fn test_fade_step_override() {
		let mut draw = draw();
		let mut target = Palette::new();
		target.set(0, [60, 0, 0]);

		let mut input = SimulatedInput::new();
		assert!(PalAnim::new(1).fade(&mut draw, &mut input, Some(&target), -20));
		// 20, 40, 60
		assert_eq!(draw.video().display().palette_updates(), 3);
	}

	#[test]
	fn test_fade_interrupted() {
		let mut draw = draw();
		let mut target = Palette::new();
		target.set(0, [63, 63, 63]);

		let mut input = SimulatedInput::new().with_quit(10);
		assert!(!PalAnim::new(1).fade(&mut draw, &mut input, Some(&target), 5));
		assert_eq!(draw.video().display().palette_updates(), 2);
		assert_ne!(draw.video().display().palette(), &target);
	}
}
