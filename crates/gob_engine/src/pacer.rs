//! Frame pacing.
//!
//! Waits are cooperative: they sleep in short slices and poll input in
//! between, giving up as soon as the user quits.

use crate::input::{InputPoll, InputState};

/// Longest single sleep while waiting for the end of a frame.
const WAIT_SLICE: u32 = 10;

/// Sleep between polls during a long delay.
const LONG_DELAY_SLICE: u32 = 15;

/// Keeps a steady frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
	frame_wait: u32,
	start_frame_time: u32,
	speed_factor: u32,
}

impl Default for FramePacer {
	fn default() -> Self {
		Self::new(12, 1)
	}
}

impl FramePacer {
	/// Creates a pacer for `frame_rate` frames per second.
	pub fn new(frame_rate: u16, speed_factor: u32) -> Self {
		let mut pacer = Self {
			frame_wait: 0,
			start_frame_time: 0,
			speed_factor: speed_factor.max(1),
		};
		pacer.set_frame_rate(frame_rate);
		pacer
	}

	/// Changes the frame rate; `0` counts as 1.
	pub fn set_frame_rate(&mut self, frame_rate: u16) {
		self.frame_wait = 1000 / u32::from(frame_rate.max(1));
	}

	/// Milliseconds per frame.
	pub fn frame_wait(&self) -> u32 {
		self.frame_wait
	}

	/// Starts timing a frame now.
	pub fn start_frame(&mut self, input: &dyn InputPoll) {
		self.start_frame_time = input.millis();
	}

	/// Waits for the rest of the current frame.
	///
	/// A frame that started more than a second ago, or in the future, only
	/// restarts the timing. Returns the first key pressed while waiting, and
	/// stops early if the user quits.
	pub fn wait_end_frame(&mut self, input: &mut dyn InputPoll) -> InputState {
		let mut state = InputState::default();
		let elapsed = i64::from(input.millis()) - i64::from(self.start_frame_time);
		if !(0..=1000).contains(&elapsed) {
			self.start_frame_time = input.millis();
			return state;
		}

		let mut to_wait = 0i64;
		loop {
			if to_wait > 0 {
				input.delay(to_wait.min(i64::from(WAIT_SLICE)) as u32);
			}
			let polled = input.process_input();
			state.key = state.key.or(polled.key);
			if polled.quit {
				state.quit = true;
				return state;
			}

			let elapsed = i64::from(input.millis()) - i64::from(self.start_frame_time);
			to_wait = i64::from(self.frame_wait) - elapsed;
			if to_wait <= 0 {
				break;
			}
		}

		self.start_frame_time = input.millis();
		state
	}

	/// Waits `ms` milliseconds of game time, polling input.
	///
	/// Returns `false` if the user quit.
	pub fn long_delay(&self, input: &mut dyn InputPoll, ms: u32) -> bool {
		let target = u64::from(input.millis()) * u64::from(self.speed_factor) + u64::from(ms);
		loop {
			if input.process_input().quit {
				return false;
			}
			input.delay(LONG_DELAY_SLICE);
			if u64::from(input.millis()) * u64::from(self.speed_factor) >= target {
				return true;
			}
		}
	}
}
