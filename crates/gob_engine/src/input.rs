//! Input polling and the engine clock.
//!
//! The engine never blocks without polling: long waits are split into short
//! delays with a [`InputPoll::process_input`] call between them, so a quit
//! request is noticed quickly.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

/// State reported by one input poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
	/// The user asked to quit
	pub quit: bool,
	/// Key pressed since the last poll
	pub key: Option<u16>,
}

/// Input and timing capability.
pub trait InputPoll {
	/// Polls pending input.
	fn process_input(&mut self) -> InputState;

	/// Milliseconds since an arbitrary start.
	fn millis(&self) -> u32;

	/// Sleeps for `ms` milliseconds.
	fn delay(&mut self, ms: u32);
}

/// Real-time clock without any input source.
#[derive(Debug, Clone)]
pub struct SystemClock {
	start: Instant,
}

impl SystemClock {
	/// Starts the clock.
	pub fn new() -> Self {
		Self {
			start: Instant::now(),
		}
	}
}

impl Default for SystemClock {
	fn default() -> Self {
		Self::new()
	}
}

impl InputPoll for SystemClock {
	fn process_input(&mut self) -> InputState {
		InputState::default()
	}

	fn millis(&self) -> u32 {
		self.start.elapsed().as_millis() as u32
	}

	fn delay(&mut self, ms: u32) {
		thread::sleep(Duration::from_millis(u64::from(ms)));
	}
}

/// Scripted input with a virtual clock.
///
/// Delays advance the clock instantly. Keys and the quit request become
/// visible once the clock reaches their time.
#[derive(Debug, Clone, Default)]
pub struct SimulatedInput {
	now: u32,
	keys: VecDeque<(u32, u16)>,
	quit_at: Option<u32>,
	polls: usize,
	delayed: u64,
}

impl SimulatedInput {
	/// Creates an idle input at time 0.
	pub fn new() -> Self {
		Self::default()
	}

	/// Presses `key` at time `at`.
	pub fn with_key(mut self, at: u32, key: u16) -> Self {
		let index = self.keys.partition_point(|&(time, _)| time <= at);
		self.keys.insert(index, (at, key));
		self
	}

	/// Requests quitting at time `at`.
	pub fn with_quit(mut self, at: u32) -> Self {
		self.quit_at = Some(at);
		self
	}

	/// Advances the clock without a delay.
	pub fn advance(&mut self, ms: u32) {
		self.now = self.now.wrapping_add(ms);
	}

	/// Number of polls so far.
	pub fn polls(&self) -> usize {
		self.polls
	}

	/// Total time spent in delays.
	pub fn delayed(&self) -> u64 {
		self.delayed
	}
}

impl InputPoll for SimulatedInput {
	fn process_input(&mut self) -> InputState {
		self.polls += 1;
		let key = match self.keys.front() {
			Some(&(at, key)) if at <= self.now => {
				self.keys.pop_front();
				Some(key)
			}
			_ => None,
		};
		InputState {
			quit: self.quit_at.is_some_and(|at| at <= self.now),
			key,
		}
	}

	fn millis(&self) -> u32 {
		self.now
	}

	fn delay(&mut self, ms: u32) {
		self.now = self.now.wrapping_add(ms);
		self.delayed += u64::from(ms);
	}
}
