//! IMD video utility.
//!
//! Provides three subcommands:
//! - `info`: print the header of a video.
//! - `export`: decode frames and write them as PNG files.
//! - `play`: run a video through the headless engine and save the final screen.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gob_rs::prelude::*;
use image::{ImageBuffer, RgbImage};
use log::{info, warn};

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(opts) => run_info(opts),
		Command::Export(opts) => run_export(opts),
		Command::Play(opts) => run_play(opts),
	}
}

#[derive(Parser)]
#[command(name = "imd_utils")]
#[command(author = "gob-rs project")]
#[command(version)]
#[command(about = "Inspect, export and play IMD videos", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print the header of a video
	Info(VideoArgs),
	/// Decode frames into PNG files
	Export(ExportArgs),
	/// Play a video headless and save the last screen
	Play(PlayArgs),
}

#[derive(Args)]
struct VideoArgs {
	/// Directory holding the game files
	#[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
	data: PathBuf,

	/// Video file name, `.IMD` is added when missing
	#[arg(value_name = "NAME")]
	name: String,
}

#[derive(Args)]
struct ExportArgs {
	#[command(flatten)]
	video: VideoArgs,

	/// Output directory
	#[arg(short, long, value_name = "DIR", default_value = "imd_export")]
	output: PathBuf,

	/// Export at most this many frames
	#[arg(short, long, value_name = "COUNT")]
	frames: Option<u16>,
}

#[derive(Args)]
struct PlayArgs {
	#[command(flatten)]
	video: VideoArgs,

	/// Engine configuration file (TOML)
	#[arg(short, long, value_name = "FILE", env = "GOB_CONFIG")]
	config: Option<PathBuf>,

	/// Output PNG for the final screen
	#[arg(short, long, value_name = "FILE", default_value = "screen.png")]
	output: PathBuf,

	/// Push palette chunks straight to the display
	#[arg(long, default_value_t = false)]
	set_palette: bool,

	/// Fade to black before the first frame
	#[arg(long, default_value_t = false)]
	fade: bool,
}

fn video_name(name: &str) -> String {
	if Path::new(name).extension().is_some() {
		name.to_string()
	} else {
		format!("{name}.IMD")
	}
}

fn open_video(args: &VideoArgs) -> Result<(DirectoryArchive, ImdFile)> {
	let archive = DirectoryArchive::open(&args.data)
		.with_context(|| format!("Cannot open data directory {}", args.data.display()))?;
	let name = video_name(&args.name);
	let imd = ImdFile::open(&archive, &name).with_context(|| format!("Cannot load video {name}"))?;
	Ok((archive, imd))
}

fn run_info(args: VideoArgs) -> Result<()> {
	let (_, imd) = open_video(&args)?;
	let header = imd.header();
	let area = header.area;

	println!("File: {}", video_name(&args.name));
	println!("Version: {} (flags 0x{:04X})", header.version(), header.flags);
	println!("Frames: {}", header.frame_count);
	println!("Area: {}x{} at ({}, {})", area.width, area.height, area.x, area.y);
	if let Some(std_area) = header.std_area {
		println!("Standard area: {}x{} at ({}, {})", std_area.width, std_area.height, std_area.x, std_area.y);
	}
	println!("Frame index: {}", if header.has_frame_index() { "yes" } else { "no" });
	println!("Frame coordinates: {}", header.frame_coords.len());
	println!("Buffers: frame data {} bytes, video {} bytes", header.frame_data_size, header.vid_buffer_size);

	if !header.frame_positions.is_empty() {
		println!("Frame table:");
		for (frame, pos) in header.frame_positions.iter().enumerate() {
			match header.frame_coords.get(frame).filter(|c| c.left != -1) {
				Some(c) => println!("  [{frame:4}] 0x{pos:08X} ({}, {})-({}, {})", c.left, c.top, c.right, c.bottom),
				None => println!("  [{frame:4}] 0x{pos:08X}"),
			}
		}
	}

	Ok(())
}

fn run_export(args: ExportArgs) -> Result<()> {
	let (_, mut imd) = open_video(&args.video)?;
	let area = imd.area();
	if area.width <= 0 || area.height <= 0 {
		bail!("Video has an empty area ({}x{})", area.width, area.height);
	}

	std::fs::create_dir_all(&args.output)
		.with_context(|| format!("Cannot create output directory {}", args.output.display()))?;

	// Render at the origin so the surface only holds the video
	imd.set_position(0, 0);
	let mut surface = Surface::indexed(area.width as u16, area.height as u16);
	let count = args.frames.map_or(imd.frame_count(), |limit| limit.min(imd.frame_count()));

	for frame in 0..count {
		let result = match imd.view(Some(&mut surface), frame) {
			Ok(result) => result,
			Err(e) => {
				warn!("Frame {frame}: {e}");
				break;
			}
		};

		let path = args.output.join(format!("{frame:04}.png"));
		save_png(&path, surface.pixels(), surface.width(), surface.height(), imd.palette())?;
		info!("Frame {frame}: flags 0x{:04X} -> {}", result.flags.bits(), path.display());

		if result.flags.contains(ImdFrameFlags::END) {
			break;
		}
	}

	Ok(())
}

fn run_play(args: PlayArgs) -> Result<()> {
	let config = EngineConfig::load(args.config.as_deref()).context("Cannot load engine configuration")?;
	let archive = DirectoryArchive::open(&args.video.data)
		.with_context(|| format!("Cannot open data directory {}", args.video.data.display()))?;

	let (width, height) = (config.screen_width, config.screen_height);
	let mut draw = Draw::new(Video::new(MemoryDisplay::new(width, height), width, height));
	let mut videos = VideoPlayer::new(&config);
	let mut input = SimulatedInput::new();

	let mut props = PlayProperties {
		flags: if args.set_palette {
			OpenFlags::SET_PALETTE
		} else {
			OpenFlags::empty()
		},
		fade: args.fade,
		..PlayProperties::default()
	};

	let slot = videos.open(&archive, true, &args.video.name, &props)?;
	let finished = videos.play(slot, &mut props, &mut draw, &mut input)?;
	info!(
		"Played {} frames in {} ms of game time{}",
		videos.current_frame(slot).unwrap_or_default(),
		input.millis(),
		if finished { "" } else { " (stopped early)" }
	);

	let display = draw.video().display();
	save_png(&args.output, display.framebuffer(), display.width(), display.height(), display.palette())?;
	info!("Screen saved to {}", args.output.display());

	Ok(())
}

fn save_png(path: &Path, pixels: &[u8], width: u16, height: u16, palette: &Palette) -> Result<()> {
	let colors = palette.to_rgb8();
	let rgb: Vec<u8> = pixels.iter().flat_map(|&p| colors[usize::from(p)]).collect();

	let img: RgbImage = ImageBuffer::from_raw(u32::from(width), u32::from(height), rgb)
		.context("Pixel buffer does not match the image size")?;
	img.save(path).with_context(|| format!("Cannot write {}", path.display()))?;
	Ok(())
}
