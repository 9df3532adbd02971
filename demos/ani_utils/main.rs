//! ANI animation utility.
//!
//! Provides two subcommands:
//! - `list`: print the layers and animations of a file.
//! - `render`: play one animation through an animated object and write every
//!   frame as a PNG file.

use std::{
	path::{Path, PathBuf},
	rc::Rc,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gob_rs::prelude::*;
use image::{ImageBuffer, RgbImage};
use log::info;

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::List(opts) => run_list(opts),
		Command::Render(opts) => run_render(opts),
	}
}

#[derive(Parser)]
#[command(name = "ani_utils")]
#[command(author = "gob-rs project")]
#[command(version)]
#[command(about = "Inspect and render layered animation (.ANI) files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// List layers and animations
	List(AniArgs),
	/// Render the frames of one animation to PNG files
	Render(RenderArgs),
}

#[derive(Args)]
struct AniArgs {
	/// Directory holding the game files
	#[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
	data: PathBuf,

	/// Animation file name
	#[arg(value_name = "NAME")]
	name: String,

	/// Engine configuration file (TOML)
	#[arg(short, long, value_name = "FILE", env = "GOB_CONFIG")]
	config: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
	#[command(flatten)]
	ani: AniArgs,

	/// Animation index
	#[arg(short, long, value_name = "INDEX", default_value_t = 0)]
	animation: u16,

	/// Number of cycles to render
	#[arg(long, value_name = "COUNT", default_value_t = 1)]
	cycles: u16,

	/// Palette file with 768 bytes of 6-bit VGA colors
	#[arg(short, long, value_name = "FILE")]
	palette: Option<PathBuf>,

	/// Output directory
	#[arg(short, long, value_name = "DIR", default_value = "ani_render")]
	output: PathBuf,
}

fn load(args: &AniArgs) -> Result<(EngineConfig, AniFile)> {
	let config = EngineConfig::load(args.config.as_deref()).context("Cannot load engine configuration")?;
	let archive = DirectoryArchive::open(&args.data)
		.with_context(|| format!("Cannot open data directory {}", args.data.display()))?;

	let ani = AniFile::open(&archive, &args.name, config.screen_width, 1, config.endianness);
	if ani.animation_count() == 0 {
		bail!("{} has no animations", args.name);
	}
	Ok((config, ani))
}

fn run_list(args: AniArgs) -> Result<()> {
	let (_, ani) = load(&args)?;

	println!("File: {}", ani.name());
	println!("Layers: {}", ani.layers().len());
	for (index, layer) in ani.layers().iter().enumerate() {
		match layer {
			Some(layer) => println!("  [{index}] {} ({} parts)", layer.name(), layer.part_count()),
			None => println!("  [{index}] <missing>"),
		}
	}

	let (max_width, max_height) = ani.max_size();
	println!("Animations: {} (largest frame {max_width}x{max_height})", ani.animation_count());
	for (index, animation) in ani.animations().iter().enumerate() {
		println!(
			"  [{index}] {:<12} {} frames at ({}, {}), moves ({}, {}) per cycle{}",
			animation.name,
			animation.frame_count,
			animation.x,
			animation.y,
			animation.delta_x,
			animation.delta_y,
			if animation.transp { ", transparent" } else { "" }
		);
		for (frame, area) in animation.frame_areas.iter().enumerate() {
			if area.is_valid() {
				println!("      frame {frame}: ({}, {})-({}, {})", area.left, area.top, area.right, area.bottom);
			} else {
				println!("      frame {frame}: empty");
			}
		}
	}

	Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
	let (config, ani) = load(&args.ani)?;
	let Some(animation) = ani.animation(args.animation) else {
		bail!("Animation {} out of range (file has {})", args.animation, ani.animation_count());
	};
	let frame_count = animation.frame_count;

	let palette = match &args.palette {
		Some(path) => {
			let data = std::fs::read(path).with_context(|| format!("Cannot read palette {}", path.display()))?;
			Palette::from_vga_bytes(&data)
		}
		None => gray_palette(),
	};

	std::fs::create_dir_all(&args.output)
		.with_context(|| format!("Cannot create output directory {}", args.output.display()))?;

	let mut object = AniObject::new(Rc::new(ani));
	object.set_animation(args.animation);
	object.set_position_default();
	object.set_visible(true);

	let mut screen = Surface::indexed(config.screen_width, config.screen_height);
	for step in 0..u32::from(frame_count) * u32::from(args.cycles.max(1)) {
		let area = object.draw(&mut screen);

		let path = args.output.join(format!("{step:04}.png"));
		save_png(&path, &screen, &palette)?;
		match area {
			Some(area) => info!(
				"Frame {} at ({}, {})-({}, {}) -> {}",
				object.frame(),
				area.left,
				area.top,
				area.right,
				area.bottom,
				path.display()
			),
			None => info!("Frame {} is off screen -> {}", object.frame(), path.display()),
		}

		object.clear(&mut screen);
		object.advance();
	}

	Ok(())
}

/// 64 gray levels repeated over the palette.
fn gray_palette() -> Palette {
	let mut palette = Palette::new();
	for index in 0..=255u8 {
		let level = index & 0x3F;
		palette.set(index, [level, level, level]);
	}
	palette
}

fn save_png(path: &Path, surface: &Surface, palette: &Palette) -> Result<()> {
	let colors = palette.to_rgb8();
	let rgb: Vec<u8> = surface.pixels().iter().flat_map(|&p| colors[usize::from(p)]).collect();

	let img: RgbImage = ImageBuffer::from_raw(u32::from(surface.width()), u32::from(surface.height()), rgb)
		.context("Pixel buffer does not match the image size")?;
	img.save(path).with_context(|| format!("Cannot write {}", path.display()))?;
	Ok(())
}
