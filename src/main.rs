//! SDL2 demo for the canvas engine
//!
//! Opens a window the size of the configured world, spawns a few entities
//! and runs the engine until Escape is pressed. `L` triggers the lose
//! effect. Debug overlays follow the `debug` config key.
//!
//! Configuration is read from `<config dir>/canvas-engine/engine.json` when
//! present. A sprite sheet at `assets/sheet.png` is used for the animated
//! entity; otherwise a generated one is.

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use glam::DVec2;
use sdl2::event::Event;
use sdl2::image::LoadSurface;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture};
use sdl2::video::Window;
use sdl2::EventPump;

use canvas_engine::color::Color;
use canvas_engine::config::EngineConfig;
use canvas_engine::engine::{Axis, FrameEvent, GameEngine, Platform};
use canvas_engine::error::{EngineError, EngineResult};
use canvas_engine::graphic::{BoundingBoxConfig, GraphicConfig, ImageConfig, LifeBarConfig, UpdateContext};
use canvas_engine::state::{FiniteStateMachine, StateDef};
use canvas_engine::surface::{Image, PixelSurface, Surface};
use canvas_engine::Graphic;

const WINDOW_SCALE: u32 = 2;
const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);
const SHEET_PATH: &str = "assets/sheet.png";

/// Why the platform stopped handing out frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitReason {
    Quit,
    Lose,
}

struct SdlPlatform<'a> {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    texture: Texture<'a>,
    last_frame: Instant,
    exit: Option<ExitReason>,
}

impl<'a> SdlPlatform<'a> {
    fn wait_for_key(&mut self) {
        loop {
            for event in self.event_pump.poll_iter() {
                if matches!(event, Event::Quit { .. } | Event::KeyDown { .. }) {
                    return;
                }
            }
            std::thread::sleep(FRAME_TIME);
        }
    }
}

impl<'a> Platform<PixelSurface> for SdlPlatform<'a> {
    fn next_frame(&mut self) -> EngineResult<FrameEvent> {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => self.exit = Some(ExitReason::Quit),
                Event::KeyDown {
                    keycode: Some(Keycode::L),
                    ..
                } => self.exit = Some(ExitReason::Lose),
                _ => {}
            }
        }
        if self.exit.is_some() {
            return Ok(FrameEvent::Quit);
        }

        let since = self.last_frame.elapsed();
        if since < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - since);
        }
        let now = Instant::now();
        let elapsed = now - self.last_frame;
        self.last_frame = now;
        Ok(FrameEvent::Frame(elapsed))
    }

    fn present(&mut self, surface: &PixelSurface) -> EngineResult<()> {
        let pitch = surface.width() as usize * 4;
        self.texture
            .update(None, surface.pixels(), pitch)
            .map_err(|e| EngineError::Platform(e.to_string()))?;
        self.canvas.set_draw_color(Color::BLACK);
        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, None)
            .map_err(EngineError::Platform)?;
        self.canvas.present();
        Ok(())
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("canvas-engine").join("engine.json"))
}

fn load_config() -> EngineConfig {
    let Some(path) = config_path().filter(|p| p.exists()) else {
        log::info!("no engine.json found, using defaults");
        return EngineConfig::default();
    };
    match EngineConfig::load_from_file(&path) {
        Ok(config) => {
            log::info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("ignoring {}: {}", path.display(), e);
            EngineConfig::default()
        }
    }
}

/// Loads an image file into RGBA pixels.
fn load_image(path: &Path) -> Result<Image, String> {
    let surface = sdl2::surface::Surface::from_file(path)
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;
    let surface = surface.convert_format(PixelFormatEnum::RGBA32)?;
    let (width, height) = (surface.width(), surface.height());
    let pitch = surface.pitch() as usize;
    let row = width as usize * 4;

    let mut pixels = Vec::with_capacity(row * height as usize);
    surface.with_lock(|data| {
        for y in 0..height as usize {
            pixels.extend_from_slice(&data[y * pitch..y * pitch + row]);
        }
    });
    Image::from_rgba(width, height, pixels).map_err(|e| e.to_string())
}

/// A horizontal strip of `frames` solid squares, one color each.
fn generated_sheet(size: u32, frames: u32) -> Image {
    let palette = [
        Color::rgb(0xE0, 0x5A, 0x47),
        Color::rgb(0xF2, 0xC1, 0x4E),
        Color::rgb(0x5F, 0xAD, 0x56),
        Color::rgb(0x4D, 0x9D, 0xE0),
    ];
    let mut sheet = Image::filled(size * frames, size, Color::TRANSPARENT);
    for frame in 0..frames {
        let color = palette[frame as usize % palette.len()];
        for y in 2..size - 2 {
            for x in 2..size - 2 {
                sheet.set_pixel(frame * size + x, y, color);
            }
        }
    }
    sheet
}

/// Moves with the velocity and bounces off the world edges.
fn wander(g: &mut Graphic, ctx: &mut UpdateContext<'_>) {
    let step = ctx.elapsed.as_secs_f64() * g.speed;
    g.x += g.vx * step;
    g.y += g.vy * step;

    let world = ctx.world;
    if g.collide_with_top(world) || g.collide_with_bottom(world) {
        g.set_vector(g.vx, -g.vy);
        g.y = g.y.clamp(world.border_offset, world.height - world.border_offset - g.height);
    }
    if g.x < world.border_offset || g.x + g.width > world.width - world.border_offset {
        g.set_vector(-g.vx, g.vy);
        g.x = g.x.clamp(world.border_offset, world.width - world.border_offset - g.width);
    }
}

fn flash(g: &mut Graphic) {
    g.opacity = 0.6;
}

fn hit(me: &mut Graphic, _other: &Graphic) {
    if me.life_bar.lose_life() {
        me.life_bar.set_lifes(me.life_bar.total_lifes());
    }
}

fn spawn_demo(engine: &mut GameEngine<PixelSurface>) -> EngineResult<()> {
    let world = engine.world().clone();

    let hero = engine.add_graphic(GraphicConfig {
        id: Some("hero".to_string()),
        kind: Some("hero".to_string()),
        x: world.center_x(),
        y: world.center_y(),
        width: 24.0,
        height: 24.0,
        color: Some(Color::rgb(0x33, 0x66, 0xCC)),
        rotate_to_direction: true,
        do_clear_last_position: true,
        is_collidable: true,
        life_bar: LifeBarConfig {
            show: true,
            total_lifes: 5,
            lifes: 5,
            ..Default::default()
        },
        ..Default::default()
    })?;

    let sheet = match load_image(Path::new(SHEET_PATH)) {
        Ok(image) => image,
        Err(e) => {
            log::info!("{}; using a generated sheet", e);
            generated_sheet(16, 4)
        }
    };
    let frames = (sheet.width() / 16).max(1);
    let badge = engine.add_graphic(GraphicConfig {
        id: Some("badge".to_string()),
        width: 16.0,
        height: 16.0,
        img: Some(ImageConfig {
            src: SHEET_PATH.to_string(),
        }),
        frames: frames - 1,
        play_sprite: true,
        frame_interval: 40,
        ..Default::default()
    })?;

    for i in 0..6 {
        engine.add_graphic(GraphicConfig {
            kind: Some("rock".to_string()),
            x: 40.0 + i as f64 * 90.0,
            y: 40.0 + (i % 3) as f64 * 100.0,
            width: 20.0,
            height: 20.0,
            is_collidable: true,
            bounding_box: BoundingBoxConfig {
                offset_x: 2.0,
                ..Default::default()
            },
            ..Default::default()
        })?;
    }

    let sheet = Rc::new(sheet);
    if let Some((g, _)) = engine.graphic_and_scheduler(badge) {
        g.bind_image(sheet)?;
        g.attach_to(hero, DVec2::new(4.0, -28.0));
    }

    if let Some((g, scheduler)) = engine.graphic_and_scheduler(hero) {
        g.set_collision_hook(hit);
        g.set_state_manager(Box::new(
            FiniteStateMachine::new().with_state(StateDef::new("wander").with_update(wander).with_before(flash)),
        ));
        g.set_state("wander")?;
        g.set_vector(3.0, 2.0);
        g.set_random_direction(scheduler);
    }

    engine.follow_object(Some(hero), Axis::X);
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();

    let config = load_config();
    let (width, height) = (config.world.width as u32, config.world.height as u32);

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;

    let window = video_subsystem
        .window("canvas-engine demo", width * WINDOW_SCALE, height * WINDOW_SCALE)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    canvas.set_logical_size(width, height).map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::RGBA32, width, height)
        .map_err(|e| e.to_string())?;

    let mut platform = SdlPlatform {
        canvas,
        event_pump: sdl_context.event_pump()?,
        texture,
        last_frame: Instant::now(),
        exit: None,
    };

    let mut engine = GameEngine::new(&config, PixelSurface::new(width, height))?;
    engine.set_on_lose(|engine| log::info!("game over with {} entities left", engine.objects().len()));
    spawn_demo(&mut engine)?;

    engine.start();
    engine.run(&mut platform)?;

    if platform.exit == Some(ExitReason::Lose) {
        engine.lose();
        platform.present(engine.surface())?;
        platform.wait_for_key();
    }

    Ok(())
}
