// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

mod audio;

use core::{cell::RefCell, f32::consts::PI, time::Duration};
use std::{collections::HashMap, thread};

use platform::{
    ActionCategory, Button, EffectId, EngineError, Event, Instant, LoadedSprite, Platform, Rect,
    SpriteRef,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sdl2::{
    event::{Event as SdlEvent, WindowEvent},
    keyboard::Scancode,
    pixels::{Color, PixelFormatEnum},
    rect::Rect as SdlRect,
    render::{BlendMode, Canvas, RendererInfo, Texture, TextureCreator},
    video::{DisplayMode, Window, WindowContext},
    EventPump, Sdl,
};
use tracing::{debug, info, warn};

use crate::audio::Mixer;

const CLEAR_COLOR: (u8, u8, u8) = (0x5E, 0x82, 0xAC);
const FADE_STEPS: u32 = 60;
const FADE_STEP_DELAY: Duration = Duration::from_millis(8);

/// Everything needed to open the game window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    /// Width of the drawable area in world coordinates. The window is scaled
    /// to fit it.
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    /// How long to sleep after presenting each frame.
    pub frame_delay: Duration,
    /// SDL scancode names, e.g. "Up" or "R".
    pub jump_key: String,
    pub restart_key: String,
    pub quit_key: String,
}

fn scancode(name: &str) -> Result<Scancode, EngineError> {
    Scancode::from_name(name)
        .ok_or_else(|| EngineError::precondition(format!("unknown key name {name:?}")))
}

fn describe_display_mode(mode: &DisplayMode) -> String {
    format!(
        "Display mode: {}x{} at {} Hz, {:?}.",
        mode.w, mode.h, mode.refresh_rate, mode.format,
    )
}

fn describe_renderer(info: &RendererInfo) -> String {
    format!(
        "Renderer: {}, textures up to {}x{}, formats: {:?}.",
        info.name, info.max_texture_width, info.max_texture_height, info.texture_formats,
    )
}

fn sdl_rect(rect: Rect) -> SdlRect {
    SdlRect::new(rect.x, rect.y, rect.w.max(0) as u32, rect.h.max(0) as u32)
}

/// A [`Platform`] implemented with SDL2: an accelerated renderer drawing into
/// a (by default desktop-fullscreen) window, a software mixer on an SDL audio
/// device, and keyboard input.
pub struct Sdl2Platform {
    mixer: Mixer,
    /// Indexed by [`SpriteRef::inner`]. Freed slots are `None`.
    textures: RefCell<Vec<Option<Texture>>>,
    texture_creator: TextureCreator<WindowContext>,
    canvas: RefCell<Canvas<Window>>,
    event_pump: RefCell<EventPump>,
    bindings: HashMap<ActionCategory, Scancode>,
    draw_area: (i32, i32),
    frame_delay: Duration,
    started: std::time::Instant,
    rng: RefCell<StdRng>,
    _sdl: Sdl,
}

impl Sdl2Platform {
    pub fn new(options: &WindowOptions) -> Result<Sdl2Platform, EngineError> {
        let bindings = HashMap::from([
            (ActionCategory::Jump, scancode(&options.jump_key)?),
            (ActionCategory::Restart, scancode(&options.restart_key)?),
            (ActionCategory::Quit, scancode(&options.quit_key)?),
        ]);

        let sdl = sdl2::init().map_err(EngineError::backend_call)?;
        let video = sdl.video().map_err(EngineError::backend_call)?;
        let audio = sdl.audio().map_err(EngineError::backend_call)?;

        let mut window = video.window(&options.title, options.width, options.height);
        window.position_centered();
        if options.fullscreen {
            window.fullscreen_desktop();
        }
        let window = window
            .build()
            .map_err(|err| EngineError::backend_call(err.to_string()))?;
        let mut canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|err| EngineError::backend_call(err.to_string()))?;
        canvas
            .set_logical_size(options.width, options.height)
            .map_err(|err| EngineError::backend_call(err.to_string()))?;
        canvas.set_blend_mode(BlendMode::Blend);

        let display_mode = canvas
            .window()
            .display_index()
            .and_then(|index| video.current_display_mode(index));
        match display_mode {
            Ok(mode) => debug!("{}", describe_display_mode(&mode)),
            Err(err) => warn!("Could not query the display mode: {err}"),
        }
        debug!("{}", describe_renderer(&canvas.info()));
        let texture_creator = canvas.texture_creator();

        let event_pump = sdl.event_pump().map_err(EngineError::backend_call)?;
        let mixer = Mixer::open(&audio)?;

        info!(
            "Opened a {}x{} window ({}).",
            options.width,
            options.height,
            if options.fullscreen { "fullscreen" } else { "windowed" },
        );

        Ok(Sdl2Platform {
            mixer,
            textures: RefCell::new(Vec::new()),
            texture_creator,
            canvas: RefCell::new(canvas),
            event_pump: RefCell::new(event_pump),
            bindings,
            draw_area: (options.width as i32, options.height as i32),
            frame_delay: options.frame_delay,
            started: std::time::Instant::now(),
            rng: RefCell::new(StdRng::from_entropy()),
            _sdl: sdl,
        })
    }
}

impl Drop for Sdl2Platform {
    fn drop(&mut self) {
        let mut leaked = 0;
        for texture in self.textures.get_mut().drain(..).flatten() {
            leaked += 1;
            // Safety: the canvas, and so the renderer the texture was created
            // with, is still alive, since it's dropped after this.
            unsafe { texture.destroy() };
        }
        if leaked > 0 {
            warn!("{leaked} textures were not freed before the platform was dropped.");
        }
    }
}

impl Platform for Sdl2Platform {
    fn draw_area(&self) -> (i32, i32) {
        self.draw_area
    }

    fn load_sprite(&self, path: &str) -> Result<LoadedSprite, EngineError> {
        let image = image::open(path)
            .map_err(|err| EngineError::resource_load(format!("{path}: {err}")))?
            .into_rgba8();
        let (width, height) = image.dimensions();

        let mut texture = self
            .texture_creator
            .create_texture_static(PixelFormatEnum::ABGR8888, width, height)
            .map_err(|err| EngineError::backend_call(format!("{path}: {err}")))?;
        let uploaded = texture.update(None, image.as_raw(), width as usize * 4);
        if let Err(err) = uploaded {
            // Safety: the texture was just created with this renderer and
            // hasn't been handed out anywhere.
            unsafe { texture.destroy() };
            return Err(EngineError::backend_call(format!("{path}: {err}")));
        }
        texture.set_blend_mode(BlendMode::Blend);

        let mut textures = self.textures.borrow_mut();
        let index = match textures.iter().position(Option::is_none) {
            Some(index) => {
                textures[index] = Some(texture);
                index
            }
            None => {
                textures.push(Some(texture));
                textures.len() - 1
            }
        };
        debug!("Uploaded {path} into texture slot {index}.");

        Ok(LoadedSprite {
            sprite: SpriteRef::new(index as u64),
            width: width as i32,
            height: height as i32,
        })
    }

    fn free_sprite(&self, sprite: SpriteRef) {
        let mut textures = self.textures.borrow_mut();
        match textures.get_mut(sprite.inner() as usize).and_then(Option::take) {
            // Safety: the renderer is owned by self and still alive.
            Some(texture) => unsafe { texture.destroy() },
            None => warn!("Tried to free {sprite:?}, which isn't loaded."),
        }
    }

    fn clear(&self) -> Result<(), EngineError> {
        let mut canvas = self.canvas.borrow_mut();
        let (r, g, b) = CLEAR_COLOR;
        canvas.set_draw_color(Color::RGB(r, g, b));
        canvas.clear();
        Ok(())
    }

    fn draw_sprite(
        &self,
        sprite: SpriteRef,
        clip: Rect,
        placement: Rect,
    ) -> Result<(), EngineError> {
        let textures = self.textures.borrow();
        let Some(Some(texture)) = textures.get(sprite.inner() as usize) else {
            return Err(EngineError::backend_call(format!(
                "tried to draw {sprite:?}, which isn't loaded"
            )));
        };
        self.canvas
            .borrow_mut()
            .copy(texture, sdl_rect(clip), sdl_rect(placement))
            .map_err(EngineError::backend_call)
    }

    fn commit(&self) {
        self.canvas.borrow_mut().present();
        if !self.frame_delay.is_zero() {
            thread::sleep(self.frame_delay);
        }
    }

    fn fade_transition(&self) -> Result<(), EngineError> {
        let mut canvas = self.canvas.borrow_mut();
        let (r, g, b) = CLEAR_COLOR;
        for step in 0..=FADE_STEPS {
            let darkness = (step as f32 / FADE_STEPS as f32 * PI).sin();
            let shade = |channel: u8| (channel as f32 * (1.0 - darkness)) as u8;
            canvas.set_draw_color(Color::RGB(shade(r), shade(g), shade(b)));
            canvas.clear();
            canvas.present();
            thread::sleep(FADE_STEP_DELAY);
        }
        Ok(())
    }

    fn load_loop_track(&self, path: &str) -> Result<(), EngineError> {
        self.mixer.load_loop_track(path)
    }

    fn play_loop(&self) -> Result<(), EngineError> {
        self.mixer.play_loop();
        Ok(())
    }

    fn pause_loop(&self) {
        self.mixer.pause_loop();
    }

    fn load_effect(&self, id: EffectId, path: &str) -> Result<(), EngineError> {
        self.mixer.load_effect(id, path)
    }

    fn play_effect(&self, id: EffectId) {
        self.mixer.play_effect(id);
    }

    fn poll_event(&self) -> Option<Event> {
        let mut event_pump = self.event_pump.borrow_mut();
        while let Some(event) = event_pump.poll_event() {
            match event {
                SdlEvent::Quit { .. } => return Some(Event::ProcessQuit),
                SdlEvent::Window {
                    win_event: WindowEvent::Close,
                    ..
                } => return Some(Event::WindowClose),
                SdlEvent::KeyDown {
                    scancode: Some(scancode),
                    repeat: false,
                    ..
                } => {
                    let button = Button::new(scancode as i32 as u64);
                    return Some(Event::DigitalInputPressed(button));
                }
                _ => {}
            }
        }
        None
    }

    fn default_button_for_action(&self, action: ActionCategory) -> Option<Button> {
        let scancode = *self.bindings.get(&action)?;
        Some(Button::new(scancode as i32 as u64))
    }

    fn now(&self) -> Instant {
        Instant::reference() + self.started.elapsed()
    }

    fn random_u32(&self) -> u32 {
        self.rng.borrow_mut().gen()
    }
}

#[cfg(test)]
mod tests {
    use platform::Rect;
    use sdl2::{
        keyboard::Scancode,
        pixels::PixelFormatEnum,
        render::RendererInfo,
        video::DisplayMode,
    };

    use super::{describe_display_mode, describe_renderer, scancode, sdl_rect};

    #[test]
    fn key_names_map_to_scancodes() {
        assert_eq!(Scancode::Up, scancode("Up").unwrap());
        assert_eq!(Scancode::R, scancode("R").unwrap());
        assert!(scancode("NotAKey").is_err());
    }

    #[test]
    fn rects_keep_negative_positions() {
        let rect = sdl_rect(Rect::xywh(-262, 5, 262, 300));
        assert_eq!((-262, 5, 262, 300), (rect.x(), rect.y(), rect.width(), rect.height()));
    }

    #[test]
    fn display_caps_are_described() {
        let mode = DisplayMode::new(PixelFormatEnum::RGB888, 2560, 1440, 144);
        assert_eq!(
            "Display mode: 2560x1440 at 144 Hz, RGB888.",
            describe_display_mode(&mode),
        );

        let info = RendererInfo {
            name: "opengl",
            flags: 0,
            texture_formats: vec![PixelFormatEnum::ARGB8888],
            max_texture_width: 16384,
            max_texture_height: 16384,
        };
        assert_eq!(
            "Renderer: opengl, textures up to 16384x16384, formats: [ARGB8888].",
            describe_renderer(&info),
        );
    }
}
