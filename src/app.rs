use crate::act;
use crate::assets::AssetManager;
use crate::config;
use crate::core::gfx::{self as renderer, Backend};
use crate::core::space;
use crate::game::GameMode;
use crate::screens::{evaluation, gameplay, menu, Screen as CurrentScreen, ScreenAction};
use crate::ui::actors::Actor;
use crate::ui::color::{self, Theme};
use crate::ui::compose;
use crate::utils::fps::FpsCounter;
use log::{error, info};
use std::{error::Error, sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

pub struct App {
    window: Option<Arc<Window>>,
    backend: Option<Backend>,
    assets: AssetManager,
    mode: GameMode,
    theme: &'static Theme,
    current_screen: CurrentScreen,
    menu_state: menu::State,
    gameplay_state: Option<gameplay::State>,
    evaluation_state: evaluation::State,
    cursor_position: (f64, f64),
    window_size: (u32, u32),
    last_frame_time: Instant,
    fps: FpsCounter,
    last_fps: u32,
    last_frame_quads: u32,
    show_overlay: bool,
    vsync_enabled: bool,
    fullscreen_enabled: bool,
}

impl App {
    fn new(mode: GameMode, vsync_enabled: bool, fullscreen_enabled: bool, show_overlay: bool) -> Self {
        let config = config::get();
        Self {
            window: None,
            backend: None,
            assets: AssetManager::new(),
            mode,
            theme: color::theme_for(mode),
            current_screen: CurrentScreen::Menu,
            menu_state: menu::init(),
            gameplay_state: None,
            evaluation_state: evaluation::init(None),
            cursor_position: (0.0, 0.0),
            window_size: (config.display_width, config.display_height),
            last_frame_time: Instant::now(),
            fps: FpsCounter::new(),
            last_fps: 0,
            last_frame_quads: 0,
            show_overlay,
            vsync_enabled,
            fullscreen_enabled,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let mut window_attributes = Window::default_attributes()
            .with_title(config::WINDOW_TITLE)
            .with_resizable(true)
            .with_inner_size(PhysicalSize::new(self.window_size.0, self.window_size.1));

        if self.fullscreen_enabled {
            window_attributes =
                window_attributes.with_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let size = window.inner_size();
        self.window_size = (size.width, size.height);

        let mut backend = renderer::create_backend(window.clone(), self.vsync_enabled)?;
        self.assets.load_initial_assets(&mut backend, self.mode)?;

        self.window = Some(window);
        self.backend = Some(backend);
        info!("Starting event loop...");
        Ok(())
    }

    fn handle_action(&mut self, action: ScreenAction, event_loop: &ActiveEventLoop) {
        match action {
            ScreenAction::Navigate(screen) => {
                info!("Navigating to {:?}", screen);
                match screen {
                    CurrentScreen::Menu => {
                        self.gameplay_state = None;
                        self.menu_state = menu::init();
                    }
                    CurrentScreen::Gameplay => {
                        self.gameplay_state = Some(gameplay::init(self.mode));
                    }
                    CurrentScreen::Evaluation => {
                        let summary = self
                            .gameplay_state
                            .take()
                            .and_then(|gs| gameplay::summarize(&gs));
                        self.evaluation_state = evaluation::init(summary);
                    }
                }
                self.current_screen = screen;
            }
            ScreenAction::Exit => {
                info!("Exit action received. Shutting down.");
                event_loop.exit();
            }
            ScreenAction::None => {}
        }
    }

    fn get_current_actors(&self) -> Vec<Actor> {
        let mut actors = match self.current_screen {
            CurrentScreen::Menu => menu::get_actors(&self.menu_state, &self.assets, self.theme),
            CurrentScreen::Gameplay => {
                if let Some(gs) = &self.gameplay_state {
                    gameplay::get_actors(gs, &self.assets, self.theme)
                } else {
                    vec![]
                }
            }
            CurrentScreen::Evaluation => {
                evaluation::get_actors(&self.evaluation_state, &self.assets, self.theme)
            }
        };

        if self.show_overlay {
            actors.push(act!(text:
                settext(format!(
                    "{} FPS | {} quads | {:?}",
                    self.last_fps, self.last_frame_quads, self.current_screen
                )):
                align(0.0, 0.0): xy(4.0, 4.0):
                px(14.0): diffuse(1.0, 1.0, 1.0, 1.0): z(120)
            ));
        }

        actors
    }

    fn update_fps_title(&mut self, window: &Window) {
        if let Some(fps) = self.fps.update() {
            self.last_fps = fps;
            window.set_title(&format!(
                "{} - {:?} | {} FPS",
                config::WINDOW_TITLE,
                self.current_screen,
                fps
            ));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_graphics(event_loop) {
                error!("Failed to initialize graphics: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref().cloned() else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested. Shutting down.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    self.window_size = (new_size.width, new_size.height);
                    if let Some(backend) = &mut self.backend {
                        backend.resize(new_size.width, new_size.height);
                    }
                }
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state == ElementState::Pressed && !key_event.repeat {
                    if let PhysicalKey::Code(KeyCode::F3) = key_event.physical_key {
                        self.show_overlay = !self.show_overlay;
                        info!("Overlay {}", if self.show_overlay { "ON" } else { "OFF" });
                        return;
                    }
                }

                let action = match self.current_screen {
                    CurrentScreen::Menu => menu::handle_key_press(&mut self.menu_state, &key_event),
                    CurrentScreen::Gameplay => {
                        if let Some(gs) = &mut self.gameplay_state {
                            gameplay::handle_key_press(gs, &key_event)
                        } else {
                            ScreenAction::None
                        }
                    }
                    CurrentScreen::Evaluation => {
                        evaluation::handle_key_press(&mut self.evaluation_state, &key_event)
                    }
                };
                self.handle_action(action, event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x, position.y);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let (win_w, win_h) = self.window_size;
                let Some(point) = space::window_to_design(
                    self.cursor_position.0 as f32,
                    self.cursor_position.1 as f32,
                    win_w,
                    win_h,
                ) else {
                    return;
                };
                let action = match self.current_screen {
                    CurrentScreen::Menu => menu::handle_mouse_click(&mut self.menu_state, point),
                    CurrentScreen::Gameplay => {
                        if let Some(gs) = &mut self.gameplay_state {
                            gameplay::handle_mouse_click(gs, point)
                        } else {
                            ScreenAction::None
                        }
                    }
                    CurrentScreen::Evaluation => {
                        evaluation::handle_mouse_click(&mut self.evaluation_state, point)
                    }
                };
                self.handle_action(action, event_loop);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now
                    .duration_since(self.last_frame_time)
                    .as_secs_f32()
                    .min(config::MAX_DELTA_TIME);
                self.last_frame_time = now;

                let action = match self.current_screen {
                    CurrentScreen::Menu => menu::update(&mut self.menu_state, delta_time),
                    CurrentScreen::Gameplay => {
                        if let Some(gs) = &mut self.gameplay_state {
                            gameplay::update(gs, &self.assets, delta_time)
                        } else {
                            ScreenAction::None
                        }
                    }
                    CurrentScreen::Evaluation => {
                        evaluation::update(&mut self.evaluation_state, &self.assets, delta_time)
                    }
                };
                self.handle_action(action, event_loop);

                let actors = self.get_current_actors();
                let render_list =
                    compose::build_screen(&actors, self.theme.backdrop, self.assets.fonts());
                self.update_fps_title(&window);

                if let Some(backend) = &mut self.backend {
                    match backend.draw(&render_list, &self.assets.textures) {
                        Ok(quads) => self.last_frame_quads = quads,
                        Err(e) => {
                            error!("Failed to draw frame: {}", e);
                            event_loop.exit();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(backend) = &mut self.backend {
            backend.dispose_textures(&mut self.assets.textures);
            backend.cleanup();
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let config = config::get();
    let mode = config.mode;
    let vsync_enabled = config.vsync;
    let fullscreen_enabled = !config.windowed;
    let show_overlay = config.show_stats;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(mode, vsync_enabled, fullscreen_enabled, show_overlay);
    event_loop.run_app(&mut app)?;
    Ok(())
}
