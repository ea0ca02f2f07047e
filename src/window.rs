//! Desktop runner.
//!
//! Opens a winit window and drives the [`AnimationLoop`] from redraw
//! requests: scheduling a frame asks the window for a redraw, and the
//! resulting `RedrawRequested` delivers it. Each delivered frame steps the
//! particles on the CPU canvas, layers the scene decorations on top and hands
//! the canvas to the [`Presenter`].
//!
//! Keys `1`-`4` jump between sections, `P` cycles the project views,
//! `Escape` leaves a project view, and the mouse wheel scrolls the (virtual)
//! page.

use std::sync::Arc;

use glam::Vec2;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::animation::{AnimationLoop, FrameHandle, FrameScheduler};
use crate::config::SiteConfig;
use crate::content::Portfolio;
use crate::error::{Error, Result};
use crate::gpu::Presenter;
use crate::input::{HitRegions, PointerTracker, Rect, Target};
use crate::presentation::{HomeScene, Navigator, Section, View};
use crate::surface::{Canvas, Surface};
use crate::text::TextEngine;
use crate::time::FrameClock;

/// Pixels scrolled per wheel line.
const LINE_SCROLL: f32 = 48.0;

/// Frame scheduling backed by `Window::request_redraw`.
///
/// winit coalesces redraw requests, so at most one frame is outstanding; a
/// cancelled handle simply stops matching.
pub struct RedrawScheduler {
    window: Arc<Window>,
    next: u64,
    pending: Option<FrameHandle>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: 0,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

impl FrameScheduler for RedrawScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

struct App {
    config: SiteConfig,
    portfolio: Portfolio,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    animation: Option<AnimationLoop<RedrawScheduler>>,
    canvas: Canvas,
    pointer: PointerTracker,
    regions: HitRegions,
    scene: HomeScene,
    navigator: Navigator,
    clock: FrameClock,
    scroll: f32,
    error: Option<Error>,
}

impl App {
    fn new(config: SiteConfig, portfolio: Portfolio) -> Result<Self> {
        let engine = TextEngine::new(config.font_path.as_deref())?;
        let scene = HomeScene::new(config.presentation.clone(), &portfolio);
        let pointer = PointerTracker::new(config.presentation.hover_capable);
        Ok(Self {
            config,
            portfolio,
            window: None,
            presenter: None,
            animation: None,
            canvas: Canvas::new(1, 1).with_text_engine(engine),
            pointer,
            regions: HitRegions::new(),
            scene,
            navigator: Navigator::new(),
            clock: FrameClock::new(),
            scroll: 0.0,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let presenter = pollster::block_on(Presenter::new(window.clone(), self.config.window.vsync))?;

        let mut animation = AnimationLoop::new(
            RedrawScheduler::new(window.clone()),
            self.config.particle_field(),
            self.config.rasterizer(),
            self.portfolio.name_lines(),
        )
        .with_ready_callback(|ready| debug!(ready, "particle text rebuilt"));

        let size = window.inner_size();
        self.update_regions(size.width, size.height);
        self.pointer.attach();
        animation.start(&mut self.canvas, size.width, size.height);

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.animation = Some(animation);
        Ok(())
    }

    fn update_regions(&mut self, width: u32, height: u32) {
        self.regions.clear();
        self.regions.push(
            Rect::new(Vec2::ZERO, Vec2::new(width as f32, height as f32)),
            Target::ParticleSurface,
        );
    }

    /// Each section is one viewport tall.
    fn page_height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn scroll_by(&mut self, delta: f32) {
        let page = self.page_height();
        let offsets: Vec<(Section, f32)> = Section::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| (*s, i as f32 * page))
            .collect();
        let max = page * (Section::ALL.len() - 1) as f32;
        self.scroll = (self.scroll + delta).clamp(0.0, max);

        let before = self.navigator.highlighted();
        self.navigator.on_scroll(self.scroll, &offsets);
        if self.navigator.highlighted() != before {
            info!(section = %self.navigator.highlighted(), "active section");
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let section = match code {
            KeyCode::Digit1 => Section::Home,
            KeyCode::Digit2 => Section::About,
            KeyCode::Digit3 => Section::Work,
            KeyCode::Digit4 => Section::Contact,
            KeyCode::Escape => {
                self.navigator.back_to_work();
                return;
            }
            KeyCode::KeyP => {
                let count = self.portfolio.projects.len();
                if count > 0 {
                    let index = match self.navigator.view() {
                        View::Project(i) => (i + 1) % count,
                        View::Sections => 0,
                    };
                    self.navigator.open_project(index);
                    if let Some(project) = self.portfolio.project(index) {
                        info!(title = %project.title, year = %project.year, "project");
                    }
                }
                return;
            }
            _ => return,
        };
        let request = self.navigator.navigate(section);
        let index = Section::ALL.iter().position(|s| *s == section).unwrap_or(0);
        self.scroll = index as f32 * self.page_height();
        info!(section = %request.section, deferred = request.deferred, "navigate");
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        self.clock.tick();
        if !animation.frame(&mut self.canvas, self.pointer.repulsion_center()) {
            return;
        }

        let now = self.clock.elapsed();
        let pointer = self.pointer.state();
        self.scene.update(now, animation.is_ready());
        self.scene
            .track_pointer(&pointer, self.canvas.width(), self.canvas.height(), now);
        self.scene
            .compose(&mut self.canvas, now, &pointer, animation.rasterizer());

        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        match presenter.present(&self.canvas) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => warn!("render error: {e:?}"),
        }

        if self.clock.frame() % 600 == 0 {
            debug!(fps = self.clock.fps(), particles = animation.field().len(), "frame stats");
        }
    }

    fn shutdown(&mut self) {
        if let Some(animation) = self.animation.as_mut() {
            animation.dispose();
        }
        self.pointer.detach();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.pointer.handle_window_event(&event, &self.regions) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.resize(size.width, size.height);
                }
                self.update_regions(size.width, size.height);
                if let Some(animation) = self.animation.as_mut() {
                    animation.resize(&mut self.canvas, size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_SCROLL,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.scroll_by(dy);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(config: SiteConfig, portfolio: Portfolio) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, portfolio)?;
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
