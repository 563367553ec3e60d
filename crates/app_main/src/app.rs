//! Application main loop

use anyhow::Result;
use app_core::{
    Action, AppConfig, AppError, Catalog, Command, CommandId, DownloadOutcome, DownloadRequest,
    ExternalOpener, Fetcher, FullscreenSurface, GalleryEvent, GalleryState, HttpFetcher,
    ImageLoader, SystemOpener, ToastKind,
};
use app_db::KeyValueStore;
use app_ui::{
    components::{
        FavoritesSidebar, GalleryGrid, GridAction, LightboxAction, LightboxView, SidebarAction,
        ToastView, Toolbar, ToolbarAction,
    },
    InputHandler, Renderer, TextureCache, Theme,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Fullscreen, Window, WindowId},
};

/// Events sent to the loop from other threads
#[derive(Debug)]
enum UserEvent {
    /// egui asked for a repaint after `delay`
    Repaint(Duration),
}

/// Something a view asked for during the last frame
enum UiAction {
    Toolbar(ToolbarAction),
    Grid(GridAction),
    Lightbox(LightboxAction),
    Sidebar(SidebarAction),
}

/// The window as a fullscreen target
struct WindowSurface<'a>(&'a Window);

impl FullscreenSurface for WindowSurface<'_> {
    fn is_fullscreen(&self) -> bool {
        self.0.fullscreen().is_some()
    }

    fn set_fullscreen(&self, fullscreen: bool) -> Result<(), AppError> {
        if fullscreen && self.0.current_monitor().is_none() {
            return Err(AppError::Unsupported("Fullscreen".into()));
        }
        self.0
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        Ok(())
    }
}

/// Main application state for the event loop
struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,

    // Background work
    runtime: tokio::runtime::Runtime,
    fetcher: Arc<dyn Fetcher>,
    opener: Arc<dyn ExternalOpener>,
    download_tx: Sender<DownloadOutcome>,
    download_rx: Receiver<DownloadOutcome>,

    // Gallery state and views
    state: GalleryState,
    app_events: Receiver<GalleryEvent>,
    theme: Theme,
    input_handler: InputHandler,
    toolbar: Toolbar,
    grid: GalleryGrid,
    lightbox: LightboxView,
    sidebar: FavoritesSidebar,
    textures: TextureCache,

    repaint_at: Option<Instant>,
    exit_requested: bool,
}

impl App {
    fn new(
        config: AppConfig,
        catalog: Catalog,
        store: Arc<dyn KeyValueStore>,
        storage_warning: Option<&str>,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("galleria-io")
            .enable_all()
            .build()?;

        let egui_ctx = egui::Context::default();
        let proxy = Mutex::new(proxy);
        egui_ctx.set_request_repaint_callback(move |info| {
            if proxy.lock().send_event(UserEvent::Repaint(info.delay)).is_err() {
                tracing::trace!("Repaint request dropped, event loop closed");
            }
        });

        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new()?);
        let loader = ImageLoader::new(
            runtime.handle().clone(),
            fetcher.clone(),
            config.gallery.thumbnail_size,
        )
        .with_notify({
            let ctx = egui_ctx.clone();
            move || ctx.request_repaint()
        });

        let mut state = GalleryState::new(catalog, &config, store);
        if let Some(warning) = storage_warning {
            state.notify(warning, ToastKind::Warning, Instant::now());
        }

        let background = Theme::parse_color(&config.viewer.background_color).unwrap_or_else(|| {
            tracing::warn!("Invalid viewer.background_color {:?}", config.viewer.background_color);
            egui::Color32::from_black_alpha(216)
        });

        let (download_tx, download_rx) = unbounded();

        Ok(Self {
            window: None,
            renderer: None,
            egui_ctx,
            egui_state: None,

            runtime,
            fetcher,
            opener: Arc::new(SystemOpener),
            download_tx,
            download_rx,

            app_events: state.subscribe(),
            theme: Theme::for_flag(state.theme()),
            input_handler: InputHandler::new(config.keybindings.clone()),
            toolbar: Toolbar::new(state.search_text()),
            grid: GalleryGrid::new(&mut state, config.gallery.thumbnail_size as f32),
            lightbox: LightboxView::new(&mut state, background),
            sidebar: FavoritesSidebar::new(&mut state),
            textures: TextureCache::new(loader),
            state,

            repaint_at: None,
            exit_requested: false,
        })
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Galleria")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800))
            .with_min_inner_size(winit::dpi::LogicalSize::new(480, 360));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        // Initialize renderer
        let renderer = pollster::block_on(Renderer::new(window.clone()))?;

        // Initialize egui
        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(renderer.device.limits().max_texture_dimension_2d as usize),
        );

        // Apply theme
        self.theme.apply(&self.egui_ctx);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.egui_state = Some(egui_state);

        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Bring views and caches up to date before drawing
    fn sync(&mut self, now: Instant) {
        self.state.tick(now);
        self.textures.pump(&self.egui_ctx);

        for outcome in self.download_rx.try_iter().collect::<Vec<_>>() {
            self.state.finish_download(outcome, now);
        }

        for event in self.app_events.try_iter() {
            match event {
                GalleryEvent::ThemeChanged(flag) => {
                    self.theme = Theme::for_flag(flag);
                    self.theme.apply(&self.egui_ctx);
                }
                // Give an image that failed earlier another chance when shown large
                GalleryEvent::LightboxOpened { id, .. } => {
                    if let Some(record) = self.state.catalog().get(&id) {
                        self.textures.retry_failed(record);
                    }
                }
                _ => {}
            }
        }

        self.grid.sync();
        self.lightbox.sync(&self.state);
        self.sidebar.sync();
    }

    fn render(&mut self) {
        let window = match &self.window {
            Some(w) => w.clone(),
            None => return,
        };

        let now = Instant::now();
        self.sync(now);

        let raw_input = match &mut self.egui_state {
            Some(s) => s.take_egui_input(&window),
            None => return,
        };

        let mut actions: Vec<UiAction> = Vec::new();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
                ui.add_space(4.0);
                if let Some(action) = self.toolbar.ui(ui, &self.state, &self.theme) {
                    actions.push(UiAction::Toolbar(action));
                }
                ui.add_space(4.0);
            });

            if self.state.sidebar_visible() {
                if let Some(action) = self.sidebar.ui(ctx, &self.state, &mut self.textures, &self.theme) {
                    actions.push(UiAction::Sidebar(action));
                }
            }

            egui::CentralPanel::default().show(ctx, |ui| {
                if let Some(action) = self.grid.ui(ui, &self.state, &mut self.textures, &self.theme) {
                    actions.push(UiAction::Grid(action));
                }
            });

            if let Some(action) = self.lightbox.ui(ctx, &self.state, &mut self.textures, &self.theme, now) {
                actions.push(UiAction::Lightbox(action));
            }

            ToastView::ui(ctx, self.state.toasts(), &self.theme);
        });

        if let Some(egui_state) = &mut self.egui_state {
            egui_state.handle_platform_output(&window, full_output.platform_output);
        }

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        if let Some(renderer) = &mut self.renderer {
            renderer.paint(
                &primitives,
                &full_output.textures_delta,
                full_output.pixels_per_point,
                self.theme.background,
            );
        }

        let repaint_delay = full_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map(|v| v.repaint_delay);

        let had_actions = !actions.is_empty();
        for action in actions {
            self.apply(action, now);
        }

        if had_actions || repaint_delay == Some(Duration::ZERO) || self.state.lightbox().is_playing() {
            window.request_redraw();
        } else if let Some(delay) = repaint_delay.filter(|d| *d < Duration::from_secs(3600)) {
            self.schedule_repaint(now + delay);
        }
    }

    fn schedule_repaint(&mut self, at: Instant) {
        self.repaint_at = Some(self.repaint_at.map_or(at, |current| current.min(at)));
    }

    fn apply(&mut self, action: UiAction, now: Instant) {
        match action {
            UiAction::Toolbar(action) => match action {
                ToolbarAction::Category(category) => self.state.set_category(category),
                ToolbarAction::Search(text) => self.state.search_input(&text, now),
                ToolbarAction::Sort(sort) => self.state.set_sort(sort),
                ToolbarAction::ToggleTheme => self.run_command(&Command::new(CommandId::APP_TOGGLE_THEME), now),
                ToolbarAction::ToggleFavorites => {
                    self.run_command(&Command::new(CommandId::APP_TOGGLE_FAVORITES), now)
                }
            },
            UiAction::Grid(action) => match action {
                GridAction::Open(index) => {
                    self.state.open_lightbox(index);
                }
                GridAction::ToggleFavorite(id) => {
                    self.state.toggle_favorite(&id, now);
                }
                GridAction::LoadMore => self.run_command(&Command::new(CommandId::GALLERY_LOAD_MORE), now),
                GridAction::SentinelVisible => {
                    self.state.sentinel_visible();
                }
            },
            UiAction::Lightbox(action) => {
                let id = match action {
                    LightboxAction::Next => CommandId::LIGHTBOX_NEXT,
                    LightboxAction::Prev => CommandId::LIGHTBOX_PREV,
                    LightboxAction::Close => CommandId::LIGHTBOX_CLOSE,
                    LightboxAction::ToggleFavorite => CommandId::LIGHTBOX_FAVORITE,
                    LightboxAction::ToggleSlideshow => CommandId::LIGHTBOX_SLIDESHOW,
                    LightboxAction::Download => CommandId::LIGHTBOX_DOWNLOAD,
                    LightboxAction::ToggleFullscreen => CommandId::LIGHTBOX_FULLSCREEN,
                };
                self.run_command(&Command::new(id), now);
            }
            UiAction::Sidebar(action) => match action {
                SidebarAction::Open(id) => {
                    self.state.open_from_favorites(&id);
                }
                SidebarAction::Remove(id) => {
                    self.state.toggle_favorite(&id, now);
                }
            },
        }
    }

    /// Execute a command and carry out whatever it needs from the host
    fn run_command(&mut self, command: &Command, now: Instant) {
        match self.state.execute(command, now) {
            Some(Action::Download(request)) => self.start_download(request),
            Some(Action::ToggleFullscreen) => {
                if let Some(window) = self.window.clone() {
                    self.state.toggle_fullscreen(&WindowSurface(&window), now);
                }
            }
            Some(Action::Exit) => self.exit_requested = true,
            None => {}
        }
    }

    fn start_download(&self, request: DownloadRequest) {
        let fetcher = self.fetcher.clone();
        let opener = self.opener.clone();
        let dir = self.state.download_dir().to_path_buf();
        let tx = self.download_tx.clone();
        let ctx = self.egui_ctx.clone();

        tracing::info!("Downloading {} as {}", request.url, request.file_name);
        self.runtime.spawn(async move {
            let outcome = app_core::download(fetcher.as_ref(), opener.as_ref(), &request, &dir).await;
            if tx.send(outcome).is_ok() {
                ctx.request_repaint();
            }
        });
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!("Failed to initialize window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Repaint(delay) if delay.is_zero() => self.request_redraw(),
            UserEvent::Repaint(delay) => {
                if let Some(at) = Instant::now().checked_add(delay) {
                    self.schedule_repaint(at);
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Lightbox keys go straight to the lightbox so a focused button
        // never sees them
        if let WindowEvent::KeyboardInput { event: key, .. } = &event {
            if self.state.lightbox().is_open() && !self.egui_ctx.wants_keyboard_input() {
                if let Some(cmd) = self.input_handler.handle_key(key).filter(|c| c.id.is_lightbox()) {
                    self.run_command(&cmd, Instant::now());
                    self.request_redraw();
                    return;
                }
            }
        }

        // Let egui handle the event next
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.repaint {
                window.request_redraw();
            }
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize((size.width, size.height));
                }
                self.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if !self.egui_ctx.wants_keyboard_input() {
                    if let Some(cmd) = self.input_handler.handle_key(&event) {
                        self.run_command(&cmd, Instant::now());
                        self.request_redraw();
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(cmd) = self.input_handler.handle_mouse_button(button, state) {
                    self.run_command(&cmd, Instant::now());
                    self.request_redraw();
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input_handler.update_modifiers(modifiers.state());
            }

            WindowEvent::RedrawRequested => {
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        let state_due = self.state.next_deadline().filter(|d| *d <= now).is_some();
        let repaint_due = self.repaint_at.filter(|d| *d <= now).is_some();
        if state_due || repaint_due {
            self.repaint_at = None;
            self.request_redraw();
        }

        let next_wake = [self.state.next_deadline(), self.repaint_at]
            .into_iter()
            .flatten()
            .filter(|d| *d > now)
            .min();

        event_loop.set_control_flow(match next_wake {
            Some(at) => ControlFlow::WaitUntil(at),
            None => ControlFlow::Wait,
        });
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::info!("Galleria shutting down");
        self.state.shutdown();
    }
}

/// Run the application
pub fn run(
    config: AppConfig,
    catalog: Catalog,
    store: Arc<dyn KeyValueStore>,
    storage_warning: Option<&str>,
) -> Result<()> {
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, catalog, store, storage_warning, event_loop.create_proxy())?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
