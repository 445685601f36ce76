//! Shared integration test helpers for quick-term.
//!
//! Provides an in-memory desktop: a mock overlay window, desktop, dock and
//! surface factory that all record into one shared [`World`], plus a
//! [`Harness`] that drives a [`QuickTerminal`] on a manual clock.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{Harness, Call};
//! ```
//!
//! The `#![allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers is used per test file.

#![allow(dead_code)]

use parking_lot::Mutex;
use quick_term::QuickTerminal;
use quick_term::config::{Config, QuickTerminalPosition, QuickTerminalScreen};
use quick_term::geometry::{Rect, ScreenInfo};
use quick_term::observer::Observable;
use quick_term::platform::{
    AppHandle, CollectionBehavior, Desktop, DockControl, FullscreenMode, OverlayWindow,
    PlatformServices, SpaceId, SurfaceFactory, SurfaceHandle, SurfaceId, TerminalSurface,
    WindowAppearance, WindowId, WindowLevel,
};
use quick_term::tab::SurfaceDisplay;
use quick_term::timer::{Clock, ManualClock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

pub const WINDOW_ID: WindowId = WindowId(1);
pub const MENU_BAR: f64 = 25.0;
pub const DOCK_HEIGHT: f64 = 70.0;

/// Side effect observed by the mocks, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetFrame(Rect, f64),
    AnimateTo(Rect, f64, Duration),
    SetLevel(WindowLevel),
    MakeKeyAndOrderFront,
    OrderOut,
    MakeFirstResponder(SurfaceId),
    ExitFullscreen,
    ToggleFullscreen(FullscreenMode),
    SetCollectionBehavior(CollectionBehavior),
    SetAppearance(WindowAppearance),
    ActivateHost,
    ActivateApp(AppHandle),
    SetDockAutohide(bool),
    AcquireDockPresentation,
    ReleaseDockPresentation,
}

/// Everything the mocks read and write
#[derive(Debug)]
pub struct World {
    pub calls: Vec<Call>,

    pub frame: Rect,
    pub window_visible: bool,
    pub key: bool,
    /// Ordering the window front makes it key
    pub accepts_key: bool,
    pub on_active_space: bool,
    pub attached_sheet: bool,
    pub fullscreen: bool,

    pub host_active: bool,
    pub frontmost: Option<AppHandle>,
    pub active_space: SpaceId,
    pub terminated: Vec<i32>,
    pub screen: Option<ScreenInfo>,
    pub dock_area: Option<Rect>,

    pub dock_autohide: bool,
    pub presentation_holds: i32,

    /// New surfaces are attached to the overlay window immediately
    pub auto_attach: bool,
}

impl Default for World {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            frame: Rect::default(),
            window_visible: false,
            key: false,
            accepts_key: true,
            on_active_space: true,
            attached_sheet: false,
            fullscreen: false,
            host_active: false,
            frontmost: Some(app_x()),
            active_space: 1,
            terminated: Vec::new(),
            screen: Some(screen()),
            dock_area: Some(bottom_dock()),
            dock_autohide: false,
            presentation_holds: 0,
            auto_attach: true,
        }
    }
}

pub type SharedWorld = Arc<Mutex<World>>;

/// 1440x900 screen with a menu bar and a bottom dock
pub fn screen() -> ScreenInfo {
    ScreenInfo {
        frame: Rect::new(0.0, 0.0, 1440.0, 900.0),
        visible_frame: Rect::new(0.0, MENU_BAR, 1440.0, 900.0 - MENU_BAR - DOCK_HEIGHT),
    }
}

pub fn bottom_dock() -> Rect {
    Rect::new(200.0, 900.0 - DOCK_HEIGHT, 1040.0, DOCK_HEIGHT)
}

pub fn host_app() -> AppHandle {
    AppHandle::new(100, "com.example.quickterm")
}

/// The application in front before the overlay is shown
pub fn app_x() -> AppHandle {
    AppHandle::new(200, "com.example.editor")
}

pub fn config_at(position: QuickTerminalPosition) -> Config {
    Config {
        quick_terminal_position: position,
        quick_terminal_screen: QuickTerminalScreen::Main,
        ..Config::default()
    }
}

pub struct MockWindow {
    world: SharedWorld,
}

impl MockWindow {
    fn record(&self, call: Call) {
        self.world.lock().calls.push(call);
    }
}

impl OverlayWindow for MockWindow {
    fn id(&self) -> WindowId {
        WINDOW_ID
    }
    fn frame(&self) -> Rect {
        self.world.lock().frame
    }
    fn set_frame(&mut self, frame: Rect, alpha: f64) {
        let mut world = self.world.lock();
        world.frame = frame;
        world.calls.push(Call::SetFrame(frame, alpha));
    }
    fn animate_to(&mut self, frame: Rect, alpha: f64, duration: Duration) {
        let mut world = self.world.lock();
        world.frame = frame;
        world.calls.push(Call::AnimateTo(frame, alpha, duration));
    }
    fn set_level(&mut self, level: WindowLevel) {
        self.record(Call::SetLevel(level));
    }
    fn make_key_and_order_front(&mut self) {
        let mut world = self.world.lock();
        world.window_visible = true;
        if world.accepts_key {
            world.key = true;
        }
        world.calls.push(Call::MakeKeyAndOrderFront);
    }
    fn order_out(&mut self) {
        let mut world = self.world.lock();
        world.window_visible = false;
        world.key = false;
        world.calls.push(Call::OrderOut);
    }
    fn make_first_responder(&mut self, surface: SurfaceId) {
        self.record(Call::MakeFirstResponder(surface));
    }
    fn is_key(&self) -> bool {
        self.world.lock().key
    }
    fn is_visible(&self) -> bool {
        self.world.lock().window_visible
    }
    fn is_on_active_space(&self) -> bool {
        self.world.lock().on_active_space
    }
    fn has_attached_sheet(&self) -> bool {
        self.world.lock().attached_sheet
    }
    fn is_fullscreen(&self) -> bool {
        self.world.lock().fullscreen
    }
    fn exit_fullscreen(&mut self) {
        let mut world = self.world.lock();
        world.fullscreen = false;
        world.calls.push(Call::ExitFullscreen);
    }
    fn toggle_fullscreen(&mut self, mode: FullscreenMode) {
        let mut world = self.world.lock();
        world.fullscreen = !world.fullscreen;
        world.calls.push(Call::ToggleFullscreen(mode));
    }
    fn screen(&self) -> Option<ScreenInfo> {
        self.world.lock().screen
    }
    fn set_collection_behavior(&mut self, behavior: CollectionBehavior) {
        self.record(Call::SetCollectionBehavior(behavior));
    }
    fn set_appearance(&mut self, appearance: WindowAppearance) {
        self.record(Call::SetAppearance(appearance));
    }
}

pub struct MockDesktop {
    world: SharedWorld,
}

impl Desktop for MockDesktop {
    fn is_host_active(&self) -> bool {
        self.world.lock().host_active
    }
    fn host_application(&self) -> AppHandle {
        host_app()
    }
    fn frontmost_application(&self) -> Option<AppHandle> {
        self.world.lock().frontmost.clone()
    }
    fn activate_host(&self) {
        let mut world = self.world.lock();
        world.host_active = true;
        world.frontmost = Some(host_app());
        world.calls.push(Call::ActivateHost);
    }
    fn activate_application(&self, app: &AppHandle) -> bool {
        let mut world = self.world.lock();
        world.host_active = false;
        world.frontmost = Some(app.clone());
        world.calls.push(Call::ActivateApp(app.clone()));
        true
    }
    fn is_terminated(&self, app: &AppHandle) -> bool {
        self.world.lock().terminated.contains(&app.pid)
    }
    fn active_space(&self) -> SpaceId {
        self.world.lock().active_space
    }
    fn screen(&self, _selector: QuickTerminalScreen) -> Option<ScreenInfo> {
        self.world.lock().screen
    }
    fn main_screen(&self) -> Option<ScreenInfo> {
        self.world.lock().screen
    }
    fn dock_area(&self, _screen: &ScreenInfo) -> Option<Rect> {
        self.world.lock().dock_area
    }
}

pub struct MockDock {
    world: SharedWorld,
}

impl DockControl for MockDock {
    fn autohide_enabled(&self) -> bool {
        self.world.lock().dock_autohide
    }
    fn set_autohide_enabled(&self, enabled: bool) {
        let mut world = self.world.lock();
        world.dock_autohide = enabled;
        world.calls.push(Call::SetDockAutohide(enabled));
    }
    fn acquire_autohide_presentation(&self) {
        let mut world = self.world.lock();
        world.presentation_holds += 1;
        world.calls.push(Call::AcquireDockPresentation);
    }
    fn release_autohide_presentation(&self) {
        let mut world = self.world.lock();
        world.presentation_holds -= 1;
        world.calls.push(Call::ReleaseDockPresentation);
    }
}

pub struct MockSurface {
    pub id: SurfaceId,
    pub window: Mutex<Option<WindowId>>,
    pub title: Observable<String>,
    pub exited: AtomicBool,
}

impl MockSurface {
    pub fn attach(&self) {
        *self.window.lock() = Some(WINDOW_ID);
    }
}

impl TerminalSurface for MockSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }
    fn window(&self) -> Option<WindowId> {
        *self.window.lock()
    }
    fn title(&self) -> Observable<String> {
        self.title.clone()
    }
    fn pwd(&self) -> Option<String> {
        None
    }
    fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }
}

pub type SurfaceLog = Arc<Mutex<Vec<Arc<MockSurface>>>>;

pub struct MockSurfaceFactory {
    world: SharedWorld,
    next: AtomicU64,
    created: SurfaceLog,
}

impl MockSurfaceFactory {
    pub fn new(world: SharedWorld, created: SurfaceLog) -> Self {
        Self {
            world,
            next: AtomicU64::new(0),
            created,
        }
    }
}

impl SurfaceFactory for MockSurfaceFactory {
    fn new_surface(&self) -> SurfaceHandle {
        let id = SurfaceId(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        let attached = self.world.lock().auto_attach;
        let surface = Arc::new(MockSurface {
            id,
            window: Mutex::new(attached.then_some(WINDOW_ID)),
            title: Observable::new(String::new()),
            exited: AtomicBool::new(false),
        });
        self.created.lock().push(Arc::clone(&surface));
        surface
    }
}

/// Records display requests without a controller
#[derive(Default)]
pub struct RecordingDisplay {
    pub shown: Vec<SurfaceId>,
}

impl SurfaceDisplay for RecordingDisplay {
    fn update_surface_tree(&mut self, surface: SurfaceHandle) {
        self.shown.push(surface.id());
    }
}

/// A quick terminal wired to the in-memory desktop
pub struct Harness {
    pub world: SharedWorld,
    pub clock: ManualClock,
    pub surfaces: SurfaceLog,
    pub qt: QuickTerminal,
}

impl Harness {
    /// Quick terminal without a window
    pub fn new(config: Config) -> Self {
        Self::with_world(config, World::default())
    }

    pub fn with_world(config: Config, world: World) -> Self {
        let world = Arc::new(Mutex::new(world));
        let clock = ManualClock::new();
        let surfaces: SurfaceLog = Arc::new(Mutex::new(Vec::new()));
        let clock_handle: Arc<dyn Clock> = Arc::new(clock.clone());
        let services = PlatformServices {
            desktop: Box::new(MockDesktop {
                world: world.clone(),
            }),
            dock: Arc::new(MockDock {
                world: world.clone(),
            }),
            surfaces: Box::new(MockSurfaceFactory::new(world.clone(), surfaces.clone())),
            clock: clock_handle,
        };
        Self {
            qt: QuickTerminal::new(config, services),
            world,
            clock,
            surfaces,
        }
    }

    pub fn window(&self) -> Box<dyn OverlayWindow> {
        Box::new(MockWindow {
            world: self.world.clone(),
        })
    }

    /// Load the window: creates the first tab and starts sliding in
    pub fn load(&mut self) {
        let window = self.window();
        self.qt.window_did_load(window);
    }

    /// Load the window and let the slide-in finish
    pub fn load_and_settle(&mut self) {
        self.load();
        self.settle();
    }

    /// Give the controller a window and a tab without showing anything
    pub fn load_hidden(&mut self) {
        let window = self.window();
        self.qt.controller_mut().window_did_load(window);
        self.qt.new_tab();
    }

    /// Advance the clock and run one loop iteration
    pub fn advance(&mut self, by: Duration) {
        self.clock.advance(by);
        self.qt.tick();
    }

    /// Run loop iterations in 5 ms steps until no continuation is pending
    pub fn settle(&mut self) {
        for _ in 0..10_000 {
            self.qt.tick();
            if self.qt.controller().pending_timers() == 0 {
                return;
            }
            self.clock.advance(Duration::from_millis(5));
        }
        panic!("deferred continuations never settled");
    }

    pub fn calls(&self) -> Vec<Call> {
        self.world.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.world.lock().calls.clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.world.lock().calls.iter().filter(|c| *c == call).count()
    }

    /// Index of the first matching call
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.world.lock().calls.iter().position(pred)
    }

    /// Index of the last matching call
    pub fn rposition(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.world.lock().calls.iter().rposition(pred)
    }

    pub fn surface(&self, index: usize) -> Arc<MockSurface> {
        Arc::clone(&self.surfaces.lock()[index])
    }

    /// Record every visibility change
    pub fn record_visibility(&self) -> (Arc<Mutex<Vec<bool>>>, quick_term::observer::Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = self
            .qt
            .controller()
            .visibility()
            .subscribe(move |v: &bool| sink.lock().push(*v));
        (seen, subscription)
    }
}
