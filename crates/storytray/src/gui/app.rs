use crate::config::Config;
use crate::events::AppEvent;
use crate::gui::tray::{self, Tray, TrayGeometry};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub tray: Rc<RefCell<Tray>>,
    pub window_size: i32,
    pub drawing_area: gtk::DrawingArea,
    tick: Option<gtk::TickCallbackId>,
}

#[derive(Debug)]
pub enum AppMsg {
    StartLoading,
    StopLoading,
    ToggleLoading,
    ConfigReload(Box<Config>),
    ConfigInvalid(String),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::StartLoading => AppMsg::StartLoading,
            AppEvent::StopLoading => AppMsg::StopLoading,
            AppEvent::ToggleLoading => AppMsg::ToggleLoading,
            AppEvent::ConfigReload(config) => AppMsg::ConfigReload(config),
            AppEvent::ConfigInvalid(reason) => AppMsg::ConfigInvalid(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickChange {
    Install,
    Remove,
}

/// The frame clock only runs while the tray is loading.
fn tick_change(loading: bool, installed: bool) -> Option<TickChange> {
    match (loading, installed) {
        (true, false) => Some(TickChange::Install),
        (false, true) => Some(TickChange::Remove),
        _ => None,
    }
}

fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(
        ".storytray-window, .storytray-drawing-area { background-color: transparent; }",
    );

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

/// Frame clock timestamps are in microseconds.
fn frame_delta(previous: Option<i64>, now: i64) -> Duration {
    previous
        .map(|prev| Duration::from_micros(now.saturating_sub(prev).max(0) as u64))
        .unwrap_or_default()
}

impl AppModel {
    fn sync_tick(&mut self) {
        let loading = self.tray.borrow().state.is_loading();
        match tick_change(loading, self.tick.is_some()) {
            Some(TickChange::Install) => {
                let tray = self.tray.clone();
                let last_frame = Cell::new(None);
                let id = self
                    .drawing_area
                    .add_tick_callback(move |drawing_area, clock| {
                        let now = clock.frame_time();
                        let delta = frame_delta(last_frame.replace(Some(now)), now);
                        if tray.borrow_mut().state.tick(delta) {
                            drawing_area.queue_draw();
                        }
                        glib::ControlFlow::Continue
                    });
                self.tick = Some(id);
            }
            Some(TickChange::Remove) => {
                if let Some(id) = self.tick.take() {
                    id.remove();
                }
            }
            None => {}
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Tray, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Story Tray"),
            set_default_size: (model.window_size, model.window_size),
            add_css_class: "storytray-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gdk::Key::space {
                        sender.input(AppMsg::ToggleLoading);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "storytray-drawing-area",

                add_controller = gtk::GestureClick {
                    set_button: 1, // primary only
                    connect_released[sender] => move |_, _, _, _| {
                        sender.input(AppMsg::ToggleLoading);
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (tray, rx) = init;

        load_css();

        let window_size =
            TrayGeometry::window_size(tray.avatar_radius, tray.state.spec().stroke_width);
        let model = AppModel {
            tray: Rc::new(RefCell::new(tray)),
            window_size,
            drawing_area: gtk::DrawingArea::default(),
            tick: None,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let tray_draw = model.tray.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                if let Err(e) = tray::draw(cr, &tray_draw.borrow(), width as f64, height as f64) {
                    log::error!("Drawing error: {}", e);
                }
            });

        model.sync_tick();

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::StartLoading => self.tray.borrow_mut().state.start_loading(),
            AppMsg::StopLoading => self.tray.borrow_mut().state.stop_loading(),
            AppMsg::ToggleLoading => self.tray.borrow_mut().state.toggle_loading(),
            AppMsg::ConfigReload(config) => match self.tray.borrow_mut().apply_config(&config) {
                Ok(()) => log::info!("Configuration reloaded"),
                Err(e) => log::error!("Ignoring reloaded config: {}", e),
            },
            AppMsg::ConfigInvalid(reason) => {
                log::error!("Keeping current ring, config was rejected: {}", reason);
            }
        }
        self.sync_tick();
        self.drawing_area.queue_draw();
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.tray.borrow_mut().state.stop_loading();
        self.sync_tick();
    }
}
