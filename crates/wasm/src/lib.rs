#![deny(unsafe_code)]

//! Browser entry point: binds the chat and navigation controllers to the page.
mod dom;
mod error;

use std::cell::RefCell;
use std::rc::Rc;

use atelier_answer::{AnswerService, HttpAnswerService};
use atelier_chat::{ExchangeController, InputEvent, Role};
use atelier_nav::NavController;
use atelier_settings::{SettingsStore, SiteSettings};
use serde::Serialize;
use snafu::ResultExt;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, KeyboardEvent, Window};

use dom::{DomChatSurface, DomNavSurface};
use error::{AnswerServiceSnafu, BindError, BindResult, SettingsSnafu};

/// Id of the optional `<script type="application/json">` holding settings overrides.
pub const SETTINGS_ELEMENT_ID: &str = "atelier-settings";

/// Transcript entry as exposed to page scripts.
#[derive(Serialize)]
pub struct EntryView {
    pub id: u64,
    pub role: &'static str,
    pub content: String,
}

/// Initialize WASM module
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Atelier WASM module initialized");
}

/// Page controller owning the chat exchange and navigation state.
///
/// Navigation is always bound; the chat half is absent on pages without the widget.
#[wasm_bindgen]
pub struct SiteController {
    chat: Option<ExchangeController<DomChatSurface>>,
    nav: Rc<RefCell<NavController<DomNavSurface>>>,
    settings: SettingsStore,
    /// Endpoint path the answer service was built with.
    endpoint_path: String,
    mounted: bool,
}

#[wasm_bindgen]
impl SiteController {
    /// Reads settings from the page and binds every element. Listeners are
    /// registered by [`SiteController::mount`].
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<SiteController, JsValue> {
        Ok(Self::bind()?)
    }

    /// Registers event listeners and runs the first navigation pass.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.mounted {
            log::warn!("SiteController is already mounted");
            return Ok(());
        }
        self.bind_nav_listeners()?;
        self.nav.borrow_mut().start();
        if let Some(chat) = &self.chat {
            bind_chat_listeners(chat)?;
        }
        self.mounted = true;
        log::info!("SiteController mounted (chat: {})", self.chat.is_some());
        Ok(())
    }

    /// Submits `text` as if typed into the input; resolves to the outcome label.
    pub fn submit(&self, text: String) -> js_sys::Promise {
        let Some(chat) = self.chat.clone() else {
            return js_sys::Promise::reject(&JsValue::from_str("chat widget is not bound"));
        };
        wasm_bindgen_futures::future_to_promise(async move {
            let outcome = chat.submit(&text).await;
            Ok(JsValue::from_str(outcome.label()))
        })
    }

    #[wasm_bindgen(js_name = refreshNavigation)]
    pub fn refresh_navigation(&self) {
        self.nav.borrow_mut().handle_scroll();
    }

    #[wasm_bindgen(js_name = isPending)]
    pub fn is_pending(&self) -> bool {
        self.chat.as_ref().is_some_and(|chat| chat.is_pending())
    }

    #[wasm_bindgen(js_name = hasChat)]
    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }

    /// Current transcript as an array of `{ id, role, content }`.
    pub fn transcript(&self) -> Result<JsValue, JsValue> {
        let entries = match &self.chat {
            Some(chat) => chat
                .view()
                .transcript()
                .entries()
                .iter()
                .map(|entry| EntryView {
                    id: entry.id.0,
                    role: role_name(entry.role),
                    content: entry.content.clone(),
                })
                .collect::<Vec<_>>(),
            None => Vec::new(),
        };
        Ok(serde_wasm_bindgen::to_value(&entries)?)
    }

    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> Result<String, JsValue> {
        let json = self
            .settings
            .settings()
            .to_json_pretty()
            .context(SettingsSnafu {
                stage: "export-settings",
            })?;
        Ok(json)
    }

    /// Replaces settings from a JSON document layered over the defaults.
    ///
    /// Element bindings and the answer endpoint stay as bound at construction.
    #[wasm_bindgen(js_name = updateSettings)]
    pub fn update_settings(&self, json: &str) -> Result<(), JsValue> {
        let settings = SiteSettings::extract(Some(json)).context(SettingsSnafu {
            stage: "update-settings",
        })?;
        self.settings
            .update(pin_endpoint(settings, &self.endpoint_path));
        self.nav.borrow_mut().handle_scroll();
        Ok(())
    }
}

impl SiteController {
    fn bind() -> BindResult<Self> {
        let window = dom::window()?;
        let document = dom::document(&window)?;

        let embedded = document
            .get_element_by_id(SETTINGS_ELEMENT_ID)
            .and_then(|element| element.text_content());
        let settings = SettingsStore::load(embedded.as_deref());
        let current = settings.settings();

        let nav_surface = DomNavSurface::bind(&window, &document, &current.nav)?;
        let nav = Rc::new(RefCell::new(NavController::new(nav_surface, settings.clone())));

        let chat = optional_binding(
            "chat",
            bind_chat(&window, &document, &current, settings.clone()),
        );

        Ok(Self {
            chat,
            nav,
            endpoint_path: current.chat.endpoint_path.clone(),
            settings,
            mounted: false,
        })
    }

    fn bind_nav_listeners(&self) -> BindResult<()> {
        let window = dom::window()?;

        let nav = Rc::clone(&self.nav);
        let on_scroll = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            nav.borrow_mut().handle_scroll();
        });
        listen(&window, "scroll", on_scroll)?;

        let links = self.nav.borrow().surface().links().to_vec();
        for (index, link) in links.iter().enumerate() {
            let nav = Rc::clone(&self.nav);
            let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                nav.borrow_mut().handle_link_click(index);
            });
            listen(link, "click", on_click)?;
        }

        Ok(())
    }
}

fn bind_chat(
    window: &Window,
    document: &Document,
    current: &SiteSettings,
    settings: SettingsStore,
) -> BindResult<ExchangeController<DomChatSurface>> {
    let surface = DomChatSurface::bind(document, &current.chat.elements)?;

    let origin = window
        .location()
        .origin()
        .map_err(|value| BindError::dom("read-origin", value))?;
    let service = HttpAnswerService::new(&origin, &current.chat.endpoint_path).context(
        AnswerServiceSnafu {
            stage: "create-answer-service",
        },
    )?;
    log::info!("answer endpoint bound to {}", service.endpoint());
    let service: Rc<dyn AnswerService> = Rc::new(service);

    Ok(ExchangeController::new(surface, service, settings))
}

/// Keeps a part of the page that failed to bind out of the controller.
fn optional_binding<T>(part: &'static str, bound: BindResult<T>) -> Option<T> {
    match bound {
        Ok(value) => Some(value),
        Err(error) => {
            log::warn!("{part} disabled: {error}");
            None
        }
    }
}

/// The answer service is built once; later settings keep the bound endpoint.
fn pin_endpoint(mut next: SiteSettings, bound_path: &str) -> SiteSettings {
    if next.chat.endpoint_path != bound_path {
        log::warn!(
            "ignoring endpoint change to {}; answer service stays on {}",
            next.chat.endpoint_path,
            bound_path
        );
        next.chat.endpoint_path = bound_path.to_string();
    }
    next
}

fn bind_chat_listeners(chat: &ExchangeController<DomChatSurface>) -> BindResult<()> {
    let (send, input) = {
        let view = chat.view();
        (view.surface().send().clone(), view.surface().input().clone())
    };

    let on_send = chat.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        dispatch_input(&on_send, InputEvent::SendClicked);
    });
    listen(&send, "click", on_click)?;

    let on_key = chat.clone();
    let on_keypress = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        dispatch_input(&on_key, InputEvent::key(event.key()));
    });
    listen(&input, "keypress", on_keypress)?;

    Ok(())
}

/// Starts the exchange for submit events on the page's event loop.
fn dispatch_input(chat: &ExchangeController<DomChatSurface>, event: InputEvent) {
    match chat.handle_input_event(&event) {
        Some(Ok(pending)) => wasm_bindgen_futures::spawn_local(async move {
            pending.run().await;
        }),
        Some(Err(reason)) => log::debug!("submission ignored: {:?}", reason),
        None => {}
    }
}

/// Registers `callback` for the page lifetime.
fn listen<E: ?Sized + WasmClosure>(
    target: &EventTarget,
    event: &'static str,
    callback: Closure<E>,
) -> BindResult<()> {
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|value| BindError::dom("add-event-listener", value))?;
    callback.forget();
    Ok(())
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Bot => "bot",
        Role::Error => "error",
    }
}
