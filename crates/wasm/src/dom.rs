use atelier_chat::{ChatSurface, MessageEntry, NodeBody};
use atelier_nav::{NavSurface, SectionBounds};
use atelier_settings::{ChatElements, NavSettings};
use snafu::OptionExt;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

use crate::error::{
    BindError, BindResult, MissingDocumentSnafu, MissingElementSnafu, MissingWindowSnafu,
};

pub fn window() -> BindResult<Window> {
    web_sys::window().context(MissingWindowSnafu {
        stage: "lookup-window",
    })
}

pub fn document(window: &Window) -> BindResult<Document> {
    window.document().context(MissingDocumentSnafu {
        stage: "lookup-document",
    })
}

pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> BindResult<T> {
    let element = document
        .get_element_by_id(id)
        .context(MissingElementSnafu {
            stage: "bind-element",
            id,
        })?;
    element
        .dyn_into::<T>()
        .map_err(|_| BindError::WrongElementType {
            stage: "bind-element",
            id: id.to_string(),
            expected: std::any::type_name::<T>(),
        })
}

pub fn query_all(document: &Document, selector: &str) -> BindResult<Vec<Element>> {
    let list = document
        .query_selector_all(selector)
        .map_err(|value| BindError::dom("query-selector-all", value))?;
    Ok((0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Chat widgets bound by id at startup.
pub struct DomChatSurface {
    document: Document,
    input: HtmlInputElement,
    send: HtmlElement,
    messages: HtmlElement,
    indicator: HtmlElement,
}

impl DomChatSurface {
    pub fn bind(document: &Document, elements: &ChatElements) -> BindResult<Self> {
        Ok(Self {
            document: document.clone(),
            input: element_by_id(document, &elements.input_id)?,
            send: element_by_id(document, &elements.send_id)?,
            messages: element_by_id(document, &elements.messages_id)?,
            indicator: element_by_id(document, &elements.indicator_id)?,
        })
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    pub fn send(&self) -> &HtmlElement {
        &self.send
    }

    fn create_node(&self, entry: &MessageEntry) -> BindResult<Element> {
        let node = self
            .document
            .create_element("div")
            .map_err(|value| BindError::dom("create-entry-node", value))?;
        node.set_class_name(entry.role.css_class());
        match entry.body() {
            NodeBody::Text(text) => node.set_text_content(Some(text)),
            NodeBody::Markup(markup) => node.set_inner_html(markup),
        }
        Ok(node)
    }
}

impl ChatSurface for DomChatSurface {
    fn read_input(&self) -> String {
        self.input.value()
    }

    fn clear_input(&mut self) {
        self.input.set_value("");
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input.set_disabled(!enabled);
        let result = if enabled {
            self.send.remove_attribute("disabled")
        } else {
            self.send.set_attribute("disabled", "")
        };
        if let Err(value) = result {
            tracing::error!("failed to toggle send control: {:?}", value);
        }
    }

    fn append_entry(&mut self, entry: &MessageEntry) {
        let appended = self.create_node(entry).and_then(|node| {
            self.messages
                .append_child(&node)
                .map(|_| ())
                .map_err(|value| BindError::dom("append-entry-node", value))
        });
        if let Err(error) = appended {
            tracing::error!(entry = entry.id.0, "{}", error);
        }
    }

    fn scroll_to_latest(&mut self) {
        self.messages.set_scroll_top(self.messages.scroll_height());
    }

    fn set_indicator_visible(&mut self, visible: bool) {
        let display = if visible { "flex" } else { "none" };
        if let Err(value) = self.indicator.style().set_property("display", display) {
            tracing::error!("failed to toggle pending indicator: {:?}", value);
        }
    }
}

/// Navigation links, page sections and the navbar, found by selector at startup.
pub struct DomNavSurface {
    window: Window,
    sections: Vec<Element>,
    links: Vec<Element>,
    navbar: Option<Element>,
}

impl DomNavSurface {
    pub fn bind(window: &Window, document: &Document, settings: &NavSettings) -> BindResult<Self> {
        let navbar = document.get_element_by_id(&settings.navbar_id);
        if navbar.is_none() {
            tracing::debug!(id = %settings.navbar_id, "no navbar element, shade disabled");
        }

        Ok(Self {
            window: window.clone(),
            sections: query_all(document, &settings.section_selector)?,
            links: query_all(document, &settings.link_selector)?,
            navbar,
        })
    }

    pub fn links(&self) -> &[Element] {
        &self.links
    }
}

impl NavSurface for DomNavSurface {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn sections(&self) -> Vec<SectionBounds> {
        self.sections
            .iter()
            .map(|section| {
                let rect = section.get_bounding_client_rect();
                SectionBounds::new(section.id(), rect.top(), rect.bottom())
            })
            .collect()
    }

    fn link_hrefs(&self) -> Vec<String> {
        self.links
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect()
    }

    fn set_link_active(&mut self, index: usize, active: bool) {
        let Some(link) = self.links.get(index) else {
            return;
        };
        let class_list = link.class_list();
        let result = if active {
            class_list.add_1("active")
        } else {
            class_list.remove_1("active")
        };
        if let Err(value) = result {
            tracing::error!(index, "failed to toggle active link: {:?}", value);
        }
    }

    fn set_navbar_scrolled(&mut self, scrolled: bool) {
        let Some(navbar) = self.navbar.as_ref() else {
            return;
        };
        let class_list = navbar.class_list();
        let result = if scrolled {
            class_list.add_1("scrolled")
        } else {
            class_list.remove_1("scrolled")
        };
        if let Err(value) = result {
            tracing::error!("failed to toggle navbar shade: {:?}", value);
        }
    }
}
