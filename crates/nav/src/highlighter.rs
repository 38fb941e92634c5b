use atelier_settings::{GapPolicy, NavSettings};

/// Snapshot of one page section, in viewport coordinates, taken this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub bottom: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> Self {
        Self {
            id: id.into(),
            top,
            bottom,
        }
    }

    /// True when the section straddles the horizontal line at `offset`.
    pub fn spans(&self, offset: f64) -> bool {
        self.top <= offset && self.bottom > offset
    }
}

/// Which navigation target is current.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ActiveLink {
    /// Sentinel for the top of the page.
    #[default]
    Top,
    Section(String),
}

impl ActiveLink {
    /// Maps a section id to its target; the sentinel id maps to [`ActiveLink::Top`].
    pub fn from_id(id: &str, top_sentinel: &str) -> Self {
        if id == top_sentinel {
            Self::Top
        } else {
            Self::Section(id.to_string())
        }
    }

    /// Maps a link `href` (`#pricing`) to its target.
    pub fn from_href(href: &str, top_sentinel: &str) -> Self {
        Self::from_id(href.trim().trim_start_matches('#'), top_sentinel)
    }

    pub fn id<'a>(&'a self, top_sentinel: &'a str) -> &'a str {
        match self {
            Self::Top => top_sentinel,
            Self::Section(id) => id,
        }
    }
}

/// Last section scanning backwards that spans `offset`; later sections win ties.
pub fn spanning_section(sections: &[SectionBounds], offset: f64) -> Option<&SectionBounds> {
    sections.iter().rev().find(|section| section.spans(offset))
}

/// Scroll-driven selection of the current navigation target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighter {
    active: ActiveLink,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &ActiveLink {
        &self.active
    }

    /// Selection for this tick without mutating state.
    ///
    /// At scroll offset zero the sentinel always wins, whatever the section
    /// geometry says.
    pub fn select(
        &self,
        scroll_y: f64,
        sections: &[SectionBounds],
        settings: &NavSettings,
    ) -> ActiveLink {
        if scroll_y <= 0.0 {
            return ActiveLink::Top;
        }

        match spanning_section(sections, settings.activation_offset) {
            Some(section) => ActiveLink::from_id(&section.id, &settings.top_sentinel),
            None => match settings.gap_policy {
                GapPolicy::Retain => self.active.clone(),
                GapPolicy::Top => ActiveLink::Top,
            },
        }
    }

    /// Recomputes the selection. Returns true when it changed.
    pub fn on_scroll(
        &mut self,
        scroll_y: f64,
        sections: &[SectionBounds],
        settings: &NavSettings,
    ) -> bool {
        let next = self.select(scroll_y, sections, settings);
        if next == self.active {
            return false;
        }
        tracing::debug!(from = ?self.active, to = ?next, scroll_y, "active navigation link changed");
        self.active = next;
        true
    }

    /// A click forces its target until the next scroll tick.
    pub fn force(&mut self, target: ActiveLink) {
        self.active = target;
    }
}
