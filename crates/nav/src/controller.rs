use atelier_settings::SettingsStore;

use crate::highlighter::{ActiveLink, Highlighter, SectionBounds};

/// Page elements the navigation controller reads and marks.
pub trait NavSurface {
    /// Current vertical page scroll offset.
    fn scroll_y(&self) -> f64;
    /// Sections in document order, measured now.
    fn sections(&self) -> Vec<SectionBounds>;
    /// `href` of every navigation link, in document order.
    fn link_hrefs(&self) -> Vec<String>;
    fn set_link_active(&mut self, index: usize, active: bool);
    fn set_navbar_scrolled(&mut self, scrolled: bool);
}

/// Keeps the navigation bar in step with scrolling and link clicks.
pub struct NavController<S> {
    surface: S,
    highlighter: Highlighter,
    scrolled: Option<bool>,
    settings: SettingsStore,
}

impl<S: NavSurface> NavController<S> {
    pub fn new(surface: S, settings: SettingsStore) -> Self {
        Self {
            surface,
            highlighter: Highlighter::new(),
            scrolled: None,
            settings,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn active(&self) -> &ActiveLink {
        self.highlighter.active()
    }

    /// Startup pass; identical to a scroll tick.
    pub fn start(&mut self) {
        self.handle_scroll();
    }

    pub fn handle_scroll(&mut self) {
        let settings = self.settings.settings();
        let scroll_y = self.surface.scroll_y();
        let sections = self.surface.sections();

        self.highlighter.on_scroll(scroll_y, &sections, &settings.nav);
        self.apply_active(&settings.nav.top_sentinel);

        let scrolled = scroll_y > settings.nav.scrolled_threshold;
        if self.scrolled != Some(scrolled) {
            self.scrolled = Some(scrolled);
            self.surface.set_navbar_scrolled(scrolled);
        }
    }

    /// Forces the clicked link active until the next scroll tick.
    pub fn handle_link_click(&mut self, index: usize) {
        let settings = self.settings.settings();
        let Some(href) = self.surface.link_hrefs().into_iter().nth(index) else {
            tracing::warn!(index, "click on unknown navigation link");
            return;
        };

        self.highlighter
            .force(ActiveLink::from_href(&href, &settings.nav.top_sentinel));
        self.apply_active(&settings.nav.top_sentinel);
    }

    /// Marks exactly the links targeting the current selection.
    fn apply_active(&mut self, top_sentinel: &str) {
        let active = self.highlighter.active().clone();
        for (index, href) in self.surface.link_hrefs().iter().enumerate() {
            let is_active = ActiveLink::from_href(href, top_sentinel) == active;
            self.surface.set_link_active(index, is_active);
        }
    }
}

/// Headless navigation surface with a fixed page layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryNavSurface {
    pub scroll_y: f64,
    /// Section positions relative to the document top.
    pub layout: Vec<SectionBounds>,
    pub hrefs: Vec<String>,
    pub active: Vec<bool>,
    pub navbar_scrolled: bool,
}

impl MemoryNavSurface {
    pub fn new(layout: Vec<SectionBounds>, hrefs: Vec<String>) -> Self {
        let active = vec![false; hrefs.len()];
        Self {
            scroll_y: 0.0,
            layout,
            hrefs,
            active,
            navbar_scrolled: false,
        }
    }

    pub fn active_hrefs(&self) -> Vec<&str> {
        self.hrefs
            .iter()
            .zip(&self.active)
            .filter(|(_, active)| **active)
            .map(|(href, _)| href.as_str())
            .collect()
    }
}

impl NavSurface for MemoryNavSurface {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn sections(&self) -> Vec<SectionBounds> {
        self.layout
            .iter()
            .map(|section| {
                SectionBounds::new(
                    section.id.clone(),
                    section.top - self.scroll_y,
                    section.bottom - self.scroll_y,
                )
            })
            .collect()
    }

    fn link_hrefs(&self) -> Vec<String> {
        self.hrefs.clone()
    }

    fn set_link_active(&mut self, index: usize, active: bool) {
        if let Some(slot) = self.active.get_mut(index) {
            *slot = active;
        }
    }

    fn set_navbar_scrolled(&mut self, scrolled: bool) {
        self.navbar_scrolled = scrolled;
    }
}

#[cfg(test)]
mod tests {
    use atelier_settings::{GapPolicy, SiteSettings};

    use super::*;

    fn site() -> MemoryNavSurface {
        MemoryNavSurface::new(
            vec![
                SectionBounds::new("about", 600.0, 1400.0),
                SectionBounds::new("pricing", 1400.0, 2200.0),
                SectionBounds::new("contact", 2200.0, 2600.0),
            ],
            ["#top", "#about", "#pricing", "#contact"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    fn controller(settings: SiteSettings) -> NavController<MemoryNavSurface> {
        NavController::new(site(), SettingsStore::new(settings))
    }

    fn scroll_to(controller: &mut NavController<MemoryNavSurface>, y: f64) {
        controller.surface.scroll_y = y;
        controller.handle_scroll();
    }

    #[test]
    fn startup_marks_top_only() {
        let mut controller = controller(SiteSettings::default());
        controller.start();

        assert_eq!(controller.surface().active_hrefs(), vec!["#top"]);
        assert!(!controller.surface().navbar_scrolled);
    }

    #[test]
    fn pricing_scenario_then_back_to_top() {
        let mut controller = controller(SiteSettings::default());
        controller.start();

        // pricing top edge at 1400 - 1320 = 80, bottom far below the 100px line.
        scroll_to(&mut controller, 1320.0);
        assert_eq!(controller.surface().active_hrefs(), vec!["#pricing"]);
        assert!(controller.surface().navbar_scrolled);

        scroll_to(&mut controller, 0.0);
        assert_eq!(controller.surface().active_hrefs(), vec!["#top"]);
        assert!(!controller.surface().navbar_scrolled);
    }

    #[test]
    fn click_overrides_until_next_scroll() {
        let mut controller = controller(SiteSettings::default());
        scroll_to(&mut controller, 1320.0);

        controller.handle_link_click(3);
        assert_eq!(controller.surface().active_hrefs(), vec!["#contact"]);
        assert_eq!(controller.active(), &ActiveLink::Section("contact".to_string()));

        scroll_to(&mut controller, 1330.0);
        assert_eq!(controller.surface().active_hrefs(), vec!["#pricing"]);
    }

    #[test]
    fn click_on_missing_link_changes_nothing() {
        let mut controller = controller(SiteSettings::default());
        controller.start();
        controller.handle_link_click(42);
        assert_eq!(controller.surface().active_hrefs(), vec!["#top"]);
    }

    #[test]
    fn hero_gap_keeps_selection_or_falls_back_to_top() {
        // Between 0 and 500 nothing spans the offset line: the page starts with a hero.
        let mut retain = controller(SiteSettings::default());
        scroll_to(&mut retain, 700.0);
        assert_eq!(retain.surface().active_hrefs(), vec!["#about"]);
        scroll_to(&mut retain, 300.0);
        assert_eq!(retain.surface().active_hrefs(), vec!["#about"]);

        let mut settings = SiteSettings::default();
        settings.nav.gap_policy = GapPolicy::Top;
        let mut fallback = controller(settings);
        scroll_to(&mut fallback, 700.0);
        scroll_to(&mut fallback, 300.0);
        assert_eq!(fallback.surface().active_hrefs(), vec!["#top"]);
    }

    #[test]
    fn navbar_shade_tracks_threshold() {
        let mut controller = controller(SiteSettings::default());
        scroll_to(&mut controller, 50.0);
        assert!(!controller.surface().navbar_scrolled);
        scroll_to(&mut controller, 51.0);
        assert!(controller.surface().navbar_scrolled);
    }

    #[test]
    fn scrolling_inside_top_section_keeps_top_link_active() {
        let surface = MemoryNavSurface::new(
            vec![
                SectionBounds::new("top", 0.0, 600.0),
                SectionBounds::new("pricing", 600.0, 1400.0),
            ],
            vec!["#top".to_string(), "#pricing".to_string()],
        );
        let mut controller = NavController::new(surface, SettingsStore::default());
        controller.start();

        scroll_to(&mut controller, 200.0);
        assert_eq!(controller.active(), &ActiveLink::Top);
        assert_eq!(controller.surface().active_hrefs(), vec!["#top"]);

        scroll_to(&mut controller, 700.0);
        assert_eq!(controller.surface().active_hrefs(), vec!["#pricing"]);
    }

    #[test]
    fn exactly_one_link_active_after_every_tick() {
        let mut controller = controller(SiteSettings::default());
        for y in [0.0, 120.0, 520.0, 900.0, 1320.0, 2150.0, 2400.0, 10.0, 0.0] {
            scroll_to(&mut controller, y);
            assert_eq!(controller.surface().active_hrefs().len(), 1, "at {y}");
        }
    }
}
