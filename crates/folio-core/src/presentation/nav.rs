/// A page section that navigation entries point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    /// Offset of the section's first line from the top of the page
    pub top: u32,
    pub height: u32,
}

impl Section {
    pub fn new(id: impl Into<String>, top: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Scroll thresholds, in whatever unit the page is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// A section becomes active this far before its top reaches the viewport top
    pub active_offset: u32,
    /// The navbar switches to its scrolled style past this offset
    pub scrolled_after: u32,
    /// The back-to-top control appears past this offset
    pub back_to_top_after: u32,
    /// Height of the fixed navbar covering the top of the viewport
    pub nav_height: u32,
}

impl Default for ScrollMetrics {
    /// Pixel values used by the web page
    fn default() -> Self {
        Self {
            active_offset: 150,
            scrolled_after: 50,
            back_to_top_after: 500,
            nav_height: 80,
        }
    }
}

/// Section layout plus thresholds; answers every scroll-driven question.
#[derive(Debug, Clone, Default)]
pub struct NavLayout {
    sections: Vec<Section>,
    metrics: ScrollMetrics,
}

impl NavLayout {
    pub fn new(sections: Vec<Section>, metrics: ScrollMetrics) -> Self {
        Self { sections, metrics }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    /// The last section, in page order, whose top is within
    /// `active_offset` of the scroll position.
    pub fn active_section(&self, scroll: u32) -> Option<&str> {
        self.sections
            .iter()
            .filter(|s| scroll.saturating_add(self.metrics.active_offset) >= s.top)
            .last()
            .map(|s| s.id.as_str())
    }

    /// Scroll offset that brings a section just below the fixed navbar
    pub fn scroll_target(&self, id: &str) -> Option<u32> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.top.saturating_sub(self.metrics.nav_height))
    }

    pub fn navbar_scrolled(&self, scroll: u32) -> bool {
        scroll > self.metrics.scrolled_after
    }

    pub fn back_to_top_visible(&self, scroll: u32) -> bool {
        scroll > self.metrics.back_to_top_after
    }
}

/// Percentage of the scrollable distance covered, clamped to 0..=100.
/// A page that fits in the viewport reports 0.
pub fn scroll_progress(scroll: u32, page_height: u32, viewport_height: u32) -> f64 {
    let scrollable = page_height.saturating_sub(viewport_height);
    if scrollable == 0 {
        return 0.0;
    }
    (f64::from(scroll) / f64::from(scrollable) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> NavLayout {
        NavLayout::new(
            vec![
                Section::new("home", 0, 600),
                Section::new("about", 600, 800),
                Section::new("certificates", 1400, 1000),
                Section::new("contact", 2400, 400),
            ],
            ScrollMetrics::default(),
        )
    }

    #[test]
    fn test_active_section() {
        let nav = layout();
        assert_eq!(nav.active_section(0), Some("home"));
        assert_eq!(nav.active_section(449), Some("home"));
        assert_eq!(nav.active_section(450), Some("about"));
        assert_eq!(nav.active_section(1250), Some("certificates"));
        assert_eq!(nav.active_section(5000), Some("contact"));
    }

    #[test]
    fn test_no_active_section_above_first() {
        let nav = NavLayout::new(vec![Section::new("about", 400, 100)], ScrollMetrics::default());
        assert_eq!(nav.active_section(0), None);
        assert_eq!(nav.active_section(250), Some("about"));
    }

    #[test]
    fn test_active_section_at_max_scroll() {
        let nav = layout();
        assert_eq!(nav.active_section(u32::MAX), Some("contact"));
    }

    #[test]
    fn test_scroll_target_accounts_for_navbar() {
        let nav = layout();
        assert_eq!(nav.scroll_target("about"), Some(520));
        assert_eq!(nav.scroll_target("home"), Some(0));
        assert_eq!(nav.scroll_target("missing"), None);
    }

    #[test]
    fn test_navbar_and_back_to_top_thresholds() {
        let nav = layout();
        assert!(!nav.navbar_scrolled(50));
        assert!(nav.navbar_scrolled(51));
        assert!(!nav.back_to_top_visible(500));
        assert!(nav.back_to_top_visible(501));
    }

    #[test]
    fn test_scroll_progress() {
        assert_eq!(scroll_progress(0, 2000, 1000), 0.0);
        assert_eq!(scroll_progress(500, 2000, 1000), 50.0);
        assert_eq!(scroll_progress(1500, 2000, 1000), 100.0);
        assert_eq!(scroll_progress(10, 500, 1000), 0.0);
    }
}
