//! Scroll state for the Showcase tab.
//!
//! The page is laid out in terminal rows: a hero, an about section, one
//! block per certificate and a contact footer. Sections fade in the first
//! time they scroll into view and certificate images resolve lazily.

use std::time::Instant;

use folio_core::config::Profile;
use folio_core::models::Certificate;
use folio_core::presentation::{
    scroll_progress, LazyImage, MenuEvent, MobileMenu, NavLayout, Reveal, ScrollMetrics, Section,
    Typewriter, Viewport,
};

/// Section ids and menu labels, in page order
pub const SECTIONS: [(&str, &str); 4] = [
    ("home", "Home"),
    ("about", "About"),
    ("certificates", "Certificates"),
    ("contact", "Contact"),
];

/// Rows taken by one certificate entry
pub const CERT_ROWS: u32 = 3;

/// Rows before the first entry of a section (heading plus spacer)
pub const SECTION_HEADER_ROWS: u32 = 2;

const HERO_ROWS: u32 = 7;

/// Rows the viewport bottom is pulled in by for fade-in checks
const REVEAL_INSET_ROWS: u32 = 2;

/// Row-scale scroll thresholds
pub fn row_metrics() -> ScrollMetrics {
    ScrollMetrics {
        active_offset: 3,
        scrolled_after: 1,
        back_to_top_after: 10,
        nav_height: 1,
    }
}

pub struct Showcase {
    pub typewriter: Typewriter,
    pub menu: MobileMenu,
    pub menu_selection: usize,
    scroll: u32,
    viewport_height: u32,
    layout: NavLayout,
    reveals: Vec<Reveal>,
    images: Vec<LazyImage>,
}

impl Showcase {
    pub fn new(profile: &Profile) -> Self {
        let mut showcase = Self {
            typewriter: Typewriter::new(profile.roles.clone()),
            menu: MobileMenu::default(),
            menu_selection: 0,
            scroll: 0,
            viewport_height: 0,
            layout: NavLayout::default(),
            reveals: Vec::new(),
            images: Vec::new(),
        };
        showcase.rebuild(profile, &[], "");
        showcase
    }

    /// Recompute the layout after the profile or certificate list changed.
    /// Reveal state survives; images start over.
    pub fn rebuild(&mut self, profile: &Profile, certificates: &[Certificate], api_base: &str) {
        let heights = section_heights(profile, certificates.len());
        let mut top = 0;
        let sections = SECTIONS
            .iter()
            .zip(heights)
            .map(|((id, _), height)| {
                let section = Section::new(*id, top, height);
                top += height;
                section
            })
            .collect();
        self.layout = NavLayout::new(sections, row_metrics());
        self.reveals.resize(SECTIONS.len(), Reveal::default());
        self.images = certificates
            .iter()
            .map(|c| LazyImage::new("", c.image_url(api_base)))
            .collect();
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn set_viewport_height(&mut self, rows: u32) {
        self.viewport_height = rows;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn layout(&self) -> &NavLayout {
        &self.layout
    }

    pub fn scroll(&self) -> u32 {
        self.scroll
    }

    pub fn page_height(&self) -> u32 {
        self.layout.sections().iter().map(|s| s.height).sum()
    }

    fn max_scroll(&self) -> u32 {
        self.page_height().saturating_sub(self.viewport_height)
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let target = i64::from(self.scroll) + i64::from(delta);
        self.scroll = target.clamp(0, i64::from(self.max_scroll())) as u32;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Follow a menu link: close the menu and bring the section into view
    pub fn jump_to(&mut self, id: &str) {
        self.menu.handle(MenuEvent::LinkActivated);
        if let Some(target) = self.layout.scroll_target(id) {
            self.scroll = target.min(self.max_scroll());
        }
    }

    pub fn active_section(&self) -> Option<&str> {
        self.layout.active_section(self.scroll)
    }

    pub fn progress(&self) -> f64 {
        scroll_progress(self.scroll, self.page_height(), self.viewport_height)
    }

    pub fn is_revealed(&self, section: usize) -> bool {
        self.reveals.get(section).map(Reveal::is_revealed).unwrap_or(false)
    }

    pub fn opacity(&self, section: usize) -> f64 {
        self.reveals.get(section).map(Reveal::opacity).unwrap_or(0.0)
    }

    /// Resolved image URL for a certificate entry, once it has been seen
    pub fn image(&self, index: usize) -> Option<&LazyImage> {
        self.images.get(index)
    }

    /// Advance timers and re-check what is in view. Returns whether
    /// anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.typewriter.poll(now);
        if self.viewport_height == 0 {
            return changed;
        }

        let reveal_view =
            Viewport::new(self.scroll, self.viewport_height).with_bottom_inset(REVEAL_INSET_ROWS);
        for (reveal, section) in self.reveals.iter_mut().zip(self.layout.sections()) {
            changed |= reveal.observe(reveal_view.intersection_ratio(section.top, section.height));
        }

        let view = Viewport::new(self.scroll, self.viewport_height);
        if let Some(certs) = self.layout.sections().iter().find(|s| s.id == "certificates") {
            let first_row = certs.top + SECTION_HEADER_ROWS;
            for (i, image) in self.images.iter_mut().enumerate() {
                let top = first_row + i as u32 * CERT_ROWS;
                changed |= image.observe(view.intersects(top, CERT_ROWS));
            }
        }
        changed
    }
}

/// Row heights of each section, in `SECTIONS` order
pub fn section_heights(profile: &Profile, certificate_count: usize) -> [u32; 4] {
    let about_rows = profile.about.lines().count().max(1) as u32;
    let cert_rows = (certificate_count as u32).max(1) * CERT_ROWS;
    let contact_rows = profile.contact.len().max(1) as u32;
    [
        HERO_ROWS,
        SECTION_HEADER_ROWS + about_rows + 1,
        SECTION_HEADER_ROWS + cert_rows + 1,
        // contact lines, spacer, footer
        SECTION_HEADER_ROWS + contact_rows + 2,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn profile() -> Profile {
        Profile {
            name: "Test".to_string(),
            roles: vec!["Engineer".to_string()],
            about: "Line one\nLine two".to_string(),
            contact: vec!["mail@example.com".to_string()],
        }
    }

    fn certs(n: usize) -> Vec<Certificate> {
        (0..n)
            .map(|i| Certificate {
                id: i as i64,
                title: Some(format!("Cert {}", i)),
                issuer: None,
                issue_date: None,
                expiry_date: None,
                credential_id: None,
                verify_url: None,
                tags: None,
                image_path: Some(format!("uploads/{}.png", i)),
                created_at: None,
            })
            .collect()
    }

    fn showcase(cert_count: usize, viewport: u32) -> Showcase {
        let mut showcase = Showcase::new(&profile());
        showcase.rebuild(&profile(), &certs(cert_count), "http://api");
        showcase.set_viewport_height(viewport);
        showcase
    }

    #[test]
    fn test_layout_follows_content() {
        let showcase = showcase(4, 10);
        let tops: Vec<u32> = showcase.layout().sections().iter().map(|s| s.top).collect();
        // hero 7, about 2+2+1, certificates 2+12+1
        assert_eq!(tops, vec![0, 7, 12, 27]);
        assert_eq!(showcase.page_height(), 32);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut showcase = showcase(4, 10);
        showcase.scroll_by(-5);
        assert_eq!(showcase.scroll(), 0);
        showcase.scroll_by(1000);
        assert_eq!(showcase.scroll(), 22);
        assert_eq!(showcase.progress(), 100.0);
    }

    #[test]
    fn test_jump_to_closes_menu() {
        let mut showcase = showcase(4, 10);
        showcase.menu.handle(MenuEvent::Toggle);
        showcase.jump_to("certificates");
        assert!(!showcase.menu.is_open());
        assert_eq!(showcase.scroll(), 11);
        assert_eq!(showcase.active_section(), Some("certificates"));
    }

    #[test]
    fn test_sections_reveal_once_in_view() {
        let mut showcase = showcase(4, 10);
        let now = Instant::now();
        showcase.tick(now);
        assert!(showcase.is_revealed(0));
        assert!(showcase.is_revealed(1));
        assert!(!showcase.is_revealed(2));

        showcase.scroll_by(15);
        showcase.tick(now);
        assert!(showcase.is_revealed(2));

        showcase.scroll_to_top();
        showcase.tick(now);
        assert!(showcase.is_revealed(2));
    }

    #[test]
    fn test_images_load_when_rows_are_visible() {
        let mut showcase = showcase(4, 16);
        showcase.tick(Instant::now());
        // Rows 14..16 hold the first entry; rows 17.. are below the fold
        assert!(showcase.image(0).unwrap().is_loaded());
        assert!(!showcase.image(1).unwrap().is_loaded());
        assert_eq!(showcase.image(0).unwrap().src(), "http://api/uploads/0.png");

        showcase.scroll_by(20);
        showcase.tick(Instant::now());
        assert!(showcase.image(3).unwrap().is_loaded());
    }

    #[test]
    fn test_tick_drives_typewriter() {
        let mut showcase = showcase(0, 10);
        let start = Instant::now();
        showcase.tick(start);
        assert!(showcase.tick(start + Duration::from_secs(1)));
        assert_eq!(showcase.typewriter.text(), "E");
    }
}
