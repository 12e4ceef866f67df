/// Minimum visible fraction before a hidden element fades in
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// How far the viewport's bottom edge is pulled in for reveal checks
pub const REVEAL_BOTTOM_INSET: u32 = 100;

/// The visible window onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: u32,
    pub height: u32,
    /// Shrinks the viewport from the bottom, like a negative root margin
    pub bottom_inset: u32,
}

impl Viewport {
    pub fn new(top: u32, height: u32) -> Self {
        Self {
            top,
            height,
            bottom_inset: 0,
        }
    }

    pub fn with_bottom_inset(self, bottom_inset: u32) -> Self {
        Self {
            bottom_inset,
            ..self
        }
    }

    fn bottom(&self) -> u32 {
        self.top
            .saturating_add(self.height.saturating_sub(self.bottom_inset))
    }

    /// Fraction of an element (0.0..=1.0) inside the viewport.
    /// Zero-height elements count as fully visible when their top is inside.
    pub fn intersection_ratio(&self, top: u32, height: u32) -> f64 {
        let bottom = self.bottom();
        if height == 0 {
            return if top >= self.top && top < bottom { 1.0 } else { 0.0 };
        }
        let start = top.max(self.top);
        let end = top.saturating_add(height).min(bottom);
        if end <= start {
            0.0
        } else {
            f64::from(end - start) / f64::from(height)
        }
    }

    pub fn intersects(&self, top: u32, height: u32) -> bool {
        self.intersection_ratio(top, height) > 0.0
    }
}

/// An image whose real source is only assigned once it scrolls into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyImage {
    src: String,
    data_src: Option<String>,
    loaded: bool,
}

impl LazyImage {
    pub fn new(src: impl Into<String>, data_src: Option<String>) -> Self {
        Self {
            src: src.into(),
            data_src,
            loaded: false,
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Still waiting to come into view
    pub fn is_observed(&self) -> bool {
        !self.loaded
    }

    /// Report whether the image currently intersects the viewport.
    /// Returns true only on the call that performs the swap.
    pub fn observe(&mut self, intersecting: bool) -> bool {
        if self.loaded || !intersecting {
            return false;
        }
        if let Some(real) = self.data_src.take() {
            self.src = real;
        }
        self.loaded = true;
        true
    }
}

/// Fade-in state for an element. Once shown it stays shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reveal {
    revealed: bool,
}

impl Reveal {
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Report the element's current intersection ratio.
    /// Returns true on the call that reveals it.
    pub fn observe(&mut self, ratio: f64) -> bool {
        if self.revealed || ratio <= 0.0 || ratio < REVEAL_THRESHOLD {
            return false;
        }
        self.revealed = true;
        true
    }

    pub fn opacity(&self) -> f64 {
        if self.revealed {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_ratio() {
        let viewport = Viewport::new(100, 100);
        assert_eq!(viewport.intersection_ratio(100, 50), 1.0);
        assert_eq!(viewport.intersection_ratio(180, 40), 0.5);
        assert_eq!(viewport.intersection_ratio(200, 10), 0.0);
        assert_eq!(viewport.intersection_ratio(0, 100), 0.0);
        assert_eq!(viewport.intersection_ratio(50, 100), 0.5);
    }

    #[test]
    fn test_bottom_inset() {
        let viewport = Viewport::new(0, 500).with_bottom_inset(REVEAL_BOTTOM_INSET);
        assert!(viewport.intersects(399, 10));
        assert!(!viewport.intersects(400, 10));
        assert_eq!(viewport.intersection_ratio(350, 100), 0.5);
    }

    #[test]
    fn test_zero_height_element() {
        let viewport = Viewport::new(10, 10);
        assert_eq!(viewport.intersection_ratio(15, 0), 1.0);
        assert_eq!(viewport.intersection_ratio(20, 0), 0.0);
    }

    #[test]
    fn test_offsets_near_u32_max() {
        let viewport = Viewport::new(u32::MAX - 5, 100);
        assert_eq!(viewport.intersection_ratio(u32::MAX - 5, 5), 1.0);
        assert!(viewport.intersects(u32::MAX - 1, 100));
        assert!(!Viewport::new(0, 10).intersects(u32::MAX, u32::MAX));
    }

    #[test]
    fn test_lazy_image_swaps_once() {
        let mut img = LazyImage::new("placeholder.png", Some("real.png".into()));
        assert!(!img.observe(false));
        assert_eq!(img.src(), "placeholder.png");

        assert!(img.observe(true));
        assert_eq!(img.src(), "real.png");
        assert!(img.is_loaded());
        assert!(!img.is_observed());

        assert!(!img.observe(true));
        assert_eq!(img.src(), "real.png");
    }

    #[test]
    fn test_lazy_image_without_data_src_keeps_src() {
        let mut img = LazyImage::new("photo.jpg", None);
        assert!(img.observe(true));
        assert_eq!(img.src(), "photo.jpg");
        assert!(img.is_loaded());
    }

    #[test]
    fn test_reveal_threshold() {
        let mut reveal = Reveal::default();
        assert_eq!(reveal.opacity(), 0.0);
        assert!(!reveal.observe(0.05));
        assert!(reveal.observe(0.1));
        assert_eq!(reveal.opacity(), 1.0);
        // Never hidden again
        assert!(!reveal.observe(0.0));
        assert!(reveal.is_revealed());
    }
}
