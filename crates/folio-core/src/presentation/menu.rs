/// Things that happen to the collapsible navigation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    /// The menu button was pressed
    Toggle,
    /// A link inside the menu was followed
    LinkActivated,
    /// A click landed outside both the menu and its button
    ClickOutside,
    Escape,
}

/// Open/closed state of the mobile navigation menu. Starts closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Apply an event. Returns whether the open state changed.
    pub fn handle(&mut self, event: MenuEvent) -> bool {
        let was_open = self.open;
        self.open = match event {
            MenuEvent::Toggle => !self.open,
            MenuEvent::LinkActivated | MenuEvent::ClickOutside | MenuEvent::Escape => false,
        };
        was_open != self.open
    }

    /// Value for the menu button's `aria-expanded` attribute
    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Home,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    CloseMenu,
    ScrollToTop,
}

/// Page-wide keyboard shortcuts: Escape closes an open menu, Ctrl+Home
/// scrolls to the top.
pub fn keyboard_action(key: Key, ctrl: bool, menu: &MobileMenu) -> Option<KeyAction> {
    match key {
        Key::Escape if menu.is_open() => Some(KeyAction::CloseMenu),
        Key::Home if ctrl => Some(KeyAction::ScrollToTop),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut menu = MobileMenu::default();
        assert!(!menu.is_open());
        assert!(menu.handle(MenuEvent::Toggle));
        assert!(menu.is_open());
        assert_eq!(menu.aria_expanded(), "true");
        assert!(menu.handle(MenuEvent::Toggle));
        assert_eq!(menu.aria_expanded(), "false");
    }

    #[test]
    fn test_close_events() {
        for event in [MenuEvent::LinkActivated, MenuEvent::ClickOutside, MenuEvent::Escape] {
            let mut menu = MobileMenu::default();
            menu.handle(MenuEvent::Toggle);
            assert!(menu.handle(event), "{:?}", event);
            assert!(!menu.is_open());
            // Already closed: nothing changes
            assert!(!menu.handle(event));
        }
    }

    #[test]
    fn test_keyboard_actions() {
        let closed = MobileMenu::default();
        let mut open = MobileMenu::default();
        open.handle(MenuEvent::Toggle);

        assert_eq!(keyboard_action(Key::Escape, false, &open), Some(KeyAction::CloseMenu));
        assert_eq!(keyboard_action(Key::Escape, false, &closed), None);
        assert_eq!(keyboard_action(Key::Home, true, &closed), Some(KeyAction::ScrollToTop));
        assert_eq!(keyboard_action(Key::Home, false, &closed), None);
        assert_eq!(keyboard_action(Key::Other, true, &open), None);
    }
}
