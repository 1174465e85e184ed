use std::time::{Duration, Instant};

/// Which part of the screen receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Lookup,
    Results,
}

impl Focus {
    /// Lookup box or result list: the two places that keep the list open.
    pub fn keeps_list_open(self) -> bool {
        matches!(self, Self::Lookup | Self::Results)
    }
}

impl std::fmt::Display for Focus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Editor => write!(f, "QUERY"),
            Self::Lookup => write!(f, "LOOKUP"),
            Self::Results => write!(f, "RESULTS"),
        }
    }
}

/// Shows the result list while the lookup box is focused and hides it a
/// grace period after focus leaves, so a click on a list item lands first.
#[derive(Debug)]
pub struct FocusController {
    visible: bool,
    hide_at: Option<Instant>,
    grace: Duration,
}

impl FocusController {
    pub fn new(grace: Duration) -> Self {
        Self {
            visible: false,
            hide_at: None,
            grace,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide_pending(&self) -> bool {
        self.hide_at.is_some()
    }

    pub fn on_focus(&mut self) {
        self.visible = true;
        self.hide_at = None;
    }

    pub fn on_blur(&mut self, now: Instant) {
        self.hide_at = Some(now + self.grace);
    }

    /// Fire a due hide. Returns `true` when the list was hidden.
    pub fn poll(&mut self, now: Instant, focus: Focus) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.hide_at = None;
                if focus.keeps_list_open() {
                    return false;
                }
                self.visible = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRACE: Duration = Duration::from_millis(200);

    #[test]
    fn test_focus_shows_list() {
        let mut ctl = FocusController::new(GRACE);
        assert!(!ctl.is_visible());
        ctl.on_focus();
        assert!(ctl.is_visible());
    }

    #[test]
    fn test_blur_hides_only_after_grace() {
        let mut ctl = FocusController::new(GRACE);
        let t0 = Instant::now();
        ctl.on_focus();
        ctl.on_blur(t0);

        assert!(!ctl.poll(t0 + Duration::from_millis(199), Focus::Editor));
        assert!(ctl.is_visible());

        assert!(ctl.poll(t0 + GRACE, Focus::Editor));
        assert!(!ctl.is_visible());
        assert!(!ctl.hide_pending());
    }

    #[test]
    fn test_focus_in_list_keeps_it_open() {
        let mut ctl = FocusController::new(GRACE);
        let t0 = Instant::now();
        ctl.on_focus();
        ctl.on_blur(t0);

        assert!(!ctl.poll(t0 + Duration::from_secs(1), Focus::Results));
        assert!(ctl.is_visible());
    }

    #[test]
    fn test_refocus_cancels_pending_hide() {
        let mut ctl = FocusController::new(GRACE);
        let t0 = Instant::now();
        ctl.on_focus();
        ctl.on_blur(t0);
        ctl.on_focus();

        assert!(!ctl.poll(t0 + Duration::from_secs(1), Focus::Editor));
        assert!(ctl.is_visible());
    }
}
