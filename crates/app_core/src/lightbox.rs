//! Lightbox controller: which filtered index is open, and its slideshow

use crate::timer::RepeatingTimer;
use crate::AppError;
use std::time::{Duration, Instant};

/// Something that can enter and leave fullscreen
pub trait FullscreenSurface {
    fn is_fullscreen(&self) -> bool;
    fn set_fullscreen(&self, fullscreen: bool) -> Result<(), AppError>;
}

/// Lightbox state. The slideshow timer only exists inside `Open`, so any
/// transition to `Closed` drops it.
#[derive(Debug, Clone, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open {
        index: usize,
        slideshow: Option<RepeatingTimer>,
    },
}

/// Lightbox controller
#[derive(Debug, Clone)]
pub struct Lightbox {
    state: LightboxState,
    slideshow_interval: Duration,
}

impl Lightbox {
    pub fn new(slideshow_interval: Duration) -> Self {
        Self {
            state: LightboxState::Closed,
            slideshow_interval,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    /// Current selection while open
    pub fn index(&self) -> Option<usize> {
        match self.state {
            LightboxState::Open { index, .. } => Some(index),
            LightboxState::Closed => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, LightboxState::Open { slideshow: Some(_), .. })
    }

    pub fn slideshow_progress(&self, now: Instant) -> Option<f32> {
        match &self.state {
            LightboxState::Open { slideshow: Some(timer), .. } => Some(timer.progress(now)),
            _ => None,
        }
    }

    pub fn next_slideshow_tick(&self) -> Option<Instant> {
        match &self.state {
            LightboxState::Open { slideshow: Some(timer), .. } => Some(timer.next_due()),
            _ => None,
        }
    }

    /// Open at `index`; ignored unless `index < len`. Reopening while open
    /// keeps a running slideshow.
    pub fn open(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            tracing::debug!("Ignoring lightbox open at {} of {}", index, len);
            return false;
        }

        match &mut self.state {
            LightboxState::Open { index: current, .. } => *current = index,
            LightboxState::Closed => {
                self.state = LightboxState::Open { index, slideshow: None };
            }
        }
        true
    }

    /// Close and stop any slideshow. Returns false if already closed.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = LightboxState::Closed;
        was_open
    }

    /// Advance with wraparound. No-op when closed or the list is empty.
    pub fn next(&mut self, len: usize) -> Option<usize> {
        self.step(len, |index, len| (index + 1) % len)
    }

    /// Retreat with wraparound. No-op when closed or the list is empty.
    pub fn prev(&mut self, len: usize) -> Option<usize> {
        self.step(len, |index, len| (index + len - 1) % len)
    }

    fn step(&mut self, len: usize, f: impl Fn(usize, usize) -> usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match &mut self.state {
            LightboxState::Open { index, .. } => {
                // The list may have shrunk underneath us
                let current = (*index).min(len - 1);
                *index = f(current, len);
                Some(*index)
            }
            LightboxState::Closed => None,
        }
    }

    /// Start the slideshow. Returns false when closed.
    pub fn start_slideshow(&mut self, now: Instant) -> bool {
        let interval = self.slideshow_interval;
        match &mut self.state {
            LightboxState::Open { slideshow, .. } => {
                if slideshow.is_none() {
                    *slideshow = Some(RepeatingTimer::start(interval, now));
                }
                true
            }
            LightboxState::Closed => false,
        }
    }

    pub fn stop_slideshow(&mut self) {
        if let LightboxState::Open { slideshow, .. } = &mut self.state {
            *slideshow = None;
        }
    }

    /// Flip the slideshow; returns the new playing state, `None` when closed
    pub fn toggle_slideshow(&mut self, now: Instant) -> Option<bool> {
        if !self.is_open() {
            return None;
        }
        if self.is_playing() {
            self.stop_slideshow();
            Some(false)
        } else {
            self.start_slideshow(now);
            Some(true)
        }
    }

    /// Advance if the slideshow tick is due. Returns the new index.
    pub fn poll_slideshow(&mut self, now: Instant, len: usize) -> Option<usize> {
        let due = match &mut self.state {
            LightboxState::Open { slideshow: Some(timer), .. } => timer.poll(now),
            _ => false,
        };
        if due {
            self.next(len)
        } else {
            None
        }
    }

    /// Toggle fullscreen on `surface`, tolerating surfaces that cannot do it.
    /// Returns the resulting fullscreen state.
    pub fn toggle_fullscreen(&self, surface: &dyn FullscreenSurface) -> Result<bool, AppError> {
        if !self.is_open() {
            return Ok(surface.is_fullscreen());
        }
        let target = !surface.is_fullscreen();
        surface.set_fullscreen(target)?;
        Ok(target)
    }
}

/// Counter text, 1-based
pub fn counter_text(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const INTERVAL: Duration = Duration::from_millis(3000);

    struct FakeSurface {
        fullscreen: Cell<bool>,
        supported: bool,
    }

    impl FullscreenSurface for FakeSurface {
        fn is_fullscreen(&self) -> bool {
            self.fullscreen.get()
        }

        fn set_fullscreen(&self, fullscreen: bool) -> Result<(), AppError> {
            if !self.supported {
                return Err(AppError::Unsupported("Fullscreen".into()));
            }
            self.fullscreen.set(fullscreen);
            Ok(())
        }
    }

    #[test]
    fn test_open_validates_range() {
        let mut lb = Lightbox::new(INTERVAL);
        assert!(!lb.open(5, 5));
        assert!(!lb.is_open());
        assert!(lb.open(4, 5));
        assert_eq!(lb.index(), Some(4));
    }

    #[test]
    fn test_circular_navigation() {
        let mut lb = Lightbox::new(INTERVAL);
        lb.open(4, 5);
        assert_eq!(lb.next(5), Some(0));
        assert_eq!(lb.prev(5), Some(4));
        assert_eq!(lb.prev(5), Some(3));
    }

    #[test]
    fn test_single_item_is_idempotent() {
        let mut lb = Lightbox::new(INTERVAL);
        lb.open(0, 1);
        assert_eq!(lb.next(1), Some(0));
        assert_eq!(lb.prev(1), Some(0));
    }

    #[test]
    fn test_navigation_noops() {
        let mut lb = Lightbox::new(INTERVAL);
        assert_eq!(lb.next(5), None);
        lb.open(2, 5);
        assert_eq!(lb.next(0), None);
        assert_eq!(lb.prev(0), None);
        assert_eq!(lb.index(), Some(2));
    }

    #[test]
    fn test_navigation_after_list_shrinks() {
        let mut lb = Lightbox::new(INTERVAL);
        lb.open(9, 10);
        assert_eq!(lb.next(3), Some(0));
    }

    #[test]
    fn test_counter_text() {
        assert_eq!(counter_text(0, 20), "1 / 20");
        assert_eq!(counter_text(19, 20), "20 / 20");
    }

    #[test]
    fn test_slideshow_toggle() {
        let t0 = Instant::now();
        let mut lb = Lightbox::new(INTERVAL);
        assert_eq!(lb.toggle_slideshow(t0), None);

        lb.open(0, 3);
        assert_eq!(lb.toggle_slideshow(t0), Some(true));
        assert!(lb.is_playing());
        assert_eq!(lb.toggle_slideshow(t0), Some(false));
        assert!(!lb.is_playing());
    }

    #[test]
    fn test_slideshow_advances_on_tick() {
        let t0 = Instant::now();
        let mut lb = Lightbox::new(INTERVAL);
        lb.open(1, 3);
        lb.start_slideshow(t0);

        assert_eq!(lb.poll_slideshow(t0 + INTERVAL / 2, 3), None);
        assert_eq!(lb.poll_slideshow(t0 + INTERVAL, 3), Some(2));
        assert_eq!(lb.poll_slideshow(t0 + INTERVAL * 2, 3), Some(0));
    }

    #[test]
    fn test_close_stops_slideshow() {
        let t0 = Instant::now();
        let mut lb = Lightbox::new(INTERVAL);
        lb.open(0, 3);
        lb.start_slideshow(t0);
        assert!(lb.close());

        assert!(!lb.is_playing());
        for step in 1..10 {
            assert_eq!(lb.poll_slideshow(t0 + INTERVAL * step, 3), None);
        }
        assert_eq!(lb.index(), None);

        // Reopening does not resurrect the old timer
        lb.open(0, 3);
        assert!(!lb.is_playing());
    }

    #[test]
    fn test_reopen_keeps_slideshow() {
        let t0 = Instant::now();
        let mut lb = Lightbox::new(INTERVAL);
        lb.open(0, 3);
        lb.start_slideshow(t0);
        lb.open(2, 3);
        assert!(lb.is_playing());
        assert_eq!(lb.index(), Some(2));
    }

    #[test]
    fn test_fullscreen_toggle() {
        let surface = FakeSurface { fullscreen: Cell::new(false), supported: true };
        let mut lb = Lightbox::new(INTERVAL);
        lb.open(0, 1);

        assert!(lb.toggle_fullscreen(&surface).unwrap());
        assert!(surface.is_fullscreen());
        assert!(!lb.toggle_fullscreen(&surface).unwrap());
        assert!(!surface.is_fullscreen());
    }

    #[test]
    fn test_fullscreen_unsupported() {
        let surface = FakeSurface { fullscreen: Cell::new(false), supported: false };
        let mut lb = Lightbox::new(INTERVAL);
        lb.open(0, 1);

        assert!(matches!(lb.toggle_fullscreen(&surface), Err(AppError::Unsupported(_))));
        assert!(!surface.is_fullscreen());
    }
}
