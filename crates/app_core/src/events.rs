//! State-change notifications fanned out to every subscribed view

use crate::theme::ThemeFlag;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    /// Filter, search or sort changed; the grid restarts at page 0
    FilterChanged { total: usize },
    /// Items in `range` of the filtered list were appended to the grid
    PageAppended { range: Range<usize> },
    FavoriteChanged { id: String, favorite: bool },
    /// Lightbox opened at, or moved to, `index`, showing record `id`.
    /// Also sent when a refilter leaves the lightbox open over a new list.
    LightboxOpened { index: usize, id: String },
    LightboxClosed,
    SlideshowChanged { playing: bool },
    ThemeChanged(ThemeFlag),
}

/// Publish/subscribe hub
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<GalleryEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<GalleryEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every live subscriber; dropped receivers are forgotten
    pub fn publish(&mut self, event: GalleryEvent) {
        tracing::trace!(?event, "publish");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(GalleryEvent::LightboxClosed);
        assert_eq!(a.try_recv().unwrap(), GalleryEvent::LightboxClosed);
        assert_eq!(b.try_recv().unwrap(), GalleryEvent::LightboxClosed);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(GalleryEvent::ThemeChanged(ThemeFlag::Light));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(
            keep.try_recv().unwrap(),
            GalleryEvent::ThemeChanged(ThemeFlag::Light)
        );
    }
}
