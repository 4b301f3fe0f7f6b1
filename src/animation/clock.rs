use tokio::sync::watch;

/// Real-valued day index driving the playback.
///
/// `index` is the authoritative value, written only by tick, seek and reset. Every write is
/// mirrored to a [`watch`] channel for renderers; nothing read from the channel ever flows back
/// into `index`.
#[derive(Debug)]
pub struct DayClock {
    index: f64,
    display: watch::Sender<f64>,
}

impl Default for DayClock {
    fn default() -> Self {
        DayClock::new()
    }
}

impl DayClock {
    pub fn new() -> Self {
        let (display, _) = watch::channel(0.0);
        DayClock {
            index: 0.0,
            display,
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.index
    }

    pub fn set(&mut self, index: f64) {
        self.index = index;
        self.display.send_replace(index);
    }

    /// Read-only copy of the index for rendering.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.display.subscribe()
    }
}

#[cfg(test)]
mod clock_test {
    use super::*;

    #[test]
    fn test_display_follows_authoritative_value() {
        let mut clock = DayClock::new();
        let rx = clock.subscribe();
        assert_eq!(*rx.borrow(), 0.0);

        clock.set(12.25);
        assert_eq!(clock.get(), 12.25);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), 12.25);
    }

    #[test]
    fn test_set_without_subscribers() {
        let mut clock = DayClock::default();
        clock.set(3.0);
        assert_eq!(clock.get(), 3.0);
    }
}
