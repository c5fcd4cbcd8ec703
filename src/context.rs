//! Screen Context
//!
//! Who is looking at the screen, and which other holder the bottom list
//! currently shows. The counterpart is picked by a separate control and may
//! change at any time, including mid-drag.

use tokio::sync::watch;

/// Writable handle for the member picker
#[derive(Clone)]
pub struct CounterpartPicker {
    tx: watch::Sender<Option<u32>>,
}

impl CounterpartPicker {
    pub fn new(initial: Option<u32>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn pick(&self, owner_id: Option<u32>) {
        self.tx.send_if_modified(|current| {
            if *current == owner_id {
                false
            } else {
                *current = owner_id;
                true
            }
        });
    }

    pub fn current(&self) -> Option<u32> {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<u32>> {
        self.tx.subscribe()
    }
}

/// Fixed facts about one mounted screen
#[derive(Clone)]
pub struct ScreenContext {
    pub organization_id: u32,
    /// Membership of the person using the screen (top list)
    pub viewer_id: u32,
    pub picker: CounterpartPicker,
}

impl ScreenContext {
    pub fn new(organization_id: u32, viewer_id: u32, counterpart: Option<u32>) -> Self {
        Self {
            organization_id,
            viewer_id,
            picker: CounterpartPicker::new(counterpart),
        }
    }
}
