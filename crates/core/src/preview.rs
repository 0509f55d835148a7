//! Latest-wins bookkeeping for preview renders.
//!
//! Every preview request takes a ticket carrying a fresh generation. A finished render
//! is committed only while its generation is still the newest one handed out, so a slow
//! render that completes after a faster, newer one never replaces it.

use penmark_raster::{PageRender, Surface};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket {
    pub generation: u64,
    pub page_index: usize,
}

/// A committed preview.
#[derive(Debug)]
pub struct PreviewFrame {
    pub generation: u64,
    pub page_index: usize,
    pub surface: Surface,
    pub render: PageRender,
    /// Sheets the page text would need beyond the previewed one.
    pub overflow_pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Committed { generation: u64 },
    /// A newer ticket exists; the render was dropped.
    Discarded { generation: u64, latest: u64 },
}

impl PreviewOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, PreviewOutcome::Committed { .. })
    }
}

#[derive(Debug, Default)]
pub struct PreviewSlot {
    latest: AtomicU64,
    frame: Mutex<Option<PreviewFrame>>,
}

impl PreviewSlot {
    pub fn begin(&self, page_index: usize) -> PreviewTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        PreviewTicket {
            generation,
            page_index,
        }
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn commit(&self, frame: PreviewFrame) -> PreviewOutcome {
        let generation = frame.generation;
        // Checked under the lock so two finishing renders cannot both pass.
        let Ok(mut slot) = self.frame.lock() else {
            log::warn!("Preview slot poisoned; dropping generation {}", generation);
            return PreviewOutcome::Discarded {
                generation,
                latest: self.latest(),
            };
        };
        let latest = self.latest();
        let older_than_shown = slot.as_ref().is_some_and(|f| f.generation >= generation);
        if generation != latest || older_than_shown {
            log::debug!("Discarding stale preview {} (latest {})", generation, latest);
            return PreviewOutcome::Discarded { generation, latest };
        }
        *slot = Some(frame);
        PreviewOutcome::Committed { generation }
    }

    pub fn with_frame<R>(&self, f: impl FnOnce(&PreviewFrame) -> R) -> Option<R> {
        let slot = self.frame.lock().ok()?;
        slot.as_ref().map(f)
    }
}
