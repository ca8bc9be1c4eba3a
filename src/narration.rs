//! Read-aloud playback of saved stories.

use crate::models::Story;
use crate::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// A speech facility. `speak` resolves once the utterance has finished.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
    fn cancel(&self);
    fn is_cancelled(&self) -> bool;
}

/// Speak pages from `start_page` (0-based) to the end, advancing automatically.
///
/// Stops early on cancellation or when the narrator fails. Returns how many
/// pages were read to completion.
pub async fn narrate_story<N>(narrator: &N, story: &Story, start_page: usize) -> usize
where
    N: Narrator + ?Sized,
{
    let mut narrated = 0;
    for page in story.pages.iter().skip(start_page) {
        if narrator.is_cancelled() {
            debug!("Narration cancelled before page {}", page.page_number);
            break;
        }
        if page.text.trim().is_empty() {
            continue;
        }
        if let Err(e) = narrator.speak(&page.text).await {
            warn!("Narration error on page {}: {}", page.page_number, e);
            break;
        }
        narrated += 1;
    }
    narrated
}

/// Narrator for terminals: prints each page instead of synthesizing speech.
#[derive(Default)]
pub struct ConsoleNarrator {
    cancelled: AtomicBool,
    page_pause: Duration,
}

impl ConsoleNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait this long after each page, standing in for speaking time.
    pub fn with_page_pause(mut self, page_pause: Duration) -> Self {
        self.page_pause = page_pause;
        self
    }
}

#[async_trait]
impl Narrator for ConsoleNarrator {
    async fn speak(&self, text: &str) -> Result<()> {
        println!("{}\n", text);
        if !self.page_pause.is_zero() {
            tokio::time::sleep(self.page_pause).await;
        }
        Ok(())
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
