//! Story library persisted as a single JSON document.

use crate::models::Story;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const EXAMPLE_STORIES: &str = include_str!("../data/example_stories.json");

#[derive(Debug, Default, Serialize, Deserialize)]
struct LibraryFile {
    stories: Vec<Story>,
}

/// Saved stories, newest first.
pub struct StoryLibrary {
    path: PathBuf,
    stories: Vec<Story>,
}

impl StoryLibrary {
    /// Load the library at `path`.
    ///
    /// A missing file starts out with the bundled example stories, which are
    /// written to disk on the first `save`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let stories = if path.exists() {
            let file: LibraryFile = serde_json::from_str(&fs::read_to_string(&path)?)?;
            debug!("Loaded {} stories from {}", file.stories.len(), path.display());
            file.stories
        } else {
            let file: LibraryFile = serde_json::from_str(EXAMPLE_STORIES)?;
            debug!(
                "No story library at {}, starting with {} examples",
                path.display(),
                file.stories.len()
            );
            file.stories
        };

        Ok(Self { path, stories })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn add_story(&mut self, story: Story) {
        self.stories.insert(0, story);
    }

    pub fn get_story(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|story| story.id == id)
    }

    /// Replace the story with the same id. Returns `false` when none matched.
    pub fn update_story(&mut self, story: Story) -> bool {
        match self.stories.iter_mut().find(|existing| existing.id == story.id) {
            Some(existing) => {
                *existing = story;
                true
            }
            None => false,
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = LibraryFile {
            stories: self.stories.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        info!("Saved {} stories to {}", self.stories.len(), self.path.display());
        Ok(())
    }
}
