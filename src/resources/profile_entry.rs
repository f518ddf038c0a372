//! Shell profile entries: marker-keyed append-or-update lines.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{Resource, ResourceChange, ResourceState};

/// A single managed line in the user's shell profile.
///
/// The `marker` identifies the entry (e.g. `alias vim=`); `line` is the full
/// desired content. An identical line is left alone, a differing line that
/// starts with the marker is rewritten in place, and a missing entry is
/// appended together with its comment header. Pre-existing duplicates under
/// the same marker (left behind by append-only scripts) are collapsed to the
/// single managed line. Re-running therefore never duplicates an entry.
#[derive(Debug)]
pub struct ProfileEntry {
    /// Path to the shell profile file.
    pub profile: PathBuf,
    /// Stable prefix that identifies the managed line.
    pub marker: String,
    /// Full desired line.
    pub line: String,
    /// Comment written above the line on first insertion.
    pub header: String,
}

impl ProfileEntry {
    /// Create a new profile entry.
    #[must_use]
    pub const fn new(profile: PathBuf, marker: String, line: String, header: String) -> Self {
        Self {
            profile,
            marker,
            line,
            header,
        }
    }

    /// All lines in the profile content that carry this entry's marker.
    fn matching_lines<'a>(&self, content: &'a str) -> Vec<&'a str> {
        content
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with(self.marker.as_str()))
            .collect()
    }
}

impl Resource for ProfileEntry {
    fn description(&self) -> String {
        format!("{} in {}", self.marker, self.profile.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.profile.exists() {
            return Ok(ResourceState::Missing);
        }
        let content = std::fs::read_to_string(&self.profile)
            .with_context(|| format!("reading {}", self.profile.display()))?;
        Ok(match self.matching_lines(&content).as_slice() {
            [] => ResourceState::Missing,
            [current] if *current == self.line => ResourceState::Correct,
            // Duplicated markers need collapsing even if one copy matches.
            [current, ..] => ResourceState::Incorrect {
                current: (*current).to_string(),
            },
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        if let Some(parent) = self.profile.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = if self.profile.exists() {
            std::fs::read_to_string(&self.profile)
                .with_context(|| format!("reading {}", self.profile.display()))?
        } else {
            String::new()
        };

        match self.matching_lines(&content).as_slice() {
            [current] if *current == self.line => Ok(ResourceChange::AlreadyCorrect),
            [_, ..] => {
                // Rewrite the first managed line in place, drop any further
                // duplicates, and leave everything else untouched.
                let mut replaced = false;
                let mut updated: Vec<&str> = Vec::new();
                for l in content.lines() {
                    if l.trim().starts_with(self.marker.as_str()) {
                        if !replaced {
                            updated.push(self.line.as_str());
                            replaced = true;
                        }
                    } else {
                        updated.push(l);
                    }
                }
                let mut out = updated.join("\n");
                if content.ends_with('\n') {
                    out.push('\n');
                }
                std::fs::write(&self.profile, out)
                    .with_context(|| format!("writing {}", self.profile.display()))?;
                Ok(ResourceChange::Applied)
            }
            [] => {
                let mut out = content;
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&format!("\n{}\n{}\n", self.header, self.line));
                std::fs::write(&self.profile, out)
                    .with_context(|| format!("writing {}", self.profile.display()))?;
                Ok(ResourceChange::Applied)
            }
        }
    }
}
