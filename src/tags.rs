//! Tag Score Table
//!
//! Maps descriptive category keywords to ordering scores. Lower scores bias a
//! plugin to run earlier, but only as a tie-break among plugins with equal
//! priority and no forced dependency ordering.

use std::collections::HashMap;

use crate::descriptor::PluginDescriptor;

/// Score assigned to unknown tags and to tagless plugins
pub const DEFAULT_TAG_SCORE: i32 = 100;

/// Static category keyword to score lookup
#[derive(Debug, Clone)]
pub struct TagScoreTable {
    scores: HashMap<&'static str, i32>,
}

impl TagScoreTable {
    /// Build the standard table
    pub fn new() -> Self {
        let mut scores = HashMap::new();

        // Workspace hygiene runs first
        for tag in ["clean", "cleanup", "sanitize", "prune", "tidy"] {
            scores.insert(tag, 0);
        }
        // Validation / presence of inputs
        for tag in ["validation", "presence", "check", "requirements"] {
            scores.insert(tag, 10);
        }
        // Preparation / generation / fetch
        for tag in [
            "prepare",
            "codegen",
            "generate",
            "fetch",
            "resources",
            "download",
            "install",
            "bootstrap",
            "configure",
        ] {
            scores.insert(tag, 20);
        }
        // Conformity / headers ahead of linters
        for tag in [
            "license",
            "header",
            "normalize",
            "inject",
            "spdx",
            "banner",
            "copyright",
        ] {
            scores.insert(tag, 30);
        }
        // Lint / format / typing
        for tag in ["lint", "format", "style", "typecheck"] {
            scores.insert(tag, 40);
        }
        // Transform passes run last before the compiler
        for tag in ["obfuscation", "obfuscate", "transpile", "protect", "encrypt"] {
            scores.insert(tag, 50);
        }

        Self { scores }
    }

    /// Score for a single lowercase tag
    pub fn score_for_tag(&self, tag: &str) -> i32 {
        self.scores.get(tag).copied().unwrap_or(DEFAULT_TAG_SCORE)
    }

    /// Score for a descriptor: minimum over its tags, default when tagless
    pub fn score(&self, descriptor: &PluginDescriptor) -> i32 {
        descriptor
            .tags()
            .iter()
            .map(|t| self.score_for_tag(t))
            .min()
            .unwrap_or(DEFAULT_TAG_SCORE)
    }
}

impl Default for TagScoreTable {
    fn default() -> Self {
        Self::new()
    }
}
