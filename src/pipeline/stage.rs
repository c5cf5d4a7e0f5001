/// Per-URL audit stages
///
/// This module defines every state a URL passes through inside the page
/// pipeline.
use std::fmt;

/// Represents the current stage of a URL in the page pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStage {
    // ===== Active Stages =====
    /// Nothing has happened yet
    Start,

    /// Looking the URL up in the cache
    CacheCheck,

    /// Requesting the page HTML
    Fetch,

    /// Extracting the main text
    Extract,

    /// Running SEO and accessibility rules
    Rules,

    /// Rules finished, tone step not yet decided
    RulesDone,

    /// Tone analysis skipped (disabled or no budget)
    ToneSkipped,

    /// Tone analysis call made
    ToneAttempted,

    /// Result assembled
    Assembled,

    /// Writing the result to the cache
    CacheWrite,

    // ===== Terminal Stages =====
    /// Stored result returned without any further work
    Cached,

    /// Fetch failed; error result, not cached
    FetchFailed,

    /// Extraction failed; error result, not cached
    ExtractFailed,

    /// Audit finished and cached (cache write may have failed)
    Done,
}

impl PageStage {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Cached | Self::FetchFailed | Self::ExtractFailed | Self::Done
        )
    }

    /// Returns true if the URL ended with an error result
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::ExtractFailed)
    }

    /// Stable lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::CacheCheck => "cache_check",
            Self::Fetch => "fetch",
            Self::Extract => "extract",
            Self::Rules => "rules",
            Self::RulesDone => "rules_done",
            Self::ToneSkipped => "tone_skipped",
            Self::ToneAttempted => "tone_attempted",
            Self::Assembled => "assembled",
            Self::CacheWrite => "cache_write",
            Self::Cached => "cached",
            Self::FetchFailed => "fetch_failed",
            Self::ExtractFailed => "extract_failed",
            Self::Done => "done",
        }
    }

    /// Returns true if `next` is a legal successor of this stage
    pub fn can_transition_to(&self, next: PageStage) -> bool {
        use PageStage::*;
        matches!(
            (self, next),
            (Start, CacheCheck)
                | (CacheCheck, Cached)
                | (CacheCheck, Fetch)
                | (Fetch, FetchFailed)
                | (Fetch, Extract)
                | (Extract, ExtractFailed)
                | (Extract, Rules)
                | (Rules, RulesDone)
                | (RulesDone, ToneSkipped)
                | (RulesDone, ToneAttempted)
                | (ToneSkipped, Assembled)
                | (ToneAttempted, Assembled)
                | (Assembled, CacheWrite)
                | (CacheWrite, Done)
        )
    }
}

impl fmt::Display for PageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
