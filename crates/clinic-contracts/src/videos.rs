//! Video contracts and link classification
//!
//! A link is classified against every known provider pattern. It is accepted
//! only when exactly one provider matches and that provider is allowed for
//! the listing; there is no fallback category.

use std::sync::LazyLock;

use clinic_core::error::ValidationErrors;
use clinic_models::{NewVideo, VideoChanges, VideoKind};
use regex::Regex;

use crate::base::{
    json_view, present, validate_fields, Contract, FieldRule, Presence, ValidationResult,
};

static YOUTUBE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.?be)/.+$").unwrap()
});

static GOOGLE_DRIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?://)?drive\.google\.com/.*$").unwrap());

pub const VIDEO_RULES: &[FieldRule] = &[
    FieldRule::text("title", "Title"),
    FieldRule::text("url", "Video URL"),
];

/// Classify a link into exactly one hosting provider
pub fn classify_video_url(url: &str) -> Option<VideoKind> {
    let url = url.trim();
    let matches: Vec<VideoKind> = [
        (VideoKind::YouTube, &*YOUTUBE_PATTERN),
        (VideoKind::GoogleDrive, &*GOOGLE_DRIVE_PATTERN),
    ]
    .into_iter()
    .filter(|(_, pattern)| pattern.is_match(url))
    .map(|(kind, _)| kind)
    .collect();

    match matches.as_slice() {
        [kind] => Some(*kind),
        _ => None,
    }
}

/// Providers a listing accepts
#[derive(Debug, Clone, Copy)]
pub struct VideoPolicy {
    pub allowed: &'static [VideoKind],
    pub rejection: &'static str,
}

/// Video listing: YouTube links only
pub const VIDEO_POLICY: VideoPolicy = VideoPolicy {
    allowed: &[VideoKind::YouTube],
    rejection: "Please provide a valid YouTube link",
};

/// Exercise video listing: YouTube or Google Drive
pub const EXERCISE_VIDEO_POLICY: VideoPolicy = VideoPolicy {
    allowed: &[VideoKind::YouTube, VideoKind::GoogleDrive],
    rejection: "Invalid video URL",
};

impl VideoPolicy {
    /// Provider of an accepted link
    pub fn accept(&self, url: &str) -> Option<VideoKind> {
        classify_video_url(url).filter(|kind| self.allowed.contains(kind))
    }

    fn check_url(&self, url: Option<&str>, errors: &mut ValidationErrors) {
        if let Some(url) = present(url) {
            if self.accept(url).is_none() {
                errors.add("url", self.rejection);
            }
        }
    }
}

pub struct CreateVideoContract {
    pub policy: VideoPolicy,
}

impl Contract<NewVideo> for CreateVideoContract {
    fn validate(&self, input: &NewVideo) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), VIDEO_RULES, Presence::Required, &mut errors);
        self.policy.check_url(input.url.as_deref(), &mut errors);
        errors.into_result()
    }
}

pub struct UpdateVideoContract {
    pub policy: VideoPolicy,
}

impl Contract<VideoChanges> for UpdateVideoContract {
    fn validate(&self, input: &VideoChanges) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), VIDEO_RULES, Presence::IfPresent, &mut errors);
        self.policy.check_url(input.url.as_deref(), &mut errors);
        errors.into_result()
    }
}
