use std::sync::LazyLock;

use albumdl_core::{COMPLETE_PROGRESS, SETUP_PROGRESS, TrackProgress};
use regex::Regex;

/// Share of the bar spent on track downloads, after setup.
const TRACK_SPAN: u32 = 75;

static DOWNLOADED_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdownloaded\s+(\d+)\s+(?:tracks?|songs?)\b")
        .expect("downloaded-total pattern is valid")
});

static FOUND_COUNT: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        r"(?i)\b(\d+)\s+(?:tracks?|songs?)\s+found\b",
        r"(?i)\bfound\s+(\d+)\s+(?:tracks?|songs?)\b",
    ]
    .map(|p| Regex::new(p).expect("found-count pattern is valid"))
});

const TRACK_MARKERS: [&str; 2] = ["downloading:", "downloaded:"];

/// What one output line says about the download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineSignals {
    /// Track total announced by the line, if any.
    pub total: Option<u32>,
    /// The line marks one track being downloaded.
    pub track_event: bool,
}

fn capture_count(re: &Regex, line: &str) -> Option<u32> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

/// Classify a line. Each category takes its first match; a "found" count
/// on the same line as a "downloaded N tracks" summary wins.
pub fn classify_line(line: &str) -> LineSignals {
    let downloaded = capture_count(&DOWNLOADED_TOTAL, line);
    let found = FOUND_COUNT.iter().find_map(|re| capture_count(re, line));

    let lower = line.to_ascii_lowercase();
    let track_event = TRACK_MARKERS.iter().any(|m| lower.contains(m));

    LineSignals {
        total: found.or(downloaded),
        track_event,
    }
}

/// Fold one output line into the track state.
///
/// Totals overwrite unconditionally. A track event bumps `current_track`
/// and, while the total is unknown, sets a provisional total so the
/// percentage never divides by zero. Progress is recomputed only when the
/// current track moves and never drops below its previous value.
pub fn apply_line(state: &TrackProgress, line: &str) -> TrackProgress {
    let signals = classify_line(line);
    let mut next = *state;

    if let Some(total) = signals.total {
        next.total_tracks = total;
    }

    if signals.track_event {
        next.current_track = next.current_track.saturating_add(1);
        if next.total_tracks == 0 {
            next.total_tracks = next.current_track.max(1);
        }
        next.progress = next.progress.max(percent(next.current_track, next.total_tracks));
    }

    next
}

fn percent(current: u32, total: u32) -> u8 {
    let total = u64::from(total.max(1));
    let done = u64::from(current) * u64::from(TRACK_SPAN) / total;
    let value = (u64::from(SETUP_PROGRESS) + done).min(u64::from(COMPLETE_PROGRESS));
    u8::try_from(value).unwrap_or(COMPLETE_PROGRESS)
}
