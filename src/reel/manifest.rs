// SYNOID Reel Manifest - FFmpeg Concat Script
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Renders a highlight plan as an FFmpeg concat-demuxer script. Every clip
// references the same source with its own inpoint/outpoint, so
// `ffmpeg -f concat -safe 0 -i reel.txt -c copy out.mp4` cuts and joins the
// reel in one pass.

use super::selector::HighlightPlan;
use std::path::Path;

/// Quote a path for the concat demuxer (`'` becomes `'\''`).
fn quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

/// Build the concat script for `plan` cut from `source`.
pub fn concat_manifest(source: &Path, plan: &HighlightPlan) -> String {
    let file_line = format!("file {}", quote(source));
    plan.iter()
        .map(|clip| {
            format!(
                "{}\ninpoint {:.3}\noutpoint {:.3}",
                file_line,
                clip.start,
                clip.end()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::selector::HighlightClip;
    use std::path::PathBuf;

    #[test]
    fn test_manifest_lines() {
        let plan = HighlightPlan {
            clips: vec![
                HighlightClip { start: 0.0, duration: 20.0 },
                HighlightClip { start: 59.5, duration: 15.0 },
            ],
        };
        let manifest = concat_manifest(&PathBuf::from("/tmp/talk.mp4"), &plan);
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(
            lines,
            vec![
                "file '/tmp/talk.mp4'",
                "inpoint 0.000",
                "outpoint 20.000",
                "file '/tmp/talk.mp4'",
                "inpoint 59.500",
                "outpoint 74.500",
            ]
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let plan = HighlightPlan {
            clips: vec![HighlightClip { start: 1.0, duration: 2.0 }],
        };
        let manifest = concat_manifest(&PathBuf::from("/tmp/it's.mp4"), &plan);
        assert!(manifest.starts_with(r"file '/tmp/it'\''s.mp4'"));
    }

    #[test]
    fn test_empty_plan() {
        let manifest = concat_manifest(&PathBuf::from("/tmp/a.mp4"), &HighlightPlan::default());
        assert!(manifest.is_empty());
    }
}
