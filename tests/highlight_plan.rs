use synoid_reel::reel::selector::target_duration;
use synoid_reel::reel::strategy::SelectionConfig;
use synoid_reel::reel::{build_reel, select, transcript, HighlightClip, HighlightPlan, ReelStrategy};

/// A long talk: one block every `gap` seconds, a few salient ones mixed in.
fn long_transcript(blocks: usize, gap: u64) -> String {
    (0..blocks)
        .map(|i| {
            let t = i as u64 * gap;
            let speaker = if i % 3 == 0 { "Host" } else { "Guest" };
            let text = match i % 7 {
                0 => "This is the critical part about solar storage pricing.",
                3 => "Solar storage pricing keeps falling across every market we track.",
                5 => "We wandered off topic for a bit and talked about lunch.",
                _ => "Some ordinary remarks that fill the conversation.",
            };
            format!("{:02}:{:02} - {}:\n{}", t / 60, t % 60, speaker, text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn assert_well_formed(plan: &HighlightPlan, source: f64) {
    for clip in plan.iter() {
        assert!(clip.start >= 0.0, "negative start: {:?}", clip);
        assert!(clip.duration > 0.0, "empty clip: {:?}", clip);
        assert!(clip.end() <= source + 1e-9, "clip past the end: {:?}", clip);
    }
    for pair in plan.clips.windows(2) {
        assert!(pair[0].start <= pair[1].start, "not chronological: {:?}", pair);
    }
}

#[test]
fn test_two_block_example() {
    let raw = "00:00 - A:\nThis is the important introduction.\n\n01:00 - B:\nJust a filler remark here.";
    let reel = build_reel(raw, 120.0, &ReelStrategy::default()).unwrap();

    assert_eq!(reel.segments.len(), 2);
    assert_eq!(reel.segments[0].start_time(), 0.0);
    assert_eq!(reel.segments[1].start_time(), 60.0);
    assert!(reel.segments[0].importance_score > reel.segments[1].importance_score);

    assert_eq!(
        reel.plan.clips[0],
        HighlightClip {
            start: 0.0,
            duration: 20.0
        }
    );
    assert_well_formed(&reel.plan, 120.0);
    assert!(!reel.report.used_fallback);
}

#[test]
fn test_unparseable_transcript_falls_back() {
    let raw = "Welcome everyone\nno timestamps here\n\nIntro:\nstill nothing";
    let reel = build_reel(raw, 300.0, &ReelStrategy::default()).unwrap();

    assert!(reel.segments.is_empty());
    assert!(reel.report.used_fallback);
    let spans: Vec<(f64, f64)> = reel.plan.iter().map(|c| (c.start, c.duration)).collect();
    assert_eq!(spans, vec![(0.0, 30.0), (135.0, 30.0), (270.0, 30.0)]);
    assert_eq!(reel.report.summary_duration, 90.0);
}

#[test]
fn test_same_input_same_plan() {
    let raw = long_transcript(120, 15);
    let strategy = ReelStrategy::default();
    let first = build_reel(&raw, 1800.0, &strategy).unwrap();
    let second = build_reel(&raw, 1800.0, &strategy).unwrap();
    assert_eq!(first.plan, second.plan);
    assert_eq!(first.analysis, second.analysis);
}

#[test]
fn test_budget_and_bounds_across_settings() {
    let raw = long_transcript(200, 5);
    for &source in &[40.0, 300.0, 1000.0, 5000.0] {
        for &fraction in &[0.2, 0.25, 0.4] {
            for &merge in &[true, false] {
                let mut strategy = ReelStrategy::default();
                strategy.selection.target_fraction = fraction;
                strategy.selection.merge_overlaps = merge;

                let reel = build_reel(&raw, source, &strategy).unwrap();
                let target = target_duration(source, &strategy.selection);
                let margin = strategy.selection.max_clip_seconds();

                assert_well_formed(&reel.plan, source);
                assert!(
                    reel.plan.total_duration() <= target + margin,
                    "{}s over budget for source {} fraction {}",
                    reel.plan.total_duration(),
                    source,
                    fraction
                );
            }
        }
    }
}

#[test]
fn test_salient_segments_are_anchored() {
    let raw = long_transcript(120, 15);
    let strategy = ReelStrategy::default();
    let reel = build_reel(&raw, 1800.0, &strategy).unwrap();

    assert!(reel
        .analysis
        .topics
        .contains(&"solar storage pricing".to_string()));

    // The top-ranked segment must be covered by some clip.
    let best = reel
        .segments
        .iter()
        .max_by(|a, b| {
            a.importance_score
                .total_cmp(&b.importance_score)
                .then(b.index.cmp(&a.index))
        })
        .unwrap();
    let t = best.start_time();
    assert!(reel.plan.iter().any(|c| c.start <= t && t < c.end()));
}

#[test]
fn test_empty_selection_for_any_duration() {
    for &d in &[0.5, 60.0, 7200.0] {
        let plan = select(&[], d, &SelectionConfig::default()).unwrap();
        assert!(plan.is_empty());
    }
}

#[test]
fn test_parse_is_idempotent() {
    let raw = long_transcript(30, 17);
    let parsed = transcript::parse(&raw);
    let reparsed = transcript::parse(&transcript::serialize(&parsed));
    assert_eq!(parsed, reparsed);
    assert_eq!(parsed.len(), 30);
    assert_eq!(parsed[29].start_time, 29.0 * 17.0);
}

#[test]
fn test_plan_serializes_as_clip_list() {
    let plan = HighlightPlan {
        clips: vec![HighlightClip {
            start: 4.0,
            duration: 20.0,
        }],
    };
    let json = serde_json::to_string(&plan).unwrap();
    assert_eq!(json, r#"[{"start":4.0,"duration":20.0}]"#);
}
