//! Benchmarks for recognition challenges and the frame loop

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use senyas_core::InputEvent;
use senyas_recognition::{ChallengeConfig, RecognitionChallenge, Recognizer, DEFAULT_SEQUENCE_WINDOW};
use senyas_test::{signing_detection, ScriptedFrameClassifier, ScriptedSequenceClassifier, SessionHarness};
use senyas_visual::FeatureLayout;

fn bench_feature_extraction(c: &mut Criterion) {
    let detection = signing_detection(1);
    let mut group = c.benchmark_group("feature_extraction");
    for layout in [
        FeatureLayout::HandXy,
        FeatureLayout::HandXyz,
        FeatureLayout::Holistic,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{layout:?}")),
            &layout,
            |b, layout| b.iter(|| black_box(layout.extract(black_box(&detection)))),
        );
    }
    group.finish();
}

fn bench_single_frame_observe(c: &mut Criterion) {
    let classifier = ScriptedFrameClassifier::new(FeatureLayout::HandXy);
    classifier.push("B", 0.99);
    let recognizer = Recognizer::frame(classifier, FeatureLayout::HandXy);
    let mut challenge =
        RecognitionChallenge::new("A", recognizer, ChallengeConfig::alphabet()).unwrap();
    let detection = signing_detection(1);

    c.bench_function("observe_single_frame", |b| {
        b.iter(|| black_box(challenge.observe_detection(Some(black_box(&detection)))))
    });
}

fn bench_temporal_observe(c: &mut Criterion) {
    let classifier = ScriptedSequenceClassifier::new(DEFAULT_SEQUENCE_WINDOW, FeatureLayout::Holistic);
    classifier.push("sorry", 0.99);
    let recognizer = Recognizer::sequence(classifier, FeatureLayout::Holistic);
    let mut challenge =
        RecognitionChallenge::new("hello", recognizer, ChallengeConfig::phrases()).unwrap();
    let frames: Vec<_> = (0..8).map(signing_detection).collect();
    let mut i = 0;

    c.bench_function("observe_temporal_window", |b| {
        b.iter(|| {
            i = (i + 1) % frames.len();
            black_box(challenge.observe_detection(Some(&frames[i])))
        })
    });
}

fn bench_lesson_frame(c: &mut Criterion) {
    let mut harness = SessionHarness::new().unwrap();
    harness.start_at("playing_a").unwrap();
    harness.sign("B");

    c.bench_function("lesson_frame", |b| {
        b.iter(|| {
            harness
                .player_mut()
                .frame_with(Duration::from_millis(33))
                .map(|d| d.len())
        })
    });
}

fn bench_menu_input(c: &mut Criterion) {
    let mut harness = SessionHarness::new().unwrap();
    harness.start_at("playing_galaxy").unwrap();

    c.bench_function("menu_hover_frame", |b| {
        b.iter(|| {
            harness
                .player_mut()
                .queue_input(InputEvent::hover(black_box("numbers")));
            harness.frame()
        })
    });
}

criterion_group!(
    benches,
    bench_feature_extraction,
    bench_single_frame_observe,
    bench_temporal_observe,
    bench_lesson_frame,
    bench_menu_input,
);
criterion_main!(benches);
