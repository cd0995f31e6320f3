//! # Exam Proctor Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Ledger append (counted, in-progress) | < 50µs |
//! | Ledger append (after finalization) | < 20µs |
//! | Detector set, one signal | < 10µs |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pc_01_detectors::{session_phase, BrowserSignal, DetectorSet, SessionContext};
use pc_03_violation_ledger::ViolationLedgerApi;
use pc_04_submission_lifecycle::SubmissionLifecycleApi;
use pc_tests::integration::support::{ExamSetup, Server, EXAM, START_MS, STUDENT};
use shared_bus::bounded;
use shared_types::{ExamId, Severity, StudentId, ViolationEvent, ViolationKind};

fn blur(at: u64) -> ViolationEvent {
    ViolationEvent::new(
        StudentId::new(STUDENT),
        Some(ExamId::new(EXAM)),
        ViolationKind::WindowBlur,
        Severity::High,
        "Window lost focus",
        at,
    )
}

fn bench_ledger_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-03-violation-ledger");
    group.measurement_time(Duration::from_secs(5));

    let server = Server::new(ExamSetup::max(i32::MAX));
    server.start();
    group.bench_function("append_counted", |b| {
        b.iter(|| {
            let result = server.container.ledger.append(blur(server.now())).unwrap();
            black_box(result)
        })
    });

    let finalized = Server::new(ExamSetup::max(1));
    finalized.start();
    finalized
        .container
        .lifecycle
        .submit_exam(&Server::exam_id(), STUDENT)
        .unwrap();
    group.bench_function("append_terminal", |b| {
        b.iter(|| {
            let result = finalized.container.ledger.append(blur(finalized.now())).unwrap();
            black_box(result)
        })
    });

    group.finish();
}

fn bench_detector_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-01-detectors");
    let server = Server::new(ExamSetup::default());

    let signals = [
        ("tick", BrowserSignal::Tick),
        ("window_blur", BrowserSignal::WindowBlur),
        ("context_menu", BrowserSignal::ContextMenu),
    ];
    for (name, signal) in signals {
        let (_controller, watch) = session_phase();
        let (publisher, mut receiver) = bounded(1024);
        let session = SessionContext::new(StudentId::new(STUDENT), server.policy());
        let mut detectors = DetectorSet::standard(session, publisher, watch, START_MS).unwrap();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("handle", name), &signal, |b, signal| {
            b.iter(|| {
                let response = detectors.handle(black_box(signal), START_MS + 1_000);
                while receiver.try_recv().is_some() {}
                black_box(response)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ledger_append, bench_detector_set);
criterion_main!(benches);
