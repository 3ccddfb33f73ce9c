use super::*;
use crate::encode::sink::InMemorySink;
use crate::render::delta::RecordingAdapter;

fn cfg() -> RevealConfig {
    RevealConfig {
        seed: Some(21),
        ..RevealConfig::default()
    }
}

fn viewport() -> Viewport {
    Viewport::new(180, 90, 360)
}

fn session(variant: Variant) -> RevealSession {
    RevealSession::new(
        cfg(),
        viewport(),
        RevealSessionOpts {
            variant,
            ..RevealSessionOpts::default()
        },
    )
    .unwrap()
}

/// Render surface that only records deltas.
#[derive(Default)]
struct Recorder {
    inner: RecordingAdapter,
    resizes: usize,
}

impl crate::render::delta::RenderAdapter for Recorder {
    fn clear_tile(
        &mut self,
        layer: crate::render::delta::Layer,
        tile: crate::grid::coord::TileCoord,
        size: u32,
    ) -> VeilResult<()> {
        self.inner.clear_tile(layer, tile, size)
    }

    fn draw_edge(&mut self, stroke: crate::render::delta::EdgeStroke) -> VeilResult<()> {
        self.inner.draw_edge(stroke)
    }
}

impl RenderSurface for Recorder {
    fn resize(&mut self, _viewport: Viewport) -> VeilResult<()> {
        self.resizes += 1;
        Ok(())
    }

    fn render(&mut self) -> VeilResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: 1,
            height: 1,
            data: vec![0; 4],
            premultiplied: true,
        })
    }
}

#[test]
fn events_before_mount_are_skipped() {
    let mut s = session(Variant::Set);
    assert!(!s.is_mounted());
    assert_eq!(s.on_scroll(Millis(0), None).unwrap(), 0);
    assert_eq!(s.frame(Millis(1)).unwrap(), 0);
    assert!(s.render().is_err());
    assert_eq!(s.stats().infected, 0);
    assert_eq!(s.driver().viewport(), viewport());
}

#[test]
fn resize_before_mount_sizes_the_next_mount() {
    let mut s = session(Variant::Set);
    let wide = Viewport::new(360, 180, 540);
    assert_eq!(s.on_resize(wide).unwrap(), 0);
    assert_eq!(s.driver().viewport(), wide);

    s.mount().unwrap();
    let frame = s.render().unwrap();
    assert_eq!((frame.width, frame.height), (360, 540));
    assert_eq!(s.stats().committed, 0);
}

#[test]
fn mount_paints_seeds_and_scroll_spreads() {
    let mut s = session(Variant::Set);
    s.mount_with(Box::new(Recorder::default())).unwrap();
    let seeds = s.stats().infected;
    assert!(seeds > 0);
    let applied = s.on_scroll(Millis(0), None).unwrap();
    assert!(applied > 0);
    assert!(s.stats().infected >= seeds);
    assert_eq!(s.stats().committed, seeds);
}

#[test]
fn unmount_stops_delivery() {
    let mut s = session(Variant::Set);
    s.mount().unwrap();
    s.on_scroll(Millis(0), None).unwrap();
    let before = s.stats();
    assert!(s.unmount().is_some());
    assert_eq!(s.on_scroll(Millis(16), None).unwrap(), 0);
    assert_eq!(s.stats(), before);
}

#[test]
fn play_pushes_one_frame_per_tick() {
    let mut s = session(Variant::Set);
    s.mount().unwrap();
    let mut sink = InMemorySink::new();
    let stats = s.play(5, &mut sink).unwrap();
    assert_eq!(stats.frames, 5);
    assert_eq!(sink.frames().len(), 5);
    assert!(sink.is_finished());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.frames), (180, 360, 5));
    let (_, last) = &sink.frames()[4];
    assert_eq!((last.width, last.height), (180, 360));
    assert_eq!(stats.driver, s.stats());
}

#[test]
fn play_requires_mount() {
    let mut s = session(Variant::Queue);
    assert!(s.play(1, &mut InMemorySink::new()).is_err());
}

#[test]
fn queue_playback_reaches_bottom_and_terminates() {
    let mut s = session(Variant::Queue);
    s.mount().unwrap();
    // 270 px of scroll range at 24 px per tick.
    let stats = s.play(12, &mut InMemorySink::new()).unwrap();
    assert!(stats.driver.terminated);
    assert_eq!(stats.driver.infected, stats.driver.total);
}

#[test]
fn resize_reseeds_and_resizes_surface() {
    let mut s = session(Variant::Set);
    s.mount_with(Box::new(Recorder::default())).unwrap();
    s.on_scroll(Millis(0), None).unwrap();
    let small = Viewport::new(90, 45, 45);
    s.on_resize(small).unwrap();
    assert_eq!(s.driver().viewport(), small);
    assert_eq!(s.stats().committed, 0);
}

#[test]
fn snapshot_restores_into_fresh_session() {
    let mut a = session(Variant::Set);
    a.mount().unwrap();
    for i in 0..4 {
        a.on_scroll(Millis(i * 16), None).unwrap();
    }
    let snap = a.snapshot();
    assert_eq!(snap.variant, Variant::Set);
    assert_eq!(snap.revealed.len(), a.stats().infected);

    let mut b = session(Variant::Set);
    b.mount().unwrap();
    b.restore(&snap).unwrap();
    assert_eq!(b.snapshot(), snap);
    assert_eq!(a.render().unwrap(), b.render().unwrap());
}

#[test]
fn restore_rejects_mismatched_snapshots() {
    let mut a = session(Variant::Set);
    a.mount().unwrap();
    let snap = a.snapshot();

    let mut q = session(Variant::Queue);
    assert!(q.restore(&snap).is_err());

    let mut other = RevealSession::new(
        cfg(),
        Viewport::new(360, 90, 360),
        RevealSessionOpts::default(),
    )
    .unwrap();
    assert!(other.restore(&snap).is_err());
}

#[test]
fn teardown_reports_final_stats() {
    let mut s = session(Variant::Set);
    s.mount().unwrap();
    s.on_scroll(Millis(0), None).unwrap();
    let stats = s.stats();
    assert_eq!(s.teardown(), stats);
}
