use super::*;
use rand::SeedableRng;

use crate::render::delta::EdgeStroke;

fn cfg() -> RevealConfig {
    RevealConfig {
        seed: Some(11),
        ..RevealConfig::default()
    }
}

fn page() -> Viewport {
    Viewport::new(100 * 18, 50 * 18, 50 * 18)
}

#[test]
fn seed_clears_seed_tiles_on_overlay() {
    let mut d = TickDriver::new(&cfg(), page()).unwrap();
    let deltas = d.seed();
    assert!(!deltas.is_empty());
    assert_eq!(deltas.len(), d.frontier().len());
    for delta in &deltas {
        let TileDelta::Clear { layer, tile, size } = delta else {
            panic!("unexpected {delta:?}");
        };
        assert_eq!(*layer, Layer::Overlay);
        assert_eq!(*size, 18);
        assert!(d.frontier().contains(tile));
    }
    assert!(d.ledger().is_empty());
}

#[test]
fn ledger_trails_frontier_every_tick() {
    let mut d = TickDriver::new(&cfg(), page()).unwrap();
    d.seed();
    let mut prev = d.frontier().clone();
    for i in 0..30 {
        d.on_scroll(Millis(i * 16), None);
        assert!(prev.tiles().is_subset(d.frontier().tiles()));
        assert!(d.ledger().is_subset_of(d.frontier()));
        assert_eq!(d.ledger().tiles(), prev.tiles());
        prev = d.frontier().clone();
    }
    assert_eq!(d.ticks(), 30);
}

#[test]
fn overlay_clears_precede_border_deltas() {
    let mut d = TickDriver::new(&cfg(), page()).unwrap();
    d.seed();
    let deltas = d.on_scroll(Millis(0), None);
    let first_background = deltas
        .iter()
        .position(|d| !matches!(d, TileDelta::Clear { layer: Layer::Overlay, .. }))
        .unwrap_or(deltas.len());
    assert!(
        deltas[first_background..]
            .iter()
            .all(|d| !matches!(d, TileDelta::Clear { layer: Layer::Overlay, .. }))
    );
    let edges: Vec<EdgeStroke> = deltas
        .iter()
        .filter_map(|d| match d {
            TileDelta::Edge(e) => Some(*e),
            TileDelta::Clear { .. } => None,
        })
        .collect();
    // First tick commits the seeds: two edges per seed tile.
    assert_eq!(edges.len(), 2 * d.ledger().len());
}

#[test]
fn same_seed_replays_identically() {
    let mut a = TickDriver::new(&cfg(), page()).unwrap();
    let mut b = TickDriver::with_rng(&cfg(), page(), StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(a.seed(), b.seed());
    for i in 0..10 {
        assert_eq!(a.on_scroll(Millis(i), None), b.on_scroll(Millis(i), None));
    }
    assert_eq!(a.frontier(), b.frontier());
}

#[test]
fn resize_discards_and_reseeds() {
    let mut d = TickDriver::new(&cfg(), page()).unwrap();
    d.seed();
    for i in 0..5 {
        d.on_scroll(Millis(i), None);
    }
    let small = Viewport::new(20 * 18, 10 * 18, 10 * 18);
    let deltas = d.on_resize(small);
    assert_eq!(d.viewport(), small);
    assert_eq!(d.ticks(), 0);
    assert!(d.ledger().is_empty());
    assert_eq!(deltas.len(), d.frontier().len());
    let bounds = small.page_bounds();
    assert!(d.frontier().tiles().iter().all(|t| bounds.contains(t.x, t.y)));
}

#[test]
fn empty_viewport_is_a_no_op() {
    let mut d = TickDriver::new(&cfg(), Viewport::new(0, 0, 0)).unwrap();
    assert!(d.seed().is_empty());
    assert!(d.on_scroll(Millis(1), None).is_empty());
    assert!(d.frame(Millis(2)).is_empty());
    assert!(d.frontier().is_empty());
    assert!(!d.is_terminated());
}

#[test]
fn stats_report_counts() {
    let mut d = TickDriver::new(&cfg(), page()).unwrap();
    d.seed();
    d.on_scroll(Millis(0), None);
    let stats = d.stats();
    assert_eq!(stats.total, 100 * 50);
    assert_eq!(stats.infected, d.frontier().len());
    assert_eq!(stats.committed, d.ledger().len());
    assert!(!stats.terminated);
}

#[test]
fn invalid_config_is_rejected() {
    let bad = RevealConfig {
        tile_size: 0,
        ..RevealConfig::default()
    };
    assert!(TickDriver::new(&bad, page()).is_err());
}

#[test]
fn restore_repaints_frontier_and_borders() {
    let mut a = TickDriver::new(&cfg(), page()).unwrap();
    a.seed();
    for i in 0..4 {
        a.on_scroll(Millis(i), None);
    }
    let state = a.state();

    let mut b = TickDriver::new(&cfg(), page()).unwrap();
    let deltas = b.restore(state.clone()).unwrap();
    assert_eq!(b.state(), state);
    let overlay = deltas
        .iter()
        .filter(|d| matches!(d, TileDelta::Clear { layer: Layer::Overlay, .. }))
        .count();
    assert_eq!(overlay, state.revealed.len());
    assert_eq!(deltas.len(), overlay + 3 * state.committed.len());
}

#[test]
fn restore_rejects_committed_outside_revealed() {
    let mut d = TickDriver::new(&cfg(), page()).unwrap();
    let state = SpreadState {
        revealed: vec![TileCoord::new(0, 0)],
        committed: vec![TileCoord::new(18, 0)],
        queued: Vec::new(),
    };
    assert!(d.restore(state).is_err());
}
