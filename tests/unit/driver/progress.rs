use super::*;
use rand::SeedableRng;

fn cfg() -> RevealConfig {
    RevealConfig {
        seed: Some(4),
        tile_size: 10,
        ..RevealConfig::default()
    }
}

fn page() -> Viewport {
    Viewport::new(100, 50, 250)
}

fn at(offset: u32) -> Option<ScrollPosition> {
    Some(ScrollPosition {
        offset,
        viewport_height: 50,
        document_height: 250,
    })
}

fn seeded() -> ProgressDriver {
    let mut d = ProgressDriver::new(&cfg(), page()).unwrap();
    assert!(d.seed().is_empty());
    d
}

#[test]
fn seed_covers_the_whole_page() {
    let d = seeded();
    let stats = d.stats();
    assert_eq!(stats.total, 10 * 25);
    assert_eq!(stats.infected, 0);
    assert!(!stats.terminated);
}

#[test]
fn claims_grow_monotonically_with_progress() {
    let mut d = seeded();
    let mut last = 0;
    for offset in [0, 20, 50, 100, 60, 150, 10, 200] {
        let deltas = d.on_scroll(Millis(0), at(offset));
        let claimed = d.stats().infected;
        assert!(claimed >= last);
        assert_eq!(deltas.len(), claimed - last);
        last = claimed;
    }
    assert_eq!(last, d.target(1.0));
}

#[test]
fn claim_count_follows_floor_of_progress() {
    let mut d = seeded();
    d.on_scroll(Millis(0), at(50));
    assert_eq!(d.stats().infected, 62);
    d.on_scroll(Millis(1), at(20));
    assert_eq!(d.stats().infected, 62);
}

#[test]
fn full_progress_claims_every_tile() {
    let mut d = seeded();
    let deltas = d.on_scroll(Millis(0), at(200));
    assert_eq!(deltas.len(), 250);
    assert!(d.is_terminated());
    let mut tiles: Vec<TileCoord> = d.claimed().to_vec();
    tiles.sort_unstable();
    tiles.dedup();
    assert_eq!(tiles.len(), 250);
    assert!(d.on_scroll(Millis(1), at(200)).is_empty());
}

#[test]
fn unscrollable_page_counts_as_fully_scrolled() {
    let position = ScrollPosition {
        offset: 0,
        viewport_height: 50,
        document_height: 50,
    };
    assert_eq!(position.progress(), 1.0);

    let mut d = ProgressDriver::new(&cfg(), Viewport::new(100, 50, 50)).unwrap();
    d.seed();
    assert_eq!(d.on_scroll(Millis(0), Some(position)).len(), 50);
}

#[test]
fn scroll_without_position_claims_nothing() {
    let mut d = seeded();
    assert!(d.on_scroll(Millis(0), None).is_empty());
    assert!(d.frame(Millis(1)).is_empty());
}

#[test]
fn same_seed_claims_same_tiles() {
    let run = || {
        let mut d =
            ProgressDriver::with_rng(&cfg(), page(), StdRng::seed_from_u64(9)).unwrap();
        d.seed();
        d.on_scroll(Millis(0), at(80));
        d.claimed().to_vec()
    };
    assert_eq!(run(), run());
}

#[test]
fn state_roundtrips_through_restore() {
    let mut a = seeded();
    a.on_scroll(Millis(0), at(120));
    let state = a.state();

    let mut b = ProgressDriver::new(&cfg(), page()).unwrap();
    let deltas = b.restore(state.clone()).unwrap();
    assert_eq!(deltas.len(), state.revealed.len());
    assert_eq!(b.state(), state);
    assert_eq!(b.stats().total, 250);

    b.on_scroll(Millis(1), at(200));
    assert!(b.is_terminated());
}

#[test]
fn restore_rejects_foreign_tiles() {
    let mut d = seeded();
    let off_page = SpreadState {
        revealed: vec![TileCoord::new(100, 0)],
        ..SpreadState::default()
    };
    assert!(d.restore(off_page).is_err());
    let committed = SpreadState {
        revealed: vec![TileCoord::new(0, 0)],
        committed: vec![TileCoord::new(0, 0)],
        queued: Vec::new(),
    };
    assert!(d.restore(committed).is_err());
}

#[test]
fn resize_discards_claims() {
    let mut d = seeded();
    d.on_scroll(Millis(0), at(100));
    d.on_resize(Viewport::new(40, 20, 40));
    assert_eq!(d.stats().infected, 0);
    assert_eq!(d.stats().total, 16);
}
