use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

const TILE: u32 = 18;

fn page_100x50() -> Viewport {
    Viewport::new(100 * TILE, 50 * TILE, 50 * TILE)
}

#[test]
fn seeds_land_in_top_band_on_grid() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let f = Frontier::seeded(page_100x50(), TILE, 0.5, 3, &mut rng);
        assert!((1..=3).contains(&f.len()));
        for t in f.tiles() {
            assert_eq!(t.x % i64::from(TILE), 0);
            assert_eq!(t.y % i64::from(TILE), 0);
            assert!(t.y < i64::from(25 * TILE));
            assert!(t.x < i64::from(100 * TILE));
        }
    }
}

#[test]
fn seeding_tiny_viewport_is_empty() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(Frontier::seeded(Viewport::new(10, 900, 900), TILE, 0.5, 3, &mut rng).is_empty());
    assert!(Frontier::seeded(Viewport::new(900, 20, 20), TILE, 0.5, 3, &mut rng).is_empty());
}

#[test]
fn step_is_monotonic_and_in_bounds() {
    let viewport = page_100x50();
    let bounds = viewport.page_bounds();
    let sampler = DirectionSampler::default();
    let mut rng = StdRng::seed_from_u64(9);
    let mut f = Frontier::seeded(viewport, TILE, 0.5, 3, &mut rng);
    for _ in 0..40 {
        let out = f.step(bounds, TILE, &sampler, &mut rng);
        assert!(f.tiles().is_subset(out.next.tiles()));
        assert_eq!(out.next.len(), f.len() + out.added.len());
        for t in out.next.tiles() {
            assert!(bounds.contains(t.x, t.y), "{t} escaped");
        }
        f = out.next;
    }
}

#[test]
fn seeded_single_tick_adds_exactly_reachable_tiles() {
    let viewport = page_100x50();
    let bounds = viewport.page_bounds();
    let sampler = DirectionSampler::default();

    let mut rng = StdRng::seed_from_u64(2024);
    let f = Frontier::seeded(viewport, TILE, 0.5, 3, &mut rng);

    // Replay the same random stream by hand.
    let mut replay = rng.clone();
    let mut expected = f.tiles().clone();
    let mut expected_added = Vec::new();
    for &t in f.tiles() {
        for d in sampler.sample(&mut replay) {
            let c = t.offset(d.dx, d.dy, TILE);
            if bounds.contains(c.x, c.y) && !expected.contains(&c) {
                expected.insert(c);
                expected_added.push(c);
            }
        }
    }

    let out = f.step(bounds, TILE, &sampler, &mut rng);
    assert_eq!(out.next.tiles(), &expected);
    assert_eq!(out.added, expected_added);

    let mut dedup = out.added.clone();
    dedup.sort();
    dedup.dedup();
    assert_eq!(dedup.len(), out.added.len());
    assert!(out.added.iter().all(|t| !f.contains(t)));
}

#[test]
fn edge_tiles_reject_out_of_bounds_candidates() {
    let bounds = Bounds {
        width: i64::from(TILE),
        height: i64::from(TILE),
    };
    let f = Frontier::from_tiles([TileCoord::new(0, 0)]);
    let sampler = DirectionSampler::default();
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..20 {
        let out = f.step(bounds, TILE, &sampler, &mut rng);
        assert!(out.added.is_empty());
        assert_eq!(out.next, f);
    }
}
