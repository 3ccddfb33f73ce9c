use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn propagate_infects_only_new_in_bounds_cells() {
    let mut grid = CellGrid::new(12, 12).unwrap();
    let seed = Cell::new(6, 6);
    grid.infect(seed);
    let sampler = RadiusSampler::default();
    let mut rng = StdRng::seed_from_u64(17);

    let next = propagate(&[seed], &mut grid, &sampler, &mut rng);
    assert!(!next.is_empty());
    assert!(next.len() <= 5);
    for c in &next {
        assert!(grid.is_infected(*c));
        assert_ne!(*c, seed);
        assert!(c.row.abs_diff(6) <= 5 && c.col.abs_diff(6) <= 5);
    }
    assert_eq!(grid.uninfected(), 144 - 1 - next.len());
}

#[test]
fn propagation_from_single_seed_terminates() {
    let (rows, cols) = (9, 13);
    let mut grid = CellGrid::new(rows, cols).unwrap();
    let start = Cell::new(0, 4);
    grid.infect(start);
    let sampler = RadiusSampler::default();
    let mut rng = StdRng::seed_from_u64(99);

    let mut queue = vec![start];
    let mut steps = 0;
    while !queue.is_empty() && !grid.is_full() {
        queue = propagate(&queue, &mut grid, &sampler, &mut rng);
        steps += 1;
        assert!(steps <= rows * cols, "propagation did not terminate");
    }
}

#[test]
fn queue_never_reports_a_cell_twice() {
    let mut grid = CellGrid::new(20, 20).unwrap();
    let start = Cell::new(10, 10);
    grid.infect(start);
    let sampler = RadiusSampler::default();
    let mut rng = StdRng::seed_from_u64(4);
    let mut seen = std::collections::HashSet::from([start]);
    let mut queue = vec![start];
    while !queue.is_empty() {
        queue = propagate(&queue, &mut grid, &sampler, &mut rng);
        for c in &queue {
            assert!(seen.insert(*c), "{c:?} reported twice");
        }
    }
    assert_eq!(seen.len(), grid.len() - grid.uninfected());
}

#[test]
fn forced_finish_below_threshold_leaves_nothing_uninfected() {
    let mut grid = CellGrid::new(10, 10).unwrap();
    for i in 0..71 {
        grid.infect(Cell::new(i / 10, i % 10));
    }
    assert_eq!(grid.uninfected(), 29);
    let newly = finish_if_sparse(&mut grid, FinishThreshold::default());
    assert_eq!(newly.len(), 29);
    assert_eq!(grid.uninfected(), 0);
}

#[test]
fn forced_finish_waits_at_threshold() {
    let mut grid = CellGrid::new(10, 10).unwrap();
    for i in 0..70 {
        grid.infect(Cell::new(i / 10, i % 10));
    }
    assert_eq!(grid.uninfected(), 30);
    assert!(finish_if_sparse(&mut grid, FinishThreshold::Cells(30)).is_empty());
    assert_eq!(grid.uninfected(), 30);
}

#[test]
fn fraction_threshold_scales_with_grid() {
    let t = FinishThreshold::Fraction(0.01);
    assert_eq!(t.limit(10_000), 100);
    assert_eq!(t.limit(50), 1);
    assert!(t.validate().is_ok());
    assert!(FinishThreshold::Fraction(1.5).validate().is_err());

    let json = serde_json::to_string(&FinishThreshold::Cells(30)).unwrap();
    assert_eq!(json, r#"{"cells":30}"#);
    let back: FinishThreshold = serde_json::from_str(r#"{"fraction":0.25}"#).unwrap();
    assert_eq!(back, FinishThreshold::Fraction(0.25));
}
