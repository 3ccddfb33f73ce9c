use super::*;

fn scene() -> SceneAdapter {
    SceneAdapter::new(Viewport::new(80, 40, 80), Palette::default()).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 1)
}

#[test]
fn empty_scene_is_covered() {
    let mut s = scene();
    let frame = s.render().unwrap();
    assert_eq!((frame.width, frame.height), (80, 80));
    let cover = Palette::default().cover.premul().to_array();
    assert!(close(frame.pixel(10, 10).unwrap(), cover));
    assert!(close(frame.pixel(79, 79).unwrap(), cover));
}

#[test]
fn revealed_tile_takes_gradient_colour() {
    let mut s = scene();
    s.clear_tile(Layer::Overlay, TileCoord::new(20, 0), 20).unwrap();
    let frame = s.render().unwrap();
    let top = Palette::default().revealed_top.premul().to_array();
    assert!(close(frame.pixel(30, 10).unwrap(), top));
    let cover = Palette::default().cover.premul().to_array();
    assert!(close(frame.pixel(10, 10).unwrap(), cover));
}

#[test]
fn committed_tile_stays_revealed() {
    let mut s = scene();
    let t = TileCoord::new(20, 0);
    s.clear_tile(Layer::Overlay, t, 20).unwrap();
    s.clear_tile(Layer::Background, t, 20).unwrap();
    let frame = s.render().unwrap();
    let committed = frame.pixel(30, 10).unwrap();
    let covered = frame.pixel(10, 10).unwrap();
    assert_ne!(committed, covered);
    assert!(close(committed, Palette::default().revealed_top.premul().to_array()));
}

#[test]
fn gradient_repeats_every_viewport() {
    let s = scene();
    assert_eq!(s.revealed_color(0), Palette::default().revealed_top);
    assert_eq!(s.revealed_color(40), s.revealed_color(0));
    assert_eq!(s.revealed_color(60), s.revealed_color(20));
    assert_ne!(s.revealed_color(20), s.revealed_color(0));
}

#[test]
fn nodes_track_both_layers() {
    let mut s = scene();
    let t = TileCoord::new(0, 20);
    s.clear_tile(Layer::Overlay, t, 20).unwrap();
    assert_eq!(
        s.node(t),
        Some(&TileNode {
            size: 20,
            revealed: true,
            committed: false,
        })
    );
    s.clear_tile(Layer::Background, t, 20).unwrap();
    assert!(s.node(t).unwrap().committed);
    assert_eq!(s.node_count(), 1);
}

#[test]
fn erase_removes_a_drawn_line() {
    let mut s = scene();
    let line = |paint| EdgeStroke {
        x: 0,
        y: 20,
        width: 20,
        paint,
        edge: crate::render::delta::Edge::Bottom,
    };
    s.draw_edge(line(EdgePaint::Dark)).unwrap();
    assert_eq!(s.line(0, 20, 20), Some(EdgePaint::Dark));
    s.draw_edge(line(EdgePaint::Erase)).unwrap();
    assert_eq!(s.line(0, 20, 20), None);
}

#[test]
fn resize_drops_all_nodes() {
    let mut s = scene();
    s.clear_tile(Layer::Overlay, TileCoord::new(0, 0), 20).unwrap();
    s.resize(Viewport::new(40, 20, 20)).unwrap();
    assert_eq!(s.node_count(), 0);
    let frame = s.render().unwrap();
    assert_eq!((frame.width, frame.height), (40, 20));
}
