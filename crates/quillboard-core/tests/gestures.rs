//! End-to-end gesture scenarios through the public board API.

use kurbo::{Point, Size};
use quillboard_core::element::{Element, ShapeKind, ShapePrimitive};
use quillboard_core::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use quillboard_core::store::AddOptions;
use quillboard_core::{Board, ToolKind};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn down(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Down {
        position: Point::new(x, y),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    }
}

fn mv(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Move {
        position: Point::new(x, y),
        modifiers: Modifiers::NONE,
    }
}

fn up(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Up {
        position: Point::new(x, y),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    }
}

fn drag(board: &mut Board, from: (f64, f64), to: (f64, f64)) {
    board.handle_pointer(down(from.0, from.1));
    board.handle_pointer(mv(to.0, to.1));
    board.frame_tick();
    board.handle_pointer(up(to.0, to.1));
}

#[test]
fn rectangle_drag_produces_exact_bounds() {
    init_logging();
    let mut board = Board::new();
    board.set_tool(ToolKind::Rectangle);

    drag(&mut board, (100.0, 100.0), (300.0, 250.0));

    let el = board.store().document().ordered().next().unwrap();
    assert_eq!(el.position(), Point::new(100.0, 100.0));
    assert_eq!(el.size(), Size::new(200.0, 150.0));
    assert_eq!(board.active_tool(), ToolKind::Select);
}

#[test]
fn connector_between_two_shapes_binds_both_ends() {
    init_logging();
    let mut board = Board::new();

    board.set_tool(ToolKind::Rectangle);
    drag(&mut board, (0.0, 0.0), (100.0, 100.0));
    board.set_tool(ToolKind::Rectangle);
    drag(&mut board, (400.0, 0.0), (500.0, 100.0));

    board.set_tool(ToolKind::ConnectorArrow);
    drag(&mut board, (50.0, 50.0), (450.0, 50.0));

    let connector = board
        .store()
        .document()
        .ordered()
        .find_map(Element::as_connector)
        .expect("connector was created");
    assert!(connector.from.is_bound());
    assert!(connector.to.is_bound());
    assert!(connector.arrowhead);
    assert!(connector.fully_bound());
}

#[test]
fn group_drag_moves_both_and_undoes_in_one_step() {
    init_logging();
    let mut board = Board::new();
    let no_history = AddOptions {
        select: false,
        push_history: false,
    };
    let a = Element::Shape(ShapePrimitive::new(
        ShapeKind::Rectangle,
        Point::new(0.0, 0.0),
        100.0,
        100.0,
    ));
    let b = Element::Shape(ShapePrimitive::new(
        ShapeKind::Rectangle,
        Point::new(200.0, 0.0),
        100.0,
        100.0,
    ));
    let (id_a, id_b) = (a.id(), b.id());
    board.store_mut().add_element(a, no_history);
    board.store_mut().add_element(b, no_history);
    board.store_mut().set_selection([id_a, id_b]);

    // Drag from inside a selected element by (10, 20).
    drag(&mut board, (50.0, 50.0), (60.0, 70.0));

    let doc = board.store().document();
    assert_eq!(doc.get(id_a).unwrap().position(), Point::new(10.0, 20.0));
    assert_eq!(doc.get(id_b).unwrap().position(), Point::new(210.0, 20.0));

    assert!(board.store_mut().undo());
    let doc = board.store().document();
    assert_eq!(doc.get(id_a).unwrap().position(), Point::new(0.0, 0.0));
    assert_eq!(doc.get(id_b).unwrap().position(), Point::new(200.0, 0.0));
    assert!(!board.store().can_undo());
}

#[test]
fn zoom_at_pointer_keeps_world_point_fixed() {
    init_logging();
    let mut board = Board::new();
    let stage = Point::new(320.0, 240.0);
    let world_before = board.store().camera().stage_to_world(stage);

    board.handle_pointer(PointerEvent::Scroll {
        position: stage,
        delta_y: -240.0,
        modifiers: Modifiers::NONE,
    });

    assert!(board.store().camera().zoom > 1.0);
    let world_after = board.store().camera().stage_to_world(stage);
    assert!((world_after.x - world_before.x).abs() < 1e-9);
    assert!((world_after.y - world_before.y).abs() < 1e-9);
}

#[test]
fn add_undo_redo_restores_identical_element() {
    init_logging();
    let mut board = Board::new();
    board.set_tool(ToolKind::Sticky);
    board.handle_pointer(down(40.0, 60.0));
    board.handle_pointer(up(40.0, 60.0));

    let original = board.store().document().ordered().next().unwrap().clone();
    let id = original.id();

    assert!(board.store_mut().undo());
    assert!(board.store().document().is_empty());
    assert!(board.store_mut().redo());

    let restored = board.store().document().get(id).expect("element restored");
    assert_eq!(restored.id(), original.id());
    assert_eq!(restored.kind(), original.kind());
    assert_eq!(restored.position(), original.position());
    assert_eq!(restored.size(), original.size());
}

#[test]
fn escape_mid_marquee_leaves_selection_untouched() {
    init_logging();
    let mut board = Board::new();
    board.set_tool(ToolKind::Rectangle);
    drag(&mut board, (0.0, 0.0), (100.0, 100.0));
    let id = board.store().document().ordered().next().unwrap().id();
    assert!(board.store().document().is_selected(id));

    board.handle_pointer(down(500.0, 500.0));
    board.handle_pointer(mv(550.0, 550.0));
    board.frame_tick();
    board.handle_key(KeyEvent::plain(Key::Escape));

    // The shape survived and the marquee never committed.
    assert_eq!(board.store().document().len(), 1);
}
