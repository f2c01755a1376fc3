use super::*;
use crate::error::BoardError;
use crate::frames::FrameTable;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
#[should_panic]
fn test_empty_stone_has_no_index() {
    let _ = Stone::Empty.index();
}

#[test]
fn test_pos_conversion() {
    let pos = Pos::new(9, 9); // Center
    assert_eq!(pos.to_index(), 180);
    assert_eq!(Pos::from_index(180), pos);
    assert_eq!(Pos::CENTER, pos);
}

#[test]
fn test_pos_validity() {
    assert!(Pos::is_valid(0, 0));
    assert!(Pos::is_valid(18, 18));
    assert!(!Pos::is_valid(-1, 0));
    assert!(!Pos::is_valid(0, 19));
    assert!(!Pos { row: 19, col: 0 }.in_bounds());
}

#[test]
fn test_board_constants() {
    assert_eq!(BOARD_SIZE, 19);
    assert_eq!(TOTAL_CELLS, 361);
    assert_eq!(WIN_LENGTH, 5);
}

#[test]
fn test_pos_ordering() {
    assert!(Pos::new(0, 0) < Pos::new(0, 1));
    assert!(Pos::new(0, 1) < Pos::new(1, 0));
}

#[test]
fn test_pos_step_and_center_distance() {
    let pos = Pos::new(2, 2);
    assert_eq!(pos.step(Direction::DiagonalDown, 2), Some(Pos::new(0, 4)));
    assert_eq!(pos.step(Direction::DiagonalDown, 3), None);
    assert_eq!(pos.step(Direction::Vertical, -2), Some(Pos::new(0, 2)));
    assert_eq!(Pos::CENTER.center_distance(), 0);
    assert_eq!(Pos::new(0, 18).center_distance(), 9);
}

#[test]
fn test_direction_symbols() {
    for dir in Direction::ALL {
        assert_eq!(Direction::from_symbol(dir.symbol()), Some(dir));
    }
    assert_eq!(Direction::from_symbol('x'), None);
}

#[test]
fn test_occupy_reports_covering_frames() {
    let table = FrameTable::new();
    let mut board = Board::new(&table);

    let frames = board
        .occupy(Pos::CENTER, Stone::Black, &table)
        .expect("empty cell");
    assert_eq!(frames.len(), 20);
    assert_eq!(board.get(Pos::CENTER), Stone::Black);
    assert_eq!(board.moves(), &[Pos::CENTER]);
}

#[test]
fn test_occupy_rejects_bad_moves_without_change() {
    let table = FrameTable::new();
    let mut board = Board::new(&table);
    board.occupy(Pos::CENTER, Stone::Black, &table).unwrap();
    let before = board.clone();

    assert_eq!(
        board.occupy(Pos::CENTER, Stone::White, &table),
        Err(BoardError::Occupied(Pos::CENTER))
    );
    assert_eq!(
        board.occupy(Pos { row: 0, col: 19 }, Stone::White, &table),
        Err(BoardError::OutOfBounds { row: 0, col: 19 })
    );
    assert_eq!(
        board.occupy(Pos::new(0, 0), Stone::Empty, &table),
        Err(BoardError::NoColor)
    );
    assert_eq!(board, before);
}

#[test]
fn test_rollback_restores_cell() {
    let table = FrameTable::new();
    let mut board = Board::new(&table);
    let fresh = board.clone();

    board.occupy(Pos::new(3, 4), Stone::White, &table).unwrap();
    let (pos, stone, frames) = board.rollback(&table).expect("one move logged");
    assert_eq!(pos, Pos::new(3, 4));
    assert_eq!(stone, Stone::White);
    assert!(!frames.is_empty());
    assert_eq!(board, fresh);
    assert!(board.rollback(&table).is_none());
}

#[test]
fn test_cells_hold_anchored_frames() {
    let table = FrameTable::new();
    let board = Board::new(&table);
    let cell = board.cell(Pos::new(0, 0));
    assert!(cell.frames[Direction::Horizontal.index()].is_some());
    assert!(cell.frames[Direction::DiagonalDown.index()].is_none());
}

#[test]
fn test_initialize_clears_everything() {
    let table = FrameTable::new();
    let mut board = Board::new(&table);
    board.occupy(Pos::new(1, 1), Stone::Black, &table).unwrap();
    board.set_value(
        Pos::new(1, 2),
        Stone::White,
        CellValue {
            score: 7,
            level: 2,
            nforce: 1,
        },
    );

    board.initialize();
    assert_eq!(board, Board::new(&table));
    assert_eq!(board.empty_cells().count(), TOTAL_CELLS);
}

#[test]
fn test_display_marks_stones() {
    let table = FrameTable::new();
    let mut board = Board::new(&table);
    board.occupy(Pos::new(18, 0), Stone::Black, &table).unwrap();
    board.occupy(Pos::new(18, 1), Stone::White, &table).unwrap();

    let text = board.to_string();
    let top_row = text.lines().nth(1).expect("row 19");
    assert!(top_row.starts_with("19  X O ."));
}
