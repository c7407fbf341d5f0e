use broadside::{
    Board, BoardError, CellState, Coord, GameError, GameSession, Grid, HuntState, Mode,
    Orientation, SessionSnapshot, ShotResult, BOARD_SIZE, FLEET, SNAPSHOT_VERSION,
    TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Places the fleet in rows 0..6 starting at column 0, all horizontal.
fn placed_session(rng: &mut SmallRng, name: &str) -> GameSession {
    let mut session = GameSession::new();
    session.start(name).unwrap();
    for (i, _) in FLEET.iter().enumerate() {
        session.place_ship(rng, Coord::new(i, 0)).unwrap();
    }
    session
}

fn opponent_ship_cells(session: &GameSession) -> Vec<Coord> {
    Coord::all()
        .filter(|c| session.opponent_board().cell(*c).unwrap() == CellState::Ship)
        .collect()
}

fn opponent_open_water(session: &GameSession) -> Vec<Coord> {
    Coord::all()
        .filter(|c| session.opponent_board().cell(*c).unwrap() == CellState::Empty)
        .collect()
}

#[test]
fn test_new_session_is_pregame() {
    let session = GameSession::new();
    assert_eq!(session.mode(), Mode::PreGame);
    assert_eq!(session.placements_completed(), 0);
    assert_eq!(session.player_remaining(), TOTAL_SHIP_CELLS);
    assert_eq!(session.opponent_remaining(), TOTAL_SHIP_CELLS);
    assert_eq!(session.current_ship_length(), None);
}

#[test]
fn test_full_placement_enters_player_turn() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut session = GameSession::new();
    session.start("Alice").unwrap();
    assert_eq!(session.mode(), Mode::PlacingHorizontal);

    let mut placed = 0;
    for (i, &len) in FLEET.iter().enumerate() {
        assert_eq!(session.current_ship_length(), Some(len));
        let report = session.place_ship(&mut rng, Coord::new(i, 0)).unwrap();
        placed += len;
        assert_eq!(report.length, len);
        assert_eq!(report.placements_completed, i + 1);
        assert_eq!(session.player_board().count(CellState::Ship), placed);
        assert_eq!(session.opponent_board().count(CellState::Ship), placed);
    }

    assert_eq!(session.mode(), Mode::PlayerTurn);
    assert_eq!(session.placements_completed(), 6);
    assert_eq!(session.player_board().count(CellState::Ship), 16);
    assert_eq!(session.opponent_board().count(CellState::Ship), 16);
    assert_eq!(session.player_remaining(), 16);
    assert_eq!(session.opponent_remaining(), 16);
    assert_eq!(session.player_name(), "Alice");
}

#[test]
fn test_toggle_orientation_changes_placement_axis() {
    let mut rng = SmallRng::seed_from_u64(6);
    let mut session = GameSession::new();
    session.start("").unwrap();
    assert_eq!(session.toggle_orientation().unwrap(), Orientation::Vertical);
    assert_eq!(session.mode(), Mode::PlacingVertical);

    let report = session.place_ship(&mut rng, Coord::new(0, 9)).unwrap();
    assert_eq!(report.orientation, Orientation::Vertical);
    session.place_ship(&mut rng, Coord::new(2, 9)).unwrap();
    // length 2, vertical from row 8 fits exactly
    session.place_ship(&mut rng, Coord::new(8, 9)).unwrap();
    assert_eq!(session.player_board().cell(Coord::new(9, 9)).unwrap(), CellState::Ship);

    assert_eq!(session.toggle_orientation().unwrap(), Orientation::Horizontal);
    assert_eq!(session.mode(), Mode::PlacingHorizontal);
}

#[test]
fn test_rejected_placement_changes_nothing() {
    let mut rng = SmallRng::seed_from_u64(8);
    let mut session = GameSession::new();
    session.start("Bob").unwrap();
    session.place_ship(&mut rng, Coord::new(0, 0)).unwrap();

    let player = *session.player_board();
    let opponent = *session.opponent_board();
    assert_eq!(
        session.place_ship(&mut rng, Coord::new(0, 0)).unwrap_err(),
        GameError::PlacementRejected(BoardError::ShipOverlaps)
    );
    assert_eq!(
        session.place_ship(&mut rng, Coord::new(10, 0)).unwrap_err(),
        GameError::PlacementRejected(BoardError::ShipOutOfBounds)
    );
    assert_eq!(*session.player_board(), player);
    assert_eq!(*session.opponent_board(), opponent);
    assert_eq!(session.placements_completed(), 1);
    assert_eq!(session.mode(), Mode::PlacingHorizontal);
}

#[test]
fn test_operations_rejected_in_wrong_mode() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut session = GameSession::new();
    assert_eq!(
        session.fire_at(&mut rng, Coord::new(0, 0)).unwrap_err(),
        GameError::InvalidMode(Mode::PreGame)
    );
    assert_eq!(
        session.place_ship(&mut rng, Coord::new(0, 0)).unwrap_err(),
        GameError::InvalidMode(Mode::PreGame)
    );
    session.start("").unwrap();
    assert_eq!(
        session.fire_at(&mut rng, Coord::new(0, 0)).unwrap_err(),
        GameError::InvalidMode(Mode::PlacingHorizontal)
    );

    let mut session = placed_session(&mut rng, "");
    assert_eq!(
        session.toggle_orientation().unwrap_err(),
        GameError::InvalidMode(Mode::PlayerTurn)
    );
    assert_eq!(
        session.place_ship(&mut rng, Coord::new(9, 9)).unwrap_err(),
        GameError::InvalidMode(Mode::PlayerTurn)
    );
}

#[test]
fn test_miss_triggers_exactly_one_opponent_shot() {
    let mut rng = SmallRng::seed_from_u64(10);
    let mut session = placed_session(&mut rng, "");
    let target = opponent_open_water(&session)[0];

    let report = session.fire_at(&mut rng, target).unwrap();
    assert_eq!(report.result, ShotResult::Miss);
    let (coord, result) = report.opponent_shot.unwrap();
    assert_ne!(result, ShotResult::AlreadyTried);
    assert!(session.player_board().cell(coord).unwrap().is_resolved());
    let resolved = session.player_board().count(CellState::Hit)
        + session.player_board().count(CellState::Miss);
    assert_eq!(resolved, 1);
    assert_eq!(session.opponent_remaining(), 16);
}

#[test]
fn test_repeat_guess_is_rejected_without_opponent_move() {
    let mut rng = SmallRng::seed_from_u64(11);
    let mut session = placed_session(&mut rng, "");
    let target = opponent_ship_cells(&session)[0];

    let report = session.fire_at(&mut rng, target).unwrap();
    assert_eq!(report.result, ShotResult::Hit);
    assert_eq!(session.opponent_remaining(), 15);

    let player_before = *session.player_board();
    let hunt_before = *session.hunt();
    assert_eq!(
        session.fire_at(&mut rng, target).unwrap_err(),
        GameError::RepeatGuess
    );
    assert_eq!(*session.player_board(), player_before);
    assert_eq!(*session.hunt(), hunt_before);
    assert_eq!(session.opponent_remaining(), 15);
}

#[test]
fn test_sinking_every_ship_wins() {
    let mut rng = SmallRng::seed_from_u64(12);
    let mut session = placed_session(&mut rng, "Alice");
    let targets = opponent_ship_cells(&session);
    assert_eq!(targets.len(), 16);

    let (last, rest) = targets.split_last().unwrap();
    for t in rest {
        let report = session.fire_at(&mut rng, *t).unwrap();
        assert_eq!(report.mode, Mode::PlayerTurn);
        assert!(report.opponent_shot.is_some());
    }
    let report = session.fire_at(&mut rng, *last).unwrap();
    assert_eq!(report.mode, Mode::Won);
    assert_eq!(report.opponent_shot, None);
    assert_eq!(session.opponent_remaining(), 0);

    // 15 opponent shots can't sink all 16 player cells
    let score = session.final_score().unwrap();
    assert!(score > 0);
    assert_eq!(score, session.player_remaining() as i32);

    assert_eq!(
        session.fire_at(&mut rng, Coord::new(0, 0)).unwrap_err(),
        GameError::InvalidMode(Mode::Won)
    );
}

#[test]
fn test_losing_last_cell_ends_game() {
    // player has one ship cell left and nothing else to shoot at
    let mut player: Grid = [[CellState::Miss; BOARD_SIZE]; BOARD_SIZE];
    player[3][3] = CellState::Ship;
    let mut opponent = Board::new();
    opponent.place(Coord::new(0, 0), 4, Orientation::Horizontal).unwrap();

    let snapshot = SessionSnapshot {
        version: SNAPSHOT_VERSION,
        player_board: Board::from_grid(player),
        opponent_board: opponent,
        player_name: "Carol".to_string(),
        placements: 6,
        hunt: HuntState::new(),
    };
    let mut session = GameSession::from_snapshot(snapshot);
    assert_eq!(session.player_remaining(), 1);
    assert_eq!(session.opponent_remaining(), 4);

    let mut rng = SmallRng::seed_from_u64(13);
    let report = session.fire_at(&mut rng, Coord::new(9, 9)).unwrap();
    assert_eq!(report.result, ShotResult::Miss);
    assert_eq!(report.opponent_shot, Some((Coord::new(3, 3), ShotResult::Hit)));
    assert_eq!(report.mode, Mode::Lost);
    assert_eq!(session.final_score(), Some(-4));
}

#[test]
fn test_snapshot_round_trip_recounts_remaining() {
    let mut rng = SmallRng::seed_from_u64(14);
    let mut session = placed_session(&mut rng, "Dave");
    for t in opponent_ship_cells(&session).into_iter().take(5) {
        session.fire_at(&mut rng, t).unwrap();
    }
    for t in opponent_open_water(&session).into_iter().take(5) {
        session.fire_at(&mut rng, t).unwrap();
    }

    let restored = GameSession::from_snapshot(session.snapshot());
    assert_eq!(restored.mode(), Mode::PlayerTurn);
    assert_eq!(restored.player_board(), session.player_board());
    assert_eq!(restored.opponent_board(), session.opponent_board());
    assert_eq!(restored.hunt(), session.hunt());
    assert_eq!(restored.player_name(), "Dave");
    assert_eq!(restored.placements_completed(), 6);
    assert_eq!(restored.player_remaining(), session.player_remaining());
    assert_eq!(restored.opponent_remaining(), 11);
}

#[test]
fn test_started_session_is_placing_for_trimmed_name() {
    let session = GameSession::started("  Erin ");
    assert_eq!(session.mode(), Mode::PlacingHorizontal);
    assert_eq!(session.player_name(), "Erin");
    assert_eq!(session.current_ship_length(), Some(FLEET[0]));
    assert!(!session.mode().is_terminal());

    let mut session = GameSession::started("Erin");
    assert_eq!(
        session.start("Frank").unwrap_err(),
        GameError::InvalidMode(Mode::PlacingHorizontal)
    );
    assert_eq!(session.player_name(), "Erin");
}

#[test]
fn test_failed_opponent_reply_leaves_session_unchanged() {
    let mut rng = SmallRng::seed_from_u64(15);
    let placed = placed_session(&mut rng, "Gina");
    // queued pursuit target outside the grid
    let hunt: HuntState = serde_json::from_str(
        r#"{"candidates":[{"row":20,"col":20},null,null,null],"active":"Up"}"#,
    )
    .unwrap();
    let mut session = GameSession::from_snapshot(SessionSnapshot {
        hunt,
        ..placed.snapshot()
    });
    let before = session.snapshot();
    let target = opponent_ship_cells(&session)[0];

    for _ in 0..2 {
        assert_eq!(
            session.fire_at(&mut rng, target).unwrap_err(),
            GameError::Board(BoardError::OutOfBounds(Coord::new(20, 20)))
        );
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.opponent_board().cell(target).unwrap(), CellState::Ship);
        assert_eq!(session.opponent_remaining(), TOTAL_SHIP_CELLS);
        assert_eq!(session.mode(), Mode::PlayerTurn);
    }
}
