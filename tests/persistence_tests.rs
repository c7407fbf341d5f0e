use broadside::{
    Coord, GameSession, HuntState, Mode, PersistenceError, SessionSnapshot, SessionStore, CellState, FLEET,
    SNAPSHOT_VERSION,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn mid_game_session(seed: u64) -> GameSession {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut session = GameSession::new();
    session.start("Alice").unwrap();
    for (i, _) in FLEET.iter().enumerate() {
        session.place_ship(&mut rng, Coord::new(i, 2)).unwrap();
    }
    let targets: Vec<Coord> = Coord::all()
        .filter(|c| session.opponent_board().cell(*c).unwrap() == CellState::Ship)
        .take(4)
        .chain(
            Coord::all()
                .filter(|c| session.opponent_board().cell(*c).unwrap() == CellState::Empty)
                .take(8),
        )
        .collect();
    for t in targets {
        session.fire_at(&mut rng, t).unwrap();
    }
    assert_eq!(session.mode(), Mode::PlayerTurn);
    session
}

#[test]
fn test_save_then_load_reproduces_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("gamestate.bin"));
    let session = mid_game_session(21);

    store.save(&session.snapshot()).unwrap();
    assert!(store.exists());
    let snapshot = store.load().unwrap().expect("snapshot present");
    let restored = GameSession::from_snapshot(snapshot);

    assert_eq!(restored.mode(), Mode::PlayerTurn);
    assert_eq!(restored.player_board(), session.player_board());
    assert_eq!(restored.opponent_board(), session.opponent_board());
    assert_eq!(restored.placements_completed(), session.placements_completed());
    assert_eq!(restored.hunt(), session.hunt());
    assert_eq!(restored.player_name(), session.player_name());
    assert_eq!(restored.player_remaining(), session.player_remaining());
    assert_eq!(restored.opponent_remaining(), session.opponent_remaining());
}

#[test]
fn test_load_without_save_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("gamestate.bin"));
    assert!(!store.exists());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("nested").join("gamestate.bin"));
    store.save(&mid_game_session(1).snapshot()).unwrap();
    let second = mid_game_session(2);
    store.save(&second.snapshot()).unwrap();
    assert_eq!(store.load().unwrap().unwrap(), second.snapshot());
}

#[test]
fn test_malformed_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gamestate.bin");
    std::fs::write(&path, b"definitely not a snapshot").unwrap();
    let store = SessionStore::new(&path);
    assert!(matches!(store.load(), Err(PersistenceError::Encode(_))));
}

#[test]
fn test_unknown_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("gamestate.bin"));
    let snapshot = SessionSnapshot {
        version: SNAPSHOT_VERSION + 1,
        ..mid_game_session(3).snapshot()
    };
    store.save(&snapshot).unwrap();
    assert!(matches!(store.load(), Err(PersistenceError::Corrupt(_))));
}

#[test]
fn test_unwritable_location_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the file should be
    let path = dir.path().join("slot");
    std::fs::create_dir(&path).unwrap();
    let store = SessionStore::new(&path);
    assert!(matches!(
        store.save(&mid_game_session(4).snapshot()),
        Err(PersistenceError::Io(_))
    ));
    assert!(matches!(store.load(), Err(PersistenceError::Io(_))));
}

fn hunt_from_json(json: &str) -> HuntState {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_inconsistent_hunt_state_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("gamestate.bin"));
    let base = mid_game_session(5).snapshot();

    let off_board = hunt_from_json(
        r#"{"candidates":[{"row":20,"col":20},null,null,null],"active":"Up"}"#,
    );
    assert!(!off_board.is_consistent());
    store
        .save(&SessionSnapshot {
            hunt: off_board,
            ..base.clone()
        })
        .unwrap();
    assert!(matches!(store.load(), Err(PersistenceError::Corrupt(_))));

    let empty_active = hunt_from_json(r#"{"candidates":[null,null,null,null],"active":"Left"}"#);
    assert!(!empty_active.is_consistent());
    store
        .save(&SessionSnapshot {
            hunt: empty_active,
            ..base.clone()
        })
        .unwrap();
    assert!(matches!(store.load(), Err(PersistenceError::Corrupt(_))));

    // a state reached by play still loads
    assert!(base.hunt.is_consistent());
    store.save(&base).unwrap();
    assert_eq!(store.load().unwrap(), Some(base));
}
