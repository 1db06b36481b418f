use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;

use chain_reaction_core::{GameConfig, GameError, GameSession, PlayerId};
use chain_reaction_host::*;
use chain_reaction_protocol::{ClientMessage, ErrorKind, ServerMessage};
use rand::prelude::*;

const A: PlayerId = PlayerId(0);
const B: PlayerId = PlayerId(1);

fn legal_moves(session: &GameSession) -> Vec<(i32, i32)> {
    let player = session.current_player();
    session
        .grid()
        .iter_cells()
        .filter(|(_, cell)| cell.owner.is_none_or(|owner| owner == player))
        .map(|((row, col), _)| (row.into(), col.into()))
        .collect()
}

#[test]
fn json_game_from_creation_to_close() {
    let host = SessionHost::default();

    let reply = host
        .handle_json(r#"{"type":"new_game","rows":6,"cols":6,"players":[0,1]}"#)
        .unwrap();
    assert!(reply.starts_with(r#"{"type":"created","session":1,"board":{"rows":6,"cols":6,"#));

    let moves = [(0, 0, 0), (1, 5, 5), (0, 0, 0)];
    let mut last = String::new();
    for (player, row, col) in moves {
        last = host
            .handle_json(&format!(
                r#"{{"type":"apply_move","session":1,"player":{player},"row":{row},"col":{col}}}"#
            ))
            .unwrap();
    }
    assert!(last.ends_with(r#""winner":null,"error":null,"waves":[[[0,0]]]}"#));

    let rejected = host
        .handle_json(r#"{"type":"apply_move","session":1,"player":1,"row":-1,"col":0}"#)
        .unwrap();
    assert!(rejected.ends_with(r#""winner":null,"error":"invalid_coordinate"}"#));

    let board = host.handle_json(r#"{"type":"get_board","session":1}"#).unwrap();
    assert!(board.starts_with(r#"{"type":"board","#));
    assert!(board.ends_with(r#""winner":null,"current_player":1}"#));

    assert_eq!(
        host.handle_json(r#"{"type":"reset","session":1}"#).unwrap(),
        r#"{"type":"reset_done","session":1}"#
    );
    assert_eq!(
        host.handle_json(r#"{"type":"close","session":1}"#).unwrap(),
        r#"{"type":"closed","session":1}"#
    );
    assert!(host.is_empty());
}

#[test]
fn failures_are_answered_with_error_messages() {
    let host = SessionHost::new(HostConfig { max_sessions: 1 });

    let reply = host.handle(ClientMessage::GetBoard { session: 5 });
    assert!(matches!(
        reply,
        ServerMessage::Error {
            kind: ErrorKind::UnknownSession,
            ..
        }
    ));

    let reply = host.handle(ClientMessage::NewGame {
        rows: 6,
        cols: 6,
        players: vec![0],
    });
    assert!(matches!(
        reply,
        ServerMessage::Error {
            kind: ErrorKind::InvalidConfiguration,
            ..
        }
    ));

    let new_game = ClientMessage::NewGame {
        rows: 3,
        cols: 3,
        players: vec![0, 1],
    };
    assert!(matches!(host.handle(new_game.clone()), ServerMessage::Created { .. }));
    assert!(matches!(
        host.handle(new_game),
        ServerMessage::Error {
            kind: ErrorKind::SessionLimit,
            ..
        }
    ));

    let reply = host.handle_json(r#"{"type":"apply_move","session":1}"#).unwrap();
    assert!(reply.starts_with(r#"{"type":"error","kind":"bad_request","message":"#));
    let reply = host.handle_json("not json").unwrap();
    assert!(reply.starts_with(r#"{"type":"error","kind":"bad_request","message":"#));
}

#[test]
fn sessions_do_not_share_state() {
    let host = SessionHost::default();
    let (first, _) = host.create(GameConfig::default(), vec![A, B]).unwrap();
    let (second, _) = host.create(GameConfig::new(3, 4).unwrap(), vec![B, A]).unwrap();

    host.apply_move(first, A, 2, 2).unwrap().outcome.unwrap();
    host.apply_move(second, B, 2, 2).unwrap().outcome.unwrap();

    let first_status = host.status(first).unwrap();
    let second_status = host.status(second).unwrap();
    assert_eq!(first_status.current_player, B);
    assert_eq!(second_status.current_player, A);
    assert_eq!(first_status.board.size(), (6, 6));
    assert_eq!(second_status.board.size(), (3, 4));
    assert_eq!(
        first_status.board.cell_at((2, 2)).and_then(|cell| cell.owner),
        Some(A)
    );
    assert_eq!(
        second_status.board.cell_at((2, 2)).and_then(|cell| cell.owner),
        Some(B)
    );
}

#[test]
fn parallel_sessions_match_sequential_replays() {
    let host = SessionHost::default();
    let ids: Vec<_> = (0..8)
        .map(|_| host.create(GameConfig::new(5, 5).unwrap(), vec![A, B]).unwrap().0)
        .collect();

    let histories: Vec<Vec<(PlayerId, i32, i32)>> = thread::scope(|scope| {
        let workers: Vec<_> = ids
            .iter()
            .map(|&id| {
                let host = &host;
                scope.spawn(move || {
                    let mut rng = SmallRng::seed_from_u64(id);
                    let mut history = Vec::new();
                    while !host.with_session(id, GameSession::is_finished).unwrap() {
                        let (player, legal) = host
                            .with_session(id, |session| {
                                (session.current_player(), legal_moves(session))
                            })
                            .unwrap();
                        let (row, col) = legal[rng.random_range(0..legal.len())];
                        host.apply_move(id, player, row, col).unwrap().outcome.unwrap();
                        history.push((player, row, col));
                    }
                    history
                })
            })
            .collect();
        workers.into_iter().map(|worker| worker.join().unwrap()).collect()
    });

    for (&id, history) in ids.iter().zip(&histories) {
        let mut replay = GameSession::new(GameConfig::new(5, 5).unwrap(), vec![A, B]).unwrap();
        for &(player, row, col) in history {
            replay.apply_move(player, row, col).unwrap();
        }
        assert_eq!(host.board(id).unwrap(), replay.board(), "session {id}");
        assert_eq!(host.status(id).unwrap().winner, replay.winner());
    }
}

#[test]
fn concurrent_moves_on_one_session_are_serialized() {
    let host = SessionHost::default();
    let (id, _) = host.create(GameConfig::new(4, 4).unwrap(), vec![A, B]).unwrap();
    let accepted = AtomicU32::new(0);
    let halted = AtomicBool::new(false);

    thread::scope(|scope| {
        for seed in 0..8 {
            let (host, accepted, halted) = (&host, &accepted, &halted);
            scope.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(seed);
                for _ in 0..2_000 {
                    // another thread may move between this read and the move below
                    let (player, legal) = host
                        .with_session(id, |session| {
                            (session.current_player(), legal_moves(session))
                        })
                        .unwrap();
                    let (row, col) = legal[rng.random_range(0..legal.len())];
                    match host.apply_move(id, player, row, col).unwrap().outcome {
                        Ok(outcome) => {
                            accepted.fetch_add(1, Ordering::Relaxed);
                            if outcome.report.halted {
                                halted.store(true, Ordering::Relaxed);
                            }
                        }
                        Err(GameError::GameAlreadyFinished) => break,
                        Err(GameError::NotPlayersTurn | GameError::CellOwnedByOpponent) => {}
                        Err(error) => panic!("unexpected rejection: {error}"),
                    }
                }
            });
        }
    });

    let accepted = accepted.into_inner();
    let status = host.status(id).unwrap();
    assert_eq!(status.board.total_chips(), accepted);
    let winning_move = u32::from(status.winner.is_some());
    assert_eq!(status.turn_count + winning_move, accepted);
    let halted = halted.into_inner();
    assert!(!halted || status.winner.is_some());
    host.with_session(id, |session| {
        assert!(session.grid().is_consistent());
        assert!(halted || session.grid().is_stable());
    })
    .unwrap();
}
