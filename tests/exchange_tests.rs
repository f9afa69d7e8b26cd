//! Agent exchange protocol integration tests.
//!
//! The agent side runs on its own thread, as the external process would.

use std::thread;
use std::time::Duration;

use chain_reaction::agent::{Agent, RandomAgent};
use chain_reaction::board::Board;
use chain_reaction::core::{
    AgentError, Cell, Color, ExchangeConfig, ExchangeError, GameConfig, Position,
};
use chain_reaction::exchange::{
    format, AgentEndpoint, CancelToken, ExchangeAgent, ExchangeChannel, FileChannel, Header,
    MemoryChannel,
};
use chain_reaction::explosion::NoopObserver;
use chain_reaction::game::{GameMode, Session};

fn fast() -> ExchangeConfig {
    ExchangeConfig::default()
        .with_polling(Duration::from_millis(1), Duration::from_millis(8))
        .with_timeout(Duration::from_secs(10))
}

/// Wait for a handoff, then write `reply(board)` verbatim.
fn reply_once<C, F>(channel: C, reply: F) -> thread::JoinHandle<()>
where
    C: ExchangeChannel + Send + 'static,
    F: FnOnce(&Board) -> String + Send + 'static,
{
    thread::spawn(move || {
        let endpoint = AgentEndpoint::new(&channel, fast());
        let board = endpoint.wait_for_handoff().unwrap();
        channel.write(&reply(&board)).unwrap();
    })
}

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn test_human_vs_agent_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gamestate.txt");

    let endpoint = AgentEndpoint::new(FileChannel::new(&path), fast());
    let remote = thread::spawn(move || {
        endpoint
            .serve(&mut RandomAgent::new(3), Color::Blue, Some(3))
            .unwrap()
    });

    let config = GameConfig::default().with_mode(GameMode::HumanVsAgent);
    let mut session = Session::new(config)
        .unwrap()
        .with_agent(Color::Blue, ExchangeAgent::new(FileChannel::new(&path), fast()));

    for pos in [Position::new(4, 1), Position::new(4, 2), Position::new(4, 3)] {
        // Red may have been captured; any of its own or an empty cell will do.
        let pos = if session.board()[pos].is_owned_by(Color::Blue) {
            session
                .board()
                .positions()
                .find(|&p| session.board()[p].is_empty())
                .unwrap()
        } else {
            pos
        };
        assert!(session.human_move(pos).is_resolved());
        let played = session.advance_agents(&mut NoopObserver).unwrap();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].mover, Color::Blue);
    }

    assert_eq!(remote.join().unwrap(), 3);
    assert_eq!(session.board().total_orbs(), 6);
    assert_eq!(session.status().to_string(), "Red's Turn (Human)");

    // The last handoff is still in the file, answered.
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("AI Move:\n"));
}

#[test]
fn test_incomplete_and_garbled_content_is_retried() {
    let channel = MemoryChannel::new();
    let remote = {
        let channel = channel.clone();
        thread::spawn(move || {
            let endpoint = AgentEndpoint::new(&channel, fast());
            let board = endpoint.wait_for_handoff().unwrap();
            let mut answer = board.clone();
            answer.place(Position::new(2, 2), Color::Blue).unwrap();
            let text = format::write_board(Header::AgentMove, &answer);

            // Half a write, then garbage, then the real answer.
            channel.write(&text[..text.len() / 2]).unwrap();
            thread::sleep(Duration::from_millis(20));
            channel.write("AI Move:\n0 0 zz\n").unwrap();
            thread::sleep(Duration::from_millis(20));
            channel.write(&text).unwrap();
        })
    };

    let mut host = ExchangeAgent::new(channel, fast());
    let board = Board::new(9, 6).unwrap();
    assert_eq!(host.next_move(&board, Color::Blue).unwrap(), Position::new(2, 2));
    remote.join().unwrap();
}

// =============================================================================
// Protocol Faults
// =============================================================================

#[test]
fn test_two_changed_cells_is_a_fault() {
    let channel = MemoryChannel::new();
    let remote = reply_once(channel.clone(), |board| {
        let mut answer = board.clone();
        answer.place(Position::new(0, 0), Color::Blue).unwrap();
        answer.place(Position::new(5, 5), Color::Blue).unwrap();
        format::write_board(Header::AgentMove, &answer)
    });

    let config = GameConfig::default().with_mode(GameMode::HumanVsAgent);
    let mut session = Session::new(config)
        .unwrap()
        .with_agent(Color::Blue, ExchangeAgent::new(channel, fast()));
    session.human_move(Position::new(4, 4));

    let err = session.advance_agents(&mut NoopObserver).unwrap_err();
    remote.join().unwrap();
    assert!(matches!(
        err.source,
        AgentError::Exchange(ExchangeError::AmbiguousDiff { changed: 2 })
    ));
    assert!(err.source.is_recoverable());
    // The turn did not advance.
    assert_eq!(session.controller().current(), Color::Blue);
    assert_eq!(session.board().total_orbs(), 1);
}

#[test]
fn test_turn_is_retried_after_a_fault() {
    let channel = MemoryChannel::new();
    let config = GameConfig::default().with_mode(GameMode::HumanVsAgent);
    let mut session = Session::new(config)
        .unwrap()
        .with_agent(Color::Blue, ExchangeAgent::new(channel.clone(), fast()));
    session.human_move(Position::new(4, 4));

    let remote = reply_once(channel.clone(), |_| {
        let mut small = Board::new(3, 3).unwrap();
        small.set(Position::new(1, 1), Cell::with_orbs(1, Color::Blue)).unwrap();
        format::write_board(Header::AgentMove, &small)
    });
    let err = session.step_agent(&mut NoopObserver).unwrap_err();
    remote.join().unwrap();
    assert!(matches!(err, AgentError::Exchange(ExchangeError::DimensionMismatch { .. })));
    assert!(err.is_recoverable());
    assert_eq!(session.controller().current(), Color::Blue);

    // Asking again hands the same board over and accepts a good answer.
    let remote = reply_once(channel.clone(), |board| {
        let mut answer = board.clone();
        answer.place(Position::new(0, 0), Color::Blue).unwrap();
        format::write_board(Header::AgentMove, &answer)
    });
    let summary = session.step_agent(&mut NoopObserver).unwrap().unwrap();
    remote.join().unwrap();
    assert_eq!(summary.mover, Color::Blue);
    assert_eq!(summary.position, Position::new(0, 0));
    assert_eq!(session.controller().current(), Color::Red);
    assert_eq!(session.board().total_orbs(), 2);
}

#[test]
fn test_unchanged_board_is_a_fault() {
    let channel = MemoryChannel::new();
    let remote = reply_once(channel.clone(), |board| {
        format::write_board(Header::AgentMove, board)
    });

    let mut host = ExchangeAgent::new(channel, fast());
    let board = Board::new(9, 6).unwrap();
    let err = host.next_move(&board, Color::Blue).unwrap_err();
    remote.join().unwrap();
    assert!(matches!(
        err,
        AgentError::Exchange(ExchangeError::AmbiguousDiff { changed: 0 })
    ));
}

#[test]
fn test_wrong_dimensions_is_a_fault() {
    let channel = MemoryChannel::new();
    let remote = reply_once(channel.clone(), |_| {
        let mut small = Board::new(3, 3).unwrap();
        small.set(Position::new(1, 1), Cell::with_orbs(1, Color::Blue)).unwrap();
        format::write_board(Header::AgentMove, &small)
    });

    let mut host = ExchangeAgent::new(channel, fast());
    let board = Board::new(9, 6).unwrap();
    let err = host.next_move(&board, Color::Blue).unwrap_err();
    remote.join().unwrap();
    assert!(matches!(
        err,
        AgentError::Exchange(ExchangeError::DimensionMismatch {
            rows: 9,
            cols: 6,
            found_rows: 3,
            found_cols: 3,
        })
    ));
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_cancel_from_another_thread() {
    let cancel = CancelToken::new();
    let config = ExchangeConfig::default()
        .with_polling(Duration::from_millis(1), Duration::from_millis(5));
    let mut host = ExchangeAgent::new(MemoryChannel::new(), config).with_cancel(cancel.clone());

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        cancel.cancel();
    });

    let board = Board::new(9, 6).unwrap();
    let err = host.next_move(&board, Color::Blue).unwrap_err();
    canceller.join().unwrap();
    assert!(matches!(err, AgentError::Exchange(ExchangeError::Cancelled)));
    assert!(!err.is_recoverable());
}

#[test]
fn test_endpoint_cancel_stops_serving() {
    let endpoint = AgentEndpoint::new(MemoryChannel::new(), fast());
    endpoint.cancel_token().cancel();
    let err = endpoint
        .serve(&mut RandomAgent::new(1), Color::Blue, None)
        .unwrap_err();
    assert!(matches!(err, AgentError::Exchange(ExchangeError::Cancelled)));
}
