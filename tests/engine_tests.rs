//! Explosion engine and rules integration tests on the standard 9x6 board.

use chain_reaction::board::{critical_mass, Board, CellKind};
use chain_reaction::core::{Cell, Color, Position};
use chain_reaction::explosion::{CascadeStop, ExplosionEngine, NoopObserver, WaveReport};
use chain_reaction::rules::{ChainReactionRules, GameResult, RulesEngine};

fn board() -> Board {
    Board::new(9, 6).unwrap()
}

fn at(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

// =============================================================================
// Critical Mass
// =============================================================================

#[test]
fn test_critical_mass_census() {
    let b = board();
    let mut counts = [0usize; 5];
    for pos in b.positions() {
        counts[b.critical_mass(pos) as usize] += 1;
    }
    // 4 corners, 2 * (7 + 4) edges, 7 * 4 interior.
    assert_eq!(counts[2], 4);
    assert_eq!(counts[3], 22);
    assert_eq!(counts[4], 28);
}

#[test]
fn test_critical_mass_by_kind() {
    assert_eq!(critical_mass(at(0, 5), 9, 6), 2);
    assert_eq!(critical_mass(at(8, 0), 9, 6), 2);
    assert_eq!(critical_mass(at(0, 3), 9, 6), 3);
    assert_eq!(critical_mass(at(4, 5), 9, 6), 3);
    assert_eq!(critical_mass(at(4, 3), 9, 6), 4);
    assert_eq!(CellKind::classify(at(8, 3), 9, 6), CellKind::Edge);
}

// =============================================================================
// Explosion Scenarios
// =============================================================================

#[test]
fn test_interior_explodes_on_fourth_orb_and_captures() {
    let mut b = board();
    let engine = ExplosionEngine::new();
    b.set(at(3, 2), Cell::with_orbs(1, Color::Blue)).unwrap();

    for _ in 0..3 {
        b.place(at(4, 2), Color::Red).unwrap();
        let report = engine.resolve_from(&mut b, at(4, 2), Color::Red, &mut NoopObserver);
        assert_eq!(report.waves, 0);
    }
    assert_eq!(b[at(4, 2)], Cell::with_orbs(3, Color::Red));

    b.place(at(4, 2), Color::Red).unwrap();
    let report = engine.resolve_from(&mut b, at(4, 2), Color::Red, &mut NoopObserver);

    assert_eq!(report.waves, 1);
    assert_eq!(report.explosions, 1);
    assert!(b[at(4, 2)].is_empty());
    // The Blue orb is captured and joined by the incoming one.
    assert_eq!(b[at(3, 2)], Cell::with_orbs(2, Color::Red));
    assert_eq!(b[at(5, 2)], Cell::with_orbs(1, Color::Red));
    assert_eq!(b[at(4, 1)], Cell::with_orbs(1, Color::Red));
    assert_eq!(b[at(4, 3)], Cell::with_orbs(1, Color::Red));
    assert_eq!(b.total_orbs(), 5);
    assert_eq!(b.orb_count(Color::Blue), 0);
}

#[test]
fn test_corner_explodes_on_second_orb() {
    let mut b = board();
    b.set(at(8, 5), Cell::with_orbs(1, Color::Blue)).unwrap();
    b.place(at(0, 0), Color::Red).unwrap();
    b.place(at(0, 0), Color::Red).unwrap();

    let report = ExplosionEngine::new().resolve_from(&mut b, at(0, 0), Color::Red, &mut NoopObserver);

    assert_eq!(report.waves, 1);
    assert_eq!(report.stop, CascadeStop::Quiescent);
    assert!(b[at(0, 0)].is_empty());
    assert_eq!(b[at(1, 0)], Cell::with_orbs(1, Color::Red));
    assert_eq!(b[at(0, 1)], Cell::with_orbs(1, Color::Red));
}

#[test]
fn test_shared_neighbour_is_scheduled_once() {
    let mut b = board();
    b.set(at(0, 0), Cell::with_orbs(2, Color::Red)).unwrap();
    b.set(at(0, 1), Cell::with_orbs(1, Color::Red)).unwrap();
    b.set(at(0, 2), Cell::with_orbs(3, Color::Red)).unwrap();
    b.set(at(8, 5), Cell::with_orbs(1, Color::Blue)).unwrap();

    let mut waves: Vec<WaveReport> = Vec::new();
    let mut observer = |report: &WaveReport, _: &Board| waves.push(report.clone());
    let report = ExplosionEngine::new().settle(&mut b, &mut observer);

    assert_eq!(report.waves, 2);
    assert_eq!(report.explosions, 3);
    assert_eq!(waves[0].detonated, vec![(at(0, 0), Color::Red), (at(0, 2), Color::Red)]);
    assert_eq!(waves[0].scheduled, vec![at(0, 1)]);
    assert_eq!(waves[1].detonated, vec![(at(0, 1), Color::Red)]);
    assert!(waves[1].scheduled.is_empty());

    assert!(b[at(0, 1)].is_empty());
    for pos in [at(0, 0), at(0, 2), at(1, 0), at(1, 1), at(1, 2), at(0, 3)] {
        assert_eq!(b[pos], Cell::with_orbs(1, Color::Red), "at {pos}");
    }
    assert_eq!(b.total_orbs(), 7);
}

#[test]
fn test_long_chain_along_top_edge() {
    let mut b = board();
    b.set(at(8, 5), Cell::with_orbs(1, Color::Blue)).unwrap();
    b.set(at(0, 0), Cell::with_orbs(1, Color::Red)).unwrap();
    for col in 1..5 {
        b.set(at(0, col), Cell::with_orbs(2, Color::Blue)).unwrap();
    }
    b.set(at(0, 5), Cell::with_orbs(1, Color::Blue)).unwrap();
    let before = b.total_orbs();

    b.place(at(0, 0), Color::Red).unwrap();
    let report = ExplosionEngine::new().resolve_from(&mut b, at(0, 0), Color::Red, &mut NoopObserver);

    // Each edge cell fires in turn, left to right, then the far corner.
    assert!(report.waves >= 6);
    assert_eq!(b.total_orbs(), before + 1);
    assert_eq!(b[at(8, 5)], Cell::with_orbs(1, Color::Blue));
    for col in 0..6 {
        assert!(b[at(1, col)].is_owned_by(Color::Red), "row 1 col {col}");
    }
    assert!(b.is_quiescent());
}

#[test]
fn test_settle_is_idempotent_on_quiescent_board() {
    let mut b = board();
    b.set(at(2, 2), Cell::with_orbs(3, Color::Red)).unwrap();
    b.set(at(0, 0), Cell::with_orbs(1, Color::Blue)).unwrap();
    let before = b.clone();

    let report = ExplosionEngine::new().settle(&mut b, &mut NoopObserver);
    assert_eq!(report.waves, 0);
    assert_eq!(b, before);
}

// =============================================================================
// Win Detection
// =============================================================================

#[test]
fn test_first_orb_never_wins() {
    let rules = ChainReactionRules::new();
    let mut b = board();
    b.place(at(4, 4), Color::Red).unwrap();
    assert_eq!(b.total_orbs(), 1);
    assert_eq!(rules.winner(&b), None);
}

#[test]
fn test_wiped_out_colour_loses() {
    let rules = ChainReactionRules::new();
    let mut b = board();
    b.place(at(4, 4), Color::Blue).unwrap();
    b.place(at(0, 0), Color::Blue).unwrap();
    assert_eq!(rules.winner(&b), Some(GameResult::Winner(Color::Blue)));

    b.place(at(8, 0), Color::Red).unwrap();
    assert_eq!(rules.winner(&b), None);
}
