//! Move selection scenarios on real generated tours
//!
//! Tours are random, so each scenario is phrased in terms of the tour itself:
//! bodies are laid along it and expected moves are derived from tour distances.

use hamiltonian_snake::collision::CollisionOracle;
use hamiltonian_snake::config::Config;
use hamiltonian_snake::maze::GridDimensions;
use hamiltonian_snake::move_selector::MoveSelector;
use hamiltonian_snake::session::Session;
use hamiltonian_snake::tour_index::TourIndex;
use hamiltonian_snake::types::{Battlesnake, Board, Coord, Direction};

fn session(seed: u64) -> Session {
    Session::build("scenario", GridDimensions::new(8, 8).unwrap(), seed).unwrap()
}

fn snake(id: &str, body: Vec<Coord>) -> Battlesnake {
    Battlesnake {
        id: id.to_string(),
        health: 100,
        body,
        ..Default::default()
    }
}

fn board(food: Vec<Coord>, snakes: Vec<Battlesnake>) -> Board {
    Board {
        width: 8,
        height: 8,
        food,
        snakes,
        hazards: vec![],
    }
}

/// Body of `length` cells ending at tour position `head`, trailing back along the tour
fn body_along_tour(tour: &TourIndex, head: usize, length: usize) -> Vec<Coord> {
    let n = tour.len();
    (0..length)
        .map(|k| tour.coord_at((head + n - k) % n).unwrap())
        .collect()
}

#[test]
fn test_crowded_board_follows_tour_strictly() {
    let config = Config::default_hardcoded();

    for seed in 0..10 {
        let session = session(seed);
        let tour = session.tour();
        let you = snake("me", vec![Coord::new(2, 2), Coord::new(2, 1), Coord::new(2, 0)]);

        // 30 food in the bottom half leaves 31 of 64 cells free: below half the board.
        let food: Vec<Coord> = (4..8)
            .flat_map(|y| (0..8).map(move |x| Coord::new(x, y)))
            .take(30)
            .collect();
        let board = board(food, vec![you.clone()]);

        let decision = MoveSelector::new(tour, &config.heuristic).select_move(&board, &you);
        assert_eq!(decision.cutting_budget, 0, "seed {}", seed);
        assert!(!decision.trapped);

        let head_index = tour.index_of(&Coord::new(2, 2)).unwrap();
        let oracle = CollisionOracle::new(&board, &you);
        let expected = Direction::all()
            .iter()
            .copied()
            .filter(|dir| !oracle.is_unsafe(&dir.apply(&Coord::new(2, 2))))
            .min_by_key(|dir| {
                let index = tour.index_of(&dir.apply(&Coord::new(2, 2))).unwrap();
                tour.circular_distance(head_index, index)
            })
            .unwrap();
        assert_eq!(decision.direction, expected, "seed {}", seed);

        let successor = tour.coord_at(tour.successor(head_index)).unwrap();
        if successor != Coord::new(2, 1) {
            assert_eq!(expected.apply(&Coord::new(2, 2)), successor, "seed {}", seed);
        }
    }
}

#[test]
fn test_takes_largest_shortcut_within_food_budget() {
    let config = Config::default_hardcoded();
    let mut scenarios = 0;

    for seed in 0..5 {
        let session = session(seed);
        let tour = session.tour();
        let n = tour.len();

        for head in 0..n {
            let body = body_along_tour(tour, head, 3);
            let head_coord = body[0];
            // Food sits five cells ahead on the tour.
            let food = tour.coord_at((head + 6) % n).unwrap();

            let best = Direction::all()
                .iter()
                .filter_map(|&dir| {
                    let next = dir.apply(&head_coord);
                    if body.contains(&next) {
                        return None;
                    }
                    let index = tour.index_of(&next)?;
                    let distance = tour.circular_distance(head, index);
                    (distance <= 5).then_some((dir, distance))
                })
                .max_by_key(|&(_, distance)| distance);

            let Some((best_dir, best_distance)) = best else {
                continue;
            };
            if best_distance == 0 {
                continue;
            }

            let you = snake("me", body.clone());
            let board = board(vec![food], vec![you.clone()]);
            let decision = MoveSelector::new(tour, &config.heuristic).select_move(&board, &you);

            assert_eq!(decision.cutting_budget, 5, "seed {} head {}", seed, head);
            assert_eq!(decision.direction, best_dir, "seed {} head {}", seed, head);
            assert_eq!(decision.shortcut, Some(best_distance));
            scenarios += 1;
        }
    }

    assert!(scenarios > 0, "no shortcut opportunity found");
}

#[test]
fn test_boxed_in_snake_still_answers() {
    let config = Config::default_hardcoded();
    let session = session(1);
    let you = snake(
        "me",
        vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(1, 1), Coord::new(0, 1)],
    );
    let board = board(vec![Coord::new(5, 5)], vec![you.clone()]);

    let decision = MoveSelector::new(session.tour(), &config.heuristic).select_move(&board, &you);
    assert!(decision.trapped);
    assert_eq!(decision.shortcut, None);
    // Up and left leave the board; right is the first fallback that stays on it.
    assert_eq!(decision.direction, Direction::Right);
}

#[test]
fn test_avoids_cells_next_to_longer_enemy_head() {
    let config = Config::default_hardcoded();

    for seed in 0..10 {
        let session = session(seed);
        let tour = session.tour();
        let n = tour.len();

        for head in (0..n).step_by(7) {
            let body = body_along_tour(tour, head, 3);
            let successor = tour.coord_at(tour.successor(head)).unwrap();

            // Park a stacked length-4 enemy next to our tour successor.
            let Some(enemy_head) = Direction::all()
                .iter()
                .map(|dir| dir.apply(&successor))
                .find(|c| c.x >= 0 && c.x < 8 && c.y >= 0 && c.y < 8 && !body.contains(c))
            else {
                continue;
            };
            let enemy = snake("enemy", vec![enemy_head; 4]);
            let you = snake("me", body.clone());
            let board = board(vec![], vec![you.clone(), enemy]);

            let decision = MoveSelector::new(tour, &config.heuristic).select_move(&board, &you);
            if decision.trapped {
                continue;
            }
            let target = decision.direction.apply(&body[0]);
            assert_ne!(target, successor, "seed {} head {}", seed, head);
            assert_ne!(target, enemy_head);
            assert_ne!(target.manhattan(&enemy_head), 1);
        }
    }
}

#[test]
fn test_no_food_means_no_shortcuts() {
    let config = Config::default_hardcoded();
    let session = session(4);
    let tour = session.tour();

    for head in 0..tour.len() {
        let body = body_along_tour(tour, head, 3);
        let you = snake("me", body);
        let board = board(vec![], vec![you.clone()]);
        let decision = MoveSelector::new(tour, &config.heuristic).select_move(&board, &you);
        assert_eq!(decision.cutting_budget, 0);
        // The successor is never part of a body laid along the tour behind the head.
        assert_eq!(decision.shortcut, Some(0), "head {}", head);
    }
}
