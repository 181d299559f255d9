// Replay module for analyzing logged games and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL move logs written by the debug logger
// 2. Rebuild each game's tour from its logged seed and board size
// 3. Re-run the move selector and compare with the logged move
// 4. Generate summary reports

use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::MoveLogEntry;
use crate::maze::GridDimensions;
use crate::move_selector::MoveSelector;
use crate::session::Session;
use crate::tour_index::TourIndex;
use crate::types::Direction;

/// Tours are fully determined by seed and board size
type TourKey = (u64, i32, i32);

fn tour_key(entry: &MoveLogEntry) -> TourKey {
    (entry.seed, entry.board.width, entry.board.height)
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub game_id: String,
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub cutting_budget: usize,
    pub trapped: bool,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub trapped_turns: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<MoveLogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: MoveLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Rebuilds the tour a logged game was played on
    pub fn rebuild_tour(entry: &MoveLogEntry) -> Result<TourIndex, String> {
        let dimensions = GridDimensions::new(entry.board.width, entry.board.height)
            .map_err(|e| e.to_string())?;
        let session = Session::build(&entry.game_id, dimensions, entry.seed)
            .map_err(|e| e.to_string())?;
        Ok(session.tour().clone())
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &MoveLogEntry) -> Result<ReplayResult, String> {
        let tour = Self::rebuild_tour(entry)?;
        self.replay_with_tour(entry, &tour)
    }

    fn replay_with_tour(&self, entry: &MoveLogEntry, tour: &TourIndex) -> Result<ReplayResult, String> {
        let original_move = Direction::parse(&entry.chosen_move)?;

        let start_time = Instant::now();
        let decision = MoveSelector::new(tour, &self.config.heuristic).select_move(&entry.board, &entry.you);
        let computation_time_us = start_time.elapsed().as_micros();

        let matches = original_move == decision.direction;
        let result = ReplayResult {
            game_id: entry.game_id.clone(),
            turn: entry.turn,
            original_move,
            replayed_move: decision.direction,
            matches,
            cutting_budget: decision.cutting_budget,
            trapped: decision.trapped,
            computation_time_us,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} (budget: {}, time: {}us)",
                    entry.turn,
                    decision.direction.as_str(),
                    decision.cutting_budget,
                    computation_time_us
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} (budget: {}, time: {}us)",
                    entry.turn,
                    original_move.as_str(),
                    decision.direction.as_str(),
                    decision.cutting_budget,
                    computation_time_us
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries, rebuilding each distinct tour once and replaying turns in parallel
    pub fn replay_all(&self, entries: &[MoveLogEntry]) -> Vec<ReplayResult> {
        let mut tours: HashMap<TourKey, TourIndex> = HashMap::new();
        for entry in entries {
            let key = tour_key(entry);
            if tours.contains_key(&key) {
                continue;
            }
            match Self::rebuild_tour(entry) {
                Ok(tour) => {
                    tours.insert(key, tour);
                }
                Err(e) => warn!("Failed to rebuild tour for game {}: {}", entry.game_id, e),
            }
        }

        entries
            .par_iter()
            .filter_map(|entry| {
                let tour = tours.get(&tour_key(entry))?;
                match self.replay_with_tour(entry, tour) {
                    Ok(result) => Some(result),
                    Err(e) => {
                        warn!("Failed to replay turn {}: {}", entry.turn, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[MoveLogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let trapped_turns = results.iter().filter(|r| r.trapped).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            trapped_turns,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("Trapped Turns:  {}", stats.trapped_turns);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            let avg_budget: f64 =
                results.iter().map(|r| r.cutting_budget as f64).sum::<f64>() / results.len() as f64;

            println!("Average Cutting Budget:     {:.1}", avg_budget);
            println!("Average Computation Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "{} turn {}: {} → {} (budget: {}, trapped: {})",
                    result.game_id,
                    result.turn,
                    result.original_move.as_str(),
                    result.replayed_move.as_str(),
                    result.cutting_budget,
                    result.trapped
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[MoveLogEntry],
        expected_moves: &[(i32, Vec<Direction>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move = Direction::parse(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }
}
