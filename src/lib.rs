// Library exports for the Hamiltonian-tour Battlesnake
// This allows the server, the replay tool and the tests to share the core logic

#[macro_use]
extern crate rocket;

pub mod bot;
pub mod collision;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod handler;
pub mod maze;
pub mod move_selector;
pub mod replay;
pub mod session;
pub mod tour;
pub mod tour_index;
pub mod types;
