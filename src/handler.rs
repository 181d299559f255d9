// HTTP handler bindings for Battlesnake API endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's core logic methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Mapping session errors to HTTP status codes

use log::warn;
use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Build, Rocket};
use serde_json::{json, Value};

use crate::bot::Bot;
use crate::error::HamiltonError;
use crate::types::{EndRequest, GameState};

fn status_for(err: &HamiltonError) -> Status {
    match err {
        HamiltonError::InvalidBoardDimensions { .. } => Status::BadRequest,
        HamiltonError::MazeInvariantViolation(_) => Status::InternalServerError,
        HamiltonError::UnknownSession(_) => Status::NotFound,
    }
}

fn reject(endpoint: &str, err: HamiltonError) -> Status {
    warn!("{} rejected: {}", endpoint, err);
    status_for(&err)
}

/// GET / endpoint
/// Returns bot metadata and appearance configuration
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /ping endpoint
/// Liveness check
#[post("/ping")]
pub fn ping() -> Json<Value> {
    Json(json!({}))
}

/// POST /start endpoint
/// Builds the game's maze and tour before answering
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameState>) -> Result<Json<Value>, Status> {
    bot.start(&start_req)
        .map(Json)
        .map_err(|e| reject("/start", e))
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub fn get_move(bot: &rocket::State<Bot>, move_req: Json<GameState>) -> Result<Json<Value>, Status> {
    bot.get_move(&move_req)
        .map(Json)
        .map_err(|e| reject("/move", e))
}

/// POST /end endpoint
/// Called when a game ends - dumps diagnostics and drops the session
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<EndRequest>) -> Result<Json<Value>, Status> {
    bot.end(&end_req)
        .map(|_| Json(json!({})))
        .map_err(|e| reject("/end", e))
}

/// Assembles the Rocket instance serving `bot`
pub fn build_rocket(bot: Bot) -> Rocket<Build> {
    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "battlesnake/hamiltonian-snake");
            })
        }))
        .mount("/", routes![index, ping, start, get_move, end])
}
