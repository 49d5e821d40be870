//! Plain-text rendering of client views.

use noughts_proto::BoardState;

use crate::event::View;

/// Printed once after connecting.
pub const USAGE: &str = "Enter moves as row,col (0-2)\n\
                         Or type 'chat:message' to send a chat message\n\
                         Type 'quit' to leave the game";

const BOARD_HEADER: &str = "--- Board ---";
const BOARD_FOOTER: &str = "-------------";

/// Board as a 3x3 grid between header and footer lines.
pub fn render_board(board: &BoardState) -> String {
    let mut out = String::from(BOARD_HEADER);
    for row in &board.cells {
        out.push('\n');
        let cells: Vec<String> = row.iter().map(|cell| cell.as_char().to_string()).collect();
        out.push_str(&cells.join(" "));
    }
    out.push('\n');
    out.push_str(BOARD_FOOTER);
    out
}

fn turn_line(my_turn: bool) -> &'static str {
    if my_turn { "Your turn! Make your move." } else { "Waiting for the other player..." }
}

/// Text for one view.
pub fn render(view: &View) -> String {
    match view {
        View::Assigned(mark) => format!("You are player {mark}"),
        View::Seated(seat) => format!("Your player id: {seat}"),
        View::Started { text, my_turn } => format!("{text}\n{}", turn_line(*my_turn)),
        View::Board(board) => render_board(board),
        View::Turn { my_turn } => turn_line(*my_turn).to_string(),
        View::Moved { seat, row, col, mark } => {
            format!("Player {seat} ({mark}) played ({row},{col})")
        },
        View::Result(text) => format!("Result: {text}"),
        View::GameOver(text) => format!("=== GAME OVER ===\n{text}\n================="),
        View::PlayerLeft(text) => format!("Notice: {text}"),
        View::Chat { seat, text } => format!("[Chat] {seat}: {text}"),
        View::Refused(text) => format!("Error: {text}"),
        View::Hint(text) => text.clone(),
        View::Disconnected => "Disconnected from server.".to_string(),
    }
}

/// Print a view to stdout.
#[allow(clippy::print_stdout, reason = "the terminal is this client's user interface")]
pub fn show(view: &View) {
    println!("{}", render(view));
}

/// Print the usage banner to stdout.
#[allow(clippy::print_stdout, reason = "the terminal is this client's user interface")]
pub fn show_usage() {
    println!("{USAGE}");
}
