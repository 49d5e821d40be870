//! Property-based tests for the line codec.
//!
//! Lines come straight off a socket, so decoding must never panic and must
//! classify every failure as a `ProtocolError`.

use noughts_proto::{BoardState, Cell, ClientMessage, Mark, ProtocolError, ServerMessage};
use proptest::prelude::*;

fn arbitrary_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![Just(Cell::Empty), Just(Cell::Marked(Mark::X)), Just(Cell::Marked(Mark::O))]
}

fn arbitrary_board() -> impl Strategy<Value = BoardState> {
    prop::array::uniform3(prop::array::uniform3(arbitrary_cell())).prop_map(BoardState::from_rows)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: decoding arbitrary input never panics, in either direction
    #[test]
    fn prop_decode_never_panics(line in ".*") {
        let _ = ClientMessage::decode(&line);
        let _ = ServerMessage::decode(&line);
    }

    /// Property: any pair of integers survives a move request
    #[test]
    fn prop_move_request_preserves_coordinates(row in any::<i32>(), col in any::<i32>()) {
        let msg = ClientMessage::Move { row, col };
        prop_assert_eq!(ClientMessage::decode(&msg.encode()), Ok(msg));
    }

    /// Property: chat text without line breaks is relayed verbatim, pipes included
    #[test]
    fn prop_chat_text_is_verbatim(text in "[^\r\n]*") {
        let msg = ClientMessage::Chat { text: text.clone() };
        prop_assert_eq!(ClientMessage::decode(&msg.encode()), Ok(msg));
    }

    /// Property: a board snapshot decodes to the same cells
    #[test]
    fn prop_board_snapshot_is_exact(board in arbitrary_board()) {
        let line = ServerMessage::State(board).encode();
        prop_assert_eq!(ServerMessage::decode(&line), Ok(ServerMessage::State(board)));
    }

    /// Property: non-numeric coordinates are always reported, never coerced
    #[test]
    fn prop_non_numeric_row_is_rejected(row in "[a-zA-Z]{1,8}", col in 0i32..3) {
        let line = format!("JOGADA|{row}|{col}");
        let is_invalid_row = matches!(
            ClientMessage::decode(&line),
            Err(ProtocolError::InvalidNumber { field: "row", .. })
        );
        prop_assert!(is_invalid_row);
    }
}
