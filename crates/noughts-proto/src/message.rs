//! Typed protocol messages.
//!
//! Each direction has its own enum so a server can never accidentally decode
//! a `TURNO` from a client, and vice versa. Decoding is lenient in one way
//! only: free-text fields may contain `|`, because everything after the last
//! positional field is re-joined.

use std::{fmt, str::FromStr};

use crate::{
    Tag,
    board::{BoardState, Mark},
    errors::{ProtocolError, Result},
};

/// Separator between fields of a line.
pub const FIELD_SEPARATOR: char = '|';

/// Longest line either side reads, in bytes, not counting the terminator.
///
/// A peer that exceeds it is disconnected rather than buffered.
pub const MAX_LINE_LEN: usize = 4096;

/// Longest chat text the server relays, in bytes.
///
/// A relayed `CHAT` line adds the seat prefix, so the limit sits well below
/// [`MAX_LINE_LEN`].
pub const MAX_CHAT_LEN: usize = 1024;

/// Separator between the seat id and the text of a relayed chat line.
const CHAT_SEPARATOR: &str = ": ";

/// Ordinal seat identifier (1 for the first seat, 2 for the second).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId(u8);

impl SeatId {
    /// Wrap a raw seat number.
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw seat number.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Messages sent by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// `JOGADA|row|col`. Coordinates are signed so that out-of-range values
    /// reach the game rules instead of failing as malformed input.
    Move {
        /// Target row
        row: i32,
        /// Target column
        col: i32,
    },
    /// `CHAT|text`
    Chat {
        /// Message text
        text: String,
    },
}

impl ClientMessage {
    /// Tag of this message.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Move { .. } => Tag::Move,
            Self::Chat { .. } => Tag::Chat,
        }
    }

    /// Encode as a single line, without the terminator.
    pub fn encode(&self) -> String {
        match self {
            Self::Move { row, col } => format!("{}|{row}|{col}", Tag::Move),
            Self::Chat { text } => format!("{}|{}", Tag::Chat, sanitize(text)),
        }
    }

    /// Decode one line received from a client.
    pub fn decode(line: &str) -> Result<Self> {
        let (tag, fields) = split_line(line);

        match Tag::from_wire(tag) {
            Some(Tag::Move) => {
                let row = parse_field(&fields, 0, Tag::Move, "row")?;
                let col = parse_field(&fields, 1, Tag::Move, "col")?;
                Ok(Self::Move { row, col })
            },
            Some(Tag::Chat) => Ok(Self::Chat { text: rest(&fields, 0, Tag::Chat, "text")? }),
            _ => Err(ProtocolError::UnknownTag(tag.to_string())),
        }
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Messages sent by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `SIMBOLO|mark`
    Symbol(Mark),
    /// `ID_JOGADOR|seat`
    PlayerId(SeatId),
    /// `JOGO_INICIADO|text`
    GameStarted(String),
    /// `ESTADO|r0|r1|r2`
    State(BoardState),
    /// `TURNO|seat`
    Turn(SeatId),
    /// `MOVIMENTO|seat|row|col|mark`
    MoveMade {
        /// Seat that moved
        seat: SeatId,
        /// Row that was marked
        row: u8,
        /// Column that was marked
        col: u8,
        /// Mark that was placed
        mark: Mark,
    },
    /// `RESULTADO|text`, addressed to a single seat
    Result(String),
    /// `FIM_JOGO|text`
    GameOver(String),
    /// `JOGADOR_SAIU|text`
    PlayerLeft(String),
    /// `SERVIDOR_CHEIO|text`, followed by the server closing the connection
    ServerFull(String),
    /// `CHAT|seat: text`
    Chat {
        /// Seat that sent the chat
        seat: SeatId,
        /// Message text
        text: String,
    },
}

impl ServerMessage {
    /// Tag of this message.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Symbol(_) => Tag::Symbol,
            Self::PlayerId(_) => Tag::PlayerId,
            Self::GameStarted(_) => Tag::GameStarted,
            Self::State(_) => Tag::State,
            Self::Turn(_) => Tag::Turn,
            Self::MoveMade { .. } => Tag::MoveMade,
            Self::Result(_) => Tag::Result,
            Self::GameOver(_) => Tag::GameOver,
            Self::PlayerLeft(_) => Tag::PlayerLeft,
            Self::ServerFull(_) => Tag::ServerFull,
            Self::Chat { .. } => Tag::Chat,
        }
    }

    /// Encode as a single line, without the terminator.
    pub fn encode(&self) -> String {
        let tag = self.tag();
        match self {
            Self::Symbol(mark) => format!("{tag}|{mark}"),
            Self::PlayerId(seat) | Self::Turn(seat) => format!("{tag}|{seat}"),
            Self::State(board) => format!("{tag}|{}", board.encode()),
            Self::MoveMade { seat, row, col, mark } => format!("{tag}|{seat}|{row}|{col}|{mark}"),
            Self::GameStarted(text)
            | Self::Result(text)
            | Self::GameOver(text)
            | Self::PlayerLeft(text)
            | Self::ServerFull(text) => format!("{tag}|{}", sanitize(text)),
            Self::Chat { seat, text } => {
                format!("{tag}|{seat}{CHAT_SEPARATOR}{}", sanitize(text))
            },
        }
    }

    /// Decode one line received from the server.
    pub fn decode(line: &str) -> Result<Self> {
        let (raw_tag, fields) = split_line(line);
        let Some(tag) = Tag::from_wire(raw_tag) else {
            return Err(ProtocolError::UnknownTag(raw_tag.to_string()));
        };

        match tag {
            Tag::Symbol => Ok(Self::Symbol(Mark::decode(field(&fields, 0, tag, "mark")?)?)),
            Tag::PlayerId => Ok(Self::PlayerId(SeatId(parse_field(&fields, 0, tag, "seat")?))),
            Tag::Turn => Ok(Self::Turn(SeatId(parse_field(&fields, 0, tag, "seat")?))),
            Tag::GameStarted => Ok(Self::GameStarted(rest(&fields, 0, tag, "text")?)),
            Tag::Result => Ok(Self::Result(rest(&fields, 0, tag, "text")?)),
            Tag::GameOver => Ok(Self::GameOver(rest(&fields, 0, tag, "text")?)),
            Tag::PlayerLeft => Ok(Self::PlayerLeft(rest(&fields, 0, tag, "text")?)),
            Tag::ServerFull => Ok(Self::ServerFull(rest(&fields, 0, tag, "text")?)),
            Tag::State => Ok(Self::State(BoardState::decode_rows(&fields)?)),
            Tag::MoveMade => Ok(Self::MoveMade {
                seat: SeatId(parse_field(&fields, 0, tag, "seat")?),
                row: parse_field(&fields, 1, tag, "row")?,
                col: parse_field(&fields, 2, tag, "col")?,
                mark: Mark::decode(field(&fields, 3, tag, "mark")?)?,
            }),
            Tag::Chat => {
                let body = rest(&fields, 0, tag, "text")?;
                let (seat, text) = body
                    .split_once(CHAT_SEPARATOR)
                    .ok_or(ProtocolError::MissingField { tag: tag.as_str(), field: "seat" })?;
                let seat = seat.parse::<u8>().map_err(|_| ProtocolError::InvalidNumber {
                    field: "seat",
                    value: seat.to_string(),
                })?;
                Ok(Self::Chat { seat: SeatId(seat), text: text.to_string() })
            },
            Tag::Move => Err(ProtocolError::UnknownTag(raw_tag.to_string())),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Split a line into its tag and the remaining fields. A trailing `\r` left
/// over from CRLF line endings is dropped.
fn split_line(line: &str) -> (&str, Vec<&str>) {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut parts = line.split(FIELD_SEPARATOR);
    let tag = parts.next().unwrap_or_default();
    (tag, parts.collect())
}

fn field<'a>(
    fields: &[&'a str],
    index: usize,
    tag: Tag,
    name: &'static str,
) -> Result<&'a str> {
    fields
        .get(index)
        .copied()
        .ok_or(ProtocolError::MissingField { tag: tag.as_str(), field: name })
}

fn parse_field<T: FromStr>(
    fields: &[&str],
    index: usize,
    tag: Tag,
    name: &'static str,
) -> Result<T> {
    let raw = field(fields, index, tag, name)?;
    raw.parse().map_err(|_| ProtocolError::InvalidNumber { field: name, value: raw.to_string() })
}

/// Everything from `index` onwards, re-joined with the field separator.
fn rest(fields: &[&str], index: usize, tag: Tag, name: &'static str) -> Result<String> {
    match fields.get(index..) {
        Some(tail) if !tail.is_empty() => Ok(tail.join("|")),
        _ => Err(ProtocolError::MissingField { tag: tag.as_str(), field: name }),
    }
}

/// Free text must stay on one line.
fn sanitize(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
