//! Message tags.

use std::fmt;

/// Message discriminator, carried as the first field of every line.
///
/// `Chat` is the only tag used in both directions; its payload shape differs
/// per direction (see [`crate::ClientMessage`] and [`crate::ServerMessage`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Client move request
    Move,
    /// Chat, both directions
    Chat,
    /// Assigned mark
    Symbol,
    /// Assigned seat id
    PlayerId,
    /// Game started notice
    GameStarted,
    /// Board snapshot
    State,
    /// Whose turn it is
    Turn,
    /// Move applied by the server
    MoveMade,
    /// Notice addressed to one seat (rejections)
    Result,
    /// Game ended with a win or draw
    GameOver,
    /// A seat disconnected mid-game
    PlayerLeft,
    /// Capacity rejection
    ServerFull,
}

impl Tag {
    /// Every tag, in wire-table order.
    pub const ALL: [Tag; 12] = [
        Tag::Move,
        Tag::Chat,
        Tag::Symbol,
        Tag::PlayerId,
        Tag::GameStarted,
        Tag::State,
        Tag::Turn,
        Tag::MoveMade,
        Tag::Result,
        Tag::GameOver,
        Tag::PlayerLeft,
        Tag::ServerFull,
    ];

    /// Wire spelling of the tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "JOGADA",
            Self::Chat => "CHAT",
            Self::Symbol => "SIMBOLO",
            Self::PlayerId => "ID_JOGADOR",
            Self::GameStarted => "JOGO_INICIADO",
            Self::State => "ESTADO",
            Self::Turn => "TURNO",
            Self::MoveMade => "MOVIMENTO",
            Self::Result => "RESULTADO",
            Self::GameOver => "FIM_JOGO",
            Self::PlayerLeft => "JOGADOR_SAIU",
            Self::ServerFull => "SERVIDOR_CHEIO",
        }
    }

    /// Parse a wire tag. Matching is exact and case-sensitive.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == s)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
