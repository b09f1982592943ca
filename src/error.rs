use crate::position::ChunkPos;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Player,
    Town,
    Chunk,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Player => write!(f, "player"),
            ResourceType::Town => write!(f, "town"),
            ResourceType::Chunk => write!(f, "chunk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimErrorCode {
    Io,
    Encode,
    Decode,
    InvalidRange,
    PlayerNotFound,
    TownNotFound,
    ChunkNotFound,
    AlreadyClaimed,
    LimitReached,
}

impl ClaimErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimErrorCode::Io => "io",
            ClaimErrorCode::Encode => "encode",
            ClaimErrorCode::Decode => "decode",
            ClaimErrorCode::InvalidRange => "invalid_range",
            ClaimErrorCode::PlayerNotFound => "player_not_found",
            ClaimErrorCode::TownNotFound => "town_not_found",
            ClaimErrorCode::ChunkNotFound => "chunk_not_found",
            ClaimErrorCode::AlreadyClaimed => "already_claimed",
            ClaimErrorCode::LimitReached => "limit_reached",
        }
    }
}

/// Failure taxonomy for the claim engine.
///
/// Permission denial is never an error: evaluation returns a boolean.
/// `AlreadyClaimed` and `LimitReached` are the user-facing rejection
/// reasons for a claim attempt; `NotFound` is surfaced only by explicit
/// lookups and recovered locally everywhere else.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid vertical range [{lower}, {upper}]")]
    InvalidRange { lower: i32, upper: i32 },
    #[error("{resource_type} '{id}' not found")]
    NotFound {
        resource_type: ResourceType,
        id: String,
    },
    #[error("chunk {chunk} is already claimed")]
    AlreadyClaimed { chunk: ChunkPos },
    #[error("claim limit reached ({count} of {limit} chunks)")]
    LimitReached { count: u32, limit: u32 },
}

impl ClaimError {
    pub fn code(&self) -> ClaimErrorCode {
        match self {
            ClaimError::Io(_) => ClaimErrorCode::Io,
            ClaimError::Encode(_) => ClaimErrorCode::Encode,
            ClaimError::Decode(_) => ClaimErrorCode::Decode,
            ClaimError::InvalidRange { .. } => ClaimErrorCode::InvalidRange,
            ClaimError::NotFound { resource_type, .. } => match resource_type {
                ResourceType::Player => ClaimErrorCode::PlayerNotFound,
                ResourceType::Town => ClaimErrorCode::TownNotFound,
                ResourceType::Chunk => ClaimErrorCode::ChunkNotFound,
            },
            ClaimError::AlreadyClaimed { .. } => ClaimErrorCode::AlreadyClaimed,
            ClaimError::LimitReached { .. } => ClaimErrorCode::LimitReached,
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code().as_str()
    }
}
