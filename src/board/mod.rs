pub mod codec;
pub mod cozy;
pub mod movegen;

pub use codec::{Color, Piece, PieceKind, Position, Square, START_FEN};
pub use movegen::{all_destinations, destinations, destinations_for_fen, Dests};
