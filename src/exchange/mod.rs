//! Agent exchange: a text board passed back and forth with another process.
//!
//! - [`format`]: the `Human Move:` / `AI Move:` text codec
//! - [`ExchangeChannel`]: where the text lives ([`FileChannel`] for the
//!   shared `gamestate.txt`, [`MemoryChannel`] in-process)
//! - [`ExchangeAgent`]: host side, an [`Agent`](crate::agent::Agent) whose
//!   moves come from the channel
//! - [`AgentEndpoint`]: the other process's side
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use chain_reaction::agent::{Agent, RandomAgent};
//! use chain_reaction::board::Board;
//! use chain_reaction::core::{Color, ExchangeConfig};
//! use chain_reaction::exchange::{AgentEndpoint, ExchangeAgent, MemoryChannel};
//!
//! let config = ExchangeConfig::default()
//!     .with_polling(Duration::from_millis(1), Duration::from_millis(10));
//! let channel = MemoryChannel::new();
//!
//! let endpoint = AgentEndpoint::new(channel.clone(), config.clone());
//! let remote = std::thread::spawn(move || {
//!     endpoint.serve(&mut RandomAgent::new(7), Color::Blue, Some(1)).unwrap()
//! });
//!
//! let mut host = ExchangeAgent::new(channel, config);
//! let board = Board::new(9, 6).unwrap();
//! let pos = host.next_move(&board, Color::Blue).unwrap();
//! assert!(board[pos].is_empty());
//! assert_eq!(remote.join().unwrap(), 1);
//! ```

mod channel;
pub mod format;
mod protocol;

pub use channel::{ExchangeChannel, FileChannel, MemoryChannel};
pub use format::{Exchange, Header};
pub use protocol::{diff_move, AgentEndpoint, CancelToken, ExchangeAgent};
