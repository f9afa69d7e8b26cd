//! Handing a turn to an out-of-process agent and reading its answer.
//!
//! ## Host side ([`ExchangeAgent`])
//!
//! 1. Write `Human Move:` and the current board.
//! 2. Poll until the channel holds a complete `AI Move:` board.
//! 3. Diff it against the board handed off: exactly one cell may differ,
//!    and it must be the agent's orb added to a cell the agent may play.
//!
//! Unreadable, incomplete or not-yet-answered content is polled again with
//! a doubling delay. A board of the wrong shape, or a diff that does not
//! name exactly one legal placement, fails the turn without touching the
//! game.
//!
//! ## Agent side ([`AgentEndpoint`])
//!
//! Waits for `Human Move:`, then writes `AI Move:` with one orb added.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use super::channel::ExchangeChannel;
use super::format::{self, Header};
use crate::agent::Agent;
use crate::board::Board;
use crate::core::{AgentError, Color, ExchangeConfig, ExchangeError, Position};
use crate::rules::{ChainReactionRules, RulesEngine};

/// Shared flag that stops a pending wait. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop every wait using this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check if `cancel` has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Poller<'a> {
    interval: Duration,
    max_interval: Duration,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    cancel: &'a CancelToken,
}

impl<'a> Poller<'a> {
    fn new(config: &ExchangeConfig, cancel: &'a CancelToken) -> Self {
        Self {
            interval: config.poll_interval,
            max_interval: config.max_poll_interval.max(config.poll_interval),
            timeout: config.timeout,
            deadline: config.timeout.map(|timeout| Instant::now() + timeout),
            cancel,
        }
    }

    fn check(&self) -> Result<(), ExchangeError> {
        if self.cancel.is_cancelled() {
            return Err(ExchangeError::Cancelled);
        }
        match (self.deadline, self.timeout) {
            (Some(deadline), Some(timeout)) if Instant::now() >= deadline => {
                Err(ExchangeError::TimedOut(timeout))
            }
            _ => Ok(()),
        }
    }

    fn sleep(&mut self) {
        let mut delay = self.interval;
        if let Some(deadline) = self.deadline {
            delay = delay.min(deadline.saturating_duration_since(Instant::now()));
        }
        thread::sleep(delay);
        self.interval = (self.interval * 2).min(self.max_interval);
    }

    /// Read `channel` until `accept` yields a value.
    ///
    /// `accept` returns `Ok(None)` to keep polling. Read errors are retried.
    fn poll<C, T>(
        &mut self,
        channel: &C,
        mut accept: impl FnMut(&str) -> Result<Option<T>, ExchangeError>,
    ) -> Result<T, ExchangeError>
    where
        C: ExchangeChannel + ?Sized,
    {
        loop {
            self.check()?;
            match channel.read() {
                Ok(Some(text)) => {
                    if let Some(value) = accept(&text)? {
                        return Ok(value);
                    }
                }
                Ok(None) => trace!("exchange empty"),
                Err(err) => warn!(error = %err, "exchange read failed, retrying"),
            }
            self.sleep();
        }
    }
}

/// Parse `text` if it is a complete exchange under `header`.
fn read_complete(text: &str, header: Header) -> Option<Board> {
    // A writer that does not rename into place may be caught mid-write.
    if !text.ends_with('\n') {
        trace!("exchange incomplete");
        return None;
    }
    match format::parse(text) {
        Ok(exchange) if exchange.header == header => Some(exchange.board),
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "exchange unreadable, retrying");
            None
        }
    }
}

/// Find the single placement of `color` that turns `before` into `after`.
pub fn diff_move(
    before: &Board,
    after: &Board,
    color: Color,
) -> Result<Position, ExchangeError> {
    let changed = before.diff(after).ok_or(ExchangeError::DimensionMismatch {
        rows: before.rows(),
        cols: before.cols(),
        found_rows: after.rows(),
        found_cols: after.cols(),
    })?;
    let &[pos] = changed.as_slice() else {
        return Err(ExchangeError::AmbiguousDiff {
            changed: changed.len(),
        });
    };
    let legal = ChainReactionRules::new().is_legal(before, pos, color);
    if !legal || before[pos].checked_plus_one(color) != Some(after[pos]) {
        return Err(ExchangeError::IllegalPlacement { pos, color });
    }
    Ok(pos)
}

/// An agent in another process, reached through an [`ExchangeChannel`].
#[derive(Debug)]
pub struct ExchangeAgent<C> {
    channel: C,
    config: ExchangeConfig,
    cancel: CancelToken,
}

impl<C: ExchangeChannel> ExchangeAgent<C> {
    /// Talk to an agent over `channel`.
    pub fn new(channel: C, config: ExchangeConfig) -> Self {
        Self {
            channel,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Use `cancel` to stop waits from another thread.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the current and future waits.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The underlying channel.
    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Write the board and signal that the agent is to move.
    pub fn handoff(&self, board: &Board) -> Result<(), ExchangeError> {
        self.channel.write(&format::write_board(Header::HumanMove, board))?;
        debug!(orbs = board.total_orbs(), "board handed to agent");
        Ok(())
    }

    /// Wait for the agent's answer to a handoff of `board`.
    pub fn await_move(&self, board: &Board, color: Color) -> Result<Position, ExchangeError> {
        let mut poller = Poller::new(&self.config, &self.cancel);
        poller.poll(&self.channel, |text| {
            read_complete(text, Header::AgentMove)
                .map(|answer| diff_move(board, &answer, color))
                .transpose()
        })
    }
}

impl<C: ExchangeChannel> Agent for ExchangeAgent<C> {
    fn name(&self) -> &str {
        "exchange"
    }

    fn next_move(&mut self, board: &Board, color: Color) -> Result<Position, AgentError> {
        self.handoff(board)?;
        let pos = self.await_move(board, color)?;
        info!(%color, %pos, "agent move received");
        Ok(pos)
    }
}

/// The agent's end of the channel.
#[derive(Debug)]
pub struct AgentEndpoint<C> {
    channel: C,
    config: ExchangeConfig,
    cancel: CancelToken,
}

impl<C: ExchangeChannel> AgentEndpoint<C> {
    /// Serve moves over `channel`.
    pub fn new(channel: C, config: ExchangeConfig) -> Self {
        Self {
            channel,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Use `cancel` to stop waits from another thread.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the current and future waits.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wait until the host hands over a board.
    pub fn wait_for_handoff(&self) -> Result<Board, ExchangeError> {
        let mut poller = Poller::new(&self.config, &self.cancel);
        poller.poll(&self.channel, |text| Ok(read_complete(text, Header::HumanMove)))
    }

    /// Answer with an orb of `color` added at `pos`. No cascade is resolved;
    /// that is the host's job.
    pub fn submit(&self, board: &Board, pos: Position, color: Color) -> Result<Board, ExchangeError> {
        let mut answer = board.clone();
        answer.place(pos, color)?;
        self.channel.write(&format::write_board(Header::AgentMove, &answer))?;
        debug!(%color, %pos, "agent move written");
        Ok(answer)
    }

    /// Answer handoffs with `agent`'s moves for `color`.
    ///
    /// Serves `turns` handoffs, or until cancelled or failing when `turns`
    /// is `None`. Returns the number of moves written.
    pub fn serve(
        &self,
        agent: &mut dyn Agent,
        color: Color,
        turns: Option<usize>,
    ) -> Result<usize, AgentError> {
        let mut served = 0;
        while turns.map_or(true, |limit| served < limit) {
            let board = self.wait_for_handoff()?;
            let pos = agent.next_move(&board, color)?;
            self.submit(&board, pos, color)?;
            served += 1;
            info!(turn = served, %color, %pos, agent = agent.name(), "move served");
        }
        Ok(served)
    }
}
