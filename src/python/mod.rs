//! Python bindings for the Chain Reaction engine.
//!
//! # Quick Start
//!
//! ```python
//! import chain_reaction as cr
//!
//! game = cr.ChainReaction(mode="hva")
//! game.attach_random_agent("B", seed=7)
//!
//! game.click(130, 65)          # Red plays (1, 2)
//! game.advance_agents()        # Blue answers
//! print(game.status())         # "Red's Turn (Human)"
//! print(game.board())          # [["0", "0", "1R", ...], ...]
//! ```

use pyo3::prelude::*;

mod py_core;
mod py_game;

pub use py_core::*;
pub use py_game::*;

/// chain_reaction: a two-player Chain Reaction engine.
#[pymodule]
fn chain_reaction(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPosition>()?;
    m.add_class::<PyChainReaction>()?;
    m.add_function(wrap_pyfunction!(critical_mass, m)?)?;
    Ok(())
}
