//! Uniform-choice sources for randomized traversal.
//!
//! Randomness is injected at this seam: production composes with the
//! thread RNG, tests drive traversal with a scripted stub. The engine
//! itself never seeds or owns an RNG, so reproducibility across compose
//! calls is explicitly not promised.

use rand::Rng;

/// Source of uniform choices over non-empty finite candidate sets.
pub trait Picker {
    /// Return an index in `0..len`. Callers guarantee `len` is non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Production picker backed by [`rand::thread_rng`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPicker;

impl Picker for ThreadRngPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic picker replaying a scripted index sequence.
///
/// Each scripted index is taken modulo the candidate count, and the
/// script wraps around when exhausted, so a short script can drive an
/// arbitrarily long traversal. An empty script always picks index 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicker {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedPicker {
    /// Picker replaying the given indices.
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// Picker that always takes the first candidate.
    pub fn first() -> Self {
        Self::default()
    }
}

impl Picker for ScriptedPicker {
    fn pick(&mut self, len: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let raw = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        raw % len
    }
}
