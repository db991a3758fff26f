//! Recursion guard for walks over possibly cyclic type graphs.
//!
//! Interfaces may extend each other in a cycle and aliases may refer to
//! themselves, so every walk that follows `bases` or alias targets runs
//! under a `RecursionGuard`. The guard combines a visiting set (cycle
//! detection), a depth limit and a total iteration budget.
//!
//! ```ignore
//! let mut guard = RecursionGuard::with_profile(RecursionProfile::PropertyLookup);
//! match guard.enter(type_id) {
//!     RecursionResult::Entered => {
//!         let found = lookup(type_id);
//!         guard.leave(type_id);
//!         found
//!     }
//!     _ => None,
//! }
//! ```

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Named limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Member lookup through `extends` chains and union/intersection parts.
    ///
    /// depth = 50, iterations = 100,000
    PropertyLookup,

    /// Lowering type annotations and alias targets to `TypeId`s.
    ///
    /// depth = 100, iterations = 100,000
    TypeLowering,

    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::PropertyLookup => 50,
            Self::TypeLowering => 100,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::PropertyLookup | Self::TypeLowering => 100_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already on the stack.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

/// Cycle detection plus depth and iteration bounds.
///
/// Every successful `enter` must be paired with exactly one `leave` for the
/// same key. Debug builds assert on unmatched leaves.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);
        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called for a key that was never entered"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Sticky: set once any limit has been hit.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(test)]
#[path = "tests/recursion_tests.rs"]
mod tests;
