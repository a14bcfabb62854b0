//! Collision-free ResourceID allocation.
//!
//! Identifiers are positive `i32`s drawn uniformly at random, rejected on
//! collision against everything already handed out or pre-seeded from an
//! existing artifact. With ~2 billion candidates and bounded-size record
//! sets, rejection sampling terminates in practice; the attempt bound only
//! turns the theoretical worst case into a reported error.

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use crate::domain::Artifact;

/// Attempt bound used by [`IdAllocator::new`].
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100_000;

/// Errors that can occur during id allocation
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("no free ResourceID found after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Allocator threading one `used` set through a single assembly run.
///
/// Not designed for concurrent callers: exactly one assembly pass may be in
/// flight against a given allocator at a time.
#[derive(Debug)]
pub struct IdAllocator {
    used: HashSet<i32>,
    max_attempts: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_MAX_ATTEMPTS)
    }

    /// Allocator with an explicit attempt bound, for exercising the
    /// exhaustion path.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            used: HashSet::new(),
            max_attempts,
        }
    }

    /// Mark every `ResourceID` already present in `artifact` as taken.
    ///
    /// Must run before appending to an existing record set so that repeated
    /// runs never re-issue an id from a prior run.
    pub fn seed_from_artifact(&mut self, artifact: &Artifact) {
        self.used.extend(artifact.all_resource_ids());
    }

    /// Mark a single id as taken. Returns false if it already was.
    pub fn mark_used(&mut self, id: i32) -> bool {
        self.used.insert(id)
    }

    /// Draw a fresh id in `[1, i32::MAX]`.
    ///
    /// The returned id is inserted into the used set before this returns, so
    /// no two calls within one run can produce the same value.
    pub fn allocate(&mut self) -> Result<i32, AllocationError> {
        let mut rng = rand::thread_rng();
        for _ in 0..self.max_attempts {
            let candidate = rng.gen_range(1..=i32::MAX);
            if self.used.insert(candidate) {
                return Ok(candidate);
            }
        }
        Err(AllocationError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Number of ids currently marked used.
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn is_used(&self, id: i32) -> bool {
        self.used.contains(&id)
    }
}
