/// Monotonic token identifying one round of pipeline input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Stale-result rejection for superseded in-flight computations.
///
/// A later input update logically supersedes any computation started from an
/// earlier one. Fetchers take a generation when they start and present it
/// with their result; results from generations older than the latest
/// accepted one are rejected instead of shown out of order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationGate {
    next: u64,
    latest_accepted: Option<Generation>,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next generation. Strictly increasing.
    pub fn issue(&mut self) -> Generation {
        let generation = Generation(self.next);
        self.next = self.next.wrapping_add(1);
        generation
    }

    /// Accept `generation` if it is newer than everything accepted so far.
    ///
    /// Returns `false` for stale generations; the caller must discard the
    /// associated result.
    pub fn accept(&mut self, generation: Generation) -> bool {
        if let Some(latest) = self.latest_accepted {
            if generation <= latest {
                return false;
            }
        }
        self.latest_accepted = Some(generation);
        true
    }

    pub fn latest_accepted(&self) -> Option<Generation> {
        self.latest_accepted
    }
}
