//! Event selection for one super-step.
//!
//! Everything here runs without the scheduler lock held: request templates
//! and listener predicates are user code and may call back into the
//! scheduler.

use bp_model::{BPEvent, EventTemplate, Idioms, SelectionBid, ThreadId};

/// A pending thread's declaration, copied out of the pending set.
pub(crate) struct Declared {
    pub thread: ThreadId,
    pub priority: u32,
    pub idioms: Idioms,
}

/// A pending thread's request, normalized for selection.
pub(crate) struct Candidate {
    pub thread: ThreadId,
    pub priority: u32,
    pub event: BPEvent,
    pub template: Option<EventTemplate>,
}

/// What happens to a pending thread once the winner is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Finalized; never returns to running.
    Interrupted,
    /// Back to running.
    Resumed,
}

/// The declarations, candidates, and winner of one super-step.
pub(crate) struct Round {
    declared: Vec<Declared>,
    candidates: Vec<Candidate>,
    winner: Option<usize>,
}

impl Round {
    /// Collect requests, filter blocked ones, and select the winner.
    ///
    /// Request templates are evaluated here, once per super-step.
    pub fn select(declared: Vec<Declared>) -> Self {
        let candidates: Vec<Candidate> = declared
            .iter()
            .filter_map(|d| {
                let request = d.idioms.request.as_ref()?;
                Some(Candidate {
                    thread: d.thread.clone(),
                    priority: d.priority,
                    event: request.resolve(),
                    template: request.template().cloned(),
                })
            })
            .collect();

        // Blocking outranks requesting regardless of priority. Among the
        // survivors the lowest number wins; the first of equals wins ties.
        let mut winner: Option<usize> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            if declared.iter().any(|d| d.idioms.block.matches(&candidate.event)) {
                continue;
            }
            if winner.is_none_or(|w| candidate.priority < candidates[w].priority) {
                winner = Some(i);
            }
        }

        Self {
            declared,
            candidates,
            winner,
        }
    }

    pub fn winner(&self) -> Option<&Candidate> {
        self.candidates.get(self.winner?)
    }

    pub fn pending_len(&self) -> usize {
        self.declared.len()
    }

    pub fn candidate_len(&self) -> usize {
        self.candidates.len()
    }

    /// Decide, per pending thread, whether the winner interrupts or resumes
    /// it. Threads that are neither stay pending and are omitted.
    pub fn verdicts(&self) -> Vec<(ThreadId, Verdict)> {
        let Some(winner) = self.winner() else {
            return Vec::new();
        };
        self.declared
            .iter()
            .filter_map(|d| {
                let verdict = if d.idioms.interrupt.matches(&winner.event) {
                    Verdict::Interrupted
                } else if d.idioms.is_requesting(&winner.event, winner.template.as_ref())
                    || d.idioms.wait_for.matches(&winner.event)
                {
                    Verdict::Resumed
                } else {
                    return None;
                };
                Some((d.thread.clone(), verdict))
            })
            .collect()
    }

    /// Project the round into snapshot rows, sorted by ascending priority.
    pub fn snapshot(&self) -> Vec<SelectionBid> {
        let winner = self.winner();
        let mut bids: Vec<SelectionBid> = self
            .candidates
            .iter()
            .map(|c| {
                let blocked_by = self
                    .declared
                    .iter()
                    .find(|d| d.idioms.block.matches(&c.event))
                    .map(|d| d.thread.to_string());
                let interrupts = self
                    .declared
                    .iter()
                    .find(|d| d.idioms.interrupt.matches(&c.event))
                    .map(|d| d.thread.to_string());
                SelectionBid {
                    thread: c.thread.to_string(),
                    trigger: c.thread.is_trigger(),
                    selected: winner.is_some_and(|w| w.thread == c.thread),
                    event_type: c.event.event_type.clone(),
                    detail: c.event.detail.clone(),
                    priority: c.priority,
                    blocked_by,
                    interrupts,
                }
            })
            .collect();
        bids.sort_by_key(|b| b.priority);
        bids
    }
}
