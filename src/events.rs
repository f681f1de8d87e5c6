//! Events emitted by a sampler step for trajectory visualizers.
//!
//! Every call to a sampler step emits exactly one [`Event::Proposal`] followed by
//! exactly one [`Event::Accept`] or [`Event::Reject`]. The events are a side
//! channel: nothing in the sampling math reads them back.

use crate::vector::Vector;
use std::collections::VecDeque;

/// A single visualizer event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<T> {
    /// The endpoint of an integration, together with every visited position and
    /// the momentum the trajectory started from.
    Proposal {
        proposal: Vector<T>,
        trajectory: Vec<Vector<T>>,
        initial_momentum: Vector<T>,
    },
    /// The proposal became the new chain element.
    Accept { proposal: Vector<T> },
    /// The proposal was discarded and the previous state repeated.
    Reject { proposal: Vector<T> },
}

impl<T> Event<T> {
    /// Short tag matching the event type, e.g. for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Proposal { .. } => "proposal",
            Event::Accept { .. } => "accept",
            Event::Reject { .. } => "reject",
        }
    }
}

/// An append-only consumer of sampler events.
pub trait EventSink<T> {
    fn emit(&mut self, event: Event<T>);
}

impl<T> EventSink<T> for Vec<Event<T>> {
    fn emit(&mut self, event: Event<T>) {
        self.push(event);
    }
}

impl<T> EventSink<T> for VecDeque<Event<T>> {
    fn emit(&mut self, event: Event<T>) {
        self.push_back(event);
    }
}

/// Discards every event. Used when a sampler is driven without a visualizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<T> EventSink<T> for NullSink {
    fn emit(&mut self, _event: Event<T>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_preserves_order() {
        let p = Vector::from_vec(vec![1.0, 2.0]);
        let mut queue: VecDeque<Event<f64>> = VecDeque::new();
        queue.emit(Event::Proposal {
            proposal: p.clone(),
            trajectory: vec![Vector::zeros(2), p.clone()],
            initial_momentum: Vector::zeros(2),
        });
        queue.emit(Event::Reject { proposal: p });

        let kinds: Vec<&str> = queue.iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["proposal", "reject"]);
    }
}
