//! Merges the sparse event sources into one time-sorted change timeline.

use crate::events::{ChangeEvent, ChangeFields, EventSource, EventSources, TimeKey};
use serde::Serialize;

/// Time-sorted (ascending negated time, i.e. oldest first) sequence of
/// change events. Times are unique and time zero is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    events: Vec<ChangeEvent>,
}

impl Timeline {
    /// Merge sources in order asymmetry, spreading rate, jump, magnetization,
    /// polarity. Later sources overwrite the fields they share with earlier
    /// ones. Time zero is then forced to asymmetry 0 and spreading rate 0.
    pub fn build(sources: &EventSources) -> Timeline {
        let mut merged = EventSource::new();

        for source in [
            &sources.asymmetry,
            &sources.spreading_rate,
            &sources.jump,
            &sources.magnetization,
            &sources.polarity,
        ] {
            merge_into(&mut merged, source);
        }

        let timeline = Timeline::finish(merged);
        tracing::debug!(entries = timeline.len(), "change timeline built");
        timeline
    }

    /// Build from events in any order, as produced by another provider.
    /// Events sharing a time are merged in input order, later fields
    /// winning, and time zero is forced the same way as in `build`.
    pub fn from_events(events: Vec<ChangeEvent>) -> Timeline {
        let mut merged = EventSource::new();
        for event in &events {
            merged
                .entry(TimeKey::new(event.time))
                .or_default()
                .merge_from(&event.fields);
        }
        Timeline::finish(merged)
    }

    fn finish(mut merged: EventSource) -> Timeline {
        let zero = merged.entry(TimeKey::ZERO).or_default();
        zero.asymmetry = Some(0.0);
        zero.spreading_rate = Some(0.0);

        let events = merged
            .into_iter()
            .map(|(time, fields)| ChangeEvent {
                time: time.value(),
                fields,
            })
            .collect();
        Timeline { events }
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total time span covered, in Myr.
    pub fn duration(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }
}

fn merge_into(target: &mut EventSource, source: &EventSource) {
    for (time, fields) in source {
        target
            .entry(*time)
            .or_insert_with(ChangeFields::default)
            .merge_from(fields);
    }
}
