//! Event queue operations over the document's `events` sequence.
//!
//! The queue is kept sorted ascending by `(time, id)` so the due prefix can
//! be split off in one pass.

use outpost_types::{Event, EventData, EventId, EventKind, StationId};

/// Tolerance when deciding whether an event is due.
pub const EVENT_EPSILON: f64 = 1e-9;

/// The id a new event receives: `max + 1`, or 1 when the queue is empty.
///
/// Returns `None` only when the largest id is `u64::MAX`.
pub fn next_event_id(events: &[Event]) -> Option<EventId> {
    events
        .iter()
        .map(|e| e.id)
        .max()
        .map_or(Some(EventId::FIRST), EventId::next)
}

/// Append an event due at `when` and restore the queue order.
pub fn enqueue(
    events: &mut Vec<Event>,
    when: f64,
    kind: EventKind,
    data: EventData,
) -> Option<EventId> {
    let id = next_event_id(events)?;
    events.push(Event {
        id,
        time: when,
        kind: kind.tag().to_owned(),
        data,
    });
    sort_queue(events);
    Some(id)
}

/// Sort ascending by time, breaking ties by id.
pub fn sort_queue(events: &mut [Event]) {
    events.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.id.cmp(&b.id)));
}

/// Whether a build is already in flight for the station.
pub fn has_pending_build(events: &[Event], station: StationId) -> bool {
    events.iter().any(|e| {
        e.known_kind() == Some(EventKind::BuildModuleComplete)
            && e.data.station_id == Some(station)
    })
}

/// Remove and return every event due at or before `now`, in queue order.
pub fn take_due(events: &mut Vec<Event>, now: f64) -> Vec<Event> {
    let split = events.partition_point(|e| e.time <= now + EVENT_EPSILON);
    events.drain(..split).collect()
}
