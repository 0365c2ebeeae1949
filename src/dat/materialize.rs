#![doc = r#"
Reconstruction of a single-track sequence from a DAT document.
"#]

use super::DatDocument;
use crate::sequence::{ChannelEvent, Sequence, TickedEvent, Track, TrackMessage};

/// Velocity written into every synthesized note event.
pub const MATERIALIZED_VELOCITY: u8 = 64;

/// Rebuild a playable single-track sequence from a document.
///
/// For each tick in ascending order and each state change in
/// category-table order, synthesizes a note-on or note-off at the
/// instrument's primary pitch. The document's division and resolution
/// carry over unchanged.
pub fn materialize(doc: &DatDocument) -> Sequence {
    let mut events = Vec::new();
    for (&tick, changes) in doc.table.iter() {
        for (instrument, on) in changes.iter() {
            let pitch = instrument.primary_pitch();
            let message = if on {
                ChannelEvent::note_on(pitch, MATERIALIZED_VELOCITY)
            } else {
                ChannelEvent::note_off(pitch, MATERIALIZED_VELOCITY)
            };
            events.push(TickedEvent::new(tick as u64, TrackMessage::Channel(message)));
        }
    }
    Sequence::new(doc.division, doc.resolution, vec![Track::new(events)])
}
