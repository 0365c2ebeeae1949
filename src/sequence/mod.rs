#![doc = r#"
Rusty representation of a multi-track timed event sequence.

This is the data model an external MIDI parser is expected to fill:
a division/resolution header and N tracks of tick-stamped channel and
meta events. The model is read-only after construction; every
conversion call produces fresh instances.
"#]

mod division;
pub use division::*;

mod message;
pub use message::*;

/// A single event at an absolute tick within a track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickedEvent {
    /// Absolute tick of the event within its sequence.
    pub tick: u64,
    /// The message payload.
    pub message: TrackMessage,
}

impl TickedEvent {
    /// Create an event at the given absolute tick.
    pub const fn new(tick: u64, message: TrackMessage) -> Self {
        Self { tick, message }
    }
}

/// An ordered sequence of events.
///
/// Invariant: events are non-decreasing by tick.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TickedEvent>,
}

impl Track {
    /// Create a track from tick-ordered events.
    pub fn new(events: Vec<TickedEvent>) -> Self {
        debug_assert!(events.windows(2).all(|w| w[0].tick <= w[1].tick));
        Self { events }
    }

    /// The track's events, ascending by tick.
    pub fn events(&self) -> &[TickedEvent] {
        &self.events
    }

    /// Number of events in the track.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[doc = r#"
A multi-track timed event sequence.

`division` selects the timing regime and `resolution` scales it:
ticks per quarter note under
[`Division::PulsesPerQuarterNote`], subframes per frame otherwise.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    division: Division,
    resolution: i32,
    tracks: Vec<Track>,
}

impl Sequence {
    /// Create a sequence from its timing header and tracks.
    pub fn new(division: Division, resolution: i32, tracks: Vec<Track>) -> Self {
        Self {
            division,
            resolution,
            tracks,
        }
    }

    /// The timing regime of the sequence.
    pub const fn division(&self) -> Division {
        self.division
    }

    /// Ticks per quarter note (PPQ) or subframes per frame (timecode).
    pub const fn resolution(&self) -> i32 {
        self.resolution
    }

    /// The sequence's tracks, in file order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
