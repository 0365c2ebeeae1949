use num_enum::TryFromPrimitive;

/// A message payload within a track event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// A channel message (note on/off and other channel traffic).
    Channel(ChannelEvent),
    /// A meta message (tempo changes, markers, signatures).
    Meta(MetaEvent),
}

impl From<ChannelEvent> for TrackMessage {
    fn from(value: ChannelEvent) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaEvent> for TrackMessage {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

#[doc = r#"
A raw channel message: status byte plus up to two data bytes.

Note-on occupies statuses `0x90..=0x9F` and note-off `0x80..=0x8F`,
one status per channel. Statuses outside the ranges this crate
recognizes are carried through untouched.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    /// Status byte.
    pub status: u8,
    /// First data byte (the pitch for note messages).
    pub data1: u8,
    /// Second data byte (the velocity for note messages).
    pub data2: u8,
}

impl ChannelEvent {
    /// Base status byte of the note-on range (channel 1).
    pub const NOTE_ON: u8 = 0x90;
    /// Base status byte of the note-off range (channel 1).
    pub const NOTE_OFF: u8 = 0x80;

    /// Create a raw channel event.
    pub const fn new(status: u8, data1: u8, data2: u8) -> Self {
        Self {
            status,
            data1,
            data2,
        }
    }

    /// Create a channel-1 note-on event.
    pub const fn note_on(pitch: u8, velocity: u8) -> Self {
        Self::new(Self::NOTE_ON, pitch, velocity)
    }

    /// Create a channel-1 note-off event.
    pub const fn note_off(pitch: u8, velocity: u8) -> Self {
        Self::new(Self::NOTE_OFF, pitch, velocity)
    }

    /// True if the status falls in the note-on range.
    pub const fn is_note_on(&self) -> bool {
        self.status >= 0x90 && self.status <= 0x9F
    }

    /// True if the status falls in the note-off range.
    pub const fn is_note_off(&self) -> bool {
        self.status >= 0x80 && self.status <= 0x8F
    }

    /// The pitch of a note message.
    pub const fn pitch(&self) -> u8 {
        self.data1
    }

    /// The velocity of a note message.
    pub const fn velocity(&self) -> u8 {
        self.data2
    }
}

/// A meta message: a type tag plus a raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent {
    /// The raw meta type tag.
    pub kind: u8,
    /// The raw payload bytes.
    pub data: Vec<u8>,
}

impl MetaEvent {
    /// Create a meta event from its type tag and payload.
    pub const fn new(kind: u8, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// Create a tempo-change event carrying the given
    /// microseconds-per-quarter-note value.
    pub fn set_tempo(micros_per_quarter_note: u32) -> Self {
        let mpq = micros_per_quarter_note;
        Self::new(
            MetaKind::SetTempo as u8,
            vec![(mpq >> 16) as u8, (mpq >> 8) as u8, mpq as u8],
        )
    }

    /// The recognized meta kind of this event, if any.
    pub fn meta_kind(&self) -> Option<MetaKind> {
        MetaKind::try_from(self.kind).ok()
    }

    /// Reads the 3-byte big-endian microseconds-per-quarter-note
    /// payload of a tempo-change event.
    ///
    /// Returns `None` for every other meta kind or a short payload.
    pub fn tempo(&self) -> Option<u32> {
        if self.meta_kind() != Some(MetaKind::SetTempo) || self.data.len() < 3 {
            return None;
        }
        Some(
            ((self.data[0] as u32) << 16) | ((self.data[1] as u32) << 8) | (self.data[2] as u32),
        )
    }
}

/// The meta message types this crate knows how to name.
///
/// Only [`MetaKind::SetTempo`] influences conversion; the rest are
/// informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// Sequence number
    SequenceNumber = 0x00,
    /// Arbitrary text
    Text = 0x01,
    /// Copyright notice
    CopyrightNotice = 0x02,
    /// Track name
    TrackName = 0x03,
    /// Instrument name
    InstrumentName = 0x04,
    /// Lyrics
    Lyrics = 0x05,
    /// Marker
    Marker = 0x06,
    /// Cue point
    CuePoint = 0x07,
    /// Channel prefix
    ChannelPrefix = 0x20,
    /// End of track
    EndOfTrack = 0x2F,
    /// Tempo change, 3-byte big-endian microseconds per quarter note
    SetTempo = 0x51,
    /// SMPTE offset
    SmpteOffset = 0x54,
    /// Time signature
    TimeSignature = 0x58,
    /// Key signature
    KeySignature = 0x59,
    /// Sequencer-specific payload
    SequencerSpecific = 0x7F,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_status_ranges() {
        assert!(ChannelEvent::new(0x90, 36, 100).is_note_on());
        assert!(ChannelEvent::new(0x9F, 36, 100).is_note_on());
        assert!(ChannelEvent::new(0x80, 36, 0).is_note_off());
        assert!(ChannelEvent::new(0x8F, 36, 0).is_note_off());

        let control_change = ChannelEvent::new(0xB0, 64, 127);
        assert!(!control_change.is_note_on());
        assert!(!control_change.is_note_off());
    }

    #[test]
    fn tempo_payload_round_trips() {
        let meta = MetaEvent::set_tempo(500_000);
        assert_eq!(meta.meta_kind(), Some(MetaKind::SetTempo));
        assert_eq!(meta.tempo(), Some(500_000));
    }

    #[test]
    fn tempo_is_none_for_other_kinds() {
        let marker = MetaEvent::new(0x06, b"verse".to_vec());
        assert_eq!(marker.meta_kind(), Some(MetaKind::Marker));
        assert_eq!(marker.tempo(), None);

        let short = MetaEvent::new(0x51, vec![0x07]);
        assert_eq!(short.tempo(), None);
    }
}
