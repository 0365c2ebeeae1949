#![doc = r#"
Track merging and tempo-aware timing resolution.

[`merge`] flattens a multi-track [`Sequence`] into one chronologically
ordered stream: a cursor per track, always advancing the pending event
with the smallest tick, ties broken toward the lowest track index. As
events are selected their absolute time is resolved through a
[`TimingState`] value threaded through the loop, note on/off events
are classified into a [`FeatureTable`], and channel events are
collected with their resolved timestamps for downstream audio
rendering.
"#]

use crate::dat::{DatDocument, FeatureTable};
use crate::error::ConvertError;
use crate::instrument::Instrument;
use crate::micros::Micros;
use crate::progress::{NoProgress, ProgressSink};
use crate::sequence::{ChannelEvent, Division, Sequence, Track, TrackMessage};

/// Seconds appended to the resolved duration for the decay tail of
/// downstream rendering.
pub const TAIL_PAD_SECS: f64 = 40.0;

/// Timing state threaded through the merge loop.
///
/// Carried as a value and returned updated, never shared, so the
/// resolver stays referentially transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingState {
    /// Current tempo; 500,000 (120 BPM) until a tempo event arrives.
    pub micros_per_quarter_note: u32,
    /// Tick of the most recently resolved event.
    pub last_tick: u64,
    /// Absolute time of the most recently resolved event.
    pub total: Micros,
}

impl Default for TimingState {
    fn default() -> Self {
        Self {
            micros_per_quarter_note: 500_000,
            last_tick: 0,
            total: Micros::ZERO,
        }
    }
}

impl TimingState {
    /// Resolve the absolute time of an event at `tick`.
    ///
    /// Under PPQ the delta since the last event accrues at the current
    /// tempo with truncating integer division. Under timecode the total
    /// is recomputed directly from the tick; tempo plays no part.
    pub fn advanced(self, tick: u64, division: Division, resolution: i32) -> Self {
        let total = match division {
            Division::PulsesPerQuarterNote => {
                let delta = (tick - self.last_tick) as i64;
                self.total
                    + Micros::new(delta * self.micros_per_quarter_note as i64 / resolution as i64)
            }
            Division::FramesPerSecond(fps) => {
                Micros::new((tick as f64 * 1_000_000.0 * fps as f64 / resolution as f64) as i64)
            }
        };
        Self {
            last_tick: tick,
            total,
            ..self
        }
    }

    /// Apply a tempo change, effective for subsequent events only.
    pub const fn with_tempo(self, micros_per_quarter_note: u32) -> Self {
        Self {
            micros_per_quarter_note,
            ..self
        }
    }
}

/// A payload stamped with its resolved absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timed<T> {
    /// Resolved absolute time of the payload.
    pub micros: Micros,
    /// The payload itself.
    pub inner: T,
}

/// Everything the merge resolver produces from one sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The DAT content: timing header plus state change table.
    pub document: DatDocument,
    /// Channel events with resolved timestamps, for audio rendering.
    pub audio_events: Vec<Timed<ChannelEvent>>,
    /// Resolved duration in seconds, including [`TAIL_PAD_SECS`].
    pub duration_secs: f64,
}

/// Merge a sequence without progress reporting.
pub fn merge(sequence: &Sequence) -> Result<Conversion, ConvertError> {
    merge_with(sequence, &NoProgress)
}

/// Merge a sequence into a globally ordered stream, resolving tempo
/// and absolute time along the way.
///
/// Fails with [`ConvertError::TickOverflow`] when a tick exceeds the
/// signed 32-bit range of the DAT layout, and with
/// [`ConvertError::UnknownPitch`] when a note event's pitch matches no
/// instrument category. Channel events whose status is neither note-on
/// nor note-off are excluded from the table but kept in the audio
/// stream.
pub fn merge_with(
    sequence: &Sequence,
    progress: &impl ProgressSink,
) -> Result<Conversion, ConvertError> {
    let tracks = sequence.tracks();
    let total_events: usize = tracks.iter().map(Track::len).sum();

    let mut cursors = vec![0usize; tracks.len()];
    let mut state = TimingState::default();
    let mut table = FeatureTable::new();
    let mut audio_events = Vec::new();
    let mut processed = 0usize;

    while let Some(track_index) = select_next(tracks, &cursors) {
        let event = &tracks[track_index].events()[cursors[track_index]];
        cursors[track_index] += 1;

        if event.tick > i32::MAX as u64 {
            return Err(ConvertError::TickOverflow(event.tick));
        }
        state = state.advanced(event.tick, sequence.division(), sequence.resolution());

        match &event.message {
            TrackMessage::Channel(channel) => {
                if channel.is_note_on() {
                    let instrument = Instrument::classify(channel.pitch())?;
                    table.set(event.tick as u32, instrument, true);
                } else if channel.is_note_off() {
                    let instrument = Instrument::classify(channel.pitch())?;
                    table.set(event.tick as u32, instrument, false);
                }
                audio_events.push(Timed {
                    micros: state.total,
                    inner: *channel,
                });
            }
            TrackMessage::Meta(meta) => {
                if let Some(tempo) = meta.tempo() {
                    state = state.with_tempo(tempo);
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(kind = meta.kind, "meta event ignored for timing");
                }
            }
        }

        processed += 1;
        progress.report(processed as f64 / total_events as f64);
    }

    let document = DatDocument::new(sequence.division(), sequence.resolution(), table);
    Ok(Conversion {
        document,
        audio_events,
        duration_secs: state.total.as_secs_f64() + TAIL_PAD_SECS,
    })
}

/// Index of the track whose pending event has the smallest tick, ties
/// going to the lowest track index. `None` once every cursor is
/// exhausted.
fn select_next(tracks: &[Track], cursors: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (track_index, track) in tracks.iter().enumerate() {
        let Some(event) = track.events().get(cursors[track_index]) else {
            continue;
        };
        match best {
            Some((_, best_tick)) if event.tick >= best_tick => {}
            _ => best = Some((track_index, event.tick)),
        }
    }
    best.map(|(track_index, _)| track_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{MetaEvent, TickedEvent};
    use pretty_assertions::assert_eq;

    fn note_on(tick: u64, pitch: u8) -> TickedEvent {
        TickedEvent::new(tick, ChannelEvent::note_on(pitch, 100).into())
    }

    fn note_off(tick: u64, pitch: u8) -> TickedEvent {
        TickedEvent::new(tick, ChannelEvent::note_off(pitch, 0).into())
    }

    fn tempo(tick: u64, micros_per_quarter_note: u32) -> TickedEvent {
        TickedEvent::new(tick, MetaEvent::set_tempo(micros_per_quarter_note).into())
    }

    fn ppq(tracks: Vec<Track>) -> Sequence {
        Sequence::new(Division::PulsesPerQuarterNote, 480, tracks)
    }

    #[test]
    fn resolves_absolute_time_under_default_tempo() {
        let track = Track::new(vec![note_on(0, 36), note_off(480, 36)]);
        let conversion = merge(&ppq(vec![track])).unwrap();

        let stamps: Vec<i64> = conversion
            .audio_events
            .iter()
            .map(|timed| timed.micros.us())
            .collect();
        assert_eq!(stamps, vec![0, 500_000]);
    }

    #[test]
    fn tempo_change_affects_only_later_events() {
        let track = Track::new(vec![
            note_on(0, 36),
            tempo(480, 250_000),
            note_on(480, 38),
            note_on(960, 42),
        ]);
        let conversion = merge(&ppq(vec![track])).unwrap();

        let stamps: Vec<i64> = conversion
            .audio_events
            .iter()
            .map(|timed| timed.micros.us())
            .collect();
        // the tempo event at tick 480 is itself timed at the old
        // tempo; only the 480 -> 960 delta runs at the new one
        assert_eq!(stamps, vec![0, 500_000, 750_000]);
    }

    #[test]
    fn tie_breaks_toward_the_lower_track_index() {
        let first = Track::new(vec![note_on(0, 36), note_on(100, 36)]);
        let second = Track::new(vec![note_on(0, 38), note_on(100, 38)]);
        let conversion = merge(&ppq(vec![first, second])).unwrap();

        let pitches: Vec<u8> = conversion
            .audio_events
            .iter()
            .map(|timed| timed.inner.pitch())
            .collect();
        assert_eq!(pitches, vec![36, 38, 36, 38]);
    }

    #[test]
    fn merged_stream_is_non_decreasing() {
        let first = Track::new(vec![note_on(0, 36), note_on(960, 36)]);
        let second = Track::new(vec![note_on(240, 38), note_on(480, 38)]);
        let conversion = merge(&ppq(vec![first, second])).unwrap();

        let stamps: Vec<i64> = conversion
            .audio_events
            .iter()
            .map(|timed| timed.micros.us())
            .collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(stamps.len(), 4);
    }

    #[test]
    fn notes_land_in_the_feature_table() {
        // status 0x99: note-on for channel 10, the percussion channel
        let drum_hit = TickedEvent::new(0, ChannelEvent::new(0x99, 36, 100).into());
        let track = Track::new(vec![drum_hit, note_off(480, 36)]);
        let conversion = merge(&ppq(vec![track])).unwrap();

        let table = &conversion.document.table;
        assert_eq!(table.get(0).unwrap().get(Instrument::Kick), Some(true));
        assert_eq!(table.get(480).unwrap().get(Instrument::Kick), Some(false));
    }

    #[test]
    fn non_note_channel_events_skip_the_table_but_reach_audio() {
        let control_change = TickedEvent::new(0, ChannelEvent::new(0xB0, 64, 127).into());
        let track = Track::new(vec![control_change, note_on(240, 38)]);
        let conversion = merge(&ppq(vec![track])).unwrap();

        assert_eq!(conversion.audio_events.len(), 2);
        assert_eq!(conversion.document.table.len(), 1);
    }

    #[test]
    fn meta_events_stay_out_of_the_audio_stream() {
        let track = Track::new(vec![tempo(0, 400_000), note_on(480, 36)]);
        let conversion = merge(&ppq(vec![track])).unwrap();

        assert_eq!(conversion.audio_events.len(), 1);
        assert_eq!(conversion.audio_events[0].micros.us(), 400_000);
    }

    #[test]
    fn timecode_recomputes_rather_than_accumulates() {
        let track = Track::new(vec![note_on(0, 36), tempo(600, 1), note_on(1200, 38)]);
        let sequence = Sequence::new(Division::FramesPerSecond(30.0), 40, vec![track]);
        let conversion = merge(&sequence).unwrap();

        // 1200 * 1_000_000 * 30 / 40, unaffected by the tempo event
        assert_eq!(conversion.audio_events[1].micros.us(), 900_000_000);
    }

    #[test]
    fn unknown_pitch_on_a_note_event_fails() {
        let track = Track::new(vec![note_on(0, 99)]);
        assert!(matches!(
            merge(&ppq(vec![track])),
            Err(ConvertError::UnknownPitch(99))
        ));
    }

    #[test]
    fn tick_beyond_i32_fails() {
        let track = Track::new(vec![note_on(i32::MAX as u64 + 1, 36)]);
        assert!(matches!(
            merge(&ppq(vec![track])),
            Err(ConvertError::TickOverflow(_))
        ));
    }

    #[test]
    fn empty_sequence_yields_empty_table_and_pad_only_duration() {
        let conversion = merge(&ppq(vec![])).unwrap();
        assert!(conversion.document.table.is_empty());
        assert!(conversion.audio_events.is_empty());
        assert_eq!(conversion.duration_secs, TAIL_PAD_SECS);
    }

    #[test]
    fn document_carries_the_sequence_header() {
        let track = Track::new(vec![note_on(0, 36)]);
        let sequence = Sequence::new(Division::FramesPerSecond(25.0), 40, vec![track]);
        let conversion = merge(&sequence).unwrap();

        assert_eq!(
            conversion.document.division,
            Division::FramesPerSecond(25.0)
        );
        assert_eq!(conversion.document.resolution, 40);
    }

    #[test]
    fn progress_reaches_one() {
        use std::sync::Mutex;
        let fractions = Mutex::new(Vec::new());
        let sink = crate::progress::from_fn(|fraction| fractions.lock().unwrap().push(fraction));

        let track = Track::new(vec![note_on(0, 36), note_off(480, 36)]);
        merge_with(&ppq(vec![track]), &sink).unwrap();

        let fractions = fractions.lock().unwrap();
        assert_eq!(*fractions.last().unwrap(), 1.0);
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    }
}
