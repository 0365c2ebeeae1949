#![doc = r#"
Transcoding core for drum MIDI sequences and the compact DAT event format.

A [`Sequence`](sequence::Sequence) holds multiple independently-ticked
event tracks. [`merge`](merge::merge) flattens them into one
chronologically ordered stream, resolving variable tempo into absolute
microseconds and collecting note on/off state changes into a sparse
[`FeatureTable`](dat::FeatureTable). The table, together with the
sequence's timing header, forms a [`DatDocument`](dat::DatDocument)
which the [codec](dat::codec) serializes to and from the DAT byte
layout. Decoded documents feed the
[statistics engine](dat::summary::summarize) and the
[reverse materializer](dat::materialize::materialize).

All transforms are pure and keep no state between calls; independent
conversions may run concurrently. Long operations accept a
[`ProgressSink`](progress::ProgressSink) for advisory progress
reporting.

# Example
```rust
use drumdat::prelude::*;

let mut table = FeatureTable::new();
table.set(0, Instrument::Kick, true);
table.set(480, Instrument::Kick, false);

let doc = DatDocument::new(Division::PulsesPerQuarterNote, 480, table);
let bytes = dat::codec::encode(&doc).unwrap();
let decoded = dat::codec::decode(&bytes).unwrap();
assert_eq!(doc, decoded);
```
"#]

pub mod dat;
pub mod error;
pub mod instrument;
pub mod merge;
pub mod micros;
pub mod progress;
pub mod sequence;

/// Re-exports everything a typical caller needs.
pub mod prelude {
    pub use crate::dat::{self, DatDocument, FeatureTable, StateChanges};
    pub use crate::dat::codec::DuplicateTickPolicy;
    pub use crate::dat::summary::{IntervalStats, IntervalSummary, OpenIntervalPolicy};
    pub use crate::error::{ConvertError, DecodeError, DecodeErrorKind};
    pub use crate::instrument::Instrument;
    pub use crate::merge::{Conversion, Timed, TimingState, merge, merge_with};
    pub use crate::micros::Micros;
    pub use crate::progress::{NoProgress, ProgressSink};
    pub use crate::sequence::{
        ChannelEvent, Division, MetaEvent, MetaKind, Sequence, TickedEvent, Track, TrackMessage,
    };
}
