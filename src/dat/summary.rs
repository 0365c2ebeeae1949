#![doc = r#"
Per-instrument on-duration statistics over a decoded DAT table.

Walks the table ascending, pairing each on-event with the next off (or
on) event for the same instrument and recording the interval length in
ticks.
"#]

use super::DatDocument;
use crate::instrument::Instrument;
use std::collections::BTreeMap;

/// What to do with instruments still "on" when the table ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenIntervalPolicy {
    /// Drop the trailing open interval, matching historical behavior.
    #[default]
    Drop,
    /// Close trailing open intervals at the table's last tick.
    CloseAtLastTick,
}

/// Aggregated interval lengths for one instrument, in ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalStats {
    /// Shortest observed interval.
    pub min: u32,
    /// Longest observed interval.
    pub max: u32,
    /// Arithmetic mean of all observed intervals.
    pub mean: f64,
}

/// Per-instrument duration statistics for a document.
///
/// Instruments with no observed intervals are absent, so "never
/// played" is distinguishable from "zero-length".
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalSummary {
    per_instrument: BTreeMap<Instrument, IntervalStats>,
}

impl IntervalSummary {
    /// The statistics for one instrument, or `None` if it recorded no
    /// intervals.
    pub fn stats(&self, instrument: Instrument) -> Option<&IntervalStats> {
        self.per_instrument.get(&instrument)
    }

    /// Iterate instruments with recorded intervals, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Instrument, &IntervalStats)> {
        self.per_instrument
            .iter()
            .map(|(instrument, stats)| (*instrument, stats))
    }

    /// True if no instrument recorded an interval.
    pub fn is_empty(&self) -> bool {
        self.per_instrument.is_empty()
    }
}

/// Summarize with the compatibility policy: trailing open intervals
/// contribute nothing.
pub fn summarize(doc: &DatDocument) -> IntervalSummary {
    summarize_with(doc, OpenIntervalPolicy::default())
}

/// Compute min/max/mean on-durations per instrument.
///
/// An on-event while an interval is already open closes it and opens a
/// new one (a re-trigger, not an extension). An off-event without an
/// open interval is ignored.
pub fn summarize_with(doc: &DatDocument, policy: OpenIntervalPolicy) -> IntervalSummary {
    let mut open_since: [Option<u32>; Instrument::COUNT] = [None; Instrument::COUNT];
    let mut accumulators: [Accumulator; Instrument::COUNT] =
        [Accumulator::default(); Instrument::COUNT];

    for (&tick, changes) in doc.table.iter() {
        for (instrument, on) in changes.iter() {
            let slot = &mut open_since[instrument.index() as usize];
            let accumulator = &mut accumulators[instrument.index() as usize];
            if on {
                if let Some(opened) = slot.replace(tick) {
                    accumulator.record(tick - opened);
                }
            } else if let Some(opened) = slot.take() {
                accumulator.record(tick - opened);
            }
        }
    }

    if policy == OpenIntervalPolicy::CloseAtLastTick
        && let Some(last) = doc.table.last_tick()
    {
        for instrument in Instrument::ALL {
            if let Some(opened) = open_since[instrument.index() as usize].take() {
                accumulators[instrument.index() as usize].record(last - opened);
            }
        }
    }

    let mut per_instrument = BTreeMap::new();
    for instrument in Instrument::ALL {
        if let Some(stats) = accumulators[instrument.index() as usize].finish() {
            per_instrument.insert(instrument, stats);
        }
    }
    IntervalSummary { per_instrument }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    min: u32,
    max: u32,
    sum: u64,
    count: u64,
}

impl Accumulator {
    fn record(&mut self, length: u32) {
        if self.count == 0 {
            self.min = length;
            self.max = length;
        } else {
            self.min = self.min.min(length);
            self.max = self.max.max(length);
        }
        self.sum += length as u64;
        self.count += 1;
    }

    fn finish(&self) -> Option<IntervalStats> {
        if self.count == 0 {
            return None;
        }
        Some(IntervalStats {
            min: self.min,
            max: self.max,
            mean: self.sum as f64 / self.count as f64,
        })
    }
}
