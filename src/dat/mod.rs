#![doc = r#"
The DAT document model and its codec, statistics, and materializer.

A DAT file is a timing header plus a sparse table of per-tick
instrument state changes. [`FeatureTable`] is the shared intermediate
representation between the sequence form and the binary form: the
[merge resolver](crate::merge) builds one from a sequence, and
[`codec::decode`] rebuilds one from bytes.
"#]

pub mod codec;
pub mod materialize;
pub mod summary;

use crate::instrument::Instrument;
use crate::sequence::Division;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// The sparse instrument state changes recorded at one tick.
///
/// One slot per category; `None` means the instrument has no state
/// change at this tick. Iteration follows the category table's fixed
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateChanges {
    states: [Option<bool>; Instrument::COUNT],
}

impl StateChanges {
    /// A record with no state changes.
    pub const fn empty() -> Self {
        Self {
            states: [None; Instrument::COUNT],
        }
    }

    /// Record an on/off state change for an instrument.
    pub fn set(&mut self, instrument: Instrument, on: bool) {
        self.states[instrument.index() as usize] = Some(on);
    }

    /// The recorded state change for an instrument, if any.
    pub const fn get(&self, instrument: Instrument) -> Option<bool> {
        self.states[instrument.index() as usize]
    }

    /// Iterate the recorded changes in category-table order.
    pub fn iter(&self) -> impl Iterator<Item = (Instrument, bool)> + '_ {
        Instrument::ALL
            .into_iter()
            .filter_map(|instrument| self.get(instrument).map(|on| (instrument, on)))
    }

    /// Number of recorded state changes.
    pub fn len(&self) -> usize {
        self.states.iter().filter(|slot| slot.is_some()).count()
    }

    /// True if no instrument changes state here.
    pub fn is_empty(&self) -> bool {
        self.states.iter().all(|slot| slot.is_none())
    }
}

#[doc = r#"
A sparse mapping from tick to instrument state changes, ascending by
tick.

Invariant: every stored tick has at least one state change. [`set`] is
the only mutator and never creates an empty entry, so the invariant
holds by construction.

[`set`]: FeatureTable::set
"#]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureTable {
    entries: BTreeMap<u32, StateChanges>,
}

impl FeatureTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a state change for an instrument at a tick.
    ///
    /// A later `set` for the same tick and instrument overwrites the
    /// earlier state; other instruments at that tick are untouched.
    pub fn set(&mut self, tick: u32, instrument: Instrument, on: bool) {
        self.entries
            .entry(tick)
            .or_insert_with(StateChanges::empty)
            .set(instrument, on);
    }

    /// The state changes recorded at a tick, if any.
    pub fn get(&self, tick: u32) -> Option<&StateChanges> {
        self.entries.get(&tick)
    }

    /// Iterate entries ascending by tick.
    pub fn iter(&self) -> btree_map::Iter<'_, u32, StateChanges> {
        self.entries.iter()
    }

    /// Number of ticks carrying state changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The greatest tick in the table, if any.
    pub fn last_tick(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }
}

/// The logical content of a DAT file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatDocument {
    /// The timing regime carried over from the source sequence.
    pub division: Division,
    /// Ticks per quarter note or subframes per frame.
    pub resolution: i32,
    /// The per-tick state change table.
    pub table: FeatureTable,
}

impl DatDocument {
    /// Create a document from its header fields and table.
    pub fn new(division: Division, resolution: i32, table: FeatureTable) -> Self {
        Self {
            division,
            resolution,
            table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_never_stores_empty_entries() {
        let mut table = FeatureTable::new();
        assert!(table.is_empty());

        table.set(10, Instrument::Kick, true);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(10).unwrap().len(), 1);
        assert!(table.get(11).is_none());
    }

    #[test]
    fn later_set_overwrites_same_instrument_only() {
        let mut table = FeatureTable::new();
        table.set(10, Instrument::Kick, true);
        table.set(10, Instrument::Snare, false);
        table.set(10, Instrument::Kick, false);

        let changes = table.get(10).unwrap();
        assert_eq!(changes.get(Instrument::Kick), Some(false));
        assert_eq!(changes.get(Instrument::Snare), Some(false));
        assert_eq!(changes.get(Instrument::OpenHiHat), None);
    }

    #[test]
    fn iteration_is_ascending_and_table_ordered() {
        let mut table = FeatureTable::new();
        table.set(40, Instrument::ClosedHiHat, true);
        table.set(10, Instrument::Snare, true);
        table.set(10, Instrument::Kick, true);

        let ticks: Vec<u32> = table.iter().map(|(tick, _)| *tick).collect();
        assert_eq!(ticks, vec![10, 40]);

        let first: Vec<Instrument> = table
            .get(10)
            .unwrap()
            .iter()
            .map(|(instrument, _)| instrument)
            .collect();
        assert_eq!(first, vec![Instrument::Kick, Instrument::Snare]);
        assert_eq!(table.last_tick(), Some(40));
    }
}
