#![doc = r#"
The fixed percussion category table.

Many raw pitches map onto one category (see the
[Magenta groove drum mapping](https://magenta.tensorflow.org/datasets/groove#drum-mapping)),
and the categories are disjoint. Declaration order defines the
positional index written into DAT records, so it must never be
reordered without breaking file compatibility.
"#]

use crate::error::ConvertError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// A percussion category.
///
/// The discriminant is the instrument's index in the DAT binary layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Instrument {
    /// Bass drum
    Kick,
    /// Snare drum, including rim variants
    Snare,
    /// Open hi-hat
    OpenHiHat,
    /// Closed hi-hat, including pedal variants
    ClosedHiHat,
}

impl Instrument {
    /// Number of categories in the table.
    pub const COUNT: usize = 4;

    /// Every category, in DAT index order.
    pub const ALL: [Instrument; Self::COUNT] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::OpenHiHat,
        Instrument::ClosedHiHat,
    ];

    /// The raw pitches registered for this category, primary first.
    pub const fn pitches(&self) -> &'static [u8] {
        match self {
            Instrument::Kick => &[36],
            Instrument::Snare => &[38, 40, 37],
            Instrument::OpenHiHat => &[46, 26],
            Instrument::ClosedHiHat => &[42, 22, 44],
        }
    }

    /// The canonical pitch used when synthesizing channel events.
    pub const fn primary_pitch(&self) -> u8 {
        self.pitches()[0]
    }

    /// Maps a raw pitch number to its category.
    ///
    /// Fails with [`ConvertError::UnknownPitch`] when the pitch matches
    /// no category's pitch set.
    pub fn classify(pitch: u8) -> Result<Instrument, ConvertError> {
        Self::ALL
            .into_iter()
            .find(|instrument| instrument.pitches().contains(&pitch))
            .ok_or(ConvertError::UnknownPitch(pitch))
    }

    /// The category's positional index in the DAT layout.
    pub const fn index(&self) -> u8 {
        *self as u8
    }
}
