/// The timing regime of a sequence.
///
/// The DAT header stores this as a single `f32`: the reserved value
/// `0.0` denotes pulses-per-quarter-note timing, and any other value is
/// a frames-per-second timecode rate (24.0, 25.0, 29.97, 30.0 in
/// practice, though no rate is rejected).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Division {
    /// Tempo-relative timing; ticks scale with the current tempo.
    PulsesPerQuarterNote,
    /// Timecode timing at the carried frame rate; tempo is irrelevant.
    FramesPerSecond(f32),
}

impl Division {
    /// The wire value reserved for PPQ timing.
    pub const PPQ_CODE: f32 = 0.0;

    /// Interpret a raw division value from a file header.
    pub fn from_f32(value: f32) -> Self {
        if value == Self::PPQ_CODE {
            Division::PulsesPerQuarterNote
        } else {
            Division::FramesPerSecond(value)
        }
    }

    /// The raw value written into file headers.
    pub const fn as_f32(&self) -> f32 {
        match self {
            Division::PulsesPerQuarterNote => Self::PPQ_CODE,
            Division::FramesPerSecond(fps) => *fps,
        }
    }

    /// True for the tempo-relative regime.
    pub const fn is_ppq(&self) -> bool {
        matches!(self, Division::PulsesPerQuarterNote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_value_round_trips() {
        assert_eq!(
            Division::from_f32(0.0),
            Division::PulsesPerQuarterNote
        );
        assert_eq!(
            Division::from_f32(29.97),
            Division::FramesPerSecond(29.97)
        );
        assert_eq!(Division::FramesPerSecond(24.0).as_f32(), 24.0);
        assert_eq!(Division::PulsesPerQuarterNote.as_f32(), 0.0);
    }
}
