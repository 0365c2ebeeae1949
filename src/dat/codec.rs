#![doc = r#"
Binary encoding and decoding of the DAT layout.

All integers are big-endian:

```text
float32  division
int32    resolution
repeated {
  int32  tick                     -- only ticks with >= 1 state change
  uint8  changeCount (N)
  repeated N times {
    uint8  instrumentIndex        -- position in the category table
    uint8  state                  -- 0 = off, 1 = on
  }
}
```

Records are written ascending by tick with no padding and no end
marker; end of stream is end of the record sequence.
"#]

use super::{DatDocument, FeatureTable};
use crate::error::{ConvertError, DecodeError, DecodeErrorKind};
use crate::instrument::Instrument;
use crate::progress::{NoProgress, ProgressSink};
use crate::sequence::Division;
use std::io;

/// What the decoder does when a tick repeats across records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateTickPolicy {
    /// Let the later record overwrite overlapping instruments and keep
    /// the rest, matching historical writer-tolerant behavior.
    #[default]
    Lenient,
    /// Fail with [`DecodeErrorKind::DuplicateTick`].
    Strict,
}

/// Serialize a document into the DAT byte layout.
///
/// Fails with [`ConvertError::TickOverflow`] if the table carries a
/// tick outside the signed 32-bit range of the record header.
pub fn encode(doc: &DatDocument) -> Result<Vec<u8>, ConvertError> {
    encode_with(doc, &NoProgress)
}

/// [`encode`], reporting progress per record written.
pub fn encode_with(
    doc: &DatDocument,
    progress: &impl ProgressSink,
) -> Result<Vec<u8>, ConvertError> {
    let mut out = Vec::with_capacity(8 + doc.table.len() * 8);
    out.extend_from_slice(&doc.division.as_f32().to_be_bytes());
    out.extend_from_slice(&doc.resolution.to_be_bytes());

    let total = doc.table.len();
    for (written, (&tick, changes)) in doc.table.iter().enumerate() {
        if tick > i32::MAX as u32 {
            return Err(ConvertError::TickOverflow(tick as u64));
        }
        out.extend_from_slice(&(tick as i32).to_be_bytes());
        out.push(changes.len() as u8);
        for (instrument, on) in changes.iter() {
            out.push(instrument.index());
            out.push(on as u8);
        }
        progress.report((written + 1) as f64 / total as f64);
    }
    Ok(out)
}

/// Serialize a document into a byte-stream handle.
pub fn write_to<W: io::Write>(doc: &DatDocument, writer: &mut W) -> io::Result<()> {
    let bytes = encode(doc).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    writer.write_all(&bytes)
}

/// Deserialize a DAT byte stream with the lenient duplicate-tick
/// policy and no progress reporting.
pub fn decode(bytes: &[u8]) -> Result<DatDocument, DecodeError> {
    decode_with(bytes, DuplicateTickPolicy::default(), &NoProgress)
}

/// Deserialize a DAT byte stream, reading records until the input is
/// exhausted.
pub fn decode_with(
    bytes: &[u8],
    policy: DuplicateTickPolicy,
    progress: &impl ProgressSink,
) -> Result<DatDocument, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    let division = Division::from_f32(cursor.read_f32()?);
    let resolution = cursor.read_i32()?;

    let mut table = FeatureTable::new();
    while cursor.remaining() > 0 {
        let record_start = cursor.position();
        let raw_tick = cursor.read_i32()?;
        let tick = u32::try_from(raw_tick)
            .map_err(|_| DecodeError::new(record_start, DecodeErrorKind::NegativeTick(raw_tick)))?;

        if table.get(tick).is_some() {
            match policy {
                DuplicateTickPolicy::Strict => {
                    return Err(DecodeError::new(
                        record_start,
                        DecodeErrorKind::DuplicateTick(tick),
                    ));
                }
                DuplicateTickPolicy::Lenient => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(tick, "duplicate tick record, overwriting earlier entries");
                }
            }
        }

        let change_count = cursor.read_u8()?;
        for _ in 0..change_count {
            let index_at = cursor.position();
            let index = cursor.read_u8()?;
            let instrument = Instrument::try_from(index).map_err(|_| {
                DecodeError::new(index_at, DecodeErrorKind::InvalidInstrumentIndex(index))
            })?;
            let on = cursor.read_u8()? != 0;
            table.set(tick, instrument, on);
        }
        progress.report(cursor.position() as f64 / bytes.len() as f64);
    }

    Ok(DatDocument::new(division, resolution, table))
}

/// Deserialize from a byte-stream handle, reading to stream end first.
pub fn read_from<R: io::Read>(reader: &mut R) -> Result<DatDocument, DecodeError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| DecodeError::new(0, DecodeErrorKind::Io(e)))?;
    decode(&bytes)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    const fn position(&self) -> usize {
        self.position
    }

    const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let start = self.position;
        let end = start + N;
        let slice = self
            .bytes
            .get(start..end)
            .ok_or(DecodeError::new(start, DecodeErrorKind::TruncatedData))?;
        self.position = end;
        let mut array = [0u8; N];
        array.copy_from_slice(slice);
        Ok(array)
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.read_array::<1>().map(|b| b[0])
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.read_array::<4>().map(i32::from_be_bytes)
    }

    fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.read_array::<4>().map(f32::from_be_bytes)
    }
}
