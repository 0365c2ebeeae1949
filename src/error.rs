use thiserror::Error;

/// Errors produced while turning a sequence into DAT content.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The pitch belongs to no instrument category.
    #[error("no instrument category registered for pitch {0}")]
    UnknownPitch(u8),
    /// A tick falls outside the signed 32-bit range the DAT layout can
    /// represent.
    #[error("tick {0} exceeds the representable range of the dat format")]
    TickOverflow(u64),
}

#[doc = r#"
An error raised while decoding a DAT byte stream.

Carries the byte offset at which the failing read began.
"#]
#[derive(Debug, Error)]
#[error("decoding at byte {position}, {kind}")]
pub struct DecodeError {
    position: usize,
    pub(crate) kind: DecodeErrorKind,
}

/// A kind of error the DAT decoder can produce.
#[derive(Debug, Error)]
pub enum DecodeErrorKind {
    /// The stream ended before a record supplied all the bytes its
    /// header promised.
    #[error("record promises more bytes than remain in the stream")]
    TruncatedData,
    /// An instrument index outside the fixed category table.
    #[error("instrument index {0} is outside the category table")]
    InvalidInstrumentIndex(u8),
    /// A tick appeared in more than one record (strict mode only).
    #[error("tick {0} appears in more than one record")]
    DuplicateTick(u32),
    /// A record carried a negative tick value.
    #[error("record carries negative tick {0}")]
    NegativeTick(i32),
    /// Reading from the underlying stream failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Create a decode error from a byte position and kind.
    pub const fn new(position: usize, kind: DecodeErrorKind) -> Self {
        Self { position, kind }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Returns the byte offset where the failing read began.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True if the stream ended mid-record.
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::TruncatedData)
    }
}
