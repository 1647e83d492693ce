use crate::{
    checksum_byte,
    error::{BufferTooSmallSnafu, InvalidFrameLenSnafu},
    Error, CHECKSUM_LEN, MARKER_LEN, MIN_FRAME_LEN,
};
use snafu::{ensure, OptionExt};

/// Represents a copied frame (marker, payload and checksum byte)
///
/// A `Frame` borrows the memory it was copied into, so it cannot outlive the caller's buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame<'a> {
    buf: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Wraps `buf` as a frame. The slice must be at least `MIN_FRAME_LEN` bytes long. The checksum
    /// is not verified, see [`Frame::is_valid`].
    pub fn new(buf: &'a [u8]) -> Result<Frame<'a>, Error> {
        ensure!(
            buf.len() >= MIN_FRAME_LEN,
            InvalidFrameLenSnafu { len: buf.len() }
        );

        Ok(Frame { buf })
    }

    pub(crate) const fn from_copied(buf: &'a [u8]) -> Frame<'a> {
        Frame { buf }
    }

    /// Get the raw bytes of the frame
    pub fn as_slice(&self) -> &'a [u8] {
        self.buf
    }

    /// Get the start marker of the frame
    pub fn marker(&self) -> [u8; MARKER_LEN] {
        match self.buf {
            [first, second, ..] => [*first, *second],
            _ => [0; MARKER_LEN],
        }
    }

    /// Get the payload section of the frame
    pub fn payload(&self) -> &'a [u8] {
        match self.buf {
            // Skip the two [marker] bytes and the [crc] byte
            [_, _, payload @ .., _] => payload,
            _ => &[],
        }
    }

    /// Get the checksum byte carried by the frame
    pub fn checksum(&self) -> u8 {
        self.buf.last().copied().unwrap_or_default()
    }

    /// Check the carried checksum byte against the payload
    pub fn is_valid(&self) -> bool {
        checksum_byte(self.payload()) == self.checksum()
    }
}

/// Writes `marker`, `payload` and the matching checksum byte into `dst` and returns the frame
/// length.
///
/// This is the sending side of the wire format, useful for transmitters and tests.
pub fn encode_frame(
    marker: [u8; MARKER_LEN],
    payload: &[u8],
    dst: &mut [u8],
) -> Result<usize, Error> {
    let len = MARKER_LEN + payload.len() + CHECKSUM_LEN;
    ensure!(len >= MIN_FRAME_LEN, InvalidFrameLenSnafu { len });

    let available = dst.len();
    let frame = dst.get_mut(..len).context(BufferTooSmallSnafu {
        len: available,
        required: len,
    })?;

    frame[..MARKER_LEN].copy_from_slice(&marker);
    frame[MARKER_LEN..len - CHECKSUM_LEN].copy_from_slice(payload);
    frame[len - CHECKSUM_LEN] = checksum_byte(payload);

    Ok(len)
}
