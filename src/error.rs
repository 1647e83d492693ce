use crate::MIN_FRAME_LEN;
use snafu::Snafu;

/// Enum of construction, encoding and validation errors.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[snafu(display("Ring buffer storage has zero capacity"))]
    ZeroCapacity,
    #[snafu(display("Invalid frame length {len}, should be at least {MIN_FRAME_LEN}"))]
    InvalidFrameLen { len: usize },
    #[snafu(display("Ring buffer capacity {capacity} cannot hold a frame body of {required} bytes"))]
    CapacityTooSmall { capacity: usize, required: usize },
    #[snafu(display("Invalid state {state}, see State enum"))]
    InvalidState { state: u8 },
    #[snafu(display("Buffer of {len} bytes is too small, {required} bytes required"))]
    BufferTooSmall { len: usize, required: usize },
    #[snafu(display("Crc checksum mismatch: expected {expected:#04x}, got {actual:#04x}"))]
    ChecksumMismatch { expected: u8, actual: u8 },
}
