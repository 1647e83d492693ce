use crate::{
    buffer::{RingBuffer, SliceRingBuffer},
    checksum_byte,
    error::{CapacityTooSmallSnafu, InvalidFrameLenSnafu, ZeroCapacitySnafu},
    Error, Frame, CHECKSUM_LEN, DEFAULT_READ_THRESHOLD, FRAME_LEN, MARKER, MARKER_LEN,
    MIN_FRAME_LEN,
};
use num_enum::TryFromPrimitive;
use snafu::ensure;

/// Struct for configuring a `Parser`.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Two byte start marker of every frame. Default is `[0xFF, 0xFF]`.
    pub marker: [u8; MARKER_LEN],
    /// Length of a whole frame including marker and checksum byte. Default is `FRAME_LEN`.
    pub frame_len: usize,
    /// Bytes the marker search may consume per `process` call before yielding. Default is twice
    /// the frame length.
    pub read_threshold: usize,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            marker: MARKER,
            frame_len: FRAME_LEN,
            read_threshold: DEFAULT_READ_THRESHOLD,
        }
    }

    pub const fn with_marker(mut self, marker: [u8; MARKER_LEN]) -> Self {
        self.marker = marker;
        self
    }

    /// Sets the frame length and resets the read threshold to twice that length.
    pub const fn with_frame_len(mut self, frame_len: usize) -> Self {
        self.frame_len = frame_len;
        self.read_threshold = frame_len.saturating_mul(2);
        self
    }

    pub const fn with_read_threshold(mut self, read_threshold: usize) -> Self {
        self.read_threshold = read_threshold;
        self
    }

    const fn body_len(&self) -> usize {
        self.frame_len - MARKER_LEN
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// States of the frame synchronization state machine.
///
/// +---------------+   +----------------+   +--------------------+
/// | FindFirstByte |-->| FindSecondByte |-->| WaitAndCopyMessage |
/// +---------------+   +----------------+   +--------------------+
///         ^                   |                      |
///         |                   |                      |
///         +-------------------+                      |
///         +------------------------------------------+
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    FindFirstByte = 0,
    FindSecondByte = 1,
    WaitAndCopyMessage = 2,
}

/// Outcome of a single state handler.
enum Step {
    /// Keep going in the new state within the same call
    InProgress,
    /// A frame with a matching checksum was copied
    MessageCopied,
    /// Yield to the caller, with the reason if a frame was consumed and rejected
    Break(Option<Error>),
}

/// Fixed-length frame parser reading from a ring buffer.
///
/// The parser performs no locking. When bytes are pushed from an interrupt handler while
/// `process` runs in the main loop, both call sites must go through the same critical section.
#[derive(Debug)]
pub struct Parser<B> {
    buffer: B,
    state: State,
    config: Config,
}

impl<'a> Parser<SliceRingBuffer<'a>> {
    /// Creates a parser whose ring buffer is backed by caller-owned `storage`.
    pub fn with_storage(storage: &'a mut [u8], config: Config) -> Result<Self, Error> {
        Self::new(SliceRingBuffer::new(storage)?, config)
    }
}

impl<B: RingBuffer> Parser<B> {
    /// Creates a new `Parser` around `buffer`.
    ///
    /// Fails if the buffer has no capacity, if the frame length cannot hold a marker, a payload
    /// byte and the checksum byte, or if the buffer could never hold a whole frame body.
    pub fn new(buffer: B, config: Config) -> Result<Self, Error> {
        let capacity = buffer.capacity();
        ensure!(capacity > 0, ZeroCapacitySnafu);
        ensure!(
            config.frame_len >= MIN_FRAME_LEN,
            InvalidFrameLenSnafu {
                len: config.frame_len
            }
        );
        let required = config.body_len();
        ensure!(
            capacity >= required,
            CapacityTooSmallSnafu { capacity, required }
        );

        Ok(Self {
            buffer,
            state: State::FindFirstByte,
            config,
        })
    }

    /// Tears the parser down and hands the ring buffer back.
    pub fn release(self) -> B {
        self.buffer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of bytes waiting in the ring buffer.
    pub fn len(&self) -> usize {
        self.buffer.full()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// Sets the state from its numeric value. Unknown values are rejected and the current state
    /// is kept.
    pub fn set_state_raw(&mut self, state: u8) -> Result<(), Error> {
        self.state = State::try_from(state).map_err(|_| Error::InvalidState { state })?;
        Ok(())
    }

    /// Pushes received bytes into the ring buffer and returns how many were accepted.
    ///
    /// Anything less than `src.len()` means the buffer overran; bytes already buffered are kept.
    pub fn put(&mut self, src: &[u8]) -> usize {
        let written = self.buffer.write(src);
        if written < src.len() {
            debug!("ring buffer overrun, accepted {} of {} bytes", written, src.len());
        }
        written
    }

    /// Same as [`Parser::put`], meant for interrupt handlers. No extra synchronization happens
    /// here.
    pub fn put_isr(&mut self, src: &[u8]) -> usize {
        self.put(src)
    }

    /// Drops everything buffered, returns to `FindFirstByte` and returns the number of discarded
    /// bytes.
    pub fn reset(&mut self) -> usize {
        let discarded = self.buffer.reset();
        self.state = State::FindFirstByte;
        debug!("parser reset, discarded {} bytes", discarded);
        discarded
    }

    /// Runs the state machine on the buffered bytes and returns the frame length if a frame with
    /// a valid checksum was copied into `dst`, `0` otherwise.
    ///
    /// `dst` may hold a rejected frame after a `0` return, so its content must only be used when
    /// the frame length is returned.
    pub fn process(&mut self, dst: &mut [u8]) -> usize {
        match self.try_process(dst) {
            Some(Ok(frame)) => frame.as_slice().len(),
            _ => 0,
        }
    }

    /// Runs the state machine on the buffered bytes, like [`Parser::process`].
    ///
    /// Returns `None` when more bytes are needed (or the marker search used up its read threshold),
    /// `Some(Ok(frame))` when a valid frame was copied into `dst` and `Some(Err(_))` when a frame
    /// was consumed but its checksum did not match.
    pub fn try_process<'d>(&mut self, dst: &'d mut [u8]) -> Option<Result<Frame<'d>, Error>> {
        let mut scanned = 0;

        let copied = loop {
            let step = match self.state {
                State::FindFirstByte => self.find_first_byte(&mut scanned),
                State::FindSecondByte => self.find_second_byte(),
                State::WaitAndCopyMessage => self.wait_and_copy_message(dst),
            };

            match step {
                Step::InProgress => {}
                Step::MessageCopied => break Ok(()),
                Step::Break(reason) => break Err(reason),
            }
        };

        match copied {
            Ok(()) => Some(Ok(Frame::from_copied(&dst[..self.config.frame_len]))),
            Err(reason) => reason.map(Err),
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        (self.buffer.read(&mut byte) == 1).then_some(byte[0])
    }

    fn find_first_byte(&mut self, scanned: &mut usize) -> Step {
        while let Some(byte) = self.read_byte() {
            *scanned += 1;

            if byte == self.config.marker[0] {
                self.state = State::FindSecondByte;
                return Step::InProgress;
            }

            if *scanned > self.config.read_threshold {
                trace!("marker search yielded after {} bytes", *scanned);
                return Step::Break(None);
            }
        }

        Step::Break(None)
    }

    fn find_second_byte(&mut self) -> Step {
        // Nothing received yet, the second byte may still arrive
        let Some(byte) = self.read_byte() else {
            return Step::Break(None);
        };

        if byte == self.config.marker[1] {
            trace!("start marker found");
            self.state = State::WaitAndCopyMessage;
        } else {
            self.state = State::FindFirstByte;
        }

        Step::InProgress
    }

    fn wait_and_copy_message(&mut self, dst: &mut [u8]) -> Step {
        let frame_len = self.config.frame_len;
        if dst.len() < frame_len || self.buffer.full() < self.config.body_len() {
            return Step::Break(None);
        }

        let frame = &mut dst[..frame_len];
        frame[..MARKER_LEN].copy_from_slice(&self.config.marker);
        self.buffer.read(&mut frame[MARKER_LEN..]);

        // The body is consumed whatever the checksum says
        self.state = State::FindFirstByte;

        let expected = frame[frame_len - CHECKSUM_LEN];
        let actual = checksum_byte(&frame[MARKER_LEN..frame_len - CHECKSUM_LEN]);
        if expected == actual {
            trace!("frame copied");
            Step::MessageCopied
        } else {
            warn!(
                "frame dropped, crc mismatch: expected {}, got {}",
                expected, actual
            );
            Step::Break(Some(Error::ChecksumMismatch { expected, actual }))
        }
    }
}
