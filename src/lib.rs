//! This crate provides a `no-std`, allocation-free parser for fixed-length radio message frames.
//!
//! A frame is `FRAME_LEN` bytes long: a two byte start marker, the payload and one checksum byte
//! holding the low byte of the CRC-16/CCITT of the payload. Received bytes are pushed into a ring
//! buffer with [`Parser::put`] (or [`Parser::put_isr`] from an interrupt handler) and the main loop
//! calls [`Parser::process`], which finds the marker, waits for a whole frame and copies it out.
//!
//! The parser has no internal locking. If `put_isr` and `process` run in different execution
//! contexts, the caller has to wrap both in the same critical section.
//!
//! # Usage
//! ### Frame Parsing
//! ```rust
//! use radio_message_parser::{encode_frame, Config, Parser, FRAME_LEN, MARKER, PAYLOAD_LEN};
//!
//! // Backing memory for the ring buffer, owned by the caller
//! let mut storage = [0u8; 128];
//! let mut parser = Parser::with_storage(&mut storage, Config::default()).unwrap();
//!
//! let mut wire = [0u8; FRAME_LEN];
//! encode_frame(MARKER, &[0x2A; PAYLOAD_LEN], &mut wire).unwrap();
//!
//! // Noise before the frame is skipped
//! assert_eq!(parser.put(&[0x01, 0x02]), 2);
//! assert_eq!(parser.put(&wire), FRAME_LEN);
//!
//! let mut frame = [0u8; FRAME_LEN];
//! assert_eq!(parser.process(&mut frame), FRAME_LEN);
//! assert_eq!(frame, wire);
//! ```
//! ### Checksum Errors
//! ```rust
//! use radio_message_parser::{encode_frame, Config, Error, Parser, FRAME_LEN, MARKER, PAYLOAD_LEN};
//!
//! let mut storage = [0u8; 64];
//! let mut parser = Parser::with_storage(&mut storage, Config::default()).unwrap();
//!
//! let mut wire = [0u8; FRAME_LEN];
//! encode_frame(MARKER, &[0x2A; PAYLOAD_LEN], &mut wire).unwrap();
//! wire[FRAME_LEN - 1] ^= 0x01;
//! parser.put(&wire);
//!
//! let mut frame = [0u8; FRAME_LEN];
//! match parser.try_process(&mut frame) {
//!     Some(Err(Error::ChecksumMismatch { .. })) => {}
//!     res => panic!("Checksum mismatch expected: {res:?}"),
//! }
//! // The corrupt frame was consumed
//! assert!(parser.is_empty());
//! ```

#![no_std]

#[macro_use]
mod fmt;

mod buffer;
pub use buffer::*;

mod checksum;
pub use checksum::*;

mod error;
pub use error::*;

mod frame;
pub use frame::*;

mod parser;
pub use parser::*;

/// Default start marker
pub const MARKER: [u8; MARKER_LEN] = [0xFF, 0xFF];
pub const MARKER_LEN: usize = 2;
/// Size of the checksum field. Only the low byte of the CRC-16 travels on the wire.
pub const CHECKSUM_LEN: usize = 1;
/// Default frame length, marker and checksum byte included
pub const FRAME_LEN: usize = 18;
pub const PAYLOAD_LEN: usize = FRAME_LEN - MARKER_LEN - CHECKSUM_LEN;
/// Smallest frame: marker, one payload byte and the checksum byte
pub const MIN_FRAME_LEN: usize = MARKER_LEN + 1 + CHECKSUM_LEN;
/// Default number of bytes the marker search may consume per `process` call
pub const DEFAULT_READ_THRESHOLD: usize = 2 * FRAME_LEN;
