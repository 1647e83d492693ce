//! CRC-16/CCITT over the frame payload.
//!
//! Polynomial `0x1021`, initial register `0xFFFF`, bytes fed MSB first, no reflection and no final
//! XOR (catalogued as CRC-16/IBM-3740). The wire format only carries one checksum byte, so frames
//! are validated against the **low byte** of the 16 bit value. That leaves 8 effective bits of
//! integrity; the truncation is kept for compatibility with existing transmitters.

pub(crate) const CRC16: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_IBM_3740);

/// Computes the full 16 bit CRC of `payload`.
pub fn checksum(payload: &[u8]) -> u16 {
    CRC16.checksum(payload)
}

/// Computes the checksum byte carried on the wire: the low byte of [`checksum`].
pub fn checksum_byte(payload: &[u8]) -> u8 {
    checksum(payload) as u8
}

#[cfg(test)]
mod tests {
    use super::{checksum, checksum_byte};

    fn bitwise_crc16(data: &[u8]) -> u16 {
        let mut crc: u16 = 0xFFFF;
        for &byte in data {
            crc ^= (byte as u16) << 8;
            for _ in 0..8 {
                crc = if crc & 0x8000 != 0 {
                    (crc << 1) ^ 0x1021
                } else {
                    crc << 1
                };
            }
        }
        crc
    }

    #[test]
    fn test_check_value() {
        assert_eq!(checksum(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_empty_payload_is_initial_register() {
        assert_eq!(checksum(&[]), 0xFFFF);
    }

    #[test]
    fn test_matches_bitwise_shift_register() {
        #[rustfmt::skip]
        let payloads: [&[u8]; 4] = [
            &[0x05, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x07, 0xFF, 0xFA],
            &[0x00; 15],
            &[0xFF; 15],
            &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0],
        ];

        for payload in payloads {
            assert_eq!(checksum(payload), bitwise_crc16(payload));
        }
    }

    #[test]
    fn test_wire_byte_is_low_byte() {
        let payload = b"123456789";
        assert_eq!(checksum_byte(payload), 0xB1);
        assert_eq!(checksum_byte(payload), (checksum(payload) & 0x00FF) as u8);
    }
}
