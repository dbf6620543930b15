//! Record Codec
//!
//! Converts one [`Event`] to and from its on-device byte layout (see
//! [`constants::record`](crate::constants::record)). The codec knows nothing
//! about addresses: encoding is a pure function producing a slot-sized
//! buffer, and decoding pulls bytes from any [`ByteSource`].
//!
//! ## Decoding Rules
//!
//! Fields are read strictly in order and each read happens only after the
//! previous field validated:
//!
//! 1. Name length equal to the erased sentinel means the slot is empty.
//!    Nothing else is read.
//! 2. Every length prefix must lie in `1..=max` for its field.
//! 3. Every text field must be valid UTF-8.
//! 4. A short read or transport failure anywhere aborts the record.
//!
//! Any rule violation makes the whole record absent. There are no partially
//! populated events.
//!
//! ```rust
//! use eventrom_core::{codec, Event};
//!
//! let event = Event::new("Ceremony", 1730649600, 1730653200, "Elliot", "Badges!").unwrap();
//! let bytes = codec::encode(&event).unwrap();
//! assert_eq!(bytes.len(), 33);
//!
//! let mut source: &[u8] = &bytes;
//! assert_eq!(codec::decode(&mut source), Some(event));
//!
//! let mut erased: &[u8] = &[0xFF; 8];
//! assert_eq!(codec::decode(&mut erased), None);
//! ```

use heapless::{String, Vec};
use thiserror_no_std::Error;

use crate::constants::record::{DESCRIPTION_LEN_BYTES, FIXED_OVERHEAD, TIME_BYTES};
use crate::constants::{
    DESCRIPTION_MAX_BYTES, ERASED_BYTE, ERASED_WORD, NAME_MAX_BYTES, SLOT_SIZE,
    SPEAKER_MAX_BYTES, TEXT_MIN_BYTES,
};
use crate::errors::{TransportError, ValidationError, ValidationResult};
use crate::event::{check_text, EpochSeconds, Event, Field};

/// Encoded record, at most one slot long
pub type Record = Vec<u8, SLOT_SIZE>;

/// Why a slot did not decode to an event
///
/// Reported for diagnostics only; decoding itself collapses every fault to
/// absence.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeFault {
    /// Name length prefix holds the erased sentinel
    #[error("slot is erased")]
    Empty,

    /// A later length prefix holds the erased sentinel (torn write)
    #[error("{field} length is erased")]
    Erased {
        /// Field whose prefix was erased
        field: Field,
    },

    /// Length prefix outside the field's bounds
    #[error("{field} length {len} out of range")]
    InvalidLength {
        /// Field whose prefix was out of range
        field: Field,
        /// Value of the prefix
        len: usize,
    },

    /// Text field is not valid UTF-8
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 {
        /// Field that failed to decode
        field: Field,
    },

    /// Source ran out of bytes mid-record
    #[error("record truncated")]
    ShortRead,

    /// Underlying device read failed
    #[error("read failed: {0}")]
    Transport(TransportError),
}

/// Sequential byte supplier for the decoder
///
/// Implemented for byte slices (consuming from the front) and by the slot
/// store for device reads.
pub trait ByteSource {
    /// Fill `buf` completely with the next bytes
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeFault>;
}

impl ByteSource for &[u8] {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeFault> {
        if self.len() < buf.len() {
            return Err(DecodeFault::ShortRead);
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

/// Encoded size of `event` in bytes
pub fn encoded_len(event: &Event) -> usize {
    FIXED_OVERHEAD + event.name().len() + event.speaker().len() + event.description().len()
}

/// Serialize an event into its on-device layout
///
/// Pure: performs no I/O. Fails if any text field breaks its bound or the
/// record would not fit in one slot.
pub fn encode(event: &Event) -> ValidationResult<Record> {
    for field in [Field::Name, Field::Speaker, Field::Description] {
        check_text(field, event.text(field))?;
    }

    let len = encoded_len(event);
    if len > SLOT_SIZE {
        return Err(ValidationError::RecordTooLarge { len, max: SLOT_SIZE });
    }

    let name = event.name().as_bytes();
    let speaker = event.speaker().as_bytes();
    let description = event.description().as_bytes();

    let mut out = Record::new();
    put(&mut out, &[name.len() as u8])?;
    put(&mut out, name)?;
    put(&mut out, &event.start_time().to_be_bytes())?;
    put(&mut out, &event.end_time().to_be_bytes())?;
    put(&mut out, &[speaker.len() as u8])?;
    put(&mut out, speaker)?;
    put(&mut out, &(description.len() as u16).to_be_bytes())?;
    put(&mut out, description)?;

    Ok(out)
}

fn put(out: &mut Record, bytes: &[u8]) -> ValidationResult<()> {
    let len = out.len() + bytes.len();
    out.extend_from_slice(bytes)
        .map_err(|_| ValidationError::RecordTooLarge { len, max: SLOT_SIZE })
}

/// Decode one record, reporting why it failed
pub fn try_decode<S: ByteSource>(source: &mut S) -> Result<Event, DecodeFault> {
    let name_len = read_u8(source)?;
    if name_len == ERASED_BYTE {
        return Err(DecodeFault::Empty);
    }
    let name = read_text::<_, NAME_MAX_BYTES>(source, Field::Name, name_len as usize)?;

    let start_time = read_time(source)?;
    let end_time = read_time(source)?;

    let speaker_len = read_u8(source)?;
    if speaker_len == ERASED_BYTE {
        return Err(DecodeFault::Erased { field: Field::Speaker });
    }
    let speaker = read_text::<_, SPEAKER_MAX_BYTES>(
        source,
        Field::Speaker,
        speaker_len as usize,
    )?;

    let description_len = read_u16(source)?;
    if description_len == ERASED_WORD {
        return Err(DecodeFault::Erased { field: Field::Description });
    }
    let description = read_text::<_, DESCRIPTION_MAX_BYTES>(
        source,
        Field::Description,
        description_len as usize,
    )?;

    Ok(Event::from_parts(name, start_time, end_time, speaker, description))
}

/// Decode one record; any fault yields `None`
pub fn decode<S: ByteSource>(source: &mut S) -> Option<Event> {
    match try_decode(source) {
        Ok(event) => Some(event),
        Err(fault) => {
            log_debug!("no record: {}", fault);
            None
        }
    }
}

fn read_u8<S: ByteSource>(source: &mut S) -> Result<u8, DecodeFault> {
    let mut buf = [0u8; 1];
    source.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<S: ByteSource>(source: &mut S) -> Result<u16, DecodeFault> {
    let mut buf = [0u8; DESCRIPTION_LEN_BYTES];
    source.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_time<S: ByteSource>(source: &mut S) -> Result<EpochSeconds, DecodeFault> {
    let mut buf = [0u8; TIME_BYTES];
    source.read_exact(&mut buf)?;
    Ok(EpochSeconds::from_be_bytes(buf))
}

fn read_text<S: ByteSource, const N: usize>(
    source: &mut S,
    field: Field,
    len: usize,
) -> Result<String<N>, DecodeFault> {
    if !(TEXT_MIN_BYTES..=N).contains(&len) {
        return Err(DecodeFault::InvalidLength { field, len });
    }

    let mut buf = [0u8; N];
    let bytes = &mut buf[..len];
    source.read_exact(bytes)?;

    let text = core::str::from_utf8(bytes).map_err(|_| DecodeFault::InvalidUtf8 { field })?;
    let mut out = String::new();
    out.push_str(text)
        .map_err(|_| DecodeFault::InvalidLength { field, len })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ceremony() -> Event {
        Event::new("Ceremony", 1730649600, 1730653200, "Elliot", "Badges!").unwrap()
    }

    fn decode_bytes(bytes: &[u8]) -> Result<Event, DecodeFault> {
        let mut source = bytes;
        try_decode(&mut source)
    }

    #[test]
    fn ceremony_layout() {
        let bytes = encode(&ceremony()).unwrap();
        assert_eq!(bytes.len(), 33);

        assert_eq!(bytes[0], 8);
        assert_eq!(&bytes[1..9], b"Ceremony");
        assert_eq!(&bytes[9..13], &1730649600u32.to_be_bytes());
        assert_eq!(&bytes[13..17], &1730653200u32.to_be_bytes());
        assert_eq!(bytes[17], 6);
        assert_eq!(&bytes[18..24], b"Elliot");
        assert_eq!(&bytes[24..26], &[0x00, 0x07]);
        assert_eq!(&bytes[26..], b"Badges!");
    }

    #[test]
    fn round_trip() {
        let event = ceremony();
        let bytes = encode(&event).unwrap();
        assert_eq!(decode_bytes(&bytes), Ok(event));
    }

    #[test]
    fn largest_record_fills_slot_exactly() {
        let event = Event::new(
            &"N".repeat(NAME_MAX_BYTES),
            u32::MAX,
            0,
            &"S".repeat(SPEAKER_MAX_BYTES),
            &"D".repeat(DESCRIPTION_MAX_BYTES),
        )
        .unwrap();

        let bytes = encode(&event).unwrap();
        assert_eq!(bytes.len(), SLOT_SIZE);
        assert_eq!(decode_bytes(&bytes), Ok(event));
    }

    #[test]
    fn sentinel_wins_over_following_bytes() {
        let mut bytes = encode(&ceremony()).unwrap();
        bytes[0] = ERASED_BYTE;
        assert_eq!(decode_bytes(&bytes), Err(DecodeFault::Empty));

        // Sentinel alone is enough, nothing else is read
        assert_eq!(decode_bytes(&[ERASED_BYTE]), Err(DecodeFault::Empty));
    }

    #[test]
    fn name_length_out_of_range() {
        let mut bytes = encode(&ceremony()).unwrap();

        bytes[0] = 0;
        assert_eq!(
            decode_bytes(&bytes),
            Err(DecodeFault::InvalidLength { field: Field::Name, len: 0 })
        );

        bytes[0] = 51;
        assert_eq!(
            decode_bytes(&bytes),
            Err(DecodeFault::InvalidLength { field: Field::Name, len: 51 })
        );
    }

    #[test]
    fn erased_speaker_prefix_is_a_torn_record() {
        let mut bytes = encode(&ceremony()).unwrap();
        bytes[17] = ERASED_BYTE;
        assert_eq!(decode_bytes(&bytes), Err(DecodeFault::Erased { field: Field::Speaker }));
    }

    #[test]
    fn erased_description_prefix_is_a_torn_record() {
        let mut bytes = encode(&ceremony()).unwrap();
        bytes[24] = 0xFF;
        bytes[25] = 0xFF;
        assert_eq!(
            decode_bytes(&bytes),
            Err(DecodeFault::Erased { field: Field::Description })
        );
    }

    #[test]
    fn description_length_out_of_range() {
        let mut bytes = encode(&ceremony()).unwrap();
        bytes[24] = 0;
        bytes[25] = 139;
        assert_eq!(
            decode_bytes(&bytes),
            Err(DecodeFault::InvalidLength { field: Field::Description, len: 139 })
        );
    }

    #[test]
    fn speaker_length_out_of_range() {
        let mut bytes = encode(&ceremony()).unwrap();

        bytes[17] = 0;
        assert_eq!(
            decode_bytes(&bytes),
            Err(DecodeFault::InvalidLength { field: Field::Speaker, len: 0 })
        );

        bytes[17] = 51;
        assert_eq!(
            decode_bytes(&bytes),
            Err(DecodeFault::InvalidLength { field: Field::Speaker, len: 51 })
        );
    }

    #[test]
    fn description_length_zero() {
        let mut bytes = encode(&ceremony()).unwrap();
        bytes[24] = 0;
        bytes[25] = 0;
        assert_eq!(
            decode_bytes(&bytes),
            Err(DecodeFault::InvalidLength { field: Field::Description, len: 0 })
        );
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut bytes = encode(&ceremony()).unwrap();
        bytes[3] = 0xC3; // lead byte followed by ASCII
        assert_eq!(decode_bytes(&bytes), Err(DecodeFault::InvalidUtf8 { field: Field::Name }));
    }

    #[test]
    fn invalid_utf8_in_later_fields() {
        let mut bytes = encode(&ceremony()).unwrap();
        bytes[19] = 0xC3;
        assert_eq!(decode_bytes(&bytes), Err(DecodeFault::InvalidUtf8 { field: Field::Speaker }));

        let mut bytes = encode(&ceremony()).unwrap();
        bytes[28] = 0xC3;
        assert_eq!(
            decode_bytes(&bytes),
            Err(DecodeFault::InvalidUtf8 { field: Field::Description })
        );
    }

    #[test]
    fn truncated_record() {
        let bytes = encode(&ceremony()).unwrap();
        for cut in [1, 9, 12, 17, 20, 25, 32] {
            assert_eq!(decode_bytes(&bytes[..cut]), Err(DecodeFault::ShortRead), "cut at {cut}");
        }
    }

    #[test]
    fn decode_collapses_faults_to_none() {
        let mut erased: &[u8] = &[0xFF; 16];
        assert_eq!(decode(&mut erased), None);

        let mut zero: &[u8] = &[0x00; 16];
        assert_eq!(decode(&mut zero), None);
    }

    #[test]
    fn decode_stops_at_record_end() {
        let mut bytes = encode(&ceremony()).unwrap().to_vec();
        bytes.extend_from_slice(b"stale tail");

        let mut source: &[u8] = &bytes;
        assert!(decode(&mut source).is_some());
        assert_eq!(source, b"stale tail");
    }
}
