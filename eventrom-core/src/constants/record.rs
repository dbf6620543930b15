//! Record Layout
//!
//! One event occupies one slot. Fields are written in this order, all
//! integers big-endian:
//!
//! ```text
//! ┌──────┬──────────┬───────┬─────┬──────┬─────────────┬──────┬───────────────┐
//! │ 1 B  │ 1..50 B  │  4 B  │ 4 B │ 1 B  │   1..50 B   │ 2 B  │   1..138 B    │
//! │ nlen │   name   │ start │ end │ slen │   speaker   │ dlen │  description  │
//! └──────┴──────────┴───────┴─────┴──────┴─────────────┴──────┴───────────────┘
//! ```
//!
//! The largest legal record is exactly [`SLOT_SIZE`] bytes long.

/// Minimum UTF-8 byte length of every text field.
pub const TEXT_MIN_BYTES: usize = 1;

/// Maximum UTF-8 byte length of the event name.
pub const NAME_MAX_BYTES: usize = 50;

/// Maximum UTF-8 byte length of the speaker name.
pub const SPEAKER_MAX_BYTES: usize = 50;

/// Maximum UTF-8 byte length of the description.
pub const DESCRIPTION_MAX_BYTES: usize = 138;

/// Width of the name length prefix.
pub const NAME_LEN_BYTES: usize = 1;

/// Width of the speaker length prefix.
pub const SPEAKER_LEN_BYTES: usize = 1;

/// Width of the description length prefix.
pub const DESCRIPTION_LEN_BYTES: usize = 2;

/// Width of each epoch-seconds timestamp.
pub const TIME_BYTES: usize = 4;

/// Encoded size of a record whose text fields are all empty.
pub const FIXED_OVERHEAD: usize =
    NAME_LEN_BYTES + 2 * TIME_BYTES + SPEAKER_LEN_BYTES + DESCRIPTION_LEN_BYTES;

/// Size of one slot on the device.
pub const SLOT_SIZE: usize =
    FIXED_OVERHEAD + NAME_MAX_BYTES + SPEAKER_MAX_BYTES + DESCRIPTION_MAX_BYTES;

const _: () = assert!(SLOT_SIZE == 250, "slot layout changed");
