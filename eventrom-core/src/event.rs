//! Scheduled Session Records
//!
//! An [`Event`] is one entry of the conference schedule: a session name,
//! its start and end as epoch seconds, the speaker and a short description.
//!
//! Text fields are stored in `heapless::String`s whose capacities equal the
//! on-device byte bounds, so an `Event` that exists always fits in a slot:
//!
//! | Field | Bytes |
//! |---|---|
//! | name | 1–50 |
//! | speaker | 1–50 |
//! | description | 1–138 |
//!
//! Bounds are UTF-8 byte counts, not characters. `"Grüße"` is 7 bytes.
//! End time is not checked against start time.

use core::fmt;

use heapless::String;

use crate::codec;
use crate::constants::{DESCRIPTION_MAX_BYTES, NAME_MAX_BYTES, SPEAKER_MAX_BYTES, TEXT_MIN_BYTES};
use crate::errors::{ValidationError, ValidationResult};

/// Seconds since the Unix epoch, as stored on the device
pub type EpochSeconds = u32;

/// Text fields of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Session name
    Name,
    /// Speaker name
    Speaker,
    /// Session description
    Description,
}

impl Field {
    /// Human-readable field name
    pub const fn name(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Speaker => "speaker",
            Field::Description => "description",
        }
    }

    /// Maximum UTF-8 byte length of the field
    pub const fn max_bytes(&self) -> usize {
        match self {
            Field::Name => NAME_MAX_BYTES,
            Field::Speaker => SPEAKER_MAX_BYTES,
            Field::Description => DESCRIPTION_MAX_BYTES,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check a text field against its byte bounds
pub(crate) fn check_text(field: Field, text: &str) -> ValidationResult<()> {
    let len = text.len();
    if len < TEXT_MIN_BYTES {
        return Err(ValidationError::Empty { field });
    }
    if len > field.max_bytes() {
        return Err(ValidationError::TooLong { field, len, max: field.max_bytes() });
    }
    Ok(())
}

fn bounded<const N: usize>(field: Field, text: &str) -> ValidationResult<String<N>> {
    check_text(field, text)?;
    let mut out = String::new();
    out.push_str(text)
        .map_err(|_| ValidationError::TooLong { field, len: text.len(), max: N })?;
    Ok(out)
}

/// A scheduled session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    name: String<NAME_MAX_BYTES>,
    start_time: EpochSeconds,
    end_time: EpochSeconds,
    speaker: String<SPEAKER_MAX_BYTES>,
    description: String<DESCRIPTION_MAX_BYTES>,
}

impl Event {
    /// Create an event, checking every text field against its byte bound
    ///
    /// ```rust
    /// use eventrom_core::Event;
    ///
    /// let event = Event::new("Ceremony", 1730649600, 1730653200, "Elliot", "Badges!").unwrap();
    /// assert_eq!(event.encoded_len(), 33);
    ///
    /// assert!(Event::new("", 0, 0, "Elliot", "Badges!").is_err());
    /// ```
    pub fn new(
        name: &str,
        start_time: EpochSeconds,
        end_time: EpochSeconds,
        speaker: &str,
        description: &str,
    ) -> ValidationResult<Self> {
        Ok(Self {
            name: bounded(Field::Name, name)?,
            start_time,
            end_time,
            speaker: bounded(Field::Speaker, speaker)?,
            description: bounded(Field::Description, description)?,
        })
    }

    /// Assemble from fields already checked by the decoder
    pub(crate) fn from_parts(
        name: String<NAME_MAX_BYTES>,
        start_time: EpochSeconds,
        end_time: EpochSeconds,
        speaker: String<SPEAKER_MAX_BYTES>,
        description: String<DESCRIPTION_MAX_BYTES>,
    ) -> Self {
        Self { name, start_time, end_time, speaker, description }
    }

    /// Session name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start time in epoch seconds
    pub fn start_time(&self) -> EpochSeconds {
        self.start_time
    }

    /// End time in epoch seconds
    pub fn end_time(&self) -> EpochSeconds {
        self.end_time
    }

    /// Speaker name
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Session description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Text of the given field
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Speaker => &self.speaker,
            Field::Description => &self.description,
        }
    }

    /// Number of bytes this event occupies on the device
    pub fn encoded_len(&self) -> usize {
        codec::encoded_len(self)
    }

    /// Session length in seconds, zero if end precedes start
    pub fn duration_secs(&self) -> u32 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// Whether the session is running at `now` (start inclusive, end exclusive)
    pub fn is_live_at(&self, now: EpochSeconds) -> bool {
        self.start_time <= now && now < self.end_time
    }
}

/// Incremental event construction
///
/// ```rust
/// use eventrom_core::EventBuilder;
///
/// let event = EventBuilder::new("Opening Remarks")
///     .starts_at(1730649600)
///     .ends_at(1730651400)
///     .speaker("Hackaday")
///     .description("Welcome to Supercon")
///     .build()
///     .unwrap();
///
/// assert_eq!(event.duration_secs(), 1800);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EventBuilder<'a> {
    name: &'a str,
    start_time: EpochSeconds,
    end_time: EpochSeconds,
    speaker: &'a str,
    description: &'a str,
}

impl<'a> EventBuilder<'a> {
    /// Start a builder for the named session
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            start_time: 0,
            end_time: 0,
            speaker: "",
            description: "",
        }
    }

    /// Set start time
    pub fn starts_at(mut self, start_time: EpochSeconds) -> Self {
        self.start_time = start_time;
        self
    }

    /// Set end time
    pub fn ends_at(mut self, end_time: EpochSeconds) -> Self {
        self.end_time = end_time;
        self
    }

    /// Set speaker name
    pub fn speaker(mut self, speaker: &'a str) -> Self {
        self.speaker = speaker;
        self
    }

    /// Set description
    pub fn description(mut self, description: &'a str) -> Self {
        self.description = description;
        self
    }

    /// Validate and build the event
    pub fn build(self) -> ValidationResult<Event> {
        Event::new(self.name, self.start_time, self.end_time, self.speaker, self.description)
    }
}
