//! Weekly availability mask.
//!
//! A host's working days are stored as a 7-bit integer. The most significant of
//! the 7 bits is Monday and the least significant is Sunday, so the mask reads
//! like the week when written in binary:
//!
//! ```text
//! M T W T F S S
//! 1 1 1 1 1 0 0   = 0b1111100 = 124  (Monday to Friday)
//! 0 0 0 0 0 1 0   = 0b0000010 = 2    (Saturday only)
//! ```

use chrono::Weekday;

use crate::error::{Result, SlotError};

/// Largest valid mask: every day of the week available.
pub const FULL_WEEK: u32 = 0b111_1111;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A validated weekly mask in `1..=127`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeeklyMask(u8);

impl WeeklyMask {
    /// Monday to Friday.
    pub const WEEKDAYS: WeeklyMask = WeeklyMask(0b111_1100);

    pub fn new(mask: u32) -> Result<Self> {
        if !is_valid_weekly_mask(mask) {
            return Err(SlotError::InvalidAvailabilityMask(mask));
        }
        Ok(Self(mask as u8))
    }

    /// Encode a set of weekdays. Fails when `days` is empty.
    pub fn from_days(days: &[Weekday]) -> Result<Self> {
        let mask = days.iter().fold(0u32, |acc, day| acc | bit_for(*day));
        Self::new(mask)
    }

    pub fn bits(self) -> u32 {
        u32::from(self.0)
    }

    pub fn decode(self) -> WeekAvailability {
        let mut days = [false; 7];
        for (slot, day) in days.iter_mut().zip(WEEK) {
            *slot = self.bits() & bit_for(day) != 0;
        }
        WeekAvailability { days }
    }
}

/// Per-weekday lookup decoded from a [`WeeklyMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekAvailability {
    // Indexed by `Weekday::num_days_from_monday`.
    days: [bool; 7],
}

impl WeekAvailability {
    pub fn is_available(&self, day: Weekday) -> bool {
        self.days[day.num_days_from_monday() as usize]
    }

    /// All seven days, Monday first.
    pub fn entries(&self) -> [(Weekday, bool); 7] {
        let mut out = [(Weekday::Mon, false); 7];
        for (i, day) in WEEK.iter().enumerate() {
            out[i] = (*day, self.days[i]);
        }
        out
    }

    pub fn available_days(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.iter().copied().filter(|d| self.is_available(*d))
    }
}

fn bit_for(day: Weekday) -> u32 {
    1 << (6 - day.num_days_from_monday())
}

/// True iff `mask` marks at least one day and fits in 7 bits.
pub fn is_valid_weekly_mask(mask: u32) -> bool {
    mask != 0 && mask <= FULL_WEEK
}

/// Decode a raw mask into a weekday lookup.
///
/// # Errors
/// Returns [`SlotError::InvalidAvailabilityMask`] for 0 or values above 127.
pub fn decode_weekly_mask(mask: u32) -> Result<WeekAvailability> {
    Ok(WeeklyMask::new(mask)?.decode())
}
