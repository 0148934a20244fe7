use crate::error::{self, LibResult};
use crate::numbers::TimeSigNumerator;

/// The lower part of a time signature. QY70/QY700 only ever notate one of these five values.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Denominator {
    Whole = 1,
    Half = 2,
    Quarter = 4,
    Eighth = 8,
    Sixteenth = 16,
}

impl Default for Denominator {
    fn default() -> Self {
        Denominator::Quarter
    }
}

impl Denominator {
    pub(crate) fn from_u8(value: u8) -> LibResult<Self> {
        match value {
            1 => Ok(Denominator::Whole),
            2 => Ok(Denominator::Half),
            4 => Ok(Denominator::Quarter),
            8 => Ok(Denominator::Eighth),
            16 => Ok(Denominator::Sixteenth),
            _ => error::Other { site: site!() }.fail(),
        }
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// `(numerator, denominator)`, e.g. `(4, Quarter)` for common time, `(6, Eighth)` for 6/8.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: TimeSigNumerator,
    denominator: Denominator,
}

impl TimeSignature {
    pub fn new(numerator: u8, denominator: Denominator) -> Self {
        Self {
            numerator: TimeSigNumerator::new(numerator),
            denominator,
        }
    }

    pub fn common_time() -> Self {
        Self::new(4, Denominator::Quarter)
    }

    pub fn numerator(&self) -> u8 {
        self.numerator.get()
    }

    pub fn denominator(&self) -> Denominator {
        self.denominator
    }
}
