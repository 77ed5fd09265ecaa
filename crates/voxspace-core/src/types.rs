//! Voxel resolution type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::RESOLUTION_COUNT;
use crate::error::{Error, Result};

/// Edge lengths in meters, indexed by [`Resolution::index`].
const SIZES_METERS: [f32; RESOLUTION_COUNT] =
    [0.01, 0.02, 0.04, 0.08, 0.16, 0.32, 0.64, 1.28, 2.56, 5.12];

/// One of the ten fixed voxel edge lengths.
///
/// Resolution is not positional: every voxel, whatever its size, is addressed
/// by an [`IncrementPos`](crate::IncrementPos).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Resolution {
    /// 1 cm
    Size1cm = 0,
    /// 2 cm
    Size2cm = 1,
    /// 4 cm
    Size4cm = 2,
    /// 8 cm
    Size8cm = 3,
    /// 16 cm
    Size16cm = 4,
    /// 32 cm
    Size32cm = 5,
    /// 64 cm
    Size64cm = 6,
    /// 128 cm
    Size128cm = 7,
    /// 256 cm
    Size256cm = 8,
    /// 512 cm
    Size512cm = 9,
}

impl Resolution {
    /// All resolutions, smallest first.
    pub const ALL: [Self; RESOLUTION_COUNT] = [
        Self::Size1cm,
        Self::Size2cm,
        Self::Size4cm,
        Self::Size8cm,
        Self::Size16cm,
        Self::Size32cm,
        Self::Size64cm,
        Self::Size128cm,
        Self::Size256cm,
        Self::Size512cm,
    ];

    /// Position in [`Resolution::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolution at the given index, if any.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < RESOLUTION_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Edge length in centimeters (increment units).
    #[inline]
    pub const fn size_cm(self) -> i32 {
        1 << (self as u32)
    }

    /// Edge length in meters.
    #[inline]
    pub const fn size_meters(self) -> f32 {
        SIZES_METERS[self as usize]
    }

    /// Half the edge length in meters.
    #[inline]
    pub fn half_size_meters(self) -> f32 {
        self.size_meters() * 0.5
    }

    /// Next larger resolution, if any.
    #[inline]
    pub const fn larger(self) -> Option<Self> {
        Self::from_index(self as usize + 1)
    }

    /// Next smaller resolution, if any.
    #[inline]
    pub const fn smaller(self) -> Option<Self> {
        match self {
            Self::Size1cm => None,
            _ => Self::from_index(self as usize - 1),
        }
    }
}

impl TryFrom<i32> for Resolution {
    type Error = Error;

    /// Look up a resolution by its edge length in centimeters.
    fn try_from(size_cm: i32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|res| res.size_cm() == size_cm)
            .ok_or(Error::InvalidResolution(size_cm))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}cm", self.size_cm())
    }
}
