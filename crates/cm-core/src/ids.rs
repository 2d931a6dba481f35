//! Dense integer ids for places, transits, modes and occupants.
//!
//! Place, transit and mode ids are positions in the `Vec`s owned by the
//! city graph and mode registry, handed out from 0 with no gaps.
//! Occupant ids belong to the external agent model and are opaque here.
//! All ids order and hash like their integer, so they double as sort keys.

use std::fmt;

macro_rules! dense_id {
    ($(#[$attr:meta])* $name:ident($inner:ty), $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $inner);

        impl $name {
            /// Never handed out; marks "no such entity".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The id at position `index`, or `None` if it does not fit.
            #[inline]
            pub fn from_index(index: usize) -> Option<$name> {
                <$inner>::try_from(index)
                    .ok()
                    .filter(|&raw| raw != <$inner>::MAX)
                    .map($name)
            }

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, "#{}"), self.0)
                } else {
                    f.write_str(concat!($label, "#invalid"))
                }
            }
        }
    };
}

dense_id! {
    /// A place (graph node) in a `CityGraph`.
    PlaceId(u32), "place"
}

dense_id! {
    /// A directed, mode-specific transit (edge payload) in a `CityGraph`.
    TransitId(u32), "transit"
}

dense_id! {
    /// A mobility mode in a `ModeRegistry`.
    ///
    /// Assigned in ascending mode-name order, so comparing two `ModeId`s is
    /// the same as comparing the mode names lexicographically.
    ModeId(u16), "mode"
}

dense_id! {
    /// Handle of an occupant (an agent owned by the external model).
    OccupantId(u64), "occupant"
}
