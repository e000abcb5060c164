//! Dense index types.
//!
//! Sites, stands, management areas, species and prescriptions all live in
//! `Vec`s and are addressed by position.  Each kind gets its own newtype, so a
//! stand index cannot be used to look up a site.  Ids are `Ord`, and
//! ascending id order is the deterministic tie-break wherever ranks are equal.

macro_rules! dense_id {
    ($(#[$attr:meta])* $name:ident($inner:ty) => $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $inner);

        impl $name {
            /// Position in the owning store.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The id at position `i`, or `None` if `i` overflows the id width.
            #[inline]
            pub fn from_index(i: usize) -> Option<Self> {
                <$inner>::try_from(i).ok().map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

dense_id! {
    /// One active raster cell, indexing the `SiteStore` columns.
    SiteId(u32) => "site"
}

dense_id! {
    /// A stand, in the order its map code was first seen.
    StandId(u32) => "stand"
}

dense_id! {
    /// A management area, in the order its map code was first seen.
    MgmtAreaId(u16) => "area"
}

dense_id! {
    SpeciesId(u16) => "species"
}

dense_id! {
    /// One application of a prescription to a management area.
    PrescriptionId(u16) => "rx"
}
