//! Identifiers for solver entities.
//!
//! Every id is a dense index into the owning collection of [`Simplex`](crate::Simplex).
//! Schema-level ids (`ShapeId`, `SliderId`, ...) follow parse order; `ControllerId`
//! follows solve order.

use serde::{Deserialize, Serialize};

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

dense_id!(
    /// Index of a shape in parse order; also its slot in the solve output.
    ShapeId
);
dense_id!(ProgressionId);
dense_id!(
    /// Index of a slider in parse order; also its slot in the solve input.
    SliderId
);
dense_id!(ComboId);
dense_id!(TraversalId);
dense_id!(FloaterId);
dense_id!(
    /// Position of a controller in the solve-ordered controller list.
    ControllerId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_index() {
        assert_eq!(ShapeId::from_index(3).index(), 3);
        assert_eq!(ControllerId::from_index(0), ControllerId(0));
        assert!(SliderId(1) < SliderId(2));
    }
}
