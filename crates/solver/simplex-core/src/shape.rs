//! Output shapes and the host handle side table.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ids::ShapeId;

/// A named output blend target. Its id is its slot in the solve output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    name: String,
    id: ShapeId,
}

impl Shape {
    pub fn new(name: impl Into<String>, id: ShapeId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.id.index()
    }
}

/// Opaque value a host attaches to a shape to find its own geometry.
/// The solver stores it and hands it back; it is never interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeHandle(pub u64);

/// Side table correlating shapes with host handles.
#[derive(Debug, Default, Clone)]
pub struct HandleTable {
    handles: HashMap<ShapeId, ShapeHandle>,
}

impl HandleTable {
    pub fn set(&mut self, shape: ShapeId, handle: ShapeHandle) -> Option<ShapeHandle> {
        self.handles.insert(shape, handle)
    }

    pub fn get(&self, shape: ShapeId) -> Option<ShapeHandle> {
        self.handles.get(&shape).copied()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
