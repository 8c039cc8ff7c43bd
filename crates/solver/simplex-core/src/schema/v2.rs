//! Version 2 layout: named-field objects.
//!
//! ```json
//! {
//!   "encodingVersion": 2,
//!   "shapes": [{"name": "Rest"}, {"name": "Smile"}],
//!   "progressions": [{"name": "SmileProg", "pairs": [[0, 0.0], [1, 1.0]], "interp": "spline"}],
//!   "sliders": [{"name": "Smile", "prog": 0}],
//!   "combos": [],
//!   "floaters": [],
//!   "traversals": [{
//!     "name": "SmileTrav", "prog": 0,
//!     "progressType": "slider", "progressControl": 0,
//!     "multiplierType": "slider", "multiplierControl": 0, "multiplierFlip": true
//!   }]
//! }
//! ```

use serde::Deserialize;

use super::{
    make_pairs, make_progression, read_entity, ComboDef, ControlInput, ControlType, Located,
    RawDocument, RawRig, RawTraversal, SliderDef,
};
use crate::error::ParseError;
use crate::ids::ProgressionId;

fn enabled_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ShapeEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProgressionEntry {
    name: String,
    #[serde(default)]
    pairs: Vec<(Option<usize>, f64)>,
    #[serde(default)]
    interp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SliderEntry {
    name: String,
    prog: usize,
    #[serde(default = "enabled_default")]
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct ComboEntry {
    name: String,
    prog: usize,
    pairs: Vec<(usize, f64)>,
    #[serde(default = "enabled_default")]
    enabled: bool,
}

impl ComboEntry {
    fn into_def(self) -> ComboDef {
        ComboDef {
            name: self.name,
            prog: ProgressionId::from_index(self.prog),
            pairs: make_pairs(&self.pairs),
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TraversalEntry {
    name: String,
    prog: usize,
    progress_type: String,
    progress_control: usize,
    #[serde(default)]
    progress_flip: bool,
    multiplier_type: String,
    multiplier_control: usize,
    #[serde(default)]
    multiplier_flip: bool,
    #[serde(default = "enabled_default")]
    enabled: bool,
}

pub(crate) fn read(doc: &RawDocument<'_>, text: &str) -> Result<RawRig, ParseError> {
    let mut rig = RawRig::default();

    for (i, raw) in doc.shapes.iter().enumerate() {
        let shape: Located<ShapeEntry> = read_entity(text, raw, "shape", i)?;
        rig.shapes.push(shape.item.name);
    }

    for (i, raw) in doc.progressions.iter().enumerate() {
        let Located { item, offset } =
            read_entity::<ProgressionEntry>(text, raw, "progression", i)?;
        rig.progressions.push(make_progression(
            item.name,
            item.pairs,
            item.interp.as_deref(),
            i,
            offset,
        )?);
    }

    for (i, raw) in doc.sliders.iter().enumerate() {
        let Located { item, offset } = read_entity::<SliderEntry>(text, raw, "slider", i)?;
        rig.sliders.push(Located {
            item: SliderDef {
                name: item.name,
                prog: ProgressionId::from_index(item.prog),
                enabled: item.enabled,
            },
            offset,
        });
    }

    for (i, raw) in doc.combos.iter().enumerate() {
        let Located { item, offset } = read_entity::<ComboEntry>(text, raw, "combo", i)?;
        rig.combos.push(Located {
            item: item.into_def(),
            offset,
        });
    }

    for (i, raw) in doc.floaters.iter().enumerate() {
        let Located { item, offset } = read_entity::<ComboEntry>(text, raw, "floater", i)?;
        rig.floaters.push(Located {
            item: item.into_def(),
            offset,
        });
    }

    for (i, raw) in doc.traversals.iter().enumerate() {
        let Located { item, offset } = read_entity::<TraversalEntry>(text, raw, "traversal", i)?;
        let control = |kind: &str, index: usize, flip: bool| -> Result<ControlInput, ParseError> {
            let kind: ControlType = kind.parse().map_err(|k| ParseError::new(k, offset))?;
            Ok(ControlInput { kind, index, flip })
        };
        let progress = control(&item.progress_type, item.progress_control, item.progress_flip)?;
        let multiplier = control(
            &item.multiplier_type,
            item.multiplier_control,
            item.multiplier_flip,
        )?;
        rig.traversals.push(Located {
            item: RawTraversal {
                name: item.name,
                prog: ProgressionId::from_index(item.prog),
                progress,
                multiplier,
                enabled: item.enabled,
            },
            offset,
        });
    }

    Ok(rig)
}
