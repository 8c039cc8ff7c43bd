//! Version 1 layout: positional arrays.
//!
//! ```json
//! {
//!   "shapes": ["Rest", "Smile"],
//!   "progressions": [["SmileProg", [0, 1], [0.0, 1.0], "linear"]],
//!   "sliders": [["Smile", 0]],
//!   "combos": [["Smile_Wide", 1, [[0, 1.0], [1, 1.0]]]]
//! }
//! ```
//!
//! Trailing array entries (such as falloff lists) are accepted and ignored.
//! Version 1 has no explicit floaters or traversals; combos with fractional
//! targets become floaters.

use serde::de::IgnoredAny;
use serde::Deserialize;

use super::{
    make_pairs, make_progression, read_entity, ComboDef, Located, RawDocument, RawRig, SliderDef,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::ids::ProgressionId;

#[derive(Debug, Deserialize)]
struct V1Progression(
    String,
    Vec<Option<usize>>,
    Vec<f64>,
    #[serde(default)] Option<String>,
    #[serde(default)] IgnoredAny,
);

#[derive(Debug, Deserialize)]
struct V1Slider(String, usize, #[serde(default)] IgnoredAny);

#[derive(Debug, Deserialize)]
struct V1Combo(String, usize, Vec<(usize, f64)>, #[serde(default)] IgnoredAny);

pub(crate) fn read(doc: &RawDocument<'_>, text: &str) -> Result<RawRig, ParseError> {
    let mut rig = RawRig::default();

    for (i, raw) in doc.shapes.iter().enumerate() {
        let shape: Located<String> = read_entity(text, raw, "shape", i)?;
        rig.shapes.push(shape.item);
    }

    for (i, raw) in doc.progressions.iter().enumerate() {
        let Located { item, offset } = read_entity::<V1Progression>(text, raw, "progression", i)?;
        let V1Progression(name, shapes, positions, interp, _) = item;
        if shapes.len() != positions.len() {
            return Err(ParseError::new(
                ParseErrorKind::Malformed {
                    entity: "progression",
                    index: i,
                    reason: format!(
                        "{} shapes but {} positions",
                        shapes.len(),
                        positions.len()
                    ),
                },
                offset,
            ));
        }
        let pairs = shapes.into_iter().zip(positions).collect();
        rig.progressions
            .push(make_progression(name, pairs, interp.as_deref(), i, offset)?);
    }

    for (i, raw) in doc.sliders.iter().enumerate() {
        let Located { item, offset } = read_entity::<V1Slider>(text, raw, "slider", i)?;
        rig.sliders.push(Located {
            item: SliderDef {
                name: item.0,
                prog: ProgressionId::from_index(item.1),
                enabled: true,
            },
            offset,
        });
    }

    for (i, raw) in doc.combos.iter().enumerate() {
        let Located { item, offset } = read_entity::<V1Combo>(text, raw, "combo", i)?;
        rig.combos.push(Located {
            item: ComboDef {
                name: item.0,
                prog: ProgressionId::from_index(item.1),
                pairs: make_pairs(&item.2),
                enabled: true,
            },
            offset,
        });
    }

    if !doc.floaters.is_empty() || !doc.traversals.is_empty() {
        log::warn!("encodingVersion 1 ignores floaters and traversals lists");
    }

    Ok(rig)
}

#[cfg(test)]
mod tests {
    use crate::error::ParseErrorKind;
    use crate::schema::parse;

    const RIG: &str = r#"{
        "encodingVersion": 1,
        "shapes": ["Rest", "A", "B", "AB"],
        "progressions": [
            ["AProg", [0, 1], [0.0, 1.0], "linear", []],
            ["BProg", [0, 2], [0.0, 1.0]],
            ["ABProg", [0, 3], [0.0, 1.0], "spline"]
        ],
        "sliders": [["A", 0], ["B", 1]],
        "combos": [["A_B", 2, [[0, 1.0], [1, 1.0]]], ["A_halfB", 2, [[0, 1.0], [1, 0.5]]]]
    }"#;

    #[test]
    fn reads_positional_entities() {
        let rig = parse(RIG).unwrap();
        assert_eq!(rig.shapes.len(), 4);
        assert_eq!(rig.progressions.len(), 3);
        assert_eq!(rig.sliders[1].name, "B");
        assert_eq!(rig.combos.len(), 1);
        assert_eq!(rig.combos[0].name, "A_B");
        assert_eq!(rig.floaters.len(), 1);
        assert_eq!(rig.floaters[0].name, "A_halfB");
    }

    #[test]
    fn mismatched_progression_lengths_fail() {
        let text = r#"{"shapes": ["Rest"], "progressions": [["P", [0, 0], [0.0]]]}"#;
        let err = parse(text).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Malformed { entity: "progression", .. }));
        assert!(text[err.offset..].starts_with("[\"P\""));
    }

    #[test]
    fn dangling_slider_reference_fails() {
        let text = r#"{
            "shapes": ["Rest", "AB"],
            "progressions": [["P", [0, 1], [0.0, 1.0]]],
            "sliders": [["A", 0]],
            "combos": [["A_B", 0, [[0, 1.0], [4, 1.0]]]]
        }"#;
        let err = parse(text).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::DanglingReference {
                entity: "combo",
                name: "A_B".into(),
                target: "slider",
                index: 4,
            }
        );
        assert!(text[err.offset..].starts_with("[\"A_B\""));
    }
}
