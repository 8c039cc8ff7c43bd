//! Rig definition parsing.
//!
//! A rig is a JSON object whose `encodingVersion` (default 1) selects the
//! entity layout:
//!
//! - [`v1`]: positional arrays (`["name", progIdx]`).
//! - [`v2`]: objects with named fields, explicit floaters and traversals.
//!
//! Both layouts are lowered into the same [`RigDefinition`], with every cross
//! reference checked. Each entity is kept as a borrowed raw slice of the input
//! until it is read, so errors carry the byte offset of the offending entity.

pub mod v1;
pub mod v2;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::controller::SliderTarget;
use crate::error::{json_error_offset, ParseError, ParseErrorKind};
use crate::ids::{ComboId, ProgressionId, ShapeId, SliderId, TraversalId};
use crate::interp::Interp;
use crate::numeric::EPS;
use crate::progression::Progression;
use crate::topo::topo_order;

/// Top-level document with entity lists left unparsed.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument<'a> {
    #[serde(rename = "encodingVersion", borrow, default)]
    pub encoding_version: Option<&'a RawValue>,
    #[serde(borrow, default)]
    pub shapes: Vec<&'a RawValue>,
    #[serde(borrow, default)]
    pub progressions: Vec<&'a RawValue>,
    #[serde(borrow, default)]
    pub sliders: Vec<&'a RawValue>,
    #[serde(borrow, default)]
    pub combos: Vec<&'a RawValue>,
    #[serde(borrow, default)]
    pub floaters: Vec<&'a RawValue>,
    #[serde(borrow, default)]
    pub traversals: Vec<&'a RawValue>,
}

/// Entity lists of one document, in schema order, before validation.
#[derive(Debug, Default)]
pub(crate) struct RawRig {
    pub shapes: Vec<String>,
    pub progressions: Vec<Located<Progression>>,
    pub sliders: Vec<Located<SliderDef>>,
    pub combos: Vec<Located<ComboDef>>,
    pub floaters: Vec<Located<ComboDef>>,
    pub traversals: Vec<Located<RawTraversal>>,
}

/// A parsed entity and the byte offset it was read from.
#[derive(Debug, Clone)]
pub(crate) struct Located<T> {
    pub item: T,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderDef {
    pub name: String,
    pub prog: ProgressionId,
    pub enabled: bool,
}

/// A combo or floater: a set of sliders with target values.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboDef {
    pub name: String,
    pub prog: ProgressionId,
    pub pairs: Vec<SliderTarget>,
    pub enabled: bool,
}

impl ComboDef {
    /// Any target short of full travel makes this a floater.
    pub fn is_floater(&self) -> bool {
        self.pairs.iter().any(|p| (p.target.abs() - 1.0).abs() > EPS)
    }
}

/// Controller family named by a traversal's `progressType`/`multiplierType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    Slider,
    Combo,
    Traversal,
}

impl std::str::FromStr for ControlType {
    type Err = ParseErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slider" => Ok(ControlType::Slider),
            "combo" => Ok(ControlType::Combo),
            "traversal" => Ok(ControlType::Traversal),
            _ => Err(ParseErrorKind::UnknownControllerType(s.to_string())),
        }
    }
}

/// One traversal input as written in the schema (index into the schema list).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ControlInput {
    pub kind: ControlType,
    pub index: usize,
    pub flip: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawTraversal {
    pub name: String,
    pub prog: ProgressionId,
    pub progress: ControlInput,
    pub multiplier: ControlInput,
    pub enabled: bool,
}

/// A resolved traversal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRef {
    Slider(SliderId),
    Combo(ComboId),
    Traversal(TraversalId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraversalDef {
    pub name: String,
    pub prog: ProgressionId,
    pub progress: ControlRef,
    pub progress_flip: bool,
    pub multiplier: ControlRef,
    pub multiplier_flip: bool,
    pub enabled: bool,
}

/// A fully validated rig: every index is in range, floaters are separated
/// from combos and traversals have a dependency order.
#[derive(Debug, Clone, Default)]
pub struct RigDefinition {
    pub encoding_version: u64,
    pub shapes: Vec<String>,
    pub progressions: Vec<Progression>,
    pub sliders: Vec<SliderDef>,
    pub combos: Vec<ComboDef>,
    pub floaters: Vec<ComboDef>,
    pub traversals: Vec<TraversalDef>,
    /// Traversal indices ordered so sources precede their readers.
    pub traversal_order: Vec<TraversalId>,
}

/// Parse and validate a rig definition.
pub fn parse(text: &str) -> Result<RigDefinition, ParseError> {
    let doc: RawDocument<'_> =
        serde_json::from_str(text).map_err(|e| ParseError::syntax(&e, text))?;
    let (version, version_offset) = match doc.encoding_version {
        Some(raw) => {
            let v = read_entity::<u64>(text, raw, "encodingVersion", 0)?;
            (v.item, v.offset)
        }
        None => (1, 0),
    };
    let raw = match version {
        1 => v1::read(&doc, text)?,
        2 => v2::read(&doc, text)?,
        other => {
            return Err(ParseError::new(
                ParseErrorKind::UnsupportedVersion(other),
                version_offset,
            ));
        }
    };
    let mut rig = validate(raw)?;
    rig.encoding_version = version;
    Ok(rig)
}

/// Byte offset of `raw` inside `text`. `raw` must borrow from `text`.
fn offset_of(text: &str, raw: &RawValue) -> usize {
    (raw.get().as_ptr() as usize).saturating_sub(text.as_ptr() as usize)
}

/// Deserialize one entity, reporting failures at the entity's position.
pub(crate) fn read_entity<T: DeserializeOwned>(
    text: &str,
    raw: &RawValue,
    entity: &'static str,
    index: usize,
) -> Result<Located<T>, ParseError> {
    let offset = offset_of(text, raw);
    match serde_json::from_str(raw.get()) {
        Ok(item) => Ok(Located { item, offset }),
        Err(e) => Err(ParseError::new(
            ParseErrorKind::Malformed {
                entity,
                index,
                reason: e.to_string(),
            },
            offset + json_error_offset(&e, raw.get()),
        )),
    }
}

/// Build a progression from schema pairs, attaching the entity offset to errors.
pub(crate) fn make_progression(
    name: String,
    pairs: Vec<(Option<usize>, f64)>,
    interp: Option<&str>,
    index: usize,
    offset: usize,
) -> Result<Located<Progression>, ParseError> {
    let at = |kind| ParseError::new(kind, offset);
    if let Some((_, p)) = pairs.iter().find(|(_, p)| !p.is_finite()) {
        return Err(at(ParseErrorKind::Malformed {
            entity: "progression",
            index,
            reason: format!("position {p} is not finite"),
        }));
    }
    let interp: Interp = match interp {
        Some(s) => s.parse().map_err(at)?,
        None => Default::default(),
    };
    let pairs = pairs
        .into_iter()
        .map(|(s, p)| (s.map(ShapeId::from_index), p))
        .collect();
    let item = Progression::new(name, pairs, interp).map_err(at)?;
    Ok(Located { item, offset })
}

pub(crate) fn make_pairs(pairs: &[(usize, f64)]) -> Vec<SliderTarget> {
    pairs
        .iter()
        .map(|(s, t)| SliderTarget::new(SliderId::from_index(*s), *t))
        .collect()
}

/// Where a schema combo ended up after floaters were split off.
#[derive(Debug, Clone, Copy)]
enum ComboSlot {
    Combo(ComboId),
    Floater,
}

fn dangling(
    entity: &'static str,
    name: &str,
    target: &'static str,
    index: usize,
    offset: usize,
) -> ParseError {
    ParseError::new(
        ParseErrorKind::DanglingReference {
            entity,
            name: name.to_string(),
            target,
            index,
        },
        offset,
    )
}

fn check_pairs(
    entity: &'static str,
    index: usize,
    def: &Located<ComboDef>,
    sliders: usize,
) -> Result<(), ParseError> {
    let malformed = |reason: String| {
        ParseError::new(
            ParseErrorKind::Malformed {
                entity,
                index,
                reason,
            },
            def.offset,
        )
    };
    if def.item.pairs.is_empty() {
        return Err(malformed("no slider pairs".into()));
    }
    for (i, p) in def.item.pairs.iter().enumerate() {
        if p.slider.index() >= sliders {
            return Err(dangling(entity, &def.item.name, "slider", p.slider.index(), def.offset));
        }
        if !p.target.is_finite() || p.target.abs() < EPS || p.target.abs() > 1.0 + EPS {
            return Err(malformed(format!(
                "target {} must be non-zero and within [-1, 1]",
                p.target
            )));
        }
        if def.item.pairs[..i].iter().any(|q| q.slider == p.slider) {
            return Err(malformed(format!("slider {} listed twice", p.slider.index())));
        }
    }
    Ok(())
}

fn validate(raw: RawRig) -> Result<RigDefinition, ParseError> {
    let shape_count = raw.shapes.len();
    let prog_count = raw.progressions.len();
    let slider_count = raw.sliders.len();

    for p in &raw.progressions {
        for shape in p.item.shape_ids().iter().flatten() {
            if shape.index() >= shape_count {
                return Err(dangling("progression", p.item.name(), "shape", shape.index(), p.offset));
            }
        }
    }

    let check_prog = |entity, name: &str, prog: ProgressionId, offset| {
        if prog.index() >= prog_count {
            Err(dangling(entity, name, "progression", prog.index(), offset))
        } else {
            Ok(())
        }
    };

    for s in &raw.sliders {
        check_prog("slider", &s.item.name, s.item.prog, s.offset)?;
    }

    let mut combos = Vec::new();
    let mut floaters = Vec::new();
    for (i, f) in raw.floaters.iter().enumerate() {
        check_prog("floater", &f.item.name, f.item.prog, f.offset)?;
        check_pairs("floater", i, f, slider_count)?;
        floaters.push(f.item.clone());
    }
    let mut slots = Vec::with_capacity(raw.combos.len());
    for (i, c) in raw.combos.iter().enumerate() {
        check_prog("combo", &c.item.name, c.item.prog, c.offset)?;
        check_pairs("combo", i, c, slider_count)?;
        if c.item.is_floater() {
            slots.push(ComboSlot::Floater);
            floaters.push(c.item.clone());
        } else {
            slots.push(ComboSlot::Combo(ComboId::from_index(combos.len())));
            combos.push(c.item.clone());
        }
    }

    let traversal_count = raw.traversals.len();
    let mut traversals = Vec::with_capacity(traversal_count);
    let mut deps = Vec::with_capacity(traversal_count);
    for (i, t) in raw.traversals.iter().enumerate() {
        let name = &t.item.name;
        check_prog("traversal", name, t.item.prog, t.offset)?;
        let resolve = |input: ControlInput| -> Result<ControlRef, ParseError> {
            match input.kind {
                ControlType::Slider if input.index < slider_count => {
                    Ok(ControlRef::Slider(SliderId::from_index(input.index)))
                }
                ControlType::Slider => Err(dangling("traversal", name, "slider", input.index, t.offset)),
                ControlType::Combo => match slots.get(input.index) {
                    Some(ComboSlot::Combo(id)) => Ok(ControlRef::Combo(*id)),
                    Some(ComboSlot::Floater) => Err(ParseError::new(
                        ParseErrorKind::Malformed {
                            entity: "traversal",
                            index: i,
                            reason: format!("combo {} is a floater and cannot drive a traversal", input.index),
                        },
                        t.offset,
                    )),
                    None => Err(dangling("traversal", name, "combo", input.index, t.offset)),
                },
                ControlType::Traversal if input.index < traversal_count => {
                    Ok(ControlRef::Traversal(TraversalId::from_index(input.index)))
                }
                ControlType::Traversal => {
                    Err(dangling("traversal", name, "traversal", input.index, t.offset))
                }
            }
        };
        let progress = resolve(t.item.progress)?;
        let multiplier = resolve(t.item.multiplier)?;
        deps.push(
            [progress, multiplier]
                .iter()
                .filter_map(|r| match r {
                    ControlRef::Traversal(id) => Some(id.index()),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        );
        traversals.push(TraversalDef {
            name: name.clone(),
            prog: t.item.prog,
            progress,
            progress_flip: t.item.progress.flip,
            multiplier,
            multiplier_flip: t.item.multiplier.flip,
            enabled: t.item.enabled,
        });
    }

    let traversal_order = topo_order(&deps)
        .map_err(|stuck| {
            ParseError::new(
                ParseErrorKind::TraversalCycle(traversals[stuck].name.clone()),
                raw.traversals[stuck].offset,
            )
        })?
        .into_iter()
        .map(TraversalId::from_index)
        .collect();

    Ok(RigDefinition {
        encoding_version: 0,
        shapes: raw.shapes,
        progressions: raw.progressions.into_iter().map(|p| p.item).collect(),
        sliders: raw.sliders.into_iter().map(|s| s.item).collect(),
        combos,
        floaters,
        traversals,
        traversal_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_version_defaults_to_v1() {
        let rig = parse(r#"{"shapes": ["Rest"]}"#).unwrap();
        assert_eq!(rig.encoding_version, 1);
        assert_eq!(rig.shapes, vec!["Rest".to_string()]);
    }

    #[test]
    fn unsupported_version_points_at_its_value() {
        let text = r#"{"shapes": [], "encodingVersion": 9}"#;
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnsupportedVersion(9));
        assert_eq!(&text[err.offset..err.offset + 1], "9");
    }

    #[test]
    fn version_offset_ignores_lookalike_strings() {
        let text = r#"{"shapes": ["encodingVersion"], "encodingVersion": 7}"#;
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnsupportedVersion(7));
        assert_eq!(err.offset, text.rfind('7').unwrap());
    }

    #[test]
    fn non_integer_version_is_malformed() {
        let text = r#"{"encodingVersion": "two"}"#;
        let err = parse(text).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::Malformed { entity: "encodingVersion", .. }
        ));
        assert!(err.offset >= text.find("\"two\"").unwrap());
    }

    #[test]
    fn floater_combo_cannot_drive_a_traversal() {
        let text = r#"{
            "encodingVersion": 2,
            "shapes": [{"name": "Rest"}],
            "progressions": [{"name": "P", "pairs": [[0, 0.0]]}],
            "sliders": [{"name": "A", "prog": 0}, {"name": "B", "prog": 0}],
            "combos": [{"name": "A_halfB", "prog": 0, "pairs": [[0, 1.0], [1, 0.5]]}],
            "traversals": [{"name": "T", "prog": 0, "progressType": "combo", "progressControl": 0,
                "multiplierType": "slider", "multiplierControl": 0}]
        }"#;
        let err = parse(text).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Malformed { entity: "traversal", .. }));
        assert!(text[err.offset..].starts_with("{\"name\": \"T\""));
    }

    #[test]
    fn syntax_error_reports_offset() {
        let text = "{\"shapes\": [\"A\",, ]}";
        let err = parse(text).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Syntax(_)));
        assert_eq!(&text[err.offset..err.offset + 1], ",");
    }

    #[test]
    fn control_types_parse() {
        assert_eq!("Slider".parse::<ControlType>(), Ok(ControlType::Slider));
        assert_eq!("traversal".parse::<ControlType>(), Ok(ControlType::Traversal));
        assert!("floater".parse::<ControlType>().is_err());
    }

    #[test]
    fn fractional_targets_mark_floaters() {
        let def = |t: f64| ComboDef {
            name: "c".into(),
            prog: ProgressionId(0),
            pairs: vec![SliderTarget::new(SliderId(0), 1.0), SliderTarget::new(SliderId(1), t)],
            enabled: true,
        };
        assert!(!def(-1.0).is_floater());
        assert!(def(0.5).is_floater());
        assert!(def(-0.25).is_floater());
    }
}
