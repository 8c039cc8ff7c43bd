use anyhow::{Context, Result};
use simplex_core::Simplex;

fn approx_slice(got: &[f64], want: &[f64], eps: f64, label: &str) {
    assert_eq!(got.len(), want.len(), "{label}: length");
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        assert!((g - w).abs() <= eps, "{label}: shape {i} left={g} right={w} eps={eps}");
    }
}

fn run_golden(name: &str) -> Result<()> {
    let rig = simplex_test_fixtures::goldens::rig(name)?;
    let json = simplex_test_fixtures::rigs::json(&rig)?;
    let mut simplex = Simplex::from_json(&json).with_context(|| format!("build rig {rig}"))?;
    for case in simplex_test_fixtures::goldens::cases(name)? {
        let label = format!("{name}/{}", case.label.as_deref().unwrap_or("?"));
        simplex.set_exact_solve(case.exact);
        let out = simplex
            .solve(&case.input)
            .with_context(|| format!("solve {label}"))?;
        approx_slice(&out, &case.output, 1e-6, &label);
    }
    Ok(())
}

#[test]
fn every_golden_set_matches() -> Result<()> {
    let keys = simplex_test_fixtures::goldens::keys();
    assert!(!keys.is_empty());
    for name in keys {
        run_golden(&name)?;
    }
    Ok(())
}

#[test]
fn v1_and_v2_smile_rigs_agree() -> Result<()> {
    let mut v1 = Simplex::from_json(&simplex_test_fixtures::rigs::json("smile-v1")?)?;
    let mut v2 = Simplex::from_json(&simplex_test_fixtures::rigs::json("smile-v2")?)?;
    for i in -10..=10 {
        let x = i as f64 / 10.0;
        assert_eq!(v1.solve(&[x])?, v2.solve(&[x])?, "input {x}");
    }
    Ok(())
}

#[test]
fn smile_scenario() -> Result<()> {
    let mut simplex = Simplex::new(&simplex_test_fixtures::rigs::json("smile-v2")?);
    assert!(simplex.is_loaded());
    assert!(simplex.is_built());
    assert!(!simplex.has_parse_error());

    let names: Vec<_> = simplex.shapes().iter().map(|s| s.name()).collect();
    assert_eq!(names, ["Smile", "Frown"]);

    assert_eq!(simplex.solve(&[1.0])?, vec![1.0, 0.0]);
    assert_eq!(simplex.solve(&[-0.5])?, vec![0.0, 0.5]);
    Ok(())
}

#[test]
fn floater_center_hits_full_weight() -> Result<()> {
    let mut simplex = Simplex::from_json(&simplex_test_fixtures::rigs::json("floater-square")?)?;
    assert_eq!(simplex.spaces().len(), 1);
    let floater = simplex.find_controller("HalfPuff").expect("floater");
    assert_eq!(floater.kind().label(), "floater");

    let out = simplex.solve(&[0.5, 0.5])?;
    assert_eq!(out[2], 1.0);
    assert_eq!(simplex.find_controller("HalfPuff").map(|c| c.value()), Some(1.0));
    Ok(())
}

#[test]
fn traversal_runs_after_its_source() -> Result<()> {
    let simplex = Simplex::from_json(&simplex_test_fixtures::rigs::json("traversal")?)?;
    let order: Vec<_> = simplex.controllers().iter().map(|c| c.name()).collect();
    assert_eq!(order, ["Open", "Wide", "OpenWide", "Echo"]);
    Ok(())
}
