use super::*;

fn explicit_state(expr: &str, range_u: &str, range_v: &str) -> SurfaceState {
  SurfaceState::new(expr, range_u, range_v, AxisLabelSet::new("x", "y", "z"))
}

mod relabel {
  use super::*;

  #[test]
  fn updates_expr_then_labels() {
    let state = explicit_state("x^2+y", "[-1,1]", "[-1,1]");
    let updates = state
      .relabel(&SurfaceFamily::Explicit.alphabet(), "y", RewriteStrategy::Text)
      .unwrap();
    assert_eq!(
      updates,
      vec![
        PropertyUpdate::new(SurfaceProperty::Expr, "x^2+z"),
        PropertyUpdate::new(SurfaceProperty::LabelV, "z"),
        PropertyUpdate::new(SurfaceProperty::LabelW, "y"),
      ]
    );
  }

  #[test]
  fn ranges_are_rewritten() {
    let state = explicit_state("x y", "[-y,y]", "[0,1]");
    let updates = state
      .relabel(&SurfaceFamily::Explicit.alphabet(), "x", RewriteStrategy::Text)
      .unwrap();
    let properties: Vec<_> = updates.iter().map(|u| u.property).collect();
    assert_eq!(
      properties,
      vec![
        SurfaceProperty::Expr,
        SurfaceProperty::RangeU,
        SurfaceProperty::LabelU,
        SurfaceProperty::LabelV,
        SurfaceProperty::LabelW,
      ]
    );
    let next = state.apply(&updates);
    assert_eq!(next.expr, "y z");
    assert_eq!(next.range_u, "[-z,z]");
    assert_eq!(next.range_v, "[0,1]");
    assert_eq!(next.labels, AxisLabelSet::new("y", "z", "x"));
  }

  #[test]
  fn already_dependent_gives_no_updates() {
    let state = explicit_state("x^2+y", "[-1,1]", "[-1,1]");
    let updates = state
      .relabel(&SurfaceFamily::Explicit.alphabet(), "z", RewriteStrategy::Text)
      .unwrap();
    assert!(updates.is_empty());
    assert_eq!(state.apply(&updates), state);
  }

  #[test]
  fn relabeling_back_restores_the_state() {
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let state = explicit_state("x^2+y", "[-1,1]", "[-y,y]");
    let there = state.apply(
      &state.relabel(&alphabet, "x", RewriteStrategy::Text).unwrap(),
    );
    let back = there.apply(
      &there.relabel(&alphabet, "z", RewriteStrategy::Text).unwrap(),
    );
    assert_eq!(back, state);
  }

  #[test]
  fn tree_strategy() {
    let state = explicit_state("x^2+y", "[-1,1]", "[-1,1]");
    let updates = state
      .relabel(&SurfaceFamily::Explicit.alphabet(), "y", RewriteStrategy::Tree)
      .unwrap();
    assert_eq!(updates[0], PropertyUpdate::new(SurfaceProperty::Expr, "x^{2}+z"));
  }

  #[test]
  fn polar_relabel_keeps_commands_apart() {
    let state = SurfaceState::new(
      "r\\theta",
      "[0,1]",
      "[0,2\\pi]",
      AxisLabelSet::new("r", "\\theta", "z"),
    );
    let alphabet = SurfaceFamily::ExplicitPolar.alphabet();
    for strategy in [RewriteStrategy::Text, RewriteStrategy::Tree] {
      let next = state.apply(&state.relabel(&alphabet, "r", strategy).unwrap());
      assert_eq!(next.expr, "\\theta z");
      assert_eq!(next.labels, AxisLabelSet::new("\\theta", "z", "r"));
      let uses: Vec<String> =
        surface_relabel::parse(&next.expr).unwrap().free_variables().into_iter().collect();
      assert_eq!(uses, vec!["\\theta".to_string(), "z".to_string()]);
    }
  }

  #[test]
  fn implicit_products_are_relabeled_by_default() {
    let state = explicit_state("xy", "[-1,1]", "[-1,1]");
    let updates = state
      .relabel(&SurfaceFamily::Explicit.alphabet(), "x", RewriteStrategy::default())
      .unwrap();
    let next = state.apply(&updates);
    assert_eq!(next.expr, "y z");
    assert_eq!(next.labels, AxisLabelSet::new("y", "z", "x"));
    assert!(!surface_relabel::parse(&next.expr)
      .unwrap()
      .free_variables()
      .contains("x"));
  }

  #[test]
  fn invalid_labels_are_rejected() {
    let state = SurfaceState::new("u", "", "", AxisLabelSet::new("u", "v", "w"));
    assert!(state
      .relabel(&SurfaceFamily::Explicit.alphabet(), "x", RewriteStrategy::Text)
      .is_err());
  }
}

mod presentation {
  use super::*;

  #[test]
  fn prefixes() {
    let prefixes = FieldPrefixes::for_labels(&AxisLabelSet::new("u", "v", "w"));
    assert_eq!(prefixes.expr, "_f(u,v)=");
    assert_eq!(prefixes.range_u, "_f(v)=");
    assert_eq!(prefixes.range_v, "_f(u)=");
  }

  #[test]
  fn captions() {
    let state = SurfaceState::new(
      "r",
      "[0,1]",
      "[0,\\pi]",
      AxisLabelSet::new("r", "\\theta", "z"),
    );
    let captions = state.captions();
    assert_eq!(captions.range_u, "r\\in");
    assert_eq!(captions.range_v, "\\theta\\in");
    assert_eq!(captions.samples_u, "r samples");
    assert_eq!(captions.gridlines_v, "\\theta gridlines");
  }

  #[test]
  fn display_ranges() {
    let state =
      SurfaceState::new("", "v^2", "-1", AxisLabelSet::new("u", "v", "w"));
    let (range_u, range_v) = state.display_ranges(&LatexParser);
    assert_eq!(range_u, "_f(v)=v^2");
    assert_eq!(range_v, "-1");
  }

  #[test]
  fn property_names() {
    assert_eq!(SurfaceProperty::RangeU.to_string(), "rangeU");
    assert_eq!(SurfaceProperty::label_of(AxisSlot::W), SurfaceProperty::LabelW);
  }
}
