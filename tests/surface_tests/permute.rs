use super::*;

fn labels(u: &str, v: &str, w: &str) -> AxisLabelSet {
  AxisLabelSet::new(u, v, w)
}

fn relabeled(outcome: RelabelOutcome) -> Relabel {
  match outcome {
    RelabelOutcome::Relabeled(relabel) => relabel,
    RelabelOutcome::Unchanged => panic!("expected a relabel"),
  }
}

mod choose_new_dependent {
  use super::*;

  #[test]
  fn requested_label_becomes_dependent() {
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let relabel = relabeled(
      choose_new_dependent(&alphabet, &labels("x", "y", "z"), AxisSlot::W, "y")
        .unwrap(),
    );
    assert_eq!(relabel.labels, labels("x", "z", "y"));
    assert_eq!(relabel.dependent, AxisSlot::W);
    assert_eq!(relabel.plan, SubstitutionPlan::from_iter([("y", "z")]));
    assert_eq!(relabel.changed, vec![AxisSlot::V, AxisSlot::W]);
  }

  #[test]
  fn first_label_moves_everything() {
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let relabel = relabeled(
      choose_new_dependent(&alphabet, &labels("x", "y", "z"), AxisSlot::W, "x")
        .unwrap(),
    );
    assert_eq!(relabel.labels, labels("y", "z", "x"));
    assert_eq!(relabel.plan.get("x"), Some("y"));
    assert_eq!(relabel.plan.get("y"), Some("z"));
    assert_eq!(relabel.changed, AxisSlot::ALL.to_vec());
  }

  #[test]
  fn already_dependent_is_unchanged() {
    let alphabet = SurfaceFamily::Parametric.alphabet();
    let outcome =
      choose_new_dependent(&alphabet, &labels("u", "v", "w"), AxisSlot::W, "w")
        .unwrap();
    assert!(outcome.is_unchanged());
    assert!(outcome.relabel().is_none());
  }

  #[test]
  fn polar_alphabet() {
    let alphabet = SurfaceFamily::ExplicitPolar.alphabet();
    let relabel = relabeled(
      choose_new_dependent(
        &alphabet,
        &labels("r", "\\theta", "z"),
        AxisSlot::W,
        "r",
      )
      .unwrap(),
    );
    assert_eq!(relabel.labels, labels("\\theta", "z", "r"));
    assert_eq!(relabel.plan.get("r"), Some("\\theta"));
    assert_eq!(relabel.plan.get("\\theta"), Some("z"));
  }

  #[test]
  fn independent_slots_follow_alphabet_order() {
    // From (y,x,z) the remaining labels are still placed as (x,z)
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let relabel = relabeled(
      choose_new_dependent(&alphabet, &labels("y", "x", "z"), AxisSlot::W, "y")
        .unwrap(),
    );
    assert_eq!(relabel.labels, labels("x", "z", "y"));
    assert_eq!(relabel.plan.get("y"), Some("x"));
    assert_eq!(relabel.plan.get("x"), Some("z"));
  }

  #[test]
  fn dependent_slot_other_than_w() {
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let current = labels("z", "x", "y");
    assert!(choose_new_dependent(&alphabet, &current, AxisSlot::U, "z")
      .unwrap()
      .is_unchanged());

    let relabel = relabeled(
      choose_new_dependent(&alphabet, &current, AxisSlot::U, "y").unwrap(),
    );
    assert_eq!(relabel.labels, labels("x", "z", "y"));
    assert_eq!(relabel.plan, SubstitutionPlan::from_iter([("y", "z")]));
    assert_eq!(relabel.changed, vec![AxisSlot::U, AxisSlot::V]);
  }

  #[test]
  fn custom_alphabet() {
    let alphabet: LabelAlphabet = "s, t, h".parse().unwrap();
    let relabel = relabeled(
      choose_new_dependent(&alphabet, &labels("s", "t", "h"), AxisSlot::W, "t")
        .unwrap(),
    );
    assert_eq!(relabel.labels, labels("s", "h", "t"));
  }
}

mod invalid_input {
  use super::*;

  #[test]
  fn unknown_requested_label() {
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let err =
      choose_new_dependent(&alphabet, &labels("x", "y", "z"), AxisSlot::W, "q")
        .unwrap_err();
    assert!(matches!(err, RelabelError::UnknownLabel { label } if label == "q"));
  }

  #[test]
  fn requested_text_is_not_a_label() {
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let err =
      choose_new_dependent(&alphabet, &labels("x", "y", "z"), AxisSlot::W, "x+y")
        .unwrap_err();
    assert!(matches!(err, RelabelError::InvalidLabel { .. }));
  }

  #[test]
  fn labels_outside_the_alphabet() {
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let err =
      choose_new_dependent(&alphabet, &labels("u", "v", "w"), AxisSlot::W, "x")
        .unwrap_err();
    assert!(matches!(err, RelabelError::InvalidLabelSet { .. }));
  }

  #[test]
  fn duplicate_labels() {
    let alphabet = SurfaceFamily::Explicit.alphabet();
    let err =
      choose_new_dependent(&alphabet, &labels("x", "x", "z"), AxisSlot::W, "y")
        .unwrap_err();
    assert!(matches!(err, RelabelError::InvalidLabelSet { .. }));
  }

  #[test]
  fn empty_label() {
    assert!(labels("x", "", "z").validate().is_err());
  }

  #[test]
  fn alphabet_needs_three_labels() {
    assert!("x,y".parse::<LabelAlphabet>().is_err());
    assert!("x,y,x".parse::<LabelAlphabet>().is_err());
    assert!("x,y,2".parse::<LabelAlphabet>().is_err());
    assert!("e,y,z".parse::<LabelAlphabet>().is_err());
  }
}

mod families {
  use super::*;

  #[test]
  fn type_tags_round_trip() {
    for family in SurfaceFamily::ALL {
      assert_eq!(SurfaceFamily::from_type_tag(family.type_tag()), Some(family));
    }
    assert_eq!(SurfaceFamily::from_type_tag("CURVE"), None);
  }

  #[test]
  fn descriptions() {
    assert_eq!(
      SurfaceFamily::ExplicitPolar.description(),
      "Explicit Surface (Polar)"
    );
    assert_eq!(SurfaceFamily::Parametric.alphabet().to_string(), "u,v,w");
  }
}
