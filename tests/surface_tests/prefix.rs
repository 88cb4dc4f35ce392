use super::*;

use std::collections::BTreeSet;

use surface_relabel::{FormulaParser, ParsedFormula};

/// Parser that rejects everything.
struct Rejecting;

impl FormulaParser for Rejecting {
  type Formula = Opaque;
  type Error = String;

  fn parse(&self, text: &str) -> Result<Opaque, String> {
    Err(format!("cannot read `{}`", text))
  }
}

struct Opaque;

impl ParsedFormula for Opaque {
  fn is_function_assignment(&self) -> bool {
    false
  }

  fn bound_parameter_name(&self) -> Option<&str> {
    None
  }

  fn free_variables(&self) -> BTreeSet<String> {
    BTreeSet::new()
  }
}

#[test]
fn function_prefixes() {
  assert_eq!(function_prefix("v"), "_f(v)=");
  assert_eq!(function_prefix("\\theta"), "_f(\\theta)=");
}

mod strip_function_prefix {
  use super::*;

  #[test]
  fn constant_body_drops_prefix() {
    assert_eq!(strip_function_prefix(&LatexParser, "_f(v)=-1", "v"), "-1");
  }

  #[test]
  fn dependent_body_keeps_prefix() {
    assert_eq!(
      strip_function_prefix(&LatexParser, "_f(v)=v^2", "v"),
      "_f(v)=v^2"
    );
  }

  #[test]
  fn other_variables_do_not_count() {
    assert_eq!(
      strip_function_prefix(&LatexParser, "_f(v)=2u", "v"),
      "2u"
    );
  }

  #[test]
  fn command_parameter() {
    assert_eq!(
      strip_function_prefix(&LatexParser, "_f(\\theta)=\\pi", "\\theta"),
      "\\pi"
    );
    assert_eq!(
      strip_function_prefix(&LatexParser, "_f(\\theta)=2\\theta", "\\theta"),
      "_f(\\theta)=2\\theta"
    );
  }

  #[test]
  fn empty_body_is_kept_as_typed() {
    assert_eq!(strip_function_prefix(&LatexParser, "_f(v)=", "v"), "_f(v)=");
  }

  #[test]
  fn plain_expression_is_kept() {
    assert_eq!(strip_function_prefix(&LatexParser, "u^2", "v"), "u^2");
  }

  #[test]
  fn unparsable_input_is_kept() {
    assert_eq!(strip_function_prefix(&LatexParser, "_f(v)=(1", "v"), "_f(v)=(1");
    assert_eq!(strip_function_prefix(&Rejecting, "_f(v)=1", "v"), "_f(v)=1");
  }
}

mod strip_redundant_prefix {
  use super::*;

  #[test]
  fn prefix_length_out_of_range() {
    assert_eq!(
      strip_redundant_prefix(&LatexParser, "_f(v)=1", "v", 100),
      "_f(v)=1"
    );
  }

  #[test]
  fn declared_parameter_decides() {
    // The prefix binds `u`, so the body is checked against `u`
    assert_eq!(
      strip_redundant_prefix(&LatexParser, "_f(u)=v", "v", 6),
      "v"
    );
    assert_eq!(
      strip_redundant_prefix(&LatexParser, "_f(u)=u", "v", 6),
      "_f(u)=u"
    );
  }
}

mod prefix_stripper {
  use super::*;

  #[test]
  fn display_prefixes_and_strips() {
    let stripper = PrefixStripper::new(&LatexParser, "v");
    assert_eq!(stripper.prefix(), "_f(v)=");
    assert_eq!(stripper.bound_var(), "v");
    assert_eq!(stripper.display("[0,1]"), "[0,1]");
    assert_eq!(stripper.display("\\sin v"), "_f(v)=\\sin v");
  }

  #[test]
  fn strip_reuses_the_bound_variable() {
    let stripper = PrefixStripper::new(&LatexParser, "u");
    assert_eq!(stripper.strip("_f(u)=1"), "1");
    assert_eq!(stripper.strip("_f(u)=u+1"), "_f(u)=u+1");
  }
}
