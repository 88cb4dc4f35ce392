//! The boundary between the relabeling core and whatever turns formula text
//! into a tree. The core only needs to know whether a formula is a function
//! assignment, what its parameter is called, and which variables it uses.

use std::collections::BTreeSet;
use std::fmt::Display;

use crate::syntax::Expr;
use crate::{LatexParser, RelabelError};

pub trait FormulaParser {
  type Formula: ParsedFormula;
  type Error: Display;

  fn parse(&self, text: &str) -> Result<Self::Formula, Self::Error>;
}

pub trait ParsedFormula {
  /// True for `f(var) = body` at the root.
  fn is_function_assignment(&self) -> bool;

  /// First declared parameter of a function assignment.
  fn bound_parameter_name(&self) -> Option<&str>;

  /// Dependency set: the free variable names the formula references.
  fn free_variables(&self) -> BTreeSet<String>;
}

impl FormulaParser for LatexParser {
  type Formula = Expr;
  type Error = RelabelError;

  fn parse(&self, text: &str) -> Result<Expr, RelabelError> {
    crate::parse(text)
  }
}

impl ParsedFormula for Expr {
  fn is_function_assignment(&self) -> bool {
    Expr::is_function_assignment(self)
  }

  fn bound_parameter_name(&self) -> Option<&str> {
    self
      .assignment_params()
      .and_then(|params| params.first())
      .map(String::as_str)
  }

  fn free_variables(&self) -> BTreeSet<String> {
    Expr::free_variables(self)
  }
}
