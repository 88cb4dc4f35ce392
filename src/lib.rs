//! Axis relabeling and formula-prefix analysis for 3D surface plots.
//!
//! A surface is a function of two independent axis labels producing a
//! dependent one. Choosing a different dependent label permutes the three
//! labels and rewrites every formula of the surface to match, while the
//! prefix analyzer decides whether a `_f(v)=` prefix shown in front of a
//! range formula carries any meaning.
//!
//! ```
//! use surface_relabel::surface::{AxisLabelSet, RewriteStrategy, SurfaceFamily, SurfaceState};
//!
//! let alphabet = SurfaceFamily::Explicit.alphabet();
//! let state = SurfaceState::new("x^2+y", "[-1,1]", "[-1,1]", AxisLabelSet::new("x", "y", "z"));
//! let updates = state.relabel(&alphabet, "y", RewriteStrategy::Text).unwrap();
//! let relabeled = state.apply(&updates);
//! assert_eq!(relabeled.expr, "x^2+z");
//! assert_eq!(relabeled.labels, AxisLabelSet::new("x", "z", "y"));
//! ```

use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

pub mod parser;
pub mod surface;
pub mod syntax;

pub use parser::{FormulaParser, ParsedFormula};

#[derive(Parser)]
#[grammar = "latex.pest"]
pub struct LatexParser;

#[derive(Error, Debug)]
pub enum RelabelError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty input")]
  EmptyInput,
  #[error("Invalid label set: {reason}")]
  InvalidLabelSet { reason: String },
  #[error("Label `{label}` is not part of the alphabet")]
  UnknownLabel { label: String },
  #[error("`{label}` is not a valid axis label")]
  InvalidLabel { label: String },
  #[error("Invalid number literal `{text}`")]
  InvalidNumber { text: String },
}

pub type RelabelResult<T> = Result<T, RelabelError>;

impl LatexParser {
  pub fn parse_formula(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    <Self as Parser<Rule>>::parse(Rule::Formula, input).map_err(Box::new)
  }

  /// Whether `text` is a single label token (`x`, `\theta`, `x_1`). The
  /// constant `e` is not.
  pub fn is_label(text: &str) -> bool {
    <Self as Parser<Rule>>::parse(Rule::Label, text).is_ok()
  }
}

/// Parse formula text into a syntax tree.
pub fn parse(input: &str) -> RelabelResult<syntax::Expr> {
  if input.trim().is_empty() {
    return Err(RelabelError::EmptyInput);
  }
  let formula = LatexParser::parse_formula(input)?
    .next()
    .ok_or(RelabelError::EmptyInput)?;
  // Formula = SOI ~ (FunctionAssignment | Expression) ~ EOI
  let root = formula
    .into_inner()
    .find(|pair| pair.as_rule() != Rule::EOI)
    .ok_or(RelabelError::EmptyInput)?;
  syntax::pair_to_expr(root)
}
