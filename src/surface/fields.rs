use std::fmt;

use log::trace;

use super::labels::{AxisLabelSet, AxisSlot, LabelAlphabet};
use super::permute::{choose_new_dependent, RelabelOutcome};
use super::prefix::{function_prefix, PrefixStripper};
use super::substitute::{rewrite_labels, RewriteStrategy};
use crate::parser::FormulaParser;
use crate::RelabelResult;

/// Stored properties of a surface that a relabel may update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceProperty {
  Expr,
  RangeU,
  RangeV,
  LabelU,
  LabelV,
  LabelW,
}

impl SurfaceProperty {
  pub fn name(self) -> &'static str {
    match self {
      SurfaceProperty::Expr => "expr",
      SurfaceProperty::RangeU => "rangeU",
      SurfaceProperty::RangeV => "rangeV",
      SurfaceProperty::LabelU => "labelU",
      SurfaceProperty::LabelV => "labelV",
      SurfaceProperty::LabelW => "labelW",
    }
  }

  pub fn label_of(slot: AxisSlot) -> Self {
    match slot {
      AxisSlot::U => SurfaceProperty::LabelU,
      AxisSlot::V => SurfaceProperty::LabelV,
      AxisSlot::W => SurfaceProperty::LabelW,
    }
  }
}

impl fmt::Display for SurfaceProperty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyUpdate {
  pub property: SurfaceProperty,
  pub value: String,
}

impl PropertyUpdate {
  pub fn new(property: SurfaceProperty, value: impl Into<String>) -> Self {
    Self {
      property,
      value: value.into(),
    }
  }
}

/// The relabel-relevant part of a surface: its formula, the two range
/// formulas and the label triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceState {
  pub expr: String,
  pub range_u: String,
  pub range_v: String,
  pub labels: AxisLabelSet,
}

impl SurfaceState {
  pub fn new(
    expr: impl Into<String>,
    range_u: impl Into<String>,
    range_v: impl Into<String>,
    labels: AxisLabelSet,
  ) -> Self {
    Self {
      expr: expr.into(),
      range_u: range_u.into(),
      range_v: range_v.into(),
      labels,
    }
  }

  /// Make `requested` the dependent label.
  ///
  /// Returns the updates in the order they should be stored: rewritten
  /// formulas first, then changed labels. Properties that stay the same are
  /// left out, and an already dependent label yields no updates at all.
  pub fn relabel(
    &self,
    alphabet: &LabelAlphabet,
    requested: &str,
    strategy: RewriteStrategy,
  ) -> RelabelResult<Vec<PropertyUpdate>> {
    let outcome =
      choose_new_dependent(alphabet, &self.labels, AxisSlot::W, requested)?;
    let relabel = match outcome {
      RelabelOutcome::Unchanged => return Ok(Vec::new()),
      RelabelOutcome::Relabeled(relabel) => relabel,
    };

    let mut updates = Vec::new();
    let texts = [
      (SurfaceProperty::Expr, &self.expr),
      (SurfaceProperty::RangeU, &self.range_u),
      (SurfaceProperty::RangeV, &self.range_v),
    ];
    for (property, text) in texts {
      let rewritten = rewrite_labels(text, &relabel.plan, strategy);
      if rewritten != *text {
        trace!("{}: `{}` -> `{}`", property, text, rewritten);
        updates.push(PropertyUpdate::new(property, rewritten));
      }
    }
    for slot in &relabel.changed {
      updates.push(PropertyUpdate::new(
        SurfaceProperty::label_of(*slot),
        relabel.labels.get(*slot),
      ));
    }
    Ok(updates)
  }

  pub fn apply(&self, updates: &[PropertyUpdate]) -> SurfaceState {
    let mut next = self.clone();
    for update in updates {
      let value = update.value.clone();
      match update.property {
        SurfaceProperty::Expr => next.expr = value,
        SurfaceProperty::RangeU => next.range_u = value,
        SurfaceProperty::RangeV => next.range_v = value,
        SurfaceProperty::LabelU => next.labels.set(AxisSlot::U, value),
        SurfaceProperty::LabelV => next.labels.set(AxisSlot::V, value),
        SurfaceProperty::LabelW => next.labels.set(AxisSlot::W, value),
      }
    }
    next
  }

  pub fn prefixes(&self) -> FieldPrefixes {
    FieldPrefixes::for_labels(&self.labels)
  }

  pub fn captions(&self) -> FieldCaptions {
    FieldCaptions::for_labels(&self.labels)
  }

  /// Range formulas as their inputs show them: `rangeU` may depend on `V`
  /// and `rangeV` on `U`, and the `_f(..)=` prefix is only kept when it
  /// does.
  pub fn display_ranges<P: FormulaParser>(&self, parser: &P) -> (String, String) {
    let range_u = PrefixStripper::new(parser, &self.labels.v).display(&self.range_u);
    let range_v = PrefixStripper::new(parser, &self.labels.u).display(&self.range_v);
    (range_u, range_v)
  }
}

/// Prefixes shown in front of the formula inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPrefixes {
  pub expr: String,
  pub range_u: String,
  pub range_v: String,
}

impl FieldPrefixes {
  pub fn for_labels(labels: &AxisLabelSet) -> Self {
    Self {
      expr: format!("_f({},{})=", labels.u, labels.v),
      range_u: function_prefix(&labels.v),
      range_v: function_prefix(&labels.u),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCaptions {
  pub range_u: String,
  pub range_v: String,
  pub samples_u: String,
  pub samples_v: String,
  pub gridlines_u: String,
  pub gridlines_v: String,
}

impl FieldCaptions {
  pub fn for_labels(labels: &AxisLabelSet) -> Self {
    Self {
      range_u: format!("{}\\in", labels.u),
      range_v: format!("{}\\in", labels.v),
      samples_u: format!("{} samples", labels.u),
      samples_v: format!("{} samples", labels.v),
      gridlines_u: format!("{} gridlines", labels.u),
      gridlines_v: format!("{} gridlines", labels.v),
    }
  }
}
