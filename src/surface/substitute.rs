use std::fmt;

use log::{debug, trace};

use crate::syntax::expr_to_latex;

/// Old label to new label, applied in a single pass over the original text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionPlan {
  entries: Vec<(String, String)>,
}

impl SubstitutionPlan {
  pub fn new() -> Self {
    Self::default()
  }

  /// Identity entries are dropped; a repeated `old` replaces its entry.
  pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
    let old = old.into();
    let new = new.into();
    self.entries.retain(|(o, _)| *o != old);
    if old != new && !old.is_empty() {
      self.entries.push((old, new));
    }
  }

  pub fn get(&self, old: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(o, _)| o == old)
      .map(|(_, n)| n.as_str())
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(o, n)| (o.as_str(), n.as_str()))
  }
}

impl<O: Into<String>, N: Into<String>> FromIterator<(O, N)>
  for SubstitutionPlan
{
  fn from_iter<I: IntoIterator<Item = (O, N)>>(iter: I) -> Self {
    let mut plan = SubstitutionPlan::new();
    for (old, new) in iter {
      plan.insert(old, new);
    }
    plan
  }
}

impl fmt::Display for SubstitutionPlan {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> =
      self.iter().map(|(o, n)| format!("{} -> {}", o, n)).collect();
    write!(f, "{{{}}}", parts.join(", "))
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RewriteStrategy {
  /// Token substitution on the text as typed. Formatting is preserved, but
  /// labels juxtaposed without a separator (`xy`) are not seen.
  Text,
  /// Rename identifiers on the parsed tree and re-serialize. Falls back to
  /// `Text` when the formula does not parse.
  #[default]
  Tree,
}

/// Replace every free occurrence of the plan's old labels.
///
/// A label only matches as a whole token. It may not be followed by an
/// ASCII letter or `_`, and it may not sit inside a subscript (`a_x`,
/// `a_{x}`). A label starting with a letter may not be preceded by one
/// either, so `u` is left alone inside `sum` or `\mu`. Matches are looked
/// up in the original text only, which makes swaps like `u -> v, v -> u`
/// exact. A command label written in front of a letter gets a space so the
/// two do not merge into one command.
pub fn substitute_labels(expr: &str, plan: &SubstitutionPlan) -> String {
  if plan.is_empty() {
    return expr.to_string();
  }

  // Longest label first; the stable sort keeps plan order on ties
  let mut candidates: Vec<(&str, &str)> = plan.iter().collect();
  candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

  let mut result = String::with_capacity(expr.len());
  let mut open_command = false;
  let mut pos = 0;

  while let Some(c) = expr[pos..].chars().next() {
    let before = &expr[..pos];
    let rest = &expr[pos..];
    let hit = candidates.iter().find(|(old, _)| {
      rest.starts_with(old) && is_whole_token(before, old, &rest[old.len()..])
    });
    let (piece, consumed) = match hit {
      Some((old, new)) => {
        trace!("substituting `{}` with `{}`", old, new);
        (*new, old.len())
      }
      None => (&rest[..c.len_utf8()], c.len_utf8()),
    };
    if open_command && piece.starts_with(|c: char| c.is_ascii_alphabetic()) {
      result.push(' ');
    }
    result.push_str(piece);
    open_command = hit.is_some() && ends_in_command_name(piece);
    pos += consumed;
  }

  result
}

fn is_whole_token(before: &str, label: &str, after: &str) -> bool {
  let is_letter = |c: char| c.is_ascii_alphabetic();
  let in_subscript = before.ends_with('_') || before.ends_with("_{");
  // `\theta` ends any identifier before it
  let start_ok = !in_subscript
    && (label.starts_with('\\') || !before.chars().last().is_some_and(is_letter));
  let end_ok = !after
    .chars()
    .next()
    .is_some_and(|c| is_letter(c) || c == '_');
  start_ok && end_ok
}

/// `\theta` but not `\theta_1` or `x`.
fn ends_in_command_name(text: &str) -> bool {
  text.starts_with('\\') && text.ends_with(|c: char| c.is_ascii_alphabetic())
}

/// Apply `plan` to formula text with the chosen strategy.
pub fn rewrite_labels(
  expr: &str,
  plan: &SubstitutionPlan,
  strategy: RewriteStrategy,
) -> String {
  match strategy {
    RewriteStrategy::Text => substitute_labels(expr, plan),
    RewriteStrategy::Tree => {
      if plan.is_empty() || expr.trim().is_empty() {
        return expr.to_string();
      }
      match crate::parse(expr) {
        Ok(tree) => {
          let uses_plan = tree
            .free_variables()
            .iter()
            .any(|name| plan.get(name).is_some());
          if !uses_plan {
            return expr.to_string();
          }
          let renamed =
            tree.rename_identifiers(&|name: &str| plan.get(name).map(String::from));
          expr_to_latex(&renamed)
        }
        Err(err) => {
          debug!(
            "tree rewrite of `{}` failed ({}), substituting tokens instead",
            expr, err
          );
          substitute_labels(expr, plan)
        }
      }
    }
  }
}
