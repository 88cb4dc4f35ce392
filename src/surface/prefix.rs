use log::{debug, trace};

use crate::parser::{FormulaParser, ParsedFormula};

/// The display prefix shown in front of a formula input, e.g. `_f(v)=`.
pub fn function_prefix(var: &str) -> String {
  format!("_f({})=", var)
}

/// Drop a `_f(var)=` prefix from `latex` when the body does not use `var`.
///
/// `prefix_length` is the byte length of the prefix in front of the body.
/// Anything that cannot be analyzed is returned as is.
pub fn strip_redundant_prefix<P: FormulaParser>(
  parser: &P,
  latex: &str,
  bound_var: &str,
  prefix_length: usize,
) -> String {
  let formula = match parser.parse(latex) {
    Ok(formula) => formula,
    Err(err) => {
      debug!("keeping `{}` as typed: {}", latex, err);
      return latex.to_string();
    }
  };
  if !formula.is_function_assignment() {
    return latex.to_string();
  }
  let Some(param) = formula.bound_parameter_name() else {
    return latex.to_string();
  };
  if param != bound_var {
    trace!("prefix of `{}` binds `{}`, not `{}`", latex, param, bound_var);
  }

  let Some(body_text) = latex.get(prefix_length..) else {
    debug!(
      "prefix length {} does not fit `{}`, keeping it as typed",
      prefix_length, latex
    );
    return latex.to_string();
  };
  let body = match parser.parse(body_text) {
    Ok(body) => body,
    Err(err) => {
      debug!("keeping `{}` as typed, body failed: {}", latex, err);
      return latex.to_string();
    }
  };

  if body.free_variables().contains(param) {
    latex.to_string()
  } else {
    body_text.to_string()
  }
}

/// [`strip_redundant_prefix`] with the prefix length taken from
/// [`function_prefix`].
pub fn strip_function_prefix<P: FormulaParser>(
  parser: &P,
  latex: &str,
  var: &str,
) -> String {
  strip_redundant_prefix(parser, latex, var, function_prefix(var).len())
}

/// A prefix stripper bound to one variable, for repeated use on a field.
pub struct PrefixStripper<'p, P> {
  parser: &'p P,
  bound_var: String,
  prefix: String,
}

impl<'p, P: FormulaParser> PrefixStripper<'p, P> {
  pub fn new(parser: &'p P, bound_var: impl Into<String>) -> Self {
    let bound_var = bound_var.into();
    let prefix = function_prefix(&bound_var);
    Self {
      parser,
      bound_var,
      prefix,
    }
  }

  pub fn prefix(&self) -> &str {
    &self.prefix
  }

  pub fn bound_var(&self) -> &str {
    &self.bound_var
  }

  pub fn strip(&self, latex: &str) -> String {
    strip_redundant_prefix(self.parser, latex, &self.bound_var, self.prefix.len())
  }

  /// Prefix `body` and strip it again: the text a range field displays.
  pub fn display(&self, body: &str) -> String {
    self.strip(&format!("{}{}", self.prefix, body))
  }
}
