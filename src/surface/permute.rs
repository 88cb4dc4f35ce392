use log::{debug, trace};

use super::labels::{AxisLabelSet, AxisSlot, LabelAlphabet};
use super::substitute::SubstitutionPlan;
use crate::{LatexParser, RelabelError, RelabelResult};

/// A relabel that changes something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relabel {
  pub labels: AxisLabelSet,
  /// Always `AxisSlot::W`: the requested label moves into the dependent slot.
  pub dependent: AxisSlot,
  /// Old independent label to new independent label.
  pub plan: SubstitutionPlan,
  /// Slots whose label differs from before, in slot order.
  pub changed: Vec<AxisSlot>,
}

impl Relabel {
  pub fn label_changed(&self, slot: AxisSlot) -> bool {
    self.changed.contains(&slot)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelabelOutcome {
  /// The requested label is already dependent; nothing to rewrite.
  Unchanged,
  Relabeled(Relabel),
}

impl RelabelOutcome {
  pub fn is_unchanged(&self) -> bool {
    matches!(self, RelabelOutcome::Unchanged)
  }

  pub fn relabel(&self) -> Option<&Relabel> {
    match self {
      RelabelOutcome::Unchanged => None,
      RelabelOutcome::Relabeled(relabel) => Some(relabel),
    }
  }
}

/// Make `requested` the dependent label.
///
/// The two labels left over are assigned to the independent slots in
/// ascending alphabet order, so toggling back and forth always produces
/// the same triple for the same dependent label.
pub fn choose_new_dependent(
  alphabet: &LabelAlphabet,
  current: &AxisLabelSet,
  current_dependent: AxisSlot,
  requested: &str,
) -> RelabelResult<RelabelOutcome> {
  current.validate()?;
  for slot in AxisSlot::ALL {
    let label = current.get(slot);
    if !alphabet.contains(label) {
      return Err(RelabelError::InvalidLabelSet {
        reason: format!(
          "`{}` in slot {} is not part of the alphabet {}",
          label, slot, alphabet
        ),
      });
    }
  }
  if !LatexParser::is_label(requested) {
    return Err(RelabelError::InvalidLabel {
      label: requested.to_string(),
    });
  }
  let key = alphabet
    .index_of(requested)
    .ok_or_else(|| RelabelError::UnknownLabel {
      label: requested.to_string(),
    })?;

  if current.get(current_dependent) == requested {
    debug!("`{}` is already the dependent label", requested);
    return Ok(RelabelOutcome::Unchanged);
  }

  let (lo, hi) = independent_indices(key);
  let names = alphabet.labels();
  let labels = AxisLabelSet::new(names[lo], names[hi], requested);

  let [first, second] = current_dependent.others();
  let mut plan = SubstitutionPlan::new();
  plan.insert(current.get(first), labels.u.as_str());
  plan.insert(current.get(second), labels.v.as_str());
  trace!("relabel {} -> {} with plan {}", current, labels, plan);

  let changed = AxisSlot::ALL
    .into_iter()
    .filter(|slot| current.get(*slot) != labels.get(*slot))
    .collect();

  Ok(RelabelOutcome::Relabeled(Relabel {
    labels,
    dependent: AxisSlot::W,
    plan,
    changed,
  }))
}

/// Alphabet indices of the new independent slots `(U, V)`.
fn independent_indices(key: usize) -> (usize, usize) {
  let one = (key + 1) % 3;
  let two = (key + 2) % 3;
  if one > two {
    (two, one)
  } else {
    (one, two)
  }
}
