use std::fmt;
use std::str::FromStr;

use crate::{LatexParser, RelabelError, RelabelResult};

/// Position of a label in a surface's label triple. `U` and `V` are the
/// independent slots, `W` holds the dependent label after any relabel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisSlot {
  U,
  V,
  W,
}

impl AxisSlot {
  pub const ALL: [AxisSlot; 3] = [AxisSlot::U, AxisSlot::V, AxisSlot::W];

  pub fn index(self) -> usize {
    match self {
      AxisSlot::U => 0,
      AxisSlot::V => 1,
      AxisSlot::W => 2,
    }
  }

  pub fn from_index(index: usize) -> Option<Self> {
    Self::ALL.get(index).copied()
  }

  /// The two remaining slots, in slot order.
  pub fn others(self) -> [AxisSlot; 2] {
    match self {
      AxisSlot::U => [AxisSlot::V, AxisSlot::W],
      AxisSlot::V => [AxisSlot::U, AxisSlot::W],
      AxisSlot::W => [AxisSlot::U, AxisSlot::V],
    }
  }
}

impl fmt::Display for AxisSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      AxisSlot::U => "U",
      AxisSlot::V => "V",
      AxisSlot::W => "W",
    };
    f.write_str(name)
  }
}

/// The `(labelU, labelV, labelW)` triple of one surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AxisLabelSet {
  pub u: String,
  pub v: String,
  pub w: String,
}

impl AxisLabelSet {
  pub fn new(
    u: impl Into<String>,
    v: impl Into<String>,
    w: impl Into<String>,
  ) -> Self {
    Self {
      u: u.into(),
      v: v.into(),
      w: w.into(),
    }
  }

  pub fn get(&self, slot: AxisSlot) -> &str {
    match slot {
      AxisSlot::U => &self.u,
      AxisSlot::V => &self.v,
      AxisSlot::W => &self.w,
    }
  }

  pub fn set(&mut self, slot: AxisSlot, label: impl Into<String>) {
    let label = label.into();
    match slot {
      AxisSlot::U => self.u = label,
      AxisSlot::V => self.v = label,
      AxisSlot::W => self.w = label,
    }
  }

  pub fn slot_of(&self, label: &str) -> Option<AxisSlot> {
    AxisSlot::ALL.into_iter().find(|slot| self.get(*slot) == label)
  }

  /// Labels must be non-empty label tokens and pairwise distinct.
  pub fn validate(&self) -> RelabelResult<()> {
    for slot in AxisSlot::ALL {
      let label = self.get(slot);
      if label.is_empty() {
        return Err(RelabelError::InvalidLabelSet {
          reason: format!("label in slot {} is empty", slot),
        });
      }
      if !LatexParser::is_label(label) {
        return Err(RelabelError::InvalidLabelSet {
          reason: format!("`{}` in slot {} is not a label token", label, slot),
        });
      }
    }
    for (i, first) in AxisSlot::ALL.iter().enumerate() {
      for second in &AxisSlot::ALL[i + 1..] {
        if self.get(*first) == self.get(*second) {
          return Err(RelabelError::InvalidLabelSet {
            reason: format!(
              "label `{}` appears in slots {} and {}",
              self.get(*first),
              first,
              second
            ),
          });
        }
      }
    }
    Ok(())
  }
}

impl fmt::Display for AxisLabelSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {}, {})", self.u, self.v, self.w)
  }
}

/// Canonical ordered label triple of a surface family. The order decides
/// which independent slot a label lands in after a relabel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelAlphabet {
  labels: [String; 3],
}

impl LabelAlphabet {
  pub fn new(
    first: impl Into<String>,
    second: impl Into<String>,
    third: impl Into<String>,
  ) -> RelabelResult<Self> {
    let set = AxisLabelSet::new(first, second, third);
    set.validate()?;
    Ok(Self {
      labels: [set.u, set.v, set.w],
    })
  }

  pub fn index_of(&self, label: &str) -> Option<usize> {
    self.labels.iter().position(|l| l == label)
  }

  pub fn contains(&self, label: &str) -> bool {
    self.index_of(label).is_some()
  }

  pub fn label(&self, index: usize) -> Option<&str> {
    self.labels.get(index).map(String::as_str)
  }

  pub fn labels(&self) -> [&str; 3] {
    [&self.labels[0], &self.labels[1], &self.labels[2]]
  }

  /// The alphabet in canonical order, with the last label dependent.
  pub fn default_labels(&self) -> AxisLabelSet {
    AxisLabelSet::new(&self.labels[0], &self.labels[1], &self.labels[2])
  }
}

impl FromStr for LabelAlphabet {
  type Err = RelabelError;

  /// Comma separated: `x,y,z`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
      [a, b, c] => Self::new(*a, *b, *c),
      _ => Err(RelabelError::InvalidLabelSet {
        reason: format!("expected three comma separated labels, got `{}`", s),
      }),
    }
  }
}

impl fmt::Display for LabelAlphabet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.labels.join(","))
  }
}

// ── Surface families ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFamily {
  Parametric,
  Explicit,
  ExplicitPolar,
}

impl SurfaceFamily {
  pub const ALL: [SurfaceFamily; 3] = [
    SurfaceFamily::Parametric,
    SurfaceFamily::Explicit,
    SurfaceFamily::ExplicitPolar,
  ];

  pub fn alphabet(self) -> LabelAlphabet {
    let labels = match self {
      SurfaceFamily::Parametric => ["u", "v", "w"],
      SurfaceFamily::Explicit => ["x", "y", "z"],
      SurfaceFamily::ExplicitPolar => ["r", "\\theta", "z"],
    };
    LabelAlphabet {
      labels: labels.map(String::from),
    }
  }

  pub fn type_tag(self) -> &'static str {
    match self {
      SurfaceFamily::Parametric => "PARAMETRIC_SURFACE",
      SurfaceFamily::Explicit => "EXPLICIT_SURFACE",
      SurfaceFamily::ExplicitPolar => "EXPLICIT_SURFACE_POLAR",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      SurfaceFamily::Parametric => "Parametric Surface",
      SurfaceFamily::Explicit => "Explicit Surface",
      SurfaceFamily::ExplicitPolar => "Explicit Surface (Polar)",
    }
  }

  pub fn from_type_tag(tag: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|family| family.type_tag() == tag)
  }
}
