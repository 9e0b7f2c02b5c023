use std::fmt;

/// What went wrong in a non-fatal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
  /// A local `<script src>` could not be read. The tag is still dropped.
  UnreadableScript,
  /// An inline `<style>` block could not be parsed and was left as-is.
  CssMinify,
  /// An inline `<script>` block could not be parsed and was left as-is.
  JsMinify,
}

/// A non-fatal event collected during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
  pub kind:      WarningKind,
  /// The reference involved: a `src` value, or a short description of the
  /// inline block.
  pub reference: String,
  pub message:   String,
}

impl Warning {
  pub(crate) fn new(
    kind: WarningKind,
    reference: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      kind,
      reference: reference.into(),
      message: message.into(),
    }
  }
}

impl fmt::Display for Warning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let what = match self.kind {
      WarningKind::UnreadableScript => "skipped script",
      WarningKind::CssMinify => "unminified style",
      WarningKind::JsMinify => "unminified script",
    };
    write!(f, "{what} {}: {}", self.reference, self.message)
  }
}
