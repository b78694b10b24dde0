use ariadne::{Color, Label, Report, ReportKind};

use super::ReportBuilder;
use crate::ast::Loc;
use crate::source::SourceCode;

/// Starts a report of the given kind with a single label under `loc`.
pub fn report_at<'a>(
  source: &'a SourceCode,
  kind: &'static str,
  loc: Loc,
  message: impl ToString,
) -> ReportBuilder<'a> {
  let name = source.file_path();
  let offset = source.char_offset(loc);

  Report::build(ReportKind::Custom(kind, Color::Red), name, offset)
    .with_message(message)
    .with_label(Label::new((name, offset..offset + 1)).with_color(Color::Red))
}

/// Extra label under `loc` with its own message.
pub fn label_at<'a>(
  source: &'a SourceCode,
  loc: Loc,
  message: impl ToString,
) -> Label<(&'a str, std::ops::Range<usize>)> {
  let offset = source.char_offset(loc);
  Label::new((source.file_path(), offset..offset + 1)).with_message(message)
}
