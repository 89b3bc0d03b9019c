use duewatch_core::report::ImprovedTask;
use hypertext::prelude::*;

struct ReportRow {
  heading: String,
  lines:   Vec<(&'static str, String)>
}

/// Renders the tasks, in the order given,
/// as a standalone HTML document.
pub fn render_report(
  tasks: &[ImprovedTask]
) -> String {
  let rows = tasks
    .iter()
    .map(|task| ReportRow {
      heading: task.description.clone(),
      lines:   task.report_lines()
    })
    .collect::<Vec<_>>();

  maud! {
      !DOCTYPE
      html {
          head {
              meta charset="utf-8";
              title { "Pending tasks" }
          }
          body {
              @for row in &rows {
                  div .task {
                      h2 { (row.heading.as_str()) }
                      ul {
                          @for (label, value) in &row.lines {
                              li {
                                  strong { (*label) ":" }
                                  " "
                                  (value.as_str())
                              }
                          }
                      }
                  }
                  hr;
              }
          }
      }
  }
  .render()
  .into_inner()
}
