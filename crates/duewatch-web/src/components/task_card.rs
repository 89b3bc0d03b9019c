use chrono::{
  Local,
  Utc
};
use chrono_tz::Tz;
use duewatch_shared::{
  Task,
  TaskCard
};
use gloo::timers::callback::Interval;
use yew::{
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_state
};

use super::CountdownPanel;

#[derive(Properties, PartialEq)]
pub struct TaskCardProps {
  pub task:       Task,
  pub refresh_ms: u32,
  #[prop_or_default]
  pub timezone:   Option<Tz>
}

/// One task card. Cards with a due date
/// re-render their countdown on a timer
/// owned by the card; the timer stops
/// when the card unmounts.
#[function_component(TaskCardView)]
pub fn task_card_view(
  props: &TaskCardProps
) -> Html {
  let now = use_state(Utc::now);
  let has_due = props.task.due.is_some();

  {
    let now = now.clone();
    use_effect_with(
      (has_due, props.refresh_ms),
      move |(has_due, refresh_ms)| {
        let ticker = has_due.then(|| {
          Interval::new(
            *refresh_ms,
            move || now.set(Utc::now())
          )
        });

        move || drop(ticker)
      }
    );
  }

  let card = match props.timezone {
    | Some(tz) => TaskCard::build(
      &props.task,
      *now,
      &tz
    ),
    | None => TaskCard::build(
      &props.task,
      *now,
      &Local
    )
  };

  html! {
      <article class="task">
          <header class="task-header">
              <span class="urgency">{ card.urgency.clone() }</span>
              <h3 class="description">{ card.description.clone() }</h3>
          </header>
          <div class="meta">
              <span class="project">{ card.project.clone() }</span>
              <span class="status">{ card.status.clone() }</span>
              {
                  for card.priority.map(|label| html! {
                      <span class="priority">{ label }</span>
                  })
              }
          </div>
          {
              for card.due_label.clone().map(|label| html! {
                  <div class="due">{ format!("Due: {label}") }</div>
              })
          }
          {
              for card.countdown.clone().map(|view| html! {
                  <CountdownPanel view={view} />
              })
          }
      </article>
  }
}
