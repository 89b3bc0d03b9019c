use duewatch_shared::{
  DashboardConfig,
  Task,
  TaskListController,
  list_key
};
use yew::{
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_state
};

use crate::api::fetch_tasks;
use crate::components::TaskCardView;
use crate::dom::AlertNotifier;

#[derive(Properties, PartialEq)]
pub struct AppProps {
  pub config: DashboardConfig
}

#[derive(Clone, PartialEq)]
enum LoadState {
  Loading,
  Loaded(Vec<Task>),
  Failed
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
  let state = use_state(|| LoadState::Loading);

  {
    let state = state.clone();
    let config = props.config.clone();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(
        async move {
          let controller =
            TaskListController::new(config);
          let fetched = fetch_tasks(
            controller.endpoint()
          )
          .await;

          let mut list = Vec::new();
          match controller.mount(
            fetched,
            Some(&mut list),
            &mut AlertNotifier
          ) {
            | Ok(_) => {
              state.set(LoadState::Loaded(list))
            }
            | Err(_) => {
              state.set(LoadState::Failed)
            }
          }
        }
      );

      || ()
    });
  }

  let refresh_ms = u32::try_from(
    props.config.refresh_interval_ms
  )
  .unwrap_or(u32::MAX);
  let timezone = props
    .config
    .timezone
    .as_ref()
    .map(|_| props.config.viewer_timezone());

  match &*state {
    | LoadState::Loading => html! {
        <p class="loading">{ "Loading tasks…" }</p>
    },
    | LoadState::Failed => html! {},
    | LoadState::Loaded(tasks) => html! {
        <>
            {
                for tasks.iter().enumerate().map(|(idx, task)| html! {
                    <TaskCardView
                        key={list_key(task, idx)}
                        task={task.clone()}
                        refresh_ms={refresh_ms}
                        timezone={timezone}
                    />
                })
            }
        </>
    }
  }
}
