use duewatch_shared::CountdownView;
use yew::{
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CountdownPanelProps {
  pub view: CountdownView
}

#[function_component(CountdownPanel)]
pub fn countdown_panel(
  props: &CountdownPanelProps
) -> Html {
  let view = &props.view;

  html! {
      <section class={classes!("countdown", view.tone.css_class())}>
          <div class="countdown-title">{ view.title }</div>
          <div class="countdown-text">{ view.text.clone() }</div>
      </section>
  }
}
