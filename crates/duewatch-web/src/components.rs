mod countdown_panel;
mod task_card;

pub use countdown_panel::CountdownPanel;
pub use task_card::TaskCardView;
