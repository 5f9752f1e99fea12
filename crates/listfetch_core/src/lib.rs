//! Listfetch core: pure pagination state machine and view-model helpers.
mod effect;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use query::{Epoch, FetchMode, FetchQuery, Items, ResultPage};
pub use state::ListState;
pub use update::update;
pub use view_model::ListViewModel;
