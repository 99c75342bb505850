//! Hipposcraper core: pure batch state machine and project classification.
mod effect;
mod msg;
mod project;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, PageInfo, StepResult};
pub use project::ProjectKind;
pub use state::{
    normalize_url_for_dedupe, AppState, JobId, JobResultKind, RunMode, SessionState, Stage,
};
pub use update::update;
pub use view_model::{AppViewModel, JobRowView};
