mod phases;
mod root;
mod state;

pub(crate) use phases::PhaseView;
pub(crate) use state::{
    AppState, BootstrapState, DateWindow, RetryBook, RunningState, Selection, StatusLine,
};

pub use root::App;
