//! Actions sent by the presentation layer and user-facing failure text.

use crate::{controller::reducer::LoadEvent, error::FetchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OnAppear,
    LoadData,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::OnAppear => "on_appear",
            Action::LoadData => "load_data",
        }
    }

    pub(crate) fn into_event<T>(self) -> LoadEvent<T> {
        match self {
            Action::OnAppear => LoadEvent::Appeared,
            Action::LoadData => LoadEvent::Requested,
        }
    }
}

/// One-line message for a failed load of `subject`, e.g. "Failed to load movies: timed out".
pub fn failure_message(subject: &str, err: &FetchError) -> String {
    format!("Failed to load {subject}: {}", err.user_message())
}
