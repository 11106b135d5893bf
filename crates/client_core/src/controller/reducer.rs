//! Load-state transitions.
//!
//! ```text
//! Idle ──OnAppear/LoadData──> Loading ──ok──> Loaded(items)
//!                               ^  └───err──> Failed(message)
//!                               └──LoadData── Loaded | Failed | Loading
//! ```
//!
//! Every load is tagged with a generation. A completion only lands if its
//! generation is still the latest one issued.

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

/// What the presentation layer observes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    generation: u64,
    load: LoadState<T>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            load: LoadState::Idle,
        }
    }
}

impl<T> ViewState<T> {
    pub fn load(&self) -> &LoadState<T> {
        &self.load
    }

    /// Generation of the most recently started load; 0 before the first one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    /// Loaded items; empty in every other state.
    pub fn items(&self) -> &[T] {
        match &self.load {
            LoadState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// A load finished successfully but returned nothing.
    pub fn is_empty(&self) -> bool {
        matches!(&self.load, LoadState::Loaded(items) if items.is_empty())
    }
}

#[derive(Debug)]
pub enum LoadEvent<T> {
    /// Screen became visible; only starts a load from `Idle`.
    Appeared,
    /// Explicit (re)load request; always starts a new generation.
    Requested,
    Succeeded { generation: u64, items: Vec<T> },
    Failed { generation: u64, message: String },
}

/// Next state for `event`, or `None` when the event changes nothing.
pub fn reduce<T>(state: &ViewState<T>, event: LoadEvent<T>) -> Option<ViewState<T>> {
    match event {
        LoadEvent::Appeared => match state.load {
            LoadState::Idle => Some(start_load(state)),
            _ => None,
        },
        LoadEvent::Requested => Some(start_load(state)),
        LoadEvent::Succeeded { generation, items } => {
            is_current(state, generation).then(|| ViewState {
                generation,
                load: LoadState::Loaded(items),
            })
        }
        LoadEvent::Failed {
            generation,
            message,
        } => is_current(state, generation).then(|| ViewState {
            generation,
            load: LoadState::Failed(message),
        }),
    }
}

fn start_load<T>(state: &ViewState<T>) -> ViewState<T> {
    ViewState {
        generation: state.generation + 1,
        load: LoadState::Loading,
    }
}

fn is_current<T>(state: &ViewState<T>, generation: u64) -> bool {
    state.generation == generation && state.is_loading()
}
