//! The editor session controller.
//!
//! ## Learning: Shared Ownership Without Globals
//!
//! The session is built once at start-up and handed around as a
//! `SessionController`, which is a cheap `Arc` handle. Clones share one
//! state, so a UI can run code on a background task while the main loop
//! keeps switching languages. The state mutex is never held across an
//! `.await`; a run only locks briefly before submitting and after the
//! response arrives.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use runpad_piston::{interpret, ExecutionOutcome, Executor, GENERIC_FAILURE};

use crate::catalog::{Catalog, LanguageId};
use crate::config::{Config, RunPolicy};
use crate::event::{EventBus, SessionEvent};
use crate::store::{code_key, KeyValueStore, THEME_KEY};
use crate::theme::Theme;
use crate::{CoreError, CoreResult};

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Always a key of the catalog
    pub language: LanguageId,

    pub theme: Theme,

    /// Buffer content for `language`
    pub source_text: String,

    /// Result of the last resolved run; `None` before any run and while one is pending
    pub outcome: Option<ExecutionOutcome>,

    pub is_running: bool,
}

struct Inner {
    state: Mutex<SessionState>,
    catalog: Catalog,
    store: Arc<dyn KeyValueStore>,
    executor: Arc<dyn Executor>,
    events: EventBus,
    run_policy: RunPolicy,
    /// Sequence number of the most recently issued run
    last_issued: AtomicU64,
}

/// Owner of the session state.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    /// Builds the session: catalog from config, theme from the store, and the
    /// configured default language with its saved code applied.
    pub fn init(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
        executor: Arc<dyn Executor>,
    ) -> CoreResult<Self> {
        let catalog = Catalog::from_config(config)?;
        let profile = catalog
            .get(&config.editor.default_language)
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "default language `{}` is not in the catalog",
                    config.editor.default_language
                ))
            })?;

        let theme = match store.get(THEME_KEY)? {
            Some(id) => id.parse::<Theme>().unwrap_or_else(|_| {
                tracing::warn!("Unknown persisted theme `{}`, using {}", id, Theme::default());
                Theme::default()
            }),
            None => Theme::default(),
        };

        let language = profile.id.clone();
        let state = SessionState {
            language: language.clone(),
            theme,
            source_text: profile.default_code.clone(),
            outcome: None,
            is_running: false,
        };

        let controller = Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                catalog,
                store,
                executor,
                events: EventBus::new(),
                run_policy: config.execution.run_policy,
                last_issued: AtomicU64::new(0),
            }),
        };
        controller.load_persisted_code(&language)?;

        tracing::debug!("Session started with {} / {}", language, theme);
        Ok(controller)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: SessionEvent) {
        self.inner.events.emit(event);
    }

    // ==================== Language ====================

    /// Switches language and shows its starter code.
    ///
    /// Saved code is not consulted; see [`Self::select_language`].
    pub fn change_language(&self, id: &str) -> CoreResult<()> {
        let profile = self.inner.catalog.profile(id)?;
        {
            let mut state = self.state();
            state.language = profile.id.clone();
            state.source_text = profile.default_code.clone();
        }

        tracing::debug!("Language changed to {}", profile.id);
        self.emit(SessionEvent::LanguageChanged(profile.id.clone()));
        self.emit(SessionEvent::SourceChanged);
        Ok(())
    }

    /// Switches language and restores its saved code, as a language pick does.
    pub fn select_language(&self, id: &str) -> CoreResult<()> {
        self.change_language(id)?;
        self.load_persisted_code(&LanguageId::new(id))
    }

    /// Replaces the source text with the saved code for `language`, if any.
    ///
    /// Only applies while `language` is the current language.
    pub fn load_persisted_code(&self, language: &LanguageId) -> CoreResult<()> {
        let Some(saved) = self
            .inner
            .store
            .get(&code_key(language))?
            .filter(|text| !text.is_empty())
        else {
            return Ok(());
        };

        {
            let mut state = self.state();
            if state.language != *language {
                tracing::debug!("Not loading saved {} code, {} is current", language, state.language);
                return Ok(());
            }
            state.source_text = saved;
        }

        tracing::debug!("Loaded saved code for {}", language);
        self.emit(SessionEvent::SourceChanged);
        Ok(())
    }

    // ==================== Theme ====================

    /// Persists and applies a theme. Memory is only updated once the write succeeded.
    pub fn set_theme(&self, theme: Theme) -> CoreResult<()> {
        self.inner.store.set(THEME_KEY, theme.id())?;
        self.state().theme = theme;

        tracing::debug!("Theme changed to {}", theme);
        self.emit(SessionEvent::ThemeChanged(theme));
        Ok(())
    }

    // ==================== Code ====================

    /// Persists `text` as the saved code for `language`. Empty text is not saved.
    pub fn save_code(&self, language: &LanguageId, text: &str) -> CoreResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.inner.catalog.profile(language.as_str())?;
        self.inner.store.set(&code_key(language), text)?;
        Ok(())
    }

    /// Change notification from the editing surface: the buffer now holds `text`.
    pub fn text_changed(&self, text: impl Into<String>) -> CoreResult<()> {
        let text = text.into();
        let language = {
            let mut state = self.state();
            state.source_text.clone_from(&text);
            state.language.clone()
        };
        self.save_code(&language, &text)
    }

    /// Drops the saved code of the current language and restores its starter code.
    pub fn reset_code(&self) -> CoreResult<()> {
        let language = self.language();
        let profile = self.inner.catalog.profile(language.as_str())?;

        self.inner.store.remove(&code_key(&language))?;
        {
            let mut state = self.state();
            if state.language == language {
                state.source_text = profile.default_code.clone();
            }
        }

        tracing::debug!("Reset code for {}", language);
        self.emit(SessionEvent::CodeReset(language));
        self.emit(SessionEvent::SourceChanged);
        Ok(())
    }

    // ==================== Execution ====================

    /// Runs `source_override` (or the current source when absent or empty) in the
    /// current language's runtime and records the outcome.
    ///
    /// Overlapping runs are not cancelled. Under [`RunPolicy::LastResolved`]
    /// each one overwrites the outcome and clears `is_running` when it
    /// resolves; under [`RunPolicy::LatestIssued`] only the most recently
    /// issued run does. The outcome of this run is returned either way.
    ///
    /// Dropping the returned future before it resolves counts as a
    /// resolution without an outcome: `is_running` is cleared under the same
    /// policy and [`SessionEvent::RunCancelled`] is emitted.
    pub async fn run_code(&self, source_override: Option<&str>) -> ExecutionOutcome {
        let seq = self.inner.last_issued.fetch_add(1, Ordering::SeqCst) + 1;

        let (language, source) = {
            let mut state = self.state();
            state.is_running = true;
            state.outcome = None;
            let source = match source_override {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => state.source_text.clone(),
            };
            (state.language.clone(), source)
        };
        self.emit(SessionEvent::RunStarted { seq });
        let mut guard = RunGuard {
            controller: self,
            seq,
            settled: false,
        };

        let outcome = match self.inner.catalog.get(language.as_str()) {
            Some(profile) => {
                tracing::info!("Run #{} of {} code on {}", seq, language, profile.runtime);
                interpret(self.inner.executor.execute(&profile.runtime, &source).await)
            }
            None => {
                tracing::error!("Run #{}: {} is missing from the catalog", seq, language);
                ExecutionOutcome::Failure(GENERIC_FAILURE.to_string())
            }
        };

        let applied = {
            let mut state = self.state();
            guard.settled = true;
            let applied = self.applies(seq);
            if applied {
                state.outcome = Some(outcome.clone());
                state.is_running = false;
            }
            applied
        };

        if applied {
            tracing::info!(
                "Run #{} finished: {}",
                seq,
                if outcome.is_success() { "success" } else { "failure" }
            );
            self.emit(SessionEvent::RunFinished {
                seq,
                outcome: outcome.clone(),
            });
        } else {
            tracing::warn!("Run #{} resolved after a newer run was issued, discarding", seq);
            self.emit(SessionEvent::RunDiscarded { seq });
        }

        outcome
    }

    /// True when a response (or cancellation) of run `seq` may touch the state.
    fn applies(&self, seq: u64) -> bool {
        match self.inner.run_policy {
            RunPolicy::LastResolved => true,
            RunPolicy::LatestIssued => seq == self.inner.last_issued.load(Ordering::SeqCst),
        }
    }

    // ==================== Accessors ====================

    /// Returns a copy of the whole state.
    pub fn snapshot(&self) -> SessionState {
        self.state().clone()
    }

    pub fn language(&self) -> LanguageId {
        self.state().language.clone()
    }

    pub fn theme(&self) -> Theme {
        self.state().theme
    }

    pub fn source_text(&self) -> String {
        self.state().source_text.clone()
    }

    pub fn outcome(&self) -> Option<ExecutionOutcome> {
        self.state().outcome.clone()
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// True when saved code exists for `language`.
    pub fn has_saved_code(&self, language: &LanguageId) -> CoreResult<bool> {
        Ok(self
            .inner
            .store
            .get(&code_key(language))?
            .is_some_and(|text| !text.is_empty()))
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }
}

/// Settles a run whose future was dropped while the request was in flight.
struct RunGuard<'a> {
    controller: &'a SessionController,
    seq: u64,
    settled: bool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        {
            let mut state = self.controller.state();
            if self.controller.applies(self.seq) {
                state.is_running = false;
            }
        }

        tracing::warn!("Run #{} was cancelled before it resolved", self.seq);
        self.controller.emit(SessionEvent::RunCancelled { seq: self.seq });
    }
}
