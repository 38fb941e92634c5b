use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use atelier_answer::{AnswerService, AskRequest};
use atelier_settings::{ChatSettings, SettingsStore, SiteSettings};

use crate::events::{IgnoreReason, InputEvent, SubmitOutcome};
use crate::message::{EntryId, ExchangeId, Role};
use crate::render::render_answer;
use crate::surface::ChatSurface;
use crate::view::ChatView;

/// Runs user turns against the answering service.
///
/// Cloning is cheap and every clone drives the same view. All state lives on
/// one thread and no borrow of the view is held across the exchange await.
pub struct ExchangeController<S> {
    view: Rc<RefCell<ChatView<S>>>,
    service: Rc<dyn AnswerService>,
    settings: SettingsStore,
    in_flight: Rc<Cell<usize>>,
    next_exchange: Rc<Cell<u64>>,
}

impl<S> Clone for ExchangeController<S> {
    fn clone(&self) -> Self {
        Self {
            view: Rc::clone(&self.view),
            service: Rc::clone(&self.service),
            settings: self.settings.clone(),
            in_flight: Rc::clone(&self.in_flight),
            next_exchange: Rc::clone(&self.next_exchange),
        }
    }
}

/// A submission whose synchronous steps are done and whose exchange has not run yet.
///
/// Dropping it without running settles the exchange: the indicator hides and
/// the in-flight count drops.
#[must_use = "the exchange only happens when `run` is awaited"]
pub struct PendingExchange<S: ChatSurface + 'static> {
    in_flight: InFlight<S>,
    settings: Arc<SiteSettings>,
    exchange: ExchangeId,
    user: EntryId,
    question: String,
}

impl<S: ChatSurface + 'static> ExchangeController<S> {
    pub fn new(surface: S, service: Rc<dyn AnswerService>, settings: SettingsStore) -> Self {
        Self {
            view: Rc::new(RefCell::new(ChatView::new(surface))),
            service,
            settings,
            in_flight: Rc::new(Cell::new(0)),
            next_exchange: Rc::new(Cell::new(1)),
        }
    }

    pub fn view(&self) -> Ref<'_, ChatView<S>> {
        self.view.borrow()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn is_pending(&self) -> bool {
        self.view.borrow().indicator().is_visible()
    }

    /// Exchanges started but not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Validates `raw`, appends the user entry and shows the indicator.
    ///
    /// Returns the exchange still to run, or why nothing happened. Ignored
    /// submissions touch neither the page nor the network.
    pub fn begin(&self, raw: &str) -> Result<PendingExchange<S>, IgnoreReason> {
        let settings = self.settings.settings();
        let question = raw.trim();
        if question.is_empty() {
            tracing::debug!("ignoring empty submission");
            return Err(IgnoreReason::EmptyInput);
        }
        if settings.chat.lock_input_while_pending && self.in_flight.get() > 0 {
            tracing::debug!(in_flight = self.in_flight.get(), "ignoring submission while pending");
            return Err(IgnoreReason::Busy);
        }

        let exchange = ExchangeId::new(self.next_exchange.get());
        self.next_exchange.set(exchange.0 + 1);

        let user = {
            let mut view = self.view.borrow_mut();
            let user = view.append(Role::User, question);
            view.clear_input();
            view.scroll_to_latest();

            view.show_pending();
            if settings.chat.lock_input_while_pending {
                view.set_input_enabled(false);
            }
            view.scroll_to_latest();
            user
        };
        self.in_flight.set(self.in_flight.get() + 1);

        tracing::info!(
            exchange = exchange.0,
            service = self.service.id(),
            in_flight = self.in_flight.get(),
            "exchange started"
        );

        Ok(PendingExchange {
            in_flight: InFlight {
                controller: self.clone(),
                lock_input: settings.chat.lock_input_while_pending,
            },
            settings,
            exchange,
            user,
            question: question.to_string(),
        })
    }

    /// Reads the input field and begins a submission from its value.
    pub fn begin_from_input(&self) -> Result<PendingExchange<S>, IgnoreReason> {
        let raw = self.view.borrow().read_input();
        self.begin(&raw)
    }

    /// Runs one full user turn: [`Self::begin`] then the exchange.
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        match self.begin(raw) {
            Ok(pending) => pending.run().await,
            Err(reason) => SubmitOutcome::Ignored(reason),
        }
    }

    /// Starts a submission for click/Enter events; other events are ignored.
    pub fn handle_input_event(
        &self,
        event: &InputEvent,
    ) -> Option<Result<PendingExchange<S>, IgnoreReason>> {
        event.is_submit().then(|| self.begin_from_input())
    }
}

impl<S: ChatSurface + 'static> PendingExchange<S> {
    pub fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    pub fn user_entry(&self) -> EntryId {
        self.user
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Performs the remote exchange and renders its result.
    pub async fn run(self) -> SubmitOutcome {
        let Self {
            in_flight,
            settings,
            exchange,
            user,
            question,
        } = self;

        let controller = in_flight.controller.clone();
        let result = controller.service.ask(AskRequest::new(question)).await;
        drop(in_flight);

        let chat: &ChatSettings = &settings.chat;
        let mut view = controller.view.borrow_mut();

        let outcome = match result {
            Ok(answer) => {
                let markup = render_answer(&answer.markup, chat.render_markdown);
                let reply = view.append(Role::Bot, markup);
                tracing::info!(exchange = exchange.0, entry = reply.0, "exchange answered");
                SubmitOutcome::Answered {
                    exchange,
                    user,
                    reply,
                }
            }
            Err(error) => {
                let kind = error.kind();
                tracing::warn!(
                    exchange = exchange.0,
                    stage = error.stage(),
                    kind = ?kind,
                    "exchange failed: {}",
                    error
                );
                let entry = view.append(Role::Error, chat.failure_message.clone());
                SubmitOutcome::Failed {
                    exchange,
                    user,
                    entry,
                    kind,
                }
            }
        };
        view.scroll_to_latest();
        outcome
    }
}

/// Settles one started exchange when dropped, whether or not it ran.
struct InFlight<S: ChatSurface + 'static> {
    controller: ExchangeController<S>,
    lock_input: bool,
}

impl<S: ChatSurface + 'static> Drop for InFlight<S> {
    fn drop(&mut self) {
        let controller = &self.controller;
        let remaining = controller.in_flight.get().saturating_sub(1);
        controller.in_flight.set(remaining);

        let Ok(mut view) = controller.view.try_borrow_mut() else {
            tracing::error!(remaining, "chat view busy while settling exchange");
            return;
        };
        view.hide_pending();
        if self.lock_input && remaining == 0 {
            view.set_input_enabled(true);
        }
    }
}
