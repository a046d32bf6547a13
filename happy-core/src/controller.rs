//! Page controller: owns the form state and drives submission
//!
//! The controller is the only place where the form meets the outside world.
//! Input goes through [`FormController::dispatch`]; [`FormController::submit`]
//! performs the single network call and reports through the [`PageHost`].

use tracing::{info, warn};

use crate::api::OrphanageApi;
use crate::error::HappyError;
use crate::form::{FormEvent, OrphanageForm};
use crate::payload::OrphanagePayload;

/// Default route the page navigates to after a successful submission
pub const DEFAULT_SUCCESS_ROUTE: &str = "/app";

/// Default confirmation notice
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Cadastro realizado com Sucesso!";

/// Default prefix of the failure notice
pub const DEFAULT_FAILURE_MESSAGE: &str = "Não foi possível concluir o cadastro";

/// The shell around the page: shows notices and performs navigation
pub trait PageHost {
    /// Show a notice the user has to acknowledge
    fn alert(&mut self, message: &str);

    /// Leave the page for `route`
    fn navigate(&mut self, route: &str);
}

/// Texts and routes the controller reports with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    pub success_route: String,
    pub success_message: String,
    pub failure_message: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            success_route: DEFAULT_SUCCESS_ROUTE.to_string(),
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Where the page is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    Navigated(String),
}

/// Result of a submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Accepted by the API; the host was sent to `route`
    Created { route: String },
    /// Not accepted; the user was shown the reason and the form is editable again
    Rejected(HappyError),
}

impl SubmitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created { .. })
    }
}

/// Form controller for the "create orphanage" page
pub struct FormController<A, H> {
    form: OrphanageForm,
    phase: Phase,
    api: A,
    host: H,
    settings: PageSettings,
}

impl<A: OrphanageApi, H: PageHost> FormController<A, H> {
    pub fn new(api: A, host: H, settings: PageSettings) -> Self {
        Self {
            form: OrphanageForm::default(),
            phase: Phase::Editing,
            api,
            host,
            settings,
        }
    }

    pub fn form(&self) -> &OrphanageForm {
        &self.form
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Apply a user event. Ignored once the page has navigated away.
    pub fn dispatch(&mut self, event: FormEvent) {
        if self.phase != Phase::Editing {
            return;
        }
        let form = std::mem::take(&mut self.form);
        self.form = form.apply(event);
    }

    /// Serialize the form, post it, and report the outcome through the host
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.phase != Phase::Editing {
            return SubmitOutcome::Rejected(HappyError::NotEditing);
        }

        let payload = match OrphanagePayload::from_form(&self.form) {
            Ok(payload) => payload,
            Err(err) => return self.reject(err),
        };

        self.phase = Phase::Submitting;
        info!(
            name = %self.form.name,
            images = self.form.images.len(),
            "submitting orphanage"
        );

        match self.api.create_orphanage(&payload).await {
            Ok(()) => {
                let route = self.settings.success_route.clone();
                self.host.alert(&self.settings.success_message);
                self.host.navigate(&route);
                self.phase = Phase::Navigated(route.clone());
                SubmitOutcome::Created { route }
            }
            Err(err) => self.reject(err),
        }
    }

    fn reject(&mut self, err: HappyError) -> SubmitOutcome {
        warn!(error = %err, "submission rejected");
        self.phase = Phase::Editing;
        let notice = format!("{}: {}", self.settings.failure_message, err);
        self.host.alert(&notice);
        SubmitOutcome::Rejected(err)
    }
}
