//! Creating a referenced entity from inside a parent form.
//!
//! The bridge hosts one creation surface at a time. A successful submit
//! creates the entity, appends it to the target select field and selects it,
//! then closes the surface. Any failure keeps the surface open with an inline
//! error and leaves the form untouched.

use crate::config::AcquireConfig;
use crate::error::{AcquireError, AcquireResult};
use crate::provider::EntityCreationProvider;
use labdesk_model::{
    FormFields, ReferencedEntityOption, SelectionContext, SelectionFields, ValidationError,
};
use labdesk_types::SessionContext;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Surface {
    context: SelectionContext,
    error: Option<String>,
}

pub struct EntityCreationBridge {
    ctx: SessionContext,
    provider: Arc<dyn EntityCreationProvider>,
    request_timeout: Duration,
    surface: Option<Surface>,
}

impl EntityCreationBridge {
    pub fn new(
        ctx: SessionContext,
        provider: Arc<dyn EntityCreationProvider>,
        config: &AcquireConfig,
    ) -> Self {
        Self {
            ctx,
            provider,
            request_timeout: config.request_timeout,
            surface: None,
        }
    }

    /// Opens the creation surface for `context`, replacing any open one.
    pub fn open(&mut self, context: SelectionContext) {
        debug!("Opening entity creation for {:?}", context);
        self.surface = Some(Surface {
            context,
            error: None,
        });
    }

    /// Closes the surface, discarding any inline error.
    pub fn close(&mut self) {
        self.surface = None;
    }

    pub fn is_open(&self) -> bool {
        self.surface.is_some()
    }

    pub fn active_context(&self) -> Option<&SelectionContext> {
        self.surface.as_ref().map(|s| &s.context)
    }

    /// The inline error of the last failed submit.
    pub fn error(&self) -> Option<&str> {
        self.surface.as_ref().and_then(|s| s.error.as_deref())
    }

    /// Validates `fields`, creates the entity and selects it in the context's
    /// target field of `selections`.
    pub async fn submit(
        &mut self,
        fields: &FormFields,
        selections: &mut SelectionFields,
    ) -> AcquireResult<ReferencedEntityOption> {
        let context = self
            .surface
            .as_ref()
            .map(|s| s.context.clone())
            .ok_or(ValidationError::NoActiveContext)?;
        self.set_error(None);

        let target = context.target_field();
        if !selections.contains(target) {
            return Err(self.fail(ValidationError::UnknownSelectField(target.to_string()).into()));
        }
        if let Err(e) = context.validate(fields) {
            return Err(self.fail(e.into()));
        }

        let created = tokio::time::timeout(
            self.request_timeout,
            self.provider.create_entity(&self.ctx, &context, fields),
        )
        .await;
        let id = match created {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => return Err(self.fail(e.into())),
            Err(_) => return Err(self.fail(AcquireError::Timeout)),
        };

        let option = ReferencedEntityOption::new(id, context.label(fields));
        if let Err(e) = selections.insert_and_select(target, option.clone()) {
            return Err(self.fail(e.into()));
        }
        self.surface = None;
        info!("Created {} option {} ({})", target, option.id, option.label);
        Ok(option)
    }

    fn fail(&mut self, err: AcquireError) -> AcquireError {
        warn!("Entity creation failed: {}", err);
        self.set_error(Some(err.to_string()));
        err
    }

    fn set_error(&mut self, error: Option<String>) {
        if let Some(surface) = self.surface.as_mut() {
            surface.error = error;
        }
    }
}
