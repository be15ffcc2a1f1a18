//! Content service
//!
//! Renders article bodies and resolves the chat invites they reference.

use folio_markup::{render_document, ArticleBody};
use tracing::{debug, instrument};

use crate::dto::RenderedContent;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::invite::InviteDetails;

/// Content service
pub struct ContentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ContentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Render a body to HTML. Invite enrichment is started in the background
    /// and never delays the response.
    #[instrument(skip(self, body))]
    pub fn render(&self, body: &ArticleBody) -> RenderedContent {
        let fragment = render_document(&body.document());
        let invites: Vec<_> = fragment.invites().into_iter().cloned().collect();

        if let Some(lookup) = self.ctx.invites() {
            lookup.prefetch(invites.iter().map(|card| card.code.clone()).collect());
        }
        debug!(invites = invites.len(), "Content rendered");

        RenderedContent {
            html: fragment.to_html(),
            invites,
        }
    }

    /// Server details behind an invite code
    ///
    /// # Errors
    /// `NotFound` when lookups are disabled or the code is unknown
    #[instrument(skip(self))]
    pub async fn invite(&self, code: &str) -> ServiceResult<InviteDetails> {
        let lookup = self
            .ctx
            .invites()
            .ok_or_else(|| ServiceError::not_found("Invite", code))?;
        lookup.lookup(code).await
    }
}
