//! The caller-held collection of requests.
//!
//! [`RequestBook`] backs the "my requests" dashboard: requests are saved as
//! drafts, sent, commented on and deleted. Every effect is reported to a
//! [`Notifier`], which the presentation layer turns into a toast or a log
//! line. Notifications are fire-and-forget.

use chrono::{DateTime, Utc};

use crate::domain::{request::EmptyCommentError, Comment, TravelRequest};

/// Something that happened to the request book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A request was saved as a draft.
    DraftSaved {
        /// The saved request.
        id: String,
    },
    /// A request was sent.
    RequestSent {
        /// The sent request.
        id: String,
    },
    /// A request was deleted.
    RequestDeleted {
        /// The deleted request.
        id: String,
    },
    /// A comment was added to a request.
    CommentAdded {
        /// The commented request.
        id: String,
    },
}

impl Notice {
    /// Short headline.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::DraftSaved { .. } => "Brouillon sauvegardé",
            Self::RequestSent { .. } => "Demande envoyée",
            Self::RequestDeleted { .. } => "Demande supprimée",
            Self::CommentAdded { .. } => "Commentaire ajouté",
        }
    }

    /// One-sentence description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::DraftSaved { .. } => "Votre demande de voyage a été sauvegardée en brouillon.",
            Self::RequestSent { .. } => "Votre demande de voyage a été envoyée avec succès.",
            Self::RequestDeleted { .. } => "La demande de voyage a été supprimée avec succès.",
            Self::CommentAdded { .. } => "Votre commentaire a été ajouté avec succès.",
        }
    }

    /// The request the notice is about.
    #[must_use]
    pub fn request_id(&self) -> &str {
        match self {
            Self::DraftSaved { id }
            | Self::RequestSent { id }
            | Self::RequestDeleted { id }
            | Self::CommentAdded { id } => id,
        }
    }
}

/// A sink for [`Notice`]s.
pub trait Notifier {
    /// Reports a notice. Nothing is returned to the caller.
    fn notify(&self, notice: Notice);
}

/// A [`Notifier`] that emits notices as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::info!(
            id = notice.request_id(),
            "{}: {}",
            notice.title(),
            notice.description()
        );
    }
}

/// Whether [`RequestBook::save`] added a request or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    /// The request was new.
    Inserted,
    /// A request with the same id was replaced.
    Replaced,
}

/// An ordered collection of requests with unique ids.
#[derive(Debug)]
pub struct RequestBook<N = TracingNotifier> {
    requests: Vec<TravelRequest>,
    notifier: N,
}

impl RequestBook {
    /// An empty book that reports through `tracing`.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_notifier(TracingNotifier)
    }
}

impl Default for RequestBook {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Notifier> RequestBook<N> {
    /// An empty book reporting to `notifier`.
    #[must_use]
    pub const fn with_notifier(notifier: N) -> Self {
        Self {
            requests: Vec::new(),
            notifier,
        }
    }

    /// Fills the book with existing requests, without notifying.
    ///
    /// Later requests replace earlier ones with the same id.
    #[must_use]
    pub fn with_requests(mut self, requests: impl IntoIterator<Item = TravelRequest>) -> Self {
        for request in requests {
            self.upsert(request);
        }
        self
    }

    /// The requests, in insertion order.
    #[must_use]
    pub fn requests(&self) -> &[TravelRequest] {
        &self.requests
    }

    /// Looks up a request by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TravelRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Number of requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Saves a request, replacing any request with the same id in place or
    /// appending it otherwise.
    pub fn save(&mut self, request: TravelRequest) -> Saved {
        let id = request.id.clone();
        let saved = self.upsert(request);
        self.notifier.notify(Notice::DraftSaved { id });
        saved
    }

    /// Marks a request as sent and saves it.
    pub fn send(&mut self, mut request: TravelRequest) -> Saved {
        request.mark_sent();
        let id = request.id.clone();
        let saved = self.upsert(request);
        self.notifier.notify(Notice::RequestSent { id });
        saved
    }

    /// Removes a request.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::UnknownRequest`] if no request has this id.
    pub fn delete(&mut self, id: &str) -> Result<TravelRequest, BookError> {
        let index = self.position(id)?;
        let removed = self.requests.remove(index);
        self.notifier.notify(Notice::RequestDeleted { id: id.to_string() });
        Ok(removed)
    }

    /// Appends a comment to a request.
    ///
    /// # Errors
    ///
    /// - [`BookError::UnknownRequest`] if no request has this id.
    /// - [`BookError::EmptyComment`] if the text is blank.
    pub fn add_comment(
        &mut self,
        id: &str,
        author: &str,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<&Comment, BookError> {
        let index = self.position(id)?;
        let Self { requests, notifier } = self;
        let comment = requests[index].add_comment(author, text, at)?;
        notifier.notify(Notice::CommentAdded { id: id.to_string() });
        Ok(comment)
    }

    fn upsert(&mut self, request: TravelRequest) -> Saved {
        if let Some(existing) = self.requests.iter_mut().find(|r| r.id == request.id) {
            *existing = request;
            return Saved::Replaced;
        }
        self.requests.push(request);
        Saved::Inserted
    }

    fn position(&self, id: &str) -> Result<usize, BookError> {
        self.requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| BookError::UnknownRequest(id.to_string()))
    }
}

/// Errors operating on a [`RequestBook`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookError {
    /// No request has the given id.
    #[error("no request with id '{0}'")]
    UnknownRequest(String),

    /// The comment text is blank.
    #[error(transparent)]
    EmptyComment(#[from] EmptyCommentError),
}
