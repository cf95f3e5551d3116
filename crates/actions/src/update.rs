//! Conflict-safe wiki page updates
//!
//! An update is a transformation of the page content rather than a new
//! content: read the latest revision, transform it, and submit the result
//! against that revision. When someone else edited in between, the platform
//! rejects the edit and reports the content it now holds; the transformation
//! is applied to that and submitted again.
//!
//! ```text
//! latest ──► transform ──► edit(previous = revision)
//!                              │
//!                 conflict ◄───┤───► ok: done
//!                 (content, revision)
//!                    │
//!                    └──► transform ──► edit(previous = revision) ...
//! ```
//!
//! By default the loop has no cap and no backoff. A page that keeps changing
//! keeps the loop going; [`UpdateOptions::max_conflicts`] bounds it.

use std::num::NonZeroUsize;
use subkit_core::{EditRequest, Error, Result, UpdateConfig, WikiPage};
use tracing::{debug, info, warn};

/// How persistent an update is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Give up with [`Error::ConflictLimitExceeded`] after this many
    /// conflicting submissions; `None` retries until an edit lands
    pub max_conflicts: Option<NonZeroUsize>,
}

impl UpdateOptions {
    /// Retry until an edit lands
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Give up after `max_conflicts` conflicting submissions
    pub fn bounded(max_conflicts: NonZeroUsize) -> Self {
        UpdateOptions {
            max_conflicts: Some(max_conflicts),
        }
    }
}

impl From<&UpdateConfig> for UpdateOptions {
    fn from(config: &UpdateConfig) -> Self {
        UpdateOptions {
            max_conflicts: config.max_conflicts,
        }
    }
}

/// Outcome of a successful update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReport {
    /// Edits submitted, the successful one included
    pub attempts: usize,
}

/// Apply `transformation` to a page until the edit lands
///
/// Any error other than an edit conflict is returned immediately.
///
/// # Example
///
/// ```
/// use subkit_actions::update_page;
/// use subkit_core::testing::ScriptedWikiPage;
///
/// let page = ScriptedWikiPage::new("A");
/// page.inject_conflict("B");
/// let report = update_page(&page, |old| format!("{} | suffix", old), None).unwrap();
/// assert_eq!(page.content(), "B | suffix");
/// assert_eq!(report.attempts, 2);
/// ```
pub fn update_page<P, F>(page: &P, transformation: F, reason: Option<&str>) -> Result<UpdateReport>
where
    P: WikiPage + ?Sized,
    F: Fn(&str) -> String,
{
    update_page_with(page, transformation, reason, UpdateOptions::default())
}

/// [`update_page`] with explicit options
pub fn update_page_with<P, F>(
    page: &P,
    transformation: F,
    reason: Option<&str>,
    options: UpdateOptions,
) -> Result<UpdateReport>
where
    P: WikiPage + ?Sized,
    F: Fn(&str) -> String,
{
    let latest = page.latest_revision()?;
    let mut content = transformation(&latest.content);
    let mut previous = latest.id;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let request = EditRequest {
            content,
            reason: reason.map(str::to_string),
            previous,
        };
        debug!(target: "subkit::update", attempt = attempts, previous = %request.previous, "Submitting edit");

        match page.edit(&request) {
            Ok(()) => {
                info!(target: "subkit::update", attempts, "Page updated");
                return Ok(UpdateReport { attempts });
            }
            Err(Error::Conflict(conflict)) => {
                if options.max_conflicts.map_or(false, |max| attempts >= max.get()) {
                    warn!(target: "subkit::update", attempts, "Giving up on conflicting edits");
                    return Err(Error::ConflictLimitExceeded { attempts });
                }
                debug!(
                    target: "subkit::update",
                    attempt = attempts,
                    revision = %conflict.revision,
                    "Edit conflict, reapplying to newer content"
                );
                content = transformation(&conflict.content);
                previous = conflict.revision;
            }
            Err(e) => return Err(e),
        }
    }
}

/// [`update_page`] as a method on any page
pub trait WikiPageExt: WikiPage {
    /// Apply `transformation` until the edit lands; see [`update_page`]
    fn update<F>(&self, transformation: F, reason: Option<&str>) -> Result<UpdateReport>
    where
        F: Fn(&str) -> String,
    {
        update_page(self, transformation, reason)
    }

    /// Same, with explicit options
    fn update_with<F>(&self, transformation: F, reason: Option<&str>, options: UpdateOptions) -> Result<UpdateReport>
    where
        F: Fn(&str) -> String,
    {
        update_page_with(self, transformation, reason, options)
    }
}

impl<P: WikiPage + ?Sized> WikiPageExt for P {}
