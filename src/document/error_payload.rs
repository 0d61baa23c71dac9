//! JSON:API error documents with a single representative status code.

use serde::Serialize;

/// One underlying failure, prior to payload assembly.
#[derive(Clone, Debug)]
pub struct ErrorEntry {
    /// HTTP status, when the failure carries one. Statusless entries take
    /// the default passed to [`build`].
    pub status: Option<u16>,
    pub title: String,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(status: u16, title: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorEntry {
            status: Some(status),
            title: title.into(),
            message: message.into(),
        }
    }
}

/// One member of the `errors` array.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorObject {
    pub title: String,
    pub detail: String,
}

/// Body of every failure response: `{"errors": [{title, detail}, ...]}`.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

/// The reduced payload: one representative status plus the full error list.
#[derive(Clone, Debug)]
pub struct ErrorPayload {
    /// Stringified HTTP status, e.g. `"400"`.
    pub code: String,
    pub document: ErrorDocument,
}

/// Reduce error entries to one payload. The representative code is the
/// status with the most occurrences, found by a strict-`>` fold over a
/// first-seen-ordered tally — ties go to the status seen first. The
/// `errors` array preserves input order and length regardless of which
/// status wins.
pub fn build(entries: &[ErrorEntry], default_status: u16) -> ErrorPayload {
    let mut tally: Vec<(u16, usize)> = Vec::new();
    let mut errors = Vec::with_capacity(entries.len());

    for entry in entries {
        let status = entry.status.unwrap_or(default_status);
        match tally.iter_mut().find(|(tallied, _)| *tallied == status) {
            Some((_, count)) => *count += 1,
            None => tally.push((status, 1)),
        }
        errors.push(ErrorObject {
            title: entry.title.clone(),
            detail: entry.message.clone(),
        });
    }

    let mut code = default_status;
    let mut best = 0usize;
    for (status, count) in tally {
        if count > best {
            best = count;
            code = status;
        }
    }

    ErrorPayload {
        code: code.to_string(),
        document: ErrorDocument { errors },
    }
}
