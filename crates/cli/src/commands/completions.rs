//! Shell completion for storage references
//!
//! Registration and shell-specific output are handled by clap_complete's
//! dynamic engine (`COMPLETE=bash kot` prints the hook). This module only
//! supplies the value completer for the reference argument.
//!
//! Shells that break words on `:` hand over `//bucket/...` instead of
//! `s3://bucket/...`. The scheme is restored before predicting, and the
//! candidates are returned in whichever shape the shell passed in.
//!
//! The session is the one the finished command line would use: `--profile`
//! and `--config` already typed on the line win over `KOT_PROFILE` and
//! `KOT_CONFIG`.

use std::ffi::OsStr;
use std::path::PathBuf;

use clap_complete::engine::CompletionCandidate;
use kot_core::{resolve, Predictor, StorePredictor, SCHEME};

use super::SessionArgs;

/// Value completer attached to the reference argument
///
/// Never fails: any problem yields no candidates.
pub fn complete_reference(current: &OsStr) -> Vec<CompletionCandidate> {
    let Some(current) = current.to_str() else {
        return Vec::new();
    };
    let (query, with_scheme) = completion_query(current);

    // Not a reference we could ever complete; skip the session setup
    if resolve(&query).is_err() {
        return Vec::new();
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(_) => return Vec::new(),
    };

    let predictions = runtime.block_on(async {
        let words = std::env::args_os().filter_map(|word| word.into_string().ok());
        match typed_session(SessionArgs::from_env(), words).connect().await {
            Ok(client) => StorePredictor::new(client).predict(&query).await,
            Err(_) => Vec::new(),
        }
    });

    predictions
        .into_iter()
        .map(|candidate| CompletionCandidate::new(shell_candidate(candidate, with_scheme)))
        .collect()
}

/// Apply session flags found among the words typed so far
fn typed_session<I>(mut session: SessionArgs, words: I) -> SessionArgs
where
    I: IntoIterator<Item = String>,
{
    let mut words = words.into_iter();
    while let Some(word) = words.next() {
        if let Some(value) = word.strip_prefix("--profile=") {
            session.profile = Some(value.to_string());
        } else if let Some(value) = word.strip_prefix("--config=") {
            session.config = Some(PathBuf::from(value));
        } else if word == "--profile" {
            if let Some(value) = words.next() {
                session.profile = Some(value);
            }
        } else if word == "--config" {
            if let Some(value) = words.next() {
                session.config = Some(PathBuf::from(value));
            }
        }
    }
    session
}

/// Turn the shell's current word into a reference for prediction
///
/// Returns the query and whether the shell's word carried the scheme.
fn completion_query(current: &str) -> (String, bool) {
    if current.starts_with("//") {
        (format!("{SCHEME}:{current}"), false)
    } else {
        (current.to_string(), true)
    }
}

/// Render a predicted candidate in the shape of the shell's word
fn shell_candidate(candidate: String, with_scheme: bool) -> String {
    if with_scheme {
        format!("{SCHEME}:{candidate}")
    } else {
        candidate
    }
}
