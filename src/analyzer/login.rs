// src/analyzer/login.rs
// =============================================================================
// This module decides whether a page contains a login form.
//
// A form is a login form when it has a password field AND at least one
// piece of text around it talks about logging in. The text is checked in
// this order, stopping at the first hit:
// 1. the form's action URL
// 2. the submit buttons (their text or value)
// 3. the inputs and labels (placeholder, aria-label, name, id, text)
//
// Forms are checked in document order and the search stops at the first
// login form found.
// =============================================================================

use crate::analyzer::document::{css, element_text, Document};
use crate::error::Result;
use scraper::ElementRef;
use tracing::debug;

/// Words that suggest a form is about logging in (matched lower-case, as substrings)
pub const LOGIN_KEYWORDS: &[&str] = &[
    "login",
    "sign in",
    "log in",
    "auth",
    "access",
    "anmelden",
    "connexion",
];

// Attributes of inputs and labels that may hint at a login form
const HINT_ATTRIBUTES: &[&str] = &["placeholder", "aria-label", "name", "id"];

/// Which part of a form gave it away as a login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSignal {
    Action,
    SubmitControl,
    FieldHint,
}

pub fn contains_login_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    LOGIN_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Whether any form on the page is a login form
pub fn has_login_form(document: &Document) -> Result<bool> {
    let found = document.find_first("form", |form| Ok(login_signal(form)?.is_some()))?;
    Ok(found.is_some())
}

// Why `form` looks like a login form, or None if it does not
pub fn login_signal(form: &ElementRef<'_>) -> Result<Option<LoginSignal>> {
    // No password field, no login form; nothing else matters
    if !has_password_field(form)? {
        return Ok(None);
    }

    let signal = if action_mentions_login(form) {
        Some(LoginSignal::Action)
    } else if submit_controls_mention_login(form)? {
        Some(LoginSignal::SubmitControl)
    } else if field_hints_mention_login(form)? {
        Some(LoginSignal::FieldHint)
    } else {
        None
    };

    if let Some(signal) = signal {
        debug!("Login form detected via {:?}", signal);
    }
    Ok(signal)
}

fn has_password_field(form: &ElementRef<'_>) -> Result<bool> {
    let inputs = css("input")?;
    Ok(form
        .select(&inputs)
        .any(|input| has_type(&input, &["password"])))
}

fn action_mentions_login(form: &ElementRef<'_>) -> bool {
    form.value()
        .attr("action")
        .map(contains_login_keyword)
        .unwrap_or(false)
}

// Submit inputs, submit buttons and plain buttons
fn submit_controls_mention_login(form: &ElementRef<'_>) -> Result<bool> {
    let controls = css("input, button")?;

    Ok(form.select(&controls).filter(is_submit_like).any(|control| {
        contains_login_keyword(&element_text(&control))
            || control
                .value()
                .attr("value")
                .map(contains_login_keyword)
                .unwrap_or(false)
    }))
}

fn is_submit_like(control: &ElementRef<'_>) -> bool {
    match control.value().name() {
        // A <button> without a type submits the form
        "button" => control.value().attr("type").is_none() || has_type(control, &["submit", "button"]),
        _ => has_type(control, &["submit", "button"]),
    }
}

fn field_hints_mention_login(form: &ElementRef<'_>) -> Result<bool> {
    let fields = css("input, label")?;

    Ok(form.select(&fields).any(|field| {
        HINT_ATTRIBUTES
            .iter()
            .filter_map(|name| field.value().attr(name))
            .any(contains_login_keyword)
            || contains_login_keyword(&element_text(&field))
    }))
}

// Case-insensitive check of the element's type attribute
fn has_type(element: &ElementRef<'_>, types: &[&str]) -> bool {
    element
        .value()
        .attr("type")
        .map(|kind| types.iter().any(|t| kind.trim().eq_ignore_ascii_case(t)))
        .unwrap_or(false)
}
