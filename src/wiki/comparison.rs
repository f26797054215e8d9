// src/wiki/comparison.rs - Multi-user comparison links for external stats tools

use log::debug;
use std::collections::HashMap;
use url::form_urlencoded;

use super::{WikiError, WikiResult};

/// An external tool that compares the edits of several users
#[derive(Debug, Clone)]
pub struct ComparisonTool {
    base_url: String,
    defaults: Vec<(String, String)>,
    keywords: HashMap<String, String>,
}

/// Outcome of building a comparison link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Ready-to-send bracketed URL
    Url(String),
    /// Ready-to-send explanation of the unknown or malformed flags
    BadSyntax(String),
}

impl ComparisonTool {
    /// `base_url` must end where the query string starts (usually with `?`)
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            defaults: Vec::new(),
            keywords: HashMap::new(),
        }
    }

    /// Add a query parameter sent when no flag overrides it
    pub fn default_param(mut self, param: &str, value: &str) -> Self {
        self.defaults.push((param.to_string(), value.to_string()));
        self
    }

    /// Map a user-facing flag keyword to a query parameter.
    /// The `user` keyword names the parameter each username is sent under.
    pub fn keyword(mut self, keyword: &str, param: &str) -> Self {
        self.keywords.insert(keyword.to_string(), param.to_string());
        self
    }

    /// sigma's Editor Interaction Analyser
    pub fn editor_interaction() -> Self {
        Self::new("https://sigma.toolforge.org/editorinteract.py?")
            .default_param("server", "enwiki")
            .default_param("allusers", "on")
            .default_param("startdate", "")
            .default_param("enddate", "")
            .default_param("ns", "")
            .keyword("user", "users")
            .keyword("server", "server")
            .keyword("wiki", "server")
            .keyword("start", "startdate")
            .keyword("end", "enddate")
            .keyword("ns", "ns")
            .keyword("namespace", "ns")
    }

    /// The Interaction Timeline tool
    pub fn interaction_timeline() -> Self {
        Self::new("https://interaction-timeline.toolforge.org/?")
            .default_param("wiki", "enwiki")
            .keyword("user", "user")
            .keyword("wiki", "wiki")
            .keyword("server", "wiki")
            .keyword("start", "startDate")
            .keyword("end", "endDate")
    }

    fn user_param(&self) -> &str {
        self.keywords.get("user").map(String::as_str).unwrap_or("user")
    }
}

/// Build a comparison link from `user1|user2[#flag:value...]`.
///
/// Fewer than two usernames is an input error. Bad flags are not: they come
/// back as [`Comparison::BadSyntax`] naming `command` so the message can be
/// relayed to the user as is.
pub fn comparison_url(
    args: &str,
    tool: &ComparisonTool,
    command: &str,
    prefix: &str,
) -> WikiResult<Comparison> {
    let (names, flags) = match args.split_once('#') {
        Some((names, flags)) => (names, Some(flags)),
        None => (args, None),
    };

    let usernames: Vec<&str> = names
        .split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    if usernames.len() < 2 {
        return Err(WikiError::TooFewUsernames { found: usernames.len() });
    }

    let mut params = tool.defaults.clone();
    if let Some(flags) = flags {
        let mut parsed = Vec::new();
        let mut malformed = Vec::new();
        for clause in flags.split('#') {
            match clause.split_once(':') {
                Some((keyword, value)) => parsed.push((keyword.trim(), value.trim())),
                None => malformed.push(clause.trim()),
            }
        }

        if !malformed.is_empty() {
            debug!("Malformed comparison flags for {}: {:?}", command, malformed);
            return Ok(Comparison::BadSyntax(format!(
                "Invalid syntax with the following parameter{}: {}. Remember to include a colon \
                 and value after each parameter. For more information, type `{}help {}`.",
                plural(malformed.len()),
                quoted_list(&malformed),
                prefix,
                command
            )));
        }

        let unknown: Vec<&str> = parsed
            .iter()
            .map(|(keyword, _)| *keyword)
            .filter(|keyword| !tool.keywords.contains_key(*keyword))
            .collect();
        if !unknown.is_empty() {
            debug!("Unknown comparison flags for {}: {:?}", command, unknown);
            return Ok(Comparison::BadSyntax(format!(
                "`{}{}` does not accept the following parameter{}: {}. For more information, \
                 type `{}help {}`.",
                prefix,
                command,
                plural(unknown.len()),
                quoted_list(&unknown),
                prefix,
                command
            )));
        }

        for (keyword, value) in parsed {
            let param = &tool.keywords[keyword];
            match params.iter_mut().find(|(name, _)| name == param) {
                Some(existing) => existing.1 = value.to_string(),
                None => params.push((param.clone(), value.to_string())),
            }
        }
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    let user_param = tool.user_param();
    for name in &usernames {
        query.append_pair(user_param, name);
    }
    for (param, value) in &params {
        query.append_pair(param, value);
    }

    Ok(Comparison::Url(format!("<{}{}>", tool.base_url, query.finish())))
}

fn plural(count: usize) -> &'static str {
    if count > 1 { "s" } else { "" }
}

fn quoted_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("`{}`", item))
        .collect::<Vec<_>>()
        .join(", ")
}
