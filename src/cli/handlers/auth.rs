//! Credential commands: save a pasted cookie header, show what is stored.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::auth::{
    cache_path, import_cookie_header, load_cached_tokens, resolve_credentials, save_tokens,
    CredentialSource,
};
use crate::cli::output::{
    output_json, print_error, print_header, print_hint, print_kv, print_success, OutputMode,
};
use crate::init::AppContext;

/// Accepts a bare header value or a copied `Cookie: ...` line.
fn strip_header_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.split_once(':') {
        Some((name, value)) if name.eq_ignore_ascii_case("cookie") => value.trim(),
        _ => trimmed,
    }
}

fn read_header(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read cookies from stdin")?;
            Ok(buf)
        }
    }
}

#[derive(Serialize)]
struct SavedAuth {
    cache_path: String,
    cookie_count: usize,
    parsed_count: usize,
}

pub async fn handle_auth_save(
    ctx: &AppContext,
    file: Option<&Path>,
    force: bool,
    mode: OutputMode,
) -> Result<()> {
    let raw = read_header(file)?;
    let import = import_cookie_header(strip_header_name(&raw), "", "", !force)?;

    let path = cache_path(&ctx.data_path);
    save_tokens(&path, &import.tokens)?;
    ctx.reset_client().await;

    let saved = SavedAuth {
        cache_path: path.display().to_string(),
        cookie_count: import.tokens.cookies.len(),
        parsed_count: import.parsed_count,
    };

    match mode {
        OutputMode::Json => output_json(&saved),
        OutputMode::Human => {
            print_success(&format!(
                "Saved {} essential cookies (filtered from {}) to {}",
                saved.cookie_count, saved.parsed_count, saved.cache_path
            ));
            print_hint("CSRF token and session id are derived from the landing page on first use.");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct AuthStatus {
    source: Option<CredentialSource>,
    cookie_count: usize,
    has_csrf_token: bool,
    cache_path: String,
    saved_at: Option<String>,
    error: Option<String>,
}

pub fn handle_auth_show(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let path = cache_path(&ctx.data_path);
    let saved_at = match load_cached_tokens(&path) {
        Ok(cached) => cached.map(|t| t.extracted_at.to_rfc3339()),
        Err(e) => {
            tracing::warn!("Unreadable auth cache {}: {}", path.display(), e);
            None
        }
    };

    let status = match resolve_credentials(&ctx.data_path) {
        Ok(credentials) => AuthStatus {
            source: Some(credentials.source),
            cookie_count: credentials.cookies.len(),
            has_csrf_token: !credentials.csrf_token.is_empty(),
            cache_path: path.display().to_string(),
            saved_at,
            error: None,
        },
        Err(e) => AuthStatus {
            source: None,
            cookie_count: 0,
            has_csrf_token: false,
            cache_path: path.display().to_string(),
            saved_at,
            error: Some(e.to_string()),
        },
    };

    match mode {
        OutputMode::Json => output_json(&status),
        OutputMode::Human => {
            print_header("Credentials");
            if let Some(error) = &status.error {
                print_error(error);
                print_hint("Pipe a Cookie header into `nblm auth` to save one.");
                return Ok(());
            }
            let source = match status.source {
                Some(CredentialSource::Environment) => "environment",
                _ => "cache",
            };
            print_kv("Source", source);
            print_kv("Cookies", &status.cookie_count.to_string());
            print_kv(
                "CSRF token",
                if status.has_csrf_token {
                    "provided"
                } else {
                    "derived on first use"
                },
            );
            print_kv("Cache", &status.cache_path);
            if let Some(saved_at) = &status.saved_at {
                print_kv("Saved at", saved_at);
            }
        }
    }
    Ok(())
}
