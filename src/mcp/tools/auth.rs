//! save_auth_tokens: store a pasted cookie header and drop the cached client.

use crate::auth::{cache_path, import_cookie_header, save_tokens};
use crate::mcp::error::ToolError;
use crate::mcp::types::{SaveAuthTokensInput, SaveAuthTokensResponse, ToolStatus};
use crate::mcp::NblmServer;

fn token_note(has_csrf: bool, has_session: bool) -> &'static str {
    match (has_csrf, has_session) {
        (true, true) => "CSRF token and session ID saved.",
        (true, false) => "CSRF token saved; session ID will be derived when needed.",
        (false, true) => "Session ID saved; CSRF token will be derived when needed.",
        (false, false) => "CSRF token and session ID will be derived when needed.",
    }
}

impl NblmServer {
    pub async fn handle_save_auth_tokens(
        &self,
        input: SaveAuthTokensInput,
    ) -> Result<SaveAuthTokensResponse, ToolError> {
        let import = import_cookie_header(
            &input.cookies,
            input.csrf_token.as_deref().unwrap_or_default(),
            input.session_id.as_deref().unwrap_or_default(),
            true,
        )?;

        let path = cache_path(&self.ctx.data_path);
        save_tokens(&path, &import.tokens)?;
        self.ctx.reset_client().await;

        let kept = import.tokens.cookies.len();
        let note = token_note(
            !import.tokens.csrf_token.is_empty(),
            !import.tokens.session_id.is_empty(),
        );
        Ok(SaveAuthTokensResponse {
            status: ToolStatus::Success,
            message: format!(
                "Saved {kept} essential cookies (filtered from {}). {note}",
                import.parsed_count
            ),
            cache_path: path.display().to_string(),
            cookie_count: kept,
        })
    }
}
