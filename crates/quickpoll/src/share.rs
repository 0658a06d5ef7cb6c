//! Copying share links to the system clipboard.

use clipboard_rs::{Clipboard, ClipboardContext};
use tracing::debug;

use crate::error::{Error, Result};

/// Place `text` on the system clipboard.
///
/// On X11 the selection is served by this process, so the text may not
/// outlive it unless a clipboard manager takes ownership.
///
/// # Errors
///
/// Returns [`Error::Clipboard`] if no clipboard is available or the write fails.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let ctx = ClipboardContext::new().map_err(|e| Error::clipboard(e.to_string()))?;
    ctx.set_text(text.to_string())
        .map_err(|e| Error::clipboard(e.to_string()))?;
    debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}
