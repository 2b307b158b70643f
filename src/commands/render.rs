//! `statecraft render`

use std::io::Write;

use log::warn;

use super::CommandStatus;
use crate::config::RenderOptions;
use crate::server::{open_browser, RenderServer, ServerError};

/// Starts the render server and blocks until it stops.
///
/// Prints the URL to `out` once the port is bound.
pub fn render<O: Write>(options: RenderOptions, out: &mut O) -> Result<CommandStatus, ServerError> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let server = RenderServer::bind(&options).await?;
        let url = server.url()?;

        writeln!(out, "Open {}", url)?;
        out.flush()?;

        if options.open_browser {
            if let Err(e) = open_browser(&url) {
                warn!("Failed to open browser: {}", e);
            }
        }

        server.run().await?;
        Ok::<_, ServerError>(CommandStatus::Success)
    })
}
