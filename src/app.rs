//! Picks the adapters for this run and drives the pipeline.

use tracing::{error, info};

use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::pipeline;

/// Runs the pipeline once for `config.branch`.
///
/// `TASKPILOT_REPLAY=<dir>` serves every port from the cassettes in `dir`;
/// otherwise `TASKPILOT_RECORD=<dir>` records the live run into a new
/// subdirectory of `dir`.
///
/// # Errors
///
/// Returns the pipeline's error message, or a setup failure.
pub async fn dispatch(config: &Config) -> Result<(), String> {
    let (ctx, session) = if let Some(dir) = &config.replay_dir {
        info!(dir = %dir.display(), "Replaying cassettes");
        let cassettes = CassetteConfig::from_dir(dir);
        (ServiceContext::replaying_from(&cassettes, &config.workdir).map_err(|e| e.to_string())?, None)
    } else if let Some(root) = &config.record_dir {
        let (ctx, session) = ServiceContext::recording(config, root).map_err(|e| e.to_string())?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(config).map_err(|e| e.to_string())?, None)
    };

    let result = pipeline::run(&ctx, config).await.map(drop).map_err(|e| e.to_string());

    // Finish recording even when the run failed.
    if let Some(session) = session {
        drop(ctx);
        if let Err(e) = finish_recording(session) {
            error!(error = %e, "Failed to write cassettes");
            return result.and(Err(e));
        }
    }

    result
}

fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    info!(dir = %output_dir.display(), "Recording saved");
    Ok(())
}
