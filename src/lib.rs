pub mod error;
pub mod fonts;
pub mod labels;
pub mod model;
pub mod normalize;
pub mod options;
pub mod pdf;
pub mod phone;
pub mod report;

pub use error::{Error, Result};
pub use model::{ClientInfo, RenderRequest, Requester, Role, Submission, SubmissionId};
pub use options::RenderOptions;
pub use report::RenderedReport;

use std::path::Path;
use std::time::Instant;

use serde_json::Value;

/// Accepts either `{"submission": …, "requester": …}` or a bare submission record.
pub fn parse_request(input: &[u8]) -> Result<RenderRequest> {
    let value: Value = serde_json::from_slice(input)?;
    if !value.is_object() {
        return Err(Error::InvalidInput("expected a JSON object".to_string()));
    }
    if value.get("submission").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(RenderRequest {
            submission: serde_json::from_value(value)?,
            requester: Requester::default(),
        })
    }
}

pub fn render_submission(request: &RenderRequest, options: &RenderOptions) -> Result<RenderedReport> {
    report::render(request, options)
}

/// Render a JSON request file. `output` may be a file or an existing directory, in which
/// case the suggested filename is used inside it. Returns the path written.
pub fn render_file(input: &Path, output: &Path, options: &RenderOptions) -> Result<std::path::PathBuf> {
    let t0 = Instant::now();

    let raw = std::fs::read(input)?;
    let request = parse_request(&raw)?;
    let t_parse = t0.elapsed();

    let report = render_submission(&request, options)?;
    let t_render = t0.elapsed();

    let target = if output.is_dir() {
        output.join(&report.filename)
    } else {
        output.to_path_buf()
    };
    std::fs::write(&target, &report.bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        report.bytes.len(),
    );

    Ok(target)
}
