//! Display text for estimates.

use license_estimator_sdk::{Estimate, EstimateError};

/// Shown when no line has a positive quantity.
pub const NO_LICENSE_REQUIRED: &str =
    "No license required based on your current inputs and feature selection.";

/// Line placed between the rationale and the license lines.
pub const RATIONALE_SEPARATOR: &str = "---";

/// Render an estimate as newline-separated text.
#[must_use]
pub fn render(estimate: &Estimate) -> String {
    match estimate {
        Estimate::NoLicenseRequired => NO_LICENSE_REQUIRED.to_owned(),
        Estimate::Licensed { rationale, lines } => {
            let mut out: Vec<String> = Vec::with_capacity(lines.len() + 2);
            if let Some(rationale) = rationale {
                out.push(rationale.to_string());
                out.push(RATIONALE_SEPARATOR.to_owned());
            }
            out.extend(lines.iter().map(ToString::to_string));
            out.join("\n")
        }
    }
}

/// Validation errors are shown to the user verbatim.
#[must_use]
pub fn render_error(err: &EstimateError) -> String {
    err.to_string()
}

#[must_use]
pub fn render_result(result: &Result<Estimate, EstimateError>) -> String {
    match result {
        Ok(estimate) => render(estimate),
        Err(err) => render_error(err),
    }
}
