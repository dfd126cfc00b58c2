//! Text of the files that make up a SCORM 1.2 package.

mod escape;
mod manifest;
mod schemas;
mod wrapper;

pub use escape::{escape_js_string, escape_xml};
pub use manifest::render_manifest;
pub use schemas::SCHEMA_FILES;
pub use wrapper::{render_tracking_script, render_wrapper_page};

use scorm_core::model::{Course, SurveyDomain};

pub const MANIFEST_FILE: &str = "imsmanifest.xml";
pub const WRAPPER_FILE: &str = "index.html";
pub const TRACKING_SCRIPT_FILE: &str = "scorm.js";

/// One rendered file, ready to be added to an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: &'static str,
    pub contents: String,
}

/// Render every file of the package in archive order.
#[must_use]
pub fn render_package(
    course: &Course,
    survey_domain: &SurveyDomain,
    max_retries: u32,
) -> Vec<RenderedFile> {
    let mut files = vec![
        RenderedFile {
            name: MANIFEST_FILE,
            contents: render_manifest(course),
        },
        RenderedFile {
            name: WRAPPER_FILE,
            contents: render_wrapper_page(course, survey_domain),
        },
        RenderedFile {
            name: TRACKING_SCRIPT_FILE,
            contents: render_tracking_script(max_retries),
        },
    ];
    files.extend(SCHEMA_FILES.iter().map(|&(name, contents)| RenderedFile {
        name,
        contents: contents.to_owned(),
    }));
    files
}
