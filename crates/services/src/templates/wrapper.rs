use scorm_core::model::{Course, SurveyDomain};

use super::escape::{escape_js_string, escape_xml};

const WRAPPER_TEMPLATE: &str = include_str!("../../assets/index.html");
const TRACKING_SCRIPT_TEMPLATE: &str = include_str!("../../assets/scorm.js");

/// `index.html`: hosts the survey in an iframe and drives the tracking
/// session from the page's load, message and unload events.
#[must_use]
pub fn render_wrapper_page(course: &Course, survey_domain: &SurveyDomain) -> String {
    WRAPPER_TEMPLATE
        .replace("{{TITLE}}", &escape_xml(course.title()))
        .replace("{{SURVEY_URL}}", &escape_xml(course.survey_url().as_str()))
        .replace("{{SURVEY_DOMAIN}}", &escape_js_string(survey_domain.as_str()))
}

/// `scorm.js`: API locator and tracking session for the browser.
#[must_use]
pub fn render_tracking_script(max_retries: u32) -> String {
    TRACKING_SCRIPT_TEMPLATE.replace("{{MAX_RETRIES}}", &max_retries.to_string())
}
