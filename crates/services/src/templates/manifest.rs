use scorm_core::model::Course;

use super::escape::escape_xml;
use super::{TRACKING_SCRIPT_FILE, WRAPPER_FILE};

/// `imsmanifest.xml`: one organization with one visible item pointing at a
/// single SCO resource made of the wrapper page and the tracking script.
#[must_use]
pub fn render_manifest(course: &Course) -> String {
    let identifier = escape_xml(course.identifier().as_str());
    let title = escape_xml(course.title());
    let description = escape_xml(course.description());
    let survey_url = escape_xml(course.survey_url().as_str());

    format!(
        r#"<?xml version="1.0" standalone="no" ?>
<manifest identifier="{identifier}" version="1.2"
    xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2"
    xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://www.imsproject.org/xsd/imscp_rootv1p1p2 imscp_rootv1p1.xsd http://www.imsglobal.org/xsd/imsmd_rootv1p2p1 imsmd_rootv1p2p1.xsd http://www.adlnet.org/xsd/adlcp_rootv1p2 adlcp_rootv1p2.xsd">
    <metadata>
        <schema>ADL SCORM</schema>
        <schemaversion>1.2</schemaversion>
        <lom xmlns="http://www.imsglobal.org/xsd/imsmd_rootv1p2p1">
            <general>
                <title>
                    <langstring xml:lang="en-US">{title}</langstring>
                </title>
                <description>
                    <langstring xml:lang="en-US">{description}</langstring>
                </description>
            </general>
            <technical>
                <location>{survey_url}</location>
            </technical>
        </lom>
    </metadata>
    <organizations default="{identifier}_org">
        <organization identifier="{identifier}_org" structure="hierarchical">
            <title>{title}</title>
            <item identifier="item_1" identifierref="res_1" isvisible="true">
                <title>{title}</title>
            </item>
        </organization>
    </organizations>
    <resources>
        <resource identifier="res_1" type="webcontent" adlcp:scormtype="sco" href="{WRAPPER_FILE}">
            <file href="{WRAPPER_FILE}" />
            <file href="{TRACKING_SCRIPT_FILE}" />
        </resource>
    </resources>
</manifest>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorm_core::model::{CourseDraft, SurveyDomain};

    fn course(title: &str) -> Course {
        CourseDraft {
            survey_url: "https://acme.typeform.com/to/AbCd12?utm=lms&x=1".into(),
            title: title.into(),
            description: "Quarterly pulse <survey>".into(),
            identifier: Some("acme.pulse.q3".into()),
        }
        .validate(&SurveyDomain::default())
        .unwrap()
    }

    #[test]
    fn declares_single_sco_resource() {
        let xml = render_manifest(&course("Pulse Survey"));

        assert!(xml.contains(r#"<manifest identifier="acme.pulse.q3" version="1.2""#));
        assert!(xml.contains(r#"<organizations default="acme.pulse.q3_org">"#));
        assert!(xml.contains(r#"adlcp:scormtype="sco" href="index.html""#));
        assert!(xml.contains(r#"<file href="index.html" />"#));
        assert!(xml.contains(r#"<file href="scorm.js" />"#));
        assert_eq!(xml.matches("<item ").count(), 1);
        assert_eq!(xml.matches("<resource ").count(), 1);
        assert!(xml.contains("<schemaversion>1.2</schemaversion>"));
    }

    #[test]
    fn escapes_metadata() {
        let xml = render_manifest(&course("R&D \"Check-in\""));

        assert!(xml.contains("<title>R&amp;D &quot;Check-in&quot;</title>"));
        assert!(xml.contains("Quarterly pulse &lt;survey&gt;"));
        assert!(xml.contains("<location>https://acme.typeform.com/to/AbCd12?utm=lms&amp;x=1</location>"));
        assert!(!xml.contains("R&D"));
    }
}
