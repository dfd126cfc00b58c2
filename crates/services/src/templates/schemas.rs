/// Schema files referenced by `xsi:schemaLocation` in the manifest, shipped
/// next to it so validating LMS importers work offline.
pub const SCHEMA_FILES: [(&str, &str); 4] = [
    (
        "adlcp_rootv1p2.xsd",
        include_str!("../../assets/adlcp_rootv1p2.xsd"),
    ),
    ("ims_xml.xsd", include_str!("../../assets/ims_xml.xsd")),
    (
        "imscp_rootv1p1.xsd",
        include_str!("../../assets/imscp_rootv1p1.xsd"),
    ),
    (
        "imsmd_rootv1p2p1.xsd",
        include_str!("../../assets/imsmd_rootv1p2p1.xsd"),
    ),
];
