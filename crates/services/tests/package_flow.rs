use std::sync::Arc;

use scorm_core::model::{CourseDraft, SurveyDomain};
use scorm_core::time::fixed_clock;
use services::{PackageError, PackageService, PackagerConfig};
use storage::{FsPackageStore, PackageStore, StorageError, list_entries, read_entry};

fn draft(url: &str) -> CourseDraft {
    CourseDraft {
        survey_url: url.into(),
        title: "Onboarding Feedback".into(),
        description: "Week one check-in".into(),
        identifier: Some("acme.onboarding.feedback".into()),
    }
}

#[tokio::test]
async fn writes_a_complete_package_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = PackagerConfig {
        out_dir: dir.path().join("dist"),
        ..PackagerConfig::default()
    };
    let store: Arc<dyn PackageStore> = Arc::new(FsPackageStore::new(&config.out_dir, fixed_clock()));
    let service = PackageService::new(fixed_clock(), Arc::clone(&store), config.survey_domain);

    let stored = service
        .generate(draft("https://acme.typeform.com/to/Xy12"))
        .await
        .unwrap();

    assert_eq!(stored.file_name, "acme.onboarding.feedback.zip");
    let on_disk = std::fs::read(config.out_dir.join(&stored.file_name)).unwrap();
    assert_eq!(on_disk.len() as u64, stored.size);

    let entries = list_entries(&on_disk).unwrap();
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0], "imsmanifest.xml");

    let manifest = read_entry(&on_disk, "imsmanifest.xml").unwrap();
    assert!(manifest.contains(r#"identifier="acme.onboarding.feedback""#));
    let page = read_entry(&on_disk, "index.html").unwrap();
    assert!(page.contains(r#"src="https://acme.typeform.com/to/Xy12""#));
    let schema = read_entry(&on_disk, "imscp_rootv1p1.xsd").unwrap();
    assert!(schema.contains("<xsd:schema"));

    let listed = store.list_packages().await.unwrap();
    assert_eq!(listed, vec![stored.file_name]);
}

#[tokio::test]
async fn foreign_survey_host_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn PackageStore> = Arc::new(FsPackageStore::new(dir.path(), fixed_clock()));
    let service = PackageService::new(fixed_clock(), Arc::clone(&store), SurveyDomain::default());

    let err = service
        .generate(draft("https://forms.example.com/to/Xy12"))
        .await
        .unwrap_err();

    assert!(matches!(err, PackageError::Course(_)));
    assert!(store.list_packages().await.unwrap().is_empty());
    assert!(matches!(
        store.get_package("acme.onboarding.feedback.zip").await,
        Err(StorageError::NotFound)
    ));
}
