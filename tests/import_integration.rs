// CSV upload to person store, end to end

#[path = "integration/mod.rs"]
mod integration;

use homeowners::parallel_processing::write_import_stats;
use homeowners::{
    BatchImporter, HomeownerParser, ImportConfig, ImportError, JsonFileStore, MemoryStore,
    ReaderConfig,
};
use integration::TestFixture;

#[tokio::test]
async fn test_import_csv_into_memory_store() {
    let fixture = TestFixture::new();
    let csv = fixture.create_homeowner_csv(
        "upload.csv",
        &["Mr John Smith", "Dr & Mrs Joe Bloggs", "Mr Tom Staff and Mr John Doe", "Dr P Gunn"],
    );

    let mut store = MemoryStore::new();
    let summary = BatchImporter::with_defaults()
        .import_csv(&csv, &mut store)
        .await
        .expect("import should succeed");

    let names: Vec<_> = store.all().iter().map(|p| p.full_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Mr John Smith", "Dr Bloggs", "Mrs Joe Bloggs", "Mr Tom Staff", "Mr John Doe", "Dr P Gunn"]
    );
    assert_eq!(summary.created_count(), 6);
    assert_eq!(summary.lines_read, 4);
    assert!(summary.unparsed_lines.is_empty());
    assert!(summary.review_lines.is_empty());

    let ids: Vec<_> = store.all().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_header_row_is_skipped_and_line_numbers_kept() {
    let fixture = TestFixture::new();
    let csv = fixture.create_file("upload.csv", "homeowner\nMr John Smith\nMr\nMr & Smith\n");

    let mut store = MemoryStore::new();
    let summary = BatchImporter::with_defaults()
        .import_csv(&csv, &mut store)
        .await
        .unwrap();

    // Header is line 1
    assert_eq!(summary.lines_read, 3);
    assert_eq!(summary.unparsed_lines, vec![3]);
    assert_eq!(summary.review_lines, vec![4]);
    assert!(store.search("homeowner").is_empty());
}

#[tokio::test]
async fn test_headerless_upload_with_other_column() {
    let fixture = TestFixture::new();
    let csv = fixture.create_file("upload.csv", "1,Mr John Smith\n2,Mrs Jane Smith\n");

    let config = ImportConfig {
        workers: 2,
        reader: ReaderConfig {
            has_header: false,
            column: 1,
            ..Default::default()
        },
    };
    let mut store = MemoryStore::new();
    let summary = BatchImporter::new(HomeownerParser::with_default_lexicon(), config)
        .import_csv(&csv, &mut store)
        .await
        .unwrap();

    assert_eq!(summary.created_count(), 2);
    assert_eq!(store.all()[1].full_name, "Mrs Jane Smith");
}

#[tokio::test]
async fn test_reimport_into_json_store_skips_duplicates() {
    let fixture = TestFixture::new();
    let csv = fixture.create_homeowner_csv("upload.csv", &["Mr and Mrs Smith", "Mr Smith", "Dr P Gunn"]);
    let importer = BatchImporter::with_defaults();

    let mut store = JsonFileStore::load(fixture.store_path()).unwrap();
    let first = importer.import_csv(&csv, &mut store).await.unwrap();
    assert_eq!(first.created_count(), 3);
    assert_eq!(first.skipped_duplicates, 1);

    // A fresh handle sees what the first import committed
    let mut reopened = JsonFileStore::load(fixture.store_path()).unwrap();
    assert_eq!(reopened.people().len(), 3);

    let second = importer.import_csv(&csv, &mut reopened).await.unwrap();
    assert_eq!(second.created_count(), 0);
    assert_eq!(second.skipped_duplicates, 4);
    assert_eq!(JsonFileStore::load(fixture.store_path()).unwrap().people().len(), 3);
}

#[tokio::test]
async fn test_search_after_import() {
    let fixture = TestFixture::new();
    let csv = fixture.create_homeowner_csv("upload.csv", &["Mr John Smith", "Mrs Jane McMaster", "Dr P Gunn"]);

    let mut store = JsonFileStore::load(fixture.store_path()).unwrap();
    BatchImporter::with_defaults().import_csv(&csv, &mut store).await.unwrap();

    let hits: Vec<_> = store.people().search("mcmaster").iter().map(|p| p.full_name.clone()).collect();
    assert_eq!(hits, vec!["Mrs Jane McMaster"]);
    assert_eq!(store.people().search("m").len(), 2);
}

#[tokio::test]
async fn test_non_csv_upload_is_rejected_before_reading() {
    let fixture = TestFixture::new();
    let txt = fixture.create_file("upload.txt", "homeowner\nMr John Smith\n");

    let mut store = MemoryStore::new();
    let result = BatchImporter::with_defaults().import_csv(&txt, &mut store).await;

    assert!(matches!(result, Err(ImportError::Validation(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_missing_upload_is_rejected() {
    let fixture = TestFixture::new();
    let mut store = MemoryStore::new();

    let result = BatchImporter::with_defaults()
        .import_csv(&fixture.root_path.join("nope.csv"), &mut store)
        .await;

    assert!(matches!(result, Err(ImportError::Validation(_))));
}

#[tokio::test]
async fn test_import_stats_written_as_json() {
    let fixture = TestFixture::new();
    let csv = fixture.create_homeowner_csv("upload.csv", &["Mr John Smith", "Mr"]);

    let mut store = MemoryStore::new();
    let summary = BatchImporter::with_defaults().import_csv(&csv, &mut store).await.unwrap();

    let stats_path = fixture.root_path.join("out/import_stats.json");
    write_import_stats(&stats_path, &summary.to_stats(&csv, 10)).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&stats_path).unwrap()).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["created"], 1);
    assert_eq!(json["lines_read"], 2);
    assert_eq!(json["unparsed_lines"], serde_json::json!([3]));
    assert_eq!(json["lines_per_sec"], 200.0);
}

#[tokio::test]
async fn test_blank_cells_are_counted_not_parsed() {
    let fixture = TestFixture::new();
    let csv = fixture.create_file(
        "upload.csv",
        "id,homeowner\n1,Mr John Smith\n2,\n3,   \n4,Dr P Gunn\n",
    );

    let config = ImportConfig {
        reader: ReaderConfig {
            column: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut store = MemoryStore::new();
    let summary = BatchImporter::new(HomeownerParser::with_default_lexicon(), config)
        .import_csv(&csv, &mut store)
        .await
        .unwrap();

    assert_eq!(summary.lines_read, 2);
    assert_eq!(summary.blank_rows, 2);
    assert!(summary.unparsed_lines.is_empty());

    let stats_path = fixture.root_path.join("import_stats.json");
    write_import_stats(&stats_path, &summary.to_stats(&csv, 5)).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&stats_path).unwrap()).unwrap();
    assert_eq!(json["blank_rows"], 2);
}
