// ==========================================
// 导入管道集成测试（SQLite 实库）
// ==========================================
// 测试目标: 解析 → 标准化 → 分块 → 并发提交 → 汇总 全流程
// ==========================================

mod test_helpers;

use callfile_import::config::ConfigManager;
use callfile_import::importer::{CustomerImporter, CustomerImporterImpl, ImportError};
use callfile_import::logging;
use callfile_import::repository::CustomerImportRepositoryImpl;
use callfile_import::ImportStatus;
use rusqlite::Connection;

type SqliteImporter = CustomerImporterImpl<CustomerImportRepositoryImpl, ConfigManager>;

fn create_test_importer(db_path: &str) -> SqliteImporter {
    let import_repo = CustomerImportRepositoryImpl::new(db_path).expect("Failed to create repo");
    let config = ConfigManager::new(db_path).expect("Failed to create config");
    CustomerImporterImpl::new(import_repo, config)
}

fn stored_payload(db_path: &str, case_id: &str) -> serde_json::Value {
    let conn = Connection::open(db_path).unwrap();
    let raw: String = conn
        .query_row(
            "SELECT payload_json FROM customer WHERE case_id = ?1",
            [case_id],
            |row| row.get(0),
        )
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_import_4500_rows_in_three_chunks() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let bytes = test_helpers::build_callfile_xlsx(4500).unwrap();
    let report = importer
        .import_spreadsheet("March Callfile.xlsx", &bytes, None)
        .await
        .unwrap();

    assert_eq!(report.status, ImportStatus::AllSucceeded);
    assert_eq!(report.submitted, 4500);
    assert_eq!(report.chunk_count, 3);
    assert_eq!(report.failed_chunks, 0);
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.context.callfile_name, "March Callfile");
    assert!(!importer.is_uploading());

    assert_eq!(
        test_helpers::count_customers(&db_path, "March Callfile").unwrap(),
        4500
    );
}

#[tokio::test]
async fn test_stored_records_are_normalized() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let bytes = test_helpers::build_callfile_xlsx(12).unwrap();
    let report = importer
        .import_spreadsheet("normalized.xlsx", &bytes, None)
        .await
        .unwrap();
    assert_eq!(report.status, ImportStatus::AllSucceeded);

    // 第 0 行 principal 不可解析 → 回退 total_os
    let first = stored_payload(&db_path, "CASE00000");
    assert_eq!(first["principal"], 12500.75);
    assert_eq!(first["total_os"], 12500.75);
    assert_eq!(first["balance"], 12500.75);
    assert_eq!(first["interest"], 0.0);
    assert_eq!(first["bill_due_date"], "2024-03-15");
    assert_eq!(
        first["contact_no"],
        serde_json::json!(["09171234567", "09181234567", "09180001111"])
    );
    assert_eq!(first["email"], serde_json::json!(["c0@example.com"]));
    assert_eq!(first["Full_Name"], "Customer 0");
    assert!(first.get("Case_ID").is_none());
    assert!(first.get("emergency_contact_mobile_number").is_none());

    let second = stored_payload(&db_path, "CASE00001");
    assert_eq!(second["principal"], 1001.0);
}

#[tokio::test]
async fn test_reimport_same_name_is_duplicate_batch() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        test_helpers::insert_test_config(&conn, 10, 3).unwrap();
    }
    let importer = create_test_importer(&db_path);
    let bytes = test_helpers::build_callfile_xlsx(35).unwrap();

    let first = importer
        .import_spreadsheet("april.xlsx", &bytes, None)
        .await
        .unwrap();
    assert_eq!(first.status, ImportStatus::AllSucceeded);
    assert_eq!(first.chunk_count, 4);

    let second = importer
        .import_spreadsheet("april.xlsx", &bytes, None)
        .await
        .unwrap();
    assert_eq!(second.status, ImportStatus::DuplicateBatchName);
    assert_eq!(second.failed_chunks, 4);
    assert!(!second.status.is_service_degraded());

    // 第二次导入没有写入任何记录
    assert_eq!(test_helpers::count_customers(&db_path, "april").unwrap(), 35);
}

#[tokio::test]
async fn test_bucket_must_be_included() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let importer = create_test_importer(&db_path);
    let bytes = test_helpers::build_callfile_xlsx(5).unwrap();

    let report = importer
        .import_spreadsheet("may.xlsx", &bytes, Some("B-UNKNOWN"))
        .await
        .unwrap();
    assert_eq!(report.status, ImportStatus::BucketNotIncluded);
    assert_eq!(test_helpers::count_customers(&db_path, "may").unwrap(), 0);

    importer
        .repository()
        .register_bucket("B-01", "Skip Bucket")
        .unwrap();
    let report = importer
        .import_spreadsheet("may.xlsx", &bytes, Some("B-01"))
        .await
        .unwrap();
    assert_eq!(report.status, ImportStatus::AllSucceeded);
    assert_eq!(
        importer
            .repository()
            .count_customers("may", Some("B-01"))
            .unwrap(),
        5
    );
}

#[tokio::test]
async fn test_garbage_bytes_abort_before_submission() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let err = importer
        .import_spreadsheet("broken.xlsx", b"this is not a workbook", None)
        .await
        .unwrap_err();
    assert!(err.is_parse_error(), "unexpected error: {err}");
    assert!(!importer.is_uploading());
    assert!(importer.repository().list_callfiles().unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_extension_rejected() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let err = importer
        .import_spreadsheet("callfile.pdf", b"%PDF-1.4", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(ref ext) if ext == "pdf"));
}

#[tokio::test]
async fn test_header_only_file_succeeds_with_zero_records() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let bytes = test_helpers::build_callfile_xlsx(0).unwrap();
    let report = importer
        .import_spreadsheet("empty.xlsx", &bytes, None)
        .await
        .unwrap();

    assert_eq!(report.status, ImportStatus::AllSucceeded);
    assert_eq!(report.submitted, 0);
    assert_eq!(report.chunk_count, 0);
    assert!(importer.repository().list_callfiles().unwrap().is_empty());
}

#[tokio::test]
async fn test_csv_import() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let bytes = test_helpers::build_callfile_csv(25);
    let report = importer
        .import_spreadsheet("june.csv", &bytes, None)
        .await
        .unwrap();

    assert_eq!(report.status, ImportStatus::AllSucceeded);
    assert_eq!(report.submitted, 25);

    let payload = stored_payload(&db_path, "CASE00003");
    assert_eq!(payload["principal"], 1003.0);
    assert_eq!(payload["total_os"], 12500.75);
    assert_eq!(payload["contact_no"], serde_json::json!(["09171234567"]));
}

#[tokio::test]
async fn test_import_from_file_path() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("july.xlsx");
    std::fs::write(&path, test_helpers::build_callfile_xlsx(7).unwrap()).unwrap();

    let report = importer.import_from_file(&path, None).await.unwrap();
    assert_eq!(report.status, ImportStatus::AllSucceeded);
    assert_eq!(report.context.callfile_name, "july");
    assert_eq!(test_helpers::count_customers(&db_path, "july").unwrap(), 7);
}
