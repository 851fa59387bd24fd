use chrono::NaiveDate;
use lazymemo_core::model::memo::{validate_fields, CONTENT_MAX_CHARS, TITLE_MAX_CHARS};
use lazymemo_core::{Memo, MemoId, MemoValidationError, NewMemo};

#[test]
fn new_memo_starts_without_create_date() {
    let memo = NewMemo::new("title", "content");
    assert_eq!(memo.title, "title");
    assert_eq!(memo.content, "content");
    assert_eq!(memo.create_date, None);
    assert!(memo.validate().is_ok());
}

#[test]
fn validate_rejects_blank_fields() {
    assert_eq!(
        NewMemo::new("  ", "body").validate(),
        Err(MemoValidationError::EmptyTitle)
    );
    assert_eq!(
        NewMemo::new("title", "\n\t").validate(),
        Err(MemoValidationError::EmptyContent)
    );
}

#[test]
fn length_limits_count_characters_not_bytes() {
    let title = "é".repeat(TITLE_MAX_CHARS);
    let content = "🥚".repeat(CONTENT_MAX_CHARS);
    assert!(validate_fields(&title, &content).is_ok());

    let err = validate_fields(&"é".repeat(TITLE_MAX_CHARS + 1), "body").unwrap_err();
    assert_eq!(
        err,
        MemoValidationError::TitleTooLong {
            chars: TITLE_MAX_CHARS + 1,
            max: TITLE_MAX_CHARS
        }
    );

    let err = validate_fields("title", &"x".repeat(CONTENT_MAX_CHARS + 1)).unwrap_err();
    assert!(matches!(err, MemoValidationError::ContentTooLong { .. }));
    assert!(err.to_string().contains("512"));
}

#[test]
fn memo_serializes_date_as_iso_string_or_null() {
    let dated = Memo {
        id: MemoId::new(3),
        title: "Trip".to_string(),
        content: "Pack charger".to_string(),
        create_date: NaiveDate::from_ymd_opt(2024, 3, 1),
    };
    let json = serde_json::to_value(&dated).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["create_date"], "2024-03-01");

    let decoded: Memo = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, dated);

    let undated = Memo {
        create_date: None,
        ..dated
    };
    let json = serde_json::to_value(&undated).unwrap();
    assert!(json["create_date"].is_null());
}

#[test]
fn display_omits_memo_body() {
    let memo = Memo {
        id: MemoId::new(1),
        title: "Groceries".to_string(),
        content: "Milk, eggs".to_string(),
        create_date: None,
    };
    let rendered = memo.to_string();
    assert_eq!(rendered, "Memo(id=1, title=\"Groceries\", chars=10)");
    assert!(!rendered.contains("Milk"));
}
