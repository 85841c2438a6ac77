//! Tests for keys, styles, and attachment descriptors.

use attachit_core::{Attachment, AttachmentDescriptor, StorageKey, Styles, derive_filename};
use attachit_error::BuilderErrorKind;

fn avatar() -> AttachmentDescriptor<&'static str> {
    AttachmentDescriptor::builder()
        .object_id("42")
        .name("avatar")
        .assigned_file("/uploads/me.jpg")
        .style("thumb", "p1")
        .style("large", "p2")
        .build()
        .unwrap()
}

#[test]
fn test_key_derivation_is_deterministic() {
    let a = StorageKey::derive("42", "avatar", "thumb");
    let b = StorageKey::derive("42", "avatar", "thumb");
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "42_avatar_thumb");
    assert_ne!(a, StorageKey::derive("42", "avatar", "large"));
}

#[test]
fn test_original_key_uses_reserved_style() {
    assert_eq!(
        StorageKey::original("42", "avatar").to_string(),
        "42_avatar_original"
    );
}

#[test]
fn test_persisted_keys_roundtrip_through_serde() {
    let key = StorageKey::derive("7", "cover", "small");
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, "\"7_cover_small\"");
    let back: StorageKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, key);
}

#[test]
fn test_descriptor_derives_keys_and_filenames() {
    let descriptor = avatar();
    assert_eq!(descriptor.file_name(), "me.jpg");
    assert_eq!(descriptor.key("large").as_str(), "42_avatar_large");
    assert_eq!(descriptor.filename("original"), "original_me.jpg");
    assert_eq!(derive_filename("large", "me.jpg"), descriptor.filename("large"));
}

#[test]
fn test_styles_keep_declaration_order() {
    let descriptor = avatar();
    let names: Vec<_> = descriptor.styles().names().collect();
    assert_eq!(names, ["thumb", "large"]);
}

#[test]
fn test_filename_override_is_used() {
    let descriptor = AttachmentDescriptor::<()>::builder()
        .object_id("1")
        .name("photo")
        .assigned_file("/uploads/cat.png")
        .filename_fn(|style, file_name| format!("{}/{}", style, file_name))
        .build()
        .unwrap();

    assert_eq!(descriptor.filename("thumb"), "thumb/cat.png");
    // Keys never depend on the override.
    assert_eq!(descriptor.key("thumb").as_str(), "1_photo_thumb");
}

#[test]
fn test_explicit_file_name_wins_over_path() {
    let descriptor = AttachmentDescriptor::<()>::builder()
        .object_id("1")
        .name("photo")
        .assigned_file("/tmp/upload-8f3a")
        .file_name("holiday.jpg")
        .build()
        .unwrap();
    assert_eq!(descriptor.filename("original"), "original_holiday.jpg");
}

#[test]
fn test_builder_requires_identity() {
    let missing_id = AttachmentDescriptor::<()>::builder()
        .name("photo")
        .assigned_file("/uploads/cat.png")
        .build();
    assert!(missing_id.is_err());

    let missing_file = AttachmentDescriptor::<()>::builder()
        .object_id("1")
        .name("photo")
        .build();
    assert!(missing_file.is_err());
}

#[test]
fn test_original_is_not_a_style_name() {
    let result = AttachmentDescriptor::builder()
        .object_id("1")
        .name("photo")
        .assigned_file("/uploads/cat.png")
        .style("original", "p")
        .build();
    let err = result.unwrap_err();
    assert_eq!(
        err.kind(),
        &BuilderErrorKind::InvalidStyleName("original".to_string())
    );
    assert_eq!(err.kind().to_string(), "'original' is not a usable style name");
}

#[test]
fn test_errors_accumulate_and_clear() {
    let mut descriptor = avatar();
    assert!(!descriptor.has_errors());

    descriptor.add_error("bad format".to_string());
    descriptor.add_error("disk full".to_string());
    assert_eq!(descriptor.errors(), ["bad format", "disk full"]);

    descriptor.clear_errors();
    assert!(descriptor.errors().is_empty());
}

#[test]
fn test_reinserting_a_style_replaces_in_place() {
    let mut styles = Styles::new();
    styles.insert("a", 1).unwrap();
    styles.insert("b", 2).unwrap();
    styles.insert("a", 3).unwrap();

    assert_eq!(styles.len(), 2);
    let pairs: Vec<_> = styles.iter().map(|s| (s.name().as_str(), *s.params())).collect();
    assert_eq!(pairs, [("a", 3), ("b", 2)]);
}

#[test]
fn test_deserialized_styles_reject_reserved_name() {
    let result: Result<Styles<String>, _> =
        serde_json::from_str(r#"[{"name": "original", "params": "X"}]"#);
    assert!(result.is_err());

    let result: Result<Styles<String>, _> =
        serde_json::from_str(r#"[{"name": "", "params": "E"}]"#);
    assert!(result.is_err());
}

#[test]
fn test_deserialized_duplicate_styles_collapse() {
    let styles: Styles<String> = serde_json::from_str(
        r#"[{"name": "thumb", "params": "A"}, {"name": "large", "params": "L"}, {"name": "thumb", "params": "B"}]"#,
    )
    .unwrap();

    assert_eq!(styles.names().collect::<Vec<_>>(), ["thumb", "large"]);
    assert_eq!(styles.get("thumb"), Some(&"B".to_string()));
}

#[test]
fn test_styles_serialize_as_list() {
    let styles = Styles::from_pairs([("thumb", 1), ("large", 2)]).unwrap();
    let json = serde_json::to_string(&styles).unwrap();
    assert_eq!(
        json,
        r#"[{"name":"thumb","params":1},{"name":"large","params":2}]"#
    );
    let back: Styles<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, styles);
}
