
use std::{fs, path::Path};

use chrono::{TimeZone, Utc};
use portfolio_site::{
    entities::work::Status,
    errors::{AppError, ContentError},
    repositories::{content_repo::{FsWorkRepo, StaticWorkRepo}, work::WorkRepository},
    use_cases::work::WorkHandler,
};
use serde_json::json;
use tempfile::TempDir;
use test_utils::*;

const PORTFOLIO_MD: &str = "---
title: Portfolio
description: A site
publishDate: 2024-01-15
tags:
  - web
img: /img.png
category: Personal
---
# Portfolio

Hello from the body.
";

const SHOP_MD: &str = "---
title: Shop redesign
description: E-commerce refresh
publishDate: 2023-06-01T09:30:00Z
tags: [web, design]
img: /shop.png
img_alt: Shop front page
category: Work
status: archived
project_url: https://shop.example.com
---
Client work.
";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write content fixture");
}

fn content_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (name, contents) in files {
        write(dir.path(), name, contents);
    }
    dir
}

#[actix_rt::test]
async fn loads_markdown_files_with_front_matter() {
    let dir = content_dir(&[
        ("Portfolio Site.md", PORTFOLIO_MD),
        ("shop.markdown", SHOP_MD),
        ("notes.txt", "not content"),
    ]);
    fs::create_dir(dir.path().join("drafts.md")).unwrap();

    let entries = FsWorkRepo::new(dir.path()).load_entries().await.unwrap();

    let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, vec!["portfolio-site", "shop"]);
    assert_eq!(entries[0].data["publishDate"], json!("2024-01-15"));
    assert_eq!(entries[0].body, "# Portfolio\n\nHello from the body.\n");
    assert!(entries[0].source.ends_with("Portfolio Site.md"));
}

#[actix_rt::test]
async fn valid_directory_becomes_a_collection() {
    let dir = content_dir(&[("portfolio.md", PORTFOLIO_MD), ("shop.md", SHOP_MD)]);

    let collection = WorkHandler::new(FsWorkRepo::new(dir.path()))
        .load_collection()
        .await
        .unwrap();

    assert_eq!(collection.len(), 2);
    let portfolio = collection.get("portfolio").unwrap();
    assert_eq!(portfolio.item.publish_date, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    assert_eq!(portfolio.item.status, Status::Live);
    assert!(portfolio.body_html.contains("<h1>Portfolio</h1>"));

    let shop = collection.get("shop").unwrap();
    assert_eq!(shop.item.status, Status::Archived);
    assert_eq!(shop.item.img_alt.as_deref(), Some("Shop front page"));
}

#[actix_rt::test]
async fn one_invalid_entry_fails_the_whole_load() {
    let broken = PORTFOLIO_MD
        .replace("title: Portfolio\n", "")
        .replace("category: Personal", "category: personal");
    let dir = content_dir(&[("broken.md", &broken), ("shop.md", SHOP_MD)]);

    let err = WorkHandler::new(FsWorkRepo::new(dir.path()))
        .load_collection()
        .await
        .unwrap_err();

    match err {
        AppError::Content(ContentError::InvalidEntries(entries)) => {
            assert_eq!(entries.len(), 1);
            assert!(entries[0].source.ends_with("broken.md"));
            let fields: Vec<_> = entries[0].errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, vec!["category", "title"]);
        }
        other => panic!("expected invalid entries, got {:?}", other),
    }
}

#[actix_rt::test]
async fn every_invalid_entry_is_reported() {
    let entries = vec![
        raw_entry("a", valid_record_without("img"), ""),
        raw_entry("b", valid_record(), ""),
        raw_entry("c", valid_record_with("demo_url", json!("nope")), ""),
    ];

    let err = WorkHandler::new(StaticWorkRepo::new(entries))
        .load_collection()
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("2 invalid work entries"), "{}", message);
    assert!(message.contains("a.md (img:Required)"), "{}", message);
    assert!(message.contains("c.md (demo_url:Invalid url)"), "{}", message);
}

#[actix_rt::test]
async fn files_without_front_matter_fail_validation() {
    let dir = content_dir(&[("bare.md", "# Only a body\n")]);

    let err = WorkHandler::new(FsWorkRepo::new(dir.path()))
        .load_collection()
        .await
        .unwrap_err();

    match err {
        AppError::Content(ContentError::InvalidEntries(entries)) => {
            assert_eq!(entries[0].errors.len(), 6);
        }
        other => panic!("expected invalid entries, got {:?}", other),
    }
}

#[actix_rt::test]
async fn malformed_yaml_names_the_file() {
    let dir = content_dir(&[("bad.md", "---\ntitle: [unclosed\n---\nbody\n")]);

    let err = FsWorkRepo::new(dir.path()).load_entries().await.unwrap_err();

    match err {
        AppError::Content(ContentError::MalformedFrontMatter(source, _)) => {
            assert!(source.ends_with("bad.md"));
        }
        other => panic!("expected malformed front matter, got {:?}", other),
    }
}

#[actix_rt::test]
async fn duplicate_slugs_are_rejected() {
    let dir = content_dir(&[("My Site.md", PORTFOLIO_MD), ("my-site.md", PORTFOLIO_MD)]);

    let err = WorkHandler::new(FsWorkRepo::new(dir.path()))
        .load_collection()
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Content(ContentError::DuplicateSlug(ref slug, _)) if slug == "my-site"));
}

#[actix_rt::test]
async fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = FsWorkRepo::new(dir.path().join("absent"))
        .load_entries()
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Content(ContentError::Io(_, _))));
}
