//! End-to-end scan tests against LocalStack S3.

use crate::common::{LocalStackTestContext, gzip_lines, localstack};
use lg_error::{DecodeError, LgError, ListError};
use lg_scanner::{
    LineSink, OutputTarget, S3Config, S3Fetcher, S3Lister, ScanConfig, Scanner, create_s3_client,
};
use lg_traits::ObjectLister;
use lg_types::ScanTarget;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

async fn scanner_for(ctx: &LocalStackTestContext, config: ScanConfig, output: &OutputTarget) -> Scanner {
    let s3_config = S3Config::new()
        .with_region(&ctx.region)
        .with_endpoint(&ctx.endpoint)
        .with_credentials(localstack::ACCESS_KEY, localstack::SECRET_KEY);
    let client = create_s3_client(&s3_config).await.unwrap();

    output.prepare().await.unwrap();

    Scanner::new(
        config,
        Arc::new(S3Lister::new(client.clone())),
        Arc::new(S3Fetcher::new(client)),
        Arc::new(LineSink::with_console(
            Box::new(std::io::sink()),
            Some(output.clone()),
        )),
    )
}

fn sorted_lines(path: &Path) -> Vec<String> {
    let mut lines: Vec<String> = std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect();
    lines.sort();
    lines
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_scan_prefix_for_token() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "loggrep-scan-prefix";
    ctx.fresh_bucket(bucket).await.unwrap();

    ctx.upload_log(
        bucket,
        "cdn/2021-01-01.gz",
        &[
            "2021-01-01\tuser42\thttp://x/a",
            "2021-01-01\tuser99\thttp://y",
            "2021-01-01\tuser42\tftp://not-http",
        ],
    )
    .await
    .unwrap();
    ctx.upload_log(
        bucket,
        "cdn/2021-01-02.gz",
        &["2021-01-02\tuser42\thttp://x/b", "2021-01-02\tuser420\thttp://z"],
    )
    .await
    .unwrap();
    ctx.upload_log(bucket, "other/2021-01-01.gz", &["2021-01-01\tuser42\thttp://outside"])
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let output = OutputTarget::from_stem(dir.path().join("user42"));
    let config = ScanConfig::new(ScanTarget::new(bucket).with_prefix("cdn/"), "user42");

    let stats = scanner_for(&ctx, config, &output).await.run().await.unwrap();

    assert_eq!(stats.objects_listed, 2);
    assert_eq!(stats.objects_scanned, 2);
    assert_eq!(stats.lines_scanned, 5);
    assert_eq!(stats.lines_matched, 2);
    assert_eq!(
        sorted_lines(output.path()),
        vec!["2021-01-01\tuser42\thttp://x/a", "2021-01-02\tuser42\thttp://x/b"]
    );
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_rerun_replaces_output() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "loggrep-rerun";
    ctx.fresh_bucket(bucket).await.unwrap();
    ctx.upload_log(bucket, "a.gz", &["1\tuser7\thttp://a", "2\tuser7\thttp://b"])
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let output = OutputTarget::from_stem(dir.path().join("user7"));
    std::fs::write(output.path(), "stale line from an earlier run\n").unwrap();

    let mut runs = Vec::new();
    for _ in 0..2 {
        let config = ScanConfig::new(ScanTarget::new(bucket), "user7");
        scanner_for(&ctx, config, &output).await.run().await.unwrap();
        runs.push(sorted_lines(output.path()));
    }

    assert_eq!(runs[0], vec!["1\tuser7\thttp://a", "2\tuser7\thttp://b"]);
    assert_eq!(runs[0], runs[1]);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_empty_prefix_leaves_empty_file() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "loggrep-empty";
    ctx.fresh_bucket(bucket).await.unwrap();

    let dir = TempDir::new().unwrap();
    let output = OutputTarget::from_stem(dir.path().join("nobody"));
    let config = ScanConfig::new(ScanTarget::new(bucket).with_prefix("nothing-here/"), "user42");

    let stats = scanner_for(&ctx, config, &output).await.run().await.unwrap();

    assert_eq!(stats.objects_listed, 0);
    assert_eq!(std::fs::read_to_string(output.path()).unwrap(), "");
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_corrupt_object_fails_run() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "loggrep-corrupt";
    ctx.fresh_bucket(bucket).await.unwrap();
    ctx.upload_log(bucket, "good.gz", &["1\tuser42\thttp://a"])
        .await
        .unwrap();
    ctx.upload(bucket, "bad.gz", b"plain text, not gzip".to_vec())
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let output = OutputTarget::from_stem(dir.path().join("user42"));
    let config = ScanConfig::new(ScanTarget::new(bucket), "user42");

    let result = scanner_for(&ctx, config, &output).await.run().await;

    assert!(matches!(
        result,
        Err(LgError::Decode(DecodeError::Malformed(_)))
    ));
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_multi_member_gzip_object() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "loggrep-multi-member";
    ctx.fresh_bucket(bucket).await.unwrap();

    let mut payload = gzip_lines(&["1\tuser42\thttp://first"]);
    payload.extend(gzip_lines(&["2\tuser42\thttp://second"]));
    ctx.upload(bucket, "rotated.gz", payload).await.unwrap();

    let dir = TempDir::new().unwrap();
    let output = OutputTarget::from_stem(dir.path().join("user42"));
    let config = ScanConfig::new(ScanTarget::new(bucket), "user42");

    scanner_for(&ctx, config, &output).await.run().await.unwrap();

    assert_eq!(
        std::fs::read_to_string(output.path()).unwrap(),
        "1\tuser42\thttp://first\n2\tuser42\thttp://second\n"
    );
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_lister_skips_directory_markers() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "loggrep-markers";
    ctx.fresh_bucket(bucket).await.unwrap();
    ctx.upload(bucket, "cdn/", Vec::new()).await.unwrap();
    ctx.upload_log(bucket, "cdn/a.gz", &["x"]).await.unwrap();

    let s3_config = S3Config::new()
        .with_region(&ctx.region)
        .with_endpoint(&ctx.endpoint)
        .with_credentials(localstack::ACCESS_KEY, localstack::SECRET_KEY);
    let lister = S3Lister::new(create_s3_client(&s3_config).await.unwrap());

    let keys = lister.list(bucket, Some("cdn/")).await.unwrap();

    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].as_str(), "cdn/a.gz");
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_bucket_fails_listing() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let dir = TempDir::new().unwrap();
    let output = OutputTarget::from_stem(dir.path().join("user42"));
    let config = ScanConfig::new(ScanTarget::new("loggrep-no-such-bucket"), "user42");

    let result = scanner_for(&ctx, config, &output).await.run().await;

    assert!(matches!(
        result,
        Err(LgError::List(ListError::BucketNotFound(_)))
    ));
}
