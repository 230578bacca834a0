//! End-to-end tests against a stand-in analyzer script

#![cfg(unix)]

use aribeit_core::{AnalyzerConfig, ExtractError, MetadataProvider, NormalizedMetadata};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const SAMPLE: &str = r#"{"channel":{"channel_name":"NHK"},"program":{"title":"News","description":"D","start_time":"2024-01-02T19:00:00","genre":[{"major":"News","middle":"Weather"}]}}"#;

/// Analyzer that prints the recording itself when called as `--mode=eit <file>`
const CAT_ANALYZER: &str = r#"[ "$#" -eq 2 ] || { echo "expected 2 arguments, got $#" >&2; exit 2; }
[ "$1" = "--mode=eit" ] || { echo "bad mode $1" >&2; exit 2; }
cat "$2"
"#;

/// Command line running `body` through `sh`; the script path is quoted
fn script_command(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    format!("sh '{}'", path.display())
}

fn write_recording(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn cat_provider(dir: &TempDir) -> MetadataProvider {
    let command = script_command(dir, "eit analyzer.sh", CAT_ANALYZER);
    MetadataProvider::new(AnalyzerConfig::with_command(format!("{} --mode=eit", command)))
}

async fn extract(
    provider: &MetadataProvider,
    path: &Path,
) -> Result<NormalizedMetadata, ExtractError> {
    provider.extract(path, &CancellationToken::new()).await
}

#[tokio::test]
async fn test_sample_payload_through_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let provider = cat_provider(&dir);
    let recording = write_recording(&dir, "evening news (2024).m2ts", SAMPLE);

    let metadata = extract(&provider, &recording).await.unwrap();

    assert_eq!(metadata.title.as_deref(), Some("News"));
    assert_eq!(metadata.description.as_deref(), Some("D"));
    assert_eq!(
        metadata.start_date,
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(19, 0, 0)
    );
    assert_eq!(metadata.genres, vec!["News/Weather"]);
    assert_eq!(metadata.tags, vec!["NHK"]);
}

#[tokio::test]
async fn test_metadata_result_maps_onto_item() {
    let dir = TempDir::new().unwrap();
    let provider = cat_provider(&dir);
    let recording = write_recording(&dir, "a.ts", SAMPLE);

    let result = provider
        .metadata_result(&recording, &CancellationToken::new())
        .await;

    assert!(result.has_metadata);
    let item = result.item.unwrap();
    assert_eq!(item.name.as_deref(), Some("News"));
    assert_eq!(item.production_year, Some(2024));
    assert_eq!(item.tags, vec!["NHK"]);
}

#[tokio::test]
async fn test_malformed_payload_yields_no_metadata() {
    let dir = TempDir::new().unwrap();
    let provider = cat_provider(&dir);
    let recording = write_recording(&dir, "broken.ts", "\x47\x40\x11 not json");

    let result = extract(&provider, &recording).await;
    assert!(matches!(result, Err(ExtractError::MalformedPayload { .. })), "{:?}", result);

    let result = provider
        .metadata_result(&recording, &CancellationToken::new())
        .await;
    assert!(!result.has_metadata);
    assert!(result.item.is_none());
}

#[tokio::test]
async fn test_empty_recording_is_empty_output() {
    let dir = TempDir::new().unwrap();
    let provider = cat_provider(&dir);
    let recording = write_recording(&dir, "empty.ts", "\n");

    let result = extract(&provider, &recording).await;
    assert!(matches!(result, Err(ExtractError::EmptyOutput { .. })), "{:?}", result);
}

#[tokio::test]
async fn test_non_zero_exit_ignores_stdout_and_keeps_stderr() {
    let dir = TempDir::new().unwrap();
    let command = script_command(
        &dir,
        "failing",
        &format!("echo '{}'\necho 'no EIT found' >&2\nexit 1\n", SAMPLE),
    );
    let provider = MetadataProvider::new(AnalyzerConfig::with_command(command));
    let recording = write_recording(&dir, "a.ts", "");

    match extract(&provider, &recording).await {
        Err(ExtractError::NonZeroExit { code, stderr, command }) => {
            assert_eq!(code, 1);
            assert_eq!(stderr, "no EIT found\n");
            assert!(command.ends_with("a.ts"), "{}", command);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(provider
        .fetch(&recording, &CancellationToken::new())
        .await
        .is_none());
}

#[tokio::test]
async fn test_analyzer_timeout() {
    let dir = TempDir::new().unwrap();
    let command = script_command(&dir, "slow", "exec sleep 30\n");
    let mut config = AnalyzerConfig::with_command(command);
    config.timeout_secs = Some(1);
    let provider = MetadataProvider::new(config);
    let recording = write_recording(&dir, "a.ts", "");

    let result = extract(&provider, &recording).await;
    assert!(
        matches!(result, Err(ExtractError::TimedOut(d)) if d == Duration::from_secs(1)),
        "{:?}",
        result
    );
}

#[tokio::test]
async fn test_cancellation() {
    let dir = TempDir::new().unwrap();
    let command = script_command(&dir, "slow", "exec sleep 30\n");
    let provider = MetadataProvider::new(AnalyzerConfig::with_command(command));
    let recording = write_recording(&dir, "a.ts", "");

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = provider.extract(&recording, &cancel).await;
    assert!(matches!(result, Err(ExtractError::Cancelled)), "{:?}", result);
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let dir = TempDir::new().unwrap();
    let provider = cat_provider(&dir);
    let first = write_recording(&dir, "first.ts", r#"{"program":{"title":"One"}}"#);
    let second = write_recording(&dir, "second.ts", r#"{"program":{"title":"Two"}}"#);

    let cancel = CancellationToken::new();
    let (a, b) = tokio::join!(provider.fetch(&first, &cancel), provider.fetch(&second, &cancel));

    assert_eq!(a.unwrap().title.as_deref(), Some("One"));
    assert_eq!(b.unwrap().title.as_deref(), Some("Two"));
}

#[tokio::test]
async fn test_extract_metadata_helper() {
    let dir = TempDir::new().unwrap();
    let recording = write_recording(&dir, "clip.mp4", SAMPLE);
    let config = AnalyzerConfig::with_command("cat");

    let result = aribeit_core::extract_metadata(&recording, &config).await;
    assert!(matches!(result, Err(ExtractError::IneligibleInput(_))), "{:?}", result);

    let recording = write_recording(&dir, "clip.ts", SAMPLE);
    let metadata = aribeit_core::extract_metadata(&recording, &config).await.unwrap();
    assert_eq!(metadata.title.as_deref(), Some("News"));
}
