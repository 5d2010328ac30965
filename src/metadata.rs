//! Resolving a media reference to descriptive metadata.

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::tool::ToolCommand;

/// Descriptive fields of a media item, decoded from the tool's JSON dump.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MediaMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uploader: String,
    /// Length in whole seconds, 0 when unknown.
    #[serde(default, deserialize_with = "whole_seconds")]
    pub duration: u64,
    /// Canonical reference used for the download itself.
    #[serde(default, deserialize_with = "null_as_default")]
    pub webpage_url: String,
}

impl MediaMetadata {
    /// Fills an empty canonical reference with the reference the user entered.
    pub fn backfill_reference(&mut self, reference: &str) {
        if self.webpage_url.trim().is_empty() {
            self.webpage_url = reference.to_string();
        }
    }

    /// Decodes the first JSON record of a metadata dump.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedMetadata`] if the output is empty or not a
    /// JSON object with the expected field types.
    pub fn from_dump(stdout: &[u8]) -> Result<Self> {
        serde_json::Deserializer::from_slice(stdout)
            .into_iter::<Self>()
            .next()
            .unwrap_or_else(|| {
                Err(<serde_json::Error as serde::de::Error>::custom(
                    "no metadata record in output",
                ))
            })
            .map_err(Error::MalformedMetadata)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = Option::<f64>::deserialize(deserializer)?;
    Ok(seconds
        .filter(|s| s.is_finite() && *s > 0.0)
        .map_or(0, |s| s.round() as u64))
}

/// Runs the metadata dump and decodes its result.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] or [`Error::WorkerStart`] if the tool
/// cannot be run, [`Error::NonZeroExit`] if it fails, and
/// [`Error::MalformedMetadata`] if its output cannot be decoded.
pub async fn fetch_metadata(command: &ToolCommand, reference: &str) -> Result<MediaMetadata> {
    log::info!("Fetching metadata for {reference}");

    let output = command
        .command()
        .output()
        .await
        .map_err(|e| command.spawn_error(e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::non_zero_exit(output.status, Some(&stderr)));
    }

    let mut metadata = MediaMetadata::from_dump(&output.stdout)?;
    metadata.backfill_reference(reference);
    log::info!(
        "Resolved \"{}\" by {} ({}s)",
        metadata.title,
        metadata.uploader,
        metadata.duration
    );
    Ok(metadata)
}

/// Human-readable reason for a failed metadata fetch.
#[must_use]
pub fn failure_reason(error: &Error) -> String {
    match error {
        Error::MalformedMetadata(e) => format!("failed to parse metadata: {e}"),
        other => format!("failed to fetch metadata: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_expected_fields() {
        let dump = br#"{"title":"Clip","uploader":"Someone","duration":212,"webpage_url":"https://youtu.be/abc","id":"abc"}"#;
        let meta = MediaMetadata::from_dump(dump).unwrap();
        assert_eq!(
            meta,
            MediaMetadata {
                title: "Clip".to_string(),
                uploader: "Someone".to_string(),
                duration: 212,
                webpage_url: "https://youtu.be/abc".to_string(),
            }
        );
    }

    #[test]
    fn fractional_duration_rounds() {
        let meta = MediaMetadata::from_dump(br#"{"title":"t","duration":59.6}"#).unwrap();
        assert_eq!(meta.duration, 60);
    }

    #[test]
    fn null_and_missing_fields_default() {
        let meta =
            MediaMetadata::from_dump(br#"{"title":null,"uploader":null,"duration":null}"#).unwrap();
        assert_eq!(meta, MediaMetadata::default());
    }

    #[test]
    fn first_record_of_many_is_used() {
        let dump = b"{\"title\":\"one\"}\n{\"title\":\"two\"}\n";
        assert_eq!(MediaMetadata::from_dump(dump).unwrap().title, "one");
    }

    #[test]
    fn empty_output_is_malformed() {
        assert!(matches!(
            MediaMetadata::from_dump(b""),
            Err(Error::MalformedMetadata(_))
        ));
    }

    #[test]
    fn garbage_output_is_malformed() {
        assert!(matches!(
            MediaMetadata::from_dump(b"ERROR: not json"),
            Err(Error::MalformedMetadata(_))
        ));
    }

    #[test]
    fn backfill_only_when_empty() {
        let mut meta = MediaMetadata::default();
        meta.backfill_reference("https://example.com/v");
        assert_eq!(meta.webpage_url, "https://example.com/v");

        meta.backfill_reference("https://other.example/v");
        assert_eq!(meta.webpage_url, "https://example.com/v");
    }

    #[test]
    fn failure_reasons_are_distinct() {
        let parse = MediaMetadata::from_dump(b"").unwrap_err();
        assert!(failure_reason(&parse).starts_with("failed to parse metadata"));

        let missing = Error::ToolNotFound {
            program: "yt-dlp".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(failure_reason(&missing).starts_with("failed to fetch metadata: yt-dlp not found"));
    }

    #[cfg(unix)]
    mod process {
        use super::*;

        fn sh(script: &str) -> ToolCommand {
            ToolCommand::new("sh", ["-c", script])
        }

        #[tokio::test]
        async fn successful_dump_is_decoded_and_backfilled() {
            let cmd = sh(r#"printf '{"title":"Clip","uploader":"Me","duration":3}\n'"#);
            let meta = fetch_metadata(&cmd, "https://example.com/v").await.unwrap();
            assert_eq!(meta.title, "Clip");
            assert_eq!(meta.uploader, "Me");
            assert_eq!(meta.duration, 3);
            assert_eq!(meta.webpage_url, "https://example.com/v");
        }

        #[tokio::test]
        async fn non_zero_exit_carries_stderr() {
            let cmd = sh("echo 'ERROR: Unsupported URL' >&2; exit 1");
            let err = fetch_metadata(&cmd, "bogus").await.unwrap_err();
            assert!(matches!(err, Error::NonZeroExit { .. }));
            let reason = failure_reason(&err);
            assert!(reason.starts_with("failed to fetch metadata:"));
            assert!(reason.contains("ERROR: Unsupported URL"));
        }

        #[tokio::test]
        async fn invalid_output_is_malformed() {
            let err = fetch_metadata(&sh("echo hello"), "x").await.unwrap_err();
            assert!(matches!(err, Error::MalformedMetadata(_)));
        }

        #[tokio::test]
        async fn missing_tool_is_not_found() {
            let cmd = ToolCommand::new("/definitely/not/here/yt-dlp", ["--dump-json"]);
            let err = fetch_metadata(&cmd, "x").await.unwrap_err();
            assert!(matches!(err, Error::ToolNotFound { .. }));
        }
    }
}
