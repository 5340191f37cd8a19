use crate::core::scrub::{normalize_line_endings, Scrubber};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use crate::core::{ScrubReport, Storage};
use crate::utils::error::{Result, ScrubError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScrubOptions {
    pub dry_run: bool,
    pub strict: bool,
    pub backup: bool,
}

pub struct ScrubEngine<S: Storage> {
    storage: S,
    scrubber: Scrubber,
    options: ScrubOptions,
}

impl<S: Storage> ScrubEngine<S> {
    pub fn new(storage: S, scrubber: Scrubber) -> Self {
        Self::with_options(storage, scrubber, ScrubOptions::default())
    }

    pub fn with_options(storage: S, scrubber: Scrubber, options: ScrubOptions) -> Self {
        Self {
            storage,
            scrubber,
            options,
        }
    }

    pub async fn run(&self, path: &str) -> Result<ScrubReport> {
        // 讀取目標檔案
        tracing::info!("Reading {}", path);
        let raw = self.storage.read_file(path).await?;
        let decoded = String::from_utf8(raw).map_err(|_| ScrubError::InvalidEncoding {
            path: path.to_string(),
        })?;

        // 統一換行符號，CRLF 檔案寫回時會變成 LF
        let content = normalize_line_endings(&decoded);
        if matches!(content, Cow::Owned(_)) {
            tracing::debug!("Converted CRLF line endings in {}", path);
        }

        // 依序套用所有規則
        let (scrubbed, outcomes) = self.scrubber.apply(&content);

        for outcome in &outcomes {
            tracing::info!(
                "{} block removed: {} replacement(s)",
                outcome.label,
                outcome.match_count
            );
        }

        // 嚴格模式下匹配次數不符即中止，不寫入任何檔案
        let mut unexpected = outcomes.iter().filter(|o| !o.is_expected());
        if self.options.strict {
            if let Some(outcome) = unexpected.next() {
                return Err(ScrubError::UnexpectedMatchCount {
                    rule: outcome.name.clone(),
                    expected: outcome.expected.unwrap_or_default(),
                    found: outcome.match_count,
                });
            }
        } else {
            for outcome in unexpected {
                tracing::warn!(
                    "Rule '{}' matched {} time(s), expected {}",
                    outcome.name,
                    outcome.match_count,
                    outcome.expected.unwrap_or_default()
                );
            }
        }

        let mut backup_path = None;
        let written = if self.options.dry_run {
            tracing::info!("Dry run: {} left untouched", path);
            false
        } else {
            // 先備份原始內容再覆寫
            if self.options.backup {
                let target = backup_file_name(path, Utc::now());
                self.storage.write_file(&target, decoded.as_bytes()).await?;
                tracing::info!("Original saved to {}", target);
                backup_path = Some(target);
            }
            self.storage.write_file(path, scrubbed.as_bytes()).await?;
            tracing::debug!("Wrote {} bytes to {}", scrubbed.len(), path);
            true
        };

        Ok(ScrubReport {
            path: path.to_string(),
            outcomes,
            original_len: content.chars().count(),
            new_len: scrubbed.chars().count(),
            written,
            backup_path,
            dry_run: self.options.dry_run,
            finished_at: Utc::now().to_rfc3339(),
        })
    }
}

/// 備份檔名帶毫秒時間戳，同一秒內的多次備份不會互相覆蓋
pub fn backup_file_name(path: &str, at: DateTime<Utc>) -> String {
    format!("{}.bak-{}", path, at.format("%Y%m%d_%H%M%S%.3f"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scrub::APP_STORE_FIXTURE;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl MemoryStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .lock()
                .unwrap()
                .insert(path.to_string(), content.as_bytes().to_vec());
            storage
        }

        fn get(&self, path: &str) -> Option<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .map(|data| String::from_utf8(data.clone()).unwrap())
        }

        fn len(&self) -> usize {
            self.files.lock().unwrap().len()
        }
    }

    impl Storage for MemoryStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
                ScrubError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    const PATH: &str = "AppStore.swift";

    #[test]
    fn test_run_rewrites_file_in_place() {
        let engine = ScrubEngine::new(
            MemoryStorage::with_file(PATH, APP_STORE_FIXTURE),
            Scrubber::builtin().unwrap(),
        );

        let report = tokio_test::block_on(engine.run(PATH)).unwrap();

        assert!(report.written);
        assert_eq!(report.total_matches(), 3);
        assert!(report.removed() > 0);
        assert_eq!(report.original_len, APP_STORE_FIXTURE.chars().count());

        let saved = engine.storage.get(PATH).unwrap();
        assert_eq!(saved.chars().count(), report.new_len);
        assert!(saved.contains("self.friends = []"));
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let options = ScrubOptions {
            dry_run: true,
            backup: true,
            ..Default::default()
        };
        let engine = ScrubEngine::with_options(
            MemoryStorage::with_file(PATH, APP_STORE_FIXTURE),
            Scrubber::builtin().unwrap(),
            options,
        );

        let report = tokio_test::block_on(engine.run(PATH)).unwrap();

        assert!(!report.written);
        assert!(report.backup_path.is_none());
        assert_eq!(report.total_matches(), 3);
        assert_eq!(engine.storage.get(PATH).unwrap(), APP_STORE_FIXTURE);
        assert_eq!(engine.storage.len(), 1);
    }

    #[test]
    fn test_strict_mode_rejects_missing_block() {
        let options = ScrubOptions {
            strict: true,
            ..Default::default()
        };
        let already_clean = "        // Conversations loaded from API\n        self.conversations = []\n";
        let engine = ScrubEngine::with_options(
            MemoryStorage::with_file(PATH, already_clean),
            Scrubber::builtin().unwrap(),
            options,
        );

        let err = tokio_test::block_on(engine.run(PATH)).unwrap_err();

        match err {
            ScrubError::UnexpectedMatchCount {
                rule,
                expected,
                found,
            } => {
                assert_eq!(rule, "conversations");
                assert_eq!(expected, 1);
                assert_eq!(found, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(engine.storage.get(PATH).unwrap(), already_clean);
    }

    #[test]
    fn test_lenient_mode_writes_with_zero_matches() {
        let engine = ScrubEngine::new(
            MemoryStorage::with_file(PATH, "struct Empty {}\n"),
            Scrubber::builtin().unwrap(),
        );

        let report = tokio_test::block_on(engine.run(PATH)).unwrap();

        assert!(report.written);
        assert_eq!(report.total_matches(), 0);
        assert_eq!(report.removed(), 0);
        assert_eq!(report.unexpected().count(), 3);
    }

    #[test]
    fn test_backup_keeps_original() {
        let options = ScrubOptions {
            backup: true,
            ..Default::default()
        };
        let engine = ScrubEngine::with_options(
            MemoryStorage::with_file(PATH, APP_STORE_FIXTURE),
            Scrubber::builtin().unwrap(),
            options,
        );

        let report = tokio_test::block_on(engine.run(PATH)).unwrap();

        let backup = report.backup_path.expect("backup path");
        assert!(backup.starts_with("AppStore.swift.bak-"));
        assert_eq!(engine.storage.get(&backup).unwrap(), APP_STORE_FIXTURE);
    }

    #[test]
    fn test_crlf_file_is_scrubbed() {
        let crlf = APP_STORE_FIXTURE.replace('\n', "\r\n");
        let engine = ScrubEngine::new(
            MemoryStorage::with_file(PATH, &crlf),
            Scrubber::builtin().unwrap(),
        );

        let report = tokio_test::block_on(engine.run(PATH)).unwrap();

        let counts: Vec<usize> = report.outcomes.iter().map(|o| o.match_count).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert_eq!(report.original_len, APP_STORE_FIXTURE.chars().count());

        let saved = engine.storage.get(PATH).unwrap();
        assert!(saved.contains("        // Friends loaded from API\n        self.friends = []\n"));
        assert!(!saved.contains('\r'));
    }

    #[test]
    fn test_backup_keeps_original_line_endings() {
        let crlf = APP_STORE_FIXTURE.replace('\n', "\r\n");
        let options = ScrubOptions {
            backup: true,
            ..Default::default()
        };
        let engine = ScrubEngine::with_options(
            MemoryStorage::with_file(PATH, &crlf),
            Scrubber::builtin().unwrap(),
            options,
        );

        let report = tokio_test::block_on(engine.run(PATH)).unwrap();

        let backup = report.backup_path.expect("backup path");
        assert_eq!(engine.storage.get(&backup).unwrap(), crlf);
    }

    #[test]
    fn test_backup_names_have_millisecond_precision() {
        let first = DateTime::parse_from_rfc3339("2026-10-15T08:30:05.120Z")
            .unwrap()
            .with_timezone(&Utc);
        let second = first + chrono::Duration::milliseconds(1);

        let a = backup_file_name(PATH, first);
        let b = backup_file_name(PATH, second);

        assert_eq!(a, "AppStore.swift.bak-20261015_083005.120");
        assert_eq!(b, "AppStore.swift.bak-20261015_083005.121");
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_non_utf8_input() {
        let storage = MemoryStorage::default();
        storage
            .files
            .lock()
            .unwrap()
            .insert(PATH.to_string(), vec![0xff, 0xfe, 0x00]);
        let engine = ScrubEngine::new(storage, Scrubber::builtin().unwrap());

        let err = tokio_test::block_on(engine.run(PATH)).unwrap_err();
        assert!(matches!(err, ScrubError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let engine = ScrubEngine::new(MemoryStorage::default(), Scrubber::builtin().unwrap());
        let err = tokio_test::block_on(engine.run(PATH)).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
